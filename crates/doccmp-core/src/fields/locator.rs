//! Value inference strategies.
//!
//! Once a label fragment is found, a [`ValueLocator`] decides which fragment
//! carries the field's value.

use serde::{Deserialize, Serialize};

use crate::ocr::TextFragment;

/// Picks the value fragment for a label at `label_index`.
pub trait ValueLocator: Send + Sync {
    /// Return the value text, or `None` when no fragment qualifies.
    fn locate(&self, fragments: &[TextFragment], label_index: usize) -> Option<String>;
}

impl<F> ValueLocator for F
where
    F: Fn(&[TextFragment], usize) -> Option<String> + Send + Sync,
{
    fn locate(&self, fragments: &[TextFragment], label_index: usize) -> Option<String> {
        self(fragments, label_index)
    }
}

/// The fragment immediately after the label in sequence order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextFragment;

impl ValueLocator for NextFragment {
    fn locate(&self, fragments: &[TextFragment], label_index: usize) -> Option<String> {
        fragments.get(label_index + 1).map(|f| f.text.clone())
    }
}

/// The closest fragment to the right of the label on the same row.
///
/// A candidate is on the label's row when its vertical center lies inside the
/// label's vertical extent, and to its right when its left edge is past the
/// label's horizontal center.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameRowRight;

impl ValueLocator for SameRowRight {
    fn locate(&self, fragments: &[TextFragment], label_index: usize) -> Option<String> {
        let label = fragments.get(label_index)?;
        let (_, label_top, _, label_bottom) = label.rect();
        let (label_cx, _) = label.center();

        let mut best: Option<(f32, &TextFragment)> = None;

        for (i, candidate) in fragments.iter().enumerate() {
            if i == label_index {
                continue;
            }

            let (left, _, _, _) = candidate.rect();
            let (_, cy) = candidate.center();

            if cy < label_top || cy > label_bottom || left <= label_cx {
                continue;
            }

            let gap = left - label_cx;
            match best {
                Some((best_gap, _)) if best_gap <= gap => {}
                _ => best = Some((gap, candidate)),
            }
        }

        best.map(|(_, f)| f.text.clone())
    }
}

/// Configurable choice of built-in locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStrategy {
    /// Next fragment in OCR order.
    #[default]
    NextFragment,
    /// Nearest fragment to the right on the label's row.
    SameRowRight,
}

impl ValueStrategy {
    /// Build the locator for this strategy.
    pub fn locator(self) -> Box<dyn ValueLocator> {
        match self {
            ValueStrategy::NextFragment => Box::new(NextFragment),
            ValueStrategy::SameRowRight => Box::new(SameRowRight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Vec<TextFragment> {
        vec![
            TextFragment::from_rect("Name of Work", 10.0, 10.0, 120.0, 30.0),
            TextFragment::from_rect("Est. Value", 10.0, 50.0, 100.0, 70.0),
            TextFragment::from_rect("Rs. 4,50,000", 400.0, 52.0, 500.0, 68.0),
            TextFragment::from_rect("Bridge Phase 2", 200.0, 12.0, 350.0, 28.0),
        ]
    }

    #[test]
    fn test_next_fragment() {
        let fragments = form();
        assert_eq!(NextFragment.locate(&fragments, 0), Some("Est. Value".to_string()));
        assert_eq!(NextFragment.locate(&fragments, 3), None);
    }

    #[test]
    fn test_same_row_right() {
        let fragments = form();
        assert_eq!(SameRowRight.locate(&fragments, 0), Some("Bridge Phase 2".to_string()));
        assert_eq!(SameRowRight.locate(&fragments, 1), Some("Rs. 4,50,000".to_string()));
        assert_eq!(SameRowRight.locate(&fragments, 2), None);
    }

    #[test]
    fn test_same_row_right_prefers_nearest() {
        let fragments = vec![
            TextFragment::from_rect("Total", 0.0, 0.0, 50.0, 20.0),
            TextFragment::from_rect("far", 300.0, 0.0, 350.0, 20.0),
            TextFragment::from_rect("near", 80.0, 2.0, 120.0, 18.0),
        ];
        assert_eq!(SameRowRight.locate(&fragments, 0), Some("near".to_string()));
    }

    #[test]
    fn test_closure_locator() {
        let previous = |fragments: &[TextFragment], i: usize| {
            i.checked_sub(1).and_then(|j| fragments.get(j)).map(|f| f.text.clone())
        };
        let fragments = form();
        assert_eq!(previous.locate(&fragments, 1), Some("Name of Work".to_string()));
        assert_eq!(previous.locate(&fragments, 0), None);
    }
}
