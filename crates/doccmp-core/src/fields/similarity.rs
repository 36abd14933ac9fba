//! Fuzzy string similarity scored on a 0-100 scale.
//!
//! The default metric is the normalized InDel similarity
//! `100 * 2 * lcs(a, b) / (|a| + |b|)`, computed over Unicode scalar values.
//! `partial_ratio` slides the shorter string across the longer one and keeps
//! the best window, so a label embedded in a longer line still scores 100.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Similarity metric used for label matching and value comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Normalized InDel (insertions and deletions only).
    #[default]
    Indel,
    /// Normalized Levenshtein distance via `strsim`.
    Levenshtein,
}

impl Metric {
    /// Compare two strings as wholes.
    pub fn ratio(self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        self.score_chars(&a, &b)
    }

    /// Best score of the shorter string against any alignment in the longer one.
    pub fn partial_ratio(self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let (needle, haystack) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

        if needle.is_empty() {
            return if haystack.is_empty() { 100.0 } else { 0.0 };
        }

        let mut best = self.best_window(needle, haystack);

        // Equal lengths: alignment is not symmetric, so try both directions.
        if best < 100.0 && needle.len() == haystack.len() {
            best = best.max(self.best_window(haystack, needle));
        }

        best
    }

    fn best_window(self, needle: &[char], haystack: &[char]) -> f64 {
        let n = needle.len();
        let m = haystack.len();
        let needle_chars: HashSet<char> = needle.iter().copied().collect();
        let mut best = 0.0f64;

        // Windows hanging off the left edge.
        for end in 1..n {
            if !needle_chars.contains(&haystack[end - 1]) {
                continue;
            }
            best = best.max(self.score_chars(needle, &haystack[..end]));
            if best >= 100.0 {
                return 100.0;
            }
        }

        // Full-length windows.
        for start in 0..=(m - n) {
            if !needle_chars.contains(&haystack[start + n - 1]) {
                continue;
            }
            best = best.max(self.score_chars(needle, &haystack[start..start + n]));
            if best >= 100.0 {
                return 100.0;
            }
        }

        // Windows hanging off the right edge.
        for start in (m - n + 1)..m {
            if !needle_chars.contains(&haystack[start]) {
                continue;
            }
            best = best.max(self.score_chars(needle, &haystack[start..]));
            if best >= 100.0 {
                return 100.0;
            }
        }

        best
    }

    fn score_chars(self, a: &[char], b: &[char]) -> f64 {
        match self {
            Metric::Indel => indel_similarity(a, b),
            Metric::Levenshtein => {
                let a: String = a.iter().collect();
                let b: String = b.iter().collect();
                strsim::normalized_levenshtein(&a, &b) * 100.0
            }
        }
    }
}

/// Length of the longest common subsequence.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn indel_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    100.0 * (2 * lcs_len(a, b)) as f64 / total as f64
}

/// Full-string InDel ratio.
pub fn ratio(a: &str, b: &str) -> f64 {
    Metric::Indel.ratio(a, b)
}

/// Substring-tolerant InDel ratio.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    Metric::Indel.partial_ratio(a, b)
}
