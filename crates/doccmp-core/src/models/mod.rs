//! Configuration models.

pub mod catalog;
pub mod config;
