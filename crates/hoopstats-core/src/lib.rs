// Library root: fantasy-basketball payload normalization and per-category
// league statistics.

pub mod config;
pub mod format;
pub mod provider;
pub mod report;
pub mod stats;
