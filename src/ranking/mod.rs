//! Ranking of aggregated metrics
//!
//! This module provides:
//! - Comparison sorts parameterized by a key extractor
//! - Report generators that turn store contents into ranked rows

pub mod reports;
pub mod sort;

pub use reports::{
    rank_descending, EngagementEntry, PlatformEngagementEntry, WatchTimeEntry,
};
pub use sort::{bubble_sort, merge_sort, quick_sort, SortStrategy};
