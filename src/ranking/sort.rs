//! Key-extractor comparison sorts used to rank aggregated metrics
//!
//! All strategies sort ascending by the extracted key and share one contract:
//! `sort(items, key)`.
//!
//! | strategy | best       | average    | worst | stable |
//! |----------|------------|------------|-------|--------|
//! | quick    | n log n    | n log n    | n²    | no     |
//! | merge    | n log n    | n log n    | n log n | yes  |
//! | bubble   | n          | n²         | n²    | yes    |
//!
//! Quick sort always pivots on the last element, so already sorted or
//! reverse-sorted input hits its quadratic case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Sorting algorithm used by the report generators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// Quick sort with Lomuto partitioning; not stable
    #[default]
    Quick,
    /// Top-down merge sort; stable
    Merge,
    /// Bubble sort; stable
    Bubble,
}

impl SortStrategy {
    /// Sort `items` ascending by `key` with this strategy
    pub fn sort<T, K, F>(&self, items: &mut Vec<T>, key: F)
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        match self {
            SortStrategy::Quick => quick_sort(items, key),
            SortStrategy::Merge => merge_sort(items, key),
            SortStrategy::Bubble => bubble_sort(items, key),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortStrategy::Quick => "quick",
            SortStrategy::Merge => "merge",
            SortStrategy::Bubble => "bubble",
        }
    }
}

impl FromStr for SortStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" => Ok(SortStrategy::Quick),
            "merge" => Ok(SortStrategy::Merge),
            "bubble" => Ok(SortStrategy::Bubble),
            other => Err(Error::config(format!(
                "Unknown sort strategy: {} (expected quick, merge or bubble)",
                other
            ))),
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// In-place quick sort, last element as pivot
///
/// Elements whose key is `<=` the pivot key move left of it. Equal keys may
/// end up in any relative order.
pub fn quick_sort<T, K, F>(items: &mut [T], key: F)
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    quick_sort_by(items, &key);
}

fn quick_sort_by<T, K, F>(mut items: &mut [T], key: &F)
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    // Recurse into the smaller partition and loop on the larger one so the
    // stack stays O(log n) even when the comparisons go quadratic.
    while items.len() > 1 {
        let pivot = partition(items, key);
        let (left, rest) = std::mem::take(&mut items).split_at_mut(pivot);
        let right = &mut rest[1..];
        if left.len() < right.len() {
            quick_sort_by(left, key);
            items = right;
        } else {
            quick_sort_by(right, key);
            items = left;
        }
    }
}

/// Lomuto partition around the last element; returns the pivot's final index
fn partition<T, K, F>(items: &mut [T], key: &F) -> usize
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let last = items.len() - 1;
    let pivot = key(&items[last]);
    let mut store = 0;
    for j in 0..last {
        if key(&items[j]) <= pivot {
            items.swap(store, j);
            store += 1;
        }
    }
    items.swap(store, last);
    store
}

/// Stable merge sort; O(n log n) regardless of input order
pub fn merge_sort<T, K, F>(items: &mut Vec<T>, key: F)
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let owned = std::mem::take(items);
    *items = merge_sorted(owned, &key);
}

fn merge_sorted<T, K, F>(mut items: Vec<T>, key: &F) -> Vec<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sorted(items, key);
    let right = merge_sorted(right, key);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => key(r) < key(l),
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        if take_right {
            merged.extend(right.next());
        } else {
            merged.extend(left.next());
        }
    }
    merged
}

/// Bubble sort with early exit once a pass makes no swaps
pub fn bubble_sort<T, K, F>(items: &mut [T], key: F)
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let n = items.len();
    for i in 0..n {
        let mut swapped = false;
        for j in 0..n - i - 1 {
            if key(&items[j]) > key(&items[j + 1]) {
                items.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
}
