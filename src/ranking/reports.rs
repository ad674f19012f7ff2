//! Ranked engagement reports
//!
//! Every report traverses a store, derives a metric per entity, sorts the
//! rows ascending by that metric, reverses them for descending order and
//! optionally truncates to the top N.

use std::collections::HashMap;
use std::sync::Arc;

use super::sort::SortStrategy;
use crate::models::{Content, EngagementCounts, Platform, User};
use crate::store::{ContentStore, UserStore};

/// An entity paired with its total watched seconds
#[derive(Debug)]
pub struct WatchTimeEntry<'a, E> {
    pub entity: &'a E,
    pub total_seconds: u64,
}

/// A content item with its like/share/comment tallies
#[derive(Debug)]
pub struct EngagementEntry<'a> {
    pub content: &'a Content,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub total: u64,
}

/// Activity aggregated over every interaction on one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEngagementEntry {
    pub platform: Arc<Platform>,
    pub interactions: u64,
    pub engagement: u64,
    pub total_seconds: u64,
}

/// Sort ascending, reverse, truncate
pub fn rank_descending<T, K, F>(
    mut rows: Vec<T>,
    strategy: SortStrategy,
    top_n: Option<usize>,
    key: F,
) -> Vec<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    strategy.sort(&mut rows, key);
    rows.reverse();
    if let Some(n) = top_n {
        rows.truncate(n);
    }
    rows
}

pub fn users_by_watch_time(
    users: &UserStore,
    strategy: SortStrategy,
    top_n: Option<usize>,
) -> Vec<WatchTimeEntry<'_, User>> {
    let rows: Vec<_> = users
        .values()
        .map(|user| WatchTimeEntry {
            entity: user,
            total_seconds: user.total_watch_time(),
        })
        .collect();
    rank_descending(rows, strategy, top_n, |row: &WatchTimeEntry<'_, User>| {
        row.total_seconds
    })
}

pub fn content_by_watch_time(
    contents: &ContentStore,
    strategy: SortStrategy,
    top_n: Option<usize>,
) -> Vec<WatchTimeEntry<'_, Content>> {
    let rows: Vec<_> = contents
        .values()
        .map(|content| WatchTimeEntry {
            entity: content,
            total_seconds: content.total_watch_time(),
        })
        .collect();
    rank_descending(rows, strategy, top_n, |row: &WatchTimeEntry<'_, Content>| {
        row.total_seconds
    })
}

pub fn content_by_engagement(
    contents: &ContentStore,
    strategy: SortStrategy,
    top_n: Option<usize>,
) -> Vec<EngagementEntry<'_>> {
    let rows: Vec<_> = contents
        .values()
        .map(|content| {
            let counts = content.engagement();
            EngagementEntry {
                content,
                likes: counts.likes,
                shares: counts.shares,
                comments: counts.comments,
                total: counts.total(),
            }
        })
        .collect();
    rank_descending(rows, strategy, top_n, |row: &EngagementEntry<'_>| row.total)
}

/// Rank platforms by engagement count over all content
///
/// Rows are collected in platform-name order before sorting.
pub fn platforms_by_engagement(
    contents: &ContentStore,
    strategy: SortStrategy,
    top_n: Option<usize>,
) -> Vec<PlatformEngagementEntry> {
    let mut by_platform: HashMap<Arc<Platform>, PlatformEngagementEntry> = HashMap::new();
    for interaction in contents.values().flat_map(|content| content.interactions()) {
        let entry = by_platform
            .entry(Arc::clone(interaction.platform()))
            .or_insert_with(|| PlatformEngagementEntry {
                platform: Arc::clone(interaction.platform()),
                interactions: 0,
                engagement: 0,
                total_seconds: 0,
            });
        entry.interactions += 1;
        entry.engagement += EngagementCounts::tally([&**interaction]).total();
        entry.total_seconds = entry
            .total_seconds
            .saturating_add(interaction.watch_duration_seconds());
    }

    let mut rows: Vec<PlatformEngagementEntry> = by_platform.into_values().collect();
    rows.sort_by(|a, b| a.platform.cmp(&b.platform));
    rank_descending(rows, strategy, top_n, |row: &PlatformEngagementEntry| {
        row.engagement
    })
}
