//! Aggregate entities: platforms, content items and users
//!
//! Content and users own append-only interaction lists. Metrics are always
//! derived on demand from those lists; nothing is cached.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::error::ValidationError;
use super::interaction::{Interaction, InteractionKind};
use super::validation::normalize_platform_name;

/// Content identifier (store key)
pub type ContentId = i64;

/// User identifier (store key)
pub type UserId = i64;

/// Platform identifier assigned by the registry
pub type PlatformId = u32;

/// Distribution platform an interaction happened on
///
/// Identity is the name: two platforms with the same name are equal, hash
/// equally and sort together regardless of id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    id: PlatformId,
    name: String,
}

impl Platform {
    /// Create a platform; the name is trimmed and must not be blank
    pub fn new(id: PlatformId, name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: normalize_platform_name(name)?,
        })
    }

    pub fn id(&self) -> PlatformId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Platform {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Platform {}

impl Hash for Platform {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Platform {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Platform {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Like/share/comment tallies for one content item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounts {
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
}

impl EngagementCounts {
    /// Tally engagement over a sequence of interactions
    pub fn tally<'a>(interactions: impl IntoIterator<Item = &'a Interaction>) -> Self {
        let mut counts = Self::default();
        for interaction in interactions {
            match interaction.kind() {
                InteractionKind::Like => counts.likes += 1,
                InteractionKind::Share => counts.shares += 1,
                InteractionKind::Comment => counts.comments += 1,
                InteractionKind::ViewStart => {},
            }
        }
        counts
    }

    /// Sum of likes, shares and comments
    pub fn total(&self) -> u64 {
        self.likes + self.shares + self.comments
    }
}

/// A content item and every interaction recorded against it
#[derive(Debug, Clone)]
pub struct Content {
    id: ContentId,
    name: String,
    interactions: Vec<Arc<Interaction>>,
}

impl Content {
    pub fn new(id: ContentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            interactions: Vec::new(),
        }
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interactions(&self) -> &[Arc<Interaction>] {
        &self.interactions
    }

    /// Append an interaction, O(1)
    pub fn add_interaction(&mut self, interaction: Arc<Interaction>) {
        self.interactions.push(interaction);
    }

    /// Sum of watched seconds across all interactions, saturating at `u64::MAX`
    pub fn total_watch_time(&self) -> u64 {
        sum_watch_time(self.interactions.iter().map(|i| &**i))
    }

    pub fn count_by_kind(&self, kind: InteractionKind) -> usize {
        self.interactions.iter().filter(|i| i.kind() == kind).count()
    }

    pub fn engagement(&self) -> EngagementCounts {
        EngagementCounts::tally(self.interactions.iter().map(|i| &**i))
    }

    /// Comment texts in arrival order
    pub fn comments(&self) -> Vec<&str> {
        self.interactions
            .iter()
            .filter(|i| i.is_comment())
            .map(|i| i.comment_text())
            .collect()
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {})", self.name, self.id)
    }
}

/// A user and every interaction they performed
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    interactions: Vec<Arc<Interaction>>,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            interactions: Vec::new(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn interactions(&self) -> &[Arc<Interaction>] {
        &self.interactions
    }

    /// Append an interaction, O(1)
    pub fn add_interaction(&mut self, interaction: Arc<Interaction>) {
        self.interactions.push(interaction);
    }

    pub fn interactions_by_kind(&self, kind: InteractionKind) -> Vec<&Interaction> {
        self.interactions
            .iter()
            .filter(|i| i.kind() == kind)
            .map(|i| &**i)
            .collect()
    }

    /// Distinct content ids this user interacted with
    pub fn unique_contents(&self) -> BTreeSet<ContentId> {
        self.interactions.iter().map(|i| i.content_id()).collect()
    }

    pub fn total_watch_time(&self) -> u64 {
        sum_watch_time(self.interactions.iter().map(|i| &**i))
    }

    pub fn watch_time_on_platform(&self, platform: &Platform) -> u64 {
        sum_watch_time(
            self.interactions
                .iter()
                .filter(|i| **i.platform() == *platform)
                .map(|i| &**i),
        )
    }

    /// Platforms this user interacts on most, by interaction count
    ///
    /// Ties are broken by platform name.
    pub fn most_frequent_platforms(&self, top_n: usize) -> Vec<Arc<Platform>> {
        let mut counts: HashMap<&Arc<Platform>, usize> = HashMap::new();
        for interaction in &self.interactions {
            *counts.entry(interaction.platform()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&Arc<Platform>, usize)> = counts.into_iter().collect();
        ranked.sort_by(|(pa, ca), (pb, cb)| cb.cmp(ca).then_with(|| pa.cmp(pb)));
        ranked
            .into_iter()
            .take(top_n)
            .map(|(platform, _)| Arc::clone(platform))
            .collect()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user {}", self.id)
    }
}

/// Total watched seconds; a single duration may reach `i64::MAX`, so the sum saturates
pub fn sum_watch_time<'a>(interactions: impl IntoIterator<Item = &'a Interaction>) -> u64 {
    interactions
        .into_iter()
        .map(Interaction::watch_duration_seconds)
        .fold(0u64, u64::saturating_add)
}
