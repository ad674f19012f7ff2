//! Storage structures for the engagement engine
//!
//! This module provides the in-memory structures the analysis pipeline is
//! built on:
//! - An ordered, self-balancing (AVL) key/entity store
//! - A strict FIFO ingestion queue

pub mod queue;
pub mod tree;

pub use queue::IngestionQueue;
pub use tree::{AvlStore, Iter};

use thiserror::Error;

use crate::models::{Content, ContentId, User, UserId};

/// Ordered store holding content entities keyed by content id
pub type ContentStore = AvlStore<ContentId, Content>;

/// Ordered store holding user entities keyed by user id
pub type UserStore = AvlStore<UserId, User>;

/// Store-specific error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert on a key that is already present
    #[error("Duplicate key: {key}")]
    DuplicateKey { key: String },

    /// A structural invariant does not hold
    #[error("Store corrupted: {0}")]
    Corrupted(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
