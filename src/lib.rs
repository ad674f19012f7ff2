//! Engagement Engine Library
//!
//! Ingests social-media interaction records, aggregates them per content
//! item and per user in ordered AVL stores and produces ranked engagement
//! reports. The library backs the `engagement-report` binary and the
//! integration tests.

pub mod config;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod store;
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};

// Re-export model types
pub use models::{
    Content, Interaction, InteractionKind, Platform, RawInteraction, User, ValidationError,
    ValidationErrorKind,
};

// Re-export the engine itself
pub use loader::{load_jsonl, LoadSummary};
pub use pipeline::{AnalysisPipeline, ProcessingReport};
pub use ranking::SortStrategy;
pub use store::{AvlStore, IngestionQueue, StoreError};
