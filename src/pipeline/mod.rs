//! Analysis pipeline for interaction records
//!
//! This module provides:
//! - The drain-and-attach cycle turning queued records into aggregates
//! - A name-keyed platform registry
//! - Per-record and per-batch processing outcomes

mod platforms;
mod processor;

pub use platforms::PlatformRegistry;
pub use processor::AnalysisPipeline;

use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use crate::models::ValidationErrors;

/// Outcome of processing a single queued record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingResult {
    /// Record was validated and attached to its content and user
    Attached,

    /// Record failed validation and was dropped; holds every problem found
    Skipped(ValidationErrors),
}

impl ProcessingResult {
    pub fn is_attached(&self) -> bool {
        matches!(self, ProcessingResult::Attached)
    }
}

/// Summary of one `process_queue` run
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    /// Identifier correlating the log lines of this run
    pub batch_id: Uuid,

    /// Records attached to entities
    pub processed: usize,

    /// Records dropped by validation
    pub skipped: usize,

    /// Wall time spent draining the queue
    pub duration: Duration,
}

impl ProcessingReport {
    /// Total records taken from the queue
    pub fn drained(&self) -> usize {
        self.processed + self.skipped
    }
}
