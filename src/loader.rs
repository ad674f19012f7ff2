//! JSON Lines loader feeding the ingestion queue
//!
//! Each non-blank line holds one flat JSON object whose keys are record field
//! names. Scalar values are stringified, `null` values are dropped and the
//! resulting mapping is handed to [`AnalysisPipeline::ingest`]. Lines that are
//! not flat objects are counted and skipped.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::logging::{LogMetrics, Timer};
use crate::pipeline::AnalysisPipeline;

/// Outcome of loading one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Records pushed onto the queue
    pub enqueued: usize,

    /// Lines that could not be turned into a record
    pub malformed: usize,
}

/// Read `path` and enqueue every record into `pipeline`
///
/// I/O failures abort the load; malformed lines do not.
pub fn load_jsonl(path: impl AsRef<Path>, pipeline: &mut AnalysisPipeline) -> Result<LoadSummary> {
    let path = path.as_ref();
    let timer = Timer::start("load_jsonl");
    let file = File::open(path)?;
    let summary = load_reader(BufReader::new(file), pipeline)?;
    let duration = timer.stop();

    info!(
        path = %path.display(),
        enqueued = summary.enqueued,
        malformed = summary.malformed,
        duration_ms = duration.as_millis(),
        "Input loaded"
    );
    LogMetrics::counter("records_enqueued", summary.enqueued as u64, &[]);
    if summary.malformed > 0 {
        LogMetrics::counter("lines_malformed", summary.malformed as u64, &[]);
    }
    Ok(summary)
}

/// Enqueue every record read from `reader`
pub fn load_reader<R: BufRead>(reader: R, pipeline: &mut AnalysisPipeline) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line) {
            Ok(record) => {
                pipeline.ingest(&record);
                summary.enqueued += 1;
            },
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping malformed line");
                summary.malformed += 1;
            },
        }
    }

    Ok(summary)
}

/// Turn one JSON line into a field mapping
pub fn parse_line(line: &str) -> Result<HashMap<String, String>> {
    match serde_json::from_str::<Value>(line)? {
        Value::Object(fields) => flatten_fields(fields),
        other => Err(Error::validation(format!(
            "Expected a JSON object, found {}",
            json_type(&other)
        ))),
    }
}

fn flatten_fields(fields: Map<String, Value>) -> Result<HashMap<String, String>> {
    let mut record = HashMap::with_capacity(fields.len());
    for (name, value) in fields {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            nested => {
                return Err(Error::validation(format!(
                    "Field '{}' holds a nested {}",
                    name,
                    json_type(&nested)
                )))
            },
        };
        record.insert(name, text);
    }
    Ok(record)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
