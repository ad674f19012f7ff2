//! Test utilities for the engagement engine
//!
//! Builders for the field mappings consumed by
//! [`AnalysisPipeline::ingest`](crate::pipeline::AnalysisPipeline::ingest).

use std::collections::HashMap;

use crate::models::{ContentId, UserId};

/// Builder for one raw interaction record
///
/// Defaults describe a valid `view_start` of 60 seconds on YouTube.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    fields: HashMap<String, String>,
}

impl RecordBuilder {
    pub fn new(content_id: ContentId, user_id: UserId) -> Self {
        let mut builder = Self {
            fields: HashMap::new(),
        };
        builder
            .set("id_conteudo", content_id.to_string())
            .set("nome_conteudo", format!("Content {}", content_id))
            .set("id_usuario", user_id.to_string())
            .set("timestamp_interacao", "2024-01-15T10:30:00")
            .set("nome_plataforma", "YouTube")
            .set("tipo_interacao", "view_start")
            .set("watch_duration_seconds", "60")
            .set("comment_text", "");
        builder
    }

    fn set(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Set an arbitrary field, including unknown ones
    pub fn field(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn name(self, name: &str) -> Self {
        self.field("nome_conteudo", name)
    }

    pub fn kind(self, kind: &str) -> Self {
        self.field("tipo_interacao", kind)
    }

    pub fn watch(self, seconds: &str) -> Self {
        self.field("watch_duration_seconds", seconds)
    }

    pub fn comment(self, text: &str) -> Self {
        self.field("comment_text", text)
    }

    pub fn platform(self, name: &str) -> Self {
        self.field("nome_plataforma", name)
    }

    pub fn timestamp(self, timestamp: &str) -> Self {
        self.field("timestamp_interacao", timestamp)
    }

    /// Remove a field entirely
    pub fn without(mut self, field: &str) -> Self {
        self.fields.remove(field);
        self
    }

    pub fn build(self) -> HashMap<String, String> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InteractionRecord, RawInteraction};

    #[test]
    fn test_default_record_is_valid() {
        let raw = RawInteraction::from_record(&RecordBuilder::new(1, 2).build());
        assert!(raw.validate_fields().is_ok());
        assert!(InteractionRecord::try_from(raw).is_ok());
    }

    #[test]
    fn test_without_removes_field() {
        let record = RecordBuilder::new(1, 2).without("id_usuario").build();
        assert!(!record.contains_key("id_usuario"));
        assert_eq!(record["nome_conteudo"], "Content 1");
    }
}
