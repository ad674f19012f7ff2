//! Interaction data models
//!
//! A record travels through three shapes:
//! - [`RawInteraction`]: string fields exactly as received from the loader
//! - [`InteractionRecord`]: parsed and validated, not yet bound to entities
//! - [`Interaction`]: immutable, attached to a content and a user aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::TryFrom;
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

use super::entity::{ContentId, Platform, UserId};
use super::error::{ValidationError, ValidationErrorKind, ValidationErrors, ValidationResult};
use super::validation::{
    clamp_duration, normalize_platform_name, parse_duration_field, parse_integer_field,
    parse_kind_field, parse_timestamp_field, validate_integer, validate_interaction_kind,
};

/// Interaction kinds supported by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Playback started
    ViewStart,
    Like,
    Share,
    Comment,
}

impl InteractionKind {
    /// All kinds, in declaration order
    pub const ALL: [InteractionKind; 4] = [
        InteractionKind::ViewStart,
        InteractionKind::Like,
        InteractionKind::Share,
        InteractionKind::Comment,
    ];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::ViewStart => "view_start",
            InteractionKind::Like => "like",
            InteractionKind::Share => "share",
            InteractionKind::Comment => "comment",
        }
    }

    /// Likes, shares and comments count as engagement
    pub fn is_engagement(&self) -> bool {
        !matches!(self, InteractionKind::ViewStart)
    }
}

impl FromStr for InteractionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "view_start" => Ok(InteractionKind::ViewStart),
            "like" => Ok(InteractionKind::Like),
            "share" => Ok(InteractionKind::Share),
            "comment" => Ok(InteractionKind::Comment),
            other => Err(ValidationError::with_context(
                ValidationErrorKind::InvalidInteractionKind,
                "tipo_interacao",
                format!("Unknown interaction kind: {}", other),
            )),
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw interaction as received from the loader
///
/// Field names on the wire follow the source export (`id_conteudo`, ...).
/// Every value is kept as text until validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct RawInteraction {
    /// Content identifier
    #[serde(rename = "id_conteudo")]
    #[validate(length(min = 1), custom(function = "validate_integer"))]
    pub content_id: String,

    /// Content display name
    #[serde(rename = "nome_conteudo", default)]
    pub content_name: String,

    /// User identifier
    #[serde(rename = "id_usuario")]
    #[validate(length(min = 1), custom(function = "validate_integer"))]
    pub user_id: String,

    /// When the interaction happened (ISO 8601)
    #[serde(rename = "timestamp_interacao")]
    #[validate(length(min = 1))]
    pub timestamp: String,

    /// Platform name
    #[serde(rename = "nome_plataforma")]
    #[validate(length(min = 1))]
    pub platform_name: String,

    /// Interaction kind (view_start, like, share, comment)
    #[serde(rename = "tipo_interacao")]
    #[validate(custom(function = "validate_interaction_kind"))]
    pub kind: String,

    /// Seconds watched; blank means zero
    #[serde(default)]
    pub watch_duration_seconds: String,

    /// Comment body; only meaningful for comments
    #[serde(default)]
    pub comment_text: String,
}

impl RawInteraction {
    /// Build a raw interaction from a field-name to value mapping
    ///
    /// Absent fields become empty strings, so missing required fields surface
    /// as validation errors rather than lookup failures.
    pub fn from_record(record: &HashMap<String, String>) -> Self {
        let field = |name: &str| record.get(name).cloned().unwrap_or_default();
        Self {
            content_id: field("id_conteudo"),
            content_name: field("nome_conteudo"),
            user_id: field("id_usuario"),
            timestamp: field("timestamp_interacao"),
            platform_name: field("nome_plataforma"),
            kind: field("tipo_interacao"),
            watch_duration_seconds: field("watch_duration_seconds"),
            comment_text: field("comment_text"),
        }
    }

    /// Validate all fields, collecting every problem instead of stopping at the first
    pub fn validate_fields(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        // Presence checks declared on the struct
        if let Err(derived) = self.validate() {
            let mut missing: Vec<String> = derived
                .field_errors()
                .into_iter()
                .filter(|(_, errs)| errs.iter().any(|e| e.code == "length"))
                .map(|(field, _)| field.to_string())
                .collect();
            missing.sort();
            for field in missing {
                errors.add(ValidationError::new(
                    ValidationErrorKind::RequiredField,
                    wire_name(&field),
                ));
            }
        }

        if !self.content_id.trim().is_empty() {
            if let Err(e) = parse_integer_field(&self.content_id, "id_conteudo") {
                errors.add(e);
            }
        }
        if !self.user_id.trim().is_empty() {
            if let Err(e) = parse_integer_field(&self.user_id, "id_usuario") {
                errors.add(e);
            }
        }
        if !self.timestamp.trim().is_empty() {
            if let Err(e) = parse_timestamp_field(&self.timestamp, "timestamp_interacao") {
                errors.add(e);
            }
        }
        if !self.platform_name.is_empty() {
            if let Err(e) = normalize_platform_name(&self.platform_name) {
                errors.add(e);
            }
        }
        match parse_kind_field(&self.kind, "tipo_interacao") {
            Ok(InteractionKind::Comment) if self.comment_text.trim().is_empty() => {
                errors.add(ValidationError::new(
                    ValidationErrorKind::MissingComment,
                    "comment_text",
                ));
            },
            Ok(_) => {},
            Err(e) => errors.add(e),
        }
        if let Err(e) = parse_duration_field(&self.watch_duration_seconds, "watch_duration_seconds")
        {
            errors.add(e);
        }

        errors.into_result(())
    }
}

/// Map a struct field name back to the record field name
fn wire_name(field: &str) -> &str {
    match field {
        "content_id" => "id_conteudo",
        "user_id" => "id_usuario",
        "timestamp" => "timestamp_interacao",
        "platform_name" => "nome_plataforma",
        "kind" => "tipo_interacao",
        other => other,
    }
}

/// Parsed and validated record, not yet bound to any entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub content_id: ContentId,
    pub content_name: String,
    pub user_id: UserId,
    pub timestamp: DateTime<Utc>,
    pub platform_name: String,
    pub kind: InteractionKind,
    pub watch_duration_seconds: u64,
    pub comment_text: String,
}

/// Transform a raw interaction into a validated record
impl TryFrom<RawInteraction> for InteractionRecord {
    type Error = ValidationError;

    fn try_from(raw: RawInteraction) -> Result<Self, Self::Error> {
        // Report the most specific problem first; a bad kind wins over the rest
        let kind = parse_kind_field(&raw.kind, "tipo_interacao")?;
        let content_id = parse_integer_field(&raw.content_id, "id_conteudo")?;
        let user_id = parse_integer_field(&raw.user_id, "id_usuario")?;
        let timestamp = parse_timestamp_field(&raw.timestamp, "timestamp_interacao")?;
        let platform_name = normalize_platform_name(&raw.platform_name)?;
        let watch_duration_seconds =
            parse_duration_field(&raw.watch_duration_seconds, "watch_duration_seconds")?;
        let comment_text = normalize_comment(kind, &raw.comment_text)?;

        Ok(InteractionRecord {
            content_id,
            content_name: raw.content_name.trim().to_string(),
            user_id,
            timestamp,
            platform_name,
            kind,
            watch_duration_seconds,
            comment_text,
        })
    }
}

/// Trim comment text; required for comments, discarded for other kinds
fn normalize_comment(kind: InteractionKind, text: &str) -> ValidationResult<String> {
    let trimmed = text.trim();
    match kind {
        InteractionKind::Comment if trimmed.is_empty() => Err(ValidationError::new(
            ValidationErrorKind::MissingComment,
            "comment_text",
        )),
        InteractionKind::Comment => Ok(trimmed.to_string()),
        _ => Ok(String::new()),
    }
}

/// A single interaction of a user with a content item on a platform
///
/// Immutable once constructed. The same instance is shared by the content
/// and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    content_id: ContentId,
    user_id: UserId,
    platform: Arc<Platform>,
    timestamp: DateTime<Utc>,
    kind: InteractionKind,
    watch_duration_seconds: u64,
    comment_text: String,
}

impl Interaction {
    /// Create an interaction
    ///
    /// Negative durations clamp to zero and comment text is trimmed. A
    /// comment without text is rejected; other kinds never carry text.
    pub fn new(
        content_id: ContentId,
        user_id: UserId,
        platform: Arc<Platform>,
        timestamp: DateTime<Utc>,
        kind: InteractionKind,
        watch_duration_seconds: i64,
        comment_text: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            content_id,
            user_id,
            platform,
            timestamp,
            kind,
            watch_duration_seconds: clamp_duration(watch_duration_seconds),
            comment_text: normalize_comment(kind, comment_text)?,
        })
    }

    /// Bind a validated record to its resolved platform
    pub fn from_record(record: InteractionRecord, platform: Arc<Platform>) -> Self {
        Self {
            content_id: record.content_id,
            user_id: record.user_id,
            platform,
            timestamp: record.timestamp,
            kind: record.kind,
            watch_duration_seconds: record.watch_duration_seconds,
            comment_text: record.comment_text,
        }
    }

    pub fn content_id(&self) -> ContentId {
        self.content_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn platform(&self) -> &Arc<Platform> {
        &self.platform
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn kind(&self) -> InteractionKind {
        self.kind
    }

    pub fn watch_duration_seconds(&self) -> u64 {
        self.watch_duration_seconds
    }

    pub fn comment_text(&self) -> &str {
        &self.comment_text
    }

    /// Check if this is a like, share or comment
    pub fn is_engagement(&self) -> bool {
        self.kind.is_engagement()
    }

    /// Check if this is a comment with text
    pub fn is_comment(&self) -> bool {
        self.kind == InteractionKind::Comment && !self.comment_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordBuilder;

    fn platform() -> Arc<Platform> {
        Arc::new(Platform::new(1, "YouTube").unwrap())
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            "view_start".parse::<InteractionKind>().unwrap(),
            InteractionKind::ViewStart
        );
        assert_eq!(" like ".parse::<InteractionKind>().unwrap(), InteractionKind::Like);
        let err = "invalid".parse::<InteractionKind>().unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidInteractionKind);
        // Matching is exact
        assert!("LIKE".parse::<InteractionKind>().is_err());
    }

    #[test]
    fn test_kind_display_and_engagement() {
        for kind in InteractionKind::ALL {
            assert_eq!(kind.as_str().parse::<InteractionKind>().unwrap(), kind);
        }
        assert!(!InteractionKind::ViewStart.is_engagement());
        assert!(InteractionKind::Share.is_engagement());
        assert_eq!(InteractionKind::Comment.to_string(), "comment");
    }

    #[test]
    fn test_new_clamps_negative_duration() {
        let interaction = Interaction::new(
            1,
            10,
            platform(),
            Utc::now(),
            InteractionKind::ViewStart,
            -5,
            "",
        )
        .unwrap();
        assert_eq!(interaction.watch_duration_seconds(), 0);
    }

    #[test]
    fn test_new_trims_comment_and_requires_text() {
        let interaction = Interaction::new(
            1,
            10,
            platform(),
            Utc::now(),
            InteractionKind::Comment,
            0,
            "  great video  ",
        )
        .unwrap();
        assert_eq!(interaction.comment_text(), "great video");
        assert!(interaction.is_comment());
        assert!(interaction.is_engagement());

        let err = Interaction::new(1, 10, platform(), Utc::now(), InteractionKind::Comment, 0, "  ")
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingComment);
    }

    #[test]
    fn test_new_discards_text_on_non_comment() {
        let interaction =
            Interaction::new(1, 10, platform(), Utc::now(), InteractionKind::Like, 3, "stray")
                .unwrap();
        assert_eq!(interaction.comment_text(), "");
        assert!(!interaction.is_comment());
    }

    #[test]
    fn test_raw_from_record_defaults() {
        let mut record = RecordBuilder::new(1, 10).build();
        record.remove("comment_text");
        record.remove("watch_duration_seconds");

        let raw = RawInteraction::from_record(&record);
        assert_eq!(raw.comment_text, "");
        assert_eq!(raw.watch_duration_seconds, "");
        assert!(raw.validate_fields().is_ok());
    }

    #[test]
    fn test_validate_fields_collects_all_errors() {
        let raw = RawInteraction {
            content_id: "abc".to_string(),
            content_name: "A".to_string(),
            user_id: String::new(),
            timestamp: "not-a-date".to_string(),
            platform_name: "   ".to_string(),
            kind: "bogus".to_string(),
            watch_duration_seconds: "1.5".to_string(),
            comment_text: String::new(),
        };

        let errors = raw.validate_fields().unwrap_err();
        assert!(errors.contains_kind(&ValidationErrorKind::InvalidInteger));
        assert!(errors.contains_kind(&ValidationErrorKind::RequiredField));
        assert!(errors.contains_kind(&ValidationErrorKind::InvalidTimestamp));
        assert!(errors.contains_kind(&ValidationErrorKind::EmptyPlatformName));
        assert!(errors.contains_kind(&ValidationErrorKind::InvalidInteractionKind));
        assert!(errors
            .errors()
            .iter()
            .any(|e| e.field == "id_usuario" && e.kind == ValidationErrorKind::RequiredField));
    }

    #[test]
    fn test_record_try_from() {
        let raw = RawInteraction::from_record(
            &RecordBuilder::new(7, 70)
                .kind("comment")
                .comment("  nice  ")
                .watch("-20")
                .platform(" TikTok ")
                .build(),
        );
        let record = InteractionRecord::try_from(raw).unwrap();
        assert_eq!(record.content_id, 7);
        assert_eq!(record.user_id, 70);
        assert_eq!(record.kind, InteractionKind::Comment);
        assert_eq!(record.watch_duration_seconds, 0);
        assert_eq!(record.comment_text, "nice");
        assert_eq!(record.platform_name, "TikTok");
    }

    #[test]
    fn test_record_try_from_invalid_kind() {
        let raw = RawInteraction::from_record(&RecordBuilder::new(1, 1).kind("invalid").build());
        let err = InteractionRecord::try_from(raw).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidInteractionKind);
    }

    #[test]
    fn test_raw_json_field_names() {
        let raw = RawInteraction::from_record(&RecordBuilder::new(3, 4).build());
        let json = serde_json::to_string(&raw).unwrap();
        assert!(json.contains("\"id_conteudo\":\"3\""));
        assert!(json.contains("\"tipo_interacao\":\"view_start\""));

        let back: RawInteraction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, raw);
    }
}
