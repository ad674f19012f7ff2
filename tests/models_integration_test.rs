//! Integration tests for the engagement data models
//!
//! These tests verify the end-to-end behavior of record validation,
//! transformation, and serialization.

use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;

use engagement_engine::models::{InteractionRecord, ValidationErrors};
use engagement_engine::{
    Content, Interaction, InteractionKind, Platform, RawInteraction, User, ValidationErrorKind,
};

/// Helper to create a valid raw record JSON
fn valid_record_json() -> serde_json::Value {
    json!({
        "id_conteudo": "1",
        "nome_conteudo": "Launch trailer",
        "id_usuario": "10",
        "timestamp_interacao": "2024-01-15T10:30:00Z",
        "nome_plataforma": "YouTube",
        "tipo_interacao": "view_start",
        "watch_duration_seconds": "95",
        "comment_text": ""
    })
}

fn youtube() -> Arc<Platform> {
    Arc::new(Platform::new(1, "YouTube").expect("valid platform"))
}

#[test]
fn test_raw_record_deserialization_valid() {
    let raw: RawInteraction =
        serde_json::from_value(valid_record_json()).expect("Should deserialize valid record");

    assert_eq!(raw.content_id, "1");
    assert_eq!(raw.kind, "view_start");
    assert!(raw.validate_fields().is_ok());
}

#[test]
fn test_raw_record_deserialization_missing_optional_fields() {
    let json = json!({
        "id_conteudo": "1",
        "id_usuario": "10",
        "timestamp_interacao": "2024-01-15",
        "nome_plataforma": "YouTube",
        "tipo_interacao": "share"
    });

    let raw: RawInteraction =
        serde_json::from_value(json).expect("Should deserialize with missing optional fields");
    assert_eq!(raw.comment_text, "");
    assert_eq!(raw.watch_duration_seconds, "");
    assert_eq!(raw.content_name, "");

    let record = InteractionRecord::try_from(raw).expect("Should validate");
    assert_eq!(record.watch_duration_seconds, 0);
    assert_eq!(
        record.timestamp,
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_transformation_to_record() {
    let raw: RawInteraction = serde_json::from_value(valid_record_json()).unwrap();
    let record = InteractionRecord::try_from(raw).expect("Should transform");

    assert_eq!(record.content_id, 1);
    assert_eq!(record.user_id, 10);
    assert_eq!(record.kind, InteractionKind::ViewStart);
    assert_eq!(record.watch_duration_seconds, 95);
    assert_eq!(
        record.timestamp,
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    );
}

#[test]
fn test_invalid_kind_fails_validation() {
    let mut json = valid_record_json();
    json["tipo_interacao"] = json!("invalid");
    let raw: RawInteraction = serde_json::from_value(json).unwrap();

    let err = InteractionRecord::try_from(raw).unwrap_err();
    assert_eq!(err.kind, ValidationErrorKind::InvalidInteractionKind);
    assert_eq!(err.field, "tipo_interacao");
}

#[test]
fn test_kind_matching_is_exact() {
    assert_eq!(" like ".parse::<InteractionKind>().unwrap(), InteractionKind::Like);
    assert!("LIKE".parse::<InteractionKind>().is_err());
    assert!("view-start".parse::<InteractionKind>().is_err());
}

#[test]
fn test_negative_duration_clamps_to_zero() {
    let interaction = Interaction::new(
        1,
        10,
        youtube(),
        Utc::now(),
        InteractionKind::ViewStart,
        -5,
        "",
    )
    .expect("valid interaction");
    assert_eq!(interaction.watch_duration_seconds(), 0);
}

#[test]
fn test_non_integer_fields_are_rejected() {
    let mut json = valid_record_json();
    json["id_usuario"] = json!("ten");
    json["watch_duration_seconds"] = json!("1.5");
    let raw: RawInteraction = serde_json::from_value(json).unwrap();

    let errors: ValidationErrors = raw.validate_fields().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .errors()
        .iter()
        .all(|e| e.kind == ValidationErrorKind::InvalidInteger));
}

#[test]
fn test_platform_identity_by_name() {
    let a = Platform::new(1, "TikTok").unwrap();
    let b = Platform::new(9, "TikTok").unwrap();
    let c = Platform::new(1, "YouTube").unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(Platform::new(2, "   ").is_err());
}

#[test]
fn test_aggregates_share_interactions() {
    let mut content = Content::new(1, "Launch trailer");
    let mut user = User::new(10);

    let kinds = [
        (InteractionKind::ViewStart, 90, ""),
        (InteractionKind::Like, 0, ""),
        (InteractionKind::Comment, 0, "  loved it "),
    ];
    for (kind, seconds, text) in kinds {
        let interaction = Arc::new(
            Interaction::new(1, 10, youtube(), Utc::now(), kind, seconds, text).unwrap(),
        );
        content.add_interaction(Arc::clone(&interaction));
        user.add_interaction(interaction);
    }

    assert_eq!(content.total_watch_time(), 90);
    assert_eq!(content.count_by_kind(InteractionKind::Comment), 1);
    assert_eq!(content.engagement().total(), 2);
    assert_eq!(content.comments(), vec!["loved it"]);
    assert_eq!(user.total_watch_time(), 90);
    assert_eq!(user.interactions_by_kind(InteractionKind::Like).len(), 1);
    assert_eq!(user.watch_time_on_platform(&youtube()), 90);
}

#[test]
fn test_record_serialization_uses_source_field_names() {
    let raw: RawInteraction = serde_json::from_value(valid_record_json()).unwrap();
    let value = serde_json::to_value(&raw).unwrap();

    assert_eq!(value, valid_record_json());
}
