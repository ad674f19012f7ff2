//! Data models for the engagement engine
//!
//! This module contains the domain models used throughout the pipeline,
//! including raw and validated interaction records, the content/user
//! aggregates and the validation logic that guards them.

pub mod entity;
pub mod error;
pub mod interaction;
pub mod validation;

// Re-export commonly used types
pub use entity::{Content, ContentId, EngagementCounts, Platform, PlatformId, User, UserId};
pub use error::{ValidationError, ValidationErrorKind, ValidationErrors, ValidationResult};
pub use interaction::{Interaction, InteractionKind, InteractionRecord, RawInteraction};
pub use validation::{parse_duration_field, parse_integer_field, parse_timestamp_field};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        // Ensure all key types are accessible
        let _raw = RawInteraction::default();
        let _kind = InteractionKind::Share;
        let _content = Content::new(1, "A");
        let _user = User::new(1);
        let _error = ValidationError::new(ValidationErrorKind::RequiredField, "id_conteudo");
        let _counts = EngagementCounts::default();
    }
}
