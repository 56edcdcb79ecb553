//! Error types for the record store

use super::models::EntityKind;
use thiserror::Error;

/// Everything a store operation can fail with
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced natural key does not resolve to a row
    #[error("{entity} '{key}' not found")]
    NotFound { entity: EntityKind, key: String },

    /// A natural key that must be unique is already taken
    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: EntityKind, key: String },

    /// A field failed a type, range or enum check
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Clearing the store hit a constraint it could not satisfy
    #[error("integrity error: {message}")]
    Integrity { message: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn not_found(entity: EntityKind, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the caller could succeed by correcting its input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound { .. }
                | StoreError::DuplicateKey { .. }
                | StoreError::Validation { .. }
        )
    }
}

/// An unrecognized value for one of the closed enums
#[derive(Debug, Clone, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl From<ParseEnumError> for StoreError {
    fn from(err: ParseEnumError) -> Self {
        StoreError::validation(err.kind, format!("unrecognized value '{}'", err.value))
    }
}

/// Translate a UNIQUE violation into `DuplicateKey`.
///
/// `columns` pairs a qualified column name (`table.column`) with the value that
/// was being inserted into it. Errors that are not unique violations on one of
/// those columns pass through as `Database`.
pub(crate) fn map_unique_violation(
    err: rusqlite::Error,
    entity: EntityKind,
    columns: &[(&str, &str)],
) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ref failure, Some(ref message)) = err {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            let failed = message
                .strip_prefix("UNIQUE constraint failed: ")
                .unwrap_or(message);
            for (column, value) in columns {
                if failed.split(", ").any(|c| c == *column) {
                    return StoreError::DuplicateKey {
                        entity,
                        key: value.to_string(),
                    };
                }
            }
        }
    }
    StoreError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_entity_and_key() {
        let err = StoreError::not_found(EntityKind::Airport, "ZZZ");
        assert_eq!(err.to_string(), "airport 'ZZZ' not found");

        let err = StoreError::DuplicateKey {
            entity: EntityKind::Passenger,
            key: "US123456".into(),
        };
        assert_eq!(err.to_string(), "passenger 'US123456' already exists");
    }

    #[test]
    fn test_input_errors() {
        assert!(StoreError::validation("price", "must not be negative").is_input_error());
        assert!(
            !StoreError::Integrity {
                message: "bad".into()
            }
            .is_input_error()
        );
    }

    #[test]
    fn test_parse_enum_error_becomes_validation() {
        let err: StoreError = ParseEnumError {
            kind: "role",
            value: "captain".into(),
        }
        .into();

        match err {
            StoreError::Validation { field, reason } => {
                assert_eq!(field, "role");
                assert!(reason.contains("captain"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
