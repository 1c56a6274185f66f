use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::domain::DuplicateMatch;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate submission: record {} was already submitted by {}", .0.id, .0.user_email)]
    DuplicateSubmission(DuplicateMatch),

    #[error("Concurrent update detected for record {0}")]
    ConcurrentUpdate(i64),

    #[error("Write failed: {0}")]
    WriteFailure(String),

    #[error("Lookup failed: {0}")]
    LookupFailure(String),

    #[error("Diff input mismatch: original record {original} compared with record {updated}")]
    DiffInputMismatch { original: i64, updated: i64 },

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::ValidationError(format_validation_errors(&errors))
    }
}

/// Flattens validator output, nested structs included, into a sorted
/// `field: message` list.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_validation_messages(errors, &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect_validation_messages(errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    match &e.message {
                        Some(message) => messages.push(format!("{field}: {message}")),
                        None => messages.push(format!("{field}: {}", e.code)),
                    }
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_validation_messages(inner, messages),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_validation_messages(inner, messages);
                }
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
