use thiserror::Error;

use crate::types::FieldError;

#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid numeric input: '{value}' is not a number")]
    InvalidNumericInput { value: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError(e.to_string())
    }
}
