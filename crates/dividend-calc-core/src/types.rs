use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Computed monetary values. Unbounded so long projections never overflow;
/// serialized as strings.
pub type Money = BigDecimal;

/// Rates expressed in percent units (5 = 5%), matching what investors type
/// into a calculator form.
pub type Percent = BigDecimal;

/// Share counts, fractional after reinvestment.
pub type Shares = BigDecimal;

/// A single field-level validation failure. Collected, never thrown, so a
/// caller can show every problem with a form at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "bigdecimal_exact_mul_div_dp10_half_up".to_string(),
        },
    }
}

/// Form fields arrive as strings from the browser, but JSON callers often
/// send plain numbers. Accept both and keep the raw text for validation.
pub fn deserialize_form_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct FormField {
        #[serde(deserialize_with = "deserialize_form_value")]
        value: String,
    }

    #[test]
    fn test_form_value_accepts_strings_and_numbers() {
        let s: FormField = serde_json::from_str(r#"{"value": "12.5"}"#).unwrap();
        assert_eq!(s.value, "12.5");
        let n: FormField = serde_json::from_str(r#"{"value": 12.5}"#).unwrap();
        assert_eq!(n.value, "12.5");
        let i: FormField = serde_json::from_str(r#"{"value": 40}"#).unwrap();
        assert_eq!(i.value, "40");
    }

    #[test]
    fn test_field_error_display_in_validation_error() {
        let err = crate::CalcError::Validation(vec![
            FieldError::new("share_price", "Share price must be greater than 0"),
            FieldError::new("tax_rate", "Tax rate must be between 0% and 100%"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: share_price: Share price must be greater than 0; \
             tax_rate: Tax rate must be between 0% and 100%"
        );
    }
}
