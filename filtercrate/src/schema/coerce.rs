//! Request value coercion.

use uuid::Uuid;

use crate::core::value::{FilterValue, parse_bool, parse_date, parse_datetime, parse_time};
use crate::metadata::FieldType;
use crate::schema::parameter::ValueType;

/// Coerce raw text to a field's semantic type.
///
/// # Errors
///
/// Returns a message describing the expected input.
pub fn coerce_field(field_type: &FieldType, raw: &str) -> Result<FilterValue, String> {
    let trimmed = raw.trim();
    match field_type {
        FieldType::String => Ok(FilterValue::String(raw.to_string())),
        FieldType::Integer => trimmed
            .parse::<i64>()
            .map(FilterValue::Integer)
            .map_err(|_| "Input should be a valid integer".to_string()),
        FieldType::Float => trimmed
            .parse::<f64>()
            .map(FilterValue::Float)
            .map_err(|_| "Input should be a valid number".to_string()),
        FieldType::Boolean => parse_bool(trimmed)
            .map(FilterValue::Boolean)
            .ok_or_else(|| "Input should be a valid boolean".to_string()),
        FieldType::Date => parse_date(trimmed)
            .map(FilterValue::Date)
            .ok_or_else(|| "Input should be a valid date in the format YYYY-MM-DD".to_string()),
        FieldType::DateTime => parse_datetime(trimmed)
            .ok_or_else(|| "Input should be a valid datetime".to_string()),
        FieldType::Time => parse_time(trimmed)
            .map(FilterValue::Time)
            .ok_or_else(|| "Input should be a valid time".to_string()),
        FieldType::Uuid => Uuid::parse_str(trimmed)
            .map(FilterValue::Uuid)
            .map_err(|_| "Input should be a valid UUID".to_string()),
        FieldType::Enum(variants) => {
            if variants.iter().any(|variant| variant == trimmed) {
                Ok(FilterValue::String(trimmed.to_string()))
            } else {
                let expected = variants
                    .iter()
                    .map(|variant| format!("'{variant}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(format!("Input should be one of {expected}"))
            }
        }
    }
}

/// Coerce raw text for any value-carrying parameter.
///
/// # Errors
///
/// Returns a message describing the expected input.
pub fn coerce(value_type: &ValueType, raw: &str) -> Result<FilterValue, String> {
    match value_type {
        ValueType::Field(field_type) => coerce_field(field_type, raw),
        ValueType::Flag => coerce_field(&FieldType::Boolean, raw),
        ValueType::NullableFlag => match raw.trim().to_ascii_lowercase().as_str() {
            "null" | "none" => Ok(FilterValue::Null),
            _ => coerce_field(&FieldType::Boolean, raw),
        },
        ValueType::List | ValueType::Text | ValueType::Sort | ValueType::Select => {
            Ok(FilterValue::String(raw.to_string()))
        }
        ValueType::Integer { .. } => coerce_field(&FieldType::Integer, raw),
    }
}
