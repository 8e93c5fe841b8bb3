//! Typed parameter values handed to the operation mapping.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::Value;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A coerced request value.
///
/// List operations (`in`, `notin`, `btw`, `cont`) always carry
/// [`FilterValue::String`] holding the raw comma-separated text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeTz(DateTime<FixedOffset>),
    Time(NaiveTime),
    Uuid(Uuid),
    Null,
}

impl FilterValue {
    /// Drop timezone information, keeping the wall-clock time, so values
    /// compare against columns stored without a timezone.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Self::DateTimeTz(value) => Self::DateTime(value.naive_local()),
            other => other,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text form used when an operation needs the raw input back.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::String(value) => value.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{value}"),
            Self::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::DateTimeTz(value) => write!(f, "{}", value.to_rfc3339()),
            Self::Time(value) => write!(f, "{value}"),
            Self::Uuid(value) => write!(f, "{value}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<FilterValue> for Value {
    fn from(value: FilterValue) -> Self {
        match value {
            FilterValue::String(value) => value.into(),
            FilterValue::Integer(value) => value.into(),
            FilterValue::Float(value) => value.into(),
            FilterValue::Boolean(value) => value.into(),
            FilterValue::Date(value) => value.into(),
            FilterValue::DateTime(value) => value.into(),
            FilterValue::DateTimeTz(value) => value.into(),
            FilterValue::Time(value) => value.into(),
            FilterValue::Uuid(value) => value.into(),
            FilterValue::Null => Value::String(None),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for FilterValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::DateTimeTz(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// Lenient boolean tokens: `true/false/1/0/yes/no/on/off`, case-insensitive.
#[must_use]
pub fn parse_bool(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[must_use]
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token.trim(), "%Y-%m-%d").ok()
}

#[must_use]
pub fn parse_time(token: &str) -> Option<NaiveTime> {
    let token = token.trim();
    NaiveTime::parse_from_str(token, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(token, "%H:%M"))
        .ok()
}

/// RFC 3339 values keep their offset; naive values (`T` or space separated,
/// or a bare date at midnight) come back without one.
#[must_use]
pub fn parse_datetime(token: &str) -> Option<FilterValue> {
    let token = token.trim();
    if let Ok(aware) = DateTime::parse_from_rfc3339(token) {
        return Some(FilterValue::DateTimeTz(aware));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(token, format).ok())
        .or_else(|| parse_date(token).and_then(|date| date.and_hms_opt(0, 0, 0)))
        .map(FilterValue::DateTime)
}
