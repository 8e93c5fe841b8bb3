//! # Error Handling
//!
//! Two families of errors exist:
//!
//! - [`ConfigurationError`]: a mistake in how a filter schema was declared
//!   (an operation with nothing to compile against, BETWEEN on a text column,
//!   a logical operator missing from the backend table). These surface from
//!   [`FilterConfig::build`](crate::schema::FilterConfig::build) before any
//!   request is served, and are never caused by request data.
//! - [`ValidationErrors`]: bad request input (pagination numbers, unknown
//!   sortable/selectable names, values that fail type coercion). These are
//!   collected per request and attributed to the offending parameter.
//!
//! [`FilterError`] wraps both for hosts that want a single error type. It
//! implements Axum's `IntoResponse`: validation failures become a 422 with
//! the per-field details, configuration errors become a sanitized 500 whose
//! details are only logged.
//!
//! ## Logging
//!
//! Configuration errors are logged using the `tracing` crate. Install a
//! subscriber in the host application to see them:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt().with_target(false).compact().init();
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::core::operations::{LogicalOperator, Operation};
use crate::database::columns::ColumnKind;
use crate::validation::ValidationErrors;

/// Schema declaration mistakes, raised at definition time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A criterion declares an operation but has no column, column group or custom filter
    MissingPredicateSource { field: String, operation: Operation },
    /// A column group was compiled with a logical operator the backend cannot combine
    UnmappedLogicalOperator(LogicalOperator),
    /// BETWEEN requested on a column that is neither numeric nor temporal
    UnsupportedBetweenColumn { column: String, kind: ColumnKind },
    /// A field name could not be resolved against the column source
    UnknownColumn(String),
    /// Two generated parameters share a name or alias
    DuplicateParameter(String),
    /// A criterion was declared with an empty name
    EmptyFieldName,
    /// Field names were given but no column source was configured
    MissingColumnSource,
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPredicateSource { field, operation } => write!(
                f,
                "Field '{field}' declares operation '{operation}' but has no column, column group or custom filter"
            ),
            Self::UnmappedLogicalOperator(op) => {
                write!(f, "Logical operator '{op}' has no mapping in the backend")
            }
            Self::UnsupportedBetweenColumn { column, kind } => write!(
                f,
                "BETWEEN is not supported for column '{column}' of kind {kind:?}"
            ),
            Self::UnknownColumn(name) => write!(f, "Column '{name}' not found in column source"),
            Self::DuplicateParameter(name) => {
                write!(f, "Parameter '{name}' is generated more than once")
            }
            Self::EmptyFieldName => write!(f, "Field criteria must have a non-empty name"),
            Self::MissingColumnSource => {
                write!(f, "Field names require a column source to resolve against")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Everything that can go wrong while turning a request into a [`FilterResult`](crate::models::FilterResult).
#[derive(Debug)]
pub enum FilterError {
    /// 422 Unprocessable Entity - request parameters failed validation
    Validation(ValidationErrors),
    /// 500 Internal Server Error - the schema itself is broken (details logged, not exposed)
    Configuration(ConfigurationError),
}

impl FilterError {
    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Configuration(error) => {
                tracing::error!(error = %error, "Filter configuration error");
            }
            Self::Validation(errors) => {
                tracing::debug!(count = errors.len(), "Filter parameters failed validation");
            }
        }
    }
}

impl From<ValidationErrors> for FilterError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ConfigurationError> for FilterError {
    fn from(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "{errors}"),
            Self::Configuration(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for FilterError {}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    /// Error message
    error: String,
    /// Per-parameter validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<crate::validation::ValidationError>>,
}

impl IntoResponse for FilterError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match self {
            Self::Validation(errors) => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.errors().to_vec()),
            },
            Self::Configuration(_) => ErrorResponse {
                error: "An internal error occurred".to_string(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}
