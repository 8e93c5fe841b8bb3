//! # Parameter Model
//!
//! A [`FilterConfig`] is declared once; [`FilterConfig::build`] validates it
//! and generates a [`FilterSchema`] holding one [`ParameterSpec`] per
//! `(field, operation)` pair plus the search, sorting, selection and
//! pagination parameters. Requests are bound against the schema into
//! [`FilterParams`].
//!
//! ## Parameter Naming
//!
//! Criterion parameters are named `{prefix}__{field}__{op}`. With camelCase
//! aliasing enabled they are also addressable as e.g. `userPrivateAgeGt`.

pub mod casing;
pub mod coerce;
pub mod config;
pub mod filter_schema;
pub mod parameter;
pub mod validators;

// Re-export commonly used items
pub use casing::{to_camel_case, to_snake_case};
pub use config::{FilterConfig, Q_SEARCH};
pub use filter_schema::{FilterParams, FilterSchema};
pub use parameter::{ExtraField, ParameterKind, ParameterSpec, ValueType};
pub use validators::{
    SelectInput, SortInput, validate_selectable_schema, validate_sortable_schema,
};
