//! Metadata-driven filtering for Axum and Sea-ORM.
//!
//! Declare which fields are filterable with which operations, bind request
//! query parameters against the generated model, and get back Sea-Query
//! predicates, ordering terms, a column selection and a pagination window.
//!
//! ```rust,ignore
//! let schema = FilterConfig::for_entity::<user::Entity>()
//!     .prefix("user")
//!     .all_fields()
//!     .sort_by(SortBy::from_source(&EntityColumns::<user::Entity>::new()))
//!     .pagination(PaginationMode::OffsetBased)
//!     .build()?;
//!
//! let result = schema.resolve(query_pairs)?;
//! let users = result.apply(user::Entity::find()).all(&db).await?;
//! ```

pub mod core;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod metadata;
pub mod models;
pub mod openapi;
pub mod schema;
pub mod validation;

pub use crate::core::{
    FilterValue, LogicalOperator, Operation, PaginationMode, PredicateBackend, SortDirection,
    SqlBackend,
};
pub use database::{ColumnKind, ColumnRef, ColumnSource, EntityColumns};
pub use errors::{ConfigurationError, FilterError};
pub use metadata::{AdvancedQSearch, FieldCriteria, FieldType, QSearch, SearchSpec, Selectable, SortBy};
pub use models::{FilterResult, Pagination, SortExpr};
pub use schema::{ExtraField, FilterConfig, FilterParams, FilterSchema};
pub use validation::{ValidationError, ValidationErrors};
