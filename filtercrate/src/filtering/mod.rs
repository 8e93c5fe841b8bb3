//! # Criteria Compiler
//!
//! Turns a bound request ([`FilterParams`](crate::schema::FilterParams)) into
//! backend fragments. Every builder here is a pure function of the schema
//! metadata, the backend tables and the request values.
//!
//! ## Main Components
//!
//! - **[`build_filters`]**: criteria predicates, in field declaration order
//! - **[`build_q_search`]**: one composed free-text search predicate
//! - **[`build_sorting`]**: ordering terms, in requested order
//! - **[`build_selected_columns`]**: projected columns, all-or-nothing
//! - **[`parse_offset`] / [`parse_page`]**: pagination normalized to `(limit, offset)`
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Criteria, one parameter per (field, operation)
//! GET /users?user_private__age__gt=18&user_public__first_name__ilike=a%
//!
//! // List operations take comma-separated values
//! GET /users?user_private__age__in=25,30
//! GET /users?user_private__birthday__btw=1990-01-01,2000-12-31
//!
//! // Free-text search, sorting (leading '-' is descending), selection
//! GET /users?q_search=John&sort_by=firstName,-age&select=firstName,age
//!
//! // Pagination
//! GET /users?limit=10&offset=20
//! GET /users?page=3&size=10
//! ```
//!
//! Anything the request leaves unconstrained comes back as `None`: an
//! unmapped operation, a list with a non-castable element, a blank search or
//! an unknown selected column never fails the request.

pub mod conditions;
pub mod pagination;
pub mod search;
pub mod select;
pub mod sort;

// Re-export commonly used items
pub use conditions::{build_filters, compile};
pub use pagination::{parse_offset, parse_page};
pub use search::build_q_search;
pub use select::build_selected_columns;
pub use sort::build_sorting;
