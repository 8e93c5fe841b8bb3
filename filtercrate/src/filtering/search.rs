use sea_orm::sea_query::SimpleExpr;

use crate::core::backend::PredicateBackend;
use crate::core::mapping::escape_like;
use crate::core::operations::Operation;
use crate::core::value::FilterValue;
use crate::errors::ConfigurationError;
use crate::metadata::SearchSpec;

/// Search text as handed to an operation: LIKE/ILIKE get `%text%` with any
/// `%`, `_` or `\` in the text escaped, so it only ever matches literally.
/// The rest get the text unchanged.
fn search_value(op: Operation, text: &str) -> FilterValue {
    match op {
        Operation::Like | Operation::Ilike => {
            FilterValue::String(format!("%{}%", escape_like(text)))
        }
        _ => FilterValue::String(text.to_string()),
    }
}

/// Build the composed free-text search predicate.
///
/// Blank or absent text yields `Ok(None)`, as does a search where no column
/// produced a predicate.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnmappedLogicalOperator`] when the
/// descriptor's logical operator has no backend mapping.
pub fn build_q_search(
    backend: &dyn PredicateBackend,
    spec: &SearchSpec,
    text: Option<&str>,
) -> Result<Option<SimpleExpr>, ConfigurationError> {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };

    let mut predicates = Vec::new();
    for (op, column) in spec.targets() {
        if let Some(predicate) = backend.apply(op, column, &search_value(op, text))? {
            predicates.push(predicate);
        }
    }

    if predicates.is_empty() {
        return Ok(None);
    }
    backend.combine(spec.logical(), predicates)
}
