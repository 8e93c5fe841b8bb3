use crate::core::backend::PredicateBackend;
use crate::core::operations::SortDirection;
use crate::metadata::SortBy;
use crate::models::SortExpr;

/// Resolve validated `(name, direction)` terms into ordering expressions,
/// preserving the requested order.
#[must_use]
pub fn build_sorting(
    backend: &dyn PredicateBackend,
    sort_by: &SortBy,
    terms: Option<&[(String, SortDirection)]>,
) -> Option<Vec<SortExpr>> {
    let sorting: Vec<SortExpr> = terms?
        .iter()
        .filter_map(|(name, direction)| {
            let column = sort_by.get_attr(name)?;
            backend.order(*direction, column)
        })
        .collect();
    if sorting.is_empty() { None } else { Some(sorting) }
}
