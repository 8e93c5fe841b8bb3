use sea_orm::sea_query::{Order, SimpleExpr};
use sea_orm::{Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select};
use serde::{Deserialize, Serialize};

use crate::database::columns::ColumnRef;

/// Canonical pagination window.
///
/// Both offset-based (`limit`, `offset`) and page-based (`page`, `size`)
/// input normalize to this shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u64 = 100;
    pub const DEFAULT_OFFSET: u64 = 0;

    #[must_use]
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Window for a 1-based page of `size` items.
    #[must_use]
    pub fn from_page(page: u64, size: u64) -> Self {
        Self {
            limit: size,
            offset: page.saturating_sub(1).saturating_mul(size),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, Self::DEFAULT_OFFSET)
    }
}

/// A single ordering term.
#[derive(Debug, Clone, PartialEq)]
pub struct SortExpr {
    pub expr: SimpleExpr,
    pub order: Order,
}

impl SortExpr {
    #[must_use]
    pub fn new(expr: SimpleExpr, order: Order) -> Self {
        Self { expr, order }
    }
}

/// Everything compiled from one request.
///
/// Each part is `None` when the request did not constrain it, never an
/// empty composition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    /// Criteria predicates in field declaration order
    pub filters: Option<Vec<SimpleExpr>>,
    /// Composed free-text search predicate
    pub q_search: Option<SimpleExpr>,
    /// Ordering terms in requested order
    pub sorting: Option<Vec<SortExpr>>,
    /// Columns to project; all registered columns when selection was not given
    pub selected_columns: Option<Vec<ColumnRef>>,
    pub pagination: Option<Pagination>,
}

impl FilterResult {
    /// All filters and the search predicate, AND-combined.
    #[must_use]
    pub fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        for filter in self.filters.iter().flatten() {
            condition = condition.add(filter.clone());
        }
        if let Some(search) = &self.q_search {
            condition = condition.add(search.clone());
        }
        condition
    }

    #[must_use]
    pub fn has_conditions(&self) -> bool {
        self.filters.is_some() || self.q_search.is_some()
    }

    /// Names of the selected columns, in selection order.
    #[must_use]
    pub fn selected_names(&self) -> Option<Vec<&str>> {
        self.selected_columns
            .as_ref()
            .map(|columns| columns.iter().map(ColumnRef::name).collect())
    }

    /// Apply filters, search, ordering and pagination to a query.
    ///
    /// Column selection is left alone since it changes the row shape; see
    /// [`FilterResult::select_columns`].
    #[must_use]
    pub fn apply<E: EntityTrait>(&self, mut select: Select<E>) -> Select<E> {
        if self.has_conditions() {
            select = select.filter(self.condition());
        }
        for term in self.sorting.iter().flatten() {
            select = select.order_by(term.expr.clone(), term.order.clone());
        }
        if let Some(pagination) = self.pagination {
            select = select.limit(pagination.limit).offset(pagination.offset);
        }
        select
    }

    /// Restrict the projection to the selected columns, each aliased by its
    /// column name. A query without a selection is returned unchanged.
    #[must_use]
    pub fn select_columns<E: EntityTrait>(&self, select: Select<E>) -> Select<E> {
        let Some(columns) = &self.selected_columns else {
            return select;
        };
        columns
            .iter()
            .fold(select.select_only(), |select, column| {
                select.column_as(column.expr(), column.name())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::columns::ColumnKind;

    #[test]
    fn test_page_normalization() {
        assert_eq!(Pagination::from_page(1, 10), Pagination::new(10, 0));
        assert_eq!(Pagination::from_page(3, 25), Pagination::new(25, 50));
    }

    #[test]
    fn test_default_window() {
        assert_eq!(Pagination::default(), Pagination::new(100, 0));
    }

    #[test]
    fn test_empty_result_has_no_conditions() {
        let result = FilterResult::default();
        assert!(!result.has_conditions());
        assert!(result.condition().is_empty());
    }

    #[test]
    fn test_condition_combines_filters_and_search() {
        let age = ColumnRef::new("users", "age", ColumnKind::Integer);
        let name = ColumnRef::new("users", "name", ColumnKind::String);
        let result = FilterResult {
            filters: Some(vec![age.col().gt(18), age.col().lt(65)]),
            q_search: Some(name.col().like("%li%")),
            ..Default::default()
        };
        assert!(result.has_conditions());
        assert_eq!(result.condition().len(), 3);
    }

    #[test]
    fn test_selected_names() {
        let result = FilterResult {
            selected_columns: Some(vec![
                ColumnRef::new("users", "first_name", ColumnKind::String),
                ColumnRef::new("users", "age", ColumnKind::Integer),
            ]),
            ..Default::default()
        };
        assert_eq!(result.selected_names(), Some(vec!["first_name", "age"]));
    }
}
