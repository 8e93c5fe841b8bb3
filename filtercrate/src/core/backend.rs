//! The predicate backend capability.
//!
//! The compiler never builds SQL itself: it asks a [`PredicateBackend`] to
//! apply an operation to a column, to combine predicates under a logical
//! operator, and to order by a column. [`SqlBackend`] is the default
//! implementation, driven by three lookup tables keyed by the abstract
//! enumerations. Entries can be replaced or removed to customise rendering.

use sea_orm::sea_query::{Order, SimpleExpr};
use std::collections::HashMap;

use super::mapping::{self, OperationResult};
use super::operations::{LogicalOperator, Operation, SortDirection};
use super::value::FilterValue;
use crate::database::columns::ColumnRef;
use crate::errors::ConfigurationError;
use crate::models::SortExpr;

/// `(column, value) -> predicate`
pub type OperationFn = fn(&ColumnRef, &FilterValue) -> OperationResult;
/// `[predicate, ...] -> predicate`; `None` for an empty input
pub type LogicalFn = fn(Vec<SimpleExpr>) -> Option<SimpleExpr>;
/// `column -> ordering`
pub type SortingFn = fn(&ColumnRef) -> SortExpr;

/// Renders abstract operations into backend predicates.
pub trait PredicateBackend: Send + Sync {
    /// Whether `op` has a mapping at all.
    fn supports(&self, op: Operation) -> bool;

    /// Apply `op` to a column. Unmapped operations yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors raised by the operation function.
    fn apply(&self, op: Operation, column: &ColumnRef, value: &FilterValue) -> OperationResult;

    /// Combine predicates. One predicate comes back unwrapped, none yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnmappedLogicalOperator`] when `op` has no mapping.
    fn combine(
        &self,
        op: LogicalOperator,
        predicates: Vec<SimpleExpr>,
    ) -> Result<Option<SimpleExpr>, ConfigurationError>;

    /// Ordering expression for a column, if the direction is mapped.
    fn order(&self, direction: SortDirection, column: &ColumnRef) -> Option<SortExpr>;
}

/// Default SQL backend producing Sea-Query expressions.
#[derive(Clone)]
pub struct SqlBackend {
    operations: HashMap<Operation, OperationFn>,
    logical: HashMap<LogicalOperator, LogicalFn>,
    sorting: HashMap<SortDirection, SortingFn>,
}

fn ascending(column: &ColumnRef) -> SortExpr {
    SortExpr::new(column.expr(), Order::Asc)
}

fn descending(column: &ColumnRef) -> SortExpr {
    SortExpr::new(column.expr(), Order::Desc)
}

impl SqlBackend {
    /// Backend with every operation, logical operator and direction mapped.
    #[must_use]
    pub fn new() -> Self {
        let operations: HashMap<Operation, OperationFn> = HashMap::from([
            (Operation::Eq, mapping::eq as OperationFn),
            (Operation::Neq, mapping::neq),
            (Operation::Like, mapping::like),
            (Operation::Ilike, mapping::ilike),
            (Operation::Cont, mapping::contains),
            (Operation::In, mapping::in_list),
            (Operation::Notin, mapping::not_in_list),
            (Operation::Btw, mapping::between),
            (Operation::Gt, mapping::gt),
            (Operation::Gte, mapping::gte),
            (Operation::Lt, mapping::lt),
            (Operation::Lte, mapping::lte),
            (Operation::Is, mapping::is),
            (Operation::Isnull, mapping::is_null),
        ]);
        let logical: HashMap<LogicalOperator, LogicalFn> = HashMap::from([
            (LogicalOperator::Or, mapping::any_of as LogicalFn),
            (LogicalOperator::And, mapping::all_of),
        ]);
        let sorting: HashMap<SortDirection, SortingFn> = HashMap::from([
            (SortDirection::Asc, ascending as SortingFn),
            (SortDirection::Desc, descending),
        ]);
        Self {
            operations,
            logical,
            sorting,
        }
    }

    /// The function registered for `op`.
    #[must_use]
    pub fn operation(&self, op: Operation) -> Option<OperationFn> {
        self.operations.get(&op).copied()
    }

    #[must_use]
    pub fn with_operation(mut self, op: Operation, function: OperationFn) -> Self {
        self.operations.insert(op, function);
        self
    }

    #[must_use]
    pub fn without_operation(mut self, op: Operation) -> Self {
        self.operations.remove(&op);
        self
    }

    #[must_use]
    pub fn with_logical(mut self, op: LogicalOperator, function: LogicalFn) -> Self {
        self.logical.insert(op, function);
        self
    }

    #[must_use]
    pub fn without_logical(mut self, op: LogicalOperator) -> Self {
        self.logical.remove(&op);
        self
    }
}

impl Default for SqlBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PredicateBackend for SqlBackend {
    fn supports(&self, op: Operation) -> bool {
        self.operations.contains_key(&op)
    }

    fn apply(&self, op: Operation, column: &ColumnRef, value: &FilterValue) -> OperationResult {
        match self.operations.get(&op) {
            Some(function) => function(column, value),
            None => {
                tracing::debug!(operation = %op, column = %column, "No mapping for operation, skipping");
                Ok(None)
            }
        }
    }

    fn combine(
        &self,
        op: LogicalOperator,
        predicates: Vec<SimpleExpr>,
    ) -> Result<Option<SimpleExpr>, ConfigurationError> {
        let function = self
            .logical
            .get(&op)
            .ok_or(ConfigurationError::UnmappedLogicalOperator(op))?;
        Ok(function(predicates))
    }

    fn order(&self, direction: SortDirection, column: &ColumnRef) -> Option<SortExpr> {
        self.sorting.get(&direction).map(|function| function(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::columns::ColumnKind;

    fn age() -> ColumnRef {
        ColumnRef::new("users", "age", ColumnKind::Integer)
    }

    #[test]
    fn test_default_backend_maps_every_operation() {
        let backend = SqlBackend::default();
        for op in Operation::ALL {
            assert!(backend.supports(op), "missing mapping for {op}");
        }
    }

    #[test]
    fn test_apply_matches_table_function() {
        let backend = SqlBackend::new();
        let value = FilterValue::Integer(30);
        let direct = backend.operation(Operation::Gt).unwrap()(&age(), &value).unwrap();
        assert_eq!(backend.apply(Operation::Gt, &age(), &value).unwrap(), direct);
    }

    #[test]
    fn test_unmapped_operation_yields_nothing() {
        let backend = SqlBackend::new().without_operation(Operation::Lte);
        assert!(!backend.supports(Operation::Lte));
        assert_eq!(
            backend.apply(Operation::Lte, &age(), &FilterValue::Integer(5)).unwrap(),
            None
        );
    }

    #[test]
    fn test_combine_unwraps_single_and_rejects_unmapped() {
        let backend = SqlBackend::new();
        let single = age().col().gt(1);
        assert_eq!(
            backend.combine(LogicalOperator::Or, vec![single.clone()]).unwrap(),
            Some(single.clone())
        );
        assert_eq!(backend.combine(LogicalOperator::And, vec![]).unwrap(), None);

        let pair = backend
            .combine(LogicalOperator::And, vec![single.clone(), age().col().lt(9)])
            .unwrap();
        assert_eq!(pair, Some(single.clone().and(age().col().lt(9))));

        let broken = SqlBackend::new().without_logical(LogicalOperator::Or);
        assert_eq!(
            broken.combine(LogicalOperator::Or, vec![single]),
            Err(ConfigurationError::UnmappedLogicalOperator(LogicalOperator::Or))
        );
    }

    #[test]
    fn test_order_directions() {
        let backend = SqlBackend::new();
        let asc = backend.order(SortDirection::Asc, &age()).unwrap();
        let desc = backend.order(SortDirection::Desc, &age()).unwrap();
        assert_eq!(asc.order, Order::Asc);
        assert_eq!(desc.order, Order::Desc);
        assert_eq!(asc.expr, age().expr());
    }
}
