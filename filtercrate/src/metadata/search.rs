use crate::core::operations::{LogicalOperator, Operation};
use crate::database::columns::ColumnRef;

/// Free-text search applying one operation uniformly to every column.
#[derive(Debug, Clone)]
pub struct QSearch {
    columns: Vec<ColumnRef>,
    op: Operation,
    logical: LogicalOperator,
}

impl QSearch {
    /// Search `columns` with `op`, OR-combined unless changed with [`QSearch::logical`].
    pub fn new<C: Into<ColumnRef>>(columns: impl IntoIterator<Item = C>, op: Operation) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            op,
            logical: LogicalOperator::default(),
        }
    }

    #[must_use]
    pub fn logical(mut self, logical: LogicalOperator) -> Self {
        self.logical = logical;
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnRef] {
        &self.columns
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        self.op
    }
}

/// Free-text search with a different operation per group of columns.
#[derive(Debug, Clone, Default)]
pub struct AdvancedQSearch {
    columns_by_op: Vec<(Operation, Vec<ColumnRef>)>,
    logical: LogicalOperator,
}

impl AdvancedQSearch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `op` to `columns`. Groups are searched in the order they are added.
    #[must_use]
    pub fn with<C: Into<ColumnRef>>(
        mut self,
        op: Operation,
        columns: impl IntoIterator<Item = C>,
    ) -> Self {
        let columns: Vec<ColumnRef> = columns.into_iter().map(Into::into).collect();
        match self.columns_by_op.iter_mut().find(|(existing, _)| *existing == op) {
            Some((_, group)) => group.extend(columns),
            None => self.columns_by_op.push((op, columns)),
        }
        self
    }

    #[must_use]
    pub fn logical(mut self, logical: LogicalOperator) -> Self {
        self.logical = logical;
        self
    }

    #[must_use]
    pub fn groups(&self) -> &[(Operation, Vec<ColumnRef>)] {
        &self.columns_by_op
    }
}

/// Either search descriptor, as configured on a schema.
#[derive(Debug, Clone)]
pub enum SearchSpec {
    Simple(QSearch),
    Advanced(AdvancedQSearch),
}

impl SearchSpec {
    /// Every `(operation, column)` pair to search, flattened in order.
    #[must_use]
    pub fn targets(&self) -> Vec<(Operation, &ColumnRef)> {
        match self {
            Self::Simple(search) => search
                .columns
                .iter()
                .map(|column| (search.op, column))
                .collect(),
            Self::Advanced(search) => search
                .columns_by_op
                .iter()
                .flat_map(|(op, columns)| columns.iter().map(move |column| (*op, column)))
                .collect(),
        }
    }

    #[must_use]
    pub fn logical(&self) -> LogicalOperator {
        match self {
            Self::Simple(search) => search.logical,
            Self::Advanced(search) => search.logical,
        }
    }
}

impl From<QSearch> for SearchSpec {
    fn from(search: QSearch) -> Self {
        Self::Simple(search)
    }
}

impl From<AdvancedQSearch> for SearchSpec {
    fn from(search: AdvancedQSearch) -> Self {
        Self::Advanced(search)
    }
}
