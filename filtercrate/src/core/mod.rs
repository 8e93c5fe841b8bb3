// Abstract operations and the backend that renders them into predicates

pub mod backend;
pub mod mapping;
pub mod operations;
pub mod value;

// Re-export commonly used items
pub use backend::{LogicalFn, OperationFn, PredicateBackend, SortingFn, SqlBackend};
pub use mapping::OperationResult;
pub use operations::{LogicalOperator, Operation, PaginationMode, SortDirection};
pub use value::FilterValue;
