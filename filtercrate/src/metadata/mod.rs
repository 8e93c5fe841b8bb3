// Immutable descriptors a filter schema is declared from

pub mod field;
pub mod registry;
pub mod search;

// Re-export commonly used items
pub use field::{CustomFilterFn, FieldCriteria, FieldType, PredicateSource};
pub use registry::{ColumnRegistry, Selectable, SortBy};
pub use search::{AdvancedQSearch, QSearch, SearchSpec};
