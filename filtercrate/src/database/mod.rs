// Handles onto backing data columns

pub mod columns;

// Re-export commonly used items
pub use columns::{ColumnKind, ColumnRef, ColumnSource, EntityColumns};
