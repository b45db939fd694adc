//! Structural layout errors
//!
//! Everything else in the crate is reported through `anyhow`; these are the
//! failures a caller may want to match on, so they get a concrete type that
//! survives `anyhow::Error::downcast_ref`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A table row does not have the same number of cells as the header
    /// (or key/value shape) it belongs to.
    #[error("table row {row} has {found} cells, expected {expected}")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("table has {columns} columns but {widths} column widths")]
    ColumnWidths { columns: usize, widths: usize },

    #[error("table must have at least one column")]
    EmptyTable,
}
