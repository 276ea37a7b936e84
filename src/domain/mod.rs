//! Domain layer: Core tabular types and pure data transforms.

mod ecdf;
mod split;
mod table;

pub use ecdf::EmpiricalCdf;
pub use split::{FieldSplit, SplitError};
pub use table::{Column, ColumnKind, Table, TableError, Value};
