//! Dataset storage
//!
//! The pagination strategies only ever talk to a [`RowAccessor`]. The
//! concrete store runs on DuckDB, either file-backed or in memory, and
//! requires an index on `id` (the primary key) and a composite index on
//! `(created_at, id)`, both created with the schema.

mod accessor;
mod store;

pub use accessor::RowAccessor;
pub use store::{is_valid_identifier, ConnectionLease, DuckDbStore, DEFAULT_TABLE};
