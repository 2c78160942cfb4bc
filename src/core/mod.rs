//! Core data structures for regional case-count tables.

mod record;
pub mod schema;
mod table;

pub use record::{
    EnrichedRecord, FeatureColumn, RegionKey, RelationalRecord, RowId, STATE_SENTINEL,
};
pub use schema::{BoundSchema, ColumnRole, ColumnSpec, Schema};
pub use table::{EnrichedTable, Group, RelationalTable, WideTable};
