//! Aggregation over the generation event log.
//!
//! Everything here is a pure function over an [`EventTable`] snapshot. The
//! only I/O is the single [`EventTable::load`] call against an
//! [`EventSource`](crate::storage::EventSource).

pub mod summary;
pub mod table;
pub mod win_rate;

pub use summary::{cost_quality, summarize, BackendSummary, CostQualityPoint};
pub use table::EventTable;
pub use win_rate::win_rate;
