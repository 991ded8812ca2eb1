pub mod schema;
pub mod store;

pub use store::Store;

use crate::model::RawEventRow;

/// Read side of the event log as seen by the evaluation engine.
pub trait EventSource {
    /// At most `limit` events, most recent first.
    fn fetch_recent(&self, limit: usize) -> anyhow::Result<Vec<RawEventRow>>;
}
