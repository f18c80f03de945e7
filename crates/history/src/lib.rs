//! Best-effort request history.
//!
//! - [`HistoryRecorder`]: cheap, cloneable handle that enqueues a record
//!   without waiting; a full queue drops the record.
//! - [`HistoryWriter`]: background task draining the queue into a
//!   [`HistoryStore`](courier_db::HistoryStore), retrying briefly and then
//!   dropping on failure.
//! - [`list_recent`]: newest-first retrieval capped at [`HISTORY_LIMIT`].
//!
//! Nothing here ever reports back to the request that produced a record.

use courier_core::types::OwnerId;
use courier_db::models::history::HistoryRecord;
use courier_db::{HistoryStore, StoreResult};

pub mod recorder;
pub mod writer;

pub use recorder::{HistoryRecorder, DEFAULT_QUEUE_CAPACITY};
pub use writer::HistoryWriter;

/// Maximum number of records returned per owner.
pub const HISTORY_LIMIT: usize = 20;

/// The owner's most recent records, newest first. No owner, no records.
pub async fn list_recent<S>(store: &S, owner: Option<&OwnerId>) -> StoreResult<Vec<HistoryRecord>>
where
    S: HistoryStore + ?Sized,
{
    match owner {
        Some(owner) => store.list_history(owner, HISTORY_LIMIT).await,
        None => Ok(Vec::new()),
    }
}
