//! Non-blocking history enqueue handle.

use std::sync::Arc;

use chrono::Utc;
use courier_core::request::HttpMethod;
use courier_core::types::OwnerId;
use courier_db::models::history::NewHistoryRecord;
use courier_db::HistoryStore;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::writer::HistoryWriter;

/// Default number of records that may wait for the writer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Cloneable sender side of the history queue.
///
/// The writer task stops once every recorder clone has been dropped and the
/// queue is drained.
#[derive(Debug, Clone)]
pub struct HistoryRecorder {
    sender: mpsc::Sender<NewHistoryRecord>,
}

impl HistoryRecorder {
    /// Create a recorder and the receiver a [`HistoryWriter`] should drain.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<NewHistoryRecord>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Create a recorder and spawn its writer on the current runtime.
    pub fn spawn<S>(store: Arc<S>, capacity: usize) -> (Self, JoinHandle<()>)
    where
        S: HistoryStore + ?Sized + 'static,
    {
        let (recorder, receiver) = Self::channel(capacity);
        let handle = tokio::spawn(HistoryWriter::new(store).run(receiver));
        (recorder, handle)
    }

    /// Enqueue one dispatch attempt without waiting.
    ///
    /// Without an owner nothing is recorded. Returns whether the record was
    /// queued; a full or closed queue drops it with a log line.
    pub fn record(
        &self,
        owner: Option<&OwnerId>,
        method: HttpMethod,
        url: &str,
        headers: &str,
        body: &str,
        status: u16,
    ) -> bool {
        let Some(owner) = owner else {
            return false;
        };

        let record = NewHistoryRecord {
            owner_id: owner.clone(),
            method,
            url: url.to_string(),
            headers: headers.to_string(),
            body: body.to_string(),
            status,
            created_at: Utc::now(),
        };

        match self.sender.try_send(record) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(record)) => {
                tracing::warn!(
                    owner_id = %record.owner_id,
                    url = %record.url,
                    "History queue full, dropping record"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(record)) => {
                tracing::warn!(
                    owner_id = %record.owner_id,
                    url = %record.url,
                    "History writer stopped, dropping record"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::parse(Some("alice")).unwrap()
    }

    #[tokio::test]
    async fn records_without_owner_are_skipped() {
        let (recorder, mut receiver) = HistoryRecorder::channel(4);
        assert!(!recorder.record(None, HttpMethod::Get, "http://x", "", "", 200));
        drop(recorder);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn record_is_stamped_and_queued() {
        let (recorder, mut receiver) = HistoryRecorder::channel(4);
        let before = Utc::now();
        assert!(recorder.record(
            Some(&owner()),
            HttpMethod::Post,
            "http://x/users",
            r#"{"a":"b"}"#,
            "{}",
            201
        ));

        let queued = receiver.recv().await.unwrap();
        assert_eq!(queued.owner_id, owner());
        assert_eq!(queued.method, HttpMethod::Post);
        assert_eq!(queued.url, "http://x/users");
        assert_eq!(queued.headers, r#"{"a":"b"}"#);
        assert_eq!(queued.status, 201);
        assert!(queued.created_at >= before);
    }

    #[tokio::test]
    async fn full_queue_drops_without_blocking() {
        let (recorder, _receiver) = HistoryRecorder::channel(1);
        assert!(recorder.record(Some(&owner()), HttpMethod::Get, "http://x/1", "", "", 200));
        assert!(!recorder.record(Some(&owner()), HttpMethod::Get, "http://x/2", "", "", 200));
    }

    #[tokio::test]
    async fn closed_queue_drops() {
        let (recorder, receiver) = HistoryRecorder::channel(1);
        drop(receiver);
        assert!(!recorder.record(Some(&owner()), HttpMethod::Get, "http://x", "", "", 0));
    }
}
