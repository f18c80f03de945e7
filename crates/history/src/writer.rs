//! Background consumer of the history queue.
//!
//! Writes records one at a time in queue order. A failed insert is retried
//! after each delay in the retry schedule, then dropped with an error log.
//! The loop ends when every [`HistoryRecorder`](crate::HistoryRecorder) is
//! gone and the queue is empty.

use std::sync::Arc;
use std::time::Duration;

use courier_db::models::history::NewHistoryRecord;
use courier_db::HistoryStore;
use tokio::sync::mpsc;

/// Delays before each retry of a failed insert.
const RETRY_DELAYS_MS: [u64; 2] = [100, 500];

pub struct HistoryWriter<S: ?Sized> {
    store: Arc<S>,
    retry_delays: Vec<Duration>,
}

impl<S> HistoryWriter<S>
where
    S: HistoryStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            retry_delays: RETRY_DELAYS_MS.iter().map(|ms| Duration::from_millis(*ms)).collect(),
        }
    }

    /// Replace the retry schedule. An empty schedule means a single attempt.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    /// Drain `receiver` until it closes.
    pub async fn run(self, mut receiver: mpsc::Receiver<NewHistoryRecord>) {
        tracing::info!("History writer started");
        while let Some(record) = receiver.recv().await {
            self.write(&record).await;
        }
        tracing::info!("History queue closed, writer shutting down");
    }

    /// Persist one record, retrying per the schedule. Never fails.
    async fn write(&self, record: &NewHistoryRecord) -> bool {
        let mut attempt = 1;
        let mut delays = self.retry_delays.iter();

        loop {
            match self.store.insert_history(record).await {
                Ok(stored) => {
                    tracing::debug!(
                        id = %stored.id,
                        owner_id = %record.owner_id,
                        status = record.status,
                        "History record saved"
                    );
                    return true;
                }
                Err(e) => match delays.next() {
                    Some(delay) => {
                        tracing::warn!(
                            attempt,
                            owner_id = %record.owner_id,
                            error = %e,
                            "Saving history failed, retrying"
                        );
                        attempt += 1;
                        tokio::time::sleep(*delay).await;
                    }
                    None => {
                        tracing::error!(
                            attempts = attempt,
                            owner_id = %record.owner_id,
                            url = %record.url,
                            error = %e,
                            "Error saving history, record dropped"
                        );
                        return false;
                    }
                },
            }
        }
    }
}
