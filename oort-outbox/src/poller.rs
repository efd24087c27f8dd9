// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use oort_store::OutboxSink;
use tracing::{debug, info, instrument, warn};

use crate::publisher::Publisher;

/// Drains undelivered outbox rows onto a single subject, one tick at a time. Mirrors the original `domain.Poller` wiring (`poller/main.go`): a store-backed
/// outbox plus a publisher, run on a fixed interval.
pub struct Poller<S, P> {
    sink: S,
    publisher: P,
    subject: String,
    interval: Duration,
    batch_limit: usize,
}

impl<S, P> Poller<S, P>
where
    S: OutboxSink,
    P: Publisher,
{
    pub fn new(sink: S, publisher: P, subject: impl Into<String>, interval: Duration) -> Self {
        Self {
            sink,
            publisher,
            subject: subject.into(),
            interval,
            batch_limit: 100,
        }
    }

    pub fn with_batch_limit(mut self, batch_limit: usize) -> Self {
        self.batch_limit = batch_limit;
        self
    }

    /// Runs forever, sleeping `interval` between ticks. Intended for `bins/oort-poller`;
    /// tests call [`Self::tick`] directly.
    pub async fn run(&mut self) {
        loop {
            if let Err(err) = self.tick().await {
                warn!(%err, "outbox tick failed");
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One fetch-publish-mark pass. Stops at the first publish failure so ordering is
    /// preserved for the next tick; already-delivered rows in this batch stay marked.
    #[instrument(skip(self))]
    pub async fn tick(&mut self) -> Result<usize, oort_model::Error> {
        let pending = self.sink.fetch_undelivered(self.batch_limit)?;
        let mut delivered = 0;

        for message in pending {
            match self.publisher.publish(&self.subject, message.payload()).await {
                Ok(()) => {
                    self.sink.mark_delivered(message.id())?;
                    delivered += 1;
                    debug!(id = message.id(), "delivered outbox message");
                }
                Err(err) => {
                    warn!(id = message.id(), %err, "publish failed, stopping batch");
                    break;
                }
            }
        }

        if delivered > 0 {
            info!(delivered, "outbox tick complete");
        }
        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use oort_model::OutboxMessage;
    use oort_store::{NonCachedStore, OutboxSink};

    use super::*;
    use crate::error::PublishError;

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<Vec<u8>>>,
        fail_next: Mutex<bool>,
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, _subject: &str, payload: &[u8]) -> Result<(), PublishError> {
            if *self.fail_next.lock().unwrap() {
                return Err(PublishError::Transient("boom".into()));
            }
            self.published.lock().unwrap().push(payload.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn delivers_pending_rows_and_marks_them() {
        let mut store = NonCachedStore::new();
        store.append_outbox(OutboxMessage::new("1", b"one".to_vec(), 1)).unwrap();
        store.append_outbox(OutboxMessage::new("2", b"two".to_vec(), 2)).unwrap();

        let publisher = RecordingPublisher::default();
        let mut poller = Poller::new(store, publisher, "oort.events", Duration::from_millis(1));

        let delivered = poller.tick().await.unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(poller.sink.fetch_undelivered(10).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn stops_the_batch_on_the_first_publish_failure() {
        let mut store = NonCachedStore::new();
        store.append_outbox(OutboxMessage::new("1", b"one".to_vec(), 1)).unwrap();
        store.append_outbox(OutboxMessage::new("2", b"two".to_vec(), 2)).unwrap();

        let publisher = RecordingPublisher::default();
        *publisher.fail_next.lock().unwrap() = true;
        let mut poller = Poller::new(store, publisher, "oort.events", Duration::from_millis(1));

        let delivered = poller.tick().await.unwrap();
        assert_eq!(delivered, 0);
        assert_eq!(poller.sink.fetch_undelivered(10).unwrap().len(), 2);
    }
}
