// SPDX-License-Identifier: MIT OR Apache-2.0

/// A pending domain event, created inside the same transaction as the mutation it
/// describes and mutated only by the Outbox Poller, which sets `delivered = true`
/// after a successful publish.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutboxMessage {
    id: String,
    payload: Vec<u8>,
    /// Milliseconds since the Unix epoch, assigned by the writer at insertion time.
    timestamp_ms: i64,
    delivered: bool,
}

impl OutboxMessage {
    /// Construct a new, undelivered outbox message.
    pub fn new(id: impl Into<String>, payload: Vec<u8>, timestamp_ms: i64) -> Self {
        Self {
            id: id.into(),
            payload,
            timestamp_ms,
            delivered: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp_ms
    }

    pub fn delivered(&self) -> bool {
        self.delivered
    }

    /// Mark this message as delivered. Only the Outbox Poller calls this.
    pub fn mark_delivered(&mut self) {
        self.delivered = true;
    }
}
