// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::PublishError;

/// At-least-once delivery to a subject. The concrete
/// message-bus transport (NATS) stays out of scope; this is the narrow seam the Poller
/// programs against.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, subject: &str, payload: &[u8]) -> Result<(), PublishError>;
}
