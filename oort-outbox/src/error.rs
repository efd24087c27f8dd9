// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Errors a [`crate::Publisher`] implementation can surface from a single publish call.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("transient publish failure: {0}")]
    Transient(String),

    #[error("publisher rejected the message: {0}")]
    Rejected(String),
}
