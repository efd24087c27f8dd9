// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// The shared error taxonomy surfaced by `Store` and `Administration`.
///
/// Condition-evaluation errors are deliberately not a variant here — they degrade to
/// `false` inside the Evaluator and never propagate as a decision error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A referenced resource, attribute, or permission does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness invariant (or a duplicate `Includes` edge) would be violated.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// An identifier was empty or otherwise malformed.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Adding the requested relation would create a cycle in Composition ∪ Aggregation.
    #[error("cycle detected while linking resources")]
    CycleDetected,

    /// An attribute update's value kind does not match the attribute's stored kind.
    #[error("attribute {attribute} kind mismatch")]
    KindMismatch { attribute: String },

    /// The outbox message factory for a mutation returned nothing; the mutation was
    /// rolled back.
    #[error("outbox message could not be generated, mutation rolled back")]
    OutboxGenerationFailed,

    /// A transient transport/database failure; safe to retry.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// An unexpected invariant breach — a bug, not a caller mistake.
    #[error("internal error: {0}")]
    Internal(String),
}
