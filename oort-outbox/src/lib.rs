// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Outbox Poller: drains undelivered rows from a store-backed
//! [`oort_store::OutboxSink`] onto a [`Publisher`], at-least-once, one batch per tick.
//!
//! The outbox table itself lives in `oort-store`; this crate only owns the publish-side interface
//! and the drain loop, mirroring the original `poller/main.go` wiring of a transaction
//! manager plus a NATS publisher.

mod error;
mod poller;
mod publisher;

pub use error::PublishError;
pub use poller::Poller;
pub use publisher::Publisher;
