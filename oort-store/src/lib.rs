// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Oort graph store: a transactional, resource-name-keyed graph with
//! two interchangeable write strategies.
//!
//! [`NonCachedStore`] writes only direct `Includes`/`Has`/`On` edges and computes
//! effective permissions by bounded path search at read time. [`CachedStore`]
//! materializes every inherited `Has`/`On` edge at write time, trading write-path work
//! for O(1) reads. Both implement [`Store`] and must agree on every
//! `get_effective_permissions` probe — see `tests/differential.rs`.
//!
//! This crate owns no I/O; it is an in-memory reference backend behind the `Store`
//! trait, the concrete graph-database driver being out of scope.

mod base;
mod graph;
mod ids;
mod store;
mod strategy;

#[cfg(feature = "test_utils")]
pub mod test_utils;

pub use store::{OutboxSink, ResourceRecord, Store};
pub use strategy::{CachedStore, NonCachedStore};
