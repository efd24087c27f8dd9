// SPDX-License-Identifier: MIT OR Apache-2.0

//! Picks between the two `Store` strategies at startup (`CACHED_PERMISSIONS`).
//! The poller only ever drains the outbox, so it needs nothing beyond `OutboxSink`.

use oort_model::{Error, OutboxMessage};
use oort_store::{CachedStore, NonCachedStore, OutboxSink};

pub enum Backend {
    NonCached(NonCachedStore),
    Cached(CachedStore),
}

impl Backend {
    pub fn new(cached: bool) -> Self {
        if cached {
            Self::Cached(CachedStore::new())
        } else {
            Self::NonCached(NonCachedStore::new())
        }
    }
}

impl OutboxSink for Backend {
    fn append_outbox(&mut self, message: OutboxMessage) -> Result<(), Error> {
        match self {
            Backend::NonCached(store) => store.append_outbox(message),
            Backend::Cached(store) => store.append_outbox(message),
        }
    }

    fn fetch_undelivered(&self, limit: usize) -> Result<Vec<OutboxMessage>, Error> {
        match self {
            Backend::NonCached(store) => store.fetch_undelivered(limit),
            Backend::Cached(store) => store.fetch_undelivered(limit),
        }
    }

    fn mark_delivered(&mut self, id: &str) -> Result<(), Error> {
        match self {
            Backend::NonCached(store) => store.mark_delivered(id),
            Backend::Cached(store) => store.mark_delivered(id),
        }
    }
}
