// SPDX-License-Identifier: MIT OR Apache-2.0

//! The standalone Outbox Poller binary, mirroring the original
//! `poller/main.go`: build a store-backed outbox, a publisher, and run the drain loop on
//! a fixed interval.

mod backend;

use std::io::Write;

use anyhow::Context;
use async_trait::async_trait;
use backend::Backend;
use oort_outbox::{Poller, PublishError, Publisher};
use tracing_subscriber::EnvFilter;

/// Frames each delivered payload onto stdout.
struct StdoutPublisher;

#[async_trait]
impl Publisher for StdoutPublisher {
    async fn publish(&self, subject: &str, payload: &[u8]) -> Result<(), PublishError> {
        let framed = oort_wire::encode_record(&payload.to_vec())
            .map_err(|err| PublishError::Rejected(err.to_string()))?;
        std::io::stdout()
            .write_all(&framed)
            .map_err(|err| PublishError::Transient(err.to_string()))?;
        tracing::debug!(subject, bytes = payload.len(), "published outbox message");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = oort_config::Config::from_env().context("loading configuration")?;
    tracing::info!(interval_ms = config.poller_interval.as_millis(), "oort-poller starting");

    let backend = Backend::new(config.cached_permissions);
    let mut poller = Poller::new(backend, StdoutPublisher, "oort.events", config.poller_interval);

    poller.run().await;
    Ok(())
}
