// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Oort service daemon: boots a `Store` strategy, then drives the
//! sync RPC or async bus surface over framed records on stdio.
//!
//! The concrete transport (gRPC, NATS, ...) is out of scope — this binary
//! frames the same records `oort-wire` defines over whatever pipes it, which is enough to
//! exercise the full dispatch path end to end. A real deployment swaps stdio for a
//! network listener without touching `oort-service`.

mod backend;

use std::io::{self, Read, Write};

use anyhow::Context;
use backend::Backend;
use oort_admin::Administration;
use oort_service::{AsyncDispatcher, SyncDispatcher};
use oort_wire::{AsyncEnvelope, SyncRequest};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = oort_config::Config::from_env().context("loading configuration")?;
    tracing::info!(cached_permissions = config.cached_permissions, "oortd starting");

    let admin = Administration::new(Backend::new(config.cached_permissions));

    let mode = std::env::args().nth(1).unwrap_or_else(|| "sync".to_string());
    match mode.as_str() {
        "sync" => run_sync(SyncDispatcher::new(admin)),
        "async" => run_async(AsyncDispatcher::new(admin)),
        other => anyhow::bail!("unknown mode {other:?}, expected \"sync\" or \"async\""),
    }
}

/// Reads every [`SyncRequest`] framed on stdin, dispatches it, and writes the matching
/// [`SyncResponse`] framed on stdout.
fn run_sync(mut dispatcher: SyncDispatcher<Backend>) -> anyhow::Result<()> {
    let requests: Vec<SyncRequest> = read_records("sync requests")?;
    let mut out = io::stdout().lock();
    for request in requests {
        let response = dispatcher.dispatch(request);
        out.write_all(&oort_wire::encode_record(&response)?)?;
    }
    out.flush()?;
    Ok(())
}

/// Reads every [`AsyncEnvelope`] framed on stdin, dispatches it, and writes any reply it
/// produces. Envelopes with an unrecognized kind or an undecodable payload are logged and
/// dropped, per the async bus's fire-and-forget contract.
fn run_async(mut dispatcher: AsyncDispatcher<Backend>) -> anyhow::Result<()> {
    let envelopes: Vec<AsyncEnvelope> = read_records("async envelopes")?;
    let mut out = io::stdout().lock();
    for envelope in &envelopes {
        if let Some(reply) = dispatcher.dispatch(envelope) {
            tracing::debug!(subject = %reply.reply_subject, "publishing async reply");
            out.write_all(&reply.payload)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn read_records<T: serde::de::DeserializeOwned>(what: &'static str) -> anyhow::Result<Vec<T>> {
    let mut buf = Vec::new();
    io::stdin().read_to_end(&mut buf).with_context(|| format!("reading {what} from stdin"))?;
    oort_wire::decode_all(&buf).with_context(|| format!("decoding {what}"))
}
