// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires `oort-model` + `oort-store` + `oort-eval` + `oort-wire` together into the two
//! surfaces a running Oort service exposes: the decision algorithm, and a
//! dispatcher for each of the sync RPC and async bus envelopes. The binaries in `bins/`
//! own the transport; this crate owns what happens once a request has arrived.

mod async_dispatcher;
mod evaluator;
mod sync_dispatcher;

pub use async_dispatcher::{AsyncDispatcher, DispatchedReply};
pub use evaluator::{Decision, Evaluator, ReasonKind};
pub use sync_dispatcher::SyncDispatcher;
