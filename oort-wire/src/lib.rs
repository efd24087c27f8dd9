// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire codec and transport envelopes for the Oort authorization engine.
//!
//! This crate owns everything the rest of the workspace calls its external interface: the
//! length-prefixed CBOR record framing (`codec`), the two enums pinned to fixed numeric
//! codes for cross-language compatibility (`kinds`), and the sync RPC / async bus
//! envelope types (`envelope`). It has no opinion on transport — `oortd` picks whatever
//! carries these bytes.

mod codec;
mod envelope;
mod error;
mod event;
mod kinds;

pub use codec::{decode_all, decode_record, encode_record};
pub use error::WireError;
pub use event::DomainEvent;
pub use envelope::{
    AsyncEnvelope, AsyncKind, AsyncReply, AttributeRecord, CheckPermissionReq, CheckPermissionResp,
    CreateInheritanceRelReq, CreatePermissionReq, CreateRelReq, CreateResourceReq, DeleteAttributeReq,
    DeleteInheritanceRelReq, DeletePermissionReq, DeleteRelReq, DeleteResourceReq, ErrorPayload,
    GetResourceReq, GetResourceResp, MutationResp, PutAttributeReq, SyncRequest, SyncResponse,
};
pub use kinds::{attribute_kind_code, attribute_kind_from_code, permission_kind_code, permission_kind_from_code};
