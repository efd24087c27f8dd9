// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request/response payloads and the two dispatcher envelopes:
//! synchronous request/response RPC, and the single-subject async bus envelope whose
//! `kind` field drives a `match` in `oort-service`'s async dispatcher.

use oort_model::AttributeValue;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateResourceReq {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteResourceReq {
    pub name: String,
}

/// Upserts an attribute: creates it if absent, updates it (same kind only) if present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PutAttributeReq {
    pub resource: String,
    pub name: String,
    pub value: AttributeValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteAttributeReq {
    pub resource: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateRelReq {
    pub parent: String,
    pub child: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteRelReq {
    pub parent: String,
    pub child: String,
}

/// `kind` uses the fixed numeric code from [`crate::kinds::permission_kind_code`], not
/// `oort_model::PermissionKind`'s own (de)serialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatePermissionReq {
    pub subject: String,
    pub object: String,
    pub name: String,
    pub kind: u8,
    pub condition: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeletePermissionReq {
    pub subject: String,
    pub object: String,
    pub name: String,
    pub kind: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetResourceReq {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub name: String,
    pub value: AttributeValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GetResourceResp {
    pub name: String,
    pub attributes: Vec<AttributeRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckPermissionReq {
    pub principal: String,
    pub resource: String,
    pub permission_name: String,
    pub env: Vec<(String, AttributeValue)>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckPermissionResp {
    pub allowed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
}

/// Response shared by every mutating sync method: an empty success or an error.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct MutationResp {
    pub error: Option<ErrorPayload>,
}

/// One request keyed by method name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SyncRequest {
    CheckPermission(CheckPermissionReq),
    CreateResource(CreateResourceReq),
    DeleteResource(DeleteResourceReq),
    PutAttribute(PutAttributeReq),
    DeleteAttribute(DeleteAttributeReq),
    CreateCompositionRel(CreateRelReq),
    DeleteCompositionRel(CreateRelReq),
    CreateAggregationRel(CreateRelReq),
    DeleteAggregationRel(CreateRelReq),
    CreatePermission(CreatePermissionReq),
    DeletePermission(DeletePermissionReq),
    GetResource(GetResourceReq),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SyncResponse {
    CheckPermission(CheckPermissionResp),
    GetResource(GetResourceResp),
    Mutation(MutationResp),
}

/// The administrative request kinds carried on the async bus.
/// Distinct from [`SyncRequest`]'s per-kind relation split: the async surface collapses
/// Composition/Aggregation into one "inheritance rel" kind and carries the
/// [`oort_model::RelationKind`] in the payload instead, mirroring the upstream system's
/// `AdministrationAsyncReq_Kind` enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AsyncKind {
    CreateResource = 0,
    DeleteResource = 1,
    PutAttribute = 2,
    DeleteAttribute = 3,
    CreateInheritanceRel = 4,
    DeleteInheritanceRel = 5,
    CreatePolicy = 6,
    DeletePolicy = 7,
}

impl AsyncKind {
    /// `None` for any code outside the fixed range; the dispatcher logs and drops these
    /// rather than treating them as a decode error.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::CreateResource),
            1 => Some(Self::DeleteResource),
            2 => Some(Self::PutAttribute),
            3 => Some(Self::DeleteAttribute),
            4 => Some(Self::CreateInheritanceRel),
            5 => Some(Self::DeleteInheritanceRel),
            6 => Some(Self::CreatePolicy),
            7 => Some(Self::DeletePolicy),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateInheritanceRelReq {
    pub parent: String,
    pub child: String,
    pub kind: oort_model::RelationKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteInheritanceRelReq {
    pub parent: String,
    pub child: String,
    pub kind: oort_model::RelationKind,
}

/// The envelope published on the single administrative subject: `kind` drives which
/// payload type `payload` decodes as, `reply_subject` is where the [`AsyncReply`] goes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsyncEnvelope {
    pub kind: AsyncKind,
    pub payload: Vec<u8>,
    pub reply_subject: String,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct AsyncReply {
    pub error: Option<ErrorPayload>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_record, encode_record};

    #[test]
    fn async_kind_round_trips_through_its_numeric_code() {
        for kind in [
            AsyncKind::CreateResource,
            AsyncKind::DeleteResource,
            AsyncKind::PutAttribute,
            AsyncKind::DeleteAttribute,
            AsyncKind::CreateInheritanceRel,
            AsyncKind::DeleteInheritanceRel,
            AsyncKind::CreatePolicy,
            AsyncKind::DeletePolicy,
        ] {
            assert_eq!(AsyncKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn unknown_async_kind_code_is_none_not_an_error() {
        assert_eq!(AsyncKind::from_code(200), None);
    }

    #[test]
    fn sync_request_round_trips_through_the_wire_codec() {
        let req = SyncRequest::CheckPermission(CheckPermissionReq {
            principal: "alice".into(),
            resource: "doc-1".into(),
            permission_name: "read".into(),
            env: vec![("region".into(), AttributeValue::String("eu".into()))],
        });
        let bytes = encode_record(&req).unwrap();
        let (decoded, _): (SyncRequest, usize) = decode_record(&bytes).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn async_envelope_round_trips_its_inner_payload() {
        let inner = CreateResourceReq { name: "doc-1".into() };
        let envelope = AsyncEnvelope {
            kind: AsyncKind::CreateResource,
            payload: encode_record(&inner).unwrap(),
            reply_subject: "reply.1".into(),
        };
        let bytes = encode_record(&envelope).unwrap();
        let (decoded, _): (AsyncEnvelope, usize) = decode_record(&bytes).unwrap();
        assert_eq!(decoded.kind, AsyncKind::CreateResource);
        let (decoded_inner, _): (CreateResourceReq, usize) = decode_record(&decoded.payload).unwrap();
        assert_eq!(decoded_inner, inner);
    }
}
