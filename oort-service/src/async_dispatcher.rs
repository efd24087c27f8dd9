// SPDX-License-Identifier: MIT OR Apache-2.0

//! The administrative async bus surface: one subject
//! carrying an [`AsyncEnvelope`] per mutation, dispatched by `kind`.
//!
//! Mirrors `administrator_async.go`'s flat switch: an envelope with an unrecognized kind,
//! or a payload that fails to decode for its kind, is logged and dropped rather than
//! replied to — there is no caller on the other end of a fire-and-forget bus message to
//! receive an error.

use oort_model::{Attribute, Error, Permission, Resource};
use oort_store::{OutboxSink, Store};
use oort_wire::{
    AsyncEnvelope, AsyncKind, AsyncReply, CreateInheritanceRelReq, CreatePermissionReq, CreateResourceReq,
    DeleteAttributeReq, DeleteInheritanceRelReq, DeletePermissionReq, DeleteResourceReq, ErrorPayload,
    PutAttributeReq,
};
use tracing::{debug, warn};

use oort_admin::Administration;

/// A dispatched envelope's outcome: where to publish the reply, and its encoded bytes.
/// `None` from [`AsyncDispatcher::dispatch`] means the envelope was dropped silently —
/// there is nothing to publish.
pub struct DispatchedReply {
    pub reply_subject: String,
    pub payload: Vec<u8>,
}

pub struct AsyncDispatcher<S> {
    admin: Administration<S>,
}

impl<S> AsyncDispatcher<S>
where
    S: Store + OutboxSink,
{
    pub fn new(admin: Administration<S>) -> Self {
        Self { admin }
    }

    pub fn dispatch(&mut self, envelope: &AsyncEnvelope) -> Option<DispatchedReply> {
        let result = self.handle(envelope);
        let reply = match result {
            Ok(()) => AsyncReply { error: None },
            Err(DispatchError::Decode) => {
                debug!(kind = ?envelope.kind, "async envelope payload failed to decode, dropping");
                return None;
            }
            Err(DispatchError::Mutation(err)) => {
                warn!(kind = ?envelope.kind, %err, "async mutation failed");
                AsyncReply { error: Some(error_payload(&err)) }
            }
        };

        match oort_wire::encode_record(&reply) {
            Ok(payload) => Some(DispatchedReply { reply_subject: envelope.reply_subject.clone(), payload }),
            Err(err) => {
                warn!(%err, "failed to encode async reply, dropping");
                None
            }
        }
    }

    fn handle(&mut self, envelope: &AsyncEnvelope) -> Result<(), DispatchError> {
        match envelope.kind {
            AsyncKind::CreateResource => {
                let req: CreateResourceReq = decode(&envelope.payload)?;
                let name = Resource::new(req.name).map_err(DispatchError::Mutation)?;
                self.admin.create_resource(&name).map_err(DispatchError::Mutation)
            }
            AsyncKind::DeleteResource => {
                let req: DeleteResourceReq = decode(&envelope.payload)?;
                let name = Resource::new(req.name).map_err(DispatchError::Mutation)?;
                self.admin.delete_resource(&name).map_err(DispatchError::Mutation)
            }
            AsyncKind::PutAttribute => {
                let req: PutAttributeReq = decode(&envelope.payload)?;
                let resource = Resource::new(req.resource).map_err(DispatchError::Mutation)?;
                let attribute = Attribute::new(req.name, req.value).map_err(DispatchError::Mutation)?;
                self.admin.put_attribute(&resource, attribute).map_err(DispatchError::Mutation)
            }
            AsyncKind::DeleteAttribute => {
                let req: DeleteAttributeReq = decode(&envelope.payload)?;
                let resource = Resource::new(req.resource).map_err(DispatchError::Mutation)?;
                self.admin.delete_attribute(&resource, &req.name).map_err(DispatchError::Mutation)
            }
            AsyncKind::CreateInheritanceRel => {
                let req: CreateInheritanceRelReq = decode(&envelope.payload)?;
                let parent = Resource::new(req.parent).map_err(DispatchError::Mutation)?;
                let child = Resource::new(req.child).map_err(DispatchError::Mutation)?;
                self.admin.create_rel(req.kind, &parent, &child).map_err(DispatchError::Mutation)
            }
            AsyncKind::DeleteInheritanceRel => {
                let req: DeleteInheritanceRelReq = decode(&envelope.payload)?;
                let parent = Resource::new(req.parent).map_err(DispatchError::Mutation)?;
                let child = Resource::new(req.child).map_err(DispatchError::Mutation)?;
                self.admin.delete_rel(req.kind, &parent, &child).map_err(DispatchError::Mutation)
            }
            AsyncKind::CreatePolicy => {
                let req: CreatePermissionReq = decode(&envelope.payload)?;
                let subject = Resource::new(req.subject).map_err(DispatchError::Mutation)?;
                let object = Resource::new(req.object).map_err(DispatchError::Mutation)?;
                let kind = oort_wire::permission_kind_from_code(req.kind).map_err(|_| DispatchError::Decode)?;
                let permission =
                    Permission::new(req.name, kind, oort_model::Condition::new(req.condition)).map_err(DispatchError::Mutation)?;
                self.admin.create_permission(&subject, &object, permission).map_err(DispatchError::Mutation)
            }
            AsyncKind::DeletePolicy => {
                let req: DeletePermissionReq = decode(&envelope.payload)?;
                let subject = Resource::new(req.subject).map_err(DispatchError::Mutation)?;
                let object = Resource::new(req.object).map_err(DispatchError::Mutation)?;
                let kind = oort_wire::permission_kind_from_code(req.kind).map_err(|_| DispatchError::Decode)?;
                self.admin.delete_permission(&subject, &object, &req.name, kind).map_err(DispatchError::Mutation)
            }
        }
    }
}

enum DispatchError {
    Decode,
    Mutation(Error),
}

fn decode<T: serde::de::DeserializeOwned>(payload: &[u8]) -> Result<T, DispatchError> {
    oort_wire::decode_record(payload).map(|(value, _)| value).map_err(|_| DispatchError::Decode)
}

fn error_payload(err: &Error) -> ErrorPayload {
    let code = match err {
        Error::NotFound(_) => "NOT_FOUND",
        Error::AlreadyExists(_) => "ALREADY_EXISTS",
        Error::InvalidArg(_) => "INVALID_ARG",
        Error::CycleDetected => "CYCLE_DETECTED",
        Error::KindMismatch { .. } => "KIND_MISMATCH",
        Error::OutboxGenerationFailed => "OUTBOX_GENERATION_FAILED",
        Error::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        Error::Internal(_) => "INTERNAL",
    };
    ErrorPayload { code: code.to_string(), message: err.to_string() }
}

#[cfg(test)]
mod tests {
    use oort_model::AttributeValue;
    use oort_store::NonCachedStore;

    use super::*;

    fn envelope(kind: AsyncKind, payload: impl serde::Serialize) -> AsyncEnvelope {
        AsyncEnvelope { kind, payload: oort_wire::encode_record(&payload).unwrap(), reply_subject: "reply.1".into() }
    }

    #[test]
    fn successful_mutation_produces_an_error_free_reply() {
        let mut dispatcher = AsyncDispatcher::new(Administration::new(NonCachedStore::new()));
        let reply = dispatcher
            .dispatch(&envelope(AsyncKind::CreateResource, CreateResourceReq { name: "a".into() }))
            .unwrap();
        assert_eq!(reply.reply_subject, "reply.1");
        let (decoded, _): (AsyncReply, usize) = oort_wire::decode_record(&reply.payload).unwrap();
        assert!(decoded.error.is_none());
    }

    #[test]
    fn failed_mutation_produces_a_reply_with_an_error_payload() {
        let mut dispatcher = AsyncDispatcher::new(Administration::new(NonCachedStore::new()));
        dispatcher
            .dispatch(&envelope(AsyncKind::CreateResource, CreateResourceReq { name: "a".into() }))
            .unwrap();
        let reply = dispatcher
            .dispatch(&envelope(AsyncKind::CreateResource, CreateResourceReq { name: "a".into() }))
            .unwrap();
        let (decoded, _): (AsyncReply, usize) = oort_wire::decode_record(&reply.payload).unwrap();
        assert_eq!(decoded.error.unwrap().code, "ALREADY_EXISTS");
    }

    #[test]
    fn malformed_payload_is_dropped_silently() {
        let mut dispatcher = AsyncDispatcher::new(Administration::new(NonCachedStore::new()));
        let envelope = AsyncEnvelope {
            kind: AsyncKind::CreateResource,
            payload: vec![0xff, 0x00],
            reply_subject: "reply.1".into(),
        };
        assert!(dispatcher.dispatch(&envelope).is_none());
    }

    #[test]
    fn put_attribute_round_trips_through_the_bus() {
        let mut dispatcher = AsyncDispatcher::new(Administration::new(NonCachedStore::new()));
        dispatcher
            .dispatch(&envelope(AsyncKind::CreateResource, CreateResourceReq { name: "a".into() }))
            .unwrap();
        let reply = dispatcher
            .dispatch(&envelope(
                AsyncKind::PutAttribute,
                PutAttributeReq { resource: "a".into(), name: "region".into(), value: AttributeValue::String("eu".into()) },
            ))
            .unwrap();
        let (decoded, _): (AsyncReply, usize) = oort_wire::decode_record(&reply.payload).unwrap();
        assert!(decoded.error.is_none());
    }
}
