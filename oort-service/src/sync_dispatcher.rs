// SPDX-License-Identifier: MIT OR Apache-2.0

//! The synchronous request/response surface: one method per
//! `SyncRequest` variant, returning an explicit success or error.

use oort_admin::Administration;
use oort_model::{Attribute, Error, Permission, Resource};
use oort_store::{OutboxSink, Store};
use oort_wire::{
    AttributeRecord, CheckPermissionResp, ErrorPayload, GetResourceResp, MutationResp, SyncRequest, SyncResponse,
};

use crate::evaluator::Evaluator;

/// Wraps [`Administration`] and an [`Evaluator`] over the same store, matching every
/// variant of [`SyncRequest`] to its handler.
pub struct SyncDispatcher<S> {
    admin: Administration<S>,
}

impl<S> SyncDispatcher<S>
where
    S: Store + OutboxSink,
{
    pub fn new(admin: Administration<S>) -> Self {
        Self { admin }
    }

    pub fn dispatch(&mut self, request: SyncRequest) -> SyncResponse {
        match request {
            SyncRequest::CheckPermission(req) => {
                let result = (|| {
                    let principal = Resource::new(req.principal)?;
                    let resource = Resource::new(req.resource)?;
                    Evaluator::new(self.admin.store()).check(&principal, &resource, &req.permission_name, req.env)
                })();
                match result {
                    Ok(decision) => SyncResponse::CheckPermission(CheckPermissionResp { allowed: decision.allowed }),
                    Err(err) => {
                        tracing::warn!(%err, "CheckPermission failed");
                        SyncResponse::CheckPermission(CheckPermissionResp { allowed: false })
                    }
                }
            }
            SyncRequest::CreateResource(req) => {
                self.mutate(|admin| Resource::new(req.name).and_then(|name| admin.create_resource(&name)))
            }
            SyncRequest::DeleteResource(req) => {
                self.mutate(|admin| Resource::new(req.name).and_then(|name| admin.delete_resource(&name)))
            }
            SyncRequest::PutAttribute(req) => self.mutate(|admin| {
                let resource = Resource::new(req.resource)?;
                let attribute = Attribute::new(req.name, req.value)?;
                admin.put_attribute(&resource, attribute)
            }),
            SyncRequest::DeleteAttribute(req) => self.mutate(|admin| {
                let resource = Resource::new(req.resource)?;
                admin.delete_attribute(&resource, &req.name)
            }),
            SyncRequest::CreateCompositionRel(req) => self.mutate(|admin| {
                let parent = Resource::new(req.parent)?;
                let child = Resource::new(req.child)?;
                admin.create_rel(oort_model::RelationKind::Composition, &parent, &child)
            }),
            SyncRequest::DeleteCompositionRel(req) => self.mutate(|admin| {
                let parent = Resource::new(req.parent)?;
                let child = Resource::new(req.child)?;
                admin.delete_rel(oort_model::RelationKind::Composition, &parent, &child)
            }),
            SyncRequest::CreateAggregationRel(req) => self.mutate(|admin| {
                let parent = Resource::new(req.parent)?;
                let child = Resource::new(req.child)?;
                admin.create_rel(oort_model::RelationKind::Aggregation, &parent, &child)
            }),
            SyncRequest::DeleteAggregationRel(req) => self.mutate(|admin| {
                let parent = Resource::new(req.parent)?;
                let child = Resource::new(req.child)?;
                admin.delete_rel(oort_model::RelationKind::Aggregation, &parent, &child)
            }),
            SyncRequest::CreatePermission(req) => self.mutate(|admin| {
                let subject = Resource::new(req.subject)?;
                let object = Resource::new(req.object)?;
                let kind = oort_wire::permission_kind_from_code(req.kind)
                    .map_err(|err| Error::InvalidArg(err.to_string()))?;
                let permission = Permission::new(req.name, kind, oort_model::Condition::new(req.condition))?;
                admin.create_permission(&subject, &object, permission)
            }),
            SyncRequest::DeletePermission(req) => self.mutate(|admin| {
                let subject = Resource::new(req.subject)?;
                let object = Resource::new(req.object)?;
                let kind = oort_wire::permission_kind_from_code(req.kind)
                    .map_err(|err| Error::InvalidArg(err.to_string()))?;
                admin.delete_permission(&subject, &object, &req.name, kind)
            }),
            SyncRequest::GetResource(req) => {
                match Resource::new(req.name).and_then(|name| self.admin.store().get_resource(&name)) {
                    Ok(record) => SyncResponse::GetResource(GetResourceResp {
                        name: record.resource.name().to_string(),
                        attributes: record
                            .attributes
                            .into_iter()
                            .map(|a| AttributeRecord { name: a.name().to_string(), value: a.value().clone() })
                            .collect(),
                    }),
                    Err(err) => {
                        tracing::warn!(%err, "GetResource failed");
                        SyncResponse::GetResource(GetResourceResp { name: String::new(), attributes: vec![] })
                    }
                }
            }
        }
    }

    fn mutate(&mut self, op: impl FnOnce(&mut Administration<S>) -> Result<(), Error>) -> SyncResponse {
        match op(&mut self.admin) {
            Ok(()) => SyncResponse::Mutation(MutationResp { error: None }),
            Err(err) => {
                tracing::warn!(%err, "mutation failed");
                SyncResponse::Mutation(MutationResp { error: Some(error_payload(&err)) })
            }
        }
    }
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
