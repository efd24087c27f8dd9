// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administration: composes a [`oort_store::Store`] mutation with outbox
//! event generation so a caller either observes both or neither.
//!
//! Mirrors the original `TransactionManager.WriteTransaction` (`transaction_manager.go`):
//! run the mutation, call the per-op outbox factory, and roll back if the factory
//! fails to produce a payload. The concrete driver transaction is out of scope; against this in-memory reference backend, "rollback" means undoing the mutation
//! with its own inverse Store call.

use std::time::{SystemTime, UNIX_EPOCH};

use oort_model::{Attribute, Error, OutboxMessage, Permission, PermissionKind, Resource, RelationKind};
use oort_store::{OutboxSink, Store};
use oort_wire::DomainEvent;
use tracing::{info, instrument, warn};

/// Wraps a `Store + OutboxSink` backend, giving every mutation an outbox-generating
/// transaction boundary.
pub struct Administration<S> {
    store: S,
}

impl<S> Administration<S>
where
    S: Store + OutboxSink,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(skip(self), fields(resource = %name))]
    pub fn create_resource(&mut self, name: &Resource) -> Result<(), Error> {
        self.store.create_resource(name)?;
        self.commit_or_rollback(
            DomainEvent::ResourceCreated { name: name.name().to_string() },
            |store| store.delete_resource(name),
        )
    }

    #[instrument(skip(self), fields(resource = %name))]
    pub fn delete_resource(&mut self, name: &Resource) -> Result<(), Error> {
        self.store.delete_resource(name)?;
        self.commit_or_rollback(DomainEvent::ResourceDeleted { name: name.name().to_string() }, |_| {
            warn!("cannot roll back a committed DeleteResource; subtree is already gone");
            Ok(())
        })
    }

    /// Upserts: creates the attribute if absent, otherwise updates it.
    #[instrument(skip(self, attribute), fields(resource = %resource, attribute = attribute.name()))]
    pub fn put_attribute(&mut self, resource: &Resource, attribute: Attribute) -> Result<(), Error> {
        let name = attribute.name().to_string();
        match self.store.create_attribute(resource, attribute.clone()) {
            Ok(()) => self.commit_or_rollback(
                DomainEvent::AttributePut { resource: resource.name().to_string(), name: name.clone() },
                |store| store.delete_attribute(resource, &name),
            ),
            Err(Error::AlreadyExists(_)) => {
                self.store.update_attribute(resource, attribute)?;
                self.commit_or_rollback(
                    DomainEvent::AttributePut { resource: resource.name().to_string(), name },
                    |_| Ok(()),
                )
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(skip(self), fields(resource = %resource, attribute = name))]
    pub fn delete_attribute(&mut self, resource: &Resource, name: &str) -> Result<(), Error> {
        self.store.delete_attribute(resource, name)?;
        self.commit_or_rollback(
            DomainEvent::AttributeDeleted { resource: resource.name().to_string(), name: name.to_string() },
            |_| Ok(()),
        )
    }

    #[instrument(skip(self), fields(%parent, %child, ?kind))]
    pub fn create_rel(&mut self, kind: RelationKind, parent: &Resource, child: &Resource) -> Result<(), Error> {
        self.store.create_rel(kind, parent, child)?;
        self.commit_or_rollback(
            DomainEvent::RelCreated { kind, parent: parent.name().to_string(), child: child.name().to_string() },
            |store| store.delete_rel(kind, parent, child),
        )
    }

    #[instrument(skip(self), fields(%parent, %child, ?kind))]
    pub fn delete_rel(&mut self, kind: RelationKind, parent: &Resource, child: &Resource) -> Result<(), Error> {
        self.store.delete_rel(kind, parent, child)?;
        self.commit_or_rollback(
            DomainEvent::RelDeleted { kind, parent: parent.name().to_string(), child: child.name().to_string() },
            |store| store.create_rel(kind, parent, child),
        )
    }

    #[instrument(skip(self, permission), fields(%subject, %object, name = permission.name()))]
    pub fn create_permission(
        &mut self,
        subject: &Resource,
        object: &Resource,
        permission: Permission,
    ) -> Result<(), Error> {
        let (name, kind) = (permission.name().to_string(), permission.kind());
        self.store.create_permission(subject, object, permission)?;
        self.commit_or_rollback(
            DomainEvent::PermissionCreated {
                subject: subject.name().to_string(),
                object: object.name().to_string(),
                name: name.clone(),
                kind: oort_wire::permission_kind_code(kind),
            },
            |store| store.delete_permission(subject, object, &name, kind),
        )
    }

    #[instrument(skip(self), fields(%subject, %object, name))]
    pub fn delete_permission(
        &mut self,
        subject: &Resource,
        object: &Resource,
        name: &str,
        kind: PermissionKind,
    ) -> Result<(), Error> {
        self.store.delete_permission(subject, object, name, kind)?;
        self.commit_or_rollback(
            DomainEvent::PermissionDeleted {
                subject: subject.name().to_string(),
                object: object.name().to_string(),
                name: name.to_string(),
                kind: oort_wire::permission_kind_code(kind),
            },
            |_| Ok(()),
        )
    }

    /// Encodes `event`, appends it as an outbox row on success, or invokes `rollback` and
    /// fails with [`Error::OutboxGenerationFailed`] if encoding fails.
    fn commit_or_rollback(
        &mut self,
        event: DomainEvent,
        rollback: impl FnOnce(&mut S) -> Result<(), Error>,
    ) -> Result<(), Error> {
        match oort_wire::encode_record(&event) {
            Ok(payload) => {
                let id = format!("{:032x}", rand::random::<u128>());
                let timestamp_ms = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis() as i64)
                    .unwrap_or_default();
                self.store.append_outbox(OutboxMessage::new(id, payload, timestamp_ms))?;
                info!(?event, "mutation committed with outbox event");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "outbox event could not be generated, rolling back");
                if let Err(rollback_err) = rollback(&mut self.store) {
                    warn!(%rollback_err, "rollback itself failed");
                }
                Err(Error::OutboxGenerationFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use oort_model::{Condition, Resource};
    use oort_store::NonCachedStore;

    use super::*;

    #[test]
    fn create_resource_appends_exactly_one_outbox_row() {
        let mut admin = Administration::new(NonCachedStore::new());
        let a = Resource::new("a").unwrap();
        admin.create_resource(&a).unwrap();

        let pending = admin.store.fetch_undelivered(10).unwrap();
        assert_eq!(pending.len(), 1);
        let (event, _): (DomainEvent, usize) = oort_wire::decode_record(pending[0].payload()).unwrap();
        assert_eq!(event, DomainEvent::ResourceCreated { name: "a".into() });
    }

    #[test]
    fn failed_mutation_produces_no_outbox_row() {
        let mut admin = Administration::new(NonCachedStore::new());
        let a = Resource::new("a").unwrap();
        admin.create_resource(&a).unwrap();

        assert!(admin.create_resource(&a).is_err());
        assert_eq!(admin.store.fetch_undelivered(10).unwrap().len(), 1);
    }

    #[test]
    fn put_attribute_creates_then_updates() {
        let mut admin = Administration::new(NonCachedStore::new());
        let a = Resource::new("a").unwrap();
        admin.create_resource(&a).unwrap();

        admin
            .put_attribute(&a, Attribute::new("region", oort_model::AttributeValue::String("eu".into())).unwrap())
            .unwrap();
        admin
            .put_attribute(&a, Attribute::new("region", oort_model::AttributeValue::String("us".into())).unwrap())
            .unwrap();

        let record = admin.store.get_resource(&a).unwrap();
        assert_eq!(record.attributes.len(), 1);
        assert_eq!(record.attributes[0].value(), &oort_model::AttributeValue::String("us".into()));
    }

    #[test]
    fn create_permission_round_trips_through_the_event() {
        let mut admin = Administration::new(NonCachedStore::new());
        let a = Resource::new("a").unwrap();
        let b = Resource::new("b").unwrap();
        admin.create_resource(&a).unwrap();
        admin.create_resource(&b).unwrap();

        admin
            .create_permission(
                &a,
                &b,
                Permission::new("read", PermissionKind::Allow, Condition::always()).unwrap(),
            )
            .unwrap();

        let effective = admin.store.get_effective_permissions(&a, &b, "read").unwrap();
        assert_eq!(effective.len(), 1);
    }
}
