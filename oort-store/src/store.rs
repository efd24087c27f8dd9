// SPDX-License-Identifier: MIT OR Apache-2.0

use oort_model::{
    Attribute, EffectivePermission, Error, OutboxMessage, Permission, PermissionKind, Resource, RelationKind,
};

/// A resource together with the attributes attached to it, as returned by
/// [`Store::get_resource`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceRecord {
    pub resource: Resource,
    pub attributes: Vec<Attribute>,
}

/// The transactional graph store: atomic mutations plus snapshot-consistent
/// queries, keyed by resource name.
///
/// Both [`crate::NonCachedStore`] and [`crate::CachedStore`] implement this trait and honor
/// identical read contracts; only their write-path inheritance maintenance differs. The
/// error type is the shared taxonomy in [`oort_model::Error`] rather than an associated
/// type, since every consumer in this workspace (`oort-admin`, `oort-service`) needs one
/// concrete error to propagate.
pub trait Store {
    fn create_resource(&mut self, name: &Resource) -> Result<(), Error>;

    fn delete_resource(&mut self, name: &Resource) -> Result<(), Error>;

    fn create_attribute(&mut self, resource: &Resource, attribute: Attribute) -> Result<(), Error>;

    fn update_attribute(&mut self, resource: &Resource, attribute: Attribute) -> Result<(), Error>;

    fn delete_attribute(&mut self, resource: &Resource, name: &str) -> Result<(), Error>;

    fn create_rel(&mut self, kind: RelationKind, parent: &Resource, child: &Resource) -> Result<(), Error>;

    fn delete_rel(&mut self, kind: RelationKind, parent: &Resource, child: &Resource) -> Result<(), Error>;

    fn create_permission(
        &mut self,
        subject: &Resource,
        object: &Resource,
        permission: Permission,
    ) -> Result<(), Error>;

    fn delete_permission(
        &mut self,
        subject: &Resource,
        object: &Resource,
        name: &str,
        kind: PermissionKind,
    ) -> Result<(), Error>;

    fn get_resource(&self, name: &Resource) -> Result<ResourceRecord, Error>;

    fn get_effective_permissions(
        &self,
        subject: &Resource,
        object: &Resource,
        name: &str,
    ) -> Result<Vec<EffectivePermission>, Error>;
}

/// The outbox collection that lives alongside the graph. `Administration` appends
/// through this in the same call that performs the mutation it describes; the
/// Outbox Poller (`oort-outbox`) only ever fetches and marks through it.
pub trait OutboxSink {
    fn append_outbox(&mut self, message: OutboxMessage) -> Result<(), Error>;

    fn fetch_undelivered(&self, limit: usize) -> Result<Vec<OutboxMessage>, Error>;

    fn mark_delivered(&mut self, id: &str) -> Result<(), Error>;
}
