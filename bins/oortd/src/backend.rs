// SPDX-License-Identifier: MIT OR Apache-2.0

//! Picks between the two `Store` strategies at startup (`CACHED_PERMISSIONS`),
//! giving `Administration`/`SyncDispatcher`/`AsyncDispatcher` one concrete type to be
//! generic over regardless of which strategy was selected.

use oort_model::{Attribute, EffectivePermission, Error, OutboxMessage, Permission, PermissionKind, RelationKind, Resource};
use oort_store::{CachedStore, NonCachedStore, OutboxSink, ResourceRecord, Store};

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

macro_rules! delegate {
    ($self:ident, $method:ident($($arg:expr),*)) => {
        match $self {
            Backend::NonCached(store) => store.$method($($arg),*),
            Backend::Cached(store) => store.$method($($arg),*),
        }
    };
}

impl Store for Backend {
    fn create_resource(&mut self, name: &Resource) -> Result<(), Error> {
        delegate!(self, create_resource(name))
    }

    fn delete_resource(&mut self, name: &Resource) -> Result<(), Error> {
        delegate!(self, delete_resource(name))
    }

    fn create_attribute(&mut self, resource: &Resource, attribute: Attribute) -> Result<(), Error> {
        delegate!(self, create_attribute(resource, attribute))
    }

    fn update_attribute(&mut self, resource: &Resource, attribute: Attribute) -> Result<(), Error> {
        delegate!(self, update_attribute(resource, attribute))
    }

    fn delete_attribute(&mut self, resource: &Resource, name: &str) -> Result<(), Error> {
        delegate!(self, delete_attribute(resource, name))
    }

    fn create_rel(&mut self, kind: RelationKind, parent: &Resource, child: &Resource) -> Result<(), Error> {
        delegate!(self, create_rel(kind, parent, child))
    }

    fn delete_rel(&mut self, kind: RelationKind, parent: &Resource, child: &Resource) -> Result<(), Error> {
        delegate!(self, delete_rel(kind, parent, child))
    }

    fn create_permission(&mut self, subject: &Resource, object: &Resource, permission: Permission) -> Result<(), Error> {
        delegate!(self, create_permission(subject, object, permission))
    }

    fn delete_permission(
        &mut self,
        subject: &Resource,
        object: &Resource,
        name: &str,
        kind: PermissionKind,
    ) -> Result<(), Error> {
        delegate!(self, delete_permission(subject, object, name, kind))
    }

    fn get_resource(&self, name: &Resource) -> Result<ResourceRecord, Error> {
        delegate!(self, get_resource(name))
    }

    fn get_effective_permissions(
        &self,
        subject: &Resource,
        object: &Resource,
        name: &str,
    ) -> Result<Vec<EffectivePermission>, Error> {
        delegate!(self, get_effective_permissions(subject, object, name))
    }
}

impl OutboxSink for Backend {
    fn append_outbox(&mut self, message: OutboxMessage) -> Result<(), Error> {
        delegate!(self, append_outbox(message))
    }

    fn fetch_undelivered(&self, limit: usize) -> Result<Vec<OutboxMessage>, Error> {
        delegate!(self, fetch_undelivered(limit))
    }

    fn mark_delivered(&mut self, id: &str) -> Result<(), Error> {
        delegate!(self, mark_delivered(id))
    }
}
