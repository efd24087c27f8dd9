// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use oort_model::{
    Attribute, EffectivePermission, Error, OutboxMessage, Permission, PermissionKind, Resource, RelationKind,
};
use tracing::instrument;

use crate::base::GraphStore;
use crate::ids::ResourceId;
use crate::store::{OutboxSink, ResourceRecord, Store};

/// Writes only direct edges; effective permissions are computed by path search at read
/// time, bounded at [`crate::graph::MAX_PATH_LEN`] hops. Serves as the
/// correctness oracle for [`crate::CachedStore`] in differential testing.
#[derive(Debug, Default)]
pub struct NonCachedStore {
    graph: GraphStore,
}

impl NonCachedStore {
    pub fn new() -> Self {
        Self {
            graph: GraphStore::new(),
        }
    }
}

impl Store for NonCachedStore {
    #[instrument(skip(self), fields(resource = %name))]
    fn create_resource(&mut self, name: &Resource) -> Result<(), Error> {
        self.graph.create_resource(name)?;
        Ok(())
    }

    #[instrument(skip(self), fields(resource = %name))]
    fn delete_resource(&mut self, name: &Resource) -> Result<(), Error> {
        let subtree = self.graph.delete_resource_subtree(name)?;
        self.graph.remove_permissions_touching(&subtree);
        Ok(())
    }

    fn create_attribute(&mut self, resource: &Resource, attribute: Attribute) -> Result<(), Error> {
        self.graph.create_attribute(resource, attribute)
    }

    fn update_attribute(&mut self, resource: &Resource, attribute: Attribute) -> Result<(), Error> {
        self.graph.update_attribute(resource, attribute)
    }

    fn delete_attribute(&mut self, resource: &Resource, name: &str) -> Result<(), Error> {
        self.graph.delete_attribute(resource, name)
    }

    #[instrument(skip(self), fields(%parent, %child, ?kind))]
    fn create_rel(&mut self, kind: RelationKind, parent: &Resource, child: &Resource) -> Result<(), Error> {
        self.graph.create_rel_edge(kind, parent, child)?;
        Ok(())
    }

    #[instrument(skip(self), fields(%parent, %child, ?kind))]
    fn delete_rel(&mut self, kind: RelationKind, parent: &Resource, child: &Resource) -> Result<(), Error> {
        self.graph.delete_rel_edge(kind, parent, child)?;
        Ok(())
    }

    #[instrument(skip(self, permission), fields(%subject, %object, name = permission.name()))]
    fn create_permission(
        &mut self,
        subject: &Resource,
        object: &Resource,
        permission: Permission,
    ) -> Result<(), Error> {
        self.graph.create_permission_record(subject, object, permission)?;
        Ok(())
    }

    #[instrument(skip(self), fields(%subject, %object, name))]
    fn delete_permission(
        &mut self,
        subject: &Resource,
        object: &Resource,
        name: &str,
        kind: PermissionKind,
    ) -> Result<(), Error> {
        self.graph.remove_permission_record(subject, object, name, kind)?;
        Ok(())
    }

    fn get_resource(&self, name: &Resource) -> Result<ResourceRecord, Error> {
        let id = self.graph.resolve(name)?;
        Ok(ResourceRecord {
            resource: name.clone(),
            attributes: self.graph.list_attributes(id),
        })
    }

    fn get_effective_permissions(
        &self,
        subject: &Resource,
        object: &Resource,
        name: &str,
    ) -> Result<Vec<EffectivePermission>, Error> {
        let subject_id = self.graph.resolve(subject)?;
        let object_id = self.graph.resolve(object)?;

        let sub_ancestors = ancestor_distances(&self.graph, subject_id);
        let obj_ancestors = ancestor_distances(&self.graph, object_id);

        let mut out = Vec::new();
        for record in self.graph.permissions.values() {
            if record.permission.name() != name {
                continue;
            }
            let (Some(&sub_dist), Some(&obj_dist)) =
                (sub_ancestors.get(&record.subject), obj_ancestors.get(&record.object))
            else {
                continue;
            };
            out.push(EffectivePermission {
                name: record.permission.name().to_string(),
                kind: record.permission.kind(),
                condition: record.permission.condition().clone(),
                sub_priority: -(sub_dist as i64),
                obj_priority: -(obj_dist as i64),
            });
        }
        Ok(out)
    }
}

impl OutboxSink for NonCachedStore {
    fn append_outbox(&mut self, message: OutboxMessage) -> Result<(), Error> {
        self.graph.append_outbox(message);
        Ok(())
    }

    fn fetch_undelivered(&self, limit: usize) -> Result<Vec<OutboxMessage>, Error> {
        Ok(self.graph.fetch_undelivered(limit))
    }

    fn mark_delivered(&mut self, id: &str) -> Result<(), Error> {
        self.graph.mark_delivered(id)
    }
}

/// `ancestor -> distance` for every node from which `start` is reachable, including
/// `start` itself at distance 0 (a direct assignment).
fn ancestor_distances(graph: &GraphStore, start: ResourceId) -> HashMap<ResourceId, usize> {
    let mut map: HashMap<ResourceId, usize> = graph.includes.ancestors_within(start).into_iter().collect();
    map.insert(start, 0);
    map
}
