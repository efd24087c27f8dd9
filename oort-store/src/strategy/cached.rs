// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;

use oort_model::{
    Attribute, EffectivePermission, Error, OutboxMessage, Permission, PermissionKind, Resource, RelationKind,
};
use tracing::instrument;

use crate::base::GraphStore;
use crate::graph::MAX_PATH_LEN;
use crate::ids::{PermissionId, ResourceId};
use crate::store::{OutboxSink, ResourceRecord, Store};

/// One materialized inherited-permission edge: `resource -Has/On{priority}-> permission`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct InheritedEdge {
    resource: ResourceId,
    permission: PermissionId,
    priority: i64,
}

/// Materializes inherited `Has`/`On` edges at write time, so reads never walk the graph:
/// every mutation that changes reachability or permissions also patches this edge set.
#[derive(Debug, Default)]
pub struct CachedStore {
    graph: GraphStore,
    has_edges: Vec<InheritedEdge>,
    on_edges: Vec<InheritedEdge>,
}

impl CachedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descendants of `start` reachable within [`MAX_PATH_LEN`], including `start` itself
    /// at distance 0 (a direct assignment).
    fn reachable_from(&self, start: ResourceId) -> Vec<(ResourceId, usize)> {
        let mut out = vec![(start, 0)];
        out.extend(self.graph.includes.descendants_within(start));
        out
    }

    /// On `CreateRel(parent, child)` (including the implicit Root attach on
    /// `CreateResource`): every `Has`/`On` edge already resting on `parent` extends, at
    /// `priority - (dist_from_child + 1)`, to `child` and everything newly reachable
    /// through it.
    fn materialize_new_paths(&mut self, parent: ResourceId, child: ResourceId) {
        let targets = self.reachable_from(child);

        let parent_has: Vec<InheritedEdge> =
            self.has_edges.iter().filter(|e| e.resource == parent).cloned().collect();
        for edge in &parent_has {
            for &(target, extra) in &targets {
                let dist = extra + 1;
                if dist > MAX_PATH_LEN {
                    continue;
                }
                self.has_edges.push(InheritedEdge {
                    resource: target,
                    permission: edge.permission,
                    priority: edge.priority - dist as i64,
                });
            }
        }

        let parent_on: Vec<InheritedEdge> =
            self.on_edges.iter().filter(|e| e.resource == parent).cloned().collect();
        for edge in &parent_on {
            for &(target, extra) in &targets {
                let dist = extra + 1;
                if dist > MAX_PATH_LEN {
                    continue;
                }
                self.on_edges.push(InheritedEdge {
                    resource: target,
                    permission: edge.permission,
                    priority: edge.priority - dist as i64,
                });
            }
        }
    }

    /// Inverse of [`Self::materialize_new_paths`]: retract exactly the edges that the
    /// `parent -> child` link is responsible for, deleting one matching
    /// `(resource, permission, priority)` entry per contribution and leaving any
    /// duplicate produced by a surviving alternate path untouched.
    fn retract_paths(&mut self, parent: ResourceId, child: ResourceId) {
        let targets = self.reachable_from(child);

        let parent_has: Vec<InheritedEdge> =
            self.has_edges.iter().filter(|e| e.resource == parent).cloned().collect();
        for edge in &parent_has {
            for &(target, extra) in &targets {
                let dist = extra + 1;
                let priority = edge.priority - dist as i64;
                remove_one(&mut self.has_edges, target, edge.permission, priority);
            }
        }

        let parent_on: Vec<InheritedEdge> =
            self.on_edges.iter().filter(|e| e.resource == parent).cloned().collect();
        for edge in &parent_on {
            for &(target, extra) in &targets {
                let dist = extra + 1;
                let priority = edge.priority - dist as i64;
                remove_one(&mut self.on_edges, target, edge.permission, priority);
            }
        }
    }

    /// Drops every boundary edge crossing into or out of `subtree` (relative to the rest
    /// of the graph) before the subtree's nodes disappear, retracting whatever inherited
    /// edges those specific crossings were responsible for.
    fn retract_subtree_boundary(&mut self, subtree: &[ResourceId]) {
        let subtree_set: HashSet<ResourceId> = subtree.iter().copied().collect();
        for &node in subtree {
            for parent in self.graph.includes.parents_of(node) {
                if !subtree_set.contains(&parent) {
                    self.retract_paths(parent, node);
                }
            }
            for child in self.graph.includes.children_of(node) {
                if !subtree_set.contains(&child) {
                    self.retract_paths(node, child);
                }
            }
        }
    }
}

fn remove_one(edges: &mut Vec<InheritedEdge>, resource: ResourceId, permission: PermissionId, priority: i64) {
    if let Some(pos) = edges
        .iter()
        .position(|e| e.resource == resource && e.permission == permission && e.priority == priority)
    {
        edges.remove(pos);
    }
}

impl Store for CachedStore {
    #[instrument(skip(self), fields(resource = %name))]
    fn create_resource(&mut self, name: &Resource) -> Result<(), Error> {
        let id = self.graph.create_resource(name)?;
        let root = self.graph.resolve(&Resource::root())?;
        self.materialize_new_paths(root, id);
        Ok(())
    }

    #[instrument(skip(self), fields(resource = %name))]
    fn delete_resource(&mut self, name: &Resource) -> Result<(), Error> {
        let id = self.graph.resolve(name)?;
        let mut subtree = self.graph.includes.composition_descendants(id);
        subtree.push(id);

        self.retract_subtree_boundary(&subtree);

        let removed = self.graph.delete_resource_subtree(name)?;
        let doomed = self.graph.remove_permissions_touching(&removed);

        let removed_set: HashSet<ResourceId> = removed.into_iter().collect();
        let doomed_set: HashSet<PermissionId> = doomed.into_iter().collect();
        self.has_edges
            .retain(|e| !removed_set.contains(&e.resource) && !doomed_set.contains(&e.permission));
        self.on_edges
            .retain(|e| !removed_set.contains(&e.resource) && !doomed_set.contains(&e.permission));
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
        let (parent_id, child_id) = self.graph.create_rel_edge(kind, parent, child)?;
        self.materialize_new_paths(parent_id, child_id);
        Ok(())
    }

    #[instrument(skip(self), fields(%parent, %child, ?kind))]
    fn delete_rel(&mut self, kind: RelationKind, parent: &Resource, child: &Resource) -> Result<(), Error> {
        let (parent_id, child_id) = self.graph.delete_rel_edge(kind, parent, child)?;
        self.retract_paths(parent_id, child_id);
        Ok(())
    }

    #[instrument(skip(self, permission), fields(%subject, %object, name = permission.name()))]
    fn create_permission(
        &mut self,
        subject: &Resource,
        object: &Resource,
        permission: Permission,
    ) -> Result<(), Error> {
        let (subject_id, object_id, id) = self.graph.create_permission_record(subject, object, permission)?;

        self.has_edges.push(InheritedEdge {
            resource: subject_id,
            permission: id,
            priority: 0,
        });
        for (descendant, dist) in self.graph.includes.descendants_within(subject_id) {
            self.has_edges.push(InheritedEdge {
                resource: descendant,
                permission: id,
                priority: -(dist as i64),
            });
        }

        self.on_edges.push(InheritedEdge {
            resource: object_id,
            permission: id,
            priority: 0,
        });
        for (descendant, dist) in self.graph.includes.descendants_within(object_id) {
            self.on_edges.push(InheritedEdge {
                resource: descendant,
                permission: id,
                priority: -(dist as i64),
            });
        }
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
        let id = self.graph.remove_permission_record(subject, object, name, kind)?;
        self.has_edges.retain(|e| e.permission != id);
        self.on_edges.retain(|e| e.permission != id);
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

        let mut out = Vec::new();
        for (&id, record) in &self.graph.permissions {
            if record.permission.name() != name {
                continue;
            }
            // Farthest path wins when several paths materialized edges at different
            // priorities for the same (resource, permission) pair — the numerically
            // smallest (most negative) priority is the longest one.
            let sub_priority = self
                .has_edges
                .iter()
                .filter(|e| e.resource == subject_id && e.permission == id)
                .map(|e| e.priority)
                .min();
            let obj_priority = self
                .on_edges
                .iter()
                .filter(|e| e.resource == object_id && e.permission == id)
                .map(|e| e.priority)
                .min();
            if let (Some(sub_priority), Some(obj_priority)) = (sub_priority, obj_priority) {
                out.push(EffectivePermission {
                    name: record.permission.name().to_string(),
                    kind: record.permission.kind(),
                    condition: record.permission.condition().clone(),
                    sub_priority,
                    obj_priority,
                });
            }
        }
        Ok(out)
    }
}

impl OutboxSink for CachedStore {
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
