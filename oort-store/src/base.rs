// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plumbing shared by both store strategies: the resource interner, the `Includes`
//! graph, attribute storage, and direct (priority-0) permission records. The strategies
//! differ only in what they additionally materialize on top of this.

use std::collections::HashMap;

use oort_model::{
    Attribute, AttributeKind, Error, OutboxMessage, Permission, PermissionKind, Resource, RelationKind,
};

use crate::graph::IncludesGraph;
use crate::ids::{PermissionId, PermissionIdGen, ResourceId, ResourceInterner};

#[derive(Debug, Clone)]
pub(crate) struct PermissionRecord {
    pub(crate) subject: ResourceId,
    pub(crate) object: ResourceId,
    pub(crate) permission: Permission,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DirectKey {
    subject: ResourceId,
    object: ResourceId,
    name: String,
    kind: PermissionKind,
}

#[derive(Debug, Default)]
pub(crate) struct GraphStore {
    pub(crate) interner: ResourceInterner,
    pub(crate) includes: IncludesGraph,
    attributes: HashMap<ResourceId, HashMap<String, Attribute>>,
    pub(crate) permissions: HashMap<PermissionId, PermissionRecord>,
    direct_index: HashMap<DirectKey, PermissionId>,
    next_permission_id: PermissionIdGen,
    /// Insertion-ordered outbox rows: the graph store is
    /// where `Administration` appends an event in the same mutation it describes.
    outbox: Vec<OutboxMessage>,
}

impl GraphStore {
    pub(crate) fn new() -> Self {
        let mut store = Self::default();
        let root = store.interner.insert(oort_model::ROOT_NAME);
        store.includes.add_node(root);
        store
    }

    pub(crate) fn resolve(&self, resource: &Resource) -> Result<ResourceId, Error> {
        self.interner
            .get(resource.name())
            .ok_or_else(|| Error::NotFound(resource.name().to_string()))
    }

    pub(crate) fn name_of(&self, id: ResourceId) -> Resource {
        Resource::new(self.interner.name(id)).expect("interned names are non-empty")
    }

    pub(crate) fn create_resource(&mut self, resource: &Resource) -> Result<ResourceId, Error> {
        if self.interner.get(resource.name()).is_some() {
            return Err(Error::AlreadyExists(resource.name().to_string()));
        }
        let id = self.interner.insert(resource.name());
        self.includes.add_node(id);
        let root = self.resolve(&Resource::root())?;
        self.includes.add_edge(root, id, RelationKind::Composition);
        self.attributes.insert(id, HashMap::new());
        Ok(id)
    }

    /// Collects the composition-subtree rooted at `resource` (including `resource`
    /// itself), removing their attributes and the graph nodes. Direct permissions
    /// touching any collected resource are the caller's responsibility.
    pub(crate) fn delete_resource_subtree(&mut self, resource: &Resource) -> Result<Vec<ResourceId>, Error> {
        if resource.is_root() {
            return Err(Error::InvalidArg("cannot delete the root resource".into()));
        }
        let id = self.resolve(resource)?;
        let mut subtree = self.includes.composition_descendants(id);
        subtree.push(id);

        for &node in &subtree {
            self.attributes.remove(&node);
            self.includes.remove_node(node);
            self.interner.remove(node);
        }
        Ok(subtree)
    }

    pub(crate) fn create_attribute(&mut self, resource: &Resource, attribute: Attribute) -> Result<(), Error> {
        let id = self.resolve(resource)?;
        let bucket = self.attributes.entry(id).or_default();
        if bucket.contains_key(attribute.name()) {
            return Err(Error::AlreadyExists(format!(
                "{}.{}",
                resource.name(),
                attribute.name()
            )));
        }
        bucket.insert(attribute.name().to_string(), attribute);
        Ok(())
    }

    pub(crate) fn update_attribute(&mut self, resource: &Resource, attribute: Attribute) -> Result<(), Error> {
        let id = self.resolve(resource)?;
        let bucket = self
            .attributes
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(resource.name().to_string()))?;
        let existing = bucket
            .get_mut(attribute.name())
            .ok_or_else(|| Error::NotFound(format!("{}.{}", resource.name(), attribute.name())))?;
        if existing.kind() != attribute.kind() {
            return Err(Error::KindMismatch {
                attribute: attribute.name().to_string(),
            });
        }
        existing.set_value(attribute.value().clone())?;
        Ok(())
    }

    pub(crate) fn delete_attribute(&mut self, resource: &Resource, name: &str) -> Result<(), Error> {
        let id = self.resolve(resource)?;
        let bucket = self
            .attributes
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(resource.name().to_string()))?;
        if bucket.remove(name).is_none() {
            return Err(Error::NotFound(format!("{}.{name}", resource.name())));
        }
        Ok(())
    }

    pub(crate) fn list_attributes(&self, id: ResourceId) -> Vec<Attribute> {
        self.attributes
            .get(&id)
            .map(|bucket| bucket.values().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn attribute_kind(&self, id: ResourceId, name: &str) -> Option<AttributeKind> {
        self.attributes.get(&id)?.get(name).map(Attribute::kind)
    }

    pub(crate) fn create_rel_edge(
        &mut self,
        kind: RelationKind,
        parent: &Resource,
        child: &Resource,
    ) -> Result<(ResourceId, ResourceId), Error> {
        let parent_id = self.resolve(parent)?;
        let child_id = self.resolve(child)?;
        if self.includes.contains_edge(parent_id, child_id) {
            return Err(Error::AlreadyExists(format!("{parent}->{child}")));
        }
        if self.includes.has_path(child_id, parent_id) {
            return Err(Error::CycleDetected);
        }
        self.includes.add_edge(parent_id, child_id, kind);
        Ok((parent_id, child_id))
    }

    pub(crate) fn delete_rel_edge(
        &mut self,
        kind: RelationKind,
        parent: &Resource,
        child: &Resource,
    ) -> Result<(ResourceId, ResourceId), Error> {
        let parent_id = self.resolve(parent)?;
        let child_id = self.resolve(child)?;
        let not_found = || Error::NotFound(format!("{parent}->{child}"));
        let existing = self
            .includes
            .edge_kind(parent_id, child_id)
            .ok_or_else(not_found)?;
        if existing != kind {
            return Err(not_found());
        }
        self.includes.remove_edge(parent_id, child_id);
        Ok((parent_id, child_id))
    }

    pub(crate) fn create_permission_record(
        &mut self,
        subject: &Resource,
        object: &Resource,
        permission: Permission,
    ) -> Result<(ResourceId, ResourceId, PermissionId), Error> {
        let subject_id = self.resolve(subject)?;
        let object_id = self.resolve(object)?;
        let key = DirectKey {
            subject: subject_id,
            object: object_id,
            name: permission.name().to_string(),
            kind: permission.kind(),
        };
        if self.direct_index.contains_key(&key) {
            return Err(Error::AlreadyExists(format!(
                "{subject}-{}:{:?}->{object}",
                permission.name(),
                permission.kind()
            )));
        }
        let id = self.next_permission_id.next();
        self.direct_index.insert(key, id);
        self.permissions.insert(
            id,
            PermissionRecord {
                subject: subject_id,
                object: object_id,
                permission,
            },
        );
        Ok((subject_id, object_id, id))
    }

    pub(crate) fn remove_permission_record(
        &mut self,
        subject: &Resource,
        object: &Resource,
        name: &str,
        kind: PermissionKind,
    ) -> Result<PermissionId, Error> {
        let subject_id = self.resolve(subject)?;
        let object_id = self.resolve(object)?;
        let key = DirectKey {
            subject: subject_id,
            object: object_id,
            name: name.to_string(),
            kind,
        };
        let id = self
            .direct_index
            .remove(&key)
            .ok_or_else(|| Error::NotFound(format!("{subject}-{name}:{kind:?}->{object}")))?;
        self.permissions.remove(&id);
        Ok(id)
    }

    /// Removes every direct permission whose subject or object is in `removed`, returning the ids removed so a Cached strategy can
    /// also purge their inherited edges.
    pub(crate) fn remove_permissions_touching(&mut self, removed: &[ResourceId]) -> Vec<PermissionId> {
        let removed: std::collections::HashSet<_> = removed.iter().copied().collect();
        let doomed: Vec<PermissionId> = self
            .permissions
            .iter()
            .filter(|(_, record)| removed.contains(&record.subject) || removed.contains(&record.object))
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            self.permissions.remove(id);
        }
        self.direct_index.retain(|_, id| !doomed.contains(id));
        doomed
    }

    pub(crate) fn append_outbox(&mut self, message: OutboxMessage) {
        self.outbox.push(message);
    }

    /// Oldest-first, capped at `limit`.
    pub(crate) fn fetch_undelivered(&self, limit: usize) -> Vec<OutboxMessage> {
        self.outbox
            .iter()
            .filter(|message| !message.delivered())
            .take(limit)
            .cloned()
            .collect()
    }

    pub(crate) fn mark_delivered(&mut self, id: &str) -> Result<(), Error> {
        let message = self
            .outbox
            .iter_mut()
            .find(|message| message.id() == id)
            .ok_or_else(|| Error::NotFound(format!("outbox message {id}")))?;
        message.mark_delivered();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oort_model::AttributeValue;

    #[test]
    fn new_resources_attach_to_root() {
        let mut graph = GraphStore::new();
        let a = Resource::new("a").unwrap();
        graph.create_resource(&a).unwrap();

        let root_id = graph.resolve(&Resource::root()).unwrap();
        let a_id = graph.resolve(&a).unwrap();
        assert!(graph.includes.contains_edge(root_id, a_id));
    }

    #[test]
    fn duplicate_resource_name_is_rejected() {
        let mut graph = GraphStore::new();
        let a = Resource::new("a").unwrap();
        graph.create_resource(&a).unwrap();
        assert!(matches!(graph.create_resource(&a), Err(Error::AlreadyExists(_))));
    }

    #[test]
    fn root_cannot_be_deleted() {
        let mut graph = GraphStore::new();
        assert!(matches!(
            graph.delete_resource_subtree(&Resource::root()),
            Err(Error::InvalidArg(_))
        ));
    }

    #[test]
    fn creating_a_rel_that_would_cycle_is_rejected() {
        let mut graph = GraphStore::new();
        let a = Resource::new("a").unwrap();
        let b = Resource::new("b").unwrap();
        graph.create_resource(&a).unwrap();
        graph.create_resource(&b).unwrap();
        graph.create_rel_edge(RelationKind::Composition, &a, &b).unwrap();

        assert!(matches!(
            graph.create_rel_edge(RelationKind::Aggregation, &b, &a),
            Err(Error::CycleDetected)
        ));
    }

    #[test]
    fn update_attribute_rejects_kind_change() {
        let mut graph = GraphStore::new();
        let a = Resource::new("a").unwrap();
        graph.create_resource(&a).unwrap();
        graph
            .create_attribute(&a, Attribute::new("region", AttributeValue::String("eu".into())).unwrap())
            .unwrap();

        let err = graph
            .update_attribute(&a, Attribute::new("region", AttributeValue::Int64(1)).unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::KindMismatch { .. }));
    }

    #[test]
    fn deleting_a_resource_removes_its_permissions() {
        let mut graph = GraphStore::new();
        let a = Resource::new("a").unwrap();
        let b = Resource::new("b").unwrap();
        graph.create_resource(&a).unwrap();
        graph.create_resource(&b).unwrap();
        graph
            .create_permission_record(
                &a,
                &b,
                Permission::new("read", PermissionKind::Allow, oort_model::Condition::always()).unwrap(),
            )
            .unwrap();

        let removed = graph.delete_resource_subtree(&b).unwrap();
        let doomed = graph.remove_permissions_touching(&removed);
        assert_eq!(doomed.len(), 1);
        assert!(graph.permissions.is_empty());
    }

    #[test]
    fn outbox_rows_are_fetched_oldest_first_and_can_be_marked_delivered() {
        let mut graph = GraphStore::new();
        graph.append_outbox(oort_model::OutboxMessage::new("1", vec![1], 100));
        graph.append_outbox(oort_model::OutboxMessage::new("2", vec![2], 200));

        let undelivered = graph.fetch_undelivered(10);
        assert_eq!(undelivered.iter().map(|m| m.id()).collect::<Vec<_>>(), vec!["1", "2"]);

        graph.mark_delivered("1").unwrap();
        let undelivered = graph.fetch_undelivered(10);
        assert_eq!(undelivered.len(), 1);
        assert_eq!(undelivered[0].id(), "2");

        assert!(matches!(graph.mark_delivered("missing"), Err(Error::NotFound(_))));
    }
}
