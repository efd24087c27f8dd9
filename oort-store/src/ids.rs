// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

/// An interned handle to a [`oort_model::Resource`] name, used as the node weight of the
/// `Includes` graph. `DiGraphMap` requires `Copy + Ord + Hash` node weights, which a
/// `String` cannot cheaply provide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ResourceId(pub(crate) u32);

/// An auto-incrementing handle to a direct [`oort_model::Permission`] record. Inherited
/// `Has`/`On` edges reference the permission by this id rather than duplicating it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct PermissionId(u64);

/// Bidirectional name <-> [`ResourceId`] table. Deleted resources leave a tombstone so
/// previously-issued ids never get silently reassigned to a different name.
#[derive(Debug, Default)]
pub(crate) struct ResourceInterner {
    names: Vec<Option<String>>,
    by_name: HashMap<String, ResourceId>,
}

impl ResourceInterner {
    pub(crate) fn get(&self, name: &str) -> Option<ResourceId> {
        self.by_name.get(name).copied()
    }

    pub(crate) fn insert(&mut self, name: &str) -> ResourceId {
        let id = ResourceId(self.names.len() as u32);
        self.names.push(Some(name.to_string()));
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub(crate) fn remove(&mut self, id: ResourceId) {
        if let Some(slot) = self.names.get_mut(id.0 as usize) {
            if let Some(name) = slot.take() {
                self.by_name.remove(&name);
            }
        }
    }

    pub(crate) fn name(&self, id: ResourceId) -> &str {
        self.names[id.0 as usize]
            .as_deref()
            .expect("resolved ResourceId must still be live")
    }
}

#[derive(Debug, Default)]
pub(crate) struct PermissionIdGen(u64);

impl PermissionIdGen {
    pub(crate) fn next(&mut self) -> PermissionId {
        let id = PermissionId(self.0);
        self.0 += 1;
        id
    }
}
