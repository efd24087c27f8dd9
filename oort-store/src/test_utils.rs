// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory fixtures shared by this crate's differential tests and by downstream
//! crates' integration tests (`oort-service`), gated behind the `test_utils` feature —
//! mirrors `p2panda-store`'s own `test_utils` convention.

use oort_model::{Condition, Permission, PermissionKind, RelationKind, Resource};

use crate::Store;

/// Applies an end-to-end scenario to `store`:
/// `A -Composition-> B -Composition-> C`, a DENY on `(A, C, "read")`, and an ALLOW on
/// `(B, C, "read")`. Returns the three resources for the caller to issue `Check`s
/// against.
pub fn depth_scenario(store: &mut impl Store) -> (Resource, Resource, Resource) {
    let a = Resource::new("a").unwrap();
    let b = Resource::new("b").unwrap();
    let c = Resource::new("c").unwrap();

    store.create_resource(&a).unwrap();
    store.create_resource(&b).unwrap();
    store.create_resource(&c).unwrap();
    store.create_rel(RelationKind::Composition, &a, &b).unwrap();
    store.create_rel(RelationKind::Composition, &b, &c).unwrap();

    store
        .create_permission(
            &a,
            &c,
            Permission::new("read", PermissionKind::Deny, Condition::always()).unwrap(),
        )
        .unwrap();
    store
        .create_permission(
            &b,
            &c,
            Permission::new("read", PermissionKind::Allow, Condition::always()).unwrap(),
        )
        .unwrap();

    (a, b, c)
}

/// A random-ish sequence of valid mutations touching resources, relations, and
/// permissions, used to stress the `NonCached`/`Cached` differential harness beyond the
/// fixed scenarios.
pub fn mutation_stream(store: &mut impl Store) {
    let root_children: Vec<Resource> = (0..4)
        .map(|i| Resource::new(format!("n{i}")).unwrap())
        .collect();
    for child in &root_children {
        store.create_resource(child).unwrap();
    }

    store
        .create_rel(RelationKind::Composition, &root_children[0], &root_children[1])
        .unwrap();
    store
        .create_rel(RelationKind::Aggregation, &root_children[0], &root_children[2])
        .unwrap();
    store
        .create_rel(RelationKind::Composition, &root_children[1], &root_children[3])
        .unwrap();

    store
        .create_permission(
            &root_children[0],
            &root_children[3],
            Permission::new("read", PermissionKind::Allow, Condition::always()).unwrap(),
        )
        .unwrap();
    store
        .create_permission(
            &root_children[2],
            &root_children[3],
            Permission::new(
                "read",
                PermissionKind::Deny,
                Condition::new("env.region == \"eu\""),
            )
            .unwrap(),
        )
        .unwrap();

    store
        .delete_rel(RelationKind::Aggregation, &root_children[0], &root_children[2])
        .unwrap();
}

/// Builds a subject-side diamond: `anc -Composition-> mid -Composition-> leaf` alongside
/// a direct `anc -Aggregation-> leaf` shortcut, so `leaf` reaches the permission-bearing
/// `anc` by two paths of different length (2 and 1). An ALLOW on `(anc, obj, "read")`
/// lets the caller probe that `leaf`'s collapsed priority picks up the longer path, not
/// the shorter shortcut.
pub fn diamond_scenario(store: &mut impl Store) -> (Resource, Resource, Resource, Resource) {
    let anc = Resource::new("anc").unwrap();
    let mid = Resource::new("mid").unwrap();
    let leaf = Resource::new("leaf").unwrap();
    let obj = Resource::new("obj").unwrap();

    store.create_resource(&anc).unwrap();
    store.create_resource(&mid).unwrap();
    store.create_resource(&leaf).unwrap();
    store.create_resource(&obj).unwrap();

    store.create_rel(RelationKind::Composition, &anc, &mid).unwrap();
    store.create_rel(RelationKind::Composition, &mid, &leaf).unwrap();
    store.create_rel(RelationKind::Aggregation, &anc, &leaf).unwrap();

    store
        .create_permission(
            &anc,
            &obj,
            Permission::new("read", PermissionKind::Allow, Condition::always()).unwrap(),
        )
        .unwrap();

    (anc, mid, leaf, obj)
}
