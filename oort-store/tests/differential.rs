// SPDX-License-Identifier: MIT OR Apache-2.0

//! Differential tests between `NonCachedStore` and `CachedStore`: both must
//! agree on every `GetEffectivePermissions` probe for the same mutation stream.

use std::collections::HashSet;

use oort_model::{EffectivePermission, Resource};
use oort_store::test_utils::{depth_scenario, diamond_scenario, mutation_stream};
use oort_store::{CachedStore, NonCachedStore, Store};

fn normalize(mut permissions: Vec<EffectivePermission>) -> Vec<(String, i64, i64, bool)> {
    permissions.sort_by(|a, b| {
        (a.name.as_str(), a.sub_priority, a.obj_priority).cmp(&(
            b.name.as_str(),
            b.sub_priority,
            b.obj_priority,
        ))
    });
    permissions
        .into_iter()
        .map(|p| {
            (
                p.name,
                p.sub_priority,
                p.obj_priority,
                matches!(p.kind, oort_model::PermissionKind::Deny),
            )
        })
        .collect()
}

fn assert_agree(non_cached: &NonCachedStore, cached: &CachedStore, sub: &Resource, obj: &Resource, name: &str) {
    let from_non_cached = normalize(non_cached.get_effective_permissions(sub, obj, name).unwrap());
    let from_cached = normalize(cached.get_effective_permissions(sub, obj, name).unwrap());
    assert_eq!(
        from_non_cached, from_cached,
        "NonCached and Cached disagree for ({sub}, {obj}, {name})"
    );
}

#[test]
fn depth_scenario_agrees() {
    let mut non_cached = NonCachedStore::new();
    let mut cached = CachedStore::new();
    let (a, b, c) = depth_scenario(&mut non_cached);
    depth_scenario(&mut cached);

    for sub in [&a, &b, &c, &Resource::root()] {
        for obj in [&a, &b, &c, &Resource::root()] {
            assert_agree(&non_cached, &cached, sub, obj, "read");
        }
    }
}

#[test]
fn mutation_stream_agrees() {
    let mut non_cached = NonCachedStore::new();
    let mut cached = CachedStore::new();
    mutation_stream(&mut non_cached);
    mutation_stream(&mut cached);

    let probes = ["n0", "n1", "n2", "n3", "root"];
    for sub in &probes {
        for obj in &probes {
            let sub = Resource::new(*sub).unwrap();
            let obj = Resource::new(*obj).unwrap();
            assert_agree(&non_cached, &cached, &sub, &obj, "read");
        }
    }
}

#[test]
fn deleting_a_relation_retracts_inheritance_in_both_strategies() {
    let mut non_cached = NonCachedStore::new();
    let mut cached = CachedStore::new();
    let (a, b, _c) = depth_scenario(&mut non_cached);
    depth_scenario(&mut cached);

    non_cached
        .delete_rel(oort_model::RelationKind::Composition, &a, &b)
        .unwrap();
    cached
        .delete_rel(oort_model::RelationKind::Composition, &a, &b)
        .unwrap();

    let c = Resource::new("c").unwrap();
    assert_agree(&non_cached, &cached, &a, &c, "read");

    let effective = non_cached.get_effective_permissions(&a, &c, "read").unwrap();
    assert!(
        effective.is_empty(),
        "A's path to C was severed, so A should no longer see an effective permission on C"
    );
}

#[test]
fn diamond_scenario_collapses_to_the_longest_path_in_both_strategies() {
    let mut non_cached = NonCachedStore::new();
    let mut cached = CachedStore::new();
    let (anc, _mid, leaf, obj) = diamond_scenario(&mut non_cached);
    diamond_scenario(&mut cached);

    assert_agree(&non_cached, &cached, &leaf, &obj, "read");

    // `leaf` reaches `anc` by a 2-hop Composition path and a 1-hop Aggregation
    // shortcut; the longer path's priority (-2) must win, not the shortcut's (-1).
    let effective = non_cached.get_effective_permissions(&leaf, &obj, "read").unwrap();
    assert_eq!(effective.len(), 1);
    assert_eq!(effective[0].sub_priority, -2);

    // The direct assignment on `anc` itself is unaffected by the diamond below it.
    let direct = non_cached.get_effective_permissions(&anc, &obj, "read").unwrap();
    assert_eq!(direct[0].sub_priority, 0);
}

#[test]
fn deleting_a_resource_removes_its_direct_permissions_in_both_strategies() {
    let mut non_cached = NonCachedStore::new();
    let mut cached = CachedStore::new();
    let (a, _b, c) = depth_scenario(&mut non_cached);
    depth_scenario(&mut cached);

    non_cached.delete_resource(&c).unwrap();
    cached.delete_resource(&c).unwrap();

    assert!(non_cached.get_resource(&c).is_err());
    assert!(cached.get_resource(&c).is_err());

    let names: HashSet<&str> = ["a", "b"].into_iter().collect();
    assert!(names.contains(a.name()));
}
