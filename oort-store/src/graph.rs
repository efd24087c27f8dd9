// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `Includes` hierarchy: a `DiGraphMap` of [`ResourceId`] nodes carrying
//! [`RelationKind`] edges, shared unchanged by both store strategies.

use std::collections::{HashMap, VecDeque};

use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use petgraph::Direction;

use oort_model::RelationKind;

use crate::ids::ResourceId;

/// Upper bound on path length the `NonCached` strategy will search, and on the distance
/// the `Cached` strategy will materialize. Paths beyond this are treated as unreachable.
pub(crate) const MAX_PATH_LEN: usize = 100;

#[derive(Debug, Default)]
pub(crate) struct IncludesGraph(DiGraphMap<ResourceId, RelationKind>);

impl IncludesGraph {
    pub(crate) fn add_node(&mut self, id: ResourceId) {
        self.0.add_node(id);
    }

    pub(crate) fn remove_node(&mut self, id: ResourceId) {
        self.0.remove_node(id);
    }

    pub(crate) fn contains_edge(&self, parent: ResourceId, child: ResourceId) -> bool {
        self.0.contains_edge(parent, child)
    }

    pub(crate) fn edge_kind(&self, parent: ResourceId, child: ResourceId) -> Option<RelationKind> {
        self.0.edge_weight(parent, child).copied()
    }

    pub(crate) fn add_edge(&mut self, parent: ResourceId, child: ResourceId, kind: RelationKind) {
        self.0.add_edge(parent, child, kind);
    }

    pub(crate) fn remove_edge(&mut self, parent: ResourceId, child: ResourceId) -> Option<RelationKind> {
        self.0.remove_edge(parent, child)
    }

    /// `true` if a directed path `from -> ... -> to` exists, walking every `Includes` edge
    /// regardless of kind (Composition and Aggregation both count).
    pub(crate) fn has_path(&self, from: ResourceId, to: ResourceId) -> bool {
        let mut dfs = Dfs::new(&self.0, from);
        while let Some(node) = dfs.next(&self.0) {
            if node == to {
                return true;
            }
        }
        false
    }

    /// Strict Composition-only descendants of `start` (the subtree collapsed by
    /// `DeleteResource`), excluding `start` itself.
    pub(crate) fn composition_descendants(&self, start: ResourceId) -> Vec<ResourceId> {
        let mut seen = HashMap::new();
        let mut stack = vec![start];
        let mut out = Vec::new();
        while let Some(node) = stack.pop() {
            for (_, child, kind) in self.0.edges(node) {
                if kind.is_composition() && seen.insert(child, ()).is_none() {
                    out.push(child);
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Direct (one-hop) parents of `node`, any kind.
    pub(crate) fn parents_of(&self, node: ResourceId) -> Vec<ResourceId> {
        self.0.neighbors_directed(node, Direction::Incoming).collect()
    }

    /// Direct (one-hop) children of `node`, any kind.
    pub(crate) fn children_of(&self, node: ResourceId) -> Vec<ResourceId> {
        self.0.neighbors_directed(node, Direction::Outgoing).collect()
    }

    /// Walks every `Includes` edge (both kinds), returning strict descendants of `start`
    /// within [`MAX_PATH_LEN`] hops, each tagged with the *longest* path length that
    /// reaches it — a diamond reachable by two paths of different length reports the
    /// longer one, matching the priority a permission collapse must pick up.
    pub(crate) fn descendants_within(&self, start: ResourceId) -> Vec<(ResourceId, usize)> {
        self.longest_distances(start, Direction::Outgoing)
    }

    /// Symmetric to [`Self::descendants_within`], walking edges in reverse.
    pub(crate) fn ancestors_within(&self, start: ResourceId) -> Vec<(ResourceId, usize)> {
        self.longest_distances(start, Direction::Incoming)
    }

    /// Longest-path distance from `start` to every node it reaches, bounded by
    /// [`MAX_PATH_LEN`]. Cycle detection keeps `Includes` acyclic, so relaxing a node's
    /// distance upward whenever a longer path to it is found always terminates.
    fn longest_distances(&self, start: ResourceId, direction: Direction) -> Vec<(ResourceId, usize)> {
        let mut distance = HashMap::new();
        distance.insert(start, 0usize);
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            let d = distance[&node];
            if d >= MAX_PATH_LEN {
                continue;
            }
            for next in self.0.neighbors_directed(node, direction) {
                let candidate = d + 1;
                let is_longer = match distance.get(&next) {
                    Some(&current) => candidate > current,
                    None => true,
                };
                if is_longer {
                    distance.insert(next, candidate);
                    queue.push_back(next);
                }
            }
        }

        distance.remove(&start);
        distance.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> ResourceId {
        ResourceId(n)
    }

    #[test]
    fn detects_a_cycle_before_it_closes() {
        let mut graph = IncludesGraph::default();
        for n in 0..3 {
            graph.add_node(id(n));
        }
        graph.add_edge(id(0), id(1), RelationKind::Composition);
        graph.add_edge(id(1), id(2), RelationKind::Aggregation);

        // 2 -> 0 would close the loop 0 -> 1 -> 2 -> 0.
        assert!(graph.has_path(id(2), id(0)));
    }

    #[test]
    fn composition_descendants_excludes_aggregation_edges() {
        let mut graph = IncludesGraph::default();
        for n in 0..3 {
            graph.add_node(id(n));
        }
        graph.add_edge(id(0), id(1), RelationKind::Composition);
        graph.add_edge(id(0), id(2), RelationKind::Aggregation);

        let descendants = graph.composition_descendants(id(0));
        assert_eq!(descendants, vec![id(1)]);
    }

    #[test]
    fn distances_are_bounded_and_take_the_longest_path() {
        let mut graph = IncludesGraph::default();
        for n in 0..4 {
            graph.add_node(id(n));
        }
        // Diamond: 0 -> 1 -> 3 and 0 -> 2 -> 3, both length 2; a direct 0 -> 3 shortcut
        // also exists, but the longer diamond paths should win.
        graph.add_edge(id(0), id(1), RelationKind::Composition);
        graph.add_edge(id(1), id(3), RelationKind::Composition);
        graph.add_edge(id(0), id(2), RelationKind::Composition);
        graph.add_edge(id(2), id(3), RelationKind::Composition);
        graph.add_edge(id(0), id(3), RelationKind::Aggregation);

        let descendants: HashMap<_, _> = graph.descendants_within(id(0)).into_iter().collect();
        assert_eq!(descendants.get(&id(3)), Some(&2));
    }
}
