// SPDX-License-Identifier: MIT OR Apache-2.0

/// The kind of an `Includes` edge between a parent and a child resource.
///
/// Both kinds are transitively acyclic and share the inheritance-maintenance machinery in
/// `oort-store`; `kind` does not gate inheritance, it only changes what a
/// parent's deletion does to the child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelationKind {
    /// Strong ownership. Deleting the parent cascades to the child. A child has at most
    /// one composition parent (a tree).
    Composition,

    /// Weak grouping. Deleting the parent or the child does not imply the other's
    /// deletion. A child may be aggregated by many parents.
    Aggregation,
}

impl RelationKind {
    pub fn is_composition(self) -> bool {
        matches!(self, RelationKind::Composition)
    }

    pub fn is_aggregation(self) -> bool {
        matches!(self, RelationKind::Aggregation)
    }
}
