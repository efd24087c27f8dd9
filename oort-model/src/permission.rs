// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use crate::Error;

/// Whether a [`Permission`] grants or withholds its named action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PermissionKind {
    Allow,
    Deny,
}

/// A boolean-expression string in the fixed condition language (see `oort-eval`),
/// referencing attributes as `subject.<name>`, `object.<name>`, `env.<name>`.
///
/// An empty expression always evaluates to `true`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Condition(String);

impl Condition {
    pub fn new(expression: impl Into<String>) -> Self {
        Self(expression.into())
    }

    /// The unconditional (`always true`) condition.
    pub fn always() -> Self {
        Self(String::new())
    }

    pub fn expression(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed permission: `(name, kind, condition)`, borne on an edge between a subject
/// resource and an object resource. Uniqueness is on `(subject, object, name, kind)`
/// — the same `name` may coexist as both `Allow` and `Deny`, leaving conflict resolution
/// to the Evaluator.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Permission {
    name: String,
    kind: PermissionKind,
    condition: Condition,
}

impl Permission {
    /// Construct a permission with a non-empty name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArg`] if `name` is empty.
    pub fn new(
        name: impl Into<String>,
        kind: PermissionKind,
        condition: Condition,
    ) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidArg("permission name must not be empty".into()));
        }
        Ok(Self {
            name,
            kind,
            condition,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PermissionKind {
        self.kind
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}

/// An effective permission as returned by `Store::get_effective_permissions`: a
/// permission reachable between a subject and an object, tagged with the signed
/// distance (`priority`) it was found at along each hierarchy.
///
/// `sub_priority` and `obj_priority` are always `<= 0`; `0` means a direct assignment on
/// that side.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectivePermission {
    pub name: String,
    pub kind: PermissionKind,
    pub condition: Condition,
    pub sub_priority: i64,
    pub obj_priority: i64,
}

impl EffectivePermission {
    /// `subPriority + objPriority`: the combined distance used to rank candidates in
    /// the decision algorithm. More negative is more distant.
    pub fn score(&self) -> i64 {
        self.sub_priority + self.obj_priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_condition_is_always() {
        assert!(Condition::default().is_empty());
        assert!(Condition::always().is_empty());
    }

    #[test]
    fn score_sums_priorities() {
        let ep = EffectivePermission {
            name: "read".into(),
            kind: PermissionKind::Allow,
            condition: Condition::always(),
            sub_priority: -2,
            obj_priority: -1,
        };
        assert_eq!(ep.score(), -3);
    }
}
