// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

/// The name of the distinguished root resource: every resource is reachable from it
/// via `Composition`.
pub const ROOT_NAME: &str = "root";

/// A resource is any named entity in the graph — a principal, an object, or an
/// organizational grouping. Resources are uniformly modeled; nothing distinguishes a
/// "user" resource from a "folder" resource at this layer.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resource(String);

impl Resource {
    /// Construct a resource from a non-empty name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArg`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, crate::Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(crate::Error::InvalidArg("resource name must not be empty".into()));
        }
        Ok(Self(name))
    }

    /// The distinguished root resource.
    pub fn root() -> Self {
        Self(ROOT_NAME.to_string())
    }

    /// `true` if this is the distinguished root resource.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_NAME
    }

    /// The resource's unique name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Resource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(Resource::new(""), Err(crate::Error::InvalidArg(_))));
    }

    #[test]
    fn root_is_root() {
        assert!(Resource::root().is_root());
        assert!(!Resource::new("alice").unwrap().is_root());
    }
}
