// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use crate::Error;

/// The four value kinds an [`Attribute`] (or a condition literal) can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeKind {
    Int64,
    Float64,
    String,
    Bool,
}

/// A concrete value, always tagged with the [`AttributeKind`] it was constructed as.
/// Mutating an attribute's value (`UpdateAttribute`) preserves this tag; changing kind
/// requires deleting and recreating the attribute.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    Int64(i64),
    Float64(f64),
    String(String),
    Bool(bool),
}

impl AttributeValue {
    /// The kind tag matching this value's variant.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Int64(_) => AttributeKind::Int64,
            AttributeValue::Float64(_) => AttributeKind::Float64,
            AttributeValue::String(_) => AttributeKind::String,
            AttributeValue::Bool(_) => AttributeKind::Bool,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int64(v) => write!(f, "{v}"),
            AttributeValue::Float64(v) => write!(f, "{v}"),
            AttributeValue::String(v) => write!(f, "{v}"),
            AttributeValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// An attribute belongs to exactly one [`crate::Resource`] via a composition edge.
/// Identified within its owning resource by `(name, kind)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    name: String,
    value: AttributeValue,
}

impl Attribute {
    /// Construct a new attribute with a non-empty name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArg`] if `name` is empty.
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidArg("attribute name must not be empty".into()));
        }
        Ok(Self { name, value })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AttributeKind {
        self.value.kind()
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }

    /// Replace this attribute's value in place, provided the kind is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KindMismatch`] if `value`'s kind differs from the current one.
    pub fn set_value(&mut self, value: AttributeValue) -> Result<(), Error> {
        if value.kind() != self.value.kind() {
            return Err(Error::KindMismatch {
                attribute: self.name.clone(),
            });
        }
        self.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_preserves_kind() {
        let mut attr = Attribute::new("region", AttributeValue::String("eu".into())).unwrap();
        assert!(attr.set_value(AttributeValue::String("us".into())).is_ok());
        assert_eq!(attr.value(), &AttributeValue::String("us".into()));
    }

    #[test]
    fn set_value_rejects_kind_change() {
        let mut attr = Attribute::new("region", AttributeValue::String("eu".into())).unwrap();
        let err = attr.set_value(AttributeValue::Int64(1)).unwrap_err();
        assert!(matches!(err, Error::KindMismatch { .. }));
    }
}
