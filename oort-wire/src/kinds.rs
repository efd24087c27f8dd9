// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed numeric codes for the two wire enums: 0-based, in the order
//! given, independent of how `oort-model` derives its own (de)serialization.

use oort_model::{AttributeKind, PermissionKind};

use crate::error::WireError;

pub fn attribute_kind_code(kind: AttributeKind) -> u8 {
    match kind {
        AttributeKind::Int64 => 0,
        AttributeKind::Float64 => 1,
        AttributeKind::String => 2,
        AttributeKind::Bool => 3,
    }
}

pub fn attribute_kind_from_code(code: u8) -> Result<AttributeKind, WireError> {
    match code {
        0 => Ok(AttributeKind::Int64),
        1 => Ok(AttributeKind::Float64),
        2 => Ok(AttributeKind::String),
        3 => Ok(AttributeKind::Bool),
        other => Err(WireError::UnknownCode { what: "attribute kind", code: other }),
    }
}

pub fn permission_kind_code(kind: PermissionKind) -> u8 {
    match kind {
        PermissionKind::Allow => 0,
        PermissionKind::Deny => 1,
    }
}

pub fn permission_kind_from_code(code: u8) -> Result<PermissionKind, WireError> {
    match code {
        0 => Ok(PermissionKind::Allow),
        1 => Ok(PermissionKind::Deny),
        other => Err(WireError::UnknownCode { what: "permission kind", code: other }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_codes_are_0_based_in_declared_order() {
        assert_eq!(attribute_kind_code(AttributeKind::Int64), 0);
        assert_eq!(attribute_kind_code(AttributeKind::Float64), 1);
        assert_eq!(attribute_kind_code(AttributeKind::String), 2);
        assert_eq!(attribute_kind_code(AttributeKind::Bool), 3);
    }

    #[test]
    fn permission_codes_are_0_based_in_declared_order() {
        assert_eq!(permission_kind_code(PermissionKind::Allow), 0);
        assert_eq!(permission_kind_code(PermissionKind::Deny), 1);
    }

    #[test]
    fn round_trips_through_codes() {
        for kind in [AttributeKind::Int64, AttributeKind::Float64, AttributeKind::String, AttributeKind::Bool] {
            assert_eq!(attribute_kind_from_code(attribute_kind_code(kind)).unwrap(), kind);
        }
        for kind in [PermissionKind::Allow, PermissionKind::Deny] {
            assert_eq!(permission_kind_from_code(permission_kind_code(kind)).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert!(matches!(attribute_kind_from_code(9), Err(WireError::UnknownCode { .. })));
    }
}
