// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types and structural invariants for the Oort authorization graph.
//!
//! This crate has no I/O and no async: it is the leaf the rest of the workspace builds
//! on, the way `p2panda-core` sits beneath `p2panda-store` and `p2panda-auth`.

mod attribute;
mod error;
mod outbox;
mod permission;
mod relation;
mod resource;

pub use attribute::{Attribute, AttributeKind, AttributeValue};
pub use error::Error;
pub use outbox::OutboxMessage;
pub use permission::{Condition, EffectivePermission, Permission, PermissionKind};
pub use relation::RelationKind;
pub use resource::{Resource, ROOT_NAME};
