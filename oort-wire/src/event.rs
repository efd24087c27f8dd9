// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbox event payloads. `Administration` builds one of these per successful mutation
//! and wire-encodes it into the `OutboxMessage` it appends.

use oort_model::RelationKind;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DomainEvent {
    ResourceCreated { name: String },
    ResourceDeleted { name: String },
    AttributePut { resource: String, name: String },
    AttributeDeleted { resource: String, name: String },
    RelCreated { kind: RelationKind, parent: String, child: String },
    RelDeleted { kind: RelationKind, parent: String, child: String },
    PermissionCreated { subject: String, object: String, name: String, kind: u8 },
    PermissionDeleted { subject: String, object: String, name: String, kind: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_record, encode_record};

    #[test]
    fn round_trips_through_the_wire_codec() {
        let event = DomainEvent::RelCreated {
            kind: RelationKind::Composition,
            parent: "a".into(),
            child: "b".into(),
        };
        let bytes = encode_record(&event).unwrap();
        let (decoded, _): (DomainEvent, usize) = decode_record(&bytes).unwrap();
        assert_eq!(decoded, event);
    }
}
