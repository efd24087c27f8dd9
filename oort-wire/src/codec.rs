// SPDX-License-Identifier: MIT OR Apache-2.0

//! Length-prefixed CBOR records. Each record is a 4-byte
//! big-endian length followed by that many bytes of CBOR, the framing `p2panda-core`'s
//! `cbor::encode_header`/`decode_header` leaves to the caller since a `Header` is framed
//! by the log it lives in rather than self-delimited.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::WireError;

const PREFIX_LEN: usize = 4;

/// Serializes `value` to CBOR and prepends its length as a 4-byte big-endian prefix.
pub fn encode_record<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    let mut body = Vec::new();
    ciborium::ser::into_writer(value, &mut body)?;
    let len: u32 = body
        .len()
        .try_into()
        .map_err(|_| WireError::Encode("record exceeds u32 length prefix".into()))?;
    let mut framed = Vec::with_capacity(PREFIX_LEN + body.len());
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(&body);
    Ok(framed)
}

/// Reads one length-prefixed record from the front of `bytes`, returning the decoded
/// value and the number of bytes consumed so the caller can continue framing the rest of
/// a stream.
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<(T, usize), WireError> {
    if bytes.len() < PREFIX_LEN {
        return Err(WireError::Truncated {
            declared: 0,
            actual: bytes.len(),
        });
    }
    let declared = u32::from_be_bytes(bytes[..PREFIX_LEN].try_into().expect("checked length"));
    let end = PREFIX_LEN + declared as usize;
    if bytes.len() < end {
        return Err(WireError::Truncated {
            declared,
            actual: bytes.len() - PREFIX_LEN,
        });
    }
    let value = ciborium::from_reader(&bytes[PREFIX_LEN..end])?;
    Ok((value, end))
}

/// Decodes every record packed back-to-back in `bytes`, stopping at the first error or
/// at the end of the buffer.
pub fn decode_all<T: DeserializeOwned>(mut bytes: &[u8]) -> Result<Vec<T>, WireError> {
    let mut out = Vec::new();
    while !bytes.is_empty() {
        let (value, consumed) = decode_record(bytes)?;
        out.push(value);
        bytes = &bytes[consumed..];
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        n: i64,
    }

    #[test]
    fn round_trips_a_single_record() {
        let sample = Sample { name: "a".into(), n: 7 };
        let bytes = encode_record(&sample).unwrap();
        let (decoded, consumed): (Sample, usize) = decode_record(&bytes).unwrap();
        assert_eq!(decoded, sample);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn decodes_back_to_back_records() {
        let a = Sample { name: "a".into(), n: 1 };
        let b = Sample { name: "b".into(), n: 2 };
        let mut stream = encode_record(&a).unwrap();
        stream.extend(encode_record(&b).unwrap());

        let values: Vec<Sample> = decode_all(&stream).unwrap();
        assert_eq!(values, vec![a, b]);
    }

    #[test]
    fn truncated_prefix_is_an_error_not_a_panic() {
        let err = decode_record::<Sample>(&[0, 0]).unwrap_err();
        assert!(matches!(err, WireError::Truncated { .. }));
    }

    #[test]
    fn truncated_body_is_an_error_not_a_panic() {
        let sample = Sample { name: "a".into(), n: 7 };
        let bytes = encode_record(&sample).unwrap();
        let err = decode_record::<Sample>(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, WireError::Truncated { .. }));
    }
}
