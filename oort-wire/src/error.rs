// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Errors from encoding, framing, and decoding wire records.
#[derive(Debug, Error)]
pub enum WireError {
    /// An error occurred while writing bytes.
    #[error("an error occurred while writing bytes: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be serialized.
    #[error("an error occurred while serializing a value: {0}")]
    Encode(String),

    /// The CBOR body could not be parsed.
    #[error("an error occurred while parsing a record at position {0:?}: {1}")]
    Decode(Option<usize>, String),

    /// The record's length prefix did not match the bytes actually supplied.
    #[error("record declared length {declared} but {actual} bytes were available")]
    Truncated { declared: u32, actual: usize },

    /// A numeric enum code outside the fixed range for `what`.
    #[error("unknown {what} code: {code}")]
    UnknownCode { what: &'static str, code: u8 },
}

impl From<ciborium::ser::Error<std::io::Error>> for WireError {
    fn from(value: ciborium::ser::Error<std::io::Error>) -> Self {
        match value {
            ciborium::ser::Error::Io(err) => WireError::Io(err),
            ciborium::ser::Error::Value(err) => WireError::Encode(err),
        }
    }
}

impl From<ciborium::de::Error<std::io::Error>> for WireError {
    fn from(value: ciborium::de::Error<std::io::Error>) -> Self {
        match value {
            ciborium::de::Error::Io(err) => WireError::Io(err),
            ciborium::de::Error::Syntax(offset) => WireError::Decode(Some(offset), "syntax error".into()),
            ciborium::de::Error::Semantic(offset, description) => WireError::Decode(offset, description),
            ciborium::de::Error::RecursionLimitExceeded => {
                WireError::Decode(None, "recursion limit exceeded".into())
            }
        }
    }
}
