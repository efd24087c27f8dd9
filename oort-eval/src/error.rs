// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Everything that can go wrong while parsing or evaluating a condition expression.
///
/// None of these ever become a decision error: the Evaluator degrades any `EvalError`
/// to "condition did not hold" (`false`).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unknown attribute: {scope}.{name}")]
    UnknownAttribute { scope: String, name: String },

    #[error("type mismatch: cannot compare {lhs} with {rhs}")]
    TypeMismatch { lhs: String, rhs: String },
}
