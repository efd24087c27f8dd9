// SPDX-License-Identifier: MIT OR Apache-2.0

//! Condition-expression parsing and evaluation for Oort permissions.
//!
//! A [`Permission`](oort_model::Permission) carries an optional [`Condition`]: a small
//! boolean expression over `subject.*` / `object.*` / `env.*` attribute references. This
//! crate lexes, parses, and evaluates that expression against an [`Environment`] built
//! from the attributes attached to the principal, the resource, and the caller's request.
//!
//! Evaluation never panics and never propagates a hard error to a permission decision:
//! any [`EvalError`] (syntax error, unknown attribute, type mismatch) is treated by
//! callers as "condition did not hold", per the closed-world default in the decision
//! algorithm.

mod ast;
mod env;
mod error;
mod evaluator;
mod lexer;
mod parser;

pub use env::Environment;
pub use error::EvalError;
pub use evaluator::{ConditionEvaluator, ExprEvaluator};

use oort_model::Condition;

/// Convenience entry point: evaluate `condition` against `env` using the default
/// [`ExprEvaluator`].
pub fn evaluate_condition(condition: &Condition, env: &Environment) -> Result<bool, EvalError> {
    ExprEvaluator.evaluate(condition, env)
}
