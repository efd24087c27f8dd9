// SPDX-License-Identifier: MIT OR Apache-2.0

use oort_model::{AttributeValue, Condition};

use crate::ast::{CmpOp, Expr, Literal, Scope};
use crate::env::Environment;
use crate::error::EvalError;
use crate::lexer::lex;
use crate::parser::parse;

/// Injectable condition-evaluation interface.
pub trait ConditionEvaluator {
    /// Evaluate `condition` against `env`. An empty condition always evaluates `Ok(true)`.
    fn evaluate(&self, condition: &Condition, env: &Environment) -> Result<bool, EvalError>;
}

/// The default evaluator for the condition grammar: a small boolean DSL with
/// `==, !=, <, <=, >, >=, &&, ||, !` over `subject.*` / `object.*` / `env.*`
/// attribute references.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExprEvaluator;

impl ConditionEvaluator for ExprEvaluator {
    fn evaluate(&self, condition: &Condition, env: &Environment) -> Result<bool, EvalError> {
        if condition.is_empty() {
            return Ok(true);
        }
        let tokens = lex(condition.expression())?;
        let expr = parse(&tokens)?;
        eval_expr(&expr, env)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn truthy(&self) -> bool {
        match self {
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0,
            Value::Str(v) => !v.is_empty(),
            Value::Bool(v) => *v,
        }
    }
}

impl From<&AttributeValue> for Value {
    fn from(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Int64(v) => Value::Int(*v),
            AttributeValue::Float64(v) => Value::Float(*v),
            AttributeValue::String(v) => Value::Str(v.clone()),
            AttributeValue::Bool(v) => Value::Bool(*v),
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(v) => Value::Int(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::Str(v) => Value::Str(v.clone()),
            Literal::Bool(v) => Value::Bool(*v),
        }
    }
}

fn eval_expr(expr: &Expr, env: &Environment) -> Result<bool, EvalError> {
    Ok(eval_value(expr, env)?.truthy())
}

fn eval_value(expr: &Expr, env: &Environment) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(lit) => Ok(Value::from(lit)),
        Expr::Reference(scope, name) => {
            let attr = env.lookup(*scope, name).ok_or_else(|| EvalError::UnknownAttribute {
                scope: scope_name(*scope).to_string(),
                name: name.clone(),
            })?;
            Ok(Value::from(attr))
        }
        Expr::Not(inner) => Ok(Value::Bool(!eval_expr(inner, env)?)),
        Expr::And(lhs, rhs) => Ok(Value::Bool(eval_expr(lhs, env)? && eval_expr(rhs, env)?)),
        Expr::Or(lhs, rhs) => Ok(Value::Bool(eval_expr(lhs, env)? || eval_expr(rhs, env)?)),
        Expr::Compare(op, lhs, rhs) => {
            let lhs = eval_value(lhs, env)?;
            let rhs = eval_value(rhs, env)?;
            Ok(Value::Bool(compare(*op, &lhs, &rhs)?))
        }
    }
}

fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
    if let (Some(l), Some(r)) = (lhs.as_f64(), rhs.as_f64()) {
        return Ok(match op {
            CmpOp::Eq => l == r,
            CmpOp::Ne => l != r,
            CmpOp::Lt => l < r,
            CmpOp::Le => l <= r,
            CmpOp::Gt => l > r,
            CmpOp::Ge => l >= r,
        });
    }

    match op {
        CmpOp::Eq | CmpOp::Ne => {
            let equal = lhs == rhs;
            Ok(if matches!(op, CmpOp::Eq) { equal } else { !equal })
        }
        _ => Err(EvalError::TypeMismatch {
            lhs: lhs.type_name().to_string(),
            rhs: rhs.type_name().to_string(),
        }),
    }
}

fn scope_name(scope: Scope) -> &'static str {
    match scope {
        Scope::Subject => "subject",
        Scope::Object => "object",
        Scope::Env => "env",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_condition_is_true() {
        let evaluator = ExprEvaluator;
        let env = Environment::new();
        assert!(evaluator.evaluate(&Condition::always(), &env).unwrap());
    }

    #[test]
    fn region_condition_gates_on_env() {
        let evaluator = ExprEvaluator;
        let condition = Condition::new(r#"env.region == "eu""#);

        let eu_env = Environment::new()
            .with_env_attrs([("region".to_string(), AttributeValue::String("eu".into()))]);
        assert!(evaluator.evaluate(&condition, &eu_env).unwrap());

        let us_env = Environment::new()
            .with_env_attrs([("region".to_string(), AttributeValue::String("us".into()))]);
        assert!(!evaluator.evaluate(&condition, &us_env).unwrap());
    }

    #[test]
    fn unknown_attribute_is_an_error_not_a_panic() {
        let evaluator = ExprEvaluator;
        let condition = Condition::new("env.missing == 1");
        let env = Environment::new();
        assert!(matches!(
            evaluator.evaluate(&condition, &env),
            Err(EvalError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn malformed_expression_degrades_to_error_not_panic() {
        let evaluator = ExprEvaluator;
        let condition = Condition::new("subject.a && (env.b ==");
        let env = Environment::new();
        assert!(evaluator.evaluate(&condition, &env).is_err());
    }

    #[test]
    fn numeric_cross_kind_comparison() {
        let evaluator = ExprEvaluator;
        let condition = Condition::new("subject.score > 2");
        let env = Environment::new()
            .with_subject_attrs([("score".to_string(), AttributeValue::Float64(3.5))]);
        assert!(evaluator.evaluate(&condition, &env).unwrap());
    }

    #[test]
    fn boolean_combinators() {
        let evaluator = ExprEvaluator;
        let condition = Condition::new("subject.admin || (object.public && !env.blocked)");
        let env = Environment::new()
            .with_subject_attrs([("admin".to_string(), AttributeValue::Bool(false))])
            .with_object_attrs([("public".to_string(), AttributeValue::Bool(true))])
            .with_env_attrs([("blocked".to_string(), AttributeValue::Bool(false))]);
        assert!(evaluator.evaluate(&condition, &env).unwrap());
    }
}
