//! Value comparators.
//!
//! `equal` and `less` are primitive; the remaining comparators derive from
//! them. The derivations assume `__eq__` and `__lt__` describe a consistent
//! total order; a class that violates that gets the ordering it asked for.

use std::rc::Rc;

use crate::runtime::class::{EQ_METHOD, Instance, LT_METHOD};
use crate::runtime::context::Context;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::Value;

pub fn equal(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool, RuntimeError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(a == b),
        (Value::String(a), Value::String(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::None, Value::None) => Ok(true),
        (Value::Instance(instance), _) if instance.has_method(EQ_METHOD, 1) => {
            dunder_verdict(instance, EQ_METHOD, rhs, ctx)
        }
        _ => Err(RuntimeError::NotComparable {
            operation: "equality",
            lhs: lhs.type_name().to_string(),
            rhs: rhs.type_name().to_string(),
        }),
    }
}

pub fn less(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool, RuntimeError> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(a < b),
        (Value::String(a), Value::String(b)) => Ok(a < b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a < b),
        (Value::Instance(instance), _) if instance.has_method(LT_METHOD, 1) => {
            dunder_verdict(instance, LT_METHOD, rhs, ctx)
        }
        _ => Err(RuntimeError::NotComparable {
            operation: "ordering",
            lhs: lhs.type_name().to_string(),
            rhs: rhs.type_name().to_string(),
        }),
    }
}

pub fn not_equal(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool, RuntimeError> {
    Ok(!equal(lhs, rhs, ctx)?)
}

pub fn greater(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool, RuntimeError> {
    Ok(!less(lhs, rhs, ctx)? && !equal(lhs, rhs, ctx)?)
}

pub fn less_or_equal(lhs: &Value, rhs: &Value, ctx: &mut dyn Context) -> Result<bool, RuntimeError> {
    Ok(!greater(lhs, rhs, ctx)?)
}

pub fn greater_or_equal(
    lhs: &Value,
    rhs: &Value,
    ctx: &mut dyn Context,
) -> Result<bool, RuntimeError> {
    Ok(!less(lhs, rhs, ctx)?)
}

fn dunder_verdict(
    instance: &Rc<Instance>,
    method: &'static str,
    rhs: &Value,
    ctx: &mut dyn Context,
) -> Result<bool, RuntimeError> {
    let verdict = Instance::call(instance, method, vec![rhs.clone()], ctx)?;
    match verdict {
        Value::Bool(value) => Ok(value),
        other => Err(RuntimeError::NonBoolComparison {
            method,
            type_name: other.type_name().to_string(),
        }),
    }
}
