//! Tree-walking evaluator.
//!
//! Statements and expressions execute directly against a closure and an
//! output context. `return` propagates as an explicit `Flow::Return` through
//! every enclosing statement until the nearest `MethodBody` converts it back
//! into a plain value; expressions never carry it, because a `return` inside
//! a callee is already caught at that callee's method boundary.

use std::rc::Rc;

use crate::ast::{ArithmeticOp, ComparisonOp, Expr, LogicalOp, Statement};
use crate::runtime::class::{ADD_METHOD, INIT_METHOD, Instance};
use crate::runtime::compare;
use crate::runtime::context::{BufferContext, Context, write_text};
use crate::runtime::error::RuntimeError;
use crate::runtime::value::{Closure, Value};

/// Control-flow marker for statement execution.
#[derive(Debug, PartialEq)]
pub enum Flow {
    Value(Value),
    Return(Value),
}

impl Flow {
    /// The value either arm carries. At a call boundary both mean the same
    /// thing: the method's result.
    pub fn into_value(self) -> Value {
        match self {
            Flow::Value(value) | Flow::Return(value) => value,
        }
    }
}

impl Statement {
    pub fn execute(
        &self,
        closure: &mut Closure,
        ctx: &mut dyn Context,
    ) -> Result<Flow, RuntimeError> {
        match self {
            Statement::Assignment { name, value } => {
                let value = value.eval(closure, ctx)?;
                closure.insert(name.clone(), value.clone());
                Ok(Flow::Value(value))
            }
            Statement::FieldAssignment {
                object,
                field,
                value,
            } => {
                let instance = match object.eval(closure, ctx)? {
                    Value::Instance(instance) => instance,
                    other => {
                        return Err(RuntimeError::NotAnInstance {
                            operation: "Field assignment",
                            type_name: other.type_name().to_string(),
                        });
                    }
                };
                let value = value.eval(closure, ctx)?;
                instance.fields_mut().insert(field.clone(), value.clone());
                Ok(Flow::Value(value))
            }
            Statement::Print(args) => {
                let mut last = Value::None;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write_text(ctx, " ")?;
                    }
                    last = arg.eval(closure, ctx)?;
                    last.print(ctx)?;
                }
                write_text(ctx, "\n")?;
                Ok(Flow::Value(last))
            }
            Statement::IfElse {
                condition,
                then_body,
                else_body,
            } => {
                if condition.eval(closure, ctx)?.is_true() {
                    then_body.execute(closure, ctx)
                } else if let Some(else_body) = else_body {
                    else_body.execute(closure, ctx)
                } else {
                    Ok(Flow::Value(Value::None))
                }
            }
            Statement::Compound(statements) => {
                for statement in statements {
                    if let Flow::Return(value) = statement.execute(closure, ctx)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Value(Value::None))
            }
            Statement::ClassDefinition(class) => {
                closure.insert(class.name().to_string(), Value::Class(Rc::clone(class)));
                Ok(Flow::Value(Value::None))
            }
            Statement::Return(value) => Ok(Flow::Return(value.eval(closure, ctx)?)),
            Statement::MethodBody(body) => match body.execute(closure, ctx)? {
                Flow::Return(value) => Ok(Flow::Value(value)),
                Flow::Value(_) => Ok(Flow::Value(Value::None)),
            },
            Statement::Expr(expr) => Ok(Flow::Value(expr.eval(closure, ctx)?)),
        }
    }
}

impl Expr {
    pub fn eval(&self, closure: &mut Closure, ctx: &mut dyn Context) -> Result<Value, RuntimeError> {
        match self {
            Expr::Const(value) => Ok(value.clone()),
            Expr::Variable { name, fields } => eval_variable(name, fields, closure),
            Expr::Stringify(inner) => {
                let value = inner.eval(closure, ctx)?;
                let mut buffer = BufferContext::new();
                value.print(&mut buffer)?;
                Ok(Value::String(buffer.captured()))
            }
            Expr::Arithmetic { op, lhs, rhs } => {
                let lhs = lhs.eval(closure, ctx)?;
                let rhs = rhs.eval(closure, ctx)?;
                eval_arithmetic(*op, lhs, rhs, ctx)
            }
            Expr::Logical { op, lhs, rhs } => {
                // No short-circuit: both sides run for their effects.
                let lhs = lhs.eval(closure, ctx)?.is_true();
                let rhs = rhs.eval(closure, ctx)?.is_true();
                Ok(Value::Bool(match op {
                    LogicalOp::And => lhs && rhs,
                    LogicalOp::Or => lhs || rhs,
                }))
            }
            Expr::Not(inner) => Ok(Value::Bool(!inner.eval(closure, ctx)?.is_true())),
            Expr::Comparison { op, lhs, rhs } => {
                let lhs = lhs.eval(closure, ctx)?;
                let rhs = rhs.eval(closure, ctx)?;
                let verdict = match op {
                    ComparisonOp::Eq => compare::equal(&lhs, &rhs, ctx)?,
                    ComparisonOp::NotEq => compare::not_equal(&lhs, &rhs, ctx)?,
                    ComparisonOp::Less => compare::less(&lhs, &rhs, ctx)?,
                    ComparisonOp::Greater => compare::greater(&lhs, &rhs, ctx)?,
                    ComparisonOp::LessOrEq => compare::less_or_equal(&lhs, &rhs, ctx)?,
                    ComparisonOp::GreaterOrEq => compare::greater_or_equal(&lhs, &rhs, ctx)?,
                };
                Ok(Value::Bool(verdict))
            }
            Expr::MethodCall {
                object,
                method,
                args,
            } => {
                let instance = match object.eval(closure, ctx)? {
                    Value::Instance(instance) => instance,
                    other => {
                        return Err(RuntimeError::NotAnInstance {
                            operation: "Method call",
                            type_name: other.type_name().to_string(),
                        });
                    }
                };
                let args = eval_args(args, closure, ctx)?;
                Instance::call(&instance, method, args, ctx)
            }
            Expr::NewInstance { class, args } => {
                let instance = Rc::new(Instance::new(Rc::clone(class)));
                let args = eval_args(args, closure, ctx)?;
                if instance.has_method(INIT_METHOD, args.len()) {
                    Instance::call(&instance, INIT_METHOD, args, ctx)?;
                }
                Ok(Value::Instance(instance))
            }
        }
    }
}

fn eval_args(
    args: &[Expr],
    closure: &mut Closure,
    ctx: &mut dyn Context,
) -> Result<Vec<Value>, RuntimeError> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(arg.eval(closure, ctx)?);
    }
    Ok(values)
}

fn eval_variable(name: &str, fields: &[String], closure: &Closure) -> Result<Value, RuntimeError> {
    let mut value = closure
        .get(name)
        .cloned()
        .ok_or_else(|| RuntimeError::NameNotFound {
            name: name.to_string(),
        })?;

    for field in fields {
        let instance = match value {
            Value::Instance(instance) => instance,
            other => {
                return Err(RuntimeError::NotAnInstance {
                    operation: "Attribute access",
                    type_name: other.type_name().to_string(),
                });
            }
        };
        let next = instance.fields().get(field).cloned();
        value = next.ok_or_else(|| RuntimeError::NameNotFound {
            name: field.clone(),
        })?;
    }
    Ok(value)
}

fn eval_arithmetic(
    op: ArithmeticOp,
    lhs: Value,
    rhs: Value,
    ctx: &mut dyn Context,
) -> Result<Value, RuntimeError> {
    match op {
        ArithmeticOp::Add => match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
            (Value::Instance(instance), rhs) if instance.has_method(ADD_METHOD, 1) => {
                Instance::call(&instance, ADD_METHOD, vec![rhs], ctx)
            }
            (lhs, rhs) => Err(unsupported("+", &lhs, &rhs)),
        },
        ArithmeticOp::Sub => match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
            (lhs, rhs) => Err(unsupported("-", &lhs, &rhs)),
        },
        ArithmeticOp::Mult => match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
            (lhs, rhs) => Err(unsupported("*", &lhs, &rhs)),
        },
        ArithmeticOp::Div => match (lhs, rhs) {
            (Value::Number(_), Value::Number(0)) => Err(RuntimeError::DivisionByZero),
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
            (lhs, rhs) => Err(unsupported("/", &lhs, &rhs)),
        },
    }
}

fn unsupported(operation: &'static str, lhs: &Value, rhs: &Value) -> RuntimeError {
    RuntimeError::UnsupportedOperands {
        operation,
        lhs: lhs.type_name().to_string(),
        rhs: rhs.type_name().to_string(),
    }
}
