use std::collections::HashMap;
use std::rc::Rc;

use crate::runtime::class::{Class, Instance, STR_METHOD};
use crate::runtime::context::{Context, write_text};
use crate::runtime::error::RuntimeError;

/// Scope mapping names to values for one activation. A `Value::None` binding
/// is a real value, distinct from an absent entry.
pub type Closure = HashMap<String, Value>;

/// Runtime value model. Primitive variants are value-semantic; classes and
/// instances share identity through `Rc`.
#[derive(Debug, Clone)]
pub enum Value {
    Number(i64),
    String(String),
    Bool(bool),
    Class(Rc<Class>),
    Instance(Rc<Instance>),
    None,
}

impl Value {
    pub fn is_true(&self) -> bool {
        match self {
            Value::Bool(value) => *value,
            Value::Number(value) => *value != 0,
            Value::String(value) => !value.is_empty(),
            Value::Class(_) | Value::Instance(_) | Value::None => false,
        }
    }

    /// Type label used by error messages; instances report their class name.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Number(_) => "int",
            Value::String(_) => "str",
            Value::Bool(_) => "bool",
            Value::Class(_) => "class",
            Value::Instance(instance) => instance.class().name(),
            Value::None => "NoneType",
        }
    }

    /// Writes the value's printed form to the context's output. Instances
    /// render through their `__str__` method when one is defined at arity 0,
    /// and fall back to an address-based identity string otherwise.
    pub fn print(&self, ctx: &mut dyn Context) -> Result<(), RuntimeError> {
        match self {
            Value::Number(value) => write_text(ctx, &value.to_string()),
            Value::String(value) => write_text(ctx, value),
            Value::Bool(true) => write_text(ctx, "True"),
            Value::Bool(false) => write_text(ctx, "False"),
            Value::Class(class) => write_text(ctx, &format!("Class {}", class.name())),
            Value::Instance(instance) => {
                if instance.has_method(STR_METHOD, 0) {
                    let rendered = Instance::call(instance, STR_METHOD, Vec::new(), ctx)?;
                    rendered.print(ctx)
                } else {
                    write_text(ctx, &format!("{:p}", Rc::as_ptr(instance)))
                }
            }
            Value::None => write_text(ctx, "None"),
        }
    }
}

/// Structural for primitives, pointer identity for classes and instances.
/// Guest-language equality goes through `compare::equal` instead.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::None, Value::None) => true,
            _ => false,
        }
    }
}
