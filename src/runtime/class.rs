use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Statement;
use crate::interpreter::Flow;
use crate::runtime::context::Context;
use crate::runtime::error::RuntimeError;
use crate::runtime::value::{Closure, Value};

pub const INIT_METHOD: &str = "__init__";
pub const ADD_METHOD: &str = "__add__";
pub const EQ_METHOD: &str = "__eq__";
pub const LT_METHOD: &str = "__lt__";
pub const STR_METHOD: &str = "__str__";

const SELF_NAME: &str = "self";

/// A named method. `self` is bound implicitly on call and does not count
/// towards the formal parameter list.
#[derive(Debug)]
pub struct Method {
    pub name: String,
    pub formal_params: Vec<String>,
    pub body: Statement,
}

/// Immutable class descriptor. Lives for the rest of the program once
/// installed by a class definition.
#[derive(Debug)]
pub struct Class {
    name: String,
    parent: Option<Rc<Class>>,
    method_index: HashMap<String, Rc<Method>>,
}

impl Class {
    /// Builds the flat method index up front: the parent's entries first,
    /// then own methods on top. Deeper ancestors are already folded into the
    /// parent's index, so lookup never walks the chain.
    pub fn new(name: impl Into<String>, methods: Vec<Method>, parent: Option<Rc<Class>>) -> Rc<Self> {
        let mut method_index = match &parent {
            Some(parent) => parent.method_index.clone(),
            None => HashMap::new(),
        };
        for method in methods {
            method_index.insert(method.name.clone(), Rc::new(method));
        }
        Rc::new(Self {
            name: name.into(),
            parent,
            method_index,
        })
    }

    pub fn method(&self, name: &str) -> Option<&Rc<Method>> {
        self.method_index.get(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<Class>> {
        self.parent.as_ref()
    }
}

/// An object: a class reference plus its own mutable field scope. Shared via
/// `Rc`; field cycles between instances are tolerated and simply never
/// reclaimed, which is acceptable at this interpreter's program sizes.
#[derive(Debug)]
pub struct Instance {
    class: Rc<Class>,
    fields: RefCell<Closure>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(Closure::new()),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    /// The instance's field scope, itself an ordinary closure.
    pub fn fields(&self) -> Ref<'_, Closure> {
        self.fields.borrow()
    }

    pub fn fields_mut(&self) -> RefMut<'_, Closure> {
        self.fields.borrow_mut()
    }

    pub fn has_method(&self, method: &str, arity: usize) -> bool {
        self.class
            .method(method)
            .is_some_and(|found| found.formal_params.len() == arity)
    }

    /// Dispatches `method` on `this`. A fresh closure maps `self` to the
    /// receiver and each formal parameter to its argument, then the method
    /// body runs under it. The result is the value a `return` unwound with,
    /// or `None` when the body completes normally.
    pub fn call(
        this: &Rc<Instance>,
        method: &str,
        args: Vec<Value>,
        ctx: &mut dyn Context,
    ) -> Result<Value, RuntimeError> {
        let Some(found) = this
            .class
            .method(method)
            .filter(|found| found.formal_params.len() == args.len())
        else {
            return Err(RuntimeError::MethodNotFound {
                method: method.to_string(),
                arity: args.len(),
                class: this.class.name().to_string(),
            });
        };
        let found = Rc::clone(found);

        let mut closure = Closure::new();
        closure.insert(SELF_NAME.to_string(), Value::Instance(Rc::clone(this)));
        for (param, value) in found.formal_params.iter().zip(args) {
            closure.insert(param.clone(), value);
        }

        Ok(found.body.execute(&mut closure, ctx)?.into_value())
    }
}
