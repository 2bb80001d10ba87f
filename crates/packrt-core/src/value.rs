//! Dynamic values exchanged between modules.

use crate::errors::Result;
use crate::exports::Exports;
use std::fmt;
use std::rc::Rc;

type NativeFn = dyn Fn(&[Value]) -> Result<Value>;

/// A native callable exported by a module
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    body: Rc<NativeFn>,
}

impl Function {
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        Self {
            name: Rc::from(name),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.body)(args)
    }

    /// Two handles to the same function object
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}

#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Function(Function),
    Namespace(Exports),
}

impl Value {
    pub fn function<F>(name: &str, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + 'static,
    {
        Value::Function(Function::new(name, body))
    }

    /// The `typeof`-style name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Namespace(_) => "object",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Exports> {
        match self {
            Value::Namespace(exports) => Some(exports),
            _ => None,
        }
    }

    /// Render as JSON. Functions become `"[Function]"`, namespaces nested objects.
    pub fn to_json(&self) -> serde_json::Value {
        crate::exports::value_to_json(self, &mut Default::default())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Namespace(a), Value::Namespace(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => fmt_number(*n, f),
            Value::String(s) => write!(f, "{}", s),
            Value::Function(func) => write!(f, "[Function: {}]", func.name()),
            Value::Namespace(exports) if exports.is_namespace() => write!(f, "[Module]"),
            Value::Namespace(_) => write!(f, "[object Object]"),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Function> for Value {
    fn from(func: Function) -> Self {
        Value::Function(func)
    }
}

impl From<Exports> for Value {
    fn from(exports: Exports) -> Self {
        Value::Namespace(exports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_console_output() {
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from("in funcA").to_string(), "in funcA");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
    }

    #[test]
    fn test_function_call_and_identity() {
        let double = Function::new("double", |args| {
            let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
            Ok(Value::from(n * 2.0))
        });
        let copy = double.clone();
        assert!(double.ptr_eq(&copy));
        assert_eq!(double.call(&[Value::from(21)]).unwrap(), Value::from(42));
        assert_eq!(Value::from(double).to_string(), "[Function: double]");
    }

    #[test]
    fn test_distinct_functions_are_not_equal() {
        let a = Value::function("f", |_| Ok(Value::Undefined));
        let b = Value::function("f", |_| Ok(Value::Undefined));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::Null.type_name(), "object");
        assert_eq!(Value::from(true).type_name(), "boolean");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(Exports::new()).type_name(), "object");
    }
}
