//! Loosely-typed option and argument values.
//!
//! Load calls are variadic and options arrive from untyped call sites (CLI
//! arguments, config files, embedding code), so everything passed into a
//! settings document or the dispatcher is a [`Value`]. Plain data is cloned
//! deeply; callbacks and element handles are shared by reference.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::env::ElementRef;
use crate::resource::Completion;

/// Named option values, ordered by key.
pub type Options = BTreeMap<String, Value>;

/// Completion callback invoked by modes once a load settles.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(&Completion) + Send + Sync>);

impl Callback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Completion) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, completion: &Completion) {
        (self.0)(completion)
    }

    /// True if both handles point at the same closure.
    pub fn same(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Arc::as_ptr(&self.0))
    }
}

/// A single option value or load argument.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<Value>),
    Map(Options),
    Func(Callback),
    Elem(ElementRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
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

    pub fn as_map(&self) -> Option<&Options> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&Callback> {
        match self {
            Value::Func(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_elem(&self) -> Option<&ElementRef> {
        match self {
            Value::Elem(e) => Some(e),
            _ => None,
        }
    }

    /// Short type name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "array",
            Value::Map(_) => "object",
            Value::Func(_) => "function",
            Value::Elem(_) => "element",
        }
    }

    /// Build a map value from `(key, value)` pairs.
    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// JSON rendering for display; callbacks and elements become descriptive strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as J;
        match self {
            Value::Null => J::Null,
            Value::Bool(b) => J::Bool(*b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => J::from(*n as i64),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(J::Number)
                .unwrap_or(J::Null),
            Value::Str(s) => J::String(s.clone()),
            Value::List(l) => J::Array(l.iter().map(Value::to_json).collect()),
            Value::Map(m) => J::Object(m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()),
            Value::Func(_) => J::String("[function]".to_string()),
            Value::Elem(e) => J::String(format!("[element {}]", e.id())),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => a.same(b),
            (Value::Elem(a), Value::Elem(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
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
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Options> for Value {
    fn from(m: Options) -> Self {
        Value::Map(m)
    }
}

impl From<Callback> for Value {
    fn from(f: Callback) -> Self {
        Value::Func(f)
    }
}

impl From<ElementRef> for Value {
    fn from(e: ElementRef) -> Self {
        Value::Elem(e)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(j: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match j {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            J::String(s) => Value::Str(s),
            J::Array(a) => Value::List(a.into_iter().map(Value::from).collect()),
            J::Object(o) => Value::Map(o.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}

/// Build a `Vec<Value>` argument list from heterogeneous expressions.
///
/// ```
/// use sload_core::{args, Value};
/// let a = args!["app.js", Value::map([("jsPrefix", "/static/")])];
/// assert_eq!(a.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => { ::std::vec::Vec::<$crate::Value>::new() };
    ($($x:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($x)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_conversion_keeps_structure() {
        let j = serde_json::json!({"url": "a.js", "n": 2, "flags": [true, null]});
        let v = Value::from(j);
        let m = v.as_map().unwrap();
        assert_eq!(m.get("url"), Some(&Value::from("a.js")));
        assert_eq!(m.get("n"), Some(&Value::Number(2.0)));
        assert_eq!(
            m.get("flags"),
            Some(&Value::List(vec![Value::Bool(true), Value::Null]))
        );
    }

    #[test]
    fn integral_numbers_render_as_integers() {
        assert_eq!(Value::from(7).to_json().to_string(), "7");
        assert_eq!(Value::Number(1.5).to_json().to_string(), "1.5");
    }

    #[test]
    fn callbacks_compare_by_identity() {
        let a = Callback::new(|_| {});
        let b = Callback::new(|_| {});
        assert_eq!(Value::Func(a.clone()), Value::Func(a));
        assert_ne!(Value::Func(b), Value::Func(Callback::new(|_| {})));
    }

    #[test]
    fn args_macro_converts_each_item() {
        let a = args!["x.css", true, 3, Value::Null];
        assert_eq!(a[0].kind(), "string");
        assert_eq!(a[1].kind(), "boolean");
        assert_eq!(a[2].kind(), "number");
        assert!(a[3].is_null());
    }
}
