//! Placeholder minting and value binding.
//!
//! When an expression carries a literal that should not be spliced into the
//! generated SQL text (interval offsets in RANGE frames, for example), the
//! renderer asks a [`ValueBinder`] for a fresh placeholder name and records
//! the literal against it. The enclosing query builder later hands the
//! recorded [`Binding`]s to the database driver; this crate never talks to a
//! driver itself.
//!
//! A binder is an explicit parameter threaded through every `sql()` call
//! rather than ambient state, so independent renders against independent
//! binders compose without coordination. Placeholder allocation within one
//! binder is a plain counter; a binder shared across renders must be shared
//! mutably and therefore serially.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal value recorded against a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

/// Type tag attached to a binding, mirroring the column type the driver
/// should coerce the value to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingType {
    String,
    Integer,
    Float,
    Boolean,
}

impl fmt::Display for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingType::String => write!(f, "string"),
            BindingType::Integer => write!(f, "integer"),
            BindingType::Float => write!(f, "float"),
            BindingType::Boolean => write!(f, "boolean"),
        }
    }
}

/// One placeholder/value/type triple recorded by a [`ValueBinder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// The placeholder name as it appears in the rendered SQL (e.g. `:param0`)
    pub placeholder: String,
    /// The literal value to transmit at execution time
    pub value: Value,
    /// The type the driver should bind the value as
    pub kind: BindingType,
}

/// Mints placeholder names and collects the values bound to them.
///
/// Placeholders are `:{token}{n}` with a counter that increases for the
/// lifetime of the binder, so two mints never collide even across different
/// expressions rendering into the same statement.
///
/// # Examples
///
/// ```
/// use overclause::binder::{BindingType, Value, ValueBinder};
///
/// let mut binder = ValueBinder::new();
/// let p = binder.placeholder("param");
/// assert_eq!(p, ":param0");
/// binder.bind(p, Value::from("1 day"), BindingType::String);
/// assert_eq!(binder.bindings().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueBinder {
    bindings: Vec<Binding>,
    counter: usize,
}

impl ValueBinder {
    /// Create an empty binder
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh placeholder name built from `token` and the next counter
    /// value. The name is returned with a leading `:` ready to splice into
    /// SQL text.
    pub fn placeholder(&mut self, token: &str) -> String {
        let name = format!(":{}{}", token, self.counter);
        self.counter += 1;
        name
    }

    /// Record `value` against `placeholder` under the given type tag.
    pub fn bind(&mut self, placeholder: impl Into<String>, value: impl Into<Value>, kind: BindingType) {
        self.bindings.push(Binding {
            placeholder: placeholder.into(),
            value: value.into(),
            kind,
        });
    }

    /// All bindings recorded so far, in bind order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Drop all bindings and restart the placeholder counter.
    pub fn reset(&mut self) {
        self.bindings.clear();
        self.counter = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_counter_increments() {
        let mut binder = ValueBinder::new();
        assert_eq!(binder.placeholder("param"), ":param0");
        assert_eq!(binder.placeholder("param"), ":param1");
        assert_eq!(binder.placeholder("c"), ":c2");
    }

    #[test]
    fn test_bind_records_in_order() {
        let mut binder = ValueBinder::new();
        let first = binder.placeholder("param");
        binder.bind(first.clone(), "1 day", BindingType::String);
        let second = binder.placeholder("param");
        binder.bind(second.clone(), 42i64, BindingType::Integer);

        let bindings = binder.bindings();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].placeholder, first);
        assert_eq!(bindings[0].value, Value::String("1 day".to_string()));
        assert_eq!(bindings[0].kind, BindingType::String);
        assert_eq!(bindings[1].placeholder, second);
        assert_eq!(bindings[1].value, Value::Integer(42));
    }

    #[test]
    fn test_reset_restarts_counter() {
        let mut binder = ValueBinder::new();
        let p = binder.placeholder("param");
        binder.bind(p, "x", BindingType::String);
        binder.reset();
        assert!(binder.bindings().is_empty());
        assert_eq!(binder.placeholder("param"), ":param0");
    }
}
