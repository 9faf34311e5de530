use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, ParleyError};

/// Opaque reference to a host-side object. The host resolves it through its
/// [`HostObjects`] registry; the language core never sees the object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HostHandle(pub u64);

/// Host-side lookup for the objects behind [`HostHandle`]s.
pub trait HostObjects {
    fn resolve_mut(&mut self, handle: HostHandle) -> Option<&mut dyn Any>;
}

#[derive(Debug, Default)]
pub struct NoHostObjects;

impl HostObjects for NoHostObjects {
    fn resolve_mut(&mut self, _handle: HostHandle) -> Option<&mut dyn Any> {
        None
    }
}

pub type NativeFn = fn(&mut dyn HostObjects, &[Value]) -> Result<Value, ParleyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(expected) => count == expected,
            Self::AtLeast(min) => count >= min,
        }
    }

    pub fn describe(self) -> String {
        match self {
            Self::Exact(1) => "exactly 1 argument".to_string(),
            Self::Exact(n) => format!("exactly {} arguments", n),
            Self::AtLeast(0) => "any number of arguments".to_string(),
            Self::AtLeast(1) => "at least 1 argument".to_string(),
            Self::AtLeast(n) => format!("at least {} arguments", n),
        }
    }
}

/// Host function bound under a symbol name. Plain data: a name, an arity
/// contract and a function pointer.
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: Arity,
    pub func: NativeFn,
}

impl NativeFunction {
    pub fn new(name: &'static str, arity: Arity, func: NativeFn) -> Self {
        Self { name, arity, func }
    }

    /// Checks arity, then applies the function to already-evaluated arguments.
    pub fn call(
        &self,
        objects: &mut dyn HostObjects,
        args: &[Value],
    ) -> Result<Value, ParleyError> {
        if !self.arity.accepts(args.len()) {
            return Err(ParleyError::new(
                ErrorKind::ArityMismatch,
                format!(
                    "Function \"{}\" expects {}, got {}.",
                    self.name,
                    self.arity.describe(),
                    args.len()
                ),
            ));
        }
        (self.func)(objects, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Symbol(String),
    NativeFunction(NativeFunction),
    Handle(HostHandle),
    None,
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<HostHandle> {
        match self {
            Self::Handle(handle) => Some(*handle),
            _ => None,
        }
    }

    /// Numeric truth: only a Number strictly greater than zero is true.
    pub fn is_truthy(&self) -> bool {
        matches!(self, Self::Number(value) if *value > 0.0)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::NativeFunction(_) => "function",
            Self::Handle(_) => "handle",
            Self::None => "none",
        }
    }

    pub fn from_bool(value: bool) -> Self {
        Self::Number(if value { 1.0 } else { 0.0 })
    }

    pub fn expect_number(&self, context: &str) -> Result<f64, ParleyError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(_)
            | Self::Symbol(_)
            | Self::NativeFunction(_)
            | Self::Handle(_)
            | Self::None => Err(ParleyError::type_mismatch(
                context,
                "number",
                self.type_name(),
            )),
        }
    }

    pub fn expect_handle(&self, context: &str) -> Result<HostHandle, ParleyError> {
        match self {
            Self::Handle(handle) => Ok(*handle),
            Self::Number(_)
            | Self::Text(_)
            | Self::Symbol(_)
            | Self::NativeFunction(_)
            | Self::None => Err(ParleyError::type_mismatch(
                context,
                "handle",
                self.type_name(),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
            Self::Symbol(name) => f.write_str(name),
            Self::NativeFunction(function) => write!(f, "<native {}>", function.name),
            Self::Handle(handle) => write!(f, "<handle {}>", handle.0),
            Self::None => f.write_str("none"),
        }
    }
}
