use std::collections::BTreeMap;

use pl_core::{Arity, HostHandle, HostObjects, NativeFn, NativeFunction, ParleyError, Value};

use crate::builtins::register_builtins;

/// Symbol table the evaluator reads and `set*` writes.
pub trait Environment {
    fn lookup(&self, name: &str) -> Result<Value, ParleyError>;
    /// Rebinds an existing symbol. Unbound names are an error.
    fn assign(&mut self, name: &str, value: Value) -> Result<(), ParleyError>;
    fn host_objects(&mut self) -> &mut dyn HostObjects;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: BTreeMap<String, Value>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut bindings = Self::new();
        register_builtins(&mut bindings);
        bindings
    }

    /// Binds `name`, returning the value it replaced.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    pub fn bind_number(&mut self, name: impl Into<String>, value: f64) {
        self.bind(name, Value::Number(value));
    }

    pub fn bind_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bind(name, Value::Text(value.into()));
    }

    pub fn bind_handle(&mut self, name: impl Into<String>, handle: HostHandle) {
        self.bind(name, Value::Handle(handle));
    }

    pub fn register_native(&mut self, name: &'static str, arity: Arity, func: NativeFn) {
        self.bind(
            name,
            Value::NativeFunction(NativeFunction::new(name, arity, func)),
        );
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_number)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Environment for a single turn: seeded bindings plus the host's object
/// registry. Dropped at the end of the turn; the host re-reads whatever it
/// needs from [`TurnEnvironment::into_bindings`].
pub struct TurnEnvironment<'h> {
    bindings: Bindings,
    objects: &'h mut dyn HostObjects,
}

impl<'h> TurnEnvironment<'h> {
    pub fn new(bindings: Bindings, objects: &'h mut dyn HostObjects) -> Self {
        Self { bindings, objects }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn into_bindings(self) -> Bindings {
        self.bindings
    }
}

impl Environment for TurnEnvironment<'_> {
    fn lookup(&self, name: &str) -> Result<Value, ParleyError> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| ParleyError::undefined_symbol(name))
    }

    fn assign(&mut self, name: &str, value: Value) -> Result<(), ParleyError> {
        match self.bindings.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ParleyError::undefined_symbol(name)),
        }
    }

    fn host_objects(&mut self) -> &mut dyn HostObjects {
        &mut *self.objects
    }
}
