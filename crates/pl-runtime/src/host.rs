use pl_core::{HostObjects, NoHostObjects, ParleyError};

use crate::environment::Bindings;

/// Owner of the state a dialogue reads and mutates.
///
/// The runtime builds a fresh environment for every condition check and
/// every submission: builtins first, then [`DialogueHost::seed_bindings`].
/// Once a submission's target label has been built without error, the host
/// gets the final bindings back through [`DialogueHost::absorb_bindings`]
/// and the target is rebuilt against the updated state. A failed turn never
/// reaches the host.
pub trait DialogueHost {
    fn seed_bindings(&self, bindings: &mut Bindings) -> Result<(), ParleyError>;

    fn host_objects(&mut self) -> &mut dyn HostObjects;

    fn absorb_bindings(&mut self, _bindings: &Bindings) -> Result<(), ParleyError> {
        Ok(())
    }
}

/// Stateless host: builtins only, no handles.
#[derive(Debug, Default)]
pub struct BuiltinHost {
    objects: NoHostObjects,
}

impl BuiltinHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DialogueHost for BuiltinHost {
    fn seed_bindings(&self, _bindings: &mut Bindings) -> Result<(), ParleyError> {
        Ok(())
    }

    fn host_objects(&mut self) -> &mut dyn HostObjects {
        &mut self.objects
    }
}
