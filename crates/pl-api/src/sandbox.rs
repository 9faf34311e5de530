//! Reference host: one pawn in 3D space plus persisted numeric variables.

use std::any::Any;
use std::collections::BTreeMap;

use pl_core::{Arity, HostHandle, HostObjects, ParleyError, Value};
use pl_runtime::{Bindings, DialogueHost};
use serde::{Deserialize, Serialize};

pub const SELF_PAWN: &str = "self-pawn";
pub const SELF_PAWN_HANDLE: HostHandle = HostHandle(1);
pub const MOVE_FUNCTION: &str = "move";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PawnPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PawnPosition {
    fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

/// Everything the sandbox persists between turns and sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxState {
    #[serde(default)]
    pub pawn: PawnPosition,
    #[serde(default)]
    pub vars: BTreeMap<String, f64>,
}

#[derive(Debug, Default)]
struct SandboxObjects {
    pawn: PawnPosition,
}

impl HostObjects for SandboxObjects {
    fn resolve_mut(&mut self, handle: HostHandle) -> Option<&mut dyn Any> {
        if handle == SELF_PAWN_HANDLE {
            Some(&mut self.pawn as &mut dyn Any)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct SandboxHost {
    vars: BTreeMap<String, f64>,
    objects: SandboxObjects,
}

impl SandboxHost {
    pub fn new(state: SandboxState) -> Self {
        Self {
            vars: state.vars,
            objects: SandboxObjects { pawn: state.pawn },
        }
    }

    pub fn with_vars<I, K>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self::new(SandboxState {
            pawn: PawnPosition::default(),
            vars: vars.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    pub fn var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), value);
    }

    pub fn pawn(&self) -> PawnPosition {
        self.objects.pawn
    }

    pub fn state(&self) -> SandboxState {
        SandboxState {
            pawn: self.objects.pawn,
            vars: self.vars.clone(),
        }
    }
}

impl DialogueHost for SandboxHost {
    fn seed_bindings(&self, bindings: &mut Bindings) -> Result<(), ParleyError> {
        for (name, value) in &self.vars {
            bindings.bind_number(name.clone(), *value);
        }
        bindings.bind_handle(SELF_PAWN, SELF_PAWN_HANDLE);
        bindings.register_native(MOVE_FUNCTION, Arity::Exact(4), move_pawn);
        Ok(())
    }

    fn host_objects(&mut self) -> &mut dyn HostObjects {
        &mut self.objects
    }

    fn absorb_bindings(&mut self, bindings: &Bindings) -> Result<(), ParleyError> {
        let mut updates = Vec::with_capacity(self.vars.len());
        for name in self.vars.keys() {
            match bindings.get(name) {
                Some(Value::Number(next)) => updates.push((name.clone(), *next)),
                Some(other) => {
                    return Err(ParleyError::host(
                        "SANDBOX_VAR_TYPE",
                        format!(
                            "Variable \"{}\" must stay a number, got {}.",
                            name,
                            other.type_name()
                        ),
                    ))
                }
                None => {}
            }
        }
        self.vars.extend(updates);
        Ok(())
    }
}

/// `(move <pawn> dx dy dz)`
fn move_pawn(objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let [target, dx, dy, dz] = args else {
        return Err(ParleyError::host(
            "SANDBOX_MOVE_ARGS",
            "move expects a pawn and three offsets.",
        ));
    };
    let handle = target.expect_handle("move")?;
    let (dx, dy, dz) = (
        dx.expect_number("move")?,
        dy.expect_number("move")?,
        dz.expect_number("move")?,
    );

    let Some(pawn) = objects
        .resolve_mut(handle)
        .and_then(|object| object.downcast_mut::<PawnPosition>())
    else {
        return Err(ParleyError::host(
            "SANDBOX_UNKNOWN_HANDLE",
            format!("Handle {} does not name a pawn.", handle.0),
        ));
    };
    pawn.translate(dx, dy, dz);
    tracing::trace!(x = pawn.x, y = pawn.y, z = pawn.z, "pawn moved");
    Ok(Value::None)
}
