use std::any::Any;

use pl_compiler::{compile_source, CompileOptions};
use pl_core::{Arity, Dialogue, HostHandle, HostObjects, ParleyError, Value};

use crate::{Bindings, DialogueHost};

pub const MOVEMENT: &str = r#"
(label direction
  (text "Where do you wanna go?")
  (choice "-X" jump decrease-x)
  (choice "+X" jump increase-x)
  (choice "-Z" cond (cmp iter-count 10) jump decrease-z))

(label decrease-x
  (text "Decreasing player X...")
  (after (body (set* iter-count (+ iter-count 1)) (move self-pawn -10 0 0)) jump direction))

(label increase-x
  (text "Increasing player X...")
  (after (body (set* iter-count (+ iter-count 1)) (move self-pawn 10 0 0)) jump direction))

(label decrease-z
  (text "Decreasing player Z...")
  (after (body (set* iter-count (+ iter-count 1)) (move self-pawn 0 0 -10)) jump direction))

(start-dialogue direction)
"#;

pub const PAWN: HostHandle = HostHandle(7);

pub fn dialogue(source: &str) -> Dialogue {
    compile_source(source, CompileOptions::default())
        .expect("test dialogue should compile")
        .dialogue
}

#[derive(Debug, Default)]
pub struct Pawn {
    pub position: [f64; 3],
}

#[derive(Debug, Default)]
pub struct PawnObjects {
    pub pawn: Pawn,
}

impl HostObjects for PawnObjects {
    fn resolve_mut(&mut self, handle: HostHandle) -> Option<&mut dyn Any> {
        if handle == PAWN {
            Some(&mut self.pawn as &mut dyn Any)
        } else {
            None
        }
    }
}

fn move_pawn(objects: &mut dyn HostObjects, args: &[Value]) -> Result<Value, ParleyError> {
    let handle = args[0].expect_handle("move")?;
    let delta = [
        args[1].expect_number("move")?,
        args[2].expect_number("move")?,
        args[3].expect_number("move")?,
    ];
    let pawn = objects
        .resolve_mut(handle)
        .and_then(|object| object.downcast_mut::<Pawn>())
        .ok_or_else(|| ParleyError::host("TEST_NO_PAWN", "handle does not name a pawn"))?;
    for (axis, step) in pawn.position.iter_mut().zip(delta) {
        *axis += step;
    }
    Ok(Value::None)
}

/// Pawn plus a persisted `iter-count`, absorbed after each submission.
#[derive(Debug, Default)]
pub struct MovementHost {
    pub iter_count: f64,
    pub objects: PawnObjects,
    pub absorbed: usize,
}

impl MovementHost {
    pub fn position(&self) -> [f64; 3] {
        self.objects.pawn.position
    }
}

impl DialogueHost for MovementHost {
    fn seed_bindings(&self, bindings: &mut Bindings) -> Result<(), ParleyError> {
        bindings.bind_number("iter-count", self.iter_count);
        bindings.bind_handle("self-pawn", PAWN);
        bindings.register_native("move", Arity::Exact(4), move_pawn);
        Ok(())
    }

    fn host_objects(&mut self) -> &mut dyn HostObjects {
        &mut self.objects
    }

    fn absorb_bindings(&mut self, bindings: &Bindings) -> Result<(), ParleyError> {
        if let Some(value) = bindings.number("iter-count") {
            self.iter_count = value;
        }
        self.absorbed += 1;
        Ok(())
    }
}
