mod builtins;
mod environment;
mod eval;
mod host;
mod runtime;

pub use builtins::register_builtins;
pub use environment::{Bindings, Environment, TurnEnvironment};
pub use eval::{evaluate, evaluate_condition, execute_block, SET_FORM};
pub use host::{BuiltinHost, DialogueHost};
pub use runtime::{
    ChoiceIndexing, DialogueRuntime, DialogueView, RuntimeOptions, RuntimeSnapshot,
    SubmitOutcome, CONTINUE_CHOICE_TEXT, RUNTIME_SNAPSHOT_SCHEMA,
};

#[cfg(test)]
mod runtime_test_support;
#[cfg(test)]
mod runtime_tests;
#[cfg(test)]
mod snapshot_tests;
