//! Runtime engine for compiled state machines.
//!
//! The engine owns every callable in fixed-size arrays and addresses them
//! purely by index. It never allocates after construction and never halts
//! on its own: callers drive it by invoking [`StateMachine::run`] from their
//! own loop and stop by no longer calling it.

mod error;
mod machine;

pub use error::MachineError;
pub use machine::{StateMachine, StepOutcome};
