//! Core types shared by the planner, the engine and the builder.
//!
//! Everything in the compiled machine is addressed by small integer indices:
//! - `StateIndex` addresses a state slot
//! - `TransitionIndex` addresses a transition slot
//!
//! Callables are boxed so every slot has the same size regardless of what
//! the closure captures.

pub mod capacity;

pub use capacity::{
    plan, CapacityPlan, PlanError, DEFAULT_PLAN, FIXED_OVERHEAD, MAX_INDEXABLE, MAX_NUM_STATES,
    MAX_NUM_TRANSITIONS, STATE_MACHINE_MAX_SIZE, STATE_SIZE, TRANSITION_RATIO, TRANSITION_SIZE,
};

/// Index of a state in a compiled machine.
pub type StateIndex = u8;

/// Index of a transition in a compiled machine.
pub type TransitionIndex = u8;

/// Work action executed while a state is current.
pub type Work = Box<dyn FnMut()>;

/// Guard deciding whether a transition fires.
pub type Condition = Box<dyn FnMut() -> bool>;
