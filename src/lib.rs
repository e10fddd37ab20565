//! Spacemachine: a finite-state machine that fits a fixed memory budget
//!
//! A machine is a set of states, each with a work action, and guarded
//! transitions between them. Capacities are const generic parameters, so the
//! whole machine lives in fixed-size arrays with no pointers between states;
//! the default instance is planned to fit in 4 KiB.
//!
//! # Core Concepts
//!
//! - **Capacity planning**: [`core::plan`](crate::core::plan) derives slot counts from a byte budget
//! - **Builder**: [`StateMachineBuilder`] validates declarations and compiles them
//! - **Engine**: [`StateMachine`] checks guards, then runs the current state's work
//!
//! # Example
//!
//! ```rust
//! use spacemachine::{StateMachine, StateMachineBuilder};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let ticks = Rc::new(Cell::new(0));
//! let mut machine: StateMachine = StateMachine::new();
//!
//! let mut builder = StateMachineBuilder::new(&mut machine);
//! let counting = {
//!     let ticks = Rc::clone(&ticks);
//!     builder.create_state(move || ticks.set(ticks.get() + 1))
//! };
//! let done = builder.create_state(|| {});
//! let limit = Rc::clone(&ticks);
//! builder.create_transition(counting, done, move || limit.get() >= 3);
//! builder.set_initial_state(counting);
//! let machine = builder.build().unwrap();
//!
//! for _ in 0..10 {
//!     machine.run().unwrap();
//! }
//!
//! assert_eq!(ticks.get(), 3);
//! assert_eq!(machine.current_state(), 1);
//! ```

pub mod builder;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use builder::{BuildError, StateHandle, StateMachineBuilder, TransitionHandle};
pub use engine::{MachineError, StateMachine, StepOutcome};
