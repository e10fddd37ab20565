//! Builder API for declaring and compiling state machines.
//!
//! Declarations live in an arena owned by the builder and are referred to
//! by [`StateHandle`]s. Nothing reaches the target machine until
//! [`StateMachineBuilder::build`] has validated the whole graph.

pub mod error;
pub mod handle;
pub mod machine;

pub use error::BuildError;
pub use handle::{StateHandle, TransitionHandle};
pub use machine::StateMachineBuilder;
