//! Runtime faults raised by a packed state machine.

use crate::core::StateIndex;
use thiserror::Error;

/// Consistency violations detected while running a machine.
///
/// These indicate a machine that was never built or an index that was
/// corrupted; they are not meant to be retried.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State index {state} out of range (machine holds {num_states} states)")]
    StateOutOfRange {
        state: StateIndex,
        num_states: StateIndex,
    },
}
