//! Build errors for the state machine builder.

use thiserror::Error;

/// Errors that can occur when validating a declared state machine.
///
/// None of these leave a partially written machine behind: the target is
/// only touched once validation has passed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("State machine does not have enough space for registered states (reserved: {reserved}, registered: {registered}). Try allocating a bigger state machine, like StateMachine<{suggested_states}, {suggested_transitions}>")]
    StateCapacityExceeded {
        reserved: usize,
        registered: usize,
        suggested_states: usize,
        suggested_transitions: usize,
    },

    #[error("State machine does not have enough space for registered transitions (reserved: {reserved}, registered: {registered}). Try allocating a bigger state machine, like StateMachine<{suggested_states}, {suggested_transitions}>")]
    TransitionCapacityExceeded {
        reserved: usize,
        registered: usize,
        suggested_states: usize,
        suggested_transitions: usize,
    },

    #[error("No states registered. Call .create_state(work) before .build()")]
    MissingStates,

    #[error("No transitions registered. Call .create_transition(from, to, guard) before .build()")]
    MissingTransitions,

    #[error("Initial state not specified. Call .set_initial_state(state) before .build()")]
    MissingInitialState,

    #[error("State handle {index} was not created by this builder")]
    ForeignState { index: usize },

    #[error("State machine has unreachable states {} (indices start at 0 in declaration order). Remove the states or add transitions targeting them", format_indices(.indices))]
    UnreachableStates { indices: Vec<usize> },
}

fn format_indices(indices: &[usize]) -> String {
    let listed: Vec<String> = indices.iter().map(ToString::to_string).collect();
    format!("[{}]", listed.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_message_lists_indices() {
        let err = BuildError::UnreachableStates {
            indices: vec![1, 4],
        };

        assert!(err.to_string().contains("[1, 4]"));
    }

    #[test]
    fn capacity_message_suggests_bigger_machine() {
        let err = BuildError::StateCapacityExceeded {
            reserved: 2,
            registered: 3,
            suggested_states: 3,
            suggested_transitions: 8,
        };
        let message = err.to_string();

        assert!(message.contains("reserved: 2"));
        assert!(message.contains("registered: 3"));
        assert!(message.contains("StateMachine<3, 8>"));
    }

    #[test]
    fn format_indices_handles_edges() {
        assert_eq!(format_indices(&[]), "[]");
        assert_eq!(format_indices(&[7]), "[7]");
        assert_eq!(format_indices(&[0, 2, 5]), "[0, 2, 5]");
    }
}
