//! Builder that validates and compiles declared states into a packed machine.

use crate::builder::error::BuildError;
use crate::builder::handle::{next_builder_id, StateHandle, TransitionHandle};
use crate::core::{
    Condition, StateIndex, TransitionIndex, Work, MAX_NUM_STATES, MAX_NUM_TRANSITIONS,
};
use crate::engine::StateMachine;
use tracing::{debug, warn};

struct StateRecord {
    work: Work,
}

struct TransitionRecord {
    from: StateHandle,
    to: StateHandle,
    condition: Condition,
}

/// Builder populating a [`StateMachine`] in place.
///
/// States and transitions are declared in any order; declaration order
/// decides compiled indices and guard evaluation order. [`build`](Self::build)
/// validates the whole graph before writing anything to the target.
pub struct StateMachineBuilder<
    'm,
    const S: usize = MAX_NUM_STATES,
    const T: usize = MAX_NUM_TRANSITIONS,
> {
    machine: &'m mut StateMachine<S, T>,
    id: u32,
    states: Vec<StateRecord>,
    transitions: Vec<TransitionRecord>,
    initial: Option<StateHandle>,
}

impl<'m, const S: usize, const T: usize> StateMachineBuilder<'m, S, T> {
    /// Create a builder bound to `machine`.
    pub fn new(machine: &'m mut StateMachine<S, T>) -> Self {
        Self {
            machine,
            id: next_builder_id(),
            states: Vec::with_capacity(S),
            transitions: Vec::with_capacity(T),
            initial: None,
        }
    }

    /// Declare a state with the work it performs while current.
    pub fn create_state<F>(&mut self, work: F) -> StateHandle
    where
        F: FnMut() + 'static,
    {
        let handle = StateHandle {
            builder: self.id,
            index: self.states.len(),
        };
        self.states.push(StateRecord {
            work: Box::new(work),
        });
        handle
    }

    /// Set the state the machine starts in. The last call wins.
    pub fn set_initial_state(&mut self, state: StateHandle) {
        self.initial = Some(state);
    }

    /// Declare a transition guarded by `condition`.
    ///
    /// Transitions sharing a source are evaluated in the order declared here.
    pub fn create_transition<F>(
        &mut self,
        from: StateHandle,
        to: StateHandle,
        condition: F,
    ) -> TransitionHandle
    where
        F: FnMut() -> bool + 'static,
    {
        let handle = TransitionHandle {
            index: self.transitions.len(),
        };
        self.transitions.push(TransitionRecord {
            from,
            to,
            condition: Box::new(condition),
        });
        handle
    }

    /// Number of states declared so far.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of transitions declared so far.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Validate the declared graph and compile it into the bound machine.
    ///
    /// On failure the machine is left exactly as it was.
    pub fn build(self) -> Result<&'m mut StateMachine<S, T>, BuildError> {
        match self.validate() {
            Ok(initial) => Ok(self.compile(initial)),
            Err(error) => {
                warn!(%error, "rejected state machine definition");
                Err(error)
            }
        }
    }

    fn validate(&self) -> Result<StateIndex, BuildError> {
        let states = self.states.len();
        let transitions = self.transitions.len();

        if states > S {
            return Err(BuildError::StateCapacityExceeded {
                reserved: S,
                registered: states,
                suggested_states: states,
                suggested_transitions: transitions.max(T),
            });
        }

        if transitions > T {
            return Err(BuildError::TransitionCapacityExceeded {
                reserved: T,
                registered: transitions,
                suggested_states: states.max(S),
                suggested_transitions: transitions,
            });
        }

        if states == 0 {
            return Err(BuildError::MissingStates);
        }

        if transitions == 0 {
            return Err(BuildError::MissingTransitions);
        }

        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let initial = self.resolve(initial)?;

        // Single hop: a state counts as reachable when it is the initial
        // state or the direct target of any transition.
        let mut reachable = vec![false; states];
        reachable[initial] = true;
        for transition in &self.transitions {
            self.resolve(transition.from)?;
            reachable[self.resolve(transition.to)?] = true;
        }

        let unreachable: Vec<usize> = reachable
            .iter()
            .enumerate()
            .filter(|(_, reached)| !**reached)
            .map(|(index, _)| index)
            .collect();
        if !unreachable.is_empty() {
            return Err(BuildError::UnreachableStates {
                indices: unreachable,
            });
        }

        Ok(initial as StateIndex)
    }

    fn resolve(&self, state: StateHandle) -> Result<usize, BuildError> {
        if state.builder != self.id || state.index >= self.states.len() {
            return Err(BuildError::ForeignState { index: state.index });
        }
        Ok(state.index)
    }

    fn compile(self, initial: StateIndex) -> &'m mut StateMachine<S, T> {
        let Self {
            machine,
            states,
            transitions,
            ..
        } = self;
        let num_states = states.len();
        let num_transitions = transitions.len();

        machine.states.iter_mut().for_each(|slot| *slot = None);
        machine.conditions.iter_mut().for_each(|slot| *slot = None);
        machine.targets.fill(0);
        machine.starts.fill(0);

        // Group transitions by source, keeping declaration order within a group.
        let mut cursors = vec![0usize; num_states];
        for transition in &transitions {
            cursors[transition.from.index] += 1;
        }
        let mut offset = 0;
        for (state, cursor) in cursors.iter_mut().enumerate() {
            let count = *cursor;
            machine.starts[state] = offset as TransitionIndex;
            *cursor = offset;
            offset += count;
        }

        for (index, record) in states.into_iter().enumerate() {
            machine.states[index] = Some(record.work);
        }

        for record in transitions {
            let slot = cursors[record.from.index];
            cursors[record.from.index] += 1;
            machine.conditions[slot] = Some(record.condition);
            machine.targets[slot] = record.to.index as StateIndex;
        }

        machine.num_states = num_states as StateIndex;
        machine.num_transitions = num_transitions as TransitionIndex;
        machine.current = initial;

        debug!(
            states = num_states,
            transitions = num_transitions,
            initial,
            "compiled state machine"
        );
        machine
    }
}
