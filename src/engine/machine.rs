//! Packed state machine with fixed-capacity storage.

use crate::core::{
    Condition, StateIndex, TransitionIndex, Work, MAX_INDEXABLE, MAX_NUM_STATES,
    MAX_NUM_TRANSITIONS, STATE_MACHINE_MAX_SIZE, STATE_SIZE, TRANSITION_SIZE,
};
use crate::engine::error::MachineError;
use std::fmt;
use std::mem::size_of;
use std::ops::Range;
use tracing::trace;

/// Result of a single transition scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A guard fired and the machine moved to a new state
    Transitioned { from: StateIndex, to: StateIndex },

    /// No guard fired, the current state is unchanged
    Unchanged,
}

impl StepOutcome {
    /// Check whether a transition fired.
    pub fn is_transitioned(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// Single-active-state machine stored in fixed-size arrays.
///
/// `S` and `T` are the state and transition capacities. Both must be
/// addressable by a `u8`; larger values fail to compile when the machine is
/// constructed. The defaults come from [`crate::core::DEFAULT_PLAN`] and keep
/// the whole instance within [`STATE_MACHINE_MAX_SIZE`] bytes.
///
/// A fresh machine holds no states. Populate it once with a
/// [`StateMachineBuilder`](crate::builder::StateMachineBuilder), then call
/// [`run`](Self::run) repeatedly.
///
/// # Example
///
/// ```rust
/// use spacemachine::{StateMachine, StateMachineBuilder, StepOutcome};
///
/// let mut machine: StateMachine = StateMachine::new();
///
/// let mut builder = StateMachineBuilder::new(&mut machine);
/// let idle = builder.create_state(|| {});
/// let busy = builder.create_state(|| {});
/// builder.create_transition(idle, busy, || true);
/// builder.create_transition(busy, idle, || true);
/// builder.set_initial_state(idle);
/// let machine = builder.build().unwrap();
///
/// assert_eq!(machine.current_state(), 0);
/// assert_eq!(
///     machine.run().unwrap(),
///     StepOutcome::Transitioned { from: 0, to: 1 }
/// );
/// ```
pub struct StateMachine<const S: usize = MAX_NUM_STATES, const T: usize = MAX_NUM_TRANSITIONS> {
    pub(crate) conditions: [Option<Condition>; T],
    pub(crate) states: [Option<Work>; S],
    pub(crate) current: StateIndex,
    pub(crate) num_states: StateIndex,
    pub(crate) targets: [StateIndex; T],
    pub(crate) num_transitions: TransitionIndex,
    pub(crate) starts: [TransitionIndex; S],
}

const _: () = assert!(size_of::<StateMachine>() <= STATE_MACHINE_MAX_SIZE);

// Less than one callable of slack, otherwise the default plan wastes space.
const _: () = {
    let smallest = if STATE_SIZE < TRANSITION_SIZE {
        STATE_SIZE
    } else {
        TRANSITION_SIZE
    };
    assert!(size_of::<StateMachine>() + smallest >= STATE_MACHINE_MAX_SIZE);
};

impl<const S: usize, const T: usize> StateMachine<S, T> {
    const INDEXABLE: () = assert!(
        S <= MAX_INDEXABLE && T <= MAX_INDEXABLE,
        "state machine capacities must be addressable by u8 indices"
    );

    /// Create an empty machine with no states.
    pub fn new() -> Self {
        let () = Self::INDEXABLE;

        Self {
            conditions: std::array::from_fn(|_| None),
            states: std::array::from_fn(|_| None),
            current: 0,
            num_states: 0,
            targets: [0; T],
            num_transitions: 0,
            starts: [0; S],
        }
    }

    /// Get the index of the current state.
    pub fn current_state(&self) -> StateIndex {
        self.current
    }

    /// Get the number of compiled states.
    pub fn num_states(&self) -> StateIndex {
        self.num_states
    }

    /// Get the number of compiled transitions.
    pub fn num_transitions(&self) -> TransitionIndex {
        self.num_transitions
    }

    /// Check whether a builder has populated this machine.
    pub fn is_built(&self) -> bool {
        self.num_states > 0
    }

    /// Get the configured `(states, transitions)` capacity.
    pub const fn capacity(&self) -> (usize, usize) {
        (S, T)
    }

    /// Invoke the work action of the current state.
    pub fn do_work(&mut self) -> Result<(), MachineError> {
        let state = self.checked(self.current)?;
        if let Some(work) = self.states[state].as_mut() {
            work();
        }
        Ok(())
    }

    /// Evaluate the current state's guards in declaration order.
    ///
    /// The first guard returning `true` moves the machine to its target and
    /// ends the scan; guards declared after it are not evaluated.
    pub fn trigger_transitions(&mut self) -> Result<StepOutcome, MachineError> {
        let from = self.current;

        for index in self.transition_range(from)? {
            let fired = self.conditions[index]
                .as_mut()
                .is_some_and(|condition| condition());
            if !fired {
                continue;
            }

            let to = self.targets[index];
            self.current = to;
            trace!(from, to, transition = index, "transition fired");
            return Ok(StepOutcome::Transitioned { from, to });
        }

        Ok(StepOutcome::Unchanged)
    }

    /// Execute one step: trigger transitions, then do the current state's work.
    ///
    /// A transition that fires takes effect before the work runs, so the
    /// work executed is that of the new state.
    pub fn run(&mut self) -> Result<StepOutcome, MachineError> {
        let outcome = self.trigger_transitions()?;
        self.do_work()?;
        Ok(outcome)
    }

    /// Get the targets of a state's transitions in declaration order.
    pub fn transition_targets(&self, state: StateIndex) -> Result<&[StateIndex], MachineError> {
        let range = self.transition_range(state)?;
        Ok(&self.targets[range])
    }

    fn checked(&self, state: StateIndex) -> Result<usize, MachineError> {
        if state >= self.num_states {
            return Err(MachineError::StateOutOfRange {
                state,
                num_states: self.num_states,
            });
        }
        Ok(usize::from(state))
    }

    fn transition_range(&self, state: StateIndex) -> Result<Range<usize>, MachineError> {
        let index = self.checked(state)?;
        let start = usize::from(self.starts[index]);
        let end = if index + 1 == usize::from(self.num_states) {
            usize::from(self.num_transitions)
        } else {
            usize::from(self.starts[index + 1])
        };
        Ok(start..end)
    }
}

impl<const S: usize, const T: usize> Default for StateMachine<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const S: usize, const T: usize> fmt::Debug for StateMachine<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states = usize::from(self.num_states);
        let transitions = usize::from(self.num_transitions);
        f.debug_struct("StateMachine")
            .field("capacity", &(S, T))
            .field("current", &self.current)
            .field("num_states", &self.num_states)
            .field("num_transitions", &self.num_transitions)
            .field("starts", &&self.starts[..states])
            .field("targets", &&self.targets[..transitions])
            .finish()
    }
}
