//! Capacity planning for fixed-budget state machines.
//!
//! A machine with `S` state slots and `T` transition slots costs
//!
//! ```text
//! FIXED_OVERHEAD + (STATE_SIZE + 1) * S + (TRANSITION_SIZE + 1) * T
//! ```
//!
//! bytes: one callable plus one index byte per slot, and three scalar
//! counters. [`plan`] picks the largest `S` that still leaves room for
//! `ratio` transitions per state, then hands every remaining byte to
//! transitions. It is a `const fn`, so a plan can size a machine type
//! directly:
//!
//! ```rust
//! use spacemachine::core::{plan, CapacityPlan, STATE_SIZE, TRANSITION_SIZE};
//! use spacemachine::StateMachine;
//!
//! const PLAN: CapacityPlan = match plan(1024, STATE_SIZE, TRANSITION_SIZE, 2) {
//!     Ok(plan) => plan,
//!     Err(_) => panic!("1 KiB must fit at least one state"),
//! };
//!
//! type SmallMachine = StateMachine<{ PLAN.max_states }, { PLAN.max_transitions }>;
//!
//! let machine = SmallMachine::new();
//! assert!(!machine.is_built());
//! ```

use super::{Condition, Work};
use serde::{Deserialize, Serialize};
use std::mem::size_of;
use thiserror::Error;

/// Default byte budget of a machine instance.
pub const STATE_MACHINE_MAX_SIZE: usize = 4096;

/// Size of one stored work action.
pub const STATE_SIZE: usize = size_of::<Option<Work>>();

/// Size of one stored guard.
pub const TRANSITION_SIZE: usize = size_of::<Option<Condition>>();

/// Average number of transitions per state the default plan guarantees.
pub const TRANSITION_RATIO: usize = 4;

/// Bytes taken by the current-state and count fields.
pub const FIXED_OVERHEAD: usize = 3;

/// Largest slot count a `u8` index can address.
pub const MAX_INDEXABLE: usize = u8::MAX as usize;

/// Plan backing the default machine capacities.
pub const DEFAULT_PLAN: CapacityPlan = match plan(
    STATE_MACHINE_MAX_SIZE,
    STATE_SIZE,
    TRANSITION_SIZE,
    TRANSITION_RATIO,
) {
    Ok(plan) => plan,
    Err(_) => panic!("default state machine budget cannot be addressed with u8 indices"),
};

/// Default number of state slots.
pub const MAX_NUM_STATES: usize = DEFAULT_PLAN.max_states;

/// Default number of transition slots.
pub const MAX_NUM_TRANSITIONS: usize = DEFAULT_PLAN.max_transitions;

/// Configuration errors raised while planning capacities.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("Budget of {budget} bytes cannot hold a single state (each state needs {per_state} bytes plus {overhead} bytes of counters)")]
    BudgetTooSmall {
        budget: usize,
        per_state: usize,
        overhead: usize,
    },

    #[error("Planned capacity ({max_states} states, {max_transitions} transitions) exceeds the {limit} slots a u8 index can address")]
    IndexOverflow {
        max_states: usize,
        max_transitions: usize,
        limit: usize,
    },
}

/// Slot counts derived from a byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityPlan {
    /// Number of state slots.
    pub max_states: usize,
    /// Number of transition slots.
    pub max_transitions: usize,
    /// Bytes per state slot, index byte included.
    pub state_slot: usize,
    /// Bytes per transition slot, index byte included.
    pub transition_slot: usize,
}

impl CapacityPlan {
    /// Bytes a machine sized by this plan occupies, ignoring alignment padding.
    pub const fn footprint(&self) -> usize {
        FIXED_OVERHEAD
            + self.max_states * self.state_slot
            + self.max_transitions * self.transition_slot
    }

    /// Check whether the planned machine fits in `budget` bytes.
    pub const fn fits(&self, budget: usize) -> bool {
        self.footprint() <= budget
    }

    /// Average number of transition slots per state slot, rounded down.
    pub const fn ratio(&self) -> usize {
        match self.max_states {
            0 => 0,
            states => self.max_transitions / states,
        }
    }
}

/// Derive state and transition capacities from a byte budget.
///
/// Maximizes `max_states + max_transitions` while guaranteeing at least
/// `ratio` transitions per state on average. Fails instead of truncating
/// when a count would not be addressable by a `u8` index.
pub const fn plan(
    budget_bytes: usize,
    state_action_size: usize,
    transition_guard_size: usize,
    ratio: usize,
) -> Result<CapacityPlan, PlanError> {
    let state_slot = state_action_size + 1;
    let transition_slot = transition_guard_size + 1;
    let per_state = state_slot.saturating_add(ratio.saturating_mul(transition_slot));

    if budget_bytes < FIXED_OVERHEAD {
        return Err(PlanError::BudgetTooSmall {
            budget: budget_bytes,
            per_state,
            overhead: FIXED_OVERHEAD,
        });
    }

    let usable = budget_bytes - FIXED_OVERHEAD;
    let max_states = usable / per_state;
    if max_states == 0 {
        return Err(PlanError::BudgetTooSmall {
            budget: budget_bytes,
            per_state,
            overhead: FIXED_OVERHEAD,
        });
    }

    let naive_transitions = ratio * max_states;
    let derived_transitions = (usable - max_states * state_slot) / transition_slot;
    let max_transitions = if derived_transitions > naive_transitions {
        derived_transitions
    } else {
        naive_transitions
    };

    if max_states > MAX_INDEXABLE || max_transitions > MAX_INDEXABLE {
        return Err(PlanError::IndexOverflow {
            max_states,
            max_transitions,
            limit: MAX_INDEXABLE,
        });
    }

    Ok(CapacityPlan {
        max_states,
        max_transitions,
        state_slot,
        transition_slot,
    })
}
