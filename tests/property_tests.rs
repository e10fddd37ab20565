//! Property-based tests for planning, building and stepping machines.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use proptest::prelude::*;
use spacemachine::core::{plan, PlanError, FIXED_OVERHEAD, MAX_INDEXABLE};
use spacemachine::{BuildError, StateMachine, StateMachineBuilder, StepOutcome};
use std::cell::RefCell;
use std::rc::Rc;

// Room for 16 declared transitions plus one bridging edge per state.
type TestMachine = StateMachine<8, 24>;

#[derive(Clone, Debug)]
struct Graph {
    num_states: usize,
    transitions: Vec<(usize, usize, bool)>,
    initial: usize,
}

impl Graph {
    fn unreachable(&self) -> Vec<usize> {
        (0..self.num_states)
            .filter(|&state| {
                state != self.initial && !self.transitions.iter().any(|&(_, to, _)| to == state)
            })
            .collect()
    }

    fn declared_targets(&self, state: usize) -> Vec<u8> {
        self.transitions
            .iter()
            .filter(|&&(from, _, _)| from == state)
            .map(|&(_, to, _)| to as u8)
            .collect()
    }

    /// Add a never-firing edge from the initial state to every unreachable state.
    fn connect(mut self) -> Self {
        for state in self.unreachable() {
            self.transitions.push((self.initial, state, false));
        }
        self
    }
}

prop_compose! {
    fn arbitrary_graph()(num_states in 1..=8usize)(
        transitions in prop::collection::vec(
            (0..num_states, 0..num_states, any::<bool>()),
            1..=16,
        ),
        initial in 0..num_states,
        num_states in Just(num_states),
    ) -> Graph {
        Graph { num_states, transitions, initial }
    }
}

fn reachable_graph() -> impl Strategy<Value = Graph> {
    arbitrary_graph().prop_map(Graph::connect)
}

/// Build `graph` into `machine`, logging guard evaluations as transition ids.
fn build_logged<'m>(
    machine: &'m mut TestMachine,
    graph: &Graph,
    log: &Rc<RefCell<Vec<usize>>>,
) -> Result<&'m mut TestMachine, BuildError> {
    let mut builder = StateMachineBuilder::new(machine);
    let handles: Vec<_> = (0..graph.num_states)
        .map(|_| builder.create_state(|| {}))
        .collect();
    for (id, &(from, to, result)) in graph.transitions.iter().enumerate() {
        let log = Rc::clone(log);
        builder.create_transition(handles[from], handles[to], move || {
            log.borrow_mut().push(id);
            result
        });
    }
    builder.set_initial_state(handles[graph.initial]);
    builder.build()
}

proptest! {
    #[test]
    fn build_accepts_exactly_single_hop_reachable_graphs(graph in arbitrary_graph()) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = TestMachine::new();
        let unreachable = graph.unreachable();

        match build_logged(&mut machine, &graph, &log) {
            Ok(_) => {
                prop_assert!(unreachable.is_empty());
            }
            Err(error) => {
                prop_assert_eq!(error, BuildError::UnreachableStates { indices: unreachable });
            }
        }
    }

    #[test]
    fn compiled_ranges_follow_declaration_order(graph in reachable_graph()) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = TestMachine::new();

        let machine = build_logged(&mut machine, &graph, &log).unwrap();

        prop_assert_eq!(usize::from(machine.current_state()), graph.initial);
        prop_assert_eq!(usize::from(machine.num_states()), graph.num_states);
        prop_assert_eq!(usize::from(machine.num_transitions()), graph.transitions.len());
        for state in 0..graph.num_states {
            let targets = machine.transition_targets(state as u8).unwrap();
            prop_assert_eq!(targets.to_vec(), graph.declared_targets(state));
        }
    }

    #[test]
    fn first_true_guard_wins_and_stops_the_scan(graph in reachable_graph()) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = TestMachine::new();

        let machine = build_logged(&mut machine, &graph, &log).unwrap();
        let outcome = machine.trigger_transitions().unwrap();

        let candidates: Vec<(usize, usize, bool)> = graph
            .transitions
            .iter()
            .enumerate()
            .filter(|(_, transition)| transition.0 == graph.initial)
            .map(|(id, transition)| (id, transition.1, transition.2))
            .collect();
        let fired = candidates.iter().position(|&(_, _, result)| result);
        let expected_log: Vec<usize> = match fired {
            Some(position) => candidates[..=position].iter().map(|&(id, _, _)| id).collect(),
            None => candidates.iter().map(|&(id, _, _)| id).collect(),
        };

        prop_assert_eq!(log.borrow().clone(), expected_log);
        match fired {
            Some(position) => {
                let to = candidates[position].1 as u8;
                prop_assert_eq!(outcome, StepOutcome::Transitioned { from: graph.initial as u8, to });
                prop_assert_eq!(machine.current_state(), to);
            }
            None => {
                prop_assert_eq!(outcome, StepOutcome::Unchanged);
                prop_assert_eq!(usize::from(machine.current_state()), graph.initial);
            }
        }
    }

    #[test]
    fn current_state_stays_in_range(graph in reachable_graph(), steps in 1..32usize) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut machine = TestMachine::new();

        let machine = build_logged(&mut machine, &graph, &log).unwrap();
        for _ in 0..steps {
            machine.run().unwrap();
            prop_assert!(machine.current_state() < machine.num_states());
        }
    }

    #[test]
    fn plan_is_maximal_and_addressable(
        budget in 0..20_000usize,
        state_size in 0..64usize,
        transition_size in 0..64usize,
        ratio in 0..8usize,
    ) {
        let per_state = state_size + 1 + ratio * (transition_size + 1);

        match plan(budget, state_size, transition_size, ratio) {
            Ok(plan) => {
                prop_assert!(plan.fits(budget));
                prop_assert!(plan.max_states >= 1);
                prop_assert!(plan.max_states <= MAX_INDEXABLE);
                prop_assert!(plan.max_transitions <= MAX_INDEXABLE);
                prop_assert!(plan.max_transitions >= ratio * plan.max_states);
                prop_assert!((plan.max_states + 1) * per_state > budget - FIXED_OVERHEAD);
                prop_assert!(plan.footprint() + plan.transition_slot > budget);
            }
            Err(PlanError::BudgetTooSmall { .. }) => {
                prop_assert!(budget < FIXED_OVERHEAD + per_state);
            }
            Err(PlanError::IndexOverflow { max_states, max_transitions, limit }) => {
                prop_assert_eq!(limit, MAX_INDEXABLE);
                prop_assert!(max_states > limit || max_transitions > limit);
            }
        }
    }
}
