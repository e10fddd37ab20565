//! Dice Chain
//!
//! Eight states in a line, each advancing only on a roll of 1 on a d100.
//! The last state flags completion, and the loop stops driving the machine.
//!
//! Run with: cargo run --example dice_chain
//! Set RUST_LOG=spacemachine=trace to see every transition.

use rand::Rng;
use spacemachine::StateMachine;
use spacemachine::StateMachineBuilder;
use std::cell::Cell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const CHAIN_LENGTH: usize = 8;

fn roll_for_one() -> bool {
    let roll = rand::thread_rng().gen_range(1..=100);
    if roll != 1 {
        return false;
    }
    println!("Rolled a 1, switching state.");
    true
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Dice Chain ===\n");

    let finished = Rc::new(Cell::new(false));
    let mut machine: StateMachine = StateMachine::new();

    let mut builder = StateMachineBuilder::new(&mut machine);
    let mut states = Vec::with_capacity(CHAIN_LENGTH);
    for number in 1..CHAIN_LENGTH {
        states.push(builder.create_state(move || println!("State {number}")));
    }
    let done = Rc::clone(&finished);
    states.push(builder.create_state(move || done.set(true)));

    for pair in states.windows(2) {
        builder.create_transition(pair[0], pair[1], roll_for_one);
    }
    builder.set_initial_state(states[0]);

    let machine = match builder.build() {
        Ok(machine) => machine,
        Err(error) => {
            eprintln!("Invalid state machine: {error}");
            std::process::exit(1);
        }
    };

    let mut steps = 0u64;
    while !finished.get() {
        if let Err(error) = machine.run() {
            eprintln!("State machine fault: {error}");
            std::process::exit(1);
        }
        steps += 1;
    }

    println!("\nReached the final state after {steps} steps.");
    println!("\n=== Example Complete ===");
}
