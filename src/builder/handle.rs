//! Handles identifying declared states and transitions.

use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_BUILDER_ID: AtomicU32 = AtomicU32::new(0);

/// Allocate an id that tags every handle a builder hands out.
pub(crate) fn next_builder_id() -> u32 {
    NEXT_BUILDER_ID.fetch_add(1, Ordering::Relaxed)
}

/// Identity of a state declared on a builder.
///
/// Handles are only meaningful to the builder that created them; passing
/// one to another builder is rejected at build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateHandle {
    pub(crate) builder: u32,
    pub(crate) index: usize,
}

impl StateHandle {
    /// Declaration-order index, equal to the compiled state index.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Identity of a transition declared on a builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionHandle {
    pub(crate) index: usize,
}

impl TransitionHandle {
    /// Declaration-order index among all transitions.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_ids_are_unique() {
        let first = next_builder_id();
        let second = next_builder_id();

        assert_ne!(first, second);
    }
}
