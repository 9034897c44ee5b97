//! Instrumented element type for lifecycle tests.
//!
//! Every [`Tracked`] value created through a [`LifeCounter`] (directly or by
//! cloning) bumps the construction count, and every drop bumps the destruction
//! count. A container that neither leaks nor double-drops keeps
//! `counter.live()` equal to its own length. The value lives on the heap, so a
//! double drop is also a double free and tends to crash loudly.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

#[derive(Default)]
struct Counts {
    constructed: AtomicUsize,
    destroyed: AtomicUsize,
}

/// Shared construction/destruction counters.
#[derive(Clone, Default)]
pub struct LifeCounter(Arc<Counts>);

impl LifeCounter {
    pub fn new() -> LifeCounter {
        LifeCounter::default()
    }

    /// Constructs a tracked value.
    pub fn make(&self, value: i64) -> Tracked {
        self.0.constructed.fetch_add(1, AtomicOrdering::Relaxed);
        Tracked {
            value: Box::new(value),
            counter: self.clone(),
        }
    }

    pub fn make_all(&self, values: &[i64]) -> Vec<Tracked> {
        values.iter().map(|&v| self.make(v)).collect()
    }

    pub fn constructed(&self) -> usize {
        self.0.constructed.load(AtomicOrdering::Relaxed)
    }

    pub fn destroyed(&self) -> usize {
        self.0.destroyed.load(AtomicOrdering::Relaxed)
    }

    /// Constructions minus destructions.
    ///
    /// # Panics
    ///
    /// Panics if more values were destroyed than constructed.
    pub fn live(&self) -> usize {
        let constructed = self.constructed();
        let destroyed = self.destroyed();
        assert!(
            destroyed <= constructed,
            "double drop: {destroyed} destroyed > {constructed} constructed"
        );
        constructed - destroyed
    }
}

impl std::fmt::Debug for LifeCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifeCounter")
            .field("constructed", &self.constructed())
            .field("destroyed", &self.destroyed())
            .finish()
    }
}

/// A managed value whose lifecycle is counted by a [`LifeCounter`].
pub struct Tracked {
    value: Box<i64>,
    counter: LifeCounter,
}

impl Tracked {
    pub fn value(&self) -> i64 {
        *self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.counter.make(*self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counter
            .0
            .destroyed
            .fetch_add(1, AtomicOrdering::Relaxed);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tracked {}

impl PartialOrd for Tracked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tracked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Tracked {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl std::fmt::Debug for Tracked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

/// Values of a tracked sequence, for comparing against an oracle.
pub fn values_of(items: &[Tracked]) -> Vec<i64> {
    items.iter().map(Tracked::value).collect()
}
