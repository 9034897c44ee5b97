//! Hierarchical byte budgets for container storage.
//!
//! A [`Budget`] caps the total number of bytes that the storages charged
//! against it may hold at once. Storage keeps an [`Allocation`] next to its
//! memory and resizes it before every reallocation; a refused charge is how a
//! container learns it is out of memory without ever hitting the allocator.

use std::sync::Arc;

use counter::Counter;

pub mod counter;

/// A cloneable handle to a byte budget.
#[derive(Clone)]
pub struct Budget(Arc<BudgetNode>);

impl Budget {
    /// Creates a new root budget holding `bytes`.
    pub fn new(bytes: u64) -> Budget {
        Budget(Arc::new(BudgetNode {
            parent: None,
            remaining: Counter::new(bytes),
        }))
    }

    /// Returns the remaining amount in this budget.
    ///
    /// **Note**: diagnostic only, the value may be stale in a concurrent environment.
    pub fn remaining(&self) -> u64 {
        self.0.remaining.read()
    }

    /// Charges `bytes` against the budget.
    ///
    /// The charge is returned to the budget when the `Allocation` is dropped.
    pub fn allocate(&self, bytes: u64) -> Result<Allocation, AllocationError> {
        if self.0.allocate(bytes) {
            Ok(Allocation {
                budget: self.0.clone(),
                amount: bytes,
            })
        } else {
            Err(AllocationError { requested: bytes })
        }
    }

    /// Returns a zero-byte charge that can later be grown.
    pub fn empty_allocation(&self) -> Allocation {
        Allocation {
            budget: self.0.clone(),
            amount: 0,
        }
    }

    /// Creates a child budget limited to `bytes`.
    ///
    /// Every charge against the child is also charged against `self`, so the child
    /// can never exceed either its own limit or what the parent has left.
    pub fn split_off(&self, bytes: u64) -> Budget {
        self.subordinate().limit(bytes).create()
    }

    /// Constructs a child budget tracker.
    pub fn subordinate(&self) -> SubordinateBuilder {
        SubordinateBuilder {
            parent: self.0.clone(),
            limit: None,
        }
    }
}

impl std::fmt::Debug for Budget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Budget")
            .field("remaining", &self.remaining())
            .field("has_parent", &self.0.parent.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct SubordinateBuilder {
    parent: Arc<BudgetNode>,
    limit: Option<u64>,
}

impl SubordinateBuilder {
    /// Configures the byte limit of the child budget. Unset means unlimited, bounded
    /// only by the parent.
    pub fn limit(mut self, bytes: u64) -> Self {
        self.limit = Some(bytes);
        self
    }

    pub fn create(self) -> Budget {
        Budget(Arc::new(BudgetNode {
            parent: Some(self.parent),
            remaining: Counter::new(self.limit.unwrap_or(u64::MAX)),
        }))
    }
}

/// A byte charge held against a budget.
pub struct Allocation {
    budget: Arc<BudgetNode>,
    amount: u64,
}

impl Allocation {
    /// Currently charged amount.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Grows the charge by `additional` bytes.
    pub fn grow(&mut self, additional: u64) -> Result<(), AllocationError> {
        if !self.budget.allocate(additional) {
            return Err(AllocationError {
                requested: additional,
            });
        }
        self.amount += additional;
        Ok(())
    }

    /// Returns the part of the charge above `amount` to the budget.
    pub fn shrink_to(&mut self, amount: u64) {
        if amount < self.amount {
            self.budget.release(self.amount - amount);
            self.amount = amount;
        }
    }

    /// Grows or shrinks the charge to exactly `amount`.
    ///
    /// A failed grow leaves the charge unchanged.
    pub fn resize_to(&mut self, amount: u64) -> Result<(), AllocationError> {
        if amount > self.amount {
            self.grow(amount - self.amount)
        } else {
            self.shrink_to(amount);
            Ok(())
        }
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        if self.amount != 0 {
            self.budget.release(self.amount);
        }
    }
}

impl std::fmt::Debug for Allocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Allocation")
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}

/// A budget refused a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocationError {
    pub requested: u64,
}

impl std::fmt::Display for AllocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "budget refused a charge of {} bytes", self.requested)
    }
}

impl std::error::Error for AllocationError {}

struct BudgetNode {
    /// Every charge against this node is also charged against the parent.
    parent: Option<Arc<BudgetNode>>,
    remaining: Counter,
}

impl BudgetNode {
    fn allocate(&self, amount: u64) -> bool {
        if amount == 0 {
            return true;
        }
        if !self.remaining.withdraw(amount) {
            return false;
        }
        if let Some(parent) = self.parent.as_deref() {
            if !parent.allocate(amount) {
                self.remaining.deposit(amount);
                return false;
            }
        }
        true
    }

    fn release(&self, amount: u64) {
        if let Some(parent) = self.parent.as_deref() {
            parent.release(amount);
        }
        self.remaining.deposit(amount);
    }
}
