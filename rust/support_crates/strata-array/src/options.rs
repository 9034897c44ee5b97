//! Growth and budget configuration of an [`Array`](crate::Array).

use strata_budget_tracker::Budget;
use strata_common::{Result, verify_arg};

/// Geometric growth policy used when an append or insert outgrows the capacity.
///
/// The grown capacity is `max(required, capacity * numerator / denominator, min_capacity)`.
/// The factor must be at least 1.5, which keeps `N` sequential appends at
/// amortized O(1) each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    numerator: usize,
    denominator: usize,
    min_capacity: usize,
}

impl GrowthPolicy {
    pub const DEFAULT_MIN_CAPACITY: usize = 4;

    pub fn new(numerator: usize, denominator: usize, min_capacity: usize) -> Result<GrowthPolicy> {
        verify_arg!(denominator, denominator > 0);
        verify_arg!(
            numerator,
            numerator
                .checked_mul(2)
                .zip(denominator.checked_mul(3))
                .is_some_and(|(n, d)| n >= d)
        );
        Ok(GrowthPolicy {
            numerator,
            denominator,
            min_capacity,
        })
    }

    /// Doubling policy with the default minimum capacity.
    pub const fn doubling() -> GrowthPolicy {
        GrowthPolicy {
            numerator: 2,
            denominator: 1,
            min_capacity: Self::DEFAULT_MIN_CAPACITY,
        }
    }

    pub fn factor(&self) -> (usize, usize) {
        (self.numerator, self.denominator)
    }

    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Computes the capacity to grow to when `required` slots are needed and
    /// `capacity` are currently allocated. Saturates at `usize::MAX`.
    pub fn grown_capacity(&self, capacity: usize, required: usize) -> usize {
        let scaled = capacity
            .checked_mul(self.numerator)
            .map(|c| c / self.denominator)
            .unwrap_or(usize::MAX);
        required.max(scaled).max(self.min_capacity)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        GrowthPolicy::doubling()
    }
}

/// Per-array configuration.
#[derive(Debug, Clone, Default)]
pub struct ArrayOptions {
    pub(crate) growth: GrowthPolicy,
    pub(crate) budget: Option<Budget>,
}

impl ArrayOptions {
    pub fn builder() -> ArrayOptionsBuilder {
        ArrayOptionsBuilder::default()
    }

    pub fn growth(&self) -> &GrowthPolicy {
        &self.growth
    }

    pub fn budget(&self) -> Option<&Budget> {
        self.budget.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArrayOptionsBuilder {
    policy: Option<GrowthPolicy>,
    factor: Option<(usize, usize)>,
    min_capacity: Option<usize>,
    budget: Option<Budget>,
}

impl ArrayOptionsBuilder {
    /// Uses an already validated policy. Takes precedence over
    /// [`growth_factor`](Self::growth_factor) and [`min_capacity`](Self::min_capacity).
    pub fn growth(mut self, policy: GrowthPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets the growth factor as the fraction `numerator / denominator`.
    pub fn growth_factor(mut self, numerator: usize, denominator: usize) -> Self {
        self.factor = Some((numerator, denominator));
        self
    }

    /// Smallest capacity allocated by the first growth.
    pub fn min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = Some(min_capacity);
        self
    }

    /// Charges every allocation of the array against `budget`.
    pub fn budget(mut self, budget: Budget) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn build(self) -> Result<ArrayOptions> {
        let growth = match self.policy {
            Some(policy) => policy,
            None => {
                let (numerator, denominator) = self.factor.unwrap_or((2, 1));
                GrowthPolicy::new(
                    numerator,
                    denominator,
                    self.min_capacity.unwrap_or(GrowthPolicy::DEFAULT_MIN_CAPACITY),
                )?
            }
        };
        Ok(ArrayOptions {
            growth,
            budget: self.budget,
        })
    }
}
