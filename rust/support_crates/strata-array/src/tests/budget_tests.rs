use strata_budget_tracker::Budget;
use strata_testkit::LifeCounter;
use strata_testkit::tracked::values_of;

use crate::{Array, ArrayOptions};

fn budgeted(bytes: u64) -> (Budget, ArrayOptions) {
    let budget = Budget::new(bytes);
    let options = ArrayOptions::builder().budget(budget.clone()).build().unwrap();
    (budget, options)
}

#[test]
fn test_refused_growth_leaves_array_intact() {
    let (budget, options) = budgeted(64);
    let mut a = Array::<u64>::with_options(options);
    for i in 0..8 {
        a.append(i).unwrap();
    }
    assert_eq!(a.capacity(), 8);
    assert_eq!(budget.remaining(), 0);

    let err = a.append(8).unwrap_err();
    assert!(err.is_out_of_memory());
    assert!(a.insert(0, 8).unwrap_err().is_out_of_memory());
    assert!(a.append_slice(&[1, 2]).unwrap_err().is_out_of_memory());
    assert_eq!(a.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(a.capacity(), 8);

    a.delete_shift(0, 4).unwrap();
    a.shrink_to_fit().unwrap();
    assert_eq!(budget.remaining(), 32);
    drop(a);
    assert_eq!(budget.remaining(), 64);
}

#[test]
fn test_arrays_share_a_budget() {
    let (budget, options) = budgeted(256);
    let mut a = Array::<u32>::with_capacity_and_options(32, options.clone()).unwrap();
    let mut b = Array::<u32>::with_options(options);
    assert_eq!(budget.remaining(), 128);
    a.resize(32).unwrap();
    b.resize(32).unwrap();
    assert!(b.append(0).unwrap_err().is_out_of_memory());
    assert_eq!(b.len(), 32);

    a.free();
    b.append(0).unwrap();
    assert_eq!(b.len(), 33);
}

#[test]
fn test_refused_growth_drops_nothing() {
    let counter = LifeCounter::new();
    let (_budget, options) = budgeted(4 * size_of::<strata_testkit::Tracked>() as u64);
    let mut a = Array::with_options(options);
    a.append_iter(counter.make_all(&[1, 2, 3, 4])).unwrap();
    assert!(a.append(counter.make(5)).unwrap_err().is_out_of_memory());
    assert!(a.append_iter(counter.make_all(&[6, 7])).is_err());
    assert_eq!(values_of(&a), vec![1, 2, 3, 4]);
    assert_eq!(counter.live(), 4);
}

/// Yields `remaining` items while reporting no lower bound.
struct Unsized {
    remaining: usize,
}

impl Iterator for Unsized {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.remaining = self.remaining.checked_sub(1)?;
        Some(1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

#[test]
fn test_failed_append_iter_returns_capacity() {
    let budget = Budget::new(8);
    let options = ArrayOptions::builder()
        .min_capacity(1)
        .budget(budget.clone())
        .build()
        .unwrap();
    let mut a = Array::<u8>::with_options(options);
    a.append(7).unwrap();
    assert_eq!(a.capacity(), 1);
    assert_eq!(budget.remaining(), 7);

    let err = a.append_iter(Unsized { remaining: 20 }).unwrap_err();
    assert!(err.is_out_of_memory());
    assert_eq!(a.as_slice(), &[7]);
    assert_eq!(a.capacity(), 1);
    assert_eq!(budget.remaining(), 7);

    assert_eq!(a.append_iter(Unsized { remaining: 3 }).unwrap(), 1);
    assert_eq!(a.as_slice(), &[7, 1, 1, 1]);
}

#[test]
fn test_shrink_to_releases_budget() {
    let (budget, options) = budgeted(1024);
    let mut a = Array::<u64>::with_capacity_and_options(64, options).unwrap();
    assert_eq!(a.options().budget().map(Budget::remaining), Some(512));
    a.resize(10).unwrap();
    a.shrink_to(16).unwrap();
    assert_eq!(a.capacity(), 16);
    assert_eq!(budget.remaining(), 1024 - 128);
    a.shrink_to(0).unwrap();
    assert_eq!(a.capacity(), 10);
    a.shrink_to(100).unwrap();
    assert_eq!(a.capacity(), 10);
    assert_eq!(budget.remaining(), 1024 - 80);
}

#[test]
fn test_unbounded_request_is_out_of_memory() {
    let mut a = Array::<u64>::new();
    a.append(1).unwrap();
    assert!(a.reserve(usize::MAX).unwrap_err().is_out_of_memory());
    assert!(a.expand(usize::MAX).unwrap_err().is_out_of_memory());
    assert!(Array::<u64>::with_capacity(usize::MAX / 2).is_err());
    assert_eq!(a.as_slice(), &[1]);
}
