use strata_common::Result;
use strata_testkit::data_gen::{Op, generate_ops};
use strata_testkit::tracked::values_of;
use strata_testkit::{LifeCounter, Tracked};

use crate::Array;

fn apply<T>(a: &mut Array<T>, op: Op, make: impl Fn(i64) -> T) -> Result<()> {
    match op {
        Op::Append(value) => a.append(make(value)).map(drop),
        Op::Insert { index, value } => a.insert(index, make(value)),
        Op::Delete(index) => a.delete(index),
        Op::DeleteShift { index, k } => a.delete_shift(index, k),
        Op::Move { src, dst, n } => a.move_range(src, dst, n),
        Op::Exchange(i, j) => a.exchange(i, j),
        Op::WriteAt { index, value } => a.write_at(index, make(value)),
        Op::Pop => {
            a.pop();
            Ok(())
        }
        Op::Truncate(n) => {
            a.truncate(n);
            Ok(())
        }
        Op::Clear => {
            a.clear();
            Ok(())
        }
    }
}

#[test]
fn test_relocatable_matches_oracle() {
    for seed in 0..20 {
        let mut a = Array::<i64>::new();
        for (i, step) in generate_ops(seed, 400).into_iter().enumerate() {
            let result = apply(&mut a, step.op, |v| v);
            assert_eq!(result.is_ok(), step.valid, "seed {seed} step {i}: {:?}", step.op);
            assert_eq!(a.as_slice(), step.expected.as_slice(), "seed {seed} step {i}");
        }
    }
}

#[test]
fn test_managed_matches_oracle() {
    for seed in 100..120 {
        let counter = LifeCounter::new();
        let mut a = Array::<Tracked>::new();
        for (i, step) in generate_ops(seed, 400).into_iter().enumerate() {
            let result = apply(&mut a, step.op, |v| counter.make(v));
            assert_eq!(result.is_ok(), step.valid, "seed {seed} step {i}: {:?}", step.op);
            assert_eq!(values_of(&a), step.expected, "seed {seed} step {i}");
            assert_eq!(counter.live(), a.len(), "seed {seed} step {i}");
        }
        drop(a);
        assert_eq!(counter.live(), 0);
    }
}

#[test]
fn test_strings_match_oracle() {
    let mut a = Array::<String>::new();
    for step in generate_ops(4242, 1000) {
        let _ = apply(&mut a, step.op, |v| v.to_string());
        let expected: Vec<String> = step.expected.iter().map(i64::to_string).collect();
        assert_eq!(a.as_slice(), expected.as_slice());
    }
}
