//! Randomized operation scripts for differential testing.
//!
//! [`generate_ops`] produces a seeded sequence of array operations together with
//! the expected outcome of each one, computed against a plain `Vec<i64>` oracle.
//! Roughly one operation in eight uses an out-of-range index or an empty run so
//! that failure paths get exercised as well.

/// One structural operation on an array of `i64`-valued elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Append(i64),
    Insert { index: usize, value: i64 },
    Delete(usize),
    DeleteShift { index: usize, k: usize },
    Move { src: usize, dst: usize, n: usize },
    Exchange(usize, usize),
    WriteAt { index: usize, value: i64 },
    Pop,
    Truncate(usize),
    Clear,
}

/// Applies `op` to the oracle. Returns `false` (leaving `v` untouched) when the
/// operation is invalid for the current length.
pub fn apply_to_vec(v: &mut Vec<i64>, op: Op) -> bool {
    let len = v.len();
    match op {
        Op::Append(value) => v.push(value),
        Op::Insert { index, value } => {
            if index > len {
                return false;
            }
            v.insert(index, value);
        }
        Op::Delete(index) => {
            if index >= len {
                return false;
            }
            v.swap_remove(index);
        }
        Op::DeleteShift { index, k } => {
            if k == 0 || index.checked_add(k).is_none_or(|end| end > len) {
                return false;
            }
            v.drain(index..index + k);
        }
        Op::Move { src, dst, n } => {
            if n == 0 || src + n > len || dst + n > len {
                return false;
            }
            let run: Vec<i64> = v.drain(src..src + n).collect();
            v.splice(dst..dst, run);
        }
        Op::Exchange(i, j) => {
            if i >= len || j >= len {
                return false;
            }
            v.swap(i, j);
        }
        Op::WriteAt { index, value } => {
            if index >= len {
                return false;
            }
            v[index] = value;
        }
        Op::Pop => {
            v.pop();
        }
        Op::Truncate(n) => v.truncate(n),
        Op::Clear => v.clear(),
    }
    true
}

/// A generated operation and its expected result.
#[derive(Debug, Clone)]
pub struct Step {
    pub op: Op,
    /// Whether the operation is valid at this point of the script.
    pub valid: bool,
    /// Oracle contents after the operation.
    pub expected: Vec<i64>,
}

/// Generates `count` steps from `seed`.
pub fn generate_ops(seed: u64, count: usize) -> Vec<Step> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut oracle = Vec::new();
    let mut steps = Vec::with_capacity(count);
    for _ in 0..count {
        let op = random_op(&mut rng, oracle.len());
        let valid = apply_to_vec(&mut oracle, op);
        steps.push(Step {
            op,
            valid,
            expected: oracle.clone(),
        });
    }
    steps
}

fn random_op(rng: &mut fastrand::Rng, len: usize) -> Op {
    // Out-of-range indices on purpose, now and then.
    let bound = if rng.u8(..8) == 0 { len + 3 } else { len.max(1) };
    let index = |rng: &mut fastrand::Rng| rng.usize(..bound);
    let value = rng.i64(-1000..1000);
    match rng.u8(..20) {
        0..=5 => Op::Append(value),
        6..=7 => Op::Insert {
            index: rng.usize(..=len + usize::from(bound > len.max(1))),
            value,
        },
        8..=9 => Op::Delete(index(rng)),
        10..=11 => {
            let n = rng.usize(..=len.min(4));
            Op::DeleteShift {
                index: index(rng),
                k: n,
            }
        }
        12..=14 => {
            let n = rng.usize(..=len.min(5));
            let span = (len + 1).saturating_sub(n).max(1);
            Op::Move {
                src: rng.usize(..span),
                dst: rng.usize(..span),
                n,
            }
        }
        15 => Op::Exchange(index(rng), index(rng)),
        16..=17 => Op::WriteAt {
            index: index(rng),
            value,
        },
        18 => Op::Pop,
        _ => {
            if rng.u8(..4) == 0 {
                Op::Clear
            } else {
                Op::Truncate(rng.usize(..=len))
            }
        }
    }
}
