use std::sync::atomic::{AtomicU64, Ordering};

/// A non-negative byte counter that supports conditional withdrawal.
///
/// Withdrawals only succeed when the counter holds enough, so the value never
/// underflows even when several budgets share one parent.
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new(amount: u64) -> Counter {
        Counter(AtomicU64::new(amount))
    }

    /// Subtracts `amount` if the counter holds at least that much.
    ///
    /// Returns `true` on success; the counter is unchanged otherwise.
    pub fn withdraw(&self, amount: u64) -> bool {
        let mut current = self.0.load(Ordering::Relaxed);
        while current >= amount {
            match self.0.compare_exchange_weak(
                current,
                current - amount,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(updated) => current = updated,
            }
        }
        false
    }

    pub fn deposit(&self, amount: u64) {
        self.0.fetch_add(amount, Ordering::Release);
    }

    /// Current value; diagnostic only.
    pub fn read(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_withdraw() {
        let counter = Counter::new(100);
        assert!(counter.withdraw(30));
        assert!(counter.withdraw(0));
        assert_eq!(counter.read(), 70);
        assert!(!counter.withdraw(71));
        assert_eq!(counter.read(), 70);
        assert!(counter.withdraw(70));
        assert_eq!(counter.read(), 0);
    }

    #[test]
    fn test_deposit() {
        let counter = Counter::new(0);
        counter.deposit(25);
        counter.deposit(0);
        assert_eq!(counter.read(), 25);
    }

    #[test]
    fn test_concurrent_withdraw() {
        let counter = Arc::new(Counter::new(1000));
        let handles = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || (0..50).filter(|_| counter.withdraw(10)).count())
            })
            .collect::<Vec<_>>();
        let succeeded: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(succeeded, 100);
        assert_eq!(counter.read(), 0);
    }
}
