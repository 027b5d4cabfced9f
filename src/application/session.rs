use std::sync::{Arc, Mutex};

use super::{AppError, LedgerContext};

/// A ledger session that can be shared between callers.
///
/// Every operation takes the session lock for its whole duration, so commands
/// from concurrent callers are applied one at a time.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<Mutex<LedgerContext>>,
}

impl SharedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute(&self, line: &str) -> Result<String, AppError> {
        self.with(|context| context.execute(line))
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut LedgerContext) -> R) -> Result<R, AppError> {
        let mut context = self.inner.lock().map_err(|_| AppError::SessionPoisoned)?;
        Ok(f(&mut context))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_concurrent_commands_are_serialized() {
        let session = SharedLedger::new();
        session
            .execute("host paid 1 for setup split with guest")
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let session = session.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        session
                            .execute(&format!("p{} paid 4 for round split with host", i))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let (count, total) = session
            .with(|context| {
                let total: f64 = context.balances().values().sum();
                (context.expenses().len(), total)
            })
            .unwrap();
        assert_eq!(count, 1 + 8 * 25);
        assert!(total.abs() < 1e-9);
    }

    #[test]
    fn test_poisoned_session_is_reported() {
        let session = SharedLedger::new();
        let poisoner = session.clone();
        let _ = thread::spawn(move || {
            let _ = poisoner.with(|_| -> () { panic!("boom") });
        })
        .join();

        assert!(matches!(
            session.execute("balance"),
            Err(AppError::SessionPoisoned)
        ));
    }
}
