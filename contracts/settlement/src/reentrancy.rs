//! Reentrancy protection for operations that move value out of the
//! contract (`deposit`, `processWithdrawal`, and the transfers inside
//! `challengeBlock`/`finalizeBlock`).

use crate::error::SettlementError;

/// A single boolean lock, acquired at method entry and released on every
/// exit path (including early return or panic) via [`ReentrancyLock`]'s
/// `Drop` impl.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self { locked: false }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Acquire the guard for the duration of the returned scope.
    pub fn enter(&mut self) -> Result<ReentrancyLock<'_>, SettlementError> {
        if self.locked {
            return Err(SettlementError::ReentrancyDetected);
        }
        self.locked = true;
        Ok(ReentrancyLock { guard: self })
    }
}

/// RAII scope released on drop, so the guard is freed on every path out
/// of the guarded operation, success or failure.
pub struct ReentrancyLock<'a> {
    guard: &'a mut ReentrancyGuard,
}

impl<'a> Drop for ReentrancyLock<'a> {
    fn drop(&mut self) {
        self.guard.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_release_on_drop() {
        let mut guard = ReentrancyGuard::new();
        assert!(!guard.is_locked());
        {
            let _lock = guard.enter().unwrap();
        }
        assert!(!guard.is_locked());
    }

    #[test]
    fn test_nested_enter_rejected() {
        let mut guard = ReentrancyGuard::new();
        let _lock = guard.enter().unwrap();
        assert!(guard.is_locked());
    }

    #[test]
    fn test_reentrancy_detected_while_locked() {
        let mut guard = ReentrancyGuard::new();
        guard.locked = true;
        assert!(matches!(guard.enter(), Err(SettlementError::ReentrancyDetected)));
    }

    #[test]
    fn test_released_even_on_early_return() {
        fn guarded_op(guard: &mut ReentrancyGuard, fail: bool) -> Result<(), SettlementError> {
            let _lock = guard.enter()?;
            if fail {
                return Err(SettlementError::ZeroAmount);
            }
            Ok(())
        }

        let mut guard = ReentrancyGuard::new();
        assert!(guarded_op(&mut guard, true).is_err());
        assert!(!guard.is_locked());
    }
}
