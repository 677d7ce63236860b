use std::sync::{Mutex, MutexGuard, TryLockError};

/// Lock helpers that recover a poisoned mutex instead of propagating the
/// poison. A panicked mixer callback must not wedge every later API call.
pub trait MutexPoison<T> {
    fn lock_poison(&self) -> MutexGuard<'_, T>;
    fn try_lock_poison(&self) -> Option<MutexGuard<'_, T>>;
}

impl<T> MutexPoison<T> for Mutex<T> {
    fn lock_poison(&self) -> MutexGuard<'_, T> {
        match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn try_lock_poison(&self) -> Option<MutexGuard<'_, T>> {
        match self.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}
