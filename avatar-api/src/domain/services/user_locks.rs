use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, Weak},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::models::UserId;

/// Per-user async mutexes. Entries are only weakly held, so a user's lock is
/// dropped once no call is holding or waiting on it.
#[derive(Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserId, Weak<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other call holds `user_id`'s lock.
    pub async fn lock(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        self.entry(user_id).lock_owned().await
    }

    fn entry(&self, user_id: UserId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(lock) = locks.get(&user_id).and_then(Weak::upgrade) {
            return lock;
        }

        locks.retain(|_, lock| lock.strong_count() > 0);

        let lock = Arc::new(AsyncMutex::new(()));
        locks.insert(user_id, Arc::downgrade(&lock));
        lock
    }

    #[cfg(test)]
    fn live_entries(&self) -> usize {
        self.locks
            .lock()
            .unwrap()
            .values()
            .filter(|lock| lock.strong_count() > 0)
            .count()
    }
}
