use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One-shot gate that opens once `countdown` has been called `count` times.
#[derive(Clone)]
pub struct CountdownLatch {
    pair: Arc<(Mutex<usize>, Condvar)>,
}

impl CountdownLatch {
    pub fn new(count: usize) -> CountdownLatch {
        CountdownLatch {
            pair: Arc::new((Mutex::new(count), Condvar::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        let (lock, _) = &*self.pair;
        lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn wait(&self) {
        let (_, cvar) = &*self.pair;
        let mut count = self.lock();
        while *count > 0 {
            count = cvar.wait(count).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Returns `true` if the latch opened before `timeout` elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (_, cvar) = &*self.pair;
        let count = self.lock();
        let (count, _) = cvar
            .wait_timeout_while(count, timeout, |count| *count > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *count == 0
    }

    pub fn countdown(&self) {
        let (_, cvar) = &*self.pair;
        let mut count = self.lock();
        if *count > 0 {
            *count -= 1;
            if *count == 0 {
                cvar.notify_all();
            }
        }
    }

    pub fn count(&self) -> usize {
        *self.lock()
    }
}
