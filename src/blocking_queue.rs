use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::trace;

/// Unbounded handoff between any number of producers and consumers.
///
/// `send` never blocks beyond the short lock hold. `receive` parks the
/// caller on a condition variable until a value is available. Values are
/// taken from the same end they were put on, so under contention the most
/// recently sent value is delivered first. Every sent value is handed to
/// exactly one `receive` call.
///
/// Cloning yields another handle to the same queue.
pub struct BlockingQueue<T> {
    pair: Arc<(Mutex<VecDeque<T>>, Condvar)>,
}

impl<T> Clone for BlockingQueue<T> {
    fn clone(&self) -> Self {
        BlockingQueue {
            pair: self.pair.clone(),
        }
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        BlockingQueue {
            pair: Arc::new((Mutex::new(VecDeque::<T>::new()), Condvar::new())),
        }
    }

    // A panic elsewhere cannot leave the deque half-modified, so a poisoned
    // lock still guards a consistent queue.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        let (lock, _) = &*self.pair;
        lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `t` and wakes one blocked receiver, if any.
    pub fn send(&self, t: T) {
        let (_, cvar) = &*self.pair;
        {
            let mut queue = self.lock();
            queue.push_back(t);
            trace!(len = queue.len(), "queue send");
        }
        cvar.notify_one();
    }

    /// Blocks until a value is available and takes the most recent one.
    ///
    /// There is no timeout: if nothing is ever sent this never returns.
    pub fn receive(&self) -> T {
        let (_, cvar) = &*self.pair;
        let mut queue = self.lock();
        loop {
            if let Some(t) = queue.pop_back() {
                trace!(len = queue.len(), "queue receive");
                return t;
            }
            queue = cvar.wait(queue).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`receive`](Self::receive) but gives up after `timeout`.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return Some(self.receive()),
        };

        let (_, cvar) = &*self.pair;
        let mut queue = self.lock();
        loop {
            if let Some(t) = queue.pop_back() {
                trace!(len = queue.len(), "queue receive");
                return Some(t);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = cvar
                .wait_timeout(queue, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            queue = guard;
        }
    }

    /// Takes the most recent value without blocking.
    pub fn try_receive(&self) -> Option<T> {
        self.lock().pop_back()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
