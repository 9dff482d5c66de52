use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

/// Number of client workers that have not exited yet.
#[derive(Debug, Clone, Default)]
pub struct ActiveClients {
    counter: Arc<AtomicUsize>,
}

impl ActiveClients {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one live worker until the guard is dropped.
    #[must_use]
    pub fn enter(&self) -> ActiveGuard {
        self.counter.fetch_add(1, Ordering::AcqRel);
        ActiveGuard {
            counter: self.counter.clone(),
        }
    }

    #[must_use]
    pub fn get(&self) -> usize {
        self.counter.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct ActiveGuard {
    counter: Arc<AtomicUsize>,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        loop {
            let current = self.counter.load(Ordering::Acquire);
            let Some(next) = current.checked_sub(1) else {
                break;
            };
            if self
                .counter
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
        }
    }
}
