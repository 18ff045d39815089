use std::sync::atomic::{AtomicBool, Ordering};

/// In-flight flag for one form. Only one request per form may run at a time.
#[derive(Debug, Default)]
pub struct FormLock {
    busy: AtomicBool,
}

impl FormLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the form busy, or returns `None` if a request is already running.
    pub fn acquire(&self) -> Option<FormGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FormGuard { lock: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the form when dropped, whichever way the request ended.
#[derive(Debug)]
pub struct FormGuard<'a> {
    lock: &'a FormLock,
}

impl Drop for FormGuard<'_> {
    fn drop(&mut self) {
        self.lock.busy.store(false, Ordering::Release);
    }
}
