// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Async task bookkeeping for a page
//!
//! Requests register themselves while they have I/O in flight so the page can
//! wait for quiescence (`when_complete`) or force-abort everything
//! (`abort_all`).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Task identifier handed out by a registry
pub type TaskId = u64;

/// Callback invoked when a task is force-aborted
pub type CancelCallback = Box<dyn FnOnce() + Send>;

/// Registry of in-flight operations
pub trait AsyncTaskRegistry: Send + Sync {
    /// Register a cancelable task
    fn register(&self, cancel: CancelCallback) -> TaskId;

    /// Mark a task complete; unknown ids are ignored
    fn complete(&self, id: TaskId);
}

/// Default task registry
pub struct AsyncTaskManager {
    tasks: Mutex<HashMap<TaskId, CancelCallback>>,
    next_id: AtomicU64,
    idle: Notify,
}

impl Default for AsyncTaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncTaskManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            idle: Notify::new(),
        }
    }

    /// Number of tasks still running
    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Check if there are pending tasks
    pub fn has_pending(&self) -> bool {
        self.pending() > 0
    }

    /// Wait until no task is pending
    pub async fn when_complete(&self) {
        loop {
            let notified = self.idle.notified();
            if !self.has_pending() {
                return;
            }
            notified.await;
        }
    }

    /// Cancel every pending task.
    ///
    /// Callbacks run without the registry lock held, so they may call back
    /// into [`AsyncTaskRegistry::complete`].
    pub fn abort_all(&self) {
        let cancelled: Vec<CancelCallback> = {
            let mut tasks = self.tasks.lock();
            tasks.drain().map(|(_, cancel)| cancel).collect()
        };

        for cancel in cancelled {
            cancel();
        }
        self.idle.notify_waiters();
    }
}

impl AsyncTaskRegistry for AsyncTaskManager {
    fn register(&self, cancel: CancelCallback) -> TaskId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.tasks.lock().insert(id, cancel);
        id
    }

    fn complete(&self, id: TaskId) {
        let now_idle = {
            let mut tasks = self.tasks.lock();
            tasks.remove(&id).is_some() && tasks.is_empty()
        };
        if now_idle {
            self.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_register_and_complete() {
        let manager = AsyncTaskManager::new();
        let a = manager.register(Box::new(|| {}));
        let b = manager.register(Box::new(|| {}));
        assert_ne!(a, b);
        assert_eq!(manager.pending(), 2);

        manager.complete(a);
        manager.complete(a);
        assert_eq!(manager.pending(), 1);

        manager.complete(b);
        assert!(!manager.has_pending());
    }

    #[test]
    fn test_abort_all_runs_callbacks() {
        let manager = Arc::new(AsyncTaskManager::new());
        let called = Arc::new(AtomicBool::new(false));

        let flag = called.clone();
        let registry = manager.clone();
        let id = Arc::new(AtomicU64::new(0));
        let id_in_cb = id.clone();
        let task = manager.register(Box::new(move || {
            flag.store(true, Ordering::SeqCst);
            // Re-entrant completion must not deadlock
            registry.complete(id_in_cb.load(Ordering::SeqCst));
        }));
        id.store(task, Ordering::SeqCst);

        manager.abort_all();
        assert!(called.load(Ordering::SeqCst));
        assert_eq!(manager.pending(), 0);
    }

    #[tokio::test]
    async fn test_when_complete_waits() {
        let manager = Arc::new(AsyncTaskManager::new());
        let id = manager.register(Box::new(|| {}));

        let finisher = manager.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            finisher.complete(id);
        });

        tokio::time::timeout(Duration::from_secs(2), manager.when_complete())
            .await
            .expect("tasks never completed");
        assert!(!manager.has_pending());
    }
}
