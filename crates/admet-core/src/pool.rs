//! Bounded pool of prediction workers.
//!
//! Workers wrap engines that are not safe for concurrent use, so the pool
//! hands each one to at most one caller at a time. [`WorkerPool::acquire`]
//! suspends when every worker is checked out; dropping the returned
//! [`PoolSlot`] puts the worker back on every exit path, including error
//! returns, panics, and cancelled futures.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::error::{AdmetError, Result};
use crate::worker::PredictionWorker;

struct PoolShared {
    free: Mutex<Vec<PredictionWorker>>,
    permits: Arc<Semaphore>,
    capacity: usize,
}

/// Fixed-size worker pool. Cheap to clone; clones share the same workers.
#[derive(Clone)]
pub struct WorkerPool {
    shared: Arc<PoolShared>,
}

impl WorkerPool {
    /// Build a pool from pre-constructed workers. At least one is required.
    pub fn new(workers: Vec<PredictionWorker>) -> Result<Self> {
        if workers.is_empty() {
            return Err(AdmetError::EmptyPool);
        }
        let capacity = workers.len();
        Ok(Self {
            shared: Arc::new(PoolShared {
                free: Mutex::new(workers),
                permits: Arc::new(Semaphore::new(capacity)),
                capacity,
            }),
        })
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Number of workers currently idle in the pool.
    pub fn idle(&self) -> usize {
        self.shared.free.lock().unwrap().len()
    }

    /// Check out a worker, suspending until one is free.
    ///
    /// Grants are in no guaranteed order; the only promise is mutual
    /// exclusion per worker.
    pub async fn acquire(&self) -> PoolSlot {
        let permit = Arc::clone(&self.shared.permits)
            .acquire_owned()
            .await
            .expect("pool semaphore closed");
        self.take_slot(permit)
    }

    /// Check out a worker, waiting at most `timeout`.
    pub async fn acquire_timeout(&self, timeout: Duration) -> Result<PoolSlot> {
        match tokio::time::timeout(timeout, self.acquire()).await {
            Ok(slot) => Ok(slot),
            Err(_) => Err(AdmetError::AcquireTimeout {
                waited_secs: timeout.as_secs(),
            }),
        }
    }

    fn take_slot(&self, permit: OwnedSemaphorePermit) -> PoolSlot {
        let worker = self
            .shared
            .free
            .lock()
            .unwrap()
            .pop()
            .expect("semaphore permit held but free list is empty");
        debug!(idle = self.idle(), capacity = self.capacity(), "worker checked out");
        PoolSlot {
            worker: Some(worker),
            shared: Arc::clone(&self.shared),
            _permit: permit,
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("capacity", &self.capacity())
            .field("idle", &self.idle())
            .finish()
    }
}

/// Exclusive custody of one worker; returns it to the pool on drop.
pub struct PoolSlot {
    worker: Option<PredictionWorker>,
    shared: Arc<PoolShared>,
    _permit: OwnedSemaphorePermit,
}

impl std::fmt::Debug for PoolSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolSlot")
            .field("held", &self.worker.is_some())
            .finish()
    }
}

impl Deref for PoolSlot {
    type Target = PredictionWorker;

    fn deref(&self) -> &PredictionWorker {
        self.worker.as_ref().expect("slot already released")
    }
}

impl DerefMut for PoolSlot {
    fn deref_mut(&mut self) -> &mut PredictionWorker {
        self.worker.as_mut().expect("slot already released")
    }
}

impl Drop for PoolSlot {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            // The worker must be back on the free list before the permit
            // frees, so a waiter never sees an empty list.
            self.shared.free.lock().unwrap().push(worker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FailingModel, StaticModel};

    fn pool_of(n: usize) -> WorkerPool {
        let workers = (0..n)
            .map(|_| PredictionWorker::new(Box::new(StaticModel::new([("logP", 1.0)]))))
            .collect();
        WorkerPool::new(workers).unwrap()
    }

    #[tokio::test]
    async fn test_grants_at_most_capacity_concurrently() {
        let pool = pool_of(2);
        let a = pool.acquire().await;
        let b = pool.acquire().await;
        assert_eq!(pool.idle(), 0);

        // Third acquirer stays suspended while both workers are out.
        let pending = tokio::time::timeout(Duration::from_millis(50), pool.acquire()).await;
        assert!(pending.is_err());

        // One release grants exactly one waiter.
        drop(a);
        let c = tokio::time::timeout(Duration::from_millis(200), pool.acquire()).await;
        assert!(c.is_ok());
        assert_eq!(pool.idle(), 0);

        drop(b);
        drop(c);
        assert_eq!(pool.idle(), 2);
    }

    #[tokio::test]
    async fn test_slot_releases_after_faulting_run() {
        let workers = vec![PredictionWorker::new(Box::new(FailingModel::new("boom")))];
        let pool = WorkerPool::new(workers).unwrap();
        let before = pool.idle();

        let mut slot = pool.acquire().await;
        assert!(slot.run("CCO").await.is_err());
        drop(slot);

        assert_eq!(pool.idle(), before);
    }

    #[tokio::test]
    async fn test_acquire_timeout_expires_when_exhausted() {
        let pool = pool_of(1);
        let _held = pool.acquire().await;

        let err = pool
            .acquire_timeout(Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, AdmetError::AcquireTimeout { .. }));
    }

    #[tokio::test]
    async fn test_acquire_timeout_succeeds_when_free() {
        let pool = pool_of(1);
        let slot = pool.acquire_timeout(Duration::from_secs(1)).await;
        assert!(slot.is_ok());
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let err = WorkerPool::new(Vec::new()).unwrap_err();
        assert!(matches!(err, AdmetError::EmptyPool));
    }

    #[tokio::test]
    async fn test_cancelled_waiter_does_not_leak_a_permit() {
        let pool = pool_of(1);
        let held = pool.acquire().await;

        // A timed-out waiter is dropped mid-acquire; the permit it queued
        // for must still reach later acquirers.
        let _ = pool.acquire_timeout(Duration::from_millis(10)).await;
        drop(held);

        let slot = tokio::time::timeout(Duration::from_millis(200), pool.acquire()).await;
        assert!(slot.is_ok());
    }
}
