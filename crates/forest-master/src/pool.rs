//! Worker pool - decides which worker serves a job.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::worker::{GrpcWorker, SharedWorker};

/// Pool construction errors. Raised at startup, before any job runs.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("no worker addresses configured")]
    NoWorkers,

    #[error("invalid worker address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
}

/// Chooses a worker for each job.
///
/// The gateway only sees this trait, so a liveness-aware selector can wrap
/// [`WorkerPool`] without touching callers. Any per-endpoint liveness state
/// such a wrapper keeps must be atomic or lock-protected.
pub trait WorkerSelector: Send + Sync {
    /// Pick the worker for the next job.
    fn select(&self) -> SharedWorker;

    /// Number of workers that can be selected.
    fn size(&self) -> usize;

    /// Every worker, in configuration order.
    fn workers(&self) -> &[SharedWorker];
}

/// Deterministic round-robin over a fixed, non-empty worker list.
///
/// The list is read-only after construction; the cursor is the only shared
/// mutable state.
pub struct WorkerPool {
    workers: Vec<SharedWorker>,
    next: AtomicUsize,
}

impl WorkerPool {
    /// Build a pool from already-constructed handles.
    pub fn new(workers: Vec<SharedWorker>) -> Result<Self, PoolError> {
        if workers.is_empty() {
            return Err(PoolError::NoWorkers);
        }

        Ok(Self {
            workers,
            next: AtomicUsize::new(0),
        })
    }

    /// Build gRPC handles for every address. Connections open on first use.
    pub fn connect_lazy(addresses: &[String], connect_timeout: Duration) -> Result<Self, PoolError> {
        let workers = addresses
            .iter()
            .map(|address| {
                GrpcWorker::new(address, connect_timeout)
                    .map(|w| Arc::new(w) as SharedWorker)
                    .map_err(|e| PoolError::InvalidAddress {
                        address: address.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pool = Self::new(workers)?;
        info!(
            workers = pool.size(),
            endpoints = ?addresses,
            "Worker pool ready"
        );
        Ok(pool)
    }
}

impl WorkerSelector for WorkerPool {
    fn select(&self) -> SharedWorker {
        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.workers.len();
        self.workers[index].clone()
    }

    fn size(&self) -> usize {
        self.workers.len()
    }

    fn workers(&self) -> &[SharedWorker] {
        &self.workers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::testing::{erase, ScriptedWorker};

    #[test]
    fn test_empty_pool_is_rejected() {
        assert!(matches!(WorkerPool::new(Vec::new()), Err(PoolError::NoWorkers)));
        assert!(matches!(
            WorkerPool::connect_lazy(&[], Duration::from_secs(1)),
            Err(PoolError::NoWorkers)
        ));
    }

    #[test]
    fn test_round_robin_is_deterministic() {
        let a = ScriptedWorker::new("a").shared();
        let b = ScriptedWorker::new("b").shared();
        let c = ScriptedWorker::new("c").shared();
        let pool = WorkerPool::new(vec![erase(&a), erase(&b), erase(&c)]).unwrap();

        let picked: Vec<String> = (0..7)
            .map(|_| pool.select().endpoint().to_string())
            .collect();
        assert_eq!(picked, vec!["a", "b", "c", "a", "b", "c", "a"]);
        assert_eq!(pool.size(), 3);
    }

    #[test]
    fn test_single_worker_is_always_selected() {
        let only = ScriptedWorker::new("only").shared();
        let pool = WorkerPool::new(vec![erase(&only)]).unwrap();
        for _ in 0..3 {
            assert_eq!(pool.select().endpoint(), "only");
        }
    }

    #[tokio::test]
    async fn test_connect_lazy_does_not_dial() {
        // Nothing listens on port 9; construction must still succeed.
        let pool = WorkerPool::connect_lazy(
            &["http://127.0.0.1:9".to_string(), "http://127.0.0.1:10".to_string()],
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(pool.size(), 2);
        assert_eq!(pool.workers()[1].endpoint(), "http://127.0.0.1:10");
    }

    #[test]
    fn test_invalid_address_names_the_entry() {
        let err = WorkerPool::connect_lazy(&["bad uri".to_string()], Duration::from_secs(1))
            .err()
            .unwrap();
        assert!(err.to_string().contains("'bad uri'"));
    }
}
