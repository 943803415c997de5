//! Forest Master Library
//!
//! Coordination layer between HTTP callers (or a declared task list) and the
//! worker fleet: request translation, worker selection, deadline-bounded
//! remote calls, outcome classification and batch sequencing.

pub mod batch;
pub mod config;
pub mod gateway;
pub mod http;
pub mod pool;
pub mod state;
pub mod translate;
pub mod worker;

pub use batch::BatchOrchestrator;
pub use config::Config;
pub use gateway::{Deadlines, JobGateway};
pub use pool::{PoolError, WorkerPool, WorkerSelector};
pub use state::AppState;
pub use worker::{GrpcWorker, SharedWorker, WorkerHandle};
