//! Shared application state.

use std::sync::Arc;

use crate::gateway::JobGateway;
use crate::worker::SharedWorker;

/// Shared application state.
pub struct AppState {
    /// Gateway every HTTP job goes through.
    pub gateway: Arc<JobGateway>,
}

impl AppState {
    /// Create a new AppState wrapped in Arc.
    pub fn new(gateway: Arc<JobGateway>) -> Arc<Self> {
        Arc::new(Self { gateway })
    }

    /// Number of configured workers.
    pub fn worker_count(&self) -> usize {
        self.gateway.selector().size()
    }

    /// Every configured worker, in configuration order.
    pub fn workers(&self) -> &[SharedWorker] {
        self.gateway.selector().workers()
    }
}
