//! HTTP request handlers.

mod health;
mod jobs;

pub use health::{health_check, workers_health};
pub use jobs::{predict, train};
