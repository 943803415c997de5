//! Generated gRPC code and converters for the worker service.
//!
//! This crate contains:
//! - Generated protobuf message types
//! - The generated gRPC client stub
//! - Converters between proto types and domain types

pub mod convert;

/// Generated protobuf types and services.
pub mod pb {
    // The path matches the proto package: worker.v1
    include!("gen/worker.v1.rs");
}

// Re-export commonly used types
pub use pb::worker_client::WorkerClient;
