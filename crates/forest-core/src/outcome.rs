//! Tagged result of executing one job.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Infrastructure-level reason a remote call did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportFailureKind {
    /// Endpoint could not be reached or the connection dropped.
    Unreachable,
    /// The call's deadline expired before a reply arrived.
    Timeout,
    /// The exchange failed at the RPC layer (bad frame, unexpected status).
    ProtocolError,
    /// The surrounding batch was cancelled while the call was in flight.
    Cancelled,
}

impl TransportFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unreachable => "unreachable",
            Self::Timeout => "timeout",
            Self::ProtocolError => "protocol_error",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of attempting one job. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome<T> {
    /// The worker completed the job.
    Success { payload: T },
    /// The worker ran but reported a logical failure.
    WorkerRejected { message: String },
    /// The remote call itself failed.
    TransportFailure {
        kind: TransportFailureKind,
        cause: String,
    },
    /// The request was malformed; no worker was contacted.
    ValidationFailure { cause: ValidationError },
}

impl<T> JobOutcome<T> {
    pub fn success(payload: T) -> Self {
        Self::Success { payload }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::WorkerRejected {
            message: message.into(),
        }
    }

    pub fn transport(kind: TransportFailureKind, cause: impl Into<String>) -> Self {
        Self::TransportFailure {
            kind,
            cause: cause.into(),
        }
    }

    pub fn invalid(cause: ValidationError) -> Self {
        Self::ValidationFailure { cause }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Only timeouts and unreachable endpoints may be retried by a caller,
    /// with a fresh deadline. Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransportFailure {
                kind: TransportFailureKind::Timeout | TransportFailureKind::Unreachable,
                ..
            }
        )
    }

    /// Short machine-readable label of the variant.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::WorkerRejected { .. } => "worker_rejected",
            Self::TransportFailure { .. } => "transport_failure",
            Self::ValidationFailure { .. } => "validation_failure",
        }
    }

    /// The failure text exactly as it was produced, if this is a failure.
    pub fn cause(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::WorkerRejected { message } => Some(message.clone()),
            Self::TransportFailure { cause, .. } => Some(cause.clone()),
            Self::ValidationFailure { cause } => Some(cause.to_string()),
        }
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Success { payload } => Some(payload),
            _ => None,
        }
    }

    /// Transform the success payload, keeping failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> JobOutcome<U> {
        match self {
            Self::Success { payload } => JobOutcome::Success { payload: f(payload) },
            Self::WorkerRejected { message } => JobOutcome::WorkerRejected { message },
            Self::TransportFailure { kind, cause } => JobOutcome::TransportFailure { kind, cause },
            Self::ValidationFailure { cause } => JobOutcome::ValidationFailure { cause },
        }
    }

    /// Chain a follow-up classification onto a successful payload.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> JobOutcome<U>) -> JobOutcome<U> {
        match self {
            Self::Success { payload } => f(payload),
            Self::WorkerRejected { message } => JobOutcome::WorkerRejected { message },
            Self::TransportFailure { kind, cause } => JobOutcome::TransportFailure { kind, cause },
            Self::ValidationFailure { cause } => JobOutcome::ValidationFailure { cause },
        }
    }
}
