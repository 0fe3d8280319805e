//! Error types for the M/M/k simulation core

use thiserror::Error;

/// Top-level error type for simulation operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Rates, server count or sweep setup rejected before any event is scheduled
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `finalize` was reached with nobody served, so the mean delay is undefined
    #[error("No customers were served; average delay is undefined")]
    NoCustomersServed,

    #[error("No virtual time elapsed; time averages are undefined")]
    ZeroElapsedTime,

    /// Closed-form figures only exist for a stable queue
    #[error("Queue is unstable (utilization {utilization:.3} >= 1)")]
    Unstable { utilization: f64 },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

pub type SimResult<T> = Result<T, SimError>;
