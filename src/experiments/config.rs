//! Configuration for running experiment sweeps
//!
//! This module provides configuration types for controlling how independent
//! simulation runs of a sweep are executed, including concurrency settings
//! and thread pool management.

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Sequential execution mode - points are simulated one after another
    #[default]
    Sequential,
    /// Parallel execution mode using Rayon - each point runs its own engine concurrently
    Rayon,
}

/// Configuration for sweep execution
///
/// Runs never share state, so the mode only changes wall-clock time,
/// never the results.
#[derive(Debug, Clone, Default)]
pub struct SweepConfig {
    /// The concurrency mode to use for execution
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel execution
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl SweepConfig {
    /// Create a new sweep configuration with default values
    ///
    /// Default configuration uses Sequential mode with no thread pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency mode for the sweep
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Shorthand for a Rayon sweep on the default pool
    pub fn parallel() -> Self {
        Self::new().with_concurrency(ConcurrencyMode::Rayon)
    }
}
