pub mod analytical;
pub mod core;
pub mod experiments;

// Re-export commonly used types
pub use crate::analytical::MmkAnalytics;
pub use crate::core::config::QueueParams;
pub use crate::core::errors::{SimError, SimResult};
pub use crate::core::event::{Event, EventKind, SimTime};
pub use crate::core::simulation_engine::{simulate, RunReport, SimulationEngine, SimulationObserver};
pub use crate::core::statistics::RunResult;
pub use crate::core::variates::{SeededExponential, VariateSource};
