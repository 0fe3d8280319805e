//! Experiment drivers: one reference run, a utilization sweep, and a sweep
//! over utilization × server count.
//!
//! Every point of a sweep builds its own engine from scratch, so points can
//! run on a rayon pool without sharing anything.

pub mod config;
pub mod report;

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::analytical::MmkAnalytics;
use crate::core::config::QueueParams;
use crate::core::errors::{SimError, SimResult};
use crate::core::simulation_engine::{simulate, RunReport};

pub use config::{ConcurrencyMode, SweepConfig};

pub const SINGLE_RUN_SEED: u64 = 101;
pub const SWEEP_SEED: u64 = 110;
pub const DEFAULT_TARGET_SERVED: u64 = 100;
/// Service rate shared by the sweeps: 1000 customers per 60 time units
pub const SWEEP_SERVICE_RATE: f64 = 1000.0 / 60.0;

/// ρ = 0.1, 0.2, ..., 1.0
pub fn default_ratios() -> Vec<f64> {
    (1..=10u32).map(|u| f64::from(u) / 10.0).collect()
}

/// The reference run: λ = 5/60, μ = 8/60, one server, seed 101
pub fn single_run() -> SimResult<RunReport> {
    let params = QueueParams::new(5.0 / 60.0, 8.0 / 60.0, 1)?;
    simulate(params, DEFAULT_TARGET_SERVED, SINGLE_RUN_SEED)
}

/// A grid of (ratio, server count) points sharing one service rate and seed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPlan {
    pub service_rate: f64,
    pub ratios: Vec<f64>,
    pub server_counts: Vec<u32>,
    pub target_served: u64,
    pub seed: u64,
}

impl SweepPlan {
    /// Ratios 0.1..=1.0 on a single server
    pub fn utilization() -> Self {
        Self {
            service_rate: SWEEP_SERVICE_RATE,
            ratios: default_ratios(),
            server_counts: vec![1],
            target_served: DEFAULT_TARGET_SERVED,
            seed: SWEEP_SEED,
        }
    }

    /// Ratios 0.1..=1.0 for one through four servers
    pub fn servers() -> Self {
        Self {
            server_counts: vec![1, 2, 3, 4],
            ..Self::utilization()
        }
    }

    /// Expand into validated parameters, server count outermost
    pub fn points(&self) -> SimResult<Vec<(f64, QueueParams)>> {
        if self.ratios.is_empty() || self.server_counts.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "sweep needs at least one ratio and one server count".to_string(),
            ));
        }
        self.server_counts
            .iter()
            .flat_map(|&servers| self.ratios.iter().map(move |&ratio| (ratio, servers)))
            .map(|(ratio, servers)| {
                QueueParams::from_ratio(ratio, self.service_rate, servers)
                    .map(|params| (ratio, params))
            })
            .collect()
    }
}

/// One simulated point of a sweep, with closed-form figures when stable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    pub ratio: f64,
    pub report: RunReport,
    pub analytical: Option<MmkAnalytics>,
}

impl SweepPoint {
    pub fn servers(&self) -> u32 {
        self.report.params.servers()
    }
}

fn run_point(ratio: f64, params: QueueParams, plan: &SweepPlan) -> SimResult<SweepPoint> {
    let report = simulate(params, plan.target_served, plan.seed)?;
    info!(
        "k={} ratio={:.2}: Lq={:.4} delay={:.6} util={:.4}",
        params.servers(),
        ratio,
        report.result.avg_queue_length,
        report.result.avg_delay,
        report.result.utilization
    );
    Ok(SweepPoint {
        ratio,
        report,
        analytical: MmkAnalytics::compute(&params).ok(),
    })
}

fn build_pool(thread_pool_size: Option<usize>) -> SimResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = thread_pool_size {
        builder = builder.num_threads(threads);
    }
    builder
        .build()
        .map_err(|error| SimError::ThreadPool(error.to_string()))
}

/// Simulate every point of `plan`; results keep the order of [`SweepPlan::points`]
pub fn run_sweep(plan: &SweepPlan, config: &SweepConfig) -> SimResult<Vec<SweepPoint>> {
    let points = plan.points()?;
    info!(
        "Running {} sweep points ({:?})",
        points.len(),
        config.concurrency_mode
    );

    match config.concurrency_mode {
        ConcurrencyMode::Sequential => points
            .iter()
            .map(|&(ratio, params)| run_point(ratio, params, plan))
            .collect(),
        ConcurrencyMode::Rayon => {
            let pool = build_pool(config.thread_pool_size)?;
            pool.install(|| {
                points
                    .par_iter()
                    .map(|&(ratio, params)| run_point(ratio, params, plan))
                    .collect()
            })
        }
    }
}

/// Utilization sweep on one server
pub fn utilization_sweep(config: &SweepConfig) -> SimResult<Vec<SweepPoint>> {
    run_sweep(&SweepPlan::utilization(), config)
}

/// Utilization sweep repeated for one through four servers
pub fn server_sweep(config: &SweepConfig) -> SimResult<Vec<SweepPoint>> {
    run_sweep(&SweepPlan::servers(), config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ratios() {
        let ratios = default_ratios();
        assert_eq!(ratios.len(), 10);
        assert!((ratios[0] - 0.1).abs() < 1e-12);
        assert!((ratios[9] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_points_order_servers_outermost() {
        let plan = SweepPlan {
            ratios: vec![0.5, 0.9],
            server_counts: vec![1, 3],
            ..SweepPlan::utilization()
        };
        let servers: Vec<(f64, u32)> = plan
            .points()
            .unwrap()
            .into_iter()
            .map(|(ratio, params)| (ratio, params.servers()))
            .collect();
        assert_eq!(servers, vec![(0.5, 1), (0.9, 1), (0.5, 3), (0.9, 3)]);
    }

    #[test]
    fn test_empty_plan_rejected() {
        let plan = SweepPlan {
            ratios: vec![],
            ..SweepPlan::utilization()
        };
        assert!(matches!(
            plan.points(),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_bad_ratio_rejected() {
        let plan = SweepPlan {
            ratios: vec![0.5, -0.1],
            ..SweepPlan::utilization()
        };
        assert!(plan.points().is_err());
        assert!(run_sweep(&plan, &SweepConfig::new()).is_err());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let plan = SweepPlan {
            server_counts: vec![1, 2],
            target_served: 300,
            ..SweepPlan::utilization()
        };
        let sequential = run_sweep(&plan, &SweepConfig::new()).unwrap();
        let parallel = run_sweep(&plan, &SweepConfig::parallel().with_thread_pool_size(3)).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_unstable_points_have_no_analytics() {
        let points = utilization_sweep(&SweepConfig::new()).unwrap();
        assert_eq!(points.len(), 10);
        assert!(points[..9].iter().all(|p| p.analytical.is_some()));
        assert!(points[9].analytical.is_none());
    }

    #[test]
    fn test_single_run_reference() {
        let report = single_run().unwrap();
        assert_eq!(report.served, 100);
        assert_eq!(report.seed, Some(SINGLE_RUN_SEED));
    }
}
