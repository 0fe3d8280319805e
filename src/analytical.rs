//! Closed-form steady-state figures for M/M/k queues.
//!
//! Simulated `avg_queue_length` counts customers *waiting*, so it compares
//! against [`MmkAnalytics::lq`]; simulated `avg_delay` runs from arrival to
//! departure and compares against [`MmkAnalytics::w`].

use serde::Serialize;

use crate::core::config::QueueParams;
use crate::core::errors::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MmkAnalytics {
    /// λ/μ
    pub offered_load: f64,
    /// λ/(kμ)
    pub utilization: f64,
    /// Erlang C: probability an arrival has to wait
    pub prob_wait: f64,
    /// Mean number waiting
    pub lq: f64,
    /// Mean number in system
    pub l: f64,
    /// Mean time waiting
    pub wq: f64,
    /// Mean time in system
    pub w: f64,
}

impl MmkAnalytics {
    pub fn compute(params: &QueueParams) -> SimResult<Self> {
        params.validate()?;
        let utilization = params.utilization();
        if utilization >= 1.0 {
            return Err(SimError::Unstable { utilization });
        }

        let a = params.offered_load();
        let k = params.servers();
        let prob_wait = erlang_c(a, k, utilization);
        let lq = prob_wait * utilization / (1.0 - utilization);
        let wq = lq / params.arrival_rate();
        let w = wq + 1.0 / params.service_rate();
        let l = params.arrival_rate() * w;

        Ok(Self {
            offered_load: a,
            utilization,
            prob_wait,
            lq,
            l,
            wq,
            w,
        })
    }
}

/// Erlang C formula, with the a^n/n! terms built up iteratively
fn erlang_c(a: f64, k: u32, utilization: f64) -> f64 {
    let mut term = 1.0;
    let mut below_k = 0.0;
    for n in 0..k {
        below_k += term;
        term *= a / f64::from(n + 1);
    }
    // term is now a^k / k!
    let tail = term / (1.0 - utilization);
    tail / (below_k + tail)
}
