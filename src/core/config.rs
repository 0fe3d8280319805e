use serde::{Deserialize, Serialize};

use super::errors::{SimError, SimResult};

/// Parameters of one M/M/k run: Poisson arrivals at `arrival_rate`,
/// exponential service at `service_rate` per server, `servers` identical
/// servers fed by one shared FIFO queue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueParams {
    arrival_rate: f64,
    service_rate: f64,
    servers: u32,
}

impl QueueParams {
    /// Create validated queue parameters
    pub fn new(arrival_rate: f64, service_rate: f64, servers: u32) -> SimResult<Self> {
        let params = Self {
            arrival_rate,
            service_rate,
            servers,
        };
        params.validate()?;
        Ok(params)
    }

    /// Build parameters where the arrival rate is `ratio * service_rate`
    pub fn from_ratio(ratio: f64, service_rate: f64, servers: u32) -> SimResult<Self> {
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "ratio must be positive and finite, got {ratio}"
            )));
        }
        Self::new(ratio * service_rate, service_rate, servers)
    }

    /// Reject non-positive or non-finite rates and an empty server pool.
    ///
    /// Deserialized values bypass `new`, so the engine calls this again
    /// before scheduling anything.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.arrival_rate.is_finite() && self.arrival_rate > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "arrival rate must be positive and finite, got {}",
                self.arrival_rate
            )));
        }
        if !(self.service_rate.is_finite() && self.service_rate > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "service rate must be positive and finite, got {}",
                self.service_rate
            )));
        }
        if self.servers == 0 {
            return Err(SimError::InvalidConfiguration(
                "server count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    pub fn service_rate(&self) -> f64 {
        self.service_rate
    }

    pub fn servers(&self) -> u32 {
        self.servers
    }

    /// λ/μ, the mean number of busy servers in steady state
    pub fn offered_load(&self) -> f64 {
        self.arrival_rate / self.service_rate
    }

    /// λ/(kμ), the long-run fraction of capacity in use
    pub fn utilization(&self) -> f64 {
        self.offered_load() / f64::from(self.servers)
    }
}
