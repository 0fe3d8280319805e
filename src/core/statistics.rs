//! Time-weighted statistics for one run.
//!
//! Queue length and busy-server count are integrated over virtual time
//! between consecutive processed events, always with the values that held
//! *before* the event's transition. Per-customer delay is matched FIFO:
//! the n-th departure that finds a waiting arrival timestamp is charged to
//! the oldest one. With k identical servers this does not track which
//! server served whom, but the aggregate mean delay is unaffected.

use serde::Serialize;
use std::collections::VecDeque;

use super::errors::{SimError, SimResult};
use super::event::{Event, EventKind, SimTime};
use super::state::SystemState;

/// Time-averaged metrics of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunResult {
    pub avg_queue_length: f64,
    pub avg_delay: f64,
    pub utilization: f64,
}

#[derive(Debug, Clone, Default)]
pub struct StatisticsAccumulator {
    area_queue_length: f64,
    area_server_busy: f64,
    delay_sum: f64,
    served: u64,
    last_event_time: SimTime,
    arrival_times: VecDeque<SimTime>,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate `state` over `[last_event_time, event.time]`, then do the
    /// arrival/departure bookkeeping. Must not be called for EXIT.
    pub fn update(&mut self, event: &Event, state: &SystemState) {
        debug_assert!(!event.is_exit(), "EXIT is not a simulated occurrence");
        debug_assert!(
            event.time >= self.last_event_time,
            "events must be fed in time order"
        );

        let elapsed = event.time - self.last_event_time;
        self.area_queue_length += state.queue_length as f64 * elapsed;
        self.area_server_busy += f64::from(state.servers_busy) * elapsed;
        self.last_event_time = event.time;

        match event.kind {
            EventKind::Arrival => self.arrival_times.push_back(event.time),
            EventKind::Departure => {
                // The bootstrap departure from START may find nobody recorded
                if let Some(arrived_at) = self.arrival_times.pop_front() {
                    self.delay_sum += event.time - arrived_at;
                    self.served += 1;
                }
            }
            EventKind::Start | EventKind::Exit => {}
        }
    }

    /// Convert integrals into rate metrics over `total_elapsed` virtual time
    pub fn finalize(&self, total_elapsed: SimTime, servers: u32) -> SimResult<RunResult> {
        if self.served == 0 {
            return Err(SimError::NoCustomersServed);
        }
        if total_elapsed <= 0.0 {
            return Err(SimError::ZeroElapsedTime);
        }

        Ok(RunResult {
            avg_queue_length: self.area_queue_length / total_elapsed,
            avg_delay: self.delay_sum / self.served as f64,
            utilization: self.area_server_busy / (total_elapsed * f64::from(servers)),
        })
    }

    pub fn served(&self) -> u64 {
        self.served
    }

    pub fn area_queue_length(&self) -> f64 {
        self.area_queue_length
    }

    pub fn area_server_busy(&self) -> f64 {
        self.area_server_busy
    }

    pub fn delay_sum(&self) -> f64 {
        self.delay_sum
    }

    pub fn last_event_time(&self) -> SimTime {
        self.last_event_time
    }

    /// Customers that have arrived but not yet been matched to a departure
    pub fn waiting_customers(&self) -> usize {
        self.arrival_times.len()
    }
}
