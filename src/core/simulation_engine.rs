use super::config::QueueParams;
use super::errors::SimResult;
use super::event::{Event, EventKind, SimTime};
use super::event_scheduler::EventScheduler;
use super::state::SystemState;
use super::statistics::{RunResult, StatisticsAccumulator};
use super::variates::{SeededExponential, VariateSource};
use log::{debug, trace, warn};
use serde::Serialize;

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when the virtual clock moves forward
    fn on_clock_advance(&mut self, _old_time: SimTime, _new_time: SimTime) {}

    /// Called after an event's transition has been applied
    fn on_event_applied(
        &mut self,
        _event: &Event,
        _state: &SystemState,
        _stats: &StatisticsAccumulator,
    ) {
    }
}

/// What a single call to [`SimulationEngine::step`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    Processed(Event),
    /// The EXIT token was popped; the run is over
    Exited(Event),
    /// Nothing was pending
    Drained,
}

/// Everything a reporting layer needs from one finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub params: QueueParams,
    pub target_served: u64,
    pub seed: Option<u64>,
    pub result: RunResult,
    pub served: u64,
    pub elapsed_time: SimTime,
    pub events_processed: u64,
    /// Times the pending queue drained before the target was reached
    pub recoveries: u64,
}

pub struct SimulationEngine<V: VariateSource = SeededExponential> {
    params: QueueParams,
    target_served: u64,
    seed: Option<u64>,
    scheduler: EventScheduler,
    state: SystemState,
    stats: StatisticsAccumulator,
    arrivals: V,
    services: V,
    now: SimTime,
    events_processed: u64,
    recoveries: u64,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl SimulationEngine<SeededExponential> {
    /// Engine whose arrival and service streams are derived from `seed`
    pub fn from_seed(params: QueueParams, target_served: u64, seed: u64) -> SimResult<Self> {
        let (arrivals, services) = SeededExponential::stream_pair(seed);
        let mut engine = Self::new(params, target_served, arrivals, services)?;
        engine.seed = Some(seed);
        Ok(engine)
    }
}

impl<V: VariateSource> SimulationEngine<V> {
    /// Create an engine with explicit variate sources. Fails on invalid parameters.
    pub fn new(
        params: QueueParams,
        target_served: u64,
        arrivals: V,
        services: V,
    ) -> SimResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            target_served,
            seed: None,
            scheduler: EventScheduler::new(),
            state: SystemState::new(),
            stats: StatisticsAccumulator::new(),
            arrivals,
            services,
            now: 0.0,
            events_processed: 0,
            recoveries: 0,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    fn notify_clock_advance(&mut self, old_time: SimTime, new_time: SimTime) {
        for observer in &mut self.observers {
            observer.on_clock_advance(old_time, new_time);
        }
    }

    fn notify_event_applied(&mut self, event: &Event) {
        for observer in &mut self.observers {
            observer.on_event_applied(event, &self.state, &self.stats);
        }
    }

    /// Run the complete simulation from a START at time zero
    pub fn run(mut self) -> SimResult<RunReport> {
        debug!(
            "Starting M/M/{} run: lambda={}, mu={}, target={}",
            self.params.servers(),
            self.params.arrival_rate(),
            self.params.service_rate(),
            self.target_served
        );
        self.scheduler.schedule_event(Event::start());
        self.drive()
    }

    /// Process events until EXIT, re-injecting an arrival whenever the
    /// pending queue drains first.
    fn drive(mut self) -> SimResult<RunReport> {
        loop {
            match self.step() {
                StepOutcome::Processed(_) => {}
                StepOutcome::Exited(_) => break,
                StepOutcome::Drained => self.recover_from_starvation(),
            }
        }
        self.finish()
    }

    /// Pop and process the earliest pending event
    pub fn step(&mut self) -> StepOutcome {
        let Some(event) = self.scheduler.pop_earliest() else {
            return StepOutcome::Drained;
        };

        if event.is_exit() {
            trace!("{:.6} Event {}", event.time, event.kind);
            self.apply(event);
            return StepOutcome::Exited(event);
        }

        self.stats.update(&event, &self.state);

        let old_time = self.now;
        self.now = event.time;
        if self.now > old_time {
            self.notify_clock_advance(old_time, self.now);
        }

        trace!("{:.6} Event {}", event.time, event.kind);
        self.apply(event);
        self.events_processed += 1;
        self.notify_event_applied(&event);

        StepOutcome::Processed(event)
    }

    fn recover_from_starvation(&mut self) {
        let at = self.now + self.arrivals.exponential(self.params.arrival_rate());
        warn!(
            "Event queue drained at t={:.6} with {}/{} served; injecting arrival at t={:.6}",
            self.now,
            self.stats.served(),
            self.target_served,
            at
        );
        self.scheduler.schedule_event(Event::arrival(at));
        self.recoveries += 1;
    }

    /// Apply an event's state transition and schedule its follow-ons
    fn apply(&mut self, event: Event) {
        let now = self.now;
        match event.kind {
            EventKind::Start => {
                self.state.servers_busy += 1;
                self.scheduler.schedule_event(Event::arrival(now));
                self.schedule_departure();
            }
            EventKind::Arrival => {
                if self.target_reached() {
                    self.scheduler.schedule_event(Event::exit(now));
                    return;
                }
                let next = now + self.arrivals.exponential(self.params.arrival_rate());
                self.scheduler.schedule_event(Event::arrival(next));

                if self.state.has_idle_server(self.params.servers()) {
                    self.state.servers_busy += 1;
                    self.schedule_departure();
                } else {
                    self.state.queue_length += 1;
                }
            }
            EventKind::Departure => {
                if self.target_reached() {
                    self.scheduler.schedule_event(Event::exit(now));
                } else if self.state.queue_length > 0 {
                    // Server goes straight to the next waiting customer
                    self.state.queue_length -= 1;
                    self.schedule_departure();
                } else {
                    debug_assert!(self.state.servers_busy > 0);
                    self.state.servers_busy = self.state.servers_busy.saturating_sub(1);
                }
            }
            EventKind::Exit => {
                self.state.servers_busy = 0;
            }
        }
    }

    fn schedule_departure(&mut self) {
        let at = self.now + self.services.exponential(self.params.service_rate());
        self.scheduler.schedule_event(Event::departure(at));
    }

    fn target_reached(&self) -> bool {
        self.stats.served() >= self.target_served
    }

    fn finish(self) -> SimResult<RunReport> {
        let result = self.stats.finalize(self.now, self.params.servers())?;
        debug!(
            "Finished M/M/{} run at t={:.6}: served={}, events={}, recoveries={}",
            self.params.servers(),
            self.now,
            self.stats.served(),
            self.events_processed,
            self.recoveries
        );
        Ok(RunReport {
            params: self.params,
            target_served: self.target_served,
            seed: self.seed,
            result,
            served: self.stats.served(),
            elapsed_time: self.now,
            events_processed: self.events_processed,
            recoveries: self.recoveries,
        })
    }

    /// Get current simulation time
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    pub fn statistics(&self) -> &StatisticsAccumulator {
        &self.stats
    }

    pub fn params(&self) -> &QueueParams {
        &self.params
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }
}

/// Run one seeded simulation until `target_served` customers have departed
pub fn simulate(params: QueueParams, target_served: u64, seed: u64) -> SimResult<RunReport> {
    SimulationEngine::from_seed(params, target_served, seed)?.run()
}

#[cfg(test)]
impl<V: VariateSource> SimulationEngine<V> {
    /// Drive from whatever is currently pending, without the START bootstrap
    pub(crate) fn run_without_start(self) -> SimResult<RunReport> {
        self.drive()
    }
}
