use std::fmt;

/// Simulated time in the run's own units; only advanced at event instants
pub type SimTime = f64;

/// The closed set of event kinds the engine dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Bootstraps occupancy at time zero
    Start,
    Arrival,
    Departure,
    /// Control token that ends the run; never fed to the statistics
    Exit,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Start => "START",
            EventKind::Arrival => "ARRIVAL",
            EventKind::Departure => "DEPARTURE",
            EventKind::Exit => "EXIT",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: SimTime,
    pub kind: EventKind,
}

impl Event {
    pub fn new(time: SimTime, kind: EventKind) -> Self {
        Self { time, kind }
    }

    pub fn start() -> Self {
        Self::new(0.0, EventKind::Start)
    }

    pub fn arrival(time: SimTime) -> Self {
        Self::new(time, EventKind::Arrival)
    }

    pub fn departure(time: SimTime) -> Self {
        Self::new(time, EventKind::Departure)
    }

    pub fn exit(time: SimTime) -> Self {
        Self::new(time, EventKind::Exit)
    }

    pub fn is_exit(&self) -> bool {
        self.kind == EventKind::Exit
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {:.6}", self.kind, self.time)
    }
}
