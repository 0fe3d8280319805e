use super::event::{Event, SimTime};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent {
    pub sequence_num: u64,
    pub event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default).
        // Same-time events fall back to insertion order.
        other
            .event
            .time
            .total_cmp(&self.event.time)
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Min-priority queue of pending events keyed by (time, insertion sequence)
#[derive(Debug, Default)]
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event; O(log n)
    pub fn schedule_event(&mut self, event: Event) {
        debug_assert!(
            event.time.is_finite() && event.time >= 0.0,
            "event time must be finite and non-negative"
        );
        self.event_queue.push(ScheduledEvent {
            sequence_num: self.sequence_counter,
            event,
        });
        self.sequence_counter += 1;
    }

    /// Remove and return the earliest event, `None` when nothing is pending
    pub fn pop_earliest(&mut self) -> Option<Event> {
        self.event_queue.pop().map(|scheduled| scheduled.event)
    }

    pub fn peek_next_time(&self) -> Option<SimTime> {
        self.event_queue.peek().map(|scheduled| scheduled.event.time)
    }

    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.event_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_queue.is_empty()
    }
}
