//! Simulation Events
//!
//! Per-tick event queue and the JSONL event logger.

use bevy_ecs::prelude::*;

use amoeba_events::{EventDetail, Point, SimEvent};

pub mod logger;

pub use logger::EventLogger;

/// Resource storing events generated this tick
#[derive(Resource, Debug)]
pub struct TickEvents {
    pub events: Vec<SimEvent>,
    next_event_id: u64,
}

impl Default for TickEvents {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            next_event_id: 1,
        }
    }
}

impl TickEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate_id(&mut self) -> String {
        let id = format!("evt_{:08}", self.next_event_id);
        self.next_event_id += 1;
        id
    }

    /// Build and queue an event
    pub fn record(&mut self, tick: u64, agent_id: u64, position: Point, detail: EventDetail) {
        let event = SimEvent {
            event_id: self.generate_id(),
            tick,
            agent_id,
            position,
            detail,
        };
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_keep_counting_after_drain() {
        let mut events = TickEvents::new();
        events.record(1, 1, Point::default(), EventDetail::BecameInert { age: 1.0 });
        events.record(1, 2, Point::default(), EventDetail::BecameInert { age: 2.0 });
        assert_eq!(events.len(), 2);

        let drained = events.drain();
        assert_eq!(drained[0].event_id, "evt_00000001");
        assert_eq!(drained[1].event_id, "evt_00000002");
        assert!(events.is_empty());

        assert_eq!(events.generate_id(), "evt_00000003");
    }
}
