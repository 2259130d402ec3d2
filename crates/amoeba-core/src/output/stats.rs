//! Statistics Output
//!
//! Collects run-level statistics from the event stream.

use serde::Serialize;
use std::collections::BTreeMap;

use amoeba_events::{EventDetail, EventType, OffspringPlacement, SimEvent, WorldSnapshot};

/// Overall simulation statistics
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStats {
    pub total_ticks: u64,
    pub total_events: usize,
    pub events_by_type: BTreeMap<String, usize>,
    pub food_consumed: usize,
    pub births: usize,
    pub agents_gone_inert: usize,
    /// Most agents active at once, counted event by event
    pub peak_active: usize,
    pub final_population: usize,
    pub final_active: usize,
    pub food_remaining: usize,
    /// Tick of the first event, if any happened
    pub first_event_tick: Option<u64>,
}

/// Accumulates statistics during a run
#[derive(Debug, Default)]
pub struct StatsCollector {
    pub total_events: usize,
    pub events_by_type: BTreeMap<String, usize>,
    active: usize,
    peak_active: usize,
    first_event_tick: Option<u64>,
    consumed: usize,
    births: usize,
    inert: usize,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from the state in `initial`
    pub fn starting_from(initial: &WorldSnapshot) -> Self {
        let active = initial.active_agent_count();
        Self {
            active,
            peak_active: active,
            ..Self::default()
        }
    }

    /// Record events drained after a tick, in emission order
    pub fn record_events(&mut self, events: &[SimEvent]) {
        for event in events {
            self.total_events += 1;
            self.first_event_tick.get_or_insert(event.tick);

            let event_type = event.event_type();
            *self.events_by_type.entry(event_type.to_string()).or_insert(0) += 1;

            match &event.detail {
                EventDetail::FoodConsumed { .. } => self.consumed += 1,
                EventDetail::BecameInert { .. } => {
                    self.inert += 1;
                    self.active = self.active.saturating_sub(1);
                }
                EventDetail::Reproduced { placement, .. } => {
                    self.births += 1;
                    if *placement == OffspringPlacement::Population {
                        self.active += 1;
                    }
                }
            }
            self.peak_active = self.peak_active.max(self.active);
        }
    }

    /// Agents currently active according to the events seen so far
    pub fn active(&self) -> usize {
        self.active
    }

    /// Generate final statistics from the last snapshot
    pub fn generate_stats(&self, total_ticks: u64, last: &WorldSnapshot) -> SimulationStats {
        SimulationStats {
            total_ticks,
            total_events: self.total_events,
            events_by_type: self.events_by_type.clone(),
            food_consumed: self.consumed,
            births: self.births,
            agents_gone_inert: self.inert,
            peak_active: self.peak_active,
            final_population: last.agents.len(),
            final_active: last.active_agent_count(),
            food_remaining: last.food.len(),
            first_event_tick: self.first_event_tick,
        }
    }
}
