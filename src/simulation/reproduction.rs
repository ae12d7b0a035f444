//! Reproduction and death counters for a running environment.

use serde::{Deserialize, Serialize};

use super::events::SimulationEvent;

/// Running totals of how the population has turned over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproductionStats {
    /// Food items eaten.
    pub feed_events: u64,
    /// Offspring whose network was mutated.
    pub mutated_offspring: u64,
    /// Offspring that are exact clones of their parent.
    pub cloned_offspring: u64,
    /// Mutation sweeps run, including repeated sweeps that changed nothing.
    pub mutation_sweeps: u64,
    /// Agents culled for having the lowest score when the death timer expired.
    pub starvations: u64,
    /// Agents that left the arena.
    pub out_of_bounds: u64,
    /// Agents removed to make room for offspring.
    pub displaced: u64,
}

impl ReproductionStats {
    /// Record a death reported as an event.
    pub fn record_death(&mut self, event: SimulationEvent) {
        match event {
            SimulationEvent::Starved { .. } => self.starvations += 1,
            SimulationEvent::OutOfBounds { .. } => self.out_of_bounds += 1,
            SimulationEvent::FoodEaten { .. } => {}
        }
    }

    /// Record one offspring.
    pub fn record_offspring(&mut self, mutated: bool, sweeps: u64) {
        if mutated {
            self.mutated_offspring += 1;
            self.mutation_sweeps += sweeps;
        } else {
            self.cloned_offspring += 1;
        }
    }

    /// Share of offspring that were mutated, if any were born.
    pub fn mutation_share(&self) -> Option<f64> {
        let total = self.mutated_offspring + self.cloned_offspring;
        (total > 0).then(|| self.mutated_offspring as f64 / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_deaths_by_cause() {
        let mut stats = ReproductionStats::default();
        stats.record_death(SimulationEvent::Starved { agent_id: 1 });
        stats.record_death(SimulationEvent::OutOfBounds { agent_id: 2 });
        stats.record_death(SimulationEvent::OutOfBounds { agent_id: 3 });
        assert_eq!(stats.starvations, 1);
        assert_eq!(stats.out_of_bounds, 2);
    }

    #[test]
    fn test_mutation_share() {
        let mut stats = ReproductionStats::default();
        assert_eq!(stats.mutation_share(), None);
        stats.record_offspring(true, 3);
        stats.record_offspring(false, 0);
        assert_eq!(stats.mutation_share(), Some(0.5));
        assert_eq!(stats.mutation_sweeps, 3);
    }
}
