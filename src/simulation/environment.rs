//! The environment: agents, food, and the evolutionary controller.
//!
//! A tick runs three phases, each over a snapshot taken when the phase starts:
//! - food collisions, where the first agent touching a food item eats it and
//!   reproduces,
//! - agents sense, decide and act (in parallel, using rayon), with agents that
//!   leave the arena replaced afterwards in collection order,
//! - the death timer, which culls the weakest agent when nobody has died for
//!   `death_interval` time units.

use std::path::Path;

use ndarray::array;
use ndarray_rand::rand::rngs::StdRng;
use ndarray_rand::rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::agent::{self, Agent};
use super::error::{ConfigurationError, SimulationError, StateError};
use super::event_log::{EventKind, EventLog};
use super::events::{self, EventQueue, SimulationEvent};
use super::food::Food;
use super::locatable::Locatable;
use super::params::Params;
use super::reproduction::ReproductionStats;

/// Bounds `adjust_mutation_rate` keeps the rate within.
const MUTATION_RATE_FLOOR: f32 = 0.001;
const MUTATION_RATE_CEILING: f32 = 0.999;

/// All simulation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    /// Configuration, including the driver's frame rate, arena and multiplier.
    pub params: Params,
    /// Live agents, in insertion order.
    pub agents: Vec<Agent>,
    /// Live food items, in insertion order. Never empty.
    pub food: Vec<Food>,
    /// Time units since any agent was eliminated.
    pub time_since_last_death: f32,
    /// Total simulation time elapsed, in reference seconds.
    pub time: f32,
    /// Reproduction and death counters.
    pub stats: ReproductionStats,
    /// Recent lifecycle events for display.
    pub event_log: EventLog,
    next_id: usize,
    #[serde(skip, default = "entropy_rng")]
    rng: StdRng,
}

fn entropy_rng() -> StdRng {
    StdRng::seed_from_u64(rand::random())
}

impl Environment {
    /// Creates an environment with `params.population_size` random agents and
    /// one food item.
    pub fn new(params: Params) -> Result<Self, ConfigurationError> {
        params.validate()?;
        let rng = params.seed.map_or_else(entropy_rng, StdRng::seed_from_u64);

        let mut environment = Self {
            params,
            agents: Vec::new(),
            food: Vec::new(),
            time_since_last_death: 0.0,
            time: 0.0,
            stats: ReproductionStats::default(),
            event_log: EventLog::default(),
            next_id: 0,
            rng,
        };
        environment.populate();

        log::info!(
            "environment created: {} agents, mutation rate {}",
            environment.agents.len(),
            environment.params.mutation_rate
        );
        Ok(environment)
    }

    /// Creates an environment with default parameters apart from population
    /// size and mutation rate.
    pub fn with_size(size: usize, mutation_rate: f32) -> Result<Self, ConfigurationError> {
        Self::new(Params::with_population(size, mutation_rate))
    }

    fn populate(&mut self) {
        self.agents = Vec::with_capacity(self.params.population_size);
        for _ in 0..self.params.population_size {
            let id = self.next_id();
            let agent = Agent::new_random(id, &self.params, &mut self.rng);
            self.agents.push(agent);
        }
        let id = self.next_id();
        self.food = vec![Food::new_random(id, &self.params, &mut self.rng)];
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Restarts the random source from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Advances the simulation by `dt` frames at the configured time multiplier.
    pub fn tick(&mut self, dt: f32) {
        let elapsed = self.params.scaled_time(dt);
        self.time_since_last_death += elapsed;
        self.time += elapsed;

        // food collisions; each item only sees agents still alive after earlier feeds
        let food_ids: Vec<usize> = self.food.iter().map(|item| item.id).collect();
        for food_id in food_ids {
            let eater = self
                .food
                .iter()
                .find(|item| item.id == food_id)
                .and_then(|item| item.first_collision(&self.agents, &self.params))
                .map(|index| self.agents[index].id);
            if let Some(agent_id) = eater {
                let mut queue = EventQueue::new();
                queue.push(SimulationEvent::FoodEaten { agent_id, food_id });
                events::apply_events(self, queue);
            }
        }

        // agents only touch their own state here; replacements are appended afterwards
        let food = &self.food;
        let params = &self.params;
        let departures: Vec<SimulationEvent> = self
            .agents
            .par_iter_mut()
            .filter_map(|agent| agent.tick(food, dt, params))
            .collect();
        let mut queue = EventQueue::new();
        queue.extend(departures);
        events::apply_events(self, queue);

        if self.time_since_last_death >= self.params.death_interval {
            if let Some(index) = self.weakest_index() {
                let mut queue = EventQueue::new();
                queue.push(SimulationEvent::Starved {
                    agent_id: self.agents[index].id,
                });
                events::apply_events(self, queue);
            }
        }
    }

    /// Sets the time multiplier and advances by `delta_time` frames.
    ///
    /// A negative `delta_time` is treated as zero and a multiplier below 1 as 1.
    pub fn advance(&mut self, delta_time: f32, time_multiplier: f32) {
        let dt = if delta_time >= 0.0 {
            delta_time
        } else {
            log::warn!("negative delta time {} clamped to 0", delta_time);
            0.0
        };
        self.params.time_multiplier = if time_multiplier >= 1.0 {
            time_multiplier
        } else {
            log::warn!("time multiplier {} clamped to 1", time_multiplier);
            1.0
        };
        self.tick(dt);
    }

    fn agent_index(&self, agent_id: usize) -> Result<usize, StateError> {
        self.agents
            .iter()
            .position(|agent| agent.id == agent_id)
            .ok_or(StateError::UnknownAgent(agent_id))
    }

    fn food_index(&self, food_id: usize) -> Result<usize, StateError> {
        self.food
            .iter()
            .position(|item| item.id == food_id)
            .ok_or(StateError::UnknownFood(food_id))
    }

    /// Index of the agent with the lowest score; ties go to the earliest.
    fn weakest_index(&self) -> Option<usize> {
        let mut weakest: Option<usize> = None;
        for (i, agent) in self.agents.iter().enumerate() {
            match weakest {
                Some(w) if agent.score >= self.agents[w].score => {}
                _ => weakest = Some(i),
            }
        }
        weakest
    }

    /// The agent with the lowest score; ties go to the earliest in the collection.
    pub fn weakest_agent(&self) -> Option<&Agent> {
        self.weakest_index().map(|i| &self.agents[i])
    }

    /// Looks up a live agent.
    pub fn agent(&self, agent_id: usize) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == agent_id)
    }

    /// Looks up a live agent for modification.
    pub fn agent_mut(&mut self, agent_id: usize) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|agent| agent.id == agent_id)
    }

    fn remove_agent_at(&mut self, index: usize) -> Agent {
        self.time_since_last_death = 0.0;
        self.agents.remove(index)
    }

    /// Removes an agent and restarts the death timer. With `replace`, a fresh
    /// random agent is appended to keep the population at its target size.
    pub fn eliminate(&mut self, agent_id: usize, replace: bool) -> Result<(), StateError> {
        let index = self.agent_index(agent_id)?;
        self.remove_agent_at(index);
        if replace {
            let id = self.next_id();
            let agent = Agent::new_random(id, &self.params, &mut self.rng);
            self.agents.push(agent);
        }
        log::debug!("agent {} eliminated (replaced: {})", agent_id, replace);
        Ok(())
    }

    /// Number of agents displaced, and offspring born, per feed event.
    pub fn replacement_count(&self) -> usize {
        (self.params.population_size / 7).saturating_sub(1).max(2)
    }

    /// Reproduction step: `agent_id` ate `food_id`.
    ///
    /// The eater's score resets to 1, the food item is replaced at a new
    /// spot, the weakest agents make room and the eater's offspring take their
    /// places. Nothing changes if either id is unknown.
    pub fn feed(&mut self, agent_id: usize, food_id: usize) -> Result<(), StateError> {
        let agent_index = self.agent_index(agent_id)?;
        let food_index = self.food_index(food_id)?;

        self.agents[agent_index].score = 1.0;
        // the parent itself may be displaced below, so breed from a copy
        let parent = self.agents[agent_index].clone();

        self.food.remove(food_index);
        let id = self.next_id();
        let replacement = Food::new_random(id, &self.params, &mut self.rng);
        self.food.push(replacement);

        let count = self.replacement_count();
        for _ in 0..count {
            if let Some(index) = self.weakest_index() {
                self.remove_agent_at(index);
                self.stats.displaced += 1;
            }
        }

        let mutated_before = self.stats.mutated_offspring;
        for _ in 0..count {
            let child = self.spawn_offspring(&parent);
            self.agents.push(child);
        }
        let mutants = self.stats.mutated_offspring - mutated_before;

        self.stats.feed_events += 1;
        self.event_log.log(
            self.time,
            format!("agent {} ate, {} offspring ({} mutated)", agent_id, count, mutants),
            EventKind::Feed,
        );
        log::debug!(
            "agent {} ate food {}: {} offspring, {} mutated",
            agent_id,
            food_id,
            count,
            mutants
        );
        Ok(())
    }

    /// Breeds one child of `parent` near the parent's position.
    ///
    /// With probability `mutation_rate` the child gets one color channel
    /// re-rolled and its weights swept until at least one changes (see
    /// [`NeuralNetwork::mutate_until_changed`]); otherwise it is an exact clone
    /// of the parent's network and color. The child is not added to the
    /// environment.
    ///
    /// `adjust_mutation_rate` never goes below 0.001, which keeps the number
    /// of sweeps small.
    ///
    /// [`NeuralNetwork::mutate_until_changed`]: super::brain::NeuralNetwork::mutate_until_changed
    pub fn spawn_offspring(&mut self, parent: &Agent) -> Agent {
        let id = self.next_id();
        let rate = self.params.mutation_rate;
        let mutate = self.rng.gen_range(0.0..1.0_f32) <= rate;

        let mut color = parent.color;
        if mutate {
            let channel = self.rng.gen_range(0..color.len());
            color[channel] = self.rng.gen_range(agent::MIN_COLOR..=u8::MAX);
        }

        let mut child = Agent::spawn(id, parent.brain.clone(), color, &self.params, &mut self.rng);
        let reach = self.params.agent_hitbox_radius * 4.0;
        let dx = self.jitter(reach);
        let dy = self.jitter(reach);
        *child.pos_mut() = array![parent.pos[0] + dx, parent.pos[1] + dy];

        if mutate {
            let sweeps = child.brain.mutate_until_changed(rate, &mut self.rng);
            if sweeps > 1 {
                log::debug!("offspring {} needed {} mutation sweeps", id, sweeps);
            }
            self.stats.record_offspring(true, sweeps);
        } else {
            self.stats.record_offspring(false, 0);
        }
        child
    }

    /// Uniform offset in `(-reach, reach)` with an independently chosen sign.
    fn jitter(&mut self, reach: f32) -> f32 {
        let magnitude = reach * self.rng.gen_range(0.0..1.0_f32);
        if self.rng.gen_bool(0.5) { magnitude } else { -magnitude }
    }

    /// Counts a death in the stats and the event log.
    pub(crate) fn record_death(&mut self, event: SimulationEvent) {
        self.stats.record_death(event);
        let (description, kind) = match event {
            SimulationEvent::Starved { agent_id } => {
                (format!("agent {} starved", agent_id), EventKind::Starvation)
            }
            SimulationEvent::OutOfBounds { agent_id } => {
                (format!("agent {} left the arena", agent_id), EventKind::OutOfBounds)
            }
            SimulationEvent::FoodEaten { .. } => return,
        };
        self.event_log.log(self.time, description, kind);
    }

    /// Replaces the population with fresh random agents and a single food item.
    pub fn reset(&mut self, size: usize, mutation_rate: f32) -> Result<(), ConfigurationError> {
        let params = Params {
            population_size: size,
            mutation_rate,
            ..self.params.clone()
        };
        params.validate()?;
        self.params = params;
        self.time_since_last_death = 0.0;
        self.time = 0.0;
        self.stats = ReproductionStats::default();
        self.event_log.clear();
        self.populate();
        log::info!("environment reset: {} agents, mutation rate {}", size, mutation_rate);
        Ok(())
    }

    /// Changes the mutation rate by `delta`, kept within `[0.001, 0.999]`.
    /// Returns the new rate.
    pub fn adjust_mutation_rate(&mut self, delta: f32) -> f32 {
        let rate = self.params.mutation_rate + delta;
        self.params.mutation_rate = if rate <= 0.0 {
            log::warn!("mutation rate {} clamped to {}", rate, MUTATION_RATE_FLOOR);
            MUTATION_RATE_FLOOR
        } else if rate >= 1.0 {
            log::warn!("mutation rate {} clamped to {}", rate, MUTATION_RATE_CEILING);
            MUTATION_RATE_CEILING
        } else {
            rate
        };
        self.params.mutation_rate
    }

    /// Changes the time multiplier by `delta`, never below 1. Returns the new value.
    pub fn adjust_time_multiplier(&mut self, delta: f32) -> f32 {
        let multiplier = self.params.time_multiplier + delta;
        self.params.time_multiplier = if multiplier >= 1.0 {
            multiplier
        } else {
            log::warn!("time multiplier {} clamped to 1", multiplier);
            1.0
        };
        self.params.time_multiplier
    }

    /// Moves the most recently spawned food item to `(x, y)`.
    pub fn place_food(&mut self, x: f32, y: f32) {
        if let Some(item) = self.food.last_mut() {
            *item.pos_mut() = array![x, y];
        }
    }

    /// Serializes the full state as pretty JSON. The random source is not included.
    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores a state produced by [`Environment::to_json`].
    ///
    /// The random source restarts from `params.seed`, or from entropy when no
    /// seed is configured; call [`Environment::reseed`] to choose another.
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let mut environment: Environment = serde_json::from_str(json)?;
        environment.params.validate()?;
        environment.validate_state()?;
        if let Some(seed) = environment.params.seed {
            environment.reseed(seed);
        }
        Ok(environment)
    }

    /// Checks a restored state against what construction guarantees: the
    /// configured population, at least one food item, well-formed agents and
    /// an id counter ahead of every live id.
    fn validate_state(&mut self) -> Result<(), ConfigurationError> {
        if self.food.is_empty() {
            return Err(ConfigurationError::NoFood);
        }
        if self.agents.len() != self.params.population_size {
            return Err(ConfigurationError::PopulationMismatch {
                expected: self.params.population_size,
                actual: self.agents.len(),
            });
        }
        for agent in &self.agents {
            agent.validate()?;
        }
        for item in &self.food {
            if item.pos.len() != 2 {
                return Err(ConfigurationError::PositionDimension(item.pos.len()));
            }
        }

        let highest = self
            .agents
            .iter()
            .map(|agent| agent.id)
            .chain(self.food.iter().map(|item| item.id))
            .max()
            .unwrap_or(0);
        if self.next_id <= highest {
            log::debug!("id counter {} behind live id {}, advancing", self.next_id, highest);
            self.next_id = highest + 1;
        }
        Ok(())
    }

    /// Saves the environment state to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SimulationError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("environment saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Loads an environment state from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulationError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let environment = Self::from_json(&json)?;
        log::info!(
            "environment loaded from {}: {} agents",
            path.as_ref().display(),
            environment.agents.len()
        );
        Ok(environment)
    }
}

/// Tick entry point for drivers: advances `environment` by `delta_time` frames.
pub fn advance(environment: &mut Environment, delta_time: f32, time_multiplier: f32) {
    environment.advance(delta_time, time_multiplier);
}
