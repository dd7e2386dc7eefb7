//! Mutation rate control.
//!
//! Before any feasible route has been seen the rate decays toward the floor
//! and jumps to the explore rate when the search stagnates. The first
//! feasible route switches the rate to the exploit value for the rest of the
//! run.
use crate::config::MutationConfig;
use tracing::{debug, info};

/// What the controller did to the mutation rate at a generation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adaptation {
    /// First feasible route seen, switched to the exploit rate
    Exploit,
    /// Stagnated past the threshold, reset to the explore rate
    Explore,
    /// Stepped toward the floor
    Decay,
    /// Left unchanged
    Hold,
}

#[derive(Debug, Clone)]
pub struct SearchController {
    config: MutationConfig,
    mutation_rate: f64,
    viable_solution_seen: bool,
    best_fitness_ever_seen: f64,
    stagnation_counter: usize,
}

impl SearchController {
    pub fn new(config: MutationConfig) -> SearchController {
        SearchController {
            mutation_rate: config.initial_rate,
            config,
            viable_solution_seen: false,
            best_fitness_ever_seen: f64::INFINITY,
            stagnation_counter: 0,
        }
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn viable_solution_seen(&self) -> bool {
        self.viable_solution_seen
    }

    pub fn best_fitness_ever_seen(&self) -> f64 {
        self.best_fitness_ever_seen
    }

    pub fn stagnation_counter(&self) -> usize {
        self.stagnation_counter
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    /// Update the controller with the outcome of one evaluated generation.
    ///
    /// Called once per generation, after every individual has been scored
    /// and before any child of the next generation is mutated.
    pub fn observe(&mut self, best_fitness: f64, any_feasible: bool) -> Adaptation {
        let mut adaptation = Adaptation::Hold;

        if any_feasible && !self.viable_solution_seen {
            self.viable_solution_seen = true;
            self.mutation_rate = self.config.exploit_rate;
            adaptation = Adaptation::Exploit;
            info!(
                best_fitness,
                rate = self.mutation_rate,
                "feasible route found, switching to exploitation"
            );
        }

        if best_fitness < self.best_fitness_ever_seen {
            self.best_fitness_ever_seen = best_fitness;
            self.stagnation_counter = 0;
        } else {
            self.stagnation_counter += 1;
        }

        if self.viable_solution_seen {
            return adaptation;
        }

        if self.stagnation_counter > self.config.stagnation_threshold {
            self.mutation_rate = self.config.explore_rate;
            self.stagnation_counter = 0;
            debug!(rate = self.mutation_rate, "search stagnated, exploring");
            Adaptation::Explore
        } else if self.mutation_rate > self.config.floor {
            self.mutation_rate =
                (self.mutation_rate - self.config.decay_step).max(self.config.floor);
            Adaptation::Decay
        } else {
            Adaptation::Hold
        }
    }
}
