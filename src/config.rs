//! Run configuration for the evolution engine
use crate::constants;
use crate::error::ConfigError;
use crate::ga::Crossover;
use serde::{Deserialize, Serialize};

/// Mutation rate bounds and the operator mix of a single mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationConfig {
    pub initial_rate: f64,
    pub floor: f64,
    pub decay_step: f64,
    pub explore_rate: f64,
    pub exploit_rate: f64,
    pub stagnation_threshold: usize,
    pub insert_probability: f64,
    pub remove_probability: f64,
    pub continuation_probability: f64,
    pub max_passes: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            initial_rate: constants::INITIAL_MUTATION_RATE,
            floor: constants::MUTATION_RATE_FLOOR,
            decay_step: constants::MUTATION_DECAY_STEP,
            explore_rate: constants::EXPLORE_MUTATION_RATE,
            exploit_rate: constants::EXPLOIT_MUTATION_RATE,
            stagnation_threshold: constants::STAGNATION_THRESHOLD,
            insert_probability: constants::INSERT_BASE_PROBABILITY,
            remove_probability: constants::REMOVE_BASE_PROBABILITY,
            continuation_probability: constants::CONTINUATION_PROBABILITY,
            max_passes: constants::MAX_MUTATION_PASSES,
        }
    }
}

impl MutationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("insert_probability", self.insert_probability),
            ("remove_probability", self.remove_probability),
            ("continuation_probability", self.continuation_probability),
            ("floor", self.floor),
            ("explore_rate", self.explore_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        if self.insert_probability + self.remove_probability > 1.0 {
            return Err(ConfigError::InvalidProbability {
                name: "insert_probability + remove_probability",
                value: self.insert_probability + self.remove_probability,
            });
        }
        for (name, value) in [
            ("initial_rate", self.initial_rate),
            ("exploit_rate", self.exploit_rate),
        ] {
            if !(self.floor..=self.explore_rate).contains(&value) {
                return Err(ConfigError::RateOutOfBounds {
                    name,
                    value,
                    floor: self.floor,
                    explore: self.explore_rate,
                });
            }
        }
        if self.decay_step.is_nan() || self.decay_step < 0.0 {
            return Err(ConfigError::NegativeDecay(self.decay_step));
        }
        if self.max_passes == 0 {
            return Err(ConfigError::NoMutationPasses);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub elitism_count: usize,
    pub selection_window: usize,
    pub crossover: Crossover,
    pub top_k: usize,
    pub seed: u64,
    pub mutation: MutationConfig,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: constants::POPULATION_SIZE,
            generations: constants::MAX_GENERATIONS,
            elitism_count: constants::ELITISM_COUNT,
            selection_window: constants::SELECTION_WINDOW,
            crossover: Crossover::Order,
            top_k: constants::TOP_K,
            seed: constants::RANDOM_SEED,
            mutation: MutationConfig::default(),
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.elitism_count == 0 {
            return Err(ConfigError::NoElitism);
        }
        if self.elitism_count > self.population_size {
            return Err(ConfigError::ElitismTooLarge {
                elitism: self.elitism_count,
                population: self.population_size,
            });
        }
        if self.selection_window == 0 {
            return Err(ConfigError::EmptySelectionWindow);
        }
        self.mutation.validate()
    }

    /// Parents are drawn from this many of the best individuals
    pub fn effective_window(&self) -> usize {
        self.selection_window.min(self.population_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(EvolutionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_mutation_rates_are_ordered() {
        let m = MutationConfig::default();
        assert!(m.floor <= m.exploit_rate && m.exploit_rate <= m.explore_rate);
        assert!(m.floor <= m.initial_rate && m.initial_rate <= m.explore_rate);
    }

    #[test]
    fn test_rejects_empty_population() {
        let config = EvolutionConfig {
            population_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));
    }

    #[test]
    fn test_rejects_zero_elitism() {
        let config = EvolutionConfig {
            population_size: 20,
            elitism_count: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoElitism));

        let config = EvolutionConfig {
            elitism_count: 1,
            ..config
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_oversized_elite() {
        let config = EvolutionConfig {
            population_size: 4,
            elitism_count: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ElitismTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_exploit_rate_below_floor() {
        let mut config = EvolutionConfig::default();
        config.mutation.exploit_rate = 0.01;
        config.mutation.floor = 0.05;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RateOutOfBounds {
                name: "exploit_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_operator_mix_over_one() {
        let mut config = EvolutionConfig::default();
        config.mutation.insert_probability = 0.7;
        config.mutation.remove_probability = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_passes() {
        let mut config = EvolutionConfig::default();
        config.mutation.max_passes = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoMutationPasses));
    }

    #[test]
    fn test_effective_window_clamped() {
        let config = EvolutionConfig {
            population_size: 10,
            ..Default::default()
        };
        assert_eq!(config.effective_window(), 10);
    }
}
