use crate::individual::Individual;
use crate::route::Route;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of one evaluated generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStatistics {
    pub generation: usize,
    pub best_fitness: f64,
    pub worst_fitness: f64,
    pub mean_fitness: f64,
    /// Rate in force while this generation was bred
    pub mutation_rate: f64,
    pub feasible_count: usize,
    /// Best routes first
    pub top_routes: Vec<Route>,
    pub timestamp: DateTime<Utc>,
}

impl GenerationStatistics {
    /// Summarize a population sorted ascending by fitness
    pub fn from_sorted(
        generation: usize,
        individuals: &[Individual],
        mutation_rate: f64,
        top_k: usize,
    ) -> GenerationStatistics {
        let best_fitness = individuals.first().map_or(f64::NAN, |i| i.fitness());
        let worst_fitness = individuals.last().map_or(f64::NAN, |i| i.fitness());
        let mean_fitness = if individuals.is_empty() {
            f64::NAN
        } else {
            individuals.iter().map(|i| i.fitness()).sum::<f64>() / individuals.len() as f64
        };

        GenerationStatistics {
            generation,
            best_fitness,
            worst_fitness,
            mean_fitness,
            mutation_rate,
            feasible_count: individuals.iter().filter(|i| i.is_feasible()).count(),
            top_routes: individuals
                .iter()
                .take(top_k)
                .map(|i| i.route().clone())
                .collect(),
            timestamp: Utc::now(),
        }
    }
}
