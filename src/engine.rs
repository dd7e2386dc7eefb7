//! The generation loop.
use crate::config::EvolutionConfig;
use crate::controller::SearchController;
use crate::error::ConfigError;
use crate::individual::Individual;
use crate::population::Population;
use crate::problem::ProblemModel;
use crate::stats::GenerationStatistics;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Outcome of a full run
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    pub best: Individual,
    pub history: Vec<GenerationStatistics>,
    pub viable_solution_seen: bool,
    pub final_mutation_rate: f64,
}

impl EvolutionResult {
    /// Best fitness per generation
    pub fn fitness_over_time(&self) -> Vec<f64> {
        self.history.iter().map(|s| s.best_fitness).collect()
    }
}

pub struct EvolutionEngine<'a> {
    problem: &'a ProblemModel,
    config: EvolutionConfig,
    controller: SearchController,
    rng: StdRng,
}

impl<'a> EvolutionEngine<'a> {
    pub fn new(
        problem: &'a ProblemModel,
        config: EvolutionConfig,
    ) -> Result<EvolutionEngine<'a>, ConfigError> {
        config.validate()?;
        Ok(EvolutionEngine {
            problem,
            controller: SearchController::new(config.mutation),
            rng: StdRng::seed_from_u64(config.seed),
            config,
        })
    }

    pub fn run(self) -> EvolutionResult {
        self.run_with(|_| {})
    }

    /// Run every generation, handing each statistics record to `observer`
    /// as soon as it is recorded.
    pub fn run_with<F>(mut self, mut observer: F) -> EvolutionResult
    where
        F: FnMut(&GenerationStatistics),
    {
        let mut population =
            Population::random(self.config.population_size, &mut self.rng, self.problem);
        population.sort();
        let mut history = Vec::with_capacity(self.config.generations);

        for _ in 0..self.config.generations {
            let stats = population.statistics(self.controller.mutation_rate(), self.config.top_k);
            let best_fitness = stats.best_fitness;
            let any_feasible = stats.feasible_count > 0;
            debug!(
                generation = stats.generation,
                best = stats.best_fitness,
                mean = stats.mean_fitness,
                rate = stats.mutation_rate,
                "generation evaluated"
            );
            observer(&stats);
            history.push(stats);

            let adaptation = self.controller.observe(best_fitness, any_feasible);
            debug!(
                ?adaptation,
                stagnation = self.controller.stagnation_counter(),
                "controller updated"
            );

            population =
                population.evolve(&mut self.rng, self.problem, &self.controller, &self.config);
            population.sort();
        }

        let best = match population.get_min_fittest() {
            Some(best) => best.clone(),
            None => Individual::random(&mut self.rng, self.problem),
        };

        info!(
            generations = history.len(),
            best_fitness = best.fitness(),
            best_ever = self.controller.best_fitness_ever_seen(),
            feasible = best.is_feasible(),
            "evolution finished"
        );

        EvolutionResult {
            best,
            history,
            viable_solution_seen: self.controller.viable_solution_seen(),
            final_mutation_rate: self.controller.mutation_rate(),
        }
    }
}
