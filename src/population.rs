use crate::config::EvolutionConfig;
use crate::controller::SearchController;
use crate::ga;
use crate::individual::Individual;
use crate::problem::ProblemModel;
use crate::route::Route;
use crate::stats::GenerationStatistics;
use core::cmp::Ordering;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::Rng;
use rayon::iter::{IntoParallelIterator, ParallelExtend, ParallelIterator};

#[derive(Debug, Clone)]
pub struct Population {
    pub individuals: Vec<Individual>,
    pub generation: usize,
}

impl Population {
    pub fn new(individuals: Vec<Individual>) -> Population {
        Population {
            individuals,
            generation: 0,
        }
    }

    /// Seed `size` random single-trip routes, scored in parallel
    pub fn random(size: usize, rng: &mut StdRng, problem: &ProblemModel) -> Population {
        let routes: Vec<Route> = (0..size)
            .map(|_| Route::random(problem.len(), rng))
            .collect();
        let individuals = routes
            .into_par_iter()
            .map(|route| Individual::new(route, problem))
            .collect();
        Population::new(individuals)
    }

    /// Sort ascending by fitness, best first
    pub fn sort(&mut self) {
        self.individuals.sort_by(|a, b| {
            a.fitness()
                .partial_cmp(&b.fitness())
                .unwrap_or(Ordering::Equal)
        });
    }

    /// Breed the next generation from a sorted population.
    ///
    /// The top `elitism_count` individuals are copied unchanged. Every other
    /// slot gets a child of two parents drawn uniformly from the top
    /// `selection_window`, mutated with the controller's current rate.
    /// Children are bred on the single `rng` in order and then scored in
    /// parallel, so a seed still fixes the outcome.
    pub fn evolve(
        &self,
        rng: &mut StdRng,
        problem: &ProblemModel,
        controller: &SearchController,
        config: &EvolutionConfig,
    ) -> Population {
        let size = config.population_size;
        let elites = config.elitism_count.min(size).min(self.size());
        let mut next: Vec<Individual> = Vec::with_capacity(size);
        next.extend(self.individuals.iter().take(elites).cloned());

        let window = config.effective_window().min(self.size());
        let mut children: Vec<Route> = Vec::with_capacity(size - elites);
        while elites + children.len() < size {
            if window == 0 {
                children.push(Route::random(problem.len(), rng));
                continue;
            }
            let (parent1, parent2) = self.select_parents(rng, window);
            let mut child = ga::crossover(rng, config.crossover, parent1.route(), parent2.route());
            if rng.gen_bool(controller.mutation_rate()) {
                ga::mutate(rng, &mut child, controller.config());
            }
            children.push(child);
        }

        next.par_extend(
            children
                .into_par_iter()
                .map(|route| Individual::new(route, problem)),
        );

        Population {
            individuals: next,
            generation: self.generation + 1,
        }
    }

    /// Two parents from the top `window`, distinct whenever the window allows
    fn select_parents(&self, rng: &mut StdRng, window: usize) -> (&Individual, &Individual) {
        if window < 2 {
            return (&self.individuals[0], &self.individuals[0]);
        }
        let picks = index::sample(rng, window, 2);
        (
            &self.individuals[picks.index(0)],
            &self.individuals[picks.index(1)],
        )
    }

    /// Get the Individual with the lowest fitness
    pub fn get_min_fittest(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .min_by(|a, b| a.fitness().partial_cmp(&b.fitness()).unwrap_or(Ordering::Equal))
    }

    /// Statistics of a sorted population
    pub fn statistics(&self, mutation_rate: f64, top_k: usize) -> GenerationStatistics {
        GenerationStatistics::from_sorted(self.generation, &self.individuals, mutation_rate, top_k)
    }

    pub fn size(&self) -> usize {
        self.individuals.len()
    }
}
