// GA Parameters
pub const POPULATION_SIZE: usize = 1000;
pub const MAX_GENERATIONS: usize = 2000;
pub const ELITISM_COUNT: usize = 2; // Carried over unchanged every generation
pub const SELECTION_WINDOW: usize = 50; // Parents are drawn from the top 50
pub const TOP_K: usize = 5; // Routes kept per generation in the history
pub const RANDOM_SEED: u64 = 42;
pub const REPORT_EVERY: usize = 100;

// Mutation rate control
pub const INITIAL_MUTATION_RATE: f64 = 0.1;
pub const MUTATION_RATE_FLOOR: f64 = 0.05;
pub const MUTATION_DECAY_STEP: f64 = 0.001;
pub const EXPLORE_MUTATION_RATE: f64 = 0.5;
pub const EXPLOIT_MUTATION_RATE: f64 = 0.05; // Used once a feasible route is found
pub const STAGNATION_THRESHOLD: usize = 50;

// Mutation operator mix
pub const INSERT_BASE_PROBABILITY: f64 = 0.4;
pub const REMOVE_BASE_PROBABILITY: f64 = 0.2;
pub const CONTINUATION_PROBABILITY: f64 = 0.1;
pub const MAX_MUTATION_PASSES: usize = 5;

// Fitness
pub const VIOLATION_PENALTY: f64 = 50000.0;

// Drone defaults
pub const DEFAULT_DRONE_WEIGHT: f64 = 10.0;
pub const DEFAULT_MAX_CAPACITY: f64 = 25.0;
pub const DEFAULT_BATTERY_CAPACITY: f64 = 2200.0;
