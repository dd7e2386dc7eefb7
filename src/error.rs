//! Error types for problem construction and engine configuration

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Problem has no points")]
    NoPoints,

    #[error("Problem has a base but no delivery points")]
    NoDeliveries,

    #[error("Point {index} has an invalid weight {weight}")]
    NegativeWeight { index: usize, weight: f64 },

    #[error("Point {index} has non-finite coordinates")]
    NonFiniteCoordinate { index: usize },

    #[error("Drone dry weight must be non-negative, got {0}")]
    NegativeDryWeight(f64),

    #[error("Drone capacity must be positive, got {0}")]
    NonPositiveCapacity(f64),

    #[error("Drone battery must be positive, got {0}")]
    NonPositiveBattery(f64),

    #[error("Route references unknown point {0}")]
    UnknownPoint(usize),

    #[error("Route never visits point {0}")]
    MissingPoint(usize),

    #[error("Route visits point {0} more than once")]
    DuplicatePoint(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Population size must be at least 1")]
    EmptyPopulation,

    #[error("At least one individual must survive each generation unchanged")]
    NoElitism,

    #[error("Elitism count {elitism} exceeds population size {population}")]
    ElitismTooLarge { elitism: usize, population: usize },

    #[error("Selection window must be at least 1")]
    EmptySelectionWindow,

    #[error("Mutation rate {name} = {value} is outside [{floor}, {explore}]")]
    RateOutOfBounds {
        name: &'static str,
        value: f64,
        floor: f64,
        explore: f64,
    },

    #[error("Probability {name} = {value} is outside [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Mutation decay step must be non-negative, got {0}")]
    NegativeDecay(f64),

    #[error("Mutation must apply at least one pass")]
    NoMutationPasses,
}
