pub mod config;
pub mod constants;
pub mod controller;
pub mod engine;
pub mod error;
pub mod ga;
pub mod individual;
pub mod io;
pub mod population;
pub mod problem;
pub mod route;
pub mod stats;

pub use config::{EvolutionConfig, MutationConfig};
pub use engine::{EvolutionEngine, EvolutionResult};
pub use problem::{DroneSpec, Point, ProblemModel};
pub use route::Route;
