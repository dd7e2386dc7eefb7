//! Problem files and result files.
//!
//! Problems are JSON documents of the form
//! `{"pontos": [{"x": 0, "y": 0, "peso": 0}, ...]}` with an optional `drone`
//! object overriding the default limits. English keys (`points`, `weight`)
//! are accepted too.
use crate::engine::EvolutionResult;
use crate::error::ProblemError;
use crate::problem::{DroneSpec, Point, ProblemModel};
use crate::route::Route;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const GENERATION_DATA_FILE: &str = "generation_data.json";
pub const BEST_PATH_FILE: &str = "best_path_graph.json";
pub const FITNESS_OVER_TIME_FILE: &str = "fitness_over_time.json";
pub const BEST_PER_GENERATION_FILE: &str = "best_per_generation.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    #[serde(alias = "pontos")]
    pub points: Vec<Point>,
    #[serde(default)]
    pub drone: Option<DroneSpec>,
}

/// Drone limits given on the command line, applied over the problem file
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DroneOverrides {
    pub dry_weight: Option<f64>,
    pub max_capacity: Option<f64>,
    pub battery_capacity: Option<f64>,
}

impl DroneOverrides {
    pub fn apply(&self, drone: DroneSpec) -> DroneSpec {
        DroneSpec {
            dry_weight: self.dry_weight.unwrap_or(drone.dry_weight),
            max_capacity: self.max_capacity.unwrap_or(drone.max_capacity),
            battery_capacity: self.battery_capacity.unwrap_or(drone.battery_capacity),
        }
    }
}

impl ProblemDefinition {
    /// Build the model. Limits come from the defaults, then the file's
    /// `drone` object, then `overrides`.
    pub fn into_model(self, overrides: &DroneOverrides) -> Result<ProblemModel, ProblemError> {
        let drone = overrides.apply(self.drone.unwrap_or_default());
        ProblemModel::new(self.points, drone)
    }
}

pub fn read_problem(path: &Path) -> Result<ProblemDefinition> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read problem file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse problem file {}", path.display()))
}

pub fn load_problem(path: &Path, overrides: &DroneOverrides) -> Result<ProblemModel> {
    read_problem(path)?
        .into_model(overrides)
        .with_context(|| format!("invalid problem in {}", path.display()))
}

/// Every `*.json` file directly inside `dir`, sorted by name
pub fn problem_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Results subdirectory for a problem file: the last `_` separated part of
/// the file stem, so `drone_problem_3.json` maps to `3`.
pub fn results_dir_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.rsplit('_').next() {
        Some(tail) if !tail.is_empty() => tail.to_string(),
        _ => stem,
    }
}

/// One line of `generation_data.json`
#[derive(Debug, Serialize)]
struct GenerationRecord {
    generation: usize,
    best_fitness: f64,
    worst_fitness: f64,
    mean_fitness: f64,
    mutation_rate: f64,
    feasible_count: usize,
    timestamp: DateTime<Utc>,
}

/// Point as the plotting tools expect it
#[derive(Debug, Serialize)]
struct Coordinate {
    x: f64,
    y: f64,
    peso: f64,
}

#[derive(Debug, Serialize)]
struct BestPathGraph<'a> {
    best_path: &'a Route,
    best_fitness: f64,
    coordinates: Vec<Coordinate>,
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Write the four result files of a run into `dir`, creating it if needed
pub fn write_results(dir: &Path, problem: &ProblemModel, result: &EvolutionResult) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let generation_data: Vec<GenerationRecord> = result
        .history
        .iter()
        .map(|s| GenerationRecord {
            generation: s.generation,
            best_fitness: s.best_fitness,
            worst_fitness: s.worst_fitness,
            mean_fitness: s.mean_fitness,
            mutation_rate: s.mutation_rate,
            feasible_count: s.feasible_count,
            timestamp: s.timestamp,
        })
        .collect();
    write_json(&dir.join(GENERATION_DATA_FILE), &generation_data)?;

    let graph = BestPathGraph {
        best_path: result.best.route(),
        best_fitness: result.best.fitness(),
        coordinates: problem
            .points()
            .iter()
            .map(|p| Coordinate {
                x: p.x,
                y: p.y,
                peso: p.weight,
            })
            .collect(),
    };
    write_json(&dir.join(BEST_PATH_FILE), &graph)?;

    write_json(&dir.join(FITNESS_OVER_TIME_FILE), &result.fitness_over_time())?;

    let best_per_generation: Vec<&[Route]> = result
        .history
        .iter()
        .map(|s| s.top_routes.as_slice())
        .collect();
    write_json(&dir.join(BEST_PER_GENERATION_FILE), &best_per_generation)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvolutionConfig;
    use crate::engine::EvolutionEngine;
    use std::io::Write;
    use tempfile::tempdir;

    const PONTOS: &str = r#"{
        "pontos": [
            {"x": 0, "y": 0, "peso": 0},
            {"x": 1, "y": 0, "peso": 2},
            {"x": 0, "y": 1, "peso": 3}
        ]
    }"#;

    #[test]
    fn test_parse_pontos_format() {
        let def: ProblemDefinition = serde_json::from_str(PONTOS).unwrap();
        assert_eq!(def.points.len(), 3);
        assert_eq!(def.points[2].weight, 3.0);
        assert!(def.drone.is_none());

        let model = def.into_model(&DroneOverrides::default()).unwrap();
        assert_eq!(model.drone(), &DroneSpec::default());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let json = r#"{
            "pontos": [{"x": 0, "y": 0, "peso": 0}, {"x": 2, "y": 2, "peso": 1}],
            "drone": {"dry_weight": 4, "max_capacity": 40}
        }"#;
        let def: ProblemDefinition = serde_json::from_str(json).unwrap();
        let overrides = DroneOverrides {
            max_capacity: Some(60.0),
            ..Default::default()
        };
        let model = def.into_model(&overrides).unwrap();
        assert_eq!(model.drone().dry_weight, 4.0);
        assert_eq!(model.drone().max_capacity, 60.0);
        assert_eq!(model.drone().battery_capacity, DroneSpec::default().battery_capacity);
    }

    #[test]
    fn test_parse_english_keys_and_drone() {
        let json = r#"{
            "points": [{"x": 0, "y": 0, "weight": 0}, {"x": 2, "y": 2, "weight": 1}],
            "drone": {"max_capacity": 40}
        }"#;
        let def: ProblemDefinition = serde_json::from_str(json).unwrap();
        let drone = def.drone.unwrap();
        assert_eq!(drone.max_capacity, 40.0);
        assert_eq!(drone.dry_weight, DroneSpec::default().dry_weight);
        assert_eq!(drone.battery_capacity, DroneSpec::default().battery_capacity);
    }

    #[test]
    fn test_load_problem_reports_invalid_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base_only.json");
        fs::write(&path, r#"{"pontos": [{"x": 0, "y": 0, "peso": 0}]}"#).unwrap();
        let err = load_problem(&path, &DroneOverrides::default()).unwrap_err();
        assert!(err.chain().any(|e| e.to_string().contains("delivery")));
    }

    #[test]
    fn test_load_problem_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let err = load_problem(&path, &DroneOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_problem_files_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["drone_problem_2.json", "notes.txt", "drone_problem_1.json"] {
            let mut f = fs::File::create(dir.path().join(name)).unwrap();
            f.write_all(PONTOS.as_bytes()).unwrap();
        }
        let files = problem_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["drone_problem_1.json", "drone_problem_2.json"]);
    }

    #[test]
    fn test_results_dir_name() {
        assert_eq!(results_dir_name(Path::new("tests/drone_problem_3.json")), "3");
        assert_eq!(results_dir_name(Path::new("city.json")), "city");
        assert_eq!(results_dir_name(Path::new("trailing_.json")), "trailing_");
    }

    #[test]
    fn test_write_results() {
        let model = serde_json::from_str::<ProblemDefinition>(PONTOS)
            .unwrap()
            .into_model(&DroneOverrides::default())
            .unwrap();
        let config = EvolutionConfig {
            population_size: 10,
            generations: 5,
            top_k: 3,
            ..Default::default()
        };
        let result = EvolutionEngine::new(&model, config).unwrap().run();

        let dir = tempdir().unwrap();
        let out = dir.path().join("results").join("3");
        write_results(&out, &model, &result).unwrap();

        let read = |name: &str| -> serde_json::Value {
            serde_json::from_str(&fs::read_to_string(out.join(name)).unwrap()).unwrap()
        };

        let generations = read(GENERATION_DATA_FILE);
        assert_eq!(generations.as_array().unwrap().len(), 5);
        assert!(generations[0].get("top_routes").is_none());

        let graph = read(BEST_PATH_FILE);
        assert!(graph["best_path"].is_array());
        assert_eq!(graph["coordinates"][2]["peso"], 3.0);
        assert_eq!(graph["best_fitness"], result.best.fitness());

        assert_eq!(read(FITNESS_OVER_TIME_FILE).as_array().unwrap().len(), 5);

        let best = read(BEST_PER_GENERATION_FILE);
        assert_eq!(best.as_array().unwrap().len(), 5);
        assert!(best[0].as_array().unwrap().len() <= 3);
    }
}
