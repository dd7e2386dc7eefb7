use anyhow::{bail, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use dronega::engine::EvolutionEngine;
use dronega::io::{self, DroneOverrides};
use dronega::{EvolutionConfig, Route};

/// Configuration for a directory of problems
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub evolution: EvolutionConfig,
    pub drone: DroneOverrides,
}

/// Outcome of one problem file
#[derive(Debug)]
pub struct BatchSummary {
    pub file: PathBuf,
    pub best_route: Route,
    pub best_fitness: f64,
    pub feasible: bool,
}

fn solve(
    file: &Path,
    output_dir: &Path,
    evolution: EvolutionConfig,
    drone: &DroneOverrides,
) -> Result<BatchSummary> {
    let problem = io::load_problem(file, drone)?;
    let result = EvolutionEngine::new(&problem, evolution)?.run();
    io::write_results(&output_dir.join(io::results_dir_name(file)), &problem, &result)?;
    info!(file = %file.display(), best = result.best.fitness(), "problem solved");

    Ok(BatchSummary {
        file: file.to_path_buf(),
        best_fitness: result.best.fitness(),
        feasible: result.best.is_feasible(),
        best_route: result.best.into_route(),
    })
}

/// Solve every problem file of `input_dir` in parallel.
///
/// File `i` (in name order) runs with seed `seed + i`, so results do not
/// depend on thread scheduling.
pub fn run_all(config: &BatchConfig, progress: &ProgressBar) -> Result<Vec<Result<BatchSummary>>> {
    let files = io::problem_files(&config.input_dir)?;
    if files.is_empty() {
        bail!("no problem files found in {}", config.input_dir.display());
    }
    progress.set_length(files.len() as u64);

    Ok(files
        .par_iter()
        .enumerate()
        .map(|(i, file)| {
            let evolution = EvolutionConfig {
                seed: config.evolution.seed.wrapping_add(i as u64),
                ..config.evolution.clone()
            };
            let summary = solve(file, &config.output_dir, evolution, &config.drone);
            progress.inc(1);
            summary
        })
        .collect())
}

pub fn batch(config: BatchConfig) -> Result<()> {
    println!(
        "\n{} {}",
        "🚁 DroneGA batch".bold().cyan(),
        config.input_dir.display().to_string().bright_black()
    );

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} problems")?
            .progress_chars("█▓░"),
    );
    let results = run_all(&config, &progress)?;
    progress.finish();

    let mut failures = 0;
    for result in &results {
        match result {
            Ok(summary) => {
                let status = if summary.feasible {
                    "✓".green()
                } else {
                    "✗".yellow()
                };
                println!(
                    "  {} {} - best fitness {:.3}",
                    status,
                    summary.file.display(),
                    summary.best_fitness
                );
                println!("      {}", summary.best_route.to_string().bright_black());
            }
            Err(err) => {
                failures += 1;
                warn!("{:#}", err);
                println!("  {} {:#}", "✗".red(), err);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} problems failed", failures, results.len());
    }
    println!("\n{}", "✨ Done!".bold().green());
    Ok(())
}
