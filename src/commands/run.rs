use anyhow::Result;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use dronega::engine::{EvolutionEngine, EvolutionResult};
use dronega::io::{self, DroneOverrides};
use dronega::problem::ProblemModel;
use dronega::EvolutionConfig;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Configuration for a single-problem run
pub struct RunConfig {
    pub problem_file: PathBuf,
    pub output_dir: PathBuf,
    pub evolution: EvolutionConfig,
    pub drone: DroneOverrides,
    pub report_every: usize,
}

fn print_header(config: &RunConfig, problem: &ProblemModel) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!(
        "\n{} {}",
        "🚁 DroneGA".bold().cyan(),
        format!("v{}", VERSION).bright_black()
    );
    println!(
        "{}",
        "   Multi-trip drone delivery routing with a genetic algorithm".bright_black()
    );
    println!("{}", RULE.bright_black());

    let drone = problem.drone();
    let payload: f64 = problem.points().iter().map(|p| p.weight).sum();
    println!("{}", "📁 Problem".bold());
    println!("  {}    {}", "File:".green(), config.problem_file.display());
    println!(
        "  {}  {} deliveries, total payload {:.1}",
        "Points:".green(),
        (problem.len() - 1).to_string().cyan(),
        payload
    );
    println!(
        "  {}   dry={:.1} │ capacity={:.1} │ battery={:.1}",
        "Drone:".green(),
        drone.dry_weight,
        drone.max_capacity,
        drone.battery_capacity
    );

    let evo = &config.evolution;
    println!("\n{}", "⚙️  Evolution".bold());
    println!(
        "  {}={} │ {}={} │ {}={} │ {}={}",
        "Population".green(),
        evo.population_size,
        "Generations".green(),
        evo.generations,
        "Elitism".green(),
        evo.elitism_count,
        "Window".green(),
        evo.effective_window()
    );
    println!(
        "  {}={} │ {}={:.3} │ {}={} │ {}={}",
        "Crossover".green(),
        evo.crossover,
        "Mutation".green(),
        evo.mutation.initial_rate,
        "Stagnation".green(),
        evo.mutation.stagnation_threshold,
        "Seed".green(),
        evo.seed
    );
    println!("{}\n", RULE.bright_black());
}

fn print_best(problem: &ProblemModel, result: &EvolutionResult) {
    let best = &result.best;
    println!("\n{}", "🏆 Best Route".bold().cyan());
    println!("  {} {}", "Route:".green(), best.route());
    println!("  {} {:.3}", "Fitness:".green(), best.fitness());
    println!(
        "  {} {}",
        "Feasible:".green(),
        if best.is_feasible() {
            "yes".green()
        } else {
            "no".red()
        }
    );
    println!(
        "  {} {:.3}",
        "Final mutation rate:".green(),
        result.final_mutation_rate
    );

    for (i, trip) in problem.trip_report(best.route()).iter().enumerate() {
        let marker = if trip.violations == 0 {
            "•".bright_blue()
        } else {
            "✗".red()
        };
        println!(
            "  {} trip {:>2}: {:?} payload={:.1} energy={:.1}",
            marker,
            i + 1,
            trip.points,
            trip.payload,
            trip.energy
        );
    }
}

/// Relative drop from `previous` to `current` in percent. Zero when there is
/// no usable previous value.
fn improvement_percent(previous: f64, current: f64) -> f64 {
    if !previous.is_finite() || previous == 0.0 {
        return 0.0;
    }
    let delta = (previous - current) / previous.abs() * 100.0;
    if delta.is_finite() {
        delta
    } else {
        0.0
    }
}

pub fn run(config: RunConfig) -> Result<()> {
    let problem = io::load_problem(&config.problem_file, &config.drone)?;
    print_header(&config, &problem);

    let engine = EvolutionEngine::new(&problem, config.evolution.clone())?;

    let progress = ProgressBar::new(config.evolution.generations as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} gens | {msg}")?
            .progress_chars("█▓░"),
    );

    let report_every = config.report_every.max(1);
    let mut last_reported = f64::NAN;
    let result = engine.run_with(|stats| {
        progress.set_position(stats.generation as u64 + 1);
        progress.set_message(format!("Best: {:.1}", stats.best_fitness));

        if stats.generation % report_every == 0 {
            let delta = improvement_percent(last_reported, stats.best_fitness);
            progress.println(format!(
                "  [{}] {} mean={:>10.1} │ {} best={:>10.1} feasible={} │ rate={:.3} │ Δ={}%",
                format!("{:>4}", stats.generation).bright_black(),
                "📊".bright_blue(),
                stats.mean_fitness,
                "🎯".bright_green(),
                stats.best_fitness,
                format!("{:>4}", stats.feasible_count).bright_black(),
                stats.mutation_rate,
                if delta > 0.0 {
                    format!("{:>+6.2}", delta).green()
                } else {
                    format!("{:>+6.2}", delta).bright_black()
                }
            ));
            last_reported = stats.best_fitness;
        }
    });
    progress.finish();

    print_best(&problem, &result);

    let out_dir = config
        .output_dir
        .join(io::results_dir_name(&config.problem_file));
    io::write_results(&out_dir, &problem, &result)?;

    println!("\n{}", "💾 Saving Results".bold().cyan());
    for name in [
        io::GENERATION_DATA_FILE,
        io::BEST_PATH_FILE,
        io::FITNESS_OVER_TIME_FILE,
        io::BEST_PER_GENERATION_FILE,
    ] {
        println!("    {} {}", "✓".bright_black(), out_dir.join(name).display());
    }

    println!("\n{}", "✨ Done!".bold().green());
    Ok(())
}
