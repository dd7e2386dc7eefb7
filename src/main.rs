mod commands;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use colored::*;
use std::path::PathBuf;
use tracing::Level;

use dronega::constants::{
    ELITISM_COUNT, MAX_GENERATIONS, POPULATION_SIZE, RANDOM_SEED, REPORT_EVERY, SELECTION_WINDOW,
    STAGNATION_THRESHOLD, TOP_K,
};
use dronega::ga::Crossover;
use dronega::io::DroneOverrides;
use dronega::{EvolutionConfig, MutationConfig};

fn drone_args() -> Vec<Arg> {
    vec![
        Arg::new("dry_weight")
            .long("dry-weight")
            .value_name("WEIGHT")
            .help("Drone weight without payload")
            .value_parser(value_parser!(f64)),
        Arg::new("capacity")
            .long("capacity")
            .value_name("WEIGHT")
            .help("Maximum total weight, drone included")
            .value_parser(value_parser!(f64)),
        Arg::new("battery")
            .long("battery")
            .value_name("ENERGY")
            .help("Energy available per trip")
            .value_parser(value_parser!(f64)),
    ]
}

fn evolution_args() -> Vec<Arg> {
    vec![
        Arg::new("population")
            .short('p')
            .long("population")
            .value_name("N")
            .help(format!("Population size (default: {})", POPULATION_SIZE))
            .value_parser(value_parser!(usize)),
        Arg::new("generations")
            .short('g')
            .long("generations")
            .value_name("N")
            .help(format!("Number of generations (default: {})", MAX_GENERATIONS))
            .value_parser(value_parser!(usize)),
        Arg::new("elitism")
            .long("elitism")
            .value_name("N")
            .help(format!("Individuals copied unchanged (default: {})", ELITISM_COUNT))
            .value_parser(value_parser!(usize)),
        Arg::new("window")
            .long("window")
            .value_name("N")
            .help(format!(
                "Parents are drawn from the best N individuals (default: {})",
                SELECTION_WINDOW
            ))
            .value_parser(value_parser!(usize)),
        Arg::new("crossover")
            .long("crossover")
            .value_name("KIND")
            .help("Crossover operator: order, subroute or mixed (default: order)")
            .value_parser(value_parser!(Crossover)),
        Arg::new("stagnation")
            .long("stagnation")
            .value_name("N")
            .help(format!(
                "Generations without improvement before exploring (default: {})",
                STAGNATION_THRESHOLD
            ))
            .value_parser(value_parser!(usize)),
        Arg::new("top_k")
            .long("top-k")
            .value_name("N")
            .help(format!("Routes kept per generation (default: {})", TOP_K))
            .value_parser(value_parser!(usize)),
        Arg::new("seed")
            .long("seed")
            .value_name("SEED")
            .help(format!("Random seed (default: {})", RANDOM_SEED))
            .value_parser(value_parser!(u64)),
        Arg::new("output")
            .short('o')
            .long("output")
            .value_name("DIR")
            .help("Results directory (default: results)")
            .value_parser(value_parser!(PathBuf)),
    ]
}

fn evolution_config(matches: &ArgMatches) -> EvolutionConfig {
    let defaults = EvolutionConfig::default();
    EvolutionConfig {
        population_size: matches
            .get_one::<usize>("population")
            .copied()
            .unwrap_or(defaults.population_size),
        generations: matches
            .get_one::<usize>("generations")
            .copied()
            .unwrap_or(defaults.generations),
        elitism_count: matches
            .get_one::<usize>("elitism")
            .copied()
            .unwrap_or(defaults.elitism_count),
        selection_window: matches
            .get_one::<usize>("window")
            .copied()
            .unwrap_or(defaults.selection_window),
        crossover: matches
            .get_one::<Crossover>("crossover")
            .copied()
            .unwrap_or(defaults.crossover),
        top_k: matches.get_one::<usize>("top_k").copied().unwrap_or(defaults.top_k),
        seed: matches.get_one::<u64>("seed").copied().unwrap_or(defaults.seed),
        mutation: MutationConfig {
            stagnation_threshold: matches
                .get_one::<usize>("stagnation")
                .copied()
                .unwrap_or(defaults.mutation.stagnation_threshold),
            ..defaults.mutation
        },
    }
}

fn drone_overrides(matches: &ArgMatches) -> DroneOverrides {
    DroneOverrides {
        dry_weight: matches.get_one::<f64>("dry_weight").copied(),
        max_capacity: matches.get_one::<f64>("capacity").copied(),
        battery_capacity: matches.get_one::<f64>("battery").copied(),
    }
}

fn output_dir(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("results"))
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let matches = Command::new("dronega")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Multi-trip drone delivery routing with a genetic algorithm")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .about("Evolve a route for one problem file")
                .arg(
                    Arg::new("problem")
                        .value_name("PROBLEM")
                        .help("Problem JSON file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("report_every")
                        .long("report-every")
                        .value_name("N")
                        .help(format!(
                            "Print a summary line every N generations (default: {})",
                            REPORT_EVERY
                        ))
                        .value_parser(value_parser!(usize)),
                )
                .args(evolution_args())
                .args(drone_args()),
        )
        .subcommand(
            Command::new("batch")
                .about("Evolve routes for every problem file in a directory, in parallel")
                .arg(
                    Arg::new("dir")
                        .value_name("DIR")
                        .help("Directory of problem JSON files")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .args(evolution_args())
                .args(drone_args()),
        )
        .subcommand(
            Command::new("score")
                .about("Score a given route against a problem file")
                .arg(
                    Arg::new("problem")
                        .value_name("PROBLEM")
                        .help("Problem JSON file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("route")
                        .short('r')
                        .long("route")
                        .value_name("ROUTE")
                        .help("Comma-separated point indices, 0 returns to base (e.g. 3,1,0,2)")
                        .required(true),
                )
                .args(drone_args()),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let result = match matches.subcommand() {
        Some(("run", sub_matches)) => {
            let config = commands::run::RunConfig {
                problem_file: sub_matches
                    .get_one::<PathBuf>("problem")
                    .cloned()
                    .unwrap_or_default(),
                output_dir: output_dir(sub_matches),
                evolution: evolution_config(sub_matches),
                drone: drone_overrides(sub_matches),
                report_every: sub_matches
                    .get_one::<usize>("report_every")
                    .copied()
                    .unwrap_or(REPORT_EVERY),
            };
            commands::run::run(config)
        }
        Some(("batch", sub_matches)) => {
            let config = commands::batch::BatchConfig {
                input_dir: sub_matches
                    .get_one::<PathBuf>("dir")
                    .cloned()
                    .unwrap_or_default(),
                output_dir: output_dir(sub_matches),
                evolution: evolution_config(sub_matches),
                drone: drone_overrides(sub_matches),
            };
            commands::batch::batch(config)
        }
        Some(("score", sub_matches)) => commands::score::score(
            sub_matches
                .get_one::<PathBuf>("problem")
                .cloned()
                .unwrap_or_default(),
            sub_matches
                .get_one::<String>("route")
                .map(String::as_str)
                .unwrap_or_default(),
            drone_overrides(sub_matches),
        ),
        _ => {
            eprintln!("Please specify a valid subcommand: run, batch or score");
            std::process::exit(2);
        }
    };

    if let Err(err) = result {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
