use anyhow::{Context, Result};
use std::path::PathBuf;

use dronega::io::{self, DroneOverrides};
use dronega::Route;

/// Parse `"3,1,0,2"` into point indices; blanks around commas are ignored
pub fn parse_route(text: &str) -> Result<Vec<usize>> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| format!("invalid point index '{}' in route", s))
        })
        .collect()
}

/// Score a route and print it to stdout in TSV format, one line per trip
/// followed by a total line
pub fn score(problem_file: PathBuf, route: &str, drone: DroneOverrides) -> Result<()> {
    let problem = io::load_problem(&problem_file, &drone)?;
    let route = Route::new(parse_route(route)?);
    problem
        .validate_route(&route)
        .with_context(|| format!("route {} does not fit {}", route, problem_file.display()))?;

    let eval = problem.evaluate(&route);
    let trips = problem.trip_report(&route);

    println!("trip\tpoints\tpayload\tenergy\tviolations");
    for (i, trip) in trips.iter().enumerate() {
        let points: Vec<String> = trip.points.iter().map(|p| p.to_string()).collect();
        println!(
            "{}\t{}\t{:.3}\t{:.3}\t{}",
            i + 1,
            points.join(","),
            trip.payload,
            trip.energy,
            trip.violations
        );
    }
    println!(
        "total\t{}\t{:.3}\t{:.3}\t{}",
        route,
        trips.iter().map(|t| t.payload).sum::<f64>(),
        eval.fitness,
        if eval.feasible { "feasible" } else { "infeasible" }
    );

    Ok(())
}
