//! Problem definition and the energy fitness function.
use crate::constants::{
    DEFAULT_BATTERY_CAPACITY, DEFAULT_DRONE_WEIGHT, DEFAULT_MAX_CAPACITY, VIOLATION_PENALTY,
};
use crate::error::ProblemError;
use crate::route::{Route, BASE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "peso")]
    pub weight: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, weight: f64) -> Point {
        Point { x, y, weight }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Physical limits of the drone.
///
/// `max_capacity` bounds the total carried weight, the drone's own dry
/// weight included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneSpec {
    pub dry_weight: f64,
    pub max_capacity: f64,
    pub battery_capacity: f64,
}

impl Default for DroneSpec {
    fn default() -> Self {
        Self {
            dry_weight: DEFAULT_DRONE_WEIGHT,
            max_capacity: DEFAULT_MAX_CAPACITY,
            battery_capacity: DEFAULT_BATTERY_CAPACITY,
        }
    }
}

impl DroneSpec {
    pub fn new(dry_weight: f64, max_capacity: f64, battery_capacity: f64) -> Self {
        Self {
            dry_weight,
            max_capacity,
            battery_capacity,
        }
    }
}

/// Result of scoring one route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub fitness: f64,
    pub feasible: bool,
}

/// Energy breakdown of a single trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    pub points: Vec<usize>,
    pub payload: f64,
    pub energy: f64,
    pub violations: usize,
}

/// Running totals of one reverse walk. `total` accumulates penalties in
/// walking order, `energy` leaves them out.
#[derive(Debug, Default)]
struct Walk {
    total: f64,
    energy: f64,
    violations: usize,
}

#[derive(Debug, Clone)]
pub struct ProblemModel {
    points: Vec<Point>,
    drone: DroneSpec,
}

impl ProblemModel {
    pub fn new(points: Vec<Point>, drone: DroneSpec) -> Result<ProblemModel, ProblemError> {
        if points.is_empty() {
            return Err(ProblemError::NoPoints);
        }
        if points.len() == 1 {
            return Err(ProblemError::NoDeliveries);
        }
        for (index, p) in points.iter().enumerate() {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(ProblemError::NonFiniteCoordinate { index });
            }
            if !p.weight.is_finite() || p.weight < 0.0 {
                return Err(ProblemError::NegativeWeight {
                    index,
                    weight: p.weight,
                });
            }
        }
        if drone.dry_weight.is_nan() || drone.dry_weight < 0.0 {
            return Err(ProblemError::NegativeDryWeight(drone.dry_weight));
        }
        if drone.max_capacity.is_nan() || drone.max_capacity <= 0.0 {
            return Err(ProblemError::NonPositiveCapacity(drone.max_capacity));
        }
        if drone.battery_capacity.is_nan() || drone.battery_capacity <= 0.0 {
            return Err(ProblemError::NonPositiveBattery(drone.battery_capacity));
        }

        Ok(ProblemModel { points, drone })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points, base included
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn drone(&self) -> &DroneSpec {
        &self.drone
    }

    pub fn distance(&self, a: usize, b: usize) -> f64 {
        self.points[a].distance_to(&self.points[b])
    }

    /// Score a route by simulated energy use, lower is better.
    ///
    /// The flight path is walked from the final return edge back to the
    /// first departure edge. Each edge adds the weight of the point it
    /// arrives at (in walking order) before charging `distance * weight`.
    /// Every edge that overdraws the battery or exceeds capacity adds
    /// `VIOLATION_PENALTY`; the walk never stops early.
    pub fn evaluate(&self, route: &Route) -> Evaluation {
        let walk = self.walk(&route.flight_path());
        Evaluation {
            fitness: walk.total,
            feasible: walk.violations == 0,
        }
    }

    pub fn fitness(&self, route: &Route) -> f64 {
        self.evaluate(route).fitness
    }

    /// Per-trip breakdown, trips in visiting order.
    ///
    /// Each trip is walked on its own; the walk resets at every base visit,
    /// so the trip totals sum to the route fitness.
    pub fn trip_report(&self, route: &Route) -> Vec<TripReport> {
        route
            .trips()
            .into_iter()
            .map(|trip| {
                let walk = self.walk(&Route::from_raw(trip.clone()).flight_path());
                let payload = trip.iter().map(|&p| self.points[p].weight).sum();
                TripReport {
                    points: trip,
                    payload,
                    energy: walk.energy,
                    violations: walk.violations,
                }
            })
            .collect()
    }

    fn walk(&self, path: &[usize]) -> Walk {
        let mut walk = Walk::default();
        let mut current_weight = self.drone.dry_weight;
        let mut current_battery = self.drone.battery_capacity;

        for i in (1..path.len()).rev() {
            let from = path[i];
            let to = path[i - 1];

            current_weight += self.points[to].weight;
            let edge_cost = self.distance(from, to) * current_weight;

            walk.total += edge_cost;
            walk.energy += edge_cost;
            current_battery -= edge_cost;

            if current_battery < 0.0 || current_weight > self.drone.max_capacity {
                walk.total += VIOLATION_PENALTY;
                walk.violations += 1;
            }

            if to == BASE {
                current_weight = self.drone.dry_weight;
                current_battery = self.drone.battery_capacity;
            }
        }

        walk
    }

    /// Check that an externally supplied route covers every delivery point
    /// exactly once and references no unknown point.
    pub fn validate_route(&self, route: &Route) -> Result<(), ProblemError> {
        let mut seen = vec![false; self.points.len()];
        for p in route.points() {
            if p >= self.points.len() {
                return Err(ProblemError::UnknownPoint(p));
            }
            if seen[p] {
                return Err(ProblemError::DuplicatePoint(p));
            }
            seen[p] = true;
        }
        match seen.iter().skip(1).position(|&s| !s) {
            Some(missing) => Err(ProblemError::MissingPoint(missing + 1)),
            None => Ok(()),
        }
    }
}
