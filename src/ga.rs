//! This module contains the variation operators of the genetic algorithm.
//!
//! Every operator returns or leaves behind a normalized route that still
//! visits each delivery point exactly once.
use crate::config::MutationConfig;
use crate::route::{Route, BASE};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crossover {
    /// Order crossover on the flat route
    #[default]
    Order,
    /// Trip-preserving crossover
    Subroute,
    /// Either of the above, chosen per child
    Mixed,
}

impl FromStr for Crossover {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "order" | "ox" => Ok(Crossover::Order),
            "subroute" | "trip" => Ok(Crossover::Subroute),
            "mixed" => Ok(Crossover::Mixed),
            other => Err(format!("unknown crossover operator '{}'", other)),
        }
    }
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Crossover::Order => "order",
            Crossover::Subroute => "subroute",
            Crossover::Mixed => "mixed",
        };
        write!(f, "{}", name)
    }
}

pub fn crossover(rng: &mut StdRng, kind: Crossover, parent1: &Route, parent2: &Route) -> Route {
    match kind {
        Crossover::Order => order_crossover(rng, parent1, parent2),
        Crossover::Subroute => subroute_crossover(rng, parent1, parent2),
        Crossover::Mixed => {
            if rng.gen_bool(0.5) {
                order_crossover(rng, parent1, parent2)
            } else {
                subroute_crossover(rng, parent1, parent2)
            }
        }
    }
}

/// Order crossover (OX).
///
/// `parent1[start..end]` is copied in place. The remaining delivery points
/// are taken from `parent2` starting right after `end` and wrapping around,
/// and written from slot `end` onward modulo the child length. Slots left
/// empty become base markers.
pub fn order_crossover(rng: &mut StdRng, parent1: &Route, parent2: &Route) -> Route {
    let a = parent1.genes();
    let b = parent2.genes();
    let len = a.len();
    if len < 2 {
        return parent1.clone();
    }

    let cuts = index::sample(rng, len, 2);
    let (start, end) = {
        let (i, j) = (cuts.index(0), cuts.index(1));
        (i.min(j), i.max(j))
    };

    let mut child: Vec<Option<usize>> = vec![None; len];
    let mut placed: HashSet<usize> = HashSet::with_capacity(len);
    for i in start..end {
        child[i] = Some(a[i]);
        if a[i] != BASE {
            placed.insert(a[i]);
        }
    }

    // The free slots are never fewer than the points still missing, so the
    // write index never wraps onto the copied slice.
    let pivot = end.min(b.len());
    let mut slot = end;
    for &gene in b[pivot..].iter().chain(b[..pivot].iter()) {
        if gene != BASE && placed.insert(gene) {
            child[slot % len] = Some(gene);
            slot += 1;
        }
    }

    Route::new(child.into_iter().map(|g| g.unwrap_or(BASE)).collect())
}

/// Trip-preserving crossover.
///
/// Alternately pops a random remaining trip from each parent and appends its
/// points that are not placed yet, closing every trip with a base marker.
pub fn subroute_crossover(rng: &mut StdRng, parent1: &Route, parent2: &Route) -> Route {
    let mut trips1 = parent1.trips();
    let mut trips2 = parent2.trips();
    let mut placed: HashSet<usize> = HashSet::with_capacity(parent1.len());
    let mut child = Vec::with_capacity(parent1.len() + parent2.len());
    let mut from_first = true;

    while !trips1.is_empty() || !trips2.is_empty() {
        let source = if (from_first && !trips1.is_empty()) || trips2.is_empty() {
            &mut trips1
        } else {
            &mut trips2
        };
        let trip = source.swap_remove(rng.gen_range(0..source.len()));
        child.extend(trip.into_iter().filter(|&p| placed.insert(p)));
        child.push(BASE);
        from_first = !from_first;
    }

    Route::new(child)
}

/// Split a trip by inserting a base marker at a random interior position
pub fn insert_base(rng: &mut StdRng, route: &mut Route) -> bool {
    let genes = route.genes_mut();
    if genes.len() < 2 {
        return false;
    }
    let position = rng.gen_range(1..genes.len());
    genes.insert(position, BASE);
    true
}

/// Merge two trips by removing one of the base markers. Only applies when the
/// route has more than one marker.
pub fn remove_base(rng: &mut StdRng, route: &mut Route) -> bool {
    let markers: Vec<usize> = positions(route, |g| g == BASE);
    if markers.len() <= 1 {
        return false;
    }
    let victim = markers[rng.gen_range(0..markers.len())];
    route.genes_mut().remove(victim);
    true
}

/// Exchange two delivery points
pub fn swap_points(rng: &mut StdRng, route: &mut Route) -> bool {
    let slots: Vec<usize> = positions(route, |g| g != BASE);
    if slots.len() < 2 {
        return false;
    }
    let pick = index::sample(rng, slots.len(), 2);
    route.genes_mut().swap(slots[pick.index(0)], slots[pick.index(1)]);
    true
}

/// Apply between 1 and `max_passes` mutation passes to `route`.
///
/// Each pass inserts a base marker, removes one, or swaps two delivery
/// points. After a pass another one follows with
/// `continuation_probability`. Returns the number of passes applied.
pub fn mutate(rng: &mut StdRng, route: &mut Route, config: &MutationConfig) -> usize {
    let mut passes = 0;
    loop {
        passes += 1;
        let roll: f64 = rng.gen();
        let split_or_merged = if roll < config.insert_probability {
            insert_base(rng, route)
        } else if roll < config.insert_probability + config.remove_probability {
            remove_base(rng, route)
        } else {
            false
        };
        if !split_or_merged {
            swap_points(rng, route);
        }
        route.normalize();

        if passes >= config.max_passes || !rng.gen_bool(config.continuation_probability) {
            break;
        }
    }
    passes
}

fn positions(route: &Route, keep: impl Fn(usize) -> bool) -> Vec<usize> {
    route
        .genes()
        .iter()
        .enumerate()
        .filter(|&(_, &g)| keep(g))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// A random valid route over `n_points` with up to `markers` base markers
    fn random_parent(rng: &mut StdRng, n_points: usize, markers: usize) -> Route {
        let mut route = Route::random(n_points, rng);
        for _ in 0..markers {
            insert_base(rng, &mut route);
        }
        route.normalized()
    }

    #[test]
    fn test_order_crossover_preserves_points() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let p1 = random_parent(&mut rng, 12, 4);
            let p2 = random_parent(&mut rng, 12, 2);
            let child = order_crossover(&mut rng, &p1, &p2);
            assert!(child.is_permutation_of(12), "lost points: {}", child);
            assert!(child.is_normalized());
        }
    }

    #[test]
    fn test_order_crossover_between_single_trips() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let p1 = Route::random(9, &mut rng);
            let p2 = Route::random(9, &mut rng);
            let child = order_crossover(&mut rng, &p1, &p2);
            // Equal lengths without markers leave no empty slot
            assert_eq!(child.base_markers(), 0);
            assert!(child.is_permutation_of(9));
        }
    }

    #[test]
    fn test_order_crossover_identical_parents() {
        let mut rng = StdRng::seed_from_u64(42);
        let parent = Route::new(vec![3, 1, 4, 2, 5]);
        for _ in 0..50 {
            let child = order_crossover(&mut rng, &parent, &parent);
            assert_eq!(child, parent);
        }
    }

    #[test]
    fn test_order_crossover_degenerate_parent() {
        let mut rng = StdRng::seed_from_u64(42);
        let single = Route::new(vec![1]);
        let child = order_crossover(&mut rng, &single, &single);
        assert_eq!(child.genes(), &[1]);
    }

    #[test]
    fn test_subroute_crossover_preserves_points() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let p1 = random_parent(&mut rng, 15, 5);
            let p2 = random_parent(&mut rng, 15, 3);
            let child = subroute_crossover(&mut rng, &p1, &p2);
            assert!(child.is_permutation_of(15), "lost points: {}", child);
            assert!(child.is_normalized());
        }
    }

    #[test]
    fn test_subroute_crossover_keeps_shared_trips() {
        let mut rng = StdRng::seed_from_u64(42);
        let parent = Route::new(vec![1, 2, 0, 3, 0, 4, 5]);
        let child = subroute_crossover(&mut rng, &parent, &parent);
        let mut trips = child.trips();
        trips.sort();
        assert_eq!(trips, vec![vec![1, 2], vec![3], vec![4, 5]]);
    }

    #[test]
    fn test_subroute_crossover_degenerate_parents() {
        let mut rng = StdRng::seed_from_u64(42);
        let single = Route::new(vec![1]);
        assert_eq!(subroute_crossover(&mut rng, &single, &single).genes(), &[1]);

        let p1 = Route::new(vec![2, 1, 3]);
        let p2 = Route::new(vec![1, 3, 2]);
        for _ in 0..20 {
            let child = subroute_crossover(&mut rng, &p1, &p2);
            assert!(child.is_permutation_of(4));
            assert!(child.is_normalized());
        }
    }

    #[test]
    fn test_crossover_dispatch_mixed() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let p1 = random_parent(&mut rng, 8, 3);
            let p2 = random_parent(&mut rng, 8, 3);
            let child = crossover(&mut rng, Crossover::Mixed, &p1, &p2);
            assert!(child.is_permutation_of(8));
        }
    }

    #[test]
    fn test_insert_base_is_interior() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let mut route = Route::new(vec![1, 2, 3, 4]);
            assert!(insert_base(&mut rng, &mut route));
            assert_eq!(route.len(), 5);
            assert_ne!(route.genes()[0], BASE);
            assert_ne!(route.genes()[4], BASE);
        }
    }

    #[test]
    fn test_insert_base_single_point_is_noop() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut route = Route::new(vec![1]);
        assert!(!insert_base(&mut rng, &mut route));
        assert_eq!(route.genes(), &[1]);
    }

    #[test]
    fn test_remove_base_needs_two_markers() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut route = Route::new(vec![1, 0, 2]);
        assert!(!remove_base(&mut rng, &mut route));
        assert_eq!(route.base_markers(), 1);

        let mut route = Route::new(vec![1, 0, 2, 0, 3]);
        assert!(remove_base(&mut rng, &mut route));
        assert_eq!(route.base_markers(), 1);
        assert!(route.is_permutation_of(4));
    }

    #[test]
    fn test_swap_points_keeps_markers_in_place() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut route = Route::new(vec![1, 0, 2, 3, 0, 4]);
        assert!(swap_points(&mut rng, &mut route));
        assert_eq!(route.genes()[1], BASE);
        assert_eq!(route.genes()[4], BASE);
        assert!(route.is_permutation_of(5));
        assert_ne!(route.genes(), &[1, 0, 2, 3, 0, 4]);
    }

    #[test]
    fn test_swap_points_single_point_is_noop() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut route = Route::new(vec![1]);
        assert!(!swap_points(&mut rng, &mut route));
    }

    #[test]
    fn test_mutate_keeps_route_valid() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = MutationConfig::default();
        let mut route = Route::random(12, &mut rng);
        for _ in 0..500 {
            mutate(&mut rng, &mut route, &config);
            assert!(route.is_permutation_of(12));
            assert!(route.is_normalized());
        }
    }

    #[test]
    fn test_mutate_single_pass_without_continuation() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = MutationConfig {
            continuation_probability: 0.0,
            ..Default::default()
        };
        let mut route = Route::random(6, &mut rng);
        for _ in 0..50 {
            assert_eq!(mutate(&mut rng, &mut route, &config), 1);
        }
    }

    #[test]
    fn test_mutate_passes_are_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = MutationConfig {
            continuation_probability: 1.0,
            max_passes: 4,
            ..Default::default()
        };
        let mut route = Route::random(6, &mut rng);
        assert_eq!(mutate(&mut rng, &mut route, &config), 4);
    }

    #[test]
    fn test_mutate_insert_only_splits_trips() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = MutationConfig {
            insert_probability: 1.0,
            remove_probability: 0.0,
            continuation_probability: 0.0,
            ..Default::default()
        };
        let mut route = Route::new(vec![1, 2, 3, 4, 5]);
        mutate(&mut rng, &mut route, &config);
        assert_eq!(route.base_markers(), 1);
    }

    #[test]
    fn test_mutate_single_point_route() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = MutationConfig::default();
        let mut route = Route::new(vec![1]);
        for _ in 0..20 {
            mutate(&mut rng, &mut route, &config);
            assert_eq!(route.genes(), &[1]);
        }
    }

    #[test]
    fn test_crossover_from_str() {
        assert_eq!("order".parse::<Crossover>(), Ok(Crossover::Order));
        assert_eq!("Subroute".parse::<Crossover>(), Ok(Crossover::Subroute));
        assert_eq!("mixed".parse::<Crossover>(), Ok(Crossover::Mixed));
        assert!("pmx".parse::<Crossover>().is_err());
        assert_eq!(Crossover::Subroute.to_string(), "subroute");
    }
}
