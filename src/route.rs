//! Route encoding.
//!
//! A route lists every delivery point exactly once. Interior `0` entries are
//! returns to the base that start a new trip. The departure from and the
//! final return to the base are implicit and never stored.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of the base point
pub const BASE: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(Vec<usize>);

impl Route {
    /// Wrap a raw sequence and normalize it
    pub fn new(genes: Vec<usize>) -> Route {
        let mut route = Route(genes);
        route.normalize();
        route
    }

    /// Wrap a raw sequence as-is
    pub fn from_raw(genes: Vec<usize>) -> Route {
        Route(genes)
    }

    /// A single trip visiting the delivery points `1..n_points` in random order
    pub fn random(n_points: usize, rng: &mut StdRng) -> Route {
        let mut genes: Vec<usize> = (1..n_points).collect();
        genes.shuffle(rng);
        Route(genes)
    }

    /// Drop every base marker at the start, at the end, or right after another
    /// base marker.
    pub fn normalize(&mut self) {
        let mut kept: Vec<usize> = Vec::with_capacity(self.0.len());
        for &gene in &self.0 {
            if gene == BASE && !matches!(kept.last(), Some(&prev) if prev != BASE) {
                continue;
            }
            kept.push(gene);
        }
        if kept.last() == Some(&BASE) {
            kept.pop();
        }
        self.0 = kept;
    }

    pub fn normalized(mut self) -> Route {
        self.normalize();
        self
    }

    pub fn is_normalized(&self) -> bool {
        let g = &self.0;
        g.first() != Some(&BASE)
            && g.last() != Some(&BASE)
            && g.windows(2).all(|w| !(w[0] == BASE && w[1] == BASE))
    }

    pub fn genes(&self) -> &[usize] {
        &self.0
    }

    pub fn genes_mut(&mut self) -> &mut Vec<usize> {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of interior returns to the base
    pub fn base_markers(&self) -> usize {
        self.0.iter().filter(|&&g| g == BASE).count()
    }

    /// Delivery points in visiting order
    pub fn points(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied().filter(|&g| g != BASE)
    }

    /// Maximal runs of delivery points between base markers
    pub fn trips(&self) -> Vec<Vec<usize>> {
        self.0
            .split(|&g| g == BASE)
            .filter(|trip| !trip.is_empty())
            .map(|trip| trip.to_vec())
            .collect()
    }

    /// The route framed by the implicit departure and final return
    pub fn flight_path(&self) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.0.len() + 2);
        path.push(BASE);
        path.extend_from_slice(&self.0);
        path.push(BASE);
        path
    }

    /// True when every point in `1..n_points` appears exactly once and no
    /// other delivery index appears.
    pub fn is_permutation_of(&self, n_points: usize) -> bool {
        let mut seen = vec![false; n_points];
        let mut count = 0;
        for p in self.points() {
            if p >= n_points || seen[p] {
                return false;
            }
            seen[p] = true;
            count += 1;
        }
        count == n_points.saturating_sub(1)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|g| g.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
