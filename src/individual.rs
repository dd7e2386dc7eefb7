use crate::problem::ProblemModel;
use crate::route::Route;
use rand::rngs::StdRng;

/// A route bound to its fitness.
///
/// Routes are only changed before they become an Individual, so the cached
/// fitness always matches the route.
#[derive(Debug, Clone)]
pub struct Individual {
    route: Route,
    fitness: f64,
    feasible: bool,
}

impl Individual {
    pub fn new(route: Route, problem: &ProblemModel) -> Individual {
        let route = route.normalized();
        let eval = problem.evaluate(&route);
        Individual {
            route,
            fitness: eval.fitness,
            feasible: eval.feasible,
        }
    }

    /// Single trip over every delivery point in random order
    pub fn random(rng: &mut StdRng, problem: &ProblemModel) -> Individual {
        Individual::new(Route::random(problem.len(), rng), problem)
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn into_route(self) -> Route {
        self.route
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn is_feasible(&self) -> bool {
        self.feasible
    }
}
