//! Local search neighbourhoods.
//!
//! Each neighbourhood is scanned in a fixed order and the first candidate
//! that keeps every changed route within budget and strictly lowers the
//! objective is returned. Routes are plain sequences of delivery indices;
//! start and end sentinels are implicit.

use crate::arc_cost::ArcCostEvaluator;
use crate::dimension::DistanceDimension;
use crate::problem::RoutingProblem;

/// Longest run of consecutive stops moved by a single relocation.
const MAX_SEGMENT_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Reverse a segment inside one route.
    TwoOpt,
    /// Move a segment of 1..=3 stops to another position or route.
    Relocate,
    /// Swap the tails of two routes (2-opt*).
    TailExchange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    pub vehicle: usize,
    pub path: Vec<usize>,
    pub distance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImprovingMove {
    pub kind: MoveKind,
    pub routes: Vec<RouteChange>,
    pub objective: i64,
}

struct Neighbourhood<'a> {
    arc_cost: ArcCostEvaluator<'a>,
    dimension: DistanceDimension<'a>,
    paths: &'a [Vec<usize>],
    distances: &'a [i64],
    objective: i64,
}

/// Finds the first improving move, trying 2-opt, then relocation, then
/// tail exchange.
pub fn find_improving_move(problem: &RoutingProblem, paths: &[Vec<usize>], distances: &[i64]) -> Option<ImprovingMove> {
    let dimension = problem.dimension();
    let neighbourhood = Neighbourhood {
        arc_cost: problem.arc_cost(),
        dimension,
        paths,
        distances,
        objective: dimension.objective(distances),
    };

    neighbourhood
        .two_opt()
        .or_else(|| neighbourhood.relocate())
        .or_else(|| neighbourhood.tail_exchange())
}

impl Neighbourhood<'_> {
    fn evaluate(&self, kind: MoveKind, changes: Vec<(usize, Vec<usize>)>) -> Option<ImprovingMove> {
        let mut distances = self.distances.to_vec();
        let mut routes = Vec::with_capacity(changes.len());

        for (vehicle, path) in changes {
            let distance = self.arc_cost.route_cost(vehicle, &path);
            if !self.dimension.fits(vehicle, distance) {
                return None;
            }
            distances[vehicle] = distance;
            routes.push(RouteChange { vehicle, path, distance });
        }

        let objective = self.dimension.objective(&distances);
        (objective < self.objective).then_some(ImprovingMove { kind, routes, objective })
    }

    fn two_opt(&self) -> Option<ImprovingMove> {
        for (vehicle, path) in self.paths.iter().enumerate() {
            let n = path.len();
            for i in 0..n.saturating_sub(1) {
                for j in i + 1..n {
                    let mut candidate = path.clone();
                    candidate[i..=j].reverse();
                    if let Some(found) = self.evaluate(MoveKind::TwoOpt, vec![(vehicle, candidate)]) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    fn relocate(&self) -> Option<ImprovingMove> {
        for (from, path) in self.paths.iter().enumerate() {
            let n = path.len();
            for segment_len in 1..=MAX_SEGMENT_LEN.min(n) {
                for i in 0..=n - segment_len {
                    let segment = &path[i..i + segment_len];
                    let mut rest = path[..i].to_vec();
                    rest.extend_from_slice(&path[i + segment_len..]);

                    for to in 0..self.paths.len() {
                        let target = if to == from { &rest } else { &self.paths[to] };
                        for position in 0..=target.len() {
                            if to == from && position == i {
                                continue;
                            }
                            let mut inserted = target[..position].to_vec();
                            inserted.extend_from_slice(segment);
                            inserted.extend_from_slice(&target[position..]);

                            let changes = if to == from {
                                vec![(from, inserted)]
                            } else {
                                vec![(from, rest.clone()), (to, inserted)]
                            };
                            if let Some(found) = self.evaluate(MoveKind::Relocate, changes) {
                                return Some(found);
                            }
                        }
                    }
                }
            }
        }
        None
    }

    fn tail_exchange(&self) -> Option<ImprovingMove> {
        for a in 0..self.paths.len() {
            for b in a + 1..self.paths.len() {
                let (first, second) = (&self.paths[a], &self.paths[b]);
                for i in 0..=first.len() {
                    for j in 0..=second.len() {
                        let whole_swap = i == 0 && j == 0;
                        let no_op = i == first.len() && j == second.len();
                        if whole_swap || no_op {
                            continue;
                        }

                        let mut new_first = first[..i].to_vec();
                        new_first.extend_from_slice(&second[j..]);
                        let mut new_second = second[..j].to_vec();
                        new_second.extend_from_slice(&first[i..]);

                        let changes = vec![(a, new_first), (b, new_second)];
                        if let Some(found) = self.evaluate(MoveKind::TailExchange, changes) {
                            return Some(found);
                        }
                    }
                }
            }
        }
        None
    }
}
