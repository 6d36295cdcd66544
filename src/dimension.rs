//! Cumulative distance along routes and the cross-vehicle balancing term.
//!
//! The dimension has no slack: the cumulative value at each stop is exactly
//! the sum of arc costs since the vehicle left its start sentinel, where it
//! is zero.

use serde::{Deserialize, Serialize};

use crate::arc_cost::ArcCostEvaluator;

/// What the balancing term measures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanMode {
    /// Longest route minus shortest route. A single vehicle pays nothing.
    #[default]
    Spread,
    /// Largest end cumul minus smallest start cumul. Start cumuls are zero,
    /// so this is the longest route, and a lone vehicle pays
    /// `coefficient * distance`. Matches a global span cost over the
    /// distance dimension.
    LongestRoute,
}

#[derive(Debug, Clone, Copy)]
pub struct DistanceDimension<'a> {
    arc_cost: ArcCostEvaluator<'a>,
    max_distances: &'a [i64],
    span_cost_coefficient: i64,
    span_mode: SpanMode,
}

impl<'a> DistanceDimension<'a> {
    pub fn new(arc_cost: ArcCostEvaluator<'a>, max_distances: &'a [i64], span_cost_coefficient: i64) -> Self {
        Self {
            arc_cost,
            max_distances,
            span_cost_coefficient,
            span_mode: SpanMode::default(),
        }
    }

    pub fn with_span_mode(mut self, span_mode: SpanMode) -> Self {
        self.span_mode = span_mode;
        self
    }

    pub fn span_mode(&self) -> SpanMode {
        self.span_mode
    }

    pub fn max_distance(&self, vehicle: usize) -> i64 {
        self.max_distances[vehicle]
    }

    pub fn span_cost_coefficient(&self) -> i64 {
        self.span_cost_coefficient
    }

    /// Cumulative distance at every stop of `start -> path... -> end`.
    pub fn cumuls(&self, vehicle: usize, path: &[usize]) -> Vec<i64> {
        let mapper = self.arc_cost.mapper();
        let mut cumuls = Vec::with_capacity(path.len() + 2);
        let mut previous = mapper.start(vehicle);
        let end = mapper.end(vehicle);
        let mut cumul = 0;
        cumuls.push(cumul);
        for &index in path.iter().chain(std::iter::once(&end)) {
            cumul += self.arc_cost.cost(previous, index);
            cumuls.push(cumul);
            previous = index;
        }
        cumuls
    }

    pub fn fits(&self, vehicle: usize, distance: i64) -> bool {
        distance <= self.max_distance(vehicle)
    }

    /// Cumulative value after travelling `from -> to`, provided the vehicle
    /// can still get back to its end sentinel within budget.
    pub fn can_extend(&self, vehicle: usize, cumul: i64, from: usize, to: usize) -> Option<i64> {
        let arrival = cumul + self.arc_cost.cost(from, to);
        let back = self.arc_cost.cost(to, self.arc_cost.mapper().end(vehicle));
        self.fits(vehicle, arrival + back).then_some(arrival)
    }

    /// `coefficient * span`, saturating at `i64::MAX`.
    pub fn span_cost(&self, distances: &[i64]) -> i64 {
        let longest = distances.iter().copied().max().unwrap_or(0);
        let shortest = match self.span_mode {
            SpanMode::Spread => distances.iter().copied().min().unwrap_or(0),
            SpanMode::LongestRoute => 0,
        };
        self.span_cost_coefficient.saturating_mul(longest - shortest)
    }

    /// Total route distance plus the balancing term, saturating at
    /// `i64::MAX`.
    pub fn objective(&self, distances: &[i64]) -> i64 {
        distances
            .iter()
            .fold(0i64, |total, &distance| total.saturating_add(distance))
            .saturating_add(self.span_cost(distances))
    }
}
