//! Pareto dominance for the two minimised objectives.

use crate::chromosome::Objectives;

/// Outcome of comparing two objective pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// The left side dominates the right.
    Left,
    /// The right side dominates the left.
    Right,
    /// Neither dominates: equal, or each better on one objective.
    Neither,
}

/// Compares `a` with `b` under Pareto dominance (minimisation).
pub fn compare(a: &Objectives, b: &Objectives) -> Dominance {
    if a.dominates(b) {
        Dominance::Left
    } else if b.dominates(a) {
        Dominance::Right
    } else {
        Dominance::Neither
    }
}
