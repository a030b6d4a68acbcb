//! Decides the reply for a solved puzzle.

use crate::variables::VariableStore;
use num_bigint::BigUint;
use std::fmt;

/// Marker sent when the goal can be produced.
pub const FEASIBLE_REPLY: &str = "Y";
/// Marker sent when it cannot.
pub const INFEASIBLE_REPLY: &str = "N";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Feasible(BigUint),
    Infeasible,
}

impl Verdict {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Verdict::Feasible(_))
    }

    /// The `Y`/`N` marker for this verdict.
    pub fn reply(&self) -> &'static str {
        match self {
            Verdict::Feasible(_) => FEASIBLE_REPLY,
            Verdict::Infeasible => INFEASIBLE_REPLY,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Feasible(value) => write!(f, "feasible: {}", value),
            Verdict::Infeasible => write!(f, "infeasible"),
        }
    }
}

/// `Feasible` when the goal names a known value. A missing goal is infeasible.
pub fn decide(store: &VariableStore) -> Verdict {
    store
        .goal()
        .and_then(|goal| store.get_named(goal))
        .map_or(Verdict::Infeasible, |value| Verdict::Feasible(value.clone()))
}
