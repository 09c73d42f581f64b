use std::time::Instant;

use log::{debug, trace, warn};

use crate::cnf::cnf::{Cnf, Lit};

use super::bcp::{Formula, Propagation, Reduced, bcp, formula_from_cnf, unit_propagate};
use super::heuristic::pick_branch_var;
use super::{SolverConfig, SolverStats};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatResult {
    /// Total model over every variable, sorted by variable.
    Sat(Vec<Lit>),
    Unsat,
    /// The configured deadline passed before the search finished.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    pub result: SatResult,
    pub stats: SolverStats,
}

pub fn solve(cnf: &Cnf) -> SatResult {
    solve_with(cnf, &SolverConfig::default()).result
}

pub fn is_sat(cnf: &Cnf) -> bool {
    matches!(solve(cnf), SatResult::Sat(_))
}

pub fn solve_model(cnf: &Cnf) -> Option<Vec<Lit>> {
    match solve(cnf) {
        SatResult::Sat(m) => Some(m),
        SatResult::Unsat | SatResult::Unknown => None,
    }
}

pub fn solve_with(cnf: &Cnf, config: &SolverConfig) -> SolveReport {
    let deadline = config
        .timeout
        .and_then(|t| Instant::now().checked_add(t));
    let mut stats = SolverStats::default();
    debug!(
        "dpll start: vars={} clauses={} weight={}",
        cnf.num_vars,
        cnf.clauses.len(),
        config.weight
    );

    let outcome = if cnf.has_empty_clause() {
        Search::Exhausted
    } else {
        search(formula_from_cnf(cnf), config.weight, deadline, &mut stats)
    };

    let result = match outcome {
        Search::Model(trail) => {
            let total = cnf.num_vars.max(cnf.max_var());
            SatResult::Sat(complete_model(&trail, total))
        }
        Search::Exhausted => SatResult::Unsat,
        Search::TimedOut => {
            warn!("dpll deadline reached after {} decisions", stats.decisions);
            SatResult::Unknown
        }
    };
    debug!(
        "dpll done: sat={} decisions={} propagations={} conflicts={} max_depth={}",
        matches!(result, SatResult::Sat(_)),
        stats.decisions,
        stats.propagations,
        stats.conflicts,
        stats.max_depth
    );
    SolveReport { result, stats }
}

enum Search {
    Model(Vec<Lit>),
    Exhausted,
    TimedOut,
}

/// One pending branch: the formula and trail it starts from, and the
/// decision literal to assert first (`None` for the root).
struct Frame {
    formula: Formula,
    trail: Vec<Lit>,
    decision: Option<Lit>,
}

fn search(
    root: Formula,
    weight: f64,
    deadline: Option<Instant>,
    stats: &mut SolverStats,
) -> Search {
    let mut stack = vec![Frame {
        formula: root,
        trail: Vec::new(),
        decision: None,
    }];

    while let Some(Frame {
        formula,
        mut trail,
        decision,
    }) = stack.pop()
    {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Search::TimedOut;
        }

        let formula = match decision {
            None => formula,
            Some(lit) => {
                stats.decisions += 1;
                trace!("decide {} depth={}", lit, trail.len());
                match bcp(&formula, lit) {
                    Reduced::Formula(next) => {
                        trail.push(lit);
                        next
                    }
                    Reduced::Contradiction => {
                        stats.conflicts += 1;
                        trace!("conflict on decision {}", lit);
                        continue;
                    }
                }
            }
        };

        let before = trail.len();
        let (formula, trail) = match unit_propagate(formula, trail) {
            Propagation::Progress(f, t) => (f, t),
            Propagation::Contradiction => {
                stats.conflicts += 1;
                trace!("conflict during unit propagation");
                continue;
            }
        };
        stats.propagations += trail.len() - before;

        if formula.is_empty() {
            return Search::Model(trail);
        }

        // only empty clauses could leave nothing to pick, and those never survive bcp
        let Some(var) = pick_branch_var(&formula, weight) else {
            stats.conflicts += 1;
            continue;
        };

        // false branch sits below the true branch and resumes from the same state
        stack.push(Frame {
            formula: formula.clone(),
            trail: trail.clone(),
            decision: Some(Lit::new(var, false)),
        });
        stack.push(Frame {
            formula,
            trail,
            decision: Some(Lit::new(var, true)),
        });
        stats.max_depth = stats.max_depth.max(stack.len());
    }

    Search::Exhausted
}

/// Fills variables absent from `trail` with positive literals.
fn complete_model(trail: &[Lit], num_vars: u32) -> Vec<Lit> {
    let mut value = vec![None; num_vars as usize + 1];
    for &lit in trail {
        value[lit.var() as usize] = Some(lit.is_positive());
    }
    (1..=num_vars)
        .map(|v| Lit::new(v, value[v as usize].unwrap_or(true)))
        .collect()
}
