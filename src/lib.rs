//! DPLL satisfiability solver for DIMACS CNF formulas, branching with the
//! two-sided Jeroslow-Wang heuristic.

pub mod bench;
pub mod cnf;
pub mod generate;
pub mod sat;
