use indexmap::IndexMap;

use super::bcp::Clause;

pub const DEFAULT_WEIGHT: f64 = 2.0;

/// Two-sided Jeroslow-Wang scores keyed by variable.
///
/// Every occurrence of a variable in a clause of length `L` adds `weight^-L`,
/// regardless of polarity. Keys keep first-seen order.
pub fn jw2s_scores(formula: &[Clause], weight: f64) -> IndexMap<u32, f64> {
    let mut scores = IndexMap::<u32, f64>::new();
    for clause in formula {
        let share = weight.powi(-(clause.len().min(i32::MAX as usize) as i32));
        for lit in clause.iter() {
            *scores.entry(lit.var()).or_insert(0.0) += share;
        }
    }
    scores
}

/// Variable with the highest score; on ties the one seen first wins.
/// Returns `None` when the formula mentions no variable.
pub fn pick_branch_var(formula: &[Clause], weight: f64) -> Option<u32> {
    let scores = jw2s_scores(formula, weight);
    let mut best: Option<(u32, f64)> = None;
    for (&var, &score) in &scores {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((var, score)),
        }
    }
    best.map(|(var, _)| var)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_WEIGHT, jw2s_scores, pick_branch_var};
    use crate::cnf::cnf::Lit;
    use crate::sat::bcp::{Clause, Formula};

    fn formula(clauses: &[&[i32]]) -> Formula {
        clauses
            .iter()
            .map(|c| {
                Clause::from(
                    c.iter()
                        .map(|&v| Lit::from_dimacs(v as i64).expect("lit"))
                        .collect::<Vec<_>>(),
                )
            })
            .collect()
    }

    #[test]
    fn both_polarities_share_a_counter() {
        let f = formula(&[&[1, 2], &[-1, 3, 4]]);
        let scores = jw2s_scores(&f, DEFAULT_WEIGHT);
        assert_eq!(scores[&1], 0.25 + 0.125);
        assert_eq!(scores[&2], 0.25);
        assert_eq!(scores[&3], 0.125);
        assert_eq!(scores.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn short_clauses_dominate() {
        // 5 appears once in a binary clause, 1 three times in long clauses
        let f = formula(&[&[1, 2, 3, 4], &[1, -2, 3, 6], &[-1, 3, 4, 7], &[5, 8]]);
        let scores = jw2s_scores(&f, DEFAULT_WEIGHT);
        assert_eq!(scores[&1], 3.0 / 16.0);
        assert_eq!(scores[&5], 0.25);
        assert_eq!(pick_branch_var(&f, DEFAULT_WEIGHT), Some(5));

        let g = formula(&[&[1, 2, 3], &[-4, 5]]);
        assert_eq!(pick_branch_var(&g, DEFAULT_WEIGHT), Some(4));
    }

    #[test]
    fn ties_go_to_first_seen_variable() {
        let f = formula(&[&[3, 1], &[-1, -3]]);
        assert_eq!(pick_branch_var(&f, DEFAULT_WEIGHT), Some(3));
    }

    #[test]
    fn empty_formula_has_no_pick() {
        assert_eq!(pick_branch_var(&[], DEFAULT_WEIGHT), None);
    }
}
