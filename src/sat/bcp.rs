use std::rc::Rc;

use crate::cnf::cnf::{Cnf, Lit};

/// Clause shared between search branches; never mutated once built.
pub type Clause = Rc<[Lit]>;

/// The working formula of one search branch.
pub type Formula = Vec<Clause>;

pub fn formula_from_cnf(cnf: &Cnf) -> Formula {
    cnf.clauses
        .iter()
        .map(|clause| Clause::from(clause.as_slice()))
        .collect()
}

/// Outcome of assuming one literal true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduced {
    Formula(Formula),
    /// Some clause lost its last literal.
    Contradiction,
}

/// Outcome of unit propagation to fixpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Propagation {
    /// Residual formula (possibly empty) and the literals forced on the way.
    Progress(Formula, Vec<Lit>),
    Contradiction,
}

/// Simplifies `formula` under `lit`: satisfied clauses are dropped and `-lit`
/// is removed from the rest. Stops at the first clause that becomes empty.
pub fn bcp(formula: &[Clause], lit: Lit) -> Reduced {
    let neg = lit.neg();
    let mut out = Vec::with_capacity(formula.len());

    for clause in formula {
        if clause.contains(&lit) {
            continue;
        }
        if clause.contains(&neg) {
            let shorter = clause
                .iter()
                .copied()
                .filter(|&l| l != neg)
                .collect::<Vec<_>>();
            if shorter.is_empty() {
                return Reduced::Contradiction;
            }
            out.push(Clause::from(shorter));
        } else {
            out.push(Rc::clone(clause));
        }
    }

    Reduced::Formula(out)
}

fn find_unit(formula: &[Clause]) -> Option<Lit> {
    formula
        .iter()
        .find(|clause| clause.len() == 1)
        .map(|clause| clause[0])
}

/// Applies [`bcp`] to the first unit clause until none is left, the formula
/// is empty, or a contradiction appears. Forced literals are appended to
/// `trail` in the order they were applied.
pub fn unit_propagate(mut formula: Formula, mut trail: Vec<Lit>) -> Propagation {
    while let Some(unit) = find_unit(&formula) {
        formula = match bcp(&formula, unit) {
            Reduced::Formula(next) => next,
            Reduced::Contradiction => return Propagation::Contradiction,
        };
        trail.push(unit);
        if formula.is_empty() {
            break;
        }
    }
    Propagation::Progress(formula, trail)
}

#[cfg(test)]
mod tests {
    use super::{Clause, Formula, Propagation, Reduced, bcp, unit_propagate};
    use crate::cnf::cnf::Lit;

    fn lit(v: i32) -> Lit {
        Lit::from_dimacs(v as i64).expect("non-zero literal")
    }

    fn formula(clauses: &[&[i32]]) -> Formula {
        clauses
            .iter()
            .map(|c| Clause::from(c.iter().map(|&v| lit(v)).collect::<Vec<_>>()))
            .collect()
    }

    fn dimacs(f: &[Clause]) -> Vec<Vec<i32>> {
        f.iter()
            .map(|c| c.iter().map(|l| l.to_dimacs()).collect())
            .collect()
    }

    #[test]
    fn bcp_drops_satisfied_and_shortens_falsified() {
        let f = formula(&[&[1, 2], &[-1, 3], &[2, 3], &[-1, -2, 4]]);
        let Reduced::Formula(out) = bcp(&f, lit(1)) else {
            panic!("unexpected contradiction");
        };
        assert_eq!(dimacs(&out), vec![vec![3], vec![2, 3], vec![-2, 4]]);
    }

    #[test]
    fn bcp_shares_untouched_clauses() {
        let f = formula(&[&[2, 3], &[-1, 3]]);
        let Reduced::Formula(out) = bcp(&f, lit(1)) else {
            panic!("unexpected contradiction");
        };
        assert!(std::rc::Rc::ptr_eq(&f[0], &out[0]));
        assert!(!std::rc::Rc::ptr_eq(&f[1], &out[1]));
    }

    #[test]
    fn bcp_signals_contradiction_on_emptied_clause() {
        let f = formula(&[&[1], &[-1]]);
        assert_eq!(bcp(&f, lit(1)), Reduced::Contradiction);
    }

    #[test]
    fn bcp_satisfying_everything_is_not_a_contradiction() {
        let f = formula(&[&[1, 2], &[1]]);
        assert_eq!(bcp(&f, lit(1)), Reduced::Formula(Vec::new()));
    }

    #[test]
    fn unit_chain_is_followed() {
        let f = formula(&[&[1], &[-1, 2], &[-2, 3], &[3, 4, 5], &[-3, 4, 6]]);
        match unit_propagate(f, Vec::new()) {
            Propagation::Progress(rest, trail) => {
                assert_eq!(trail, vec![lit(1), lit(2), lit(3)]);
                assert_eq!(dimacs(&rest), vec![vec![4, 6]]);
            }
            Propagation::Contradiction => panic!("unexpected contradiction"),
        }
    }

    #[test]
    fn unit_conflict_discards_trail() {
        let f = formula(&[&[1], &[-1, 2], &[-2, -1]]);
        assert_eq!(unit_propagate(f, vec![lit(7)]), Propagation::Contradiction);
    }

    #[test]
    fn fixpoint_is_stable() {
        let f = formula(&[&[1], &[-1, 2, 3], &[2, -3]]);
        let Propagation::Progress(rest, trail) = unit_propagate(f, Vec::new()) else {
            panic!("unexpected contradiction");
        };
        let Propagation::Progress(again, trail2) = unit_propagate(rest.clone(), trail.clone())
        else {
            panic!("unexpected contradiction");
        };
        assert_eq!(again, rest);
        assert_eq!(trail2, trail);
    }

    #[test]
    fn empty_formula_after_units_is_success() {
        let f = formula(&[&[1], &[1, 2]]);
        assert_eq!(
            unit_propagate(f, Vec::new()),
            Propagation::Progress(Vec::new(), vec![lit(1)])
        );
    }
}
