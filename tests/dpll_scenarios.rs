use jwsat::cnf::cnf::{Cnf, Lit};
use jwsat::cnf::dimacs::parse_dimacs_str;
use jwsat::generate::planted_ksat;
use jwsat::sat::SolverConfig;
use jwsat::sat::dpll::{SatResult, is_sat, solve, solve_model, solve_with};

fn dimacs(model: &[Lit]) -> Vec<i32> {
    model.iter().map(|l| l.to_dimacs()).collect()
}

#[test]
fn unit_formula_from_text() {
    let cnf = parse_dimacs_str("p cnf 1 1\n1 0\n").expect("parse");
    let model = solve_model(&cnf).expect("sat");
    assert_eq!(dimacs(&model), vec![1]);
}

#[test]
fn contradicting_units_from_text() {
    let cnf = parse_dimacs_str("c trivial\np cnf 1 2\n1 0\n-1 0\n").expect("parse");
    assert_eq!(solve(&cnf), SatResult::Unsat);
}

#[test]
fn three_binary_clauses_are_sat() {
    let cnf = parse_dimacs_str("p cnf 2 3\n1 2 0\n-1 2 0\n1 -2 0\n").expect("parse");
    let model = solve_model(&cnf).expect("sat");
    assert_eq!(model.len(), 2);
    assert!(cnf.is_satisfied_by(&model));
}

#[test]
fn four_binary_clauses_are_unsat() {
    let cnf = parse_dimacs_str("p cnf 2 4\n1 2 0\n-1 2 0\n1 -2 0\n-1 -2 0\n").expect("parse");
    assert!(!is_sat(&cnf));
}

#[test]
fn no_clauses_gives_all_positive_model() {
    let cnf = parse_dimacs_str("p cnf 3 0\n").expect("parse");
    let model = solve_model(&cnf).expect("sat");
    assert_eq!(dimacs(&model), vec![1, 2, 3]);
}

#[test]
fn pigeonhole_four_into_three_is_unsat() {
    // p(i, h) = pigeon i sits in hole h
    let var = |i: u32, h: u32| i * 3 + h + 1;
    let mut cnf = Cnf::new(12);
    for i in 0..4 {
        cnf.add_clause((0..3).map(|h| Lit::new(var(i, h), true)).collect());
    }
    for h in 0..3 {
        for i in 0..4 {
            for j in (i + 1)..4 {
                cnf.add_clause(vec![Lit::new(var(i, h), false), Lit::new(var(j, h), false)]);
            }
        }
    }
    let report = solve_with(&cnf, &SolverConfig::default());
    assert_eq!(report.result, SatResult::Unsat);
    assert!(report.stats.conflicts > 0);
    assert!(report.stats.max_depth <= 2 * 12 + 1);
}

#[test]
fn planted_instances_are_solved() {
    for seed in 0..5 {
        let (cnf, _) = planted_ksat(40, 170, 3, seed).expect("gen");
        let model = solve_model(&cnf).expect("planted instance is sat");
        assert_eq!(model.len(), 40);
        assert!(cnf.is_satisfied_by(&model));
        for (i, lit) in model.iter().enumerate() {
            assert_eq!(lit.var(), i as u32 + 1);
        }
    }
}

#[test]
fn long_implication_chain_is_propagated() {
    // x1 and (xi -> xi+1) for a long chain, plus a branch point at the end
    let n = 2_000u32;
    let mut cnf = Cnf::new(n + 2);
    cnf.add_clause(vec![Lit::new(1, true)]);
    for v in 1..n {
        cnf.add_clause(vec![Lit::new(v, false), Lit::new(v + 1, true)]);
    }
    cnf.add_clause(vec![Lit::new(n + 1, true), Lit::new(n + 2, true)]);
    let model = solve_model(&cnf).expect("sat");
    assert!(cnf.is_satisfied_by(&model));
    assert!(model[..n as usize].iter().all(|l| l.is_positive()));
}

#[test]
fn deep_decision_stack_stays_bounded() {
    // independent binary clauses force one decision per pair
    let pairs = 1_000u32;
    let mut cnf = Cnf::new(2 * pairs);
    for p in 0..pairs {
        cnf.add_clause(vec![Lit::new(2 * p + 1, true), Lit::new(2 * p + 2, true)]);
    }
    let report = solve_with(&cnf, &SolverConfig::default());
    let SatResult::Sat(model) = report.result else {
        panic!("expected sat");
    };
    assert!(cnf.is_satisfied_by(&model));
    assert_eq!(report.stats.decisions, pairs as usize);
    assert!(report.stats.max_depth <= pairs as usize + 1);
}

#[test]
fn other_weights_still_solve() {
    let cnf = parse_dimacs_str("p cnf 3 4\n1 2 3 0\n-1 -2 0\n-2 -3 0\n-1 -3 0\n").expect("parse");
    for weight in [1.5, 3.0, 10.0] {
        let cfg = SolverConfig {
            weight,
            ..SolverConfig::default()
        };
        let SatResult::Sat(model) = solve_with(&cnf, &cfg).result else {
            panic!("expected sat for weight {weight}");
        };
        assert!(cnf.is_satisfied_by(&model));
    }
}
