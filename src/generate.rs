use anyhow::{Result, bail};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cnf::cnf::{Cnf, Lit};

/// Uniform random k-SAT: each clause has `k` distinct variables with random signs.
pub fn random_ksat(vars: u32, clauses: usize, k: usize, seed: u64) -> Result<Cnf> {
    check_shape(vars, k)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut cnf = Cnf::new(vars);
    for _ in 0..clauses {
        let clause = sample_clause(&mut rng, vars, k);
        cnf.add_clause(clause);
    }
    Ok(cnf)
}

/// Random k-SAT agreeing with a hidden assignment, which is returned as a
/// total model sorted by variable.
pub fn planted_ksat(vars: u32, clauses: usize, k: usize, seed: u64) -> Result<(Cnf, Vec<Lit>)> {
    check_shape(vars, k)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let hidden = (1..=vars)
        .map(|v| Lit::new(v, rng.random::<bool>()))
        .collect::<Vec<_>>();

    let mut cnf = Cnf::new(vars);
    for _ in 0..clauses {
        let mut clause = sample_clause(&mut rng, vars, k);
        let agrees = clause
            .iter()
            .any(|lit| hidden[lit.var() as usize - 1] == *lit);
        if !agrees {
            // flip one literal so the hidden model satisfies this clause
            let idx = rng.random_range(0..clause.len());
            clause[idx] = clause[idx].neg();
        }
        cnf.add_clause(clause);
    }
    Ok((cnf, hidden))
}

fn check_shape(vars: u32, k: usize) -> Result<()> {
    if k == 0 {
        bail!("clause width k must be >= 1");
    }
    if k > vars as usize {
        bail!("clause width k={} exceeds variable count {}", k, vars);
    }
    if vars > i32::MAX as u32 {
        bail!("variable count {} does not fit a literal", vars);
    }
    Ok(())
}

fn sample_clause(rng: &mut ChaCha8Rng, vars: u32, k: usize) -> Vec<Lit> {
    let mut picked = rand::seq::index::sample(rng, vars as usize, k)
        .into_iter()
        .map(|i| i as u32 + 1)
        .collect::<Vec<_>>();
    picked.sort_unstable();
    picked
        .into_iter()
        .map(|v| Lit::new(v, rng.random::<bool>()))
        .collect()
}
