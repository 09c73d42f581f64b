use std::fmt;

/// A DIMACS literal: the magnitude names the variable, the sign its polarity.
///
/// The wrapped value is never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lit(i32);

impl Lit {
    pub fn new(var: u32, positive: bool) -> Self {
        debug_assert!(var != 0 && var <= i32::MAX as u32);
        let v = var as i32;
        if positive { Self(v) } else { Self(-v) }
    }

    pub fn from_dimacs(value: i64) -> Option<Self> {
        if value == 0 || value <= -(i32::MAX as i64) - 1 || value > i32::MAX as i64 {
            return None;
        }
        Some(Self(value as i32))
    }

    pub fn var(self) -> u32 {
        self.0.unsigned_abs()
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn neg(self) -> Self {
        Self(-self.0)
    }

    pub fn to_dimacs(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
    pub num_vars: u32,
    pub clauses: Vec<Vec<Lit>>,
}

impl Cnf {
    pub fn new(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, clause: Vec<Lit>) {
        self.clauses.push(clause);
    }

    pub fn from_dimacs_clauses(num_vars: u32, clauses: &[&[i32]]) -> Option<Self> {
        let mut cnf = Self::new(num_vars);
        for clause in clauses {
            let lits = clause
                .iter()
                .map(|&v| Lit::from_dimacs(v as i64))
                .collect::<Option<Vec<_>>>()?;
            cnf.add_clause(lits);
        }
        Some(cnf)
    }

    /// Largest variable mentioned by any clause, 0 for a formula without literals.
    pub fn max_var(&self) -> u32 {
        self.clauses
            .iter()
            .flatten()
            .map(|lit| lit.var())
            .max()
            .unwrap_or(0)
    }

    pub fn max_clause_width(&self) -> usize {
        self.clauses.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Vec::is_empty)
    }

    /// Index of the first clause sharing no literal with `model`.
    pub fn first_unsatisfied(&self, model: &[Lit]) -> Option<usize> {
        let mut truth = vec![None; self.max_var() as usize + 1];
        for &lit in model {
            if let Some(slot) = truth.get_mut(lit.var() as usize) {
                *slot = Some(lit.is_positive());
            }
        }
        self.clauses.iter().position(|clause| {
            !clause
                .iter()
                .any(|&lit| truth[lit.var() as usize] == Some(lit.is_positive()))
        })
    }

    pub fn is_satisfied_by(&self, model: &[Lit]) -> bool {
        self.first_unsatisfied(model).is_none()
    }
}
