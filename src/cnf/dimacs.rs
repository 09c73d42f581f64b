use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::warn;
use thiserror::Error;

use super::cnf::{Cnf, Lit};
use crate::sat::dpll::SatResult;

const LITS_PER_LINE: usize = 10;

#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("failed to read dimacs input")]
    Io(#[from] io::Error),
    #[error("line {line}: expected the `p cnf` header first")]
    MissingHeader { line: usize },
    #[error("line {line}: second `p` header")]
    DuplicateHeader { line: usize },
    #[error("line {line}: invalid header ({reason})")]
    BadHeader { line: usize, reason: String },
    #[error("line {line}: invalid literal `{token}`")]
    BadLiteral { line: usize, token: String },
    #[error("line {line}: clause is not terminated by 0")]
    MissingTerminator { line: usize },
    #[error("line {line}: literal 0 before the end of the clause")]
    ZeroInsideClause { line: usize },
}

pub fn parse_dimacs_str(s: &str) -> Result<Cnf, DimacsError> {
    parse_dimacs_reader(io::Cursor::new(s.as_bytes()))
}

pub fn load_dimacs<P: AsRef<Path>>(path: P) -> Result<Cnf, DimacsError> {
    let file = File::open(path)?;
    parse_dimacs_reader(BufReader::new(file))
}

/// Reads a line-oriented DIMACS CNF file: one clause per line, each ending in `0`.
pub fn parse_dimacs_reader<R: BufRead>(r: R) -> Result<Cnf, DimacsError> {
    let mut header: Option<(u32, usize)> = None;
    let mut clauses = Vec::new();
    let mut line_no = 0usize;

    for line in r.lines() {
        let line = line?;
        line_no += 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }
        // satlib trailer
        if trimmed.starts_with('%') {
            break;
        }
        if trimmed.starts_with('p') {
            if header.is_some() {
                return Err(DimacsError::DuplicateHeader { line: line_no });
            }
            header = Some(parse_header(trimmed, line_no)?);
            continue;
        }
        if header.is_none() {
            return Err(DimacsError::MissingHeader { line: line_no });
        }
        clauses.push(parse_clause(trimmed, line_no)?);
    }

    let Some((num_vars, declared)) = header else {
        return Err(DimacsError::MissingHeader { line: line_no + 1 });
    };
    if declared != clauses.len() {
        warn!(
            "header declares {} clauses but {} were read",
            declared,
            clauses.len()
        );
    }

    Ok(Cnf { num_vars, clauses })
}

fn parse_header(line: &str, line_no: usize) -> Result<(u32, usize), DimacsError> {
    let bad = |reason: &str| DimacsError::BadHeader {
        line: line_no,
        reason: reason.to_string(),
    };
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() != 4 || parts[0] != "p" {
        return Err(bad("expected: p cnf <vars> <clauses>"));
    }
    if parts[1] != "cnf" {
        return Err(bad("only the cnf format is supported"));
    }
    let num_vars = parts[2]
        .parse::<u32>()
        .map_err(|_| bad("variable count is not a non-negative integer"))?;
    if num_vars > i32::MAX as u32 {
        return Err(bad("variable count does not fit a literal"));
    }
    let num_clauses = parts[3]
        .parse::<usize>()
        .map_err(|_| bad("clause count is not a non-negative integer"))?;
    Ok((num_vars, num_clauses))
}

fn parse_clause(line: &str, line_no: usize) -> Result<Vec<Lit>, DimacsError> {
    let mut values = Vec::new();
    for token in line.split_whitespace() {
        let v = token
            .parse::<i64>()
            .map_err(|_| DimacsError::BadLiteral {
                line: line_no,
                token: token.to_string(),
            })?;
        values.push((v, token));
    }

    match values.pop() {
        Some((0, _)) => {}
        _ => return Err(DimacsError::MissingTerminator { line: line_no }),
    }

    let mut clause = Vec::with_capacity(values.len());
    for (v, token) in values {
        if v == 0 {
            return Err(DimacsError::ZeroInsideClause { line: line_no });
        }
        let lit = Lit::from_dimacs(v).ok_or_else(|| DimacsError::BadLiteral {
            line: line_no,
            token: token.to_string(),
        })?;
        clause.push(lit);
    }
    Ok(clause)
}

pub fn to_dimacs(cnf: &Cnf) -> String {
    let mut out = String::new();
    out.push_str(&format!("p cnf {} {}\n", cnf.num_vars, cnf.clauses.len()));
    for clause in &cnf.clauses {
        for &lit in clause {
            out.push_str(&format!("{} ", lit));
        }
        out.push_str("0\n");
    }
    out
}

pub fn write_dimacs<P: AsRef<Path>>(path: P, cnf: &Cnf) -> io::Result<()> {
    std::fs::write(path, to_dimacs(cnf))
}

/// Writes a result in the SAT competition output format.
pub fn write_solution<W: Write>(writer: W, result: &SatResult) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    match result {
        SatResult::Sat(model) => {
            writeln!(writer, "s SATISFIABLE")?;
            for chunk in model.chunks(LITS_PER_LINE) {
                let line = chunk
                    .iter()
                    .map(|lit| lit.to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(writer, "v {line}")?;
            }
            writeln!(writer, "v 0")?;
        }
        SatResult::Unsat => writeln!(writer, "s UNSATISFIABLE")?,
        SatResult::Unknown => writeln!(writer, "s UNKNOWN")?,
    }
    writer.flush()
}
