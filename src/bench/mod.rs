use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::cnf::cnf::Lit;
use crate::cnf::dimacs::load_dimacs;
use crate::sat::dpll::{SatResult, solve_with};
use crate::sat::{SolverConfig, SolverStats};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchConfig {
    pub solver: SolverConfig,
    /// Wall-clock budget per file.
    pub timeout: Duration,
    pub progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchStatus {
    Sat,
    Unsat,
    Unknown,
    ParseError,
    InternalError,
}

impl BenchStatus {
    pub fn label(self) -> &'static str {
        match self {
            BenchStatus::Sat => "SAT",
            BenchStatus::Unsat => "UNSAT",
            BenchStatus::Unknown => "UNKNOWN",
            BenchStatus::ParseError => "PARSE_ERROR",
            BenchStatus::InternalError => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchRow {
    pub path: String,
    pub status: BenchStatus,
    pub wall_ms: Option<u128>,
    pub vars: Option<u32>,
    pub clauses: Option<usize>,
    pub stats: Option<SolverStats>,
    pub model: Option<Vec<Lit>>,
}

impl BenchRow {
    fn empty(path: &Path, status: BenchStatus) -> Self {
        Self {
            path: path.to_string_lossy().to_string(),
            status,
            wall_ms: None,
            vars: None,
            clauses: None,
            stats: None,
            model: None,
        }
    }

    pub fn file_name(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }

    /// `name : SAT  [1,-2,3,]` or `name : UNSAT`.
    pub fn log_line(&self) -> String {
        let mut line = format!("{} : {}", self.file_name(), self.status.label());
        if let Some(model) = &self.model {
            line.push_str("  [");
            for lit in model {
                line.push_str(&format!("{},", lit));
            }
            line.push(']');
        }
        line
    }
}

pub fn run_one(path: &Path, cfg: &BenchConfig) -> BenchRow {
    let start = Instant::now();
    let p = path.to_path_buf();
    let mut solver_cfg = cfg.solver;
    solver_cfg.timeout = Some(solver_cfg.timeout.map_or(cfg.timeout, |t| t.min(cfg.timeout)));
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        let row = run_one_inner(&p, &solver_cfg);
        let _ = tx.send(row);
    });

    let mut row = match rx.recv_timeout(cfg.timeout) {
        Ok(row) => row,
        Err(mpsc::RecvTimeoutError::Timeout) => BenchRow::empty(path, BenchStatus::Unknown),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            BenchRow::empty(path, BenchStatus::InternalError)
        }
    };
    row.wall_ms = Some(start.elapsed().as_millis());
    row
}

fn run_one_inner(path: &Path, cfg: &SolverConfig) -> BenchRow {
    let cnf = match load_dimacs(path) {
        Ok(v) => v,
        Err(e) => {
            warn!("{}: {}", path.display(), e);
            return BenchRow::empty(path, BenchStatus::ParseError);
        }
    };

    let report = solve_with(&cnf, cfg);
    let mut row = BenchRow::empty(path, BenchStatus::Unknown);
    row.vars = Some(cnf.num_vars);
    row.clauses = Some(cnf.clauses.len());
    row.stats = Some(report.stats);
    match report.result {
        SatResult::Sat(model) => {
            row.status = BenchStatus::Sat;
            row.model = Some(model);
        }
        SatResult::Unsat => row.status = BenchStatus::Unsat,
        SatResult::Unknown => {}
    }
    row
}

/// Solves every `.cnf` file under `dir` and writes one log line per file.
pub fn run_benchmarks(dir: &Path, log_path: &Path, cfg: &BenchConfig) -> Result<Vec<BenchRow>> {
    let paths = discover_paths(dir)
        .with_context(|| format!("failed to list benchmark dir {}", dir.display()))?;
    let mut log = File::create(log_path)
        .with_context(|| format!("failed to create {}", log_path.display()))?;

    let start = Instant::now();
    let mut rows = Vec::with_capacity(paths.len());
    for path in paths {
        let row = run_one(&path, cfg);
        if cfg.progress {
            println!(
                "path={} status={} wall_ms={}",
                row.path,
                row.status.label(),
                row.wall_ms.unwrap_or_default()
            );
        }
        writeln!(log, "{}", row.log_line())?;
        log.flush()?;
        rows.push(row);
    }
    info!(
        "benchmarks: {} files in {:.2}s",
        rows.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(rows)
}

fn discover_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::<PathBuf>::new();
    collect_paths(dir, &mut out)?;
    out.sort();
    Ok(out)
}

fn collect_paths(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let p = entry.path();
        if p.is_dir() {
            collect_paths(&p, out)?;
            continue;
        }
        if p.extension().and_then(|x| x.to_str()) == Some("cnf") {
            out.push(p);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BenchRow, BenchStatus};
    use crate::cnf::cnf::Lit;

    #[test]
    fn log_line_formats() {
        let mut row = BenchRow::empty(std::path::Path::new("/tmp/x/uf20.cnf"), BenchStatus::Sat);
        row.model = Some(vec![Lit::new(1, true), Lit::new(2, false)]);
        assert_eq!(row.log_line(), "uf20.cnf : SAT  [1,-2,]");

        let row = BenchRow::empty(std::path::Path::new("uuf.cnf"), BenchStatus::Unsat);
        assert_eq!(row.log_line(), "uuf.cnf : UNSAT");
    }
}
