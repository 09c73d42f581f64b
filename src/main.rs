use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use jwsat::bench::{BenchConfig, BenchStatus, run_benchmarks};
use jwsat::cnf::dimacs::{load_dimacs, write_dimacs, write_solution};
use jwsat::generate::{planted_ksat, random_ksat};
use jwsat::sat::SolverConfig;
use jwsat::sat::bcp::formula_from_cnf;
use jwsat::sat::dpll::{SatResult, solve_with};
use jwsat::sat::heuristic::{DEFAULT_WEIGHT, pick_branch_var};

#[derive(Debug, Parser)]
#[command(name = "jwsat")]
#[command(about = "DPLL SAT solver with Jeroslow-Wang two-sided branching")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Solve one DIMACS CNF file.
    Solve {
        path: PathBuf,
        #[arg(long, default_value_t = DEFAULT_WEIGHT)]
        weight: f64,
        #[arg(long = "timeout-ms")]
        timeout_ms: Option<u64>,
        #[arg(long)]
        verify: bool,
    },
    /// Solve every .cnf file in a folder and write a results log.
    Bench {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long, default_value = "benchmarks-results.log")]
        log: PathBuf,
        #[arg(long = "timeout-ms", default_value_t = 30000)]
        timeout_ms: u64,
        #[arg(long, default_value_t = DEFAULT_WEIGHT)]
        weight: f64,
        #[arg(long, default_value_t = false)]
        progress: bool,
    },
    /// Write a random k-SAT instance.
    Gen {
        #[arg(long)]
        vars: u32,
        #[arg(long)]
        clauses: usize,
        #[arg(long, default_value_t = 3)]
        k: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long)]
        planted: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print formula statistics.
    Stats {
        path: PathBuf,
        #[arg(long, default_value_t = DEFAULT_WEIGHT)]
        weight: f64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Cmd::Solve {
            path,
            weight,
            timeout_ms,
            verify,
        } => solve_cmd(&path, weight, timeout_ms, verify)?,
        Cmd::Bench {
            dir,
            log,
            timeout_ms,
            weight,
            progress,
        } => bench_cmd(&dir, &log, timeout_ms, weight, progress)?,
        Cmd::Gen {
            vars,
            clauses,
            k,
            seed,
            planted,
            out,
        } => gen_cmd(vars, clauses, k, seed, planted, &out)?,
        Cmd::Stats { path, weight } => stats_cmd(&path, weight)?,
    }
    Ok(())
}

fn solve_cmd(path: &Path, weight: f64, timeout_ms: Option<u64>, verify: bool) -> Result<()> {
    let config = SolverConfig {
        weight,
        timeout: timeout_ms.map(Duration::from_millis),
    };
    config.validate()?;

    let start = Instant::now();
    let cnf = load_dimacs(path).with_context(|| format!("failed to load {}", path.display()))?;
    let report = solve_with(&cnf, &config);
    let elapsed = start.elapsed();

    write_solution(std::io::stdout().lock(), &report.result)?;
    println!(
        "c decisions={} propagations={} conflicts={}",
        report.stats.decisions, report.stats.propagations, report.stats.conflicts
    );
    println!("c time: {:.2} seconds", elapsed.as_secs_f64());

    if verify {
        if let SatResult::Sat(model) = &report.result {
            if let Some(idx) = cnf.first_unsatisfied(model) {
                bail!("model does not satisfy clause {}", idx + 1);
            }
            println!("c model verified");
        }
    }
    Ok(())
}

fn bench_cmd(
    dir: &Path,
    log: &Path,
    timeout_ms: u64,
    weight: f64,
    progress: bool,
) -> Result<()> {
    let solver = SolverConfig {
        weight,
        timeout: None,
    };
    solver.validate()?;
    println!("Running on benchmarks...");
    let start = Instant::now();
    let rows = run_benchmarks(
        dir,
        log,
        &BenchConfig {
            solver,
            timeout: Duration::from_millis(timeout_ms),
            progress,
        },
    )?;
    let count = |status: BenchStatus| rows.iter().filter(|r| r.status == status).count();
    println!(
        "files={} sat={} unsat={} unknown={} parse_error={}",
        rows.len(),
        count(BenchStatus::Sat),
        count(BenchStatus::Unsat),
        count(BenchStatus::Unknown),
        count(BenchStatus::ParseError)
    );
    println!("Execution time: {:.2} seconds", start.elapsed().as_secs_f64());
    Ok(())
}

fn gen_cmd(
    vars: u32,
    clauses: usize,
    k: usize,
    seed: u64,
    planted: bool,
    out: &Path,
) -> Result<()> {
    let cnf = if planted {
        planted_ksat(vars, clauses, k, seed)?.0
    } else {
        random_ksat(vars, clauses, k, seed)?
    };
    write_dimacs(out, &cnf).with_context(|| format!("failed to write {}", out.display()))?;
    println!(
        "GEN: wrote {} | vars={} clauses={} k={} planted={}",
        out.display(),
        vars,
        cnf.clauses.len(),
        k,
        planted
    );
    Ok(())
}

fn stats_cmd(path: &Path, weight: f64) -> Result<()> {
    let cnf = load_dimacs(path).with_context(|| format!("failed to load {}", path.display()))?;
    let formula = formula_from_cnf(&cnf);
    println!("num_vars={}", cnf.num_vars);
    println!("num_clauses={}", cnf.clauses.len());
    println!("max_var={}", cnf.max_var());
    println!("max_clause_width={}", cnf.max_clause_width());
    match pick_branch_var(&formula, weight) {
        Some(v) => println!("jw2s_pick={}", v),
        None => println!("jw2s_pick=none"),
    }
    Ok(())
}
