mod logging;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tabula_solver::{Pivot, RatioTest, SolveError, Solver, Summary, Tableau};

#[derive(Parser)]
#[command(name = "tabula")]
#[command(about = "Tableau Simplex solver for standard-form linear programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a matrix file and print every tableau
    Solve {
        /// The matrix file: objective line, then one "<=" constraint per line
        file: PathBuf,
        /// Leaving-row rule
        #[arg(long, value_enum, default_value_t = RatioRule::Strict)]
        ratio_test: RatioRule,
        /// Stop with an error after this many pivots
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
        /// Only print the final summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Check a matrix file for errors
    Check {
        /// The file to check
        file: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RatioRule {
    /// Positive entering coefficients only; degenerate rows stay eligible
    Strict,
    /// Zero ratios are discarded
    Legacy,
}

impl From<RatioRule> for RatioTest {
    fn from(rule: RatioRule) -> Self {
        match rule {
            RatioRule::Strict => RatioTest::Strict,
            RatioRule::Legacy => RatioTest::Legacy,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Serialize)]
struct Iteration {
    pivot: Pivot,
    tableau: Tableau,
}

#[derive(Serialize)]
struct Report {
    status: &'static str,
    initial: Tableau,
    iterations: Vec<Iteration>,
    summary: Option<Summary>,
    error: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match cli.command {
        Commands::Solve {
            file,
            ratio_test,
            max_iterations,
            format,
            quiet,
        } => {
            let tableau = match tabula_reader::load_file(&file) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            tracing::debug!(
                component = "cli",
                operation = "load",
                status = "success",
                file = %file.display(),
                rows = tableau.num_rows(),
                columns = tableau.num_columns(),
                "Loaded matrix"
            );

            let mut solver = Solver::new().with_ratio_test(ratio_test.into());
            if let Some(max) = max_iterations {
                solver = solver.with_max_iterations(max);
            }

            match format {
                Format::Pretty => solve_pretty(&solver, tableau, quiet),
                Format::Json => solve_json(&solver, tableau, quiet),
            }
        }
        Commands::Check { file } => match tabula_reader::load_file(&file) {
            Ok(tableau) => {
                println!("✓ {} is valid", file.display());
                println!("  {} decision variables", tableau.num_decision());
                println!("  {} constraints", tableau.num_rows());
            }
            Err(e) => {
                eprintln!("✗ {} has errors:", file.display());
                eprintln!("  {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn solve_pretty(solver: &Solver, tableau: Tableau, quiet: bool) {
    if !quiet {
        println!("Initial tableau:");
        print!("{}", render::tableau(&tableau));
    }

    let result = solver.solve_with(tableau, |pivot, tableau| {
        if !quiet {
            println!();
            println!("{}", render::pivot(pivot));
            print!("{}", render::tableau(tableau));
        }
    });

    println!();
    match result {
        Ok(solved) => {
            println!("Status: OPTIMAL ({} pivots)", solved.pivots);
            print!("{}", render::summary(&solved.tableau.summary()));
        }
        Err(e @ SolveError::Unbounded { .. }) => {
            println!("Status: UNBOUNDED");
            println!("{}", e);
            std::process::exit(1);
        }
        Err(e) => {
            println!("Status: ERROR");
            println!("{}", e);
            std::process::exit(1);
        }
    }
}

fn solve_json(solver: &Solver, tableau: Tableau, quiet: bool) {
    let initial = tableau.clone();
    let mut iterations = Vec::new();

    let result = solver.solve_with(tableau, |pivot, tableau| {
        if !quiet {
            iterations.push(Iteration {
                pivot: pivot.clone(),
                tableau: tableau.clone(),
            });
        }
    });

    let failed = result.is_err();
    let report = match result {
        Ok(solved) => Report {
            status: "optimal",
            initial,
            iterations,
            summary: Some(solved.tableau.summary()),
            error: None,
        },
        Err(e) => Report {
            status: match e {
                SolveError::Unbounded { .. } => "unbounded",
                _ => "error",
            },
            initial,
            iterations,
            summary: None,
            error: Some(e.to_string()),
        },
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
    if failed {
        std::process::exit(1);
    }
}
