//! CLI entry point for the jug solver.
//!
//! Usage:
//!   jug-solver solve <puzzle.json> [--algorithm BFS] [--pretty]
//!   jug-solver solve --stdin [options]
//!   jug-solver hint <puzzle.json> [--algorithm BFS] [--state 5,0]
//!   jug-solver compare <puzzle.json> [--pretty]
//!
//! The puzzle JSON carries `capacities`, `initialState` and `goalState`
//! arrays. Output is JSON on stdout; `solve` exits 0 when a solution
//! exists and 1 when the goal is unreachable.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use jug_solver::{get_hint, solve, JugConfig, JugState, SearchAlgorithm, SearchAnalytics};

#[derive(Parser)]
#[command(name = "jug-solver")]
#[command(about = "Search-based solver for generalized water jug puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle and print the full solver result
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Search strategy: BFS, DFS, IDDFS, UCS or A*
        #[arg(long, default_value = "BFS", value_parser = parse_algorithm)]
        algorithm: SearchAlgorithm,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Suggest the next move from a given state
    Hint {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Search strategy: BFS, DFS, IDDFS, UCS or A*
        #[arg(long, default_value = "BFS", value_parser = parse_algorithm)]
        algorithm: SearchAlgorithm,

        /// Current fill levels, comma-separated (defaults to initialState)
        #[arg(long)]
        state: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Run all five strategies on the same puzzle and print their analytics
    Compare {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn parse_algorithm(tag: &str) -> Result<SearchAlgorithm, String> {
    SearchAlgorithm::from_tag(tag)
        .ok_or_else(|| format!("unknown algorithm '{tag}' (expected BFS, DFS, IDDFS, UCS or A*)"))
}

/// Output when a puzzle has no solution
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NoSolutionOutput {
    solvable: bool,
    algorithm: SearchAlgorithm,
}

/// One row of the `compare` output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonEntry {
    algorithm: SearchAlgorithm,
    solvable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analytics: Option<SearchAnalytics>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            algorithm,
            pretty,
        } => {
            let config = read_config(file, stdin);
            match solve(
                &config.initial_state,
                &config.goal_state,
                &config.capacities,
                algorithm,
            ) {
                Some(result) => {
                    print_json(&result, pretty);
                }
                None => {
                    print_json(
                        &NoSolutionOutput {
                            solvable: false,
                            algorithm,
                        },
                        pretty,
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Hint {
            file,
            stdin,
            algorithm,
            state,
            pretty,
        } => {
            let config = read_config(file, stdin);
            let current_state = match state {
                Some(s) => parse_state(&s),
                None => config.initial_state.clone(),
            };
            let hint = get_hint(
                &current_state,
                &config.goal_state,
                &config.capacities,
                algorithm,
            );
            print_json(&hint, pretty);
            if hint.steps_to_goal < 0 {
                std::process::exit(1);
            }
        }

        Commands::Compare { file, stdin, pretty } => {
            let config = read_config(file, stdin);
            let entries: Vec<ComparisonEntry> = SearchAlgorithm::ALL
                .into_iter()
                .map(|algorithm| {
                    let result = solve(
                        &config.initial_state,
                        &config.goal_state,
                        &config.capacities,
                        algorithm,
                    );
                    ComparisonEntry {
                        algorithm,
                        solvable: result.is_some(),
                        solution_depth: result.as_ref().map(|r| r.moves.len()),
                        analytics: result.map(|r| r.analytics),
                    }
                })
                .collect();
            print_json(&entries, pretty);
        }
    }
}

fn read_config(file: Option<PathBuf>, stdin: bool) -> JugConfig {
    let json_content = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .expect("Failed to read from stdin");
        buffer
    } else if let Some(path) = file {
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read file {:?}: {}", path, e))
    } else {
        eprintln!("Error: Must provide either a file path or --stdin");
        std::process::exit(2);
    };

    match serde_json::from_str(&json_content) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error parsing puzzle JSON: {}", e);
            std::process::exit(2);
        }
    }
}

fn parse_state(raw: &str) -> JugState {
    raw.split(',')
        .map(|part| {
            part.trim().parse().unwrap_or_else(|_| {
                eprintln!("Error: invalid fill level '{}' in --state", part.trim());
                std::process::exit(2);
            })
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    println!("{}", json.expect("serialization cannot fail"));
}
