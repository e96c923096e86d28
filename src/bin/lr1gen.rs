//! CLI launcher: load a grammar, build its tables, and optionally run the
//! table-driven driver over a token file, reporting wall-clock timings the
//! way the reference `alap_gen_ng` binary does.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser as ClapParser, Subcommand};
use log::info;
use serde::Deserialize;

use lr1_runtime::{ByKind, Driver};
use lr1gen::{build_automaton, build_tables, Grammar};
use tokenstream::{Location, Token, TokenStream};

/// Mirrors the three failure kinds laid out for this driver: a malformed
/// grammar never reaches table construction, an ambiguous one fails during
/// it, and a bad input fails only once the driver runs. Each gets its own
/// exit code so a caller can tell them apart without parsing stderr.
enum AppError {
    Config(String),
    Conflict(String),
    Parse(String),
    Io(String),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::Parse(_) => 1,
            AppError::Conflict(_) => 2,
            AppError::Config(_) => 3,
            AppError::Io(_) => 4,
        }
    }

    fn message(&self) -> &str {
        match self {
            AppError::Config(m) | AppError::Conflict(m) | AppError::Parse(m) | AppError::Io(m) => m,
        }
    }
}

#[derive(ClapParser)]
#[command(name = "lr1gen", about = "LR(1) table generator and driver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build ACTION/GOTO tables for a grammar and report how long it took.
    Build {
        grammar: PathBuf,
        #[arg(long)]
        dump_tables: Option<PathBuf>,
    },
    /// Build tables, then parse a token file against them.
    Parse {
        grammar: PathBuf,
        tokens: PathBuf,
        #[arg(long)]
        trace: bool,
    },
}

#[derive(Debug, Deserialize)]
struct TokenRecord {
    kind: String,
    lexeme: String,
    line: usize,
    offset: usize,
}

fn load_grammar(path: &PathBuf) -> Result<Grammar, AppError> {
    let file = File::open(path).map_err(|e| AppError::Io(format!("cannot open {}: {}", path.display(), e)))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::Config(format!("malformed grammar: {}", e)))
}

fn load_tokens(path: &PathBuf) -> Result<Vec<Token<String>>, AppError> {
    let file = File::open(path).map_err(|e| AppError::Io(format!("cannot open {}: {}", path.display(), e)))?;
    let records: Vec<TokenRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::Io(format!("malformed token file: {}", e)))?;
    Ok(records
        .into_iter()
        .map(|r| {
            let location = Location::new(&path.display().to_string(), r.line, r.offset);
            Token::new(r.kind, &r.lexeme, location)
        })
        .collect())
}

fn build(grammar: &Grammar) -> Result<(lr1gen::ActionTable, lr1gen::GotoTable, Instant), AppError> {
    let start = Instant::now();
    let automaton = build_automaton(grammar).map_err(|e| AppError::Config(e.to_string()))?;
    let (action_table, goto_table) = build_tables(&automaton, grammar).map_err(|e| AppError::Conflict(e.to_string()))?;
    info!(
        "built {} states, {} productions in {:.4}s",
        automaton.states.len(),
        grammar.productions.len(),
        start.elapsed().as_secs_f64()
    );
    Ok((action_table, goto_table, start))
}

fn run() -> Result<(), AppError> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { grammar, dump_tables } => {
            let grammar = load_grammar(&grammar)?;
            let (action_table, goto_table, start) = build(&grammar)?;
            println!("tables built in {:.4}s", start.elapsed().as_secs_f64());
            if let Some(dir) = dump_tables {
                std::fs::create_dir_all(&dir).map_err(|e| AppError::Io(e.to_string()))?;
                let mut action_file = BufWriter::new(
                    File::create(dir.join("ActionTable.txt")).map_err(|e| AppError::Io(e.to_string()))?,
                );
                action_table.write_to(&mut action_file).map_err(|e| AppError::Io(e.to_string()))?;
                let mut goto_file = BufWriter::new(
                    File::create(dir.join("GotoTable.txt")).map_err(|e| AppError::Io(e.to_string()))?,
                );
                goto_table.write_to(&mut goto_file).map_err(|e| AppError::Io(e.to_string()))?;
            }
            Ok(())
        }
        Command::Parse { grammar, tokens, trace } => {
            let grammar = load_grammar(&grammar)?;
            let (action_table, goto_table, start) = build(&grammar)?;
            println!("tables built in {:.4}s", start.elapsed().as_secs_f64());

            let productions: Vec<(String, usize)> = grammar
                .productions
                .iter()
                .map(|p| (p.left.clone(), p.effective_right().len()))
                .collect();
            let driver = Driver::new(&action_table, &goto_table, &productions);

            let mut stream = TokenStream::new(load_tokens(&tokens)?);
            let mut stdout_trace = std::io::stdout();
            let trace_sink: Option<&mut dyn std::io::Write> = if trace { Some(&mut stdout_trace) } else { None };

            let parse_start = Instant::now();
            let outcome = driver.parse(&mut stream, &ByKind, trace_sink);
            println!("parse finished in {:.4}s", parse_start.elapsed().as_secs_f64());

            match outcome {
                Ok(result) => {
                    println!("accept after {} steps", result.steps);
                    Ok(())
                }
                Err(err) => Err(AppError::Parse(err.to_string())),
            }
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(0),
        Err(error) => {
            eprintln!("error: {}", error.message());
            ExitCode::from(error.exit_code())
        }
    }
}
