use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::{self, stdout, BufRead, IsTerminal, Read, Write};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::application::LedgerContext;
use crate::domain::{format_amount, join_names};
use crate::io::{ExportFormat, ExportType, Exporter};

/// Tallyho - shared expense ledger
#[derive(Parser)]
#[command(name = "tallyho")]
#[command(about = "Split shared expenses with plain-text commands and see who owes whom")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to an interactive session
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read commands from stdin, one per line, and answer each one
    Repl,

    /// Run a list of commands in one session
    Run {
        /// Commands to run after the script, e.g. "john paid 50 for dinner split among john, mary"
        commands: Vec<String>,

        /// Script file with one command per line ('#' starts a comment)
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Replay a command script and export the resulting data
    Export {
        /// What to export: expenses, balances, transactions, full
        export_type: String,

        /// Script file to replay (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv, full is always json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Replay a command script and print expense, balance and payment tables
    Report {
        /// Script file to replay (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut context = LedgerContext::new();

        match self.command.unwrap_or(Commands::Repl) {
            Commands::Repl => {
                run_repl(&mut context)?;
            }

            Commands::Run { commands, file } => {
                let mut lines = match file.as_deref() {
                    Some(path) => read_script(Some(path))?,
                    None => Vec::new(),
                };
                lines.extend(commands);

                for response in context.replay(&lines) {
                    println!("{}", response);
                }
            }

            Commands::Export {
                export_type,
                input,
                output,
                format,
            } => {
                replay_script(&mut context, input.as_deref())?;
                run_export_command(&context, &export_type, output.as_deref(), format.as_deref())?;
            }

            Commands::Report { input } => {
                replay_script(&mut context, input.as_deref())?;
                print_report(&context);
            }
        }

        Ok(())
    }
}

fn run_repl(context: &mut LedgerContext) -> Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut out = stdout();

    if interactive {
        writeln!(out, "Type 'help' to see what I can do, 'quit' to leave.")?;
    }

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read command from stdin")?;
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if matches!(line.to_lowercase().as_str(), "quit" | "exit") {
            break;
        }

        writeln!(out, "{}", context.execute(line))?;
    }

    Ok(())
}

/// Read a command script: one command per line, blank lines and '#' comments skipped.
fn read_script(path: Option<&str>) -> Result<Vec<String>> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read script file: {}", path))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read script from stdin")?;
            buffer
        }
    };

    Ok(script_lines(&content))
}

fn script_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

fn replay_script(context: &mut LedgerContext, input: Option<&str>) -> Result<()> {
    let lines = read_script(input)?;
    for (line, response) in lines.iter().zip(context.replay(&lines)) {
        debug!(command = %line, %response, "replayed");
    }
    Ok(())
}

fn run_export_command(
    context: &LedgerContext,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    let export_type: ExportType = export_type.parse()?;
    let format: ExportFormat = match format {
        Some(format) => format.parse()?,
        None if export_type == ExportType::Full => ExportFormat::Json,
        None => ExportFormat::Csv,
    };

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = Exporter::new(context).export(writer, export_type, format)?;
    if output.is_some() {
        eprintln!("Exported {} rows", count);
    }

    Ok(())
}

fn print_report(context: &LedgerContext) {
    let expenses = context.expense_rows();
    if expenses.is_empty() {
        println!("No expenses added yet. Add an expense to see balances and suggested payments.");
        return;
    }

    println!("Expense History");
    println!(
        "{:<12} {:<24} {:>10} {:<12} {}",
        "DATE", "DESCRIPTION", "AMOUNT", "PAID BY", "SPLIT AMONG"
    );
    println!("{}", "-".repeat(76));
    for row in &expenses {
        println!(
            "{:<12} {:<24} {:>10} {:<12} {}",
            row.date.format("%Y-%m-%d").to_string(),
            row.description,
            format!("${}", format_amount(row.amount)),
            row.paid_by,
            join_names(&row.split_among)
        );
    }

    println!();
    println!("Current Balances");
    println!("{:<16} {:>12} {}", "PERSON", "BALANCE", "STATUS");
    println!("{}", "-".repeat(42));
    for row in context.balance_rows() {
        println!(
            "{:<16} {:>12} {}",
            row.participant,
            format!("${}", format_amount(row.balance)),
            row.status
        );
    }

    println!();
    println!("Suggested Payments");
    println!("{}", context.balances_report());
}
