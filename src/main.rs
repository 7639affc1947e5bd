//! # emptasks
//!
//! A terminal front-end for employee task records: who did what, on which
//! day, for how many hours at which rate, plus any additional charges. The
//! total remuneration is always computed, never typed in.
//!
//! Records live in a REST backend; this program is a client for it with a
//! scriptable CLI and an interactive TUI.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! emptasks
//! # or explicitly
//! emptasks ui
//! ```
//!
//! *   `a`: Add a task
//! *   `e` / `Enter`: Edit the selected task
//! *   `d`: Delete the selected task (asks for confirmation)
//! *   `r`: Reload from the backend
//! *   `q`: Quit
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! emptasks list
//! emptasks add --employee "Jane Doe" --description "Site survey" --hours 6 --rate 42.5 --charges 15
//! emptasks edit 3 --hours 7.5
//! emptasks remove 3
//! emptasks calc 10 15.5 2.25
//! ```
//!
//! ## Configuration
//!
//! *   `EMPTASKS_API_ENDPOINT`: backend base URL (default `http://localhost:8000/`), or `--endpoint`.
//! *   `EMPTASKS_RESOURCE_PATH`: task resource below the endpoint (default `api/tasks`).
//! *   `EMPTASKS_TIMEOUT_SECS`: request timeout (default 10).
//! *   `EMPTASKS_LOG_FILE`: log file for TUI sessions.
//! *   `RUST_LOG`: log filter (default `emptasks=info`).

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::fs::{self, OpenOptions};
use std::io;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;
use emptasks::commands::*;
use emptasks::config::Config;
use emptasks::manager::TaskManager;
use emptasks::store::HttpTaskStore;
use emptasks::tui::run_tui;

#[derive(Parser)]
#[command(name = "emptasks")]
#[command(about = "Employee task records with computed remuneration", long_about = None)]
struct Cli {
    /// Backend base URL, overrides EMPTASKS_API_ENDPOINT
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args)]
struct TaskFields {
    /// Employee name
    #[arg(short = 'E', long)]
    employee: Option<String>,
    /// Task description (quoted if it has spaces)
    #[arg(short = 'D', long)]
    description: Option<String>,
    /// Date in YYYY-MM-DD (defaults to today when adding)
    #[arg(short, long)]
    date: Option<String>,
    /// Hours spent, e.g. 1.5
    #[arg(short = 'H', long)]
    hours: Option<f64>,
    /// Hourly rate
    #[arg(short, long)]
    rate: Option<f64>,
    /// Additional charges
    #[arg(short, long)]
    charges: Option<f64>,
}

impl From<TaskFields> for TaskArgs {
    fn from(f: TaskFields) -> Self {
        TaskArgs {
            employee: f.employee,
            description: f.description,
            date: f.date,
            hours: f.hours,
            rate: f.rate,
            charges: f.charges,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all tasks
    List,
    /// Add a new task
    Add {
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Replace a task; fields not given keep their current value
    Edit {
        id: u64,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Remove a task
    Remove {
        id: u64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Compute a remuneration without saving anything
    Calc {
        hours: f64,
        rate: f64,
        #[arg(default_value_t = 0.0)]
        charges: f64,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

/// Logs go to stderr for CLI commands and to the log file for the TUI.
fn init_logging(config: &Config, tui: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "emptasks=info".into());

    let writer = if tui {
        if let Some(dir) = config.log_file.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match OpenOptions::new().create(true).append(true).open(&config.log_file) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(_) => BoxMakeWriter::new(io::sink),
        }
    } else {
        BoxMakeWriter::new(io::stderr)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(!tui)
        .init();
}

async fn run(command: Option<Commands>, config: Config) -> emptasks::Result<()> {
    if let Some(Commands::Calc { hours, rate, charges }) = command {
        cmd_calc(hours, rate, charges)?;
        return Ok(());
    }

    let store = HttpTaskStore::new(&config)?;
    tracing::debug!("Using task resource {}", store.collection_url());
    let mut manager = TaskManager::new(store);

    match command {
        Some(Commands::List) => cmd_list(&mut manager).await,
        Some(Commands::Add { fields }) => cmd_add(&mut manager, fields.into(), false).await.map(|_| ()),
        Some(Commands::Edit { id, fields }) => cmd_edit(&mut manager, id, fields.into(), false).await.map(|_| ()),
        Some(Commands::Remove { id, force }) => cmd_remove(&mut manager, id, force, false).await.map(|_| ()),
        Some(Commands::Ui) | None => run_tui(manager).await,
        Some(Commands::Calc { .. }) | Some(Commands::Completions { .. }) => Ok(()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let shell_enum = match shell.as_str() {
            "bash" => Shell::Bash,
            "zsh" => Shell::Zsh,
            "fish" => Shell::Fish,
            "powershell" => Shell::PowerShell,
            "elvish" => Shell::Elvish,
            _ => {
                eprintln!("Unsupported shell: {}", shell);
                return ExitCode::FAILURE;
            }
        };
        let mut cmd = Cli::command();
        generate(shell_enum, &mut cmd, "emptasks", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(cli.endpoint) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tui = matches!(cli.command, Some(Commands::Ui) | None);
    init_logging(&config, tui);

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}
