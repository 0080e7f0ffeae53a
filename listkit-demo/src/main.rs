mod error;
mod paths;
mod render;
mod session;

use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use listkit::config::ListConfig;
use log::{error, info};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::error::DemoError;
use crate::session::Script;

/// Replay a bulk-selection session on an in-memory list page.
#[derive(Parser, Debug)]
#[command(name = "listkit-demo", version, about, long_about = None)]
struct Args {
    /// Path of the list view
    #[arg(long, default_value = "/items/")]
    path: String,

    /// Rows per page
    #[arg(long, default_value_t = 25)]
    rows: usize,

    /// Total number of matching items (omit when unknown)
    #[arg(long)]
    total: Option<u64>,

    /// Row IDs to select on the first page
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Select every matching item
    #[arg(long)]
    all: bool,

    /// Paginate to page 2 and select these row IDs there
    #[arg(long, value_delimiter = ',', num_args = 0..)]
    next_page: Option<Vec<String>>,

    /// Bulk action to submit: value, label or name (e.g. "archive")
    #[arg(long)]
    action: Option<String>,

    /// JSON file overriding element IDs, classes and field names
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also log to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn script(&self) -> Script {
        Script {
            path: self.path.clone(),
            per_page: self.rows,
            total: self.total,
            select: self.select.clone(),
            select_all: self.all,
            next_page: self.next_page.is_some(),
            select_next: self.next_page.clone().unwrap_or_default(),
            action: self.action.clone(),
        }
    }

    fn list_config(&self) -> Result<ListConfig, DemoError> {
        let Some(path) = &self.config else {
            return Ok(ListConfig::default());
        };
        let json = fs::read_to_string(path).map_err(|e| DemoError::read_config(path, e))?;
        Ok(ListConfig::from_json(&json)?)
    }
}

fn init_logging(verbose: bool) -> Result<(), DemoError> {
    paths::rotate_logs();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if let Some(path) = paths::log_file() {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match File::create(&path) {
            Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file)),
            Err(e) => eprintln!("Could not create log file {}: {}", path.display(), e),
        }
    }
    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

fn run(args: &Args) -> Result<session::Report, DemoError> {
    let config = args.list_config()?;
    info!("Running {:?}", args.script());
    session::run(&args.script(), &config)
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Logging disabled: {}", e);
    }

    match run(&args) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
