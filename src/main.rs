use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use crate::config::{Config, default_config_path};
use crate::controller::parse_and_run_command;
use crate::db::Ledger;
use crate::editor::TrackerHelper;
use crate::store::open_store;

mod category;
mod chart;
mod common;
mod config;
mod controller;
mod db;
mod editor;
mod form;
mod live_edit;
mod parser;
mod store;
mod summary;
mod transaction;
mod util;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// Data file path, .csv or .db/.sqlite
    file: Option<String>,

    /// Config file, defaults to <config dir>/fintrack/config.toml
    #[clap(short, long)]
    config: Option<String>,

    /// Run a single command and exit
    #[clap(short, long)]
    execute: Option<String>,
}

static COMMAND_HISTORY_FILE: &str = ".fintrack_history";
const PROMPT: &str = "fintrack> ";

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli: Cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.map(PathBuf::from).or_else(default_config_path);
    let config = match &config_path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let data_file = match cli.file {
        Some(f) => PathBuf::from(f),
        None => config.default_data_file(),
    };
    if let Some(dir) = data_file.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Unable to create directory {}", dir.display()))?;
    }
    let mut ledger = Ledger::open(open_store(&data_file)?)?;
    if ledger.is_empty() {
        info!("No records yet, use ADD to record an income or expense");
    }

    if let Some(command) = cli.execute {
        return parse_and_run_command(&mut ledger, &config, &command);
    }

    repl(&mut ledger, &config)
}

fn repl(ledger: &mut Ledger, config: &Config) -> anyhow::Result<()> {
    let mut rl = Editor::<TrackerHelper, DefaultHistory>::new()?;
    rl.set_helper(Some(TrackerHelper::new(config.categories.clone(), PROMPT)));
    if rl.load_history(COMMAND_HISTORY_FILE).is_err() {
        info!("No previous history.");
    }
    info!("Type HELP; for a list of commands");

    let mut command_buffer: Vec<String> = vec![];
    loop {
        let readline = rl.readline(PROMPT);
        match readline {
            Ok(line) => {
                let line = line.trim();
                if command_buffer.is_empty() && is_exit(line) {
                    break
                }
                let is_last = line.ends_with(';');
                if !line.is_empty() {
                    command_buffer.push(line.to_string());
                }
                if is_last {
                    let command = command_buffer.join("\n");
                    rl.add_history_entry(command.trim())?;

                    if let Err(err) = parse_and_run_command(ledger, config, &command) {
                        warn!("{err:#}");
                    }

                    command_buffer.clear();
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break
            }
        }
    }

    if let Err(e) = rl.save_history(COMMAND_HISTORY_FILE) {
        warn!("Unable to save command history: {e}");
    }
    Ok(())
}

/// `exit` or `quit`, with or without the trailing ';'
fn is_exit(line: &str) -> bool {
    let word = line.trim().trim_end_matches(';').trim_end();
    word.eq_ignore_ascii_case("exit") || word.eq_ignore_ascii_case("quit")
}
