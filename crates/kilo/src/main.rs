use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kilo::{terminal, App, Config, RawTerminal};
use log::LevelFilter;

/// A small terminal text editor.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// File to open. It is created on the first save if it does not exist.
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();

    init_logger(&config)?;
    config.validate()?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        terminal::restore_terminal();
        original_hook(panic_info);
    }));

    if let Err(e) = run(cli, config) {
        log::error!("Application error: {e}");
        return Err(e.into());
    }

    log::info!("Application exited normally");
    Ok(())
}

/// The terminal is restored when `term` drops, before any error is printed.
fn run(cli: Cli, config: Config) -> kilo::Result<()> {
    let mut term = RawTerminal::new()?;
    let (rows, cols) = term.window_size()?;
    log::info!("window size {rows}x{cols}");

    let mut app = App::new(config, rows, cols);
    app.start(cli.file);
    app.run(&mut term)
}

/// Logs go to the file named by `KILO_LOG`; the screen belongs to the editor.
fn init_logger(config: &Config) -> Result<()> {
    let mut logger = env_logger::Builder::from_default_env();
    let rust_log_set = std::env::var_os("RUST_LOG").is_some();

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            logger.target(env_logger::Target::Pipe(Box::new(file)));
            if !rust_log_set {
                logger.filter_level(LevelFilter::Info);
                logger.filter_module("kilo", LevelFilter::Debug);
                logger.filter_module("kilocore", LevelFilter::Debug);
            }
        }
        None if !rust_log_set => {
            logger.filter_level(LevelFilter::Off);
        }
        None => {}
    }

    logger.init();
    Ok(())
}
