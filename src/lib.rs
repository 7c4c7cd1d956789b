pub mod api;
pub mod cli;
pub mod data;
pub mod engine;
pub mod export;
pub mod io_utils;
pub mod preview;
pub mod schema;
pub mod table;
pub mod validation;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("finance_screening", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Health => handle_health(),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Transform(args) => export::execute(&args),
    }
}

fn handle_health() -> Result<()> {
    println!("{}", serde_json::to_string(&api::health())?);
    Ok(())
}
