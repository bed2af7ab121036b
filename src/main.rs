#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod fmt;
mod ingest;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Args, Command, best_time, forecast, inspect, recommend},
    core::advisor::Advisor,
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let advisor = Advisor::with_model_file(&args.model_path);

    match args.command {
        Command::BestTime(args) => best_time(&advisor, &args)?,
        Command::Recommend(args) => recommend(&advisor, &args)?,
        Command::Forecast(args) => forecast(&args)?,
        Command::Inspect(args) => inspect(&advisor, &args)?,
    }

    info!("done!");
    Ok(())
}
