mod best_time;
mod forecast;
mod inspect;
mod recommend;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use self::{best_time::best_time, forecast::forecast, inspect::inspect, recommend::recommend};
use crate::cli::{
    best_time::BestTimeArgs,
    forecast::ForecastArgs,
    inspect::InspectArgs,
    recommend::RecommendArgs,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Window classifier artifact.
    ///
    /// The recommender is disabled when the artifact cannot be loaded.
    #[clap(long = "model-path", env = "MODEL_PATH", default_value = "models/window_classifier.json")]
    pub model_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Find the lowest-carbon time to run an appliance and the emissions it saves.
    #[clap(name = "best-time")]
    BestTime(Box<BestTimeArgs>),

    /// Classify the upcoming low-carbon windows and suggest appliances for each.
    #[clap(name = "recommend")]
    Recommend(Box<RecommendArgs>),

    /// Show the forecast periods with their index and the current generation mix.
    #[clap(name = "forecast")]
    Forecast(Box<ForecastArgs>),

    /// Development tools.
    #[clap(name = "inspect")]
    Inspect(Box<InspectArgs>),
}
