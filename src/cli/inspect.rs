use clap::{Parser, Subcommand};

use crate::{
    cli::forecast::ForecastArgs,
    core::{advisor::Advisor, segmenter::Segmentation},
    prelude::*,
    tables::{build_model_table, build_segments_table},
};

#[derive(Parser)]
pub struct InspectArgs {
    #[command(subcommand)]
    pub command: InspectCommand,
}

#[derive(Subcommand)]
pub enum InspectCommand {
    /// Split the forecast into runs around its mean and show their features.
    #[clap(name = "runs")]
    Runs(ForecastArgs),

    /// Show the loaded classifier centroids and their profiles.
    #[clap(name = "model")]
    Model,
}

pub fn inspect(advisor: &Advisor, args: &InspectArgs) -> Result {
    match &args.command {
        InspectCommand::Runs(forecast) => {
            let series = forecast.read()?;
            let segmentation = Segmentation::of(&series).context("the forecast is empty")?;
            info!(mean = %segmentation.mean, n_segments = segmentation.segments.len(), "segmented");
            println!("{}", build_segments_table(&segmentation, advisor.classifier().ok()));
        }
        InspectCommand::Model => {
            let classifier = advisor.classifier()?;
            info!(n_centroids = classifier.centroids().len(), "loaded");
            println!("{}", build_model_table(classifier));
        }
    }
    Ok(())
}
