use clap::Parser;

use crate::{
    cli::forecast::ForecastArgs,
    core::{advisor::Advisor, recommendation::Recommendations},
    prelude::*,
    tables::build_recommendations_table,
};

#[derive(Parser)]
pub struct RecommendArgs {
    #[clap(flatten)]
    pub forecast: ForecastArgs,

    /// Print JSON instead of a table.
    #[clap(long)]
    pub json: bool,
}

#[instrument(skip_all)]
pub fn recommend(advisor: &Advisor, args: &RecommendArgs) -> Result {
    let series = args.forecast.read()?;
    let recommendations = advisor.recommend(&series)?;
    if let Recommendations::InsufficientData { n_periods } = recommendations {
        warn!(n_periods, "the forecast is too short to recommend anything");
    }
    let recommendations = recommendations.into_vec();
    info!(n_recommendations = recommendations.len(), "classified");
    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        println!("{}", build_recommendations_table(&recommendations));
    }
    Ok(())
}
