use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;

use crate::{
    core::{period::IntensityPeriod, series::TimeSeries},
    ingest::read_forecast,
    prelude::*,
    tables::{build_forecast_table, build_generation_mix_table},
};

#[derive(Parser)]
pub struct ForecastArgs {
    /// Carbon intensity forecast, as returned by the Carbon Intensity API.
    #[clap(long = "forecast", env = "FORECAST_PATH")]
    pub path: PathBuf,

    /// Region short name to pick from a regional forecast, for example `London`.
    #[clap(long = "region", env = "REGION")]
    pub region: Option<String>,
}

impl ForecastArgs {
    pub fn read(&self) -> Result<TimeSeries> {
        let series = read_forecast(&self.path, self.region.as_deref())?;
        info!(n_periods = series.len(), "loaded the forecast");
        Ok(series)
    }
}

/// Print the loaded periods followed by the generation mix of the first one.
#[instrument(skip_all)]
pub fn forecast(args: &ForecastArgs) -> Result {
    let series = args.read()?;
    println!("{}", build_forecast_table(&series, Utc::now()));
    match series.periods().first().and_then(IntensityPeriod::fuel_shares) {
        Some(shares) => println!("{}", build_generation_mix_table(&shares)),
        None => warn!("the first period carries no generation mix"),
    }
    Ok(())
}
