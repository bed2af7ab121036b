use clap::Parser;

use crate::{
    cli::forecast::ForecastArgs,
    core::advisor::Advisor,
    prelude::*,
    quantity::power::Kilowatts,
    tables::build_best_window_table,
};

#[derive(Parser)]
pub struct BestTimeArgs {
    #[clap(flatten)]
    pub forecast: ForecastArgs,

    /// How long the appliance runs.
    #[clap(long = "duration-minutes", env = "DURATION_MINUTES")]
    pub duration_minutes: u32,

    /// Average appliance power while running.
    #[clap(long = "power-kilowatts", env = "POWER_KILOWATTS")]
    pub power: Kilowatts,

    /// Print JSON instead of a table.
    #[clap(long)]
    pub json: bool,
}

#[instrument(skip_all, fields(duration_minutes = args.duration_minutes))]
pub fn best_time(advisor: &Advisor, args: &BestTimeArgs) -> Result {
    let series = args.forecast.read()?;
    let best = advisor.best_window(&series, args.duration_minutes, args.power)?;
    info!(start = %best.start_time, saved_grams = best.saved_grams, "found the best window");
    if args.json {
        println!("{}", serde_json::to_string_pretty(&best)?);
    } else {
        println!("{}", build_best_window_table(&best));
    }
    Ok(())
}
