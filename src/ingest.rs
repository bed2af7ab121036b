pub mod record;
pub mod timestamp;

use std::{fs, path::Path};

use crate::{
    core::series::TimeSeries,
    ingest::record::{Candidate, Document, Record},
    prelude::*,
};

/// Read a forecast file and validate it into a [`TimeSeries`].
pub fn read_forecast(path: &Path, region: Option<&str>) -> Result<TimeSeries> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read the forecast from `{}`", path.display()))?;
    parse_forecast(&contents, region)
}

/// Parse a Carbon Intensity API document.
///
/// Regional buckets are narrowed down to the selected region, malformed records are dropped.
#[instrument(skip(json))]
pub fn parse_forecast(json: &str, region: Option<&str>) -> Result<TimeSeries> {
    let document: Document = serde_json::from_str(json).context("failed to parse the forecast")?;
    let (region_name, records) = document.into_records();
    if let Some(region_name) = region_name {
        debug!(%region_name, "regional forecast");
    }
    let n_records = records.len();

    let mut n_candidates = 0;
    let mut periods = Vec::with_capacity(n_records);
    for (index, record) in records.into_iter().enumerate() {
        let record: Record = match serde_json::from_value(record) {
            Ok(record) => record,
            Err(error) => {
                warn!(index, "dropping malformed record: {error}");
                continue;
            }
        };
        let candidate = match (record.regions, region) {
            (Some(regions), Some(region)) => {
                let Some(entry) = regions.into_iter().find(|entry| entry.is_named(region)) else {
                    warn!(index, region, "regional record lacks the selected region, skipping");
                    continue;
                };
                Candidate {
                    from: record.from,
                    to: record.to,
                    intensity: entry.intensity,
                    generation_mix: entry.generation_mix,
                }
            }
            (Some(_), None) => {
                warn!(index, "regional record without a region selector, skipping");
                continue;
            }
            (None, _) => Candidate {
                from: record.from,
                to: record.to,
                intensity: record.intensity,
                generation_mix: record.generation_mix,
            },
        };
        n_candidates += 1;
        match candidate.into_period() {
            Ok(period) => periods.push(period),
            Err(error) => warn!(index, "dropping malformed period: {error:#}"),
        }
    }

    if let Some(region) = region {
        ensure!(n_candidates != 0 || n_records == 0, "no forecast data for region `{region}`");
    }
    info!(
        n_records,
        n_periods = periods.len(),
        n_actuals = periods.iter().filter(|period| period.actual.is_some()).count(),
        "parsed the forecast",
    );
    Ok(TimeSeries::new(periods)?)
}
