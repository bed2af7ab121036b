//! Raw Carbon Intensity API records, before validation.
//!
//! Every field is tolerant: a mistyped value reads as absent, so that the record is dropped
//! later with a reason instead of failing the whole document.

use serde::Deserialize;
use serde_with::{DefaultOnError, VecSkipError, serde_as};

use crate::{
    core::{
        block_duration,
        interval::Interval,
        period::{IntensityIndex, IntensityPeriod, RawBounds},
    },
    ingest::timestamp,
    prelude::*,
    quantity::intensity::Intensity,
};

/// Either `{"data": [...]}` or a bare array of records.
///
/// Records stay untyped here so that each one is converted on its own.
#[serde_as]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum Document {
    Wrapped {
        #[serde_as(as = "DefaultOnError")]
        #[serde(default)]
        region_name: Option<String>,

        data: Vec<serde_json::Value>,
    },

    Bare(Vec<serde_json::Value>),
}

impl Document {
    pub fn into_records(self) -> (Option<String>, Vec<serde_json::Value>) {
        match self {
            Self::Wrapped { region_name, data } => (region_name, data),
            Self::Bare(records) => (None, records),
        }
    }
}

/// National period or a regional bucket, depending on which fields are present.
#[serde_as]
#[derive(Deserialize)]
pub struct Record {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub from: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub to: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub intensity: Option<RawIntensity>,

    #[serde(default, rename = "generationmix")]
    pub generation_mix: Option<serde_json::Value>,

    #[serde_as(as = "DefaultOnError<Option<VecSkipError<_>>>")]
    #[serde(default)]
    pub regions: Option<Vec<RegionRecord>>,
}

#[serde_as]
#[derive(Deserialize)]
pub struct RegionRecord {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub shortname: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub intensity: Option<RawIntensity>,

    #[serde(default, rename = "generationmix")]
    pub generation_mix: Option<serde_json::Value>,
}

impl RegionRecord {
    pub fn is_named(&self, region: &str) -> bool {
        self.shortname.as_deref().is_some_and(|shortname| shortname.eq_ignore_ascii_case(region))
    }
}

#[serde_as]
#[derive(Deserialize)]
pub struct RawIntensity {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub forecast: Option<f64>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub actual: Option<f64>,

    /// Unknown bands read as absent.
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub index: Option<IntensityIndex>,
}

/// Period fields gathered from either record shape.
pub struct Candidate {
    pub from: Option<String>,
    pub to: Option<String>,
    pub intensity: Option<RawIntensity>,
    pub generation_mix: Option<serde_json::Value>,
}

impl Candidate {
    pub fn into_period(self) -> Result<IntensityPeriod> {
        let from = self.from.context("missing `from`")?;
        let to = self.to.context("missing `to`")?;
        let interval = Interval::new(timestamp::parse(&from)?, timestamp::parse(&to)?);
        ensure!(
            interval.duration() == block_duration(),
            "expected a {}-minute block, got {} minutes",
            block_duration().num_minutes(),
            interval.duration().num_minutes(),
        );

        let intensity = self.intensity.context("missing intensity")?;
        let forecast = intensity.forecast.context("missing forecast intensity")?;
        ensure!(forecast.is_finite() && forecast >= 0.0, "invalid forecast intensity {forecast}");
        let actual = intensity.actual.filter(|actual| actual.is_finite() && *actual >= 0.0);

        Ok(IntensityPeriod::builder()
            .interval(interval)
            .raw_bounds(RawBounds { from, to })
            .forecast(Intensity(forecast))
            .maybe_actual(actual.map(Intensity))
            .maybe_index(intensity.index)
            .maybe_generation_mix(self.generation_mix)
            .build())
    }
}
