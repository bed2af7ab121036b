use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{core::interval::Interval, quantity::intensity::Intensity};

/// One forecast block.
#[derive(Clone, Debug, PartialEq, Builder)]
#[must_use]
pub struct IntensityPeriod {
    pub interval: Interval,

    /// Boundaries exactly as the upstream rendered them.
    pub raw_bounds: Option<RawBounds>,

    pub forecast: Intensity,

    pub actual: Option<Intensity>,

    pub index: Option<IntensityIndex>,

    /// Generation mix as reported by the upstream, passed through untouched.
    pub generation_mix: Option<serde_json::Value>,
}

impl IntensityPeriod {
    /// Generation mix as fuel shares, when it has the usual upstream shape.
    #[must_use]
    pub fn fuel_shares(&self) -> Option<Vec<FuelShare>> {
        serde_json::from_value(self.generation_mix.clone()?).ok()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawBounds {
    pub from: String,
    pub to: String,
}

/// Qualitative intensity band published alongside the forecast.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, derive_more::Display)]
pub enum IntensityIndex {
    #[serde(rename = "very low")]
    #[display("very low")]
    VeryLow,

    #[serde(rename = "low")]
    #[display("low")]
    Low,

    #[serde(rename = "moderate")]
    #[display("moderate")]
    Moderate,

    #[serde(rename = "high")]
    #[display("high")]
    High,

    #[serde(rename = "very high")]
    #[display("very high")]
    VeryHigh,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FuelShare {
    pub fuel: String,

    /// Percent of the total generation.
    #[serde(rename = "perc")]
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_fuel_shares() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let period = IntensityPeriod::builder()
            .interval(Interval::new(start, start + TimeDelta::minutes(30)))
            .forecast(Intensity(100.0))
            .generation_mix(json!([
                { "fuel": "wind", "perc": 41.5 },
                { "fuel": "gas", "perc": 20 },
            ]))
            .build();
        let shares = period.fuel_shares().unwrap();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].fuel, "wind");
        assert_eq!(shares[1].percent, 20.0);

        let opaque = IntensityPeriod { generation_mix: Some(json!({ "wind": 41.5 })), ..period };
        assert!(opaque.fuel_shares().is_none());
    }

    #[test]
    fn test_index_display() -> crate::prelude::Result {
        let index: IntensityIndex = serde_json::from_value(json!("very low"))?;
        assert_eq!(index, IntensityIndex::VeryLow);
        assert_eq!(index.to_string(), "very low");
        Ok(())
    }
}
