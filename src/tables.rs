use std::ops::Range;

use chrono::{DateTime, Utc};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        classifier::{ClusterId, Classifier},
        features::{FEATURE_NAMES, FeatureVector},
        optimizer::BestWindow,
        period::{FuelShare, IntensityIndex},
        recommendation::Recommendation,
        segmenter::Segmentation,
        series::TimeSeries,
    },
    fmt::{FormattedMinutes, FormattedPercentage},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

/// The period containing `now` is highlighted.
pub fn build_forecast_table(series: &TimeSeries, now: DateTime<Utc>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Start", "End", "Forecast", "Actual", "Index"]);
    for period in series.periods() {
        let is_current = period.interval.contains(now);
        let mut start = Cell::new(period.interval.start.format("%H:%M"));
        if is_current {
            start = start.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(period.interval.start.format("%b %d")).add_attribute(Attribute::Dim),
            start,
            Cell::new(period.interval.end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(period.forecast).set_alignment(CellAlignment::Right),
            period.actual.map_or_else(
                || Cell::new("").set_alignment(CellAlignment::Right),
                |actual| Cell::new(actual).set_alignment(CellAlignment::Right),
            ),
            period
                .index
                .map_or_else(|| Cell::new(""), |index| Cell::new(index).fg(index_color(index))),
        ]);
    }
    table
}

/// Largest shares first.
pub fn build_generation_mix_table(shares: &[FuelShare]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Fuel", "Share"]);
    let mut shares = shares.iter().collect::<Vec<_>>();
    shares.sort_by(|lhs, rhs| rhs.percent.total_cmp(&lhs.percent));
    for share in shares {
        table.add_row(vec![
            Cell::new(&share.fuel),
            Cell::new(format!("{:.1}%", share.percent)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

const fn index_color(index: IntensityIndex) -> Color {
    match index {
        IntensityIndex::VeryLow | IntensityIndex::Low => Color::Green,
        IntensityIndex::Moderate => Color::DarkYellow,
        IntensityIndex::High | IntensityIndex::VeryHigh => Color::Red,
    }
}

pub fn build_best_window_table(best: &BestWindow) -> Table {
    let mut table = new_table();
    let interval = best.interval;
    let details = &best.details;
    table.set_header(vec![
        "Periods", "Date", "Start", "End", "Blocks", "Best", "Worst", "Worst at", "Energy",
        "Saved",
    ]);
    table.add_row(vec![
        Cell::new(format!(
            "{}..{}",
            details.best_start_index,
            details.best_start_index + details.n_blocks,
        ))
        .add_attribute(Attribute::Dim),
        Cell::new(interval.start.format("%b %d")).add_attribute(Attribute::Dim),
        Cell::new(interval.start.format("%H:%M")),
        Cell::new(interval.end.format("%H:%M")).add_attribute(Attribute::Dim),
        Cell::new(details.n_blocks).set_alignment(CellAlignment::Right),
        Cell::new(details.best_average).fg(Color::Green),
        Cell::new(details.worst_average).fg(Color::Red),
        Cell::new(details.worst_interval.start.format("%H:%M")).add_attribute(Attribute::Dim),
        Cell::new(details.energy).set_alignment(CellAlignment::Right),
        Cell::new(format!("{} g", best.saved_grams))
            .set_alignment(CellAlignment::Right)
            .fg(if best.saved_grams == 0 { Color::Reset } else { Color::Green }),
    ]);
    table
}

pub fn build_recommendations_table(recommendations: &[Recommendation]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Date", "Start", "End", "Duration", "Average", "Depth", "Stability", "Cluster", "Profile",
        "Appliance",
    ]);
    for recommendation in recommendations {
        let window = &recommendation.window;
        table.add_row(vec![
            Cell::new(window.interval.start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(window.interval.start.format("%H:%M")),
            Cell::new(window.interval.end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(FormattedMinutes(window.duration_minutes))
                .set_alignment(CellAlignment::Right),
            Cell::new(window.average_intensity).set_alignment(CellAlignment::Right),
            Cell::new(FormattedPercentage(recommendation.features.depth))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", recommendation.features.stability))
                .set_alignment(CellAlignment::Right),
            Cell::new(recommendation.cluster_id).add_attribute(Attribute::Dim),
            Cell::new(&recommendation.appliance.name)
                .fg(parse_hex_color(&recommendation.appliance.color).unwrap_or(Color::Reset)),
            Cell::new(&recommendation.appliance.appliance),
        ]);
    }
    table
}

/// Low segments get their nearest cluster when the classifier is available.
pub fn build_segments_table(
    segmentation: &Segmentation<'_>,
    classifier: Option<&Classifier>,
) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Periods", "Date", "Start", "End", "Blocks", "Average", "Low", "Duration", "Depth",
        "Stability", "Cluster", "Distance",
    ]);
    for segment in &segmentation.segments {
        let window = segment.window;
        let features = FeatureVector::extract(&window, segmentation.mean);
        let index_range = window.index_range();
        let mut row = vec![
            Cell::new(format!("{}..{}", index_range.start, index_range.end))
                .add_attribute(Attribute::Dim),
            Cell::new(window.interval.start.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(window.interval.start.format("%H:%M")),
            Cell::new(window.interval.end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(window.len()).set_alignment(CellAlignment::Right),
            Cell::new(window.average_intensity())
                .set_alignment(CellAlignment::Right)
                .fg(if segment.is_low { Color::Green } else { Color::Red }),
            Cell::new(if segment.is_low { "yes" } else { "no" }),
            Cell::new(FormattedMinutes(features.duration_minutes))
                .set_alignment(CellAlignment::Right),
            Cell::new(FormattedPercentage(features.depth)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", features.stability)).set_alignment(CellAlignment::Right),
        ];
        match classifier {
            Some(classifier) if segment.is_low && features.is_finite() => {
                let assignment = classifier.nearest(features);
                row.push(Cell::new(assignment.cluster_id));
                row.push(
                    Cell::new(format!("{:.3}", assignment.distance))
                        .set_alignment(CellAlignment::Right),
                );
            }
            _ => {
                row.push(Cell::new(""));
                row.push(Cell::new(""));
            }
        }
        table.add_row(row);
    }
    table
}

/// Scaler parameters followed by the centroids, de-standardized into the units of the features.
pub fn build_model_table(classifier: &Classifier) -> Table {
    let scaler = classifier.scaler();
    let mut table = new_table();
    let mut header = vec!["Cluster".to_owned()];
    header.extend(FEATURE_NAMES.map(str::to_owned));
    header.extend(["Profile".to_owned(), "Appliance".to_owned()]);
    table.set_header(header);
    for (label, values) in [("mean", scaler.mean), ("std", scaler.std)] {
        let mut row = vec![Cell::new(label).add_attribute(Attribute::Italic)];
        row.extend(
            values
                .iter()
                .map(|value| Cell::new(format!("{value:.3}")).set_alignment(CellAlignment::Right)),
        );
        table.add_row(row);
    }
    for (index, centroid) in classifier.centroids().iter().enumerate() {
        let cluster_id = ClusterId(index);
        let mut row = vec![Cell::new(cluster_id).add_attribute(Attribute::Dim)];
        for ((coordinate, mean), std) in centroid.iter().zip(scaler.mean).zip(scaler.std) {
            row.push(
                Cell::new(format!("{:.3}", coordinate * std + mean))
                    .set_alignment(CellAlignment::Right),
            );
        }
        match classifier.profile(cluster_id) {
            Some(profile) => {
                row.push(
                    Cell::new(&profile.name)
                        .fg(parse_hex_color(&profile.color).unwrap_or(Color::Reset)),
                );
                row.push(Cell::new(&profile.appliance));
            }
            None => {
                row.push(Cell::new("unlabelled").fg(Color::DarkYellow));
                row.push(Cell::new(""));
            }
        }
        table.add_row(row);
    }
    table
}

/// Parse `#RRGGBB` into a terminal color.
fn parse_hex_color(color: &str) -> Option<Color> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: Range<usize>| {
        hex.get(range).and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    Some(Color::Rgb { r: channel(0..2)?, g: channel(2..4)?, b: channel(4..6)? })
}
