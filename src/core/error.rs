use thiserror::Error;

/// Failures of a single analysis request.
///
/// Legitimately empty results are not errors, see [`Recommendations`].
///
/// [`Recommendations`]: crate::core::recommendation::Recommendations
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("the forecast is empty")]
    EmptySeries,

    #[error(
        "duration is too long for the forecast window: {n_blocks} blocks requested, {n_periods} available"
    )]
    DurationTooLong { n_blocks: usize, n_periods: usize },

    #[error("period #{index} is not a single {block_minutes}-minute block")]
    IrregularPeriod { index: usize, block_minutes: u32 },

    #[error("period #{index} starts before the previous one ends")]
    UnorderedSeries { index: usize },

    #[error("the window classifier is unavailable")]
    ArtifactUnavailable,
}
