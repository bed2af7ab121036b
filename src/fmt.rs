use std::fmt::{Display, Formatter};

/// Fraction rendered as a percentage.
pub struct FormattedPercentage(pub f64);

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

/// Whole minutes rendered as hours and minutes.
pub struct FormattedMinutes(pub u32);

impl Display for FormattedMinutes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.0 / 60, self.0 % 60) {
            (0, minutes) => write!(f, "{minutes}m"),
            (hours, 0) => write!(f, "{hours}h"),
            (hours, minutes) => write!(f, "{hours}h{minutes:02}m"),
        }
    }
}
