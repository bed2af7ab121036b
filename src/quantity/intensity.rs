use std::ops::Mul;

use crate::quantity::{energy::KilowattHours, mass::Grams};

quantity!(Intensity, suffix: "g/kWh", precision: 0);

impl Mul<KilowattHours> for Intensity {
    type Output = Grams;

    fn mul(self, rhs: KilowattHours) -> Self::Output {
        Grams(self.0 * rhs.0)
    }
}
