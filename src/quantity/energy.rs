use std::ops::Mul;

use crate::quantity::{intensity::GramsPerKilowattHour, mass::Grams};

quantity!(KilowattHours, via: f64, suffix: "kWh", precision: 0);
quantity!(MegawattHours, via: f64, suffix: "MWh", precision: 2);

impl From<KilowattHours> for MegawattHours {
    fn from(kilowatt_hours: KilowattHours) -> Self {
        Self(kilowatt_hours.0 / 1000.0)
    }
}

impl Mul<GramsPerKilowattHour> for KilowattHours {
    type Output = Grams;

    fn mul(self, rhs: GramsPerKilowattHour) -> Self::Output {
        Grams(self.0 * rhs.0)
    }
}
