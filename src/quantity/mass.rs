use std::ops::Div;

use crate::quantity::{energy::KilowattHours, intensity::GramsPerKilowattHour};

quantity!(Grams, via: f64, suffix: "g", precision: 0);
quantity!(Kilograms, via: f64, suffix: "kg", precision: 2);

impl From<Grams> for Kilograms {
    fn from(grams: Grams) -> Self {
        Self(grams.0 / 1000.0)
    }
}

impl From<Kilograms> for Grams {
    fn from(kilograms: Kilograms) -> Self {
        Self(kilograms.0 * 1000.0)
    }
}

impl Div<KilowattHours> for Grams {
    type Output = GramsPerKilowattHour;

    fn div(self, rhs: KilowattHours) -> Self::Output {
        GramsPerKilowattHour(self.0 / rhs.0)
    }
}
