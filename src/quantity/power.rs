use std::ops::Mul;

use chrono::TimeDelta;

use crate::quantity::energy::KilowattHours;

quantity!(Megawatts, via: f64, suffix: "MW", precision: 2);
quantity!(Kilowatts, via: f64, suffix: "kW", precision: 1);

impl From<Kilowatts> for Megawatts {
    fn from(kilowatts: Kilowatts) -> Self {
        Self(kilowatts.0 / 1000.0)
    }
}

impl From<Megawatts> for Kilowatts {
    fn from(megawatts: Megawatts) -> Self {
        Self(megawatts.0 * 1000.0)
    }
}

impl Mul<TimeDelta> for Megawatts {
    type Output = KilowattHours;

    fn mul(self, rhs: TimeDelta) -> Self::Output {
        let hours = rhs.as_seconds_f64() / 3600.0;
        KilowattHours(self.0 * 1000.0 * hours)
    }
}
