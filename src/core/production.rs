use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    core::emission::FuelType,
    quantity::{intensity::GramsPerKilowattHour, power::Megawatts},
};

/// Actual generation mix at one moment, and its carbon intensity.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct ProductionSnapshot {
    /// Upstream time stamp, as reported (minute precision, no seconds).
    pub timestamp: String,

    pub production: BTreeMap<FuelType, Megawatts>,

    #[serde(rename = "total_mw")]
    pub total: Megawatts,

    #[serde(rename = "carbon_intensity_g_per_kwh")]
    pub carbon_intensity: GramsPerKilowattHour,
}

impl ProductionSnapshot {
    /// Sum the generation per fuel type and weigh the emission factors by it.
    pub fn new(
        timestamp: String,
        generation: impl IntoIterator<Item = (FuelType, Megawatts)>,
    ) -> Self {
        let mut production = BTreeMap::<FuelType, Megawatts>::new();
        for (fuel_type, power) in generation {
            *production.entry(fuel_type).or_default() += power;
        }
        let total: Megawatts = production.values().copied().sum();
        let carbon_intensity = if total > Megawatts::ZERO {
            production
                .iter()
                .map(|(fuel_type, power)| fuel_type.emission_factor() * power.0)
                .sum::<GramsPerKilowattHour>()
                / total.0
        } else {
            GramsPerKilowattHour::ZERO
        };
        Self { timestamp, production, total, carbon_intensity }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_weighted_intensity() {
        let snapshot = ProductionSnapshot::new(
            "2025-10-16T10:00Z".to_owned(),
            [
                (FuelType::Nuclear, Megawatts(3_000.0)),
                (FuelType::FossilGas, Megawatts(1_000.0)),
                (FuelType::WindOffshore, Megawatts(500.0)),
                (FuelType::WindOffshore, Megawatts(500.0)),
            ],
        );
        assert_abs_diff_eq!(snapshot.total.0, 5_000.0);
        assert_abs_diff_eq!(snapshot.production[&FuelType::WindOffshore].0, 1_000.0);
        // (3000 × 5 + 1000 × 490 + 1000 × 11.5) / 5000
        assert_abs_diff_eq!(snapshot.carbon_intensity.0, 103.3, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_has_zero_intensity() {
        let snapshot = ProductionSnapshot::new(String::new(), []);
        assert_eq!(snapshot.total, Megawatts::ZERO);
        assert_eq!(snapshot.carbon_intensity, GramsPerKilowattHour::ZERO);
    }
}
