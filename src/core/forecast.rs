use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    core::{emission::ForecastSource, series::ONE_HOUR},
    quantity::{
        energy::{KilowattHours, MegawattHours},
        intensity::GramsPerKilowattHour,
        mass::Grams,
        power::Megawatts,
    },
};

/// One hour of the day-ahead grid balance.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct HourlySample {
    #[serde(rename = "datetime")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "total_load_mw")]
    pub total_load: Megawatts,

    #[serde(rename = "wind_mw")]
    pub wind: Megawatts,

    #[serde(rename = "solar_mw")]
    pub solar: Megawatts,

    /// Residual generation, never negative.
    #[serde(rename = "thermal_and_nuclear_mw")]
    pub thermal_and_nuclear: Megawatts,

    pub carbon_intensity: GramsPerKilowattHour,
}

impl HourlySample {
    /// Derive the residual generation and carbon intensity from the grid balance.
    pub fn new(
        timestamp: DateTime<Utc>,
        total_load: Megawatts,
        wind: Megawatts,
        solar: Megawatts,
    ) -> Self {
        // Day-ahead noise may push wind and solar above the load:
        let thermal_and_nuclear = (total_load - wind - solar).max(Megawatts::ZERO);

        let total_emissions: Grams = [
            (ForecastSource::Solar, solar),
            (ForecastSource::Wind, wind),
            (ForecastSource::ThermalAndNuclear, thermal_and_nuclear),
        ]
        .into_iter()
        .map(|(source, generation)| generation * ONE_HOUR * source.emission_factor())
        .sum();

        let total_energy: KilowattHours = total_load * ONE_HOUR;
        let carbon_intensity = if total_energy > KilowattHours::ZERO {
            total_emissions / total_energy
        } else {
            GramsPerKilowattHour::ZERO
        };

        Self { timestamp, total_load, wind, solar, thermal_and_nuclear, carbon_intensity }
    }
}

/// Hourly carbon-intensity series for one calendar day.
#[must_use]
#[derive(Clone, Debug)]
pub struct CarbonForecast {
    date: NaiveDate,
    samples: Vec<HourlySample>,
}

impl CarbonForecast {
    /// The samples must be in strictly ascending timestamp order.
    pub fn new(date: NaiveDate, samples: Vec<HourlySample>) -> Self {
        debug_assert!(samples.is_sorted_by(|lhs, rhs| lhs.timestamp < rhs.timestamp));
        Self { date, samples }
    }

    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn samples(&self) -> &[HourlySample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Summarize the day, or [`None`] when there are no samples.
    #[must_use]
    pub fn summary(&self) -> Option<ForecastSummary> {
        let min_carbon_intensity = self.samples.iter().map(|sample| sample.carbon_intensity).min()?;
        let max_carbon_intensity = self.samples.iter().map(|sample| sample.carbon_intensity).max()?;

        #[expect(clippy::cast_precision_loss)]
        let n_hours = self.samples.len() as f64;
        let avg_carbon_intensity = self
            .samples
            .iter()
            .map(|sample| sample.carbon_intensity)
            .sum::<GramsPerKilowattHour>()
            / n_hours;

        let total = |f: fn(&HourlySample) -> Megawatts| -> MegawattHours {
            (self.samples.iter().map(f).sum::<Megawatts>() * ONE_HOUR).into()
        };

        Some(ForecastSummary {
            date: self.date,
            total_hours: self.samples.len(),
            min_carbon_intensity,
            max_carbon_intensity,
            avg_carbon_intensity,
            total_load: total(|sample| sample.total_load),
            total_wind: total(|sample| sample.wind),
            total_solar: total(|sample| sample.solar),
            total_thermal_and_nuclear: total(|sample| sample.thermal_and_nuclear),
        })
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct ForecastSummary {
    pub date: NaiveDate,
    pub total_hours: usize,
    pub min_carbon_intensity: GramsPerKilowattHour,
    pub max_carbon_intensity: GramsPerKilowattHour,
    pub avg_carbon_intensity: GramsPerKilowattHour,

    #[serde(rename = "total_load_mwh")]
    pub total_load: MegawattHours,

    #[serde(rename = "total_wind_mwh")]
    pub total_wind: MegawattHours,

    #[serde(rename = "total_solar_mwh")]
    pub total_solar: MegawattHours,

    #[serde(rename = "total_thermal_and_nuclear_mwh")]
    pub total_thermal_and_nuclear: MegawattHours,
}
