use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

use crate::{
    core::forecast::{CarbonForecast, HourlySample},
    quantity::{
        energy::KilowattHours,
        intensity::GramsPerKilowattHour,
        mass::{Grams, Kilograms},
        power::Megawatts,
    },
};

/// Average car emissions, used to make the savings relatable.
pub const CAR_EMISSIONS_PER_KM: Grams = Grams(120.0);

/// Constant-power load running for whole hours from the start time.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct LoadProfile {
    /// Inclusive.
    #[serde(rename = "start_time")]
    pub start: DateTime<Utc>,

    /// Exclusive.
    #[serde(rename = "end_time")]
    pub end: DateTime<Utc>,

    pub duration_hours: u32,

    #[serde(rename = "load_mw")]
    pub load: Megawatts,

    #[serde(rename = "energy_kwh")]
    pub energy: KilowattHours,

    #[serde(rename = "avg_carbon_intensity")]
    pub average_intensity: GramsPerKilowattHour,

    #[serde(rename = "total_emissions_kg")]
    pub emissions: Kilograms,
}

impl LoadProfile {
    #[must_use]
    pub fn start_hour(&self) -> u32 {
        self.start.hour()
    }

    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        (self.start <= timestamp) && (timestamp < self.end)
    }
}

/// Habitual schedule against the lowest-emission one.
#[must_use]
#[derive(Clone, Debug)]
pub struct Comparison {
    pub standard: LoadProfile,
    pub optimal: LoadProfile,

    /// Standard minus optimal emissions.
    pub emissions_saved: Kilograms,

    /// Share of the standard emissions that is saved, in percent.
    pub saved_percentage: f64,

    /// Optimal start minus standard start.
    pub time_shift_hours: i64,

    /// All evaluated candidates in chronological order.
    pub all_slots: Vec<LoadProfile>,
}

impl Comparison {
    pub fn new(standard: LoadProfile, optimal: LoadProfile, all_slots: Vec<LoadProfile>) -> Self {
        let emissions_saved = standard.emissions - optimal.emissions;
        let saved_percentage = if standard.emissions > Kilograms::ZERO {
            emissions_saved.0 / standard.emissions.0 * 100.0
        } else {
            0.0
        };
        Self {
            standard,
            optimal,
            emissions_saved,
            saved_percentage,
            time_shift_hours: (optimal.start - standard.start).num_hours(),
            all_slots,
        }
    }

    /// Distance driven by an average car that emits the same amount of CO₂ as saved.
    #[must_use]
    pub fn km_equivalent(&self) -> f64 {
        Grams::from(self.emissions_saved).0 / CAR_EMISSIONS_PER_KM.0
    }

    /// Mark the forecast hours that fall in the standard and optimal windows.
    pub fn annotate<'a>(
        &'a self,
        forecast: &'a CarbonForecast,
    ) -> impl Iterator<Item = AnnotatedSample> + 'a {
        forecast.samples().iter().map(|sample| AnnotatedSample {
            sample: *sample,
            is_standard_window: self.standard.contains(sample.timestamp),
            is_optimal_window: self.optimal.contains(sample.timestamp),
        })
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Serialize)]
pub struct AnnotatedSample {
    #[serde(flatten)]
    pub sample: HourlySample,

    pub is_standard_window: bool,
    pub is_optimal_window: bool,
}
