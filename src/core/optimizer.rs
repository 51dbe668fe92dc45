use bon::Builder;
use chrono::{DateTime, TimeDelta, Timelike, Utc};

use crate::{
    core::{
        error::{Error, Result},
        forecast::{CarbonForecast, HourlySample},
        profile::{Comparison, LoadProfile},
    },
    prelude::{debug, instrument},
    quantity::{intensity::GramsPerKilowattHour, mass::Kilograms, power::Megawatts},
};

/// Exhaustive search for the lowest-emission window of a constant load.
///
/// A one-day hourly forecast gives at most 24 candidates, so brute force is fine.
#[derive(Builder)]
pub struct ScheduleOptimizer<'a> {
    forecast: &'a CarbonForecast,

    /// Whole hours the load runs for.
    duration_hours: u32,

    /// Constant power drawn while running.
    load: Megawatts,
}

#[must_use]
pub struct OptimalSchedule {
    /// Lowest-emission candidate, [`None`] when no window fits into the forecast.
    pub best: Option<LoadProfile>,

    /// Every candidate with a full-length window, in chronological order.
    pub all_slots: Vec<LoadProfile>,
}

impl ScheduleOptimizer<'_> {
    /// Evaluate the window starting at the first sample with the given hour of day.
    ///
    /// # Returns
    ///
    /// - [`None`] if there is no sample at that hour, the window contains no samples,
    ///   or its end falls outside the representable time range.
    /// - Otherwise, the profile averaged over the samples that do fall inside the window,
    ///   even if there are fewer of them than the duration.
    #[must_use]
    pub fn evaluate_window(&self, start_hour: u32) -> Option<LoadProfile> {
        let start =
            self.forecast.samples().iter().find(|sample| sample.timestamp.hour() == start_hour)?;
        let (profile, _) = self.evaluate_from(start.timestamp)?;
        Some(profile)
    }

    /// Try every sample as the start, skipping the windows cut short by the end of the forecast.
    ///
    /// Ties keep the earliest candidate.
    #[instrument(skip_all, fields(duration_hours = self.duration_hours, load = %self.load))]
    pub fn find_optimal(&self) -> OptimalSchedule {
        let mut best: Option<LoadProfile> = None;
        let mut all_slots = Vec::new();

        for sample in self.forecast.samples() {
            let Some((profile, n_samples)) = self.evaluate_from(sample.timestamp) else {
                continue;
            };
            if n_samples < self.duration_hours as usize {
                continue;
            }
            if best.is_none_or(|best| profile.emissions < best.emissions) {
                best = Some(profile);
            }
            all_slots.push(profile);
        }

        debug!(n_candidates = all_slots.len(), best_start = ?best.map(|best| best.start));
        OptimalSchedule { best, all_slots }
    }

    /// Compare the habitual start hour against the optimum.
    pub fn compare(&self, standard_start_hour: u32) -> Result<Comparison> {
        let invalid_window = || Error::InvalidWindow {
            start_hour: standard_start_hour,
            duration_hours: self.duration_hours,
        };
        let standard = self.evaluate_window(standard_start_hour).ok_or_else(invalid_window)?;
        let OptimalSchedule { best, all_slots } = self.find_optimal();
        let optimal = best.ok_or_else(invalid_window)?;
        Ok(Comparison::new(standard, optimal, all_slots))
    }

    /// Average the intensity over the samples inside `[start, start + duration)`.
    ///
    /// Both the single-window evaluation and the search go through here,
    /// so that they always agree on the emissions.
    fn evaluate_from(&self, start: DateTime<Utc>) -> Option<(LoadProfile, usize)> {
        let duration = TimeDelta::hours(i64::from(self.duration_hours));
        let end = start.checked_add_signed(duration)?;
        let window: Vec<&HourlySample> = self
            .forecast
            .samples()
            .iter()
            .filter(|sample| (start <= sample.timestamp) && (sample.timestamp < end))
            .collect();
        if window.is_empty() {
            return None;
        }

        #[expect(clippy::cast_precision_loss)]
        let average_intensity = window
            .iter()
            .map(|sample| sample.carbon_intensity)
            .sum::<GramsPerKilowattHour>()
            / window.len() as f64;
        let energy = self.load * duration;
        let emissions = Kilograms::from(energy * average_intensity);

        let profile = LoadProfile {
            start,
            end,
            duration_hours: self.duration_hours,
            load: self.load,
            energy,
            average_intensity,
            emissions,
        };
        Some((profile, window.len()))
    }
}
