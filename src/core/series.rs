use std::collections::BTreeMap;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use itertools::Itertools;

use crate::quantity::power::Megawatts;

pub const ONE_HOUR: TimeDelta = TimeDelta::hours(1);

pub type HourlySeries = BTreeMap<DateTime<Utc>, Megawatts>;

impl<T> ResampleHourly for T where T: ?Sized {}

pub trait ResampleHourly {
    /// Fold the sub-regions by summing the values that share a timestamp,
    /// then average the folded points within each hour.
    #[must_use]
    fn resample_hourly(self) -> HourlySeries
    where
        Self: Sized + IntoIterator<Item = (DateTime<Utc>, Megawatts)>,
    {
        self.into_iter()
            .into_grouping_map()
            .sum()
            .into_iter()
            .filter_map(|(timestamp, value)| {
                Some((timestamp.duration_trunc(ONE_HOUR).ok()?, value))
            })
            .into_group_map()
            .into_iter()
            .map(|(hour, values)| {
                #[expect(clippy::cast_precision_loss)]
                let n = values.len() as f64;
                (hour, values.into_iter().sum::<Megawatts>() / n)
            })
            .collect()
    }
}

/// Join the hourly series onto one continuous hourly grid,
/// spanning from the earliest to the latest hour of any series.
///
/// Hours missing from a series are filled with zero.
#[must_use]
pub fn align<const N: usize>(series: &[HourlySeries; N]) -> Vec<(DateTime<Utc>, [Megawatts; N])> {
    let Some(first_hour) = series.iter().filter_map(|series| series.keys().next()).min().copied()
    else {
        return Vec::new();
    };
    let Some(last_hour) =
        series.iter().filter_map(|series| series.keys().next_back()).max().copied()
    else {
        return Vec::new();
    };

    let mut aligned = Vec::new();
    let mut hour = first_hour;
    while hour <= last_hour {
        let values =
            std::array::from_fn(|index| series[index].get(&hour).copied().unwrap_or_default());
        aligned.push((hour, values));
        hour += ONE_HOUR;
    }
    aligned
}
