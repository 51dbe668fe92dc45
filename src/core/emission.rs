//! Canonical emission factor table, in grams of CO₂-equivalent per kilowatt-hour.
//!
//! Both the forecast and the real-time production snapshot read from this one table.
//! The forecast cannot tell nuclear from gas, so its residual category is blended
//! from the per-fuel factors with [`THERMAL_AND_NUCLEAR_MIX`].

use std::{convert::Infallible, str::FromStr};

use serde::Serialize;

use crate::quantity::intensity::GramsPerKilowattHour;

/// Typical Belgian split of the non-weather-dependent generation.
pub const THERMAL_AND_NUCLEAR_MIX: [(FuelType, f64); 2] =
    [(FuelType::Nuclear, 0.6), (FuelType::FossilGas, 0.4)];

/// ENTSO-E production type.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, derive_more::Display,
)]
pub enum FuelType {
    #[display("Biomass")]
    #[serde(rename = "Biomass")]
    Biomass,

    #[display("Fossil Brown coal/Lignite")]
    #[serde(rename = "Fossil Brown coal/Lignite")]
    FossilBrownCoal,

    #[display("Fossil Coal-derived gas")]
    #[serde(rename = "Fossil Coal-derived gas")]
    FossilCoalDerivedGas,

    #[display("Fossil Gas")]
    #[serde(rename = "Fossil Gas")]
    FossilGas,

    #[display("Fossil Hard coal")]
    #[serde(rename = "Fossil Hard coal")]
    FossilHardCoal,

    #[display("Fossil Oil")]
    #[serde(rename = "Fossil Oil")]
    FossilOil,

    #[display("Geothermal")]
    #[serde(rename = "Geothermal")]
    Geothermal,

    #[display("Hydro Pumped Storage")]
    #[serde(rename = "Hydro Pumped Storage")]
    HydroPumpedStorage,

    #[display("Hydro Run-of-river")]
    #[serde(rename = "Hydro Run-of-river")]
    HydroRunOfRiver,

    #[display("Hydro Water Reservoir")]
    #[serde(rename = "Hydro Water Reservoir")]
    HydroWaterReservoir,

    #[display("Marine")]
    #[serde(rename = "Marine")]
    Marine,

    #[display("Nuclear")]
    #[serde(rename = "Nuclear")]
    Nuclear,

    #[display("Other renewable")]
    #[serde(rename = "Other renewable")]
    OtherRenewable,

    #[display("Solar")]
    #[serde(rename = "Solar")]
    Solar,

    #[display("Waste")]
    #[serde(rename = "Waste")]
    Waste,

    #[display("Wind Offshore")]
    #[serde(rename = "Wind Offshore")]
    WindOffshore,

    #[display("Wind Onshore")]
    #[serde(rename = "Wind Onshore")]
    WindOnshore,

    #[display("Other")]
    #[serde(rename = "Other")]
    Other,
}

impl FuelType {
    pub const fn emission_factor(self) -> GramsPerKilowattHour {
        GramsPerKilowattHour(match self {
            Self::Solar => 15.0,
            Self::WindOnshore | Self::WindOffshore => 11.5,
            Self::Nuclear => 5.0,
            Self::FossilGas => 490.0,
            Self::FossilHardCoal => 820.0,
            Self::HydroWaterReservoir | Self::HydroRunOfRiver => 24.0,
            Self::Biomass => 230.0,

            // Waste, «other», and everything without a published factor:
            _ => 200.0,
        })
    }
}

impl FromStr for FuelType {
    type Err = Infallible;

    /// Parse the `psrType` code. Unknown codes fall back to [`FuelType::Other`].
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Ok(match code {
            "B01" => Self::Biomass,
            "B02" => Self::FossilBrownCoal,
            "B03" => Self::FossilCoalDerivedGas,
            "B04" => Self::FossilGas,
            "B05" => Self::FossilHardCoal,
            "B06" => Self::FossilOil,
            "B09" => Self::Geothermal,
            "B10" => Self::HydroPumpedStorage,
            "B11" => Self::HydroRunOfRiver,
            "B12" => Self::HydroWaterReservoir,
            "B13" => Self::Marine,
            "B14" => Self::Nuclear,
            "B15" => Self::OtherRenewable,
            "B16" => Self::Solar,
            "B17" => Self::Waste,
            "B18" => Self::WindOffshore,
            "B19" => Self::WindOnshore,
            _ => Self::Other,
        })
    }
}

/// Generation category available in the day-ahead forecast feeds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ForecastSource {
    Solar,
    Wind,

    /// Residual generation: load minus wind minus solar.
    ThermalAndNuclear,
}

impl ForecastSource {
    pub fn emission_factor(self) -> GramsPerKilowattHour {
        match self {
            Self::Solar => FuelType::Solar.emission_factor(),
            Self::Wind => FuelType::WindOnshore.emission_factor(),
            Self::ThermalAndNuclear => THERMAL_AND_NUCLEAR_MIX
                .iter()
                .map(|(fuel_type, share)| fuel_type.emission_factor() * *share)
                .sum(),
        }
    }
}
