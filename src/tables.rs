use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        forecast::{CarbonForecast, ForecastSummary},
        production::ProductionSnapshot,
        profile::{AnnotatedSample, Comparison, LoadProfile},
    },
    quantity::{intensity::GramsPerKilowattHour, mass::Kilograms},
};

/// Grams per kilowatt-hour per bar block.
const BAR_SCALE: f64 = 10.0;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn intensity_color(intensity: GramsPerKilowattHour, mean: GramsPerKilowattHour) -> Color {
    if intensity > mean { Color::Red } else { Color::Green }
}

pub fn build_forecast_table(forecast: &CarbonForecast) -> Table {
    let mean = forecast.summary().map_or(GramsPerKilowattHour::ZERO, |summary| {
        summary.avg_carbon_intensity
    });

    let mut table = new_table();
    table.set_header(vec![
        "Date",
        "Hour",
        "Load",
        "Wind",
        "Solar",
        "Thermal & nuclear",
        "Intensity",
    ]);
    for sample in forecast.samples() {
        table.add_row(vec![
            Cell::new(sample.timestamp.format("%b %d")).add_attribute(Attribute::Dim),
            Cell::new(sample.timestamp.format("%H:%M")),
            Cell::new(sample.total_load).set_alignment(CellAlignment::Right),
            Cell::new(sample.wind).set_alignment(CellAlignment::Right).fg(Color::Cyan),
            Cell::new(sample.solar).set_alignment(CellAlignment::Right).fg(Color::Yellow),
            Cell::new(sample.thermal_and_nuclear)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new(sample.carbon_intensity)
                .set_alignment(CellAlignment::Right)
                .fg(intensity_color(sample.carbon_intensity, mean)),
        ]);
    }
    table
}

pub fn build_summary_table(summary: &ForecastSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Hours", "Min", "Mean", "Max", "Load", "Wind", "Solar"]);
    table.add_row(vec![
        Cell::new(summary.date),
        Cell::new(summary.total_hours),
        Cell::new(summary.min_carbon_intensity).fg(Color::Green),
        Cell::new(summary.avg_carbon_intensity),
        Cell::new(summary.max_carbon_intensity).fg(Color::Red),
        Cell::new(summary.total_load).set_alignment(CellAlignment::Right),
        Cell::new(summary.total_wind).set_alignment(CellAlignment::Right).fg(Color::Cyan),
        Cell::new(summary.total_solar).set_alignment(CellAlignment::Right).fg(Color::Yellow),
    ]);
    table
}

pub fn build_comparison_table(comparison: &Comparison) -> Table {
    fn profile_row(name: &str, profile: &LoadProfile, color: Color) -> Vec<Cell> {
        vec![
            Cell::new(name).fg(color).add_attribute(Attribute::Bold),
            Cell::new(profile.start.format("%H:%M")),
            Cell::new(profile.end.format("%H:%M")).add_attribute(Attribute::Dim),
            Cell::new(profile.load).set_alignment(CellAlignment::Right),
            Cell::new(profile.energy).set_alignment(CellAlignment::Right),
            Cell::new(profile.average_intensity).set_alignment(CellAlignment::Right),
            Cell::new(profile.emissions).set_alignment(CellAlignment::Right).fg(color),
        ]
    }

    let mut table = new_table();
    table.set_header(vec!["Profile", "Start", "End", "Load", "Energy", "Intensity", "Emissions"]);
    table.add_row(profile_row("Standard", &comparison.standard, Color::Red));
    table.add_row(profile_row("Optimal", &comparison.optimal, Color::Green));
    table.add_row(vec![
        Cell::new("Savings").add_attribute(Attribute::Bold),
        Cell::new(format!("{:+} h", comparison.time_shift_hours)),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{:.1}%", comparison.saved_percentage))
            .set_alignment(CellAlignment::Right),
        Cell::new(comparison.emissions_saved).set_alignment(CellAlignment::Right).fg(
            if comparison.emissions_saved > Kilograms::ZERO { Color::Green } else { Color::Reset },
        ),
    ]);
    table
}

pub fn build_hourly_profile_table(samples: impl IntoIterator<Item = AnnotatedSample>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Hour", "Intensity", "", "Window"]);
    for AnnotatedSample { sample, is_standard_window, is_optimal_window } in samples {
        let window = match (is_standard_window, is_optimal_window) {
            (true, true) => Cell::new("STANDARD + OPTIMAL").fg(Color::Yellow),
            (true, false) => Cell::new("STANDARD").fg(Color::Red),
            (false, true) => Cell::new("OPTIMAL").fg(Color::Green),
            (false, false) => Cell::new(""),
        };
        table.add_row(vec![
            Cell::new(sample.timestamp.format("%H:%M")),
            Cell::new(intensity_bar(sample.carbon_intensity)).fg(Color::DarkGrey),
            Cell::new(sample.carbon_intensity).set_alignment(CellAlignment::Right),
            window,
        ]);
    }
    table
}

pub fn build_production_table(snapshot: &ProductionSnapshot) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Fuel type", "Power", "Share", "Factor"]);
    for (fuel_type, power) in &snapshot.production {
        let share = if snapshot.total.0 > 0.0 { power.0 / snapshot.total.0 * 100.0 } else { 0.0 };
        table.add_row(vec![
            Cell::new(fuel_type),
            Cell::new(power).set_alignment(CellAlignment::Right),
            Cell::new(format!("{share:.1}%")).set_alignment(CellAlignment::Right),
            Cell::new(fuel_type.emission_factor())
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table.add_row(vec![
        Cell::new(&snapshot.timestamp).add_attribute(Attribute::Dim),
        Cell::new(snapshot.total)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(snapshot.carbon_intensity)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);
    table
}

fn intensity_bar(intensity: GramsPerKilowattHour) -> String {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_blocks = (intensity.0 / BAR_SCALE).max(0.0) as usize;
    "█".repeat(n_blocks)
}
