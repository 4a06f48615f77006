//! Terminal renderings of the reports.

use chrono::{Month, NaiveDate};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use ordered_float::OrderedFloat;

use crate::{
    api::pvwatts,
    core::{
        consumption::ShavingReport,
        series::{self, HourProfile, MonthlyTotals},
        session::EstimateOutcome,
    },
    quantity::energy::KilowattHours,
    report::Summary,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn month_name(month: u32) -> &'static str {
    #[allow(clippy::cast_possible_truncation)]
    Month::try_from(month as u8).map_or("?", |month| month.name())
}

#[must_use]
pub fn build_summary_table(summary: &Summary, outcome: &EstimateOutcome) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Statistic", "Value"]);

    let total_label = if outcome.secondary.is_some() {
        "Annual total (2 azimuths)"
    } else {
        "Annual total"
    };
    table.add_row(vec![
        Cell::new(total_label),
        Cell::new(format!("{:.1} kWh", summary.annual_total.0))
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Mean per day"),
        Cell::new(format!("{:.2} kWh", summary.mean_per_day.0))
            .set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Weakest day"),
        Cell::new(format!("{} · {:.2} kWh", summary.weakest_day.day, summary.weakest_day.energy.0))
            .set_alignment(CellAlignment::Right)
            .fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Most productive day"),
        Cell::new(format!("{} · {:.2} kWh", summary.best_day.day, summary.best_day.energy.0))
            .set_alignment(CellAlignment::Right)
            .fg(Color::Green),
    ]);

    if let (Some(shares), Some(secondary)) = (&summary.shares, &outcome.secondary) {
        table.add_row(vec![
            Cell::new(format!("Azimuth {} share", outcome.primary.azimuth)),
            Cell::new(format!("{:.1} %", shares.primary_percent))
                .set_alignment(CellAlignment::Right),
        ]);
        table.add_row(vec![
            Cell::new(format!("Azimuth {} share", secondary.azimuth)),
            Cell::new(format!("{:.1} %", shares.secondary_percent))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

#[must_use]
pub fn build_monthly_table(outcome: &EstimateOutcome) -> Table {
    let primary_monthly = series::monthly_totals_from_daily(&outcome.primary.daily);
    let secondary_monthly = outcome
        .secondary
        .as_ref()
        .map(|secondary| series::monthly_totals_from_daily(&secondary.daily));

    let mut table = new_table();
    let mut header = vec![
        Cell::new("Month"),
        Cell::new(format!("Azimuth {}", outcome.primary.azimuth)),
    ];
    if let Some(secondary) = &outcome.secondary {
        header.push(Cell::new(format!("Azimuth {}", secondary.azimuth)));
        header.push(Cell::new("Total"));
    }
    table.set_header(header);

    let highlight = monthly_extremes(&primary_monthly, secondary_monthly.as_ref());
    for month in 1..=12 {
        let primary = primary_monthly.for_month(month);
        let mut row = vec![Cell::new(month_name(month))];
        match &secondary_monthly {
            Some(secondary_totals) => {
                let secondary = secondary_totals.for_month(month);
                row.push(Cell::new(primary).set_alignment(CellAlignment::Right));
                row.push(Cell::new(secondary).set_alignment(CellAlignment::Right));
                row.push(
                    Cell::new(primary + secondary)
                        .set_alignment(CellAlignment::Right)
                        .fg(highlight.color_for(month)),
                );
            }
            None => {
                row.push(
                    Cell::new(primary)
                        .set_alignment(CellAlignment::Right)
                        .fg(highlight.color_for(month)),
                );
            }
        }
        table.add_row(row);
    }

    let mut total_row = vec![
        Cell::new("ANNUAL TOTAL").add_attribute(Attribute::Bold),
        Cell::new(primary_monthly.total())
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ];
    if let Some(secondary) = &secondary_monthly {
        total_row.push(
            Cell::new(secondary.total())
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
        );
        total_row.push(
            Cell::new(primary_monthly.total() + secondary.total())
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold),
        );
    }
    table.add_row(total_row);
    table
}

struct MonthlyExtremes {
    best: u32,
    weakest: u32,
}

impl MonthlyExtremes {
    fn color_for(&self, month: u32) -> Color {
        if month == self.best {
            Color::Green
        } else if month == self.weakest {
            Color::Red
        } else {
            Color::Reset
        }
    }
}

fn monthly_extremes(
    primary: &MonthlyTotals,
    secondary: Option<&MonthlyTotals>,
) -> MonthlyExtremes {
    let combined = |month: u32| {
        primary.for_month(month)
            + secondary.map_or(KilowattHours::ZERO, |totals| totals.for_month(month))
    };
    let best = (1..=12).max_by_key(|month| OrderedFloat(combined(*month).0)).unwrap_or(1);
    let weakest = (1..=12).min_by_key(|month| OrderedFloat(combined(*month).0)).unwrap_or(1);
    MonthlyExtremes { best, weakest }
}

/// One labelled column of an hourly profile table.
pub struct ProfileColumn {
    pub label: String,
    pub profile: HourProfile,
}

#[must_use]
pub fn build_profile_table(columns: &[ProfileColumn]) -> Table {
    let mut table = new_table();
    let mut header = vec![Cell::new("Hour")];
    header.extend(columns.iter().map(|column| Cell::new(&column.label)));
    table.set_header(header);

    for hour in 0..24 {
        let mut row = vec![Cell::new(format!("{hour:02}h"))];
        row.extend(columns.iter().map(|column| {
            let energy = column.profile[hour];
            let cell = Cell::new(energy).set_alignment(CellAlignment::Right);
            if energy == KilowattHours::ZERO { cell.add_attribute(Attribute::Dim) } else { cell }
        }));
        table.add_row(row);
    }
    table
}

/// Envelope days drawn alongside a single-orientation day profile, after the
/// original report: the solstices of the PVWatts reference year.
#[must_use]
pub fn solstice_days() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(pvwatts::REFERENCE_YEAR, 6, 21).unwrap_or_default(),
        NaiveDate::from_ymd_opt(pvwatts::REFERENCE_YEAR, 12, 21).unwrap_or_default(),
    )
}

#[must_use]
pub fn build_self_consumption_table(report: &ShavingReport) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Month"),
        Cell::new("Shaved").fg(Color::Green),
        Cell::new("Surplus").fg(Color::DarkYellow),
        Cell::new("Remaining load"),
        Cell::new("Self-consumption"),
    ]);
    for month in 1..=12 {
        table.add_row(vec![
            Cell::new(month_name(month)),
            Cell::new(report.shaved_by_month().for_month(month))
                .set_alignment(CellAlignment::Right)
                .fg(Color::Green),
            Cell::new(report.surplus_by_month().for_month(month))
                .set_alignment(CellAlignment::Right)
                .fg(Color::DarkYellow),
            Cell::new(report.remaining_consumption(month)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1} %", report.monthly_rate(month)))
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("YEAR").add_attribute(Attribute::Bold),
        Cell::new(report.total_shaved())
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold)
            .fg(Color::Green),
        Cell::new(report.total_surplus())
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold)
            .fg(Color::DarkYellow),
        Cell::new(""),
        Cell::new(format!("{:.1} %", report.self_consumption_rate()))
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
    ]);
    table
}
