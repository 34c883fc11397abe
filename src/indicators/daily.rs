//! Daily indicator table: policy rate, real rate, FX and bond spreads.

use crate::error::Result;
use crate::process::{CleanedTable, SourceLoader};
use crate::schema::{self, inflation, SourceSchema};
use crate::transform;

use super::{column, tables, Assembled, IndicatorSet};

pub const TABLE_NAME: &str = "daily";

pub const TARGET_RATE: &str = "target_rate";
pub const REAL_RATE: &str = "real_rate";
pub const FX_YOY: &str = "fx_yoy";
pub const SOVEREIGN_SPREAD: &str = "sovereign_spread";
pub const TARGET_BOND_SPREAD: &str = "target_bond_spread";

pub const COLUMNS: [&str; 5] = [
    TARGET_RATE,
    REAL_RATE,
    FX_YOY,
    SOVEREIGN_SPREAD,
    TARGET_BOND_SPREAD,
];

pub const SOURCES: [&SourceSchema; 5] = [
    &schema::TARGET_RATE,
    &schema::INFLATION,
    &schema::FX,
    &schema::DOMESTIC_BOND,
    &schema::REFERENCE_BOND,
];

/// Derive every daily indicator from already cleaned sources.
///
/// The real rate subtracts monthly inflation, spread across each month's
/// calendar days, from the policy rate.
pub fn derive(
    target_table: &CleanedTable,
    inflation_table: &CleanedTable,
    fx_table: &CleanedTable,
    domestic_table: &CleanedTable,
    reference_table: &CleanedTable,
) -> IndicatorSet {
    let target = column(target_table, schema::TARGET_RATE_COLUMN);
    let daily_inflation =
        transform::resample_daily_ffill(&column(inflation_table, inflation::GENERAL_MONTHLY));
    let domestic = column(domestic_table, schema::DOMESTIC_BOND_COLUMN);
    let reference = column(reference_table, schema::REFERENCE_BOND_COLUMN);

    IndicatorSet::new()
        .with(TARGET_RATE, target.clone())
        .with(
            REAL_RATE,
            transform::difference(&target, &daily_inflation, REAL_RATE),
        )
        .with(
            FX_YOY,
            transform::yoy_growth(&column(fx_table, schema::FX_COLUMN)),
        )
        .with(
            SOVEREIGN_SPREAD,
            transform::difference(&domestic, &reference, SOVEREIGN_SPREAD),
        )
        .with(
            TARGET_BOND_SPREAD,
            transform::difference(&target, &domestic, TARGET_BOND_SPREAD),
        )
}

/// Load the five daily sources and build the aligned daily table.
#[tracing::instrument(level = "info", skip(loader))]
pub fn build_daily(loader: &SourceLoader) -> Result<Assembled> {
    let loaded = loader.load_many(&SOURCES)?;
    let [target_table, inflation_table, fx_table, domestic_table, reference_table] =
        tables::<5>(&loaded);
    let set = derive(
        target_table,
        inflation_table,
        fx_table,
        domestic_table,
        reference_table,
    );
    Ok(Assembled::new(set.materialize(TABLE_NAME), &loaded))
}
