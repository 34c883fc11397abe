//! Monthly indicator table: inflation, activity, labour and wages.

use crate::error::Result;
use crate::process::{CleanedTable, SourceLoader};
use crate::schema::{self, activity, inflation, wages, SourceSchema};
use crate::transform;

use super::{column, tables, Assembled, IndicatorSet};

pub const TABLE_NAME: &str = "monthly";

pub const GENERAL_INFLATION: &str = "general_inflation_annual";
pub const CORE_INFLATION: &str = "core_inflation_annual";
pub const ANNUALIZED_MONTHLY_INFLATION: &str = "monthly_inflation_annualized";
pub const SMOOTHED_INFLATION: &str = "smoothed_inflation_3m";
pub const ACTIVITY_YOY: &str = "activity_yoy";
pub const ACTIVITY_SA_MOM: &str = "activity_sa_mom";
pub const INDUSTRIAL_PRODUCTION_GROWTH: &str = "industrial_production_growth";
pub const UNEMPLOYMENT_RATE: &str = "unemployment_rate";
pub const COMMERCE_WAGES_YOY: &str = "commerce_wages_yoy";
pub const MANUFACTURING_WAGES_YOY: &str = "manufacturing_wages_yoy";

/// Output columns, in table order.
pub const COLUMNS: [&str; 10] = [
    GENERAL_INFLATION,
    CORE_INFLATION,
    ANNUALIZED_MONTHLY_INFLATION,
    SMOOTHED_INFLATION,
    ACTIVITY_YOY,
    ACTIVITY_SA_MOM,
    INDUSTRIAL_PRODUCTION_GROWTH,
    UNEMPLOYMENT_RATE,
    COMMERCE_WAGES_YOY,
    MANUFACTURING_WAGES_YOY,
];

pub const SOURCES: [&SourceSchema; 5] = [
    &schema::INFLATION,
    &schema::ACTIVITY,
    &schema::INDUSTRIAL_PRODUCTION,
    &schema::UNEMPLOYMENT,
    &schema::WAGES,
];

/// Window of the moving averages applied to monthly inflation and to
/// industrial production.
const SMOOTHING_WINDOW: usize = 3;

/// Derive every monthly indicator from already cleaned sources.
pub fn derive(
    inflation_table: &CleanedTable,
    activity_table: &CleanedTable,
    production_table: &CleanedTable,
    unemployment_table: &CleanedTable,
    wages_table: &CleanedTable,
) -> IndicatorSet {
    let monthly_inflation = column(inflation_table, inflation::GENERAL_MONTHLY);
    let production_ma = transform::moving_average(
        &column(production_table, schema::INDUSTRIAL_PRODUCTION_COLUMN),
        SMOOTHING_WINDOW,
    );

    IndicatorSet::new()
        .with(
            GENERAL_INFLATION,
            column(inflation_table, inflation::GENERAL_ANNUAL),
        )
        .with(CORE_INFLATION, column(inflation_table, inflation::CORE_ANNUAL))
        .with(
            ANNUALIZED_MONTHLY_INFLATION,
            transform::annualize_monthly_rate(&monthly_inflation).dropna(),
        )
        .with(
            SMOOTHED_INFLATION,
            transform::moving_average(&monthly_inflation, SMOOTHING_WINDOW),
        )
        .with(
            ACTIVITY_YOY,
            transform::yoy_growth(&column(activity_table, activity::MONTHLY)),
        )
        .with(
            ACTIVITY_SA_MOM,
            transform::mom_growth(&column(activity_table, activity::SEASONALLY_ADJUSTED)),
        )
        .with(
            INDUSTRIAL_PRODUCTION_GROWTH,
            transform::quarterly_annualized_growth(&production_ma),
        )
        .with(
            UNEMPLOYMENT_RATE,
            column(unemployment_table, schema::UNEMPLOYMENT_COLUMN),
        )
        .with(
            COMMERCE_WAGES_YOY,
            transform::yoy_growth(&column(wages_table, wages::COMMERCE)),
        )
        .with(
            MANUFACTURING_WAGES_YOY,
            transform::yoy_growth(&column(wages_table, wages::MANUFACTURING)),
        )
}

/// Load the five monthly sources and build the aligned monthly table.
#[tracing::instrument(level = "info", skip(loader))]
pub fn build_monthly(loader: &SourceLoader) -> Result<Assembled> {
    let loaded = loader.load_many(&SOURCES)?;
    let [inflation_table, activity_table, production_table, unemployment_table, wages_table] =
        tables::<5>(&loaded);
    let set = derive(
        inflation_table,
        activity_table,
        production_table,
        unemployment_table,
        wages_table,
    );
    Ok(Assembled::new(set.materialize(TABLE_NAME), &loaded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::fixtures::{self, month};
    use crate::process::DataWarning;
    use crate::schema::SourceId;
    use anyhow::Result;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_build_monthly_from_fixtures() -> Result<()> {
        crate::process::tests::init_test_logging();
        let dir = tempfile::tempdir()?;
        let settings = fixtures::write_sources(dir.path());
        let out = build_monthly(&SourceLoader::new(settings))?;
        let table = &out.table;

        assert_eq!(table.name(), TABLE_NAME);
        assert_eq!(table.columns(), COLUMNS.map(String::from).as_slice());
        // unemployment starts at month 17, after every warm-up window
        assert_eq!(table.first_date(), Some(month(17)));
        assert_eq!(table.last_date(), Some(month(fixtures::MONTHS - 1)));
        assert_eq!(table.len(), (fixtures::MONTHS - 17) as usize);

        let at = month(24);
        assert!(close(table.value(at, GENERAL_INFLATION).unwrap(), 4.24));
        assert_eq!(table.value(at, CORE_INFLATION), Some(3.5));
        let annualized = ((1.0f64 + 0.3 / 100.0).powi(12) - 1.0) * 100.0;
        assert!(close(table.value(at, ANNUALIZED_MONTHLY_INFLATION).unwrap(), annualized));
        assert!(close(table.value(at, SMOOTHED_INFLATION).unwrap(), 0.3));
        assert!(close(table.value(at, ACTIVITY_YOY).unwrap(), (1.01f64.powi(12) - 1.0) * 100.0));
        assert!(close(table.value(at, ACTIVITY_SA_MOM).unwrap(), 1.0));
        // MA3 of 100+i is 99+i, so growth compares 123 with 120
        let ip = ((123.0f64 / 120.0).powi(4) - 1.0) * 100.0;
        assert!(close(table.value(at, INDUSTRIAL_PRODUCTION_GROWTH).unwrap(), ip));
        assert_eq!(table.value(at, UNEMPLOYMENT_RATE), Some(4.0));
        assert!(close(table.value(at, COMMERCE_WAGES_YOY).unwrap(), 5.0));
        assert!(close(table.value(at, MANUFACTURING_WAGES_YOY).unwrap(), 0.0));

        assert_eq!(
            out.warnings,
            vec![DataWarning::ApproximatedData {
                source: SourceId::Inflation,
                column: inflation::GENERAL_MONTHLY.to_string(),
                longest_gap: 2,
            }]
        );
        let sources: Vec<SourceId> = out.stats.iter().map(|(id, _)| *id).collect();
        assert_eq!(sources, SOURCES.map(|s| s.id).to_vec());
        Ok(())
    }

    #[test]
    fn test_parallel_load_matches_sequential() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let settings = fixtures::write_sources(dir.path());
        let sequential = build_monthly(&SourceLoader::new(settings.clone()))?;
        let parallel = build_monthly(&SourceLoader::new(crate::config::Settings {
            parallel_loads: true,
            ..settings
        }))?;
        assert_eq!(sequential.table, parallel.table);
        assert_eq!(sequential.warnings, parallel.warnings);
        Ok(())
    }

    #[test]
    fn test_missing_source_aborts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let settings = fixtures::write_sources(dir.path());
        std::fs::remove_file(dir.path().join("remuneraciones.csv"))?;
        let err = build_monthly(&SourceLoader::new(settings)).unwrap_err();
        assert!(matches!(err, crate::error::LoadError::Io { .. }));
        Ok(())
    }
}
