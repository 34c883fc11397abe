//! Indicator assembly: load sources, derive series, align them by date.

pub mod daily;
pub mod monthly;
pub mod set;

#[cfg(test)]
pub(crate) mod fixtures;

pub use daily::build_daily;
pub use monthly::build_monthly;
pub use set::{IndicatorSet, IndicatorTable};

use tracing::{info, warn};

use crate::process::{CleanedTable, DataWarning, LoadStats, LoadedTable};
use crate::schema::SourceId;
use crate::series::Series;

/// An assembled indicator table plus what loading its sources reported.
#[derive(Debug, Clone)]
pub struct Assembled {
    pub table: IndicatorTable,
    /// Warnings from every source, grouped by source in load order.
    pub warnings: Vec<DataWarning>,
    pub stats: Vec<(SourceId, LoadStats)>,
}

impl Assembled {
    fn new(table: IndicatorTable, loaded: &[LoadedTable]) -> Self {
        let warnings: Vec<DataWarning> = loaded
            .iter()
            .flat_map(|l| l.warnings.iter().cloned())
            .collect();
        let stats = loaded
            .iter()
            .map(|l| (l.table.source(), l.stats))
            .collect();
        info!(
            table = table.name(),
            rows = table.len(),
            columns = table.columns().len(),
            first = ?table.first_date(),
            last = ?table.last_date(),
            warnings = warnings.len(),
            "assembled"
        );
        Self {
            table,
            warnings,
            stats,
        }
    }
}

/// Borrow the cleaned tables of `loaded` as a fixed-size array, in load order.
fn tables<const N: usize>(loaded: &[LoadedTable]) -> [&CleanedTable; N] {
    std::array::from_fn(|i| &loaded[i].table)
}

/// Pull a schema column out of a cleaned table.
fn column(table: &CleanedTable, name: &str) -> Series {
    table.column(name).unwrap_or_else(|| {
        warn!(source = %table.source(), column = name, "column absent, using empty series");
        Series::new(name, Vec::new(), Vec::new())
    })
}
