//! Structured, non-fatal observations made while cleaning a source.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::schema::SourceId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    /// The first fully populated row is recent, so little history survives
    /// the leading trim.
    LowHistory {
        source: SourceId,
        first_complete: NaiveDate,
        threshold_year: i32,
    },
    /// A column had a run of two or more missing cells that forward-fill
    /// papered over.
    ApproximatedData {
        source: SourceId,
        column: String,
        longest_gap: usize,
    },
}

impl DataWarning {
    pub fn source(&self) -> SourceId {
        match self {
            DataWarning::LowHistory { source, .. } => *source,
            DataWarning::ApproximatedData { source, .. } => *source,
        }
    }

    /// `Some` when `first_complete` falls in or after `threshold_year`.
    pub fn low_history(
        source: SourceId,
        first_complete: NaiveDate,
        threshold_year: i32,
    ) -> Option<Self> {
        (first_complete.year() >= threshold_year).then_some(DataWarning::LowHistory {
            source,
            first_complete,
            threshold_year,
        })
    }
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::LowHistory {
                source,
                first_complete,
                threshold_year,
            } => write!(
                f,
                "{source}: little history after leading trim (first complete row {first_complete}, threshold {threshold_year})"
            ),
            DataWarning::ApproximatedData {
                source,
                column,
                longest_gap,
            } => write!(
                f,
                "{source}: approximated data in `{column}` ({longest_gap} consecutive missing values forward-filled)"
            ),
        }
    }
}

/// Row accounting for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Data records in the file.
    pub rows_read: usize,
    /// Records whose date cell did not parse.
    pub dropped_undated: usize,
    /// Records repeating an earlier date.
    pub dropped_duplicates: usize,
    /// Rows cut before the first fully populated date.
    pub trimmed_leading: usize,
    /// Cells filled by carrying the previous value forward.
    pub filled_cells: usize,
}
