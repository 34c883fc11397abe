// src/schema/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every tabular source the assemblers know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Inflation,
    Activity,
    IndustrialProduction,
    Unemployment,
    Wages,
    TargetRate,
    Fx,
    DomesticBond,
    ReferenceBond,
}

impl SourceId {
    pub const ALL: [SourceId; 9] = [
        SourceId::Inflation,
        SourceId::Activity,
        SourceId::IndustrialProduction,
        SourceId::Unemployment,
        SourceId::Wages,
        SourceId::TargetRate,
        SourceId::Fx,
        SourceId::DomesticBond,
        SourceId::ReferenceBond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Inflation => "inflation",
            SourceId::Activity => "activity",
            SourceId::IndustrialProduction => "industrial_production",
            SourceId::Unemployment => "unemployment",
            SourceId::Wages => "wages",
            SourceId::TargetRate => "target_rate",
            SourceId::Fx => "fx",
            SourceId::DomesticBond => "domestic_bond",
            SourceId::ReferenceBond => "reference_bond",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        SourceId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == wanted)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected shape of one source file.
///
/// The first column is always the date and its header is ignored. Every
/// entry in `columns` is a value column read as `f64`; the file may list them
/// in any order but must contain exactly this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSchema {
    pub id: SourceId,
    pub default_file: &'static str,
    pub columns: &'static [&'static str],
}

impl SourceSchema {
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }
}
