// src/schema/mod.rs

pub mod types;

pub use types::{SourceId, SourceSchema};

use crate::error::LoadError;
use crate::process::utils::clean_str;

pub mod inflation {
    pub const GENERAL_ANNUAL: &str = "General anual";
    pub const CORE_ANNUAL: &str = "Subyacente anual";
    pub const GENERAL_MONTHLY: &str = "General mensual";
}

pub mod activity {
    pub const MONTHLY: &str = "IGAE Mensual";
    pub const SEASONALLY_ADJUSTED: &str = "IGAE des";
}

pub const INDUSTRIAL_PRODUCTION_COLUMN: &str = "Produccion industrial";
pub const UNEMPLOYMENT_COLUMN: &str = "Tasa";

pub mod wages {
    pub const COMMERCE: &str = "Comercio";
    pub const MANUFACTURING: &str = "Manufactura";
}

pub const TARGET_RATE_COLUMN: &str = "Tasa objetivo";
pub const FX_COLUMN: &str = "Tipo de cambio";
pub const DOMESTIC_BOND_COLUMN: &str = "Bono M 10";
pub const REFERENCE_BOND_COLUMN: &str = "DGS10";

pub const INFLATION: SourceSchema = SourceSchema {
    id: SourceId::Inflation,
    default_file: "inflacion.csv",
    columns: &[
        inflation::GENERAL_ANNUAL,
        inflation::CORE_ANNUAL,
        inflation::GENERAL_MONTHLY,
    ],
};

pub const ACTIVITY: SourceSchema = SourceSchema {
    id: SourceId::Activity,
    default_file: "igae.csv",
    columns: &[activity::MONTHLY, activity::SEASONALLY_ADJUSTED],
};

pub const INDUSTRIAL_PRODUCTION: SourceSchema = SourceSchema {
    id: SourceId::IndustrialProduction,
    default_file: "produccion.csv",
    columns: &[INDUSTRIAL_PRODUCTION_COLUMN],
};

pub const UNEMPLOYMENT: SourceSchema = SourceSchema {
    id: SourceId::Unemployment,
    default_file: "desocupado.csv",
    columns: &[UNEMPLOYMENT_COLUMN],
};

pub const WAGES: SourceSchema = SourceSchema {
    id: SourceId::Wages,
    default_file: "remuneraciones.csv",
    columns: &[wages::COMMERCE, wages::MANUFACTURING],
};

pub const TARGET_RATE: SourceSchema = SourceSchema {
    id: SourceId::TargetRate,
    default_file: "objetivo.csv",
    columns: &[TARGET_RATE_COLUMN],
};

pub const FX: SourceSchema = SourceSchema {
    id: SourceId::Fx,
    default_file: "tipo.csv",
    columns: &[FX_COLUMN],
};

pub const DOMESTIC_BOND: SourceSchema = SourceSchema {
    id: SourceId::DomesticBond,
    default_file: "bono_m.csv",
    columns: &[DOMESTIC_BOND_COLUMN],
};

pub const REFERENCE_BOND: SourceSchema = SourceSchema {
    id: SourceId::ReferenceBond,
    default_file: "DGS10.csv",
    columns: &[REFERENCE_BOND_COLUMN],
};

/// Look up the built-in schema for `id`.
pub fn schema_for(id: SourceId) -> &'static SourceSchema {
    match id {
        SourceId::Inflation => &INFLATION,
        SourceId::Activity => &ACTIVITY,
        SourceId::IndustrialProduction => &INDUSTRIAL_PRODUCTION,
        SourceId::Unemployment => &UNEMPLOYMENT,
        SourceId::Wages => &WAGES,
        SourceId::TargetRate => &TARGET_RATE,
        SourceId::Fx => &FX,
        SourceId::DomesticBond => &DOMESTIC_BOND,
        SourceId::ReferenceBond => &REFERENCE_BOND,
    }
}

/// Match the value headers of a file (everything after the date column)
/// against `schema`.
///
/// Returns, for each schema column in schema order, the index of that column
/// within `value_headers`. Headers are compared after trimming whitespace and
/// outer quotes. Any schema column that is absent, any header not in the
/// schema, and any header repeated twice all fail with `SchemaMismatch`.
pub fn resolve_columns(
    schema: &SourceSchema,
    value_headers: &[String],
) -> Result<Vec<usize>, LoadError> {
    let cleaned: Vec<String> = value_headers.iter().map(|h| clean_str(h)).collect();

    let mut unexpected = Vec::new();
    let mut seen = vec![false; schema.columns.len()];
    for header in &cleaned {
        match schema.position(header) {
            Some(pos) if !seen[pos] => seen[pos] = true,
            // second copy of a schema column is as bad as a foreign column
            _ => unexpected.push(header.clone()),
        }
    }

    let missing: Vec<String> = schema
        .columns
        .iter()
        .zip(&seen)
        .filter(|(_, present)| !**present)
        .map(|(name, _)| name.to_string())
        .collect();

    if !missing.is_empty() || !unexpected.is_empty() {
        return Err(LoadError::SchemaMismatch {
            source_id: schema.id,
            missing,
            unexpected,
        });
    }

    Ok(schema
        .columns
        .iter()
        .filter_map(|col| cleaned.iter().position(|h| h == col))
        .collect())
}
