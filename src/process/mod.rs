// src/process/mod.rs
pub mod date_parser;
pub mod decode;
pub mod report;
pub mod trimming;
pub mod utils;

pub use decode::Encoding;
pub use report::{DataWarning, LoadStats};

use chrono::NaiveDate;
use csv::ReaderBuilder;
use rayon::prelude::*;
use std::{
    collections::{btree_map::Entry, BTreeMap},
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, trace, warn};

use crate::config::Settings;
use crate::error::{LoadError, Result};
use crate::schema::{self, SourceId, SourceSchema};
use crate::series::Series;

/// One source file as read, before any cleaning.
#[derive(Debug)]
pub struct RawTable {
    /// Header of the first column. Ignored beyond logging.
    pub date_header: String,
    /// Value column headers, in file order.
    pub headers: Vec<String>,
    /// Each record as (first-column text, remaining cells). Short records
    /// are padded with empty cells.
    pub rows: Vec<(String, Vec<String>)>,
}

/// Date-indexed numeric table produced by the loader.
///
/// Dates are unique and strictly ascending. Columns follow the schema order
/// and are stored column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable {
    source: SourceId,
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Vec<Vec<Option<f64>>>,
}

impl CleanedTable {
    pub fn source(&self) -> SourceId {
        self.source
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn values_of(&self, column: &str) -> Option<&[Option<f64>]> {
        let pos = self.columns.iter().position(|c| c == column)?;
        Some(&self.values[pos])
    }

    /// Copy one column out as a series named after the column.
    pub fn column(&self, column: &str) -> Option<Series> {
        let values = self.values_of(column)?;
        Some(Series::new(column, self.dates.clone(), values.to_vec()))
    }

    pub fn missing_cells(&self) -> usize {
        self.values
            .iter()
            .map(|col| col.iter().filter(|v| v.is_none()).count())
            .sum()
    }
}

/// A cleaned table together with everything observed while producing it.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: CleanedTable,
    pub warnings: Vec<DataWarning>,
    pub stats: LoadStats,
    /// Encoding that actually decoded the file.
    pub encoding: Encoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub primary_encoding: Encoding,
    pub fallback_encoding: Encoding,
    pub recency_threshold_year: i32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Settings::default().load_options()
    }
}

/// Split decoded CSV text into a header and records.
pub fn read_raw_table(text: &str, name: &str) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = rdr
        .headers()
        .map_err(|source| LoadError::Csv {
            name: name.to_string(),
            source,
        })?
        .clone();
    let mut header_iter = header.iter();
    let date_header = match header_iter.next() {
        Some(h) => h.to_string(),
        None => {
            return Err(LoadError::MissingHeader {
                name: name.to_string(),
            })
        }
    };
    let headers: Vec<String> = header_iter.map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|source| LoadError::Csv {
            name: name.to_string(),
            source,
        })?;
        if record.len() > header.len() {
            return Err(LoadError::RowWidth {
                name: name.to_string(),
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: header.len(),
                found: record.len(),
            });
        }
        let mut cells = record.iter();
        let date = cells.next().unwrap_or_default().to_string();
        let mut values: Vec<String> = cells.map(str::to_string).collect();
        values.resize(headers.len(), String::new());
        rows.push((date, values));
    }

    Ok(RawTable {
        date_header,
        headers,
        rows,
    })
}

/// Turn a raw table into a cleaned one: validate the header against the
/// schema, parse dates day-first (dropping rows that don't parse), keep the
/// first row per date, coerce values, cut the incomplete lead-in and
/// forward-fill what remains.
pub fn clean_raw_table(
    raw: RawTable,
    schema: &SourceSchema,
    options: &LoadOptions,
) -> Result<(CleanedTable, Vec<DataWarning>, LoadStats)> {
    let order = schema::resolve_columns(schema, &raw.headers)?;
    let mut stats = LoadStats {
        rows_read: raw.rows.len(),
        ..LoadStats::default()
    };
    trace!(date_header = %raw.date_header, rows = raw.rows.len(), "cleaning");

    // date → values in schema order; first occurrence wins
    let mut by_date: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
    for (line, (date_text, cells)) in raw.rows.iter().enumerate() {
        let Some(date) = date_parser::parse_day_first(date_text) else {
            debug!(source = %schema.id, line, date = %date_text, "dropping row with unparseable date");
            stats.dropped_undated += 1;
            continue;
        };
        match by_date.entry(date) {
            Entry::Vacant(slot) => {
                slot.insert(
                    order
                        .iter()
                        .map(|&i| cells.get(i).and_then(|c| utils::parse_numeric(c)))
                        .collect(),
                );
            }
            Entry::Occupied(_) => {
                debug!(source = %schema.id, %date, "dropping duplicate date");
                stats.dropped_duplicates += 1;
            }
        }
    }

    let mut dates = Vec::with_capacity(by_date.len());
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(by_date.len()); order.len()];
    for (date, row) in by_date {
        dates.push(date);
        for (col, cell) in values.iter_mut().zip(row) {
            col.push(cell);
        }
    }

    let mut warnings = Vec::new();
    let start = trimming::first_complete_row(&values, dates.len()).unwrap_or(dates.len());
    stats.trimmed_leading = start;
    dates.drain(..start);
    for col in values.iter_mut() {
        col.drain(..start);
    }

    if let Some(&first) = dates.first() {
        if let Some(w) =
            DataWarning::low_history(schema.id, first, options.recency_threshold_year)
        {
            warn!("{}", w);
            warnings.push(w);
        }
    }

    let columns: Vec<String> = schema.columns.iter().map(|c| c.to_string()).collect();
    for (name, col) in columns.iter().zip(values.iter_mut()) {
        let fill = trimming::forward_fill(col);
        stats.filled_cells += fill.filled;
        if fill.longest_gap > 1 {
            let w = DataWarning::ApproximatedData {
                source: schema.id,
                column: name.clone(),
                longest_gap: fill.longest_gap,
            };
            warn!("{}", w);
            warnings.push(w);
        }
    }

    let table = CleanedTable {
        source: schema.id,
        dates,
        columns,
        values,
    };
    Ok((table, warnings, stats))
}

/// Decode, parse and clean one source held in memory. `name` is only used
/// in errors and logs.
#[tracing::instrument(level = "debug", skip(bytes, schema, options), fields(source = %schema.id))]
pub fn load_source_bytes(
    bytes: &[u8],
    name: &str,
    schema: &SourceSchema,
    options: &LoadOptions,
) -> Result<LoadedTable> {
    let (text, encoding) = decode::decode_with_fallback(
        bytes,
        options.primary_encoding,
        options.fallback_encoding,
    )
    .ok_or_else(|| LoadError::Decode {
        name: name.to_string(),
        primary: options.primary_encoding.label(),
        fallback: options.fallback_encoding.label(),
    })?;
    if encoding != options.primary_encoding {
        debug!(name, encoding = encoding.label(), "decoded with fallback encoding");
    }

    let raw = read_raw_table(&text, name)?;
    let (table, warnings, stats) = clean_raw_table(raw, schema, options)?;
    Ok(LoadedTable {
        table,
        warnings,
        stats,
        encoding,
    })
}

/// Read and clean a source file from disk.
pub fn load_source_file<P: AsRef<Path>>(
    path: P,
    schema: &SourceSchema,
    options: &LoadOptions,
) -> Result<LoadedTable> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_source_bytes(&bytes, &path.display().to_string(), schema, options)
}

/// Resolves source files under a data directory and loads them.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    settings: Settings,
}

impl SourceLoader {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn path_for(&self, schema: &SourceSchema) -> PathBuf {
        self.settings.source_path(schema)
    }

    #[tracing::instrument(level = "info", skip(self, schema), fields(source = %schema.id))]
    pub fn load(&self, schema: &SourceSchema) -> Result<LoadedTable> {
        let path = self.path_for(schema);
        let loaded = load_source_file(&path, schema, &self.settings.load_options())?;
        info!(
            path = %path.display(),
            rows = loaded.table.len(),
            first = ?loaded.table.first_date(),
            last = ?loaded.table.last_date(),
            warnings = loaded.warnings.len(),
            "loaded"
        );
        Ok(loaded)
    }

    /// Load several sources, in parallel when configured. Results come back
    /// in the order of `schemas` either way.
    pub fn load_many(&self, schemas: &[&SourceSchema]) -> Result<Vec<LoadedTable>> {
        if self.settings.parallel_loads {
            schemas.par_iter().map(|s| self.load(s)).collect()
        } else {
            schemas.iter().map(|s| self.load(s)).collect()
        }
    }
}
