//! Runtime settings: built-in defaults, then an optional YAML file, then
//! `MACROBOARD_*` environment overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::process::{Encoding, LoadOptions};
use crate::schema::{SourceId, SourceSchema};

pub const CONFIG_ENV: &str = "MACROBOARD_CONFIG";
pub const DATA_DIR_ENV: &str = "MACROBOARD_DATA_DIR";
pub const OUTPUT_DIR_ENV: &str = "MACROBOARD_OUTPUT_DIR";
pub const RECENCY_YEAR_ENV: &str = "MACROBOARD_RECENCY_YEAR";
pub const PARALLEL_ENV: &str = "MACROBOARD_PARALLEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding one CSV per source.
    pub data_dir: PathBuf,
    /// Where the binaries write exported tables.
    pub output_dir: PathBuf,
    /// A first complete row in this year or later raises a low-history warning.
    pub recency_threshold_year: i32,
    pub primary_encoding: Encoding,
    pub fallback_encoding: Encoding,
    /// Load an assembler's sources concurrently.
    pub parallel_loads: bool,
    /// Per-source file name overrides, relative to `data_dir`.
    pub files: BTreeMap<SourceId, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            recency_threshold_year: 2024,
            primary_encoding: Encoding::Utf8,
            fallback_encoding: Encoding::Latin1,
            parallel_loads: false,
            files: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parsing settings YAML")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {:?}", path))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {:?}", path))
    }

    /// Resolve settings for a run. `path` wins over `MACROBOARD_CONFIG`; with
    /// neither, the defaults are used. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut settings = match file {
            Some(p) => {
                debug!(path = %p.display(), "loading settings file");
                Self::from_file(&p)?
            }
            None => Self::default(),
        };
        settings.apply_overrides(|key| env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply `MACROBOARD_*` overrides fetched through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(year) = lookup(RECENCY_YEAR_ENV) {
            self.recency_threshold_year = year
                .trim()
                .parse()
                .with_context(|| format!("{RECENCY_YEAR_ENV}={year:?} is not a year"))?;
        }
        if let Some(flag) = lookup(PARALLEL_ENV) {
            self.parallel_loads = flag
                .trim()
                .to_lowercase()
                .parse()
                .with_context(|| format!("{PARALLEL_ENV}={flag:?} is not true/false"))?;
        }
        Ok(())
    }

    pub fn file_for(&self, schema: &SourceSchema) -> &str {
        self.files
            .get(&schema.id)
            .map(String::as_str)
            .unwrap_or(schema.default_file)
    }

    pub fn source_path(&self, schema: &SourceSchema) -> PathBuf {
        self.data_dir.join(self.file_for(schema))
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            primary_encoding: self.primary_encoding,
            fallback_encoding: self.fallback_encoding,
            recency_threshold_year: self.recency_threshold_year,
        }
    }
}
