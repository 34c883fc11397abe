//! Errors raised while turning a source file into a cleaned table.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SourceId;

/// Fatal load failures. Any of these aborts the enclosing assembler call.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{name}: not decodable as {primary} or {fallback}")]
    Decode {
        name: String,
        primary: &'static str,
        fallback: &'static str,
    },

    #[error("{name}: CSV parse error: {source}")]
    Csv {
        name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{name}: no header row")]
    MissingHeader { name: String },

    #[error("{name}: record {line} has {found} fields, header has {expected}")]
    RowWidth {
        name: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{source_id}: schema mismatch (missing {missing:?}, unexpected {unexpected:?})")]
    SchemaMismatch {
        source_id: SourceId,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, LoadError>;
