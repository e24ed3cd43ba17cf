use crate::config::Schema;
use std::path::PathBuf;

/// Main library error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    // === Configuration errors ===
    #[error("unknown schema {schema:?}")]
    UnknownSchema { schema: String },

    #[error("schema {schema} is not supported by {dataset}")]
    UnsupportedSchema {
        dataset: &'static str,
        schema: Schema,
    },

    #[error("unknown subset {subset:?} for {dataset}, expected one of {expected:?}")]
    UnknownSubset {
        dataset: &'static str,
        subset: String,
        expected: &'static [&'static str],
    },

    #[error("no builder config named {name:?}")]
    UnknownConfig { name: String },

    #[error("version {version} is not available for {config}, expected {expected}")]
    UnsupportedVersion {
        config: String,
        version: String,
        expected: String,
    },

    #[error("unknown split {split:?}")]
    UnknownSplit { split: String },

    // === Resolution errors ===
    #[error("path {path:?} does not exist")]
    MissingPath { path: PathBuf },

    #[error("no local path can be resolved for {url}")]
    UnresolvedUrl { url: String },

    #[error("directory name {name:?} does not contain the label delimiter {delimiter:?}")]
    MissingDelimiter { name: String, delimiter: String },

    #[error("label {label:?} is not part of the enumeration ({num_classes} classes)")]
    UnknownLabel { label: String, num_classes: usize },

    #[error("label index {index} out of range for {num_classes} classes")]
    LabelOutOfRange { index: usize, num_classes: usize },

    #[error("missing column {column:?} in {table}")]
    MissingColumn { column: String, table: String },

    #[error("unexpected value for column {column:?}, expected {expected}, got {got}")]
    UnexpectedField {
        column: String,
        expected: &'static str,
        got: String,
    },

    // === Collaborator errors ===
    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Delimited table parsing error.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Json parsing error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Parquet reading error.
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Hugging Face hub error.
    #[cfg(feature = "hub")]
    #[error(transparent)]
    Hub(#[from] hf_hub::api::sync::ApiError),

    /// Arbitrary errors wrapping.
    #[error("{0}")]
    Msg(String),

    /// Adding the path being processed to an error.
    #[error("{inner}, while processing {path:?}")]
    WithPath {
        inner: Box<Self>,
        path: std::path::PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn msg(msg: impl std::fmt::Display) -> Self {
        Self::Msg(msg.to_string())
    }

    pub fn with_path<P: AsRef<std::path::Path>>(self, p: P) -> Self {
        Self::WithPath {
            inner: Box::new(self),
            path: p.as_ref().to_path_buf(),
        }
    }

    /// Returns true for errors raised from an invalid configuration, i.e. before any i/o
    /// happened.
    pub fn is_config_error(&self) -> bool {
        match self {
            Self::UnknownSchema { .. }
            | Self::UnsupportedSchema { .. }
            | Self::UnknownSubset { .. }
            | Self::UnknownConfig { .. }
            | Self::UnsupportedVersion { .. }
            | Self::UnknownSplit { .. } => true,
            Self::WithPath { inner, .. } => inner.is_config_error(),
            _ => false,
        }
    }
}
