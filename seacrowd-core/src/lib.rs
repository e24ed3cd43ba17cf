//! Building blocks for dataset loaders.
//!
//! A loader turns raw dataset downloads (label encoded directories, metadata tables, parquet
//! manifests) into a flat stream of numbered records, either in the dataset native shape or in
//! one of the unified shapes shared across datasets.
//!
//! ```rust
//! use seacrowd::{ClassLabel, Schema};
//! # fn main() -> seacrowd::Result<()> {
//! let labels = ClassLabel::zero_padded(78, 2);
//! assert_eq!(labels.str2int("42")?, 42);
//! assert!("bogus_schema".parse::<Schema>().is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`resolve`]: locating the local copies of the urls declared by a loader.
//! - [`scan`]: indexing `<label>-<suffix>` directory trees.
//! - [`table`]: typed delimited files, inner joins, parquet row streams.
//! - [`features`] and [`record`]: field sets and the records matching them.
//! - [`generate`]: the [`DatasetBuilder`] trait and the [`Examples`] stream.

pub mod config;
pub mod error;
pub mod features;
pub mod generate;
pub mod label;
pub mod record;
pub mod resolve;
pub mod scan;
pub mod table;

pub use config::{BuilderConfig, Licenses, LoadRequest, Schema, Tasks, Version};
pub use error::{Error, Result};
pub use features::{image_text_features, speech_text_features, Feature, Features, ValueType};
pub use generate::{DatasetBuilder, DatasetInfo, Examples, Split, SplitGenerator};
pub use label::ClassLabel;
pub use record::{
    path_string, AudioRecord, ImageTextMetadata, ImageTextRecord, Record, SpeechTextMetadata,
    SpeechTextRecord,
};
#[cfg(feature = "hub")]
pub use resolve::HubResolver;
pub use resolve::{MapResolver, MirrorResolver, PathResolver};
pub use scan::{scan_labeled_dirs, LabelIndex};
