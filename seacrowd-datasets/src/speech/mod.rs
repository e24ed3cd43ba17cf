//! Speech datasets.
pub mod mswc;
