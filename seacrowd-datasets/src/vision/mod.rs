//! Image datasets.
pub mod burapha_th;
pub mod cub_bahasa;
mod cub_classes;

pub use cub_classes::CLASS_NAMES as CUB_CLASS_NAMES;
