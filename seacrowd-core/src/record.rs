//! Records yielded by the builders.
//!
//! Source records are dataset specific and live with their loader, the unified shapes are shared
//! by every dataset supporting the matching task.
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Paths are carried as strings in records, non utf8 paths are rejected.
pub fn path_string(path: &Path) -> Result<String> {
    path.to_str()
        .map(|s| s.to_string())
        .ok_or_else(|| Error::msg("non utf8 path").with_path(path))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTextMetadata {
    pub context: Option<String>,
    pub labels: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTextRecord {
    pub id: String,
    pub image_paths: Vec<String>,
    pub texts: Option<String>,
    pub metadata: ImageTextMetadata,
}

/// Audio content, either inline bytes, a path to an audio file, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AudioRecord {
    pub path: Option<String>,
    pub bytes: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechTextMetadata {
    pub speaker_age: Option<i64>,
    pub speaker_gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechTextRecord {
    pub id: String,
    pub path: String,
    pub audio: AudioRecord,
    pub text: String,
    pub speaker_id: String,
    pub metadata: SpeechTextMetadata,
}

/// A record in one of the supported shapes, `S` being the dataset native one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record<S> {
    Source(S),
    ImageText(ImageTextRecord),
    SpeechText(SpeechTextRecord),
}

impl<S> Record<S> {
    pub fn as_source(&self) -> Option<&S> {
        match self {
            Self::Source(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image_text(&self) -> Option<&ImageTextRecord> {
        match self {
            Self::ImageText(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_speech_text(&self) -> Option<&SpeechTextRecord> {
        match self {
            Self::SpeechText(r) => Some(r),
            _ => None,
        }
    }
}
