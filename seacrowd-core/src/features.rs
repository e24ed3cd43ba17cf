//! Field sets describing the records a builder produces.
use crate::ClassLabel;
use serde::ser::{Serialize, Serializer};

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int64,
    Bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "_type")]
pub enum Feature {
    Value { dtype: ValueType },
    /// A variable length sequence of a single feature.
    Sequence { feature: Box<Feature> },
    /// A list of structs, e.g. the captions attached to an image.
    List { feature: Box<Feature> },
    ClassLabel { names: ClassLabel },
    Struct { fields: Features },
    Audio { sampling_rate: Option<u32> },
}

impl Feature {
    pub fn string() -> Self {
        Self::Value {
            dtype: ValueType::String,
        }
    }

    pub fn int64() -> Self {
        Self::Value {
            dtype: ValueType::Int64,
        }
    }

    pub fn bool() -> Self {
        Self::Value {
            dtype: ValueType::Bool,
        }
    }

    pub fn sequence(feature: Feature) -> Self {
        Self::Sequence {
            feature: Box::new(feature),
        }
    }

    pub fn list(feature: Feature) -> Self {
        Self::List {
            feature: Box::new(feature),
        }
    }

    pub fn class_label(names: &ClassLabel) -> Self {
        Self::ClassLabel {
            names: names.clone(),
        }
    }
}

/// An ordered set of named features.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Features(Vec<(String, Feature)>);

impl Features {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, feature: Feature) -> Self {
        self.0.push((name.to_string(), feature));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Features {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(n, f)| (n, f)))
    }
}

/// The unified image + text shape shared by every image captioning dataset.
pub fn image_text_features(labels: &ClassLabel) -> Features {
    Features::new()
        .with("id", Feature::string())
        .with("image_paths", Feature::sequence(Feature::string()))
        .with("texts", Feature::string())
        .with(
            "metadata",
            Feature::Struct {
                fields: Features::new()
                    .with("context", Feature::string())
                    .with("labels", Feature::sequence(Feature::class_label(labels))),
            },
        )
}

pub const SPEECH_SAMPLING_RATE: u32 = 16_000;

/// The unified speech + text shape shared by every speech recognition dataset.
pub fn speech_text_features() -> Features {
    Features::new()
        .with("id", Feature::string())
        .with("path", Feature::string())
        .with(
            "audio",
            Feature::Audio {
                sampling_rate: Some(SPEECH_SAMPLING_RATE),
            },
        )
        .with("text", Feature::string())
        .with("speaker_id", Feature::string())
        .with(
            "metadata",
            Feature::Struct {
                fields: Features::new()
                    .with("speaker_age", Feature::int64())
                    .with("speaker_gender", Feature::string()),
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_text_shape() {
        let labels = ClassLabel::zero_padded(10, 2);
        let features = image_text_features(&labels);
        assert_eq!(
            features.names().collect::<Vec<_>>(),
            ["id", "image_paths", "texts", "metadata"]
        );
        match features.get("metadata") {
            Some(Feature::Struct { fields }) => match fields.get("labels") {
                Some(Feature::Sequence { feature }) => {
                    assert_eq!(**feature, Feature::class_label(&labels))
                }
                f => panic!("unexpected labels feature {f:?}"),
            },
            f => panic!("unexpected metadata feature {f:?}"),
        }
    }

    #[test]
    fn serialize_in_order() -> crate::Result<()> {
        let features = Features::new()
            .with("b", Feature::bool())
            .with("a", Feature::sequence(Feature::int64()));
        let json = serde_json::to_string(&features)?;
        assert_eq!(
            json,
            r#"{"b":{"_type":"Value","dtype":"bool"},"a":{"_type":"Sequence","feature":{"_type":"Value","dtype":"int64"}}}"#
        );
        assert_eq!(speech_text_features().len(), 6);
        Ok(())
    }
}
