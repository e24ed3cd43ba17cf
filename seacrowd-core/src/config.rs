//! Builder configurations: which subset, schema and version a loader runs with.
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// The record shape a builder config produces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Schema {
    /// Dataset-native fields.
    #[serde(rename = "source")]
    Source,
    /// Unified image + text shape.
    #[serde(rename = "seacrowd_imtext")]
    SeacrowdImText,
    /// Unified speech + text shape.
    #[serde(rename = "seacrowd_sptext")]
    SeacrowdSpText,
}

impl std::str::FromStr for Schema {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "source" => Ok(Self::Source),
            "seacrowd_imtext" => Ok(Self::SeacrowdImText),
            "seacrowd_sptext" => Ok(Self::SeacrowdSpText),
            _ => Err(Error::UnknownSchema {
                schema: s.to_string(),
            }),
        }
    }
}

impl Schema {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::SeacrowdImText => "seacrowd_imtext",
            Self::SeacrowdSpText => "seacrowd_sptext",
        }
    }

    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source)
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tasks a dataset can be used for, each with its unified schema.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tasks {
    ImageCaptioning,
    SpeechRecognition,
}

impl Tasks {
    pub fn schema(&self) -> Schema {
        match self {
            Self::ImageCaptioning => Schema::SeacrowdImText,
            Self::SpeechRecognition => Schema::SeacrowdSpText,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Licenses {
    Unknown,
    CcBy4_0,
}

impl Licenses {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::CcBy4_0 => "CC BY 4.0",
        }
    }
}

/// A dataset version, either semver-like (`1.0.0`) or date based (`2024.06.20`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(v: impl Into<String>) -> Self {
        Self(v.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One predeclared variant of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    pub name: String,
    pub version: Version,
    pub description: String,
    pub schema: Schema,
    pub subset_id: String,
}

impl BuilderConfig {
    /// Builds the config `<dataset>[_<subset>]_<schema>`.
    pub fn new(dataset: &str, subset: Option<&str>, schema: Schema, version: &str) -> Self {
        let subset_id = match subset {
            Some(subset) => format!("{dataset}_{subset}"),
            None => dataset.to_string(),
        };
        Self {
            name: format!("{subset_id}_{schema}"),
            version: Version::new(version),
            description: format!("{subset_id} {schema} schema"),
            schema,
            subset_id,
        }
    }

    /// The subset part of the subset id, if any.
    pub fn subset<'a>(&'a self, dataset: &str) -> Option<&'a str> {
        self.subset_id
            .strip_prefix(dataset)
            .and_then(|s| s.strip_prefix('_'))
    }
}

/// The configuration surface exposed to callers: `(dataset, subset, schema, version)`.
///
/// Requests are plain data, typically deserialized from json. They get validated against the
/// registry of builder configs before anything is read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub dataset: String,
    #[serde(default)]
    pub subset: Option<String>,
    pub schema: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl LoadRequest {
    pub fn new(dataset: &str, subset: Option<&str>, schema: &str) -> Self {
        Self {
            dataset: dataset.to_string(),
            subset: subset.map(|s| s.to_string()),
            schema: schema.to_string(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file<P: AsRef<std::path::Path>>(p: P) -> Result<Self> {
        let p = p.as_ref();
        let file = std::fs::File::open(p).map_err(|e| Error::from(e).with_path(p))?;
        let req = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| Error::from(e).with_path(p))?;
        Ok(req)
    }

    pub fn schema(&self) -> Result<Schema> {
        self.schema.parse()
    }

    /// Picks the matching config out of `configs`, checking schema, subset and version.
    pub fn select<'a>(
        &self,
        dataset: &'static str,
        subsets: &'static [&'static str],
        configs: &'a [BuilderConfig],
    ) -> Result<&'a BuilderConfig> {
        let schema = self.schema()?;
        match self.subset.as_deref() {
            Some(subset) if !subsets.contains(&subset) => {
                return Err(Error::UnknownSubset {
                    dataset,
                    subset: subset.to_string(),
                    expected: subsets,
                })
            }
            None if configs.iter().all(|c| c.subset(dataset).is_some()) => {
                return Err(Error::UnknownSubset {
                    dataset,
                    subset: String::new(),
                    expected: subsets,
                })
            }
            _ => {}
        }
        let config = configs
            .iter()
            .find(|c| c.schema == schema && c.subset(dataset) == self.subset.as_deref())
            .ok_or(Error::UnsupportedSchema { dataset, schema })?;
        if let Some(version) = self.version.as_deref() {
            if version != config.version.as_str() {
                return Err(Error::UnsupportedVersion {
                    config: config.name.clone(),
                    version: version.to_string(),
                    expected: config.version.to_string(),
                });
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_parse() {
        assert_eq!("source".parse::<Schema>().unwrap(), Schema::Source);
        assert_eq!(
            "seacrowd_imtext".parse::<Schema>().unwrap(),
            Schema::SeacrowdImText
        );
        let err = "bogus_schema".parse::<Schema>().unwrap_err();
        assert!(err.is_config_error());
        assert!(matches!(err, Error::UnknownSchema { schema } if schema == "bogus_schema"));
    }

    #[test]
    fn config_names() {
        let c = BuilderConfig::new("burapha_th", Some("digit"), Schema::Source, "1.0.0");
        assert_eq!(c.name, "burapha_th_digit_source");
        assert_eq!(c.subset_id, "burapha_th_digit");
        assert_eq!(c.subset("burapha_th"), Some("digit"));
        let c = BuilderConfig::new("mswc", None, Schema::SeacrowdSpText, "1.0.0");
        assert_eq!(c.name, "mswc_seacrowd_sptext");
        assert_eq!(c.subset("mswc"), None);
        assert_eq!(Tasks::SpeechRecognition.schema(), Schema::SeacrowdSpText);
    }

    #[test]
    fn request_from_json() {
        let req = LoadRequest::from_json_str(
            r#"{"dataset": "burapha_th", "subset": "syllable", "schema": "seacrowd_imtext"}"#,
        )
        .unwrap();
        assert_eq!(req, LoadRequest::new("burapha_th", Some("syllable"), "seacrowd_imtext"));
        assert_eq!(req.schema().unwrap(), Schema::SeacrowdImText);
    }

    #[test]
    fn request_select() {
        let configs = vec![
            BuilderConfig::new("ds", Some("a"), Schema::Source, "1.0.0"),
            BuilderConfig::new("ds", Some("a"), Schema::SeacrowdImText, "2024.06.20"),
        ];
        let req = LoadRequest::new("ds", Some("a"), "seacrowd_imtext");
        let c = req.select("ds", &["a"], &configs).unwrap();
        assert_eq!(c.name, "ds_a_seacrowd_imtext");

        let req = LoadRequest::new("ds", Some("b"), "source");
        assert!(matches!(
            req.select("ds", &["a"], &configs),
            Err(Error::UnknownSubset { .. })
        ));
        let req = LoadRequest::new("ds", Some("a"), "seacrowd_sptext");
        assert!(matches!(
            req.select("ds", &["a"], &configs),
            Err(Error::UnsupportedSchema { .. })
        ));
        let req = LoadRequest::new("ds", Some("a"), "source").with_version("9.9.9");
        assert!(matches!(
            req.select("ds", &["a"], &configs),
            Err(Error::UnsupportedVersion { .. })
        ));
    }
}
