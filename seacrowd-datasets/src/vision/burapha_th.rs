//! Burapha-TH, Thai handwritten characters, digits and syllables.
//!
//! The dataset has 68 character classes, 10 digit classes, and 320 syllable classes, written by
//! 1072 native speakers and scanned at 300 dpi. The archives can be obtained from:
//! <https://services.informatics.buu.ac.th/datasets/Burapha-TH/>
//!
//! Each split archive extracts to one directory per class named `<code>-<character>`.
use seacrowd::{
    image_text_features, path_string, scan_labeled_dirs, BuilderConfig, ClassLabel,
    DatasetBuilder, DatasetInfo, Error, Examples, Feature, Features, ImageTextMetadata,
    ImageTextRecord, LabelIndex, Licenses, LoadRequest, PathResolver, Record, Result, Schema,
    Split, SplitGenerator, Tasks,
};

pub const NAME: &str = "burapha_th";
pub const SUBSETS: [&str; 3] = ["character", "digit", "syllable"];
pub const DEFAULT_CONFIG_NAME: &str = "burapha_th_digit_source";

const SOURCE_VERSION: &str = "1.0.0";
const SEACROWD_VERSION: &str = "2024.06.20";
const LABEL_DELIMITER: &str = "-";

const DESCRIPTION: &str = "\
The dataset has 68 character classes, 10 digit classes, and 320 syllable classes. For \
constructing the dataset, 1072 Thai native speakers wrote on collection datasheets that were then \
digitized using a 300 dpi scanner. De-skewing, detection box and segmentation algorithms were \
applied to the raw scans for image extraction. The dataset, unlike all other known Thai \
handwriting datasets, retains existing noise, the white background, and all artifacts generated \
by scanning.";

const HOMEPAGE: &str = "https://services.informatics.buu.ac.th/datasets/Burapha-TH/";

const CITATION: &str = r#"@Article{app12084083,
AUTHOR = {Onuean, Athita and Buatoom, Uraiwan and Charoenporn, Thatsanee and Kim, Taehong and Jung, Hanmin},
TITLE = {Burapha-TH: A Multi-Purpose Character, Digit, and Syllable Handwriting Dataset},
JOURNAL = {Applied Sciences},
VOLUME = {12},
YEAR = {2022},
NUMBER = {8},
ARTICLE-NUMBER = {4083},
URL = {https://www.mdpi.com/2076-3417/12/8/4083},
ISSN = {2076-3417},
DOI = {10.3390/app12084083}
}"#;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Subset {
    Character,
    Digit,
    Syllable,
}

impl std::str::FromStr for Subset {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "character" => Ok(Self::Character),
            "digit" => Ok(Self::Digit),
            "syllable" => Ok(Self::Syllable),
            _ => Err(Error::UnknownSubset {
                dataset: NAME,
                subset: s.to_string(),
                expected: &SUBSETS,
            }),
        }
    }
}

impl Subset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Digit => "digit",
            Self::Syllable => "syllable",
        }
    }

    /// The archive url for each split.
    pub fn urls(&self) -> [(Split, &'static str); 2] {
        match self {
            Self::Character => [
                (Split::Train, "https://services.informatics.buu.ac.th/datasets/Burapha-TH/character/20210306-train.zip"),
                (Split::Test, "https://services.informatics.buu.ac.th/datasets/Burapha-TH/character/20210306-test.zip"),
            ],
            Self::Digit => [
                (Split::Train, "https://services.informatics.buu.ac.th/datasets/Burapha-TH/digit/20210307-train.zip"),
                (Split::Test, "https://services.informatics.buu.ac.th/datasets/Burapha-TH/digit/20210307-test.zip"),
            ],
            Self::Syllable => [
                (Split::Train, "https://services.informatics.buu.ac.th/datasets/Burapha-TH/syllable/20210309-train-ori.zip"),
                (Split::Test, "https://services.informatics.buu.ac.th/datasets/Burapha-TH/syllable/20210309-test-ori.zip"),
            ],
        }
    }

    /// The directory holding the class directories within an extracted split archive.
    pub fn split_dir(&self, split: Split) -> &'static str {
        match (self, split) {
            (Self::Syllable, Split::Train) => "train-ori",
            (Self::Syllable, _) => "test-ori",
            (_, Split::Train) => "train",
            (_, _) => "test",
        }
    }

    /// Two digit codes `00`..`77` for characters and digits, three digit codes `000`..`319`
    /// for syllables.
    pub fn labels(&self) -> ClassLabel {
        match self {
            Self::Character | Self::Digit => ClassLabel::zero_padded(78, 2),
            Self::Syllable => ClassLabel::zero_padded(320, 3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BuraphaThSource {
    pub id: String,
    pub image_paths: String,
    pub label: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct BuraphaTh {
    config: BuilderConfig,
    subset: Subset,
    labels: ClassLabel,
}

impl BuraphaTh {
    pub fn builder_configs() -> Vec<BuilderConfig> {
        let mut configs = Vec::new();
        for (schema, version) in [
            (Schema::Source, SOURCE_VERSION),
            (Schema::SeacrowdImText, SEACROWD_VERSION),
        ] {
            for subset in SUBSETS {
                configs.push(BuilderConfig::new(NAME, Some(subset), schema, version))
            }
        }
        configs
    }

    pub fn new(config: BuilderConfig) -> Result<Self> {
        match config.schema {
            Schema::Source | Schema::SeacrowdImText => {}
            schema => {
                return Err(Error::UnsupportedSchema {
                    dataset: NAME,
                    schema,
                })
            }
        }
        let subset: Subset = config.subset(NAME).unwrap_or_default().parse()?;
        Ok(Self {
            config,
            subset,
            labels: subset.labels(),
        })
    }

    pub fn from_request(req: &LoadRequest) -> Result<Self> {
        let configs = Self::builder_configs();
        let config = req.select(NAME, &SUBSETS, &configs)?;
        Self::new(config.clone())
    }

    pub fn subset(&self) -> Subset {
        self.subset
    }

    pub fn labels(&self) -> &ClassLabel {
        &self.labels
    }

    fn record(
        &self,
        id: usize,
        label: &str,
        path: &std::path::Path,
    ) -> Result<Record<BuraphaThSource>> {
        let code = self.labels.str2int(label)?;
        let path = path_string(path)?;
        let record = match self.config.schema {
            Schema::Source => Record::Source(BuraphaThSource {
                id: id.to_string(),
                image_paths: path,
                label: vec![code],
            }),
            _ => Record::ImageText(ImageTextRecord {
                id: id.to_string(),
                image_paths: vec![path],
                texts: None,
                metadata: ImageTextMetadata {
                    context: None,
                    labels: vec![code],
                },
            }),
        };
        Ok(record)
    }
}

impl DatasetBuilder for BuraphaTh {
    type Source = BuraphaThSource;
    type SplitInput = LabelIndex;

    const NAME: &'static str = NAME;

    fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn info(&self) -> DatasetInfo {
        let features = match self.config.schema {
            Schema::Source => Features::new()
                .with("id", Feature::string())
                .with("image_paths", Feature::string())
                .with("label", Feature::sequence(Feature::class_label(&self.labels))),
            _ => image_text_features(&self.labels),
        };
        DatasetInfo {
            description: DESCRIPTION,
            homepage: HOMEPAGE,
            license: Licenses::Unknown,
            citation: CITATION,
            languages: &["tha"],
            tasks: &[Tasks::ImageCaptioning],
            features,
        }
    }

    fn split_generators(
        &self,
        resolver: &dyn PathResolver,
    ) -> Result<Vec<SplitGenerator<LabelIndex>>> {
        let mut generators = Vec::new();
        for (split, url) in self.subset.urls() {
            let root = resolver.resolve(url)?;
            let dir = root.join(self.subset.split_dir(split));
            let index = scan_labeled_dirs(&dir, LABEL_DELIMITER)?;
            tracing::info!(
                config = %self.config.name,
                %split,
                labels = index.len(),
                images = index.num_items(),
                "indexed split"
            );
            generators.push(SplitGenerator {
                name: split,
                input: index,
            })
        }
        Ok(generators)
    }

    fn generate_examples(&self, input: LabelIndex) -> Result<Examples<'_, BuraphaThSource>> {
        let records = input
            .into_items()
            .enumerate()
            .map(|(id, (label, path))| self.record(id, &label, &path));
        Ok(Examples::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configs() -> Result<()> {
        let configs = BuraphaTh::builder_configs();
        assert_eq!(configs.len(), 6);
        assert!(configs.iter().any(|c| c.name == DEFAULT_CONFIG_NAME));
        let syllable = configs
            .iter()
            .find(|c| c.name == "burapha_th_syllable_seacrowd_imtext")
            .cloned();
        let builder = BuraphaTh::new(syllable.ok_or(Error::msg("missing config"))?)?;
        assert_eq!(builder.subset(), Subset::Syllable);
        assert_eq!(builder.labels().num_classes(), 320);
        assert_eq!(builder.config().version.as_str(), SEACROWD_VERSION);
        Ok(())
    }

    #[test]
    fn split_dirs() {
        assert_eq!(Subset::Digit.split_dir(Split::Train), "train");
        assert_eq!(Subset::Character.split_dir(Split::Test), "test");
        assert_eq!(Subset::Syllable.split_dir(Split::Train), "train-ori");
        assert_eq!(Subset::Syllable.split_dir(Split::Test), "test-ori");
    }

    #[test]
    fn unsupported_schema() {
        let config = BuilderConfig::new(NAME, Some("digit"), Schema::SeacrowdSpText, "1.0.0");
        assert!(matches!(
            BuraphaTh::new(config),
            Err(Error::UnsupportedSchema { .. })
        ));
        let config = BuilderConfig::new(NAME, Some("emoji"), Schema::Source, "1.0.0");
        assert!(matches!(
            BuraphaTh::new(config),
            Err(Error::UnknownSubset { .. })
        ));
    }
}
