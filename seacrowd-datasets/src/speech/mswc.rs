//! Multilingual Spoken Words Corpus, restricted to its south east asian languages.
//!
//! 1-second spoken keywords extracted from crowd-sourced sentences through forced alignment.
//! The parquet conversion hosted on the hub is used, one file per language, audio format and
//! split: <https://huggingface.co/datasets/MLCommons/ml_spoken_words>
use parquet::record::{Field, Row};
use seacrowd::table::ParquetRows;
use seacrowd::{
    speech_text_features, AudioRecord, BuilderConfig, ClassLabel, DatasetBuilder, DatasetInfo,
    Error, Examples, Feature, Features, Licenses, LoadRequest, PathResolver, Record, Result,
    Schema, SpeechTextMetadata, SpeechTextRecord, Split, SplitGenerator, Tasks,
};
use std::path::PathBuf;

pub const NAME: &str = "mswc";
pub const DEFAULT_CONFIG_NAME: &str = "mswc_source";
/// Per language subsets, the default config covers all of them.
pub const SUBSETS: [&str; 3] = ["cnh", "ind", "vie"];
/// Speaker genders, `NAN` marking an unknown speaker.
pub const GENDERS: [&str; 4] = ["MALE", "FEMALE", "OTHER", "NAN"];
const UNKNOWN_GENDER: &str = "NAN";

static LANGUAGES: [&str; 3] = SUBSETS;

const SOURCE_VERSION: &str = "1.0.0";
const SEACROWD_VERSION: &str = "1.0.0";
const AUDIO_FORMATS: [&str; 2] = ["wav", "opus"];

const DESCRIPTION: &str = "\
Multilingual Spoken Words Corpus is a large and growing audio dataset of spoken words in 50 \
languages collectively spoken by over 5 billion people, for academic research and commercial \
applications in keyword spotting and spoken term search, licensed under CC-BY 4.0. The dataset \
contains more than 340,000 keywords, totaling 23.4 million 1-second spoken examples (over 6,000 \
hours).";

const HOMEPAGE: &str = "https://huggingface.co/datasets/MLCommons/ml_spoken_words";

const CITATION: &str = r#"@inproceedings{mazumder2021multilingual,
  title={Multilingual Spoken Words Corpus},
  author={Mazumder, Mark and Chitlangia, Sharad and Banbury, Colby and Kang, Yiping and Ciro, Juan Manuel and Achorn, Keith and Galvez, Daniel and Sabini, Mark and Mattson, Peter and Kanter, David and others},
  booktitle={Thirty-fifth Conference on Neural Information Processing Systems Datasets and Benchmarks Track (Round 2)},
  year={2021}
}"#;

/// The parquet urls for `split`, ordered by language then audio format.
pub fn urls(split: Split, languages: &[&str]) -> Vec<String> {
    let mut urls = Vec::with_capacity(languages.len() * AUDIO_FORMATS.len());
    for language in languages {
        for format in AUDIO_FORMATS {
            urls.push(format!(
                "https://huggingface.co/datasets/MLCommons/ml_spoken_words/resolve/refs%2Fconvert%2Fparquet/{language}_{format}/{split}/0000.parquet?download=true"
            ))
        }
    }
    urls
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MswcSource {
    pub file: String,
    pub is_valid: bool,
    pub language: i64,
    pub speaker_id: String,
    pub gender: i64,
    pub keyword: String,
    pub audio: AudioRecord,
}

fn column<'a>(row: &'a Row, name: &str) -> Result<&'a Field> {
    row.get_column_iter()
        .find(|(n, _)| n.as_str() == name)
        .map(|(_, f)| f)
        .ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
            table: "mswc parquet".to_string(),
        })
}

fn unexpected(name: &str, expected: &'static str, field: &Field) -> Error {
    Error::UnexpectedField {
        column: name.to_string(),
        expected,
        got: field.to_string(),
    }
}

fn string(row: &Row, name: &str) -> Result<String> {
    match column(row, name)? {
        Field::Str(s) => Ok(s.clone()),
        Field::Bytes(b) => String::from_utf8(b.data().to_vec())
            .map_err(|_| unexpected(name, "utf8 string", &Field::Bytes(b.clone()))),
        f => Err(unexpected(name, "string", f)),
    }
}

fn opt_string(row: &Row, name: &str) -> Result<Option<String>> {
    match column(row, name)? {
        Field::Null => Ok(None),
        _ => string(row, name).map(Some),
    }
}

fn int(row: &Row, name: &str) -> Result<i64> {
    match column(row, name)? {
        Field::Byte(v) => Ok(*v as i64),
        Field::Short(v) => Ok(*v as i64),
        Field::Int(v) => Ok(*v as i64),
        Field::Long(v) => Ok(*v),
        Field::UByte(v) => Ok(*v as i64),
        Field::UShort(v) => Ok(*v as i64),
        Field::UInt(v) => Ok(*v as i64),
        f => Err(unexpected(name, "integer", f)),
    }
}

fn boolean(row: &Row, name: &str) -> Result<bool> {
    match column(row, name)? {
        Field::Bool(v) => Ok(*v),
        f => Err(unexpected(name, "bool", f)),
    }
}

fn audio(row: &Row) -> Result<AudioRecord> {
    match column(row, "audio")? {
        Field::Null => Ok(AudioRecord::default()),
        Field::Group(audio) => {
            let bytes = match column(audio, "bytes") {
                Ok(Field::Bytes(b)) => Some(b.data().to_vec()),
                Ok(Field::Null) | Err(Error::MissingColumn { .. }) => None,
                Ok(f) => return Err(unexpected("audio.bytes", "bytes", f)),
                Err(err) => return Err(err),
            };
            let path = match column(audio, "path") {
                Ok(_) => opt_string(audio, "path")?,
                Err(Error::MissingColumn { .. }) => None,
                Err(err) => return Err(err),
            };
            Ok(AudioRecord { path, bytes })
        }
        f => Err(unexpected("audio", "struct", f)),
    }
}

impl MswcSource {
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            file: string(row, "file")?,
            is_valid: boolean(row, "is_valid")?,
            language: int(row, "language")?,
            speaker_id: string(row, "speaker_id")?,
            gender: int(row, "gender")?,
            keyword: string(row, "keyword")?,
            audio: audio(row)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Mswc {
    config: BuilderConfig,
    languages: &'static [&'static str],
    genders: ClassLabel,
}

impl Mswc {
    pub fn builder_configs() -> Vec<BuilderConfig> {
        let mut configs = Vec::new();
        for (schema, version) in [
            (Schema::Source, SOURCE_VERSION),
            (Tasks::SpeechRecognition.schema(), SEACROWD_VERSION),
        ] {
            configs.push(BuilderConfig::new(NAME, None, schema, version));
            for subset in SUBSETS {
                configs.push(BuilderConfig::new(NAME, Some(subset), schema, version))
            }
        }
        configs
    }

    pub fn new(config: BuilderConfig) -> Result<Self> {
        match config.schema {
            Schema::Source | Schema::SeacrowdSpText => {}
            schema => {
                return Err(Error::UnsupportedSchema {
                    dataset: NAME,
                    schema,
                })
            }
        }
        let languages: &'static [&'static str] = match config.subset(NAME) {
            None => &LANGUAGES,
            Some(subset) => match LANGUAGES.iter().position(|s| *s == subset) {
                Some(i) => &LANGUAGES[i..i + 1],
                None => {
                    return Err(Error::UnknownSubset {
                        dataset: NAME,
                        subset: subset.to_string(),
                        expected: &SUBSETS,
                    })
                }
            },
        };
        Ok(Self {
            config,
            languages,
            genders: ClassLabel::from_names(GENDERS),
        })
    }

    pub fn from_request(req: &LoadRequest) -> Result<Self> {
        let configs = Self::builder_configs();
        let config = req.select(NAME, &SUBSETS, &configs)?;
        Self::new(config.clone())
    }

    pub fn languages(&self) -> &'static [&'static str] {
        self.languages
    }

    fn speech_text(&self, id: usize, source: MswcSource) -> Result<SpeechTextRecord> {
        let gender = usize::try_from(source.gender).map_err(|_| Error::UnexpectedField {
            column: "gender".to_string(),
            expected: "a gender class index",
            got: source.gender.to_string(),
        })?;
        let speaker_gender = match self.genders.int2str(gender)? {
            UNKNOWN_GENDER => None,
            name => Some(name.to_string()),
        };
        let audio = AudioRecord {
            path: source.audio.path.or_else(|| Some(source.file.clone())),
            bytes: source.audio.bytes,
        };
        Ok(SpeechTextRecord {
            id: id.to_string(),
            path: source.file,
            audio,
            text: source.keyword,
            speaker_id: source.speaker_id,
            metadata: SpeechTextMetadata {
                speaker_age: None,
                speaker_gender,
            },
        })
    }
}

impl DatasetBuilder for Mswc {
    type Source = MswcSource;
    type SplitInput = Vec<PathBuf>;

    const NAME: &'static str = NAME;

    fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn info(&self) -> DatasetInfo {
        let features = match self.config.schema {
            Schema::Source => Features::new()
                .with("file", Feature::string())
                .with("is_valid", Feature::bool())
                .with(
                    "language",
                    Feature::class_label(&ClassLabel::with_num_classes(SUBSETS.len())),
                )
                .with("speaker_id", Feature::string())
                .with("gender", Feature::class_label(&self.genders))
                .with("keyword", Feature::string())
                .with(
                    "audio",
                    Feature::Audio {
                        sampling_rate: None,
                    },
                ),
            _ => speech_text_features(),
        };
        DatasetInfo {
            description: DESCRIPTION,
            homepage: HOMEPAGE,
            license: Licenses::CcBy4_0,
            citation: CITATION,
            languages: self.languages,
            tasks: &[Tasks::SpeechRecognition],
            features,
        }
    }

    fn split_generators(
        &self,
        resolver: &dyn PathResolver,
    ) -> Result<Vec<SplitGenerator<Vec<PathBuf>>>> {
        let mut generators = Vec::new();
        for split in [Split::Train, Split::Validation, Split::Test] {
            let urls = urls(split, self.languages);
            let urls = urls.iter().map(|u| u.as_str()).collect::<Vec<_>>();
            let paths = resolver.resolve_all(&urls)?;
            tracing::info!(config = %self.config.name, %split, files = paths.len(), "resolved split");
            generators.push(SplitGenerator {
                name: split,
                input: paths,
            })
        }
        Ok(generators)
    }

    fn generate_examples(&self, input: Vec<PathBuf>) -> Result<Examples<'_, MswcSource>> {
        let schema = self.config.schema;
        let rows = ParquetRows::new(input).enumerate();
        let records = rows.map(move |(id, row)| -> Result<Record<MswcSource>> {
            let source = MswcSource::from_row(&row?)?;
            match schema {
                Schema::Source => Ok(Record::Source(source)),
                _ => Ok(Record::SpeechText(self.speech_text(id, source)?)),
            }
        });
        Ok(Examples::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_urls() {
        let train = urls(Split::Train, &SUBSETS);
        assert_eq!(train.len(), 6);
        assert_eq!(
            train[0],
            "https://huggingface.co/datasets/MLCommons/ml_spoken_words/resolve/refs%2Fconvert%2Fparquet/cnh_wav/train/0000.parquet?download=true"
        );
        assert!(train[1].contains("/cnh_opus/train/"));
        assert!(train[5].contains("/vie_opus/train/"));
        let valid = urls(Split::Validation, &["ind"]);
        assert_eq!(valid.len(), 2);
        assert!(valid[0].contains("/ind_wav/validation/"));
    }

    #[test]
    fn configs() -> Result<()> {
        let configs = Mswc::builder_configs();
        assert_eq!(configs.len(), 8);
        assert!(configs.iter().any(|c| c.name == DEFAULT_CONFIG_NAME));
        assert!(configs.iter().any(|c| c.name == "mswc_seacrowd_sptext"));
        let ind = Mswc::from_request(&LoadRequest::new(NAME, Some("ind"), "source"))?;
        assert_eq!(ind.languages(), ["ind"]);
        let all = Mswc::from_request(&LoadRequest::new(NAME, None, "seacrowd_sptext"))?;
        assert_eq!(all.languages(), SUBSETS);
        assert_eq!(ind.info().languages, ["ind"]);
        assert_eq!(all.info().languages, SUBSETS);
        assert!(matches!(
            Mswc::from_request(&LoadRequest::new(NAME, None, "seacrowd_imtext")),
            Err(Error::UnsupportedSchema { .. })
        ));
        Ok(())
    }
}
