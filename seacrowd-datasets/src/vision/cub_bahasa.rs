//! CUB-200-2011 with Indonesian captions.
//!
//! Semi-translated version of the CUB-200-2011 birds dataset: thousands of image-text pairs over
//! 200 bird subcategories, each image having several captions in english and indonesian.
//!
//! The images come from <https://data.caltech.edu/records/65de6-vp158>, the captions from
//! <https://github.com/share424/Indonesian-Text-to-Image-synthesis-with-Sentence-BERT-and-FastGAN>.
//! Images, labels, splits and captions live in separate tables which get inner joined: images
//! without captions, label or split assignment are left out.
use super::cub_classes::CLASS_NAMES;
use seacrowd::table::{group_by, inner_join, inner_join_grouped, read_delimited};
use seacrowd::{
    image_text_features, path_string, BuilderConfig, ClassLabel, DatasetBuilder, DatasetInfo,
    Error, Examples, Feature, Features, ImageTextMetadata, ImageTextRecord, Licenses, LoadRequest,
    PathResolver, Record, Result, Schema, Split, SplitGenerator, Tasks,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const NAME: &str = "cub_bahasa";
pub const DEFAULT_CONFIG_NAME: &str = "cub_bahasa_source";

pub const TEXT_URL: &str = "https://raw.githubusercontent.com/share424/Indonesian-Text-to-Image-synthesis-with-Sentence-BERT-and-FastGAN/master/dataset/indo_cub_200_2011_captions.json";
pub const IMAGE_URL: &str = "https://data.caltech.edu/records/65de6-vp158/files/CUB_200_2011.tgz";

const SOURCE_VERSION: &str = "1.0.0";
const SEACROWD_VERSION: &str = "2024.06.20";

const DESCRIPTION: &str = "\
Semi-translated dataset of CUB-200-2011 into Indonesian. This dataset contains thousands of \
image-text annotation pairs of 200 subcategories belonging to birds. The natural language \
descriptions are collected through the Amazon Mechanical Turk (AMT) platform and are required at \
least 10 words, without any information on subcategories and actions.";

const HOMEPAGE: &str =
    "https://github.com/share424/Indonesian-Text-to-Image-synthesis-with-Sentence-BERT-and-FastGAN";

const CITATION: &str = r#"@article{mahadi2023indonesian,
    author    = {Made Raharja Surya Mahadi and Nugraha Priya Utama},
    title     = {Indonesian Text-to-Image Synthesis with Sentence-BERT and FastGAN},
    journal   = {arXiv preprint arXiv:2303.14517},
    year      = {2023},
    url       = {https://arxiv.org/abs/2303.14517},
}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub caption_eng: String,
    pub caption_ind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CubBahasaSource {
    pub image_id: i64,
    pub class_id: i64,
    pub image_path: String,
    pub class_name: String,
    pub captions: Vec<Caption>,
}

/// One image with everything joined onto it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubRow {
    pub image_id: i64,
    pub class_id: i64,
    pub image_path: PathBuf,
    pub captions: Vec<Caption>,
}

// images.txt: `<image_id> <class_dir>/<file>`
#[derive(Debug, Clone, Deserialize)]
struct ImageRow {
    image_id: i64,
    image_path: String,
}

impl ImageRow {
    fn image_name(&self) -> &str {
        self.image_path.rsplit('/').next().unwrap_or(self.image_path.as_str())
    }
}

// image_class_labels.txt: `<image_id> <class_id>`
#[derive(Debug, Clone, Deserialize)]
struct LabelRow {
    image_id: i64,
    class_id: i64,
}

// train_test_split.txt: `<image_id> <is_train>`
#[derive(Debug, Clone, Deserialize)]
struct SplitRow {
    image_id: i64,
    is_train: u8,
}

#[derive(Debug, Deserialize)]
struct CaptionFile {
    dataset: Vec<CaptionEntry>,
}

#[derive(Debug, Deserialize)]
struct CaptionEntry {
    filename: String,
    captions: Vec<RawCaption>,
}

#[derive(Debug, Deserialize)]
struct RawCaption {
    english: String,
    indo: String,
}

fn read_captions(path: &Path) -> Result<CaptionFile> {
    let file = std::fs::File::open(path).map_err(|e| Error::from(e).with_path(path))?;
    let captions = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| Error::from(e).with_path(path))?;
    Ok(captions)
}

/// Joins the metadata tables of an extracted `CUB_200_2011` directory with the caption file,
/// returning the train and test rows in `images.txt` order.
pub fn load_rows(image_dir: &Path, caption_file: &Path) -> Result<(Vec<CubRow>, Vec<CubRow>)> {
    let base = image_dir.join("CUB_200_2011");
    let images: Vec<ImageRow> = read_delimited(base.join("images.txt"), b' ')?;
    let labels: Vec<LabelRow> = read_delimited(base.join("image_class_labels.txt"), b' ')?;
    let splits: Vec<SplitRow> = read_delimited(base.join("train_test_split.txt"), b' ')?;

    let captions = read_captions(caption_file)?;
    let captions = captions.dataset.into_iter().flat_map(|entry| {
        let filename = entry.filename;
        entry.captions.into_iter().map(move |c| {
            (
                filename.clone(),
                Caption {
                    caption_eng: c.english,
                    caption_ind: c.indo,
                },
            )
        })
    });
    let captions = group_by(captions, |(filename, _)| filename.clone());

    let rows = inner_join_grouped(images, &captions, |image| image.image_name().to_string());
    let rows = inner_join(rows, &group_by(labels, |l| l.image_id), |(image, _)| {
        image.image_id
    });
    let rows = inner_join(rows, &group_by(splits, |s| s.image_id), |((image, _), _)| {
        image.image_id
    });

    let image_root = base.join("images");
    let mut train = Vec::new();
    let mut test = Vec::new();
    for (((image, captions), label), split) in rows {
        let row = CubRow {
            image_id: image.image_id,
            class_id: label.class_id,
            image_path: image_root.join(&image.image_path),
            captions: captions.into_iter().map(|(_, c)| c).collect(),
        };
        match split.is_train {
            1 => train.push(row),
            0 => test.push(row),
            v => tracing::warn!(image_id = image.image_id, is_train = v, "unknown split flag"),
        }
    }
    tracing::info!(train = train.len(), test = test.len(), "joined cub tables");
    Ok((train, test))
}

#[derive(Debug, Clone)]
pub struct CubBahasa {
    config: BuilderConfig,
    labels: ClassLabel,
}

impl CubBahasa {
    pub fn builder_configs() -> Vec<BuilderConfig> {
        vec![
            BuilderConfig::new(NAME, None, Schema::Source, SOURCE_VERSION),
            BuilderConfig::new(NAME, None, Schema::SeacrowdImText, SEACROWD_VERSION),
        ]
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
        Ok(Self {
            config,
            labels: ClassLabel::from_names(CLASS_NAMES),
        })
    }

    pub fn from_request(req: &LoadRequest) -> Result<Self> {
        let configs = Self::builder_configs();
        let config = req.select(NAME, &[], &configs)?;
        Self::new(config.clone())
    }

    pub fn labels(&self) -> &ClassLabel {
        &self.labels
    }

    /// Class ids are 1-based.
    fn class_name(&self, class_id: i64) -> Result<&str> {
        let index = usize::try_from(class_id - 1).map_err(|_| Error::UnexpectedField {
            column: "class_id".to_string(),
            expected: "a 1-based class id",
            got: class_id.to_string(),
        })?;
        self.labels.int2str(index)
    }

    fn source(&self, row: CubRow) -> Result<CubBahasaSource> {
        Ok(CubBahasaSource {
            image_id: row.image_id,
            class_id: row.class_id,
            image_path: path_string(&row.image_path)?,
            class_name: self.class_name(row.class_id)?.to_string(),
            captions: row.captions,
        })
    }

    /// One record per caption, all sharing the image path and label.
    fn fan_out(&self, row: CubRow) -> Result<Vec<(Vec<String>, Caption, usize)>> {
        let image_paths = vec![path_string(&row.image_path)?];
        let code = self.labels.str2int(self.class_name(row.class_id)?)?;
        Ok(row
            .captions
            .into_iter()
            .map(|caption| (image_paths.clone(), caption, code))
            .collect())
    }
}

impl DatasetBuilder for CubBahasa {
    type Source = CubBahasaSource;
    type SplitInput = Vec<CubRow>;

    const NAME: &'static str = NAME;

    fn config(&self) -> &BuilderConfig {
        &self.config
    }

    fn info(&self) -> DatasetInfo {
        let features = match self.config.schema {
            Schema::Source => Features::new()
                .with("image_id", Feature::int64())
                .with("class_id", Feature::int64())
                .with("image_path", Feature::string())
                .with("class_name", Feature::string())
                .with(
                    "captions",
                    Feature::list(Feature::Struct {
                        fields: Features::new()
                            .with("caption_eng", Feature::string())
                            .with("caption_ind", Feature::string()),
                    }),
                ),
            _ => image_text_features(&self.labels),
        };
        DatasetInfo {
            description: DESCRIPTION,
            homepage: HOMEPAGE,
            license: Licenses::Unknown,
            citation: CITATION,
            languages: &["ind"],
            tasks: &[Tasks::ImageCaptioning],
            features,
        }
    }

    fn split_generators(
        &self,
        resolver: &dyn PathResolver,
    ) -> Result<Vec<SplitGenerator<Vec<CubRow>>>> {
        let caption_file = resolver.resolve(TEXT_URL)?;
        let image_dir = resolver.resolve(IMAGE_URL)?;
        let (train, test) = load_rows(&image_dir, &caption_file)?;
        Ok(vec![
            SplitGenerator {
                name: Split::Train,
                input: train,
            },
            SplitGenerator {
                name: Split::Test,
                input: test,
            },
        ])
    }

    fn generate_examples(&self, input: Vec<CubRow>) -> Result<Examples<'_, CubBahasaSource>> {
        let examples = match self.config.schema {
            Schema::Source => Examples::new(input.into_iter().map(
                |row| -> Result<Record<CubBahasaSource>> { Ok(Record::Source(self.source(row)?)) },
            )),
            _ => {
                let captions = input.into_iter().flat_map(|row| match self.fan_out(row) {
                    Ok(records) => records.into_iter().map(Ok).collect::<Vec<_>>(),
                    Err(err) => vec![Err(err)],
                });
                Examples::new(captions.enumerate().map(
                    |(id, caption)| -> Result<Record<CubBahasaSource>> {
                        let (image_paths, caption, code) = caption?;
                        Ok(Record::ImageText(ImageTextRecord {
                            id: id.to_string(),
                            image_paths,
                            texts: Some(caption.caption_ind),
                            metadata: ImageTextMetadata {
                                context: Some(caption.caption_eng),
                                labels: vec![code],
                            },
                        }))
                    },
                ))
            }
        };
        Ok(examples)
    }
}
