//! The builder interface and the example stream it produces.
use crate::config::{BuilderConfig, Licenses, Tasks};
use crate::{Error, Features, PathResolver, Record, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }
}

impl std::str::FromStr for Split {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Self::Train),
            "validation" => Ok(Self::Validation),
            "test" => Ok(Self::Test),
            _ => Err(Error::UnknownSplit {
                split: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The input needed to generate the examples of one split.
#[derive(Debug, Clone)]
pub struct SplitGenerator<T> {
    pub name: Split,
    pub input: T,
}

/// Static description of a dataset under a given config.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatasetInfo {
    pub description: &'static str,
    pub homepage: &'static str,
    pub license: Licenses,
    pub citation: &'static str,
    pub languages: &'static [&'static str],
    pub tasks: &'static [Tasks],
    pub features: Features,
}

/// Sequentially numbered records.
///
/// Ids start at 0 and are incremented once per yielded record. The stream is single pass and
/// stops for good after the first error.
pub struct Examples<'a, S> {
    inner: Box<dyn Iterator<Item = Result<Record<S>>> + 'a>,
    next_id: usize,
    failed: bool,
}

impl<'a, S> Examples<'a, S> {
    pub fn new<I>(inner: I) -> Self
    where
        I: Iterator<Item = Result<Record<S>>> + 'a,
    {
        Self {
            inner: Box::new(inner),
            next_id: 0,
            failed: false,
        }
    }
}

impl<S> Iterator for Examples<'_, S> {
    type Item = Result<(usize, Record<S>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.inner.next()? {
            Ok(record) => {
                let id = self.next_id;
                self.next_id += 1;
                Some(Ok((id, record)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<S> std::iter::FusedIterator for Examples<'_, S> {}

/// A dataset loader: declares its schema, locates its split inputs, and turns them into records.
///
/// Implementors validate their config when constructed, so that an unknown or unsupported schema
/// is reported before anything is resolved or read.
pub trait DatasetBuilder {
    /// The dataset native record.
    type Source: serde::Serialize;
    /// Whatever the split generators hand over to the example generation.
    type SplitInput;

    const NAME: &'static str;

    fn config(&self) -> &BuilderConfig;

    fn info(&self) -> DatasetInfo;

    fn describe_schema(&self) -> Features {
        self.info().features
    }

    fn split_generators(
        &self,
        resolver: &dyn PathResolver,
    ) -> Result<Vec<SplitGenerator<Self::SplitInput>>>;

    fn generate_examples(&self, input: Self::SplitInput) -> Result<Examples<'_, Self::Source>>;

    /// Resolves the inputs of `split` and returns its examples.
    fn generate(
        &self,
        resolver: &dyn PathResolver,
        split: Split,
    ) -> Result<Examples<'_, Self::Source>> {
        let config = self.config();
        let _span = tracing::info_span!("generate", config = %config.name, %split).entered();
        let generator = self
            .split_generators(resolver)?
            .into_iter()
            .find(|g| g.name == split)
            .ok_or_else(|| Error::UnknownSplit {
                split: split.to_string(),
            })?;
        tracing::info!(config = %config.name, %split, "generating examples");
        self.generate_examples(generator.input)
    }
}
