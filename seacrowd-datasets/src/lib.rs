//! Dataset loaders for SEACrowd
//!
//! Each loader implements [`seacrowd::DatasetBuilder`] for one dataset. [`Loader`] picks the
//! right one from a config name such as `burapha_th_digit_source` or from a
//! [`seacrowd::LoadRequest`].
pub mod speech;
pub mod vision;

pub use speech::mswc::Mswc;
pub use vision::burapha_th::BuraphaTh;
pub use vision::cub_bahasa::CubBahasa;

use seacrowd::{
    BuilderConfig, DatasetBuilder, DatasetInfo, Error, Features, LoadRequest, PathResolver,
    Record, Result, Split,
};

pub type JsonExamples<'a> = Box<dyn Iterator<Item = Result<(usize, serde_json::Value)>> + 'a>;

/// Dataset names with their subsets, and whether picking a subset is mandatory.
static DATASETS: [(&str, &[&str], bool); 3] = [
    (vision::burapha_th::NAME, &vision::burapha_th::SUBSETS, true),
    (vision::cub_bahasa::NAME, &[], false),
    (speech::mswc::NAME, &speech::mswc::SUBSETS, false),
];

#[derive(Debug, Clone)]
pub enum Loader {
    BuraphaTh(BuraphaTh),
    CubBahasa(CubBahasa),
    Mswc(Mswc),
}

fn to_json<S: serde::Serialize>(
    example: Result<(usize, Record<S>)>,
) -> Result<(usize, serde_json::Value)> {
    let (id, record) = example?;
    Ok((id, serde_json::to_value(record)?))
}

impl Loader {
    /// Every predeclared config, across all datasets.
    pub fn all_builder_configs() -> Vec<BuilderConfig> {
        let mut configs = BuraphaTh::builder_configs();
        configs.extend(CubBahasa::builder_configs());
        configs.extend(Mswc::builder_configs());
        configs
    }

    pub fn from_request(req: &LoadRequest) -> Result<Self> {
        let loader = match req.dataset.as_str() {
            vision::burapha_th::NAME => Self::BuraphaTh(BuraphaTh::from_request(req)?),
            vision::cub_bahasa::NAME => Self::CubBahasa(CubBahasa::from_request(req)?),
            speech::mswc::NAME => Self::Mswc(Mswc::from_request(req)?),
            _ => {
                return Err(Error::UnknownConfig {
                    name: req.dataset.clone(),
                })
            }
        };
        Ok(loader)
    }

    /// Builds the loader for a config name `<dataset>[_<subset>]_<schema>`.
    ///
    /// Names that are not predeclared still get parsed so that the error points at the faulty
    /// part, e.g. an unknown schema or subset.
    pub fn from_config_name(name: &str) -> Result<Self> {
        let unknown = || Error::UnknownConfig {
            name: name.to_string(),
        };
        let (dataset, subsets, subset_required) = DATASETS
            .iter()
            .find(|(dataset, _, _)| {
                name.strip_prefix(dataset)
                    .is_some_and(|rest| rest.starts_with('_'))
            })
            .ok_or_else(unknown)?;
        let rest = &name[dataset.len() + 1..];
        let subset = subsets
            .iter()
            .find(|s| rest.strip_prefix(**s).is_some_and(|r| r.starts_with('_')))
            .copied();
        let req = match subset {
            Some(subset) => LoadRequest::new(dataset, Some(subset), &rest[subset.len() + 1..]),
            None if *subset_required => match rest.split_once('_') {
                Some((subset, schema)) => LoadRequest::new(dataset, Some(subset), schema),
                None => return Err(unknown()),
            },
            None => LoadRequest::new(dataset, None, rest),
        };
        Self::from_request(&req)
    }

    pub fn config(&self) -> &BuilderConfig {
        match self {
            Self::BuraphaTh(b) => b.config(),
            Self::CubBahasa(b) => b.config(),
            Self::Mswc(b) => b.config(),
        }
    }

    pub fn info(&self) -> DatasetInfo {
        match self {
            Self::BuraphaTh(b) => b.info(),
            Self::CubBahasa(b) => b.info(),
            Self::Mswc(b) => b.info(),
        }
    }

    pub fn describe_schema(&self) -> Features {
        self.info().features
    }

    /// Generates the examples of `split` as json values, whatever the underlying record type.
    pub fn generate_json<'a>(
        &'a self,
        resolver: &dyn PathResolver,
        split: Split,
    ) -> Result<JsonExamples<'a>> {
        let examples: JsonExamples<'a> = match self {
            Self::BuraphaTh(b) => Box::new(b.generate(resolver, split)?.map(to_json)),
            Self::CubBahasa(b) => Box::new(b.generate(resolver, split)?.map(to_json)),
            Self::Mswc(b) => Box::new(b.generate(resolver, split)?.map(to_json)),
        };
        Ok(examples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seacrowd::Schema;

    #[test]
    fn every_config_loads() -> Result<()> {
        let configs = Loader::all_builder_configs();
        assert_eq!(configs.len(), 16);
        for config in configs {
            let loader = Loader::from_config_name(&config.name)?;
            assert_eq!(loader.config(), &config);
        }
        Ok(())
    }

    #[test]
    fn defaults() -> Result<()> {
        for name in [
            vision::burapha_th::DEFAULT_CONFIG_NAME,
            vision::cub_bahasa::DEFAULT_CONFIG_NAME,
            speech::mswc::DEFAULT_CONFIG_NAME,
        ] {
            assert_eq!(Loader::from_config_name(name)?.config().schema, Schema::Source);
        }
        Ok(())
    }

    #[test]
    fn bad_names() {
        for name in [
            "burapha_th_digit_bogus_schema",
            "cub_bahasa_bogus_schema",
            "mswc_bogus_schema",
            "mswc_ind_bogus_schema",
        ] {
            assert!(
                matches!(
                    Loader::from_config_name(name),
                    Err(Error::UnknownSchema { .. })
                ),
                "{name}"
            );
        }
        assert!(matches!(
            Loader::from_config_name("burapha_th_emoji_source"),
            Err(Error::UnknownSubset { .. })
        ));
        assert!(matches!(
            Loader::from_config_name("burapha_th_digit_seacrowd_sptext"),
            Err(Error::UnsupportedSchema { .. })
        ));
        assert!(matches!(
            Loader::from_config_name("imagenet_source"),
            Err(Error::UnknownConfig { .. })
        ));
        assert!(matches!(
            Loader::from_config_name("burapha_th"),
            Err(Error::UnknownConfig { .. })
        ));
    }
}
