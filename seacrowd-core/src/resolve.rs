//! Mapping the remote urls declared by loaders to local paths.
//!
//! Downloading and extracting archives happens outside of this crate, resolvers only locate
//! the results: an explicit table, a local mirror of the remote layout, or the hugging face hub
//! cache when the `hub` feature is enabled.
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub trait PathResolver {
    fn resolve(&self, url: &str) -> Result<PathBuf>;

    fn resolve_all(&self, urls: &[&str]) -> Result<Vec<PathBuf>> {
        urls.iter().map(|url| self.resolve(url)).collect()
    }
}

impl<R: PathResolver + ?Sized> PathResolver for &R {
    fn resolve(&self, url: &str) -> Result<PathBuf> {
        (**self).resolve(url)
    }
}

fn existing(url: &str, path: PathBuf) -> Result<PathBuf> {
    if !path.exists() {
        return Err(Error::MissingPath { path });
    }
    tracing::debug!(url, ?path, "resolved");
    Ok(path)
}

/// Explicit url to path table.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    paths: HashMap<String, PathBuf>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<P: AsRef<Path>>(&mut self, url: &str, path: P) {
        self.paths.insert(url.to_string(), path.as_ref().to_path_buf());
    }

    pub fn with<P: AsRef<Path>>(mut self, url: &str, path: P) -> Self {
        self.insert(url, path);
        self
    }
}

impl PathResolver for MapResolver {
    fn resolve(&self, url: &str) -> Result<PathBuf> {
        match self.paths.get(url) {
            None => Err(Error::UnresolvedUrl {
                url: url.to_string(),
            }),
            Some(path) => existing(url, path.clone()),
        }
    }
}

const ARCHIVE_EXTENSIONS: [&str; 4] = [".tar.gz", ".tgz", ".zip", ".tar"];

/// Resolves urls against a local mirror of the remote host layout.
///
/// `https://host/a/b/data.zip?download=true` resolves to `<root>/host/a/b/data`, i.e. archives
/// are expected to be extracted in place of the archive file, while other files are kept as is.
#[derive(Debug, Clone)]
pub struct MirrorResolver {
    root: PathBuf,
}

impl MirrorResolver {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// The local path for `url`, whether it exists or not.
    pub fn local_path(&self, url: &str) -> Result<PathBuf> {
        let unresolved = || Error::UnresolvedUrl {
            url: url.to_string(),
        };
        let (_scheme, rest) = url.split_once("://").ok_or_else(unresolved)?;
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let mut path = self.root.clone();
        let mut segments = rest.split('/').filter(|s| !s.is_empty()).peekable();
        if segments.peek().is_none() {
            return Err(unresolved());
        }
        while let Some(segment) = segments.next() {
            let decoded = segment.replace("%2F", "/").replace("%2f", "/");
            let segment = decoded.trim_matches('/');
            if segment.is_empty() || segment.split('/').any(|s| s == "..") {
                return Err(unresolved());
            }
            if segments.peek().is_none() {
                let stem = ARCHIVE_EXTENSIONS
                    .iter()
                    .find_map(|ext| segment.strip_suffix(ext))
                    .filter(|stem| !stem.is_empty())
                    .unwrap_or(segment);
                path.push(stem);
            } else {
                path.push(segment);
            }
        }
        Ok(path)
    }
}

impl PathResolver for MirrorResolver {
    fn resolve(&self, url: &str) -> Result<PathBuf> {
        existing(url, self.local_path(url)?)
    }
}

/// A file hosted in a hugging face dataset repo, as found in `resolve` urls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubFile {
    pub repo_id: String,
    pub revision: String,
    pub filename: String,
}

impl HubFile {
    /// Parses `https://huggingface.co/datasets/<org>/<name>/resolve/<revision>/<file>`.
    pub fn parse(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("https://huggingface.co/datasets/")?;
        let rest = rest.split(['?', '#']).next()?;
        let (repo_id, rest) = rest.split_once("/resolve/")?;
        let (revision, filename) = rest.split_once('/')?;
        if repo_id.is_empty() || filename.is_empty() {
            return None;
        }
        Some(Self {
            repo_id: repo_id.to_string(),
            revision: revision.replace("%2F", "/").replace("%2f", "/"),
            filename: filename.to_string(),
        })
    }
}

/// Fetches dataset files through the hugging face hub cache.
#[cfg(feature = "hub")]
pub struct HubResolver {
    api: hf_hub::api::sync::Api,
}

#[cfg(feature = "hub")]
impl HubResolver {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: hf_hub::api::sync::Api::new()?,
        })
    }

    pub fn from_api(api: hf_hub::api::sync::Api) -> Self {
        Self { api }
    }
}

#[cfg(feature = "hub")]
impl PathResolver for HubResolver {
    fn resolve(&self, url: &str) -> Result<PathBuf> {
        use hf_hub::{Repo, RepoType};

        let file = HubFile::parse(url).ok_or_else(|| Error::UnresolvedUrl {
            url: url.to_string(),
        })?;
        let repo = Repo::with_revision(file.repo_id, RepoType::Dataset, file.revision);
        let local = self.api.repo(repo).get(&file.filename)?;
        existing(url, local)
    }
}
