//! Indexing datasets whose labels are encoded in directory names.
//!
//! The expected layout is one directory per class under the split root, named
//! `<label><delimiter><anything>`, e.g. `07-kho_khai`, holding the items of that class.
use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Label to item paths, in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelIndex {
    entries: Vec<(String, Vec<PathBuf>)>,
}

impl LabelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `paths` to `label`, creating the label entry after the existing ones if needed.
    pub fn extend<I: IntoIterator<Item = PathBuf>>(&mut self, label: &str, paths: I) {
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, existing)) => existing.extend(paths),
            None => self
                .entries
                .push((label.to_string(), paths.into_iter().collect())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.entries.iter().map(|(l, p)| (l.as_str(), p.as_slice()))
    }

    pub fn get(&self, label: &str) -> Option<&[PathBuf]> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| p.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of items across all labels.
    pub fn num_items(&self) -> usize {
        self.entries.iter().map(|(_, p)| p.len()).sum()
    }

    /// Flattens the index into `(label, path)` pairs, label by label.
    pub fn into_items(self) -> impl Iterator<Item = (String, PathBuf)> {
        self.entries
            .into_iter()
            .flat_map(|(label, paths)| paths.into_iter().map(move |p| (label.clone(), p)))
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| Error::from(e).with_path(dir))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::from(e).with_path(dir))?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

/// Scans `root` for per-label directories.
///
/// Directories and files are visited in lexical order so that the resulting index does not depend
/// on the filesystem enumeration order. Files nested deeper than the label directory are ignored.
pub fn scan_labeled_dirs<P: AsRef<Path>>(root: P, delimiter: &str) -> Result<LabelIndex> {
    let root = root.as_ref();
    if delimiter.is_empty() {
        return Err(Error::msg("empty label delimiter"));
    }
    if !root.is_dir() {
        return Err(Error::MissingPath {
            path: root.to_path_buf(),
        });
    }
    let mut index = LabelIndex::new();
    for dir_entry in sorted_entries(root)? {
        let path = dir_entry.path();
        if !dir_entry.file_type()?.is_dir() {
            tracing::debug!(?path, "skipping non directory entry");
            continue;
        }
        let name = dir_entry.file_name().into_string().map_err(|name| {
            Error::msg(format!("non utf8 directory name {name:?}")).with_path(&path)
        })?;
        let label = match name.split_once(delimiter) {
            Some((label, _)) => label.to_string(),
            None => {
                return Err(Error::MissingDelimiter {
                    name: name.clone(),
                    delimiter: delimiter.to_string(),
                })
            }
        };
        let mut files = Vec::new();
        for file_entry in sorted_entries(&path)? {
            if file_entry.file_type()?.is_file() {
                files.push(file_entry.path());
            }
        }
        index.extend(&label, files);
    }
    tracing::debug!(
        ?root,
        labels = index.len(),
        items = index.num_items(),
        "scanned label directories"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(p: &Path) -> Result<()> {
        fs::write(p, b"")?;
        Ok(())
    }

    #[test]
    fn scan_sorted() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path();
        for (dir, files) in [("01-b", &["y.png", "x.png"][..]), ("00-a", &["z.png"][..])] {
            fs::create_dir(root.join(dir))?;
            for f in files {
                touch(&root.join(dir).join(f))?;
            }
        }
        fs::create_dir(root.join("01-b").join("nested"))?;
        touch(&root.join("01-b").join("nested").join("w.png"))?;
        touch(&root.join("README"))?;

        let index = scan_labeled_dirs(root, "-")?;
        assert_eq!(index.labels().collect::<Vec<_>>(), ["00", "01"]);
        assert_eq!(index.get("00"), Some(&[root.join("00-a").join("z.png")][..]));
        assert_eq!(
            index.get("01"),
            Some(&[root.join("01-b").join("x.png"), root.join("01-b").join("y.png")][..])
        );
        assert_eq!(index.num_items(), 3);
        Ok(())
    }

    #[test]
    fn merge_same_label() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path();
        for dir in ["05-a", "05-b"] {
            fs::create_dir(root.join(dir))?;
            touch(&root.join(dir).join("i.png"))?;
        }
        let index = scan_labeled_dirs(root, "-")?;
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("05").map(|p| p.len()), Some(2));
        Ok(())
    }

    #[test]
    fn scan_errors() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let missing = tmp.path().join("train");
        assert!(matches!(
            scan_labeled_dirs(&missing, "-"),
            Err(Error::MissingPath { .. })
        ));
        assert!(matches!(
            scan_labeled_dirs(tmp.path(), ""),
            Err(Error::Msg(_))
        ));
        fs::create_dir(tmp.path().join("nodelim"))?;
        assert!(matches!(
            scan_labeled_dirs(tmp.path(), "-"),
            Err(Error::MissingDelimiter { .. })
        ));
        Ok(())
    }
}
