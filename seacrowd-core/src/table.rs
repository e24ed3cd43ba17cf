//! Tabular helpers: typed delimited files, joins and parquet row streams.
use crate::{Error, Result};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::reader::RowIter;
use parquet::record::Row;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// Reads a headerless delimited file, deserializing each line into `T` by position.
pub fn read_delimited<T: DeserializeOwned, P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Vec<T>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| Error::from(e).with_path(path))?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| Error::from(e).with_path(path))?;
    tracing::debug!(?path, rows = rows.len(), "read table");
    Ok(rows)
}

/// Groups rows by key, keeping the rows of a group in input order.
pub fn group_by<I, K, V, F>(rows: I, key: F) -> HashMap<K, Vec<V>>
where
    I: IntoIterator<Item = V>,
    K: Hash + Eq,
    F: Fn(&V) -> K,
{
    let mut groups: HashMap<K, Vec<V>> = HashMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row)
    }
    groups
}

/// Inner join of `left` with the grouped `right` table, producing one output row per matching
/// pair. Output order follows `left`, then the order within each group. Rows of `left` without a
/// match are dropped.
pub fn inner_join<L, R, K, I, F>(left: I, right: &HashMap<K, Vec<R>>, key: F) -> Vec<(L, R)>
where
    I: IntoIterator<Item = L>,
    L: Clone,
    R: Clone,
    K: Hash + Eq,
    F: Fn(&L) -> K,
{
    let mut joined = Vec::new();
    let mut dropped = 0usize;
    for l in left {
        match right.get(&key(&l)) {
            Some(matches) if !matches.is_empty() => {
                joined.extend(matches.iter().map(|r| (l.clone(), r.clone())))
            }
            _ => dropped += 1,
        }
    }
    tracing::debug!(rows = joined.len(), dropped, "inner join");
    joined
}

/// Inner join attaching the whole matching group as a list valued column.
pub fn inner_join_grouped<L, R, K, I, F>(
    left: I,
    right: &HashMap<K, Vec<R>>,
    key: F,
) -> Vec<(L, Vec<R>)>
where
    I: IntoIterator<Item = L>,
    R: Clone,
    K: Hash + Eq,
    F: Fn(&L) -> K,
{
    let mut joined = Vec::new();
    let mut dropped = 0usize;
    for l in left {
        match right.get(&key(&l)) {
            Some(group) if !group.is_empty() => {
                let group = group.clone();
                joined.push((l, group))
            }
            _ => dropped += 1,
        }
    }
    tracing::debug!(rows = joined.len(), dropped, "inner join on groups");
    joined
}

fn open_parquet(path: &Path) -> Result<SerializedFileReader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|e| Error::from(e).with_path(path))?;
    let reader = SerializedFileReader::new(file).map_err(|e| Error::from(e).with_path(path))?;
    Ok(reader)
}

/// Streams the rows of a list of parquet files, one file after the other.
///
/// Files are only opened once the previous one has been exhausted. The stream stops after the
/// first error.
pub struct ParquetRows {
    paths: std::vec::IntoIter<PathBuf>,
    current: Option<(PathBuf, RowIter<'static>)>,
    failed: bool,
}

impl ParquetRows {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into_iter(),
            current: None,
            failed: false,
        }
    }

    fn fail(&mut self, err: Error) -> Option<Result<Row>> {
        self.failed = true;
        self.current = None;
        Some(Err(err))
    }
}

impl Iterator for ParquetRows {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }
            if let Some((path, rows)) = self.current.as_mut() {
                match rows.next() {
                    Some(Ok(row)) => return Some(Ok(row)),
                    Some(Err(err)) => {
                        let err = Error::from(err).with_path(&*path);
                        return self.fail(err);
                    }
                    None => self.current = None,
                }
                continue;
            }
            let path = self.paths.next()?;
            match open_parquet(&path) {
                Ok(reader) => {
                    tracing::debug!(
                        ?path,
                        rows = reader.metadata().file_metadata().num_rows(),
                        "reading parquet file"
                    );
                    self.current = Some((path, reader.into_iter()))
                }
                Err(err) => return self.fail(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
    struct Pair {
        id: i64,
        name: String,
    }

    #[test]
    fn delimited() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("images.txt");
        std::fs::write(&path, "1 a/x.jpg\n2 b/y.jpg\n")?;
        let rows: Vec<Pair> = read_delimited(&path, b' ')?;
        assert_eq!(
            rows,
            [
                Pair {
                    id: 1,
                    name: "a/x.jpg".to_string()
                },
                Pair {
                    id: 2,
                    name: "b/y.jpg".to_string()
                }
            ]
        );
        let missing: Result<Vec<Pair>> = read_delimited(tmp.path().join("nope.txt"), b' ');
        assert!(missing.is_err());
        Ok(())
    }

    #[test]
    fn joins() {
        let left = vec![(1, "a"), (2, "b"), (3, "c")];
        let right = group_by(vec![(3, 'z'), (1, 'x'), (1, 'y')], |r| r.0);
        let joined = inner_join(left.clone(), &right, |l| l.0);
        assert_eq!(
            joined,
            [((1, "a"), (1, 'x')), ((1, "a"), (1, 'y')), ((3, "c"), (3, 'z'))]
        );
        let grouped = inner_join_grouped(left, &right, |l| l.0);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].1, [(1, 'x'), (1, 'y')]);
        assert_eq!(grouped[1].0, (3, "c"));
    }

    #[test]
    fn parquet_missing_file() {
        let mut rows = ParquetRows::new(vec![PathBuf::from("/does/not/exist.parquet")]);
        assert!(matches!(rows.next(), Some(Err(_))));
        assert!(rows.next().is_none());
    }
}
