//! Closed label enumerations.
//!
//! A [`ClassLabel`] is the ordered list of valid class values for a task. Loaders build them once
//! and pass them around as immutable data; lookups in both directions fail loudly when a value is
//! not part of the enumeration.
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ClassLabel {
    names: Arc<[String]>,
    index: Arc<HashMap<String, usize>>,
}

impl ClassLabel {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Arc<[String]> = names.into_iter().map(Into::into).collect();
        // First occurrence wins, as with a linear scan.
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self {
            names,
            index: Arc::new(index),
        }
    }

    /// `count` numeric codes left padded with zeros to `width` digits, e.g. `"00"` to `"77"`.
    pub fn zero_padded(count: usize, width: usize) -> Self {
        Self::from_names((0..count).map(|i| format!("{i:0width$}")))
    }

    /// Anonymous classes named after their index.
    pub fn with_num_classes(count: usize) -> Self {
        Self::from_names((0..count).map(|i| i.to_string()))
    }

    pub fn num_classes(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of `name` in the enumeration.
    pub fn str2int(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownLabel {
                label: name.to_string(),
                num_classes: self.num_classes(),
            })
    }

    pub fn int2str(&self, index: usize) -> Result<&str> {
        self.names
            .get(index)
            .map(|s| s.as_str())
            .ok_or(Error::LabelOutOfRange {
                index,
                num_classes: self.num_classes(),
            })
    }
}

impl From<Vec<String>> for ClassLabel {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}

impl From<ClassLabel> for Vec<String> {
    fn from(label: ClassLabel) -> Self {
        label.names.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_padded_codes() -> Result<()> {
        let chr = ClassLabel::zero_padded(78, 2);
        assert_eq!(chr.num_classes(), 78);
        assert_eq!(chr.int2str(0)?, "00");
        assert_eq!(chr.int2str(77)?, "77");
        assert_eq!(chr.str2int("07")?, 7);

        let syl = ClassLabel::zero_padded(320, 3);
        assert_eq!(syl.int2str(5)?, "005");
        assert_eq!(syl.str2int("319")?, 319);
        Ok(())
    }

    #[test]
    fn lookup_failures() {
        let chr = ClassLabel::zero_padded(78, 2);
        assert!(matches!(
            chr.str2int("78"),
            Err(Error::UnknownLabel { num_classes: 78, .. })
        ));
        assert!(matches!(chr.str2int("7"), Err(Error::UnknownLabel { .. })));
        assert!(matches!(
            chr.int2str(78),
            Err(Error::LabelOutOfRange { index: 78, .. })
        ));
    }

    #[test]
    fn round_trip() -> Result<()> {
        let names = ClassLabel::from_names(["001.Black_footed_Albatross", "002.Laysan_Albatross"]);
        for name in names.names() {
            assert_eq!(names.int2str(names.str2int(name)?)?, name);
        }
        assert_eq!(ClassLabel::with_num_classes(3).names(), ["0", "1", "2"]);
        Ok(())
    }

    #[test]
    fn serde() -> Result<()> {
        let label = ClassLabel::from_names(["a", "b"]);
        let json = serde_json::to_string(&label)?;
        assert_eq!(json, r#"["a","b"]"#);
        let back: ClassLabel = serde_json::from_str(&json)?;
        assert_eq!(back.str2int("b")?, 1);
        Ok(())
    }
}
