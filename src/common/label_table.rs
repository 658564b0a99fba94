use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use anyhow::Context;

/// Ordered class names; the position of a name is its class index.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LabelTable {
    names: Vec<String>,
}

impl LabelTable {
    /// Builds a table from in-memory names. Blank names are skipped, as in a label file.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            names: names
                .iter()
                .map(|x| x.as_ref().trim_end_matches('\r'))
                .filter(|x| !x.trim().is_empty())
                .map(|x| x.to_string())
                .collect(),
        }
    }

    /// Reads a newline-delimited label list, skipping blank lines.
    pub fn from_reader<R: Read>(reader: R) -> anyhow::Result<Self> {
        let mut names = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if !line.trim().is_empty() {
                names.push(line.to_string());
            }
        }
        Ok(Self { names })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Labels could not be loaded from {}", path.display()))?;
        Self::from_reader(file)
    }

    pub fn get(&self, class_index: usize) -> Option<&str> {
        self.names.get(class_index).map(|x| x.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
