use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::extractors::ExtractionMethod;
use crate::record::{ImageRecord, FIELD_EXTENSION};

const JSON_INDENT: &[u8] = b"    ";

/// Records grouped by file extension, then by extraction method, in discovery order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Summary {
    groups: BTreeMap<String, BTreeMap<ExtractionMethod, Vec<ImageRecord>>>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record produced by `method` under its extension field.
    pub fn push(&mut self, method: ExtractionMethod, record: ImageRecord) {
        let extension = record.text(FIELD_EXTENSION).unwrap_or_default().to_string();

        self.groups
            .entry(extension)
            .or_default()
            .entry(method)
            .or_default()
            .push(record);
    }

    pub fn records(&self, extension: &str, method: ExtractionMethod) -> &[ImageRecord] {
        self.groups
            .get(extension)
            .and_then(|methods| methods.get(&method))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn methods(&self, extension: &str) -> Vec<ExtractionMethod> {
        self.groups
            .get(extension)
            .map(|methods| methods.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn record_count(&self) -> usize {
        self.groups
            .values()
            .flat_map(|methods| methods.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Pretty JSON with four-space indentation.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Writes the summary to `output_dir/file_name`, creating the directory if needed.
    pub fn write_json(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf, ScanError> {
        fs::create_dir_all(output_dir)?;

        let path = output_dir.join(file_name);
        fs::write(&path, self.to_json_bytes()?)?;

        info!(
            "Wrote {} records to {}",
            self.record_count(),
            path.display()
        );
        Ok(path)
    }
}
