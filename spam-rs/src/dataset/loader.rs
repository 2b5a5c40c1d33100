//! CSV dataset loading
//!
//! Reads labelled messages from a CSV file with a header row. Columns are
//! located by name through an explicit [`DatasetSchema`] and raw label values
//! are translated through a [`LabelMapping`] table; anything the table does not
//! know about is rejected instead of guessed.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::types::{Dataset, Document, Label};
use crate::config::DatasetConfig;
use crate::error::{Result, SpamError};

/// Names of the label and text columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    pub label_column: String,
    pub text_column: String,
}

impl DatasetSchema {
    pub fn new(label_column: impl Into<String>, text_column: impl Into<String>) -> Self {
        Self {
            label_column: label_column.into(),
            text_column: text_column.into(),
        }
    }
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self::new("Category", "Message")
    }
}

impl From<&DatasetConfig> for DatasetSchema {
    fn from(config: &DatasetConfig) -> Self {
        Self::new(&config.label_column, &config.text_column)
    }
}

/// Raw label string to class table
///
/// Keys are compared after trimming and lowercasing.
#[derive(Debug, Clone)]
pub struct LabelMapping {
    entries: HashMap<String, Label>,
}

impl LabelMapping {
    /// Empty table; every lookup fails until aliases are added
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register another accepted spelling
    pub fn with_alias(mut self, raw: &str, label: Label) -> Self {
        self.entries.insert(Self::normalize(raw), label);
        self
    }

    /// Map a raw label value, failing on anything not in the table
    pub fn map(&self, raw: &str) -> Result<Label> {
        self.entries
            .get(&Self::normalize(raw))
            .copied()
            .ok_or_else(|| SpamError::data(format!("unmapped label value '{}'", raw.trim())))
    }

    fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}

impl Default for LabelMapping {
    fn default() -> Self {
        Self::empty()
            .with_alias("ham", Label::Ham)
            .with_alias("not spam", Label::Ham)
            .with_alias("spam", Label::Spam)
    }
}

/// Reads a [`Dataset`] out of CSV input
pub struct DatasetLoader {
    schema: DatasetSchema,
    labels: LabelMapping,
}

impl DatasetLoader {
    pub fn new(schema: DatasetSchema) -> Self {
        Self {
            schema,
            labels: LabelMapping::default(),
        }
    }

    /// Replace the label table
    pub fn with_labels(mut self, labels: LabelMapping) -> Self {
        self.labels = labels;
        self
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        info!("Loading dataset from {}", path.display());

        let file = File::open(path)?;
        self.load_from_reader(file)
    }

    /// Parse CSV content from any reader
    ///
    /// Rows where either the label or the text is blank are skipped. A label
    /// value missing from the mapping table fails the whole load.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.byte_headers()?.iter().map(decode_field).collect();
        let label_idx = self.column_index(&headers, &self.schema.label_column)?;
        let text_idx = self.column_index(&headers, &self.schema.text_column)?;

        let mut dataset = Dataset::default();
        let mut skipped = 0usize;

        for (row, record) in reader.byte_records().enumerate() {
            let record = record?;

            let label = record.get(label_idx).map(decode_field).unwrap_or_default();
            let text = record.get(text_idx).map(decode_field).unwrap_or_default();

            if label.trim().is_empty() || text.trim().is_empty() {
                skipped += 1;
                continue;
            }

            // Header is line 1
            let label = self
                .labels
                .map(&label)
                .map_err(|e| SpamError::data(format!("line {}: {}", row + 2, e)))?;

            dataset.push(Document::new(text, label));
        }

        if skipped > 0 {
            debug!("Skipped {} rows with a blank label or message", skipped);
        }
        info!(
            "Loaded {} messages ({} ham, {} spam)",
            dataset.len(),
            dataset.count(Label::Ham),
            dataset.count(Label::Spam)
        );

        Ok(dataset)
    }

    fn column_index(&self, headers: &[String], name: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| {
                SpamError::data(format!(
                    "column '{}' not found (available: {})",
                    name,
                    headers.join(", ")
                ))
            })
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new(DatasetSchema::default())
    }
}

/// UTF-8 when valid, Latin-1 otherwise
fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
