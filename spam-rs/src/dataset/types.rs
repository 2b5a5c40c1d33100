//! Labelled message types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Binary message class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    /// Legitimate message
    Ham,
    /// Unsolicited message
    Spam,
}

impl Label {
    /// Both classes, in index order
    pub const ALL: [Label; 2] = [Label::Ham, Label::Spam];

    /// Position of this class in per-class arrays
    pub fn index(self) -> usize {
        match self {
            Label::Ham => 0,
            Label::Spam => 1,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Ham => write!(f, "Not Spam"),
            Label::Spam => write!(f, "Spam"),
        }
    }
}

/// A single labelled message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    text: String,
    label: Label,
}

impl Document {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    pub fn ham(text: impl Into<String>) -> Self {
        Self::new(text, Label::Ham)
    }

    pub fn spam(text: impl Into<String>) -> Self {
        Self::new(text, Label::Spam)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> Label {
        self.label
    }
}

/// Ordered collection of labelled messages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    documents: Vec<Document>,
}

impl Dataset {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    /// Number of documents carrying `label`
    pub fn count(&self, label: Label) -> usize {
        self.documents.iter().filter(|d| d.label == label).count()
    }

    /// Drop exact (text, label) repeats, keeping the first occurrence in order
    pub fn deduplicate(&self) -> Dataset {
        let mut seen: HashSet<&Document> = HashSet::with_capacity(self.documents.len());
        let documents = self
            .documents
            .iter()
            .filter(|d| seen.insert(*d))
            .cloned()
            .collect();

        Dataset { documents }
    }
}

impl FromIterator<Document> for Dataset {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
