//! Index entries recorded during the walk.

use crate::source::SourceId;

/// Which index an explicit mark belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkIndex {
    Alphabetical,
    /// User-defined index, by `text:index-name`.
    User(String),
}

/// What produced an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// An outline heading.
    Heading { level: u8 },
    /// A paragraph whose named style some table of contents lists.
    Paragraph { style: String },
    /// `text:toc-mark`
    TocMark { level: u8 },
    /// Alphabetical or user index mark.
    IndexMark {
        index: MarkIndex,
        level: u8,
        key1: Option<String>,
        key2: Option<String>,
        /// Marked as the main entry for its word.
        main: bool,
    },
    /// A bibliography citation.
    BibliographyKey {
        identifier: String,
        /// Remaining `text:*` fields (author, title, year, ...), prefix stripped.
        fields: Vec<(String, String)>,
    },
}

/// One entry candidate, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub source: SourceId,
    /// Number of level-1 headings seen before (and including) this entry.
    pub chapter: u32,
    /// Unit holding the entry's anchor.
    pub unit: usize,
    /// Link target id of the anchor.
    pub target: String,
    /// Outline number shown before headings.
    pub label: Option<String>,
    pub text: String,
    pub kind: EntryKind,
}

impl IndexEntry {
    pub fn new(source: SourceId, unit: usize, target: &str, text: &str, kind: EntryKind) -> Self {
        Self {
            source,
            chapter: 0,
            unit,
            target: target.to_string(),
            label: None,
            text: text.to_string(),
            kind,
        }
    }

    pub fn with_chapter(mut self, chapter: u32) -> Self {
        self.chapter = chapter;
        self
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label.filter(|l| !l.is_empty());
        self
    }

    /// Bibliography field by name (`author`, `title`, `year`, ...).
    pub fn field(&self, name: &str) -> Option<&str> {
        match &self.kind {
            EntryKind::BibliographyKey { fields, .. } => fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}
