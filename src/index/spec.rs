//! Index configuration read from `text:*-source` elements.

use crate::list::MAX_LEVEL;
use crate::source::{NodeKind, SourceId, SourceTree};

/// What an index shows and how it selects entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSpec {
    TableOfContents {
        /// Deepest heading level listed.
        outline_level: u8,
        use_outline_level: bool,
        use_marks: bool,
        use_source_styles: bool,
        /// Paragraph style names listed at an outline level.
        source_styles: Vec<(u8, String)>,
        by_chapter: bool,
    },
    Alphabetical {
        separators: bool,
        by_chapter: bool,
    },
    User {
        name: String,
        use_marks: bool,
        by_chapter: bool,
    },
    Bibliography {
        sort_by_position: bool,
    },
}

impl IndexSpec {
    /// Read the configuration of an index element; `None` for kinds that
    /// keep their precomputed body.
    pub fn read(tree: &SourceTree, index: SourceId) -> Option<IndexSpec> {
        let source = tree.child_of_kind(index, NodeKind::IndexSource);
        let attr = |name: &str| source.and_then(|s| tree.attr(s, name));
        let enabled = |name: &str, default: bool| match attr(name) {
            Some(v) => v == "true",
            None => default,
        };
        let by_chapter = attr("text:index-scope") == Some("chapter");

        let spec = match tree.kind(index) {
            NodeKind::TableOfContent => {
                let outline_level = source
                    .and_then(|s| tree.attr_u32(s, "text:outline-level"))
                    .map_or(MAX_LEVEL, |l| l.clamp(1, MAX_LEVEL as u32) as u8);
                IndexSpec::TableOfContents {
                    outline_level,
                    use_outline_level: enabled("text:use-outline-level", true),
                    use_marks: enabled("text:use-index-marks", true),
                    use_source_styles: enabled("text:use-index-source-styles", false),
                    source_styles: source
                        .map(|s| source_styles(tree, s))
                        .unwrap_or_default(),
                    by_chapter,
                }
            }
            NodeKind::AlphabeticalIndex => IndexSpec::Alphabetical {
                separators: enabled("text:alphabetical-separators", false),
                by_chapter,
            },
            NodeKind::UserIndex => IndexSpec::User {
                name: attr("text:index-name").unwrap_or_default().to_string(),
                use_marks: enabled("text:use-index-marks", true),
                by_chapter,
            },
            NodeKind::Bibliography => IndexSpec::Bibliography {
                sort_by_position: enabled("text:sort-by-position", false)
                    || tree.attr_flag(index, "text:sort-by-position"),
            },
            _ => return None,
        };
        Some(spec)
    }

    /// Whether entries are limited to the index's own chapter.
    pub fn by_chapter(&self) -> bool {
        match self {
            IndexSpec::TableOfContents { by_chapter, .. }
            | IndexSpec::Alphabetical { by_chapter, .. }
            | IndexSpec::User { by_chapter, .. } => *by_chapter,
            IndexSpec::Bibliography { .. } => false,
        }
    }

    /// Class of the index container.
    pub fn class(&self) -> &'static str {
        match self {
            IndexSpec::TableOfContents { .. } => "toc",
            IndexSpec::Alphabetical { .. } => "alphabetical-index",
            IndexSpec::User { .. } => "user-index",
            IndexSpec::Bibliography { .. } => "bibliography",
        }
    }

    /// Outline level a paragraph style is listed at.
    pub fn source_style_level(&self, style: &str) -> Option<u8> {
        match self {
            IndexSpec::TableOfContents {
                use_source_styles: true,
                source_styles,
                ..
            } => source_styles
                .iter()
                .find(|(_, s)| s == style)
                .map(|(level, _)| *level),
            _ => None,
        }
    }
}

fn source_styles(tree: &SourceTree, source: SourceId) -> Vec<(u8, String)> {
    let mut out = Vec::new();
    for group in tree
        .children(source)
        .filter(|&c| tree.kind(c) == NodeKind::IndexSourceStyles)
    {
        let level = tree
            .attr_u32(group, "text:outline-level")
            .unwrap_or(1)
            .clamp(1, MAX_LEVEL as u32) as u8;
        for style in tree.children(group) {
            if tree.kind(style) == NodeKind::IndexSourceStyle
                && let Some(name) = tree.attr(style, "text:style-name")
            {
                out.push((level, name.to_string()));
            }
        }
    }
    out
}
