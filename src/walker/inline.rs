//! Inline content: text, spans, links, anchors, references and marks.

use super::state::RunState;
use crate::index::{EntryKind, IndexEntry, MarkIndex};
use crate::links::OdfHref;
use crate::list::MAX_LEVEL;
use crate::source::{NodeKind, SourceId, StyleFamily};
use crate::split::Cursor;
use crate::util::sanitize_id;

impl RunState<'_> {
    pub(super) fn inline_children(&mut self, parent: SourceId, cur: Cursor) {
        let source = self.source;
        for child in source.children(parent) {
            self.inline(child, cur);
        }
    }

    /// Convert one inline node into `cur`.
    pub(super) fn inline(&mut self, id: SourceId, cur: Cursor) {
        let source = self.source;
        match source.kind(id) {
            NodeKind::Text => {
                let text = source.node(id).map_or("", |n| n.text.as_str());
                self.write_text(cur, text);
            }
            NodeKind::Span => self.span(id, cur),
            NodeKind::Link => self.link(id, cur),
            NodeKind::LineBreak => {
                self.element(cur, "br");
            }
            NodeKind::Tab => self.write_text(cur, "\t"),
            NodeKind::Space => {
                let count = source.space_count(id);
                self.write_text(cur, &"\u{a0}".repeat(count));
            }
            NodeKind::Bookmark | NodeKind::ReferenceMark => {
                if let Some(name) = source.attr(id, "text:name") {
                    let a = self.element(cur, "a");
                    self.anchor(cur.unit, a, &sanitize_id(name));
                }
            }
            NodeKind::BookmarkRef
            | NodeKind::ReferenceRef
            | NodeKind::SequenceRef
            | NodeKind::NoteRef => self.reference(id, cur),
            NodeKind::Sequence => {
                let span = self.element_with(cur, "span", &[("class", "sequence")]);
                if let Some(name) = source.attr(id, "text:ref-name") {
                    self.anchor(cur.unit, span, &sanitize_id(name));
                }
                self.inline_children(id, cur.at(span));
            }
            NodeKind::Field | NodeKind::Unknown => self.inline_children(id, cur),
            NodeKind::Annotation => self.annotation(id, cur),
            NodeKind::Note => self.note(id, cur),
            NodeKind::TocMark | NodeKind::AlphabeticalIndexMark | NodeKind::UserIndexMark => {
                self.index_mark(id, cur)
            }
            NodeKind::BibliographyMark => self.bibliography_mark(id, cur),
            NodeKind::Frame => self.frame(id, cur),
            NodeKind::Image => self.image(id, id, cur),
            NodeKind::TextBox => self.text_box(id, id, cur),
            NodeKind::Object => {
                if let Some(math) = source.find_kind(id, NodeKind::Math) {
                    self.math(math, cur);
                }
            }
            NodeKind::Math => self.math(id, cur),
            // Blocks nested in inline content (text boxes, malformed input)
            NodeKind::Paragraph
            | NodeKind::Heading
            | NodeKind::List
            | NodeKind::NumberedParagraph
            | NodeKind::Table
            | NodeKind::Section
            | NodeKind::TableOfContent
            | NodeKind::AlphabeticalIndex
            | NodeKind::UserIndex
            | NodeKind::Bibliography
            | NodeKind::OtherIndex
            | NodeKind::IndexTitle
            | NodeKind::IndexBody
            | NodeKind::Body
            | NodeKind::ListItem
            | NodeKind::ListHeader
            | NodeKind::TableHeaderRows
            | NodeKind::TableRowGroup
            | NodeKind::TableRow
            | NodeKind::TableCell => self.inline_children(id, cur),
            NodeKind::Comment
            | NodeKind::Ignored
            | NodeKind::SoftPageBreak
            | NodeKind::BookmarkEnd
            | NodeKind::ReferenceMarkEnd
            | NodeKind::IndexMarkEnd
            | NodeKind::NoteCitation
            | NodeKind::NoteBody
            | NodeKind::IndexSource
            | NodeKind::IndexSourceStyles
            | NodeKind::IndexSourceStyle
            | NodeKind::TableColumn
            | NodeKind::TableColumnGroup
            | NodeKind::CoveredTableCell
            | NodeKind::SvgTitle
            | NodeKind::SvgDesc => {}
        }
    }

    fn span(&mut self, id: SourceId, cur: Cursor) {
        let style = self.source.attr(id, "text:style-name");
        let info = self.cascade.resolve(StyleFamily::Text, style, true);
        if info.is_empty() {
            self.inline_children(id, cur);
            return;
        }
        let node = self.element(cur, info.tag.as_deref().unwrap_or("span"));
        self.apply(cur.unit, node, &info);
        self.inline_children(id, cur.at(node));
    }

    fn link(&mut self, id: SourceId, cur: Cursor) {
        let source = self.source;
        let node = self.element(cur, "a");
        let info = self
            .cascade
            .resolve(StyleFamily::Text, source.attr(id, "text:style-name"), true);
        self.apply(cur.unit, node, &info);

        match OdfHref::parse(source.attr(id, "xlink:href").unwrap_or("")) {
            OdfHref::External(href) => {
                if !href.is_empty() {
                    self.set_attr(cur.unit, node, "href", &href);
                }
            }
            OdfHref::Internal { name, kind } => {
                let target = match kind.as_deref() {
                    Some("outline") => format!("outline:{}", name),
                    _ => sanitize_id(&name),
                };
                self.resolver.register_link(cur.unit, node, &target, false);
            }
        }
        self.inline_children(id, cur.at(node));
    }

    /// Bookmark, reference, sequence and note references.
    ///
    /// A `page` reference shows the number of the unit holding its target;
    /// every other format keeps the text the source application computed.
    fn reference(&mut self, id: SourceId, cur: Cursor) {
        let source = self.source;
        let Some(name) = source.attr(id, "text:ref-name") else {
            self.inline_children(id, cur);
            return;
        };
        let target = match source.kind(id) {
            NodeKind::NoteRef => note_target(name),
            _ => sanitize_id(name),
        };
        let node = self.element_with(cur, "a", &[("class", "reference")]);
        if source.attr(id, "text:reference-format") == Some("page") {
            self.resolver.register_link(cur.unit, node, &target, true);
        } else {
            self.resolver.register_link(cur.unit, node, &target, false);
            self.inline_children(id, cur.at(node));
        }
    }

    fn annotation(&mut self, id: SourceId, cur: Cursor) {
        if !self.config.include_annotations {
            return;
        }
        let source = self.source;
        let mut text = String::new();
        for child in source.children(id) {
            let line = match source.name(child) {
                "dc:creator" => format!("{}:", source.text_content(child).trim()),
                "dc:date" => continue,
                _ => source.text_content(child).trim().to_string(),
            };
            if line.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&line);
        }
        if !text.is_empty() {
            self.tree(cur.unit).comment(cur.node, &text);
        }
    }

    /// Text of an index mark: its string value, or the text up to the
    /// matching end mark.
    fn mark_text(&self, id: SourceId) -> String {
        let source = self.source;
        if let Some(value) = source.attr(id, "text:string-value") {
            return value.to_string();
        }
        let Some(mark_id) = source.attr(id, "text:id") else {
            return String::new();
        };
        let mut out = String::new();
        let mut next = source.node(id).and_then(|n| n.next_sibling);
        while let Some(n) = next {
            if source.kind(n) == NodeKind::IndexMarkEnd && source.attr(n, "text:id") == Some(mark_id)
            {
                break;
            }
            out.push_str(&source.text_content(n));
            next = source.node(n).and_then(|n| n.next_sibling);
        }
        out
    }

    fn index_mark(&mut self, id: SourceId, cur: Cursor) {
        let source = self.source;
        let kind = source.kind(id);
        let enabled = match kind {
            NodeKind::TocMark => self.config.include_toc,
            NodeKind::AlphabeticalIndexMark => self.config.include_alphabetical_index,
            _ => self.config.include_user_index,
        };
        let text = self.mark_text(id);
        let text = text.trim();
        if !enabled || text.is_empty() {
            return;
        }
        let level = source
            .attr_u32(id, "text:outline-level")
            .unwrap_or(1)
            .clamp(1, u32::from(MAX_LEVEL)) as u8;
        let non_empty = |name: &str| {
            source
                .attr(id, name)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let entry_kind = match kind {
            NodeKind::TocMark => EntryKind::TocMark { level },
            NodeKind::AlphabeticalIndexMark => EntryKind::IndexMark {
                index: MarkIndex::Alphabetical,
                level: 1,
                key1: non_empty("text:key1"),
                key2: non_empty("text:key2"),
                main: source.attr_flag(id, "text:main-entry"),
            },
            _ => EntryKind::IndexMark {
                index: MarkIndex::User(source.attr(id, "text:index-name").unwrap_or("").to_string()),
                level,
                key1: None,
                key2: None,
                main: false,
            },
        };

        let target = self.indexes.next_target("idx");
        let a = self.element(cur, "a");
        self.anchor(cur.unit, a, &target);
        let entry =
            IndexEntry::new(id, cur.unit, &target, text, entry_kind).with_chapter(self.chapter);
        self.indexes.add_entry(entry);
    }

    fn bibliography_mark(&mut self, id: SourceId, cur: Cursor) {
        let source = self.source;
        let span = self.element_with(cur, "span", &[("class", "citation")]);
        self.inline_children(id, cur.at(span));
        if !self.config.include_bibliography {
            return;
        }

        let identifier = source
            .attr(id, "text:identifier")
            .map(str::to_string)
            .unwrap_or_else(|| source.text_content(id).trim().to_string());
        let fields: Vec<(String, String)> = source
            .node(id)
            .map(|n| {
                n.attrs
                    .iter()
                    .filter(|(k, _)| k != "text:identifier")
                    .filter_map(|(k, v)| {
                        k.strip_prefix("text:")
                            .map(|name| (name.to_string(), v.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let target = self.indexes.next_target("bib");
        self.anchor(cur.unit, span, &target);
        let text = source.text_content(id);
        let entry = IndexEntry::new(
            id,
            cur.unit,
            &target,
            text.trim(),
            EntryKind::BibliographyKey { identifier, fields },
        )
        .with_chapter(self.chapter);
        self.indexes.add_entry(entry);
    }
}

/// Link target id of a note body.
pub(super) fn note_target(name: &str) -> String {
    format!("note-{}", sanitize_id(name))
}
