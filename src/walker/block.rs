//! Block-level traversal: paragraphs, headings, sections and indexes.

use super::state::RunState;
use crate::index::{EntryKind, IndexData, IndexEntry, IndexSpec};
use crate::list::{ListLabel, MAX_LEVEL};
use crate::source::{NodeKind, SourceId, StyleFamily};
use crate::split::{BlockEvent, Cursor};
use crate::style::PageBreak;
use crate::util::sanitize_id;

impl RunState<'_> {
    /// Walk the children of `parent` as blocks.
    pub(super) fn walk_children(&mut self, parent: SourceId, mut cur: Cursor) -> Cursor {
        let source = self.source;
        for child in source.children(parent) {
            cur = self.block(child, cur);
        }
        cur
    }

    /// Convert one block and return the insertion point for the next one.
    pub(super) fn block(&mut self, id: SourceId, cur: Cursor) -> Cursor {
        let source = self.source;
        match source.kind(id) {
            NodeKind::Paragraph => self.paragraph(id, cur, None),
            NodeKind::Heading => self.heading(id, cur),
            NodeKind::List => self.list(id, cur),
            NodeKind::NumberedParagraph => self.numbered_paragraph(id, cur),
            NodeKind::Table => self.table(id, cur),
            NodeKind::Section => self.section(id, cur),
            NodeKind::SoftPageBreak => self.begin_block(
                cur,
                &BlockEvent {
                    soft_page_break: true,
                    ..BlockEvent::default()
                },
            ),
            NodeKind::TableOfContent
            | NodeKind::AlphabeticalIndex
            | NodeKind::UserIndex
            | NodeKind::Bibliography => self.index(id, cur),
            NodeKind::OtherIndex => self.static_index(id, cur),
            NodeKind::IndexBody | NodeKind::IndexTitle | NodeKind::Body | NodeKind::Unknown => {
                self.walk_children(id, cur)
            }
            NodeKind::Text => {
                let text = source.node(id).map_or("", |n| n.text.as_str());
                if !text.trim().is_empty() {
                    log::debug!("text outside a paragraph: {:?}", text);
                    let p = self.element(cur, "p");
                    self.write_text(cur.at(p), text);
                }
                cur
            }
            NodeKind::Comment
            | NodeKind::Ignored
            | NodeKind::IndexSource
            | NodeKind::IndexSourceStyles
            | NodeKind::IndexSourceStyle => cur,
            _ => {
                // Inline content anchored at block level (page-anchored frames)
                let div = self.element(cur, "div");
                self.inline(id, cur.at(div));
                cur
            }
        }
    }

    /// A paragraph, optionally prefixed with a list label.
    pub(super) fn paragraph(
        &mut self,
        id: SourceId,
        cur: Cursor,
        label: Option<ListLabel>,
    ) -> Cursor {
        let source = self.source;
        let style = source.attr(id, "text:style-name");
        let page_break = self.cascade.page_break(StyleFamily::Paragraph, style);
        let cur = self.begin_block(cur, &BlockEvent::default().with_page_break(page_break.clone()));

        let info = self.cascade.resolve(StyleFamily::Paragraph, style, true);
        let node = self.element(cur, info.tag.as_deref().unwrap_or("p"));
        self.apply(cur.unit, node, &info);

        if let Some(style) = style
            && let Some(named) = self.cascade.paragraph_named_style(style)
            && self.indexes.lists_source_style(named)
        {
            let target = self.indexes.next_target("toc");
            self.anchor(cur.unit, node, &target);
            let entry = IndexEntry::new(
                id,
                cur.unit,
                &target,
                source.text_content(id).trim(),
                EntryKind::Paragraph {
                    style: named.to_string(),
                },
            )
            .with_chapter(self.chapter);
            self.indexes.add_entry(entry);
        }

        if let Some(label) = label {
            self.list_label(cur.at(node), &label);
        }
        self.inline_children(id, cur.at(node));
        self.finish_block(None, &page_break);
        cur
    }

    fn heading_level(&self, id: SourceId, style: Option<&str>) -> u8 {
        let explicit = self.source.attr_u32(id, "text:outline-level");
        let level = explicit
            .or_else(|| self.cascade.default_outline_level(style).map(u32::from))
            .unwrap_or(1);
        level.min(u32::from(MAX_LEVEL)) as u8
    }

    /// Outline label of a heading, honouring restarts requested on it.
    fn heading_label(&mut self, id: SourceId, level: u8) -> Option<ListLabel> {
        let source = self.source;
        if source.attr_flag(id, "text:is-list-header") {
            return None;
        }
        if source.attr_flag(id, "text:restart-numbering") {
            let start = source.attr_u32(id, "text:start-value");
            self.counters
                .restart_outline(level, start.map(|v| v.saturating_sub(1)));
        }
        Some(self.counters.step_outline(level))
    }

    pub(super) fn heading(&mut self, id: SourceId, cur: Cursor) -> Cursor {
        let source = self.source;
        let style = source.attr(id, "text:style-name");
        let level = self.heading_level(id, style);
        if level == 0 {
            return self.paragraph(id, cur, None);
        }

        let page_break = self.cascade.page_break(StyleFamily::Paragraph, style);
        let cur = self.begin_block(
            cur,
            &BlockEvent::heading(level).with_page_break(page_break.clone()),
        );
        let label = self
            .heading_label(id, level)
            .filter(|l| l.is_numbered() && !l.text.is_empty());
        if level == 1 {
            self.chapter += 1;
        }

        let html_level = level.min(6);
        let info = self.cascade.resolve_heading(html_level, style);
        let tag = info
            .tag
            .clone()
            .unwrap_or_else(|| format!("h{}", html_level));
        let node = self.element(cur, &tag);
        self.apply(cur.unit, node, &info);
        let target = self.indexes.next_target("toc");
        self.anchor(cur.unit, node, &target);

        if let Some(label) = &label {
            let span = self.element_with(cur.at(node), "span", &[("class", "heading-number")]);
            self.write_text(cur.at(span), &format!("{} ", label.text));
        }
        self.inline_children(id, cur.at(node));

        let text = source.text_content(id);
        let text = text.trim();
        let label_text = label.map(|l| l.text);
        self.resolver.register_alias(
            &format!("outline:{}{}", label_text.as_deref().unwrap_or(""), text),
            &target,
        );
        let entry = IndexEntry::new(id, cur.unit, &target, text, EntryKind::Heading { level })
            .with_chapter(self.chapter)
            .with_label(label_text);
        self.indexes.add_entry(entry);

        self.splitter.record_heading(level, cur.unit, node, text);
        self.finish_block(Some(level), &page_break);
        cur
    }

    /// A section: replayed into new units, or atomic when it has columns.
    fn section(&mut self, id: SourceId, cur: Cursor) -> Cursor {
        let source = self.source;
        let style = source.attr(id, "text:style-name");
        let cur = self.begin_block(cur, &BlockEvent::default());

        let info = self.cascade.resolve(StyleFamily::Section, style, true);
        let tag = info.tag.clone().unwrap_or_else(|| "div".to_string());
        let node = self.element(cur, &tag);
        self.apply(cur.unit, node, &info);
        if let Some(name) = source.attr(id, "text:name") {
            self.anchor(cur.unit, node, &sanitize_id(name));
        }

        if self.cascade.section_columns(style) > 1 {
            self.splitter.enter_atomic();
            self.walk_children(id, cur.at(node));
            self.splitter.leave_atomic();
            self.finish_block(None, &PageBreak::default());
            return cur;
        }

        let tree = self.tree(cur.unit);
        let attrs: Vec<(String, String)> = ["class", "style", "xml:lang", "dir"]
            .iter()
            .filter_map(|k| tree.attr(node, k).map(|v| (k.to_string(), v.to_string())))
            .collect();
        self.splitter.open_section(&tag, attrs, node);
        let inner = self.walk_children(id, cur.at(node));
        self.splitter.close_section().unwrap_or(inner)
    }

    fn index_enabled(&self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::TableOfContent => self.config.include_toc,
            NodeKind::AlphabeticalIndex => self.config.include_alphabetical_index,
            NodeKind::UserIndex => self.config.include_user_index,
            NodeKind::Bibliography => self.config.include_bibliography,
            _ => false,
        }
    }

    /// Reserve a container for a generated index.
    fn index(&mut self, id: SourceId, cur: Cursor) -> Cursor {
        let source = self.source;
        let spec = match IndexSpec::read(source, id) {
            Some(spec) if self.index_enabled(source.kind(id)) => spec,
            _ => return self.static_index(id, cur),
        };
        let cur = self.begin_block(cur, &BlockEvent::default());
        self.splitter.enter_atomic();

        let info = self.cascade.resolve(
            StyleFamily::Section,
            source.attr(id, "text:style-name"),
            true,
        );
        let container = self.element_with(cur, "div", &[("class", spec.class())]);
        self.apply(cur.unit, container, &info);
        if let Some(name) = source.attr(id, "text:name") {
            self.anchor(cur.unit, container, &sanitize_id(name));
        }
        if let Some(body) = source.child_of_kind(id, NodeKind::IndexBody)
            && let Some(title) = source.child_of_kind(body, NodeKind::IndexTitle)
        {
            self.walk_children(title, cur.at(container));
        }
        let entries = self.element_with(cur.at(container), "div", &[("class", "index-entries")]);
        self.indexes.reserve(IndexData {
            spec,
            source: id,
            chapter: self.chapter,
            unit: cur.unit,
            container,
            entries,
        });

        self.splitter.leave_atomic();
        self.finish_block(None, &PageBreak::default());
        cur
    }

    /// Keep an index's precomputed body as ordinary content.
    fn static_index(&mut self, id: SourceId, cur: Cursor) -> Cursor {
        let source = self.source;
        let cur = self.begin_block(cur, &BlockEvent::default());
        self.splitter.enter_atomic();
        let container = self.element_with(cur, "div", &[("class", "index")]);
        if let Some(body) = source.child_of_kind(id, NodeKind::IndexBody) {
            self.walk_children(body, cur.at(container));
        }
        self.splitter.leave_atomic();
        self.finish_block(None, &PageBreak::default());
        cur
    }
}
