//! Lists, list items and numbered paragraphs.

use super::state::{ListContext, RunState};
use crate::config::ListFormatting;
use crate::list::{LabelKind, ListLabel, MAX_LEVEL};
use crate::source::{LevelKind, NodeKind, NumFormat, SourceId, SourceTree};
use crate::split::{BlockEvent, Cursor};
use crate::style::PageBreak;

/// CSS `list-style-type` for a numbering format.
fn list_style_type(format: NumFormat) -> &'static str {
    match format {
        NumFormat::Arabic => "decimal",
        NumFormat::LowerRoman => "lower-roman",
        NumFormat::UpperRoman => "upper-roman",
        NumFormat::LowerAlpha => "lower-alpha",
        NumFormat::UpperAlpha => "upper-alpha",
        NumFormat::None => "none",
    }
}

/// Whether every item of a list holds only headings (or nested lists of them).
fn is_fake_list(source: &SourceTree, list: SourceId) -> bool {
    let mut items = 0;
    for item in source.children(list) {
        match source.kind(item) {
            NodeKind::ListItem | NodeKind::ListHeader => items += 1,
            NodeKind::Text | NodeKind::Comment => continue,
            _ => return false,
        }
        let mut blocks = 0;
        for child in source.children(item) {
            match source.kind(child) {
                NodeKind::Heading => blocks += 1,
                NodeKind::List if is_fake_list(source, child) => blocks += 1,
                NodeKind::Text | NodeKind::Comment => {}
                _ => return false,
            }
        }
        if blocks == 0 {
            return false;
        }
    }
    items > 0
}

/// First child that is not whitespace or a comment.
fn first_content(source: &SourceTree, parent: SourceId) -> Option<SourceId> {
    source
        .children(parent)
        .find(|&c| !matches!(source.kind(c), NodeKind::Text | NodeKind::Comment))
}

impl RunState<'_> {
    /// A `text:list`.
    ///
    /// Top-level lists may be split between items; the continuation in the
    /// new unit gets a fresh list element carrying the next item's number.
    pub(super) fn list(&mut self, id: SourceId, cur: Cursor) -> Cursor {
        let source = self.source;
        if is_fake_list(source, id) {
            log::trace!("list of headings rendered as headings");
            let mut cur = cur;
            for item in source.children(id) {
                cur = self.walk_children(item, cur);
            }
            return cur;
        }

        let parent = self.lists.last().cloned();
        let level = parent.as_ref().map_or(1, |p| (p.level + 1).min(MAX_LEVEL));
        let style = source
            .attr(id, "text:style-name")
            .map(str::to_string)
            .or_else(|| parent.and_then(|p| p.style));
        let top_level = level == 1;

        let mut cur = if top_level {
            self.begin_block(cur, &BlockEvent::default())
        } else {
            cur
        };

        if let Some(style) = &style {
            if top_level {
                let continues = source.attr_flag(id, "text:continue-numbering")
                    || source.attr(id, "text:continue-list").is_some();
                if self.counters.begin_list(style, continues) {
                    log::trace!("list style {:?} restarts", style);
                }
            }
            if self.splitter.note_list(style) {
                log::trace!("list style {:?} first used in unit {}", style, cur.unit);
            }
        }

        let lookup = self.cascade.lookup();
        let level_style = style
            .as_deref()
            .and_then(|s| lookup.list_style(s))
            .and_then(|s| s.level(level));
        let ordered = level_style.is_some_and(|l| l.is_numbered());
        let hard_labels = self.config.list_formatting == ListFormatting::HardLabels;
        let tag = if ordered && !hard_labels { "ol" } else { "ul" };
        let css_type = match level_style {
            Some(_) if hard_labels => Some("list-style-type: none".to_string()),
            Some(l) => match l.kind {
                LevelKind::Number { format, .. } => {
                    Some(format!("list-style-type: {}", list_style_type(format)))
                }
                _ => None,
            },
            None => None,
        };

        let new_list = |state: &mut Self, cur: Cursor| {
            let node = state.element(cur, tag);
            if let Some(css) = &css_type {
                state.set_attr(cur.unit, node, "style", css);
            }
            node
        };
        let mut node = new_list(self, cur);
        let mut first_in_element = true;

        self.lists.push(ListContext {
            style: style.clone(),
            level,
        });
        let mut first_item = true;
        for item in source.children(id) {
            if !matches!(source.kind(item), NodeKind::ListItem | NodeKind::ListHeader) {
                continue;
            }
            if top_level && !first_item {
                let next = self.begin_block(cur, &BlockEvent::default());
                if next.unit != cur.unit {
                    cur = next;
                    node = new_list(self, cur);
                    first_in_element = true;
                }
            }
            first_item = false;

            let value = self.list_item(item, cur.at(node));
            if first_in_element {
                if ordered
                    && !hard_labels
                    && let Some(value) = value
                    && value != 1
                {
                    self.set_attr(cur.unit, node, "start", &value.to_string());
                }
                first_in_element = false;
            }
            if top_level {
                self.finish_block(None, &PageBreak::default());
            }
        }
        self.lists.pop();
        cur
    }

    /// A list item; returns the counter value it was numbered with.
    fn list_item(&mut self, id: SourceId, cur: Cursor) -> Option<u32> {
        let source = self.source;
        let header = source.kind(id) == NodeKind::ListHeader;
        let context = self.lists.last().cloned();
        let level = context.as_ref().map_or(1, |c| c.level);

        self.splitter.enter_atomic();
        let li = self.element(cur, "li");
        if header {
            self.set_attr(cur.unit, li, "class", "list-header");
            self.set_attr(cur.unit, li, "style", "list-style-type: none");
        }

        let mut label = None;
        if let Some(style) = context.and_then(|c| c.style) {
            if let Some(start) = source.attr_u32(id, "text:start-value") {
                self.counters
                    .restart(&style, level, Some(start.saturating_sub(1)));
            }
            let nested_only = first_content(source, id)
                .is_some_and(|c| source.kind(c) == NodeKind::List);
            if !header && !nested_only {
                label = self.counters.step(&style, level);
            }
        }
        let value = label.as_ref().map(|l| l.value);

        let mut pending = label.filter(|_| self.config.list_formatting == ListFormatting::HardLabels);
        let mut inner = cur.at(li);
        for child in source.children(id) {
            inner = match source.kind(child) {
                NodeKind::Paragraph if pending.is_some() => {
                    self.paragraph(child, inner, pending.take())
                }
                _ => self.block(child, inner),
            };
        }
        if let Some(label) = pending {
            self.list_label(cur.at(li), &label);
        }

        self.splitter.leave_atomic();
        value
    }

    /// Write an explicit list label at the start of `cur`.
    pub(super) fn list_label(&mut self, cur: Cursor, label: &ListLabel) {
        match &label.kind {
            LabelKind::Empty => {}
            LabelKind::Image(href) => {
                let src = self
                    .resources
                    .image(Some(href), None)
                    .map_or_else(|| href.clone(), |image| image.file_name);
                self.element_with(
                    cur,
                    "img",
                    &[("class", "list-label"), ("src", &src), ("alt", "")],
                );
            }
            LabelKind::Number | LabelKind::Bullet(_) => {
                if label.text.is_empty() {
                    return;
                }
                let span = self.element_with(cur, "span", &[("class", "list-label")]);
                self.write_text(cur.at(span), &format!("{} ", label.text));
            }
        }
    }

    /// A `text:numbered-paragraph`: one paragraph with an explicit label.
    pub(super) fn numbered_paragraph(&mut self, id: SourceId, cur: Cursor) -> Cursor {
        let source = self.source;
        let Some(paragraph) = source
            .children(id)
            .find(|&c| matches!(source.kind(c), NodeKind::Paragraph | NodeKind::Heading))
        else {
            return cur;
        };
        if source.kind(paragraph) == NodeKind::Heading {
            return self.heading(paragraph, cur);
        }

        let level = source
            .attr_u32(id, "text:level")
            .unwrap_or(1)
            .clamp(1, u32::from(MAX_LEVEL)) as u8;
        let style = source.attr(id, "text:style-name").or_else(|| {
            self.cascade
                .paragraph_list_style(source.attr(paragraph, "text:style-name"))
        });

        let mut label = None;
        if let Some(style) = style {
            if let Some(list_id) = source.attr(id, "text:list-id")
                && self.numbered_lists.insert(list_id.to_string())
            {
                let continues = source.attr_flag(id, "text:continue-numbering");
                self.counters.begin_list(style, continues);
            }
            if let Some(start) = source.attr_u32(id, "text:start-value") {
                self.counters
                    .restart(style, level, Some(start.saturating_sub(1)));
            }
            label = self.counters.step(style, level);
        }
        self.paragraph(paragraph, cur, label)
    }
}
