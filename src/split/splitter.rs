//! Output splitting policy.
//!
//! The splitter owns the ordered list of output units. At every block-level
//! content event the walker asks [`OutputSplitter::decide`] whether a new
//! unit must begin; [`OutputSplitter::split`] then closes the current unit,
//! creates the next one and replays the open section wrappers into it.

use std::collections::HashSet;

use super::unit::{Cursor, OutputUnit};
use crate::config::{ConversionConfig, OutputMode, PageBreakSplit};
use crate::dom::NodeId;
use crate::style::{BreakOrigin, PageBreak};

/// Why a new unit was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitReason {
    /// A previous block asked for a break after itself.
    PendingBreak,
    /// The block asks for a page break before itself.
    BreakBefore,
    /// The block switches to another master page.
    MasterPage,
    /// A soft page break recorded by the source application.
    SoftPageBreak,
    /// The unit exceeded the character threshold.
    CharThreshold,
    /// A heading at or above the split level.
    Heading,
}

/// Facts about one block-level content event.
#[derive(Debug, Clone, Default)]
pub struct BlockEvent {
    /// Outline level when the block is a heading.
    pub heading_level: Option<u8>,
    pub page_break: PageBreak,
    /// The event is a `text:soft-page-break`.
    pub soft_page_break: bool,
}

impl BlockEvent {
    pub fn heading(level: u8) -> Self {
        Self {
            heading_level: Some(level),
            ..Self::default()
        }
    }

    pub fn with_page_break(mut self, page_break: PageBreak) -> Self {
        self.page_break = page_break;
        self
    }
}

/// A structural wrapper replayed into every new unit while it is open.
#[derive(Debug, Clone)]
pub struct OpenSection {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    /// The wrapper's node in the current unit.
    pub node: NodeId,
}

/// Most recent heading at one outline level, for repetition.
#[derive(Debug, Clone, Copy)]
struct HeadingRecord {
    unit: usize,
    node: NodeId,
}

/// Owns the output units and decides where they begin.
pub struct OutputSplitter<'a> {
    config: &'a ConversionConfig,
    units: Vec<OutputUnit>,
    sections: Vec<OpenSection>,
    dont_split: u32,
    chars_since_split: usize,
    lists_in_unit: HashSet<String>,
    pending_break: bool,
    /// A master-page change seen inside an atomic region.
    pending_master: bool,
    master_page: Option<String>,
    headings: Vec<Option<HeadingRecord>>,
    /// Blocks emitted into the current unit.
    blocks_in_unit: usize,
    /// Level of the heading that opened the current unit, if any.
    opening_heading: Option<u8>,
}

impl<'a> OutputSplitter<'a> {
    /// Create the splitter with unit 0 already open.
    pub fn new(config: &'a ConversionConfig) -> Self {
        Self {
            config,
            units: vec![OutputUnit::new(0, &config.template)],
            sections: Vec::new(),
            dont_split: 0,
            chars_since_split: 0,
            lists_in_unit: HashSet::new(),
            pending_break: false,
            pending_master: false,
            master_page: None,
            headings: Vec::new(),
            blocks_in_unit: 0,
            opening_heading: None,
        }
    }

    /// Insertion point at the start of the run.
    pub fn start(&self) -> Cursor {
        Cursor::new(0, self.units[0].content)
    }

    pub fn units(&self) -> &[OutputUnit] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> &OutputUnit {
        &self.units[index]
    }

    pub fn unit_mut(&mut self, index: usize) -> &mut OutputUnit {
        &mut self.units[index]
    }

    /// Index of the unit currently written.
    pub fn current(&self) -> usize {
        self.units.len() - 1
    }

    pub fn into_units(self) -> Vec<OutputUnit> {
        self.units
    }

    /// Whether splitting is currently suppressed.
    pub fn in_atomic(&self) -> bool {
        self.dont_split > 0
    }

    /// Enter an indivisible structure (table, multi-column section, list item).
    pub fn enter_atomic(&mut self) {
        self.dont_split += 1;
    }

    pub fn leave_atomic(&mut self) {
        self.dont_split = self.dont_split.saturating_sub(1);
    }

    /// Whether the current unit has received any block.
    pub fn unit_has_content(&self) -> bool {
        self.blocks_in_unit > 0
    }

    /// Decide whether the block described by `event` starts a new unit.
    pub fn decide(&mut self, event: &BlockEvent) -> Option<SplitReason> {
        let policy = self.config.page_break_split;
        let has_content = self.unit_has_content();

        if let Some((master, origin)) = &event.page_break.master_page {
            let changed = self.master_page.as_deref() != Some(master.as_str());
            self.master_page = Some(master.clone());
            if changed && self.accepts(*origin) && has_content {
                if self.in_atomic() {
                    self.pending_master = true;
                } else {
                    log::trace!("split before master page {:?}", master);
                    self.pending_break = false;
                    self.pending_master = false;
                    return Some(SplitReason::MasterPage);
                }
            }
        }

        if self.in_atomic() {
            return None;
        }

        if self.pending_master {
            self.pending_master = false;
            self.pending_break = false;
            if has_content {
                log::trace!("split after master page change in atomic region");
                return Some(SplitReason::MasterPage);
            }
        }

        if self.pending_break {
            self.pending_break = false;
            if has_content {
                log::trace!("split after pending page break");
                return Some(SplitReason::PendingBreak);
            }
        }

        if let Some(origin) = event.page_break.before
            && self.accepts(origin)
            && has_content
        {
            log::trace!("split before page break");
            return Some(SplitReason::BreakBefore);
        }

        if event.soft_page_break && policy == PageBreakSplit::All && has_content {
            log::trace!("split at soft page break");
            return Some(SplitReason::SoftPageBreak);
        }

        if let Some(threshold) = self.config.effective_char_threshold()
            && self.chars_since_split > threshold
            && has_content
        {
            log::trace!("split after {} characters", self.chars_since_split);
            return Some(SplitReason::CharThreshold);
        }

        if let Some(level) = event.heading_level
            && self.config.split_level > 0
            && level <= self.config.split_level
            && has_content
            && !self.suppressed_by_opening_heading(level)
        {
            log::trace!("split at heading level {}", level);
            return Some(SplitReason::Heading);
        }

        None
    }

    fn accepts(&self, origin: BreakOrigin) -> bool {
        match self.config.page_break_split {
            PageBreakSplit::None => false,
            PageBreakSplit::Styles => origin == BreakOrigin::Named,
            PageBreakSplit::Explicit | PageBreakSplit::All => true,
        }
    }

    /// A heading directly below the unit's opening heading stays with it.
    fn suppressed_by_opening_heading(&self, level: u8) -> bool {
        if self.config.output == OutputMode::Epub || self.blocks_in_unit != 1 {
            return false;
        }
        let window = self.config.repeat_levels.max(1);
        match self.opening_heading {
            Some(opening) => level > opening && level - opening <= window,
            None => false,
        }
    }

    /// Remember a break-after request; dropped inside atomic regions.
    pub fn request_break_after(&mut self, origin: BreakOrigin) {
        if self.accepts(origin) && !self.in_atomic() {
            self.pending_break = true;
        }
    }

    /// Account for a block written into the current unit.
    pub fn block_emitted(&mut self, heading_level: Option<u8>) {
        if self.blocks_in_unit == 0 {
            self.opening_heading = heading_level;
        }
        self.blocks_in_unit += 1;
    }

    /// Account for visible characters written into the current unit.
    pub fn add_chars(&mut self, count: usize) {
        self.chars_since_split += count;
        let current = self.current();
        self.units[current].char_count += count;
    }

    /// Record that a list of `style` is used in the current unit.
    ///
    /// Returns `true` on the first use in this unit.
    pub fn note_list(&mut self, style: &str) -> bool {
        self.lists_in_unit.insert(style.to_string())
    }

    /// Record the latest heading at `level`; deeper records are forgotten.
    ///
    /// `title` is the heading's own text, without outline labels or note
    /// citations; the first non-empty one names the unit.
    pub fn record_heading(&mut self, level: u8, unit: usize, node: NodeId, title: &str) {
        let idx = level as usize - 1;
        if self.headings.len() <= idx {
            self.headings.resize(idx + 1, None);
        }
        self.headings[idx] = Some(HeadingRecord { unit, node });
        self.headings.truncate(idx + 1);

        let title = title.trim();
        if self.units[unit].title.is_none() && !title.is_empty() {
            self.units[unit].title = Some(title.to_string());
        }
    }

    /// Push an open section wrapper (already created at `node`).
    pub fn open_section(&mut self, tag: &str, attrs: Vec<(String, String)>, node: NodeId) {
        self.sections.push(OpenSection {
            tag: tag.to_string(),
            attrs,
            node,
        });
    }

    /// Pop the innermost section and return the insertion point after it.
    pub fn close_section(&mut self) -> Option<Cursor> {
        let section = self.sections.pop()?;
        let unit = self.current();
        let parent = self.units[unit]
            .tree
            .parent(section.node)
            .unwrap_or(self.units[unit].content);
        Some(Cursor::new(unit, parent))
    }

    /// Close the current unit and open the next one.
    ///
    /// Anything that belongs at the end of the closing unit (buffered
    /// footnotes) must be written before calling this. Returns the innermost
    /// replayed section wrapper, or the new unit's content container.
    pub fn split(&mut self, heading_level: Option<u8>) -> Cursor {
        self.chars_since_split = 0;
        self.lists_in_unit.clear();
        self.pending_break = false;
        self.pending_master = false;
        self.blocks_in_unit = 0;
        self.opening_heading = None;

        let index = self.units.len();
        let mut unit = OutputUnit::new(index, &self.config.template);
        unit.outline_level = heading_level;
        self.units.push(unit);

        if let Some(level) = heading_level {
            self.repeat_headings(level, index);
        }

        let mut insertion = self.units[index].content;
        for section in &mut self.sections {
            let tree = &mut self.units[index].tree;
            let node = tree.element(insertion, &section.tag);
            for (k, v) in &section.attrs {
                if k != "id" {
                    tree.set_attr(node, k, v);
                }
            }
            section.node = node;
            insertion = node;
        }

        log::debug!("started output unit {}", index);
        Cursor::new(index, insertion)
    }

    /// Clone the recorded headings above `level` into unit `index`.
    fn repeat_headings(&mut self, level: u8, index: usize) {
        let repeat = self.config.repeat_levels;
        if repeat == 0 || level <= 1 {
            return;
        }
        let first = level.saturating_sub(repeat).max(1);
        let records: Vec<HeadingRecord> = (first..level)
            .filter_map(|l| self.headings.get(l as usize - 1).copied().flatten())
            .collect();

        let (before, after) = self.units.split_at_mut(index);
        let target = &mut after[0];
        for record in records {
            if let Some(source) = before.get(record.unit) {
                target
                    .tree
                    .import_subtree(target.content, &source.tree, record.node, true);
            }
        }
    }
}
