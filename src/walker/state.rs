//! Run state shared by every part of the walk.

use std::collections::HashSet;

use super::notes::NoteBuffer;
use crate::config::ConversionConfig;
use crate::dom::{NodeId, OutputTree};
use crate::index::IndexCollector;
use crate::links::ReferenceResolver;
use crate::list::ListCounterEngine;
use crate::resources::ResourceProvider;
use crate::source::{SourceTree, StyleLookup};
use crate::split::{BlockEvent, Cursor, OutputSplitter, UnitNaming};
use crate::style::{PageBreak, StyleCascade, StyleInfo};

/// An open list during traversal.
#[derive(Debug, Clone)]
pub(super) struct ListContext {
    /// List style the items are numbered with.
    pub style: Option<String>,
    pub level: u8,
}

/// Everything one conversion run owns.
///
/// Components only see their own part: the cascade never touches units, the
/// splitter never resolves styles.
pub(super) struct RunState<'a> {
    pub source: &'a SourceTree,
    pub config: &'a ConversionConfig,
    pub resources: &'a dyn ResourceProvider,
    pub cascade: StyleCascade<'a>,
    pub counters: ListCounterEngine<'a>,
    pub splitter: OutputSplitter<'a>,
    pub resolver: ReferenceResolver,
    pub indexes: IndexCollector,
    pub notes: NoteBuffer,
    /// Level-1 headings seen so far.
    pub chapter: u32,
    pub lists: Vec<ListContext>,
    /// `text:list-id`s of numbered paragraphs already started.
    pub numbered_lists: HashSet<String>,
}

impl<'a> RunState<'a> {
    pub fn new(
        source: &'a SourceTree,
        styles: &'a dyn StyleLookup,
        config: &'a ConversionConfig,
        resources: &'a dyn ResourceProvider,
    ) -> Self {
        let mut indexes = IndexCollector::new();
        indexes.scan_source_styles(source);
        Self {
            source,
            config,
            resources,
            cascade: StyleCascade::new(styles, config),
            counters: ListCounterEngine::new(styles),
            splitter: OutputSplitter::new(config),
            resolver: ReferenceResolver::new(UnitNaming::new(
                &config.base_name,
                &config.extension,
            )),
            indexes,
            notes: NoteBuffer::default(),
            chapter: 0,
            lists: Vec::new(),
            numbered_lists: HashSet::new(),
        }
    }

    pub fn tree(&mut self, unit: usize) -> &mut OutputTree {
        &mut self.splitter.unit_mut(unit).tree
    }

    pub fn element(&mut self, cur: Cursor, tag: &str) -> NodeId {
        self.tree(cur.unit).element(cur.node, tag)
    }

    pub fn element_with(&mut self, cur: Cursor, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        self.tree(cur.unit).element_with(cur.node, tag, attrs)
    }

    pub fn set_attr(&mut self, unit: usize, node: NodeId, name: &str, value: &str) {
        self.tree(unit).set_attr(node, name, value);
    }

    /// Write visible text and count it towards the size threshold.
    pub fn write_text(&mut self, cur: Cursor, text: &str) {
        if text.is_empty() {
            return;
        }
        self.tree(cur.unit).text(cur.node, text);
        self.splitter.add_chars(text.chars().count());
    }

    pub fn apply(&mut self, unit: usize, node: NodeId, info: &StyleInfo) {
        info.apply(self.tree(unit), node);
    }

    /// Give `node` the id `id` and make it a link target.
    pub fn anchor(&mut self, unit: usize, node: NodeId, id: &str) {
        self.set_attr(unit, node, "id", id);
        self.resolver.register_target(id, unit);
    }

    /// Ask the splitter about a block and start a new unit when told to.
    ///
    /// Buffered footnotes are written into the closing unit first.
    pub fn begin_block(&mut self, cur: Cursor, event: &BlockEvent) -> Cursor {
        match self.splitter.decide(event) {
            Some(reason) => {
                log::debug!("new output unit: {:?}", reason);
                self.flush_footnotes();
                self.splitter.split(event.heading_level)
            }
            None => cur,
        }
    }

    /// Account for a written block and remember a break-after request.
    pub fn finish_block(&mut self, heading_level: Option<u8>, page_break: &PageBreak) {
        self.splitter.block_emitted(heading_level);
        if let Some(origin) = page_break.after {
            self.splitter.request_break_after(origin);
        }
    }
}
