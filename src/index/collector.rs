//! Index collection during the walk and rendering after it.
//!
//! The walker reserves a container for every supported index it meets and
//! appends entry candidates in document order. Once every unit exists,
//! [`IndexCollector::render`] fills each index's entries container and
//! registers one link request per rendered entry.

use std::collections::{HashMap, HashSet};

use super::collate::{compare, compare_keys, initial};
use super::entry::{EntryKind, IndexEntry, MarkIndex};
use super::spec::IndexSpec;
use crate::dom::{NodeId, OutputTree};
use crate::links::ReferenceResolver;
use crate::source::{NodeKind, SourceId, SourceTree};
use crate::split::OutputUnit;

/// A reserved index and where its entries go.
#[derive(Debug, Clone)]
pub struct IndexData {
    pub spec: IndexSpec,
    pub source: SourceId,
    /// Chapter the index appears in.
    pub chapter: u32,
    /// Unit owning the container.
    pub unit: usize,
    pub container: NodeId,
    /// Child of `container` receiving rendered entries.
    pub entries: NodeId,
}

/// Entries and reserved indexes of one run.
#[derive(Debug, Default)]
pub struct IndexCollector {
    entries: Vec<IndexEntry>,
    indexes: Vec<IndexData>,
    /// Paragraph styles some table of contents lists.
    source_styles: HashSet<String>,
    target_counters: HashMap<&'static str, u32>,
}

impl IndexCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember every paragraph style an index lists, so matching
    /// paragraphs get anchors while they are walked.
    pub fn scan_source_styles(&mut self, tree: &SourceTree) {
        let mut stack = vec![tree.root()];
        while let Some(id) = stack.pop() {
            if tree.kind(id) == NodeKind::IndexSourceStyle
                && let Some(name) = tree.attr(id, "text:style-name")
            {
                self.source_styles.insert(name.to_string());
            }
            stack.extend(tree.children(id));
        }
    }

    pub fn lists_source_style(&self, style: &str) -> bool {
        self.source_styles.contains(style)
    }

    /// Next target id with the given prefix (`toc0`, `toc1`, ...).
    pub fn next_target(&mut self, prefix: &'static str) -> String {
        let counter = self.target_counters.entry(prefix).or_insert(0);
        let id = format!("{}{}", prefix, counter);
        *counter += 1;
        id
    }

    pub fn add_entry(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    pub fn reserve(&mut self, index: IndexData) {
        self.indexes.push(index);
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn indexes(&self) -> &[IndexData] {
        &self.indexes
    }

    /// Render every reserved index, in collection order.
    ///
    /// Each entries container is cleared first, together with the link
    /// requests of its previous lines, so rendering again yields the same
    /// markup and the same pending requests.
    pub fn render(&self, units: &mut [OutputUnit], resolver: &mut ReferenceResolver) {
        for index in &self.indexes {
            let Some(unit) = units.get_mut(index.unit) else {
                log::debug!("index in missing unit {}", index.unit);
                continue;
            };
            let stale: HashSet<NodeId> = unit.tree.descendants(index.entries).collect();
            resolver.discard_links(index.unit, &stale);
            unit.tree.clear_children(index.entries);
            let mut out = Lines {
                tree: &mut unit.tree,
                unit: index.unit,
                parent: index.entries,
                resolver: &mut *resolver,
            };
            let scoped: Vec<&IndexEntry> = self
                .entries
                .iter()
                .filter(|e| !index.spec.by_chapter() || e.chapter == index.chapter)
                .collect();
            match &index.spec {
                IndexSpec::TableOfContents { .. } => render_toc(&index.spec, &scoped, &mut out),
                IndexSpec::Alphabetical { separators, .. } => {
                    render_alphabetical(*separators, &scoped, &mut out)
                }
                IndexSpec::User {
                    name, use_marks, ..
                } => {
                    if *use_marks {
                        render_user(name, &scoped, &mut out)
                    }
                }
                IndexSpec::Bibliography { sort_by_position } => {
                    render_bibliography(*sort_by_position, &scoped, &mut out)
                }
            }
        }
    }
}

/// Writes paragraph lines into an entries container.
struct Lines<'t> {
    tree: &'t mut OutputTree,
    unit: usize,
    parent: NodeId,
    resolver: &'t mut ReferenceResolver,
}

impl Lines<'_> {
    fn plain(&mut self, class: &str, text: &str) {
        let p = self.tree.element_with(self.parent, "p", &[("class", class)]);
        self.tree.text(p, text);
    }

    fn linked(&mut self, class: &str, text: &str, target: &str) -> NodeId {
        let p = self.tree.element_with(self.parent, "p", &[("class", class)]);
        let a = self.tree.element(p, "a");
        self.tree.text(a, text);
        self.resolver.register_link(self.unit, a, target, false);
        a
    }
}

fn render_toc(spec: &IndexSpec, entries: &[&IndexEntry], out: &mut Lines<'_>) {
    let IndexSpec::TableOfContents {
        outline_level,
        use_outline_level,
        use_marks,
        ..
    } = spec
    else {
        return;
    };
    for entry in entries {
        let level = match &entry.kind {
            EntryKind::Heading { level } if *use_outline_level && level <= outline_level => *level,
            EntryKind::TocMark { level } if *use_marks && level <= outline_level => *level,
            EntryKind::Paragraph { style } => match spec.source_style_level(style) {
                Some(level) => level,
                None => continue,
            },
            _ => continue,
        };
        let text = match &entry.label {
            Some(label) => format!("{} {}", label, entry.text),
            None => entry.text.clone(),
        };
        out.linked(&format!("toc-level{}", level), &text, &entry.target);
    }
}

/// Sort keys of an alphabetical entry: key1, key2, word.
fn alphabetical_keys(entry: &IndexEntry) -> Option<[Option<&str>; 3]> {
    match &entry.kind {
        EntryKind::IndexMark {
            index: MarkIndex::Alphabetical,
            key1,
            key2,
            ..
        } => Some([key1.as_deref(), key2.as_deref(), Some(entry.text.as_str())]),
        _ => None,
    }
}

fn render_alphabetical(separators: bool, entries: &[&IndexEntry], out: &mut Lines<'_>) {
    let mut marks: Vec<(&IndexEntry, [Option<&str>; 3])> = entries
        .iter()
        .filter_map(|e| alphabetical_keys(e).map(|k| (*e, k)))
        .collect();
    marks.sort_by(|(_, a), (_, b)| compare_keys(a, b));

    let mut previous_initial: Option<String> = None;
    let mut previous_key1: Option<&str> = None;
    let mut previous_key2: Option<&str> = None;
    for (entry, [key1, key2, _]) in marks {
        if separators {
            let first = key1.unwrap_or(entry.text.as_str());
            let letter = initial(first);
            if letter.is_some() && letter != previous_initial {
                if let Some(letter) = &letter {
                    out.plain("index-separator", letter);
                }
                previous_initial = letter;
            }
        }
        if key1 != previous_key1 {
            previous_key1 = key1;
            previous_key2 = None;
            if let Some(key1) = key1 {
                out.plain("index-key1", key1);
            }
        }
        if key2 != previous_key2 {
            previous_key2 = key2;
            if let Some(key2) = key2 {
                out.plain("index-key2", key2);
            }
        }
        let depth = 1 + usize::from(key1.is_some()) + usize::from(key2.is_some());
        let a = out.linked(&format!("index-level{}", depth), &entry.text, &entry.target);
        if let EntryKind::IndexMark { main: true, .. } = entry.kind {
            out.tree.set_attr(a, "class", "index-main");
        }
    }
}

fn render_user(name: &str, entries: &[&IndexEntry], out: &mut Lines<'_>) {
    for entry in entries {
        if let EntryKind::IndexMark {
            index: MarkIndex::User(index_name),
            level,
            ..
        } = &entry.kind
            && index_name == name
        {
            out.linked(&format!("index-level{}", level), &entry.text, &entry.target);
        }
    }
}

fn render_bibliography(sort_by_position: bool, entries: &[&IndexEntry], out: &mut Lines<'_>) {
    let mut seen = HashSet::new();
    let mut keys: Vec<(&str, &IndexEntry)> = entries
        .iter()
        .filter_map(|e| match &e.kind {
            EntryKind::BibliographyKey { identifier, .. } => Some((identifier.as_str(), *e)),
            _ => None,
        })
        .filter(|(id, _)| seen.insert(*id))
        .collect();
    if !sort_by_position {
        keys.sort_by(|(a, _), (b, _)| compare(a, b));
    }
    for (identifier, entry) in keys {
        out.linked("bibliography-entry", &bibliography_line(identifier, entry), &entry.target);
    }
}

/// `[identifier] author: title, year`, skipping missing fields.
fn bibliography_line(identifier: &str, entry: &IndexEntry) -> String {
    let mut line = format!("[{}]", identifier);
    let author = entry.field("author").filter(|s| !s.is_empty());
    let title = entry.field("title").filter(|s| !s.is_empty());
    let year = entry.field("year").filter(|s| !s.is_empty());
    if let Some(author) = author {
        line.push(' ');
        line.push_str(author);
        if title.is_some() {
            line.push(':');
        }
    }
    if let Some(title) = title {
        line.push(' ');
        line.push_str(title);
    }
    if let Some(year) = year {
        if author.is_some() || title.is_some() {
            line.push(',');
        }
        line.push(' ');
        line.push_str(year);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitTemplate;
    use crate::split::UnitNaming;

    fn mark(target: &str, key1: Option<&str>, word: &str) -> IndexEntry {
        IndexEntry::new(
            SourceId(1),
            0,
            target,
            word,
            EntryKind::IndexMark {
                index: MarkIndex::Alphabetical,
                level: 1,
                key1: key1.map(str::to_string),
                key2: None,
                main: false,
            },
        )
    }

    fn reserve(collector: &mut IndexCollector, units: &mut [OutputUnit], spec: IndexSpec) {
        let content = units[0].content;
        let tree = &mut units[0].tree;
        let container = tree.element(content, "div");
        let entries = tree.element(container, "div");
        collector.reserve(IndexData {
            spec,
            source: SourceId(0),
            chapter: 0,
            unit: 0,
            container,
            entries,
        });
    }

    fn lines(unit: &OutputUnit, node: NodeId) -> Vec<String> {
        unit.tree
            .children(node)
            .map(|p| unit.tree.text_content(p))
            .collect()
    }

    #[test]
    fn test_alphabetical_groups_leading_key() {
        let mut units = vec![OutputUnit::new(0, &UnitTemplate::default())];
        let mut resolver = ReferenceResolver::new(UnitNaming::new("doc", "xhtml"));
        let mut collector = IndexCollector::new();
        collector.add_entry(mark("idx0", Some("Bank"), "River"));
        collector.add_entry(mark("idx1", Some("Bank"), "Finance"));
        reserve(
            &mut collector,
            &mut units,
            IndexSpec::Alphabetical {
                separators: false,
                by_chapter: false,
            },
        );
        collector.render(&mut units, &mut resolver);

        let entries = collector.indexes()[0].entries;
        assert_eq!(lines(&units[0], entries), ["Bank", "Finance", "River"]);
        let targets: Vec<&str> = resolver.pending().iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, ["idx1", "idx0"]);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut units = vec![OutputUnit::new(0, &UnitTemplate::default())];
        let mut resolver = ReferenceResolver::new(UnitNaming::new("doc", "xhtml"));
        let mut collector = IndexCollector::new();
        collector.add_entry(mark("idx0", None, "apple"));
        collector.add_entry(mark("idx1", None, "Banana"));
        reserve(
            &mut collector,
            &mut units,
            IndexSpec::Alphabetical {
                separators: true,
                by_chapter: false,
            },
        );
        collector.render(&mut units, &mut resolver);
        let first = units[0].to_markup();
        assert_eq!(resolver.pending().len(), 2);
        collector.render(&mut units, &mut resolver);
        assert_eq!(units[0].to_markup(), first);
        assert_eq!(resolver.pending().len(), 2);

        resolver.register_target("idx0", 0);
        resolver.register_target("idx1", 0);
        assert_eq!(resolver.resolve(&mut units).resolved, ["idx0", "idx1"]);
        assert_eq!(
            lines(&units[0], collector.indexes()[0].entries),
            ["A", "apple", "B", "Banana"]
        );
    }

    #[test]
    fn test_bibliography_dedup_and_sort() {
        let mut units = vec![OutputUnit::new(0, &UnitTemplate::default())];
        let mut resolver = ReferenceResolver::new(UnitNaming::new("doc", "xhtml"));
        let mut collector = IndexCollector::new();
        let bib = |target: &str, id: &str, year: &str| {
            IndexEntry::new(
                SourceId(1),
                0,
                target,
                id,
                EntryKind::BibliographyKey {
                    identifier: id.to_string(),
                    fields: vec![
                        ("author".to_string(), "Knuth".to_string()),
                        ("title".to_string(), "TAOCP".to_string()),
                        ("year".to_string(), year.to_string()),
                    ],
                },
            )
        };
        collector.add_entry(bib("bib0", "Knuth97", "1997"));
        collector.add_entry(bib("bib1", "Knuth84", "1984"));
        collector.add_entry(bib("bib2", "Knuth97", "1997"));
        reserve(
            &mut collector,
            &mut units,
            IndexSpec::Bibliography {
                sort_by_position: false,
            },
        );
        collector.render(&mut units, &mut resolver);
        assert_eq!(
            lines(&units[0], collector.indexes()[0].entries),
            [
                "[Knuth84] Knuth: TAOCP, 1984",
                "[Knuth97] Knuth: TAOCP, 1997"
            ]
        );
    }

    #[test]
    fn test_toc_filters_by_level_and_chapter() {
        let mut units = vec![OutputUnit::new(0, &UnitTemplate::default())];
        let mut resolver = ReferenceResolver::new(UnitNaming::new("doc", "xhtml"));
        let mut collector = IndexCollector::new();
        let heading = |target: &str, text: &str, level: u8, chapter: u32| {
            IndexEntry::new(SourceId(1), 0, target, text, EntryKind::Heading { level })
                .with_chapter(chapter)
                .with_label(Some(format!("{}.", chapter)))
        };
        collector.add_entry(heading("toc0", "One", 1, 1));
        collector.add_entry(heading("toc1", "One.a", 2, 1));
        collector.add_entry(heading("toc2", "One.a.i", 3, 1));
        collector.add_entry(heading("toc3", "Two", 1, 2));
        let spec = IndexSpec::TableOfContents {
            outline_level: 2,
            use_outline_level: true,
            use_marks: true,
            use_source_styles: false,
            source_styles: Vec::new(),
            by_chapter: true,
        };
        reserve(&mut collector, &mut units, spec);
        collector.indexes[0].chapter = 1;
        collector.render(&mut units, &mut resolver);
        assert_eq!(
            lines(&units[0], collector.indexes()[0].entries),
            ["1. One", "1. One.a"]
        );
    }

    #[test]
    fn test_target_ids() {
        let mut collector = IndexCollector::new();
        assert_eq!(collector.next_target("toc"), "toc0");
        assert_eq!(collector.next_target("idx"), "idx0");
        assert_eq!(collector.next_target("toc"), "toc1");
    }
}
