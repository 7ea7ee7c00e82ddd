//! Footnotes and endnotes.
//!
//! A note leaves a citation link at its position in the text. Its body is
//! buffered: footnotes are written at the end of the unit holding the
//! citation (before the unit is closed), endnotes at the end of the last unit.

use super::inline::note_target;
use super::state::RunState;
use crate::source::{NodeKind, SourceId};
use crate::split::Cursor;
use crate::util::sanitize_id;

/// A note whose body has not been written yet.
#[derive(Debug, Clone)]
pub(super) struct PendingNote {
    pub source: SourceId,
    /// Id of the note body.
    pub id: String,
    /// Id of the citation in the text.
    pub ref_id: String,
    pub citation: String,
}

#[derive(Debug, Default)]
pub(super) struct NoteBuffer {
    pub footnotes: Vec<PendingNote>,
    pub endnotes: Vec<PendingNote>,
    /// Notes seen so far, for generated names and citations.
    pub counter: u32,
}

impl RunState<'_> {
    /// Write a note citation and buffer the note body.
    pub(super) fn note(&mut self, id: SourceId, cur: Cursor) {
        let source = self.source;
        self.notes.counter += 1;
        let counter = self.notes.counter;

        let name = source
            .attr(id, "text:id")
            .map_or_else(|| format!("note{}", counter), str::to_string);
        let citation = source
            .child_of_kind(id, NodeKind::NoteCitation)
            .map(|c| {
                source
                    .attr(c, "text:label")
                    .map_or_else(|| source.text_content(c), str::to_string)
            })
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| counter.to_string());

        let note = PendingNote {
            source: id,
            id: note_target(&name),
            ref_id: format!("noteref-{}", sanitize_id(&name)),
            citation,
        };

        let a = self.element_with(cur, "a", &[("class", "noteref")]);
        self.anchor(cur.unit, a, &note.ref_id);
        self.resolver.register_link(cur.unit, a, &note.id, false);
        let sup = self.element(cur.at(a), "sup");
        self.write_text(cur.at(sup), &note.citation);

        match source.attr(id, "text:note-class") {
            Some("endnote") => self.notes.endnotes.push(note),
            _ => self.notes.footnotes.push(note),
        }
    }

    /// Write buffered footnotes at the end of the current unit.
    pub(super) fn flush_footnotes(&mut self) {
        let notes = std::mem::take(&mut self.notes.footnotes);
        if notes.is_empty() {
            return;
        }
        let unit = self.splitter.current();
        let content = self.splitter.unit(unit).content;
        let cur = Cursor::new(unit, content);
        let container = self.element_with(cur, "div", &[("class", "footnotes")]);
        for note in &notes {
            self.write_note(note, cur.at(container));
        }
    }

    /// Write every endnote at the end of the last unit.
    pub(super) fn flush_endnotes(&mut self) {
        let notes = std::mem::take(&mut self.notes.endnotes);
        if notes.is_empty() {
            return;
        }
        let unit = self.splitter.current();
        let content = self.splitter.unit(unit).content;
        let cur = Cursor::new(unit, content);
        let container = self.element_with(cur, "div", &[("class", "endnotes")]);
        for note in &notes {
            self.write_note(note, cur.at(container));
        }
    }

    fn write_note(&mut self, note: &PendingNote, cur: Cursor) {
        let source = self.source;
        self.splitter.enter_atomic();
        let div = self.element_with(cur, "div", &[("class", "note")]);
        self.anchor(cur.unit, div, &note.id);

        let back = self.element_with(cur.at(div), "a", &[("class", "note-citation")]);
        self.resolver.register_link(cur.unit, back, &note.ref_id, false);
        self.write_text(cur.at(back), &note.citation);

        if let Some(body) = source.child_of_kind(note.source, NodeKind::NoteBody) {
            self.walk_children(body, cur.at(div));
        }
        self.splitter.leave_atomic();
    }
}
