//! Tables.
//!
//! A table is written as one indivisible block. Header rows go into `thead`,
//! everything else into a single `tbody`.

use super::state::RunState;
use crate::dom::NodeId;
use crate::source::{NodeKind, SourceId, StyleFamily};
use crate::split::{BlockEvent, Cursor};
use crate::util::sanitize_id;

/// Upper bound for `table:number-columns-repeated` / `-rows-repeated`.
///
/// Spreadsheet-style input repeats empty cells to the end of the sheet.
const MAX_REPEAT: u32 = 256;

fn repeat_count(value: Option<u32>) -> u32 {
    value.unwrap_or(1).clamp(1, MAX_REPEAT)
}

impl RunState<'_> {
    pub(super) fn table(&mut self, id: SourceId, cur: Cursor) -> Cursor {
        let source = self.source;
        let style = source.attr(id, "table:style-name");
        let page_break = self.cascade.page_break(StyleFamily::Table, style);
        let cur = self.begin_block(cur, &BlockEvent::default().with_page_break(page_break.clone()));

        self.splitter.enter_atomic();
        let info = self.cascade.resolve(StyleFamily::Table, style, true);
        let table = self.element(cur, info.tag.as_deref().unwrap_or("table"));
        self.apply(cur.unit, table, &info);
        if let Some(name) = source.attr(id, "table:name") {
            self.anchor(cur.unit, table, &sanitize_id(name));
        }

        let mut colgroup = None;
        let mut tbody = None;
        self.table_parts(id, cur.at(table), &mut colgroup, &mut tbody, false);

        self.splitter.leave_atomic();
        self.finish_block(None, &page_break);
        cur
    }

    /// Walk the structural children of a table or row group.
    fn table_parts(
        &mut self,
        parent: SourceId,
        table: Cursor,
        colgroup: &mut Option<NodeId>,
        tbody: &mut Option<NodeId>,
        header: bool,
    ) {
        let source = self.source;
        for child in source.children(parent) {
            match source.kind(child) {
                NodeKind::TableColumn => {
                    let group = match *colgroup {
                        Some(group) => group,
                        None => {
                            let group = self.element(table, "colgroup");
                            *colgroup = Some(group);
                            group
                        }
                    };
                    self.table_column(child, table.at(group));
                }
                NodeKind::TableColumnGroup => {
                    self.table_parts(child, table, colgroup, tbody, header);
                }
                NodeKind::TableHeaderRows => {
                    let thead = self.element(table, "thead");
                    self.table_parts(child, table.at(thead), colgroup, tbody, true);
                }
                NodeKind::TableRowGroup => {
                    self.table_parts(child, table, colgroup, tbody, header);
                }
                NodeKind::TableRow if header => self.table_row(child, table, true),
                NodeKind::TableRow => {
                    let body = match *tbody {
                        Some(body) => body,
                        None => {
                            let body = self.element(table, "tbody");
                            *tbody = Some(body);
                            body
                        }
                    };
                    self.table_row(child, table.at(body), false);
                }
                NodeKind::SoftPageBreak | NodeKind::Text | NodeKind::Comment => {}
                kind => log::debug!("skipping {:?} inside a table", kind),
            }
        }
    }

    fn table_column(&mut self, id: SourceId, cur: Cursor) {
        let source = self.source;
        let info = self.cascade.resolve(
            StyleFamily::TableColumn,
            source.attr(id, "table:style-name"),
            true,
        );
        let repeat = repeat_count(source.attr_u32(id, "table:number-columns-repeated"));
        let col = self.element(cur, "col");
        self.apply(cur.unit, col, &info);
        if repeat > 1 {
            self.set_attr(cur.unit, col, "span", &repeat.to_string());
        }
    }

    fn table_row(&mut self, id: SourceId, cur: Cursor, header: bool) {
        let source = self.source;
        let info = self.cascade.resolve(
            StyleFamily::TableRow,
            source.attr(id, "table:style-name"),
            true,
        );
        let repeat = repeat_count(source.attr_u32(id, "table:number-rows-repeated"));
        for _ in 0..repeat {
            let tr = self.element(cur, "tr");
            self.apply(cur.unit, tr, &info);
            for cell in source.children(id) {
                match source.kind(cell) {
                    NodeKind::TableCell => self.table_cell(cell, cur.at(tr), header),
                    NodeKind::CoveredTableCell | NodeKind::Text | NodeKind::Comment => {}
                    kind => log::debug!("skipping {:?} inside a table row", kind),
                }
            }
        }
    }

    fn table_cell(&mut self, id: SourceId, cur: Cursor, header: bool) {
        let source = self.source;
        let info = self.cascade.resolve(
            StyleFamily::TableCell,
            source.attr(id, "table:style-name"),
            true,
        );
        let tag = if header { "th" } else { "td" };
        let colspan = source.attr_u32(id, "table:number-columns-spanned").unwrap_or(1);
        let rowspan = source.attr_u32(id, "table:number-rows-spanned").unwrap_or(1);
        let repeat = repeat_count(source.attr_u32(id, "table:number-columns-repeated"));

        for _ in 0..repeat {
            let td = self.element(cur, tag);
            self.apply(cur.unit, td, &info);
            if colspan > 1 {
                self.set_attr(cur.unit, td, "colspan", &colspan.to_string());
            }
            if rowspan > 1 {
                self.set_attr(cur.unit, td, "rowspan", &rowspan.to_string());
            }
            self.walk_children(id, cur.at(td));
        }
    }
}
