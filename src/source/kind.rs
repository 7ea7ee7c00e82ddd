//! Closed classification of ODF elements.
//!
//! Every element in a [`SourceTree`](super::SourceTree) is tagged with a
//! `NodeKind` when it is inserted, so traversal matches on a finite enum
//! instead of comparing qualified names.

/// The kind of a source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Character data.
    Text,
    /// XML comment.
    Comment,

    // --- Document structure ---
    /// `office:text` (the body root).
    Body,
    /// `text:p`
    Paragraph,
    /// `text:h`
    Heading,
    /// `text:section`
    Section,
    /// `text:soft-page-break`
    SoftPageBreak,
    /// Declarations with no visible output (`text:sequence-decls`, tracked changes, ...).
    Ignored,

    // --- Lists ---
    /// `text:list`
    List,
    /// `text:list-item`
    ListItem,
    /// `text:list-header`
    ListHeader,
    /// `text:numbered-paragraph`
    NumberedParagraph,

    // --- Tables ---
    /// `table:table`
    Table,
    /// `table:table-column`
    TableColumn,
    /// `table:table-columns` / `table:table-column-group` / `table:table-header-columns`
    TableColumnGroup,
    /// `table:table-header-rows`
    TableHeaderRows,
    /// `table:table-rows` / `table:table-row-group`
    TableRowGroup,
    /// `table:table-row`
    TableRow,
    /// `table:table-cell`
    TableCell,
    /// `table:covered-table-cell`
    CoveredTableCell,

    // --- Inline content ---
    /// `text:span`
    Span,
    /// `text:a`
    Link,
    /// `text:line-break`
    LineBreak,
    /// `text:tab`
    Tab,
    /// `text:s`
    Space,
    /// `text:bookmark` and `text:bookmark-start`
    Bookmark,
    /// `text:bookmark-end`
    BookmarkEnd,
    /// `text:reference-mark` and `text:reference-mark-start`
    ReferenceMark,
    /// `text:reference-mark-end`
    ReferenceMarkEnd,
    /// `text:bookmark-ref`
    BookmarkRef,
    /// `text:reference-ref`
    ReferenceRef,
    /// `text:note-ref`
    NoteRef,
    /// `text:sequence-ref`
    SequenceRef,
    /// `text:sequence`
    Sequence,
    /// Any other text field (page number, date, author, ...); content is kept.
    Field,
    /// `office:annotation`
    Annotation,

    // --- Notes ---
    /// `text:note`
    Note,
    /// `text:note-citation`
    NoteCitation,
    /// `text:note-body`
    NoteBody,

    // --- Index marks ---
    /// `text:toc-mark` and `text:toc-mark-start`
    TocMark,
    /// `text:alphabetical-index-mark` and `text:alphabetical-index-mark-start`
    AlphabeticalIndexMark,
    /// `text:user-index-mark` and `text:user-index-mark-start`
    UserIndexMark,
    /// End of a ranged index mark (`*-mark-end`).
    IndexMarkEnd,
    /// `text:bibliography-mark`
    BibliographyMark,

    // --- Indexes ---
    /// `text:table-of-content`
    TableOfContent,
    /// `text:alphabetical-index`
    AlphabeticalIndex,
    /// `text:user-index`
    UserIndex,
    /// `text:bibliography`
    Bibliography,
    /// Illustration, table and object indexes (kept as static content).
    OtherIndex,
    /// `text:*-source` index configuration element.
    IndexSource,
    /// `text:index-title`
    IndexTitle,
    /// `text:index-body`
    IndexBody,
    /// `text:index-source-styles`
    IndexSourceStyles,
    /// `text:index-source-style`
    IndexSourceStyle,

    // --- Drawing ---
    /// `draw:frame`
    Frame,
    /// `draw:image`
    Image,
    /// `draw:text-box`
    TextBox,
    /// `draw:object` / `draw:object-ole`
    Object,
    /// `math:math`
    Math,
    /// `svg:title`
    SvgTitle,
    /// `svg:desc`
    SvgDesc,

    /// Anything not listed above.
    Unknown,
}

impl NodeKind {
    /// Classify an element by its qualified name.
    pub fn from_name(name: &str) -> NodeKind {
        match name {
            "office:text" | "office:body" => NodeKind::Body,
            "text:p" => NodeKind::Paragraph,
            "text:h" => NodeKind::Heading,
            "text:section" => NodeKind::Section,
            "text:soft-page-break" => NodeKind::SoftPageBreak,
            "text:sequence-decls" | "text:tracked-changes" | "text:variable-decls"
            | "text:user-field-decls" | "office:forms" | "text:alphabetical-index-auto-mark-file"
            | "text:dde-connection-decls" => NodeKind::Ignored,

            "text:list" => NodeKind::List,
            "text:list-item" => NodeKind::ListItem,
            "text:list-header" => NodeKind::ListHeader,
            "text:numbered-paragraph" => NodeKind::NumberedParagraph,

            "table:table" => NodeKind::Table,
            "table:table-column" => NodeKind::TableColumn,
            "table:table-columns" | "table:table-column-group" | "table:table-header-columns" => {
                NodeKind::TableColumnGroup
            }
            "table:table-header-rows" => NodeKind::TableHeaderRows,
            "table:table-rows" | "table:table-row-group" => NodeKind::TableRowGroup,
            "table:table-row" => NodeKind::TableRow,
            "table:table-cell" => NodeKind::TableCell,
            "table:covered-table-cell" => NodeKind::CoveredTableCell,

            "text:span" => NodeKind::Span,
            "text:a" => NodeKind::Link,
            "text:line-break" => NodeKind::LineBreak,
            "text:tab" => NodeKind::Tab,
            "text:s" => NodeKind::Space,
            "text:bookmark" | "text:bookmark-start" => NodeKind::Bookmark,
            "text:bookmark-end" => NodeKind::BookmarkEnd,
            "text:reference-mark" | "text:reference-mark-start" => NodeKind::ReferenceMark,
            "text:reference-mark-end" => NodeKind::ReferenceMarkEnd,
            "text:bookmark-ref" => NodeKind::BookmarkRef,
            "text:reference-ref" => NodeKind::ReferenceRef,
            "text:note-ref" => NodeKind::NoteRef,
            "text:sequence-ref" => NodeKind::SequenceRef,
            "text:sequence" => NodeKind::Sequence,
            "office:annotation" => NodeKind::Annotation,
            "office:annotation-end" => NodeKind::Ignored,

            "text:note" => NodeKind::Note,
            "text:note-citation" => NodeKind::NoteCitation,
            "text:note-body" => NodeKind::NoteBody,

            "text:toc-mark" | "text:toc-mark-start" => NodeKind::TocMark,
            "text:alphabetical-index-mark" | "text:alphabetical-index-mark-start" => {
                NodeKind::AlphabeticalIndexMark
            }
            "text:user-index-mark" | "text:user-index-mark-start" => NodeKind::UserIndexMark,
            "text:toc-mark-end" | "text:alphabetical-index-mark-end" | "text:user-index-mark-end" => {
                NodeKind::IndexMarkEnd
            }
            "text:bibliography-mark" => NodeKind::BibliographyMark,

            "text:table-of-content" => NodeKind::TableOfContent,
            "text:alphabetical-index" => NodeKind::AlphabeticalIndex,
            "text:user-index" => NodeKind::UserIndex,
            "text:bibliography" => NodeKind::Bibliography,
            "text:illustration-index" | "text:table-index" | "text:object-index" => {
                NodeKind::OtherIndex
            }
            "text:table-of-content-source"
            | "text:alphabetical-index-source"
            | "text:user-index-source"
            | "text:bibliography-source"
            | "text:illustration-index-source"
            | "text:table-index-source"
            | "text:object-index-source" => NodeKind::IndexSource,
            "text:index-title" => NodeKind::IndexTitle,
            "text:index-body" => NodeKind::IndexBody,
            "text:index-source-styles" => NodeKind::IndexSourceStyles,
            "text:index-source-style" => NodeKind::IndexSourceStyle,

            "draw:frame" => NodeKind::Frame,
            "draw:image" => NodeKind::Image,
            "draw:text-box" => NodeKind::TextBox,
            "draw:object" | "draw:object-ole" => NodeKind::Object,
            "math:math" => NodeKind::Math,
            "svg:title" => NodeKind::SvgTitle,
            "svg:desc" => NodeKind::SvgDesc,

            name if is_text_field(name) => NodeKind::Field,
            _ => NodeKind::Unknown,
        }
    }

    /// Whether this kind starts block-level content in a text flow.
    pub fn is_block(self) -> bool {
        matches!(
            self,
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
        )
    }

    /// Whether this kind is an index container.
    pub fn is_index(self) -> bool {
        matches!(
            self,
            NodeKind::TableOfContent
                | NodeKind::AlphabeticalIndex
                | NodeKind::UserIndex
                | NodeKind::Bibliography
        )
    }
}

/// Text fields whose children carry the displayed value.
fn is_text_field(name: &str) -> bool {
    matches!(
        name,
        "text:page-number"
            | "text:page-count"
            | "text:chapter"
            | "text:date"
            | "text:time"
            | "text:title"
            | "text:subject"
            | "text:author-name"
            | "text:author-initials"
            | "text:initial-creator"
            | "text:creation-date"
            | "text:file-name"
            | "text:sender-firstname"
            | "text:sender-lastname"
            | "text:variable-get"
            | "text:variable-set"
            | "text:user-field-get"
            | "text:expression"
            | "text:text-input"
            | "text:word-count"
            | "text:character-count"
            | "text:paragraph-count"
            | "text:description"
            | "text:keywords"
            | "text:hidden-text"
            | "text:placeholder"
            | "text:drop-down"
    ) || name.starts_with("text:sender-")
        || name.starts_with("text:database-")
}
