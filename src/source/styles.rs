//! Style collaborator: immutable property bags supplied by the ODF reader.
//!
//! The converter never parses `styles.xml` itself. A reader fills a
//! [`StyleCatalog`] (or implements [`StyleLookup`] over its own storage) and
//! the cascade consumes it.

use std::collections::HashMap;

/// Style family, as in `style:family`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleFamily {
    Paragraph,
    Text,
    Section,
    Table,
    TableColumn,
    TableRow,
    TableCell,
    Graphic,
}

impl StyleFamily {
    /// Parse an ODF family name.
    pub fn from_odf(s: &str) -> Option<Self> {
        match s {
            "paragraph" => Some(StyleFamily::Paragraph),
            "text" => Some(StyleFamily::Text),
            "section" => Some(StyleFamily::Section),
            "table" => Some(StyleFamily::Table),
            "table-column" => Some(StyleFamily::TableColumn),
            "table-row" => Some(StyleFamily::TableRow),
            "table-cell" => Some(StyleFamily::TableCell),
            "graphic" => Some(StyleFamily::Graphic),
            _ => None,
        }
    }

    /// Element used when a style of this family is exported as a class rule.
    pub fn default_tag(self) -> Option<&'static str> {
        match self {
            StyleFamily::Paragraph => Some("p"),
            StyleFamily::Text => Some("span"),
            StyleFamily::Table => Some("table"),
            StyleFamily::TableCell => Some("td"),
            StyleFamily::TableRow => Some("tr"),
            StyleFamily::TableColumn => Some("col"),
            StyleFamily::Section | StyleFamily::Graphic => None,
        }
    }
}

/// Ordered bag of raw ODF formatting properties (`fo:font-weight` → `bold`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    props: Vec<(String, String)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing an earlier value with the same name.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.props.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.props.push((name.to_string(), value.to_string())),
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

/// A named (common) or automatic style.
#[derive(Debug, Clone)]
pub struct SourceStyle {
    /// Internal name (`style:name`).
    pub name: String,
    /// User-visible name (`style:display-name`); falls back to `name`.
    pub display_name: Option<String>,
    pub family: StyleFamily,
    /// Parent style (`style:parent-style-name`).
    pub parent: Option<String>,
    /// Automatic styles carry hard formatting and are never exported as classes.
    pub automatic: bool,
    pub properties: PropertyBag,
    /// `style:master-page-name` (paragraph and table styles).
    pub master_page: Option<String>,
    /// `style:list-style-name` (paragraph styles).
    pub list_style: Option<String>,
    /// `style:default-outline-level` (paragraph styles).
    pub default_outline_level: Option<u8>,
}

impl SourceStyle {
    /// A named style with no properties.
    pub fn named(family: StyleFamily, name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: None,
            family,
            parent: None,
            automatic: false,
            properties: PropertyBag::new(),
            master_page: None,
            list_style: None,
            default_outline_level: None,
        }
    }

    /// An automatic style derived from `parent`.
    pub fn automatic(family: StyleFamily, name: &str, parent: Option<&str>) -> Self {
        Self {
            automatic: true,
            parent: parent.map(str::to_string),
            ..Self::named(family, name)
        }
    }

    pub fn with_display_name(mut self, display: &str) -> Self {
        self.display_name = Some(display.to_string());
        self
    }

    pub fn with_parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.set(name, value);
        self
    }

    pub fn with_master_page(mut self, master: &str) -> Self {
        self.master_page = Some(master.to_string());
        self
    }

    pub fn with_list_style(mut self, list_style: &str) -> Self {
        self.list_style = Some(list_style.to_string());
        self
    }

    pub fn with_outline_level(mut self, level: u8) -> Self {
        self.default_outline_level = Some(level);
        self
    }

    /// The name shown to users (and used for class names and style maps).
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Numbering format of one list level (`style:num-format`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NumFormat {
    #[default]
    Arabic,
    LowerRoman,
    UpperRoman,
    LowerAlpha,
    UpperAlpha,
    /// Empty `style:num-format`: the level shows no number.
    None,
}

impl NumFormat {
    pub fn from_odf(s: &str) -> Self {
        match s {
            "1" => NumFormat::Arabic,
            "i" => NumFormat::LowerRoman,
            "I" => NumFormat::UpperRoman,
            "a" => NumFormat::LowerAlpha,
            "A" => NumFormat::UpperAlpha,
            _ => NumFormat::None,
        }
    }
}

/// What a list level shows in front of its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelKind {
    Number {
        format: NumFormat,
        /// `style:num-letter-sync`
        letter_sync: bool,
        /// `text:start-value`
        start_value: u32,
        /// `text:display-levels`
        display_levels: u8,
    },
    Bullet(char),
    /// Image bullet; the value is the image href.
    Image(String),
}

/// One level of a list style (`text:list-level-style-*`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLevelStyle {
    pub kind: LevelKind,
    /// `style:num-prefix`
    pub prefix: String,
    /// `style:num-suffix`
    pub suffix: String,
}

impl ListLevelStyle {
    pub fn number(format: NumFormat) -> Self {
        Self {
            kind: LevelKind::Number {
                format,
                letter_sync: false,
                start_value: 1,
                display_levels: 1,
            },
            prefix: String::new(),
            suffix: ".".to_string(),
        }
    }

    pub fn bullet(c: char) -> Self {
        Self {
            kind: LevelKind::Bullet(c),
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    pub fn with_start_value(mut self, start: u32) -> Self {
        if let LevelKind::Number { start_value, .. } = &mut self.kind {
            *start_value = start;
        }
        self
    }

    pub fn with_display_levels(mut self, levels: u8) -> Self {
        if let LevelKind::Number { display_levels, .. } = &mut self.kind {
            *display_levels = levels.max(1);
        }
        self
    }

    pub fn with_letter_sync(mut self, sync: bool) -> Self {
        if let LevelKind::Number { letter_sync, .. } = &mut self.kind {
            *letter_sync = sync;
        }
        self
    }

    pub fn with_affixes(mut self, prefix: &str, suffix: &str) -> Self {
        self.prefix = prefix.to_string();
        self.suffix = suffix.to_string();
        self
    }

    pub fn start_value(&self) -> u32 {
        match self.kind {
            LevelKind::Number { start_value, .. } => start_value,
            _ => 1,
        }
    }

    pub fn is_numbered(&self) -> bool {
        matches!(
            self.kind,
            LevelKind::Number { format, .. } if format != NumFormat::None
        )
    }
}

/// A list style (`text:list-style`) or the outline style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStyle {
    pub name: String,
    pub display_name: Option<String>,
    pub automatic: bool,
    /// Level styles, index 0 is level 1.
    pub levels: Vec<ListLevelStyle>,
}

impl ListStyle {
    pub fn new(name: &str, levels: Vec<ListLevelStyle>) -> Self {
        Self {
            name: name.to_string(),
            display_name: None,
            automatic: false,
            levels,
        }
    }

    /// Level style for a 1-based level; deeper levels reuse the last one.
    pub fn level(&self, level: u8) -> Option<&ListLevelStyle> {
        if level == 0 {
            return None;
        }
        self.levels
            .get(level as usize - 1)
            .or_else(|| self.levels.last())
    }

    /// Whether the given level renders as an ordered list.
    pub fn is_numbered(&self, level: u8) -> bool {
        self.level(level).is_some_and(ListLevelStyle::is_numbered)
    }
}

/// Lookup interface implemented by the ODF reader.
pub trait StyleLookup {
    /// Find a paragraph/text/table/... style by family and internal name.
    fn style(&self, family: StyleFamily, name: &str) -> Option<&SourceStyle>;

    /// Find a list style by name.
    fn list_style(&self, name: &str) -> Option<&ListStyle>;

    /// The document's outline (chapter numbering) style.
    fn outline_style(&self) -> Option<&ListStyle>;
}

/// In-memory [`StyleLookup`] implementation.
#[derive(Debug, Clone, Default)]
pub struct StyleCatalog {
    styles: HashMap<(StyleFamily, String), SourceStyle>,
    list_styles: HashMap<String, ListStyle>,
    outline: Option<ListStyle>,
}

impl StyleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, style: SourceStyle) {
        self.styles
            .insert((style.family, style.name.clone()), style);
    }

    pub fn insert_list_style(&mut self, style: ListStyle) {
        self.list_styles.insert(style.name.clone(), style);
    }

    pub fn set_outline_style(&mut self, style: ListStyle) {
        self.outline = Some(style);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, style: SourceStyle) -> Self {
        self.insert(style);
        self
    }

    /// Builder-style [`insert_list_style`](Self::insert_list_style).
    pub fn with_list_style(mut self, style: ListStyle) -> Self {
        self.insert_list_style(style);
        self
    }

    /// Builder-style [`set_outline_style`](Self::set_outline_style).
    pub fn with_outline_style(mut self, style: ListStyle) -> Self {
        self.set_outline_style(style);
        self
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl StyleLookup for StyleCatalog {
    fn style(&self, family: StyleFamily, name: &str) -> Option<&SourceStyle> {
        self.styles.get(&(family, name.to_string()))
    }

    fn list_style(&self, name: &str) -> Option<&ListStyle> {
        self.list_styles.get(name)
    }

    fn outline_style(&self) -> Option<&ListStyle> {
        self.outline.as_ref()
    }
}
