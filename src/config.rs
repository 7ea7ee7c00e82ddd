//! Conversion options.
//!
//! [`ConversionConfig`] is a flat, already-validated value. Reading it from a
//! file or command line is left to the host; with the `serde` feature the
//! type derives `Serialize`/`Deserialize` so hosts can do that directly.

use crate::source::StyleFamily;

/// Target flavour of the output units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputMode {
    /// Plain XHTML files; character-count splitting is disabled.
    #[default]
    Xhtml,
    /// EPUB content documents; long units are also split by size.
    Epub,
}

/// Which formatting reaches the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formatting {
    /// Named styles become classes, hard formatting becomes inline declarations.
    #[default]
    ConvertAll,
    /// No classes; named styles are flattened inline when inheriting.
    IgnoreStyles,
    /// Classes only; hard formatting is dropped.
    IgnoreHard,
    /// Neither classes nor inline declarations.
    IgnoreAll,
}

impl Formatting {
    /// Whether named styles are exported as classes.
    pub fn exports_styles(self) -> bool {
        matches!(self, Formatting::ConvertAll | Formatting::IgnoreHard)
    }

    /// Whether automatic (hard) formatting is kept.
    pub fn keeps_hard_formatting(self) -> bool {
        matches!(self, Formatting::ConvertAll | Formatting::IgnoreStyles)
    }

    /// Whether named styles are flattened into inline declarations.
    pub fn inlines_styles(self) -> bool {
        self == Formatting::IgnoreStyles
    }
}

/// Which page breaks start a new output unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageBreakSplit {
    /// Page breaks never split.
    #[default]
    None,
    /// Breaks requested by named styles.
    Styles,
    /// Breaks requested by named or automatic styles.
    Explicit,
    /// Explicit breaks plus soft page breaks recorded by the source application.
    All,
}

/// How list numbers are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListFormatting {
    /// Native `ol`/`ul` numbering; continued lists carry a `start` attribute.
    #[default]
    Css,
    /// Every item gets an explicit label span.
    HardLabels,
}

/// User-supplied replacement for a named style.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleMap {
    pub family: StyleFamily,
    /// Display name of the source style.
    pub display_name: String,
    /// Element to emit instead of the default one.
    pub tag: Option<String>,
    /// Class to emit instead of a generated one.
    pub class: Option<String>,
}

impl StyleMap {
    pub fn new(family: StyleFamily, display_name: &str) -> Self {
        Self {
            family,
            display_name: display_name.to_string(),
            tag: None,
            class: None,
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }
}

/// Containers copied into every new unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub header: bool,
    pub footer: bool,
    pub panel: bool,
    /// Write first/previous/next/last links into header and footer.
    pub navigation: bool,
}

/// Configuration for one conversion run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConversionConfig {
    pub output: OutputMode,
    /// Headings at this outline level or above start a new unit (0 disables).
    pub split_level: u8,
    /// Number of ancestor heading levels repeated at the top of a new unit.
    pub repeat_levels: u8,
    /// Characters after which an EPUB unit is split (`None` disables).
    pub char_split_threshold: Option<usize>,
    pub page_break_split: PageBreakSplit,
    pub formatting: Formatting,
    pub list_formatting: ListFormatting,
    pub style_maps: Vec<StyleMap>,
    pub include_toc: bool,
    pub include_alphabetical_index: bool,
    pub include_user_index: bool,
    pub include_bibliography: bool,
    /// Emit annotations as comments.
    pub include_annotations: bool,
    /// Embed image payloads as `data:` URIs when the provider supplies them.
    pub embed_images: bool,
    /// Convert absolute lengths to pixels at 96 dpi.
    pub convert_to_px: bool,
    pub template: UnitTemplate,
    /// File name stem of the first unit.
    pub base_name: String,
    /// File extension of every unit.
    pub extension: String,
    /// Title of units that contain no heading.
    pub title: Option<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output: OutputMode::Xhtml,
            split_level: 1,
            repeat_levels: 0,
            char_split_threshold: Some(150_000),
            page_break_split: PageBreakSplit::None,
            formatting: Formatting::ConvertAll,
            list_formatting: ListFormatting::Css,
            style_maps: Vec::new(),
            include_toc: true,
            include_alphabetical_index: true,
            include_user_index: true,
            include_bibliography: true,
            include_annotations: false,
            embed_images: false,
            convert_to_px: true,
            template: UnitTemplate::default(),
            base_name: "document".to_string(),
            extension: "xhtml".to_string(),
            title: None,
        }
    }
}

impl ConversionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// EPUB defaults: size splitting on, `.xhtml` units.
    pub fn epub() -> Self {
        Self {
            output: OutputMode::Epub,
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn with_split_level(mut self, level: u8) -> Self {
        self.split_level = level;
        self
    }

    pub fn with_repeat_levels(mut self, levels: u8) -> Self {
        self.repeat_levels = levels;
        self
    }

    pub fn with_char_split_threshold(mut self, threshold: Option<usize>) -> Self {
        self.char_split_threshold = threshold;
        self
    }

    pub fn with_page_break_split(mut self, policy: PageBreakSplit) -> Self {
        self.page_break_split = policy;
        self
    }

    pub fn with_formatting(mut self, formatting: Formatting) -> Self {
        self.formatting = formatting;
        self
    }

    pub fn with_list_formatting(mut self, formatting: ListFormatting) -> Self {
        self.list_formatting = formatting;
        self
    }

    pub fn with_style_map(mut self, map: StyleMap) -> Self {
        self.style_maps.push(map);
        self
    }

    pub fn with_annotations(mut self, include: bool) -> Self {
        self.include_annotations = include;
        self
    }

    pub fn with_embedded_images(mut self, embed: bool) -> Self {
        self.embed_images = embed;
        self
    }

    pub fn with_px_conversion(mut self, convert: bool) -> Self {
        self.convert_to_px = convert;
        self
    }

    pub fn with_template(mut self, template: UnitTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_file_names(mut self, base_name: &str, extension: &str) -> Self {
        self.base_name = base_name.to_string();
        self.extension = extension.to_string();
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Turn every index kind on or off at once.
    pub fn with_indexes(mut self, include: bool) -> Self {
        self.include_toc = include;
        self.include_alphabetical_index = include;
        self.include_user_index = include;
        self.include_bibliography = include;
        self
    }

    /// Character threshold in effect for this output mode.
    pub fn effective_char_threshold(&self) -> Option<usize> {
        match self.output {
            OutputMode::Epub => self.char_split_threshold.filter(|&n| n > 0),
            OutputMode::Xhtml => None,
        }
    }

    /// Style map entry for a named style, if any.
    pub fn style_map(&self, family: StyleFamily, display_name: &str) -> Option<&StyleMap> {
        self.style_maps
            .iter()
            .find(|m| m.family == family && m.display_name == display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_only_in_epub() {
        let xhtml = ConversionConfig::new().with_char_split_threshold(Some(10));
        assert_eq!(xhtml.effective_char_threshold(), None);
        let epub = ConversionConfig::epub().with_char_split_threshold(Some(10));
        assert_eq!(epub.effective_char_threshold(), Some(10));
        let disabled = ConversionConfig::epub().with_char_split_threshold(Some(0));
        assert_eq!(disabled.effective_char_threshold(), None);
    }

    #[test]
    fn test_style_map_lookup() {
        let config = ConversionConfig::new()
            .with_style_map(StyleMap::new(StyleFamily::Paragraph, "Quotations").with_tag("blockquote"));
        assert!(config.style_map(StyleFamily::Paragraph, "Quotations").is_some());
        assert!(config.style_map(StyleFamily::Text, "Quotations").is_none());
    }

    #[test]
    fn test_formatting_policy() {
        assert!(Formatting::ConvertAll.exports_styles());
        assert!(Formatting::ConvertAll.keeps_hard_formatting());
        assert!(!Formatting::IgnoreStyles.exports_styles());
        assert!(Formatting::IgnoreStyles.inlines_styles());
        assert!(!Formatting::IgnoreAll.keeps_hard_formatting());
    }
}
