//! The flow walker: one traversal of the source tree, then index rendering
//! and link resolution.
//!
//! ```
//! use odflow::{ConversionConfig, SourceTree, StyleCatalog, convert};
//!
//! let source = SourceTree::from_xml(
//!     r#"<office:text>
//!          <text:h text:outline-level="1">One</text:h><text:p>a</text:p>
//!          <text:h text:outline-level="1">Two</text:h><text:p>b</text:p>
//!        </office:text>"#,
//! )
//! .unwrap();
//! let conversion = convert(&source, &StyleCatalog::new(), &ConversionConfig::new()).unwrap();
//! assert_eq!(conversion.units.len(), 2);
//! assert_eq!(conversion.file_name(1), "document1.xhtml");
//! ```

mod block;
mod frame;
mod inline;
mod list;
mod navigation;
mod notes;
mod state;
mod table;

use crate::config::ConversionConfig;
use crate::error::{Error, Result};
use crate::links::ResolveReport;
use crate::resources::{LinkedResources, ResourceProvider};
use crate::source::{NodeKind, SourceTree, StyleLookup};
use crate::split::{OutputUnit, UnitNaming};
use state::RunState;

/// Result of one conversion run.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Output units in creation order.
    pub units: Vec<OutputUnit>,
    /// Rules for every exported style class.
    pub stylesheet: String,
    pub naming: UnitNaming,
    /// Outcome of link resolution.
    pub links: ResolveReport,
}

impl Conversion {
    /// File name of unit `index`.
    pub fn file_name(&self, index: usize) -> String {
        self.naming.file_name(index)
    }

    /// Visible text of every unit's content, concatenated.
    pub fn text(&self) -> String {
        self.units.iter().map(OutputUnit::text).collect()
    }

    /// Target ids no link could be resolved against.
    pub fn unresolved_links(&self) -> &[String] {
        &self.links.unresolved
    }
}

/// Converts source trees with a fixed configuration and resource provider.
pub struct Converter {
    config: ConversionConfig,
    resources: Box<dyn ResourceProvider>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::with_config(ConversionConfig::default())
    }

    pub fn with_config(config: ConversionConfig) -> Self {
        Self {
            config,
            resources: Box::new(LinkedResources::new()),
        }
    }

    /// Replace the resource provider.
    pub fn with_resources(mut self, resources: impl ResourceProvider + 'static) -> Self {
        self.resources = Box::new(resources);
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert `source` using `styles` for style lookups.
    ///
    /// The walk finishes completely before indexes are rendered, and indexes
    /// are rendered before links are resolved, so index entries get their
    /// hrefs in the same resolution pass as every other link.
    pub fn convert(&self, source: &SourceTree, styles: &dyn StyleLookup) -> Result<Conversion> {
        let body = source
            .find_kind(source.root(), NodeKind::Body)
            .ok_or(Error::MissingBody)?;

        let mut run = RunState::new(source, styles, &self.config, self.resources.as_ref());
        let start = run.splitter.start();
        run.walk_children(body, start);
        run.flush_footnotes();
        run.flush_endnotes();

        let RunState {
            cascade,
            splitter,
            mut resolver,
            indexes,
            ..
        } = run;
        let mut units = splitter.into_units();
        navigation::apply_titles(&mut units, self.config.title.as_deref());
        if self.config.template.navigation {
            navigation::write_navigation(&mut units, resolver.naming());
        }

        indexes.render(&mut units, &mut resolver);
        let links = resolver.resolve(&mut units);
        log::debug!(
            "converted into {} units, {} links resolved, {} unresolved",
            units.len(),
            links.resolved.len(),
            links.unresolved.len()
        );

        Ok(Conversion {
            units,
            stylesheet: cascade.stylesheet(),
            naming: resolver.naming().clone(),
            links,
        })
    }
}

/// Convert with the default resource provider.
pub fn convert(
    source: &SourceTree,
    styles: &dyn StyleLookup,
    config: &ConversionConfig,
) -> Result<Conversion> {
    Converter::with_config(config.clone()).convert(source, styles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ListLevelStyle, ListStyle, NumFormat, StyleCatalog};

    fn run(xml: &str, config: &ConversionConfig) -> Conversion {
        run_with(xml, &StyleCatalog::new(), config)
    }

    fn run_with(xml: &str, styles: &StyleCatalog, config: &ConversionConfig) -> Conversion {
        let source = SourceTree::from_xml(xml).unwrap();
        convert(&source, styles, config).unwrap()
    }

    #[test]
    fn test_missing_body() {
        let source = SourceTree::with_root("office:document");
        let result = convert(&source, &StyleCatalog::new(), &ConversionConfig::new());
        assert!(matches!(result, Err(Error::MissingBody)));
    }

    #[test]
    fn test_heading_split_and_titles() {
        let conversion = run(
            r#"<office:text>
                 <text:h text:outline-level="1">A</text:h><text:p>one</text:p>
                 <text:h text:outline-level="1">B</text:h><text:p>two</text:p>
               </office:text>"#,
            &ConversionConfig::new(),
        );
        assert_eq!(conversion.units.len(), 2);
        assert_eq!(conversion.units[0].title.as_deref(), Some("A"));
        assert_eq!(conversion.units[1].title.as_deref(), Some("B"));
        assert_eq!(conversion.units[1].outline_level, Some(1));
        assert_eq!(conversion.units[0].text(), "Aone");
        assert_eq!(conversion.units[1].text(), "Btwo");
    }

    #[test]
    fn test_title_skips_labels_and_citations() {
        let styles = StyleCatalog::new().with_outline_style(ListStyle::new(
            "Outline",
            vec![ListLevelStyle::number(NumFormat::Arabic)],
        ));
        let conversion = run_with(
            r#"<office:text>
                 <text:h text:outline-level="1">Intro<text:note text:id="ftn1" text:note-class="footnote"><text:note-citation>1</text:note-citation><text:note-body><text:p>n</text:p></text:note-body></text:note></text:h>
               </office:text>"#,
            &styles,
            &ConversionConfig::new(),
        );
        let unit = &conversion.units[0];
        assert_eq!(unit.title.as_deref(), Some("Intro"));
        assert!(unit.text().starts_with("1. Intro1"));
    }

    #[test]
    fn test_footnote_stays_in_its_unit() {
        let conversion = run(
            r#"<office:text>
                 <text:h text:outline-level="1">A</text:h>
                 <text:p>x<text:note text:id="ftn1" text:note-class="footnote"><text:note-citation>1</text:note-citation><text:note-body><text:p>note</text:p></text:note-body></text:note></text:p>
                 <text:h text:outline-level="1">B</text:h>
               </office:text>"#,
            &ConversionConfig::new(),
        );
        let first = &conversion.units[0];
        let markup = first.to_markup();
        assert!(markup.contains(r#"<div class="footnotes">"#));
        assert!(markup.contains(r##"href="#note-ftn1""##));
        assert!(markup.contains(r##"href="#noteref-ftn1""##));
        assert!(!conversion.units[1].to_markup().contains("footnotes"));
    }

    #[test]
    fn test_endnotes_go_last() {
        let conversion = run(
            r#"<office:text>
                 <text:h text:outline-level="1">A</text:h>
                 <text:p>x<text:note text:id="e1" text:note-class="endnote"><text:note-citation>i</text:note-citation><text:note-body><text:p>end</text:p></text:note-body></text:note></text:p>
                 <text:h text:outline-level="1">B</text:h>
               </office:text>"#,
            &ConversionConfig::new(),
        );
        assert!(conversion.units[1].to_markup().contains(r#"<div class="endnotes">"#));
        assert!(conversion.units[0].to_markup().contains(r#"href="document1.xhtml#note-e1""#));
    }

    #[test]
    fn test_ordered_list_with_continuation() {
        let styles = StyleCatalog::new().with_list_style(ListStyle::new(
            "L1",
            vec![ListLevelStyle::number(NumFormat::Arabic)],
        ));
        let conversion = run_with(
            r#"<office:text>
                 <text:list text:style-name="L1">
                   <text:list-item><text:p>a</text:p></text:list-item>
                   <text:list-item><text:p>b</text:p></text:list-item>
                 </text:list>
                 <text:p>between</text:p>
                 <text:list text:style-name="L1" text:continue-numbering="true">
                   <text:list-item><text:p>c</text:p></text:list-item>
                 </text:list>
               </office:text>"#,
            &styles,
            &ConversionConfig::new(),
        );
        let markup = conversion.units[0].to_markup();
        assert!(markup.contains(r#"<ol style="list-style-type: decimal" start="3">"#));
    }

    #[test]
    fn test_hard_labels() {
        let styles = StyleCatalog::new().with_list_style(ListStyle::new(
            "L1",
            vec![ListLevelStyle::number(NumFormat::UpperRoman)],
        ));
        let config =
            ConversionConfig::new().with_list_formatting(crate::config::ListFormatting::HardLabels);
        let conversion = run_with(
            r#"<office:text><text:list text:style-name="L1">
                 <text:list-item><text:p>a</text:p></text:list-item>
                 <text:list-item><text:p>b</text:p></text:list-item>
               </text:list></office:text>"#,
            &styles,
            &config,
        );
        assert_eq!(conversion.text(), "I. aII. b");
    }

    #[test]
    fn test_internal_link_to_bookmark() {
        let conversion = run(
            r##"<office:text>
                 <text:h text:outline-level="1">A</text:h>
                 <text:p><text:a xlink:href="#there">go</text:a></text:p>
                 <text:h text:outline-level="1">B</text:h>
                 <text:p><text:bookmark text:name="there"/>here</text:p>
               </office:text>"##,
            &ConversionConfig::new(),
        );
        assert!(conversion.units[0].to_markup().contains(r##"href="document1.xhtml#there""##));
        assert!(conversion.unresolved_links().is_empty());
    }

    #[test]
    fn test_page_reference_shows_unit_number() {
        let conversion = run(
            r#"<office:text>
                 <text:h text:outline-level="1">A</text:h>
                 <text:p>see <text:bookmark-ref text:ref-name="b" text:reference-format="page">7</text:bookmark-ref></text:p>
                 <text:h text:outline-level="1">B</text:h>
                 <text:p><text:bookmark text:name="b"/>target</text:p>
               </office:text>"#,
            &ConversionConfig::new(),
        );
        assert_eq!(conversion.units[0].text(), "Asee 2");
    }
}
