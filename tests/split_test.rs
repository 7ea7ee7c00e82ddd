//! Output splitting: headings, page breaks, size limits and indivisible blocks.

use odflow::{
    Conversion, ConversionConfig, PageBreakSplit, SourceStyle, SourceTree, StyleCatalog,
    StyleFamily, convert,
};
use proptest::prelude::*;

fn run(xml: &str, styles: &StyleCatalog, config: &ConversionConfig) -> Conversion {
    let source = SourceTree::from_xml(xml).expect("fixture should parse");
    convert(&source, styles, config).expect("conversion should succeed")
}

const TWO_CHAPTERS: &str = r#"<office:text>
    <text:h text:outline-level="1">A</text:h>
    <text:p>first</text:p>
    <text:h text:outline-level="1">B</text:h>
    <text:p>second</text:p>
</office:text>"#;

#[test]
fn test_split_level_one_gives_two_units() {
    let conversion = run(TWO_CHAPTERS, &StyleCatalog::new(), &ConversionConfig::new());
    assert_eq!(conversion.units.len(), 2);
    assert_eq!(conversion.units[0].text(), "Afirst");
    assert_eq!(conversion.units[1].text(), "Bsecond");
    assert_eq!(conversion.units[0].index, 0);
    assert_eq!(conversion.units[1].index, 1);
    assert_eq!(conversion.units[0].outline_level, None);
    assert_eq!(conversion.units[1].outline_level, Some(1));
}

#[test]
fn test_split_level_zero_keeps_one_unit() {
    let config = ConversionConfig::new().with_split_level(0);
    let conversion = run(TWO_CHAPTERS, &StyleCatalog::new(), &config);
    assert_eq!(conversion.units.len(), 1);
    assert_eq!(conversion.units[0].text(), "AfirstBsecond");
}

#[test]
fn test_deeper_headings_do_not_split() {
    let xml = r#"<office:text>
        <text:h text:outline-level="1">A</text:h>
        <text:p>x</text:p>
        <text:h text:outline-level="2">A.1</text:h>
        <text:p>y</text:p>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new(), &ConversionConfig::new());
    assert_eq!(conversion.units.len(), 1);
}

#[test]
fn test_page_break_policies() {
    let styles = StyleCatalog::new()
        .with(
            SourceStyle::automatic(StyleFamily::Paragraph, "P1", None)
                .with_property("fo:break-before", "page"),
        )
        .with(
            SourceStyle::named(StyleFamily::Paragraph, "Chapter")
                .with_property("fo:break-before", "page"),
        );
    let automatic = r#"<office:text>
        <text:p>a</text:p><text:p text:style-name="P1">b</text:p>
    </office:text>"#;
    let named = r#"<office:text>
        <text:p>a</text:p><text:p text:style-name="Chapter">b</text:p>
    </office:text>"#;

    let none = ConversionConfig::new();
    let styles_only = ConversionConfig::new().with_page_break_split(PageBreakSplit::Styles);
    let explicit = ConversionConfig::new().with_page_break_split(PageBreakSplit::Explicit);

    assert_eq!(run(automatic, &styles, &none).units.len(), 1);
    assert_eq!(run(automatic, &styles, &styles_only).units.len(), 1);
    assert_eq!(run(automatic, &styles, &explicit).units.len(), 2);
    assert_eq!(run(named, &styles, &styles_only).units.len(), 2);
}

#[test]
fn test_break_after_splits_before_next_block() {
    let styles = StyleCatalog::new().with(
        SourceStyle::automatic(StyleFamily::Paragraph, "P2", None)
            .with_property("fo:break-after", "page"),
    );
    let xml = r#"<office:text>
        <text:p text:style-name="P2">a</text:p><text:p>b</text:p><text:p>c</text:p>
    </office:text>"#;
    let config = ConversionConfig::new().with_page_break_split(PageBreakSplit::Explicit);
    let conversion = run(xml, &styles, &config);
    assert_eq!(conversion.units.len(), 2);
    assert_eq!(conversion.units[1].text(), "bc");
}

#[test]
fn test_soft_page_breaks_only_split_with_all() {
    let xml = r#"<office:text>
        <text:p>a</text:p><text:soft-page-break/><text:p>b</text:p>
    </office:text>"#;
    let explicit = ConversionConfig::new().with_page_break_split(PageBreakSplit::Explicit);
    let all = ConversionConfig::new().with_page_break_split(PageBreakSplit::All);
    assert_eq!(run(xml, &StyleCatalog::new(), &explicit).units.len(), 1);
    assert_eq!(run(xml, &StyleCatalog::new(), &all).units.len(), 2);
}

#[test]
fn test_char_threshold_in_epub() {
    let xml = r#"<office:text>
        <text:p>aaaaaaaa</text:p>
        <text:p>bbbbbbbb</text:p>
        <text:p>cccccccc</text:p>
        <text:p>dddddddd</text:p>
        <text:p>eeeeeeee</text:p>
    </office:text>"#;
    let epub = ConversionConfig::epub().with_char_split_threshold(Some(10));
    let conversion = run(xml, &StyleCatalog::new(), &epub);
    let texts: Vec<String> = conversion.units.iter().map(|u| u.text()).collect();
    assert_eq!(texts, ["aaaaaaaabbbbbbbb", "ccccccccdddddddd", "eeeeeeee"]);

    let xhtml = ConversionConfig::new().with_char_split_threshold(Some(10));
    assert_eq!(run(xml, &StyleCatalog::new(), &xhtml).units.len(), 1);
}

#[test]
fn test_table_is_never_split() {
    let xml = r#"<office:text>
        <table:table table:name="T">
          <table:table-row><table:table-cell><text:p>0123456789</text:p></table:table-cell></table:table-row>
          <table:table-row><table:table-cell><text:p>0123456789</text:p></table:table-cell></table:table-row>
          <table:table-row><table:table-cell><text:h text:outline-level="1">inside</text:h></table:table-cell></table:table-row>
        </table:table>
        <text:p>after</text:p>
    </office:text>"#;
    let epub = ConversionConfig::epub().with_char_split_threshold(Some(5));
    let conversion = run(xml, &StyleCatalog::new(), &epub);
    assert_eq!(conversion.units.len(), 2);
    let first = &conversion.units[0];
    assert_eq!(first.tree.elements_by_tag(first.content, "tr").len(), 3);
    assert_eq!(conversion.units[1].text(), "after");
}

#[test]
fn test_multi_column_section_is_atomic() {
    let styles = StyleCatalog::new().with(
        SourceStyle::automatic(StyleFamily::Section, "Sect2", None)
            .with_property("fo:column-count", "2"),
    );
    let xml = r#"<office:text>
        <text:p>before</text:p>
        <text:section text:style-name="Sect2" text:name="Cols">
          <text:h text:outline-level="1">A</text:h><text:p>x</text:p>
          <text:h text:outline-level="1">B</text:h><text:p>y</text:p>
        </text:section>
    </office:text>"#;
    let conversion = run(xml, &styles, &ConversionConfig::new());
    assert_eq!(conversion.units.len(), 1);
}

#[test]
fn test_open_sections_are_replayed() {
    let styles = StyleCatalog::new().with(SourceStyle::named(StyleFamily::Section, "Sect"));
    let xml = r#"<office:text>
        <text:section text:style-name="Sect" text:name="S1">
          <text:h text:outline-level="1">A</text:h><text:p>x</text:p>
          <text:h text:outline-level="1">B</text:h><text:p>y</text:p>
        </text:section>
        <text:p>outside</text:p>
    </office:text>"#;
    let conversion = run(xml, &styles, &ConversionConfig::new());
    assert_eq!(conversion.units.len(), 2);

    let first = conversion.units[0].to_markup();
    assert!(first.contains(r#"<div class="Sect" id="S1">"#));

    let second = &conversion.units[1];
    let divs = second.tree.elements_by_tag(second.content, "div");
    assert_eq!(divs.len(), 1);
    assert_eq!(second.tree.attr(divs[0], "class"), Some("Sect"));
    assert_eq!(second.tree.attr(divs[0], "id"), None);
    // "outside" follows the section, not inside the replayed wrapper
    assert_eq!(second.tree.text_content(divs[0]), "By");
    assert_eq!(second.text(), "Byoutside");
}

#[test]
fn test_repeated_heading_levels() {
    let xml = r#"<office:text>
        <text:h text:outline-level="1">Part</text:h>
        <text:p>intro</text:p>
        <text:h text:outline-level="2">One</text:h>
        <text:p>x</text:p>
        <text:h text:outline-level="2">Two</text:h>
        <text:p>y</text:p>
    </office:text>"#;
    let config = ConversionConfig::new()
        .with_split_level(2)
        .with_repeat_levels(1);
    let conversion = run(xml, &StyleCatalog::new(), &config);
    assert_eq!(conversion.units.len(), 3);
    assert!(conversion.units[2].text().starts_with("Part"));
    assert!(conversion.units[2].text().ends_with("Twoy"));
}

fn document(blocks: &[(u8, String)]) -> String {
    let mut xml = String::from("<office:text>");
    for (level, text) in blocks {
        if *level == 0 {
            xml.push_str(&format!("<text:p>{}</text:p>", text));
        } else {
            xml.push_str(&format!(
                r#"<text:h text:outline-level="{}">{}</text:h>"#,
                level, text
            ));
        }
    }
    xml.push_str("</office:text>");
    xml
}

proptest! {
    #[test]
    fn prop_content_is_preserved_across_splits(
        blocks in prop::collection::vec((0u8..4, "[a-z]{1,12}"), 1..40),
        split_level in 0u8..4,
        threshold in 5usize..120,
    ) {
        let xml = document(&blocks);
        let styles = StyleCatalog::new();

        let whole = run(&xml, &styles, &ConversionConfig::new().with_split_level(0));
        prop_assert_eq!(whole.units.len(), 1);

        let config = ConversionConfig::epub()
            .with_split_level(split_level)
            .with_char_split_threshold(Some(threshold));
        let split = run(&xml, &styles, &config);

        prop_assert_eq!(split.text(), whole.text());
        for (i, unit) in split.units.iter().enumerate() {
            prop_assert_eq!(unit.index, i);
        }
        let expected: String = blocks.iter().map(|(_, t)| t.as_str()).collect();
        prop_assert_eq!(whole.text(), expected);
    }
}
