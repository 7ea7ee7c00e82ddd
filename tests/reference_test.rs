//! Deferred cross-references: links, bookmarks, page references and notes.

use odflow::{
    Conversion, ConversionConfig, ListLevelStyle, ListStyle, NodeId, NumFormat, OutputUnit,
    SourceTree, StyleCatalog, convert,
};

fn run(xml: &str, styles: &StyleCatalog) -> Conversion {
    let source = SourceTree::from_xml(xml).expect("fixture should parse");
    convert(&source, styles, &ConversionConfig::new()).expect("conversion should succeed")
}

fn links(unit: &OutputUnit) -> Vec<NodeId> {
    unit.tree.elements_by_tag(unit.content, "a")
}

fn hrefs(unit: &OutputUnit) -> Vec<Option<String>> {
    links(unit)
        .into_iter()
        .map(|a| unit.tree.attr(a, "href").map(str::to_string))
        .collect()
}

#[test]
fn test_cross_unit_and_same_unit_links() {
    let xml = r##"<office:text>
        <text:h text:outline-level="1">One</text:h>
        <text:p><text:a xlink:href="#far">far</text:a></text:p>
        <text:h text:outline-level="1">Two</text:h>
        <text:p>x</text:p>
        <text:h text:outline-level="1">Three</text:h>
        <text:p><text:bookmark text:name="far"/>target <text:a xlink:href="#far">near</text:a></text:p>
    </office:text>"##;
    let conversion = run(xml, &StyleCatalog::new());
    assert_eq!(conversion.units.len(), 3);
    assert_eq!(hrefs(&conversion.units[0]), [Some("document2.xhtml#far".to_string())]);

    let last = &conversion.units[2];
    let last_hrefs: Vec<_> = hrefs(last).into_iter().flatten().collect();
    assert_eq!(last_hrefs, ["#far"]);
}

#[test]
fn test_every_request_resolved_once() {
    let xml = r##"<office:text>
        <text:p><text:bookmark text:name="a"/>a <text:a xlink:href="#b">to b</text:a></text:p>
        <text:h text:outline-level="1">B</text:h>
        <text:p><text:bookmark text:name="b"/>b <text:a xlink:href="#a">to a</text:a> <text:a xlink:href="#missing">lost</text:a></text:p>
    </office:text>"##;
    let conversion = run(xml, &StyleCatalog::new());
    assert_eq!(conversion.links.resolved, ["b", "a"]);
    assert_eq!(conversion.unresolved_links(), ["missing"]);

    let second = &conversion.units[1];
    let lost = links(second)
        .into_iter()
        .find(|&a| second.tree.text_content(a) == "lost")
        .unwrap();
    assert_eq!(second.tree.attr(lost, "href"), None);
}

#[test]
fn test_external_links_written_directly() {
    let xml = r#"<office:text>
        <text:p><text:a xlink:href="https://example.com/a%20b">web</text:a></text:p>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new());
    assert_eq!(
        hrefs(&conversion.units[0]),
        [Some("https://example.com/a%20b".to_string())]
    );
    assert!(conversion.links.resolved.is_empty());
}

#[test]
fn test_page_reference_appends_unit_number() {
    let xml = r#"<office:text>
        <text:p>see page <text:reference-ref text:ref-name="fig" text:reference-format="page">12</text:reference-ref></text:p>
        <text:h text:outline-level="1">Later</text:h>
        <text:p><text:reference-mark text:name="fig"/>figure</text:p>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new());
    assert_eq!(conversion.units[0].text(), "see page 2");
    assert_eq!(
        hrefs(&conversion.units[0]),
        [Some("document1.xhtml#fig".to_string())]
    );
}

#[test]
fn test_text_reference_keeps_its_text() {
    let xml = r#"<office:text>
        <text:p><text:bookmark text:name="here"/>x</text:p>
        <text:p>see <text:bookmark-ref text:ref-name="here" text:reference-format="text">the text</text:bookmark-ref></text:p>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new());
    assert_eq!(conversion.units[0].text(), "xsee the text");
    assert!(conversion.unresolved_links().is_empty());
}

#[test]
fn test_outline_link_targets_heading() {
    let styles = StyleCatalog::new().with_outline_style(ListStyle::new(
        "Outline",
        vec![ListLevelStyle::number(NumFormat::Arabic)],
    ));
    let xml = r##"<office:text>
        <text:h text:outline-level="1">Intro</text:h>
        <text:p><text:a xlink:href="#2.Usage|outline">usage</text:a></text:p>
        <text:h text:outline-level="1">Usage</text:h>
    </office:text>"##;
    let conversion = run(xml, &styles);
    assert_eq!(
        hrefs(&conversion.units[0]),
        [Some("document1.xhtml#toc1".to_string())]
    );
    assert_eq!(conversion.units[1].text(), "2. Usage");
}

#[test]
fn test_note_reference_links_to_note() {
    let xml = r#"<office:text>
        <text:p>x<text:note text:id="ftn7" text:note-class="footnote"><text:note-citation>1</text:note-citation><text:note-body><text:p>body</text:p></text:note-body></text:note></text:p>
        <text:p>see note <text:note-ref text:note-class="footnote" text:ref-name="ftn7" text:reference-format="text">1</text:note-ref></text:p>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new());
    let unit = &conversion.units[0];
    let all: Vec<_> = hrefs(unit).into_iter().flatten().collect();
    assert_eq!(all.iter().filter(|h| *h == "#note-ftn7").count(), 2);
    assert!(all.contains(&"#noteref-ftn7".to_string()));
    assert!(conversion.unresolved_links().is_empty());
}
