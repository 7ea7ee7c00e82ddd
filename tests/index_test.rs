//! Generated indexes: tables of contents, alphabetical and user indexes,
//! bibliographies.

use odflow::{
    Conversion, ConversionConfig, OutputUnit, SourceStyle, SourceTree, StyleCatalog,
    StyleFamily, convert,
};

fn run(xml: &str, styles: &StyleCatalog, config: &ConversionConfig) -> Conversion {
    let source = SourceTree::from_xml(xml).expect("fixture should parse");
    convert(&source, styles, config).expect("conversion should succeed")
}

/// `(class, text, href)` of every line in the first container with `class`.
fn lines(unit: &OutputUnit, class: &str) -> Vec<(String, String, Option<String>)> {
    let tree = &unit.tree;
    let container = tree
        .find_by_attr(unit.content, "class", class)
        .expect("index container");
    let entries = tree
        .find_by_attr(container, "class", "index-entries")
        .expect("entries container");
    tree.children(entries)
        .map(|p| {
            let href = tree
                .elements_by_tag(p, "a")
                .first()
                .and_then(|&a| tree.attr(a, "href"))
                .map(str::to_string);
            (
                tree.attr(p, "class").unwrap_or_default().to_string(),
                tree.text_content(p),
                href,
            )
        })
        .collect()
}

#[test]
fn test_alphabetical_keys_shown_once() {
    let xml = r##"<office:text>
        <text:p>Money<text:alphabetical-index-mark text:string-value="Finance" text:key1="Bank"/></text:p>
        <text:p>Water<text:alphabetical-index-mark text:string-value="River" text:key1="Bank"/></text:p>
        <text:alphabetical-index text:name="Index">
          <text:alphabetical-index-source/>
          <text:index-body>
            <text:index-title><text:p>Index</text:p></text:index-title>
            <text:p>stale entry</text:p>
          </text:index-body>
        </text:alphabetical-index>
    </office:text>"##;
    let conversion = run(xml, &StyleCatalog::new(), &ConversionConfig::new());
    let unit = &conversion.units[0];
    let lines = lines(unit, "alphabetical-index");
    assert_eq!(
        lines,
        [
            ("index-key1".to_string(), "Bank".to_string(), None),
            (
                "index-level2".to_string(),
                "Finance".to_string(),
                Some("#idx0".to_string())
            ),
            (
                "index-level2".to_string(),
                "River".to_string(),
                Some("#idx1".to_string())
            ),
        ]
    );
    assert!(!unit.text().contains("stale entry"));
    assert!(unit.text().contains("Index"));
}

#[test]
fn test_alphabetical_order_ignores_case_and_accents() {
    let xml = r#"<office:text>
        <text:p><text:alphabetical-index-mark text:string-value="zebra"/>
          <text:alphabetical-index-mark text:string-value="Émile"/>
          <text:alphabetical-index-mark text:string-value="apple"/>
          <text:alphabetical-index-mark text:string-value="Eagle"/></text:p>
        <text:alphabetical-index>
          <text:alphabetical-index-source text:alphabetical-separators="true"/>
          <text:index-body/>
        </text:alphabetical-index>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new(), &ConversionConfig::new());
    let texts: Vec<String> = lines(&conversion.units[0], "alphabetical-index")
        .into_iter()
        .map(|(_, text, _)| text)
        .collect();
    assert_eq!(texts, ["A", "apple", "E", "Eagle", "Émile", "Z", "zebra"]);
}

#[test]
fn test_ranged_mark_uses_enclosed_text() {
    let xml = r#"<office:text>
        <text:p><text:alphabetical-index-mark-start text:id="m1"/>Glossary term<text:alphabetical-index-mark-end text:id="m1"/> in text</text:p>
        <text:alphabetical-index>
          <text:alphabetical-index-source/>
          <text:index-body/>
        </text:alphabetical-index>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new(), &ConversionConfig::new());
    let lines = lines(&conversion.units[0], "alphabetical-index");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].1, "Glossary term");
    assert_eq!(conversion.units[0].text().matches("Glossary term").count(), 2);
}

#[test]
fn test_toc_links_across_units() {
    let xml = r#"<office:text>
        <text:table-of-content text:name="Contents">
          <text:table-of-content-source text:outline-level="2"/>
          <text:index-body>
            <text:index-title><text:p>Contents</text:p></text:index-title>
          </text:index-body>
        </text:table-of-content>
        <text:h text:outline-level="1">Alpha</text:h>
        <text:h text:outline-level="2">Alpha one</text:h>
        <text:h text:outline-level="3">Too deep</text:h>
        <text:h text:outline-level="1">Beta</text:h>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new(), &ConversionConfig::new());
    assert_eq!(conversion.units.len(), 3);
    let toc = lines(&conversion.units[0], "toc");
    assert_eq!(
        toc,
        [
            (
                "toc-level1".to_string(),
                "Alpha".to_string(),
                Some("document1.xhtml#toc0".to_string())
            ),
            (
                "toc-level2".to_string(),
                "Alpha one".to_string(),
                Some("document1.xhtml#toc1".to_string())
            ),
            (
                "toc-level1".to_string(),
                "Beta".to_string(),
                Some("document2.xhtml#toc3".to_string())
            ),
        ]
    );
}

#[test]
fn test_toc_by_chapter() {
    let xml = r#"<office:text>
        <text:h text:outline-level="1">One</text:h>
        <text:h text:outline-level="2">One a</text:h>
        <text:h text:outline-level="1">Two</text:h>
        <text:table-of-content>
          <text:table-of-content-source text:index-scope="chapter"/>
          <text:index-body/>
        </text:table-of-content>
        <text:h text:outline-level="2">Two a</text:h>
    </office:text>"#;
    let config = ConversionConfig::new().with_split_level(0);
    let conversion = run(xml, &StyleCatalog::new(), &config);
    let texts: Vec<String> = lines(&conversion.units[0], "toc")
        .into_iter()
        .map(|(_, text, _)| text)
        .collect();
    assert_eq!(texts, ["Two", "Two a"]);
}

#[test]
fn test_toc_source_styles() {
    let styles = StyleCatalog::new()
        .with(SourceStyle::named(StyleFamily::Paragraph, "Caption"))
        .with(SourceStyle::automatic(
            StyleFamily::Paragraph,
            "P5",
            Some("Caption"),
        ));
    let xml = r#"<office:text>
        <text:table-of-content>
          <text:table-of-content-source text:use-index-source-styles="true" text:use-outline-level="false">
            <text:index-source-styles text:outline-level="2">
              <text:index-source-style text:style-name="Caption"/>
            </text:index-source-styles>
          </text:table-of-content-source>
          <text:index-body/>
        </text:table-of-content>
        <text:h text:outline-level="1">Heading</text:h>
        <text:p text:style-name="P5">Figure one</text:p>
        <text:p>plain</text:p>
    </office:text>"#;
    let config = ConversionConfig::new().with_split_level(0);
    let conversion = run(xml, &styles, &config);
    let toc = lines(&conversion.units[0], "toc");
    assert_eq!(toc.len(), 1);
    assert_eq!(toc[0].0, "toc-level2");
    assert_eq!(toc[0].1, "Figure one");
}

#[test]
fn test_user_index_by_name() {
    let xml = r#"<office:text>
        <text:p>a<text:user-index-mark text:string-value="Cats" text:index-name="Animals"/></text:p>
        <text:p>b<text:user-index-mark text:string-value="Oak" text:index-name="Trees"/></text:p>
        <text:user-index text:name="Animals index">
          <text:user-index-source text:index-name="Animals"/>
          <text:index-body/>
        </text:user-index>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new(), &ConversionConfig::new());
    let lines = lines(&conversion.units[0], "user-index");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].1, "Cats");
}

#[test]
fn test_bibliography_entries() {
    let xml = r#"<office:text>
        <text:p>As shown <text:bibliography-mark text:identifier="Knu84" text:author="Knuth" text:title="Literate Programming" text:year="1984">[1]</text:bibliography-mark>
          and <text:bibliography-mark text:identifier="Dij68" text:author="Dijkstra" text:title="Go To Statement" text:year="1968">[2]</text:bibliography-mark>
          again <text:bibliography-mark text:identifier="Knu84" text:author="Knuth">[1]</text:bibliography-mark></text:p>
        <text:bibliography>
          <text:bibliography-source/>
          <text:index-body/>
        </text:bibliography>
    </office:text>"#;
    let conversion = run(xml, &StyleCatalog::new(), &ConversionConfig::new());
    let lines = lines(&conversion.units[0], "bibliography");
    let texts: Vec<&str> = lines.iter().map(|(_, t, _)| t.as_str()).collect();
    assert_eq!(
        texts,
        [
            "[Dij68] Dijkstra: Go To Statement, 1968",
            "[Knu84] Knuth: Literate Programming, 1984",
        ]
    );
    assert_eq!(lines[1].2.as_deref(), Some("#bib0"));
}

#[test]
fn test_disabled_index_keeps_static_body() {
    let xml = r#"<office:text>
        <text:h text:outline-level="1">Only</text:h>
        <text:table-of-content>
          <text:table-of-content-source/>
          <text:index-body><text:p>Only ..... 1</text:p></text:index-body>
        </text:table-of-content>
    </office:text>"#;
    let config = ConversionConfig::new().with_indexes(false);
    let conversion = run(xml, &StyleCatalog::new(), &config);
    assert!(conversion.units[0].text().contains("Only ..... 1"));
    assert!(
        conversion.units[0]
            .tree
            .find_by_attr(conversion.units[0].content, "class", "index-entries")
            .is_none()
    );
}

#[test]
fn test_conversion_is_deterministic() {
    let xml = r#"<office:text>
        <text:table-of-content><text:table-of-content-source/><text:index-body/></text:table-of-content>
        <text:h text:outline-level="1">A</text:h>
        <text:p>x<text:alphabetical-index-mark text:string-value="word"/></text:p>
        <text:h text:outline-level="1">B</text:h>
        <text:alphabetical-index><text:alphabetical-index-source/><text:index-body/></text:alphabetical-index>
    </office:text>"#;
    let first = run(xml, &StyleCatalog::new(), &ConversionConfig::new());
    let second = run(xml, &StyleCatalog::new(), &ConversionConfig::new());
    let markup = |c: &Conversion| c.units.iter().map(OutputUnit::to_markup).collect::<Vec<_>>();
    assert_eq!(markup(&first), markup(&second));
}
