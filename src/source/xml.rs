//! Loading a [`SourceTree`] from `content.xml`-style markup.
//!
//! Only the `office:text` subtree is kept. Whitespace-only text that contains
//! a line break is treated as indentation and dropped.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::kind::NodeKind;
use super::tree::{SourceId, SourceTree};
use crate::error::{Error, Result};
use crate::util::{decode_text, resolve_entity, unescape_attr, xml_declared_encoding};

impl SourceTree {
    /// Parse a document (or fragment) and keep its `office:text` body.
    ///
    /// Returns [`Error::MissingBody`] when no `office:text` element exists.
    pub fn from_xml(xml: &str) -> Result<SourceTree> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut tree: Option<SourceTree> = None;
        // Open elements inside the body; empty while outside it.
        let mut stack: Vec<SourceId> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = qualified_name(&e);
                    if let Some(&parent) = stack.last() {
                        let id = add_element(tree.as_mut(), parent, &name, &e)?;
                        stack.push(id);
                    } else if tree.is_none() && name == "office:text" {
                        let mut body = SourceTree::new();
                        copy_attrs(&mut body, SourceId::ROOT, &e)?;
                        tree = Some(body);
                        stack.push(SourceId::ROOT);
                    }
                }
                Event::Empty(e) => {
                    let name = qualified_name(&e);
                    if let Some(&parent) = stack.last() {
                        add_element(tree.as_mut(), parent, &name, &e)?;
                    } else if tree.is_none() && name == "office:text" {
                        let mut body = SourceTree::new();
                        copy_attrs(&mut body, SourceId::ROOT, &e)?;
                        tree = Some(body);
                    }
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(e) => {
                    if let (Some(&parent), Some(t)) = (stack.last(), tree.as_mut()) {
                        let text = String::from_utf8_lossy(e.as_ref());
                        if is_indentation(&text) {
                            continue;
                        }
                        push_text(t, parent, &text);
                    }
                }
                Event::CData(e) => {
                    if let (Some(&parent), Some(t)) = (stack.last(), tree.as_mut()) {
                        push_text(t, parent, &String::from_utf8_lossy(&e));
                    }
                }
                Event::GeneralRef(e) => {
                    if let (Some(&parent), Some(t)) = (stack.last(), tree.as_mut()) {
                        let entity = String::from_utf8_lossy(e.as_ref());
                        if let Some(resolved) = resolve_entity(&entity) {
                            push_text(t, parent, &resolved);
                        }
                    }
                }
                Event::Comment(e) => {
                    if let (Some(&parent), Some(t)) = (stack.last(), tree.as_mut()) {
                        t.add_comment(parent, &String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        tree.ok_or(Error::MissingBody)
    }

    /// Decode raw bytes (UTF-8, declared encoding, or Windows-1252) and parse them.
    pub fn from_xml_bytes(bytes: &[u8]) -> Result<SourceTree> {
        let declared = xml_declared_encoding(bytes);
        if let Some(label) = &declared
            && encoding_rs::Encoding::for_label(label.as_bytes()).is_none()
        {
            return Err(Error::Encoding(label.clone()));
        }
        let text = decode_text(bytes, declared.as_deref());
        Self::from_xml(&text)
    }
}

fn qualified_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn add_element(
    tree: Option<&mut SourceTree>,
    parent: SourceId,
    name: &str,
    e: &BytesStart<'_>,
) -> Result<SourceId> {
    let Some(tree) = tree else {
        return Err(Error::MissingBody);
    };
    let id = tree.add_element(parent, name, &[]);
    copy_attrs(tree, id, e)?;
    Ok(id)
}

fn copy_attrs(tree: &mut SourceTree, id: SourceId, e: &BytesStart<'_>) -> Result<()> {
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref());
        if key.starts_with("xmlns") {
            continue;
        }
        let raw = String::from_utf8_lossy(&attr.value);
        tree.set_attr(id, &key, &unescape_attr(&raw));
    }
    Ok(())
}

/// Merge adjacent character data so entity references do not split text nodes.
fn push_text(tree: &mut SourceTree, parent: SourceId, text: &str) {
    let last = tree.node(parent).and_then(|p| p.last_child);
    if let Some(last) = last
        && tree.kind(last) == NodeKind::Text
    {
        tree.append_to_text(last, text);
        return;
    }
    tree.add_text(parent, text);
}

fn is_indentation(text: &str) -> bool {
    text.contains('\n') && text.chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_body_only() {
        let xml = r#"<office:document-content xmlns:office="o" xmlns:text="t">
            <office:automatic-styles/>
            <office:body>
              <office:text>
                <text:p text:style-name="P1">Fish &amp; chips</text:p>
                <text:h text:outline-level="1">Title</text:h>
              </office:text>
            </office:body>
          </office:document-content>"#;
        let tree = SourceTree::from_xml(xml).unwrap();
        let children: Vec<_> = tree.children(tree.root()).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(tree.kind(children[0]), NodeKind::Paragraph);
        assert_eq!(tree.text_content(children[0]), "Fish & chips");
        assert_eq!(tree.attr(children[1], "text:outline-level"), Some("1"));
    }

    #[test]
    fn test_missing_body_is_fatal() {
        let err = SourceTree::from_xml("<office:document/>").unwrap_err();
        assert!(matches!(err, Error::MissingBody));
    }

    #[test]
    fn test_keeps_inline_spaces() {
        let xml = r#"<office:text><text:p>a <text:span>b</text:span> c</text:p></office:text>"#;
        let tree = SourceTree::from_xml(xml).unwrap();
        let p = tree.children(tree.root()).next().unwrap();
        assert_eq!(tree.text_content(p), "a b c");
    }

    #[test]
    fn test_from_bytes_with_declared_encoding() {
        let mut bytes = br#"<?xml version="1.0" encoding="ISO-8859-1"?><office:text><text:p>caf"#.to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"</text:p></office:text>");
        let tree = SourceTree::from_xml_bytes(&bytes).unwrap();
        let p = tree.children(tree.root()).next().unwrap();
        assert_eq!(tree.text_content(p), "café");
    }
}
