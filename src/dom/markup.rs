//! Markup writer for output trees.
//!
//! Produces XHTML-style text for a subtree. No XML declaration or DOCTYPE is
//! written; wrapping units into documents and packages is the caller's job.

use std::fmt::Write;

use quick_xml::escape::escape;

use super::{Content, NodeId, OutputTree};

/// Elements written as `<tag/>`.
fn is_void(tag: &str) -> bool {
    matches!(tag, "br" | "img" | "hr" | "col" | "meta" | "link")
}

/// Elements placed on their own line.
fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "body"
            | "div"
            | "section"
            | "p"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "li"
            | "table"
            | "thead"
            | "tbody"
            | "tr"
            | "td"
            | "th"
            | "colgroup"
            | "aside"
            | "header"
            | "footer"
            | "nav"
            | "hr"
            | "blockquote"
    )
}

impl OutputTree {
    /// Render the subtree rooted at `id` as markup text.
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.content {
            Content::Text(t) => out.push_str(&escape(t.as_str())),
            Content::Comment(c) => {
                // "--" is not allowed inside XML comments
                let _ = write!(out, "<!--{}-->", c.replace("--", "- -"));
            }
            Content::Element { tag, attrs } => {
                let block = is_block(tag);
                out.push('<');
                out.push_str(tag);
                for (k, v) in attrs {
                    let _ = write!(out, " {}=\"{}\"", k, escape(v.as_str()));
                }
                if is_void(tag) && node.first_child.is_none() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for child in self.children(id) {
                        self.write_node(child, out);
                    }
                    let _ = write!(out, "</{}>", tag);
                }
                if block {
                    out.push('\n');
                }
            }
        }
    }
}
