//! Output units and their file names.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::UnitTemplate;
use crate::dom::{NodeId, OutputTree};

/// Characters left unescaped in unit file names used as hrefs.
const FILE_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Insertion point threaded through traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    /// Index of the unit being written.
    pub unit: usize,
    /// Element new content is appended to.
    pub node: NodeId,
}

impl Cursor {
    pub fn new(unit: usize, node: NodeId) -> Self {
        Self { unit, node }
    }

    /// Same unit, different insertion element.
    pub fn at(self, node: NodeId) -> Self {
        Self { node, ..self }
    }
}

/// One emitted output document.
#[derive(Debug, Clone)]
pub struct OutputUnit {
    /// Stable index assigned at creation.
    pub index: usize,
    pub title: Option<String>,
    /// Outline level of the heading that started this unit.
    pub outline_level: Option<u8>,
    /// Characters of visible text written into this unit.
    pub char_count: usize,
    pub contains_math: bool,
    pub tree: OutputTree,
    /// Main content container.
    pub content: NodeId,
    pub header: Option<NodeId>,
    pub footer: Option<NodeId>,
    pub panel: Option<NodeId>,
}

impl OutputUnit {
    /// Create a unit and build its shell from the template.
    pub fn new(index: usize, template: &UnitTemplate) -> Self {
        let mut tree = OutputTree::new("body");
        let root = tree.root();
        let header = template
            .header
            .then(|| tree.element_with(root, "header", &[("class", "header")]));
        let panel = template
            .panel
            .then(|| tree.element_with(root, "aside", &[("class", "panel")]));
        let content = if template.header || template.footer || template.panel {
            tree.element_with(root, "div", &[("class", "content")])
        } else {
            root
        };
        let footer = template
            .footer
            .then(|| tree.element_with(root, "footer", &[("class", "footer")]));

        Self {
            index,
            title: None,
            outline_level: None,
            char_count: 0,
            contains_math: false,
            tree,
            content,
            header,
            footer,
            panel,
        }
    }

    /// Visible text of the content container.
    pub fn text(&self) -> String {
        self.tree.text_content(self.content)
    }

    /// Markup of the whole unit (shell included).
    pub fn to_markup(&self) -> String {
        self.tree.to_markup(self.tree.root())
    }
}

/// Unit file naming: unit 0 is `<base>.<ext>`, unit n is `<base><n>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitNaming {
    pub base: String,
    pub extension: String,
}

impl UnitNaming {
    pub fn new(base: &str, extension: &str) -> Self {
        Self {
            base: base.to_string(),
            extension: extension.to_string(),
        }
    }

    /// File name of a unit as written to disk.
    pub fn file_name(&self, index: usize) -> String {
        if index == 0 {
            format!("{}.{}", self.base, self.extension)
        } else {
            format!("{}{}.{}", self.base, index, self.extension)
        }
    }

    /// File name of a unit as used inside an href.
    pub fn href(&self, index: usize) -> String {
        utf8_percent_encode(&self.file_name(index), FILE_NAME).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let naming = UnitNaming::new("my book", "xhtml");
        assert_eq!(naming.file_name(0), "my book.xhtml");
        assert_eq!(naming.file_name(2), "my book2.xhtml");
        assert_eq!(naming.href(2), "my%20book2.xhtml");
    }

    #[test]
    fn test_shell_without_template() {
        let unit = OutputUnit::new(0, &UnitTemplate::default());
        assert_eq!(unit.content, unit.tree.root());
        assert!(unit.header.is_none());
    }

    #[test]
    fn test_shell_with_template() {
        let template = UnitTemplate {
            header: true,
            footer: true,
            panel: false,
            navigation: true,
        };
        let unit = OutputUnit::new(3, &template);
        let children: Vec<_> = unit.tree.children(unit.tree.root()).collect();
        assert_eq!(children.len(), 3);
        assert_eq!(unit.tree.tag(children[0]), Some("header"));
        assert_eq!(children[1], unit.content);
        assert_eq!(unit.tree.tag(children[2]), Some("footer"));
    }
}
