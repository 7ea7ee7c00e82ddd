//! In-memory source tree.
//!
//! The tree uses a parent-pointer / first-child / next-sibling representation,
//! populated once by a reader and then only borrowed by the converter.

use super::kind::NodeKind;

/// Handle to a node within a [`SourceTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

impl SourceId {
    /// The root node ID (always 0).
    pub const ROOT: SourceId = SourceId(0);
}

/// Upper bound for the `text:c` run length of a space element.
pub const MAX_SPACES: u32 = 1024;

/// A node of the source document.
#[derive(Debug, Clone)]
pub struct SourceNode {
    /// Classified element kind (`Text` / `Comment` for character data).
    pub kind: NodeKind,
    /// Qualified element name (empty for text and comments).
    pub name: String,
    /// Attributes in document order, keyed by qualified name.
    pub attrs: Vec<(String, String)>,
    /// Character data (text and comment nodes only).
    pub text: String,
    pub parent: Option<SourceId>,
    pub first_child: Option<SourceId>,
    pub last_child: Option<SourceId>,
    pub next_sibling: Option<SourceId>,
}

impl SourceNode {
    fn new(kind: NodeKind, name: String) -> Self {
        Self {
            kind,
            name,
            attrs: Vec::new(),
            text: String::new(),
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
        }
    }
}

/// Read-only view over a parsed ODF body.
#[derive(Debug, Clone)]
pub struct SourceTree {
    nodes: Vec<SourceNode>,
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceTree {
    /// Create a tree whose root is an empty `office:text` element.
    pub fn new() -> Self {
        Self {
            nodes: vec![SourceNode::new(NodeKind::Body, "office:text".to_string())],
        }
    }

    /// Create a tree whose root element has the given name.
    pub fn with_root(name: &str) -> Self {
        Self {
            nodes: vec![SourceNode::new(NodeKind::from_name(name), name.to_string())],
        }
    }

    pub fn root(&self) -> SourceId {
        SourceId::ROOT
    }

    pub fn node(&self, id: SourceId) -> Option<&SourceNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1 && self.nodes[0].first_child.is_none()
    }

    /// Kind of a node; `Unknown` for invalid handles.
    pub fn kind(&self, id: SourceId) -> NodeKind {
        self.node(id).map(|n| n.kind).unwrap_or(NodeKind::Unknown)
    }

    /// Qualified name of an element.
    pub fn name(&self, id: SourceId) -> &str {
        self.node(id).map(|n| n.name.as_str()).unwrap_or("")
    }

    /// Look up an attribute by qualified name.
    pub fn attr(&self, id: SourceId, name: &str) -> Option<&str> {
        self.node(id)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute parsed as a boolean (`"true"`).
    pub fn attr_flag(&self, id: SourceId, name: &str) -> bool {
        self.attr(id, name) == Some("true")
    }

    /// Attribute parsed as an unsigned integer; malformed values are absent.
    pub fn attr_u32(&self, id: SourceId, name: &str) -> Option<u32> {
        let value = self.attr(id, name)?;
        match value.trim().parse() {
            Ok(n) => Some(n),
            Err(_) => {
                log::warn!("ignoring malformed {}=\"{}\"", name, value);
                None
            }
        }
    }

    pub fn parent(&self, id: SourceId) -> Option<SourceId> {
        self.node(id)?.parent
    }

    /// Add an element under `parent`.
    pub fn add_element(&mut self, parent: SourceId, name: &str, attrs: &[(&str, &str)]) -> SourceId {
        let mut node = SourceNode::new(NodeKind::from_name(name), name.to_string());
        node.attrs = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.push(parent, node)
    }

    /// Add a text node under `parent`.
    pub fn add_text(&mut self, parent: SourceId, text: &str) -> SourceId {
        let mut node = SourceNode::new(NodeKind::Text, String::new());
        node.text = text.to_string();
        self.push(parent, node)
    }

    /// Add a comment node under `parent`.
    pub fn add_comment(&mut self, parent: SourceId, text: &str) -> SourceId {
        let mut node = SourceNode::new(NodeKind::Comment, String::new());
        node.text = text.to_string();
        self.push(parent, node)
    }

    /// Extend an existing text node.
    pub(crate) fn append_to_text(&mut self, id: SourceId, text: &str) {
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            node.text.push_str(text);
        }
    }

    /// Set (or replace) an attribute on an existing element.
    pub fn set_attr(&mut self, id: SourceId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            match node.attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => node.attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn push(&mut self, parent: SourceId, mut node: SourceNode) -> SourceId {
        let id = SourceId(self.nodes.len() as u32);
        node.parent = Some(parent);
        self.nodes.push(node);

        let previous = self
            .nodes
            .get(parent.0 as usize)
            .and_then(|p| p.last_child);
        if let Some(prev) = previous {
            self.nodes[prev.0 as usize].next_sibling = Some(id);
        } else if let Some(p) = self.nodes.get_mut(parent.0 as usize) {
            p.first_child = Some(id);
        }
        if let Some(p) = self.nodes.get_mut(parent.0 as usize) {
            p.last_child = Some(id);
        }
        id
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: SourceId) -> SourceChildren<'_> {
        SourceChildren {
            tree: self,
            current: self.node(parent).and_then(|n| n.first_child),
        }
    }

    /// First child element of the given kind.
    pub fn child_of_kind(&self, parent: SourceId, kind: NodeKind) -> Option<SourceId> {
        self.children(parent).find(|&c| self.kind(c) == kind)
    }

    /// Find the first descendant (including `id` itself) of the given kind.
    pub fn find_kind(&self, id: SourceId, kind: NodeKind) -> Option<SourceId> {
        self.find(id, &|node| node.kind == kind)
    }

    /// Find the first descendant (including `id` itself) with a qualified name.
    pub fn find_named(&self, id: SourceId, name: &str) -> Option<SourceId> {
        self.find(id, &|node| node.name == name)
    }

    fn find(&self, id: SourceId, matches: &dyn Fn(&SourceNode) -> bool) -> Option<SourceId> {
        if self.node(id).is_some_and(matches) {
            return Some(id);
        }
        self.children(id).find_map(|c| self.find(c, matches))
    }

    /// Run length of a `text:s` element, capped at [`MAX_SPACES`].
    pub fn space_count(&self, id: SourceId) -> usize {
        self.attr_u32(id, "text:c").unwrap_or(1).clamp(1, MAX_SPACES) as usize
    }

    /// Concatenated character data below a node, skipping notes and annotations.
    pub fn text_content(&self, id: SourceId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: SourceId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match node.kind {
            NodeKind::Text => out.push_str(&node.text),
            NodeKind::Space => out.extend(std::iter::repeat_n(' ', self.space_count(id))),
            NodeKind::Tab | NodeKind::LineBreak => out.push(' '),
            NodeKind::Note | NodeKind::Annotation | NodeKind::Comment => {}
            _ => {
                for child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

/// Iterator over the children of a source node.
pub struct SourceChildren<'a> {
    tree: &'a SourceTree,
    current: Option<SourceId>,
}

impl Iterator for SourceChildren<'_> {
    type Item = SourceId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}
