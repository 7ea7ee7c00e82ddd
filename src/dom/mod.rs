//! Output node trees.
//!
//! Every output unit owns one [`OutputTree`]: an arena of element, text and
//! comment nodes with parent / first-child / next-sibling links. The walker
//! appends to it, the index generator clears and refills reserved containers,
//! and the reference resolver patches `href` attributes in place.

mod markup;

/// Unique identifier for a node within an [`OutputTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root node ID (always 0).
    pub const ROOT: NodeId = NodeId(0);
}

/// What an output node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

/// A node in an output tree.
#[derive(Debug, Clone)]
pub struct OutputNode {
    pub content: Content,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl OutputNode {
    fn new(content: Content) -> Self {
        Self {
            content,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
        }
    }
}

/// Arena-backed output tree (index 0 is the root element).
#[derive(Debug, Clone)]
pub struct OutputTree {
    nodes: Vec<OutputNode>,
}

impl Default for OutputTree {
    fn default() -> Self {
        Self::new("body")
    }
}

impl OutputTree {
    /// Create a tree with a single root element.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![OutputNode::new(Content::Element {
                tag: root_tag.to_string(),
                attrs: Vec::new(),
            })],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&OutputNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Tag name of an element node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.content {
            Content::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Append a new element under `parent`.
    pub fn element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.append(
            parent,
            Content::Element {
                tag: tag.to_string(),
                attrs: Vec::new(),
            },
        )
    }

    /// Append a new element with attributes.
    pub fn element_with(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.element(parent, tag);
        for (k, v) in attrs {
            self.set_attr(id, k, v);
        }
        id
    }

    /// Append text under `parent`, merging with a preceding text sibling.
    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        if let Some(last) = self.node(parent).and_then(|p| p.last_child)
            && let Some(Content::Text(existing)) =
                self.nodes.get_mut(last.0 as usize).map(|n| &mut n.content)
        {
            existing.push_str(text);
            return last;
        }
        self.append(parent, Content::Text(text.to_string()))
    }

    /// Append a comment under `parent`.
    pub fn comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, Content::Comment(text.to_string()))
    }

    fn append(&mut self, parent: NodeId, content: Content) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = OutputNode::new(content);
        node.parent = Some(parent);
        self.nodes.push(node);

        let previous = self.node(parent).and_then(|p| p.last_child);
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

    /// Set (or replace) an attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(OutputNode {
            content: Content::Element { attrs, .. },
            ..
        }) = self.nodes.get_mut(id.0 as usize)
        {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id)?.content {
            Content::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(OutputNode {
            content: Content::Element { attrs, .. },
            ..
        }) = self.nodes.get_mut(id.0 as usize)
        {
            attrs.retain(|(k, _)| k != name);
        }
    }

    /// Detach every child of `id`. Detached nodes stay in the arena but are
    /// no longer reachable from the root.
    pub fn clear_children(&mut self, id: NodeId) {
        let mut child = self.node(id).and_then(|n| n.first_child);
        while let Some(c) = child {
            child = self.nodes[c.0 as usize].next_sibling;
            let node = &mut self.nodes[c.0 as usize];
            node.parent = None;
            node.next_sibling = None;
        }
        if let Some(node) = self.nodes.get_mut(id.0 as usize) {
            node.first_child = None;
            node.last_child = None;
        }
    }

    /// Whether `id` has any attached children.
    pub fn has_children(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.first_child.is_some())
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.node(parent).and_then(|n| n.first_child),
        }
    }

    /// Iterate over `id` and its attached descendants in document order.
    pub fn descendants(&self, id: NodeId) -> DfsIter<'_> {
        DfsIter {
            tree: self,
            stack: vec![id],
        }
    }

    /// First element below `id` (inclusive) carrying `name="value"`.
    pub fn find_by_attr(&self, id: NodeId, name: &str, value: &str) -> Option<NodeId> {
        self.descendants(id)
            .find(|&n| self.attr(n, name) == Some(value))
    }

    /// All elements below `id` (inclusive) with the given tag.
    pub fn elements_by_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(id)
            .filter(|&n| self.tag(n) == Some(tag))
            .collect()
    }

    /// Concatenated text below a node (comments excluded).
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for n in self.descendants(id) {
            if let Some(OutputNode {
                content: Content::Text(t),
                ..
            }) = self.node(n)
            {
                out.push_str(t);
            }
        }
        out
    }

    /// Copy the subtree rooted at `src` in `other` under `parent`.
    ///
    /// With `strip_ids`, `id` attributes are dropped from the copy so the
    /// clone never duplicates a link target.
    pub fn import_subtree(
        &mut self,
        parent: NodeId,
        other: &OutputTree,
        src: NodeId,
        strip_ids: bool,
    ) -> Option<NodeId> {
        let node = other.node(src)?;
        let id = match &node.content {
            Content::Element { tag, attrs } => {
                let id = self.element(parent, tag);
                for (k, v) in attrs {
                    if strip_ids && k == "id" {
                        continue;
                    }
                    self.set_attr(id, k, v);
                }
                for child in other.children(src) {
                    self.import_subtree(id, other, child, strip_ids);
                }
                id
            }
            Content::Text(t) => self.append(parent, Content::Text(t.clone())),
            Content::Comment(c) => self.comment(parent, c),
        };
        Some(id)
    }
}

/// Iterator over children of a node.
pub struct ChildIter<'a> {
    tree: &'a OutputTree,
    current: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Depth-first iterator over attached nodes.
pub struct DfsIter<'a> {
    tree: &'a OutputTree,
    stack: Vec<NodeId>,
}

impl Iterator for DfsIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse order so they're visited left-to-right
        let mut children: Vec<NodeId> = self.tree.children(current).collect();
        children.reverse();
        self.stack.extend(children);

        Some(current)
    }
}
