//! DOM tree implementation for the Quokka HTML parser.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow
//! checker issues. The parser's stack of open elements and list of active
//! formatting elements hold plain `NodeId`s into this arena; the arena is
//! the single owner of every node.

use std::collections::HashSet;

pub mod attributes;
mod serialize;

pub use attributes::{Attribute, Attributes};

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// NodeId provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
///
/// "a Document is always set to one of three modes: no-quirks mode, the
/// default; quirks mode...; and limited-quirks mode."
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuirksMode {
    #[default]
    NoQuirks,
    Quirks,
    LimitedQuirks,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.8 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    /// "DocumentType nodes are simply known as doctypes."
    DocumentType {
        name: String,
        public_identifier: String,
        system_identifier: String,
    },
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "When an element is created, its local name is always given."
///
/// NOTE: We only store the local name and the attribute list; namespaces,
/// custom elements and shadow roots are out of scope for this parser.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element has an associated attribute list"
    pub attrs: Attributes,
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
///
/// All nodes live in a contiguous vector, addressed by [`NodeId`]. The
/// Document node is always at index 0 and carries the document-level
/// state the parser leaves behind: the quirks mode and the base URI.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by NodeId.
    /// The Document node is always at index 0 (NodeId::ROOT).
    nodes: Vec<Node>,
    quirks_mode: QuirksMode,
    base_uri: String,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        DomTree {
            nodes: vec![document],
            quirks_mode: QuirksMode::NoQuirks,
            base_uri: String::new(),
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes allocated in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The document's quirks mode, derived from the doctype during parsing.
    #[must_use]
    pub fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    pub fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    /// The document's base URI (the parse-time base, possibly updated by
    /// the first `<base href>` element).
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn set_base_uri(&mut self, base_uri: &str) {
        self.base_uri = base_uri.to_string();
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, updating all
    /// relationships. A child already attached elsewhere is detached first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);

        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// [§ 4.2.1 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Insert `child` into `parent`'s children immediately before
    /// `reference`, which must be a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `reference` is not a child of `parent`; that indicates a
    /// bug in the caller's insertion-location computation.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);

        let pos = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == reference)
            .expect("insert_before reference must be a child of parent");

        self.nodes[parent.0].children.insert(pos, child);
        self.nodes[child.0].parent = Some(parent);

        // Rewire sibling links around the insertion point.
        let before = if pos > 0 {
            Some(self.nodes[parent.0].children[pos - 1])
        } else {
            None
        };
        if let Some(before_id) = before {
            self.nodes[before_id.0].next_sibling = Some(child);
        }
        self.nodes[child.0].prev_sibling = before;
        self.nodes[child.0].next_sibling = Some(reference);
        self.nodes[reference.0].prev_sibling = Some(child);
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Remove `child` from `parent`'s children, clearing its parent and
    /// sibling links. The node stays allocated and may be re-attached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(pos) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == child)
        {
            let _ = self.nodes[parent.0].children.remove(pos);

            let prev = self.nodes[child.0].prev_sibling;
            let next = self.nodes[child.0].next_sibling;
            if let Some(prev_id) = prev {
                self.nodes[prev_id.0].next_sibling = next;
            }
            if let Some(next_id) = next {
                self.nodes[next_id.0].prev_sibling = prev;
            }

            self.nodes[child.0].parent = None;
            self.nodes[child.0].prev_sibling = None;
            self.nodes[child.0].next_sibling = None;
        }
    }

    /// Detach a node from its parent, if attached. No-op for roots.
    ///
    /// The adoption agency algorithm relocates nodes repeatedly; detach
    /// keeps the node allocated so its `NodeId` stays valid.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent {
            self.remove_child(parent, id);
        }
    }

    /// Move all children of `from` onto the end of `to`'s child list,
    /// preserving their order.
    ///
    /// Used by the adoption agency algorithm ("move all the children of
    /// the furthest block to the new element").
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = std::mem::take(&mut self.nodes[from.0].children);
        for &child in &children {
            // Links to the old parent are stale; clear them before re-append.
            self.nodes[child.0].parent = None;
            self.nodes[child.0].prev_sibling = None;
            self.nodes[child.0].next_sibling = None;
        }
        for child in children {
            self.append_child(to, child);
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Element tag name, or `None` for non-element nodes.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is
    /// that document, if it exists; otherwise null."
    ///
    /// In practice for HTML documents, this is the `<html>` element.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| matches!(self.get(id).map(|n| &n.node_type), Some(NodeType::Element(_))))
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's
    /// children that is either a body element or a frameset element, or
    /// null if there is no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;

        self.children(html)
            .iter()
            .find(|&&id| {
                self.as_element(id).is_some_and(|e| {
                    let tag = e.tag_name.to_ascii_lowercase();
                    tag == "body" || tag == "frameset"
                })
            })
            .copied()
    }

    /// Collect the text of all descendant text nodes, in document order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut visited = HashSet::new();
        self.collect_text(id, &mut out, &mut visited);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String, visited: &mut HashSet<NodeId>) {
        if !visited.insert(id) {
            return;
        }
        if let Some(node) = self.get(id) {
            if let NodeType::Text(s) = &node.node_type {
                out.push_str(s);
            }
            for &child in &node.children {
                self.collect_text(child, out, visited);
            }
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
