//! Minimal HTML serialisation.
//!
//! [§ 13.3 Serialising HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Just enough of the fragment serialisation algorithm that re-parsing the
//! output reproduces the tree: attributes in stored order, void elements
//! without end tags, raw-text element content emitted verbatim. There is
//! deliberately no pretty-printing here.

use crate::{DomTree, NodeId, NodeType};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link,
/// meta, param, source, track, wbr" (plus the obsolete basefont, bgsound,
/// frame and keygen, which the parser also treats as void).
fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "basefont"
            | "bgsound"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
///
/// "If current node is a style, script, xmp, iframe, noembed, noframes,
/// or plaintext element... append the value of current node's data IDL
/// attribute literally."
fn is_raw_text_container(name: &str) -> bool {
    matches!(
        name,
        "style" | "script" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext"
    )
}

fn escape_text(data: &str, out: &mut String) {
    for c in data.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute_value(data: &str, out: &mut String) {
    for c in data.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

impl DomTree {
    /// Serialise a node and its subtree to HTML markup.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(id, &mut out, false);
        out
    }

    /// Serialise only the children of a node (the node's "inner HTML").
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self
            .tag_name(id)
            .is_some_and(is_raw_text_container);
        for &child in self.children(id) {
            self.serialize_node(child, &mut out, raw);
        }
        out
    }

    fn serialize_node(&self, id: NodeId, out: &mut String, raw_text: bool) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.node_type {
            NodeType::Document => {
                for &child in &node.children {
                    self.serialize_node(child, out, false);
                }
            }
            NodeType::DocumentType {
                name,
                public_identifier,
                system_identifier,
            } => {
                out.push_str("<!DOCTYPE");
                if !name.is_empty() {
                    out.push(' ');
                    out.push_str(name);
                }
                if !public_identifier.is_empty() {
                    out.push_str(" PUBLIC \"");
                    out.push_str(public_identifier);
                    out.push('"');
                    if !system_identifier.is_empty() {
                        out.push_str(" \"");
                        out.push_str(system_identifier);
                        out.push('"');
                    }
                } else if !system_identifier.is_empty() {
                    out.push_str(" SYSTEM \"");
                    out.push_str(system_identifier);
                    out.push('"');
                }
                out.push('>');
            }
            NodeType::Element(data) => {
                out.push('<');
                out.push_str(&data.tag_name);
                for attr in &data.attrs {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_attribute_value(&attr.value, out);
                    out.push('"');
                }
                out.push('>');
                if is_void_element(&data.tag_name) {
                    return;
                }
                let raw = is_raw_text_container(&data.tag_name);
                for &child in &node.children {
                    self.serialize_node(child, out, raw);
                }
                out.push_str("</");
                out.push_str(&data.tag_name);
                out.push('>');
            }
            NodeType::Text(data) => {
                if raw_text {
                    out.push_str(data);
                } else {
                    escape_text(data, out);
                }
            }
            NodeType::Comment(data) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Attributes, DomTree, ElementData, NodeId, NodeType};

    fn element(tree: &mut DomTree, tag: &str) -> NodeId {
        tree.alloc(NodeType::Element(ElementData {
            tag_name: tag.to_string(),
            attrs: Attributes::new(),
        }))
    }

    #[test]
    fn serializes_elements_and_text() {
        let mut tree = DomTree::new();
        let p = element(&mut tree, "p");
        tree.append_child(NodeId::ROOT, p);
        let text = tree.alloc(NodeType::Text("a < b".to_string()));
        tree.append_child(p, text);
        assert_eq!(tree.outer_html(p), "<p>a &lt; b</p>");
    }

    #[test]
    fn serializes_attributes_in_order() {
        let mut tree = DomTree::new();
        let a = element(&mut tree, "a");
        tree.as_element_mut(a).unwrap().attrs.put("href", "/x");
        tree.as_element_mut(a).unwrap().attrs.put("title", "say \"hi\"");
        assert_eq!(
            tree.outer_html(a),
            "<a href=\"/x\" title=\"say &quot;hi&quot;\"></a>"
        );
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let mut tree = DomTree::new();
        let br = element(&mut tree, "br");
        assert_eq!(tree.outer_html(br), "<br>");
    }

    #[test]
    fn script_content_is_not_escaped() {
        let mut tree = DomTree::new();
        let script = element(&mut tree, "script");
        let code = tree.alloc(NodeType::Text("if (a < b) {}".to_string()));
        tree.append_child(script, code);
        assert_eq!(tree.outer_html(script), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn inner_html_skips_the_node_itself() {
        let mut tree = DomTree::new();
        let p = element(&mut tree, "p");
        let b = element(&mut tree, "b");
        tree.append_child(p, b);
        let text = tree.alloc(NodeType::Text("x".to_string()));
        tree.append_child(b, text);
        assert_eq!(tree.inner_html(p), "<b>x</b>");
    }

    #[test]
    fn serializes_doctype() {
        let mut tree = DomTree::new();
        let doctype = tree.alloc(NodeType::DocumentType {
            name: "html".to_string(),
            public_identifier: String::new(),
            system_identifier: String::new(),
        });
        tree.append_child(NodeId::ROOT, doctype);
        assert_eq!(tree.outer_html(NodeId::ROOT), "<!DOCTYPE html>");
    }
}
