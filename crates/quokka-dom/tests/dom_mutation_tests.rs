//! Tests for DOM tree mutation methods: remove_child, insert_before,
//! detach, move_children.

use quokka_dom::{Attributes, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: Attributes::new(),
    }))
}

// ========== remove_child ==========

#[test]
fn remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    assert_eq!(tree.children(parent).len(), 1);

    tree.remove_child(parent, child);

    assert_eq!(tree.children(parent).len(), 0);
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn remove_child_middle_of_three_relinks_siblings() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "i");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

// ========== insert_before ==========

#[test]
fn insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let table = alloc_element(&mut tree, "table");
    tree.append_child(parent, table);

    // Foster parenting inserts content immediately before the table.
    let p = alloc_element(&mut tree, "p");
    tree.insert_before(parent, p, table);

    assert_eq!(tree.children(parent), &[p, table]);
    assert_eq!(tree.parent(p), Some(parent));
    assert_eq!(tree.prev_sibling(p), None);
    assert_eq!(tree.next_sibling(p), Some(table));
    assert_eq!(tree.prev_sibling(table), Some(p));
}

#[test]
fn insert_before_between_siblings() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let c = alloc_element(&mut tree, "i");
    tree.append_child(parent, a);
    tree.append_child(parent, c);

    let b = alloc_element(&mut tree, "b");
    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn append_child_reparents_an_attached_node() {
    let mut tree = DomTree::new();
    let first = alloc_element(&mut tree, "div");
    let second = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, first);
    tree.append_child(NodeId::ROOT, second);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(first, child);
    tree.append_child(second, child);

    assert_eq!(tree.children(first), &[] as &[NodeId]);
    assert_eq!(tree.children(second), &[child]);
    assert_eq!(tree.parent(child), Some(second));
}

// ========== detach ==========

#[test]
fn detach_keeps_node_allocated() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let child = alloc_element(&mut tree, "b");
    tree.append_child(parent, child);

    tree.detach(child);

    assert_eq!(tree.parent(child), None);
    assert!(tree.get(child).is_some());

    // Detached nodes may be re-attached elsewhere (adoption agency does this).
    tree.append_child(NodeId::ROOT, child);
    assert_eq!(tree.parent(child), Some(NodeId::ROOT));
}

#[test]
fn detach_on_root_is_noop() {
    let mut tree = DomTree::new();
    tree.detach(NodeId::ROOT);
    assert!(tree.get(NodeId::ROOT).is_some());
}

// ========== move_children ==========

#[test]
fn move_children_preserves_order() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "b");
    let to = alloc_element(&mut tree, "i");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let x = tree.alloc(NodeType::Text("x".to_string()));
    let y = alloc_element(&mut tree, "span");
    let z = tree.alloc(NodeType::Text("z".to_string()));
    tree.append_child(from, x);
    tree.append_child(from, y);
    tree.append_child(from, z);

    tree.move_children(from, to);

    assert_eq!(tree.children(from), &[] as &[NodeId]);
    assert_eq!(tree.children(to), &[x, y, z]);
    assert_eq!(tree.parent(y), Some(to));
    assert_eq!(tree.next_sibling(x), Some(y));
    assert_eq!(tree.prev_sibling(z), Some(y));
}

#[test]
fn move_children_onto_existing_children_appends() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "b");
    let to = alloc_element(&mut tree, "i");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let existing = tree.alloc(NodeType::Text("first".to_string()));
    tree.append_child(to, existing);
    let moved = tree.alloc(NodeType::Text("second".to_string()));
    tree.append_child(from, moved);

    tree.move_children(from, to);

    assert_eq!(tree.children(to), &[existing, moved]);
    assert_eq!(tree.next_sibling(existing), Some(moved));
}
