//! Fragment parsing tests: the context element picks the tokeniser state
//! and the insertion mode, and only the parsed nodes come back.

use quokka_dom::{DomTree, NodeId};
use quokka_html::{parse_fragment, parse_fragment_with_errors};

fn fragment_html(input: &str, context: &str) -> String {
    let (tree, nodes) = parse_fragment(input, context, "https://example.com/");
    nodes
        .iter()
        .map(|&id| tree.outer_html(id))
        .collect::<String>()
}

fn node_names(tree: &DomTree, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .map(|&id| tree.tag_name(id).unwrap_or("#text").to_string())
        .collect()
}

#[test]
fn list_items_parse_in_a_ul_context() {
    let (tree, nodes) = parse_fragment("<li>a<li>b", "ul", "https://example.com/");
    assert_eq!(node_names(&tree, &nodes), ["li", "li"]);
    assert_eq!(fragment_html("<li>a<li>b", "ul"), "<li>a</li><li>b</li>");
}

#[test]
fn cells_parse_in_a_tr_context() {
    assert_eq!(
        fragment_html("<td>one</td><td>two</td>", "tr"),
        "<td>one</td><td>two</td>"
    );
}

#[test]
fn rows_parse_in_a_tbody_context() {
    assert_eq!(
        fragment_html("<tr><td>x</td></tr>", "tbody"),
        "<tr><td>x</td></tr>"
    );
}

#[test]
fn body_context_parses_flow_content() {
    assert_eq!(
        fragment_html("<p>one</p><p>two</p>", "div"),
        "<p>one</p><p>two</p>"
    );
}

#[test]
fn title_context_is_rcdata() {
    // References resolve; there are no tags to interpret.
    let (tree, nodes) = parse_fragment("fish &amp; chips", "title", "https://example.com/");
    assert_eq!(nodes.len(), 1);
    assert_eq!(tree.as_text(nodes[0]), Some("fish & chips"));
}

#[test]
fn rcdata_context_breaks_out_at_an_unclosed_tag() {
    // With no appropriate end tag ahead, a tag run ends the RCDATA text
    // rather than swallowing the rest of the fragment.
    let (tree, nodes) = parse_fragment("x<b>y", "title", "https://example.com/");
    assert_eq!(tree.as_text(nodes[0]), Some("x"));
    assert_eq!(tree.tag_name(nodes[1]), Some("b"));
}

#[test]
fn script_context_is_raw() {
    let (tree, nodes) = parse_fragment("var a = b < c;", "script", "https://example.com/");
    assert_eq!(nodes.len(), 1);
    assert_eq!(tree.as_text(nodes[0]), Some("var a = b < c;"));
}

#[test]
fn script_context_honours_matching_end_tag() {
    // The context seeds the appropriate-end-tag check, so a </script>
    // inside the fragment ends the raw text run.
    let (tree, nodes) = parse_fragment("a;</script><p>x", "script", "https://example.com/");
    assert_eq!(tree.as_text(nodes[0]), Some("a;"));
    assert_eq!(tree.tag_name(nodes[1]), Some("p"));
}

#[test]
fn style_context_is_rawtext() {
    let (tree, nodes) = parse_fragment("p &gt; a {}", "style", "https://example.com/");
    // RAWTEXT: no character references.
    assert_eq!(tree.as_text(nodes[0]), Some("p &gt; a {}"));
}

#[test]
fn plaintext_context_swallows_everything() {
    let (tree, nodes) = parse_fragment("<p>all</p> text", "plaintext", "https://example.com/");
    assert_eq!(nodes.len(), 1);
    assert_eq!(tree.as_text(nodes[0]), Some("<p>all</p> text"));
}

#[test]
fn body_start_tag_is_ignored_in_fragment() {
    assert_eq!(fragment_html("<body><p>x</p>", "div"), "<p>x</p>");
}

#[test]
fn fragment_round_trips_under_the_same_context() {
    let cases = [
        ("<li>a<li>b", "ul"),
        ("<td>one</td><td>two</td>", "tr"),
        ("<p>one</p>two<b>three</b>", "div"),
    ];
    for (input, context) in cases {
        let first = fragment_html(input, context);
        let second = fragment_html(&first, context);
        assert_eq!(second, first, "fragment round-trip diverged for {input:?}");
    }
}

#[test]
fn fragment_errors_are_tracked_when_asked() {
    let (_tree, nodes, errors) =
        parse_fragment_with_errors("<b>x&nope;", "div", "https://example.com/", 10);
    assert_eq!(nodes.len(), 1);
    assert!(!errors.is_empty());
}
