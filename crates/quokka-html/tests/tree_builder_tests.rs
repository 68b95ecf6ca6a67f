//! Tree construction tests: implied structure, formatting recovery, the
//! adoption agency, tables with foster parenting, select handling, and
//! the frameset family. Assertions go through the serialised tree, which
//! keeps them independent of arena layout.

use quokka_dom::QuirksMode;
use quokka_html::{parse, parse_with_errors};

fn doc_html(input: &str) -> String {
    let doc = parse(input, "https://example.com/");
    doc.outer_html(doc.root())
}

fn body_html(input: &str) -> String {
    let doc = parse(input, "https://example.com/");
    let body = doc.body().expect("body element is implied");
    doc.outer_html(body)
}

// ========== implied document structure ==========

#[test]
fn empty_input_yields_skeleton() {
    assert_eq!(doc_html(""), "<html><head></head><body></body></html>");
}

#[test]
fn whitespace_only_input_yields_skeleton() {
    assert_eq!(doc_html("   \n\t  "), "<html><head></head><body></body></html>");
}

#[test]
fn bare_text_gets_full_scaffolding() {
    assert_eq!(
        doc_html("Hello"),
        "<html><head></head><body>Hello</body></html>"
    );
}

#[test]
fn unclosed_elements_are_closed_at_eof() {
    assert_eq!(
        doc_html("<p>Hello"),
        "<html><head></head><body><p>Hello</p></body></html>"
    );
}

#[test]
fn head_content_is_separated_from_body() {
    assert_eq!(
        doc_html("<title>T</title><p>x"),
        "<html><head><title>T</title></head><body><p>x</p></body></html>"
    );
}

#[test]
fn doctype_is_retained_on_the_document() {
    assert_eq!(
        doc_html("<!DOCTYPE html><p>Hi</p>"),
        "<!DOCTYPE html><html><head></head><body><p>Hi</p></body></html>"
    );
}

#[test]
fn force_quirks_doctype_sets_quirks_mode() {
    let doc = parse("<!DOCTYPE><p>x", "https://example.com/");
    assert_eq!(doc.quirks_mode(), QuirksMode::Quirks);

    let doc = parse("<!DOCTYPE html><p>x", "https://example.com/");
    assert_eq!(doc.quirks_mode(), QuirksMode::NoQuirks);
}

#[test]
fn comment_before_html_attaches_to_document() {
    assert_eq!(
        doc_html("<!--c--><p>x"),
        "<!--c--><html><head></head><body><p>x</p></body></html>"
    );
}

#[test]
fn duplicate_html_start_tag_merges_attributes() {
    let doc = parse("<html lang=en><html lang=fr class=x><p>y", "https://example.com/");
    let html = doc.document_element().expect("html");
    let attrs = &doc.as_element(html).expect("element").attrs;
    // First occurrence wins; new keys are still merged in.
    assert_eq!(attrs.get("lang"), Some("en"));
    assert_eq!(attrs.get("class"), Some("x"));
}

// ========== spec scenarios ==========

#[test]
fn adoption_agency_splits_misnested_formatting() {
    assert_eq!(
        body_html("<p>One<b>Two<i>Three</b>Four</i>Five</p>"),
        "<body><p>One<b>Two<i>Three</i></b><i>Four</i>Five</p></body>"
    );
}

#[test]
fn table_gets_implicit_tbody() {
    assert_eq!(
        body_html("<table><tr><td>hi</td></tr></table>"),
        "<body><table><tbody><tr><td>hi</td></tr></tbody></table></body>"
    );
}

#[test]
fn table_start_closes_open_paragraph() {
    assert_eq!(
        body_html("<p>foo<table><tr><td>bar</td></tr></table>"),
        "<body><p>foo</p><table><tbody><tr><td>bar</td></tr></tbody></table></body>"
    );
}

#[test]
fn formatting_reconstructs_into_paragraph() {
    assert_eq!(
        body_html("<b><p>hi</b>"),
        "<body><b></b><p><b>hi</b></p></body>"
    );
}

#[test]
fn second_anchor_implicitly_closes_the_first() {
    assert_eq!(
        body_html("<a href=\"x\">1<a href=\"y\">2</a>"),
        "<body><a href=\"x\">1</a><a href=\"y\">2</a></body>"
    );
}

#[test]
fn consecutive_options_close_implicitly() {
    assert_eq!(
        body_html("<select><option>A<option>B</select>"),
        "<body><select><option>A</option><option>B</option></select></body>"
    );
}

// ========== formatting elements ==========

#[test]
fn nobr_closes_open_nobr() {
    assert_eq!(
        body_html("<nobr>a<nobr>b"),
        "<body><nobr>a</nobr><nobr>b</nobr></body>"
    );
}

#[test]
fn noahs_ark_caps_identical_formatting_entries_at_three() {
    // Four identical <b> entries; the earliest is dropped from the list,
    // so reconstruction after </p> re-opens only three.
    assert_eq!(
        body_html("<p><b><b><b><b></p>x"),
        "<body><p><b><b><b><b></b></b></b></b></p><b><b><b>x</b></b></b></body>"
    );
}

#[test]
fn formatting_survives_block_boundaries() {
    assert_eq!(
        body_html("<b>one<div>two</b>three</div>"),
        "<body><b>one</b><div><b>two</b>three</div></body>"
    );
}

// ========== blocks, lists, headings ==========

#[test]
fn sibling_list_items_close_each_other() {
    assert_eq!(
        body_html("<ul><li>a<li>b</ul>"),
        "<body><ul><li>a</li><li>b</li></ul></body>"
    );
}

#[test]
fn definition_terms_close_each_other() {
    assert_eq!(
        body_html("<dl><dt>t<dd>d</dl>"),
        "<body><dl><dt>t</dt><dd>d</dd></dl></body>"
    );
}

#[test]
fn heading_start_closes_open_heading() {
    assert_eq!(
        body_html("<h1>a<h2>b</h2>"),
        "<body><h1>a</h1><h2>b</h2></body>"
    );
}

#[test]
fn stray_p_end_tag_creates_empty_paragraph() {
    assert_eq!(body_html("x</p>y"), "<body>x<p></p>y</body>");
}

#[test]
fn stray_end_tag_is_ignored_with_error() {
    let (doc, errors) = parse_with_errors("</div>x", "https://example.com/", 10);
    let body = doc.body().expect("body");
    assert_eq!(doc.outer_html(body), "<body>x</body>");
    assert!(!errors.is_empty());
}

#[test]
fn nested_button_closes_previous() {
    assert_eq!(
        body_html("<button>a<button>b"),
        "<body><button>a</button><button>b</button></body>"
    );
}

#[test]
fn second_form_is_ignored_while_one_is_open() {
    assert_eq!(
        body_html("<form>a<form>b"),
        "<body><form>ab</form></body>"
    );
}

#[test]
fn image_start_tag_is_renamed_to_img() {
    assert_eq!(
        body_html("<image src=\"x.png\">"),
        "<body><img src=\"x.png\"></body>"
    );
}

#[test]
fn isindex_expands_to_a_form() {
    assert_eq!(
        body_html("<isindex action=\"/s\" prompt=\"Find: \">"),
        "<body><form action=\"/s\"><hr><label>Find: <input name=\"isindex\"></label><hr></form></body>"
    );
}

// ========== tables ==========

#[test]
fn table_text_is_foster_parented() {
    assert_eq!(
        body_html("<table>text<tr><td>cell</td></tr></table>"),
        "<body>text<table><tbody><tr><td>cell</td></tr></tbody></table></body>"
    );
}

#[test]
fn whitespace_stays_inside_the_table() {
    assert_eq!(
        body_html("<table> <tr><td>c</td></tr></table>"),
        "<body><table> <tbody><tr><td>c</td></tr></tbody></table></body>"
    );
}

#[test]
fn misplaced_element_is_foster_parented() {
    assert_eq!(
        body_html("<table><div>d</div><tr><td>c</td></tr></table>"),
        "<body><div>d</div><table><tbody><tr><td>c</td></tr></tbody></table></body>"
    );
}

#[test]
fn nested_cell_structure_is_rebuilt() {
    assert_eq!(
        body_html("<table><tbody><tr><th>h</th><td>d</td></tr></tbody></table>"),
        "<body><table><tbody><tr><th>h</th><td>d</td></tr></tbody></table></body>"
    );
}

#[test]
fn caption_and_colgroup_are_ordered() {
    assert_eq!(
        body_html("<table><caption>c</caption><colgroup><col></colgroup><tr><td>x</td></tr></table>"),
        "<body><table><caption>c</caption><colgroup><col></colgroup><tbody><tr><td>x</td></tr></tbody></table></body>"
    );
}

#[test]
fn new_table_start_inside_table_closes_the_first() {
    assert_eq!(
        body_html("<table><tr><td>a</td></tr><table><tr><td>b</td></tr></table>"),
        "<body><table><tbody><tr><td>a</td></tr></tbody></table><table><tbody><tr><td>b</td></tr></tbody></table></body>"
    );
}

#[test]
fn hidden_input_is_allowed_inside_table() {
    assert_eq!(
        body_html("<table><input type=hidden name=x><tr><td>c</td></tr></table>"),
        "<body><table><input type=\"hidden\" name=\"x\"><tbody><tr><td>c</td></tr></tbody></table></body>"
    );
}

#[test]
fn select_inside_table_closes_on_table_structure() {
    assert_eq!(
        body_html("<table><tr><td><select><option>o<tr><td>next"),
        "<body><table><tbody><tr><td><select><option>o</option></select></td></tr><tr><td>next</td></tr></tbody></table></body>"
    );
}

// ========== raw text and rcdata ==========

#[test]
fn script_content_is_raw() {
    assert_eq!(
        doc_html("<script>if (a < b) foo();</script>"),
        "<html><head><script>if (a < b) foo();</script></head><body></body></html>"
    );
}

#[test]
fn script_end_tag_lookalikes_stay_in_data() {
    assert_eq!(
        doc_html("<script>var x = '</b>';</script>"),
        "<html><head><script>var x = '</b>';</script></head><body></body></html>"
    );
}

#[test]
fn style_content_is_raw() {
    assert_eq!(
        doc_html("<style>p > a { color: red; }</style>"),
        "<html><head><style>p > a { color: red; }</style></head><body></body></html>"
    );
}

#[test]
fn textarea_content_is_rcdata() {
    assert_eq!(
        body_html("<textarea><b>x</b></textarea>"),
        "<body><textarea>&lt;b&gt;x&lt;/b&gt;</textarea></body>"
    );
}

#[test]
fn title_resolves_character_references() {
    let doc = parse("<title>fish &amp; chips</title>", "https://example.com/");
    let html = doc.document_element().expect("html");
    let head = doc.children(html)[0];
    let title = doc.children(head)[0];
    assert_eq!(doc.text_content(title), "fish & chips");
}

#[test]
fn unclosed_title_breaks_out_at_next_tag() {
    // There is no </title> ahead, so the tag run is not swallowed.
    assert_eq!(
        doc_html("<title>foo<div>bar</div>"),
        "<html><head><title>foo</title></head><body><div>bar</div></body></html>"
    );
}

#[test]
fn plaintext_swallows_the_rest() {
    // Plaintext content is raw in the serialisation too, so the swallowed
    // markup comes back out verbatim.
    assert_eq!(
        body_html("<plaintext><p>not a tag"),
        "<body><plaintext><p>not a tag</plaintext></body>"
    );
}

// ========== character data ==========

#[test]
fn entities_resolve_in_body_text() {
    assert_eq!(
        body_html("<p>&amp; &#x41; &curren;</p>"),
        "<body><p>&amp; A \u{00A4}</p></body>"
    );
}

#[test]
fn after_body_text_reopens_body() {
    assert_eq!(body_html("x</body>y"), "<body>xy</body>");
}

// ========== frameset ==========

#[test]
fn frameset_replaces_body_entirely() {
    assert_eq!(
        doc_html("<frameset cols=\"50%,50%\"><frame src=\"a\"><frame src=\"b\"></frameset>"),
        "<html><head></head><frameset cols=\"50%,50%\"><frame src=\"a\"><frame src=\"b\"></frameset></html>"
    );
}

#[test]
fn frameset_after_content_is_ignored() {
    assert_eq!(
        body_html("text<frameset><frame></frameset>"),
        "<body>text</body>"
    );
}

#[test]
fn noframes_inside_frameset_is_raw_text() {
    assert_eq!(
        doc_html("<frameset><frame><noframes>no <b>frames</b></noframes></frameset>"),
        "<html><head></head><frameset><frame><noframes>no <b>frames</b></noframes></frameset></html>"
    );
}

// ========== foreign content ==========

#[test]
fn svg_subtree_is_built_opaquely() {
    assert_eq!(
        body_html("<p><svg><circle r=\"1\"/><text>hi</text></svg>after"),
        "<body><p><svg><circle r=\"1\"></circle><text>hi</text></svg>after</p></body>"
    );
}

#[test]
fn self_closing_math_is_acknowledged() {
    let (doc, errors) = parse_with_errors("<p><math/>x", "https://example.com/", 10);
    let body = doc.body().expect("body");
    assert_eq!(doc.outer_html(body), "<body><p><math></math>x</p></body>");
    // No unacknowledged-self-closing error.
    assert!(
        !errors
            .iter()
            .any(|e| e.message.contains("Self closing flag not acknowledged"))
    );
}

// ========== base uri ==========

#[test]
fn first_base_href_rebases_the_document() {
    let doc = parse(
        "<head><base href=\"/b/\"><base href=\"/ignored/\"></head>",
        "https://example.com/a/index.html",
    );
    assert_eq!(doc.base_uri(), "https://example.com/b/");
}

// ========== error tracking ==========

#[test]
fn error_positions_point_into_the_input() {
    let (_doc, errors) = parse_with_errors("<p>a&nope;b</p>", "https://example.com/", 10);
    assert!(!errors.is_empty());
    let input_len = "<p>a&nope;b</p>".chars().count();
    for error in &errors {
        assert!(error.position <= input_len);
    }
}

#[test]
fn untracked_parse_keeps_no_errors() {
    let (_doc, errors) = parse_with_errors("</div>&nope;", "https://example.com/", 0);
    assert!(errors.is_empty());
}

// ========== round trips ==========

#[test]
fn parse_then_serialise_is_stable() {
    let inputs = [
        "<p>One<b>Two<i>Three</b>Four</i>Five</p>",
        "<table><tr><td>hi</td></tr></table>",
        "<!DOCTYPE html><title>T</title><p>a &amp; b</p>",
        "<ul><li>a<li>b</ul>",
        "<select><option>A<option>B</select>",
        "<p>foo<table><tr><td>bar</td></tr></table>",
        "<script>if (a < b) {}</script><p>x</p>",
    ];
    for input in inputs {
        let first = doc_html(input);
        let second = doc_html(&first);
        assert_eq!(first, second, "round-trip diverged for {input:?}");
    }
}

#[test]
fn identical_input_gives_identical_output() {
    let input = "<p id=a class=b>x<b>y</b></p><table><tr><td>z</td></tr></table>";
    assert_eq!(doc_html(input), doc_html(input));
    let (_, errors_a) = parse_with_errors(input, "https://example.com/", 20);
    let (_, errors_b) = parse_with_errors(input, "https://example.com/", 20);
    assert_eq!(errors_a, errors_b);
}
