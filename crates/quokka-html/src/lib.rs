//! Permissive HTML parser for the Quokka project.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokeniser** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - The full state machine: data, RCDATA, RAWTEXT, script data (with
//!     escape and double-escape families), PLAINTEXT, tag, comment,
//!     DOCTYPE, and CDATA states
//!   - Character reference resolution (named, decimal and hex numeric)
//!   - Attribute parsing with duplicate dropping
//! - **HTML Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All insertion modes, including the table, select and frameset
//!     families
//!   - The adoption agency algorithm, foster parenting, the list of
//!     active formatting elements with the Noah's Ark clause
//!   - Fragment parsing with a context element
//!
//! Parsing never fails: any input produces a [`quokka_dom::DomTree`],
//! optionally with a bounded list of [`ParseError`]s.
//!
//! # Example
//!
//! ```
//! let doc = quokka_html::parse("<p>One<b>Two</b></p>", "https://example.com/");
//! let body = doc.body().expect("body is implied");
//! assert_eq!(doc.outer_html(body), "<body><p>One<b>Two</b></p></body>");
//! ```

pub mod entities;
pub mod parse_error;
/// HTML tree construction.
pub mod parser;
/// The character reader the tokeniser consumes.
pub mod reader;
/// HTML tokeniser: input text to tokens.
pub mod tokeniser;

use quokka_dom::{DomTree, NodeId};

pub use parse_error::{ParseError, ParseErrorList};
pub use parser::{HtmlTreeBuilder, HtmlTreeBuilderState};
pub use reader::CharacterReader;
pub use tokeniser::{Token, Tokeniser, TokeniserState};

/// Parse a full HTML document. Errors are not tracked.
#[must_use]
pub fn parse(html: &str, base_uri: &str) -> DomTree {
    let builder = HtmlTreeBuilder::new(html, base_uri, ParseErrorList::no_tracking());
    builder.parse().0
}

/// Parse a full HTML document, retaining up to `max_errors` parse errors
/// (zero disables tracking).
#[must_use]
pub fn parse_with_errors(html: &str, base_uri: &str, max_errors: usize) -> (DomTree, Vec<ParseError>) {
    let builder = HtmlTreeBuilder::new(html, base_uri, ParseErrorList::tracking(max_errors));
    let (tree, errors) = builder.parse();
    (tree, errors.into_vec())
}

/// Parse an HTML fragment in the context of an element named `context`
/// (for example `"div"`, `"title"` or `"table"`). The context decides the
/// initial tokeniser state and insertion mode.
///
/// Returns the tree that owns the parsed nodes plus the parsed top-level
/// nodes themselves, in order.
#[must_use]
pub fn parse_fragment(fragment: &str, context: &str, base_uri: &str) -> (DomTree, Vec<NodeId>) {
    let builder = HtmlTreeBuilder::new(fragment, base_uri, ParseErrorList::no_tracking());
    let (tree, nodes, _errors) = builder.parse_fragment(context);
    (tree, nodes)
}

/// As [`parse_fragment`], retaining up to `max_errors` parse errors.
#[must_use]
pub fn parse_fragment_with_errors(
    fragment: &str,
    context: &str,
    base_uri: &str,
    max_errors: usize,
) -> (DomTree, Vec<NodeId>, Vec<ParseError>) {
    let builder = HtmlTreeBuilder::new(fragment, base_uri, ParseErrorList::tracking(max_errors));
    let (tree, nodes, errors) = builder.parse_fragment(context);
    (tree, nodes, errors.into_vec())
}
