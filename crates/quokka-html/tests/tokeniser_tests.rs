//! Tokeniser behaviour tests: tags, attributes, comments, doctypes and
//! character references, driven through the public pull interface.

use quokka_html::parse_error::ParseErrorList;
use quokka_html::reader::CharacterReader;
use quokka_html::tokeniser::{Token, Tokeniser};

/// Pull every token out of the input, EOF included.
fn tokenise(input: &str) -> Vec<Token> {
    let mut tokeniser = Tokeniser::new(CharacterReader::new(input), ParseErrorList::no_tracking());
    let mut tokens = Vec::new();
    loop {
        let token = tokeniser.read();
        let at_eof = token.is_eof();
        tokens.push(token);
        if at_eof {
            break;
        }
    }
    tokens
}

/// As `tokenise`, but with error tracking on.
fn tokenise_with_errors(input: &str, max: usize) -> (Vec<Token>, Vec<String>) {
    let mut tokeniser = Tokeniser::new(CharacterReader::new(input), ParseErrorList::tracking(max));
    let mut tokens = Vec::new();
    loop {
        let token = tokeniser.read();
        let at_eof = token.is_eof();
        tokens.push(token);
        if at_eof {
            break;
        }
    }
    let errors = tokeniser
        .into_errors()
        .into_vec()
        .into_iter()
        .map(|e| e.message)
        .collect();
    (tokens, errors)
}

fn character(data: &str) -> Token {
    Token::Character {
        data: data.to_string(),
    }
}

#[test]
fn tokenises_start_tag_with_attributes() {
    let tokens = tokenise("<a href=\"/x\" class=y>text</a>");
    assert_eq!(tokens.len(), 4);
    let Token::StartTag {
        name,
        self_closing,
        attributes,
    } = &tokens[0]
    else {
        panic!("expected a start tag, got {:?}", tokens[0]);
    };
    assert_eq!(name, "a");
    assert!(!self_closing);
    assert_eq!(attributes.get("href"), Some("/x"));
    assert_eq!(attributes.get("class"), Some("y"));
    assert_eq!(tokens[1], character("text"));
    assert_eq!(tokens[2], Token::end_tag("a"));
    assert!(tokens[3].is_eof());
}

#[test]
fn tag_and_attribute_names_are_lowercased() {
    let tokens = tokenise("<DIV Class=Foo ID=bar>");
    let Token::StartTag {
        name, attributes, ..
    } = &tokens[0]
    else {
        panic!("expected a start tag");
    };
    assert_eq!(name, "div");
    // Keys fold to lowercase; values keep their case.
    let names: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["class", "id"]);
    assert_eq!(attributes.get("class"), Some("Foo"));
}

#[test]
fn duplicate_attributes_keep_the_first() {
    let (tokens, errors) = tokenise_with_errors("<a id=1 ID=2>", 10);
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("expected a start tag");
    };
    assert_eq!(attributes.len(), 1);
    assert_eq!(attributes.get("id"), Some("1"));
    assert!(errors.iter().any(|e| e.contains("duplicate attribute")));
}

#[test]
fn attributes_on_end_tag_are_dropped_with_error() {
    let (tokens, errors) = tokenise_with_errors("<p></p id=x>", 10);
    assert_eq!(tokens[1], Token::end_tag("p"));
    assert!(
        errors
            .iter()
            .any(|e| e.contains("Attributes incorrectly present on end tag"))
    );
}

#[test]
fn unacknowledged_self_closing_flag_is_an_error() {
    let (tokens, errors) = tokenise_with_errors("<div/>x", 10);
    let Token::StartTag { self_closing, .. } = &tokens[0] else {
        panic!("expected a start tag");
    };
    assert!(self_closing);
    assert!(
        errors
            .iter()
            .any(|e| e.contains("Self closing flag not acknowledged"))
    );
}

#[test]
fn character_runs_are_coalesced() {
    // Plain text, resolved references and CDATA all land in one run.
    let tokens = tokenise("a&amp;b&#65;c");
    assert_eq!(tokens[0], character("a&bAc"));
    assert!(tokens[1].is_eof());
}

#[test]
fn tokenises_comments() {
    let tokens = tokenise("<!--hello--><!---->");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "hello".to_string()
        }
    );
    assert_eq!(
        tokens[1],
        Token::Comment {
            data: String::new()
        }
    );
}

#[test]
fn processing_instruction_becomes_bogus_comment() {
    let tokens = tokenise("<?xml version=\"1.0\"?>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "?xml version=\"1.0\"?".to_string()
        }
    );
}

#[test]
fn tokenises_doctype_with_identifiers() {
    let tokens =
        tokenise("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">");
    let Token::Doctype {
        name,
        public_identifier,
        system_identifier,
        force_quirks,
    } = &tokens[0]
    else {
        panic!("expected a doctype, got {:?}", tokens[0]);
    };
    assert_eq!(name, "html");
    assert_eq!(public_identifier, "-//W3C//DTD HTML 4.01//EN");
    assert_eq!(system_identifier, "http://www.w3.org/TR/html4/strict.dtd");
    assert!(!force_quirks);
}

#[test]
fn empty_doctype_forces_quirks() {
    let tokens = tokenise("<!DOCTYPE>");
    let Token::Doctype {
        name, force_quirks, ..
    } = &tokens[0]
    else {
        panic!("expected a doctype");
    };
    assert_eq!(name, "");
    assert!(force_quirks);
}

#[test]
fn doctype_name_is_lowercased() {
    let tokens = tokenise("<!doctype HTML>");
    let Token::Doctype { name, .. } = &tokens[0] else {
        panic!("expected a doctype");
    };
    assert_eq!(name, "html");
}

#[test]
fn cdata_section_is_character_data() {
    let tokens = tokenise("<![CDATA[x < y]]>after");
    assert_eq!(tokens[0], character("x < yafter"));
}

// ========== character references ==========

#[test]
fn named_reference_without_semicolon_is_error_but_resolves() {
    let (tokens, errors) = tokenise_with_errors("&amp", 10);
    assert_eq!(tokens[0], character("&"));
    assert!(errors.iter().any(|e| e.contains("missing semicolon")));
}

#[test]
fn hex_and_decimal_references_resolve() {
    let tokens = tokenise("&#x41;&#X42;&#67;");
    assert_eq!(tokens[0], character("ABC"));
}

#[test]
fn out_of_range_reference_is_replacement_character() {
    let (tokens, errors) = tokenise_with_errors("&#xFFFFFF;", 10);
    assert_eq!(tokens[0], character("\u{FFFD}"));
    assert!(
        errors
            .iter()
            .any(|e| e.contains("character outside of valid range"))
    );
}

#[test]
fn surrogate_reference_is_replacement_character() {
    let (tokens, _errors) = tokenise_with_errors("&#xD800;", 10);
    assert_eq!(tokens[0], character("\u{FFFD}"));
}

#[test]
fn unknown_named_reference_stays_literal() {
    let (tokens, errors) = tokenise_with_errors("&nope;", 10);
    assert_eq!(tokens[0], character("&nope;"));
    assert!(errors.iter().any(|e| e.contains("invalid named reference")));
}

#[test]
fn bare_ampersand_is_literal() {
    let tokens = tokenise("fish & chips");
    assert_eq!(tokens[0], character("fish & chips"));
}

#[test]
fn references_resolve_inside_attribute_values() {
    let tokens = tokenise("<a href=\"?x=1&amp;y=2&not;z\">");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("expected a start tag");
    };
    assert_eq!(attributes.get("href"), Some("?x=1&y=2\u{00AC}z"));
}

#[test]
fn legacy_reference_in_attribute_keeps_author_intent() {
    // `&not=` in a query string must not resolve: the name is a base
    // entity but the next character says it is part of a URL.
    let tokens = tokenise("<a href=\"?a=b&not=c&copyright\">");
    let Token::StartTag { attributes, .. } = &tokens[0] else {
        panic!("expected a start tag");
    };
    assert_eq!(attributes.get("href"), Some("?a=b&not=c&copyright"));
}

#[test]
fn unescape_entities_resolves_references() {
    let mut tokeniser = Tokeniser::new(
        CharacterReader::new("One &amp; two &#33; &lt;ok&gt;"),
        ParseErrorList::no_tracking(),
    );
    assert_eq!(tokeniser.unescape_entities(false), "One & two ! <ok>");
}

#[test]
fn error_list_respects_its_cap() {
    // Many unknown references, only two retained.
    let (_tokens, errors) = tokenise_with_errors("&nope; &nada; &zilch; &zip;", 2);
    assert_eq!(errors.len(), 2);
}

#[test]
fn eof_inside_tag_is_reported() {
    // The truncated tag is emitted as scanned so far, with an EOF error.
    let (tokens, errors) = tokenise_with_errors("<div class=", 10);
    let Token::StartTag {
        name, attributes, ..
    } = &tokens[0]
    else {
        panic!("expected the truncated start tag, got {:?}", tokens[0]);
    };
    assert_eq!(name, "div");
    assert_eq!(attributes.get("class"), Some(""));
    assert!(errors.iter().any(|e| e.contains("end of file")));
}

#[test]
fn stray_lt_is_text() {
    let tokens = tokenise("a < b");
    assert_eq!(tokens[0], character("a < b"));
}
