//! The tree builder's insertion modes.
//!
//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! Each mode embodies the processing for one insertion mode and the
//! transitions out of it. `process` returns `false` when the token was
//! ignored; several modes re-enter the dispatcher to reprocess a token
//! under new rules, and the engine lets that recursion run (it is bounded
//! by the fixed mode graph).

use strum_macros::Display;

use quokka_dom::{NodeType, QuirksMode};

use crate::tokeniser::{Token, TokeniserState};

use super::builder::HtmlTreeBuilder;

/// Block-level start tags that close an open `<p>` first.
const IN_BODY_BLOCK_STARTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "center",
    "details",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "menu",
    "nav",
    "ol",
    "p",
    "section",
    "summary",
    "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
/// formatting elements other than `<a>` and `<nobr>`, which have extra
/// rules of their own.
const FORMATTING_STARTS: &[&str] = &[
    "b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u",
];

/// End tags handled by the adoption agency algorithm.
const ADOPTION_ENDS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u",
];

/// Block-level end tags with plain generate-implied/pop handling.
const IN_BODY_BLOCK_ENDS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "button",
    "center",
    "details",
    "dir",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "header",
    "hgroup",
    "listing",
    "menu",
    "nav",
    "ol",
    "pre",
    "section",
    "summary",
    "ul",
];

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary
/// operation of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HtmlTreeBuilderState {
    /// [§ 13.2.6.4.1](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    /// Script, style and friends: character data until the matching end
    /// tag, then back to the saved original mode.
    Text,
    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.19](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    /// Opaque SVG/MathML subtrees entered from `<math>`/`<svg>` in InBody.
    ForeignContent,
}

impl HtmlTreeBuilderState {
    /// Process one token under this mode's rules. `false` means the
    /// token was ignored.
    pub(crate) fn process(self, t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
        match self {
            Self::Initial => process_initial(t, tb),
            Self::BeforeHtml => process_before_html(t, tb),
            Self::BeforeHead => process_before_head(t, tb),
            Self::InHead => process_in_head(t, tb),
            Self::InHeadNoscript => process_in_head_noscript(t, tb),
            Self::AfterHead => process_after_head(t, tb),
            Self::InBody => process_in_body(t, tb),
            Self::Text => process_text(t, tb),
            Self::InTable => process_in_table(t, tb),
            Self::InTableText => process_in_table_text(t, tb),
            Self::InCaption => process_in_caption(t, tb),
            Self::InColumnGroup => process_in_column_group(t, tb),
            Self::InTableBody => process_in_table_body(t, tb),
            Self::InRow => process_in_row(t, tb),
            Self::InCell => process_in_cell(t, tb),
            Self::InSelect => process_in_select(t, tb),
            Self::InSelectInTable => process_in_select_in_table(t, tb),
            Self::AfterBody => process_after_body(t, tb),
            Self::InFrameset => process_in_frameset(t, tb),
            Self::AfterFrameset => process_after_frameset(t, tb),
            Self::AfterAfterBody => process_after_after_body(t, tb),
            Self::AfterAfterFrameset => process_after_after_frameset(t, tb),
            Self::ForeignContent => process_foreign_content(t, tb),
        }
    }
}

/// "Follow the generic RCDATA element parsing algorithm": insert, flip
/// the tokeniser to RCDATA, and collect text until the matching end tag.
fn handle_rcdata(t: &Token, tb: &mut HtmlTreeBuilder) {
    tb.insert_element(t);
    tb.tokeniser.transition(TokeniserState::Rcdata);
    tb.mark_insertion_mode();
    tb.transition(HtmlTreeBuilderState::Text);
}

/// "Follow the generic raw text element parsing algorithm."
fn handle_rawtext(t: &Token, tb: &mut HtmlTreeBuilder) {
    tb.insert_element(t);
    tb.tokeniser.transition(TokeniserState::Rawtext);
    tb.mark_insertion_mode();
    tb.transition(HtmlTreeBuilderState::Text);
}

/// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
fn process_initial(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    if t.is_whitespace() {
        return true; // ignore whitespace before the doctype
    }
    match t {
        Token::Comment { data } => tb.insert_comment(data),
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            let doctype = tb.tree.alloc(NodeType::DocumentType {
                name: name.clone(),
                public_identifier: public_identifier.clone(),
                system_identifier: system_identifier.clone(),
            });
            tb.tree.append_child(tb.tree.root(), doctype);
            if *force_quirks {
                tb.tree.set_quirks_mode(QuirksMode::Quirks);
            }
            tb.transition(HtmlTreeBuilderState::BeforeHtml);
        }
        _ => {
            // Missing doctype: no quirks decision, straight on.
            tb.transition(HtmlTreeBuilderState::BeforeHtml);
            return tb.process(t);
        }
    }
    true
}

/// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
fn process_before_html(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    fn anything_else(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
        tb.insert_start_tag("html");
        tb.transition(HtmlTreeBuilderState::BeforeHead);
        tb.process(t)
    }

    if t.is_doctype() {
        tb.error(HtmlTreeBuilderState::BeforeHtml);
        return false;
    }
    if t.is_whitespace() {
        return true; // ignore whitespace
    }
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::StartTag { name, .. } if name == "html" => {
            tb.insert_element(t);
            tb.transition(HtmlTreeBuilderState::BeforeHead);
            true
        }
        Token::EndTag { name } => {
            if matches!(name.as_str(), "head" | "body" | "html" | "br") {
                anything_else(t, tb)
            } else {
                tb.error(HtmlTreeBuilderState::BeforeHtml);
                false
            }
        }
        _ => anything_else(t, tb),
    }
}

/// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
fn process_before_head(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    fn anything_else(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
        tb.process(&Token::start_tag("head"));
        tb.process(t)
    }

    if t.is_whitespace() {
        return true;
    }
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::BeforeHead);
            false
        }
        Token::StartTag { name, .. } if name == "html" => {
            process_in_body(t, tb) // does not transition
        }
        Token::StartTag { name, .. } if name == "head" => {
            let head = tb.insert_element(t);
            tb.set_head_element(head);
            tb.transition(HtmlTreeBuilderState::InHead);
            true
        }
        Token::EndTag { name } => {
            if matches!(name.as_str(), "head" | "body" | "html" | "br") {
                anything_else(t, tb)
            } else {
                tb.error(HtmlTreeBuilderState::BeforeHead);
                false
            }
        }
        _ => anything_else(t, tb),
    }
}

/// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
fn process_in_head(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    fn anything_else(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
        // "Pop the current node (the head element) off the stack... and
        //  reprocess the token."
        tb.process(&Token::end_tag("head"));
        tb.process(t)
    }

    if t.is_whitespace() {
        if let Token::Character { data } = t {
            tb.insert_character(data);
        }
        return true;
    }
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::InHead);
            false
        }
        Token::StartTag { name, .. } => match name.as_str() {
            "html" => process_in_body(t, tb),
            "base" | "basefont" | "bgsound" | "command" | "link" => {
                let el = tb.insert_empty(t);
                // Update the document base the first time a href is seen.
                if name == "base" {
                    tb.maybe_set_base_uri(el);
                }
                true
            }
            "meta" => {
                // Charset switching is out of scope; the element is kept.
                let _meta = tb.insert_empty(t);
                true
            }
            "title" => {
                handle_rcdata(t, tb);
                true
            }
            "noframes" | "style" => {
                handle_rawtext(t, tb);
                true
            }
            "noscript" => {
                // Scripting is never enabled here, so noscript content is
                // parsed as ordinary markup.
                tb.insert_element(t);
                tb.transition(HtmlTreeBuilderState::InHeadNoscript);
                true
            }
            "script" => {
                tb.insert_element(t);
                tb.tokeniser.transition(TokeniserState::ScriptData);
                tb.mark_insertion_mode();
                tb.transition(HtmlTreeBuilderState::Text);
                true
            }
            "head" => {
                tb.error(HtmlTreeBuilderState::InHead);
                false
            }
            _ => anything_else(t, tb),
        },
        Token::EndTag { name } => match name.as_str() {
            "head" => {
                tb.pop();
                tb.transition(HtmlTreeBuilderState::AfterHead);
                true
            }
            "body" | "html" | "br" => anything_else(t, tb),
            _ => {
                tb.error(HtmlTreeBuilderState::InHead);
                false
            }
        },
        _ => anything_else(t, tb),
    }
}

/// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
fn process_in_head_noscript(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    fn anything_else(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
        tb.error(HtmlTreeBuilderState::InHeadNoscript);
        tb.process(&Token::end_tag("noscript"));
        tb.process(t)
    }

    if t.is_doctype() {
        tb.error(HtmlTreeBuilderState::InHeadNoscript);
        return true;
    }
    if t.is_start_tag_named(&["html"]) {
        return tb.process_in(t, HtmlTreeBuilderState::InBody);
    }
    if t.is_end_tag_named(&["noscript"]) {
        tb.pop();
        tb.transition(HtmlTreeBuilderState::InHead);
        return true;
    }
    if t.is_whitespace()
        || t.is_comment()
        || t.is_start_tag_named(&["basefont", "bgsound", "link", "meta", "noframes", "style"])
    {
        return tb.process_in(t, HtmlTreeBuilderState::InHead);
    }
    if t.is_end_tag_named(&["br"]) {
        return anything_else(t, tb);
    }
    if t.is_start_tag_named(&["head", "noscript"]) || t.is_end_tag() {
        tb.error(HtmlTreeBuilderState::InHeadNoscript);
        return false;
    }
    anything_else(t, tb)
}

/// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
fn process_after_head(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    fn anything_else(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
        tb.process(&Token::start_tag("body"));
        tb.set_frameset_ok(true);
        tb.process(t)
    }

    if t.is_whitespace() {
        if let Token::Character { data } = t {
            tb.insert_character(data);
        }
        return true;
    }
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::AfterHead);
            true
        }
        Token::StartTag { name, .. } => match name.as_str() {
            "html" => tb.process_in(t, HtmlTreeBuilderState::InBody),
            "body" => {
                tb.insert_element(t);
                tb.set_frameset_ok(false);
                tb.transition(HtmlTreeBuilderState::InBody);
                true
            }
            "frameset" => {
                tb.insert_element(t);
                tb.transition(HtmlTreeBuilderState::InFrameset);
                true
            }
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "title" => {
                // "Push the node pointed to by the head element pointer
                //  onto the stack... process the token... remove it."
                tb.error(HtmlTreeBuilderState::AfterHead);
                let head = tb
                    .head_element()
                    .expect("head element pointer set before AfterHead");
                tb.push(head);
                tb.process_in(t, HtmlTreeBuilderState::InHead);
                tb.remove_from_stack(head);
                true
            }
            "head" => {
                tb.error(HtmlTreeBuilderState::AfterHead);
                false
            }
            _ => anything_else(t, tb),
        },
        Token::EndTag { name } => {
            if matches!(name.as_str(), "body" | "html") {
                anything_else(t, tb)
            } else {
                tb.error(HtmlTreeBuilderState::AfterHead);
                false
            }
        }
        _ => anything_else(t, tb),
    }
}

/// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
///
/// The workhorse mode.
fn process_in_body(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    match t {
        Token::Character { data } => {
            if data == "\u{0000}" {
                tb.error(HtmlTreeBuilderState::InBody);
                return false;
            }
            tb.reconstruct_formatting_elements();
            tb.insert_character(data);
            if !t.is_whitespace() {
                tb.set_frameset_ok(false);
            }
            true
        }
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::InBody);
            false
        }
        Token::StartTag { .. } => process_in_body_start_tag(t, tb),
        Token::EndTag { .. } => process_in_body_end_tag(t, tb),
        Token::Eof => true, // stop parsing
    }
}

fn process_in_body_start_tag(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    let Token::StartTag {
        name,
        attributes,
        self_closing,
    } = t
    else {
        unreachable!("start-tag handler dispatched on a start tag");
    };

    match name.as_str() {
        "html" => {
            tb.error(HtmlTreeBuilderState::InBody);
            // "For each attribute on the token, check to see if the
            //  attribute is already present on the top element of the
            //  stack... add the attribute."
            let html = tb.stack_at(0);
            if let Some(el) = tb.tree.as_element_mut(html) {
                for attr in attributes {
                    el.attrs.put_if_absent(&attr.name, &attr.value);
                }
            }
            true
        }
        "base" | "basefont" | "bgsound" | "command" | "link" | "meta" | "noframes" | "script"
        | "style" | "title" => tb.process_in(t, HtmlTreeBuilderState::InHead),
        "body" => {
            tb.error(HtmlTreeBuilderState::InBody);
            // "If the second element on the stack of open elements is
            //  not a body element... ignore the token." (fragment case)
            if tb.stack_size() == 1
                || (tb.stack_size() > 2 && tb.tag_name(tb.stack_at(1)) != "body")
            {
                false
            } else {
                tb.set_frameset_ok(false);
                let body = tb.stack_at(1);
                if let Some(el) = tb.tree.as_element_mut(body) {
                    for attr in attributes {
                        el.attrs.put_if_absent(&attr.name, &attr.value);
                    }
                }
                true
            }
        }
        "frameset" => {
            tb.error(HtmlTreeBuilderState::InBody);
            if tb.stack_size() == 1
                || (tb.stack_size() > 2 && tb.tag_name(tb.stack_at(1)) != "body")
            {
                false // fragment case
            } else if !tb.frameset_ok() {
                // Content has already committed this document to a body.
                quokka_common::warning::warn_once(
                    "HTML Parser",
                    "ignoring <frameset> after body content",
                );
                false
            } else {
                // "Remove the second element on the stack from its parent
                //  node... pop all the nodes from the bottom of the stack
                //  of open elements, from the current node up to, but not
                //  including, the root html element."
                let second = tb.stack_at(1);
                tb.tree.detach(second);
                while tb.stack_size() > 1 {
                    tb.pop();
                }
                tb.insert_element(t);
                tb.transition(HtmlTreeBuilderState::InFrameset);
                true
            }
        }
        name_str if IN_BODY_BLOCK_STARTS.contains(&name_str) => {
            if tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            tb.insert_element(t);
            true
        }
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            if tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            // "If the current node is an HTML element whose tag name is
            //  one of h1..h6, then this is a parse error; pop."
            if HEADINGS.contains(&tb.current_element_name()) {
                tb.error(HtmlTreeBuilderState::InBody);
                tb.pop();
            }
            tb.insert_element(t);
            true
        }
        "pre" | "listing" => {
            if tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            tb.insert_element(t);
            tb.set_frameset_ok(false);
            true
        }
        "form" => {
            // "If the form element pointer is not null, then this is a
            //  parse error; ignore the token." (only one open form)
            if tb.form_element().is_some() {
                tb.error(HtmlTreeBuilderState::InBody);
                return false;
            }
            if tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            let form = tb.insert_element(t);
            tb.set_form_element(Some(form));
            true
        }
        "li" => {
            tb.set_frameset_ok(false);
            // Walk up the stack: close an open <li>, stopping early at
            // special elements other than address/div/p.
            for i in (1..tb.stack_size()).rev() {
                let el = tb.stack_at(i);
                if tb.tag_name(el) == "li" {
                    tb.process(&Token::end_tag("li"));
                    break;
                }
                if tb.is_special(el) && !matches!(tb.tag_name(el), "address" | "div" | "p") {
                    break;
                }
            }
            if tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            tb.insert_element(t);
            true
        }
        "dd" | "dt" => {
            tb.set_frameset_ok(false);
            for i in (1..tb.stack_size()).rev() {
                let el = tb.stack_at(i);
                if matches!(tb.tag_name(el), "dd" | "dt") {
                    let close = tb.tag_name(el).to_string();
                    tb.process(&Token::end_tag(&close));
                    break;
                }
                if tb.is_special(el) && !matches!(tb.tag_name(el), "address" | "div" | "p") {
                    break;
                }
            }
            if tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            tb.insert_element(t);
            true
        }
        "plaintext" => {
            if tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            tb.insert_element(t);
            // Once in, never gets out.
            tb.tokeniser.transition(TokeniserState::Plaintext);
            true
        }
        "button" => {
            if tb.in_button_scope("button") {
                // "Close the previous button, then reprocess."
                tb.error(HtmlTreeBuilderState::InBody);
                tb.process(&Token::end_tag("button"));
                tb.process(t)
            } else {
                tb.reconstruct_formatting_elements();
                tb.insert_element(t);
                tb.set_frameset_ok(false);
                true
            }
        }
        "a" => {
            // "If the list of active formatting elements contains an a
            //  element between the end of the list and the last marker...
            //  act as if an end tag with the tag name 'a' had been seen,
            //  then remove that element."
            if tb.get_active_formatting_element("a").is_some() {
                tb.error(HtmlTreeBuilderState::InBody);
                tb.process(&Token::end_tag("a"));

                // Still on the stack?
                if let Some(remaining) = tb.get_from_stack("a") {
                    tb.remove_from_active_formatting_elements(remaining);
                    tb.remove_from_stack(remaining);
                }
            }
            tb.reconstruct_formatting_elements();
            let a = tb.insert_element(t);
            tb.push_active_formatting_elements(a);
            true
        }
        name_str if FORMATTING_STARTS.contains(&name_str) => {
            tb.reconstruct_formatting_elements();
            let el = tb.insert_element(t);
            tb.push_active_formatting_elements(el);
            true
        }
        "nobr" => {
            tb.reconstruct_formatting_elements();
            if tb.in_scope("nobr") {
                tb.error(HtmlTreeBuilderState::InBody);
                tb.process(&Token::end_tag("nobr"));
                tb.reconstruct_formatting_elements();
            }
            let el = tb.insert_element(t);
            tb.push_active_formatting_elements(el);
            true
        }
        "applet" | "marquee" | "object" => {
            tb.reconstruct_formatting_elements();
            tb.insert_element(t);
            tb.insert_marker_to_formatting_elements();
            tb.set_frameset_ok(false);
            true
        }
        "table" => {
            // "If the Document is not set to quirks mode, and the stack
            //  of open elements has a p element in button scope, close it."
            if tb.tree.quirks_mode() != QuirksMode::Quirks && tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            tb.insert_element(t);
            tb.set_frameset_ok(false);
            tb.transition(HtmlTreeBuilderState::InTable);
            true
        }
        "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
            tb.reconstruct_formatting_elements();
            tb.insert_empty(t);
            tb.set_frameset_ok(false);
            true
        }
        "input" => {
            tb.reconstruct_formatting_elements();
            tb.insert_empty(t);
            // "If the token does not have an attribute with the name
            //  'type', or if it does, but that attribute's value is not
            //  an ASCII case-insensitive match for 'hidden'..."
            let hidden = attributes
                .get("type")
                .is_some_and(|v| v.eq_ignore_ascii_case("hidden"));
            if !hidden {
                tb.set_frameset_ok(false);
            }
            true
        }
        "param" | "source" | "track" => {
            tb.insert_empty(t);
            true
        }
        "hr" => {
            if tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            tb.insert_empty(t);
            tb.set_frameset_ok(false);
            true
        }
        "image" => {
            // "Change the token's tag name to 'img' and reprocess it.
            //  (Don't ask.)"
            let renamed = Token::StartTag {
                name: "img".to_string(),
                self_closing: *self_closing,
                attributes: attributes.clone(),
            };
            tb.process(&renamed)
        }
        "isindex" => {
            // How much do we care about the early 90s? Expand into the
            // form/hr/label/input/hr run the parsing rules call for.
            quokka_common::warning::warn_once("HTML Parser", "expanding deprecated <isindex>");
            tb.error(HtmlTreeBuilderState::InBody);
            if tb.form_element().is_some() {
                return false;
            }
            tb.tokeniser.acknowledge_self_closing_flag();
            tb.process(&Token::start_tag("form"));
            if let Some(action) = attributes.get("action") {
                let action = action.to_string();
                if let Some(form) = tb.form_element() {
                    if let Some(el) = tb.tree.as_element_mut(form) {
                        el.attrs.put("action", &action);
                    }
                }
            }
            tb.process(&Token::start_tag("hr"));
            tb.process(&Token::start_tag("label"));
            // Hope you like english.
            let prompt = attributes
                .get("prompt")
                .unwrap_or("This is a searchable index. Enter search keywords: ")
                .to_string();
            tb.process(&Token::Character { data: prompt });

            let input_attrs = attributes
                .iter()
                .filter(|attr| !matches!(attr.name.as_str(), "name" | "action" | "prompt"))
                .cloned()
                .chain(std::iter::once(quokka_dom::Attribute::new(
                    "name".to_string(),
                    "isindex".to_string(),
                )))
                .collect();
            tb.process(&Token::StartTag {
                name: "input".to_string(),
                self_closing: false,
                attributes: input_attrs,
            });
            tb.process(&Token::end_tag("label"));
            tb.process(&Token::start_tag("hr"));
            tb.process(&Token::end_tag("form"));
            true
        }
        "textarea" => {
            tb.insert_element(t);
            tb.tokeniser.transition(TokeniserState::Rcdata);
            tb.mark_insertion_mode();
            tb.set_frameset_ok(false);
            tb.transition(HtmlTreeBuilderState::Text);
            true
        }
        "xmp" => {
            if tb.in_button_scope("p") {
                tb.process(&Token::end_tag("p"));
            }
            tb.reconstruct_formatting_elements();
            tb.set_frameset_ok(false);
            handle_rawtext(t, tb);
            true
        }
        "iframe" => {
            tb.set_frameset_ok(false);
            handle_rawtext(t, tb);
            true
        }
        "noembed" => {
            // Noscript would take this path too, were scripting enabled.
            handle_rawtext(t, tb);
            true
        }
        "select" => {
            tb.reconstruct_formatting_elements();
            tb.insert_element(t);
            tb.set_frameset_ok(false);

            match tb.state() {
                HtmlTreeBuilderState::InTable
                | HtmlTreeBuilderState::InCaption
                | HtmlTreeBuilderState::InTableBody
                | HtmlTreeBuilderState::InRow
                | HtmlTreeBuilderState::InCell => {
                    tb.transition(HtmlTreeBuilderState::InSelectInTable);
                }
                _ => tb.transition(HtmlTreeBuilderState::InSelect),
            }
            true
        }
        "optgroup" | "option" => {
            // "If the current node is an option element, then act as if
            //  an end tag with the tag name 'option' had been seen."
            if tb.current_element_name() == "option" {
                tb.process(&Token::end_tag("option"));
            }
            tb.reconstruct_formatting_elements();
            tb.insert_element(t);
            true
        }
        "rp" | "rt" => {
            // "If the stack of open elements has a ruby element in scope,
            //  then generate implied end tags. If the current node is not
            //  then a ruby element, this is a parse error." Close up to,
            //  but not including, the ruby before inserting.
            if tb.in_scope("ruby") {
                tb.generate_implied_end_tags(None);
                if tb.current_element_name() != "ruby" {
                    tb.error(HtmlTreeBuilderState::InBody);
                    tb.pop_stack_to_before("ruby");
                }
            }
            tb.insert_element(t);
            true
        }
        "math" | "svg" => {
            tb.reconstruct_formatting_elements();
            // Foreign subtrees are built opaquely: no namespace
            // adjustment, no integration points.
            if *self_closing {
                tb.insert_empty(t);
            } else {
                tb.insert_element(t);
                tb.tokeniser.acknowledge_self_closing_flag();
                tb.transition(HtmlTreeBuilderState::ForeignContent);
            }
            true
        }
        "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
        | "thead" | "tr" => {
            tb.error(HtmlTreeBuilderState::InBody);
            false
        }
        _ => {
            tb.reconstruct_formatting_elements();
            tb.insert_element(t);
            true
        }
    }
}

fn process_in_body_end_tag(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    let Token::EndTag { name } = t else {
        unreachable!("end-tag handler dispatched on an end tag");
    };
    let name = name.as_str();

    match name {
        "body" => {
            if tb.in_scope("body") {
                tb.transition(HtmlTreeBuilderState::AfterBody);
                true
            } else {
                tb.error(HtmlTreeBuilderState::InBody);
                false
            }
        }
        "html" => {
            let not_ignored = tb.process(&Token::end_tag("body"));
            if not_ignored {
                tb.process(t)
            } else {
                true
            }
        }
        name_str if IN_BODY_BLOCK_ENDS.contains(&name_str) => {
            if tb.in_scope(name_str) {
                tb.generate_implied_end_tags(None);
                if tb.current_element_name() != name_str {
                    tb.error(HtmlTreeBuilderState::InBody);
                }
                tb.pop_stack_to_close(&[name_str]);
                true
            } else {
                // Nothing to close.
                tb.error(HtmlTreeBuilderState::InBody);
                false
            }
        }
        "form" => {
            let current_form = tb.form_element();
            tb.set_form_element(None);
            if current_form.is_none() || !tb.in_scope("form") {
                tb.error(HtmlTreeBuilderState::InBody);
                false
            } else {
                let current_form = current_form.expect("checked above");
                tb.generate_implied_end_tags(None);
                if tb.current_element_name() != "form" {
                    tb.error(HtmlTreeBuilderState::InBody);
                }
                // Remove the form from the stack wherever it sits;
                // anything under it shifts up.
                tb.remove_from_stack(current_form);
                true
            }
        }
        "p" => {
            if tb.in_button_scope("p") {
                tb.generate_implied_end_tags(Some("p"));
                if tb.current_element_name() != "p" {
                    tb.error(HtmlTreeBuilderState::InBody);
                }
                tb.pop_stack_to_close(&["p"]);
                true
            } else {
                // No p to close: create an empty <p></p> and reprocess.
                tb.error(HtmlTreeBuilderState::InBody);
                tb.process(&Token::start_tag("p"));
                tb.process(t)
            }
        }
        "li" => {
            if tb.in_list_item_scope("li") {
                tb.generate_implied_end_tags(Some("li"));
                if tb.current_element_name() != "li" {
                    tb.error(HtmlTreeBuilderState::InBody);
                }
                tb.pop_stack_to_close(&["li"]);
                true
            } else {
                tb.error(HtmlTreeBuilderState::InBody);
                false
            }
        }
        "dd" | "dt" => {
            if tb.in_scope(name) {
                tb.generate_implied_end_tags(Some(name));
                if tb.current_element_name() != name {
                    tb.error(HtmlTreeBuilderState::InBody);
                }
                tb.pop_stack_to_close(&[name]);
                true
            } else {
                tb.error(HtmlTreeBuilderState::InBody);
                false
            }
        }
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            if tb.in_scope_any(HEADINGS) {
                tb.generate_implied_end_tags(Some(name));
                if tb.current_element_name() != name {
                    tb.error(HtmlTreeBuilderState::InBody);
                }
                tb.pop_stack_to_close(HEADINGS);
                true
            } else {
                tb.error(HtmlTreeBuilderState::InBody);
                false
            }
        }
        name_str if ADOPTION_ENDS.contains(&name_str) => {
            // The adoption agency algorithm.
            tb.adoption_agency(name_str, HtmlTreeBuilderState::InBody)
        }
        "applet" | "marquee" | "object" => {
            if tb.in_scope(name) {
                tb.generate_implied_end_tags(None);
                if tb.current_element_name() != name {
                    tb.error(HtmlTreeBuilderState::InBody);
                }
                tb.pop_stack_to_close(&[name]);
                tb.clear_formatting_elements_to_last_marker();
                true
            } else {
                tb.error(HtmlTreeBuilderState::InBody);
                false
            }
        }
        "br" => {
            // "Act as described in the 'anything else' entry" for a br
            // start tag; drop the end tag itself.
            tb.error(HtmlTreeBuilderState::InBody);
            tb.process(&Token::start_tag("br"));
            false
        }
        // "sarcasm" and everything else: take a deep breath, then walk
        // the stack for a matching open element.
        name_str => tb.any_other_end_tag(name_str, HtmlTreeBuilderState::InBody),
    }
}

/// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
fn process_text(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    match t {
        Token::Character { data } => {
            tb.insert_character(data);
            true
        }
        Token::Eof => {
            tb.error(HtmlTreeBuilderState::Text);
            // If the current node is a script, it would be marked as
            // already started; scripting is out of scope here.
            tb.pop();
            let original = tb.original_state();
            tb.transition(original);
            tb.process(t)
        }
        Token::EndTag { .. } => {
            tb.pop();
            let original = tb.original_state();
            tb.transition(original);
            true
        }
        _ => true,
    }
}

/// InTable's "anything else": process in InBody with foster parenting
/// enabled while the current node is table-structural.
fn in_table_anything_else(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    tb.error(HtmlTreeBuilderState::InTable);
    if matches!(
        tb.current_element_name(),
        "table" | "tbody" | "tfoot" | "thead" | "tr"
    ) {
        tb.set_foster_inserts(true);
        let processed = tb.process_in(t, HtmlTreeBuilderState::InBody);
        tb.set_foster_inserts(false);
        processed
    } else {
        tb.process_in(t, HtmlTreeBuilderState::InBody)
    }
}

/// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
fn process_in_table(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    match t {
        Token::Character { .. } => {
            // "Let the pending table character tokens be an empty list of
            //  tokens... switch the insertion mode to 'in table text' and
            //  reprocess the token."
            tb.new_pending_table_characters();
            tb.mark_insertion_mode();
            tb.transition(HtmlTreeBuilderState::InTableText);
            tb.process(t)
        }
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::InTable);
            false
        }
        Token::StartTag {
            name, attributes, ..
        } => match name.as_str() {
            "caption" => {
                tb.clear_stack_to_table_context();
                tb.insert_marker_to_formatting_elements();
                tb.insert_element(t);
                tb.transition(HtmlTreeBuilderState::InCaption);
                true
            }
            "colgroup" => {
                tb.clear_stack_to_table_context();
                tb.insert_element(t);
                tb.transition(HtmlTreeBuilderState::InColumnGroup);
                true
            }
            "col" => {
                tb.process(&Token::start_tag("colgroup"));
                tb.process(t)
            }
            "tbody" | "tfoot" | "thead" => {
                tb.clear_stack_to_table_context();
                tb.insert_element(t);
                tb.transition(HtmlTreeBuilderState::InTableBody);
                true
            }
            "td" | "th" | "tr" => {
                tb.process(&Token::start_tag("tbody"));
                tb.process(t)
            }
            "table" => {
                tb.error(HtmlTreeBuilderState::InTable);
                let processed = tb.process(&Token::end_tag("table"));
                if processed {
                    // Only ignored in the fragment case.
                    tb.process(t)
                } else {
                    true
                }
            }
            "style" | "script" => tb.process_in(t, HtmlTreeBuilderState::InHead),
            "input" => {
                let hidden = attributes
                    .get("type")
                    .is_some_and(|v| v.eq_ignore_ascii_case("hidden"));
                if hidden {
                    tb.insert_empty(t);
                    true
                } else {
                    in_table_anything_else(t, tb)
                }
            }
            "form" => {
                tb.error(HtmlTreeBuilderState::InTable);
                if tb.form_element().is_some() {
                    false
                } else {
                    let form = tb.insert_empty(t);
                    tb.set_form_element(Some(form));
                    true
                }
            }
            _ => in_table_anything_else(t, tb),
        },
        Token::EndTag { name } => match name.as_str() {
            "table" => {
                if tb.in_table_scope("table") {
                    tb.pop_stack_to_close(&["table"]);
                    tb.reset_insertion_mode();
                    true
                } else {
                    tb.error(HtmlTreeBuilderState::InTable);
                    false
                }
            }
            "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => {
                tb.error(HtmlTreeBuilderState::InTable);
                false
            }
            _ => in_table_anything_else(t, tb),
        },
        Token::Eof => {
            if tb.current_element_name() == "html" {
                tb.error(HtmlTreeBuilderState::InTable);
            }
            true // stops parsing
        }
    }
}

/// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
fn process_in_table_text(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    match t {
        Token::Character { data } => {
            if data == "\u{0000}" {
                tb.error(HtmlTreeBuilderState::InTableText);
                return false;
            }
            tb.push_pending_table_character(data);
            true
        }
        _ => {
            // Flush the pending characters: whitespace runs go into the
            // table, anything else is fostered out through InBody.
            let pending = tb.take_pending_table_characters();
            for data in pending {
                let character = Token::Character { data };
                if character.is_whitespace() {
                    if let Token::Character { data } = &character {
                        tb.insert_character(data);
                    }
                } else {
                    in_table_anything_else(&character, tb);
                }
            }
            tb.new_pending_table_characters();
            let original = tb.original_state();
            tb.transition(original);
            tb.process(t)
        }
    }
}

/// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
fn process_in_caption(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    match t {
        Token::EndTag { name } if name == "caption" => {
            if tb.in_table_scope("caption") {
                tb.generate_implied_end_tags(None);
                if tb.current_element_name() != "caption" {
                    tb.error(HtmlTreeBuilderState::InCaption);
                }
                tb.pop_stack_to_close(&["caption"]);
                tb.clear_formatting_elements_to_last_marker();
                tb.transition(HtmlTreeBuilderState::InTable);
                true
            } else {
                tb.error(HtmlTreeBuilderState::InCaption);
                false
            }
        }
        _ => {
            let breaks_out = t.is_start_tag_named(&[
                "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
            ]) || t.is_end_tag_named(&["table"]);
            if breaks_out {
                tb.error(HtmlTreeBuilderState::InCaption);
                let processed = tb.process(&Token::end_tag("caption"));
                if processed {
                    return tb.process(t);
                }
                return true;
            }
            if t.is_end_tag_named(&[
                "body", "col", "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr",
            ]) {
                tb.error(HtmlTreeBuilderState::InCaption);
                return false;
            }
            tb.process_in(t, HtmlTreeBuilderState::InBody)
        }
    }
}

/// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
fn process_in_column_group(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    fn anything_else(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
        let processed = tb.process(&Token::end_tag("colgroup"));
        if processed {
            tb.process(t)
        } else {
            true // frag case
        }
    }

    if t.is_whitespace() {
        if let Token::Character { data } = t {
            tb.insert_character(data);
        }
        return true;
    }
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::InColumnGroup);
            true
        }
        Token::StartTag { name, .. } => match name.as_str() {
            "html" => tb.process_in(t, HtmlTreeBuilderState::InBody),
            "col" => {
                tb.insert_empty(t);
                true
            }
            _ => anything_else(t, tb),
        },
        Token::EndTag { name } => {
            if name == "colgroup" {
                if tb.current_element_name() == "html" {
                    // frag case
                    tb.error(HtmlTreeBuilderState::InColumnGroup);
                    false
                } else {
                    tb.pop();
                    tb.transition(HtmlTreeBuilderState::InTable);
                    true
                }
            } else {
                anything_else(t, tb)
            }
        }
        Token::Eof => {
            if tb.current_element_name() == "html" {
                true // stop parsing; frag case
            } else {
                anything_else(t, tb)
            }
        }
        Token::Character { .. } => anything_else(t, tb),
    }
}

/// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
fn process_in_table_body(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    fn exit_table_body(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
        if !(tb.in_table_scope("tbody") || tb.in_table_scope("thead") || tb.in_scope("tfoot")) {
            // frag case
            tb.error(HtmlTreeBuilderState::InTableBody);
            return false;
        }
        tb.clear_stack_to_table_body_context();
        let body_name = tb.current_element_name().to_string();
        tb.process(&Token::end_tag(&body_name)); // tbody, tfoot, thead
        tb.process(t)
    }

    match t {
        Token::StartTag { name, .. } => match name.as_str() {
            "tr" => {
                tb.clear_stack_to_table_body_context();
                tb.insert_element(t);
                tb.transition(HtmlTreeBuilderState::InRow);
                true
            }
            "th" | "td" => {
                tb.error(HtmlTreeBuilderState::InTableBody);
                tb.process(&Token::start_tag("tr"));
                tb.process(t)
            }
            "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" => exit_table_body(t, tb),
            _ => tb.process_in(t, HtmlTreeBuilderState::InTable),
        },
        Token::EndTag { name } => match name.as_str() {
            "tbody" | "tfoot" | "thead" => {
                if tb.in_table_scope(name) {
                    tb.clear_stack_to_table_body_context();
                    tb.pop();
                    tb.transition(HtmlTreeBuilderState::InTable);
                    true
                } else {
                    tb.error(HtmlTreeBuilderState::InTableBody);
                    false
                }
            }
            "table" => exit_table_body(t, tb),
            "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr" => {
                tb.error(HtmlTreeBuilderState::InTableBody);
                false
            }
            _ => tb.process_in(t, HtmlTreeBuilderState::InTable),
        },
        _ => tb.process_in(t, HtmlTreeBuilderState::InTable),
    }
}

/// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
fn process_in_row(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    fn handle_missing_tr(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
        let processed = tb.process(&Token::end_tag("tr"));
        if processed { tb.process(t) } else { false }
    }

    match t {
        Token::StartTag { name, .. } => match name.as_str() {
            "th" | "td" => {
                tb.clear_stack_to_table_row_context();
                tb.insert_element(t);
                tb.transition(HtmlTreeBuilderState::InCell);
                tb.insert_marker_to_formatting_elements();
                true
            }
            "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
                handle_missing_tr(t, tb)
            }
            _ => tb.process_in(t, HtmlTreeBuilderState::InTable),
        },
        Token::EndTag { name } => match name.as_str() {
            "tr" => {
                if tb.in_table_scope("tr") {
                    tb.clear_stack_to_table_row_context();
                    tb.pop(); // tr
                    tb.transition(HtmlTreeBuilderState::InTableBody);
                    true
                } else {
                    // frag case
                    tb.error(HtmlTreeBuilderState::InRow);
                    false
                }
            }
            "table" => handle_missing_tr(t, tb),
            "tbody" | "tfoot" | "thead" => {
                if tb.in_table_scope(name) {
                    tb.process(&Token::end_tag("tr"));
                    tb.process(t)
                } else {
                    tb.error(HtmlTreeBuilderState::InRow);
                    false
                }
            }
            "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" => {
                tb.error(HtmlTreeBuilderState::InRow);
                false
            }
            _ => tb.process_in(t, HtmlTreeBuilderState::InTable),
        },
        _ => tb.process_in(t, HtmlTreeBuilderState::InTable),
    }
}

/// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
fn process_in_cell(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    /// [Close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    fn close_cell(tb: &mut HtmlTreeBuilder) {
        if tb.in_table_scope("td") {
            tb.process(&Token::end_tag("td"));
        } else {
            // Only reached with th or td in scope.
            tb.process(&Token::end_tag("th"));
        }
    }

    match t {
        Token::EndTag { name } => match name.as_str() {
            name @ ("td" | "th") => {
                if !tb.in_table_scope(name) {
                    tb.error(HtmlTreeBuilderState::InCell);
                    // Might not be in scope if empty: <td /> processing a
                    // fake end tag.
                    tb.transition(HtmlTreeBuilderState::InRow);
                    return false;
                }
                tb.generate_implied_end_tags(None);
                if tb.current_element_name() != name {
                    tb.error(HtmlTreeBuilderState::InCell);
                }
                tb.pop_stack_to_close(&[name]);
                tb.clear_formatting_elements_to_last_marker();
                tb.transition(HtmlTreeBuilderState::InRow);
                true
            }
            "body" | "caption" | "col" | "colgroup" | "html" => {
                tb.error(HtmlTreeBuilderState::InCell);
                false
            }
            name @ ("table" | "tbody" | "tfoot" | "thead" | "tr") => {
                if tb.in_table_scope(name) {
                    close_cell(tb);
                    tb.process(t)
                } else {
                    tb.error(HtmlTreeBuilderState::InCell);
                    false
                }
            }
            _ => tb.process_in(t, HtmlTreeBuilderState::InBody),
        },
        Token::StartTag { name, .. }
            if matches!(
                name.as_str(),
                "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
            ) =>
        {
            if tb.in_table_scope("td") || tb.in_table_scope("th") {
                close_cell(tb);
                tb.process(t)
            } else {
                tb.error(HtmlTreeBuilderState::InCell);
                false
            }
        }
        _ => tb.process_in(t, HtmlTreeBuilderState::InBody),
    }
}

/// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
fn process_in_select(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    fn anything_else(tb: &mut HtmlTreeBuilder) -> bool {
        tb.error(HtmlTreeBuilderState::InSelect);
        false
    }

    match t {
        Token::Character { data } => {
            if data == "\u{0000}" {
                tb.error(HtmlTreeBuilderState::InSelect);
                false
            } else {
                tb.insert_character(data);
                true
            }
        }
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::InSelect);
            false
        }
        Token::StartTag { name, .. } => match name.as_str() {
            "html" => tb.process_in(t, HtmlTreeBuilderState::InBody),
            "option" => {
                if tb.current_element_name() == "option" {
                    tb.process(&Token::end_tag("option"));
                }
                tb.insert_element(t);
                true
            }
            "optgroup" => {
                if tb.current_element_name() == "option" {
                    tb.process(&Token::end_tag("option"));
                } else if tb.current_element_name() == "optgroup" {
                    tb.process(&Token::end_tag("optgroup"));
                }
                tb.insert_element(t);
                true
            }
            "select" => {
                // "Act as if an end tag 'select' had been seen."
                tb.error(HtmlTreeBuilderState::InSelect);
                tb.process(&Token::end_tag("select"))
            }
            "input" | "keygen" | "textarea" => {
                tb.error(HtmlTreeBuilderState::InSelect);
                if !tb.in_select_scope("select") {
                    false // frag
                } else {
                    tb.process(&Token::end_tag("select"));
                    tb.process(t)
                }
            }
            "script" => tb.process_in(t, HtmlTreeBuilderState::InHead),
            _ => anything_else(tb),
        },
        Token::EndTag { name } => match name.as_str() {
            "optgroup" => {
                // "First, if the current node is an option element, and
                //  the node immediately before it... is an optgroup
                //  element, then act as if an end tag 'option' was seen."
                if tb.current_element_name() == "option" {
                    let above = tb
                        .current_element()
                        .and_then(|el| tb.above_on_stack(el));
                    if above.is_some_and(|el| tb.tag_name(el) == "optgroup") {
                        tb.process(&Token::end_tag("option"));
                    }
                }
                if tb.current_element_name() == "optgroup" {
                    tb.pop();
                } else {
                    tb.error(HtmlTreeBuilderState::InSelect);
                }
                true
            }
            "option" => {
                if tb.current_element_name() == "option" {
                    tb.pop();
                } else {
                    tb.error(HtmlTreeBuilderState::InSelect);
                }
                true
            }
            "select" => {
                if tb.in_select_scope("select") {
                    tb.pop_stack_to_close(&["select"]);
                    tb.reset_insertion_mode();
                    true
                } else {
                    tb.error(HtmlTreeBuilderState::InSelect);
                    false
                }
            }
            _ => anything_else(tb),
        },
        Token::Eof => {
            if tb.current_element_name() != "html" {
                tb.error(HtmlTreeBuilderState::InSelect);
            }
            true
        }
    }
}

/// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
fn process_in_select_in_table(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    const TABLE_PARTS: &[&str] = &[
        "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
    ];

    if t.is_start_tag_named(TABLE_PARTS) {
        // Table structure forces an implicit </select>.
        tb.error(HtmlTreeBuilderState::InSelectInTable);
        tb.process(&Token::end_tag("select"));
        return tb.process(t);
    }
    if let Token::EndTag { name } = t {
        if TABLE_PARTS.contains(&name.as_str()) {
            tb.error(HtmlTreeBuilderState::InSelectInTable);
            if tb.in_table_scope(name) {
                tb.process(&Token::end_tag("select"));
                return tb.process(t);
            }
            return false;
        }
    }
    tb.process_in(t, HtmlTreeBuilderState::InSelect)
}

/// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
fn process_after_body(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    if t.is_whitespace() {
        return tb.process_in(t, HtmlTreeBuilderState::InBody);
    }
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data); // into the html element
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::AfterBody);
            false
        }
        Token::StartTag { name, .. } if name == "html" => {
            tb.process_in(t, HtmlTreeBuilderState::InBody)
        }
        Token::EndTag { name } if name == "html" => {
            if tb.is_fragment_parsing() {
                tb.error(HtmlTreeBuilderState::AfterBody);
                false
            } else {
                tb.transition(HtmlTreeBuilderState::AfterAfterBody);
                true
            }
        }
        Token::Eof => true, // chillax! we're done
        _ => {
            tb.error(HtmlTreeBuilderState::AfterBody);
            tb.transition(HtmlTreeBuilderState::InBody);
            tb.process(t)
        }
    }
}

/// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
fn process_in_frameset(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    if t.is_whitespace() {
        if let Token::Character { data } = t {
            tb.insert_character(data);
        }
        return true;
    }
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::InFrameset);
            false
        }
        Token::StartTag { name, .. } => match name.as_str() {
            "html" => tb.process_in(t, HtmlTreeBuilderState::InBody),
            "frameset" => {
                tb.insert_element(t);
                true
            }
            "frame" => {
                tb.insert_empty(t);
                true
            }
            "noframes" => tb.process_in(t, HtmlTreeBuilderState::InHead),
            _ => {
                tb.error(HtmlTreeBuilderState::InFrameset);
                false
            }
        },
        Token::EndTag { name } if name == "frameset" => {
            if tb.current_element_name() == "html" {
                // frag
                tb.error(HtmlTreeBuilderState::InFrameset);
                false
            } else {
                tb.pop();
                if !tb.is_fragment_parsing() && tb.current_element_name() != "frameset" {
                    tb.transition(HtmlTreeBuilderState::AfterFrameset);
                }
                true
            }
        }
        Token::Eof => {
            if tb.current_element_name() != "html" {
                tb.error(HtmlTreeBuilderState::InFrameset);
            }
            true
        }
        _ => {
            tb.error(HtmlTreeBuilderState::InFrameset);
            false
        }
    }
}

/// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
fn process_after_frameset(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    if t.is_whitespace() {
        if let Token::Character { data } = t {
            tb.insert_character(data);
        }
        return true;
    }
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::AfterFrameset);
            false
        }
        Token::StartTag { name, .. } if name == "html" => {
            tb.process_in(t, HtmlTreeBuilderState::InBody)
        }
        Token::StartTag { name, .. } if name == "noframes" => {
            tb.process_in(t, HtmlTreeBuilderState::InHead)
        }
        Token::EndTag { name } if name == "html" => {
            tb.transition(HtmlTreeBuilderState::AfterAfterFrameset);
            true
        }
        Token::Eof => true, // cool your heels, we're complete
        _ => {
            tb.error(HtmlTreeBuilderState::AfterFrameset);
            false
        }
    }
}

/// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
fn process_after_after_body(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        _ if t.is_doctype() || t.is_whitespace() || t.is_start_tag_named(&["html"]) => {
            tb.process_in(t, HtmlTreeBuilderState::InBody)
        }
        Token::Eof => true, // nice work chuck
        _ => {
            tb.error(HtmlTreeBuilderState::AfterAfterBody);
            tb.transition(HtmlTreeBuilderState::InBody);
            tb.process(t)
        }
    }
}

/// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
fn process_after_after_frameset(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    match t {
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        _ if t.is_doctype() || t.is_whitespace() || t.is_start_tag_named(&["html"]) => {
            tb.process_in(t, HtmlTreeBuilderState::InBody)
        }
        Token::Eof => true,
        Token::StartTag { name, .. } if name == "noframes" => {
            tb.process_in(t, HtmlTreeBuilderState::InHead)
        }
        _ => {
            tb.error(HtmlTreeBuilderState::AfterAfterFrameset);
            false
        }
    }
}

/// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// Opaque subtree handling: no namespace or attribute adjustment, no
/// integration points. Elements nest generically until the `<math>` or
/// `<svg>` root closes, then control returns to InBody.
fn process_foreign_content(t: &Token, tb: &mut HtmlTreeBuilder) -> bool {
    match t {
        Token::Character { data } => {
            if data == "\u{0000}" {
                tb.error(HtmlTreeBuilderState::ForeignContent);
                return false;
            }
            tb.insert_character(data);
            true
        }
        Token::Comment { data } => {
            tb.insert_comment(data);
            true
        }
        Token::Doctype { .. } => {
            tb.error(HtmlTreeBuilderState::ForeignContent);
            false
        }
        Token::StartTag { self_closing, .. } => {
            if *self_closing {
                tb.insert_empty(t);
            } else {
                tb.insert_element(t);
            }
            true
        }
        Token::EndTag { name } => {
            if tb.get_from_stack(name).is_none() {
                tb.error(HtmlTreeBuilderState::ForeignContent);
                return false;
            }
            tb.pop_stack_to_close(&[name.as_str()]);
            if tb.get_from_stack("math").is_none() && tb.get_from_stack("svg").is_none() {
                tb.transition(HtmlTreeBuilderState::InBody);
            }
            true
        }
        Token::Eof => {
            tb.transition(HtmlTreeBuilderState::InBody);
            tb.process(t)
        }
    }
}
