//! The HTML tree builder.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//!
//! "The input to the tree construction stage is a sequence of tokens from
//! the tokenization stage. The tree construction stage is associated with
//! a DOM Document object when a parser is created."
//!
//! The builder drives the tokeniser one token at a time, dispatching each
//! token to the current insertion mode. All document-wide parse state
//! (the open-elements stack, the list of active formatting elements, the
//! head/form pointers, the frameset-ok and foster-parenting flags, the
//! pending table characters) lives here; only the durable outputs (the
//! tree, the quirks mode, the base URI) end up on the Document.

use quokka_dom::{Attributes, DomTree, ElementData, NodeId, NodeType};

use crate::parse_error::{ParseError, ParseErrorList};
use crate::reader::CharacterReader;
use crate::tokeniser::{Token, Tokeniser, TokeniserState};

use super::state::HtmlTreeBuilderState;

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list contains elements in the formatting category, and markers."
///
/// Each element entry snapshots the name and attributes the element was
/// created with, so reconstruction and the Noah's Ark comparison do not
/// depend on the (possibly relocated) tree node.
#[derive(Debug, Clone)]
pub(crate) enum FormattingEntry {
    /// "Markers are inserted when entering applet, object, marquee,
    /// template, td, th, and caption elements."
    Marker,
    Element {
        id: NodeId,
        name: String,
        attributes: Attributes,
    },
}

/// HTML5-conformant tree builder.
pub struct HtmlTreeBuilder {
    pub(crate) tokeniser: Tokeniser,
    pub(crate) tree: DomTree,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack: Vec<NodeId>,

    state: HtmlTreeBuilderState,
    original_state: HtmlTreeBuilderState,

    base_uri: String,
    base_uri_set_from_doc: bool,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element: Option<NodeId>,
    form_element: Option<NodeId>,

    formatting_elements: Vec<FormattingEntry>,

    frameset_ok: bool,
    foster_inserts: bool,

    fragment_parsing: bool,
    context_element_name: Option<String>,

    pending_table_characters: Vec<String>,

    /// The kind of the token being processed, for error messages only.
    current_token_type: &'static str,
}

impl HtmlTreeBuilder {
    #[must_use]
    pub fn new(input: &str, base_uri: &str, errors: ParseErrorList) -> Self {
        let reader = CharacterReader::new(input);
        let tokeniser = Tokeniser::new(reader, errors);
        let mut tree = DomTree::new();
        tree.set_base_uri(base_uri);
        Self {
            tokeniser,
            tree,
            stack: Vec::new(),
            state: HtmlTreeBuilderState::Initial,
            original_state: HtmlTreeBuilderState::Initial,
            base_uri: base_uri.to_string(),
            base_uri_set_from_doc: false,
            head_element: None,
            form_element: None,
            formatting_elements: Vec::new(),
            frameset_ok: true,
            foster_inserts: false,
            fragment_parsing: false,
            context_element_name: None,
            pending_table_characters: Vec::new(),
            current_token_type: "?",
        }
    }

    /// Run a full-document parse and return the tree plus whatever errors
    /// were retained.
    pub fn parse(mut self) -> (DomTree, ParseErrorList) {
        self.run_parser();
        (self.tree, self.tokeniser.into_errors())
    }

    /// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#html-fragment-parsing-algorithm)
    ///
    /// Fragment parse: tokenise and build in the context of an element
    /// named `context`. Returns the tree, plus the parsed nodes (the
    /// children of an invisible `<html>` wrapper).
    pub fn parse_fragment(mut self, context: &str) -> (DomTree, Vec<NodeId>, ParseErrorList) {
        self.fragment_parsing = true;
        let context = context.to_ascii_lowercase();
        self.context_element_name = Some(context.clone());

        // "Set the state of the HTML parser's tokenization stage as
        //  follows, switching on the context element."
        match context.as_str() {
            "title" | "textarea" => self.tokeniser.transition(TokeniserState::Rcdata),
            "iframe" | "noembed" | "noframes" | "style" | "xmp" => {
                self.tokeniser.transition(TokeniserState::Rawtext);
            }
            "script" => self.tokeniser.transition(TokeniserState::ScriptData),
            "plaintext" => self.tokeniser.transition(TokeniserState::Plaintext),
            _ => {} // data, by default
        }
        // Make end tags for the context name "appropriate" so </script>
        // and friends close as they would in a full document.
        self.tokeniser.set_last_start_tag(&context);

        // "Create a new html element with no attributes... and let the
        //  root be that element."
        let root = self.tree.alloc(NodeType::Element(ElementData {
            tag_name: "html".to_string(),
            attrs: Attributes::new(),
        }));
        self.tree.append_child(NodeId::ROOT, root);
        self.stack.push(root);
        self.reset_insertion_mode();

        // "If the context element is a form element, set the form element
        //  pointer to it." The fragment has no real ancestors, so the
        //  context name is all there is to check.
        if context == "form" {
            self.form_element = Some(root); // stand-in: nested forms are suppressed
        }

        self.run_parser();

        let nodes = self.tree.children(root).to_vec();
        (self.tree, nodes, self.tokeniser.into_errors())
    }

    fn run_parser(&mut self) {
        loop {
            let token = self.tokeniser.read();
            let at_eof = token.is_eof();
            self.process(&token);
            if at_eof {
                break;
            }
        }
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// Process a token in the current insertion mode. Returns `false`
    /// when the token was ignored.
    pub(crate) fn process(&mut self, token: &Token) -> bool {
        self.current_token_type = match token {
            Token::Doctype { .. } => "Doctype",
            Token::StartTag { .. } => "StartTag",
            Token::EndTag { .. } => "EndTag",
            Token::Comment { .. } => "Comment",
            Token::Character { .. } => "Character",
            Token::Eof => "EOF",
        };
        let state = self.state;
        state.process(token, self)
    }

    /// "Process the token according to the rules given in the section for
    /// parsing tokens in the X insertion mode" - without transitioning.
    pub(crate) fn process_in(&mut self, token: &Token, state: HtmlTreeBuilderState) -> bool {
        state.process(token, self)
    }

    /// Record a tree-construction parse error.
    pub(crate) fn error(&mut self, state: HtmlTreeBuilderState) {
        if self.tokeniser.errors_mut().can_add_error() {
            let pos = self.tokeniser.pos();
            let message = format!(
                "Unexpected token [{}] when in state [{state}]",
                self.current_token_type
            );
            self.tokeniser.errors_mut().add(ParseError::new(pos, message));
        }
    }

    // ========== state transitions ==========

    pub(crate) fn transition(&mut self, state: HtmlTreeBuilderState) {
        self.state = state;
    }

    #[must_use]
    pub(crate) fn state(&self) -> HtmlTreeBuilderState {
        self.state
    }

    /// Save the current mode before an excursion into Text or InTableText.
    pub(crate) fn mark_insertion_mode(&mut self) {
        self.original_state = self.state;
    }

    #[must_use]
    pub(crate) fn original_state(&self) -> HtmlTreeBuilderState {
        self.original_state
    }

    // ========== document-wide flags and pointers ==========

    pub(crate) fn frameset_ok(&self) -> bool {
        self.frameset_ok
    }

    pub(crate) fn set_frameset_ok(&mut self, ok: bool) {
        self.frameset_ok = ok;
    }

    pub(crate) fn is_fragment_parsing(&self) -> bool {
        self.fragment_parsing
    }

    pub(crate) fn head_element(&self) -> Option<NodeId> {
        self.head_element
    }

    pub(crate) fn set_head_element(&mut self, el: NodeId) {
        self.head_element = Some(el);
    }

    pub(crate) fn form_element(&self) -> Option<NodeId> {
        self.form_element
    }

    pub(crate) fn set_form_element(&mut self, el: Option<NodeId>) {
        self.form_element = el;
    }

    pub(crate) fn set_foster_inserts(&mut self, foster: bool) {
        self.foster_inserts = foster;
    }

    pub(crate) fn new_pending_table_characters(&mut self) {
        self.pending_table_characters.clear();
    }

    pub(crate) fn push_pending_table_character(&mut self, data: &str) {
        self.pending_table_characters.push(data.to_string());
    }

    pub(crate) fn take_pending_table_characters(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_table_characters)
    }

    /// [§ 4.2.3 The base element](https://html.spec.whatwg.org/multipage/semantics.html#the-base-element)
    ///
    /// The first `<base href>` seen re-bases the document; later ones are
    /// ignored.
    pub(crate) fn maybe_set_base_uri(&mut self, base_el: NodeId) {
        if self.base_uri_set_from_doc {
            return;
        }
        let Some(href) = self
            .tree
            .as_element(base_el)
            .and_then(|el| el.attrs.get("href"))
        else {
            return;
        };
        let resolved = quokka_common::url::resolve_url(href, Some(&self.base_uri));
        if !resolved.is_empty() {
            self.base_uri = resolved;
            self.base_uri_set_from_doc = true;
            let base = self.base_uri.clone();
            self.tree.set_base_uri(&base);
        }
    }

    #[must_use]
    pub(crate) fn tag_name(&self, id: NodeId) -> &str {
        self.tree.tag_name(id).unwrap_or("")
    }

    /// Name of the current node, or "" with an empty stack.
    #[must_use]
    pub(crate) fn current_element_name(&self) -> &str {
        self.stack.last().map_or("", |&id| self.tag_name(id))
    }

    // ========== creating and inserting nodes ==========

    fn create_element(&mut self, name: &str, attributes: &Attributes) -> NodeId {
        self.tree.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            attrs: attributes.clone(),
        }))
    }

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// Attach a finished node at the appropriate place: the foster parent
    /// location while foster parenting is in force, the Document when the
    /// stack is empty, otherwise the current node.
    fn insert_node(&mut self, node: NodeId) {
        if self.stack.is_empty() {
            self.tree.append_child(NodeId::ROOT, node);
        } else if self.foster_inserts {
            self.insert_in_foster_parent(node);
        } else {
            let parent = *self.stack.last().expect("stack checked non-empty");
            self.tree.append_child(parent, node);
        }
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// Create an element for the start tag, insert it, and push it onto
    /// the stack of open elements.
    ///
    /// # Panics
    ///
    /// Panics when handed a non-start-tag token; that is a bug in the
    /// calling insertion mode.
    pub(crate) fn insert_element(&mut self, token: &Token) -> NodeId {
        let Token::StartTag {
            name, attributes, ..
        } = token
        else {
            panic!("insert_element called with non-StartTag token");
        };
        let el = self.create_element(name, attributes);
        self.insert_node(el);
        self.stack.push(el);
        el
    }

    /// Insert a synthetic element with no attributes (implied `<html>`,
    /// `<head>`, `<body>`, ...).
    pub(crate) fn insert_start_tag(&mut self, name: &str) -> NodeId {
        let el = self.create_element(name, &Attributes::new());
        self.insert_node(el);
        self.stack.push(el);
        el
    }

    /// Insert a void element: attached but never pushed. Acknowledges a
    /// self-closing flag when the token carries one.
    pub(crate) fn insert_empty(&mut self, token: &Token) -> NodeId {
        let Token::StartTag {
            name,
            attributes,
            self_closing,
        } = token
        else {
            panic!("insert_empty called with non-StartTag token");
        };
        let el = self.create_element(name, attributes);
        self.insert_node(el);
        if *self_closing {
            self.tokeniser.acknowledge_self_closing_flag();
        }
        el
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data. Otherwise...
    /// create a new Text node."
    pub(crate) fn insert_character(&mut self, data: &str) {
        if self.stack.is_empty() {
            // Stray characters at the document level; nowhere sensible to
            // put them.
            return;
        }
        if self.foster_inserts && self.in_table_insert_context() {
            let text = self.tree.alloc(NodeType::Text(data.to_string()));
            self.insert_in_foster_parent(text);
            return;
        }
        let parent = *self.stack.last().expect("stack checked non-empty");
        if let Some(&last) = self.tree.children(parent).last() {
            if let Some(node) = self.tree.get_mut(last) {
                if let NodeType::Text(existing) = &mut node.node_type {
                    existing.push_str(data);
                    return;
                }
            }
        }
        let text = self.tree.alloc(NodeType::Text(data.to_string()));
        self.tree.append_child(parent, text);
    }

    pub(crate) fn insert_comment(&mut self, data: &str) {
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.insert_node(comment);
    }

    fn in_table_insert_context(&self) -> bool {
        matches!(
            self.current_element_name(),
            "table" | "tbody" | "tfoot" | "thead" | "tr"
        )
    }

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    ///
    /// "Let last table be the last table element in the stack of open
    /// elements... the adjusted insertion location is before last table
    /// in its parent, or inside the element above it, or inside the first
    /// element in the stack."
    pub(crate) fn insert_in_foster_parent(&mut self, node: NodeId) {
        let last_table = self.get_from_stack("table");
        match last_table {
            Some(table) => {
                if let Some(parent) = self.tree.parent(table) {
                    // Merge with a text node just before the table, so
                    // consecutive fostered characters form one run.
                    let text_data = match self.tree.get(node).map(|n| &n.node_type) {
                        Some(NodeType::Text(data)) => Some(data.clone()),
                        _ => None,
                    };
                    if let Some(data) = text_data {
                        if let Some(prev) = self.tree.prev_sibling(table) {
                            if let Some(NodeType::Text(existing)) =
                                self.tree.get_mut(prev).map(|n| &mut n.node_type)
                            {
                                existing.push_str(&data);
                                return;
                            }
                        }
                    }
                    self.tree.insert_before(parent, node, table);
                } else {
                    let above = self
                        .above_on_stack(table)
                        .expect("table on stack has html beneath it");
                    self.tree.append_child(above, node);
                }
            }
            None => {
                let first = *self.stack.first().expect("foster insert requires a root on the stack");
                self.tree.append_child(first, node);
            }
        }
    }

    // ========== the stack of open elements ==========

    #[must_use]
    pub(crate) fn current_element(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    #[must_use]
    pub(crate) fn stack_size(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub(crate) fn stack_at(&self, index: usize) -> NodeId {
        self.stack[index]
    }

    pub(crate) fn push(&mut self, el: NodeId) {
        self.stack.push(el);
    }

    pub(crate) fn pop(&mut self) -> Option<NodeId> {
        self.stack.pop()
    }

    /// Pop the stack down to (and including) the first element whose name
    /// is in `names`, searching from the top.
    pub(crate) fn pop_stack_to_close(&mut self, names: &[&str]) {
        while let Some(el) = self.stack.pop() {
            if names.contains(&self.tag_name(el)) {
                break;
            }
        }
    }

    /// Pop the stack down to, but not including, the first element named
    /// `name`.
    pub(crate) fn pop_stack_to_before(&mut self, name: &str) {
        while let Some(&el) = self.stack.last() {
            if self.tag_name(el) == name {
                break;
            }
            let _ = self.stack.pop();
        }
    }

    /// "While the current node is not one of `node_names` (or html), pop
    /// elements from the stack of open elements."
    fn clear_stack_to_context(&mut self, node_names: &[&str]) {
        while let Some(&el) = self.stack.last() {
            let name = self.tag_name(el);
            if node_names.contains(&name) || name == "html" {
                break;
            }
            let _ = self.stack.pop();
        }
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    pub(crate) fn clear_stack_to_table_context(&mut self) {
        self.clear_stack_to_context(&["table", "template"]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    pub(crate) fn clear_stack_to_table_body_context(&mut self) {
        self.clear_stack_to_context(&["tbody", "tfoot", "thead", "template"]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    pub(crate) fn clear_stack_to_table_row_context(&mut self) {
        self.clear_stack_to_context(&["tr", "template"]);
    }

    /// Topmost element on the stack with this name.
    #[must_use]
    pub(crate) fn get_from_stack(&self, name: &str) -> Option<NodeId> {
        self.stack
            .iter()
            .rev()
            .copied()
            .find(|&el| self.tag_name(el) == name)
    }

    #[must_use]
    pub(crate) fn on_stack(&self, el: NodeId) -> bool {
        self.stack.contains(&el)
    }

    /// Remove an element from anywhere in the stack; anything above it
    /// shifts down.
    pub(crate) fn remove_from_stack(&mut self, el: NodeId) -> bool {
        match self.stack.iter().rposition(|&e| e == el) {
            Some(i) => {
                let _ = self.stack.remove(i);
                true
            }
            None => false,
        }
    }

    /// The element immediately above (closer to the root than) `el`.
    #[must_use]
    pub(crate) fn above_on_stack(&self, el: NodeId) -> Option<NodeId> {
        let i = self.stack.iter().rposition(|&e| e == el)?;
        if i == 0 { None } else { Some(self.stack[i - 1]) }
    }

    /// Insert `el` into the stack immediately after (on top of) `after`.
    ///
    /// # Panics
    ///
    /// Panics if `after` is not on the stack; the adoption agency only
    /// calls this for elements it just walked.
    pub(crate) fn insert_on_stack_after(&mut self, after: NodeId, el: NodeId) {
        let i = self
            .stack
            .iter()
            .rposition(|&e| e == after)
            .expect("insert_on_stack_after target must be on the stack");
        self.stack.insert(i + 1, el);
    }

    pub(crate) fn replace_on_stack(&mut self, out: NodeId, replacement: NodeId) {
        if let Some(i) = self.stack.iter().rposition(|&e| e == out) {
            self.stack[i] = replacement;
        }
    }

    // ========== scope queries ==========

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "The stack of open elements is said to have an element target node
    /// in a specific scope... when the following algorithm terminates in
    /// a match state."
    fn in_specific_scope(&self, target_names: &[&str], base_types: &[&str], extra_types: &[&str]) -> bool {
        for &el in self.stack.iter().rev() {
            let name = self.tag_name(el);
            if target_names.contains(&name) {
                return true;
            }
            if base_types.contains(&name) || extra_types.contains(&name) {
                return false;
            }
        }
        false
    }

    const BASE_SCOPE_TYPES: &'static [&'static str] = &[
        "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
    ];

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    #[must_use]
    pub(crate) fn in_scope(&self, name: &str) -> bool {
        self.in_specific_scope(&[name], Self::BASE_SCOPE_TYPES, &[])
    }

    #[must_use]
    pub(crate) fn in_scope_any(&self, names: &[&str]) -> bool {
        self.in_specific_scope(names, Self::BASE_SCOPE_TYPES, &[])
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope)
    #[must_use]
    pub(crate) fn in_button_scope(&self, name: &str) -> bool {
        self.in_specific_scope(&[name], Self::BASE_SCOPE_TYPES, &["button"])
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-list-item-scope)
    #[must_use]
    pub(crate) fn in_list_item_scope(&self, name: &str) -> bool {
        self.in_specific_scope(&[name], Self::BASE_SCOPE_TYPES, &["ol", "ul"])
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-table-scope)
    #[must_use]
    pub(crate) fn in_table_scope(&self, name: &str) -> bool {
        self.in_specific_scope(&[name], &["html", "table", "template"], &[])
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-select-scope)
    ///
    /// "...consisting of all element types except the following: optgroup,
    /// option" - the barrier set is inverted relative to the others.
    #[must_use]
    pub(crate) fn in_select_scope(&self, name: &str) -> bool {
        for &el in self.stack.iter().rev() {
            let el_name = self.tag_name(el);
            if el_name == name {
                return true;
            }
            if !matches!(el_name, "optgroup" | "option") {
                return false;
            }
        }
        false
    }

    // ========== the list of active formatting elements ==========

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// Push with the Noah's Ark clause: "if there are already three
    /// elements... that have the same tag name, namespace, and attributes
    /// as element, then remove the earliest such element."
    pub(crate) fn push_active_formatting_elements(&mut self, el: NodeId) {
        let (name, attributes) = {
            let data = self
                .tree
                .as_element(el)
                .expect("formatting entries are elements");
            (data.tag_name.clone(), data.attrs.clone())
        };

        let mut num_seen = 0;
        let mut remove_at = None;
        for (i, entry) in self.formatting_elements.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => break,
                FormattingEntry::Element {
                    name: entry_name,
                    attributes: entry_attrs,
                    ..
                } => {
                    if *entry_name == name && *entry_attrs == attributes {
                        num_seen += 1;
                        if num_seen == 3 {
                            remove_at = Some(i);
                            break;
                        }
                    }
                }
            }
        }
        if let Some(i) = remove_at {
            let _ = self.formatting_elements.remove(i);
        }

        self.formatting_elements.push(FormattingEntry::Element {
            id: el,
            name,
            attributes,
        });
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// Re-open formatting elements that were closed out of order (or by a
    /// scope boundary) before inserting new content. Idempotent: when the
    /// last entry is a marker or already open, nothing happens.
    pub(crate) fn reconstruct_formatting_elements(&mut self) {
        // STEP 1-2: nothing to do with an empty list, a trailing marker,
        // or a trailing element that is still open.
        let Some(last) = self.formatting_elements.last() else {
            return;
        };
        match last {
            FormattingEntry::Marker => return,
            FormattingEntry::Element { id, .. } => {
                if self.on_stack(*id) {
                    return;
                }
            }
        }

        // STEP 4-6: rewind to the entry after the last marker or open
        // element.
        let mut pos = self.formatting_elements.len() - 1;
        while pos > 0 {
            match &self.formatting_elements[pos - 1] {
                FormattingEntry::Marker => break,
                FormattingEntry::Element { id, .. } => {
                    if self.on_stack(*id) {
                        break;
                    }
                }
            }
            pos -= 1;
        }

        // STEP 7-10: re-create each closed entry in order, replacing the
        // list entries with the new elements.
        while pos < self.formatting_elements.len() {
            let (name, attributes) = match &self.formatting_elements[pos] {
                FormattingEntry::Element {
                    name, attributes, ..
                } => (name.clone(), attributes.clone()),
                FormattingEntry::Marker => {
                    unreachable!("rewind stops after the last marker")
                }
            };
            let new_el = self.create_element(&name, &attributes);
            self.insert_node(new_el);
            self.stack.push(new_el);
            self.formatting_elements[pos] = FormattingEntry::Element {
                id: new_el,
                name,
                attributes,
            };
            pos += 1;
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub(crate) fn clear_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.formatting_elements.pop() {
            if matches!(entry, FormattingEntry::Marker) {
                break;
            }
        }
    }

    pub(crate) fn insert_marker_to_formatting_elements(&mut self) {
        self.formatting_elements.push(FormattingEntry::Marker);
    }

    pub(crate) fn remove_from_active_formatting_elements(&mut self, el: NodeId) {
        if let Some(i) = self
            .formatting_elements
            .iter()
            .rposition(|entry| matches!(entry, FormattingEntry::Element { id, .. } if *id == el))
        {
            let _ = self.formatting_elements.remove(i);
        }
    }

    #[must_use]
    pub(crate) fn is_in_active_formatting_elements(&self, el: NodeId) -> bool {
        self.formatting_elements
            .iter()
            .any(|entry| matches!(entry, FormattingEntry::Element { id, .. } if *id == el))
    }

    /// Most recent formatting element with this name, stopping at the
    /// last marker.
    #[must_use]
    pub(crate) fn get_active_formatting_element(&self, name: &str) -> Option<NodeId> {
        for entry in self.formatting_elements.iter().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element {
                    id, name: entry_name, ..
                } => {
                    if entry_name == name {
                        return Some(*id);
                    }
                }
            }
        }
        None
    }

    pub(crate) fn replace_active_formatting_element(&mut self, out: NodeId, replacement: NodeId) {
        if let Some(i) = self
            .formatting_elements
            .iter()
            .rposition(|entry| matches!(entry, FormattingEntry::Element { id, .. } if *id == out))
        {
            let (name, attributes) = {
                let data = self
                    .tree
                    .as_element(replacement)
                    .expect("formatting entries are elements");
                (data.tag_name.clone(), data.attrs.clone())
            };
            self.formatting_elements[i] = FormattingEntry::Element {
                id: replacement,
                name,
                attributes,
            };
        }
    }

    // ========== mode reset and implied end tags ==========

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(crate) fn reset_insertion_mode(&mut self) {
        let mut last = false;
        for pos in (0..self.stack.len()).rev() {
            let mut name = self.tag_name(self.stack[pos]).to_string();
            if pos == 0 {
                last = true;
                if let Some(context) = &self.context_element_name {
                    // Fragment case: the bottom of the stack is the
                    // synthetic root; the context element decides.
                    name = context.clone();
                }
            }
            match name.as_str() {
                "select" => {
                    self.transition(HtmlTreeBuilderState::InSelect);
                    return;
                }
                "td" | "th" if !last => {
                    self.transition(HtmlTreeBuilderState::InCell);
                    return;
                }
                "tr" => {
                    self.transition(HtmlTreeBuilderState::InRow);
                    return;
                }
                "tbody" | "thead" | "tfoot" => {
                    self.transition(HtmlTreeBuilderState::InTableBody);
                    return;
                }
                "caption" => {
                    self.transition(HtmlTreeBuilderState::InCaption);
                    return;
                }
                "colgroup" => {
                    self.transition(HtmlTreeBuilderState::InColumnGroup);
                    return;
                }
                "table" => {
                    self.transition(HtmlTreeBuilderState::InTable);
                    return;
                }
                "head" if !last => {
                    self.transition(HtmlTreeBuilderState::InHead);
                    return;
                }
                "body" => {
                    self.transition(HtmlTreeBuilderState::InBody);
                    return;
                }
                "frameset" => {
                    self.transition(HtmlTreeBuilderState::InFrameset);
                    return;
                }
                "html" => {
                    if self.head_element.is_none() {
                        self.transition(HtmlTreeBuilderState::BeforeHead);
                    } else {
                        self.transition(HtmlTreeBuilderState::AfterHead);
                    }
                    return;
                }
                _ => {}
            }
            if last {
                self.transition(HtmlTreeBuilderState::InBody);
                return;
            }
        }
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    pub(crate) fn generate_implied_end_tags(&mut self, exclude: Option<&str>) {
        const IMPLIED: &[&str] = &["dd", "dt", "li", "option", "optgroup", "p", "rp", "rt"];
        while let Some(&el) = self.stack.last() {
            let name = self.tag_name(el);
            if IMPLIED.contains(&name) && exclude != Some(name) {
                let _ = self.stack.pop();
            } else {
                break;
            }
        }
    }

    /// [§ 13.1.2 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// "The following elements have varying levels of special parsing
    /// rules"; specials terminate the adoption-agency search and the
    /// any-other-end-tag walk.
    #[must_use]
    pub(crate) fn is_special(&self, el: NodeId) -> bool {
        matches!(
            self.tag_name(el),
            "address"
                | "applet"
                | "area"
                | "article"
                | "aside"
                | "base"
                | "basefont"
                | "bgsound"
                | "blockquote"
                | "body"
                | "br"
                | "button"
                | "caption"
                | "center"
                | "col"
                | "colgroup"
                | "command"
                | "dd"
                | "details"
                | "dir"
                | "div"
                | "dl"
                | "dt"
                | "embed"
                | "fieldset"
                | "figcaption"
                | "figure"
                | "footer"
                | "form"
                | "frame"
                | "frameset"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "head"
                | "header"
                | "hgroup"
                | "hr"
                | "html"
                | "iframe"
                | "img"
                | "input"
                | "isindex"
                | "li"
                | "link"
                | "listing"
                | "marquee"
                | "menu"
                | "meta"
                | "nav"
                | "noembed"
                | "noframes"
                | "noscript"
                | "object"
                | "ol"
                | "p"
                | "param"
                | "plaintext"
                | "pre"
                | "script"
                | "section"
                | "select"
                | "style"
                | "summary"
                | "table"
                | "tbody"
                | "td"
                | "textarea"
                | "tfoot"
                | "th"
                | "thead"
                | "title"
                | "tr"
                | "ul"
                | "wbr"
                | "xmp"
        )
    }

    // ========== end tag fallbacks ==========

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag": walk the stack from the top; close the first
    /// element with a matching name, or ignore the token when a special
    /// element is found first.
    pub(crate) fn any_other_end_tag(&mut self, name: &str, state: HtmlTreeBuilderState) -> bool {
        enum Action {
            Close,
            Ignore,
            None,
        }
        let mut action = Action::None;
        for &node in self.stack.iter().rev() {
            if self.tag_name(node) == name {
                action = Action::Close;
                break;
            }
            if self.is_special(node) {
                action = Action::Ignore;
                break;
            }
        }
        match action {
            Action::Close => {
                self.generate_implied_end_tags(Some(name));
                if self.current_element_name() != name {
                    self.error(state);
                }
                self.pop_stack_to_close(&[name]);
                true
            }
            Action::Ignore => {
                self.error(state);
                false
            }
            Action::None => true,
        }
    }

    /// [The adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Reorders mis-nested formatting elements (`<b><i></b></i>` and
    /// friends). Outer loop bounded to 8 runs, inner node walk to 3; the
    /// search for the furthest block scans at most 64 stack entries so
    /// degenerate inputs cannot run away.
    pub(crate) fn adoption_agency(&mut self, name: &str, state: HtmlTreeBuilderState) -> bool {
        for _ in 0..8 {
            // "If there is no such element, then... act as described in
            //  the 'any other end tag' entry."
            let Some(format_el) = self.get_active_formatting_element(name) else {
                return self.any_other_end_tag(name, state);
            };
            if !self.on_stack(format_el) {
                self.error(state);
                self.remove_from_active_formatting_elements(format_el);
                return true;
            }
            let format_name = self.tag_name(format_el).to_string();
            if !self.in_scope(&format_name) {
                self.error(state);
                return false;
            }
            if self.current_element() != Some(format_el) {
                self.error(state);
            }

            // "Let furthest block be the topmost node in the stack of
            //  open elements that is lower in the stack than formatting
            //  element, and is an element in the special category."
            let mut furthest_block = None;
            let mut common_ancestor = None;
            let mut format_index = 0;
            let mut seen_formatting_element = false;
            // The spec doesn't bound this scan, but degenerate inputs
            // (9000+ stack depth) would otherwise run away.
            for si in 0..self.stack.len().min(64) {
                let el = self.stack[si];
                if el == format_el {
                    common_ancestor = if si > 0 { Some(self.stack[si - 1]) } else { None };
                    format_index = si;
                    seen_formatting_element = true;
                } else if seen_formatting_element && self.is_special(el) {
                    furthest_block = Some(el);
                    break;
                }
            }

            // "If there is no furthest block, then the UA must first pop
            //  all the nodes from the current node up to and including
            //  formatting element, then remove formatting element from
            //  the list."
            let Some(furthest_block) = furthest_block else {
                self.pop_stack_to_close(&[format_name.as_str()]);
                self.remove_from_active_formatting_elements(format_el);
                return true;
            };
            let common_ancestor =
                common_ancestor.expect("formatting element has the html root beneath it");

            // "Let a bookmark note the position of formatting element in
            //  the list of active formatting elements."
            let mut bookmark = self
                .formatting_elements
                .iter()
                .rposition(|e| matches!(e, FormattingEntry::Element { id, .. } if *id == format_el))
                .expect("formatting element is in the list");

            // Inner loop: walk from the furthest block up towards the
            // formatting element, re-homing nodes as we go. The walk
            // follows the stack order captured here, so removals below do
            // not derail it.
            let fb_index = self
                .stack
                .iter()
                .rposition(|&e| e == furthest_block)
                .expect("furthest block is on the stack");
            let walk: Vec<NodeId> = self.stack[format_index + 1..fb_index]
                .iter()
                .rev()
                .copied()
                .collect();

            let mut last_node = furthest_block;
            for &original_node in walk.iter().take(3) {
                let mut node = original_node;
                if !self.is_in_active_formatting_elements(node) {
                    self.remove_from_stack(node);
                    continue;
                }

                // "Create an element for the token for which the element
                //  node was created... replace the entry for node in the
                //  list of active formatting elements with an entry for
                //  the new element" - likewise on the stack.
                let (node_name, node_attrs) = {
                    let data = self.tree.as_element(node).expect("stack holds elements");
                    (data.tag_name.clone(), data.attrs.clone())
                };
                let replacement = self.create_element(&node_name, &node_attrs);
                self.replace_active_formatting_element(node, replacement);
                self.replace_on_stack(node, replacement);
                node = replacement;

                // "If last node is furthest block, then move the
                //  aforementioned bookmark to be immediately after the
                //  new node in the list of active formatting elements."
                if last_node == furthest_block {
                    bookmark = self
                        .formatting_elements
                        .iter()
                        .rposition(
                            |e| matches!(e, FormattingEntry::Element { id, .. } if *id == node),
                        )
                        .expect("replacement entry just inserted")
                        + 1;
                }

                self.tree.detach(last_node);
                self.tree.append_child(node, last_node);
                last_node = node;
            }

            // "If common ancestor is a table, tbody, tfoot, thead, or tr
            //  element, then... insert last node into the foster parent
            //  location; otherwise append it to common ancestor."
            if matches!(
                self.tag_name(common_ancestor),
                "table" | "tbody" | "tfoot" | "thead" | "tr"
            ) {
                self.tree.detach(last_node);
                self.insert_in_foster_parent(last_node);
            } else {
                self.tree.detach(last_node);
                self.tree.append_child(common_ancestor, last_node);
            }

            // "Create an element for the token for which formatting
            //  element was created... take all of the child nodes of
            //  furthest block and append them to the new element, then
            //  append the new element to furthest block."
            let adopter_attrs = self
                .tree
                .as_element(format_el)
                .expect("formatting element is an element")
                .attrs
                .clone();
            let adopter = self.create_element(&format_name, &adopter_attrs);
            self.tree.move_children(furthest_block, adopter);
            self.tree.append_child(furthest_block, adopter);

            // "Remove formatting element from the list of active
            //  formatting elements, and insert the new element into the
            //  list at the position of the aforementioned bookmark."
            let format_entry_index = self
                .formatting_elements
                .iter()
                .rposition(|e| matches!(e, FormattingEntry::Element { id, .. } if *id == format_el))
                .expect("formatting element entry still present");
            let _ = self.formatting_elements.remove(format_entry_index);
            if format_entry_index < bookmark {
                bookmark -= 1;
            }
            let bookmark = bookmark.min(self.formatting_elements.len());
            self.formatting_elements.insert(
                bookmark,
                FormattingEntry::Element {
                    id: adopter,
                    name: format_name.clone(),
                    attributes: adopter_attrs,
                },
            );

            // "Remove formatting element from the stack of open elements,
            //  and insert the new element into the stack immediately
            //  below the position of furthest block."
            self.remove_from_stack(format_el);
            self.insert_on_stack_after(furthest_block, adopter);
        }
        true
    }
}
