//! The tokeniser state machine.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "Implementations must act as if they used the following state machine
//! to tokenize HTML."
//!
//! The tokeniser is pull-based: the tree builder calls [`Tokeniser::read`]
//! for one token at a time, and may re-point the state machine between
//! reads (RCDATA for `<title>`, ScriptData for `<script>`, and so on).
//! At most one non-character token is pending at any time; character data
//! accumulates in a run buffer and is flushed as a single token ahead of
//! whatever token finished the run.

use quokka_dom::Attributes;

use crate::entities;
use crate::parse_error::{ParseError, ParseErrorList};
use crate::reader::{CharacterReader, EOF_CHAR};

use super::state::TokeniserState;
use super::token::Token;

/// Replaces null characters and out-of-range character references.
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

const NULL_CHAR: char = '\0';

/// "U+0009 TAB, U+000A LF, U+000C FF, U+000D CR, or U+0020 SPACE."
const WHITESPACE: [char; 5] = ['\t', '\n', '\r', '\x0C', ' '];

/// The tag token being built up, one character or chunk at a time.
///
/// Attribute names are accumulated separately from the committed list:
/// "When the user agent leaves the attribute name state... if there is
/// already an attribute on the token with the exact same name, then this
/// is a duplicate-attribute parse error and the new attribute must be
/// removed from the token."
#[derive(Default)]
struct PendingTag {
    name: String,
    is_end_tag: bool,
    self_closing: bool,
    attributes: Attributes,
    saw_attributes: bool,
    pending_attr_name: String,
    has_pending_attr_name: bool,
    pending_attr_value: String,
}

/// "DOCTYPE tokens have a name, a public identifier, a system identifier,
/// and a force-quirks flag."
#[derive(Default)]
struct PendingDoctype {
    name: String,
    public_identifier: String,
    system_identifier: String,
    force_quirks: bool,
}

/// Reads the input stream into tokens.
pub struct Tokeniser {
    reader: CharacterReader,
    errors: ParseErrorList,

    state: TokeniserState,
    /// The token we are about to emit on the next read.
    emit_pending: Option<Token>,
    /// Buffers characters to output as one token run.
    char_buffer: String,
    /// The temporary buffer: collects characters while looking for an
    /// appropriate end tag in RCDATA/RAWTEXT/script data.
    data_buffer: String,

    pending_tag: PendingTag,
    pending_doctype: PendingDoctype,
    pending_comment: String,

    /// The last start tag emitted, to test end-tag appropriateness.
    last_start_tag: Option<String>,
    self_closing_acknowledged: bool,

    /// Which attribute-value state sent us into
    /// [`TokeniserState::CharacterReferenceInAttributeValue`].
    attr_value_return_state: TokeniserState,
}

impl Tokeniser {
    #[must_use]
    pub fn new(reader: CharacterReader, errors: ParseErrorList) -> Self {
        Self {
            reader,
            errors,
            state: TokeniserState::Data,
            emit_pending: None,
            char_buffer: String::new(),
            data_buffer: String::new(),
            pending_tag: PendingTag::default(),
            pending_doctype: PendingDoctype::default(),
            pending_comment: String::new(),
            last_start_tag: None,
            self_closing_acknowledged: true,
            attr_value_return_state: TokeniserState::Data,
        }
    }

    /// Read the next token.
    ///
    /// Drives the state machine until a token is pending, then returns
    /// either the buffered character run (leaving the pending token for
    /// the next call) or the pending token itself.
    pub fn read(&mut self) -> Token {
        if !self.self_closing_acknowledged {
            self.error_msg("Self closing flag not acknowledged");
            self.self_closing_acknowledged = true;
        }

        while self.emit_pending.is_none() {
            self.run_state();
        }

        if self.char_buffer.is_empty() {
            self.emit_pending
                .take()
                .expect("pending token present after state loop")
        } else {
            // A non-character token was found: return the buffered run
            // first, and leave the token for the next read.
            Token::Character {
                data: std::mem::take(&mut self.char_buffer),
            }
        }
    }

    /// Queue a finished token for emission.
    ///
    /// # Panics
    ///
    /// Panics if a token is already pending; the state machine must hand
    /// over each token before producing the next.
    fn emit(&mut self, token: Token) {
        assert!(
            self.emit_pending.is_none(),
            "There is an unread token pending!"
        );

        if let Token::StartTag {
            name, self_closing, ..
        } = &token
        {
            self.last_start_tag = Some(name.clone());
            if *self_closing {
                self.self_closing_acknowledged = false;
            }
        }
        self.emit_pending = Some(token);
    }

    /// Buffer a character run fragment. Does not make a token pending;
    /// `read` flushes the buffer when one is.
    fn emit_str(&mut self, data: &str) {
        self.char_buffer.push_str(data);
    }

    fn emit_char(&mut self, c: char) {
        self.char_buffer.push(c);
    }

    /// "Switch to the X state."
    pub(crate) fn transition(&mut self, state: TokeniserState) {
        self.state = state;
    }

    /// Advance the reader, then switch state.
    pub(crate) fn advance_transition(&mut self, state: TokeniserState) {
        self.reader.advance();
        self.state = state;
    }

    /// The tree builder acknowledges a self-closing start tag here; an
    /// unacknowledged flag is a parse error at the next read.
    pub(crate) fn acknowledge_self_closing_flag(&mut self) {
        self.self_closing_acknowledged = true;
    }

    pub(crate) fn pos(&self) -> usize {
        self.reader.pos()
    }

    pub(crate) fn errors_mut(&mut self) -> &mut ParseErrorList {
        &mut self.errors
    }

    /// Consume the tokeniser and return the errors it retained.
    #[must_use]
    pub fn into_errors(self) -> ParseErrorList {
        self.errors
    }

    /// Seed the appropriate-end-tag check. Fragment parsing sets this to
    /// the context element's name so `</script>` and friends close as
    /// they would in a full document.
    pub(crate) fn set_last_start_tag(&mut self, name: &str) {
        self.last_start_tag = Some(name.to_string());
    }

    // ========== pending token management ==========

    fn create_tag_pending(&mut self, start: bool) {
        self.pending_tag = PendingTag {
            is_end_tag: !start,
            ..PendingTag::default()
        };
    }

    fn emit_tag_pending(&mut self) {
        self.tag_new_attribute();
        let tag = std::mem::take(&mut self.pending_tag);
        if tag.is_end_tag {
            if tag.saw_attributes {
                self.error_msg("Attributes incorrectly present on end tag");
            }
            self.emit(Token::EndTag { name: tag.name });
        } else {
            self.emit(Token::StartTag {
                name: tag.name,
                self_closing: tag.self_closing,
                attributes: tag.attributes,
            });
        }
    }

    /// Commit the accumulated attribute name/value onto the tag, dropping
    /// duplicates with a parse error, and reset the accumulators for the
    /// next attribute.
    fn tag_new_attribute(&mut self) {
        if self.pending_tag.has_pending_attr_name {
            let name = self.pending_tag.pending_attr_name.to_ascii_lowercase();
            let value = std::mem::take(&mut self.pending_tag.pending_attr_value);
            if self.pending_tag.attributes.has_key(&name) {
                self.error_msg(&format!("Dropped duplicate attribute '{name}' on tag"));
            } else {
                self.pending_tag.attributes.put(&name, &value);
            }
            self.pending_tag.pending_attr_name.clear();
            self.pending_tag.has_pending_attr_name = false;
        }
        self.pending_tag.pending_attr_value.clear();
    }

    fn append_tag_name(&mut self, append: &str) {
        self.pending_tag.name.push_str(append);
    }

    fn append_tag_name_char(&mut self, append: char) {
        self.pending_tag.name.push(append);
    }

    fn append_attr_name_char(&mut self, append: char) {
        self.pending_tag.has_pending_attr_name = true;
        self.pending_tag.saw_attributes = true;
        self.pending_tag.pending_attr_name.push(append);
    }

    fn append_attr_name(&mut self, append: &str) {
        if !append.is_empty() {
            self.pending_tag.has_pending_attr_name = true;
            self.pending_tag.saw_attributes = true;
            self.pending_tag.pending_attr_name.push_str(append);
        }
    }

    fn append_attr_value_char(&mut self, append: char) {
        self.pending_tag.pending_attr_value.push(append);
    }

    fn append_attr_value(&mut self, append: &str) {
        self.pending_tag.pending_attr_value.push_str(append);
    }

    fn create_comment_pending(&mut self) {
        self.pending_comment.clear();
    }

    fn emit_comment_pending(&mut self) {
        let data = std::mem::take(&mut self.pending_comment);
        self.emit(Token::Comment { data });
    }

    fn create_doctype_pending(&mut self) {
        self.pending_doctype = PendingDoctype::default();
    }

    fn emit_doctype_pending(&mut self) {
        let d = std::mem::take(&mut self.pending_doctype);
        self.emit(Token::Doctype {
            name: d.name,
            public_identifier: d.public_identifier,
            system_identifier: d.system_identifier,
            force_quirks: d.force_quirks,
        });
    }

    fn create_temp_buffer(&mut self) {
        self.data_buffer.clear();
    }

    /// "An appropriate end tag token is an end tag token whose tag name
    /// matches the tag name of the last start tag to have been emitted
    /// from this tokenizer, if any."
    fn is_appropriate_end_tag_token(&self) -> bool {
        self.last_start_tag
            .as_deref()
            .is_some_and(|last| last == self.pending_tag.name)
    }

    fn appropriate_end_tag_name(&self) -> Option<&str> {
        self.last_start_tag.as_deref()
    }

    // ========== error reporting ==========

    fn error(&mut self, state: TokeniserState) {
        if self.errors.can_add_error() {
            let pos = self.reader.pos();
            let current = self.reader.current();
            self.errors.add(ParseError::new(
                pos,
                format!("Unexpected character '{current}' in input state [{state}]"),
            ));
        }
    }

    fn eof_error(&mut self, state: TokeniserState) {
        if self.errors.can_add_error() {
            let pos = self.reader.pos();
            self.errors.add(ParseError::new(
                pos,
                format!("Unexpectedly reached end of file (EOF) in input state [{state}]"),
            ));
        }
    }

    fn char_ref_error(&mut self, message: &str) {
        if self.errors.can_add_error() {
            let pos = self.reader.pos();
            self.errors.add(ParseError::new(
                pos,
                format!("Invalid character reference: {message}"),
            ));
        }
    }

    fn error_msg(&mut self, message: &str) {
        if self.errors.can_add_error() {
            let pos = self.reader.pos();
            self.errors.add(ParseError::new(pos, message.to_string()));
        }
    }

    // ========== character references ==========

    /// Consume a character reference from the reader, which is positioned
    /// just after the `&`.
    ///
    /// Returns `None` when there is no reference (the caller emits the
    /// `&` literally and the reader is rewound to just after it).
    pub(crate) fn consume_character_reference(
        &mut self,
        additional_allowed: Option<char>,
        in_attribute: bool,
    ) -> Option<char> {
        if self.reader.is_empty() {
            return None;
        }
        if additional_allowed == Some(self.reader.current()) {
            return None;
        }
        if self
            .reader
            .matches_any(&['\t', '\n', '\r', '\x0C', ' ', '<', '&'])
        {
            return None;
        }

        self.reader.mark();
        if self.reader.match_consume("#") {
            // Numbered reference.
            let is_hex_mode = self.reader.match_consume_ignore_case("X");
            let num_ref = if is_hex_mode {
                self.reader.consume_hex_sequence()
            } else {
                self.reader.consume_digit_sequence()
            };
            if num_ref.is_empty() {
                self.char_ref_error("numeric reference with no numerals");
                self.reader.rewind_to_mark();
                return None;
            }
            if !self.reader.match_consume(";") {
                self.char_ref_error("missing semicolon");
            }
            let base = if is_hex_mode { 16 } else { 10 };
            let charval = i64::from_str_radix(&num_ref, base).unwrap_or(-1);
            if charval == -1 || (0xD800..=0xDFFF).contains(&charval) || charval > 0x10FFFF {
                self.char_ref_error("character outside of valid range");
                Some(REPLACEMENT_CHAR)
            } else {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Some(char::from_u32(charval as u32).unwrap_or(REPLACEMENT_CHAR))
            }
        } else {
            // Named reference: get as many letters then digits as
            // possible, and look for matching entities.
            let name_ref = self.reader.consume_letter_then_digit_sequence();
            let looks_legit = self.reader.matches(';');
            // Found if a base named entity without a ;, or any recognised
            // entity with the ;.
            let found = entities::is_base_named_entity(&name_ref)
                || (entities::is_named_entity(&name_ref) && looks_legit);

            if !found {
                self.reader.rewind_to_mark();
                if looks_legit {
                    // Named with semicolon but not a recognised entity.
                    self.char_ref_error(&format!("invalid named reference '{name_ref}'"));
                }
                return None;
            }
            if in_attribute
                && (self.reader.matches_letter()
                    || self.reader.matches_digit()
                    || self.reader.matches_any(&['=', '-', '_']))
            {
                // Not a reference in this context (e.g. `&not=` in a URL
                // query string): preserve the author's text.
                self.reader.rewind_to_mark();
                return None;
            }
            if !self.reader.match_consume(";") {
                self.char_ref_error("missing semicolon");
            }
            entities::character_for_name(&name_ref)
        }
    }

    /// Consume the rest of the reader, resolving character references as
    /// they are found.
    pub fn unescape_entities(&mut self, in_attribute: bool) -> String {
        let mut builder = String::new();
        while !self.reader.is_empty() {
            builder.push_str(&self.reader.consume_to('&'));
            if self.reader.matches('&') {
                self.reader.consume();
                match self.consume_character_reference(None, in_attribute) {
                    Some(c) => builder.push(c),
                    None => builder.push('&'),
                }
            }
        }
        builder
    }

    // ========== state dispatch ==========

    fn run_state(&mut self) {
        match self.state {
            TokeniserState::Data => self.read_data(),
            TokeniserState::CharacterReferenceInData => self.read_character_reference_in_data(),
            TokeniserState::Rcdata => self.read_rcdata(),
            TokeniserState::CharacterReferenceInRcdata => self.read_character_reference_in_rcdata(),
            TokeniserState::Rawtext => self.read_rawtext(),
            TokeniserState::ScriptData => self.read_script_data(),
            TokeniserState::Plaintext => self.read_plaintext(),
            TokeniserState::TagOpen => self.read_tag_open(),
            TokeniserState::EndTagOpen => self.read_end_tag_open(),
            TokeniserState::TagName => self.read_tag_name(),
            TokeniserState::RcdataLessThanSign => self.read_rcdata_less_than_sign(),
            TokeniserState::RcdataEndTagOpen => self.read_rcdata_end_tag_open(),
            TokeniserState::RcdataEndTagName => self.read_rcdata_end_tag_name(),
            TokeniserState::RawtextLessThanSign => self.read_rawtext_less_than_sign(),
            TokeniserState::RawtextEndTagOpen => self.read_rawtext_end_tag_open(),
            TokeniserState::RawtextEndTagName => self.read_rawtext_end_tag_name(),
            TokeniserState::ScriptDataLessThanSign => self.read_script_data_less_than_sign(),
            TokeniserState::ScriptDataEndTagOpen => self.read_script_data_end_tag_open(),
            TokeniserState::ScriptDataEndTagName => self.read_script_data_end_tag_name(),
            TokeniserState::ScriptDataEscapeStart => self.read_script_data_escape_start(),
            TokeniserState::ScriptDataEscapeStartDash => self.read_script_data_escape_start_dash(),
            TokeniserState::ScriptDataEscaped => self.read_script_data_escaped(),
            TokeniserState::ScriptDataEscapedDash => self.read_script_data_escaped_dash(),
            TokeniserState::ScriptDataEscapedDashDash => self.read_script_data_escaped_dash_dash(),
            TokeniserState::ScriptDataEscapedLessThanSign => {
                self.read_script_data_escaped_less_than_sign();
            }
            TokeniserState::ScriptDataEscapedEndTagOpen => {
                self.read_script_data_escaped_end_tag_open();
            }
            TokeniserState::ScriptDataEscapedEndTagName => {
                self.read_script_data_escaped_end_tag_name();
            }
            TokeniserState::ScriptDataDoubleEscapeStart => {
                self.read_script_data_double_escape_start();
            }
            TokeniserState::ScriptDataDoubleEscaped => self.read_script_data_double_escaped(),
            TokeniserState::ScriptDataDoubleEscapedDash => {
                self.read_script_data_double_escaped_dash();
            }
            TokeniserState::ScriptDataDoubleEscapedDashDash => {
                self.read_script_data_double_escaped_dash_dash();
            }
            TokeniserState::ScriptDataDoubleEscapedLessThanSign => {
                self.read_script_data_double_escaped_less_than_sign();
            }
            TokeniserState::ScriptDataDoubleEscapeEnd => self.read_script_data_double_escape_end(),
            TokeniserState::BeforeAttributeName => self.read_before_attribute_name(),
            TokeniserState::AttributeName => self.read_attribute_name(),
            TokeniserState::AfterAttributeName => self.read_after_attribute_name(),
            TokeniserState::BeforeAttributeValue => self.read_before_attribute_value(),
            TokeniserState::AttributeValueDoubleQuoted => self.read_attribute_value_double_quoted(),
            TokeniserState::AttributeValueSingleQuoted => self.read_attribute_value_single_quoted(),
            TokeniserState::AttributeValueUnquoted => self.read_attribute_value_unquoted(),
            TokeniserState::CharacterReferenceInAttributeValue => {
                self.read_character_reference_in_attribute_value();
            }
            TokeniserState::AfterAttributeValueQuoted => self.read_after_attribute_value_quoted(),
            TokeniserState::SelfClosingStartTag => self.read_self_closing_start_tag(),
            TokeniserState::BogusComment => self.read_bogus_comment(),
            TokeniserState::MarkupDeclarationOpen => self.read_markup_declaration_open(),
            TokeniserState::CommentStart => self.read_comment_start(),
            TokeniserState::CommentStartDash => self.read_comment_start_dash(),
            TokeniserState::Comment => self.read_comment(),
            TokeniserState::CommentEndDash => self.read_comment_end_dash(),
            TokeniserState::CommentEnd => self.read_comment_end(),
            TokeniserState::CommentEndBang => self.read_comment_end_bang(),
            TokeniserState::Doctype => self.read_doctype(),
            TokeniserState::BeforeDoctypeName => self.read_before_doctype_name(),
            TokeniserState::DoctypeName => self.read_doctype_name(),
            TokeniserState::AfterDoctypeName => self.read_after_doctype_name(),
            TokeniserState::AfterDoctypePublicKeyword => self.read_after_doctype_public_keyword(),
            TokeniserState::BeforeDoctypePublicIdentifier => {
                self.read_before_doctype_public_identifier();
            }
            TokeniserState::DoctypePublicIdentifierDoubleQuoted => {
                self.read_doctype_public_identifier_quoted('"');
            }
            TokeniserState::DoctypePublicIdentifierSingleQuoted => {
                self.read_doctype_public_identifier_quoted('\'');
            }
            TokeniserState::AfterDoctypePublicIdentifier => {
                self.read_after_doctype_public_identifier();
            }
            TokeniserState::BetweenDoctypePublicAndSystemIdentifiers => {
                self.read_between_doctype_public_and_system_identifiers();
            }
            TokeniserState::AfterDoctypeSystemKeyword => self.read_after_doctype_system_keyword(),
            TokeniserState::BeforeDoctypeSystemIdentifier => {
                self.read_before_doctype_system_identifier();
            }
            TokeniserState::DoctypeSystemIdentifierDoubleQuoted => {
                self.read_doctype_system_identifier_quoted('"');
            }
            TokeniserState::DoctypeSystemIdentifierSingleQuoted => {
                self.read_doctype_system_identifier_quoted('\'');
            }
            TokeniserState::AfterDoctypeSystemIdentifier => {
                self.read_after_doctype_system_identifier();
            }
            TokeniserState::BogusDoctype => self.read_bogus_doctype(),
            TokeniserState::CdataSection => self.read_cdata_section(),
        }
    }

    // ========== data states ==========

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn read_data(&mut self) {
        match self.reader.current() {
            '&' => self.advance_transition(TokeniserState::CharacterReferenceInData),
            '<' => self.advance_transition(TokeniserState::TagOpen),
            NULL_CHAR => {
                // NOT replaced by the replacement character here: the tree
                // builder decides what to do with nulls in data.
                self.error(TokeniserState::Data);
                let c = self.reader.consume();
                self.emit_char(c);
            }
            EOF_CHAR => self.emit(Token::Eof),
            _ => {
                let data = self.reader.consume_to_any(&['&', '<', NULL_CHAR]);
                self.emit_str(&data);
            }
        }
    }

    /// "Consume a character reference with no additional allowed character."
    fn read_character_reference_in_data(&mut self) {
        match self.consume_character_reference(None, false) {
            Some(c) => self.emit_char(c),
            None => self.emit_char('&'),
        }
        self.transition(TokeniserState::Data);
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn read_rcdata(&mut self) {
        match self.reader.current() {
            '&' => self.advance_transition(TokeniserState::CharacterReferenceInRcdata),
            '<' => self.advance_transition(TokeniserState::RcdataLessThanSign),
            NULL_CHAR => {
                self.error(TokeniserState::Rcdata);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => self.emit(Token::Eof),
            _ => {
                let data = self.reader.consume_to_any(&['&', '<', NULL_CHAR]);
                self.emit_str(&data);
            }
        }
    }

    fn read_character_reference_in_rcdata(&mut self) {
        match self.consume_character_reference(None, false) {
            Some(c) => self.emit_char(c),
            None => self.emit_char('&'),
        }
        self.transition(TokeniserState::Rcdata);
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn read_rawtext(&mut self) {
        match self.reader.current() {
            '<' => self.advance_transition(TokeniserState::RawtextLessThanSign),
            NULL_CHAR => {
                self.error(TokeniserState::Rawtext);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => self.emit(Token::Eof),
            _ => {
                let data = self.reader.consume_to_any(&['<', NULL_CHAR]);
                self.emit_str(&data);
            }
        }
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    fn read_script_data(&mut self) {
        match self.reader.current() {
            '<' => self.advance_transition(TokeniserState::ScriptDataLessThanSign),
            NULL_CHAR => {
                self.error(TokeniserState::ScriptData);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => self.emit(Token::Eof),
            _ => {
                let data = self.reader.consume_to_any(&['<', NULL_CHAR]);
                self.emit_str(&data);
            }
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    ///
    /// Once in, never gets out: everything to EOF is character data.
    fn read_plaintext(&mut self) {
        match self.reader.current() {
            NULL_CHAR => {
                self.error(TokeniserState::Plaintext);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => self.emit(Token::Eof),
            _ => {
                let data = self.reader.consume_to_any(&[NULL_CHAR]);
                self.emit_str(&data);
            }
        }
    }

    // ========== tag states ==========

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn read_tag_open(&mut self) {
        match self.reader.current() {
            '!' => self.advance_transition(TokeniserState::MarkupDeclarationOpen),
            '/' => self.advance_transition(TokeniserState::EndTagOpen),
            '?' => self.advance_transition(TokeniserState::BogusComment),
            _ => {
                if self.reader.matches_letter() {
                    self.create_tag_pending(true);
                    self.transition(TokeniserState::TagName);
                } else {
                    self.error(TokeniserState::TagOpen);
                    self.emit_char('<');
                    self.transition(TokeniserState::Data);
                }
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn read_end_tag_open(&mut self) {
        if self.reader.is_empty() {
            self.eof_error(TokeniserState::EndTagOpen);
            self.emit_str("</");
            self.transition(TokeniserState::Data);
        } else if self.reader.matches_letter() {
            self.create_tag_pending(false);
            self.transition(TokeniserState::TagName);
        } else if self.reader.matches('>') {
            self.error(TokeniserState::EndTagOpen);
            self.advance_transition(TokeniserState::Data);
        } else {
            self.error(TokeniserState::EndTagOpen);
            self.advance_transition(TokeniserState::BogusComment);
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn read_tag_name(&mut self) {
        let tag_name = self
            .reader
            .consume_to_any(&['\t', '\n', '\r', '\x0C', ' ', '/', '>', NULL_CHAR])
            .to_ascii_lowercase();
        self.append_tag_name(&tag_name);

        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                self.transition(TokeniserState::BeforeAttributeName);
            }
            '/' => self.transition(TokeniserState::SelfClosingStartTag),
            '>' => {
                self.emit_tag_pending();
                self.transition(TokeniserState::Data);
            }
            NULL_CHAR => {
                self.error(TokeniserState::TagName);
                self.append_tag_name_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::TagName);
                self.transition(TokeniserState::Data);
            }
            c => self.append_tag_name_char(c),
        }
    }

    // ========== RCDATA / RAWTEXT / script data end-tag scanning ==========

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    fn read_rcdata_less_than_sign(&mut self) {
        if self.reader.matches('/') {
            self.create_temp_buffer();
            self.advance_transition(TokeniserState::RcdataEndTagOpen);
        } else if self.reader.matches_letter()
            && self.appropriate_end_tag_name().is_some_and(|name| {
                let close = format!("</{name}");
                !self.reader.contains_ignore_case(&close)
            })
        {
            // Diverge from spec: got a start tag, but there's no
            // appropriate end tag ahead (e.g. an unclosed <title>).
            // Rather than consuming to EOF, synthesise the end tag and
            // break out here.
            let name = self
                .appropriate_end_tag_name()
                .expect("checked above")
                .to_string();
            self.create_tag_pending(false);
            self.append_tag_name(&name);
            self.emit_tag_pending();
            self.reader.unconsume(); // undo the "<"
            self.transition(TokeniserState::Data);
        } else {
            self.emit_char('<');
            self.transition(TokeniserState::Rcdata);
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    fn read_rcdata_end_tag_open(&mut self) {
        if self.reader.matches_letter() {
            self.create_tag_pending(false);
            let c = self.reader.current();
            self.append_tag_name_char(c.to_ascii_lowercase());
            self.data_buffer.push(c);
            self.advance_transition(TokeniserState::RcdataEndTagName);
        } else {
            self.emit_str("</");
            self.transition(TokeniserState::Rcdata);
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    fn read_rcdata_end_tag_name(&mut self) {
        if self.reader.matches_letter() {
            let name = self.reader.consume_letter_sequence();
            self.append_tag_name(&name.to_ascii_lowercase());
            self.data_buffer.push_str(&name);
            return;
        }

        if self.is_appropriate_end_tag_token() && !self.reader.is_empty() {
            match self.reader.consume() {
                '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                    self.transition(TokeniserState::BeforeAttributeName);
                }
                '/' => self.transition(TokeniserState::SelfClosingStartTag),
                '>' => {
                    self.emit_tag_pending();
                    self.transition(TokeniserState::Data);
                }
                _ => {
                    self.reader.unconsume();
                    self.rcdata_end_tag_name_anything_else();
                }
            }
        } else {
            self.rcdata_end_tag_name_anything_else();
        }
    }

    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS
    /// character token, and a character token for each of the characters
    /// in the temporary buffer... Reconsume in the RCDATA state."
    fn rcdata_end_tag_name_anything_else(&mut self) {
        let buffered = format!("</{}", self.data_buffer);
        self.emit_str(&buffered);
        self.transition(TokeniserState::Rcdata);
    }

    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn read_rawtext_less_than_sign(&mut self) {
        if self.reader.matches('/') {
            self.create_temp_buffer();
            self.advance_transition(TokeniserState::RawtextEndTagOpen);
        } else {
            self.emit_char('<');
            self.transition(TokeniserState::Rawtext);
        }
    }

    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    fn read_rawtext_end_tag_open(&mut self) {
        self.read_end_tag_for_data(TokeniserState::RawtextEndTagName, TokeniserState::Rawtext);
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    fn read_rawtext_end_tag_name(&mut self) {
        self.handle_data_end_tag(TokeniserState::Rawtext);
    }

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    fn read_script_data_less_than_sign(&mut self) {
        match self.reader.consume() {
            '/' => {
                self.create_temp_buffer();
                self.transition(TokeniserState::ScriptDataEndTagOpen);
            }
            '!' => {
                self.emit_str("<!");
                self.transition(TokeniserState::ScriptDataEscapeStart);
            }
            _ => {
                self.emit_char('<');
                self.reader.unconsume();
                self.transition(TokeniserState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    fn read_script_data_end_tag_open(&mut self) {
        self.read_end_tag_for_data(TokeniserState::ScriptDataEndTagName, TokeniserState::ScriptData);
    }

    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    fn read_script_data_end_tag_name(&mut self) {
        self.handle_data_end_tag(TokeniserState::ScriptData);
    }

    /// Shared "end tag open" handling for RAWTEXT and script data.
    fn read_end_tag_for_data(&mut self, tag_state: TokeniserState, else_state: TokeniserState) {
        if self.reader.matches_letter() {
            self.create_tag_pending(false);
            self.transition(tag_state);
        } else {
            self.emit_str("</");
            self.transition(else_state);
        }
    }

    /// Shared "end tag name" handling for RAWTEXT and script data: close
    /// only on an appropriate end tag, otherwise flush the scanned text
    /// back out as character data.
    fn handle_data_end_tag(&mut self, else_state: TokeniserState) {
        if self.reader.matches_letter() {
            let name = self.reader.consume_letter_sequence();
            self.append_tag_name(&name.to_ascii_lowercase());
            self.data_buffer.push_str(&name);
            return;
        }

        let mut needs_exit_transition = false;
        if self.is_appropriate_end_tag_token() && !self.reader.is_empty() {
            match self.reader.consume() {
                '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                    self.transition(TokeniserState::BeforeAttributeName);
                }
                '/' => self.transition(TokeniserState::SelfClosingStartTag),
                '>' => {
                    self.emit_tag_pending();
                    self.transition(TokeniserState::Data);
                }
                c => {
                    self.data_buffer.push(c);
                    needs_exit_transition = true;
                }
            }
        } else {
            needs_exit_transition = true;
        }

        if needs_exit_transition {
            let buffered = format!("</{}", self.data_buffer);
            self.emit_str(&buffered);
            self.transition(else_state);
        }
    }

    // ========== script data escapes ==========

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    fn read_script_data_escape_start(&mut self) {
        if self.reader.matches('-') {
            self.emit_char('-');
            self.advance_transition(TokeniserState::ScriptDataEscapeStartDash);
        } else {
            self.transition(TokeniserState::ScriptData);
        }
    }

    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    fn read_script_data_escape_start_dash(&mut self) {
        if self.reader.matches('-') {
            self.emit_char('-');
            self.advance_transition(TokeniserState::ScriptDataEscapedDashDash);
        } else {
            self.transition(TokeniserState::ScriptData);
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    fn read_script_data_escaped(&mut self) {
        if self.reader.is_empty() {
            self.eof_error(TokeniserState::ScriptDataEscaped);
            self.transition(TokeniserState::Data);
            return;
        }

        match self.reader.current() {
            '-' => {
                self.emit_char('-');
                self.advance_transition(TokeniserState::ScriptDataEscapedDash);
            }
            '<' => self.advance_transition(TokeniserState::ScriptDataEscapedLessThanSign),
            NULL_CHAR => {
                self.error(TokeniserState::ScriptDataEscaped);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            _ => {
                let data = self.reader.consume_to_any(&['-', '<', NULL_CHAR]);
                self.emit_str(&data);
            }
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    fn read_script_data_escaped_dash(&mut self) {
        if self.reader.is_empty() {
            self.eof_error(TokeniserState::ScriptDataEscapedDash);
            self.transition(TokeniserState::Data);
            return;
        }

        match self.reader.consume() {
            '-' => {
                self.emit_char('-');
                self.transition(TokeniserState::ScriptDataEscapedDashDash);
            }
            '<' => self.transition(TokeniserState::ScriptDataEscapedLessThanSign),
            NULL_CHAR => {
                self.error(TokeniserState::ScriptDataEscapedDash);
                self.emit_char(REPLACEMENT_CHAR);
                self.transition(TokeniserState::ScriptDataEscaped);
            }
            c => {
                self.emit_char(c);
                self.transition(TokeniserState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    fn read_script_data_escaped_dash_dash(&mut self) {
        if self.reader.is_empty() {
            self.eof_error(TokeniserState::ScriptDataEscapedDashDash);
            self.transition(TokeniserState::Data);
            return;
        }

        match self.reader.consume() {
            '-' => self.emit_char('-'),
            '<' => self.transition(TokeniserState::ScriptDataEscapedLessThanSign),
            '>' => {
                self.emit_char('>');
                self.transition(TokeniserState::ScriptData);
            }
            NULL_CHAR => {
                self.error(TokeniserState::ScriptDataEscapedDashDash);
                self.emit_char(REPLACEMENT_CHAR);
                self.transition(TokeniserState::ScriptDataEscaped);
            }
            c => {
                self.emit_char(c);
                self.transition(TokeniserState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    fn read_script_data_escaped_less_than_sign(&mut self) {
        if self.reader.matches_letter() {
            self.create_temp_buffer();
            let c = self.reader.current();
            self.data_buffer.push(c.to_ascii_lowercase());
            self.emit_char('<');
            self.emit_char(c);
            self.advance_transition(TokeniserState::ScriptDataDoubleEscapeStart);
        } else if self.reader.matches('/') {
            self.create_temp_buffer();
            self.advance_transition(TokeniserState::ScriptDataEscapedEndTagOpen);
        } else {
            self.emit_char('<');
            self.transition(TokeniserState::ScriptDataEscaped);
        }
    }

    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    fn read_script_data_escaped_end_tag_open(&mut self) {
        if self.reader.matches_letter() {
            self.create_tag_pending(false);
            let c = self.reader.current();
            self.append_tag_name_char(c.to_ascii_lowercase());
            self.data_buffer.push(c);
            self.advance_transition(TokeniserState::ScriptDataEscapedEndTagName);
        } else {
            self.emit_str("</");
            self.transition(TokeniserState::ScriptDataEscaped);
        }
    }

    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    fn read_script_data_escaped_end_tag_name(&mut self) {
        self.handle_data_end_tag(TokeniserState::ScriptDataEscaped);
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    fn read_script_data_double_escape_start(&mut self) {
        self.handle_data_double_escape_tag(
            TokeniserState::ScriptDataDoubleEscaped,
            TokeniserState::ScriptDataEscaped,
        );
    }

    /// Shared double-escape transition: an inner `<script>`/`</script>`
    /// inside escaped script data flips between the escape levels.
    fn handle_data_double_escape_tag(
        &mut self,
        primary: TokeniserState,
        fallback: TokeniserState,
    ) {
        if self.reader.matches_letter() {
            let name = self.reader.consume_letter_sequence();
            self.data_buffer.push_str(&name.to_ascii_lowercase());
            self.emit_str(&name);
            return;
        }

        match self.reader.consume() {
            c @ ('\t' | '\n' | '\r' | '\x0C' | ' ' | '/' | '>') => {
                if self.data_buffer == "script" {
                    self.transition(primary);
                } else {
                    self.transition(fallback);
                }
                self.emit_char(c);
            }
            _ => {
                self.reader.unconsume();
                self.transition(fallback);
            }
        }
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    fn read_script_data_double_escaped(&mut self) {
        match self.reader.current() {
            '-' => {
                self.emit_char('-');
                self.advance_transition(TokeniserState::ScriptDataDoubleEscapedDash);
            }
            '<' => {
                self.emit_char('<');
                self.advance_transition(TokeniserState::ScriptDataDoubleEscapedLessThanSign);
            }
            NULL_CHAR => {
                self.error(TokeniserState::ScriptDataDoubleEscaped);
                self.reader.advance();
                self.emit_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::ScriptDataDoubleEscaped);
                self.transition(TokeniserState::Data);
            }
            _ => {
                let data = self.reader.consume_to_any(&['-', '<', NULL_CHAR]);
                self.emit_str(&data);
            }
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    fn read_script_data_double_escaped_dash(&mut self) {
        match self.reader.consume() {
            '-' => {
                self.emit_char('-');
                self.transition(TokeniserState::ScriptDataDoubleEscapedDashDash);
            }
            '<' => {
                self.emit_char('<');
                self.transition(TokeniserState::ScriptDataDoubleEscapedLessThanSign);
            }
            NULL_CHAR => {
                self.error(TokeniserState::ScriptDataDoubleEscapedDash);
                self.emit_char(REPLACEMENT_CHAR);
                self.transition(TokeniserState::ScriptDataDoubleEscaped);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::ScriptDataDoubleEscapedDash);
                self.transition(TokeniserState::Data);
            }
            c => {
                self.emit_char(c);
                self.transition(TokeniserState::ScriptDataDoubleEscaped);
            }
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    fn read_script_data_double_escaped_dash_dash(&mut self) {
        match self.reader.consume() {
            '-' => self.emit_char('-'),
            '<' => {
                self.emit_char('<');
                self.transition(TokeniserState::ScriptDataDoubleEscapedLessThanSign);
            }
            '>' => {
                self.emit_char('>');
                self.transition(TokeniserState::ScriptData);
            }
            NULL_CHAR => {
                self.error(TokeniserState::ScriptDataDoubleEscapedDashDash);
                self.emit_char(REPLACEMENT_CHAR);
                self.transition(TokeniserState::ScriptDataDoubleEscaped);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::ScriptDataDoubleEscapedDashDash);
                self.transition(TokeniserState::Data);
            }
            c => {
                self.emit_char(c);
                self.transition(TokeniserState::ScriptDataDoubleEscaped);
            }
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    fn read_script_data_double_escaped_less_than_sign(&mut self) {
        if self.reader.matches('/') {
            self.emit_char('/');
            self.create_temp_buffer();
            self.advance_transition(TokeniserState::ScriptDataDoubleEscapeEnd);
        } else {
            self.transition(TokeniserState::ScriptDataDoubleEscaped);
        }
    }

    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    fn read_script_data_double_escape_end(&mut self) {
        self.handle_data_double_escape_tag(
            TokeniserState::ScriptDataEscaped,
            TokeniserState::ScriptDataDoubleEscaped,
        );
    }

    // ========== attribute states ==========

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn read_before_attribute_name(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {} // ignore whitespace
            '/' => self.transition(TokeniserState::SelfClosingStartTag),
            '>' => {
                self.emit_tag_pending();
                self.transition(TokeniserState::Data);
            }
            NULL_CHAR => {
                self.error(TokeniserState::BeforeAttributeName);
                self.tag_new_attribute();
                self.reader.unconsume();
                self.transition(TokeniserState::AttributeName);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::BeforeAttributeName);
                self.transition(TokeniserState::Data);
            }
            c @ ('"' | '\'' | '<' | '=') => {
                self.error(TokeniserState::BeforeAttributeName);
                self.tag_new_attribute();
                self.append_attr_name_char(c);
                self.transition(TokeniserState::AttributeName);
            }
            _ => {
                self.tag_new_attribute();
                self.reader.unconsume();
                self.transition(TokeniserState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn read_attribute_name(&mut self) {
        let name = self.reader.consume_to_any(&[
            '\t', '\n', '\r', '\x0C', ' ', '/', '=', '>', NULL_CHAR, '"', '\'', '<',
        ]);
        self.append_attr_name(&name);

        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                self.transition(TokeniserState::AfterAttributeName);
            }
            '/' => self.transition(TokeniserState::SelfClosingStartTag),
            '=' => self.transition(TokeniserState::BeforeAttributeValue),
            '>' => {
                self.emit_tag_pending();
                self.transition(TokeniserState::Data);
            }
            NULL_CHAR => {
                self.error(TokeniserState::AttributeName);
                self.append_attr_name_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AttributeName);
                self.transition(TokeniserState::Data);
            }
            c @ ('"' | '\'' | '<') => {
                self.error(TokeniserState::AttributeName);
                self.append_attr_name_char(c);
            }
            c => self.append_attr_name_char(c),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn read_after_attribute_name(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {} // ignore
            '/' => self.transition(TokeniserState::SelfClosingStartTag),
            '=' => self.transition(TokeniserState::BeforeAttributeValue),
            '>' => {
                self.emit_tag_pending();
                self.transition(TokeniserState::Data);
            }
            NULL_CHAR => {
                self.error(TokeniserState::AfterAttributeName);
                self.append_attr_name_char(REPLACEMENT_CHAR);
                self.transition(TokeniserState::AttributeName);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AfterAttributeName);
                self.transition(TokeniserState::Data);
            }
            c @ ('"' | '\'' | '<') => {
                self.error(TokeniserState::AfterAttributeName);
                self.tag_new_attribute();
                self.append_attr_name_char(c);
                self.transition(TokeniserState::AttributeName);
            }
            _ => {
                self.tag_new_attribute();
                self.reader.unconsume();
                self.transition(TokeniserState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn read_before_attribute_value(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {} // ignore
            '"' => self.transition(TokeniserState::AttributeValueDoubleQuoted),
            '&' => {
                self.reader.unconsume();
                self.transition(TokeniserState::AttributeValueUnquoted);
            }
            '\'' => self.transition(TokeniserState::AttributeValueSingleQuoted),
            NULL_CHAR => {
                self.error(TokeniserState::BeforeAttributeValue);
                self.append_attr_value_char(REPLACEMENT_CHAR);
                self.transition(TokeniserState::AttributeValueUnquoted);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::BeforeAttributeValue);
                self.emit_tag_pending();
                self.transition(TokeniserState::Data);
            }
            '>' => {
                self.error(TokeniserState::BeforeAttributeValue);
                self.emit_tag_pending();
                self.transition(TokeniserState::Data);
            }
            c @ ('<' | '=' | '`') => {
                self.error(TokeniserState::BeforeAttributeValue);
                self.append_attr_value_char(c);
                self.transition(TokeniserState::AttributeValueUnquoted);
            }
            _ => {
                self.reader.unconsume();
                self.transition(TokeniserState::AttributeValueUnquoted);
            }
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    fn read_attribute_value_double_quoted(&mut self) {
        let value = self.reader.consume_to_any(&['"', '&', NULL_CHAR]);
        if !value.is_empty() {
            self.append_attr_value(&value);
        }

        match self.reader.consume() {
            '"' => self.transition(TokeniserState::AfterAttributeValueQuoted),
            '&' => {
                self.attr_value_return_state = TokeniserState::AttributeValueDoubleQuoted;
                self.transition(TokeniserState::CharacterReferenceInAttributeValue);
            }
            NULL_CHAR => {
                self.error(TokeniserState::AttributeValueDoubleQuoted);
                self.append_attr_value_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AttributeValueDoubleQuoted);
                self.transition(TokeniserState::Data);
            }
            _ => unreachable!("consume_to_any stops only at listed needles"),
        }
    }

    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn read_attribute_value_single_quoted(&mut self) {
        let value = self.reader.consume_to_any(&['\'', '&', NULL_CHAR]);
        if !value.is_empty() {
            self.append_attr_value(&value);
        }

        match self.reader.consume() {
            '\'' => self.transition(TokeniserState::AfterAttributeValueQuoted),
            '&' => {
                self.attr_value_return_state = TokeniserState::AttributeValueSingleQuoted;
                self.transition(TokeniserState::CharacterReferenceInAttributeValue);
            }
            NULL_CHAR => {
                self.error(TokeniserState::AttributeValueSingleQuoted);
                self.append_attr_value_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AttributeValueSingleQuoted);
                self.transition(TokeniserState::Data);
            }
            _ => unreachable!("consume_to_any stops only at listed needles"),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn read_attribute_value_unquoted(&mut self) {
        let value = self.reader.consume_to_any(&[
            '\t', '\n', '\r', '\x0C', ' ', '&', '>', NULL_CHAR, '"', '\'', '<', '=', '`',
        ]);
        if !value.is_empty() {
            self.append_attr_value(&value);
        }

        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                self.transition(TokeniserState::BeforeAttributeName);
            }
            '&' => {
                self.attr_value_return_state = TokeniserState::AttributeValueUnquoted;
                self.transition(TokeniserState::CharacterReferenceInAttributeValue);
            }
            '>' => {
                self.emit_tag_pending();
                self.transition(TokeniserState::Data);
            }
            NULL_CHAR => {
                self.error(TokeniserState::AttributeValueUnquoted);
                self.append_attr_value_char(REPLACEMENT_CHAR);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AttributeValueUnquoted);
                self.transition(TokeniserState::Data);
            }
            c @ ('"' | '\'' | '<' | '=' | '`') => {
                self.error(TokeniserState::AttributeValueUnquoted);
                self.append_attr_value_char(c);
            }
            _ => unreachable!("consume_to_any stops only at listed needles"),
        }
    }

    /// Resolve a character reference inside an attribute value and return
    /// to the attribute-value state that sent us here. The quote character
    /// of that state (or `>` when unquoted) is additionally allowed to
    /// terminate the reference.
    fn read_character_reference_in_attribute_value(&mut self) {
        let additional = match self.attr_value_return_state {
            TokeniserState::AttributeValueDoubleQuoted => '"',
            TokeniserState::AttributeValueSingleQuoted => '\'',
            TokeniserState::AttributeValueUnquoted => '>',
            state => unreachable!("no attribute-value return state recorded, got [{state}]"),
        };
        match self.consume_character_reference(Some(additional), true) {
            Some(c) => self.append_attr_value_char(c),
            None => self.append_attr_value_char('&'),
        }
        let return_state = self.attr_value_return_state;
        self.transition(return_state);
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn read_after_attribute_value_quoted(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                self.transition(TokeniserState::BeforeAttributeName);
            }
            '/' => self.transition(TokeniserState::SelfClosingStartTag),
            '>' => {
                self.emit_tag_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AfterAttributeValueQuoted);
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.error(TokeniserState::AfterAttributeValueQuoted);
                self.reader.unconsume();
                self.transition(TokeniserState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn read_self_closing_start_tag(&mut self) {
        match self.reader.consume() {
            '>' => {
                self.pending_tag.self_closing = true;
                self.emit_tag_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::SelfClosingStartTag);
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.error(TokeniserState::SelfClosingStartTag);
                self.reader.unconsume();
                self.transition(TokeniserState::BeforeAttributeName);
            }
        }
    }

    // ========== comment states ==========

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn read_bogus_comment(&mut self) {
        // Rewind to capture the character that led us here.
        self.reader.unconsume();
        self.create_comment_pending();
        let data = self.reader.consume_to('>');
        self.pending_comment.push_str(&data);
        self.emit_comment_pending();
        self.advance_transition(TokeniserState::Data);
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    fn read_markup_declaration_open(&mut self) {
        if self.reader.match_consume("--") {
            self.create_comment_pending();
            self.transition(TokeniserState::CommentStart);
        } else if self.reader.match_consume_ignore_case("DOCTYPE") {
            self.transition(TokeniserState::Doctype);
        } else if self.reader.match_consume("[CDATA[") {
            self.transition(TokeniserState::CdataSection);
        } else {
            self.error(TokeniserState::MarkupDeclarationOpen);
            // Advance so this character gets included in the bogus
            // comment, unlike real markup declarations.
            self.advance_transition(TokeniserState::BogusComment);
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn read_comment_start(&mut self) {
        match self.reader.consume() {
            '-' => self.transition(TokeniserState::CommentStartDash),
            NULL_CHAR => {
                self.error(TokeniserState::CommentStart);
                self.pending_comment.push(REPLACEMENT_CHAR);
                self.transition(TokeniserState::Comment);
            }
            '>' => {
                self.error(TokeniserState::CommentStart);
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::CommentStart);
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.reader.unconsume();
                self.transition(TokeniserState::Comment);
            }
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn read_comment_start_dash(&mut self) {
        match self.reader.consume() {
            '-' => self.transition(TokeniserState::CommentEnd),
            NULL_CHAR => {
                self.error(TokeniserState::CommentStartDash);
                self.pending_comment.push('-');
                self.pending_comment.push(REPLACEMENT_CHAR);
                self.transition(TokeniserState::Comment);
            }
            '>' => {
                self.error(TokeniserState::CommentStartDash);
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::CommentStartDash);
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            c => {
                self.pending_comment.push('-');
                self.pending_comment.push(c);
                self.transition(TokeniserState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn read_comment(&mut self) {
        match self.reader.current() {
            '-' => self.advance_transition(TokeniserState::CommentEndDash),
            NULL_CHAR => {
                self.error(TokeniserState::Comment);
                self.reader.advance();
                self.pending_comment.push(REPLACEMENT_CHAR);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::Comment);
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                let data = self.reader.consume_to_any(&['-', NULL_CHAR]);
                self.pending_comment.push_str(&data);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn read_comment_end_dash(&mut self) {
        match self.reader.consume() {
            '-' => self.transition(TokeniserState::CommentEnd),
            NULL_CHAR => {
                self.error(TokeniserState::CommentEndDash);
                self.pending_comment.push('-');
                self.pending_comment.push(REPLACEMENT_CHAR);
                self.transition(TokeniserState::Comment);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::CommentEndDash);
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            c => {
                self.pending_comment.push('-');
                self.pending_comment.push(c);
                self.transition(TokeniserState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn read_comment_end(&mut self) {
        match self.reader.consume() {
            '>' => {
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            NULL_CHAR => {
                self.error(TokeniserState::CommentEnd);
                self.pending_comment.push_str("--");
                self.pending_comment.push(REPLACEMENT_CHAR);
                self.transition(TokeniserState::Comment);
            }
            '!' => {
                self.error(TokeniserState::CommentEnd);
                self.transition(TokeniserState::CommentEndBang);
            }
            '-' => {
                self.error(TokeniserState::CommentEnd);
                self.pending_comment.push('-');
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::CommentEnd);
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            c => {
                self.error(TokeniserState::CommentEnd);
                self.pending_comment.push_str("--");
                self.pending_comment.push(c);
                self.transition(TokeniserState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn read_comment_end_bang(&mut self) {
        match self.reader.consume() {
            '-' => {
                self.pending_comment.push_str("--!");
                self.transition(TokeniserState::CommentEndDash);
            }
            '>' => {
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            NULL_CHAR => {
                self.error(TokeniserState::CommentEndBang);
                self.pending_comment.push_str("--!");
                self.pending_comment.push(REPLACEMENT_CHAR);
                self.transition(TokeniserState::Comment);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::CommentEndBang);
                self.emit_comment_pending();
                self.transition(TokeniserState::Data);
            }
            c => {
                self.pending_comment.push_str("--!");
                self.pending_comment.push(c);
                self.transition(TokeniserState::Comment);
            }
        }
    }

    // ========== doctype states ==========

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn read_doctype(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                self.transition(TokeniserState::BeforeDoctypeName);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::Doctype);
                self.create_doctype_pending();
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.error(TokeniserState::Doctype);
                self.reader.unconsume();
                self.transition(TokeniserState::BeforeDoctypeName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn read_before_doctype_name(&mut self) {
        if self.reader.matches_letter() {
            self.create_doctype_pending();
            self.transition(TokeniserState::DoctypeName);
            return;
        }

        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {} // ignore whitespace
            NULL_CHAR => {
                self.error(TokeniserState::BeforeDoctypeName);
                self.create_doctype_pending();
                self.pending_doctype.name.push(REPLACEMENT_CHAR);
                self.transition(TokeniserState::DoctypeName);
            }
            '>' => {
                self.error(TokeniserState::BeforeDoctypeName);
                self.create_doctype_pending();
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::BeforeDoctypeName);
                self.create_doctype_pending();
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            c => {
                self.create_doctype_pending();
                self.pending_doctype.name.push(c);
                self.transition(TokeniserState::DoctypeName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn read_doctype_name(&mut self) {
        if self.reader.matches_letter() {
            let name = self.reader.consume_letter_sequence();
            self.pending_doctype.name.push_str(&name.to_ascii_lowercase());
            return;
        }

        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => self.transition(TokeniserState::AfterDoctypeName),
            '>' => {
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            NULL_CHAR => {
                self.error(TokeniserState::DoctypeName);
                self.pending_doctype.name.push(REPLACEMENT_CHAR);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::DoctypeName);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            c => self.pending_doctype.name.push(c),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    fn read_after_doctype_name(&mut self) {
        if self.reader.is_empty() {
            self.eof_error(TokeniserState::AfterDoctypeName);
            self.pending_doctype.force_quirks = true;
            self.emit_doctype_pending();
            self.transition(TokeniserState::Data);
            return;
        }

        if self.reader.matches_any(&WHITESPACE) {
            self.reader.advance();
        } else if self.reader.matches('>') {
            self.emit_doctype_pending();
            self.advance_transition(TokeniserState::Data);
        } else if self.reader.match_consume_ignore_case("PUBLIC") {
            self.transition(TokeniserState::AfterDoctypePublicKeyword);
        } else if self.reader.match_consume_ignore_case("SYSTEM") {
            self.transition(TokeniserState::AfterDoctypeSystemKeyword);
        } else {
            self.error(TokeniserState::AfterDoctypeName);
            self.pending_doctype.force_quirks = true;
            self.advance_transition(TokeniserState::BogusDoctype);
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    fn read_after_doctype_public_keyword(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                self.transition(TokeniserState::BeforeDoctypePublicIdentifier);
            }
            '"' => {
                self.error(TokeniserState::AfterDoctypePublicKeyword);
                self.transition(TokeniserState::DoctypePublicIdentifierDoubleQuoted);
            }
            '\'' => {
                self.error(TokeniserState::AfterDoctypePublicKeyword);
                self.transition(TokeniserState::DoctypePublicIdentifierSingleQuoted);
            }
            '>' => {
                self.error(TokeniserState::AfterDoctypePublicKeyword);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AfterDoctypePublicKeyword);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.error(TokeniserState::AfterDoctypePublicKeyword);
                self.pending_doctype.force_quirks = true;
                self.transition(TokeniserState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    fn read_before_doctype_public_identifier(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {} // ignore
            '"' => self.transition(TokeniserState::DoctypePublicIdentifierDoubleQuoted),
            '\'' => self.transition(TokeniserState::DoctypePublicIdentifierSingleQuoted),
            '>' => {
                self.error(TokeniserState::BeforeDoctypePublicIdentifier);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::BeforeDoctypePublicIdentifier);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.error(TokeniserState::BeforeDoctypePublicIdentifier);
                self.pending_doctype.force_quirks = true;
                self.transition(TokeniserState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.59](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// and [§ 13.2.5.60](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    fn read_doctype_public_identifier_quoted(&mut self, quote: char) {
        let state = if quote == '"' {
            TokeniserState::DoctypePublicIdentifierDoubleQuoted
        } else {
            TokeniserState::DoctypePublicIdentifierSingleQuoted
        };
        match self.reader.consume() {
            c if c == quote => self.transition(TokeniserState::AfterDoctypePublicIdentifier),
            NULL_CHAR => {
                self.error(state);
                self.pending_doctype.public_identifier.push(REPLACEMENT_CHAR);
            }
            '>' => {
                self.error(state);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(state);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            c => self.pending_doctype.public_identifier.push(c),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    fn read_after_doctype_public_identifier(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                self.transition(TokeniserState::BetweenDoctypePublicAndSystemIdentifiers);
            }
            '>' => {
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            '"' => {
                self.error(TokeniserState::AfterDoctypePublicIdentifier);
                self.transition(TokeniserState::DoctypeSystemIdentifierDoubleQuoted);
            }
            '\'' => {
                self.error(TokeniserState::AfterDoctypePublicIdentifier);
                self.transition(TokeniserState::DoctypeSystemIdentifierSingleQuoted);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AfterDoctypePublicIdentifier);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.error(TokeniserState::AfterDoctypePublicIdentifier);
                self.pending_doctype.force_quirks = true;
                self.transition(TokeniserState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    fn read_between_doctype_public_and_system_identifiers(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {} // ignore
            '>' => {
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            '"' => self.transition(TokeniserState::DoctypeSystemIdentifierDoubleQuoted),
            '\'' => self.transition(TokeniserState::DoctypeSystemIdentifierSingleQuoted),
            EOF_CHAR => {
                self.eof_error(TokeniserState::BetweenDoctypePublicAndSystemIdentifiers);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.error(TokeniserState::BetweenDoctypePublicAndSystemIdentifiers);
                self.pending_doctype.force_quirks = true;
                self.transition(TokeniserState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    fn read_after_doctype_system_keyword(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {
                self.transition(TokeniserState::BeforeDoctypeSystemIdentifier);
            }
            '>' => {
                self.error(TokeniserState::AfterDoctypeSystemKeyword);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            '"' => {
                self.error(TokeniserState::AfterDoctypeSystemKeyword);
                self.transition(TokeniserState::DoctypeSystemIdentifierDoubleQuoted);
            }
            '\'' => {
                self.error(TokeniserState::AfterDoctypeSystemKeyword);
                self.transition(TokeniserState::DoctypeSystemIdentifierSingleQuoted);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AfterDoctypeSystemKeyword);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.error(TokeniserState::AfterDoctypeSystemKeyword);
                self.pending_doctype.force_quirks = true;
                self.transition(TokeniserState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    fn read_before_doctype_system_identifier(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {} // ignore
            '"' => self.transition(TokeniserState::DoctypeSystemIdentifierDoubleQuoted),
            '\'' => self.transition(TokeniserState::DoctypeSystemIdentifierSingleQuoted),
            '>' => {
                self.error(TokeniserState::BeforeDoctypeSystemIdentifier);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::BeforeDoctypeSystemIdentifier);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                self.error(TokeniserState::BeforeDoctypeSystemIdentifier);
                self.pending_doctype.force_quirks = true;
                self.transition(TokeniserState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.65](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    /// and [§ 13.2.5.66](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    fn read_doctype_system_identifier_quoted(&mut self, quote: char) {
        let state = if quote == '"' {
            TokeniserState::DoctypeSystemIdentifierDoubleQuoted
        } else {
            TokeniserState::DoctypeSystemIdentifierSingleQuoted
        };
        match self.reader.consume() {
            c if c == quote => self.transition(TokeniserState::AfterDoctypeSystemIdentifier),
            NULL_CHAR => {
                self.error(state);
                self.pending_doctype.system_identifier.push(REPLACEMENT_CHAR);
            }
            '>' => {
                self.error(state);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(state);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            c => self.pending_doctype.system_identifier.push(c),
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    fn read_after_doctype_system_identifier(&mut self) {
        match self.reader.consume() {
            '\t' | '\n' | '\r' | '\x0C' | ' ' => {} // ignore
            '>' => {
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            EOF_CHAR => {
                self.eof_error(TokeniserState::AfterDoctypeSystemIdentifier);
                self.pending_doctype.force_quirks = true;
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {
                // NOT a force-quirks error.
                self.error(TokeniserState::AfterDoctypeSystemIdentifier);
                self.transition(TokeniserState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn read_bogus_doctype(&mut self) {
        match self.reader.consume() {
            '>' | EOF_CHAR => {
                self.emit_doctype_pending();
                self.transition(TokeniserState::Data);
            }
            _ => {} // ignore
        }
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// The section's raw data is emitted as a character run; there is no
    /// CDATA node kind in the output tree.
    fn read_cdata_section(&mut self) {
        let data = self.reader.consume_to_sequence("]]>");
        self.emit_str(&data);
        self.reader.match_consume("]]>");
        self.transition(TokeniserState::Data);
    }
}
