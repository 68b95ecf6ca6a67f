//! Token types produced by the tokeniser.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "The output of the tokenization step is a series of zero or more of the
//! following tokens: DOCTYPE, start tag, end tag, comment, character,
//! end-of-file."

use core::fmt;

use quokka_dom::Attributes;

/// A token handed from the tokeniser to the tree builder.
///
/// Character tokens carry a *run* of text, not a single code point: the
/// tokeniser buffers consecutive characters (and resolved character
/// references) and flushes them as one token when a non-character token
/// is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system
    /// identifier, and a force-quirks flag."
    Doctype {
        name: String,
        public_identifier: String,
        system_identifier: String,
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag,
    /// and a list of attributes."
    ///
    /// Tag names are lowercase ASCII; attribute keys are lowercased and
    /// unique (the first occurrence of a duplicate wins).
    StartTag {
        name: String,
        self_closing: bool,
        attributes: Attributes,
    },

    /// End tag token. Attributes on an end tag are a parse error; the
    /// tokeniser reports and discards them, so this variant carries only
    /// the name.
    EndTag { name: String },

    /// "Comment and character tokens have data."
    Comment { data: String },

    /// A run of character data.
    Character { data: String },

    /// End-of-file token signals the end of input.
    Eof,
}

impl Token {
    /// Synthetic start tag with no attributes. Insertion modes use these
    /// to inject implied elements (`<html>`, `<head>`, `<body>`, ...).
    #[must_use]
    pub fn start_tag(name: &str) -> Self {
        Self::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes: Attributes::new(),
        }
    }

    /// Synthetic end tag. Insertion modes use these to close elements
    /// implicitly (`</p>`, `</select>`, ...).
    #[must_use]
    pub fn end_tag(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
        }
    }

    #[must_use]
    pub const fn is_doctype(&self) -> bool {
        matches!(self, Self::Doctype { .. })
    }

    #[must_use]
    pub const fn is_start_tag(&self) -> bool {
        matches!(self, Self::StartTag { .. })
    }

    #[must_use]
    pub const fn is_end_tag(&self) -> bool {
        matches!(self, Self::EndTag { .. })
    }

    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::Comment { .. })
    }

    #[must_use]
    pub const fn is_character(&self) -> bool {
        matches!(self, Self::Character { .. })
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Tag name if this is a start tag.
    #[must_use]
    pub fn start_tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Tag name if this is an end tag.
    #[must_use]
    pub fn end_tag_name(&self) -> Option<&str> {
        match self {
            Self::EndTag { name } => Some(name.as_str()),
            _ => None,
        }
    }

    /// True for a start tag whose name is in `names`.
    #[must_use]
    pub fn is_start_tag_named(&self, names: &[&str]) -> bool {
        self.start_tag_name().is_some_and(|n| names.contains(&n))
    }

    /// True for an end tag whose name is in `names`.
    #[must_use]
    pub fn is_end_tag_named(&self, names: &[&str]) -> bool {
        self.end_tag_name().is_some_and(|n| names.contains(&n))
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// True for a character token consisting entirely of ASCII whitespace
    /// (tab, LF, FF, CR, space). Several insertion modes route whitespace
    /// runs differently from other character data.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        match self {
            Self::Character { data } => data
                .chars()
                .all(|c| matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')),
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                write!(f, "<!DOCTYPE {name}")?;
                if !public_identifier.is_empty() {
                    write!(f, " PUBLIC \"{public_identifier}\"")?;
                }
                if !system_identifier.is_empty() {
                    write!(f, " \"{system_identifier}\"")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                write!(f, ">")
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}{attributes}")?;
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => write!(f, "{data}"),
            Self::Eof => write!(f, "EOF"),
        }
    }
}
