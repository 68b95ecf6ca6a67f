//! Common utilities for the Quokka HTML parser.
//!
//! This crate provides shared infrastructure used by the parser crates:
//! - **Warning System** - deduplicated diagnostics for recovered-but-odd input
//! - **URL Resolution** - base-href resolution for document base URIs

pub mod url;
pub mod warning;
