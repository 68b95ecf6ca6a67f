//! Named character reference lookup tables.
//!
//! [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
//!
//! Two tables, keyed by entity name *without* the leading `&` or the
//! trailing `;`:
//!
//! - **base**: the legacy (HTML 4) names. These resolve even when the
//!   author omitted the terminating semicolon (`&amp` works like `&amp;`).
//! - **extended**: newer names that are only recognised when the
//!   terminating semicolon is present.
//!
//! The full spec defines 2,231 entities, many mapping to multiple code
//! points; this table carries the complete legacy set plus the common
//! single-codepoint extended names, which is what the tokeniser's
//! reference-resolution contract needs.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Legacy (HTML 4) entities: recognised with or without a trailing `;`.
static BASE_ENTITIES: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // Markup-significant
    m.insert("quot", '\u{0022}');
    m.insert("amp", '\u{0026}');
    m.insert("lt", '\u{003C}');
    m.insert("gt", '\u{003E}');

    // Latin-1 block (U+00A0..U+00FF)
    m.insert("nbsp", '\u{00A0}');
    m.insert("iexcl", '\u{00A1}');
    m.insert("cent", '\u{00A2}');
    m.insert("pound", '\u{00A3}');
    m.insert("curren", '\u{00A4}');
    m.insert("yen", '\u{00A5}');
    m.insert("brvbar", '\u{00A6}');
    m.insert("sect", '\u{00A7}');
    m.insert("uml", '\u{00A8}');
    m.insert("copy", '\u{00A9}');
    m.insert("ordf", '\u{00AA}');
    m.insert("laquo", '\u{00AB}');
    m.insert("not", '\u{00AC}');
    m.insert("shy", '\u{00AD}');
    m.insert("reg", '\u{00AE}');
    m.insert("macr", '\u{00AF}');
    m.insert("deg", '\u{00B0}');
    m.insert("plusmn", '\u{00B1}');
    m.insert("sup2", '\u{00B2}');
    m.insert("sup3", '\u{00B3}');
    m.insert("acute", '\u{00B4}');
    m.insert("micro", '\u{00B5}');
    m.insert("para", '\u{00B6}');
    m.insert("middot", '\u{00B7}');
    m.insert("cedil", '\u{00B8}');
    m.insert("sup1", '\u{00B9}');
    m.insert("ordm", '\u{00BA}');
    m.insert("raquo", '\u{00BB}');
    m.insert("frac14", '\u{00BC}');
    m.insert("frac12", '\u{00BD}');
    m.insert("frac34", '\u{00BE}');
    m.insert("iquest", '\u{00BF}');
    m.insert("Agrave", '\u{00C0}');
    m.insert("Aacute", '\u{00C1}');
    m.insert("Acirc", '\u{00C2}');
    m.insert("Atilde", '\u{00C3}');
    m.insert("Auml", '\u{00C4}');
    m.insert("Aring", '\u{00C5}');
    m.insert("AElig", '\u{00C6}');
    m.insert("Ccedil", '\u{00C7}');
    m.insert("Egrave", '\u{00C8}');
    m.insert("Eacute", '\u{00C9}');
    m.insert("Ecirc", '\u{00CA}');
    m.insert("Euml", '\u{00CB}');
    m.insert("Igrave", '\u{00CC}');
    m.insert("Iacute", '\u{00CD}');
    m.insert("Icirc", '\u{00CE}');
    m.insert("Iuml", '\u{00CF}');
    m.insert("ETH", '\u{00D0}');
    m.insert("Ntilde", '\u{00D1}');
    m.insert("Ograve", '\u{00D2}');
    m.insert("Oacute", '\u{00D3}');
    m.insert("Ocirc", '\u{00D4}');
    m.insert("Otilde", '\u{00D5}');
    m.insert("Ouml", '\u{00D6}');
    m.insert("times", '\u{00D7}');
    m.insert("Oslash", '\u{00D8}');
    m.insert("Ugrave", '\u{00D9}');
    m.insert("Uacute", '\u{00DA}');
    m.insert("Ucirc", '\u{00DB}');
    m.insert("Uuml", '\u{00DC}');
    m.insert("Yacute", '\u{00DD}');
    m.insert("THORN", '\u{00DE}');
    m.insert("szlig", '\u{00DF}');
    m.insert("agrave", '\u{00E0}');
    m.insert("aacute", '\u{00E1}');
    m.insert("acirc", '\u{00E2}');
    m.insert("atilde", '\u{00E3}');
    m.insert("auml", '\u{00E4}');
    m.insert("aring", '\u{00E5}');
    m.insert("aelig", '\u{00E6}');
    m.insert("ccedil", '\u{00E7}');
    m.insert("egrave", '\u{00E8}');
    m.insert("eacute", '\u{00E9}');
    m.insert("ecirc", '\u{00EA}');
    m.insert("euml", '\u{00EB}');
    m.insert("igrave", '\u{00EC}');
    m.insert("iacute", '\u{00ED}');
    m.insert("icirc", '\u{00EE}');
    m.insert("iuml", '\u{00EF}');
    m.insert("eth", '\u{00F0}');
    m.insert("ntilde", '\u{00F1}');
    m.insert("ograve", '\u{00F2}');
    m.insert("oacute", '\u{00F3}');
    m.insert("ocirc", '\u{00F4}');
    m.insert("otilde", '\u{00F5}');
    m.insert("ouml", '\u{00F6}');
    m.insert("divide", '\u{00F7}');
    m.insert("oslash", '\u{00F8}');
    m.insert("ugrave", '\u{00F9}');
    m.insert("uacute", '\u{00FA}');
    m.insert("ucirc", '\u{00FB}');
    m.insert("uuml", '\u{00FC}');
    m.insert("yacute", '\u{00FD}');
    m.insert("thorn", '\u{00FE}');
    m.insert("yuml", '\u{00FF}');

    // Latin Extended / punctuation
    m.insert("OElig", '\u{0152}');
    m.insert("oelig", '\u{0153}');
    m.insert("Scaron", '\u{0160}');
    m.insert("scaron", '\u{0161}');
    m.insert("Yuml", '\u{0178}');
    m.insert("fnof", '\u{0192}');
    m.insert("circ", '\u{02C6}');
    m.insert("tilde", '\u{02DC}');
    m.insert("ensp", '\u{2002}');
    m.insert("emsp", '\u{2003}');
    m.insert("thinsp", '\u{2009}');
    m.insert("zwnj", '\u{200C}');
    m.insert("zwj", '\u{200D}');
    m.insert("lrm", '\u{200E}');
    m.insert("rlm", '\u{200F}');
    m.insert("ndash", '\u{2013}');
    m.insert("mdash", '\u{2014}');
    m.insert("lsquo", '\u{2018}');
    m.insert("rsquo", '\u{2019}');
    m.insert("sbquo", '\u{201A}');
    m.insert("ldquo", '\u{201C}');
    m.insert("rdquo", '\u{201D}');
    m.insert("bdquo", '\u{201E}');
    m.insert("dagger", '\u{2020}');
    m.insert("Dagger", '\u{2021}');
    m.insert("bull", '\u{2022}');
    m.insert("hellip", '\u{2026}');
    m.insert("permil", '\u{2030}');
    m.insert("prime", '\u{2032}');
    m.insert("Prime", '\u{2033}');
    m.insert("lsaquo", '\u{2039}');
    m.insert("rsaquo", '\u{203A}');
    m.insert("oline", '\u{203E}');
    m.insert("frasl", '\u{2044}');
    m.insert("euro", '\u{20AC}');

    // Greek
    m.insert("Alpha", '\u{0391}');
    m.insert("Beta", '\u{0392}');
    m.insert("Gamma", '\u{0393}');
    m.insert("Delta", '\u{0394}');
    m.insert("Epsilon", '\u{0395}');
    m.insert("Zeta", '\u{0396}');
    m.insert("Eta", '\u{0397}');
    m.insert("Theta", '\u{0398}');
    m.insert("Iota", '\u{0399}');
    m.insert("Kappa", '\u{039A}');
    m.insert("Lambda", '\u{039B}');
    m.insert("Mu", '\u{039C}');
    m.insert("Nu", '\u{039D}');
    m.insert("Xi", '\u{039E}');
    m.insert("Omicron", '\u{039F}');
    m.insert("Pi", '\u{03A0}');
    m.insert("Rho", '\u{03A1}');
    m.insert("Sigma", '\u{03A3}');
    m.insert("Tau", '\u{03A4}');
    m.insert("Upsilon", '\u{03A5}');
    m.insert("Phi", '\u{03A6}');
    m.insert("Chi", '\u{03A7}');
    m.insert("Psi", '\u{03A8}');
    m.insert("Omega", '\u{03A9}');
    m.insert("alpha", '\u{03B1}');
    m.insert("beta", '\u{03B2}');
    m.insert("gamma", '\u{03B3}');
    m.insert("delta", '\u{03B4}');
    m.insert("epsilon", '\u{03B5}');
    m.insert("zeta", '\u{03B6}');
    m.insert("eta", '\u{03B7}');
    m.insert("theta", '\u{03B8}');
    m.insert("iota", '\u{03B9}');
    m.insert("kappa", '\u{03BA}');
    m.insert("lambda", '\u{03BB}');
    m.insert("mu", '\u{03BC}');
    m.insert("nu", '\u{03BD}');
    m.insert("xi", '\u{03BE}');
    m.insert("omicron", '\u{03BF}');
    m.insert("pi", '\u{03C0}');
    m.insert("rho", '\u{03C1}');
    m.insert("sigmaf", '\u{03C2}');
    m.insert("sigma", '\u{03C3}');
    m.insert("tau", '\u{03C4}');
    m.insert("upsilon", '\u{03C5}');
    m.insert("phi", '\u{03C6}');
    m.insert("chi", '\u{03C7}');
    m.insert("psi", '\u{03C8}');
    m.insert("omega", '\u{03C9}');
    m.insert("thetasym", '\u{03D1}');
    m.insert("upsih", '\u{03D2}');
    m.insert("piv", '\u{03D6}');

    // Letterlike, arrows, math, shapes
    m.insert("weierp", '\u{2118}');
    m.insert("image", '\u{2111}');
    m.insert("real", '\u{211C}');
    m.insert("trade", '\u{2122}');
    m.insert("alefsym", '\u{2135}');
    m.insert("larr", '\u{2190}');
    m.insert("uarr", '\u{2191}');
    m.insert("rarr", '\u{2192}');
    m.insert("darr", '\u{2193}');
    m.insert("harr", '\u{2194}');
    m.insert("crarr", '\u{21B5}');
    m.insert("lArr", '\u{21D0}');
    m.insert("uArr", '\u{21D1}');
    m.insert("rArr", '\u{21D2}');
    m.insert("dArr", '\u{21D3}');
    m.insert("hArr", '\u{21D4}');
    m.insert("forall", '\u{2200}');
    m.insert("part", '\u{2202}');
    m.insert("exist", '\u{2203}');
    m.insert("empty", '\u{2205}');
    m.insert("nabla", '\u{2207}');
    m.insert("isin", '\u{2208}');
    m.insert("notin", '\u{2209}');
    m.insert("ni", '\u{220B}');
    m.insert("prod", '\u{220F}');
    m.insert("sum", '\u{2211}');
    m.insert("minus", '\u{2212}');
    m.insert("lowast", '\u{2217}');
    m.insert("radic", '\u{221A}');
    m.insert("prop", '\u{221D}');
    m.insert("infin", '\u{221E}');
    m.insert("ang", '\u{2220}');
    m.insert("and", '\u{2227}');
    m.insert("or", '\u{2228}');
    m.insert("cap", '\u{2229}');
    m.insert("cup", '\u{222A}');
    m.insert("int", '\u{222B}');
    m.insert("there4", '\u{2234}');
    m.insert("sim", '\u{223C}');
    m.insert("cong", '\u{2245}');
    m.insert("asymp", '\u{2248}');
    m.insert("ne", '\u{2260}');
    m.insert("equiv", '\u{2261}');
    m.insert("le", '\u{2264}');
    m.insert("ge", '\u{2265}');
    m.insert("sub", '\u{2282}');
    m.insert("sup", '\u{2283}');
    m.insert("nsub", '\u{2284}');
    m.insert("sube", '\u{2286}');
    m.insert("supe", '\u{2287}');
    m.insert("oplus", '\u{2295}');
    m.insert("otimes", '\u{2297}');
    m.insert("perp", '\u{22A5}');
    m.insert("sdot", '\u{22C5}');
    m.insert("lceil", '\u{2308}');
    m.insert("rceil", '\u{2309}');
    m.insert("lfloor", '\u{230A}');
    m.insert("rfloor", '\u{230B}');
    m.insert("lang", '\u{2329}');
    m.insert("rang", '\u{232A}');
    m.insert("loz", '\u{25CA}');
    m.insert("spades", '\u{2660}');
    m.insert("clubs", '\u{2663}');
    m.insert("hearts", '\u{2665}');
    m.insert("diams", '\u{2666}');

    m
});

/// Extended entities: recognised only with a terminating `;`.
static EXTENDED_ENTITIES: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // ASCII punctuation names
    m.insert("apos", '\u{0027}');
    m.insert("excl", '\u{0021}');
    m.insert("num", '\u{0023}');
    m.insert("dollar", '\u{0024}');
    m.insert("percnt", '\u{0025}');
    m.insert("lpar", '\u{0028}');
    m.insert("rpar", '\u{0029}');
    m.insert("ast", '\u{002A}');
    m.insert("plus", '\u{002B}');
    m.insert("comma", '\u{002C}');
    m.insert("period", '\u{002E}');
    m.insert("sol", '\u{002F}');
    m.insert("colon", '\u{003A}');
    m.insert("semi", '\u{003B}');
    m.insert("equals", '\u{003D}');
    m.insert("quest", '\u{003F}');
    m.insert("commat", '\u{0040}');
    m.insert("lbrack", '\u{005B}');
    m.insert("bsol", '\u{005C}');
    m.insert("rbrack", '\u{005D}');
    m.insert("Hat", '\u{005E}');
    m.insert("lowbar", '\u{005F}');
    m.insert("grave", '\u{0060}');
    m.insert("lbrace", '\u{007B}');
    m.insert("verbar", '\u{007C}');
    m.insert("rbrace", '\u{007D}');

    // Spacing and dashes
    m.insert("NonBreakingSpace", '\u{00A0}');
    m.insert("emsp13", '\u{2004}');
    m.insert("emsp14", '\u{2005}');
    m.insert("numsp", '\u{2007}');
    m.insert("puncsp", '\u{2008}');
    m.insert("hairsp", '\u{200A}');
    m.insert("hyphen", '\u{2010}');
    m.insert("dash", '\u{2010}');
    m.insert("horbar", '\u{2015}');

    // Symbols and shapes
    m.insert("mldr", '\u{2026}');
    m.insert("nldr", '\u{2025}');
    m.insert("planck", '\u{210F}');
    m.insert("check", '\u{2713}');
    m.insert("cross", '\u{2717}');
    m.insert("malt", '\u{2720}');
    m.insert("star", '\u{2606}');
    m.insert("starf", '\u{2605}');
    m.insert("phone", '\u{260E}');
    m.insert("female", '\u{2640}');
    m.insert("male", '\u{2642}');

    // Math
    m.insert("setminus", '\u{2216}');
    m.insert("compfn", '\u{2218}');
    m.insert("leq", '\u{2264}');
    m.insert("geq", '\u{2265}');
    m.insert("neq", '\u{2260}');
    m.insert("lnE", '\u{2268}');
    m.insert("gnE", '\u{2269}');
    m.insert("ll", '\u{226A}');
    m.insert("gg", '\u{226B}');
    m.insert("subset", '\u{2282}');
    m.insert("supset", '\u{2283}');
    m.insert("subseteq", '\u{2286}');
    m.insert("supseteq", '\u{2287}');
    m.insert("wedge", '\u{2227}');
    m.insert("vee", '\u{2228}');
    m.insert("emptyset", '\u{2205}');
    m.insert("therefore", '\u{2234}');
    m.insert("because", '\u{2235}');

    // Arrows
    m.insert("leftarrow", '\u{2190}');
    m.insert("rightarrow", '\u{2192}');
    m.insert("uparrow", '\u{2191}');
    m.insert("downarrow", '\u{2193}');
    m.insert("mapsto", '\u{21A6}');
    m.insert("Leftarrow", '\u{21D0}');
    m.insert("Rightarrow", '\u{21D2}');

    m
});

/// True if `name` (no `&`, no `;`) is a legacy entity: these resolve even
/// without a terminating semicolon.
#[must_use]
pub fn is_base_named_entity(name: &str) -> bool {
    BASE_ENTITIES.contains_key(name)
}

/// True if `name` is any recognised entity (base or extended).
#[must_use]
pub fn is_named_entity(name: &str) -> bool {
    BASE_ENTITIES.contains_key(name) || EXTENDED_ENTITIES.contains_key(name)
}

/// The code point denoted by the named entity, if recognised.
#[must_use]
pub fn character_for_name(name: &str) -> Option<char> {
    BASE_ENTITIES
        .get(name)
        .or_else(|| EXTENDED_ENTITIES.get(name))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_entities_resolve() {
        assert_eq!(character_for_name("amp"), Some('&'));
        assert_eq!(character_for_name("lt"), Some('<'));
        assert_eq!(character_for_name("gt"), Some('>'));
        assert_eq!(character_for_name("quot"), Some('"'));
        assert_eq!(character_for_name("nbsp"), Some('\u{00A0}'));
        assert_eq!(character_for_name("eacute"), Some('é'));
    }

    #[test]
    fn base_and_extended_are_distinguished() {
        assert!(is_base_named_entity("amp"));
        assert!(is_named_entity("amp"));
        assert!(!is_base_named_entity("apos"));
        assert!(is_named_entity("apos"));
        assert_eq!(character_for_name("apos"), Some('\''));
    }

    #[test]
    fn unknown_names_miss() {
        assert!(!is_named_entity("notarealentity"));
        assert!(!is_named_entity(""));
        assert_eq!(character_for_name("notarealentity"), None);
    }

    #[test]
    fn names_are_case_sensitive() {
        // &Agrave; and &agrave; denote different code points.
        assert_eq!(character_for_name("Agrave"), Some('\u{00C0}'));
        assert_eq!(character_for_name("agrave"), Some('\u{00E0}'));
        // &AMP is not a recognised spelling in this table.
        assert!(!is_named_entity("AMP"));
    }
}
