//! Solr syntax helpers: escaping, literals, and variable-slot naming.
//!
//! This module is the only place that knows Solr's lexical rules; the
//! builders compose fragments out of these helpers.

/// Escape Solr query-syntax characters (and whitespace) with a backslash.
pub(crate) fn escape_query_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if is_reserved(ch) || ch.is_whitespace() {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

const fn is_reserved(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-'
            | '!'
            | '('
            | ')'
            | '{'
            | '}'
            | '['
            | ']'
            | '^'
            | '"'
            | '~'
            | '*'
            | '?'
            | ':'
            | '/'
            | '\\'
            | '&'
            | '|'
            | '='
            | '$'
    )
}

/// Serialize an embedding as a Solr vector literal.
///
/// Fixed six-fraction-digit decimal formatting; never scientific notation,
/// so the same vector always serializes to the same bytes.
pub(crate) fn format_vector_literal(vector: &[f32]) -> String {
    let mut literal = String::with_capacity(vector.len() * 10 + 2);
    literal.push('[');
    for (index, component) in vector.iter().enumerate() {
        if index > 0 {
            literal.push(',');
        }
        literal.push_str(&format!("{component:.6}"));
    }
    literal.push(']');
    literal
}

/// Wrap a fragment with the score-normalizing boost when `boost > 0`.
///
/// `scale(·,0,1)` maps scores into a shared range so keyword and vector
/// contributions stay comparable under multiplicative boosts.
pub(crate) fn wrap_boost(fragment: String, boost: f32) -> String {
    if boost > 0.0 {
        format!("scale({fragment},0,1)^{boost:.2}")
    } else {
        fragment
    }
}

/// Parameter slot for the keyword text of strategy `position` (1-based).
pub(crate) fn keyword_slot(position: usize) -> String {
    format!("keywordQuery_{position}")
}

/// Parameter slot for the vector literal of strategy `position` (1-based).
pub(crate) fn vector_slot(position: usize) -> String {
    format!("vectorQuery_{position}")
}

/// Parameter slot for the Nth pre-filter binding of a request (1-based).
pub(crate) fn pre_filter_slot(occurrence: usize) -> String {
    if occurrence <= 1 {
        "knnPreFilter".to_string()
    } else {
        format!("knnPreFilter_{occurrence}")
    }
}
