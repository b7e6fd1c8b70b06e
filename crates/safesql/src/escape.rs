//! Identifier and literal escaping for PostgreSQL.
//!
//! These are the only sanctioned paths from a caller-supplied string into raw
//! SQL text. They are total: every input, including the empty string, has an
//! escaped form.
//!
//! - Bare identifiers must match `[a-z_][a-z0-9_$]*` and not be a reserved
//!   keyword; anything else is double-quoted with `"` doubled.
//! - String literals are single-quoted with `'` doubled. A value containing a
//!   backslash switches to the `E'...'` form with each backslash doubled.
//! - Byte literals use the bytea hex form `'\x0A1B'`.
//!
//! # Example
//! ```ignore
//! use safesql::escape::{escape_identifier, escape_string_literal};
//!
//! assert_eq!(escape_identifier("users"), "users");
//! assert_eq!(escape_identifier("UserTable"), r#""UserTable""#);
//! assert_eq!(escape_string_literal("it's"), "'it''s'");
//! ```

use std::borrow::Cow;

/// PostgreSQL keywords that cannot be used as bare column or table names.
///
/// Covers both the "reserved" and "reserved (can be function or type)"
/// classes. Kept sorted for binary search.
const RESERVED_KEYWORDS: &[&str] = &[
    "all",
    "analyse",
    "analyze",
    "and",
    "any",
    "array",
    "as",
    "asc",
    "asymmetric",
    "authorization",
    "binary",
    "both",
    "case",
    "cast",
    "check",
    "collate",
    "collation",
    "column",
    "concurrently",
    "constraint",
    "create",
    "cross",
    "current_catalog",
    "current_date",
    "current_role",
    "current_schema",
    "current_time",
    "current_timestamp",
    "current_user",
    "default",
    "deferrable",
    "desc",
    "distinct",
    "do",
    "else",
    "end",
    "except",
    "false",
    "fetch",
    "for",
    "foreign",
    "freeze",
    "from",
    "full",
    "grant",
    "group",
    "having",
    "ilike",
    "in",
    "initially",
    "inner",
    "intersect",
    "into",
    "is",
    "isnull",
    "join",
    "lateral",
    "leading",
    "left",
    "like",
    "limit",
    "localtime",
    "localtimestamp",
    "natural",
    "not",
    "notnull",
    "null",
    "offset",
    "on",
    "only",
    "or",
    "order",
    "outer",
    "overlaps",
    "placing",
    "primary",
    "references",
    "returning",
    "right",
    "select",
    "session_user",
    "similar",
    "some",
    "symmetric",
    "system_user",
    "table",
    "tablesample",
    "then",
    "to",
    "trailing",
    "true",
    "union",
    "unique",
    "user",
    "using",
    "variadic",
    "verbose",
    "when",
    "where",
    "window",
    "with",
];

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Whether `name` is a reserved keyword (compared case-insensitively).
pub fn is_reserved_keyword(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED_KEYWORDS.binary_search(&lower.as_str()).is_ok()
}

fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '_' || first.is_ascii_lowercase()) {
        return false;
    }
    if !chars.all(|c| c == '_' || c == '$' || c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return false;
    }
    !is_reserved_keyword(name)
}

/// Escape a single identifier part, quoting it only when required.
pub fn escape_identifier(name: &str) -> Cow<'_, str> {
    if is_bare_identifier(name) {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len() + 2);
    write_quoted_identifier(&mut out, name);
    Cow::Owned(out)
}

pub(crate) fn write_identifier(out: &mut String, name: &str) {
    if is_bare_identifier(name) {
        out.push_str(name);
    } else {
        write_quoted_identifier(out, name);
    }
}

fn write_quoted_identifier(out: &mut String, name: &str) {
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Escape a string as a single-quoted SQL literal.
pub fn escape_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 3);
    write_string_literal(&mut out, value);
    out
}

pub(crate) fn write_string_literal(out: &mut String, value: &str) {
    if value.contains('\\') {
        out.push('E');
    }
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

/// Escape bytes as a bytea hex literal: `'\x` + uppercase hex pairs + `'`.
pub fn escape_bytes_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 4);
    write_bytes_literal(&mut out, bytes);
    out
}

pub(crate) fn write_bytes_literal(out: &mut String, bytes: &[u8]) {
    out.push_str("'\\x");
    for b in bytes {
        out.push(HEX_DIGITS[(b >> 4) as usize] as char);
        out.push(HEX_DIGITS[(b & 0x0F) as usize] as char);
    }
    out.push('\'');
}
