//! `tracing` events emitted while SQL is assembled.
//!
//! Enable via the crate feature: `safesql = { features = ["tracing"] }` (on by
//! default). Events use the `safesql.sql` target; bound values are never
//! logged, only their count.

use crate::sql::SafeSql;

/// SQL longer than this (in bytes) is cut at a char boundary in log events.
pub(crate) const MAX_LOGGED_SQL_LEN: usize = 200;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(feature = "tracing")]
pub(crate) fn finalized(sql: &SafeSql) {
    tracing::trace!(
        target: "safesql.sql",
        param_count = sql.params().len(),
        sql = %truncate_sql_bytes(sql.as_sql(), MAX_LOGGED_SQL_LEN),
        "finalized",
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn finalized(_sql: &SafeSql) {}

#[cfg(feature = "tracing")]
pub(crate) fn statement_built(kind: &'static str, sql: &SafeSql) {
    tracing::debug!(
        target: "safesql.sql",
        statement = kind,
        param_count = sql.params().len(),
        sql = %truncate_sql_bytes(sql.as_sql(), MAX_LOGGED_SQL_LEN),
        "statement built",
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn statement_built(_kind: &'static str, _sql: &SafeSql) {}

#[cfg(feature = "tracing")]
pub(crate) fn format_rejected(template: &str, err: &crate::error::SqlError) {
    tracing::debug!(
        target: "safesql.sql",
        template = %truncate_sql_bytes(template, MAX_LOGGED_SQL_LEN),
        error = %err,
        "format template rejected",
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn format_rejected(_template: &str, _err: &crate::error::SqlError) {}
