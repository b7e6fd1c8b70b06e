use crate::param::Param;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_postgres::types::ToSql;

use super::SafeSqlBuilder;

/// How placeholder markers are written when a [`SafeSql`] is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?` for every parameter (JDBC/ODBC style).
    #[default]
    Question,
    /// `$1, $2, ...` (PostgreSQL wire protocol, `tokio-postgres`).
    Numbered,
}

/// A finalized, immutable `(text, parameters)` pair.
///
/// The text carries one `?` marker per parameter, in order. The byte offset of
/// every marker is recorded at bind time, so the text can be re-rendered with
/// numbered placeholders without scanning it for `?` characters (which may
/// legitimately appear inside literals or as the jsonb `?` operator).
#[derive(Debug, Clone, Default)]
pub struct SafeSql {
    pub(crate) sql: String,
    pub(crate) params: Vec<Param>,
    pub(crate) placeholders: Vec<usize>,
}

impl SafeSql {
    /// An empty fragment: no text, no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A parameterless fragment from SQL text the caller attests is safe.
    pub fn constant(sql: &str) -> Self {
        let mut builder = SafeSqlBuilder::new();
        builder.append_text(sql);
        builder.finalize()
    }

    /// The SQL text with `?` placeholder markers.
    pub fn as_sql(&self) -> &str {
        &self.sql
    }

    /// The bound parameters, in placeholder order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(Param::as_to_sql).collect()
    }

    /// Number of placeholder markers in the text (always `params().len()`).
    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    /// Whether there is neither text nor parameters.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty() && self.params.is_empty()
    }

    /// Render with the given placeholder style.
    pub fn render(&self, style: PlaceholderStyle) -> String {
        match style {
            PlaceholderStyle::Question => self.sql.clone(),
            PlaceholderStyle::Numbered => self.to_numbered_sql(),
        }
    }

    /// Render SQL with `$1, $2, ...` placeholders.
    pub fn to_numbered_sql(&self) -> String {
        #[inline]
        fn decimal_digits(n: usize) -> usize {
            if n < 10 {
                1
            } else if n < 100 {
                2
            } else if n < 1000 {
                3
            } else {
                (n.ilog10() as usize) + 1
            }
        }

        // Pre-size: each `?` becomes `$` plus the index digits.
        let mut cap = self.sql.len();
        for idx in 1..=self.placeholders.len() {
            cap += decimal_digits(idx);
        }

        let mut out = String::with_capacity(cap);
        let mut last = 0;
        for (i, &offset) in self.placeholders.iter().enumerate() {
            out.push_str(&self.sql[last..offset]);
            out.push('$');
            use std::fmt::Write;
            let _ = write!(&mut out, "{}", i + 1);
            last = offset + 1;
        }
        out.push_str(&self.sql[last..]);
        out
    }

    /// Split into owned text and parameters.
    pub fn into_parts(self) -> (String, Vec<Param>) {
        (self.sql, self.params)
    }
}

impl fmt::Display for SafeSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
