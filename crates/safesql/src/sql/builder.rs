use crate::escape;
use crate::param::Param;
use crate::trace;
use tokio_postgres::types::ToSql;

use super::{SafeSql, SqlNode};

const DEFAULT_SEPARATOR: &str = ", ";

/// A saved position in a builder's text and parameter buffers.
///
/// Obtained from [`SafeSqlBuilder::checkpoint`] and consumed by
/// [`SafeSqlBuilder::rollback`] or [`SafeSqlBuilder::append_since`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    sql_len: usize,
    param_count: usize,
}

/// An append-only SQL text + parameter accumulator.
///
/// Raw text goes in through `append_*` (never escaped), caller data through
/// [`bind`](Self::bind) (as a `?` placeholder plus a parameter), names and
/// literals through the escaping helpers. Every method returns `&mut Self`
/// so calls chain.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct SafeSqlBuilder {
    sql: String,
    params: Vec<Param>,
    placeholders: Vec<usize>,
}

impl SafeSqlBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder seeded with a finalized fragment.
    pub fn with_sql(initial: &SafeSql) -> Self {
        let mut builder = Self::new();
        builder.append_sql(initial);
        builder
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty() && self.params.is_empty()
    }

    /// Current text length in bytes.
    pub fn len(&self) -> usize {
        self.sql.len()
    }

    // ==================== Raw syntax ====================

    /// Append raw SQL syntax (no escaping, no parameters).
    pub fn append_text(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append one raw character.
    pub fn append_char(&mut self, ch: char) -> &mut Self {
        self.sql.push(ch);
        self
    }

    /// Append an integer as a numeric literal.
    pub fn append_int(&mut self, n: i64) -> &mut Self {
        use std::fmt::Write;
        let _ = write!(&mut self.sql, "{n}");
        self
    }

    /// Append an unsigned integer as a numeric literal.
    pub fn append_uint(&mut self, n: u64) -> &mut Self {
        use std::fmt::Write;
        let _ = write!(&mut self.sql, "{n}");
        self
    }

    // ==================== Parameters ====================

    /// Append a `?` placeholder and bind its value.
    pub fn bind<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.bind_param(Param::new(value))
    }

    /// Append a `?` placeholder for an already wrapped [`Param`].
    pub fn bind_param(&mut self, param: Param) -> &mut Self {
        self.placeholders.push(self.sql.len());
        self.sql.push('?');
        self.params.push(param);
        self
    }

    /// Bind every value, separated by `", "`.
    pub fn bind_many<T>(&mut self, values: impl IntoIterator<Item = T>) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        self.bind_many_with(DEFAULT_SEPARATOR, values)
    }

    /// Bind every value, separated by `delimiter`.
    pub fn bind_many_with<T>(
        &mut self,
        delimiter: &str,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        for (i, value) in values.into_iter().enumerate() {
            if i > 0 {
                self.sql.push_str(delimiter);
            }
            self.bind(value);
        }
        self
    }

    // ==================== Fragments ====================

    /// Splice a finalized fragment: its text verbatim, then its parameters.
    pub fn append_sql(&mut self, other: &SafeSql) -> &mut Self {
        let base = self.sql.len();
        self.sql.push_str(&other.sql);
        self.params.extend(other.params.iter().cloned());
        self.placeholders
            .extend(other.placeholders.iter().map(|offset| base + offset));
        self
    }

    /// Let `node` render itself into this builder.
    pub fn append_node<N: SqlNode + ?Sized>(&mut self, node: &N) -> &mut Self {
        node.append_to(self);
        self
    }

    /// Splice whatever `other` wrote after `checkpoint`.
    pub fn append_since(&mut self, other: &SafeSqlBuilder, checkpoint: Checkpoint) -> &mut Self {
        other.assert_reachable(checkpoint);
        let base = self.sql.len();
        self.sql.push_str(&other.sql[checkpoint.sql_len..]);
        self.params
            .extend(other.params[checkpoint.param_count..].iter().cloned());
        self.placeholders.extend(
            other.placeholders[checkpoint.param_count..]
                .iter()
                .map(|offset| base + (offset - checkpoint.sql_len)),
        );
        self
    }

    // ==================== Escaping ====================

    /// Append an escaped string literal (not a parameter).
    pub fn literal_string(&mut self, value: &str) -> &mut Self {
        escape::write_string_literal(&mut self.sql, value);
        self
    }

    /// Append an escaped bytea hex literal (not a parameter).
    pub fn literal_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        escape::write_bytes_literal(&mut self.sql, bytes);
        self
    }

    /// Append an identifier, quoting it only when required.
    pub fn identifier(&mut self, name: &str) -> &mut Self {
        escape::write_identifier(&mut self.sql, name);
        self
    }

    /// Append `container.name`, or just `name` when there is no container.
    pub fn qualified_identifier(&mut self, container: Option<&str>, name: &str) -> &mut Self {
        if let Some(container) = container {
            escape::write_identifier(&mut self.sql, container);
            self.sql.push('.');
        }
        escape::write_identifier(&mut self.sql, name);
        self
    }

    // ==================== Joining ====================

    /// Render each item separated by `delimiter`.
    ///
    /// Writes nothing when `items` is empty.
    pub fn join<I, F>(&mut self, delimiter: &str, items: I, render: F) -> &mut Self
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item),
    {
        self.join_wrapped(delimiter, "", "", items, render)
    }

    /// Like [`join`](Self::join), framed by `prefix` and `suffix`.
    ///
    /// Writes nothing at all, not even the prefix and suffix, when `items`
    /// is empty.
    pub fn join_wrapped<I, F>(
        &mut self,
        delimiter: &str,
        prefix: &str,
        suffix: &str,
        items: I,
        mut render: F,
    ) -> &mut Self
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item),
    {
        let mut iter = items.into_iter();
        let Some(first) = iter.next() else {
            return self;
        };
        self.sql.push_str(prefix);
        render(self, first);
        for item in iter {
            self.sql.push_str(delimiter);
            render(self, item);
        }
        self.sql.push_str(suffix);
        self
    }

    /// Join renderable nodes with `delimiter`.
    pub fn join_nodes<'a, N, I>(&mut self, delimiter: &str, nodes: I) -> &mut Self
    where
        N: SqlNode + 'a,
        I: IntoIterator<Item = &'a N>,
    {
        self.join(delimiter, nodes, |b, node| {
            node.append_to(b);
        })
    }

    /// Join escaped identifiers with `delimiter`.
    pub fn join_identifiers<S: AsRef<str>>(
        &mut self,
        delimiter: &str,
        names: impl IntoIterator<Item = S>,
    ) -> &mut Self {
        self.join(delimiter, names, |b, name| {
            b.identifier(name.as_ref());
        })
    }

    // ==================== Checkpoints ====================

    /// Capture the current text length and parameter count.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            sql_len: self.sql.len(),
            param_count: self.params.len(),
        }
    }

    /// Truncate text and parameters back to `checkpoint`.
    ///
    /// # Panics
    /// If `checkpoint` lies beyond the current buffers (it was taken on a
    /// different builder, or after a previous rollback to an earlier point).
    pub fn rollback(&mut self, checkpoint: Checkpoint) -> &mut Self {
        self.assert_reachable(checkpoint);
        self.sql.truncate(checkpoint.sql_len);
        self.params.truncate(checkpoint.param_count);
        self.placeholders.truncate(checkpoint.param_count);
        self
    }

    /// Whether anything was written since `checkpoint`.
    pub fn wrote_since(&self, checkpoint: Checkpoint) -> bool {
        self.sql.len() != checkpoint.sql_len || self.params.len() != checkpoint.param_count
    }

    /// Write `keyword`, then the clause body; drop both if the body wrote nothing.
    ///
    /// ```ignore
    /// b.optional_clause(" WHERE ", |b| {
    ///     condition.append_to(b);
    /// });
    /// ```
    pub fn optional_clause<F>(&mut self, keyword: &str, render: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let before = self.checkpoint();
        self.sql.push_str(keyword);
        let body = self.checkpoint();
        render(self);
        if !self.wrote_since(body) {
            self.rollback(before);
        }
        self
    }

    fn assert_reachable(&self, checkpoint: Checkpoint) {
        assert!(
            checkpoint.sql_len <= self.sql.len() && checkpoint.param_count <= self.params.len(),
            "checkpoint ({}, {}) is ahead of builder ({}, {})",
            checkpoint.sql_len,
            checkpoint.param_count,
            self.sql.len(),
            self.params.len(),
        );
    }

    // ==================== Finalize ====================

    /// Snapshot the buffers into an immutable [`SafeSql`].
    ///
    /// The builder stays usable afterwards.
    pub fn finalize(&self) -> SafeSql {
        debug_assert_eq!(self.placeholders.len(), self.params.len());
        let sql = SafeSql {
            sql: self.sql.clone(),
            params: self.params.clone(),
            placeholders: self.placeholders.clone(),
        };
        trace::finalized(&sql);
        sql
    }
}
