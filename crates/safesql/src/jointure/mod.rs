//! FROM-clause join trees.
//!
//! A [`Jointure`] is a root [`Source`] followed by joins. Each join pairs a
//! kind, a joined branch and an optional ON condition. The joined branch is
//! itself a `Jointure`; when it carries joins of its own it renders in
//! parentheses, which is how tree-shaped FROM clauses are expressed.
//!
//! # Example
//! ```ignore
//! use safesql::ast::{Column, Condition};
//! use safesql::Jointure;
//!
//! let mut from = Jointure::new("table_name");
//! from.left_join("other")
//!     .and(Condition::eq(Column::new("id"), Column::new("oid")))
//!     .inner_join("triple")
//!     .and(Condition::eq(Column::new("oid"), Column::new("tid")));
//! // table_name LEFT JOIN (other INNER JOIN triple ON oid = tid) ON id = oid
//! ```


use crate::alias::Alias;
use crate::ast::Condition;
use crate::error::{SqlError, SqlResult};
use crate::sql::{SafeSql, SafeSqlBuilder, SqlNode};

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// A table reference: `[schema.]name [alias]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Option<String>,
    name: String,
    alias: Option<Alias>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            alias: None,
        }
    }

    /// `schema.name`.
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
            alias: None,
        }
    }

    /// `name alias`.
    pub fn aliased(name: impl Into<String>, alias: &Alias) -> Self {
        Self::new(name).with_alias(alias)
    }

    pub fn with_alias(mut self, alias: &Alias) -> Self {
        self.alias = Some(alias.clone());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&Alias> {
        self.alias.as_ref()
    }
}

impl SqlNode for Table {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.qualified_identifier(self.schema.as_deref(), &self.name);
        if let Some(alias) = &self.alias {
            builder.append_char(' ').identifier(alias.name());
        }
    }
}

/// Something a FROM clause can read from.
#[derive(Debug, Clone)]
pub enum Source {
    Table(Table),
    /// `(subquery) alias`.
    Subquery { sql: SafeSql, alias: Alias },
    /// A nested join tree, parenthesized when it has joins.
    Join(Box<Jointure>),
}

impl Source {
    /// An aliased subquery source.
    pub fn subquery(query: &impl SqlNode, alias: &Alias) -> Self {
        Source::Subquery {
            sql: query.to_safe_sql(),
            alias: alias.clone(),
        }
    }
}

impl SqlNode for Source {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        match self {
            Source::Table(table) => table.append_to(builder),
            Source::Subquery { sql, alias } => {
                builder
                    .append_char('(')
                    .append_sql(sql)
                    .append_text(") ")
                    .identifier(alias.name());
            }
            Source::Join(jointure) => jointure.append_parenthesized(builder),
        }
    }
}

impl From<&str> for Source {
    fn from(name: &str) -> Self {
        Source::Table(Table::new(name))
    }
}

impl From<String> for Source {
    fn from(name: String) -> Self {
        Source::Table(Table::new(name))
    }
}

impl From<Table> for Source {
    fn from(table: Table) -> Self {
        Source::Table(table)
    }
}

impl From<Jointure> for Source {
    fn from(jointure: Jointure) -> Self {
        Source::Join(Box::new(jointure))
    }
}

/// One join entry.
#[derive(Debug, Clone)]
struct Join {
    kind: JoinKind,
    branch: Jointure,
    on: Option<Condition>,
}

impl Join {
    fn attach(&mut self, condition: Condition) -> SqlResult<()> {
        if self.kind == JoinKind::Cross {
            return Err(SqlError::validation("CROSS JOIN takes no ON condition"));
        }
        self.on = Some(match self.on.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        Ok(())
    }
}

impl SqlNode for Join {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder
            .append_char(' ')
            .append_text(self.kind.keyword())
            .append_char(' ');
        self.branch.append_parenthesized(builder);
        if self.kind == JoinKind::Cross {
            return;
        }
        builder.append_text(" ON ");
        match self.on.as_ref().filter(|on| !on.is_empty()) {
            Some(on) => on.append_to(builder),
            None => {
                builder.append_text("TRUE");
            }
        }
    }
}

/// A FROM-clause join tree.
#[derive(Debug, Clone)]
pub struct Jointure {
    source: Source,
    joins: Vec<Join>,
}

impl Jointure {
    /// A tree with only its root source.
    pub fn new(source: impl Into<Source>) -> Self {
        Self {
            source: source.into(),
            joins: Vec::new(),
        }
    }

    pub fn inner_join(&mut self, source: impl Into<Source>) -> JoinHandle<'_> {
        self.push(JoinKind::Inner, source.into())
    }

    pub fn left_join(&mut self, source: impl Into<Source>) -> JoinHandle<'_> {
        self.push(JoinKind::Left, source.into())
    }

    pub fn right_join(&mut self, source: impl Into<Source>) -> JoinHandle<'_> {
        self.push(JoinKind::Right, source.into())
    }

    pub fn full_join(&mut self, source: impl Into<Source>) -> JoinHandle<'_> {
        self.push(JoinKind::Full, source.into())
    }

    /// `CROSS JOIN source`; cross joins never carry an ON condition.
    pub fn cross_join(&mut self, source: impl Into<Source>) -> &mut Self {
        let _ = self.push(JoinKind::Cross, source.into());
        self
    }

    /// AND `condition` into the ON clause of the most recent join.
    ///
    /// Fails with [`SqlError::NoPendingJoin`] when nothing has been joined.
    pub fn and(&mut self, condition: Condition) -> SqlResult<&mut Self> {
        let join = self.joins.last_mut().ok_or(SqlError::NoPendingJoin)?;
        join.attach(condition)?;
        Ok(self)
    }

    /// Number of joins at this level.
    pub fn join_count(&self) -> usize {
        self.joins.len()
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    fn push(&mut self, kind: JoinKind, source: Source) -> JoinHandle<'_> {
        self.joins.push(Join {
            kind,
            branch: Jointure::new(source),
            on: None,
        });
        let index = self.joins.len() - 1;
        JoinHandle {
            join: &mut self.joins[index],
        }
    }

    fn append_parenthesized(&self, builder: &mut SafeSqlBuilder) {
        if self.joins.is_empty() {
            self.append_to(builder);
        } else {
            builder.append_char('(');
            self.append_to(builder);
            builder.append_char(')');
        }
    }
}

impl SqlNode for Jointure {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        self.source.append_to(builder);
        for join in &self.joins {
            join.append_to(builder);
        }
    }
}

/// Borrowed handle on a join just appended.
///
/// [`and`](Self::and) sets the join's ON condition. The handle's own join
/// methods extend the joined branch, turning it into a parenthesized
/// sub-join; call the join methods on the [`Jointure`] again for a flat
/// chain.
pub struct JoinHandle<'a> {
    join: &'a mut Join,
}

impl<'a> JoinHandle<'a> {
    /// AND `condition` into this join's ON clause.
    pub fn and(self, condition: Condition) -> Self {
        self.join.on = Some(match self.join.on.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    pub fn inner_join(self, source: impl Into<Source>) -> JoinHandle<'a> {
        let join = self.join;
        join.branch.push(JoinKind::Inner, source.into())
    }

    pub fn left_join(self, source: impl Into<Source>) -> JoinHandle<'a> {
        let join = self.join;
        join.branch.push(JoinKind::Left, source.into())
    }

    pub fn right_join(self, source: impl Into<Source>) -> JoinHandle<'a> {
        let join = self.join;
        join.branch.push(JoinKind::Right, source.into())
    }

    pub fn full_join(self, source: impl Into<Source>) -> JoinHandle<'a> {
        let join = self.join;
        join.branch.push(JoinKind::Full, source.into())
    }

    /// The kind of the join this handle points at.
    pub fn kind(&self) -> JoinKind {
        self.join.kind
    }
}
