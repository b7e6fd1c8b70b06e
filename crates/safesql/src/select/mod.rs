//! SELECT statement assembly.
//!
//! [`SelectQuery`] collects clauses in any order and renders them in SQL
//! order:
//!
//! ```text
//! [WITH [RECURSIVE] cte, ...] SELECT [DISTINCT] list|*
//! [FROM a, b] [WHERE ..] [GROUP BY ..] [HAVING ..] [ORDER BY ..]
//! [LIMIT n] [OFFSET n]
//! ```
//!
//! Absent clauses write nothing, not even their keyword.
//!
//! # Example
//! ```ignore
//! use safesql::ast::{Column, Condition, Value};
//! use safesql::SelectQuery;
//!
//! let mut q = SelectQuery::new();
//! q.select(Column::new("id"));
//! q.from("table_name");
//! q.filter(Condition::eq(Column::new("name"), Value::new("Lucie")));
//!
//! let sql = q.build();
//! assert_eq!(sql.as_sql(), "SELECT id FROM table_name WHERE name = ?");
//! ```


use crate::alias::{Alias, AliasGenerator};
use crate::ast::{Condition, Operand};
use crate::cte::CommonTableExpression;
use crate::jointure::{Jointure, Source};
use crate::sql::{SafeSql, SafeSqlBuilder, SqlNode};
use crate::trace;

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn keyword(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
struct SelectItem {
    operand: Operand,
    alias: Option<String>,
}

impl SqlNode for SelectItem {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        self.operand.append_to(builder);
        if let Some(alias) = &self.alias {
            builder.append_text(" AS ").identifier(alias);
        }
    }
}

#[derive(Debug, Clone)]
struct OrderItem {
    operand: Operand,
    order: Order,
}

impl SqlNode for OrderItem {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        self.operand.append_to(builder);
        builder.append_char(' ').append_text(self.order.keyword());
    }
}

/// A SELECT statement under construction.
///
/// Each statement owns its own [`AliasGenerator`], so aliases handed out by
/// [`generate`](Self::generate) never collide within the statement.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    aliases: AliasGenerator,
    ctes: Vec<CommonTableExpression>,
    recursive: bool,
    distinct: bool,
    columns: Vec<SelectItem>,
    from: Vec<Jointure>,
    filter: Option<Condition>,
    group_by: Vec<Operand>,
    having: Option<Condition>,
    order_by: Vec<OrderItem>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a statement-unique alias for `base`.
    pub fn generate(&mut self, base: &str) -> Alias {
        self.aliases.generate(base)
    }

    // ==================== Select list ====================

    /// Add an expression to the select list.
    pub fn select(&mut self, operand: impl Into<Operand>) -> &mut Self {
        self.columns.push(SelectItem {
            operand: operand.into(),
            alias: None,
        });
        self
    }

    /// Add `operand AS name` to the select list.
    pub fn select_as(&mut self, operand: impl Into<Operand>, name: impl Into<String>) -> &mut Self {
        self.columns.push(SelectItem {
            operand: operand.into(),
            alias: Some(name.into()),
        });
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    // ==================== FROM ====================

    /// Add a FROM entry and return its join tree for chaining joins.
    ///
    /// Several entries render as a comma-separated list.
    pub fn from(&mut self, source: impl Into<Source>) -> &mut Jointure {
        self.from_jointure(Jointure::new(source))
    }

    /// Add a prebuilt join tree as a FROM entry.
    pub fn from_jointure(&mut self, jointure: Jointure) -> &mut Jointure {
        self.from.push(jointure);
        let index = self.from.len() - 1;
        &mut self.from[index]
    }

    // ==================== Predicates ====================

    /// AND `condition` into the WHERE clause.
    pub fn filter(&mut self, condition: Condition) -> &mut Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// AND `condition` into the HAVING clause.
    pub fn having(&mut self, condition: Condition) -> &mut Self {
        self.having = Some(match self.having.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    // ==================== Grouping / ordering ====================

    pub fn group_by(&mut self, operand: impl Into<Operand>) -> &mut Self {
        self.group_by.push(operand.into());
        self
    }

    pub fn order_by(&mut self, operand: impl Into<Operand>, order: Order) -> &mut Self {
        self.order_by.push(OrderItem {
            operand: operand.into(),
            order,
        });
        self
    }

    /// `LIMIT n`, written as a literal.
    pub fn limit(&mut self, n: u64) -> &mut Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(&mut self, n: u64) -> &mut Self {
        self.offset = Some(n);
        self
    }

    // ==================== WITH ====================

    /// Add a common table expression to the WITH clause.
    pub fn with(&mut self, cte: CommonTableExpression) -> &mut Self {
        self.ctes.push(cte);
        self
    }

    /// Force `WITH RECURSIVE`.
    ///
    /// Implied when any added CTE has a recursive term.
    pub fn recursive(&mut self) -> &mut Self {
        self.recursive = true;
        self
    }

    // ==================== Build ====================

    /// Render into a fresh builder and finalize.
    pub fn build(&self) -> SafeSql {
        let mut builder = SafeSqlBuilder::new();
        self.append_to(&mut builder);
        let sql = builder.finalize();
        trace::statement_built("select", &sql);
        sql
    }

    fn is_recursive(&self) -> bool {
        self.recursive || self.ctes.iter().any(CommonTableExpression::is_recursive)
    }
}

impl SqlNode for SelectQuery {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        let with = if self.is_recursive() {
            "WITH RECURSIVE "
        } else {
            "WITH "
        };
        builder.join_wrapped(", ", with, " ", &self.ctes, |b, cte| {
            cte.append_to(b);
        });

        builder.append_text("SELECT ");
        if self.distinct {
            builder.append_text("DISTINCT ");
        }
        if self.columns.is_empty() {
            builder.append_char('*');
        } else {
            builder.join_nodes(", ", &self.columns);
        }

        builder.optional_clause(" FROM ", |b| {
            b.join_nodes(", ", &self.from);
        });
        builder.optional_clause(" WHERE ", |b| {
            if let Some(filter) = &self.filter {
                filter.append_to(b);
            }
        });
        builder.optional_clause(" GROUP BY ", |b| {
            b.join_nodes(", ", &self.group_by);
        });
        builder.optional_clause(" HAVING ", |b| {
            if let Some(having) = &self.having {
                having.append_to(b);
            }
        });
        builder.optional_clause(" ORDER BY ", |b| {
            b.join_nodes(", ", &self.order_by);
        });

        if let Some(limit) = self.limit {
            builder.append_text(" LIMIT ").append_uint(limit);
        }
        if let Some(offset) = self.offset {
            builder.append_text(" OFFSET ").append_uint(offset);
        }
    }

    fn to_safe_sql(&self) -> SafeSql {
        self.build()
    }
}

impl From<&SelectQuery> for Operand {
    fn from(query: &SelectQuery) -> Self {
        Operand::Subquery(query.build())
    }
}

impl From<SelectQuery> for Operand {
    fn from(query: SelectQuery) -> Self {
        Operand::Subquery(query.build())
    }
}
