//! Common table expressions (`WITH` clause members).
//!
//! A [`CommonTableExpression`] renders `name[(col, ...)] AS (query)`. The
//! statement assembler joins them after `WITH` / `WITH RECURSIVE`.
//!
//! # Example
//! ```ignore
//! use safesql::{CommonTableExpression, SafeSqlBuilder};
//!
//! let mut inner = SafeSqlBuilder::new();
//! inner.append_text("SELECT id FROM users WHERE status = ").bind("active");
//!
//! let cte = CommonTableExpression::new("active_users", &inner.finalize());
//! // active_users AS (SELECT id FROM users WHERE status = ?)
//! ```

use crate::sql::{SafeSql, SafeSqlBuilder, SqlNode};

/// Recursive term of a CTE: `base UNION [ALL] recursive`.
#[derive(Debug, Clone)]
struct RecursiveTerm {
    query: SafeSql,
    union_all: bool,
}

/// A named subquery for a `WITH` clause.
#[derive(Debug, Clone)]
pub struct CommonTableExpression {
    name: String,
    columns: Vec<String>,
    query: SafeSql,
    recursive: Option<RecursiveTerm>,
}

impl CommonTableExpression {
    /// `name AS (query)`.
    pub fn new(name: impl Into<String>, query: &impl SqlNode) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            query: query.to_safe_sql(),
            recursive: None,
        }
    }

    /// `name(columns...) AS (query)`.
    pub fn with_columns<S: Into<String>>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = S>,
        query: &impl SqlNode,
    ) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            query: query.to_safe_sql(),
            recursive: None,
        }
    }

    /// Add a recursive term joined with `UNION ALL`.
    pub fn union_all(mut self, recursive: &impl SqlNode) -> Self {
        self.recursive = Some(RecursiveTerm {
            query: recursive.to_safe_sql(),
            union_all: true,
        });
        self
    }

    /// Add a recursive term joined with `UNION` (deduplicating).
    pub fn union(mut self, recursive: &impl SqlNode) -> Self {
        self.recursive = Some(RecursiveTerm {
            query: recursive.to_safe_sql(),
            union_all: false,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this CTE references itself (needs `WITH RECURSIVE`).
    pub fn is_recursive(&self) -> bool {
        self.recursive.is_some()
    }
}

impl SqlNode for CommonTableExpression {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.identifier(&self.name);
        builder.join_wrapped(", ", "(", ")", &self.columns, |b, column| {
            b.identifier(column);
        });
        builder.append_text(" AS (").append_sql(&self.query);
        if let Some(recursive) = &self.recursive {
            builder.append_text(if recursive.union_all {
                " UNION ALL "
            } else {
                " UNION "
            });
            builder.append_sql(&recursive.query);
        }
        builder.append_char(')');
    }
}

#[cfg(test)]
mod tests {
    use super::CommonTableExpression;
    use crate::sql::{SafeSql, SafeSqlBuilder, SqlNode};

    fn query(text: &str) -> SafeSql {
        SafeSql::constant(text)
    }

    #[test]
    fn simple_cte() {
        let mut inner = SafeSqlBuilder::new();
        inner
            .append_text("SELECT id FROM users WHERE status = ")
            .bind("active");
        let cte = CommonTableExpression::new("active_users", &inner.finalize());

        let sql = cte.to_safe_sql();
        assert_eq!(
            sql.as_sql(),
            "active_users AS (SELECT id FROM users WHERE status = ?)"
        );
        assert_eq!(sql.params().len(), 1);
        assert_eq!(cte.name(), "active_users");
        assert!(!cte.is_recursive());
    }

    #[test]
    fn cte_with_columns() {
        let cte = CommonTableExpression::with_columns(
            "monthly_sales",
            ["month", "total"],
            &query("SELECT DATE_TRUNC('month', created_at), SUM(amount) FROM orders GROUP BY 1"),
        );
        assert_eq!(
            cte.to_safe_sql().as_sql(),
            "monthly_sales(month, total) AS (\
             SELECT DATE_TRUNC('month', created_at), SUM(amount) FROM orders GROUP BY 1)"
        );
    }

    #[test]
    fn cte_empty_column_list_is_omitted() {
        let cte = CommonTableExpression::with_columns("t", Vec::<String>::new(), &query("SELECT 1"));
        assert_eq!(cte.to_safe_sql().as_sql(), "t AS (SELECT 1)");
    }

    #[test]
    fn cte_escapes_names() {
        let cte = CommonTableExpression::with_columns("Stats", ["user"], &query("SELECT 1"));
        assert_eq!(cte.to_safe_sql().as_sql(), r#""Stats"("user") AS (SELECT 1)"#);
    }

    #[test]
    fn recursive_cte_with_params() {
        let mut base = SafeSqlBuilder::new();
        base.append_text("SELECT id, parent_id, 0 AS depth FROM categories WHERE id = ")
            .bind(1_i64);
        let mut step = SafeSqlBuilder::new();
        step.append_text(
            "SELECT c.id, c.parent_id, t.depth + 1 FROM categories c \
             JOIN category_tree t ON c.parent_id = t.id WHERE t.depth < ",
        )
        .bind(5_i32);

        let cte = CommonTableExpression::new("category_tree", &base.finalize())
            .union_all(&step.finalize());
        let sql = cte.to_safe_sql();

        assert!(cte.is_recursive());
        assert_eq!(
            sql.to_numbered_sql(),
            "category_tree AS (\
             SELECT id, parent_id, 0 AS depth FROM categories WHERE id = $1 \
             UNION ALL \
             SELECT c.id, c.parent_id, t.depth + 1 FROM categories c \
             JOIN category_tree t ON c.parent_id = t.id WHERE t.depth < $2)"
        );
        assert_eq!(sql.params().len(), 2);
    }

    #[test]
    fn recursive_cte_union_dedup() {
        let cte = CommonTableExpression::new("paths", &query("SELECT a FROM edges"))
            .union(&query("SELECT b FROM edges"));
        let sql = cte.to_safe_sql();
        assert!(sql.as_sql().contains(" UNION SELECT"));
        assert!(!sql.as_sql().contains("UNION ALL"));
    }
}
