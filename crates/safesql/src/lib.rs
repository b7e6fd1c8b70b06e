//! # safesql
//!
//! Compositional, injection-safe SQL building for PostgreSQL.
//!
//! ## Features
//!
//! - **Values never touch SQL text**: caller data becomes a `?` placeholder
//!   plus a bound parameter, kept in order side by side
//! - **Escaping helpers**: identifiers and literals go through one audited path
//! - **Composable AST**: columns, values, calls, casts, arithmetic and
//!   conditions nest to any depth
//! - **Join trees**: linear chains and parenthesized sub-joins
//! - **Statement assembly**: absent clauses leave no dangling keywords
//!
//! ## Statement builder
//!
//! ```ignore
//! use safesql::ast::{Column, Condition, Value};
//! use safesql::{SelectQuery, Table};
//!
//! let mut q = SelectQuery::new();
//! let u = q.generate("u");
//! q.select(Column::of(&u, "id"));
//! q.from(Table::aliased("users", &u));
//! q.filter(Condition::in_list(
//!     Column::of(&u, "name"),
//!     [Value::new("Lucie"), Value::new("Clemence")],
//! ));
//!
//! let sql = q.build();
//! assert_eq!(sql.as_sql(), "SELECT u.id FROM users u WHERE u.name IN (?, ?)");
//!
//! // Hand to tokio-postgres:
//! // client.query(&sql.to_numbered_sql(), &sql.params_ref()).await?;
//! ```
//!
//! ## Low-level builder
//!
//! ```ignore
//! use safesql::SafeSqlBuilder;
//!
//! let mut b = SafeSqlBuilder::new();
//! b.append_text("SELECT * FROM ").identifier("Order");
//! b.optional_clause(" WHERE ", |b| {
//!     // nothing written: the keyword is rolled back too
//! });
//! assert_eq!(b.finalize().as_sql(), r#"SELECT * FROM "Order""#);
//! ```

pub mod alias;
pub mod ast;
pub mod cte;
pub mod error;
pub mod escape;
pub mod jointure;
pub mod param;
pub mod select;
pub mod sql;

mod trace;

pub use alias::{Alias, AliasGenerator};
pub use cte::CommonTableExpression;
pub use error::{SqlError, SqlResult};
pub use jointure::{JoinHandle, JoinKind, Jointure, Source, Table};
pub use param::Param;
pub use select::{Order, SelectQuery};
pub use sql::{Checkpoint, FormatArg, PlaceholderStyle, SafeSql, SafeSqlBuilder, SqlNode};
