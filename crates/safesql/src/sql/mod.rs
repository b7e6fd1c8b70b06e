//! Injection-safe SQL accumulation.
//!
//! [`SafeSqlBuilder`] accumulates SQL text and bound parameters side by side;
//! [`SafeSql`] is the frozen `(text, parameters)` pair handed to an executor.
//! Caller-controlled data only enters the output through [`SafeSqlBuilder::bind`]
//! (as a parameter) or through the escaping helpers.
//!
//! # Example
//!
//! ```ignore
//! use safesql::SafeSqlBuilder;
//!
//! let mut b = SafeSqlBuilder::new();
//! b.append_text("SELECT id FROM ").identifier("users");
//! b.append_text(" WHERE status = ").bind("active");
//!
//! let sql = b.finalize();
//! assert_eq!(sql.as_sql(), "SELECT id FROM users WHERE status = ?");
//! assert_eq!(sql.to_numbered_sql(), "SELECT id FROM users WHERE status = $1");
//! ```

mod builder;
mod format;
mod safe_sql;


pub use builder::{Checkpoint, SafeSqlBuilder};
pub use format::FormatArg;
pub use safe_sql::{PlaceholderStyle, SafeSql};

/// A node that can render itself into a [`SafeSqlBuilder`].
///
/// Every AST node, join tree and statement implements this, as does
/// [`SafeSql`] itself (by splicing its text and parameters).
pub trait SqlNode {
    /// Write this node's SQL text and parameters into `builder`.
    fn append_to(&self, builder: &mut SafeSqlBuilder);

    /// Render this node alone into a fresh [`SafeSql`].
    fn to_safe_sql(&self) -> SafeSql {
        let mut builder = SafeSqlBuilder::new();
        self.append_to(&mut builder);
        builder.finalize()
    }
}

impl SqlNode for SafeSql {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.append_sql(self);
    }

    fn to_safe_sql(&self) -> SafeSql {
        self.clone()
    }
}

impl<T: SqlNode + ?Sized> SqlNode for &T {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        (**self).append_to(builder);
    }
}

impl<T: SqlNode + ?Sized> SqlNode for Box<T> {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        (**self).append_to(builder);
    }
}
