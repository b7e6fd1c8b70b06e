//! Bound values carried next to SQL text.
//!
//! A [`Param`] is what a `?` marker stands for. Splicing a finalized
//! [`SafeSql`](crate::SafeSql) into another builder, or cloning an AST node
//! that holds a [`Value`](crate::ast::Value), copies the handle and leaves the
//! value itself shared.

use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// One bound value, shared between every fragment it was spliced into.
#[derive(Clone)]
pub struct Param {
    value: Arc<dyn ToSql + Send + Sync>,
}

impl Param {
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    /// The value in the form `tokio_postgres::Client::query` takes.
    pub fn as_to_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.value
    }

    /// Whether both handles point at the same bound value.
    pub fn shares_value(&self, other: &Param) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

/// Prints the bound value itself, so `"Lucie"` shows as `"Lucie"`.
impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.value, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Param;
    use crate::SafeSqlBuilder;

    #[test]
    fn debug_shows_value() {
        assert_eq!(format!("{:?}", Param::new("Lucie")), "\"Lucie\"");
        assert_eq!(format!("{:?}", Param::new(Some(4_i64))), "Some(4)");
    }

    #[test]
    fn splicing_shares_values() {
        let mut inner = SafeSqlBuilder::new();
        inner.bind(1_i32);
        let inner = inner.finalize();

        let mut outer = SafeSqlBuilder::new();
        outer.append_sql(&inner).append_text(" + ").append_sql(&inner);
        let outer = outer.finalize();

        assert!(outer.params()[0].shares_value(&inner.params()[0]));
        assert!(outer.params()[1].shares_value(&outer.params()[0]));
        assert!(!Param::new(1_i32).shares_value(&Param::new(1_i32)));
    }
}
