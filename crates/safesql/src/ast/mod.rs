//! Expression and condition AST.
//!
//! [`Operand`] is the closed set of expression nodes; [`Condition`] is the
//! boolean layer on top of it. Both render through [`SqlNode`], so nesting
//! any depth of expressions keeps placeholders and parameters aligned.
//!
//! # Example
//! ```ignore
//! use safesql::ast::{Column, Compute, Condition, Value};
//!
//! let cond = Condition::gt(
//!     Compute::add(Column::new("price"), Column::new("tax")),
//!     Value::new(100_i32),
//! );
//! // (price + tax) > ?
//! ```

mod condition;
mod operand;

#[cfg(test)]
mod tests;

pub use condition::{BooleanOperator, Condition, RelationalOperator};
pub use operand::{
    ArithmeticOperator, Call, Cast, Column, Compute, Constant, Operand, Tuple, Value, Values,
};
