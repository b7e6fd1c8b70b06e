use crate::alias::Alias;
use crate::error::{SqlError, SqlResult};
use crate::param::Param;
use crate::sql::{SafeSql, SafeSqlBuilder, SqlNode};
use tokio_postgres::types::ToSql;

use super::Condition;

/// An expression node.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Column reference, optionally qualified by an alias.
    Column(Column),
    /// Raw SQL text the caller attests is safe.
    Constant(Constant),
    /// Bound parameter.
    Value(Value),
    /// Row constructor with at least two members: `(a, b)`.
    Tuple(Tuple),
    /// Parenthesized list, possibly empty: `(a, b, c)` / `()`.
    Values(Values),
    /// Function call: `name(args)`.
    Call(Call),
    /// Type cast: `operand::type`.
    Cast(Cast),
    /// Binary arithmetic, always parenthesized.
    Compute(Compute),
    /// Boolean expression used as a value, always parenthesized.
    Condition(Box<Condition>),
    /// Finalized subquery, parenthesized.
    Subquery(SafeSql),
}

impl SqlNode for Operand {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        match self {
            Operand::Column(column) => column.append_to(builder),
            Operand::Constant(constant) => constant.append_to(builder),
            Operand::Value(value) => value.append_to(builder),
            Operand::Tuple(tuple) => tuple.append_to(builder),
            Operand::Values(values) => values.append_to(builder),
            Operand::Call(call) => call.append_to(builder),
            Operand::Cast(cast) => cast.append_to(builder),
            Operand::Compute(compute) => compute.append_to(builder),
            Operand::Condition(condition) => {
                if !condition.is_empty() {
                    builder.append_char('(');
                    condition.append_to(builder);
                    builder.append_char(')');
                }
            }
            Operand::Subquery(sql) => {
                builder.append_char('(').append_sql(sql).append_char(')');
            }
        }
    }
}

// ==================== Column ====================

/// A column reference: `name` or `alias.name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    alias: Option<Alias>,
    name: String,
}

impl Column {
    /// Unqualified column.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            alias: None,
            name: name.into(),
        }
    }

    /// Column qualified by a table alias.
    pub fn of(alias: &Alias, name: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.clone()),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&Alias> {
        self.alias.as_ref()
    }
}

impl SqlNode for Column {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.qualified_identifier(self.alias.as_ref().map(Alias::name), &self.name);
    }
}

// ==================== Constant ====================

/// Raw SQL syntax (numbers, keywords, function names). Never escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant(String);

impl Constant {
    /// Wrap raw SQL text. The caller is responsible for its safety.
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// An integer literal.
    pub fn int(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl SqlNode for Constant {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.append_text(&self.0);
    }
}

// ==================== Value ====================

/// A bound parameter.
#[derive(Debug, Clone)]
pub struct Value(Param);

impl Value {
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Self(Param::new(value))
    }

    pub fn param(&self) -> &Param {
        &self.0
    }
}

impl From<Param> for Value {
    fn from(param: Param) -> Self {
        Self(param)
    }
}

impl SqlNode for Value {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.bind_param(self.0.clone());
    }
}

// ==================== Tuple / Values ====================

/// A row constructor of at least two operands.
#[derive(Debug, Clone)]
pub struct Tuple(Vec<Operand>);

impl Tuple {
    /// Two-member tuple; extend with [`with`](Self::with).
    pub fn new(first: impl Into<Operand>, second: impl Into<Operand>) -> Self {
        Self(vec![first.into(), second.into()])
    }

    /// Append another member.
    pub fn with(mut self, operand: impl Into<Operand>) -> Self {
        self.0.push(operand.into());
        self
    }

    /// Append another member in place.
    pub fn push(&mut self, operand: impl Into<Operand>) {
        self.0.push(operand.into());
    }

    /// Build from any number of operands; fewer than two is rejected.
    pub fn try_from_iter<I, O>(operands: I) -> SqlResult<Self>
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        let operands: Vec<Operand> = operands.into_iter().map(Into::into).collect();
        if operands.len() < 2 {
            return Err(SqlError::validation(format!(
                "Tuple requires at least 2 operands, got {}",
                operands.len()
            )));
        }
        Ok(Self(operands))
    }
}

impl SqlNode for Tuple {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.append_char('(');
        builder.join_nodes(", ", &self.0);
        builder.append_char(')');
    }
}

/// A parenthesized operand list; `()` when empty.
///
/// Unlike an optional clause, an empty list still renders its parentheses:
/// it is part of the surrounding syntax (`IN ()`), not something to drop.
#[derive(Debug, Clone, Default)]
pub struct Values(Vec<Operand>);

impl Values {
    pub fn new<I, O>(operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        Self(operands.into_iter().map(Into::into).collect())
    }

    /// One bound parameter per value.
    pub fn bind_all<T, I>(values: I) -> Self
    where
        T: ToSql + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        Self(values.into_iter().map(|v| Operand::Value(Value::new(v))).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SqlNode for Values {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.append_char('(');
        builder.join_nodes(", ", &self.0);
        builder.append_char(')');
    }
}

// ==================== Call / Cast ====================

/// A function call. The name is raw SQL.
#[derive(Debug, Clone)]
pub struct Call {
    name: String,
    args: Vec<Operand>,
}

impl Call {
    /// A call with no arguments yet: `name()`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A call with the given arguments.
    pub fn with_args<I, O>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, operand: impl Into<Operand>) -> Self {
        self.args.push(operand.into());
        self
    }
}

impl SqlNode for Call {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.append_text(&self.name).append_char('(');
        builder.join_nodes(", ", &self.args);
        builder.append_char(')');
    }
}

/// `operand::type_name`. The type name is raw SQL.
#[derive(Debug, Clone)]
pub struct Cast {
    operand: Box<Operand>,
    type_name: String,
}

impl Cast {
    pub fn new(operand: impl Into<Operand>, type_name: impl Into<String>) -> Self {
        Self {
            operand: Box::new(operand.into()),
            type_name: type_name.into(),
        }
    }
}

impl SqlNode for Cast {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        self.operand.append_to(builder);
        builder.append_text("::").append_text(&self.type_name);
    }
}

// ==================== Compute ====================

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Concat,
}

impl ArithmeticOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Modulo => "%",
            ArithmeticOperator::Concat => "||",
        }
    }
}

/// `(left op right)`.
#[derive(Debug, Clone)]
pub struct Compute {
    op: ArithmeticOperator,
    left: Box<Operand>,
    right: Box<Operand>,
}

impl Compute {
    pub fn new(op: ArithmeticOperator, left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self {
            op,
            left: Box::new(left.into()),
            right: Box::new(right.into()),
        }
    }

    pub fn add(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::new(ArithmeticOperator::Add, left, right)
    }

    pub fn subtract(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::new(ArithmeticOperator::Subtract, left, right)
    }

    pub fn multiply(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::new(ArithmeticOperator::Multiply, left, right)
    }

    pub fn divide(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::new(ArithmeticOperator::Divide, left, right)
    }

    pub fn modulo(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::new(ArithmeticOperator::Modulo, left, right)
    }

    pub fn concat(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::new(ArithmeticOperator::Concat, left, right)
    }
}

impl SqlNode for Compute {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        builder.append_char('(');
        self.left.append_to(builder);
        builder
            .append_char(' ')
            .append_text(self.op.symbol())
            .append_char(' ');
        self.right.append_to(builder);
        builder.append_char(')');
    }
}

// ==================== Conversions ====================

macro_rules! impl_into_operand {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(node: $ty) -> Self {
                    Operand::$ty(node)
                }
            }
        )*
    };
}

impl_into_operand!(Column, Constant, Value, Tuple, Values, Call, Cast, Compute);

impl From<Condition> for Operand {
    fn from(condition: Condition) -> Self {
        Operand::Condition(Box::new(condition))
    }
}

impl From<SafeSql> for Operand {
    fn from(sql: SafeSql) -> Self {
        Operand::Subquery(sql)
    }
}
