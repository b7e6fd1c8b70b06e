use crate::sql::{SafeSql, SafeSqlBuilder, SqlNode};

use super::{Operand, Values};

/// Relational operators, each paired with its logical inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOperator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    ILike,
    NotILike,
    In,
    NotIn,
    IsDistinctFrom,
    IsNotDistinctFrom,
}

impl RelationalOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            RelationalOperator::Eq => "=",
            RelationalOperator::Ne => "<>",
            RelationalOperator::Lt => "<",
            RelationalOperator::Le => "<=",
            RelationalOperator::Gt => ">",
            RelationalOperator::Ge => ">=",
            RelationalOperator::Like => "LIKE",
            RelationalOperator::NotLike => "NOT LIKE",
            RelationalOperator::ILike => "ILIKE",
            RelationalOperator::NotILike => "NOT ILIKE",
            RelationalOperator::In => "IN",
            RelationalOperator::NotIn => "NOT IN",
            RelationalOperator::IsDistinctFrom => "IS DISTINCT FROM",
            RelationalOperator::IsNotDistinctFrom => "IS NOT DISTINCT FROM",
        }
    }

    /// The operator whose result is the logical inverse of this one.
    pub fn negate(self) -> Self {
        match self {
            RelationalOperator::Eq => RelationalOperator::Ne,
            RelationalOperator::Ne => RelationalOperator::Eq,
            RelationalOperator::Lt => RelationalOperator::Ge,
            RelationalOperator::Ge => RelationalOperator::Lt,
            RelationalOperator::Gt => RelationalOperator::Le,
            RelationalOperator::Le => RelationalOperator::Gt,
            RelationalOperator::Like => RelationalOperator::NotLike,
            RelationalOperator::NotLike => RelationalOperator::Like,
            RelationalOperator::ILike => RelationalOperator::NotILike,
            RelationalOperator::NotILike => RelationalOperator::ILike,
            RelationalOperator::In => RelationalOperator::NotIn,
            RelationalOperator::NotIn => RelationalOperator::In,
            RelationalOperator::IsDistinctFrom => RelationalOperator::IsNotDistinctFrom,
            RelationalOperator::IsNotDistinctFrom => RelationalOperator::IsDistinctFrom,
        }
    }

    fn takes_list(self) -> bool {
        matches!(self, RelationalOperator::In | RelationalOperator::NotIn)
    }
}

/// Boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOperator {
    And,
    Or,
}

impl BooleanOperator {
    fn delimiter(self) -> &'static str {
        match self {
            BooleanOperator::And => " AND ",
            BooleanOperator::Or => " OR ",
        }
    }

    fn flip(self) -> Self {
        match self {
            BooleanOperator::And => BooleanOperator::Or,
            BooleanOperator::Or => BooleanOperator::And,
        }
    }
}

#[derive(Debug, Clone)]
enum ConditionInner {
    /// `left op right`; for IN/NOT IN the right side is a value list or subquery.
    Relational {
        op: RelationalOperator,
        left: Operand,
        right: Operand,
    },
    Null {
        operand: Operand,
        negated: bool,
    },
    Group {
        op: BooleanOperator,
        members: Vec<Condition>,
    },
    /// Finalized fragment used as a predicate (escape hatch).
    Sql {
        sql: SafeSql,
        negated: bool,
    },
}

/// An immutable boolean expression.
///
/// Combinators and [`negate`](Self::negate) build new conditions; nothing is
/// modified in place.
///
/// # Example
/// ```ignore
/// use safesql::ast::{Column, Condition, Value};
///
/// let c = Condition::all([
///     Condition::eq(Column::new("status"), Value::new("active")),
///     Condition::any([
///         Condition::eq(Column::new("role"), Value::new("admin")),
///         Condition::gt(Column::new("reputation"), Value::new(100_i32)),
///     ]),
/// ]);
/// // status = ? AND (role = ? OR reputation > ?)
/// ```
#[derive(Debug, Clone)]
pub struct Condition(ConditionInner);

impl Condition {
    /// `left op right`.
    ///
    /// For `IN` / `NOT IN`, a right side that is neither a value list nor a
    /// subquery is wrapped into a one-element list.
    pub fn compare(
        op: RelationalOperator,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
    ) -> Self {
        let right = match right.into() {
            list @ (Operand::Values(_) | Operand::Subquery(_)) => list,
            other if op.takes_list() => Operand::Values(Values::new([other])),
            other => other,
        };
        Self(ConditionInner::Relational {
            op,
            left: left.into(),
            right,
        })
    }

    pub fn eq(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::Eq, left, right)
    }

    pub fn ne(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::Ne, left, right)
    }

    pub fn lt(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::Lt, left, right)
    }

    pub fn le(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::Le, left, right)
    }

    pub fn gt(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::Gt, left, right)
    }

    pub fn ge(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::Ge, left, right)
    }

    pub fn like(left: impl Into<Operand>, pattern: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::Like, left, pattern)
    }

    pub fn not_like(left: impl Into<Operand>, pattern: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::NotLike, left, pattern)
    }

    pub fn ilike(left: impl Into<Operand>, pattern: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::ILike, left, pattern)
    }

    pub fn not_ilike(left: impl Into<Operand>, pattern: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::NotILike, left, pattern)
    }

    pub fn is_distinct_from(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::IsDistinctFrom, left, right)
    }

    pub fn is_not_distinct_from(left: impl Into<Operand>, right: impl Into<Operand>) -> Self {
        Self::compare(RelationalOperator::IsNotDistinctFrom, left, right)
    }

    /// `left IN (elements...)`. An empty list renders `IN ()`.
    pub fn in_list<I, O>(left: impl Into<Operand>, elements: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        Self::compare(RelationalOperator::In, left, Values::new(elements))
    }

    /// `left NOT IN (elements...)`.
    pub fn not_in<I, O>(left: impl Into<Operand>, elements: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Operand>,
    {
        Self::compare(RelationalOperator::NotIn, left, Values::new(elements))
    }

    pub fn is_null(operand: impl Into<Operand>) -> Self {
        Self(ConditionInner::Null {
            operand: operand.into(),
            negated: false,
        })
    }

    pub fn is_not_null(operand: impl Into<Operand>) -> Self {
        Self(ConditionInner::Null {
            operand: operand.into(),
            negated: true,
        })
    }

    /// All conditions must hold. An empty set renders nothing.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self(ConditionInner::Group {
            op: BooleanOperator::And,
            members: conditions.into_iter().collect(),
        })
    }

    /// At least one condition must hold. An empty set renders nothing.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self(ConditionInner::Group {
            op: BooleanOperator::Or,
            members: conditions.into_iter().collect(),
        })
    }

    /// A finalized fragment used as a predicate.
    pub fn sql(sql: SafeSql) -> Self {
        Self(ConditionInner::Sql {
            sql,
            negated: false,
        })
    }

    /// `self AND other`, flattening into an existing AND group.
    pub fn and(self, other: Condition) -> Self {
        self.combine(BooleanOperator::And, other)
    }

    /// `self OR other`, flattening into an existing OR group.
    pub fn or(self, other: Condition) -> Self {
        self.combine(BooleanOperator::Or, other)
    }

    fn combine(self, op: BooleanOperator, other: Condition) -> Self {
        match self.0 {
            ConditionInner::Group { op: own, mut members } if own == op => {
                members.push(other);
                Self(ConditionInner::Group { op, members })
            }
            inner => Self(ConditionInner::Group {
                op,
                members: vec![Self(inner), other],
            }),
        }
    }

    /// The logical inverse, as a new condition.
    ///
    /// Relational operators flip to their inverse, `IS NULL` to
    /// `IS NOT NULL`, and groups follow De Morgan, so negating twice renders
    /// the original again.
    pub fn negate(&self) -> Self {
        match &self.0 {
            ConditionInner::Relational { op, left, right } => Self(ConditionInner::Relational {
                op: op.negate(),
                left: left.clone(),
                right: right.clone(),
            }),
            ConditionInner::Null { operand, negated } => Self(ConditionInner::Null {
                operand: operand.clone(),
                negated: !negated,
            }),
            ConditionInner::Group { op, members } => Self(ConditionInner::Group {
                op: op.flip(),
                members: members.iter().map(Condition::negate).collect(),
            }),
            ConditionInner::Sql { sql, negated } => Self(ConditionInner::Sql {
                sql: sql.clone(),
                negated: !negated,
            }),
        }
    }

    /// The relational operator, if this is a comparison.
    pub fn operator(&self) -> Option<RelationalOperator> {
        match &self.0 {
            ConditionInner::Relational { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Whether this condition renders no text (an empty group, recursively).
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            ConditionInner::Group { members, .. } => members.iter().all(Condition::is_empty),
            ConditionInner::Sql { sql, .. } => sql.is_empty(),
            _ => false,
        }
    }

    /// Whether this is a group rendering more than one member.
    pub(crate) fn is_compound(&self) -> bool {
        match &self.0 {
            ConditionInner::Group { members, .. } => {
                members.iter().filter(|m| !m.is_empty()).count() > 1
            }
            _ => false,
        }
    }

    /// Whether this condition must be parenthesized as one of several
    /// members joined by `op`.
    ///
    /// Groups of the other kind and raw fragments need it; a group with a
    /// single rendered member defers to that member.
    fn needs_parens_in(&self, op: BooleanOperator) -> bool {
        match &self.0 {
            ConditionInner::Group { op: own, members } => {
                let mut rendered = members.iter().filter(|m| !m.is_empty());
                match (rendered.next(), rendered.next()) {
                    (Some(only), None) => only.needs_parens_in(op),
                    (Some(_), Some(_)) => *own != op,
                    _ => false,
                }
            }
            ConditionInner::Sql { negated, .. } => !negated,
            _ => false,
        }
    }
}

impl SqlNode for Condition {
    fn append_to(&self, builder: &mut SafeSqlBuilder) {
        match &self.0 {
            ConditionInner::Relational { op, left, right } => {
                left.append_to(builder);
                builder
                    .append_char(' ')
                    .append_text(op.symbol())
                    .append_char(' ');
                right.append_to(builder);
            }
            ConditionInner::Null { operand, negated } => {
                operand.append_to(builder);
                builder.append_text(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            ConditionInner::Group { op, members } => {
                let op = *op;
                let compound = self.is_compound();
                builder.join(
                    op.delimiter(),
                    members.iter().filter(|m| !m.is_empty()),
                    |b, member| {
                        if compound && member.needs_parens_in(op) {
                            b.append_char('(');
                            member.append_to(b);
                            b.append_char(')');
                        } else {
                            member.append_to(b);
                        }
                    },
                );
            }
            ConditionInner::Sql { sql, negated } => {
                if sql.is_empty() {
                    return;
                }
                if *negated {
                    builder.append_text("NOT (").append_sql(sql).append_char(')');
                } else {
                    builder.append_sql(sql);
                }
            }
        }
    }
}
