use super::*;
use crate::alias::AliasGenerator;
use crate::sql::{SafeSql, SqlNode};

fn params_of(sql: &SafeSql) -> Vec<String> {
    sql.params().iter().map(|p| format!("{p:?}")).collect()
}

fn render(node: &impl SqlNode) -> String {
    node.to_safe_sql().as_sql().to_string()
}

#[test]
fn column_plain_and_aliased() {
    let mut aliases = AliasGenerator::new();
    let t = aliases.generate("t1");
    let t2 = aliases.generate("t1");

    assert_eq!(render(&Column::new("id")), "id");
    assert_eq!(render(&Column::of(&t, "id")), "t1.id");
    assert_eq!(render(&Column::of(&t2, "Name")), r#"t1_1."Name""#);
}

#[test]
fn constant_is_raw() {
    assert_eq!(render(&Constant::new("CURRENT_DATE")), "CURRENT_DATE");
    assert_eq!(render(&Constant::int(-2)), "-2");
}

#[test]
fn value_binds() {
    let sql = Value::new("Lucie").to_safe_sql();
    assert_eq!(sql.as_sql(), "?");
    assert_eq!(params_of(&sql), ["\"Lucie\""]);
}

#[test]
fn tuple_renders_parenthesized() {
    let tuple = Tuple::new(Column::new("a"), Value::new(1_i32)).with(Column::new("b"));
    let sql = tuple.to_safe_sql();
    assert_eq!(sql.as_sql(), "(a, ?, b)");
    assert_eq!(params_of(&sql), ["1"]);
}

#[test]
fn tuple_rejects_fewer_than_two_operands() {
    assert!(Tuple::try_from_iter(Vec::<Operand>::new()).is_err());
    assert!(Tuple::try_from_iter([Column::new("a")]).is_err());
    let tuple = Tuple::try_from_iter([Column::new("a"), Column::new("b")]).unwrap();
    assert_eq!(render(&tuple), "(a, b)");
}

#[test]
fn empty_values_keep_parentheses() {
    assert_eq!(render(&Values::default()), "()");
    assert_eq!(render(&Values::bind_all([1_i32, 2])), "(?, ?)");
}

#[test]
fn call_renders_arguments() {
    assert_eq!(render(&Call::new("time")), "time()");
    let call = Call::new("coalesce")
        .arg(Column::new("nick"))
        .arg(Value::new("anon"));
    let sql = call.to_safe_sql();
    assert_eq!(sql.as_sql(), "coalesce(nick, ?)");
    assert_eq!(params_of(&sql), ["\"anon\""]);
    assert_eq!(
        render(&Call::with_args("greatest", [Constant::int(1), Constant::int(2)])),
        "greatest(1, 2)"
    );
}

#[test]
fn cast_appends_type() {
    assert_eq!(render(&Cast::new(Constant::new("2"), "text")), "2::text");
    assert_eq!(render(&Cast::new(Value::new(5_i64), "bigint")), "?::bigint");
}

#[test]
fn compute_is_always_parenthesized() {
    let inner = Compute::add(Constant::int(2), Constant::int(2));
    assert_eq!(render(&inner), "(2 + 2)");

    let nested = Compute::multiply(inner, Column::new("x"));
    assert_eq!(render(&nested), "((2 + 2) * x)");
    assert_eq!(
        render(&Compute::concat(Column::new("a"), Column::new("b"))),
        "(a || b)"
    );
}

#[test]
fn subquery_operand_keeps_parameter_order() {
    let sub = Condition::eq(Column::new("x"), Value::new(2_i32)).to_safe_sql();
    let cond = Condition::eq(Value::new(1_i32), Operand::Subquery(sub));
    let sql = cond.to_safe_sql();
    assert_eq!(sql.as_sql(), "? = (x = ?)");
    assert_eq!(params_of(&sql), ["1", "2"]);
}

#[test]
fn relational_conditions() {
    let sql = Condition::eq(Column::new("name"), Value::new("Lucie")).to_safe_sql();
    assert_eq!(sql.as_sql(), "name = ?");
    assert_eq!(params_of(&sql), ["\"Lucie\""]);

    assert_eq!(render(&Condition::ne(Column::new("a"), Column::new("b"))), "a <> b");
    assert_eq!(render(&Condition::le(Column::new("a"), Constant::int(3))), "a <= 3");
    assert_eq!(
        render(&Condition::ilike(Column::new("a"), Value::new("%x%"))),
        "a ILIKE ?"
    );
    assert_eq!(
        render(&Condition::is_distinct_from(Column::new("a"), Column::new("b"))),
        "a IS DISTINCT FROM b"
    );
}

#[test]
fn in_list_and_not_in() {
    let cond = Condition::in_list(
        Column::new("name"),
        [Value::new("Lucie"), Value::new("Clemence"), Value::new("Anna")],
    );
    let sql = cond.to_safe_sql();
    assert_eq!(sql.as_sql(), "name IN (?, ?, ?)");
    assert_eq!(params_of(&sql), ["\"Lucie\"", "\"Clemence\"", "\"Anna\""]);

    let sql = Condition::not_in(Column::new("id"), [Value::new(1_i32), Value::new(2_i32)])
        .to_safe_sql();
    assert_eq!(sql.as_sql(), "id NOT IN (?, ?)");
    assert_eq!(params_of(&sql), ["1", "2"]);
}

#[test]
fn in_list_empty_renders_empty_parens() {
    let cond = Condition::in_list(Column::new("id"), Vec::<Operand>::new());
    assert_eq!(render(&cond), "id IN ()");
}

#[test]
fn compare_in_with_values_right_side() {
    let cond = Condition::compare(
        RelationalOperator::In,
        Column::new("id"),
        Values::bind_all([1_i32, 2]),
    );
    assert_eq!(render(&cond), "id IN (?, ?)");

    let single = Condition::compare(RelationalOperator::NotIn, Column::new("id"), Value::new(1_i32));
    assert_eq!(render(&single), "id NOT IN (?)");
}

#[test]
fn negate_in_list_keeps_elements() {
    let cond = Condition::in_list(Column::new("name"), [Value::new("a"), Value::new("b")]);
    let negated = cond.negate();
    assert_eq!(render(&negated), "name NOT IN (?, ?)");
    assert_eq!(params_of(&negated.to_safe_sql()), ["\"a\"", "\"b\""]);
    // The original is untouched.
    assert_eq!(render(&cond), "name IN (?, ?)");
    assert_eq!(negated.operator(), Some(RelationalOperator::NotIn));
}

#[test]
fn negate_relational_operators() {
    let pairs = [
        (Condition::eq(Column::new("a"), Column::new("b")), "a <> b"),
        (Condition::lt(Column::new("a"), Column::new("b")), "a >= b"),
        (Condition::gt(Column::new("a"), Column::new("b")), "a <= b"),
        (Condition::like(Column::new("a"), Column::new("b")), "a NOT LIKE b"),
        (
            Condition::is_not_distinct_from(Column::new("a"), Column::new("b")),
            "a IS DISTINCT FROM b",
        ),
    ];
    for (cond, expected) in pairs {
        assert_eq!(render(&cond.negate()), expected);
    }
}

#[test]
fn negation_is_an_involution() {
    let conditions = [
        Condition::eq(Column::new("a"), Value::new(1_i32)),
        Condition::not_in(Column::new("a"), [Value::new(1_i32)]),
        Condition::is_null(Column::new("a")),
        Condition::all([
            Condition::ge(Column::new("a"), Value::new(1_i32)),
            Condition::any([
                Condition::ilike(Column::new("b"), Value::new("x")),
                Condition::is_not_null(Column::new("c")),
            ]),
        ]),
        Condition::sql(SafeSql::constant("flag")),
    ];
    for cond in conditions {
        let twice = cond.negate().negate();
        let original = cond.to_safe_sql();
        let round = twice.to_safe_sql();
        assert_eq!(round.as_sql(), original.as_sql());
        assert_eq!(params_of(&round), params_of(&original));
    }
}

#[test]
fn null_checks() {
    assert_eq!(render(&Condition::is_null(Column::new("a"))), "a IS NULL");
    assert_eq!(
        render(&Condition::is_null(Column::new("a")).negate()),
        "a IS NOT NULL"
    );
}

#[test]
fn groups_parenthesize_opposite_operator() {
    let cond = Condition::all([
        Condition::eq(Column::new("status"), Value::new("active")),
        Condition::any([
            Condition::eq(Column::new("role"), Value::new("admin")),
            Condition::all([
                Condition::eq(Column::new("role"), Value::new("user")),
                Condition::gt(Column::new("reputation"), Value::new(100_i32)),
            ]),
        ]),
    ]);
    let sql = cond.to_safe_sql();
    assert_eq!(
        sql.as_sql(),
        "status = ? AND (role = ? OR (role = ? AND reputation > ?))"
    );
    assert_eq!(
        params_of(&sql),
        ["\"active\"", "\"admin\"", "\"user\"", "100"]
    );
}

#[test]
fn negated_group_follows_de_morgan() {
    let cond = Condition::all([
        Condition::eq(Column::new("a"), Column::new("b")),
        Condition::any([
            Condition::lt(Column::new("c"), Column::new("d")),
            Condition::is_null(Column::new("e")),
        ]),
    ]);
    assert_eq!(
        render(&cond.negate()),
        "a <> b OR (c >= d AND e IS NOT NULL)"
    );
}

#[test]
fn empty_groups_render_nothing() {
    assert_eq!(render(&Condition::all([])), "");
    assert!(Condition::any([]).is_empty());

    let cond = Condition::all([
        Condition::any([]),
        Condition::eq(Column::new("a"), Column::new("b")),
    ]);
    assert_eq!(render(&cond), "a = b");
}

#[test]
fn and_or_combinators_flatten() {
    let a = Condition::eq(Column::new("a"), Value::new(1_i32));
    let b = Condition::eq(Column::new("b"), Value::new(2_i32));
    let c = Condition::eq(Column::new("c"), Value::new(3_i32));

    assert_eq!(render(&a.clone().and(b.clone()).and(c.clone())), "a = ? AND b = ? AND c = ?");
    assert_eq!(render(&a.clone().or(b.clone()).and(c)), "(a = ? OR b = ?) AND c = ?");
    assert_eq!(render(&a.or(b)), "a = ? OR b = ?");
}

#[test]
fn sql_condition_negation_wraps() {
    let cond = Condition::sql(SafeSql::constant("EXISTS (SELECT 1)"));
    assert_eq!(render(&cond), "EXISTS (SELECT 1)");
    assert_eq!(render(&cond.negate()), "NOT (EXISTS (SELECT 1))");
}

#[test]
fn condition_as_operand() {
    let compound = Condition::any([
        Condition::is_null(Column::new("a")),
        Condition::is_null(Column::new("b")),
    ]);
    assert_eq!(
        render(&Operand::from(compound)),
        "(a IS NULL OR b IS NULL)"
    );
    let simple = Condition::is_null(Column::new("a"));
    assert_eq!(render(&Operand::from(simple)), "(a IS NULL)");
    assert_eq!(render(&Operand::from(Condition::all([]))), "");
}

#[test]
fn relational_condition_as_comparison_operand() {
    let nested = Condition::eq(
        Condition::eq(Column::new("a"), Column::new("b")),
        Value::new(true),
    );
    let sql = nested.to_safe_sql();
    assert_eq!(sql.as_sql(), "(a = b) = ?");
    assert_eq!(params_of(&sql), ["true"]);

    let raw = Condition::ne(Condition::sql(SafeSql::constant("flag")), Constant::new("FALSE"));
    assert_eq!(render(&raw), "(flag) <> FALSE");
}

#[test]
fn raw_fragment_in_group_is_parenthesized() {
    let mut b = crate::sql::SafeSqlBuilder::new();
    b.append_text("a = ").bind(1_i32).append_text(" OR b = ").bind(2_i32);
    let raw = Condition::sql(b.finalize());

    let cond = raw
        .clone()
        .and(Condition::eq(Column::new("c"), Value::new(3_i32)));
    let sql = cond.to_safe_sql();
    assert_eq!(sql.as_sql(), "(a = ? OR b = ?) AND c = ?");
    assert_eq!(params_of(&sql), ["1", "2", "3"]);

    // Alone, or negated, it needs no extra parentheses.
    assert_eq!(render(&raw), "a = ? OR b = ?");
    assert_eq!(render(&Condition::all([raw.clone()])), "a = ? OR b = ?");
    assert_eq!(
        render(&raw.negate().and(Condition::is_null(Column::new("d")))),
        "NOT (a = ? OR b = ?) AND d IS NULL"
    );
}

#[test]
fn single_member_group_defers_to_its_member() {
    let raw = Condition::sql(SafeSql::constant("x OR y"));
    let cond = Condition::all([
        Condition::any([raw]),
        Condition::is_null(Column::new("z")),
    ]);
    assert_eq!(render(&cond), "(x OR y) AND z IS NULL");

    let plain = Condition::all([
        Condition::any([Condition::eq(Column::new("a"), Column::new("b"))]),
        Condition::is_null(Column::new("z")),
    ]);
    assert_eq!(render(&plain), "a = b AND z IS NULL");
}
