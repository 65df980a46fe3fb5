mod helpers;

use csvmerge::api::{MergeError, Merger};
use csvmerge::config::MergeOptions;
use csvmerge::types::{TypeTag, Value};
use csvmerge::unify::UnifyError;

use helpers::data::{more_users, source, users};

#[test]
fn extra_column_is_appended_and_null_filled() {
    let mut m = Merger::new(MergeOptions::default());
    m.add_source(source(
        "A",
        &[("id", TypeTag::Integer), ("name", TypeTag::String)],
        vec![vec![Value::Integer(1), Value::from("x")]],
    ));
    m.add_source(source(
        "B",
        &[
            ("id", TypeTag::Integer),
            ("name", TypeTag::String),
            ("extra", TypeTag::String),
        ],
        vec![vec![Value::Integer(2), Value::from("y"), Value::from("z")]],
    ));

    let table = m.collect().unwrap();

    assert_eq!(table.columns(), vec!["id", "name", "extra"]);
    assert_eq!(
        table.rows(),
        &[
            vec![Value::Integer(1), Value::from("x"), Value::Null],
            vec![Value::Integer(2), Value::from("y"), Value::from("z")],
        ]
    );
}

#[test]
fn integer_and_float_scores_unify_to_float() {
    let mut m = Merger::new(MergeOptions::default());
    m.add_source(source(
        "A",
        &[("score", TypeTag::Integer)],
        vec![vec![Value::Integer(5)]],
    ));
    m.add_source(source(
        "B",
        &[("score", TypeTag::Float)],
        vec![vec![Value::Float(7.25)]],
    ));

    let table = m.collect().unwrap();

    assert_eq!(table.schema().types(), vec![TypeTag::Float]);
    assert_eq!(table.rows()[0][0], Value::Float(5.0));
    assert_eq!(table.rows()[0][0].to_string(), "5.0");
    assert_eq!(table.stats().values_coerced, 1);
}

#[test]
fn strict_boolean_integer_conflict_emits_nothing() {
    let mut m = Merger::new(MergeOptions::strict());
    m.add_source(source(
        "A",
        &[("flag", TypeTag::Boolean)],
        vec![vec![Value::Boolean(true)]],
    ));
    m.add_source(source(
        "B",
        &[("flag", TypeTag::Integer)],
        vec![vec![Value::Integer(0)]],
    ));

    match m.collect() {
        Err(MergeError::Unify(err)) => {
            assert_eq!(
                err,
                UnifyError::SchemaConflict {
                    column: "flag".into(),
                    left: TypeTag::Boolean,
                    right: TypeTag::Integer,
                }
            );
            assert_eq!(
                err.to_string(),
                "schema conflict on column 'flag': Boolean vs Integer"
            );
        }
        other => panic!("expected schema conflict, got {other:?}"),
    }
}

#[test]
fn reordered_columns_are_aligned_by_name() {
    let mut m = Merger::new(MergeOptions::default());
    m.add_source(users());
    m.add_source(more_users());

    let table = m.collect().unwrap();

    assert_eq!(table.columns(), vec!["id", "name", "active"]);
    assert_eq!(
        table.rows()[2],
        vec![Value::Integer(3), Value::from("Carol"), Value::Boolean(true)]
    );
    assert_eq!(table.rows()[0][2], Value::Null);
}

#[test]
fn relaxed_boolean_integer_mix_becomes_text() {
    let mut m = Merger::new(MergeOptions::default());
    m.add_source(source(
        "A",
        &[("flag", TypeTag::Boolean)],
        vec![vec![Value::Boolean(true)]],
    ));
    m.add_source(source(
        "B",
        &[("flag", TypeTag::Integer)],
        vec![vec![Value::Integer(0)]],
    ));

    let table = m.collect().unwrap();

    assert_eq!(table.schema().types(), vec![TypeTag::String]);
    assert_eq!(
        table.column("flag").unwrap(),
        vec![&Value::from("true"), &Value::from("0")]
    );
}

#[test]
fn streaming_yields_rows_lazily() {
    let mut m = Merger::new(MergeOptions::default());
    m.add_source(users());
    m.add_source(more_users());

    let mut rows = m.stream().unwrap();
    assert_eq!(rows.schema().names(), vec!["id", "name", "active"]);

    let first = rows.next().unwrap().unwrap();
    assert_eq!(first[1], Value::from("Alice"));
    assert_eq!(rows.stats().rows_out, 1);

    assert_eq!(rows.count(), 2);
}
