use csvmerge::source::InMemorySource;
use csvmerge::types::{Row, Schema, TypeTag, Value};

#[allow(dead_code)]
pub fn source(name: &str, cols: &[(&str, TypeTag)], rows: Vec<Row>) -> InMemorySource {
    InMemorySource::new(name, Schema::of(cols), rows)
}

/// Two sales exports from different years; the later one gained columns and
/// switched `amount` from whole numbers to decimals.
#[allow(dead_code)]
pub const SALES_2022: &str = "\
id,region,amount
1,north,100
2,south,250
";

#[allow(dead_code)]
pub const SALES_2023: &str = "\
id,region,amount,channel,refunded
3,east,99.5,web,false
4,west,10.25,store,true
5,north,,web,
";

#[allow(dead_code)]
pub const SALES_2024: &str = "\
region,id,discount
south,6,0.1
";

#[allow(dead_code)]
pub fn users() -> InMemorySource {
    source(
        "users",
        &[("id", TypeTag::Integer), ("name", TypeTag::String)],
        vec![
            vec![Value::Integer(1), Value::from("Alice")],
            vec![Value::Integer(2), Value::from("Bob")],
        ],
    )
}

#[allow(dead_code)]
pub fn more_users() -> InMemorySource {
    source(
        "more_users",
        &[
            ("name", TypeTag::String),
            ("id", TypeTag::Integer),
            ("active", TypeTag::Boolean),
        ],
        vec![vec![Value::from("Carol"), Value::Integer(3), Value::Boolean(true)]],
    )
}
