//! Logical column types and the widening lattice used when schemas meet.
//!
//! ```text
//!              String
//!             /      \
//!          Float    Boolean
//!            |         |
//!         Integer      |
//!             \       /
//!               Null
//! ```

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Boolean,
    Integer,
    Float,
    String,
}

impl TypeTag {
    /// Least upper bound of two tags.
    ///
    /// Commutative, associative and idempotent; `Null` is the identity.
    pub fn widen(self, other: TypeTag) -> TypeTag {
        use TypeTag::*;

        match (self, other) {
            (a, b) if a == b => a,
            (Null, t) | (t, Null) => t,
            (Integer, Float) | (Float, Integer) => Float,
            // Boolean is disjoint from the numeric chain; any other mix is text.
            _ => String,
        }
    }

    /// Whether two tags may share a column without any widening.
    pub fn is_strictly_compatible(self, other: TypeTag) -> bool {
        self == other || self == TypeTag::Null || other == TypeTag::Null
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Null => "Null",
            TypeTag::Boolean => "Boolean",
            TypeTag::Integer => "Integer",
            TypeTag::Float => "Float",
            TypeTag::String => "String",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "null" => Ok(TypeTag::Null),
            "bool" | "boolean" => Ok(TypeTag::Boolean),
            "int" | "integer" => Ok(TypeTag::Integer),
            "float" | "double" => Ok(TypeTag::Float),
            "str" | "string" | "text" => Ok(TypeTag::String),
            other => Err(format!("unknown type '{other}'")),
        }
    }
}
