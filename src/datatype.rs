// used to declare the closed set of value kinds as flags with a membership test
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// used to print out readable forms of a data type
use std::fmt;

// ------------- ValueKind -------------
/// The concrete kind of a single candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    #[serde(rename = "DATE")]
    Date,
    #[serde(rename = "TIME")]
    Time,
    #[serde(rename = "TIMESTAMP")]
    Timestamp,
    #[serde(rename = "TIMESTAMPTZ")]
    TimestampTz,
    #[serde(rename = "INTERVAL")]
    Interval,
    #[serde(rename = "NUMERIC")]
    Numeric,
    #[serde(rename = "TEXT")]
    Text,
    #[serde(rename = "ENUM")]
    Enum,
}

impl ValueKind {
    pub const ALL: [ValueKind; 8] = [
        ValueKind::Date,
        ValueKind::Time,
        ValueKind::Timestamp,
        ValueKind::TimestampTz,
        ValueKind::Interval,
        ValueKind::Numeric,
        ValueKind::Text,
        ValueKind::Enum,
    ];

    pub fn flag(self) -> ValueKinds {
        match self {
            ValueKind::Date => ValueKinds::DATE,
            ValueKind::Time => ValueKinds::TIME,
            ValueKind::Timestamp => ValueKinds::TIMESTAMP,
            ValueKind::TimestampTz => ValueKinds::TIMESTAMPTZ,
            ValueKind::Interval => ValueKinds::INTERVAL,
            ValueKind::Numeric => ValueKinds::NUMERIC,
            ValueKind::Text => ValueKinds::TEXT,
            ValueKind::Enum => ValueKinds::ENUM,
        }
    }
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Date => "DATE",
            ValueKind::Time => "TIME",
            ValueKind::Timestamp => "TIMESTAMP",
            ValueKind::TimestampTz => "TIMESTAMPTZ",
            ValueKind::Interval => "INTERVAL",
            ValueKind::Numeric => "NUMERIC",
            ValueKind::Text => "TEXT",
            ValueKind::Enum => "ENUM",
        }
    }
}
impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ------------- ValueKinds -------------
bitflags! {
    /// The set of value kinds a parameter slot accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ValueKinds: u16 {
        const DATE = 1 << 0;
        const TIME = 1 << 1;
        const TIMESTAMP = 1 << 2;
        const TIMESTAMPTZ = 1 << 3;
        const INTERVAL = 1 << 4;
        const NUMERIC = 1 << 5;
        const TEXT = 1 << 6;
        const ENUM = 1 << 7;
    }
}

impl ValueKinds {
    /// Every point-in-time kind, i.e. everything date-time except intervals.
    pub const DATE_TIME: ValueKinds = ValueKinds::DATE
        .union(ValueKinds::TIME)
        .union(ValueKinds::TIMESTAMP)
        .union(ValueKinds::TIMESTAMPTZ);
    pub const TIME_INTERVAL: ValueKinds = ValueKinds::INTERVAL;

    pub fn admits(&self, kind: ValueKind) -> bool {
        self.contains(kind.flag())
    }
    /// Member kinds in their canonical order.
    pub fn kinds(&self) -> Vec<ValueKind> {
        ValueKind::ALL
            .iter()
            .copied()
            .filter(|k| self.admits(*k))
            .collect()
    }
}
impl fmt::Display for ValueKinds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.kinds().into_iter().map(ValueKind::name).collect();
        write!(f, "{}", names.join("|"))
    }
}

// ------------- Return types -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeCategory {
    Numeric,
    Text,
    DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeIdentifier {
    Date,
    Time,
    Timestamp,
    #[serde(rename = "timestamptz")]
    TimestampTz,
    Interval,
    Numeric,
    Text,
}

impl TypeIdentifier {
    pub fn category(self) -> TypeCategory {
        match self {
            TypeIdentifier::Date
            | TypeIdentifier::Time
            | TypeIdentifier::Timestamp
            | TypeIdentifier::TimestampTz
            | TypeIdentifier::Interval => TypeCategory::DateTime,
            TypeIdentifier::Numeric => TypeCategory::Numeric,
            TypeIdentifier::Text => TypeCategory::Text,
        }
    }
    pub fn sql_name(self) -> &'static str {
        match self {
            TypeIdentifier::Date => "DATE",
            TypeIdentifier::Time => "TIME",
            TypeIdentifier::Timestamp => "TIMESTAMP",
            TypeIdentifier::TimestampTz => "TIMESTAMPTZ",
            TypeIdentifier::Interval => "INTERVAL",
            TypeIdentifier::Numeric => "NUMERIC",
            TypeIdentifier::Text => "TEXT",
        }
    }
}

/// The result type of an operation. Numeric and text results carry no
/// concrete identifier, date-time results name the exact type produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnTypeSpec {
    category: TypeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifier: Option<TypeIdentifier>,
}

impl ReturnTypeSpec {
    pub fn numeric() -> Self {
        Self {
            category: TypeCategory::Numeric,
            identifier: None,
        }
    }
    pub fn text() -> Self {
        Self {
            category: TypeCategory::Text,
            identifier: None,
        }
    }
    pub fn date_time(identifier: TypeIdentifier) -> Self {
        Self {
            category: TypeCategory::DateTime,
            identifier: Some(identifier),
        }
    }
    /// Unchecked constructor, the pairing is verified when a catalog is built.
    pub fn with_identifier(category: TypeCategory, identifier: TypeIdentifier) -> Self {
        Self {
            category,
            identifier: Some(identifier),
        }
    }
    pub fn category(&self) -> TypeCategory {
        self.category
    }
    pub fn identifier(&self) -> Option<TypeIdentifier> {
        self.identifier
    }
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self.identifier {
            Some(id) if id.category() != self.category => Err(format!(
                "return type {} does not belong to category {:?}",
                id.sql_name(),
                self.category
            )),
            None if self.category == TypeCategory::DateTime => {
                Err("date-time return type needs a concrete type identifier".into())
            }
            _ => Ok(()),
        }
    }
}
impl fmt::Display for ReturnTypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.identifier, self.category) {
            (Some(id), _) => write!(f, "{}", id.sql_name()),
            (None, TypeCategory::Numeric) => write!(f, "NUMERIC"),
            (None, TypeCategory::Text) => write!(f, "TEXT"),
            (None, TypeCategory::DateTime) => write!(f, "DATE-TIME"),
        }
    }
}
