//! Characteristics are tags describing notable properties of a generated value,
//! such as being the maximum value of its type or an interval with a month
//! component. Value builders attach them to every candidate so that parameter
//! slots can exclude known-problematic arguments without re-deriving anything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::collections::btree_set::Iter;
use std::fmt;

use crate::datatype::ValueKinds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Characteristic {
    Null,
    Negative,
    Zero,
    One,
    TinyValue,
    LargeValue,
    MaxValue,
    Decimal,
    IntervalWithMonths,
    TextEmpty,
    TextWithSpecialChars,
}

impl Characteristic {
    pub fn name(self) -> &'static str {
        match self {
            Characteristic::Null => "NULL",
            Characteristic::Negative => "NEGATIVE",
            Characteristic::Zero => "ZERO",
            Characteristic::One => "ONE",
            Characteristic::TinyValue => "TINY_VALUE",
            Characteristic::LargeValue => "LARGE_VALUE",
            Characteristic::MaxValue => "MAX_VALUE",
            Characteristic::Decimal => "DECIMAL",
            Characteristic::IntervalWithMonths => "INTERVAL_WITH_MONTHS",
            Characteristic::TextEmpty => "TEXT_EMPTY",
            Characteristic::TextWithSpecialChars => "TEXT_WITH_SPECIAL_CHARS",
        }
    }
    /// The value kinds on which this characteristic can occur at all.
    pub fn applicable_kinds(self) -> ValueKinds {
        match self {
            Characteristic::Null => ValueKinds::all(),
            Characteristic::Negative => ValueKinds::NUMERIC | ValueKinds::INTERVAL,
            Characteristic::Zero => ValueKinds::NUMERIC | ValueKinds::INTERVAL,
            Characteristic::One => ValueKinds::NUMERIC,
            Characteristic::TinyValue => ValueKinds::NUMERIC,
            Characteristic::LargeValue => {
                ValueKinds::NUMERIC | ValueKinds::INTERVAL | ValueKinds::DATE_TIME
            }
            Characteristic::MaxValue => {
                ValueKinds::NUMERIC | ValueKinds::INTERVAL | ValueKinds::DATE_TIME
            }
            Characteristic::Decimal => ValueKinds::NUMERIC,
            Characteristic::IntervalWithMonths => ValueKinds::INTERVAL,
            Characteristic::TextEmpty => ValueKinds::TEXT | ValueKinds::ENUM,
            Characteristic::TextWithSpecialChars => ValueKinds::TEXT | ValueKinds::ENUM,
        }
    }
}
impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ------------- CharacteristicSet -------------
/// Immutable set of characteristics. Ordered only so that it serializes stably.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacteristicSet {
    members: BTreeSet<Characteristic>,
}

impl CharacteristicSet {
    pub fn empty() -> Self {
        Self::default()
    }
    pub fn of(members: &[Characteristic]) -> Self {
        members.iter().copied().collect()
    }
    pub fn contains(&self, characteristic: Characteristic) -> bool {
        self.members.contains(&characteristic)
    }
    pub fn is_superset_of(&self, other: &CharacteristicSet) -> bool {
        self.members.is_superset(&other.members)
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn iter(&self) -> Iter<'_, Characteristic> {
        self.members.iter()
    }
    /// Kinds on which all members can occur together.
    pub fn applicable_kinds(&self) -> ValueKinds {
        self.members
            .iter()
            .fold(ValueKinds::all(), |kinds, c| kinds & c.applicable_kinds())
    }
}
impl FromIterator<Characteristic> for CharacteristicSet {
    fn from_iter<I: IntoIterator<Item = Characteristic>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}
impl fmt::Display for CharacteristicSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.members.iter().map(|c| c.name()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
