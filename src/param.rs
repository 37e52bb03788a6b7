//! Parameter specifications: what a single operation slot accepts.
//!
//! A slot accepts a set of [`ValueKind`]s and may forbid combinations of
//! characteristics. Enum-constant slots (date parts, time zones, precisions and
//! the like) carry their own literal values instead of drawing from a pool.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::characteristic::{Characteristic, CharacteristicSet};
use crate::datatype::{ValueKind, ValueKinds};
use crate::pool::Candidate;

// ------------- EnumConstants -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumConstants {
    name: String,
    values: Vec<String>,
    quoted: bool,
}

impl EnumConstants {
    pub fn new(name: &str, values: &[&str], quoted: bool) -> Self {
        Self {
            name: name.to_owned(),
            values: values.iter().map(|v| (*v).to_owned()).collect(),
            quoted,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn values(&self) -> &[String] {
        &self.values
    }
    pub fn quoted(&self) -> bool {
        self.quoted
    }
    fn render(&self, value: &str) -> String {
        if self.quoted {
            format!("'{}'", value.replace('\'', "''"))
        } else {
            value.to_owned()
        }
    }
}

// ------------- ParameterSpec -------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterSpec {
    accepted: ValueKinds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    constants: Option<EnumConstants>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    incompatibilities: Vec<CharacteristicSet>,
}

impl ParameterSpec {
    pub fn only(accepted: ValueKinds) -> Self {
        Self {
            accepted,
            constants: None,
            incompatibilities: Vec::new(),
        }
    }
    /// Any point-in-time value: date, time, timestamp or timestamp with zone.
    pub fn date_time() -> Self {
        Self::only(ValueKinds::DATE_TIME)
    }
    pub fn time_interval() -> Self {
        Self::only(ValueKinds::TIME_INTERVAL)
    }
    pub fn numeric() -> Self {
        Self::only(ValueKinds::NUMERIC)
    }
    pub fn text() -> Self {
        Self::only(ValueKinds::TEXT)
    }
    pub fn enum_constant(constants: EnumConstants) -> Self {
        Self {
            accepted: ValueKinds::ENUM,
            constants: Some(constants),
            incompatibilities: Vec::new(),
        }
    }
    pub fn without(mut self, kind: ValueKind) -> Self {
        self.accepted.remove(kind.flag());
        self
    }
    /// Forbids any argument carrying all of the given characteristics at once.
    pub fn incompatible_with(mut self, forbidden: &[Characteristic]) -> Self {
        self.incompatibilities.push(CharacteristicSet::of(forbidden));
        self
    }

    pub fn accepted(&self) -> ValueKinds {
        self.accepted
    }
    pub fn constants(&self) -> Option<&EnumConstants> {
        self.constants.as_ref()
    }
    pub fn incompatibilities(&self) -> &[CharacteristicSet] {
        &self.incompatibilities
    }
    pub fn supports(&self, kind: ValueKind) -> bool {
        self.accepted.admits(kind)
    }

    /// Candidates supplied by the slot itself, empty unless it is an enum-constant slot.
    pub fn constant_candidates(&self) -> Vec<Candidate> {
        let Some(constants) = &self.constants else {
            return Vec::new();
        };
        constants
            .values
            .iter()
            .map(|value| {
                let characteristics = if value.is_empty() {
                    CharacteristicSet::of(&[Characteristic::TextEmpty])
                } else {
                    CharacteristicSet::empty()
                };
                Candidate::new(constants.render(value), ValueKind::Enum, characteristics)
            })
            .collect()
    }

    /// Structural problems that make the slot unusable.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.accepted.is_empty() {
            return Err("parameter accepts no value kind".into());
        }
        match (&self.constants, self.accepted == ValueKinds::ENUM) {
            (None, true) => return Err("enum parameter without constants".into()),
            (Some(c), false) => {
                return Err(format!(
                    "constants {} on a parameter accepting {}",
                    c.name, self.accepted
                ));
            }
            (Some(c), true) if c.values.is_empty() => {
                return Err(format!("enum parameter {} has no values", c.name));
            }
            _ => (),
        }
        if self.accepted.admits(ValueKind::Enum) && self.accepted != ValueKinds::ENUM {
            return Err("enum constants cannot be mixed with other value kinds".into());
        }
        if let Some(i) = self.incompatibilities.iter().position(|s| s.is_empty()) {
            return Err(format!("forbidden characteristic set #{i} is empty"));
        }
        Ok(())
    }

    /// Indexes of forbidden sets that can never match given the accepted kinds.
    pub fn dead_constraints(&self) -> Vec<usize> {
        self.incompatibilities
            .iter()
            .enumerate()
            .filter(|(_, forbidden)| (forbidden.applicable_kinds() & self.accepted).is_empty())
            .map(|(i, _)| i)
            .collect()
    }
}
impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.constants {
            Some(c) => write!(f, "{}", c.name)?,
            None => write!(f, "{}", self.accepted)?,
        }
        for forbidden in &self.incompatibilities {
            write!(f, " !{forbidden}")?;
        }
        Ok(())
    }
}

// ------------- Standard enum-constant parameters -------------
pub fn date_time_component() -> ParameterSpec {
    ParameterSpec::enum_constant(EnumConstants::new(
        "DATE_TIME_COMPONENT",
        &[
            "microseconds",
            "milliseconds",
            "second",
            "minute",
            "hour",
            "day",
            "week",
            "month",
            "quarter",
            "year",
            "decade",
            "century",
            "millennium",
        ],
        true,
    ))
}

pub fn time_component() -> ParameterSpec {
    ParameterSpec::enum_constant(EnumConstants::new(
        "TIME_COMPONENT",
        &["microseconds", "milliseconds", "second", "minute", "hour"],
        true,
    ))
}

pub fn time_zone() -> ParameterSpec {
    ParameterSpec::enum_constant(EnumConstants::new(
        "TIME_ZONE",
        &["UTC", "CET", "+8", "America/New_York"],
        true,
    ))
}

pub fn precision() -> ParameterSpec {
    ParameterSpec::enum_constant(EnumConstants::new("PRECISION", &["0", "1", "3", "6"], false))
}

pub fn type_format() -> ParameterSpec {
    ParameterSpec::enum_constant(EnumConstants::new(
        "TYPE_FORMAT",
        &["YYYY-MM-DD", "HH24:MI:SS", "Day, DD Mon YYYY", "YYYY-MM-DD HH24:MI:SS.US TZ"],
        true,
    ))
}

pub fn iso8601_timestamp() -> ParameterSpec {
    ParameterSpec::enum_constant(EnumConstants::new(
        "ISO8601_TIMESTAMP",
        &[
            "2015-09-18T23:56:04.123Z",
            "2015-09-18T23:56:04Z",
            "2015-09-18T23:56:04+02:00",
            "2015-09-18",
        ],
        true,
    ))
}
