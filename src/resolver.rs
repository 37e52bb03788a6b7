//! Parameter constraint resolution.
//!
//! A candidate fits a slot when its kind is one the slot accepts and its
//! characteristics do not cover any of the slot's forbidden sets. The check is
//! a pure function of its inputs, so catalog-derived suites are reproducible.

use serde::{Deserialize, Serialize};

use crate::characteristic::CharacteristicSet;
use crate::datatype::ValueKind;
use crate::param::ParameterSpec;
use crate::pool::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    UnsupportedKind(ValueKind),
    /// Index of the forbidden set the candidate covered.
    Incompatible(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    Accepted,
    Rejected(Rejection),
}

impl Resolution {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Resolution::Accepted)
    }
}

pub fn resolve(
    param: &ParameterSpec,
    kind: ValueKind,
    characteristics: &CharacteristicSet,
) -> Resolution {
    if !param.supports(kind) {
        return Resolution::Rejected(Rejection::UnsupportedKind(kind));
    }
    match param
        .incompatibilities()
        .iter()
        .position(|forbidden| characteristics.is_superset_of(forbidden))
    {
        Some(i) => Resolution::Rejected(Rejection::Incompatible(i)),
        None => Resolution::Accepted,
    }
}

pub fn accepts(
    param: &ParameterSpec,
    kind: ValueKind,
    characteristics: &CharacteristicSet,
) -> bool {
    resolve(param, kind, characteristics).is_accepted()
}

pub fn resolve_candidate(param: &ParameterSpec, candidate: &Candidate) -> Resolution {
    resolve(param, candidate.kind(), candidate.characteristics())
}
