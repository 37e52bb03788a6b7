//! Filters the catalog down to the descriptors usable for one generation run.

use serde::{Deserialize, Serialize};

use crate::catalog::{OperationCatalog, OperationId};
use crate::operation::{OperationDescriptor, Relevance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionCriteria {
    /// Lowest relevance tier still included.
    pub min_relevance: Relevance,
    /// Leave out descriptors known to diverge from the reference engine.
    pub require_reference_compatible: bool,
    /// Force disabled descriptors in, e.g. for manual debugging.
    pub include_disabled: bool,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            min_relevance: Relevance::ExtremeLow,
            require_reference_compatible: true,
            include_disabled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    Disabled,
    BelowRelevance,
    ReferenceIncompatible,
}

impl SelectionCriteria {
    /// Why a descriptor is left out, or `None` when it is included.
    pub fn exclusion(&self, descriptor: &OperationDescriptor) -> Option<Exclusion> {
        if !descriptor.is_enabled() && !self.include_disabled {
            Some(Exclusion::Disabled)
        } else if descriptor.get_relevance() < self.min_relevance {
            Some(Exclusion::BelowRelevance)
        } else if self.require_reference_compatible && !descriptor.is_reference_compatible() {
            Some(Exclusion::ReferenceIncompatible)
        } else {
            None
        }
    }
    pub fn includes(&self, descriptor: &OperationDescriptor) -> bool {
        self.exclusion(descriptor).is_none()
    }
}

/// A view over the selected descriptors, in catalog order.
#[derive(Debug, Clone)]
pub struct Selection<'c> {
    selected: Vec<(OperationId, &'c OperationDescriptor)>,
    excluded: Vec<(OperationId, Exclusion)>,
}

impl<'c> Selection<'c> {
    pub fn descriptors(&self) -> &[(OperationId, &'c OperationDescriptor)] {
        &self.selected
    }
    pub fn ids(&self) -> Vec<OperationId> {
        self.selected.iter().map(|(id, _)| *id).collect()
    }
    pub fn excluded(&self) -> &[(OperationId, Exclusion)] {
        &self.excluded
    }
    pub fn len(&self) -> usize {
        self.selected.len()
    }
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

pub fn select<'c>(catalog: &'c OperationCatalog, criteria: &SelectionCriteria) -> Selection<'c> {
    let mut selected = Vec::new();
    let mut excluded = Vec::new();
    for (id, descriptor) in catalog.iter() {
        match criteria.exclusion(descriptor) {
            None => selected.push((id, descriptor)),
            Some(reason) => excluded.push((id, reason)),
        }
    }
    Selection { selected, excluded }
}
