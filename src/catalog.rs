//! The operation catalog: an ordered, immutable registry of descriptors.
//!
//! Descriptors are registered on a [`CatalogBuilder`] and validated once by
//! [`CatalogBuilder::build`]. Structural problems abort the build, dead
//! characteristic constraints only produce warnings. The resulting
//! [`OperationCatalog`] is never mutated and can be shared between threads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::characteristic::CharacteristicSet;
use crate::error::{ConcordError, Result};
use crate::operation::OperationDescriptor;

/// Version of the catalog snapshot format.
pub const CATALOG_FORMAT_VERSION: u32 = 1;

/// Position of a descriptor in its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationId(pub usize);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CatalogWarning {
    /// A forbidden characteristic set that can never occur on the slot.
    DeadConstraint {
        descriptor: OperationId,
        signature: String,
        slot: usize,
        forbidden: CharacteristicSet,
    },
}
impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogWarning::DeadConstraint {
                descriptor,
                signature,
                slot,
                forbidden,
            } => write!(
                f,
                "{descriptor} {signature}: forbidden set {forbidden} on slot {slot} can never occur"
            ),
        }
    }
}

// ------------- CatalogBuilder -------------
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    pending: Vec<OperationDescriptor>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn register(&mut self, descriptor: OperationDescriptor) -> OperationId {
        self.pending.push(descriptor);
        OperationId(self.pending.len() - 1)
    }
    pub fn len(&self) -> usize {
        self.pending.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn build(self) -> Result<OperationCatalog> {
        let mut warnings = Vec::new();
        for (i, descriptor) in self.pending.iter().enumerate() {
            descriptor.validate()?;
            for (slot, param) in descriptor.parameters().iter().enumerate() {
                for dead in param.dead_constraints() {
                    let warning = CatalogWarning::DeadConstraint {
                        descriptor: OperationId(i),
                        signature: descriptor.signature(),
                        slot,
                        forbidden: param.incompatibilities()[dead].clone(),
                    };
                    warn!(%warning, "dead characteristic constraint");
                    warnings.push(warning);
                }
            }
        }
        debug!(descriptors = self.pending.len(), warnings = warnings.len(), "catalog built");
        Ok(OperationCatalog {
            descriptors: self.pending.into_iter().map(Arc::new).collect(),
            warnings,
        })
    }
}

// ------------- OperationCatalog -------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub format_version: u32,
    pub descriptors: Vec<OperationDescriptor>,
}

#[derive(Debug, Clone)]
pub struct OperationCatalog {
    descriptors: Vec<Arc<OperationDescriptor>>,
    warnings: Vec<CatalogWarning>,
}

impl OperationCatalog {
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
    pub fn get(&self, id: OperationId) -> Option<&OperationDescriptor> {
        self.descriptors.get(id.0).map(|d| d.as_ref())
    }
    pub fn iter(&self) -> impl Iterator<Item = (OperationId, &OperationDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (OperationId(i), d.as_ref()))
    }
    /// All overloads sharing a name, in catalog order.
    pub fn overloads<'c>(
        &'c self,
        name: &'c str,
    ) -> impl Iterator<Item = (OperationId, &'c OperationDescriptor)> {
        self.iter().filter(move |(_, d)| d.name() == name)
    }
    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            format_version: CATALOG_FORMAT_VERSION,
            descriptors: self.descriptors.iter().map(|d| d.as_ref().clone()).collect(),
        }
    }
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }
    /// Rebuilds a catalog from a snapshot, validating it like a fresh registration.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self> {
        if snapshot.format_version != CATALOG_FORMAT_VERSION {
            return Err(ConcordError::Serialization(format!(
                "unsupported catalog format version {} (expected {})",
                snapshot.format_version, CATALOG_FORMAT_VERSION
            )));
        }
        let mut builder = CatalogBuilder::new();
        for descriptor in snapshot.descriptors {
            builder.register(descriptor);
        }
        builder.build()
    }
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }
    /// blake3 hash of the canonical snapshot, so regenerated catalogs can be compared.
    pub fn fingerprint(&self) -> Result<String> {
        let json = self.to_json()?;
        Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
