//! Concord – catalog-driven expression generation for output-consistency testing.
//!
//! Output-consistency testing runs the same SQL expressions on a reference
//! engine and on the system under test, then compares the results. This crate
//! produces those expressions: it keeps a catalog of operation descriptors,
//! resolves which test values may fill each parameter, and combines them into
//! executable expressions.
//!
//! * A [`characteristic::Characteristic`] is a semantic property of a test
//!   value, such as `NULL`, `MAX_VALUE` or `INTERVAL_WITH_MONTHS`.
//! * A [`param::ParameterSpec`] names the [`datatype::ValueKinds`] a slot
//!   accepts and the characteristic combinations it must never receive.
//! * An [`operation::OperationDescriptor`] describes one function or operator
//!   overload: how it renders, its parameters, return type, relevance tier and
//!   whether the reference engine can judge it.
//! * The [`catalog::OperationCatalog`] is the ordered, validated, immutable
//!   registry of descriptors.
//!
//! ## Modules
//! * [`resolver`] – Decides whether a candidate value may fill a parameter.
//! * [`selector`] – Filters the catalog by enablement, relevance and reference compatibility.
//! * [`generator`] – Combines accepted candidates into rendered expressions,
//!   deterministically per seed.
//! * [`interface`] – Runs a generation across threads with cooperative cancellation.
//! * [`pool`] – The value pool interface plus a standard static pool.
//! * [`operations`] – The built-in date/time catalog section.
//! * [`evaluate`] – The boundary towards a consistency evaluator.
//! * [`persist`] – SQLite storage of catalog snapshots and generated runs.
//! * [`settings`] – Layered file and environment configuration.
//!
//! ## Quick Start
//! ```
//! use concord::generator::{ExpressionGenerator, GeneratorConfig};
//! use concord::operations::standard_catalog;
//! use concord::pool::StaticValuePool;
//! use concord::selector::{select, SelectionCriteria};
//!
//! let catalog = standard_catalog().unwrap();
//! let selection = select(&catalog, &SelectionCriteria::default());
//! let pool = StaticValuePool::standard();
//! let report = ExpressionGenerator::new(&pool, GeneratorConfig::with_seed(7))
//!     .generate(&selection)
//!     .unwrap();
//! assert!(report.emitted() > 0);
//! assert!(report.syntax_lines().iter().any(|s| s.starts_with("date_trunc(")));
//! ```
//!
//! ## Determinism
//! The same seed and catalog always yield the same ordered expressions, no
//! matter how many shards the run is split into. A time budget is the one
//! exception: a descriptor that hits it is reported as truncated.

pub mod catalog;
pub mod characteristic;
pub mod datatype;
pub mod error;
pub mod evaluate;
pub mod generator;
pub mod interface;
pub mod operation;
pub mod operations;
pub mod param;
pub mod persist;
pub mod pool;
pub mod report;
pub mod resolver;
pub mod selector;
pub mod settings;

pub use error::{ConcordError, Result};
