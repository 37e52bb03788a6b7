//! Run settings.
//!
//! Loaded with the `config` crate from an optional file (toml, json or yaml,
//! chosen by extension) with environment variables layered on top, e.g.
//! `CONCORD__GENERATION__SEED=7` or `CONCORD__WORKLOAD__SCENARIO=cancel`.
//! Every field has a default, so an empty environment yields a usable run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConcordError, Result};
use crate::generator::GeneratorConfig;
use crate::selector::SelectionCriteria;

pub const ENV_PREFIX: &str = "CONCORD";

/// Kind of statements a workload is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Read,
    Dml,
    Ddl,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Read, Complexity::Dml, Complexity::Ddl];
    pub fn label(self) -> &'static str {
        match self {
            Complexity::Read => "read",
            Complexity::Dml => "dml",
            Complexity::Ddl => "ddl",
        }
    }
}

/// How the system under test is exercised while the workload runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    #[default]
    Regression,
    Cancel,
    Kill,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Regression, Scenario::Cancel, Scenario::Kill];
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Regression => "regression",
            Scenario::Cancel => "cancel",
            Scenario::Kill => "kill",
        }
    }
}

macro_rules! label_enum {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.label())
            }
        }
        impl FromStr for $ty {
            type Err = ConcordError;
            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim().to_ascii_lowercase();
                $ty::ALL
                    .into_iter()
                    .find(|v| v.label() == wanted)
                    .ok_or_else(|| ConcordError::Config(format!("unknown {} '{}'", $what, s)))
            }
        }
    };
}
label_enum!(Complexity, "complexity");
label_enum!(Scenario, "scenario");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadSettings {
    pub complexity: Complexity,
    pub scenario: Scenario,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub seed: u64,
    pub max_expressions_per_descriptor: usize,
    pub max_combinations_per_descriptor: u64,
    pub time_budget_ms: Option<u64>,
    /// Number of threads the selection is split across.
    pub shards: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        Self {
            seed: generator.seed,
            max_expressions_per_descriptor: generator.max_expressions_per_descriptor,
            max_combinations_per_descriptor: generator.max_combinations_per_descriptor,
            time_budget_ms: generator.time_budget_ms,
            shards: 1,
        }
    }
}

impl GenerationSettings {
    pub fn generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: self.seed,
            max_expressions_per_descriptor: self.max_expressions_per_descriptor,
            max_combinations_per_descriptor: self.max_combinations_per_descriptor,
            time_budget_ms: self.time_budget_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// SQLite file for catalogs and runs; nothing is persisted when absent.
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generation: GenerationSettings,
    pub selection: SelectionCriteria,
    pub persistence: PersistenceSettings,
    pub workload: WorkloadSettings,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            generation: GenerationSettings::default(),
            selection: SelectionCriteria::default(),
            persistence: PersistenceSettings::default(),
            workload: WorkloadSettings::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Reads `path` if it exists, then the `CONCORD__*` environment.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.generation.shards == 0 {
            return Err(ConcordError::Config("generation.shards must be at least 1".into()));
        }
        if self.generation.max_expressions_per_descriptor == 0 {
            return Err(ConcordError::Config(
                "generation.max_expressions_per_descriptor must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
