use std::io::Write;

use concord::error::ConcordError;
use concord::operation::Relevance;
use concord::settings::{Complexity, Scenario, Settings};

fn settings_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    file.write_all(contents.as_bytes()).expect("write");
    file
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let settings = Settings::load(path.to_str()).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.generation.shards, 1);
    assert_eq!(settings.generation.generator().max_expressions_per_descriptor, 24);
    assert!(settings.persistence.path.is_none());
    assert_eq!(settings.workload.complexity, Complexity::Read);
    assert_eq!(settings.workload.scenario, Scenario::Regression);
}

#[test]
fn file_values_override_defaults() {
    let file = settings_file(
        r#"
log_filter = "debug"

[generation]
seed = 99
shards = 4
time_budget_ms = 250

[selection]
min_relevance = "low"
require_reference_compatible = false

[persistence]
path = "runs.db"

[workload]
complexity = "dml"
scenario = "kill"
"#,
    );
    let settings = Settings::load(file.path().to_str()).expect("settings");
    assert_eq!(settings.log_filter, "debug");
    assert_eq!(settings.generation.seed, 99);
    assert_eq!(settings.generation.shards, 4);
    assert_eq!(settings.generation.generator().time_budget_ms, Some(250));
    // untouched keys keep their defaults
    assert_eq!(settings.generation.max_combinations_per_descriptor, 10_000);
    assert_eq!(settings.selection.min_relevance, Relevance::Low);
    assert!(!settings.selection.require_reference_compatible);
    assert!(!settings.selection.include_disabled);
    assert_eq!(settings.persistence.path.as_deref(), Some("runs.db"));
    assert_eq!(settings.workload.complexity, Complexity::Dml);
    assert_eq!(settings.workload.scenario, Scenario::Kill);
}

#[test]
fn zero_shards_is_a_config_error() {
    let file = settings_file("[generation]\nshards = 0\n");
    assert!(matches!(
        Settings::load(file.path().to_str()),
        Err(ConcordError::Config(_))
    ));
}

#[test]
fn unknown_labels_are_rejected() {
    let file = settings_file("[workload]\nscenario = \"explode\"\n");
    assert!(matches!(
        Settings::load(file.path().to_str()),
        Err(ConcordError::Config(_))
    ));
}

#[test]
fn labels_parse_and_print() {
    for complexity in Complexity::ALL {
        assert_eq!(complexity.to_string().parse::<Complexity>().expect("parse"), complexity);
    }
    for scenario in Scenario::ALL {
        assert_eq!(scenario.to_string().parse::<Scenario>().expect("parse"), scenario);
    }
    assert_eq!(" DDL ".parse::<Complexity>().expect("parse"), Complexity::Ddl);
    assert!("sideways".parse::<Scenario>().is_err());
}
