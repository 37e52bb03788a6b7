use std::io::Write;

use concord::settings::{Scenario, Settings};

// the only test in this binary, so nothing else reads the environment meanwhile
#[test]
fn environment_overrides_the_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tempfile");
    file.write_all(
        br#"
log_filter = "info"

[generation]
seed = 5
shards = 3

[workload]
scenario = "kill"
"#,
    )
    .expect("write");

    unsafe {
        std::env::set_var("CONCORD__GENERATION__SEED", "77");
        std::env::set_var("CONCORD__LOG_FILTER", "debug");
    }
    let loaded = Settings::load(file.path().to_str());
    unsafe {
        std::env::remove_var("CONCORD__GENERATION__SEED");
        std::env::remove_var("CONCORD__LOG_FILTER");
    }

    let settings = loaded.expect("settings");
    assert_eq!(settings.generation.seed, 77);
    assert_eq!(settings.log_filter, "debug");
    // keys the environment leaves alone still come from the file
    assert_eq!(settings.generation.shards, 3);
    assert_eq!(settings.workload.scenario, Scenario::Kill);

    let unset = Settings::load(file.path().to_str()).expect("settings");
    assert_eq!(unset.generation.seed, 5);
    assert_eq!(unset.log_filter, "info");
}
