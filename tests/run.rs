//! Integration tests for the `run` command.
use chargepark::cli::{RunOpts, handle_run_command};
use chargepark::settings::Settings;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

/// Get the path to the example scenario.
fn get_scenario_dir() -> PathBuf {
    PathBuf::from("scenarios/battery")
}

/// An integration test for the `run` command.
#[test]
fn test_handle_run_command() {
    unsafe { std::env::set_var("CHARGEPARK_LOG_LEVEL", "off") };

    // Save results to non-existent directory to check that directory creation works
    let tempdir = tempdir().unwrap();
    let output_dir = tempdir.path().join("results");
    let opts = RunOpts {
        output_dir: Some(output_dir.clone()),
        overwrite: false,
        debug_model: true,
    };
    handle_run_command(&get_scenario_dir(), &opts, Some(Settings::default())).unwrap();

    for file_name in [
        "energy_totals.csv",
        "finance.csv",
        "debug_hourly_flows.csv",
        "metadata.toml",
        "chargepark_info.log",
        "chargepark_error.log",
    ] {
        assert!(output_dir.join(file_name).is_file(), "{file_name} missing");
    }

    // One header plus one row per hour of the year
    let flows = fs::read_to_string(output_dir.join("debug_hourly_flows.csv")).unwrap();
    assert_eq!(flows.lines().count(), 365 * 24 + 1);

    // Second time will fail because the output folder is not empty
    assert!(
        handle_run_command(&get_scenario_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .to_string()
            .starts_with("Failed to create output directory")
    );

    // With overwrite set, the logger has already been initialised
    let opts = RunOpts {
        overwrite: true,
        ..opts
    };
    assert_eq!(
        handle_run_command(&get_scenario_dir(), &opts, Some(Settings::default()))
            .unwrap_err()
            .to_string(),
        "Failed to initialise logging."
    );
}
