// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::Path;

use approx::assert_abs_diff_eq;
use tempfile::TempDir;

use crate::{get_cmd_output, lobe_finder, write_lobes_catalogue, OBSID};

fn observation_args(catalogue: &Path) -> Vec<String> {
    #[rustfmt::skip]
    let args = [
        "find-lobes",
        "--catalogue", &catalogue.display().to_string(),
        "--obsid", OBSID,
        "--pointing-az", "0",
        "--pointing-alt", "90",
        "--lst", "0",
    ];
    args.into_iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_find_lobes() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_lobes_catalogue(tmp_dir.path(), "sources.json");
    let commands = tmp_dir.path().join(format!("{OBSID}_position.txt"));
    let summary = tmp_dir.path().join("lobes.yaml");

    let cmd = lobe_finder()
        .args(observation_args(&catalogue))
        .args([
            "-s",
            "30",
            "-o",
            &commands.display().to_string(),
            "--output-summary",
            &summary.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "find-lobes failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    assert!(stdout.contains("Found the primary lobe with 20 sources"), "{stdout}");
    assert!(stdout.contains("lobe-finder find-lobes complete."), "{stdout}");

    let contents = std::fs::read_to_string(&commands).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 12, "{contents}");
    let names: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.split(" -name ").nth(1))
        .filter_map(|rest| rest.split(' ').next())
        .collect();
    assert_eq!(
        names,
        vec![
            "1090008640_primary",
            "1090008640_sidelobe1",
            "1090008640_bright1",
            "1090008640_bright2"
        ]
    );
    assert!(lines[0].starts_with("chgcentre 1090008640.ms "));
    assert!(lines[1].contains("-scale 30asec"));
    assert!(lines[1].ends_with(" 1090008640.ms"));
    assert_eq!(lines[2], "chgcentre -zenith 1090008640.ms");

    let summary: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(summary["obsid"].as_u64(), Some(1090008640));
    assert_eq!(summary["lobes"].as_sequence().unwrap().len(), 4);
    assert_abs_diff_eq!(
        summary["total_flux"].as_f64().unwrap(),
        33.1,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(
        summary["captured_flux"].as_f64().unwrap(),
        32.5,
        epsilon = 1e-9
    );
}

#[test]
fn test_find_lobes_yaml_catalogue_and_list_sources() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_lobes_catalogue(tmp_dir.path(), "sources.yaml");
    let commands = tmp_dir.path().join("commands.txt");
    let summary = tmp_dir.path().join("lobes.json");

    let cmd = lobe_finder()
        .args(observation_args(&catalogue))
        .args([
            "--scale",
            "60",
            "--list-sources",
            "--output-commands",
            &commands.display().to_string(),
            "--output-summary",
            &summary.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "find-lobes failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("grating_14"), "{stdout}");

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary).unwrap()).unwrap();
    let ids = summary["lobes"][2]["source_ids"].as_array().unwrap();
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0], "bright_a");
}

#[test]
fn test_dry_run_writes_nothing() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_lobes_catalogue(tmp_dir.path(), "sources.json");
    let commands = tmp_dir.path().join("commands.txt");

    let cmd = lobe_finder()
        .args(observation_args(&catalogue))
        .args(["-s", "30", "-o", &commands.display().to_string(), "--dry-run"])
        .ok();
    assert!(cmd.is_ok(), "find-lobes failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Dry run -- exiting now."), "{stdout}");
    assert!(!commands.exists());
}

#[test]
fn test_save_toml_reproduces_the_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_lobes_catalogue(tmp_dir.path(), "sources.json");
    let first = tmp_dir.path().join("first.txt");
    let second = tmp_dir.path().join("second.txt");
    let toml = tmp_dir.path().join("args.toml");

    let cmd = lobe_finder()
        .args(observation_args(&catalogue))
        .args([
            "-s",
            "30",
            "-o",
            &first.display().to_string(),
            "--save-toml",
            &toml.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "find-lobes failed: {}", cmd.err().unwrap());
    assert!(toml.exists());

    // Everything comes from the argument file except the output path.
    let cmd = lobe_finder()
        .args([
            "find-lobes",
            &toml.display().to_string(),
            "-o",
            &second.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "find-lobes failed: {}", cmd.err().unwrap());
    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );
}

#[test]
fn test_missing_scale_is_an_error() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = write_lobes_catalogue(tmp_dir.path(), "sources.json");

    let cmd = lobe_finder().args(observation_args(&catalogue)).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No pixel scale was given"), "{stderr}");
    assert!(stderr.contains("lobe-finder find-lobes --help"), "{stderr}");
}

#[test]
fn test_missing_catalogue_is_an_error() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let catalogue = tmp_dir.path().join("nothing_here.fits");

    let cmd = lobe_finder()
        .args(observation_args(&catalogue))
        .args(["-s", "30"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("nothing_here.fits"), "{stderr}");
}

#[test]
fn test_help_is_shown() {
    let cmd = lobe_finder().args(["find-lobes", "--help"]).ok();
    assert!(cmd.is_ok());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("--pointing-az"), "{stdout}");
    assert!(stdout.contains("LOBE SEARCH"), "{stdout}");
}
