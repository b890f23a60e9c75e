// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::io::Write;

use tempfile::TempDir;

use crate::{get_cmd_output, lobe_finder, write_lobes_catalogue};

#[test]
fn test_verify_catalogues() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let good = write_lobes_catalogue(tmp_dir.path(), "sources.yaml");
    let bad = tmp_dir.path().join("bad.json");
    let mut f = std::fs::File::create(&bad).unwrap();
    f.write_all(br#"[{"id": "x", "ra": 10.0, "dec": -27.0, "flux": -1.0}]"#)
        .unwrap();
    drop(f);

    let cmd = lobe_finder()
        .args([
            "verify-catalogue",
            &bad.display().to_string(),
            &good.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "verify-catalogue failed: {}", cmd.err().unwrap());
    let (stdout, stderr) = get_cmd_output(cmd);
    assert!(stderr.is_empty(), "stderr wasn't empty: {stderr}");
    // The bad catalogue is reported, and the good one is still read.
    assert!(stdout.contains("invalid apparent flux density"), "{stdout}");
    assert!(stdout.contains("yaml catalogue"), "{stdout}");
    assert!(stdout.contains("43 sources, 33.100 Jy total"), "{stdout}");
    assert!(stdout.contains("Brightest: bright_a"), "{stdout}");
}

#[test]
fn test_verify_with_forced_type() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let json = write_lobes_catalogue(tmp_dir.path(), "sources.json");
    let renamed = tmp_dir.path().join("sources.txt");
    std::fs::rename(json, &renamed).unwrap();

    let cmd = lobe_finder()
        .args([
            "verify-catalogue",
            "-i",
            "json",
            &renamed.display().to_string(),
        ])
        .ok();
    assert!(cmd.is_ok(), "verify-catalogue failed: {}", cmd.err().unwrap());
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("json catalogue"), "{stdout}");

    let cmd = lobe_finder()
        .args(["verify-catalogue", "-i", "votable", &renamed.display().to_string()])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("'votable' is not recognised"), "{stderr}");
}
