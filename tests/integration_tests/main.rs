// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod find_lobes;
mod verify_catalogue;

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    process::Output,
    str::from_utf8,
};

use assert_cmd::{output::OutputError, Command};

use mwa_lobe_finder::Source;

const OBSID: &str = "1090008640";

fn lobe_finder() -> Command {
    Command::cargo_bin("lobe-finder").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

fn source(id: String, ra_deg: f64, dec_deg: f64, apparent_flux: f64) -> Source {
    Source {
        id,
        ra_deg,
        dec_deg,
        apparent_flux,
        err_flux: Some(0.01),
    }
}

/// Sources that, seen from the MWA at LST 0 with a zenith pointing, make a
/// primary lobe around RA 0, a grating lobe at an azimuth of ~113°, two
/// bright sources and some faint ones.
fn get_lobes_catalogue() -> Vec<Source> {
    let primary = (0..20).map(|i| {
        source(
            format!("primary_{i}"),
            (358.5 + (i % 5) as f64 * 0.75).rem_euclid(360.0),
            -28.2 + (i / 5) as f64,
            1.0,
        )
    });
    let grating = (0..15).map(|i| {
        source(
            format!("grating_{i}"),
            44.0 + (i % 5) as f64 * 0.5,
            -35.8 + (i / 5) as f64 * 0.8,
            0.5,
        )
    });
    let bright = [
        source("bright_a".into(), 300.0, -30.0, 3.0),
        source("bright_b".into(), 0.0, -70.0, 2.0),
    ];
    let faint = [
        (330.0, -10.0),
        (20.0, 10.0),
        (340.0, -60.0),
        (15.0, -50.0),
        (300.0, -60.0),
        (270.0, -20.0),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (ra, dec))| source(format!("faint_{i}"), ra, dec, 0.1));

    primary.chain(grating).chain(bright).chain(faint).collect()
}

/// Write the test catalogue as JSON or YAML, depending on the extension.
fn write_lobes_catalogue(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut f = BufWriter::new(File::create(&path).unwrap());
    let sources = get_lobes_catalogue();
    if name.ends_with(".json") {
        serde_json::to_writer(&mut f, &sources).unwrap();
    } else {
        serde_yaml::to_writer(&mut f, &sources).unwrap();
    }
    f.flush().unwrap();
    path
}
