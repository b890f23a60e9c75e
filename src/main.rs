// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The main lobe-finder binary.

use clap::Parser;

use mwa_lobe_finder::LobeFinderCli;

fn main() {
    // Run lobe-finder, only returning an error to print if one occurred.
    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), mwa_lobe_finder::LobeFinderError> {
    LobeFinderCli::parse().run()
}
