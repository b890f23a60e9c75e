// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to verify source catalogue files.

use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use log::info;

use super::common::CATALOGUE_TYPE_HELP;
use crate::{
    catalog::{read_catalog_file, CatalogType, CATALOG_TYPES_COMMA_SEPARATED},
    LobeFinderError,
};

/// Verify that source catalogues can be read by lobe-finder.
#[derive(Parser, Debug)]
pub(super) struct VerifyCatalogueArgs {
    /// Path to the catalogue(s) to be verified.
    #[clap(name = "CATALOGUES", parse(from_os_str), required = true)]
    catalogues: Vec<PathBuf>,

    #[clap(short = 'i', long, help = CATALOGUE_TYPE_HELP.as_str())]
    catalogue_type: Option<String>,
}

impl VerifyCatalogueArgs {
    /// Read and print stats out for each catalogue. If a catalogue couldn't be
    /// read, print the error, and continue trying to read the others.
    ///
    /// If the catalogue type is provided, then assume that all catalogues have
    /// that type.
    pub(super) fn run(&self) -> Result<(), LobeFinderError> {
        let catalogue_type = match &self.catalogue_type {
            Some(t) => Some(CatalogType::from_str(&t.to_lowercase()).map_err(|_| {
                LobeFinderError::Catalogue(format!(
                    "Catalogue type '{t}' is not recognised. Supported types: {}",
                    *CATALOG_TYPES_COMMA_SEPARATED
                ))
            })?),
            None => None,
        };

        for catalogue in &self.catalogues {
            info!("{}:", catalogue.display());

            let (catalog, catalog_type) = match read_catalog_file(catalogue, catalogue_type) {
                Ok(c) => c,
                Err(e) => {
                    info!("{}", e);
                    info!("");
                    continue;
                }
            };
            let brightest = catalog.brightest();
            info!("    {catalog_type} catalogue");
            info!(
                "    {} sources, {:.3} Jy total",
                catalog.len(),
                catalog.total_flux()
            );
            info!(
                "    Brightest: {} ({:.3} Jy at RA {:.4}°, Dec {:.4}°)",
                brightest.id, brightest.apparent_flux, brightest.ra_deg, brightest.dec_deg
            );
            info!("");
        }

        Ok(())
    }
}
