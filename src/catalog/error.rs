// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

use super::CATALOG_TYPES_COMMA_SEPARATED;
use crate::io::read::fits::FitsError;

/// Problems with the contents of a catalogue or the observation that make
/// finding lobes pointless. These are checked before any peeling happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("The source catalogue is empty")]
    EmptyCatalogue,

    #[error("Source id '{0}' appears more than once in the catalogue")]
    DuplicateId(String),

    #[error("Source '{id}' has an invalid apparent flux density ({flux} Jy); it must be finite and non-negative")]
    BadFlux { id: String, flux: f64 },

    #[error("Source '{id}' has invalid coordinates: RA {ra}°, Dec {dec}° (0° <= RA < 360°, -90° <= Dec <= 90°)")]
    BadCoordinates { id: String, ra: f64, dec: f64 },

    #[error("The total apparent flux density of all sources above the horizon is zero; there is nothing to find")]
    NoFlux,

    #[error("None of the {0} sources in the catalogue are above the horizon")]
    NothingAboveHorizon(usize),

    #[error("Invalid pointing: azimuth {az}°, altitude {alt}° (the azimuth must be finite and 0° <= Alt <= 90°)")]
    BadPointing { az: f64, alt: f64 },
}

/// Errors associated with reading a source catalogue file.
#[derive(Error, Debug)]
pub enum ReadCatalogError {
    #[error("Catalogue file '{0}' doesn't exist")]
    DoesntExist(PathBuf),

    #[error("Couldn't determine the type of catalogue '{0}'. Specify one of: {}", *CATALOG_TYPES_COMMA_SEPARATED)]
    UnknownType(PathBuf),

    #[error("'{file}': None of the columns {candidates:?} are present")]
    MissingColumn {
        file: PathBuf,
        candidates: &'static [&'static str],
    },

    #[error("'{file}': HDU 2 is not a binary table")]
    NotATable { file: PathBuf },

    #[error("'{file}': Column '{column}' has {got} rows, but the table has {expected}")]
    ColumnLength {
        file: PathBuf,
        column: &'static str,
        got: usize,
        expected: usize,
    },

    #[error(transparent)]
    Invalid(#[from] InputError),

    #[error(transparent)]
    Fits(#[from] FitsError),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
