// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all lobe-finder-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::find_lobes::FindLobesArgsError;
use crate::{
    catalog::{InputError, ReadCatalogError},
    io::{
        read::fits::FitsError,
        write::{FileWriteError, WriteError},
    },
    params::FindLobesError,
    plotting::PlotError,
};

const FIND_LOBES_HELP: &str = "lobe-finder find-lobes --help";
const VERIFY_HELP: &str = "lobe-finder verify-catalogue --help";

/// The *only* publicly visible error from lobe-finder. Each error message
/// should point to where more help is, unless it's "generic".
#[derive(Error, Debug)]
pub enum LobeFinderError {
    /// An error related to find-lobes arguments.
    #[error("{0}\n\nSee for more info: {FIND_LOBES_HELP}")]
    FindLobes(String),

    /// A problem with the sources or the observation that prevents any lobes
    /// being found.
    #[error("{0}\n\nSee for more info: {FIND_LOBES_HELP}")]
    Input(String),

    /// Generic error surrounding source catalogues.
    #[error("{0}\n\nSee for more info: {VERIFY_HELP}")]
    Catalogue(String),

    /// An error related to mwalib.
    #[error("{0}\n\nThe pointing and LST may be given on the command line instead of with a metafits file. See for more info: {FIND_LOBES_HELP}")]
    Mwalib(String),

    /// An error related to argument files.
    #[error("{0}\n\nArgument files use the same names as the command-line arguments. Use --save-toml to see an example.")]
    ArgFile(String),

    /// An error related to writing output files.
    #[error("{0}")]
    Write(String),

    /// An error related to plotting.
    #[error("{0}")]
    Plot(String),

    /// A cfitsio error. Because these are usually quite spartan, some
    /// suggestions are provided here.
    #[error("cfitsio error: {0}\n\nIf you don't know what this means, try turning up verbosity (-v or -vv).")]
    Cfitsio(String),

    /// A generic error that can't be clarified further with documentation, e.g.
    /// IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<FindLobesArgsError> for LobeFinderError {
    fn from(e: FindLobesArgsError) -> Self {
        Self::FindLobes(e.to_string())
    }
}

impl From<FindLobesError> for LobeFinderError {
    fn from(e: FindLobesError) -> Self {
        match e {
            FindLobesError::Input(e) => Self::from(e),
            FindLobesError::Write(e) => Self::from(e),
            FindLobesError::Plot(e) => Self::from(e),
        }
    }
}

impl From<InputError> for LobeFinderError {
    fn from(e: InputError) -> Self {
        Self::Input(e.to_string())
    }
}

impl From<ReadCatalogError> for LobeFinderError {
    fn from(e: ReadCatalogError) -> Self {
        let s = e.to_string();
        match e {
            ReadCatalogError::Invalid(e) => Self::from(e),
            ReadCatalogError::Fits(e) => Self::from(e),
            ReadCatalogError::IO(_) => Self::Generic(s),
            _ => Self::Catalogue(s),
        }
    }
}

impl From<FitsError> for LobeFinderError {
    fn from(e: FitsError) -> Self {
        Self::Cfitsio(e.to_string())
    }
}

impl From<WriteError> for LobeFinderError {
    fn from(e: WriteError) -> Self {
        match e {
            WriteError::FileWrite(e) => Self::from(e),
            WriteError::IO(e) => Self::from(e),
            _ => Self::Write(e.to_string()),
        }
    }
}

impl From<FileWriteError> for LobeFinderError {
    fn from(e: FileWriteError) -> Self {
        Self::Write(e.to_string())
    }
}

impl From<PlotError> for LobeFinderError {
    fn from(e: PlotError) -> Self {
        match e {
            PlotError::FileWrite(e) => Self::from(e),
            _ => Self::Plot(e.to_string()),
        }
    }
}

impl From<std::io::Error> for LobeFinderError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<mwalib::MwalibError> for LobeFinderError {
    fn from(e: mwalib::MwalibError) -> Self {
        Self::Mwalib(e.to_string())
    }
}
