// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{panic::Location, path::Path};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FitsError {
    #[error("{location}: Couldn't open {file}: {fits_error}")]
    Open {
        file: Box<Path>,
        fits_error: Box<fitsio::errors::Error>,
        location: &'static Location<'static>,
    },

    #[error("{location}: {file}: Couldn't move to HDU {hdu_num}: {fits_error}")]
    Hdu {
        file: Box<Path>,
        hdu_num: usize,
        fits_error: Box<fitsio::errors::Error>,
        location: &'static Location<'static>,
    },

    #[error("{location}: {file} HDU {hdu_num}: Couldn't read column '{column}': {fits_error}")]
    Column {
        file: Box<Path>,
        hdu_num: usize,
        column: Box<str>,
        fits_error: Box<fitsio::errors::Error>,
        location: &'static Location<'static>,
    },
}
