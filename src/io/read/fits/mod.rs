// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Thin wrappers over `fitsio` that remember which file, HDU and column an
//! error came from, as well as where in lobe-finder the read was attempted.

mod error;

pub use error::FitsError;

use std::{panic::Location, path::Path};

use fitsio::{hdu::FitsHdu, tables::ReadsCol, FitsFile};

/// Open a FITS file and move to the HDU at `hdu_index` (0 is the primary HDU).
#[track_caller]
pub(crate) fn fits_open_hdu_at(
    file: &Path,
    hdu_index: usize,
) -> Result<(FitsFile, FitsHdu), FitsError> {
    let location = Location::caller();
    let mut fptr = FitsFile::open(file).map_err(|e| FitsError::Open {
        file: file.into(),
        fits_error: Box::new(e),
        location,
    })?;
    let hdu = fptr.hdu(hdu_index).map_err(|e| FitsError::Hdu {
        file: file.into(),
        hdu_num: hdu_index + 1,
        fits_error: Box::new(e),
        location,
    })?;
    Ok((fptr, hdu))
}

/// Read a whole column of a table HDU. `file` is the path that `fptr` was
/// opened with.
#[track_caller]
pub(crate) fn fits_read_col<T: ReadsCol>(
    file: &Path,
    fptr: &mut FitsFile,
    hdu: &FitsHdu,
    column: &str,
) -> Result<Vec<T>, FitsError> {
    let location = Location::caller();
    hdu.read_col(fptr, column).map_err(|e| FitsError::Column {
        file: file.into(),
        hdu_num: hdu.number + 1,
        column: column.into(),
        fits_error: Box::new(e),
        location,
    })
}
