// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Read Aegean-style component tables.

use std::path::Path;

use fitsio::{hdu::HduInfo, FitsFile};
use log::debug;

use super::{ReadCatalogError, Source};
use crate::io::read::fits::{fits_open_hdu_at, fits_read_col};

const RA_COLS: &[&str] = &["ra", "RA", "RAJ2000"];
const DEC_COLS: &[&str] = &["dec", "DEC", "DEJ2000"];
const FLUX_COLS: &[&str] = &["int_flux", "INT_FLUX", "flux"];
const ERR_FLUX_COLS: &[&str] = &["err_int_flux", "ERR_INT_FLUX", "err_flux"];
const ID_COLS: &[&str] = &["uuid", "name", "NAME"];

struct Table<'a> {
    file: &'a Path,
    fptr: FitsFile,
    hdu: fitsio::hdu::FitsHdu,
    col_names: Vec<String>,
    num_rows: usize,
}

impl Table<'_> {
    /// The first of `candidates` that's a column in this table.
    fn find_col(&self, candidates: &'static [&'static str]) -> Option<&'static str> {
        candidates
            .iter()
            .find(|c| self.col_names.iter().any(|name| name == *c))
            .copied()
    }

    fn read_optional<T: fitsio::tables::ReadsCol>(
        &mut self,
        candidates: &'static [&'static str],
    ) -> Result<Option<Vec<T>>, ReadCatalogError> {
        let col = match self.find_col(candidates) {
            Some(c) => c,
            None => {
                debug!("None of {candidates:?} were available columns");
                return Ok(None);
            }
        };
        let values: Vec<T> = fits_read_col(self.file, &mut self.fptr, &self.hdu, col)?;
        if values.len() != self.num_rows {
            return Err(ReadCatalogError::ColumnLength {
                file: self.file.to_path_buf(),
                column: col,
                got: values.len(),
                expected: self.num_rows,
            });
        }
        Ok(Some(values))
    }

    fn read_mandatory<T: fitsio::tables::ReadsCol>(
        &mut self,
        candidates: &'static [&'static str],
    ) -> Result<Vec<T>, ReadCatalogError> {
        self.read_optional(candidates)?
            .ok_or_else(|| ReadCatalogError::MissingColumn {
                file: self.file.to_path_buf(),
                candidates,
            })
    }
}

pub(super) fn parse_catalog(file: &Path) -> Result<Vec<Source>, ReadCatalogError> {
    // The table lives in HDU 2.
    let (fptr, hdu) = fits_open_hdu_at(file, 1)?;

    let (col_names, num_rows) = match &hdu.info {
        HduInfo::TableInfo {
            column_descriptions,
            num_rows,
        } => (
            column_descriptions
                .iter()
                .map(|cd| cd.name.clone())
                .collect::<Vec<_>>(),
            *num_rows,
        ),
        HduInfo::ImageInfo { .. } | HduInfo::AnyInfo => {
            return Err(ReadCatalogError::NotATable {
                file: file.to_path_buf(),
            })
        }
    };
    debug!("Catalogue columns: {col_names:?}");

    let mut table = Table {
        file,
        fptr,
        hdu,
        col_names,
        num_rows,
    };
    let ras: Vec<f64> = table.read_mandatory(RA_COLS)?;
    let decs: Vec<f64> = table.read_mandatory(DEC_COLS)?;
    let fluxes: Vec<f64> = table.read_mandatory(FLUX_COLS)?;
    let err_fluxes: Option<Vec<f64>> = table.read_optional(ERR_FLUX_COLS)?;
    let ids: Vec<String> = match table.read_optional(ID_COLS)? {
        Some(ids) => ids,
        None => (0..num_rows).map(|i| i.to_string()).collect(),
    };

    let sources = ids
        .into_iter()
        .zip(ras)
        .zip(decs)
        .zip(fluxes)
        .enumerate()
        .map(|(i, (((id, ra_deg), dec_deg), apparent_flux))| Source {
            id,
            ra_deg,
            dec_deg,
            apparent_flux,
            err_flux: err_fluxes.as_ref().map(|e| e[i]),
        })
        .collect();

    Ok(sources)
}
