// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Source catalogues, e.g. the component tables that Aegean produces from an
//! MWA snapshot image.

mod error;
mod fits;
mod projection;
mod read;

pub use error::{InputError, ReadCatalogError};
pub use projection::{HorizontalTransform, ProjectedCatalog, ProjectedSource};
pub use read::read_catalog_file;

use std::{collections::HashSet, ops::Index};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use vec1::Vec1;

/// All of the supported catalogue types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
pub enum CatalogType {
    #[strum(serialize = "fits")]
    Fits,

    #[strum(serialize = "json")]
    Json,

    #[strum(serialize = "yaml")]
    Yaml,
}

lazy_static::lazy_static! {
    pub static ref CATALOG_TYPES_COMMA_SEPARATED: String = CatalogType::iter().join(", ");
}

/// A detected source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,

    /// Right ascension \[degrees\]
    #[serde(rename = "ra")]
    pub ra_deg: f64,

    /// Declination \[degrees\]
    #[serde(rename = "dec")]
    pub dec_deg: f64,

    /// Apparent (integrated) flux density \[Jy\]
    #[serde(rename = "flux")]
    pub apparent_flux: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_flux: Option<f64>,
}

impl Source {
    fn validate(&self) -> Result<(), InputError> {
        if !self.apparent_flux.is_finite() || self.apparent_flux < 0.0 {
            return Err(InputError::BadFlux {
                id: self.id.clone(),
                flux: self.apparent_flux,
            });
        }
        if !(0.0..360.0).contains(&self.ra_deg) || !(-90.0..=90.0).contains(&self.dec_deg) {
            return Err(InputError::BadCoordinates {
                id: self.id.clone(),
                ra: self.ra_deg,
                dec: self.dec_deg,
            });
        }
        Ok(())
    }
}

/// A validated, non-empty catalogue of sources with unique ids. Sources keep
/// the order they were read in; lobes refer to them by index.
#[derive(Clone, Debug)]
pub struct SourceCatalog {
    sources: Vec1<Source>,
}

impl SourceCatalog {
    pub fn new(sources: Vec<Source>) -> Result<SourceCatalog, InputError> {
        let sources = Vec1::try_from_vec(sources).map_err(|_| InputError::EmptyCatalogue)?;

        let mut ids = HashSet::with_capacity(sources.len());
        for source in &sources {
            source.validate()?;
            if !ids.insert(source.id.as_str()) {
                return Err(InputError::DuplicateId(source.id.clone()));
            }
        }

        Ok(SourceCatalog { sources })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Always false; a catalogue can't be constructed without sources.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<Source> {
        self.sources.iter()
    }

    pub fn total_flux(&self) -> f64 {
        self.sources.iter().map(|s| s.apparent_flux).sum()
    }

    /// The source with the largest apparent flux density.
    pub fn brightest(&self) -> &Source {
        self.sources
            .iter()
            .max_by(|a, b| a.apparent_flux.total_cmp(&b.apparent_flux))
            .unwrap_or_else(|| self.sources.first())
    }
}

impl Index<usize> for SourceCatalog {
    type Output = Source;

    fn index(&self, index: usize) -> &Source {
        &self.sources[index]
    }
}

impl<'a> IntoIterator for &'a SourceCatalog {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}
