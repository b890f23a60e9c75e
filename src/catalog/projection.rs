// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Projection of sky positions onto the orthographic disk centred on zenith.

use log::debug;
use marlu::{AzEl, RADec};

use super::{InputError, SourceCatalog};
use crate::lobes::circular::wrap_angle;

/// Something that knows where a sky position is in horizontal coordinates at
/// a particular time and place.
pub trait HorizontalTransform {
    fn to_azel(&self, radec: RADec) -> AzEl;
}

/// A source on the orthographic disk. Angles are in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedSource {
    pub ra: f64,
    pub dec: f64,

    /// Apparent flux density \[Jy\]
    pub flux: f64,

    /// Azimuth in [0, 2π).
    pub azimuth: f64,

    /// Orthographic radius, i.e. cos(altitude). 0 is zenith, 1 is the
    /// horizon.
    pub radius: f64,

    pub above_horizon: bool,
}

/// A catalogue projected onto the orthographic disk. This is computed once;
/// peeling lobes only ever selects subsets of it by index. Indices match the
/// [`SourceCatalog`] it came from.
#[derive(Clone, Debug)]
pub struct ProjectedCatalog {
    sources: Vec<ProjectedSource>,
}

impl ProjectedCatalog {
    pub fn new<T: HorizontalTransform + ?Sized>(
        catalog: &SourceCatalog,
        transform: &T,
    ) -> ProjectedCatalog {
        let sources = catalog
            .iter()
            .map(|s| {
                let radec = RADec::from_degrees(s.ra_deg, s.dec_deg);
                let azel = transform.to_azel(radec);
                ProjectedSource {
                    ra: radec.ra,
                    dec: radec.dec,
                    flux: s.apparent_flux,
                    azimuth: wrap_angle(azel.az),
                    radius: azel.el.cos(),
                    above_horizon: azel.el >= 0.0,
                }
            })
            .collect();
        ProjectedCatalog { sources }
    }

    /// Use sources that have already been projected.
    pub fn from_projected(sources: Vec<ProjectedSource>) -> ProjectedCatalog {
        ProjectedCatalog { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, index: usize) -> &ProjectedSource {
        &self.sources[index]
    }

    pub fn iter(&self) -> std::slice::Iter<ProjectedSource> {
        self.sources.iter()
    }

    /// The indices of all sources above the horizon. Sources below the
    /// horizon can't be in any lobe.
    pub fn visible_indices(&self) -> Result<Vec<usize>, InputError> {
        let visible: Vec<usize> = self
            .sources
            .iter()
            .enumerate()
            .filter(|(_, s)| s.above_horizon)
            .map(|(i, _)| i)
            .collect();
        debug!(
            "{} of {} sources are above the horizon",
            visible.len(),
            self.sources.len()
        );
        if visible.is_empty() {
            return Err(InputError::NothingAboveHorizon(self.sources.len()));
        }
        Ok(visible)
    }

    /// Gather a field of the sources at `indices`.
    pub(crate) fn gather<F: Fn(&ProjectedSource) -> f64>(&self, indices: &[usize], f: F) -> Vec<f64> {
        indices.iter().map(|&i| f(&self.sources[i])).collect()
    }

    pub(crate) fn flux_of(&self, indices: &[usize]) -> f64 {
        indices.iter().map(|&i| self.sources[i].flux).sum()
    }
}
