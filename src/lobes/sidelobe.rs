// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Propose where the next grating lobe is.

use std::f64::consts::TAU;

use log::debug;

use super::{
    centroid::{com, CoordinateKind},
    LobeError,
};
use crate::{catalog::ProjectedCatalog, constants::NUM_AZIMUTH_BINS};

/// The number of sources in each of [`NUM_AZIMUTH_BINS`] equal-width azimuth
/// bins. Bin `i` covers [i·2π/N, (i+1)·2π/N).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AzimuthHistogram {
    counts: [usize; NUM_AZIMUTH_BINS],
}

impl AzimuthHistogram {
    const BIN_WIDTH: f64 = TAU / NUM_AZIMUTH_BINS as f64;

    /// Which bin does an azimuth in [0, 2π) belong to?
    pub fn bin_of(azimuth: f64) -> usize {
        ((azimuth / Self::BIN_WIDTH).floor() as usize).min(NUM_AZIMUTH_BINS - 1)
    }

    pub fn new(azimuths: &[f64]) -> AzimuthHistogram {
        let mut counts = [0; NUM_AZIMUTH_BINS];
        for &a in azimuths {
            counts[Self::bin_of(a)] += 1;
        }
        AzimuthHistogram { counts }
    }

    pub fn counts(&self) -> &[usize; NUM_AZIMUTH_BINS] {
        &self.counts
    }

    /// The fullest bin and its count. Ties go to the lowest bin.
    pub fn fullest(&self) -> (usize, usize) {
        self.counts
            .iter()
            .copied()
            .enumerate()
            .fold((0, self.counts[0]), |(best_bin, best_count), (bin, count)| {
                if count > best_count {
                    (bin, count)
                } else {
                    (best_bin, best_count)
                }
            })
    }
}

/// The outcome of looking for a sidelobe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SidelobeSearch {
    /// The orthographic position of a candidate sidelobe centre.
    Found { distance: f64, position_angle: f64 },

    /// No azimuth bin had enough sources to be a sidelobe.
    NotFound { max_count: usize },
}

/// Look for a sidelobe among the sources at `remaining`. The candidate centre
/// is the (flux-weighted if `weighted`) mean azimuth and radius of the
/// sources in the fullest azimuth bin, provided that bin has more than
/// `min_count` sources.
pub fn sidelobe_finder(
    catalog: &ProjectedCatalog,
    remaining: &[usize],
    weighted: bool,
    min_count: usize,
) -> Result<SidelobeSearch, LobeError> {
    let azimuths = catalog.gather(remaining, |s| s.azimuth);
    let histogram = AzimuthHistogram::new(&azimuths);
    let (bin, max_count) = histogram.fullest();
    debug!("Azimuth bin counts: {:?}", histogram.counts());
    if max_count <= min_count {
        return Ok(SidelobeSearch::NotFound { max_count });
    }

    let in_bin: Vec<usize> = remaining
        .iter()
        .zip(&azimuths)
        .filter(|&(_, &a)| AzimuthHistogram::bin_of(a) == bin)
        .map(|(&i, _)| i)
        .collect();
    if in_bin.is_empty() {
        return Err(LobeError::EmptyBin {
            bin,
            count: max_count,
        });
    }

    let bin_azimuths = catalog.gather(&in_bin, |s| s.azimuth);
    let bin_radii = catalog.gather(&in_bin, |s| s.radius);
    let fluxes = catalog.gather(&in_bin, |s| s.flux);
    let weights = if weighted && fluxes.iter().sum::<f64>() > 0.0 {
        Some(fluxes.as_slice())
    } else {
        None
    };
    // The bins never straddle 0/2π, so plain means are safe.
    let (position_angle, distance) =
        com(&bin_azimuths, &bin_radii, weights, CoordinateKind::Cartesian)?;
    debug!(
        "Sidelobe candidate in bin {bin} ({max_count} sources): d = {distance:.3}, PA = {:.2}°",
        position_angle.to_degrees()
    );

    Ok(SidelobeSearch::Found {
        distance,
        position_angle,
    })
}
