// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Centroids of point sets, including sets of sky positions that sit either
//! side of RA = 0.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::{
    circular::{reflect_from_contiguous, reflect_to_contiguous, straddles_wrap, wrap_angle},
    CentroidError,
};

/// How the coordinates given to [`com`] should be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateKind {
    /// `x` and `y` are plain Cartesian coordinates.
    Cartesian,

    /// `x` is a radius and `y` an azimuth \[radians\].
    Polar,
}

fn check_inputs(x: &[f64], y: &[f64], weights: Option<&[f64]>) -> Result<(), CentroidError> {
    if x.len() != y.len() {
        return Err(CentroidError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.is_empty() {
        return Err(CentroidError::Empty);
    }
    if let Some(w) = weights {
        if w.len() != x.len() {
            return Err(CentroidError::WeightsMismatch {
                weights: w.len(),
                points: x.len(),
            });
        }
        let sum: f64 = w.iter().sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(CentroidError::BadWeights(sum));
        }
    }

    Ok(())
}

/// The (optionally weighted) centre of mass of a set of points.
///
/// For [`CoordinateKind::Polar`], the points are converted to Cartesian
/// coordinates before averaging, and the result is converted back; the
/// returned azimuth is in [0, 2π). The weighted polar centroid is
///
/// `R = |Σ wᵢ rᵢ ûᵢ| / Σ wᵢ`, `φ = atan2(Σ wᵢ rᵢ sin φᵢ, Σ wᵢ rᵢ cos φᵢ)`.
pub fn com(
    x: &[f64],
    y: &[f64],
    weights: Option<&[f64]>,
    kind: CoordinateKind,
) -> Result<(f64, f64), CentroidError> {
    check_inputs(x, y, weights)?;

    let weight = |i: usize| weights.map(|w| w[i]).unwrap_or(1.0);
    let weight_sum = match weights {
        Some(w) => w.iter().sum(),
        None => x.len() as f64,
    };

    match kind {
        CoordinateKind::Cartesian => {
            let (sum_x, sum_y) = x
                .iter()
                .zip(y)
                .enumerate()
                .fold((0.0, 0.0), |(sx, sy), (i, (&x, &y))| {
                    (sx + weight(i) * x, sy + weight(i) * y)
                });
            Ok((sum_x / weight_sum, sum_y / weight_sum))
        }

        CoordinateKind::Polar => {
            let (sum_x, sum_y) = x
                .iter()
                .zip(y)
                .enumerate()
                .fold((0.0, 0.0), |(sx, sy), (i, (&r, &phi))| {
                    let (s, c) = phi.sin_cos();
                    (sx + weight(i) * r * c, sy + weight(i) * r * s)
                });
            let radius = sum_x.hypot(sum_y) / weight_sum;
            let azimuth = wrap_angle(sum_y.atan2(sum_x));
            Ok((radius, azimuth))
        }
    }
}

/// The great-circle distance between two sky positions, using the haversine
/// formula. All values are in degrees.
pub fn gcd(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> f64 {
    let (ra1, dec1) = (ra1_deg.to_radians(), dec1_deg.to_radians());
    let (ra2, dec2) = (ra2_deg.to_radians(), dec2_deg.to_radians());
    let hav_dec = ((dec2 - dec1) / 2.0).sin().powi(2);
    let hav_ra = ((ra2 - ra1) / 2.0).sin().powi(2);
    let a = (hav_dec + dec1.cos() * dec2.cos() * hav_ra).clamp(0.0, 1.0);
    (2.0 * a.sqrt().asin()).to_degrees()
}

/// A set of sky positions prepared for centroiding.
///
/// If the right ascensions straddle 0/2π, they are reflected into a frame
/// where they are contiguous. The centroid is found in that frame, then
/// mapped back to the true frame.
#[derive(Clone, Debug)]
pub struct QuadrantCheck {
    /// Right ascensions in the working frame \[degrees\].
    ra_deg: Vec<f64>,
    /// Declinations \[degrees\].
    dec_deg: Vec<f64>,
    straddles: bool,
    /// The centroid in the working frame \[degrees\].
    working_centroid: (f64, f64),
}

impl QuadrantCheck {
    /// All angles are in radians. If `weights` are given, the centroid is
    /// weighted.
    pub fn new(
        ra_rad: &[f64],
        dec_rad: &[f64],
        weights: Option<&[f64]>,
    ) -> Result<QuadrantCheck, CentroidError> {
        check_inputs(ra_rad, dec_rad, weights)?;

        let straddles = straddles_wrap(ra_rad);
        let ra_deg: Vec<f64> = if straddles {
            ra_rad
                .iter()
                .map(|&ra| reflect_to_contiguous(ra).to_degrees())
                .collect()
        } else {
            ra_rad.iter().map(|ra| ra.to_degrees()).collect()
        };
        let dec_deg: Vec<f64> = dec_rad.iter().map(|dec| dec.to_degrees()).collect();
        let working_centroid = com(&ra_deg, &dec_deg, weights, CoordinateKind::Cartesian)?;

        Ok(QuadrantCheck {
            ra_deg,
            dec_deg,
            straddles,
            working_centroid,
        })
    }

    /// Were the right ascensions reflected into a contiguous frame?
    pub fn straddles_wrap(&self) -> bool {
        self.straddles
    }

    /// The (RA, Dec) centroid in the true frame \[degrees\]. The RA is in
    /// [0, 360).
    pub fn centroid(&self) -> (f64, f64) {
        let (ra, dec) = self.working_centroid;
        let ra = if self.straddles {
            reflect_from_contiguous(ra.to_radians()).to_degrees()
        } else {
            wrap_angle(ra.to_radians()).to_degrees()
        };
        // Guard against 360 after the round trip through radians.
        let ra = if ra >= TAU.to_degrees() { 0.0 } else { ra };
        (ra, dec)
    }

    /// The great-circle distance from each point to the working-frame
    /// centroid \[degrees\].
    pub fn separations(&self) -> Vec<f64> {
        let (c_ra, c_dec) = self.working_centroid;
        self.ra_deg
            .iter()
            .zip(&self.dec_deg)
            .map(|(&ra, &dec)| gcd(ra, dec, c_ra, c_dec))
            .collect()
    }
}
