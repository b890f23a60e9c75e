// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Isolate a single lobe with a growing circle.
//!
//! Starting from a small circle around a candidate centre, the circle grows
//! until the number of sources inside it stops changing. Lobes are dense
//! clusters separated by sparse sky, so a stable count means the circle has
//! reached the lobe's edge.

use log::{debug, trace};
use marlu::RADec;
use serde::{Deserialize, Serialize};

use super::{
    centroid::QuadrantCheck, circle_subset, Circle, LobeError, LobeKind, LobeResult,
};
use crate::{
    catalog::ProjectedCatalog,
    constants::{DEFAULT_INITIAL_RADIUS, DEFAULT_MAX_GROWTH_STEPS, DEFAULT_RADIUS_STEP},
};

/// Controls how a search circle grows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthSettings {
    /// The radius of the first circle.
    pub initial_radius: f64,

    /// How much the radius grows each step.
    pub radius_step: f64,

    /// Give up after this many circles.
    pub max_steps: usize,
}

impl Default for GrowthSettings {
    fn default() -> Self {
        GrowthSettings {
            initial_radius: DEFAULT_INITIAL_RADIUS,
            radius_step: DEFAULT_RADIUS_STEP,
            max_steps: DEFAULT_MAX_GROWTH_STEPS,
        }
    }
}

/// Find the lobe around the orthographic position (`distance`,
/// `position_angle`), considering only the sources at `remaining`.
///
/// The returned [`LobeResult`] has its members' flux-weighted centre (or the
/// unweighted centre, if all members have zero flux density) and its angular
/// extent. The extent in declination is the spread of the members'
/// declinations; the extent in right ascension is derived from the largest
/// member separation from the centre.
pub fn lobe_subset(
    catalog: &ProjectedCatalog,
    remaining: &[usize],
    distance: f64,
    position_angle: f64,
    settings: &GrowthSettings,
    kind: LobeKind,
) -> Result<LobeResult, LobeError> {
    let radii = catalog.gather(remaining, |s| s.radius);
    let azimuths = catalog.gather(remaining, |s| s.azimuth);

    let mut previous_count = None;
    let mut accepted = None;
    let mut final_radius = settings.initial_radius;
    for step in 0..settings.max_steps {
        let radius = settings.initial_radius + step as f64 * settings.radius_step;
        final_radius = radius;
        let circle = Circle::new(radius, distance, position_angle)?;
        let inside = circle_subset(&circle, &radii, &azimuths)?;
        let count = inside.len();
        trace!("Step {step}: R = {radius:.3}, {count} sources");

        if count > 0 && previous_count == Some(count) {
            accepted = Some((circle, inside, step));
            break;
        }
        previous_count = Some(count);
    }

    let (circle, inside, growth_steps) = accepted.ok_or(LobeError::Convergence {
        distance,
        position_angle_deg: position_angle.to_degrees(),
        steps: settings.max_steps,
        final_radius,
    })?;
    let members: Vec<usize> = inside.into_iter().map(|i| remaining[i]).collect();
    debug!(
        "{kind}: {} sources within R = {:.3} after {growth_steps} steps",
        members.len(),
        circle.radius
    );

    let ras = catalog.gather(&members, |s| s.ra);
    let decs = catalog.gather(&members, |s| s.dec);
    let fluxes = catalog.gather(&members, |s| s.flux);
    let flux: f64 = fluxes.iter().sum();
    let weights = if flux > 0.0 {
        Some(fluxes.as_slice())
    } else {
        debug!("{kind}: all members have zero flux density; using an unweighted centre");
        None
    };
    let qc = QuadrantCheck::new(&ras, &decs, weights)?;
    let (centre_ra, centre_dec) = qc.centroid();
    let max_separation = qc.separations().into_iter().fold(0.0, f64::max);
    let (extent_ra_deg, extent_dec_deg) = angular_extent(&decs, max_separation);

    Ok(LobeResult {
        kind,
        centre: RADec::from_degrees(centre_ra, centre_dec),
        members,
        extent_ra_deg,
        extent_dec_deg,
        flux,
        search_circle: Some(circle),
        growth_steps,
    })
}

/// The (RA, Dec) extent of a lobe \[degrees\], given its members' declinations
/// \[radians\] and the largest separation of a member from the lobe's centre
/// \[degrees\].
fn angular_extent(decs: &[f64], max_separation_deg: f64) -> (f64, f64) {
    let (min_dec, max_dec) = decs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &d| {
            (lo.min(d), hi.max(d))
        });
    let extent_dec = (max_dec - min_dec).to_degrees();

    let ratio = (2.0 * max_separation_deg).to_radians().cos() / extent_dec.to_radians().cos();
    let extent_ra = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(-1.0, 1.0).acos().to_degrees()
    };

    (extent_ra, extent_dec)
}
