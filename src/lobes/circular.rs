// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Circular statistics. All angles are in radians.
//!
//! Azimuths and right ascensions both wrap at 2π, so anything that compares
//! or averages them needs to know about the discontinuity. Everything that
//! handles the wrap lives here.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Wrap an angle into [0, 2π).
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // `rem_euclid` can round up to exactly 2π for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// The signed difference `a - b`, in (-π, π].
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let d = wrap_angle(a - b);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

/// A closed range of azimuths. Windows that cross 0/2π are stored as two
/// pieces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AzimuthWindow {
    /// Every azimuth.
    Full,

    /// `min <= φ <= max`, with both bounds in [0, 2π).
    Contiguous { min: f64, max: f64 },

    /// `φ <= lower_max` or `φ >= upper_min`.
    Split { lower_max: f64, upper_min: f64 },
}

impl AzimuthWindow {
    /// The window of half-width `half_width` around `centre`.
    pub fn around(centre: f64, half_width: f64) -> AzimuthWindow {
        if half_width >= PI {
            return AzimuthWindow::Full;
        }

        let centre = wrap_angle(centre);
        let min = centre - half_width;
        let max = centre + half_width;
        if min < 0.0 {
            AzimuthWindow::Split {
                lower_max: max,
                upper_min: min + TAU,
            }
        } else if max >= TAU {
            AzimuthWindow::Split {
                lower_max: max - TAU,
                upper_min: min,
            }
        } else {
            AzimuthWindow::Contiguous { min, max }
        }
    }

    pub fn contains(&self, azimuth: f64) -> bool {
        let azimuth = wrap_angle(azimuth);
        match *self {
            AzimuthWindow::Full => true,
            AzimuthWindow::Contiguous { min, max } => (min..=max).contains(&azimuth),
            AzimuthWindow::Split {
                lower_max,
                upper_min,
            } => azimuth <= lower_max || azimuth >= upper_min,
        }
    }
}

/// Do the angles sit on both sides of 0/2π? This is true when there are
/// angles in [0, π/2] *and* angles in [3π/2, 2π).
pub fn straddles_wrap(angles: &[f64]) -> bool {
    let first_quadrant = angles
        .iter()
        .map(|&a| wrap_angle(a))
        .any(|a| a <= FRAC_PI_2);
    let fourth_quadrant = angles
        .iter()
        .map(|&a| wrap_angle(a))
        .any(|a| a >= 3.0 * FRAC_PI_2);
    first_quadrant && fourth_quadrant
}

/// Reflect an angle near 0/2π into the contiguous frame centred on π. Angles
/// in the fourth quadrant land just above π, angles in the first quadrant
/// land just below it; anything else is untouched.
pub fn reflect_to_contiguous(angle: f64) -> f64 {
    let angle = wrap_angle(angle);
    if angle > 3.0 * FRAC_PI_2 {
        PI + (TAU - angle)
    } else if angle < FRAC_PI_2 {
        PI - angle
    } else {
        angle
    }
}

/// The inverse of [`reflect_to_contiguous`] for an angle in the contiguous
/// frame. The result is in [0, 2π).
pub fn reflect_from_contiguous(angle: f64) -> f64 {
    let unreflected = if angle >= PI {
        TAU - (angle - PI)
    } else {
        PI - angle
    };
    wrap_angle(unreflected)
}
