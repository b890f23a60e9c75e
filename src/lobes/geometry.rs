// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Circles on the orthographic polar disk.
//!
//! A point on the disk is described by its orthographic radius `r` (distance
//! from zenith) and azimuth `φ`. A circle of radius `R` whose centre lies a
//! distance `d` from the origin with position angle `PA` intersects the ray at
//! azimuth `φ` where the law of cosines holds for the triangle (origin,
//! circle centre, boundary point):
//!
//! `R² = r² + d² - 2 r d cos(φ - PA)`
//!
//! i.e. `r = d cos θ ± √(R² - d² sin² θ)` with `θ = φ - PA`. If the origin is
//! inside the circle (`R >= d`) only the `+` root is non-negative. Otherwise
//! only rays within `asin(R / d)` of `PA` hit the circle, and they hit it
//! twice.

use std::f64::consts::TAU;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{
    circular::{wrap_angle, AzimuthWindow},
    GeometryError,
};
use crate::constants::BOUNDARY_TOLERANCE;

/// The number of azimuths sampled around a circle enclosing the origin.
const NUM_ENCLOSING_SAMPLES: usize = 100;
/// The number of azimuths sampled across a circle that excludes the origin.
const NUM_EXCLUDING_SAMPLES: usize = 1000;

/// A circle on the orthographic disk.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// The radius of the circle.
    pub radius: f64,

    /// The distance from the disk origin (zenith) to the circle's centre.
    pub distance: f64,

    /// The azimuth of the circle's centre \[radians\]. Always in [0, 2π).
    pub position_angle: f64,
}

impl Circle {
    pub fn new(radius: f64, distance: f64, position_angle: f64) -> Result<Circle, GeometryError> {
        if !radius.is_finite()
            || radius <= 0.0
            || !distance.is_finite()
            || distance < 0.0
            || !position_angle.is_finite()
        {
            return Err(GeometryError::InvalidCircle {
                radius,
                distance,
                position_angle,
            });
        }

        Ok(Circle {
            radius,
            distance,
            position_angle: wrap_angle(position_angle),
        })
    }

    /// Is the disk origin inside (or on) this circle?
    pub fn encloses_origin(&self) -> bool {
        self.radius >= self.distance
    }

    /// The azimuths that intersect this circle.
    pub fn azimuth_window(&self) -> AzimuthWindow {
        if self.encloses_origin() {
            AzimuthWindow::Full
        } else {
            AzimuthWindow::around(self.position_angle, (self.radius / self.distance).asin())
        }
    }

    /// `√(R² - d² sin² θ)`, clamped so that tangent rays don't produce NaNs.
    fn half_chord(&self, azimuth: f64) -> f64 {
        let sin_theta = (azimuth - self.position_angle).sin();
        (self.radius.powi(2) - (self.distance * sin_theta).powi(2))
            .max(0.0)
            .sqrt()
    }

    /// The distance from the origin to where the ray at `azimuth` leaves the
    /// circle. Only meaningful for circles that enclose the origin, or for
    /// azimuths within [`Circle::azimuth_window`].
    pub fn outer_radius(&self, azimuth: f64) -> f64 {
        self.distance * (azimuth - self.position_angle).cos() + self.half_chord(azimuth)
    }

    /// The distance from the origin to where the ray at `azimuth` enters the
    /// circle. Zero if the circle encloses the origin.
    pub fn inner_radius(&self, azimuth: f64) -> f64 {
        if self.encloses_origin() {
            0.0
        } else {
            (self.distance * (azimuth - self.position_angle).cos() - self.half_chord(azimuth))
                .max(0.0)
        }
    }
}

/// Where a [`Circle`]'s boundary lies along a set of azimuths.
#[derive(Clone, Debug, PartialEq)]
pub enum CircleBoundary {
    /// The circle encloses the origin; every azimuth crosses the boundary
    /// once.
    Enclosing { azimuths: Vec<f64>, radii: Vec<f64> },

    /// The circle excludes the origin; azimuths inside the circle's window
    /// cross the boundary twice. Azimuths outside the window have NaN radii.
    Excluding {
        azimuths: Vec<f64>,
        near: Vec<f64>,
        far: Vec<f64>,
    },
}

impl CircleBoundary {
    /// The boundary as a closed polyline of (azimuth, radius) pairs, suitable
    /// for drawing.
    pub fn outline(&self) -> Vec<(f64, f64)> {
        match self {
            CircleBoundary::Enclosing { azimuths, radii } => azimuths
                .iter()
                .copied()
                .zip(radii.iter().copied())
                .collect(),
            CircleBoundary::Excluding {
                azimuths,
                near,
                far,
            } => {
                let near = azimuths.iter().copied().zip(near.iter().copied());
                let far = azimuths.iter().copied().zip(far.iter().copied()).rev();
                near.chain(far)
                    .filter(|(_, r)| !r.is_nan())
                    .collect()
            }
        }
    }
}

/// `n` evenly-spaced values from `start` to `end` (inclusive).
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// Find the boundary of `circle` along each of `azimuths` \[radians\]. If no
/// azimuths are given, they are densely sampled: around the whole disk if the
/// circle encloses the origin, otherwise across the circle's azimuth window.
pub fn draw_circle(circle: &Circle, azimuths: Option<&[f64]>) -> CircleBoundary {
    if circle.encloses_origin() {
        let azimuths = match azimuths {
            Some(a) => a.to_vec(),
            None => linspace(0.0, TAU, NUM_ENCLOSING_SAMPLES),
        };
        let radii = azimuths.iter().map(|&a| circle.outer_radius(a)).collect();
        CircleBoundary::Enclosing { azimuths, radii }
    } else {
        let azimuths = match azimuths {
            Some(a) => a.to_vec(),
            None => {
                let half_width = (circle.radius / circle.distance).asin();
                linspace(
                    circle.position_angle - half_width,
                    circle.position_angle + half_width,
                    NUM_EXCLUDING_SAMPLES,
                )
                .into_iter()
                .map(wrap_angle)
                .collect()
            }
        };
        let window = circle.azimuth_window();
        let (near, far) = azimuths
            .iter()
            .map(|&a| {
                if window.contains(a) {
                    (circle.inner_radius(a), circle.outer_radius(a))
                } else {
                    (f64::NAN, f64::NAN)
                }
            })
            .unzip();
        CircleBoundary::Excluding {
            azimuths,
            near,
            far,
        }
    }
}

/// Get the indices of the points (`radii`, `azimuths`) that lie inside
/// `circle`. Points on the boundary are included.
pub fn circle_subset(
    circle: &Circle,
    radii: &[f64],
    azimuths: &[f64],
) -> Result<Vec<usize>, GeometryError> {
    if radii.len() != azimuths.len() {
        return Err(GeometryError::LengthMismatch {
            radii: radii.len(),
            azimuths: azimuths.len(),
        });
    }

    let members = if circle.distance > circle.radius {
        // Only rays within the circle's window can hit it, so throw everything
        // else away before finding the near and far sides.
        let window = circle.azimuth_window();
        let candidates = azimuths
            .iter()
            .positions(|&a| window.contains(a))
            .collect::<Vec<_>>();
        let candidate_azimuths = candidates.iter().map(|&i| azimuths[i]).collect::<Vec<_>>();
        match draw_circle(circle, Some(&candidate_azimuths)) {
            CircleBoundary::Excluding { near, far, .. } => candidates
                .into_iter()
                .zip(near)
                .zip(far)
                .filter(|((i, near), far)| {
                    let r = radii[*i];
                    r >= near - BOUNDARY_TOLERANCE && r <= far + BOUNDARY_TOLERANCE
                })
                .map(|((i, _), _)| i)
                .collect(),
            CircleBoundary::Enclosing { .. } => unreachable!("the circle excludes the origin"),
        }
    } else {
        radii
            .iter()
            .zip(azimuths)
            .positions(|(&r, &a)| r <= circle.outer_radius(a) + BOUNDARY_TOLERANCE)
            .collect()
    };

    Ok(members)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_invalid_circles() {
        assert!(Circle::new(0.0, 0.5, 1.0).is_err());
        assert!(Circle::new(-0.1, 0.5, 1.0).is_err());
        assert!(Circle::new(0.1, -0.5, 1.0).is_err());
        assert!(Circle::new(0.1, 0.5, f64::NAN).is_err());
        assert!(Circle::new(f64::INFINITY, 0.5, 1.0).is_err());
    }

    #[test]
    fn test_position_angle_is_wrapped() {
        let c = Circle::new(0.1, 0.5, -FRAC_PI_2).unwrap();
        assert_abs_diff_eq!(c.position_angle, 3.0 * FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_centred_circle_is_round() {
        let c = Circle::new(0.3, 0.0, 1.2).unwrap();
        match draw_circle(&c, None) {
            CircleBoundary::Enclosing { azimuths, radii } => {
                assert_eq!(azimuths.len(), NUM_ENCLOSING_SAMPLES);
                for r in radii {
                    assert_abs_diff_eq!(r, 0.3, epsilon = 1e-12);
                }
            }
            CircleBoundary::Excluding { .. } => panic!("expected an enclosing boundary"),
        }
    }

    #[test]
    fn test_enclosing_boundary_along_pa() {
        // Along the position angle, the boundary is d + R away; opposite it,
        // R - d.
        let c = Circle::new(0.5, 0.2, 1.0).unwrap();
        match draw_circle(&c, Some(&[1.0, 1.0 + PI])) {
            CircleBoundary::Enclosing { radii, .. } => {
                assert_abs_diff_eq!(radii[0], 0.7, epsilon = 1e-12);
                assert_abs_diff_eq!(radii[1], 0.3, epsilon = 1e-12);
            }
            CircleBoundary::Excluding { .. } => panic!("expected an enclosing boundary"),
        }
    }

    #[test]
    fn test_excluding_boundary_along_pa() {
        let c = Circle::new(0.1, 0.5, 2.0).unwrap();
        match draw_circle(&c, Some(&[2.0, 2.0 + PI])) {
            CircleBoundary::Excluding { near, far, .. } => {
                assert_abs_diff_eq!(near[0], 0.4, epsilon = 1e-12);
                assert_abs_diff_eq!(far[0], 0.6, epsilon = 1e-12);
                // The opposite direction never meets the circle.
                assert!(near[1].is_nan());
                assert!(far[1].is_nan());
            }
            CircleBoundary::Enclosing { .. } => panic!("expected an excluding boundary"),
        }
    }

    #[test]
    fn test_excluding_boundary_default_samples() {
        let c = Circle::new(0.1, 0.5, 0.05).unwrap();
        match draw_circle(&c, None) {
            CircleBoundary::Excluding {
                azimuths,
                near,
                far,
            } => {
                assert_eq!(azimuths.len(), NUM_EXCLUDING_SAMPLES);
                // The window straddles 0, so some azimuths have been wrapped.
                assert!(azimuths.iter().any(|&a| a > PI));
                for (n, f) in near.into_iter().zip(far) {
                    assert!(n.is_finite() && f.is_finite());
                    assert!(n <= f);
                }
            }
            CircleBoundary::Enclosing { .. } => panic!("expected an excluding boundary"),
        }
    }

    #[test]
    fn test_radius_equals_distance_is_stable() {
        // The circle passes through the origin.
        let c = Circle::new(0.25, 0.25, 0.5).unwrap();
        let azimuths = linspace(0.0, TAU, 360);
        match draw_circle(&c, Some(&azimuths)) {
            CircleBoundary::Enclosing { radii, .. } => {
                for (a, r) in azimuths.iter().zip(radii) {
                    assert!(r.is_finite());
                    let expected = (2.0 * 0.25 * (a - 0.5).cos()).max(0.0);
                    assert_abs_diff_eq!(r, expected, epsilon = 1e-12);
                }
            }
            CircleBoundary::Excluding { .. } => panic!("expected an enclosing boundary"),
        }
    }

    #[test]
    fn test_boundary_points_are_members() {
        for c in [
            Circle::new(0.4, 0.1, 0.3).unwrap(),
            Circle::new(0.1, 0.6, 4.0).unwrap(),
            Circle::new(0.15, 0.5, 0.02).unwrap(),
        ] {
            let outline = draw_circle(&c, None).outline();
            let (azimuths, radii): (Vec<f64>, Vec<f64>) = outline.into_iter().unzip();
            let members = circle_subset(&c, &radii, &azimuths).unwrap();
            assert_eq!(members.len(), radii.len(), "{c:?}");
        }
    }

    #[test]
    fn test_centred_circle_is_pa_invariant() {
        let radii = linspace(0.0, 1.0, 41);
        let azimuths = (0..41).map(|i| i as f64 * 0.37 % TAU).collect::<Vec<_>>();
        let expected = radii
            .iter()
            .positions(|&r| r <= 0.45)
            .collect::<Vec<_>>();
        for pa in linspace(0.0, TAU, 13) {
            let c = Circle::new(0.45, 0.0, pa).unwrap();
            assert_eq!(circle_subset(&c, &radii, &azimuths).unwrap(), expected);
        }
    }

    #[test]
    fn test_subset_excluding_circle() {
        let c = Circle::new(0.1, 0.5, 1.0).unwrap();
        let radii = [0.5, 0.45, 0.59, 0.7, 0.5, 0.5];
        let azimuths = [1.0, 1.05, 0.98, 1.0, 1.5, 1.0 + PI];
        let members = circle_subset(&c, &radii, &azimuths).unwrap();
        assert_eq!(members, vec![0, 1, 2]);
    }

    #[test]
    fn test_subset_across_the_wrap() {
        // The circle's centre is just east of north, so its window covers
        // azimuths on both sides of 0.
        let c = Circle::new(0.1, 0.5, 0.05).unwrap();
        let radii = [0.5, 0.5, 0.5, 0.5];
        let azimuths = [0.05, TAU - 0.05, 0.12, PI];
        let members = circle_subset(&c, &radii, &azimuths).unwrap();
        assert_eq!(members, vec![0, 1, 2]);

        // Same thing, but just west of north.
        let c = Circle::new(0.1, 0.5, TAU - 0.05).unwrap();
        let azimuths = [0.05, TAU - 0.05, TAU - 0.12, PI];
        let members = circle_subset(&c, &radii, &azimuths).unwrap();
        assert_eq!(members, vec![0, 1, 2]);
    }

    #[test]
    fn test_subset_length_mismatch() {
        let c = Circle::new(0.1, 0.5, 0.05).unwrap();
        assert!(matches!(
            circle_subset(&c, &[0.1, 0.2], &[0.1]),
            Err(GeometryError::LengthMismatch {
                radii: 2,
                azimuths: 1
            })
        ));
    }
}
