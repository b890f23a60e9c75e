// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with finding lobes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid circle: radius {radius}, distance from origin {distance}, position angle {position_angle} rad")]
    InvalidCircle {
        radius: f64,
        distance: f64,
        position_angle: f64,
    },

    #[error("Got {radii} radial coordinates but {azimuths} azimuths")]
    LengthMismatch { radii: usize, azimuths: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CentroidError {
    #[error("Cannot find the centroid of zero points")]
    Empty,

    #[error("Coordinate lengths don't match: {x} vs {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("Got {weights} weights for {points} points")]
    WeightsMismatch { weights: usize, points: usize },

    #[error("The weights sum to {0}; cannot use them for a centroid")]
    BadWeights(f64),
}

/// Anything that can go wrong during a single peel attempt. None of these are
/// fatal; the attempt is abandoned and the search moves on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LobeError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Centroid(#[from] CentroidError),

    #[error("The search circle around (d = {distance:.3}, PA = {position_angle_deg:.2}°) didn't settle on a stable number of sources after {steps} steps (final radius {final_radius:.3})")]
    Convergence {
        distance: f64,
        position_angle_deg: f64,
        steps: usize,
        final_radius: f64,
    },

    #[error("Azimuthal bin {bin} was selected with {count} sources, but no sources were found in it")]
    EmptyBin { bin: usize, count: usize },
}
