// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Useful constants.
//!
//! All constants *must* be double precision.

/// The starting radius of a growing-circle search, in units of the
/// orthographic projection (1 is the horizon).
pub const DEFAULT_INITIAL_RADIUS: f64 = 0.1;

/// How much the search circle grows every step.
pub const DEFAULT_RADIUS_STEP: f64 = 0.02;

/// The maximum number of times the search circle is grown before giving up.
pub const DEFAULT_MAX_GROWTH_STEPS: usize = 100;

/// The number of equal-width azimuthal bins used to look for sidelobes.
pub const NUM_AZIMUTH_BINS: usize = 8;

/// A sidelobe is only considered if its azimuthal bin has more sources than
/// this.
pub const DEFAULT_MIN_SIDELOBE_COUNT: usize = 10;

/// The maximum number of sidelobes to peel.
pub const DEFAULT_MAX_SIDELOBES: usize = 4;

/// The maximum number of individual bright sources to claim once the lobes
/// have been peeled.
pub const DEFAULT_MAX_BRIGHT_SOURCES: usize = 3;

/// Stop claiming bright sources once this fraction of the catalogue's apparent
/// flux density has been captured.
pub const DEFAULT_FLUX_CAPTURE_THRESHOLD: f64 = 0.95;

/// The number of pixels added to each side of a lobe's image size.
pub const IMAGE_SIZE_PADDING: u32 = 5;

/// The image size \[pixels\] used for a lone bright source.
pub const BRIGHT_SOURCE_IMAGE_SIZE: u32 = 100;

/// Points this close to a circle's boundary are considered to be inside it.
pub(crate) const BOUNDARY_TOLERANCE: f64 = 1e-10;

/// MWA longitude \[degrees\]
pub const MWA_LONG_DEG: f64 = 116.67081523611111;
/// MWA latitude \[degrees\]
pub const MWA_LAT_DEG: f64 = -26.703319405555554;
/// MWA height \[metres\]
pub const MWA_HEIGHT_M: f64 = 377.827;
