// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding the primary and grating lobes of an observation from the spatial
//! density of its detected sources.
//!
//! Sources are projected onto an orthographic disk centred on zenith (see
//! [`crate::catalog::ProjectedCatalog`]). Lobes show up on the disk as dense
//! clusters, which are isolated with growing circles and peeled off one at a
//! time.

pub mod centroid;
pub mod circular;
mod error;
mod geometry;
mod lobe;
mod peel;
mod sidelobe;
mod subset;

pub use centroid::{com, gcd, CoordinateKind, QuadrantCheck};
pub use error::{CentroidError, GeometryError, LobeError};
pub use geometry::{circle_subset, draw_circle, Circle, CircleBoundary};
pub use lobe::{LobeKind, LobeResult};
pub use peel::{LobeFinder, LobeFinderSettings, LobeSearchResults, PeelStage, PeelState};
pub use sidelobe::{sidelobe_finder, AzimuthHistogram, SidelobeSearch};
pub use subset::{lobe_subset, GrowthSettings};
