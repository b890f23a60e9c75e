// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the primary and grating lobes of Murchison Widefield Array (MWA)
//! snapshots from their source catalogues.
//!
//! Sources are projected onto an orthographic disk centred on zenith, where
//! the lobes appear as dense clusters. Each cluster is isolated with a growing
//! circle and reported with its centre and angular extent, ready for
//! `chgcentre` and `wsclean`.

pub mod catalog;
mod cli;
pub mod constants;
pub mod io;
pub mod lobes;
pub mod metafits;
mod params;
pub mod plotting;

pub use catalog::{read_catalog_file, CatalogType, ProjectedCatalog, Source, SourceCatalog};
pub use cli::{LobeFinderCli, LobeFinderError};
pub use lobes::{LobeFinder, LobeFinderSettings, LobeKind, LobeResult, LobeSearchResults};
pub use metafits::Observation;
