// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

use marlu::{
    sexagesimal::{degrees_to_sexagesimal_dms, degrees_to_sexagesimal_hms},
    RADec,
};
use serde::{Deserialize, Serialize};

use super::Circle;
use crate::catalog::{Source, SourceCatalog};

/// What sort of feature a lobe is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LobeKind {
    /// The main lobe of the primary beam.
    Primary,

    /// A grating lobe. The number counts from 1 in the order sidelobes are
    /// found.
    Sidelobe(usize),

    /// A lone bright source outside any lobe. The number counts from 1.
    BrightSource(usize),
}

impl LobeKind {
    /// A short label suitable for file names.
    pub fn label(self) -> String {
        match self {
            LobeKind::Primary => "primary".to_string(),
            LobeKind::Sidelobe(n) => format!("sidelobe{n}"),
            LobeKind::BrightSource(n) => format!("bright{n}"),
        }
    }
}

impl fmt::Display for LobeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LobeKind::Primary => write!(f, "Primary lobe"),
            LobeKind::Sidelobe(n) => write!(f, "Sidelobe {n}"),
            LobeKind::BrightSource(n) => write!(f, "Bright source {n}"),
        }
    }
}

/// A peeled lobe.
#[derive(Clone, Debug, PartialEq)]
pub struct LobeResult {
    pub kind: LobeKind,

    /// The flux-weighted centre of the lobe's members.
    pub centre: RADec,

    /// Indices into the catalogue of this lobe's sources.
    pub members: Vec<usize>,

    /// The angular extent of the lobe in right ascension \[degrees\].
    pub extent_ra_deg: f64,

    /// The angular extent of the lobe in declination \[degrees\].
    pub extent_dec_deg: f64,

    /// The sum of the members' apparent flux densities \[Jy\].
    pub flux: f64,

    /// The circle that was accepted by the growing-circle search. Bright
    /// sources don't have one.
    pub search_circle: Option<Circle>,

    /// The number of times the search circle grew before it was accepted.
    pub growth_steps: usize,
}

impl LobeResult {
    /// The centre formatted as sexagesimal "hms dms", as used by `chgcentre`.
    pub fn centre_hmsdms(&self) -> String {
        format!(
            "{} {}",
            degrees_to_sexagesimal_hms(self.centre.ra.to_degrees()),
            degrees_to_sexagesimal_dms(self.centre.dec.to_degrees())
        )
    }

    pub fn num_members(&self) -> usize {
        self.members.len()
    }

    /// The full records of this lobe's sources.
    pub fn member_sources<'a>(
        &'a self,
        catalog: &'a SourceCatalog,
    ) -> impl Iterator<Item = &'a Source> + 'a {
        self.members.iter().map(move |&i| &catalog[i])
    }
}
