// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Peel lobes off a projected catalogue, one at a time.
//!
//! The primary lobe is found first, around the pointing centre. Then the
//! fullest azimuth bins of what remains propose sidelobes. Finally, if the
//! lobes don't account for enough of the catalogue's flux density, the
//! brightest leftover sources are claimed individually.

use std::collections::HashSet;
use std::f64::consts::FRAC_PI_2;

use log::{debug, info, warn};
use marlu::{AzEl, RADec};
use serde::{Deserialize, Serialize};

use super::{
    circular::wrap_angle, lobe_subset, sidelobe_finder, GrowthSettings, LobeKind, LobeResult,
    SidelobeSearch,
};
use crate::{
    catalog::{InputError, ProjectedCatalog},
    constants::{
        DEFAULT_FLUX_CAPTURE_THRESHOLD, DEFAULT_MAX_BRIGHT_SOURCES, DEFAULT_MAX_SIDELOBES,
        DEFAULT_MIN_SIDELOBE_COUNT,
    },
};

/// Everything that controls a lobe search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LobeFinderSettings {
    pub growth: GrowthSettings,

    /// The maximum number of sidelobes to peel.
    pub max_sidelobes: usize,

    /// An azimuth bin needs more than this many sources to propose a
    /// sidelobe.
    pub min_sidelobe_count: usize,

    /// The maximum number of lone bright sources to claim.
    pub max_bright_sources: usize,

    /// Stop claiming bright sources once this fraction of the total flux
    /// density has been captured.
    pub flux_capture_threshold: f64,

    /// Weight sidelobe candidate positions by flux density.
    pub weighted_sidelobes: bool,
}

impl Default for LobeFinderSettings {
    fn default() -> Self {
        LobeFinderSettings {
            growth: GrowthSettings::default(),
            max_sidelobes: DEFAULT_MAX_SIDELOBES,
            min_sidelobe_count: DEFAULT_MIN_SIDELOBE_COUNT,
            max_bright_sources: DEFAULT_MAX_BRIGHT_SOURCES,
            flux_capture_threshold: DEFAULT_FLUX_CAPTURE_THRESHOLD,
            weighted_sidelobes: true,
        }
    }
}

/// The sources not yet assigned to a lobe, and the flux density of those that
/// have been.
#[derive(Clone, Debug, PartialEq)]
pub struct PeelState {
    pub remaining: Vec<usize>,
    pub captured_flux: f64,
}

impl PeelState {
    pub fn new(remaining: Vec<usize>) -> PeelState {
        PeelState {
            remaining,
            captured_flux: 0.0,
        }
    }

    /// A new state without `members`.
    #[must_use]
    pub fn peel(&self, members: &[usize], flux: f64) -> PeelState {
        let members: HashSet<usize> = members.iter().copied().collect();
        PeelState {
            remaining: self
                .remaining
                .iter()
                .copied()
                .filter(|i| !members.contains(i))
                .collect(),
            captured_flux: self.captured_flux + flux,
        }
    }
}

/// Where a [`LobeFinder`] is up to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeelStage {
    Primary,
    Sidelobes { found: usize },
    Brightest { claimed: usize },
    Done,
}

/// All of the lobes that were found.
#[derive(Clone, Debug, PartialEq)]
pub struct LobeSearchResults {
    /// Lobes in the order they were found.
    pub lobes: Vec<LobeResult>,

    /// The flux density of all lobes \[Jy\].
    pub captured_flux: f64,

    /// The flux density of all sources above the horizon \[Jy\].
    pub total_flux: f64,
}

impl LobeSearchResults {
    pub fn captured_fraction(&self) -> f64 {
        self.captured_flux / self.total_flux
    }
}

pub struct LobeFinder<'a> {
    catalog: &'a ProjectedCatalog,
    pointing: AzEl,
    settings: LobeFinderSettings,
}

impl<'a> LobeFinder<'a> {
    pub fn new(
        catalog: &'a ProjectedCatalog,
        pointing: AzEl,
        settings: LobeFinderSettings,
    ) -> LobeFinder<'a> {
        LobeFinder {
            catalog,
            pointing,
            settings,
        }
    }

    pub fn run(&self) -> Result<LobeSearchResults, InputError> {
        let AzEl { az, el } = self.pointing;
        if !az.is_finite() || !(0.0..=FRAC_PI_2).contains(&el) {
            return Err(InputError::BadPointing {
                az: az.to_degrees(),
                alt: el.to_degrees(),
            });
        }
        let pointing_az = wrap_angle(az);

        let visible = self.catalog.visible_indices()?;
        let total_flux = self.catalog.flux_of(&visible);
        if total_flux <= 0.0 {
            return Err(InputError::NoFlux);
        }

        let mut state = PeelState::new(visible);
        let mut lobes = vec![];
        let mut stage = PeelStage::Primary;
        loop {
            debug!(
                "{stage:?}: {} sources remain, {:.1}% of flux captured",
                state.remaining.len(),
                100.0 * state.captured_flux / total_flux
            );
            stage = match stage {
                PeelStage::Primary => {
                    match lobe_subset(
                        self.catalog,
                        &state.remaining,
                        el.cos(),
                        pointing_az,
                        &self.settings.growth,
                        LobeKind::Primary,
                    ) {
                        Ok(lobe) => {
                            info!("Found the primary lobe with {} sources", lobe.num_members());
                            state = state.peel(&lobe.members, lobe.flux);
                            lobes.push(lobe);
                        }
                        Err(e) => warn!("Couldn't find the primary lobe: {e}"),
                    }
                    PeelStage::Sidelobes { found: 0 }
                }

                PeelStage::Sidelobes { found } => {
                    if found >= self.settings.max_sidelobes || state.remaining.is_empty() {
                        PeelStage::Brightest { claimed: 0 }
                    } else {
                        match self.next_sidelobe(&state, found + 1) {
                            Some(lobe) => {
                                info!("Found {} with {} sources", lobe.kind, lobe.num_members());
                                state = state.peel(&lobe.members, lobe.flux);
                                lobes.push(lobe);
                                PeelStage::Sidelobes { found: found + 1 }
                            }
                            None => PeelStage::Brightest { claimed: 0 },
                        }
                    }
                }

                PeelStage::Brightest { claimed } => {
                    let fraction = state.captured_flux / total_flux;
                    if claimed >= self.settings.max_bright_sources
                        || fraction >= self.settings.flux_capture_threshold
                        || state.remaining.is_empty()
                    {
                        PeelStage::Done
                    } else {
                        let lobe = self.brightest(&state, claimed + 1);
                        info!("Claimed {} ({:.3} Jy)", lobe.kind, lobe.flux);
                        state = state.peel(&lobe.members, lobe.flux);
                        lobes.push(lobe);
                        PeelStage::Brightest {
                            claimed: claimed + 1,
                        }
                    }
                }

                PeelStage::Done => break,
            };
        }

        Ok(LobeSearchResults {
            lobes,
            captured_flux: state.captured_flux,
            total_flux,
        })
    }

    /// Propose and isolate the next sidelobe. `None` means there are no more
    /// sidelobes to be found.
    fn next_sidelobe(&self, state: &PeelState, number: usize) -> Option<LobeResult> {
        let search = sidelobe_finder(
            self.catalog,
            &state.remaining,
            self.settings.weighted_sidelobes,
            self.settings.min_sidelobe_count,
        );
        match search {
            Ok(SidelobeSearch::Found {
                distance,
                position_angle,
            }) => match lobe_subset(
                self.catalog,
                &state.remaining,
                distance,
                position_angle,
                &self.settings.growth,
                LobeKind::Sidelobe(number),
            ) {
                Ok(lobe) => Some(lobe),
                Err(e) => {
                    warn!("Couldn't isolate sidelobe {number}: {e}");
                    None
                }
            },
            Ok(SidelobeSearch::NotFound { max_count }) => {
                debug!("No more sidelobes; the fullest azimuth bin has {max_count} sources");
                None
            }
            Err(e) => {
                warn!("Couldn't look for sidelobe {number}: {e}");
                None
            }
        }
    }

    /// Claim the brightest remaining source. `state.remaining` must not be
    /// empty.
    fn brightest(&self, state: &PeelState, number: usize) -> LobeResult {
        let index = state
            .remaining
            .iter()
            .copied()
            .fold(state.remaining[0], |best, i| {
                if self.catalog.get(i).flux > self.catalog.get(best).flux {
                    i
                } else {
                    best
                }
            });
        let source = self.catalog.get(index);
        LobeResult {
            kind: LobeKind::BrightSource(number),
            centre: RADec {
                ra: source.ra,
                dec: source.dec,
            },
            members: vec![index],
            extent_ra_deg: 0.0,
            extent_dec_deg: 0.0,
            flux: source.flux,
            search_circle: None,
            growth_steps: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::catalog::ProjectedSource;

    fn source(ra_deg: f64, azimuth: f64, radius: f64, flux: f64) -> ProjectedSource {
        ProjectedSource {
            ra: ra_deg.to_radians(),
            dec: (-27.0_f64).to_radians(),
            flux,
            azimuth,
            radius,
            above_horizon: true,
        }
    }

    /// 30 sources around (r = 0.5, φ = 1.0), i.e. a pointing at 60° altitude.
    fn primary_cluster(flux: f64) -> Vec<ProjectedSource> {
        (0..30)
            .map(|i| {
                let dr = ((i % 5) as f64 - 2.0) * 0.01;
                let daz = ((i / 5) as f64 - 2.5) * 0.01;
                source(20.0 + daz * 10.0, 1.0 + daz, 0.5 + dr, flux)
            })
            .collect()
    }

    /// Sources spread around the edge of the disk.
    fn scattered(fluxes: &[f64]) -> Vec<ProjectedSource> {
        [2.5, 3.3, 5.6, 6.1, 0.2]
            .iter()
            .zip(fluxes)
            .enumerate()
            .map(|(i, (&az, &flux))| source(100.0 + 30.0 * i as f64, az, 0.95, flux))
            .collect()
    }

    fn pointing() -> AzEl {
        AzEl::from_degrees(1.0_f64.to_degrees(), 60.0)
    }

    #[test]
    fn test_peel_state() {
        let state = PeelState::new(vec![0, 1, 2, 3, 4]);
        let next = state.peel(&[1, 3], 2.5);
        assert_eq!(next.remaining, vec![0, 2, 4]);
        assert_abs_diff_eq!(next.captured_flux, 2.5);
        let next = next.peel(&[0], 1.0);
        assert_eq!(next.remaining, vec![2, 4]);
        assert_abs_diff_eq!(next.captured_flux, 3.5);
        // The earlier state is untouched.
        assert_eq!(state.remaining.len(), 5);
    }

    #[test]
    fn test_single_dominant_cluster() {
        let mut sources = primary_cluster(10.0);
        sources.extend(scattered(&[1.0; 5]));
        let catalog = ProjectedCatalog::from_projected(sources);

        let results = LobeFinder::new(&catalog, pointing(), LobeFinderSettings::default())
            .run()
            .unwrap();
        assert_eq!(results.lobes.len(), 1);
        let primary = &results.lobes[0];
        assert_eq!(primary.kind, LobeKind::Primary);
        assert_eq!(primary.members, (0..30).collect::<Vec<_>>());
        assert_abs_diff_eq!(results.total_flux, 305.0);
        assert_abs_diff_eq!(results.captured_flux, 300.0);
        assert!(results.captured_fraction() >= 0.95);
    }

    #[test]
    fn test_primary_and_sidelobe() {
        let mut sources = primary_cluster(10.0);
        sources.extend((0..20).map(|i| {
            let dr = ((i % 4) as f64 - 1.5) * 0.01;
            let daz = ((i / 4) as f64 - 2.0) * 0.01;
            source(150.0 + daz * 10.0, 4.0 + daz, 0.8 + dr, 5.0)
        }));
        sources.extend(scattered(&[1.0; 5]));
        let catalog = ProjectedCatalog::from_projected(sources);

        let results = LobeFinder::new(&catalog, pointing(), LobeFinderSettings::default())
            .run()
            .unwrap();
        let kinds: Vec<LobeKind> = results.lobes.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LobeKind::Primary, LobeKind::Sidelobe(1)]);
        assert_eq!(results.lobes[1].members, (30..50).collect::<Vec<_>>());
        assert_abs_diff_eq!(results.captured_flux, 400.0);

        // Lobes never share sources.
        let mut all: Vec<usize> = results
            .lobes
            .iter()
            .flat_map(|l| l.members.iter().copied())
            .collect();
        let n = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), n);
    }

    #[test]
    fn test_bright_sources_are_claimed() {
        let mut sources = primary_cluster(1.0);
        sources.extend(scattered(&[100.0, 60.0, 90.0, 70.0, 80.0]));
        let catalog = ProjectedCatalog::from_projected(sources);

        let results = LobeFinder::new(&catalog, pointing(), LobeFinderSettings::default())
            .run()
            .unwrap();
        let kinds: Vec<LobeKind> = results.lobes.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LobeKind::Primary,
                LobeKind::BrightSource(1),
                LobeKind::BrightSource(2),
                LobeKind::BrightSource(3)
            ]
        );
        let bright_fluxes: Vec<f64> = results.lobes[1..].iter().map(|l| l.flux).collect();
        assert_eq!(bright_fluxes, vec![100.0, 90.0, 80.0]);
        assert_eq!(results.lobes[1].members, vec![30]);
        assert!(results.lobes[1].search_circle.is_none());
        assert_abs_diff_eq!(results.captured_flux, 300.0);
        assert_abs_diff_eq!(results.total_flux, 430.0);
    }

    #[test]
    fn test_bright_sources_stop_at_threshold() {
        let mut sources = primary_cluster(1.0);
        sources.extend(scattered(&[500.0, 1.0, 1.0, 1.0, 1.0]));
        let catalog = ProjectedCatalog::from_projected(sources);

        let results = LobeFinder::new(&catalog, pointing(), LobeFinderSettings::default())
            .run()
            .unwrap();
        // After the 500 Jy source, 530 of 534 Jy is captured.
        assert_eq!(results.lobes.len(), 2);
        assert_eq!(results.lobes[1].kind, LobeKind::BrightSource(1));
    }

    #[test]
    fn test_failed_primary_moves_on() {
        // Nothing near the pointing centre.
        let sources = scattered(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let catalog = ProjectedCatalog::from_projected(sources);
        let settings = LobeFinderSettings {
            growth: GrowthSettings {
                max_steps: 3,
                ..Default::default()
            },
            ..Default::default()
        };

        let results = LobeFinder::new(&catalog, pointing(), settings)
            .run()
            .unwrap();
        let kinds: Vec<LobeKind> = results.lobes.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LobeKind::BrightSource(1),
                LobeKind::BrightSource(2),
                LobeKind::BrightSource(3)
            ]
        );
    }

    #[test]
    fn test_input_errors() {
        let catalog = ProjectedCatalog::from_projected(primary_cluster(0.0));
        assert_eq!(
            LobeFinder::new(&catalog, pointing(), LobeFinderSettings::default()).run(),
            Err(InputError::NoFlux)
        );

        let catalog = ProjectedCatalog::from_projected(primary_cluster(1.0));
        let bad = AzEl::from_degrees(10.0, -5.0);
        assert!(matches!(
            LobeFinder::new(&catalog, bad, LobeFinderSettings::default()).run(),
            Err(InputError::BadPointing { .. })
        ));
        let e = LobeFinder::new(
            &catalog,
            AzEl::from_degrees(f64::NAN, 90.0),
            LobeFinderSettings::default(),
        )
        .run()
        .unwrap_err();
        assert!(e.to_string().contains("the azimuth must be finite"), "{e}");
        // An unwrapped azimuth is still a valid pointing.
        let unwrapped = AzEl::from_degrees(1.0_f64.to_degrees() + 360.0, 60.0);
        let results = LobeFinder::new(&catalog, unwrapped, LobeFinderSettings::default())
            .run()
            .unwrap();
        assert_eq!(results.lobes[0].kind, LobeKind::Primary);

        let mut below = primary_cluster(1.0);
        below.iter_mut().for_each(|s| s.above_horizon = false);
        let catalog = ProjectedCatalog::from_projected(below);
        assert_eq!(
            LobeFinder::new(&catalog, pointing(), LobeFinderSettings::default()).run(),
            Err(InputError::NothingAboveHorizon(30))
        );
    }
}
