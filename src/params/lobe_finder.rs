// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the lobes of an observation and write out how to image them.

use std::path::PathBuf;

use log::info;
use thiserror::Error;

use crate::{
    catalog::{InputError, ProjectedCatalog, SourceCatalog},
    cli::{display_warnings, InfoPrinter},
    io::write::{write_imaging_commands_file, write_summary, ImageSize, LobeSummary, WriteError},
    lobes::{LobeFinder, LobeFinderSettings, LobeResult, LobeSearchResults},
    metafits::Observation,
    plotting::{plot_lobes, PlotError},
};

/// Where results get written.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct OutputFiles {
    /// The `chgcentre`/`wsclean` commands.
    pub(crate) commands: PathBuf,

    /// A machine-readable summary of the lobes.
    pub(crate) summary: Option<PathBuf>,

    /// A plot of the lobes on the orthographic disk.
    pub(crate) plot: Option<PathBuf>,
}

/// Parameters needed to find lobes.
pub(crate) struct LobeFinderParams {
    pub(crate) catalog: SourceCatalog,

    /// The catalogue on the orthographic disk of `observation`.
    pub(crate) projected: ProjectedCatalog,

    pub(crate) observation: Observation,

    pub(crate) obsid: u32,

    /// The pixel scale of the images to be made \[arcseconds\].
    pub(crate) pixel_scale_arcsec: f64,

    /// Report the sources in each lobe.
    pub(crate) verbose: bool,

    pub(crate) settings: LobeFinderSettings,

    pub(crate) outputs: OutputFiles,
}

impl LobeFinderParams {
    pub(crate) fn run(&self) -> Result<LobeSearchResults, FindLobesError> {
        let LobeFinderParams {
            catalog,
            projected,
            observation,
            obsid,
            pixel_scale_arcsec,
            verbose,
            settings,
            outputs:
                OutputFiles {
                    commands,
                    summary,
                    plot,
                },
        } = self;

        let results = LobeFinder::new(projected, observation.pointing, *settings).run()?;

        for lobe in &results.lobes {
            self.print_lobe(lobe);
        }
        let mut flux_printer = InfoPrinter::new("Flux density".into());
        flux_printer.push_block(vec![
            format!("Total apparent:    {:.3} Jy", results.total_flux).into(),
            format!("Captured by lobes: {:.3} Jy", results.captured_flux).into(),
            format!(
                "Captured fraction: {:.1}%",
                100.0 * results.captured_fraction()
            )
            .into(),
        ]);
        flux_printer.display();

        write_imaging_commands_file(commands, *obsid, &results.lobes, *pixel_scale_arcsec)?;
        info!(
            "chgcentre and wsclean commands written to {}",
            commands.display()
        );

        if let Some(summary) = summary {
            let lobe_summary =
                LobeSummary::new(*obsid, *pixel_scale_arcsec, &results, catalog, *verbose);
            write_summary(summary, &lobe_summary)?;
            info!("Lobe summary written to {}", summary.display());
        }

        if let Some(plot) = plot {
            plot_lobes(plot, projected, &results, &format!("obsid {obsid}"))?;
            info!("Plot written to {}", plot.display());
        }
        display_warnings();

        Ok(results)
    }

    fn print_lobe(&self, lobe: &LobeResult) {
        let size = ImageSize::for_lobe(lobe, self.pixel_scale_arcsec);
        let mut printer = InfoPrinter::new(lobe.kind.to_string().into());
        printer.push_block(vec![
            format!("Centre:  {}", lobe.centre_hmsdms()).into(),
            format!(
                "         RA {:.4}°, Dec {:.4}°",
                lobe.centre.ra.to_degrees(),
                lobe.centre.dec.to_degrees()
            )
            .into(),
        ]);
        printer.push_line(
            format!(
                "Extent:  {:.3}° (RA) × {:.3}° (Dec), imaged with {} × {} pixels",
                lobe.extent_ra_deg, lobe.extent_dec_deg, size.ra, size.dec
            )
            .into(),
        );
        printer.push_line(
            format!(
                "{} sources, {:.3} Jy apparent",
                lobe.num_members(),
                lobe.flux
            )
            .into(),
        );
        if let Some(circle) = &lobe.search_circle {
            printer.push_line(
                format!(
                    "Search circle: R = {:.3}, d = {:.3}, PA = {:.2}° ({} growth steps)",
                    circle.radius,
                    circle.distance,
                    circle.position_angle.to_degrees(),
                    lobe.growth_steps
                )
                .into(),
            );
        }
        if self.verbose {
            printer.push_block(
                lobe.member_sources(&self.catalog)
                    .map(|s| {
                        format!(
                            "{}: RA {:.4}°, Dec {:.4}°, {:.3} Jy",
                            s.id, s.ra_deg, s.dec_deg, s.apparent_flux
                        )
                        .into()
                    })
                    .collect(),
            );
        }
        printer.display();
    }
}

#[derive(Error, Debug)]
pub(crate) enum FindLobesError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Plot(#[from] PlotError),
}
