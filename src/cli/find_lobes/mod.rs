// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.


use std::{path::PathBuf, str::FromStr};

use clap::Parser;
use hifitime::{Duration, Epoch};
use log::{debug, info, trace};
use marlu::{AzEl, LatLngHeight};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::{
    display_warnings, InfoPrinter, Warn, ARG_FILE_HELP, ARRAY_POSITION_HELP, CATALOGUE_TYPE_HELP,
    SUMMARY_HELP,
};
use crate::{
    catalog::{read_catalog_file, CatalogType, InputError, ProjectedCatalog},
    constants::{
        DEFAULT_FLUX_CAPTURE_THRESHOLD, DEFAULT_INITIAL_RADIUS, DEFAULT_MAX_BRIGHT_SOURCES,
        DEFAULT_MAX_GROWTH_STEPS, DEFAULT_MAX_SIDELOBES, DEFAULT_MIN_SIDELOBE_COUNT,
        DEFAULT_RADIUS_STEP,
    },
    io::write::{SummaryType, SUMMARY_TYPES_COMMA_SEPARATED},
    lobes::{GrowthSettings, LobeFinderSettings},
    metafits::{lst_from_gps, MetafitsInfo, Observation},
    params::{LobeFinderParams, OutputFiles},
    LobeFinderError,
};

lazy_static::lazy_static! {
    static ref INITIAL_RADIUS_HELP: String =
        format!("The radius of the first search circle, in units of the orthographic projection (1 is the horizon). Default: {DEFAULT_INITIAL_RADIUS}");

    static ref RADIUS_STEP_HELP: String =
        format!("How much the search circle grows every step. Default: {DEFAULT_RADIUS_STEP}");

    static ref MAX_GROWTH_STEPS_HELP: String =
        format!("Give up on a lobe after growing its search circle this many times. Default: {DEFAULT_MAX_GROWTH_STEPS}");

    static ref MAX_SIDELOBES_HELP: String =
        format!("The maximum number of sidelobes to look for. Default: {DEFAULT_MAX_SIDELOBES}");

    static ref MIN_SIDELOBE_COUNT_HELP: String =
        format!("An azimuth bin needs more than this many sources to propose a sidelobe. Default: {DEFAULT_MIN_SIDELOBE_COUNT}");

    static ref MAX_BRIGHT_SOURCES_HELP: String =
        format!("The maximum number of lone bright sources to claim after the lobes have been found. Default: {DEFAULT_MAX_BRIGHT_SOURCES}");

    static ref FLUX_THRESHOLD_HELP: String =
        format!("Stop claiming bright sources once this fraction of the apparent flux density above the horizon has been captured. Default: {DEFAULT_FLUX_CAPTURE_THRESHOLD}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct FindLobesCliArgs {
    /// Path to the source catalogue, e.g. an Aegean component table. The
    /// default is "<OBSID>-sources_comp.fits".
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) catalogue: Option<PathBuf>,

    #[clap(long, help = CATALOGUE_TYPE_HELP.as_str(), help_heading = "INPUT FILES")]
    pub(super) catalogue_type: Option<String>,

    /// Path to the observation's metafits file. If not given, but
    /// "<OBSID>.metafits" exists, that is used.
    #[clap(short, long, parse(from_os_str), help_heading = "INPUT FILES")]
    pub(super) metafits: Option<PathBuf>,

    /// The observation ID. Used to name output files and measurement sets.
    /// Read from the metafits file if not given.
    #[clap(long, help_heading = "OBSERVATION")]
    pub(super) obsid: Option<u32>,

    /// The azimuth of the pointing centre [degrees]. Must be given with
    /// --pointing-alt. Overrides the metafits pointing.
    #[clap(long, help_heading = "OBSERVATION")]
    pub(super) pointing_az: Option<f64>,

    /// The altitude of the pointing centre [degrees]. Must be given with
    /// --pointing-az. Overrides the metafits pointing.
    #[clap(long, help_heading = "OBSERVATION")]
    pub(super) pointing_alt: Option<f64>,

    /// The local sidereal time [degrees]. Overrides --gps-time and the
    /// metafits LST.
    #[clap(long, help_heading = "OBSERVATION")]
    pub(super) lst: Option<f64>,

    /// The GPS time of the observation [seconds]. The LST is derived from it
    /// and the array position. Overrides the metafits LST.
    #[clap(long, help_heading = "OBSERVATION")]
    pub(super) gps_time: Option<f64>,

    /// UT1 - UTC [seconds], used with --gps-time. Read from the metafits file
    /// if not given, otherwise 0.
    #[clap(long, help_heading = "OBSERVATION")]
    pub(super) dut1: Option<f64>,

    #[clap(
        long, help = ARRAY_POSITION_HELP.as_str(), help_heading = "OBSERVATION",
        number_of_values = 3,
        allow_hyphen_values = true,
        value_names = &["LONG_DEG", "LAT_DEG", "HEIGHT_M"]
    )]
    pub(super) array_position: Option<Vec<f64>>,

    /// Don't precess the array to J2000 before putting catalogue sources on
    /// the sky. Catalogue positions are assumed to be J2000. Precession needs
    /// the time of the observation (--gps-time or a metafits file).
    #[clap(long, help_heading = "OBSERVATION")]
    #[serde(default)]
    pub(super) no_precession: bool,

    /// The pixel scale of the images that wsclean will make [arcseconds].
    /// Required.
    #[clap(short, long, help_heading = "IMAGING")]
    pub(super) scale: Option<f64>,

    /// Where to write the chgcentre and wsclean commands. The default is
    /// "<OBSID>_position.txt".
    #[clap(short, long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) output_commands: Option<PathBuf>,

    #[clap(long, parse(from_os_str), help = SUMMARY_HELP.as_str(), help_heading = "OUTPUT FILES")]
    pub(super) output_summary: Option<PathBuf>,

    /// Plot the orthographic disk and the lobes that were found. Only
    /// available if compiled with the "plotting" feature.
    #[clap(long, help_heading = "OUTPUT FILES")]
    #[serde(default)]
    pub(super) plot: bool,

    /// Where to write the plot. Implies --plot. The default is
    /// "<OBSID>_lobes.png".
    #[clap(long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) plot_file: Option<PathBuf>,

    /// Report every source in each lobe, and include source ids in the
    /// summary.
    #[clap(long, help_heading = "OUTPUT FILES")]
    #[serde(default)]
    pub(super) list_sources: bool,
}

impl FindLobesCliArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            catalogue: self.catalogue.or(other.catalogue),
            catalogue_type: self.catalogue_type.or(other.catalogue_type),
            metafits: self.metafits.or(other.metafits),
            obsid: self.obsid.or(other.obsid),
            pointing_az: self.pointing_az.or(other.pointing_az),
            pointing_alt: self.pointing_alt.or(other.pointing_alt),
            lst: self.lst.or(other.lst),
            gps_time: self.gps_time.or(other.gps_time),
            dut1: self.dut1.or(other.dut1),
            array_position: self.array_position.or(other.array_position),
            no_precession: self.no_precession || other.no_precession,
            scale: self.scale.or(other.scale),
            output_commands: self.output_commands.or(other.output_commands),
            output_summary: self.output_summary.or(other.output_summary),
            plot: self.plot || other.plot,
            plot_file: self.plot_file.or(other.plot_file),
            list_sources: self.list_sources || other.list_sources,
        }
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct SearchArgs {
    #[clap(long, help = INITIAL_RADIUS_HELP.as_str(), help_heading = "LOBE SEARCH")]
    pub(super) initial_radius: Option<f64>,

    #[clap(long, help = RADIUS_STEP_HELP.as_str(), help_heading = "LOBE SEARCH")]
    pub(super) radius_step: Option<f64>,

    #[clap(long, help = MAX_GROWTH_STEPS_HELP.as_str(), help_heading = "LOBE SEARCH")]
    pub(super) max_growth_steps: Option<usize>,

    #[clap(long, help = MAX_SIDELOBES_HELP.as_str(), help_heading = "LOBE SEARCH")]
    pub(super) max_sidelobes: Option<usize>,

    #[clap(long, help = MIN_SIDELOBE_COUNT_HELP.as_str(), help_heading = "LOBE SEARCH")]
    pub(super) min_sidelobe_count: Option<usize>,

    #[clap(long, help = MAX_BRIGHT_SOURCES_HELP.as_str(), help_heading = "LOBE SEARCH")]
    pub(super) max_bright_sources: Option<usize>,

    #[clap(long, help = FLUX_THRESHOLD_HELP.as_str(), help_heading = "LOBE SEARCH")]
    pub(super) flux_threshold: Option<f64>,

    /// Don't weight sidelobe candidate positions by flux density.
    #[clap(long, help_heading = "LOBE SEARCH")]
    #[serde(default)]
    pub(super) unweighted_sidelobes: bool,
}

impl SearchArgs {
    fn merge(self, other: Self) -> Self {
        Self {
            initial_radius: self.initial_radius.or(other.initial_radius),
            radius_step: self.radius_step.or(other.radius_step),
            max_growth_steps: self.max_growth_steps.or(other.max_growth_steps),
            max_sidelobes: self.max_sidelobes.or(other.max_sidelobes),
            min_sidelobe_count: self.min_sidelobe_count.or(other.min_sidelobe_count),
            max_bright_sources: self.max_bright_sources.or(other.max_bright_sources),
            flux_threshold: self.flux_threshold.or(other.flux_threshold),
            unweighted_sidelobes: self.unweighted_sidelobes || other.unweighted_sidelobes,
        }
    }

    fn parse(self) -> Result<LobeFinderSettings, FindLobesArgsError> {
        let Self {
            initial_radius,
            radius_step,
            max_growth_steps,
            max_sidelobes,
            min_sidelobe_count,
            max_bright_sources,
            flux_threshold,
            unweighted_sidelobes,
        } = self;

        let initial_radius = initial_radius.unwrap_or(DEFAULT_INITIAL_RADIUS);
        if !initial_radius.is_finite() || initial_radius <= 0.0 {
            return Err(FindLobesArgsError::BadSearchSetting {
                name: "initial radius",
                value: initial_radius.to_string(),
            });
        }
        let radius_step = radius_step.unwrap_or(DEFAULT_RADIUS_STEP);
        if !radius_step.is_finite() || radius_step <= 0.0 {
            return Err(FindLobesArgsError::BadSearchSetting {
                name: "radius step",
                value: radius_step.to_string(),
            });
        }
        // A stable count needs at least two circles.
        let max_steps = max_growth_steps.unwrap_or(DEFAULT_MAX_GROWTH_STEPS);
        if max_steps < 2 {
            return Err(FindLobesArgsError::BadSearchSetting {
                name: "maximum growth steps",
                value: max_steps.to_string(),
            });
        }
        let flux_capture_threshold = flux_threshold.unwrap_or(DEFAULT_FLUX_CAPTURE_THRESHOLD);
        if !(flux_capture_threshold > 0.0 && flux_capture_threshold <= 1.0) {
            return Err(FindLobesArgsError::BadSearchSetting {
                name: "flux threshold",
                value: flux_capture_threshold.to_string(),
            });
        }

        Ok(LobeFinderSettings {
            growth: GrowthSettings {
                initial_radius,
                radius_step,
                max_steps,
            },
            max_sidelobes: max_sidelobes.unwrap_or(DEFAULT_MAX_SIDELOBES),
            min_sidelobe_count: min_sidelobe_count.unwrap_or(DEFAULT_MIN_SIDELOBE_COUNT),
            max_bright_sources: max_bright_sources.unwrap_or(DEFAULT_MAX_BRIGHT_SOURCES),
            flux_capture_threshold,
            weighted_sidelobes: !unweighted_sidelobes,
        })
    }
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct FindLobesArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "find-lobes")]
    #[serde(default)]
    pub(super) find_lobes_args: FindLobesCliArgs,

    #[clap(flatten)]
    #[serde(rename = "search")]
    #[serde(default)]
    pub(super) search_args: SearchArgs,
}

impl FindLobesArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified into
    /// a single struct. Where applicable, it will prefer CLI parameters over
    /// those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<FindLobesArgs, LobeFinderError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Ensure all of the file args are accounted for by pattern
            // matching.
            let FindLobesArgs {
                args_file: _,
                find_lobes_args,
                search_args,
            } = unpack_arg_file!(arg_file);

            Ok(FindLobesArgs {
                args_file: None,
                find_lobes_args: cli_args.find_lobes_args.merge(find_lobes_args),
                search_args: cli_args.search_args.merge(search_args),
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<LobeFinderParams, LobeFinderError> {
        let Self {
            args_file: _,
            find_lobes_args:
                FindLobesCliArgs {
                    catalogue,
                    catalogue_type,
                    metafits,
                    obsid,
                    pointing_az,
                    pointing_alt,
                    lst,
                    gps_time,
                    dut1,
                    array_position,
                    no_precession,
                    scale,
                    output_commands,
                    output_summary,
                    plot,
                    plot_file,
                    list_sources,
                },
            search_args,
        } = self;

        let settings = search_args.parse()?;

        // The metafits file is optional, but if one was named, it has to be
        // there.
        let metafits = match (metafits, obsid) {
            (Some(m), _) => {
                if !m.exists() {
                    return Err(FindLobesArgsError::MetafitsDoesntExist(m).into());
                }
                Some(m)
            }
            (None, Some(obsid)) => {
                let m = PathBuf::from(format!("{obsid}.metafits"));
                if m.exists() {
                    debug!("Found {}", m.display());
                    Some(m)
                } else {
                    None
                }
            }
            (None, None) => None,
        };
        let meta = match &metafits {
            Some(m) => Some(MetafitsInfo::read(m)?),
            None => None,
        };

        let obsid = match (obsid, &meta) {
            (Some(o), Some(meta)) => {
                if o != meta.obsid {
                    format!(
                        "The specified obsid ({o}) is different to the metafits obsid ({}); using {o}",
                        meta.obsid
                    )
                    .warn();
                }
                o
            }
            (Some(o), None) => o,
            (None, Some(meta)) => meta.obsid,
            (None, None) => return Err(FindLobesArgsError::NoObsid.into()),
        };

        let pointing = match (pointing_az, pointing_alt, &meta) {
            (Some(az), Some(alt), _) => {
                if !az.is_finite() || !(0.0..=90.0).contains(&alt) {
                    return Err(InputError::BadPointing { az, alt }.into());
                }
                AzEl::from_degrees(az, alt)
            }
            (Some(_), None, _) | (None, Some(_), _) => {
                return Err(FindLobesArgsError::OnlyOneOfAzAlt.into())
            }
            (None, None, Some(meta)) => meta.pointing,
            (None, None, None) => return Err(FindLobesArgsError::NoPointing.into()),
        };

        let array_position = match array_position {
            Some(v) => {
                if v.len() != 3 {
                    return Err(FindLobesArgsError::BadArrayPosition { pos: v }.into());
                }
                LatLngHeight {
                    longitude_rad: v[0].to_radians(),
                    latitude_rad: v[1].to_radians(),
                    height_metres: v[2],
                }
            }
            None => LatLngHeight::mwa(),
        };

        let dut1 = dut1
            .or_else(|| meta.as_ref().and_then(|m| m.dut1))
            .unwrap_or(0.0);
        let lst_rad = match (lst, gps_time, &meta) {
            (Some(lst), _, _) => lst.to_radians(),
            (None, Some(gps), _) => lst_from_gps(gps, array_position, dut1),
            (None, None, Some(meta)) => meta.lst_rad,
            (None, None, None) => return Err(FindLobesArgsError::NoLst.into()),
        };

        let time = match (gps_time, &meta) {
            (Some(gps), _) => Some(Epoch::from_gpst_seconds(gps)),
            (None, Some(meta)) => Some(meta.start),
            (None, None) => None,
        };
        let time = match time {
            _ if no_precession => None,
            Some(t) => Some((t, Duration::from_seconds(dut1))),
            None => {
                "No observation time is available (--gps-time or a metafits file); catalogue positions will not be precessed"
                    .warn();
                None
            }
        };
        let observation = Observation::new(Some(obsid), pointing, lst_rad, array_position, time);
        let mut obs_printer = InfoPrinter::new(format!("Observation {obsid}").into());
        if let Some(m) = &metafits {
            obs_printer.push_line(format!("Metafits: {}", m.display()).into());
        }
        obs_printer.push_block(vec![
            format!(
                "Pointing: Az {:.4}°, Alt {:.4}°",
                pointing.az.to_degrees(),
                pointing.el.to_degrees()
            )
            .into(),
            format!("LST:      {:.6}°", lst_rad.to_degrees()).into(),
        ]);
        if observation.is_precessed() {
            let (lst_j2000, latitude_j2000) = observation.j2000_frame();
            obs_printer.push_block(vec![
                format!("LST:      {:.6}° (J2000)", lst_j2000.to_degrees()).into(),
                format!("Latitude: {:.6}° (J2000)", latitude_j2000.to_degrees()).into(),
            ]);
        } else {
            obs_printer.push_line("Not precessing to J2000".into());
        }
        obs_printer.push_line(
            format!(
                "Array position: {:.6}°, {:.6}°, {:.3}m",
                array_position.longitude_rad.to_degrees(),
                array_position.latitude_rad.to_degrees(),
                array_position.height_metres
            )
            .into(),
        );
        obs_printer.display();

        let catalogue =
            catalogue.unwrap_or_else(|| PathBuf::from(format!("{obsid}-sources_comp.fits")));
        let catalogue_type = match catalogue_type {
            Some(t) => Some(
                CatalogType::from_str(&t.to_lowercase())
                    .map_err(|_| FindLobesArgsError::UnknownCatalogueType(t))?,
            ),
            None => None,
        };
        let (catalog, catalogue_type) = read_catalog_file(&catalogue, catalogue_type)?;
        let projected = ProjectedCatalog::new(&catalog, &observation);
        let num_visible = projected.iter().filter(|s| s.above_horizon).count();

        let mut cat_printer = InfoPrinter::new("Source catalogue".into());
        cat_printer.push_block(vec![
            format!("{}", catalogue.display()).into(),
            format!("{catalogue_type} catalogue").into(),
        ]);
        cat_printer.push_line(
            format!(
                "{} sources ({num_visible} above the horizon), {:.3} Jy total",
                catalog.len(),
                catalog.total_flux()
            )
            .into(),
        );
        cat_printer.display();
        if num_visible < catalog.len() {
            format!(
                "{} sources are below the horizon and will be ignored",
                catalog.len() - num_visible
            )
            .warn();
        }

        let pixel_scale_arcsec = match scale {
            None => return Err(FindLobesArgsError::NoPixelScale.into()),
            Some(s) if !s.is_finite() || s <= 0.0 => {
                return Err(FindLobesArgsError::BadPixelScale(s).into())
            }
            Some(s) => s,
        };

        let commands =
            output_commands.unwrap_or_else(|| PathBuf::from(format!("{obsid}_position.txt")));
        if let Some(summary) = &output_summary {
            if SummaryType::from_path(summary).is_none() {
                return Err(FindLobesArgsError::UnknownSummaryType(summary.clone()).into());
            }
        }
        let plot = if plot || plot_file.is_some() {
            if cfg!(feature = "plotting") {
                Some(plot_file.unwrap_or_else(|| PathBuf::from(format!("{obsid}_lobes.png"))))
            } else {
                "lobe-finder was not compiled with the \"plotting\" feature; no plot will be made"
                    .warn();
                None
            }
        } else {
            None
        };
        let outputs = OutputFiles {
            commands,
            summary: output_summary,
            plot,
        };

        let mut out_printer = InfoPrinter::new("Output files".into());
        out_printer.push_line(format!("Imaging commands: {}", outputs.commands.display()).into());
        if let Some(s) = &outputs.summary {
            out_printer.push_line(format!("Lobe summary:     {}", s.display()).into());
        }
        if let Some(p) = &outputs.plot {
            out_printer.push_line(format!("Plot:             {}", p.display()).into());
        }
        out_printer.push_line(format!("Pixel scale:      {pixel_scale_arcsec}\"").into());
        out_printer.display();

        display_warnings();

        Ok(LobeFinderParams {
            catalog,
            projected,
            observation,
            obsid,
            pixel_scale_arcsec,
            verbose: list_sources,
            settings,
            outputs,
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), LobeFinderError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub(super) enum FindLobesArgsError {
    #[error("No obsid was given and no metafits file was supplied to read one from")]
    NoObsid,

    #[error("Metafits file '{0}' doesn't exist")]
    MetafitsDoesntExist(PathBuf),

    #[error("Both --pointing-az and --pointing-alt must be given, not only one")]
    OnlyOneOfAzAlt,

    #[error("No pointing centre was given and no metafits file was supplied to read one from")]
    NoPointing,

    #[error("No LST or GPS time was given and no metafits file was supplied to read the LST from")]
    NoLst,

    #[error("Catalogue type '{0}' is not recognised. Supported types: {}", *crate::catalog::CATALOG_TYPES_COMMA_SEPARATED)]
    UnknownCatalogueType(String),

    #[error("No pixel scale was given; use --scale")]
    NoPixelScale,

    #[error("The pixel scale must be positive, but got {0}")]
    BadPixelScale(f64),

    #[error("Array position specified as {pos:?}, not [<Longitude>, <Latitude>, <Height>]")]
    BadArrayPosition { pos: Vec<f64> },

    #[error("Invalid {name}: {value}")]
    BadSearchSetting { name: &'static str, value: String },

    #[error("Cannot write a lobe summary to '{0}'. Supported formats: {}", *SUMMARY_TYPES_COMMA_SEPARATED)]
    UnknownSummaryType(PathBuf),
}
