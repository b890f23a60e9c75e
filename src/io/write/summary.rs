// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A machine-readable summary of a lobe search.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    str::FromStr,
};

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{can_write_to_file, ImageSize, WriteError};
use crate::{
    catalog::SourceCatalog,
    lobes::{Circle, LobeResult, LobeSearchResults},
};

#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
pub enum SummaryType {
    #[strum(serialize = "json")]
    Json,

    #[strum(serialize = "yaml")]
    Yaml,

    #[strum(serialize = "toml")]
    Toml,
}

lazy_static::lazy_static! {
    pub static ref SUMMARY_TYPES_COMMA_SEPARATED: String = SummaryType::iter().join(", ");
}

impl SummaryType {
    /// Work out the summary type from a file's extension.
    pub fn from_path(path: &Path) -> Option<SummaryType> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "yml" => Some(SummaryType::Yaml),
            e => SummaryType::from_str(e).ok(),
        }
    }
}

/// One lobe in a [`LobeSummary`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LobeRecord {
    pub name: String,
    pub centre_ra_deg: f64,
    pub centre_dec_deg: f64,
    pub centre_hmsdms: String,
    pub extent_ra_deg: f64,
    pub extent_dec_deg: f64,
    pub image_size: [u32; 2],
    pub flux: f64,
    pub num_sources: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_circle: Option<Circle>,

    /// The ids of the lobe's sources. Only written when asked for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ids: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LobeSummary {
    pub obsid: u32,
    pub pixel_scale_arcsec: f64,
    pub total_flux: f64,
    pub captured_flux: f64,
    pub captured_fraction: f64,
    pub lobes: Vec<LobeRecord>,
}

impl LobeSummary {
    pub fn new(
        obsid: u32,
        pixel_scale_arcsec: f64,
        results: &LobeSearchResults,
        catalog: &SourceCatalog,
        with_source_ids: bool,
    ) -> LobeSummary {
        LobeSummary {
            obsid,
            pixel_scale_arcsec,
            total_flux: results.total_flux,
            captured_flux: results.captured_flux,
            captured_fraction: results.captured_fraction(),
            lobes: results
                .lobes
                .iter()
                .map(|lobe| LobeRecord::new(lobe, pixel_scale_arcsec, catalog, with_source_ids))
                .collect(),
        }
    }
}

impl LobeRecord {
    fn new(
        lobe: &LobeResult,
        pixel_scale_arcsec: f64,
        catalog: &SourceCatalog,
        with_source_ids: bool,
    ) -> LobeRecord {
        let size = ImageSize::for_lobe(lobe, pixel_scale_arcsec);
        LobeRecord {
            name: lobe.kind.label(),
            centre_ra_deg: lobe.centre.ra.to_degrees(),
            centre_dec_deg: lobe.centre.dec.to_degrees(),
            centre_hmsdms: lobe.centre_hmsdms(),
            extent_ra_deg: lobe.extent_ra_deg,
            extent_dec_deg: lobe.extent_dec_deg,
            image_size: [size.ra, size.dec],
            flux: lobe.flux,
            num_sources: lobe.num_members(),
            search_circle: lobe.search_circle,
            source_ids: with_source_ids
                .then(|| lobe.member_sources(catalog).map(|s| s.id.clone()).collect()),
        }
    }
}

/// Write a lobe summary to `file`. The format is determined by the file's
/// extension.
pub fn write_summary(file: &Path, summary: &LobeSummary) -> Result<(), WriteError> {
    let summary_type = SummaryType::from_path(file)
        .ok_or_else(|| WriteError::UnknownSummaryType(file.to_path_buf()))?;
    can_write_to_file(file)?;
    let mut writer = BufWriter::new(File::create(file)?);
    match summary_type {
        SummaryType::Json => serde_json::to_writer_pretty(&mut writer, summary)?,
        SummaryType::Yaml => serde_yaml::to_writer(&mut writer, summary)?,
        SummaryType::Toml => writer.write_all(toml::to_string(summary)?.as_bytes())?,
    }
    writer.flush()?;
    debug!("Wrote the {summary_type} lobe summary to {}", file.display());
    Ok(())
}
