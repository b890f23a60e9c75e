// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Imaging commands for each lobe.
//!
//! Every lobe gets three lines: `chgcentre` to rephase the measurement set to
//! the lobe's centre, `wsclean` to image it, and `chgcentre -zenith` to put
//! the measurement set back.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::debug;

use super::{can_write_to_file, WriteError};
use crate::{
    constants::{BRIGHT_SOURCE_IMAGE_SIZE, IMAGE_SIZE_PADDING},
    lobes::{LobeKind, LobeResult},
};

/// The size of an image \[pixels\].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub ra: u32,
    pub dec: u32,
}

impl ImageSize {
    /// Enough pixels to cover a lobe's angular extent, plus some padding.
    /// Lone bright sources always get the same size.
    pub fn for_lobe(lobe: &LobeResult, pixel_scale_arcsec: f64) -> ImageSize {
        match lobe.kind {
            LobeKind::BrightSource(_) => ImageSize {
                ra: BRIGHT_SOURCE_IMAGE_SIZE,
                dec: BRIGHT_SOURCE_IMAGE_SIZE,
            },
            LobeKind::Primary | LobeKind::Sidelobe(_) => ImageSize {
                ra: num_pixels(lobe.extent_ra_deg, pixel_scale_arcsec),
                dec: num_pixels(lobe.extent_dec_deg, pixel_scale_arcsec),
            },
        }
    }
}

fn num_pixels(extent_deg: f64, pixel_scale_arcsec: f64) -> u32 {
    // Truncation is intended.
    (extent_deg * 3600.0 / pixel_scale_arcsec) as u32 + IMAGE_SIZE_PADDING
}

/// Write the imaging commands for all `lobes`.
pub fn write_imaging_commands<W: Write>(
    writer: &mut W,
    obsid: u32,
    lobes: &[LobeResult],
    pixel_scale_arcsec: f64,
) -> std::io::Result<()> {
    for lobe in lobes {
        let size = ImageSize::for_lobe(lobe, pixel_scale_arcsec);
        writeln!(writer, "chgcentre {obsid}.ms {}", lobe.centre_hmsdms())?;
        writeln!(
            writer,
            "wsclean -name {obsid}_{} -size {} {} -niter 30000 -auto-threshold 8.0 -auto-mask 10.0 -pol I -weight uniform -scale {pixel_scale_arcsec}asec -abs-mem 31 -j 12 -apply-primary-beam -mwa-path $mwapath -mgain 0.85 -minuv-l 60 {obsid}.ms",
            lobe.kind.label(),
            size.ra,
            size.dec,
        )?;
        writeln!(writer, "chgcentre -zenith {obsid}.ms")?;
    }
    Ok(())
}

/// Write the imaging commands for all `lobes` to `file`.
pub fn write_imaging_commands_file(
    file: &Path,
    obsid: u32,
    lobes: &[LobeResult],
    pixel_scale_arcsec: f64,
) -> Result<(), WriteError> {
    can_write_to_file(file)?;
    let mut writer = BufWriter::new(File::create(file)?);
    write_imaging_commands(&mut writer, obsid, lobes, pixel_scale_arcsec)?;
    writer.flush()?;
    debug!(
        "Wrote imaging commands for {} lobes to {}",
        lobes.len(),
        file.display()
    );
    Ok(())
}
