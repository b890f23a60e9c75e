// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plot the orthographic disk with the lobes that were found.
//!
//! Only available with the "plotting" feature.

use std::path::Path;

use thiserror::Error;

use crate::{
    catalog::ProjectedCatalog,
    io::write::FileWriteError,
    lobes::{draw_circle, Circle, LobeSearchResults},
};

#[derive(Error, Debug)]
pub enum PlotError {
    #[cfg(not(feature = "plotting"))]
    #[error("lobe-finder was not compiled with the \"plotting\" feature.\nYou need to compile lobe-finder from source with this feature to plot lobes.")]
    NoPlottingFeature,

    #[error("Error from the plotters library: {0}")]
    Draw(String),

    #[error(transparent)]
    FileWrite(#[from] FileWriteError),
}

/// Convert a position on the orthographic disk into (east, north)
/// coordinates. Azimuth is measured from north through east.
pub fn to_cartesian(azimuth: f64, radius: f64) -> (f64, f64) {
    let (s, c) = azimuth.sin_cos();
    (radius * s, radius * c)
}

/// The closed outline of a circle on the disk in (east, north) coordinates.
pub fn circle_outline(circle: &Circle) -> Vec<(f64, f64)> {
    let mut outline: Vec<(f64, f64)> = draw_circle(circle, None)
        .outline()
        .into_iter()
        .map(|(az, r)| to_cartesian(az, r))
        .collect();
    if let Some(&first) = outline.first() {
        outline.push(first);
    }
    outline
}

#[cfg(not(feature = "plotting"))]
pub fn plot_lobes(
    _file: &Path,
    _catalog: &ProjectedCatalog,
    _results: &LobeSearchResults,
    _title: &str,
) -> Result<(), PlotError> {
    Err(PlotError::NoPlottingFeature)
}

/// Draw every source above the horizon, colouring the members of each lobe
/// and outlining their search circles. The plot is written as a PNG.
#[cfg(feature = "plotting")]
pub fn plot_lobes(
    file: &Path,
    catalog: &ProjectedCatalog,
    results: &LobeSearchResults,
    title: &str,
) -> Result<(), PlotError> {
    use plotters::prelude::{Circle as Marker, *};

    use crate::io::write::can_write_to_file;

    /// The number of pixels along each side of the plot.
    const PIXELS: u32 = 1200;
    /// The plotted extent of the disk.
    const LIMIT: f64 = 1.05;
    const SOURCE_COLOUR: RGBColor = RGBColor(160, 160, 160);
    const LOBE_COLOURS: [RGBColor; 6] = [RED, BLUE, GREEN, MAGENTA, CYAN, RGBColor(255, 140, 0)];

    fn draw_error<E: std::error::Error>(e: E) -> PlotError {
        PlotError::Draw(e.to_string())
    }

    can_write_to_file(file)?;
    let root = BitMapBackend::new(file, (PIXELS, PIXELS)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(-LIMIT..LIMIT, -LIMIT..LIMIT)
        .map_err(draw_error)?;
    chart
        .configure_mesh()
        .x_desc("East")
        .y_desc("North")
        .draw()
        .map_err(draw_error)?;

    let horizon = (0..=360).map(|deg| to_cartesian(f64::from(deg).to_radians(), 1.0));
    chart
        .draw_series(LineSeries::new(horizon, &BLACK))
        .map_err(draw_error)?;
    chart
        .draw_series(catalog.iter().filter(|s| s.above_horizon).map(|s| {
            Marker::new(to_cartesian(s.azimuth, s.radius), 2, SOURCE_COLOUR.filled())
        }))
        .map_err(draw_error)?;

    for (i, lobe) in results.lobes.iter().enumerate() {
        let colour = LOBE_COLOURS[i % LOBE_COLOURS.len()];
        chart
            .draw_series(lobe.members.iter().map(|&m| {
                let s = catalog.get(m);
                Marker::new(to_cartesian(s.azimuth, s.radius), 3, colour.filled())
            }))
            .map_err(draw_error)?
            .label(lobe.kind.to_string())
            .legend(move |(x, y)| Marker::new((x, y), 4, colour.filled()));
        if let Some(circle) = &lobe.search_circle {
            chart
                .draw_series(LineSeries::new(circle_outline(circle), &colour))
                .map_err(draw_error)?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_error)?;
    root.present().map_err(draw_error)?;
    log::debug!("Plotted {} lobes to {}", results.lobes.len(), file.display());
    Ok(())
}
