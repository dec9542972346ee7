//! # Search statistics
//!
//! Plots how the lowest SSD varies across the rows of a search region. Only built with the
//! `statistics` feature.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use plotters::prelude::*;
use std::path::Path;

use crate::error::*;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Output path of the per-row minimum SSD plot.
pub const ROW_MINIMA_PLOT: &str = "plots/search/row_min_ssd.png";

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Plot the lowest SSD found in each row, given as `(row, ssd)` pairs in row order.
pub fn plot_row_minima<P: AsRef<Path>>(minima: &[(usize, u64)], path: P) -> Result<()> {
    if minima.is_empty() {
        return Ok(());
    }

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)?;
    }

    let y_min = minima[0].0 as f64;
    let y_max = minima[minima.len() - 1].0 as f64 + 1.0;
    let ssd_max = minima.iter().map(|&(_, ssd)| ssd).max().unwrap_or(0) as f64 + 1.0;

    let area = BitMapBackend::new(path.as_ref(), (800, 600)).into_drawing_area();
    area.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&area)
        .caption("Minimum SSD per search row", ("sans-serif", 20).into_font())
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_ranged(y_min..y_max, 0.0..ssd_max)
        .map_err(plot_err)?;

    chart.configure_mesh().draw().map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            minima.iter().map(|&(y, ssd)| (y as f64, ssd as f64)),
            &RED
        ))
        .map_err(plot_err)?;

    Ok(())
}

fn plot_err<E: std::fmt::Debug>(e: E) -> Error {
    Error::Statistics(format!("{:?}", e))
}
