//! # Depth estimation
//!
//! Converts the horizontal disparity found by the correspondence search into a metric depth by
//! triangulating with the pinhole camera model.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::coords::{Coordinates, Offset};
use crate::error::*;
use crate::raster::Raster;
use crate::search::{search, SearchParams};

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Camera geometry used to triangulate depth.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthParams {
    /// Focal length, in the same unit as `pixel_scale`.
    pub focal_length: f64,

    /// Size of one pixel on the sensor.
    pub pixel_scale: f64,

    /// Baseline between the two camera centres. Depth is reported in this unit.
    pub camera_displacement: f64,

    #[serde(default)]
    pub triangulation: Triangulation
}

/// Triangulation formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Triangulation {
    /// Scale the baseline ratio by the length of the viewing ray through the query pixel, which
    /// stays accurate for pixels far from the image centre.
    Oblique,

    /// Scale the baseline ratio by the focal length alone.
    Pinhole
}

/// Depth at a query pixel along with the disparity it was computed from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthEstimate {
    pub depth: f64,

    /// Offset from the query pixel to its match in the right raster.
    pub offset: Offset,

    /// False if the search fell back to the centre of the search region, in which case the depth
    /// is not backed by a genuine match.
    pub confident: bool
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Default for Triangulation {
    fn default() -> Self {
        Triangulation::Oblique
    }
}

impl DepthParams {
    pub fn new(focal_length: f64, pixel_scale: f64, camera_displacement: f64) -> Self {
        Self {
            focal_length,
            pixel_scale,
            camera_displacement,
            triangulation: Triangulation::Oblique
        }
    }

    pub fn with_triangulation(mut self, triangulation: Triangulation) -> Self {
        self.triangulation = triangulation;
        self
    }

    /// Check that focal length and pixel scale are positive and the baseline is finite.
    pub fn validate(&self) -> Result<()> {
        if !(self.focal_length > 0.0) || !self.focal_length.is_finite() {
            return Err(Error::InvalidParameter {
                name: "focal_length",
                value: self.focal_length
            });
        }

        if !(self.pixel_scale > 0.0) || !self.pixel_scale.is_finite() {
            return Err(Error::InvalidParameter {
                name: "pixel_scale",
                value: self.pixel_scale
            });
        }

        if !self.camera_displacement.is_finite() {
            return Err(Error::InvalidParameter {
                name: "camera_displacement",
                value: self.camera_displacement
            });
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Triangulate the depth of the pixel at `c` in a raster `width` pixels wide, given the offset of
/// its match in the other raster.
///
/// A match found to the left of the query (`offset.x < 0`) with a positive baseline gives a
/// positive depth. Zero horizontal disparity fails with [`Error::DegenerateDisparity`].
pub fn triangulate(c: Coordinates, width: usize, offset: Offset, params: &DepthParams) -> Result<f64> {
    if offset.x == 0 {
        return Err(Error::DegenerateDisparity { x: c.x, y: c.y });
    }

    let true_offset = -(offset.x as f64) * params.pixel_scale;
    let scale_factor = params.camera_displacement / true_offset;

    let ray_length = match params.triangulation {
        Triangulation::Oblique => {
            let centre_offset = (c.x as isize - (width / 2) as isize) as f64 * params.pixel_scale;
            params.focal_length.hypot(centre_offset)
        },
        Triangulation::Pinhole => params.focal_length
    };

    Ok(scale_factor * ray_length)
}

/// Estimate the depth at `c` in the left raster.
pub fn estimate_depth<L, R>(
    lhs: &L,
    rhs: &R,
    c: Coordinates,
    search_params: &SearchParams,
    depth_params: &DepthParams
) -> Result<DepthEstimate>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    depth_params.validate()?;

    let m = search(lhs, rhs, c, search_params)?;
    let offset = m.coords - c;
    let depth = triangulate(c, lhs.width(), offset, depth_params)?;

    log::debug!("Depth at ({}, {}): {} (offset {:?})", c.x, c.y, depth, offset);

    Ok(DepthEstimate {
        depth,
        offset,
        confident: m.is_confident()
    })
}

/// Estimate the depth at `c` in the left raster, discarding match details.
pub fn get_depth<L, R>(
    lhs: &L,
    rhs: &R,
    c: Coordinates,
    search_params: &SearchParams,
    depth_params: &DepthParams
) -> Result<f64>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    Ok(estimate_depth(lhs, rhs, c, search_params, depth_params)?.depth)
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
