//! # Coordinates
//!
//! Pixel coordinates, signed offsets and neighbourhood radii used to index rasters.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::ops::Sub;

use crate::raster::Raster;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Address of a pixel within a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: usize,
    pub y: usize
}

/// Signed displacement between two coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub x: isize,
    pub y: isize
}

/// Half extents of a rectangular neighbourhood.
///
/// A neighbourhood with radii `(rx, ry)` spans `2 * rx + 1` columns and `2 * ry + 1` rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Radii {
    pub x: usize,
    pub y: usize
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl Coordinates {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Apply an offset, returning `None` if either component would become negative.
    pub fn offset_by(self, offset: Offset) -> Option<Self> {
        let x = self.x as isize + offset.x;
        let y = self.y as isize + offset.y;

        if x < 0 || y < 0 {
            None
        }
        else {
            Some(Self::new(x as usize, y as usize))
        }
    }

    /// The coordinates as a signed offset from the origin.
    pub fn as_offset(self) -> Offset {
        Offset::new(self.x as isize, self.y as isize)
    }
}

impl Sub for Coordinates {
    type Output = Offset;

    fn sub(self, rhs: Coordinates) -> Offset {
        Offset::new(
            self.x as isize - rhs.x as isize,
            self.y as isize - rhs.y as isize
        )
    }
}

impl Offset {
    pub fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }
}

impl Radii {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Width and height of the neighbourhood these radii describe.
    pub fn extent(self) -> (usize, usize) {
        (2 * self.x + 1, 2 * self.y + 1)
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Offset of the given coordinates from the centre of the raster.
///
/// The centre is `(width / 2, height / 2)` using integer division.
pub fn centre_offset<R: Raster + ?Sized>(raster: &R, c: Coordinates) -> Offset {
    c - Coordinates::new(raster.width() / 2, raster.height() / 2)
}

/// Coordinates at the given offset from the centre of the raster, if they fall inside it.
pub fn from_centre_offset<R: Raster + ?Sized>(raster: &R, offset: Offset) -> Option<Coordinates> {
    let c = Coordinates::new(raster.width() / 2, raster.height() / 2).offset_by(offset)?;

    if c.x < raster.width() && c.y < raster.height() {
        Some(c)
    }
    else {
        None
    }
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
