//! # Rasters and views
//!
//! This module provides the read-only raster abstraction the matcher works on, borrowed
//! rectangular views into a raster, and neighbourhood extraction.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::{ImageBuffer, Pixel};
use std::ops::Deref;

use crate::coords::{Coordinates, Radii};
use crate::error::*;

// -----------------------------------------------------------------------------------------------
// TRAITS
// -----------------------------------------------------------------------------------------------

/// A read-only 2D grid of multi-channel samples stored row by row.
pub trait Raster: Sync {
    /// Type of a single channel sample.
    type Sample: Copy + Into<i64> + Send + Sync;

    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Number of channels per pixel.
    fn channels(&self) -> usize;

    /// Interleaved samples of row `y`, `width() * channels()` long.
    ///
    /// Panics if `y` is outside the raster.
    fn row(&self, y: usize) -> &[Self::Sample];
}

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A rectangular window into a raster, addressed relative to its own top-left corner.
///
/// Views never own pixel data and cannot outlive the raster they borrow.
pub struct View<'a, R: ?Sized> {
    raster: &'a R,
    x: usize,
    y: usize,
    width: usize,
    height: usize
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl<P, C> Raster for ImageBuffer<P, C>
where
    P: Pixel + Sync + 'static,
    P::Subpixel: Into<i64> + Send + Sync + 'static,
    C: Deref<Target = [P::Subpixel]> + Sync
{
    type Sample = P::Subpixel;

    fn width(&self) -> usize {
        ImageBuffer::width(self) as usize
    }

    fn height(&self) -> usize {
        ImageBuffer::height(self) as usize
    }

    fn channels(&self) -> usize {
        P::CHANNEL_COUNT as usize
    }

    fn row(&self, y: usize) -> &[P::Subpixel] {
        let stride = Raster::width(self) * Raster::channels(self);
        let data: &[P::Subpixel] = &**self;

        &data[y * stride..(y + 1) * stride]
    }
}

impl<'a, R: ?Sized> Clone for View<'a, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R: ?Sized> Copy for View<'a, R> {}

impl<'a, R: Raster + ?Sized> View<'a, R> {
    /// A view covering the whole raster.
    pub fn full(raster: &'a R) -> Self {
        Self {
            raster,
            x: 0,
            y: 0,
            width: raster.width(),
            height: raster.height()
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.raster.channels()
    }

    /// Position of the view's top-left corner in the owning raster.
    pub fn origin(&self) -> Coordinates {
        Coordinates::new(self.x, self.y)
    }

    /// Width, height and channel count of the view.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels())
    }

    /// Interleaved samples of row `y` of the view.
    pub fn row(&self, y: usize) -> &'a [R::Sample] {
        assert!(y < self.height, "row {} outside view of height {}", y, self.height);

        let ch = self.raster.channels();
        let row = self.raster.row(self.y + y);

        &row[self.x * ch..(self.x + self.width) * ch]
    }

    /// Sample of channel `c` of the pixel at `(x, y)` in view coordinates.
    pub fn sample(&self, x: usize, y: usize, c: usize) -> R::Sample {
        assert!(x < self.width, "column {} outside view of width {}", x, self.width);

        self.row(y)[x * self.channels() + c]
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Get the neighbourhood of pixels within `radii` of `centre`.
///
/// The returned view is `2 * radii.x + 1` by `2 * radii.y + 1` pixels and aliases the raster's
/// storage. Fails with [`Error::OutOfBounds`] if any part of it would fall outside the raster.
pub fn neighbourhood<R: Raster + ?Sized>(
    raster: &R,
    centre: Coordinates,
    radii: Radii
) -> Result<View<'_, R>> {
    let width = raster.width();
    let height = raster.height();

    let fits = centre.x >= radii.x
        && centre.y >= radii.y
        && centre.x + radii.x < width
        && centre.y + radii.y < height;

    if !fits {
        return Err(Error::OutOfBounds {
            x: centre.x,
            y: centre.y,
            rx: radii.x,
            ry: radii.y,
            width,
            height
        });
    }

    let (w, h) = radii.extent();

    Ok(View {
        raster,
        x: centre.x - radii.x,
        y: centre.y - radii.y,
        width: w,
        height: h
    })
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
