//! # Error standards
//!
//! This module provides a standardised error enum and result type for this crate.

// -----------------------------------------------------------------------------------------------
// TYPES
// -----------------------------------------------------------------------------------------------

/// Standard result type used in the depth crate.
pub type Result<T> = std::result::Result<T, Error>;

// -----------------------------------------------------------------------------------------------
// ENUMERATIONS
// -----------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A neighbourhood would extend past the edge of its raster.
    #[error(
        "Neighbourhood at ({x}, {y}) with radii ({rx}, {ry}) does not fit inside a \
        {width}x{height} raster"
    )]
    OutOfBounds {
        x: usize,
        y: usize,
        rx: usize,
        ry: usize,
        width: usize,
        height: usize
    },

    /// The search region centre lies outside the right raster and no candidate matched.
    #[error("Search region centre ({x}, {y}) lies outside the {width}x{height} raster")]
    RegionOutOfBounds {
        x: isize,
        y: isize,
        width: usize,
        height: usize
    },

    /// Views passed to the similarity metric differ in shape, given as (width, height, channels).
    #[error("Views are incompatible: {lhs:?} vs {rhs:?} (width, height, channels)")]
    IncompatibleViews {
        lhs: (usize, usize, usize),
        rhs: (usize, usize, usize)
    },

    #[error("Zero horizontal disparity at ({x}, {y}), depth is undefined")]
    DegenerateDisparity {
        x: usize,
        y: usize
    },

    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter {
        name: &'static str,
        value: f64
    },

    #[error("Parse error on line {line}: {message}")]
    Parse {
        line: usize,
        message: String
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[cfg(feature = "statistics")]
    #[error("Statistics plotting failed: {0}")]
    Statistics(String)
}
