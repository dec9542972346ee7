//! # Stereo depth perception
//!
//! This crate estimates the depth at a pixel of a stereo image pair by block matching the
//! pixel's neighbourhood into the right image and triangulating the resulting disparity.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod annotate;
pub mod config;
pub mod coords;
pub mod depth;
mod error;
pub mod raster;
pub mod regression;
pub mod search;
pub mod ssd;
#[cfg(feature = "statistics")]
pub mod statistics;

// -----------------------------------------------------------------------------------------------
// EXPORTS
// -----------------------------------------------------------------------------------------------

pub use crate::error::{Error, Result};

pub mod prelude {
    pub use crate::config::StereoConfig;
    pub use crate::coords::{Coordinates, Offset, Radii};
    pub use crate::depth::{estimate_depth, get_depth, DepthEstimate, DepthParams, Triangulation};
    pub use crate::raster::{neighbourhood, Raster, View};
    pub use crate::search::{find_best_match, get_offset, search, Match, SearchParams};
    pub use crate::ssd::sum_of_squared_differences;
}
