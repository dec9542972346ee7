//! # Block correspondence search
//!
//! This module finds, for a pixel in the left raster, the best matching neighbourhood in the right
//! raster by exhaustive sum of squared differences block matching over a rectangular search
//! region.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::coords::{Coordinates, Offset, Radii};
use crate::error::*;
use crate::raster::{neighbourhood, Raster, View};
use crate::ssd::sum_of_squared_differences;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// Parameters controlling the search process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Radii of the neighbourhood compared at each candidate.
    pub neighbourhood_radii: Radii,

    /// Offset from the query pixel to the centre of the search region.
    pub search_offset: Offset,

    /// Radii of the search region.
    pub search_radii: Radii,

    /// A candidate must score strictly below this to count as a match.
    pub max_ssd: u64,

    /// Score rows of the search region in parallel. Ignored without the `rayon` feature.
    #[serde(default)]
    pub parallel: bool
}

/// Result of a correspondence search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Centre of the matched neighbourhood in the right raster.
    pub coords: Coordinates,

    /// Score of the match, or `None` if no candidate scored below `max_ssd` and `coords` is the
    /// untested centre of the search region.
    pub ssd: Option<u64>
}

/// Lowest scoring candidate of a single row.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    coords: Coordinates,
    ssd: u64
}

/// Inclusive range of candidate centres whose neighbourhoods fit in the right raster.
#[derive(Clone, Copy, Debug)]
struct Region {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl SearchParams {
    pub fn new(
        neighbourhood_radii: Radii,
        search_offset: Offset,
        search_radii: Radii,
        max_ssd: u64
    ) -> Self {
        Self {
            neighbourhood_radii,
            search_offset,
            search_radii,
            max_ssd,
            parallel: false
        }
    }

    /// Enable or disable parallel row scoring.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Match {
    /// Whether a candidate actually scored below `max_ssd`.
    pub fn is_confident(&self) -> bool {
        self.ssd.is_some()
    }
}

impl Region {
    /// Intersect the search region around `centre` with the valid candidate centres of a
    /// `width` by `height` raster. Returns `None` if nothing is left.
    fn clamp(
        centre: (isize, isize),
        search_radii: Radii,
        neighbourhood_radii: Radii,
        width: usize,
        height: usize
    ) -> Option<Self> {
        let axis = |c: isize, sr: usize, nr: usize, len: usize| -> Option<(usize, usize)> {
            let sr = saturating_isize(sr);
            let lo = c.saturating_sub(sr).max(nr as isize);
            let hi = c.saturating_add(sr).min(len as isize - 1 - nr as isize);

            if lo > hi {
                None
            }
            else {
                Some((lo as usize, hi as usize))
            }
        };

        let (x0, x1) = axis(centre.0, search_radii.x, neighbourhood_radii.x, width)?;
        let (y0, y1) = axis(centre.1, search_radii.y, neighbourhood_radii.y, height)?;

        Some(Self { x0, y0, x1, y1 })
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Search the right raster for the neighbourhood best matching the one around `c` in the left.
///
/// Candidates are visited row by row, left to right, and the first candidate with the lowest score
/// wins. Candidates whose neighbourhood would leave the right raster are skipped. If no candidate
/// scores below `params.max_ssd` the centre of the search region is returned with `ssd == None`.
pub fn search<L, R>(lhs: &L, rhs: &R, c: Coordinates, params: &SearchParams) -> Result<Match>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    let (centre, rows) = scan(lhs, rhs, c, params)?;

    // Reduce in row order with a strict comparison so the first minimum wins
    let mut best: Option<Candidate> = None;
    let mut best_ssd = params.max_ssd;
    for cand in rows.into_iter().flatten() {
        if cand.ssd < best_ssd {
            best_ssd = cand.ssd;
            best = Some(cand);
        }
    }

    match best {
        Some(cand) => {
            log::debug!(
                "Best match for ({}, {}) at ({}, {}) with SSD {}",
                c.x, c.y, cand.coords.x, cand.coords.y, cand.ssd
            );

            Ok(Match {
                coords: cand.coords,
                ssd: Some(cand.ssd)
            })
        },
        None => {
            let inside = centre.0 >= 0
                && centre.1 >= 0
                && (centre.0 as usize) < rhs.width()
                && (centre.1 as usize) < rhs.height();

            if !inside {
                return Err(Error::RegionOutOfBounds {
                    x: centre.0,
                    y: centre.1,
                    width: rhs.width(),
                    height: rhs.height()
                });
            }

            log::warn!(
                "No candidate for ({}, {}) scored below {}, falling back to search centre ({}, {})",
                c.x, c.y, params.max_ssd, centre.0, centre.1
            );

            Ok(Match {
                coords: Coordinates::new(centre.0 as usize, centre.1 as usize),
                ssd: None
            })
        }
    }
}

/// Find the best matching neighbourhood in the right raster for the given coordinates in the left.
pub fn find_best_match<L, R>(
    lhs: &L,
    rhs: &R,
    c: Coordinates,
    params: &SearchParams
) -> Result<Coordinates>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    Ok(search(lhs, rhs, c, params)?.coords)
}

/// Get the offset from `c` to its best matching neighbourhood in the right raster.
pub fn get_offset<L, R>(lhs: &L, rhs: &R, c: Coordinates, params: &SearchParams) -> Result<Offset>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    Ok(find_best_match(lhs, rhs, c, params)? - c)
}

/// Lowest score found in each row of the search region, as `(row, ssd)` pairs in row order.
///
/// Rows whose candidates all fall outside the right raster are omitted.
pub fn row_minima<L, R>(
    lhs: &L,
    rhs: &R,
    c: Coordinates,
    params: &SearchParams
) -> Result<Vec<(usize, u64)>>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    let (_, rows) = scan(lhs, rhs, c, params)?;

    Ok(rows
        .into_iter()
        .flatten()
        .map(|cand| (cand.coords.y, cand.ssd))
        .collect())
}

/// Extract the query neighbourhood and score the search region, returning the region centre and
/// each row's best candidate.
fn scan<L, R>(
    lhs: &L,
    rhs: &R,
    c: Coordinates,
    params: &SearchParams
) -> Result<((isize, isize), Vec<Option<Candidate>>)>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    let radii = params.neighbourhood_radii;
    let lhs_view = neighbourhood(lhs, c, radii)?;

    if lhs.channels() != rhs.channels() {
        let (w, h) = radii.extent();
        return Err(Error::IncompatibleViews {
            lhs: (w, h, lhs.channels()),
            rhs: (w, h, rhs.channels())
        });
    }

    // Query coordinates lie inside the left raster, so they fit in an isize
    let centre = (
        (c.x as isize).saturating_add(params.search_offset.x),
        (c.y as isize).saturating_add(params.search_offset.y)
    );

    let rows = match Region::clamp(
        centre,
        params.search_radii,
        radii,
        rhs.width(),
        rhs.height()
    ) {
        Some(region) => scan_rows(&lhs_view, rhs, region, params)?,
        None => Vec::new()
    };

    Ok((centre, rows))
}

/// Score every row of the region, returning each row's first lowest candidate in row order.
fn scan_rows<L, R>(
    lhs_view: &View<'_, L>,
    rhs: &R,
    region: Region,
    params: &SearchParams
) -> Result<Vec<Option<Candidate>>>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    #[cfg(feature = "rayon")]
    {
        if params.parallel {
            return (region.y0..=region.y1)
                .into_par_iter()
                .map(|y| scan_row(lhs_view, rhs, y, region, params.neighbourhood_radii))
                .collect();
        }
    }

    (region.y0..=region.y1)
        .map(|y| scan_row(lhs_view, rhs, y, region, params.neighbourhood_radii))
        .collect()
}

fn scan_row<L, R>(
    lhs_view: &View<'_, L>,
    rhs: &R,
    y: usize,
    region: Region,
    radii: Radii
) -> Result<Option<Candidate>>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    let mut best: Option<Candidate> = None;

    for x in region.x0..=region.x1 {
        let coords = Coordinates::new(x, y);
        let rhs_view = neighbourhood(rhs, coords, radii)?;
        let ssd = sum_of_squared_differences(lhs_view, &rhs_view)?;

        if best.map_or(true, |b| ssd < b.ssd) {
            best = Some(Candidate { coords, ssd });
        }
    }

    Ok(best)
}

fn saturating_isize(v: usize) -> isize {
    isize::try_from(v).unwrap_or(isize::MAX)
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
