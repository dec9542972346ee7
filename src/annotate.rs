//! # Match annotation
//!
//! Draws the query neighbourhood, search region and matched neighbourhood onto a side-by-side
//! image of a stereo pair for visual inspection.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::convert::TryFrom;

use crate::coords::{Coordinates, Radii};
use crate::search::{Match, SearchParams};

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

const QUERY_COLOUR: Rgb<u8> = Rgb([0, 255, 0]);
const REGION_COLOUR: Rgb<u8> = Rgb([0, 128, 255]);
const MATCH_COLOUR: Rgb<u8> = Rgb([255, 0, 0]);
const FALLBACK_COLOUR: Rgb<u8> = Rgb([255, 200, 0]);

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Render the left and right images side by side with the search outlined.
///
/// The left half shows the query neighbourhood, the right half the search region (clipped to the
/// image) and the matched neighbourhood, joined by a line. A fallback match is drawn in amber.
pub fn annotate_match(
    lhs: &RgbImage,
    rhs: &RgbImage,
    c: Coordinates,
    m: &Match,
    params: &SearchParams
) -> RgbImage {
    let (lw, lh) = lhs.dimensions();
    let (rw, rh) = rhs.dimensions();

    let mut out = RgbImage::new(lw + rw, lh.max(rh));
    imageops::replace(&mut out, lhs, 0, 0);
    imageops::replace(&mut out, rhs, lw, 0);

    let radii = params.neighbourhood_radii;

    if let Some(rect) = around(c.x as isize, c.y as isize, radii, lw, lh, 0) {
        draw_hollow_rect_mut(&mut out, rect, QUERY_COLOUR);
    }

    let sx = (c.x as isize).saturating_add(params.search_offset.x);
    let sy = (c.y as isize).saturating_add(params.search_offset.y);
    if let Some(rect) = around(sx, sy, params.search_radii, rw, rh, lw) {
        draw_hollow_rect_mut(&mut out, rect, REGION_COLOUR);
    }

    let colour = if m.is_confident() { MATCH_COLOUR } else { FALLBACK_COLOUR };
    if let Some(rect) = around(m.coords.x as isize, m.coords.y as isize, radii, rw, rh, lw) {
        draw_hollow_rect_mut(&mut out, rect, colour);
    }

    draw_line_segment_mut(
        &mut out,
        (c.x as f32, c.y as f32),
        ((m.coords.x + lw as usize) as f32, m.coords.y as f32),
        colour
    );

    out
}

/// Rectangle of the given radii around `(x, y)`, clipped to a `width` by `height` image and
/// shifted right by `x_shift`. `None` if nothing of it is visible.
fn around(
    x: isize,
    y: isize,
    radii: Radii,
    width: u32,
    height: u32,
    x_shift: u32
) -> Option<Rect> {
    let rx = isize::try_from(radii.x).unwrap_or(isize::MAX);
    let ry = isize::try_from(radii.y).unwrap_or(isize::MAX);

    let x0 = x.saturating_sub(rx).max(0);
    let y0 = y.saturating_sub(ry).max(0);
    let x1 = x.saturating_add(rx).min(width as isize - 1);
    let y1 = y.saturating_add(ry).min(height as isize - 1);

    if x0 > x1 || y0 > y1 {
        return None;
    }

    Some(
        Rect::at((x0 + x_shift as isize) as i32, y0 as i32)
            .of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32)
    )
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
