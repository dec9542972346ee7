//! Depth estimation on synthetic stereo pairs with a known horizontal shift

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use approx::assert_relative_eq;
use cv_depth::prelude::*;
use cv_depth::Error;
use image::{Rgb, RgbImage};

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

const SIZE: u32 = 512;

/// Pixels the scene moves to the left between the left and right images.
const SHIFT: u32 = 16;

// -----------------------------------------------------------------------------------------------
// HELPERS
// -----------------------------------------------------------------------------------------------

fn scene(x: u32, y: u32) -> Rgb<u8> {
    let v = (x.wrapping_mul(73856093) ^ y.wrapping_mul(19349663)).wrapping_mul(2654435761);
    Rgb([(v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8])
}

fn stereo_pair() -> (RgbImage, RgbImage) {
    let lhs = RgbImage::from_fn(SIZE, SIZE, scene);
    let rhs = RgbImage::from_fn(SIZE, SIZE, |x, y| scene(x + SHIFT, y));
    (lhs, rhs)
}

fn search_params() -> SearchParams {
    SearchParams::new(Radii::new(4, 4), Offset::new(-14, 0), Radii::new(6, 2), 1_000)
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[test]
fn recovers_uniform_shift() {
    let (lhs, rhs) = stereo_pair();
    let params = search_params();

    for &(x, y) in &[(100, 100), (256, 256), (400, 37), (30, 480)] {
        let c = Coordinates::new(x, y);

        let m = search(&lhs, &rhs, c, &params).unwrap();
        assert_eq!(m.ssd, Some(0), "at ({}, {})", x, y);
        assert_eq!(
            get_offset(&lhs, &rhs, c, &params).unwrap(),
            Offset::new(-(SHIFT as isize), 0)
        );
    }
}

#[test]
fn depth_is_finite_and_positive() {
    let (lhs, rhs) = stereo_pair();
    let depth = DepthParams::new(125.0, 0.05, 100.0);

    for &x in &[60usize, 256, 450] {
        let estimate = estimate_depth(&lhs, &rhs, Coordinates::new(x, 200), &search_params(), &depth)
            .unwrap();

        assert!(estimate.confident);
        assert!(estimate.depth.is_finite() && estimate.depth > 0.0);
        assert_eq!(estimate.offset, Offset::new(-(SHIFT as isize), 0));
    }

    // At the image centre the viewing ray is the optical axis: 125 * 100 / (16 * 0.05)
    let centre = get_depth(&lhs, &rhs, Coordinates::new(256, 256), &search_params(), &depth).unwrap();
    assert_relative_eq!(centre, 15_625.0, epsilon = 1e-6);
}

#[test]
fn pinhole_fast_path_ignores_position() {
    let (lhs, rhs) = stereo_pair();
    let depth = DepthParams::new(125.0, 0.05, 100.0).with_triangulation(Triangulation::Pinhole);

    for &x in &[60usize, 256, 450] {
        let d = get_depth(&lhs, &rhs, Coordinates::new(x, 300), &search_params(), &depth).unwrap();
        assert_relative_eq!(d, 15_625.0, epsilon = 1e-6);
    }
}

#[test]
fn unmatched_scene_is_low_confidence() {
    let (lhs, _) = stereo_pair();
    let rhs = RgbImage::from_pixel(SIZE, SIZE, Rgb([255, 255, 255]));
    let depth = DepthParams::new(125.0, 0.05, 100.0);

    let estimate = estimate_depth(&lhs, &rhs, Coordinates::new(200, 200), &search_params(), &depth)
        .unwrap();

    assert!(!estimate.confident);
    assert_eq!(estimate.offset, Offset::new(-14, 0));
}

#[test]
fn fallback_without_disparity_is_degenerate() {
    let (lhs, _) = stereo_pair();
    let rhs = RgbImage::from_pixel(SIZE, SIZE, Rgb([255, 255, 255]));
    let depth = DepthParams::new(125.0, 0.05, 100.0);
    let params = SearchParams::new(Radii::new(4, 4), Offset::new(0, 3), Radii::new(6, 2), 1_000);

    let res = estimate_depth(&lhs, &rhs, Coordinates::new(200, 200), &params, &depth);
    assert!(matches!(res, Err(Error::DegenerateDisparity { x: 200, y: 200 })));
}

#[test]
fn concurrent_queries_share_rasters() {
    let (lhs, rhs) = stereo_pair();
    let params = search_params();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let (lhs, rhs) = (&lhs, &rhs);
                s.spawn(move || get_offset(lhs, rhs, Coordinates::new(50 + 100 * i, 50), &params))
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap().unwrap(), Offset::new(-(SHIFT as isize), 0));
        }
    });
}
