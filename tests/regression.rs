//! Regression runner over on-disk JPEG stereo data sets

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use cv_depth::prelude::*;
use cv_depth::regression::{self, StereoPair, DEFAULT_TOLERANCE, LHS_FILE, RHS_FILE};
use cv_depth::Error;
use image::{Rgb, RgbImage};
use std::path::PathBuf;

// -----------------------------------------------------------------------------------------------
// HELPERS
// -----------------------------------------------------------------------------------------------

/// Shift aligned to the JPEG MCU size so both images compress identically away from the edges.
const SHIFT: u32 = 16;

fn scene(x: u32, y: u32) -> Rgb<u8> {
    let (x, y) = (x as f64, y as f64);
    let a = 128.0 + 60.0 * (x * 0.21 + y * 0.07).sin() + 50.0 * (y * 0.17 - x * 0.05).sin();
    let b = 128.0 + 90.0 * (x * 0.13 - y * 0.11).cos();
    let c = 128.0 + 70.0 * (x * 0.31).sin() * (y * 0.23).cos();
    Rgb([a as u8, b as u8, c as u8])
}

fn config() -> StereoConfig {
    StereoConfig {
        search: SearchParams::new(Radii::new(6, 6), Offset::new(-14, 0), Radii::new(5, 2), 200_000),
        depth: DepthParams::new(125.0, 0.05, 100.0)
    }
}

struct Fixture {
    root: PathBuf
}

impl Fixture {
    fn new(tag: &str) -> Self {
        let root = std::env::temp_dir().join(format!("cv-depth-{}-{}", tag, std::process::id()));
        let pair_dir = root.join("data").join("shifted");
        std::fs::create_dir_all(&pair_dir).unwrap();
        std::fs::create_dir_all(root.join("cases")).unwrap();

        RgbImage::from_fn(128, 96, scene).save(pair_dir.join(LHS_FILE)).unwrap();
        RgbImage::from_fn(128, 96, |x, y| scene(x + SHIFT, y))
            .save(pair_dir.join(RHS_FILE))
            .unwrap();

        Self { root }
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    fn case_dir(&self) -> PathBuf {
        self.root.join("cases")
    }

    fn write_case(&self, name: &str, rows: &str) {
        std::fs::write(self.case_dir().join(name), rows).unwrap();
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

fn expected_depth(x: usize) -> f64 {
    let params = config().depth;
    cv_depth::depth::triangulate(
        Coordinates::new(x, 0),
        128,
        Offset::new(-(SHIFT as isize), 0),
        &params
    )
    .unwrap()
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[test]
fn passing_case() {
    let fx = Fixture::new("pass");
    fx.write_case(
        "shifted",
        &format!("40 40 {}\n64 48 {}\n80 60 {}\n", expected_depth(40), expected_depth(64), expected_depth(80))
    );

    let report = regression::run_case(
        fx.data_dir(),
        fx.case_dir(),
        "shifted",
        &config(),
        DEFAULT_TOLERANCE
    )
    .unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.passed(), "{:?}", report);
}

#[test]
fn failures_do_not_abort_the_case() {
    let fx = Fixture::new("fail");
    fx.write_case(
        "shifted",
        &format!("64 48 {}\n64 48 1.0\n2 2 100.0\n", expected_depth(64))
    );

    let report = regression::run_case(
        fx.data_dir(),
        fx.case_dir(),
        "shifted",
        &config(),
        DEFAULT_TOLERANCE
    )
    .unwrap();

    assert!(!report.passed());
    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes[0].passed());

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 2);
    assert!(failures[0].to_string().starts_with("Failed depth check, expected 1 at [64, 48], got "));
    assert!(matches!(failures[1].estimate, Err(Error::OutOfBounds { .. })));
}

#[test]
fn lists_and_loads_cases() {
    let fx = Fixture::new("list");
    fx.write_case("shifted", "64 48 0\n");

    assert_eq!(regression::list_cases(fx.case_dir()).unwrap(), vec!["shifted".to_owned()]);

    let pair = StereoPair::load(fx.data_dir(), "shifted").unwrap();
    assert_eq!(pair.lhs.dimensions(), (128, 96));
    assert_eq!(pair.rhs.dimensions(), (128, 96));
}

#[test]
fn missing_pair_is_an_error() {
    let fx = Fixture::new("missing");
    fx.write_case("absent", "1 1 1\n");

    let res = regression::run_case(fx.data_dir(), fx.case_dir(), "absent", &config(), 25.0);
    assert!(res.is_err());
}
