//! # Regression checks
//!
//! Runs depth queries against stereo data sets with known depths. Each test case is a text file
//! of `x y expected_depth` rows, paired with a directory holding `lhs.jpg` and `rhs.jpg`.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use image::RgbImage;
use std::fmt;
use std::path::Path;

use crate::config::StereoConfig;
use crate::coords::Coordinates;
use crate::depth::{estimate_depth, DepthEstimate};
use crate::error::*;

// -----------------------------------------------------------------------------------------------
// CONSTANTS
// -----------------------------------------------------------------------------------------------

/// Absolute tolerance between computed and expected depth.
pub const DEFAULT_TOLERANCE: f64 = 25.0;

/// File name of the left image within a data set directory.
pub const LHS_FILE: &str = "lhs.jpg";

/// File name of the right image within a data set directory.
pub const RHS_FILE: &str = "rhs.jpg";

// -----------------------------------------------------------------------------------------------
// DATA STRUCTURES
// -----------------------------------------------------------------------------------------------

/// A pixel with a known depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub x: usize,
    pub y: usize,
    pub expected: f64
}

/// Left and right images of a stereo data set.
pub struct StereoPair {
    pub lhs: RgbImage,
    pub rhs: RgbImage
}

/// Result of checking one sample.
#[derive(Debug)]
pub struct SampleOutcome {
    pub sample: Sample,
    pub estimate: Result<DepthEstimate>,
    pub tolerance: f64
}

/// Results of checking every sample of a test case.
#[derive(Debug)]
pub struct CaseReport {
    pub name: String,
    pub outcomes: Vec<SampleOutcome>
}

// -----------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// -----------------------------------------------------------------------------------------------

impl StereoPair {
    pub fn new(lhs: RgbImage, rhs: RgbImage) -> Self {
        Self { lhs, rhs }
    }

    /// Load `lhs.jpg` and `rhs.jpg` from `data_dir/case`.
    pub fn load<P: AsRef<Path>>(data_dir: P, case: &str) -> Result<Self> {
        let dir = data_dir.as_ref().join(case);

        log::debug!("Loading stereo pair from {}", dir.display());

        let lhs = image::open(dir.join(LHS_FILE))?.to_rgb8();
        let rhs = image::open(dir.join(RHS_FILE))?.to_rgb8();

        Ok(Self { lhs, rhs })
    }
}

impl SampleOutcome {
    pub fn passed(&self) -> bool {
        match &self.estimate {
            Ok(e) => approx_equal(e.depth, self.sample.expected, self.tolerance),
            Err(_) => false
        }
    }
}

impl fmt::Display for SampleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.sample;

        match &self.estimate {
            Ok(e) if self.passed() => write!(
                f,
                "Passed depth check, expected {} at [{}, {}], got {}",
                s.expected, s.x, s.y, e.depth
            ),
            Ok(e) => write!(
                f,
                "Failed depth check, expected {} at [{}, {}], got {}",
                s.expected, s.x, s.y, e.depth
            ),
            Err(err) => write!(
                f,
                "Failed depth check, expected {} at [{}, {}], got error: {}",
                s.expected, s.x, s.y, err
            )
        }
    }
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(SampleOutcome::passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &SampleOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

pub fn approx_equal(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

/// Parse `x y expected_depth` rows. Blank lines and lines starting with `#` are ignored.
pub fn parse_samples(text: &str) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(Error::Parse {
                line: line_no,
                message: format!("expected 3 fields, found {}", fields.len())
            });
        }

        let coord = |s: &str| {
            s.parse::<usize>().map_err(|e| Error::Parse {
                line: line_no,
                message: format!("invalid coordinate {:?}: {}", s, e)
            })
        };

        let expected = fields[2].parse::<f64>().map_err(|e| Error::Parse {
            line: line_no,
            message: format!("invalid depth {:?}: {}", fields[2], e)
        })?;

        samples.push(Sample {
            x: coord(fields[0])?,
            y: coord(fields[1])?,
            expected
        });
    }

    Ok(samples)
}

/// Read and parse a test case file.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    parse_samples(&std::fs::read_to_string(path)?)
}

/// Names of all test case files in `test_dir`, sorted.
pub fn list_cases<P: AsRef<Path>>(test_dir: P) -> Result<Vec<String>> {
    let mut cases = Vec::new();

    for entry in std::fs::read_dir(test_dir)? {
        let entry = entry?;

        if entry.file_type()?.is_file() {
            cases.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    cases.sort();

    Ok(cases)
}

/// Estimate the depth of every sample and compare against the expected value.
///
/// A failed estimate is recorded against its sample rather than aborting the case.
pub fn check_samples(
    name: &str,
    pair: &StereoPair,
    samples: &[Sample],
    config: &StereoConfig,
    tolerance: f64
) -> CaseReport {
    let outcomes = samples
        .iter()
        .map(|&sample| {
            let estimate = estimate_depth(
                &pair.lhs,
                &pair.rhs,
                Coordinates::new(sample.x, sample.y),
                &config.search,
                &config.depth
            );

            let outcome = SampleOutcome { sample, estimate, tolerance };
            log::debug!("{}: {}", name, outcome);
            outcome
        })
        .collect();

    CaseReport {
        name: name.to_owned(),
        outcomes
    }
}

/// Load and check the test case `name`.
pub fn run_case<P: AsRef<Path>, Q: AsRef<Path>>(
    data_dir: P,
    test_dir: Q,
    name: &str,
    config: &StereoConfig,
    tolerance: f64
) -> Result<CaseReport> {
    let pair = StereoPair::load(data_dir, name)?;
    let samples = load_samples(test_dir.as_ref().join(name))?;

    log::info!("Running {} ({} samples)", name, samples.len());

    Ok(check_samples(name, &pair, &samples, config, tolerance))
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------
