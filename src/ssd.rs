//! # Sum of squared differences
//!
//! Block similarity metric used by the correspondence search. Lower is more similar.

// -----------------------------------------------------------------------------------------------
// IMPORTS
// -----------------------------------------------------------------------------------------------

use crate::error::*;
use crate::raster::{Raster, View};

// -----------------------------------------------------------------------------------------------
// FUNCTIONS
// -----------------------------------------------------------------------------------------------

/// Calculate the sum of squared differences between the pixels of two views of equal shape.
///
/// Views must agree in width, height and channel count, otherwise
/// [`Error::IncompatibleViews`] is returned. Differences are squared exactly and the sum saturates
/// at `u64::MAX`, which only 32-bit and wider samples can reach.
pub fn sum_of_squared_differences<L, R>(lhs: &View<'_, L>, rhs: &View<'_, R>) -> Result<u64>
where
    L: Raster + ?Sized,
    R: Raster + ?Sized
{
    if lhs.dimensions() != rhs.dimensions() {
        return Err(Error::IncompatibleViews {
            lhs: lhs.dimensions(),
            rhs: rhs.dimensions()
        });
    }

    let mut sum = 0u64;

    for y in 0..lhs.height() {
        // Rows are interleaved, so zipping them walks pixels then channels
        for (&l, &r) in lhs.row(y).iter().zip(rhs.row(y)) {
            let l = Into::<i64>::into(l) as i128;
            let r = Into::<i64>::into(r) as i128;
            let diff = (l - r).unsigned_abs();
            let sq = diff * diff;

            sum = sum.saturating_add(if sq > u64::MAX as u128 { u64::MAX } else { sq as u64 });
        }
    }

    Ok(sum)
}

// -----------------------------------------------------------------------------------------------
// TESTS
// -----------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Coordinates, Radii};
    use crate::raster::neighbourhood;
    use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

    fn textured(seed: u32) -> RgbImage {
        RgbImage::from_fn(16, 16, |x, y| {
            let v = (x * 31 + y * 17 + seed).wrapping_mul(2654435761) >> 24;
            Rgb([v as u8, (v * 3) as u8, 255 - v as u8])
        })
    }

    #[test]
    fn reflexive() {
        let img = textured(3);
        let view = neighbourhood(&img, Coordinates::new(8, 8), Radii::new(3, 2)).unwrap();

        assert_eq!(sum_of_squared_differences(&view, &view).unwrap(), 0);
    }

    #[test]
    fn symmetric() {
        let a = textured(1);
        let b = textured(9);
        let va = neighbourhood(&a, Coordinates::new(5, 6), Radii::new(2, 2)).unwrap();
        let vb = neighbourhood(&b, Coordinates::new(9, 7), Radii::new(2, 2)).unwrap();

        let ab = sum_of_squared_differences(&va, &vb).unwrap();
        let ba = sum_of_squared_differences(&vb, &va).unwrap();
        assert_eq!(ab, ba);
        assert!(ab > 0);
    }

    #[test]
    fn sums_every_channel() {
        let a = RgbImage::from_pixel(3, 3, Rgb([10, 20, 30]));
        let b = RgbImage::from_pixel(3, 3, Rgb([13, 16, 30]));
        let va = View::full(&a);
        let vb = View::full(&b);

        // 9 pixels * (3^2 + 4^2 + 0)
        assert_eq!(sum_of_squared_differences(&va, &vb).unwrap(), 225);
    }

    #[test]
    fn no_underflow_on_extremes() {
        let a = GrayImage::from_pixel(2, 2, Luma([0]));
        let b = GrayImage::from_pixel(2, 2, Luma([255]));

        let ssd = sum_of_squared_differences(&View::full(&a), &View::full(&b)).unwrap();
        assert_eq!(ssd, 4 * 255 * 255);
    }

    #[test]
    fn wide_samples_do_not_overflow() {
        let a: ImageBuffer<Rgb<u16>, Vec<u16>> = ImageBuffer::from_pixel(64, 64, Rgb([0; 3]));
        let b: ImageBuffer<Rgb<u16>, Vec<u16>> =
            ImageBuffer::from_pixel(64, 64, Rgb([u16::MAX; 3]));

        let ssd = sum_of_squared_differences(&View::full(&a), &View::full(&b)).unwrap();
        assert_eq!(ssd, 64 * 64 * 3 * (u16::MAX as u64).pow(2));
    }

    #[test]
    fn u32_samples_square_exactly() {
        let a: ImageBuffer<Luma<u32>, Vec<u32>> = ImageBuffer::from_pixel(1, 1, Luma([0]));
        let b: ImageBuffer<Luma<u32>, Vec<u32>> = ImageBuffer::from_pixel(1, 1, Luma([u32::MAX]));

        let ssd = sum_of_squared_differences(&View::full(&a), &View::full(&b)).unwrap();
        assert_eq!(ssd, (u32::MAX as u64) * (u32::MAX as u64));
    }

    #[test]
    fn u32_extremes_saturate() {
        let a: ImageBuffer<Luma<u32>, Vec<u32>> = ImageBuffer::from_pixel(2, 2, Luma([0]));
        let b: ImageBuffer<Luma<u32>, Vec<u32>> = ImageBuffer::from_pixel(2, 2, Luma([u32::MAX]));

        let ssd = sum_of_squared_differences(&View::full(&a), &View::full(&b)).unwrap();
        assert_eq!(ssd, u64::MAX);
        assert_eq!(sum_of_squared_differences(&View::full(&b), &View::full(&a)).unwrap(), ssd);
    }

    #[test]
    fn incompatible_dimensions() {
        let img = textured(0);
        let a = neighbourhood(&img, Coordinates::new(8, 8), Radii::new(2, 2)).unwrap();
        let b = neighbourhood(&img, Coordinates::new(8, 8), Radii::new(2, 3)).unwrap();

        assert!(matches!(
            sum_of_squared_differences(&a, &b),
            Err(Error::IncompatibleViews { lhs: (5, 5, 3), rhs: (5, 7, 3) })
        ));
    }

    #[test]
    fn incompatible_channels() {
        let rgb = RgbImage::new(4, 4);
        let gray = GrayImage::new(4, 4);

        assert!(matches!(
            sum_of_squared_differences(&View::full(&rgb), &View::full(&gray)),
            Err(Error::IncompatibleViews { .. })
        ));
    }
}
