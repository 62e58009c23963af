//! Grayscale Transform
//!
//! Weighted-sum luminance, replicated across all three channels.

use image::{Rgb, RgbImage};

use super::PixelTransform;

const RED_WEIGHT: f64 = 0.3;
const GREEN_WEIGHT: f64 = 0.59;
const BLUE_WEIGHT: f64 = 0.11;

/// Converts an image to grayscale while keeping it RGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grayscale;

/// Gray level for one pixel: `floor(R*0.3 + G*0.59 + B*0.11)`.
pub fn gray_level(Rgb([r, g, b]): Rgb<u8>) -> u8 {
    let weighted = r as f64 * RED_WEIGHT + g as f64 * GREEN_WEIGHT + b as f64 * BLUE_WEIGHT;
    // Weights sum to 1.0, so the result is already within 0..=255.
    weighted.floor() as u8
}

impl PixelTransform for Grayscale {
    fn apply(&self, image: &RgbImage) -> RgbImage {
        let (width, height) = image.dimensions();
        RgbImage::from_fn(width, height, |x, y| {
            let gray = gray_level(*image.get_pixel(x, y));
            Rgb([gray, gray, gray])
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_gray_level_weighted_sum() {
        // 200*0.3 + 100*0.59 + 50*0.11 = 60 + 59 + 5.5
        assert_eq!(gray_level(Rgb([200, 100, 50])), 124);
    }

    #[test]
    fn test_gray_level_extremes() {
        assert_eq!(gray_level(Rgb([0, 0, 0])), 0);
        assert!(gray_level(Rgb([255, 255, 255])) >= 254);
    }

    #[test]
    fn test_apply_replicates_gray_across_channels() {
        let image = RgbImage::from_pixel(2, 1, Rgb([200, 100, 50]));

        let gray = Grayscale.apply(&image);

        for pixel in gray.pixels() {
            assert_eq!(*pixel, Rgb([124, 124, 124]));
        }
    }

    #[test]
    fn test_apply_keeps_dimensions() {
        let image = RgbImage::new(7, 3);
        assert_eq!(Grayscale.apply(&image).dimensions(), (7, 3));
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let image = RgbImage::from_pixel(1, 1, Rgb([10, 200, 30]));
        let before = image.clone();

        let _ = Grayscale.apply(&image);

        assert_eq!(image, before);
    }

    fn image_strategy() -> impl Strategy<Value = RgbImage> {
        (1u32..8, 1u32..8).prop_flat_map(|(width, height)| {
            prop::collection::vec(any::<u8>(), (width * height * 3) as usize).prop_map(
                move |buf| RgbImage::from_raw(width, height, buf).expect("buffer sized to dimensions"),
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        // Two independent conversions of the same input are pixel-identical.
        #[test]
        fn prop_conversion_is_idempotent(image in image_strategy()) {
            let first = Grayscale.apply(&image);
            let second = Grayscale.apply(&image);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_output_channels_are_equal(image in image_strategy()) {
            let gray = Grayscale.apply(&image);
            prop_assert_eq!(gray.dimensions(), image.dimensions());
            for Rgb([r, g, b]) in gray.pixels() {
                prop_assert_eq!(r, g);
                prop_assert_eq!(g, b);
            }
        }

        // Converting an already-gray image changes nothing beyond rounding.
        #[test]
        fn prop_gray_input_is_nearly_fixed(level in any::<u8>()) {
            let out = gray_level(Rgb([level, level, level]));
            prop_assert!(level.abs_diff(out) <= 1);
        }
    }
}
