use crate::refine::{AlphaMask, MASK_ON};
use image::{Rgb, RgbImage};

/// Value written where the mask discards a pixel
pub const FILL: Rgb<u8> = Rgb([0, 0, 0]);

/// Keep source pixels where `mask` is on and blank out the rest
///
/// Panics when the mask and image dimensions differ: that means the
/// pipeline handed over mismatched buffers and the output would be garbage.
pub fn composite(image: &RgbImage, mask: &AlphaMask) -> RgbImage {
    assert_eq!(
        image.dimensions(),
        mask.dimensions(),
        "cutout mask does not match image dimensions"
    );
    let _span = tracing::debug_span!("composite").entered();

    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        if mask.get_pixel(x, y)[0] == MASK_ON {
            *image.get_pixel(x, y)
        } else {
            FILL
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refine::MASK_OFF;
    use image::{GrayImage, Luma};
    use proptest::prelude::*;

    #[test]
    fn keeps_only_masked_pixels() {
        let image = RgbImage::from_pixel(2, 1, Rgb([10, 20, 30]));
        let mask = GrayImage::from_vec(2, 1, vec![MASK_ON, MASK_OFF]).unwrap();

        let result = composite(&image, &mask);
        assert_eq!(*result.get_pixel(0, 0), Rgb([10, 20, 30]));
        assert_eq!(*result.get_pixel(1, 0), FILL);
    }

    #[test]
    fn leaves_inputs_untouched() {
        let image = RgbImage::from_pixel(3, 3, Rgb([1, 2, 3]));
        let mask = GrayImage::from_pixel(3, 3, Luma([MASK_OFF]));
        let before = image.clone();

        let _ = composite(&image, &mask);
        assert_eq!(image, before);
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn mismatched_dimensions_panic() {
        let image = RgbImage::new(4, 4);
        let mask = GrayImage::new(4, 5);
        let _ = composite(&image, &mask);
    }

    fn image_and_mask() -> impl Strategy<Value = (RgbImage, AlphaMask)> {
        (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
            let n = (w * h) as usize;
            (
                prop::collection::vec(any::<u8>(), n * 3),
                prop::collection::vec(any::<bool>(), n),
            )
                .prop_map(move |(pixels, keep)| {
                    let image = RgbImage::from_vec(w, h, pixels).unwrap();
                    let mask = GrayImage::from_vec(
                        w,
                        h,
                        keep.iter().map(|&k| if k { MASK_ON } else { MASK_OFF }).collect(),
                    )
                    .unwrap();
                    (image, mask)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_composite_follows_mask((image, mask) in image_and_mask()) {
            let result = composite(&image, &mask);
            for (x, y, pixel) in result.enumerate_pixels() {
                if mask.get_pixel(x, y)[0] == MASK_ON {
                    prop_assert_eq!(pixel, image.get_pixel(x, y));
                } else {
                    prop_assert_eq!(*pixel, FILL);
                }
            }
        }
    }
}
