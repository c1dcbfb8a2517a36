use crate::segmentation::LabelMask;
use image::{imageops, GrayImage, Luma};
use imageproc::filter::separable_filter_equal;

/// Binary keep/discard mask: every pixel is exactly 0 or 255
pub type AlphaMask = GrayImage;

pub const MASK_ON: u8 = 255;
pub const MASK_OFF: u8 = 0;

/// 3x3 binomial smoothing, applied once per axis
const FEATHER_KERNEL: [f32; 3] = [0.25, 0.5, 0.25];

/// Feathered values at or above this become foreground again
pub const BINARIZE_THRESHOLD: u8 = 128;

/// Turn a label grid into a clean binary alpha mask
///
/// Steps:
/// 1. Collapse foreground labels to 255 and everything else to 0
/// 2. Feather the edges with a 3x3 blur
/// 3. Re-binarize at [`BINARIZE_THRESHOLD`]
pub fn refine(labels: &LabelMask) -> AlphaMask {
    let _span = tracing::debug_span!("refine").entered();

    let raw = collapse(labels);
    let feathered = feather(&raw);
    let mask = binarize(feathered);

    tracing::debug!(
        "Refined mask keeps {} of {} pixels",
        mask.pixels().filter(|p| p[0] == MASK_ON).count(),
        mask.width() as usize * mask.height() as usize
    );
    mask
}

pub fn collapse(labels: &LabelMask) -> GrayImage {
    let (height, width) = labels.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        if labels[[y as usize, x as usize]].is_foreground() {
            Luma([MASK_ON])
        } else {
            Luma([MASK_OFF])
        }
    })
}

/// Soften block edges; produces intermediate grey values along boundaries
///
/// The border is mirrored without repeating the edge pixel, so a lone
/// foreground pixel on the image edge feathers the same as one inside.
pub fn feather(mask: &GrayImage) -> GrayImage {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return mask.clone();
    }
    let padded = GrayImage::from_fn(width + 2, height + 2, |x, y| {
        let sx = reflect_101(x as i64 - 1, width);
        let sy = reflect_101(y as i64 - 1, height);
        *mask.get_pixel(sx, sy)
    });

    let blurred = separable_filter_equal(&padded, &FEATHER_KERNEL);
    imageops::crop_imm(&blurred, 1, 1, width, height).to_image()
}

/// Mirror index `i` into `0..size` around the edge pixel (`-1 -> 1`, `size -> size - 2`)
fn reflect_101(i: i64, size: u32) -> u32 {
    let last = size as i64 - 1;
    let mirrored = if i < 0 {
        -i
    } else if i > last {
        2 * last - i
    } else {
        i
    };
    mirrored.clamp(0, last.max(0)) as u32
}

pub fn binarize(mut mask: GrayImage) -> AlphaMask {
    for pixel in mask.pixels_mut() {
        pixel[0] = if pixel[0] >= BINARIZE_THRESHOLD {
            MASK_ON
        } else {
            MASK_OFF
        };
    }
    mask
}
