use crate::refine::AlphaMask;
use eframe::egui::ColorImage;
use image::RgbImage;

pub fn rgb_to_color_image(image: &RgbImage) -> ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    ColorImage::from_rgb(size, image.as_raw())
}

pub fn mask_to_color_image(mask: &AlphaMask) -> ColorImage {
    let size = [mask.width() as usize, mask.height() as usize];
    ColorImage::from_gray(size, mask.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::Color32;
    use image::{GrayImage, Rgb};

    #[test]
    fn rgb_keeps_size_and_colour() {
        let image = RgbImage::from_pixel(4, 3, Rgb([10, 200, 30]));
        let color = rgb_to_color_image(&image);

        assert_eq!(color.size, [4, 3]);
        assert_eq!(color.pixels[5], Color32::from_rgb(10, 200, 30));
    }

    #[test]
    fn mask_renders_white_and_black() {
        let mask = GrayImage::from_vec(2, 1, vec![255, 0]).unwrap();
        let color = mask_to_color_image(&mask);

        assert_eq!(color.size, [2, 1]);
        assert_eq!(color.pixels[0], Color32::WHITE);
        assert_eq!(color.pixels[1], Color32::BLACK);
    }
}
