use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::filter::median_filter;

/// Inclusive HSV box in 8-bit convention (H in 0..180, S and V in 0..=255)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}

impl Default for HsvRange {
    /// Traffic cone orange
    fn default() -> Self {
        Self {
            lower: [18, 0, 0],
            upper: [20, 250, 255],
        }
    }
}

/// Apply a median filter to remove salt-and-pepper noise
pub fn median_blur(img: &RgbImage, radius: u32) -> RgbImage {
    if radius == 0 {
        return img.clone();
    }
    median_filter(img, radius, radius)
}

/// Convert one RGB sample to HSV with hue halved to fit in a byte
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta * 255.0 / max };

    let mut h = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    // 359.x degrees rounds up to 180, which is red again
    let h = (h / 2.0).round() as u8 % 180;
    [h, s.round() as u8, max as u8]
}

/// Convert an RGB image to HSV, stored channel-wise in an `RgbImage`
pub fn to_hsv(img: &RgbImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let Rgb([r, g, b]) = *img.get_pixel(x, y);
        Rgb(rgb_to_hsv(r, g, b))
    })
}

/// Binary mask: 255 where the HSV pixel is inside `range`, 0 elsewhere
pub fn in_range(hsv: &RgbImage, range: HsvRange) -> GrayImage {
    GrayImage::from_fn(hsv.width(), hsv.height(), |x, y| {
        if range.contains(hsv.get_pixel(x, y).0) { Luma([255u8]) } else { Luma([0u8]) }
    })
}

/// Blur, convert to HSV and threshold against the target color range
pub fn build_mask(img: &DynamicImage, blur_radius: u32, range: HsvRange) -> GrayImage {
    let blurred = median_blur(&img.to_rgb8(), blur_radius);
    in_range(&to_hsv(&blurred), range)
}
