use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::sobel_gradients;
use imageproc::map::map_pixels;
use log::debug;
use std::path::Path;

use crate::Error;

const INK: Luma<u8> = Luma([0]);
const BACKGROUND: Luma<u8> = Luma([255]);

/// Turns a photo into the binary edge raster that glyphs are matched against.
///
/// Edges are dark (0) on a light (255) background, like dictionary glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
    /// Standard deviation of the blur applied before taking gradients, 0 disables it
    pub gaussian_sigma: f32,
}

impl Default for EdgeDetector {
    fn default() -> Self {
        EdgeDetector {
            gaussian_sigma: 1.2,
        }
    }
}

impl EdgeDetector {
    pub fn new(gaussian_sigma: f32) -> EdgeDetector {
        EdgeDetector { gaussian_sigma }
    }

    /// Shrink `image` to `max_size`, convert it to grayscale and detect edges.
    pub fn prepare(&self, image: &DynamicImage, max_size: u32) -> GrayImage {
        self.detect(&resize_to_max(image, max_size).into_luma8())
    }

    /// Read and prepare an image file.
    ///
    /// # Errors
    /// [Error::ImageError] if the file can not be opened or decoded
    pub fn open<P: AsRef<Path>>(&self, path: P, max_size: u32) -> Result<GrayImage, Error> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| Error::ImageError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(self.prepare(&image, max_size))
    }

    /// Decode and prepare an encoded image held in memory.
    pub fn from_memory(&self, buffer: &[u8], max_size: u32) -> Result<GrayImage, Error> {
        let image = image::load_from_memory(buffer)?;
        Ok(self.prepare(&image, max_size))
    }

    /// Blur, take the gradient magnitude, threshold it with Otsu's method and drop
    /// isolated ink pixels.
    ///
    /// An image without any gradient comes back all background.
    pub fn detect(&self, gray: &GrayImage) -> GrayImage {
        let (width, height) = gray.dimensions();
        let blurred = if self.gaussian_sigma > 0.0 {
            gaussian_blur_f32(gray, self.gaussian_sigma)
        } else {
            gray.clone()
        };

        let gradients = sobel_gradients(&blurred);
        let max = gradients.pixels().map(|p| p[0]).max().unwrap_or(0);
        if max == 0 {
            debug!("flat {}x{} image, no edges", width, height);
            return GrayImage::from_pixel(width, height, BACKGROUND);
        }
        let scale = 255.0 / max as f32;
        let magnitude: GrayImage =
            map_pixels(&gradients, |_x, _y, p| Luma([(p[0] as f32 * scale).round() as u8]));

        let level = otsu_level(&magnitude);
        debug!("edge threshold {} for {}x{} image", level, width, height);
        remove_isolated(&binarize(&magnitude, level))
    }
}

/// Ink where the magnitude reaches `level`. Zero gradient is always background.
pub(crate) fn binarize(magnitude: &GrayImage, level: u8) -> GrayImage {
    let level = level.max(1);
    map_pixels(magnitude, |_x, _y, p| {
        if p[0] >= level {
            INK
        } else {
            BACKGROUND
        }
    })
}

/// Clear ink pixels that have no ink neighbour in their 3x3 neighbourhood.
///
/// Borders are extended by replication, so a lone pixel on the border counts itself
/// more than once and is kept.
pub fn remove_isolated(binary: &GrayImage) -> GrayImage {
    let (width, height) = binary.dimensions();
    let is_ink = |x: i64, y: i64| {
        let x = x.max(0).min(width as i64 - 1) as u32;
        let y = y.max(0).min(height as i64 - 1) as u32;
        binary.get_pixel(x, y)[0] == 0
    };
    map_pixels(binary, |x, y, p| {
        if p[0] != 0 {
            return BACKGROUND;
        }
        let (x, y) = (x as i64, y as i64);
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if is_ink(x + dx, y + dy) {
                    count += 1;
                }
            }
        }
        if count > 1 {
            INK
        } else {
            BACKGROUND
        }
    })
}

/// Scale `image` down so its longer edge is at most `max_size`; smaller images are
/// returned unchanged.
pub fn resize_to_max(image: &DynamicImage, max_size: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width.max(height) <= max_size {
        return image.clone();
    }
    let (new_width, new_height) = if width >= height {
        (max_size, (height as f64 * max_size as f64 / width as f64) as u32)
    } else {
        ((width as f64 * max_size as f64 / height as f64) as u32, max_size)
    };
    debug!(
        "resize {}x{} to {}x{}",
        width, height, new_width, new_height
    );
    image.resize_exact(new_width.max(1), new_height.max(1), FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> GrayImage {
        let mut img = GrayImage::from_pixel(40, 40, Luma([0]));
        for y in 10..30 {
            for x in 10..30 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        img
    }

    #[test]
    fn test_flat_image_has_no_edges() {
        let img = GrayImage::from_pixel(20, 10, Luma([90]));
        let edges = EdgeDetector::default().detect(&img);
        assert_eq!(edges.dimensions(), (20, 10));
        assert!(edges.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_square_outline() {
        let edges = EdgeDetector::default().detect(&square());
        assert_eq!(edges.get_pixel(20, 20)[0], 255);
        assert_eq!(edges.get_pixel(2, 2)[0], 255);
        assert_eq!(edges.get_pixel(37, 20)[0], 255);
        let ink_on_left_side = (8..12).any(|x| edges.get_pixel(x, 20)[0] == 0);
        assert!(ink_on_left_side);
        assert!(edges.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_without_blur() {
        let edges = EdgeDetector::new(0.0).detect(&square());
        assert_eq!(edges.get_pixel(20, 20)[0], 255);
        assert!(edges.pixels().any(|p| p[0] == 0));
    }

    #[test]
    fn test_binarize_includes_level() {
        let magnitude = GrayImage::from_fn(4, 1, |x, _y| Luma([[0, 99, 100, 200][x as usize]]));
        let binary = binarize(&magnitude, 100);
        let ink: Vec<bool> = binary.pixels().map(|p| p[0] == 0).collect();
        assert_eq!(ink, vec![false, false, true, true]);

        let binary = binarize(&magnitude, 0);
        assert_eq!(binary.get_pixel(0, 0)[0], 255);
        assert_eq!(binary.get_pixel(1, 0)[0], 0);
    }

    #[test]
    fn test_remove_isolated() {
        let mut img = GrayImage::from_pixel(8, 8, BACKGROUND);
        img.put_pixel(4, 4, INK);
        img.put_pixel(1, 1, INK);
        img.put_pixel(2, 2, INK);
        img.put_pixel(0, 7, INK);
        let cleaned = remove_isolated(&img);
        assert_eq!(cleaned.get_pixel(4, 4)[0], 255);
        assert_eq!(cleaned.get_pixel(1, 1)[0], 0);
        assert_eq!(cleaned.get_pixel(2, 2)[0], 0);
        // replicated border
        assert_eq!(cleaned.get_pixel(0, 7)[0], 0);
    }

    #[test]
    fn test_prepare() {
        let img = DynamicImage::ImageLuma8(square());
        let edges = EdgeDetector::default().prepare(&img, 20);
        assert_eq!(edges.dimensions(), (20, 20));
    }

    #[test]
    fn test_open_missing_file() {
        let res = EdgeDetector::default().open("does/not/exist.png", 100);
        assert!(matches!(res, Err(Error::ImageError { path, .. }) if path.contains("exist.png")));
    }

    #[test]
    fn test_resize_to_max() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(200, 100));
        assert_eq!(resize_to_max(&img, 400).dimensions(), (200, 100));
        assert_eq!(resize_to_max(&img, 50).dimensions(), (50, 25));
        let tall = DynamicImage::ImageLuma8(GrayImage::new(30, 90));
        assert_eq!(resize_to_max(&tall, 60).dimensions(), (20, 60));
    }
}
