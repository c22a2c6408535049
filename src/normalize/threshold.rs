//! Gaussian-weighted adaptive thresholding.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;

use crate::normalize::{BACKGROUND, FOREGROUND};

type LevelImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Builds a normalized 1D Gaussian kernel for an odd block size.
///
/// Sigma follows `0.3 * ((k - 1) / 2 - 1) + 0.8`, which gives 2.0 for k = 11.
pub(crate) fn gaussian_kernel(block_size: usize) -> Vec<f32> {
    let radius = block_size / 2;
    let sigma = 0.3 * ((block_size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f64> = (0..block_size)
        .map(|i| {
            let d = i as f64 - radius as f64;
            (-(d * d) / denom).exp()
        })
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| (w / total) as f32).collect()
}

/// Local mean under the kernel; borders replicate the edge pixels.
fn gaussian_mean(src: &GrayImage, kernel: &[f32]) -> LevelImage {
    let levels = LevelImage::from_fn(src.width(), src.height(), |x, y| {
        Luma([f32::from(src.get_pixel(x, y)[0])])
    });
    separable_filter_equal(&levels, kernel)
}

/// Marks a pixel as foreground when it is at least `bias` darker than its
/// Gaussian-weighted neighborhood.
pub(crate) fn adaptive_threshold_inv(src: &GrayImage, kernel: &[f32], bias: f32) -> GrayImage {
    let mean = gaussian_mean(src, kernel);
    GrayImage::from_fn(src.width(), src.height(), |x, y| {
        let level = mean.get_pixel(x, y)[0] - bias;
        if f32::from(src.get_pixel(x, y)[0]) <= level {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}
