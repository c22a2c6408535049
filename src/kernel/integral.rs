//! Integral images for constant-time window sums.

use crate::image::ImageView;

/// Summed-area tables of pixel values and squared pixel values.
///
/// Both tables have a zero first row and column, so the sum over the window
/// with top-left `(x, y)` and size `w x h` needs four lookups.
#[derive(Clone, Debug)]
pub struct WindowStats {
    stride: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl WindowStats {
    /// Builds both tables for an image.
    pub fn from_view(image: ImageView<'_>) -> Self {
        let width = image.width();
        let height = image.height();
        let stride = width + 1;
        let mut sum = vec![0u64; stride * (height + 1)];
        let mut sum_sq = vec![0u64; stride * (height + 1)];
        for (y, row) in image.rows().enumerate() {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for (x, &value) in row.iter().enumerate() {
                let v = u64::from(value);
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row_sum;
                sum_sq[idx] = sum_sq[idx - stride] + row_sq;
            }
        }
        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    /// Returns `(sum, sum of squares)` over a window.
    ///
    /// The window must lie inside the image the tables were built from.
    pub fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        let a = y * self.stride + x;
        let b = y * self.stride + x + w;
        let c = (y + h) * self.stride + x;
        let d = (y + h) * self.stride + x + w;
        let sum = self.sum[d] + self.sum[a] - self.sum[b] - self.sum[c];
        let sum_sq = self.sum_sq[d] + self.sum_sq[a] - self.sum_sq[b] - self.sum_sq[c];
        (sum as f64, sum_sq as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::WindowStats;
    use crate::image::ImageView;

    #[test]
    fn window_sums_match_bruteforce() {
        let (w, h) = (7, 5);
        let data: Vec<u8> = (0..w * h).map(|i| ((i * 37 + 11) % 256) as u8).collect();
        let view = ImageView::from_slice(&data, w, h).unwrap();
        let stats = WindowStats::from_view(view);
        for (x, y, ww, wh) in [(0, 0, 7, 5), (2, 1, 3, 2), (6, 4, 1, 1), (1, 0, 4, 5)] {
            let mut sum = 0.0f64;
            let mut sum_sq = 0.0f64;
            for yy in y..y + wh {
                for xx in x..x + ww {
                    let v = f64::from(data[yy * w + xx]);
                    sum += v;
                    sum_sq += v * v;
                }
            }
            assert_eq!(stats.window(x, y, ww, wh), (sum, sum_sq));
        }
    }
}
