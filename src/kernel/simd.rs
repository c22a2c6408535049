//! SIMD-accelerated kernel using the `wide` crate.
//!
//! The inner template row loop is vectorized to process 4 pixels at a time
//! using `f64x4`; the remainder falls back to scalar code. Accumulating in
//! `f64` keeps exact copies at a score of 1.

use crate::kernel::Kernel;
use crate::template::TemplatePlan;
use crate::ImageView;
use wide::f64x4;

const LANES: usize = 4;

/// Load 4 u8 values and widen to f64x4.
#[inline]
fn load_u8x4_as_f64x4(slice: &[u8]) -> f64x4 {
    f64x4::from([
        f64::from(slice[0]),
        f64::from(slice[1]),
        f64::from(slice[2]),
        f64::from(slice[3]),
    ])
}

/// Load 4 f64 values into f64x4.
#[inline]
fn load_f64x4(slice: &[f64]) -> f64x4 {
    f64x4::from([slice[0], slice[1], slice[2], slice[3]])
}

/// Horizontal sum of f64x4.
#[inline]
fn hsum(v: f64x4) -> f64 {
    v.to_array().iter().sum()
}

/// SIMD-accelerated unmasked ZNCC kernel.
pub struct ZnccSimd;

impl Kernel for ZnccSimd {
    fn dot_at(image: ImageView<'_>, plan: &TemplatePlan, x: usize, y: usize) -> f64 {
        let tpl_width = plan.width();
        let t_prime = plan.t_prime();
        let simd_end = tpl_width / LANES * LANES;

        let mut dot_vec = f64x4::ZERO;
        let mut dot_s = 0.0f64;
        for ty in 0..plan.height() {
            let Some(img_row) = image.row(y + ty) else {
                break;
            };
            let base = ty * tpl_width;

            let mut tx = 0;
            while tx < simd_end {
                let img_vals = load_u8x4_as_f64x4(&img_row[x + tx..]);
                let tpl_vals = load_f64x4(&t_prime[base + tx..]);
                dot_vec += tpl_vals * img_vals;
                tx += LANES;
            }

            while tx < tpl_width {
                dot_s += t_prime[base + tx] * f64::from(img_row[x + tx]);
                tx += 1;
            }
        }
        hsum(dot_vec) + dot_s
    }
}
