//! Scalar reference kernel.

use crate::kernel::Kernel;
use crate::template::TemplatePlan;
use crate::ImageView;

/// Scalar unmasked ZNCC kernel.
pub struct ZnccScalar;

impl Kernel for ZnccScalar {
    fn dot_at(image: ImageView<'_>, plan: &TemplatePlan, x: usize, y: usize) -> f64 {
        let tpl_width = plan.width();
        let t_prime = plan.t_prime();
        let mut dot = 0.0f64;
        for ty in 0..plan.height() {
            let Some(img_row) = image.row(y + ty) else {
                break;
            };
            let base = ty * tpl_width;
            let window = &img_row[x..x + tpl_width];
            for (&value, &t) in window.iter().zip(&t_prime[base..base + tpl_width]) {
                dot += t * f64::from(value);
            }
        }
        dot
    }
}
