//! Rendering accepted detections onto the original target.

use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as DrawRect;

use crate::candidate::Detection;
use crate::image::io::encode_png;
use crate::trace::trace_span;
use crate::util::{SymScanError, SymScanResult};

/// Configuration for box rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotateConfig {
    /// Outline thickness in pixels, growing inward from the box edge.
    pub stroke_width: u32,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self { stroke_width: 2 }
    }
}

/// Draws detection outlines on a copy of the target.
#[derive(Clone, Debug, Default)]
pub struct Annotator {
    cfg: AnnotateConfig,
}

impl Annotator {
    pub fn new(cfg: AnnotateConfig) -> SymScanResult<Self> {
        if cfg.stroke_width == 0 {
            return Err(SymScanError::validation("stroke_width must be at least 1"));
        }
        Ok(Self { cfg })
    }

    /// Returns an RGBA copy of `original` with one outline per detection.
    /// The input is never modified.
    pub fn render(&self, original: &DynamicImage, detections: &[Detection]) -> RgbaImage {
        let _span = trace_span!("annotate", boxes = detections.len()).entered();
        let mut canvas = original.to_rgba8();
        for det in detections {
            let [r, g, b] = det.color.to_array();
            let color = Rgba([r, g, b, 255]);
            for inset in 0..self.cfg.stroke_width {
                let Some(w) = det.bbox.width().checked_sub(2 * inset).filter(|&w| w > 0) else {
                    break;
                };
                let Some(h) = det.bbox.height().checked_sub(2 * inset).filter(|&h| h > 0) else {
                    break;
                };
                let x = i64::from(det.bbox.x()) + i64::from(inset);
                let y = i64::from(det.bbox.y()) + i64::from(inset);
                let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
                    break;
                };
                draw_hollow_rect_mut(&mut canvas, DrawRect::at(x, y).of_size(w, h), color);
            }
        }
        canvas
    }

    /// Renders and encodes the annotated target as PNG.
    pub fn annotate(
        &self,
        original: &DynamicImage,
        detections: &[Detection],
    ) -> SymScanResult<Vec<u8>> {
        encode_png(&self.render(original, detections))
    }
}
