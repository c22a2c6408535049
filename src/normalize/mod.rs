//! Image normalization into two-level masks.
//!
//! Every image, template or target, goes through the same steps so that the
//! polarity of the masks agrees: decode, reduce to luminance, Gaussian
//! adaptive threshold with inverted output (ink becomes foreground), then an
//! optional 2x2 opening to drop isolated noise.

mod morph;
mod threshold;

use image::{DynamicImage, GrayImage};

use crate::image::io::{decode_image, luminance};
use crate::image::{ImageView, OwnedImage};
use crate::trace::trace_span;
use crate::util::{ImageId, SymScanError, SymScanResult};

/// Mask value for ink.
pub const FOREGROUND: u8 = 255;
/// Mask value for paper.
pub const BACKGROUND: u8 = 0;

/// Configuration for mask extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizeConfig {
    /// Side of the square neighborhood used for the local mean (odd, >= 3).
    pub block_size: usize,
    /// How much darker than its neighborhood a pixel must be to count as ink.
    pub bias: f32,
    /// Apply the 2x2 opening after thresholding.
    pub open: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            block_size: 11,
            bias: 2.0,
            open: true,
        }
    }
}

/// Two-level image whose pixels are either [`FOREGROUND`] or [`BACKGROUND`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    img: OwnedImage,
}

impl BinaryMask {
    /// Builds a mask from a grayscale buffer; any nonzero pixel is foreground.
    pub fn from_image(img: OwnedImage) -> SymScanResult<Self> {
        let data = img
            .data()
            .iter()
            .map(|&v| if v == 0 { BACKGROUND } else { FOREGROUND })
            .collect();
        Ok(Self {
            img: OwnedImage::new(data, img.width(), img.height())?,
        })
    }

    fn from_thresholded(binary: GrayImage) -> SymScanResult<Self> {
        let (width, height) = (binary.width() as usize, binary.height() as usize);
        Ok(Self {
            img: OwnedImage::new(binary.into_raw(), width, height)?,
        })
    }

    /// Returns a borrowed view of the mask.
    pub fn view(&self) -> ImageView<'_> {
        self.img.view()
    }

    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Mask height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }
}

/// Converts images into binary masks with a fixed policy.
#[derive(Clone, Debug)]
pub struct Normalizer {
    cfg: NormalizeConfig,
    kernel: Vec<f32>,
}

impl Normalizer {
    /// Validates the configuration and precomputes the Gaussian weights.
    pub fn new(cfg: NormalizeConfig) -> SymScanResult<Self> {
        if cfg.block_size < 3 || cfg.block_size % 2 == 0 {
            return Err(SymScanError::validation(format!(
                "block_size must be odd and at least 3, got {}",
                cfg.block_size
            )));
        }
        if !cfg.bias.is_finite() {
            return Err(SymScanError::validation("bias must be finite"));
        }
        let kernel = threshold::gaussian_kernel(cfg.block_size);
        Ok(Self { cfg, kernel })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &NormalizeConfig {
        &self.cfg
    }

    /// Decodes `bytes` and converts the result into a mask.
    ///
    /// `image` names the input in any `Decode` error.
    pub fn normalize(&self, bytes: &[u8], image: ImageId) -> SymScanResult<BinaryMask> {
        let decoded = decode_image(bytes, image)?;
        self.normalize_image(&decoded)
    }

    /// Converts an already decoded image into a mask.
    pub fn normalize_image(&self, img: &DynamicImage) -> SymScanResult<BinaryMask> {
        self.normalize_gray(&luminance(img))
    }

    /// Converts a grayscale image into a mask.
    pub fn normalize_gray(&self, gray: &GrayImage) -> SymScanResult<BinaryMask> {
        let _span = trace_span!(
            "normalize",
            width = gray.width() as usize,
            height = gray.height() as usize
        )
        .entered();
        let binary = threshold::adaptive_threshold_inv(gray, &self.kernel, self.cfg.bias);
        let binary = if self.cfg.open {
            morph::open_2x2(&binary)
        } else {
            binary
        };
        BinaryMask::from_thresholded(binary)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        let cfg = NormalizeConfig::default();
        let kernel = threshold::gaussian_kernel(cfg.block_size);
        Self { cfg, kernel }
    }
}

#[cfg(test)]
mod tests {
    use super::{NormalizeConfig, Normalizer, BACKGROUND, FOREGROUND};
    use crate::image::io::encode_png;
    use crate::template::TemplateId;
    use crate::util::{ImageId, SymScanError};
    use image::{GrayImage, Luma, Rgba, RgbaImage};

    fn paper_with_speck_and_bar() -> GrayImage {
        let mut img = GrayImage::from_pixel(30, 20, Luma([250]));
        // single dark speck
        img.put_pixel(3, 3, Luma([0]));
        // 3px thick bar
        for y in 10..13 {
            for x in 5..25 {
                img.put_pixel(x, y, Luma([10]));
            }
        }
        img
    }

    fn at(mask: &super::BinaryMask, x: usize, y: usize) -> u8 {
        mask.view().row(y).unwrap()[x]
    }

    #[test]
    fn rejects_even_or_tiny_blocks() {
        for block_size in [0, 1, 2, 10] {
            let cfg = NormalizeConfig {
                block_size,
                ..NormalizeConfig::default()
            };
            assert!(Normalizer::new(cfg).is_err(), "block_size {block_size}");
        }
    }

    #[test]
    fn opening_drops_speck_but_keeps_bar() {
        let gray = paper_with_speck_and_bar();
        let mask = Normalizer::default().normalize_gray(&gray).unwrap();
        assert_eq!(at(&mask, 3, 3), BACKGROUND);
        assert_eq!(at(&mask, 15, 11), FOREGROUND);
        assert_eq!(at(&mask, 15, 5), BACKGROUND);
    }

    #[test]
    fn without_opening_the_speck_survives() {
        let gray = paper_with_speck_and_bar();
        let normalizer = Normalizer::new(NormalizeConfig {
            open: false,
            ..NormalizeConfig::default()
        })
        .unwrap();
        let mask = normalizer.normalize_gray(&gray).unwrap();
        assert_eq!(at(&mask, 3, 3), FOREGROUND);
    }

    #[test]
    fn encoded_bytes_take_the_same_path() {
        let mut img = RgbaImage::from_pixel(30, 20, Rgba([255, 255, 255, 255]));
        for y in 10..13 {
            for x in 5..25 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let png = encode_png(&img).unwrap();
        let mask = Normalizer::default()
            .normalize(&png, ImageId::Target)
            .unwrap();
        assert_eq!((mask.width(), mask.height()), (30, 20));
        assert_eq!(at(&mask, 15, 11), FOREGROUND);
        assert_eq!(at(&mask, 15, 2), BACKGROUND);
    }

    #[test]
    fn undecodable_bytes_name_the_input() {
        let id = ImageId::Template(TemplateId(2));
        let err = Normalizer::default().normalize(b"nope", id).unwrap_err();
        assert!(matches!(err, SymScanError::Decode { image, .. } if image == id));
    }
}
