//! Decode and encode helpers on top of the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbaImage};

use crate::util::{ImageId, SymScanError, SymScanResult};

/// Decodes encoded raster bytes (PNG or JPEG) into a dynamic image.
pub fn decode_image(bytes: &[u8], image: ImageId) -> SymScanResult<DynamicImage> {
    if bytes.is_empty() {
        return Err(SymScanError::Decode {
            image,
            reason: "empty image payload".to_owned(),
        });
    }
    image::load_from_memory(bytes).map_err(|err| SymScanError::Decode {
        image,
        reason: err.to_string(),
    })
}

/// Reduces an image to 8-bit luminance.
///
/// Uses BT.601 weights. Alpha is composited over white first, so transparent
/// regions read as blank paper rather than ink.
pub fn luminance(img: &DynamicImage) -> GrayImage {
    let rgba = img.to_rgba8();
    GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b) + 500) / 1000;
        let alpha = u32::from(a);
        let composited = (luma * alpha + 255 * (255 - alpha) + 127) / 255;
        Luma([composited as u8])
    })
}

/// Encodes an RGBA image as PNG.
pub fn encode_png(img: &RgbaImage) -> SymScanResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|err| SymScanError::Encode {
            reason: err.to_string(),
        })?;
    Ok(buf)
}
