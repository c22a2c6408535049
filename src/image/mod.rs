//! Grayscale pixel buffers.
//!
//! Everything past decoding works on single-channel 8-bit rasters stored
//! row-major without padding.

use crate::util::{SymScanError, SymScanResult};

pub mod io;

/// Borrowed 8-bit raster.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> ImageView<'a> {
    /// Views the first `width * height` bytes of `data`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> SymScanResult<Self> {
        if width == 0 || height == 0 {
            return Err(SymScanError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(SymScanError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(SymScanError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data: &data[..needed],
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels of row `y`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Rows top to bottom, each exactly `width` long.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.data.chunks_exact(self.width)
    }
}

/// Packed 8-bit raster that owns its pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Takes a row-major buffer of exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> SymScanResult<Self> {
        let needed = width
            .checked_mul(height)
            .filter(|&n| n > 0)
            .ok_or(SymScanError::InvalidDimensions { width, height })?;
        match data.len() {
            len if len < needed => Err(SymScanError::BufferTooSmall { needed, got: len }),
            len if len > needed => Err(SymScanError::InvalidDimensions { width, height }),
            _ => Ok(Self {
                data,
                width,
                height,
            }),
        }
    }

    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageView, OwnedImage};

    #[test]
    fn rows_ignore_trailing_bytes() {
        let data = [1u8, 2, 3, 4, 5, 6, 9];
        let view = ImageView::from_slice(&data, 2, 3).unwrap();
        let rows: Vec<&[u8]> = view.rows().collect();
        assert_eq!(rows, vec![&[1u8, 2][..], &[3, 4][..], &[5, 6][..]]);
        assert_eq!(view.row(2), Some(&[5u8, 6][..]));
        assert_eq!(view.row(3), None);
    }

    #[test]
    fn owned_image_rejects_zero_area() {
        assert!(OwnedImage::new(Vec::new(), 0, 4).is_err());
        assert!(OwnedImage::new(vec![7; 4], 2, 2).is_ok());
    }
}
