//! Binary opening with a 2x2 structuring element.

use image::{GrayImage, Luma};
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};

use crate::normalize::{BACKGROUND, FOREGROUND};

/// Keeps exactly the union of the 2x2 foreground squares lying fully inside
/// the image.
pub(crate) fn open_2x2(binary: &GrayImage) -> GrayImage {
    let square = GrayImage::from_pixel(2, 2, Luma([FOREGROUND]));
    // erosion tests the square anchored at each pixel's top-left corner
    let mut anchors = grayscale_erode(binary, &Mask::from_image(&square, 0, 0));
    let (width, height) = anchors.dimensions();
    // a square anchored on the last row or column crosses the image edge
    for y in 0..height {
        anchors.put_pixel(width - 1, y, Luma([BACKGROUND]));
    }
    for x in 0..width {
        anchors.put_pixel(x, height - 1, Luma([BACKGROUND]));
    }
    // the reflected square paints every pixel covered by a surviving anchor
    grayscale_dilate(&anchors, &Mask::from_image(&square, 1, 1))
}
