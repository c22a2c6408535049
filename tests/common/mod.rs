//! Synthetic drawings shared by the integration tests.

#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Side of every glyph canvas.
pub const GLYPH: u32 = 24;

pub const INK: Rgb<u8> = Rgb([0, 0, 0]);
pub const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

/// Plus sign with 3px strokes and a 4px margin.
pub fn plus(x: u32, y: u32) -> bool {
    ((10..13).contains(&x) && (4..20).contains(&y)) || ((10..13).contains(&y) && (4..20).contains(&x))
}

/// Hollow square with 3px walls and a 4px margin.
pub fn square(x: u32, y: u32) -> bool {
    (4..20).contains(&x) && (4..20).contains(&y) && (x < 7 || x >= 17 || y < 7 || y >= 17)
}

/// Renders a glyph on its own white canvas.
pub fn glyph_canvas(shape: fn(u32, u32) -> bool) -> RgbImage {
    RgbImage::from_fn(GLYPH, GLYPH, |x, y| if shape(x, y) { INK } else { PAPER })
}

/// White sheet with glyph canvases pasted at the given top-left corners.
pub fn sheet(width: u32, height: u32, placements: &[(fn(u32, u32) -> bool, u32, u32)]) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, PAPER);
    for &(shape, px, py) in placements {
        for y in 0..GLYPH {
            for x in 0..GLYPH {
                if shape(x, y) {
                    img.put_pixel(px + x, py + y, INK);
                }
            }
        }
    }
    img
}

pub fn png(img: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}
