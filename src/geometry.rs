//! Axis-aligned rectangles and overlap measures.

use crate::util::{SymScanError, SymScanResult};

/// Axis-aligned box in pixel coordinates.
///
/// `(x, y)` is the top-left corner; the box covers `x..x + w` and `y..y + h`.
/// Fields stay private so that the far corner always fits in `u32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Rect {
    /// Creates a rectangle, rejecting boxes whose far corner overflows `u32`.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> SymScanResult<Self> {
        if x.checked_add(w).is_none() || y.checked_add(h).is_none() {
            return Err(SymScanError::validation(format!(
                "rectangle ({x}, {y}, {w}, {h}) exceeds the coordinate range"
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Builds a rectangle from `usize` placement coordinates.
    pub(crate) fn from_placement(x: usize, y: usize, w: usize, h: usize) -> SymScanResult<Self> {
        let cast = |v: usize| {
            u32::try_from(v).map_err(|_| SymScanError::InvalidDimensions {
                width: w,
                height: h,
            })
        };
        Self::new(cast(x)?, cast(y)?, cast(w)?, cast(h)?)
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    /// Top-left corner.
    pub fn top_left(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// Exclusive bottom-right corner `(x + w, y + h)`.
    pub fn bottom_right(&self) -> (u32, u32) {
        (self.x + self.w, self.y + self.h)
    }

    /// Box area in pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }

    /// Area shared with `other`, zero when disjoint.
    pub fn intersection_area(&self, other: &Rect) -> u64 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.bottom_right().0.min(other.bottom_right().0);
        let bottom = self.bottom_right().1.min(other.bottom_right().1);
        if right <= left || bottom <= top {
            return 0;
        }
        u64::from(right - left) * u64::from(bottom - top)
    }

    /// Intersection-over-union in `[0, 1]`; zero when the union is empty.
    pub fn iou(&self, other: &Rect) -> f64 {
        let inter = self.intersection_area(other);
        let union = self.area() + other.area() - inter;
        if union == 0 {
            return 0.0;
        }
        inter as f64 / union as f64
    }
}

impl From<Rect> for [u32; 4] {
    fn from(r: Rect) -> Self {
        [r.x, r.y, r.w, r.h]
    }
}

#[cfg(test)]
mod tests {
    use super::Rect;

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let r = Rect::new(3, 4, 10, 8).unwrap();
        assert_eq!(r.iou(&r), 1.0);
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let a = Rect::new(0, 0, 10, 10).unwrap();
        let b = Rect::new(10, 0, 10, 10).unwrap();
        assert_eq!(a.intersection_area(&b), 0);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn iou_matches_hand_computation() {
        let a = Rect::new(0, 0, 10, 10).unwrap();
        let b = Rect::new(5, 0, 10, 10).unwrap();
        // 50 / (100 + 100 - 50)
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_boxes_have_zero_iou() {
        let a = Rect::new(4, 4, 0, 0).unwrap();
        assert_eq!(a.iou(&a), 0.0);
    }

    #[test]
    fn boxes_at_the_coordinate_limit_overlap_safely() {
        let a = Rect::new(u32::MAX - 1, u32::MAX - 1, 1, 1).unwrap();
        let b = Rect::new(u32::MAX - 2, u32::MAX - 1, 2, 1).unwrap();
        assert_eq!(a.bottom_right(), (u32::MAX, u32::MAX));
        assert_eq!(a.iou(&a), 1.0);
        assert_eq!(a.iou(&b), 0.5);
    }

    #[test]
    fn overflowing_corner_is_rejected() {
        assert!(Rect::new(u32::MAX, 0, 1, 1).is_err());
        assert!(Rect::new(0, u32::MAX - 3, 1, 4).is_err());
        let r = Rect::new(2, 3, 4, 5).unwrap();
        assert_eq!(r.top_left(), (2, 3));
        assert_eq!(r.bottom_right(), (6, 8));
    }
}
