//! Plain geometry values reported by the host scroll surface.

/// A point in host pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A size in host pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A size is usable when both extents are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// An axis-aligned rectangle in host pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_valid(&self) -> bool {
        self.origin().is_finite() && self.size().is_valid()
    }
}

/// A half-open pixel interval along the scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelRange {
    pub start: f32,
    pub end: f32,
}

impl PixelRange {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    pub fn from_origin(origin: f32, length: f32) -> Self {
        Self::new(origin, origin + length)
    }

    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// Finite bounds with `end >= start`.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.end >= self.start
    }

    /// True when the two ranges share a non-empty stretch of pixels.
    ///
    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &PixelRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_requires_shared_pixels() {
        let viewport = PixelRange::new(100.0, 300.0);
        assert!(PixelRange::new(120.0, 220.0).overlaps(&viewport));
        assert!(PixelRange::new(50.0, 101.0).overlaps(&viewport));
        assert!(!PixelRange::new(0.0, 100.0).overlaps(&viewport));
        assert!(!PixelRange::new(300.0, 400.0).overlaps(&viewport));
    }

    #[test]
    fn test_range_validity() {
        assert!(PixelRange::from_origin(10.0, 0.0).is_valid());
        assert!(!PixelRange::new(10.0, 5.0).is_valid());
        assert!(!PixelRange::new(f32::NAN, 5.0).is_valid());
    }

    #[test]
    fn test_rect_validity() {
        assert!(Rect::new(0.0, 10.0, 100.0, 20.0).is_valid());
        assert!(!Rect::new(0.0, 10.0, -1.0, 20.0).is_valid());
        assert!(!Rect::new(f32::INFINITY, 0.0, 1.0, 1.0).is_valid());
    }
}
