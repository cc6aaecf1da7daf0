//! Geometry primitives shared by the skin engine.
//!
//! All coordinates use a top-left origin with y growing downward. Skin
//! documents are authored in "mapping space" (the skin's virtual canvas);
//! the layout transform maps them into container space.

use serde::{Deserialize, Serialize};

/// A point in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Width divided by height. Zero for degenerate sizes.
    pub fn aspect_ratio(&self) -> f64 {
        if self.is_valid() {
            self.width / self.height
        } else {
            0.0
        }
    }
}

/// Per-edge distances, used for extended hit margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub right: f64,
}

impl EdgeInsets {
    pub const ZERO: Self = Self::uniform(0.0);

    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Same inset on every side.
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            left: value,
            bottom: value,
            right: value,
        }
    }

    /// Total horizontal inset (left + right).
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical inset (top + bottom).
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin with the given size.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True when width and height are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.size().is_valid()
    }

    /// Check if a point is inside this rectangle (right/bottom edges excluded).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.max_x() && point.y >= self.y && point.y < self.max_y()
    }

    /// Grow the rectangle outward by the given insets.
    pub fn outset(&self, insets: EdgeInsets) -> Rect {
        Rect {
            x: self.x - insets.left,
            y: self.y - insets.top,
            width: self.width + insets.horizontal(),
            height: self.height + insets.vertical(),
        }
    }

    /// Multiply origin and size by a uniform scale factor.
    pub fn scaled(&self, scale: f64) -> Rect {
        Rect {
            x: self.x * scale,
            y: self.y * scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }

    /// Translate the rectangle.
    pub fn offset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Map a unit-space rectangle (components in 0..=1) onto `target`.
    pub fn denormalized_in(&self, target: Rect) -> Rect {
        Rect {
            x: target.x + self.x * target.width,
            y: target.y + self.y * target.height,
            width: self.width * target.width,
            height: self.height * target.height,
        }
    }

    /// Express this rectangle as fractions of `size`.
    pub fn normalized_by(&self, size: Size) -> Rect {
        Rect {
            x: self.x / size.width,
            y: self.y / size.height,
            width: self.width / size.width,
            height: self.height / size.height,
        }
    }

    /// True when every component lies within 0..=1.
    pub fn is_unit(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_excludes_far_edges() {
        let r = Rect::new(10.0, 10.0, 40.0, 40.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(49.9, 49.9)));
        assert!(!r.contains(Point::new(50.0, 30.0)));
        assert!(!r.contains(Point::new(30.0, 50.0)));
        assert!(!r.contains(Point::new(9.9, 30.0)));
    }

    #[test]
    fn outset_grows_each_side() {
        let r = Rect::new(10.0, 10.0, 40.0, 40.0).outset(EdgeInsets::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(r, Rect::new(8.0, 9.0, 46.0, 44.0));
    }

    #[test]
    fn scaled_then_offset() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0).scaled(2.0).offset_by(5.0, -5.0);
        assert_eq!(r, Rect::new(25.0, 35.0, 60.0, 80.0));
    }

    #[test]
    fn center_of_rect() {
        let c = Rect::new(0.0, 10.0, 100.0, 50.0).center();
        assert_eq!(c, Point::new(50.0, 35.0));
    }

    #[test]
    fn normalize_and_denormalize() {
        let size = Size::new(400.0, 800.0);
        let r = Rect::new(100.0, 200.0, 200.0, 400.0);
        let unit = r.normalized_by(size);
        assert_eq!(unit, Rect::new(0.25, 0.25, 0.5, 0.5));
        assert!(unit.is_unit());
        assert_eq!(unit.denormalized_in(Rect::from_size(size)), r);
    }

    #[test]
    fn unit_detection() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_unit());
        assert!(!Rect::new(0.0, 0.0, 1.5, 1.0).is_unit());
        assert!(!Rect::new(-0.1, 0.0, 0.5, 0.5).is_unit());
    }

    #[test]
    fn size_validity() {
        assert!(Size::new(1.0, 1.0).is_valid());
        assert!(!Size::new(0.0, 1.0).is_valid());
        assert!(!Size::new(1.0, -1.0).is_valid());
        assert!(!Size::new(f64::NAN, 1.0).is_valid());
        assert!(!Size::new(f64::INFINITY, 1.0).is_valid());
    }

    #[test]
    fn aspect_ratio_of_degenerate_size_is_zero() {
        assert_eq!(Size::new(4.0, 3.0).aspect_ratio(), 4.0 / 3.0);
        assert_eq!(Size::ZERO.aspect_ratio(), 0.0);
    }

    #[test]
    fn insets_totals() {
        let e = EdgeInsets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(e.horizontal(), 6.0);
        assert_eq!(e.vertical(), 4.0);
        assert_eq!(EdgeInsets::uniform(5.0).horizontal(), 10.0);
    }

    #[test]
    fn distance() {
        assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn insets_deserialize_missing_sides_as_zero() {
        let e: EdgeInsets = serde_json::from_str(r#"{"top": 5}"#).unwrap();
        assert_eq!(e, EdgeInsets::new(5.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn rect_serde_roundtrip() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&r).unwrap();
        let r2: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, r2);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn arb_rect() -> impl Strategy<Value = Rect> {
            (-500.0f64..500.0, -500.0f64..500.0, 0.1f64..500.0, 0.1f64..500.0)
                .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        }

        proptest! {
            #[test]
            fn outset_contains_original(r in arb_rect(), inset in 0.0f64..100.0) {
                let grown = r.outset(EdgeInsets::uniform(inset));
                prop_assert!(grown.contains(Point::new(r.x, r.y)));
                prop_assert!(grown.contains(r.center()));
                prop_assert!(grown.width >= r.width && grown.height >= r.height);
            }

            #[test]
            fn scaled_center_follows_scale(r in arb_rect(), scale in 0.01f64..10.0) {
                let c = r.scaled(scale).center();
                prop_assert!((c.x - r.center().x * scale).abs() < 1e-6);
                prop_assert!((c.y - r.center().y * scale).abs() < 1e-6);
            }
        }
    }
}
