// Screen-space rectangles as reported by the accessibility provider.
// Origin is top-left; width and height are never negative for real windows.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Axis-aligned rectangle in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Build a rectangle from origin and size.
    #[inline]
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// True when `other` lies entirely within `self` (edges inclusive).
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// True when the point lies within `self` (edges inclusive).
    #[inline]
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        px >= self.left() && px <= self.right() && py >= self.top() && py <= self.bottom()
    }
}

impl Display for Rect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "<{:.0},{:.0},{:.0},{:.0}>", self.x, self.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::Rect;

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (
            -1000.0f64..1000.0,
            -1000.0f64..1000.0,
            10.0f64..1500.0,
            10.0f64..1500.0,
        )
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    #[test]
    fn partially_offscreen_window_is_not_contained() {
        let desktop = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        assert!(desktop.contains(&Rect::new(10.0, 10.0, 800.0, 600.0)));
        assert!(desktop.contains(&desktop));
        assert!(!desktop.contains(&Rect::new(1500.0, 10.0, 800.0, 600.0)));
        assert!(!desktop.contains(&Rect::new(-5.0, 10.0, 100.0, 100.0)));
    }

    proptest! {
        #[test]
        fn containment_implies_corners_inside(outer in rect_strategy(), inner in rect_strategy()) {
            if outer.contains(&inner) {
                prop_assert!(outer.contains_point(inner.left(), inner.top()));
                prop_assert!(outer.contains_point(inner.right(), inner.bottom()));
                prop_assert!(inner.w <= outer.w && inner.h <= outer.h);
            }
        }

        #[test]
        fn every_rect_contains_itself(r in rect_strategy()) {
            prop_assert!(r.contains(&r));
        }
    }
}
