use crate::scalar::Scalar;
use crate::{point, Box2D, Point};

/// An axis-aligned rectangle described by its four edges.
///
/// A rectangle created with [`Rect::empty`] has its edges at
/// `{+inf, +inf, -inf, -inf}` and contains nothing. Expanding it with a point or
/// another rectangle gives it an extent, after which `left <= right` and
/// `top <= bottom` always hold.
///
/// `top` is the smallest y coordinate (y points downwards as in SVG).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Rect<S> {
    pub left: S,
    pub top: S,
    pub right: S,
    pub bottom: S,
}

impl<S: Scalar> Rect<S> {
    #[inline]
    pub fn new(left: S, top: S, right: S, bottom: S) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The rectangle that contains nothing.
    #[inline]
    pub fn empty() -> Self {
        Rect {
            left: S::infinity(),
            top: S::infinity(),
            right: S::neg_infinity(),
            bottom: S::neg_infinity(),
        }
    }

    /// Returns true if no point was ever added to this rectangle.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left > self.right || self.top > self.bottom
    }

    #[inline]
    pub fn width(&self) -> S {
        if self.is_empty() {
            return S::ZERO;
        }
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> S {
        if self.is_empty() {
            return S::ZERO;
        }
        self.bottom - self.top
    }

    /// Grow the rectangle so that it contains `p`.
    #[inline]
    pub fn expand_to_include(&mut self, p: Point<S>) {
        self.left = S::min(self.left, p.x);
        self.top = S::min(self.top, p.y);
        self.right = S::max(self.right, p.x);
        self.bottom = S::max(self.bottom, p.y);
    }

    /// Grow the rectangle so that it contains the four corners of `b`.
    pub fn include_box(&mut self, b: &Box2D<S>) {
        self.expand_to_include(b.min);
        self.expand_to_include(point(b.max.x, b.min.y));
        self.expand_to_include(point(b.min.x, b.max.y));
        self.expand_to_include(b.max);
    }

    /// Smallest rectangle containing both rectangles.
    ///
    /// The union with an empty rectangle is the other rectangle.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Rect {
            left: S::min(self.left, other.left),
            top: S::min(self.top, other.top),
            right: S::max(self.right, other.right),
            bottom: S::max(self.bottom, other.bottom),
        }
    }

    /// Returns true if `p` is inside or on the boundary of the rectangle.
    #[inline]
    pub fn contains(&self, p: Point<S>) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Returns `None` for empty rectangles.
    pub fn to_box2d(&self) -> Option<Box2D<S>> {
        if self.is_empty() {
            return None;
        }

        Some(Box2D {
            min: point(self.left, self.top),
            max: point(self.right, self.bottom),
        })
    }
}

impl<S: Scalar> Default for Rect<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Scalar> From<Box2D<S>> for Rect<S> {
    fn from(b: Box2D<S>) -> Self {
        let mut rect = Rect::empty();
        rect.include_box(&b);
        rect
    }
}

#[test]
fn empty_rect() {
    let r: Rect<f32> = Rect::empty();
    assert!(r.is_empty());
    assert_eq!(r.width(), 0.0);
    assert_eq!(r.height(), 0.0);
    assert!(!r.contains(point(0.0, 0.0)));
    assert_eq!(r.to_box2d(), None);
}

#[test]
fn expand() {
    let mut r = Rect::empty();
    r.expand_to_include(point(1.0f32, 2.0));
    assert!(!r.is_empty());
    assert_eq!(r, Rect::new(1.0, 2.0, 1.0, 2.0));

    r.expand_to_include(point(-1.0, 5.0));
    assert_eq!(r, Rect::new(-1.0, 2.0, 1.0, 5.0));
    assert_eq!(r.width(), 2.0);
    assert_eq!(r.height(), 3.0);
    assert!(r.contains(point(0.0, 3.0)));
    assert!(r.contains(point(1.0, 5.0)));
    assert!(!r.contains(point(1.5, 3.0)));
}

#[test]
fn union_is_order_independent() {
    let a = Rect::new(0.0f32, 0.0, 1.0, 1.0);
    let b = Rect::new(-2.0, 0.5, 0.5, 3.0);
    let c = Rect::new(4.0, -1.0, 5.0, 0.0);
    let e = Rect::empty();

    assert_eq!(a.union(&b), b.union(&a));
    assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
    assert_eq!(a.union(&e), a);
    assert_eq!(e.union(&a), a);
}

#[test]
fn from_box() {
    let b = Box2D {
        min: point(1.0f32, 2.0),
        max: point(3.0, 4.0),
    };
    let r: Rect<f32> = b.into();
    assert_eq!(r, Rect::new(1.0, 2.0, 3.0, 4.0));
    assert_eq!(r.to_box2d(), Some(b));
}
