use std::fmt;

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle spanning `top_left` up to (but excluding) `bottom_right`
///
/// Only [`normalize`] and [`Rectangle::clamp_to`] construct values, so
/// `top_left <= bottom_right` holds componentwise for every rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    top_left: Point,
    bottom_right: Point,
}

/// Build a rectangle from two arbitrary corner clicks
pub fn normalize(a: Point, b: Point) -> Rectangle {
    Rectangle {
        top_left: Point::new(a.x.min(b.x), a.y.min(b.y)),
        bottom_right: Point::new(a.x.max(b.x), a.y.max(b.y)),
    }
}

impl Rectangle {
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    pub fn width(&self) -> u32 {
        self.bottom_right.x.abs_diff(self.top_left.x)
    }

    pub fn height(&self) -> u32 {
        self.bottom_right.y.abs_diff(self.top_left.y)
    }

    /// True when the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        let (x, y) = (x as i64, y as i64);
        x >= self.top_left.x as i64
            && x < self.bottom_right.x as i64
            && y >= self.top_left.y as i64
            && y < self.bottom_right.y as i64
    }

    /// Intersect with the `width` x `height` image area
    ///
    /// A rectangle lying entirely outside the image collapses onto the nearest
    /// image edge and comes back empty.
    pub fn clamp_to(&self, width: u32, height: u32) -> Rectangle {
        let max_x = i32::try_from(width).unwrap_or(i32::MAX);
        let max_y = i32::try_from(height).unwrap_or(i32::MAX);
        let clamp = |p: Point| Point::new(p.x.clamp(0, max_x), p.y.clamp(0, max_y));

        normalize(clamp(self.top_left), clamp(self.bottom_right))
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.top_left, self.bottom_right)
    }
}
