//! Plane geometry for polygon annotation
//!
//! All coordinates are canvas pixels, `x` to the right and `y` down.

/// A point on the canvas
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(self, other: Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Move `length` away from `self` in the direction of `toward`
    ///
    /// The angle comes from `atan2`, so a `toward` equal to `self` projects
    /// along the positive x axis. A negative length walks backwards.
    pub fn project_toward(self, toward: Point, length: f64) -> Point {
        let angle = (toward.y - self.y).atan2(toward.x - self.x);
        Point {
            x: self.x + length * angle.cos(),
            y: self.y + length * angle.sin(),
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Area of a closed polygon by the shoelace formula
///
/// The last point connects back to the first. Returns zero for fewer than
/// three points.
pub fn shoelace_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = edges(points)
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    (twice / 2.0).abs()
}

/// Unweighted average of the vertices
///
/// Used for label placement. This is not the area centroid: vertices
/// clustered on one side pull the result toward them.
pub fn vertex_centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Consecutive vertex pairs of the closed ring, including last → first
pub fn edges(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = points.len();
    (0..n).map(move |i| (points[i], points[(i + 1) % n]))
}

/// Even-odd ray cast containment test
pub fn polygon_contains(points: &[Point], p: Point) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let cross_x = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
            if p.x < cross_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
