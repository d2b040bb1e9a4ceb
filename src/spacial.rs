/// 2-D value used for absolute positions and for relative deltas alike.
///
/// Arithmetic always yields new values; equality is exact floating point comparison.
pub type Point = nalgebra::Vector2<f64>;

pub trait Invert {
    fn invert_x(self) -> Self;
    fn invert_y(self) -> Self;
}

impl Invert for Point {
    fn invert_x(self) -> Self {
        Self::new(-self.x, self.y)
    }

    fn invert_y(self) -> Self {
        Self::new(self.x, -self.y)
    }
}

pub trait Rotate {
    /// Rotate about `pivot` by `degrees`.
    ///
    /// In the y-down path coordinate system a positive angle turns the point clockwise on screen.
    fn rotate_about(self, degrees: f64, pivot: Point) -> Self;
}

impl Rotate for Point {
    fn rotate_about(self, degrees: f64, pivot: Point) -> Self {
        let (sin_theta, cos_theta) = degrees.to_radians().sin_cos();
        let x = self.x - pivot.x;
        let y = self.y - pivot.y;

        Point::new(
            x * cos_theta - y * sin_theta + pivot.x,
            x * sin_theta + y * cos_theta + pivot.y,
        )
    }
}

pub trait FromTuple2 {
    fn from(value: (f64, f64)) -> Self;
}

impl FromTuple2 for Point {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// Round `value` to `digits` decimal places, used when rendering numbers as text.
pub fn round_to(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    let rounded = (value * factor).round() / factor;
    // avoid rendering "-0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub trait DedupEpsilon {
    /// Drop points within `epsilon` of the previously kept point, on both axes.
    fn dedup_with_epsilon(self, epsilon: f64) -> Self;
}

impl DedupEpsilon for Vec<Point> {
    fn dedup_with_epsilon(mut self, epsilon: f64) -> Self {
        self.dedup_by(|b, a| (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon);
        self
    }
}
