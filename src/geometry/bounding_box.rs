use log::trace;

use crate::spacial::Point;

/// Axis aligned bounds in path coordinates (y-down), so `min` is the top-left corner.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            min: Point::new(f64::MAX, f64::MAX),
            max: Point::new(f64::MIN, f64::MIN),
        }
    }
}

impl BoundingBox {
    /// Note that a bounding box of 0,0 -> 0,0 is NOT empty
    /// e.g., a path consisting of a single move to 0,0.
    ///
    /// Only a bounding box which is the same as the one returned by `default` counts as empty.
    pub fn is_empty(&self) -> bool {
        self.eq(&BoundingBox::default())
    }

    pub fn top_left(&self) -> Point {
        self.min
    }

    pub fn bottom_right(&self) -> Point {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Returns the geometric center of the bounding box
    pub fn center(&self) -> Point {
        (self.min + self.max) / 2.0
    }

    pub fn include(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn expand(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.include(other.min);
        self.include(other.max);
    }

    pub fn translated(&self, offset: Point) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Constructs a bounding box from a list of points
    pub fn from_points(points: &[Point]) -> Self {
        let mut bbox = Self::default();
        for point in points {
            bbox.include(*point);
        }
        trace!("bbox from {} points: {:?}", points.len(), bbox);
        bbox
    }
}

#[cfg(test)]
mod bbox_tests {
    use rstest::rstest;

    use super::BoundingBox;
    use crate::spacial::Point;

    #[rstest]
    #[case(BoundingBox::default(), true)]
    #[case(BoundingBox { min: Point::new(0.0, 0.0), max: Point::new(0.0, 0.0) }, false)]
    #[case(BoundingBox { min: Point::new(-10.0, -10.0), max: Point::new(10.0, 10.0) }, false)]
    fn test_is_empty(#[case] input: BoundingBox, #[case] expected: bool) {
        assert_eq!(input.is_empty(), expected);
    }

    #[rstest]
    #[case((0.0, 0.0), (10.0, 10.0), (5.0, 5.0))] // Case 1: Origin 0, 10x10
    #[case((10.0, 10.0), (10.0, 10.0), (15.0, 15.0))] // Case 2: Origin 10, 10x10
    #[case((0.0, 0.0), (5.0, 10.0), (2.5, 5.0))] // Case 3: Origin 0, 5x10
    #[case((10.0, 10.0), (10.0, 5.0), (15.0, 12.5))] // Case 4: Origin 10, 10x5
    fn test_geometric_center(#[case] origin: (f64, f64), #[case] size: (f64, f64), #[case] expected: (f64, f64)) {
        // given
        let bbox = BoundingBox {
            min: Point::new(origin.0, origin.1),
            max: Point::new(origin.0 + size.0, origin.1 + size.1),
        };

        // when
        let center = bbox.center();

        // then
        let epsilon = 1e-9;
        assert!(
            (center.x - expected.0).abs() < epsilon,
            "X mismatch: expected {}, got {}",
            expected.0,
            center.x
        );
        assert!(
            (center.y - expected.1).abs() < epsilon,
            "Y mismatch: expected {}, got {}",
            expected.1,
            center.y
        );
    }

    #[test]
    fn test_from_points() {
        // given
        let points = vec![Point::new(1.0, -2.0), Point::new(-3.0, 4.0), Point::new(0.5, 0.5)];

        // when
        let bbox = BoundingBox::from_points(&points);

        // then
        assert_eq!(bbox.top_left(), Point::new(-3.0, -2.0));
        assert_eq!(bbox.bottom_right(), Point::new(1.0, 4.0));
        assert_eq!(bbox.width(), 4.0);
        assert_eq!(bbox.height(), 6.0);
    }

    #[test]
    fn test_expand_ignores_empty() {
        // given
        let mut bbox = BoundingBox::from_points(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);

        // when
        bbox.expand(&BoundingBox::default());

        // then
        assert_eq!(bbox.width(), 1.0);
        assert_eq!(bbox.height(), 1.0);
    }
}
