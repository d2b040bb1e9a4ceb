use crate::spacial::Point;

/// Resolution used when flattening curves to estimate bounds and arc lengths.
pub const HIGH_RESOLUTION_STEPS: usize = 100;

/// Evaluate a cubic bezier with forward differencing, producing `steps + 1` points.
///
/// Re-sampling the same control points with the same `steps` always yields identical output.
pub fn flatten_cubic(p0: Point, p1: Point, p2: Point, p3: Point, steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    let t = 1.0 / steps as f64;
    let t2 = t * t;
    let t3 = t2 * t;

    let a = -p0 + p1 * 3.0 - p2 * 3.0 + p3;
    let b = p0 * 3.0 - p1 * 6.0 + p2 * 3.0;
    let c = (p1 - p0) * 3.0;

    let mut point = p0;
    let mut first = a * t3 + b * t2 + c * t;
    let mut second = a * (6.0 * t3) + b * (2.0 * t2);
    let third = a * (6.0 * t3);

    let mut points = Vec::with_capacity(steps + 1);
    points.push(point);
    for _ in 1..steps {
        point += first;
        first += second;
        second += third;
        points.push(point);
    }
    // forward differencing accumulates error, pin the end point
    points.push(p3);

    points
}

/// Degree-elevate a quadratic bezier to the equivalent cubic control points.
pub fn quadratic_to_cubic(p0: Point, control: Point, p3: Point) -> (Point, Point) {
    (
        p0 + (control - p0) * (2.0 / 3.0),
        p3 + (control - p3) * (2.0 / 3.0),
    )
}

/// Reflect a control point about `about`, as used by the smooth curve commands.
pub fn reflect(control: Point, about: Point) -> Point {
    about * 2.0 - control
}

/// Estimate the length of a cubic by summing chord lengths of a high resolution flatten.
pub fn arc_length(p0: Point, p1: Point, p2: Point, p3: Point, sample_steps: usize) -> f64 {
    flatten_cubic(p0, p1, p2, p3, sample_steps)
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).norm())
        .sum()
}

/// Number of linear segments needed so that no segment is longer than `min_segment_length`.
pub fn adaptive_steps(p0: Point, p1: Point, p2: Point, p3: Point, min_segment_length: f64, sample_steps: usize) -> usize {
    let length = arc_length(p0, p1, p2, p3, sample_steps);
    ((length / min_segment_length).ceil() as usize).max(1)
}
