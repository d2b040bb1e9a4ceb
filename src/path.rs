mod flatten;
mod grammar;

use std::fmt::{Display, Formatter};

pub use flatten::*;
pub use grammar::{parse, CommandKind, PathCommand};
use log::{debug, trace};

use crate::error::GrammarError;
use crate::geometry::BoundingBox;
use crate::spacial::{round_to, DedupEpsilon, Invert, Point, Rotate};

/// Flattened points closer than this are one point.
const POINT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct Path {
    original: String,
    parsed: Vec<PathCommand>,
    relative: Vec<PathCommand>,
    bounding_box: BoundingBox,
}

/// Paths are compared by their canonical relative commands.
impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.relative == other.relative
    }
}

/// Parameters for [`Path::transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathTransform {
    pub scale: f64,
    /// degrees, clockwise positive
    pub rotate_angle: f64,
    /// in board coordinates (y-up)
    pub rotate_pivot: Point,
    pub mirror: bool,
    /// transform about the bounding box center instead of the path origin
    pub center: bool,
}

impl Default for PathTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotate_angle: 0.0,
            rotate_pivot: Point::zeros(),
            mirror: false,
            center: true,
        }
    }
}

/// Output of [`Path::transform`], the requested path and its horizontally mirrored twin.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedPath {
    pub path: Path,
    pub mirrored: Path,
}

/// A flattened sub-path in absolute path coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub points: Vec<Point>,
    pub closed: bool,
}

/// A command with all operands as absolute positions.
#[derive(Debug, Clone, PartialEq)]
struct AbsoluteCommand {
    kind: CommandKind,
    points: Vec<Point>,
}

/// Drawing primitives with smooth and quadratic curves lifted to cubics.
#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Move(Point),
    Line(Point),
    Cubic([Point; 4]),
    Close(Point),
}

impl Path {
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        let parsed = grammar::parse(text)?;
        let relative = to_relative(&parsed);
        let bounding_box = bounding_box(&relative, HIGH_RESOLUTION_STEPS);

        Ok(Self {
            original: text.to_string(),
            parsed,
            relative,
            bounding_box,
        })
    }

    /// Build a path from commands already in canonical relative form.
    pub fn from_relative(relative: Vec<PathCommand>) -> Self {
        let bounding_box = bounding_box(&relative, HIGH_RESOLUTION_STEPS);
        let original = render(&relative, None);
        Self {
            original,
            parsed: relative.clone(),
            relative,
            bounding_box,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn parsed_commands(&self) -> &[PathCommand] {
        &self.parsed
    }

    /// Canonical relative commands.
    pub fn commands(&self) -> &[PathCommand] {
        &self.relative
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn width(&self) -> f64 {
        self.bounding_box.width()
    }

    pub fn height(&self) -> f64 {
        self.bounding_box.height()
    }

    pub fn top_left(&self) -> Point {
        self.bounding_box.top_left()
    }

    pub fn bottom_right(&self) -> Point {
        self.bounding_box.bottom_right()
    }

    /// Absolute position of the current point after the last command.
    pub fn end_point(&self) -> Point {
        let mut current = Point::zeros();
        for command in absolute_commands(&self.relative) {
            match command.kind {
                CommandKind::ClosePath => {
                    if let Some(origin) = command.points.first() {
                        current = *origin;
                    }
                }
                _ => {
                    if let Some(last) = command.points.last() {
                        current = *last;
                    }
                }
            }
        }
        current
    }

    /// Canonical text, optionally rounding coordinates to `digits` decimal places.
    pub fn to_text(&self, digits: Option<u32>) -> String {
        render(&self.relative, digits)
    }

    /// Shift the whole path, only the anchor changes in relative form.
    pub fn translated(&self, offset: Point) -> Self {
        let mut relative = self.relative.clone();
        if let Some(anchor) = relative
            .first_mut()
            .and_then(|command| command.points.first_mut())
        {
            *anchor += offset;
        }
        Self {
            original: render(&relative, None),
            parsed: relative.clone(),
            relative,
            bounding_box: self.bounding_box.translated(offset),
        }
    }

    /// Negate the x component of every operand, command letters are left intact.
    pub fn mirrored(&self) -> Self {
        let relative = self
            .relative
            .iter()
            .map(|command| PathCommand {
                kind: command.kind,
                relative: command.relative,
                points: command
                    .points
                    .iter()
                    .map(|point| point.invert_x())
                    .collect(),
            })
            .collect();
        Self::from_relative(relative)
    }

    /// Concatenate paths, re-anchoring each following path relative to the end of the previous one.
    pub fn join(paths: &[Path]) -> Option<Self> {
        let (first, rest) = paths.split_first()?;
        let mut relative = first.relative.clone();
        let mut end = first.end_point();

        for path in rest {
            let mut commands = path.relative.clone();
            let anchor = commands
                .first_mut()
                .and_then(|command| command.points.first_mut());
            if let Some(anchor) = anchor {
                *anchor -= end;
            }
            end = path.end_point();
            relative.extend(commands);
        }

        Some(Self::from_relative(relative))
    }

    /// Recenter, rotate, scale and optionally mirror, returning new canonical paths.
    ///
    /// The pivot is given in board coordinates (y-up) and is converted to path coordinates (y-down)
    /// here, which is the only place the path model inverts the y axis.
    #[profiling::function]
    pub fn transform(&self, params: &PathTransform) -> TransformedPath {
        let offset = match params.center {
            true => self.bounding_box.center(),
            false => Point::zeros(),
        };
        let pivot = params.rotate_pivot.invert_y();
        let rotated = params.rotate_angle % 360.0 != 0.0;

        let absolute = absolute_commands(&self.relative)
            .into_iter()
            .map(|command| {
                let kind = match command.kind {
                    CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo if rotated => CommandKind::LineTo,
                    kind => kind,
                };
                let points = command
                    .points
                    .into_iter()
                    .map(|point| (point - offset).rotate_about(params.rotate_angle, pivot) * params.scale)
                    .collect();
                AbsoluteCommand {
                    kind,
                    points,
                }
            })
            .collect::<Vec<_>>();

        let normal = Self::from_relative(relative_from_absolute(&absolute));
        debug!(
            "transformed path. params: {:?}, bbox: {:?} -> {:?}",
            params, self.bounding_box, normal.bounding_box
        );

        let mirrored = normal.mirrored();
        match params.mirror {
            true => TransformedPath {
                path: mirrored,
                mirrored: normal,
            },
            false => TransformedPath {
                path: normal,
                mirrored,
            },
        }
    }

    /// Flatten into point lists for manufacturing output.
    ///
    /// Each curve gets `ceil(arc_length / min_segment_length)` segments, where the arc length is
    /// estimated from a `sample_steps` flatten, so segment density follows physical length.
    #[profiling::function]
    pub fn sub_paths(&self, min_segment_length: f64, sample_steps: usize) -> Vec<SubPath> {
        let mut sub_paths = Vec::new();
        let mut points: Vec<Point> = Vec::new();
        let mut closed = false;
        let mut restart: Option<Point> = None;

        fn flush(sub_paths: &mut Vec<SubPath>, points: &mut Vec<Point>, closed: &mut bool) {
            let kept = std::mem::take(points).dedup_with_epsilon(POINT_EPSILON);
            if kept.len() > 1 {
                sub_paths.push(SubPath {
                    points: kept,
                    closed: *closed,
                });
            } else {
                points.clear();
            }
            *closed = false;
        }

        for segment in segments(&absolute_commands(&self.relative)) {
            if !matches!(segment, Segment::Move(_)) {
                if let Some(start) = restart.take() {
                    points.push(start);
                }
            }
            match segment {
                Segment::Move(point) => {
                    flush(&mut sub_paths, &mut points, &mut closed);
                    restart = None;
                    points.push(point);
                }
                Segment::Line(point) => points.push(point),
                Segment::Cubic([p0, p1, p2, p3]) => {
                    let steps = adaptive_steps(p0, p1, p2, p3, min_segment_length, sample_steps);
                    trace!("curve flattened into {} segments", steps);
                    points.extend(
                        flatten_cubic(p0, p1, p2, p3, steps)
                            .into_iter()
                            .skip(1),
                    );
                }
                Segment::Close(origin) => {
                    points.push(origin);
                    closed = true;
                    flush(&mut sub_paths, &mut points, &mut closed);
                    restart = Some(origin);
                }
            }
        }
        flush(&mut sub_paths, &mut points, &mut closed);

        sub_paths
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", render(&self.relative, None))
    }
}

fn render(commands: &[PathCommand], digits: Option<u32>) -> String {
    match digits {
        None => commands
            .iter()
            .map(|command| command.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        Some(digits) => commands
            .iter()
            .map(|command| {
                let points = command
                    .points
                    .iter()
                    .map(|point| Point::new(round_to(point.x, digits), round_to(point.y, digits)))
                    .collect();
                PathCommand::new(command.kind, command.relative, points).to_string()
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Convert any mix of absolute and relative commands into relative commands.
///
/// Relative commands are copied as-is, so the conversion is idempotent.  The first move of the
/// path is referenced to the origin, its operand therefore is the absolute anchor.
pub fn to_relative(commands: &[PathCommand]) -> Vec<PathCommand> {
    let mut current = Point::zeros();
    let mut origin = Point::zeros();
    let mut relative = Vec::with_capacity(commands.len());

    for command in commands {
        let mut points = Vec::with_capacity(command.points.len());
        match command.kind {
            CommandKind::ClosePath => {
                current = origin;
            }
            CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo => {
                for point in &command.points {
                    let delta = match (command.relative, command.kind) {
                        (true, _) => *point,
                        (false, CommandKind::HorizontalLineTo) => Point::new(point.x - current.x, 0.0),
                        (false, _) => Point::new(0.0, point.y - current.y),
                    };
                    current += delta;
                    points.push(delta);
                }
            }
            kind => {
                for (index, segment) in command.segments().enumerate() {
                    let base = current;
                    for point in segment {
                        match command.relative {
                            true => {
                                points.push(*point);
                                current = base + point;
                            }
                            false => {
                                points.push(point - base);
                                current = *point;
                            }
                        }
                    }
                    if kind == CommandKind::MoveTo && index == 0 {
                        origin = current;
                    }
                }
            }
        }
        relative.push(PathCommand::new(command.kind, true, points));
    }

    relative
}

/// Reconstruct absolute positions for every operand, `H`/`V` become full positions.
fn absolute_commands(commands: &[PathCommand]) -> Vec<AbsoluteCommand> {
    let mut current = Point::zeros();
    let mut origin = Point::zeros();
    let mut absolute = Vec::with_capacity(commands.len());

    for command in commands {
        let mut points = Vec::with_capacity(command.points.len());
        match command.kind {
            CommandKind::ClosePath => {
                current = origin;
                points.push(origin);
            }
            CommandKind::HorizontalLineTo => {
                for point in &command.points {
                    current = match command.relative {
                        true => Point::new(current.x + point.x, current.y),
                        false => Point::new(point.x, current.y),
                    };
                    points.push(current);
                }
            }
            CommandKind::VerticalLineTo => {
                for point in &command.points {
                    current = match command.relative {
                        true => Point::new(current.x, current.y + point.y),
                        false => Point::new(current.x, point.y),
                    };
                    points.push(current);
                }
            }
            kind => {
                for (index, segment) in command.segments().enumerate() {
                    let base = current;
                    for point in segment {
                        points.push(match command.relative {
                            true => base + point,
                            false => *point,
                        });
                    }
                    if let Some(last) = points.last() {
                        current = *last;
                    }
                    if kind == CommandKind::MoveTo && index == 0 {
                        origin = current;
                    }
                }
            }
        }
        absolute.push(AbsoluteCommand {
            kind: command.kind,
            points,
        });
    }

    absolute
}

fn relative_from_absolute(commands: &[AbsoluteCommand]) -> Vec<PathCommand> {
    let mut current = Point::zeros();
    let mut origin = Point::zeros();
    let mut relative = Vec::with_capacity(commands.len());

    for command in commands {
        let mut points = Vec::with_capacity(command.points.len());
        match command.kind {
            CommandKind::ClosePath => {
                current = origin;
            }
            CommandKind::HorizontalLineTo => {
                for point in &command.points {
                    points.push(Point::new(point.x - current.x, 0.0));
                    current = *point;
                }
            }
            CommandKind::VerticalLineTo => {
                for point in &command.points {
                    points.push(Point::new(0.0, point.y - current.y));
                    current = *point;
                }
            }
            kind => {
                let group = kind.group_size();
                for (index, segment) in command.points.chunks(group).enumerate() {
                    let base = current;
                    points.extend(segment.iter().map(|point| point - base));
                    if let Some(last) = segment.last() {
                        current = *last;
                    }
                    if kind == CommandKind::MoveTo && index == 0 {
                        origin = current;
                    }
                }
            }
        }
        relative.push(PathCommand::new(command.kind, true, points));
    }

    relative
}

fn segments(commands: &[AbsoluteCommand]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = Point::zeros();
    let mut last_cubic_control: Option<Point> = None;
    let mut last_quadratic_control: Option<Point> = None;

    for command in commands {
        let group = command.kind.group_size().max(1);
        for (index, operands) in command.points.chunks(group).enumerate() {
            let mut cubic_control = None;
            let mut quadratic_control = None;

            match command.kind {
                CommandKind::MoveTo if index == 0 => segments.push(Segment::Move(operands[0])),
                CommandKind::ClosePath => segments.push(Segment::Close(operands[0])),
                CommandKind::MoveTo
                | CommandKind::LineTo
                | CommandKind::HorizontalLineTo
                | CommandKind::VerticalLineTo => segments.push(Segment::Line(operands[0])),
                CommandKind::CubicCurveTo => {
                    segments.push(Segment::Cubic([current, operands[0], operands[1], operands[2]]));
                    cubic_control = Some(operands[1]);
                }
                CommandKind::SmoothCubicTo => {
                    let first = last_cubic_control
                        .map(|control| reflect(control, current))
                        .unwrap_or(current);
                    segments.push(Segment::Cubic([current, first, operands[0], operands[1]]));
                    cubic_control = Some(operands[0]);
                }
                CommandKind::QuadraticCurveTo => {
                    let (c1, c2) = quadratic_to_cubic(current, operands[0], operands[1]);
                    segments.push(Segment::Cubic([current, c1, c2, operands[1]]));
                    quadratic_control = Some(operands[0]);
                }
                CommandKind::SmoothQuadraticTo => {
                    let control = last_quadratic_control
                        .map(|control| reflect(control, current))
                        .unwrap_or(current);
                    let (c1, c2) = quadratic_to_cubic(current, control, operands[0]);
                    segments.push(Segment::Cubic([current, c1, c2, operands[0]]));
                    quadratic_control = Some(control);
                }
            }

            last_cubic_control = cubic_control;
            last_quadratic_control = quadratic_control;
            if let Some(last) = operands.last() {
                current = *last;
            }
        }
    }

    segments
}

/// Bounds of a relative path, curves are flattened with `steps` purely for measurement.
pub fn bounding_box(commands: &[PathCommand], steps: usize) -> BoundingBox {
    let mut bbox = BoundingBox::default();
    for segment in segments(&absolute_commands(commands)) {
        match segment {
            Segment::Move(point) | Segment::Line(point) => bbox.include(point),
            Segment::Cubic([p0, p1, p2, p3]) => {
                for point in flatten_cubic(p0, p1, p2, p3, steps) {
                    bbox.include(point);
                }
            }
            Segment::Close(_) => {}
        }
    }
    bbox
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_point_eq(actual: Point, expected: (f64, f64)) {
        assert!(
            (actual.x - expected.0).abs() < EPSILON && (actual.y - expected.1).abs() < EPSILON,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_to_relative() {
        // given
        let commands = parse("M 10 20 L 15 20 h 5 V 30 C 20 30 25 35 30 30 Z m 1 1 l 1 0").unwrap();

        // when
        let relative = to_relative(&commands);

        // then
        assert_eq!(relative, parse("m 10,20 l 5,0 h 5 v 10 c 0,0 5,5 10,0 z m 1,1 l 1,0").unwrap());
    }

    #[rstest]
    #[case("M 0 0 L 10 0 L 10 10 Z")]
    #[case("m 0.1 0.2 l 0.3 0.4 C 1 1 2 2 3 3 s 1 1 2 2 q 1 0 2 2 t 1 1 z")]
    #[case("M 3.3 -1.1 H 7.7 V 2.2 h -0.1 v 0.1 M 5 5 l 1e-3 2e3")]
    fn test_to_relative_is_idempotent(#[case] text: &str) {
        // given
        let once = to_relative(&parse(text).unwrap());

        // when
        let twice = to_relative(&once);

        // then
        assert_eq!(twice, once);
    }

    #[test]
    fn test_reflattening_is_reproducible() {
        // given
        let path = Path::parse("M 1 1 C 2 0 4 3 5 1 S 8 0 9 2").unwrap();
        let relative = Path::from_relative(to_relative(path.commands()));

        // expect
        assert_eq!(path.sub_paths(0.05, 100), relative.sub_paths(0.05, 100));
    }

    #[test]
    fn test_bounding_box_lines() {
        // when
        let path = Path::parse("M -2 -3 h 12 v 8 h -12 z").unwrap();

        // then
        assert_point_eq(path.top_left(), (-2.0, -3.0));
        assert_point_eq(path.bottom_right(), (10.0, 5.0));
        assert_eq!(path.width(), 12.0);
        assert_eq!(path.height(), 8.0);
    }

    #[test]
    fn test_bounding_box_follows_curve_not_control_points() {
        // when
        let path = Path::parse("M 0 0 C 0 -4 4 -4 4 0").unwrap();

        // then
        // the curve peaks at 3/4 of the control point height
        assert!((path.top_left().y - -3.0).abs() < 1e-3, "{:?}", path.top_left());
        assert!((path.width() - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_bounding_box_invariant_under_translation() {
        // given
        let path = Path::parse("M 1 2 C 3 -4 6 8 9 1 l 2 2 z").unwrap();

        // when
        let translated = path.translated(Point::new(12.5, -3.25));

        // then
        assert!((translated.width() - path.width()).abs() < EPSILON);
        assert!((translated.height() - path.height()).abs() < EPSILON);
        assert_point_eq(translated.top_left(), (path.top_left().x + 12.5, path.top_left().y - 3.25));
        assert_point_eq(
            translated.bottom_right(),
            (path.bottom_right().x + 12.5, path.bottom_right().y - 3.25),
        );
    }

    #[rstest]
    #[case("M 1 2 l 3 4 h 5 v -6 c 1 2 3 4 5 6 z")]
    #[case("m -1 0 q 1 1 2 0 t 2 0 s 1 1 2 0 Z")]
    fn test_mirror_involution(#[case] text: &str) {
        // given
        let path = Path::parse(text).unwrap();

        // when
        let twice = path.mirrored().mirrored();

        // then
        assert_eq!(twice, path);
    }

    #[test]
    fn test_mirror_keeps_command_letters() {
        // given
        let path = Path::parse("M 1 1 h 2 v 3 z").unwrap();

        // when
        let mirrored = path.mirrored();

        // then
        assert_eq!(mirrored.to_string(), "m -1,1 h -2 v 3 z");
        assert_point_eq(mirrored.top_left(), (-3.0, 1.0));
    }

    #[test]
    fn test_transform_centers_shape() {
        // given
        let path = Path::parse("M 10 10 h 4 v 2 h -4 z").unwrap();

        // when
        let result = path.transform(&PathTransform::default());

        // then
        assert_point_eq(result.path.top_left(), (-2.0, -1.0));
        assert_point_eq(result.path.bottom_right(), (2.0, 1.0));
    }

    #[test]
    fn test_transform_rotates_clockwise_and_scales() {
        // given
        let path = Path::parse("M 0 0 h 4 v 2 h -4 z").unwrap();
        let params = PathTransform {
            scale: 2.0,
            rotate_angle: 90.0,
            ..PathTransform::default()
        };

        // when
        let result = path.transform(&params);

        // then
        assert!((result.path.width() - 4.0).abs() < EPSILON);
        assert!((result.path.height() - 8.0).abs() < EPSILON);
        assert!(
            result
                .path
                .commands()
                .iter()
                .all(|command| !matches!(command.kind, CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo))
        );
    }

    #[test]
    fn test_transform_rotation_about_pivot_inverts_pivot_y() {
        // given
        let path = Path::parse("M 1 0 l 0 0").unwrap();
        let params = PathTransform {
            rotate_angle: 90.0,
            rotate_pivot: Point::new(0.0, 1.0),
            center: false,
            ..PathTransform::default()
        };

        // when
        let result = path.transform(&params);

        // then
        // the board pivot (0, 1) is (0, -1) in path coordinates
        assert_point_eq(result.path.commands()[0].points[0], (-1.0, 0.0));
    }

    #[test]
    fn test_transform_mirror_twin() {
        // given
        let path = Path::parse("M 0 0 h 3 v 1 z").unwrap();
        let params = PathTransform {
            mirror: true,
            center: false,
            ..PathTransform::default()
        };

        // when
        let result = path.transform(&params);

        // then
        assert_eq!(result.path, path.mirrored());
        assert_eq!(result.mirrored, path);
        assert_eq!(result.path.mirrored(), result.mirrored);
    }

    #[test]
    fn test_sub_paths() {
        // given
        let path = Path::parse("M 0 0 L 1 0 L 1 1 Z M 5 5 h 1 l 0 1").unwrap();

        // when
        let sub_paths = path.sub_paths(0.05, 100);

        // then
        assert_eq!(sub_paths, vec![
            SubPath {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(1.0, 0.0),
                    Point::new(1.0, 1.0),
                    Point::new(0.0, 0.0)
                ],
                closed: true,
            },
            SubPath {
                points: vec![Point::new(5.0, 5.0), Point::new(6.0, 5.0), Point::new(6.0, 6.0)],
                closed: false,
            },
        ]);
    }

    #[test]
    fn test_sub_paths_drop_zero_length_segments() {
        // when
        let sub_paths = Path::parse("M 0 0 h 1 h 0 v 1 h -1 v -1 z M 4 4 l 0 0").unwrap().sub_paths(0.05, 100);

        // then
        assert_eq!(sub_paths.len(), 1);
        assert_eq!(sub_paths[0].points, vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0)
        ]);
    }

    #[test]
    fn test_sub_paths_restart_after_close_without_move() {
        // given
        let path = Path::parse("M 0 0 h 1 v 1 z l -1 -1").unwrap();

        // when
        let sub_paths = path.sub_paths(0.05, 100);

        // then
        assert_eq!(sub_paths.len(), 2);
        assert_eq!(sub_paths[1].points, vec![Point::new(0.0, 0.0), Point::new(-1.0, -1.0)]);
    }

    #[test]
    fn test_curve_density_scales_with_size() {
        // given
        let large = Path::parse("M 0 0 C 3 -3 7 3 10 0").unwrap();
        let small = Path::parse("M 0 0 C 0.3 -0.3 0.7 0.3 1 0").unwrap();

        // when
        let large_points = large.sub_paths(0.05, 100)[0]
            .points
            .len();
        let small_points = small.sub_paths(0.05, 100)[0]
            .points
            .len();

        // then
        assert!(large_points >= 200, "large: {}", large_points);
        assert!((20..40).contains(&small_points), "small: {}", small_points);
        assert!(large_points > small_points * 8);
    }

    #[test]
    fn test_join() {
        // given
        let a = Path::parse("M 1 1 h 1 v 1 z").unwrap();
        let b = Path::parse("M 5 5 h 2").unwrap();

        // when
        let joined = Path::join(&[a, b]).unwrap();

        // then
        assert_eq!(joined.to_string(), "m 1,1 h 1 v 1 z m 4,4 h 2");
        assert_point_eq(joined.end_point(), (7.0, 5.0));
        assert_point_eq(joined.bottom_right(), (7.0, 5.0));
    }

    #[test]
    fn test_to_text_rounds() {
        // given
        let path = Path::parse("M 0.1234567 0 l 0.30000000000000004 1").unwrap();

        // expect
        assert_eq!(path.to_text(Some(3)), "m 0.123,0 l 0.3,1");
    }

    #[test]
    fn test_transformed_text_reparses_to_same_geometry() {
        // given
        let path = Path::parse("M 1 1 C 2 0 4 3 5 1 l 1 1 z")
            .unwrap()
            .transform(&PathTransform {
                rotate_angle: 33.0,
                scale: 1.7,
                ..PathTransform::default()
            })
            .path;

        // when
        let reparsed = Path::parse(path.original()).unwrap();

        // then
        assert_eq!(reparsed, path);
    }
}
