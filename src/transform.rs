use std::fmt::{Display, Formatter};
use std::ops::Add;
use std::str::FromStr;

use log::{trace, warn};
use nalgebra::{Matrix3, Vector3};

use crate::error::GrammarError;
use crate::spacial::Point;

/// Values closer to identity than this are not stored when decomposing a matrix.
const DECOMPOSITION_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    Translate(Point),
    Scale(Point),
    /// degrees, optionally about a center
    Rotate { degrees: f64, center: Option<Point> },
    SkewX(f64),
    SkewY(f64),
}

impl TransformOp {
    pub fn name(&self) -> &'static str {
        match self {
            TransformOp::Translate(_) => "translate",
            TransformOp::Scale(_) => "scale",
            TransformOp::Rotate {
                ..
            } => "rotate",
            TransformOp::SkewX(_) => "skewX",
            TransformOp::SkewY(_) => "skewY",
        }
    }

    pub fn to_matrix(&self) -> Matrix3<f64> {
        match *self {
            TransformOp::Translate(offset) => Matrix3::new_translation(&offset),
            TransformOp::Scale(scale) => Matrix3::new_nonuniform_scaling(&scale),
            TransformOp::Rotate {
                degrees,
                center,
            } => {
                let rotation = Matrix3::new_rotation(degrees.to_radians());
                match center {
                    None => rotation,
                    Some(center) => {
                        Matrix3::new_translation(&center) * rotation * Matrix3::new_translation(&-center)
                    }
                }
            }
            TransformOp::SkewX(degrees) => {
                let mut matrix = Matrix3::identity();
                matrix[(0, 1)] = degrees.to_radians().tan();
                matrix
            }
            TransformOp::SkewY(degrees) => {
                let mut matrix = Matrix3::identity();
                matrix[(1, 0)] = degrees.to_radians().tan();
                matrix
            }
        }
    }
}

impl Display for TransformOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformOp::Translate(offset) => write!(f, "translate({},{})", offset.x, offset.y),
            TransformOp::Scale(scale) => write!(f, "scale({},{})", scale.x, scale.y),
            TransformOp::Rotate {
                degrees,
                center: None,
            } => write!(f, "rotate({})", degrees),
            TransformOp::Rotate {
                degrees,
                center: Some(center),
            } => write!(f, "rotate({},{},{})", degrees, center.x, center.y),
            TransformOp::SkewX(degrees) => write!(f, "skewX({})", degrees),
            TransformOp::SkewY(degrees) => write!(f, "skewY({})", degrees),
        }
    }
}

/// An ordered list of primitive transforms, applied like an SVG transform list.
///
/// Composition with `+` concatenates the lists, child first then parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transform {
    ops: Vec<TransformOp>,
}

impl Transform {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_ops(ops: Vec<TransformOp>) -> Self {
        Self {
            ops,
        }
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self::from_ops(vec![TransformOp::Translate(Point::new(x, y))])
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Parse a transform string, each kind may appear at most once and `matrix` must stand alone.
    pub fn parse(text: &str) -> Result<Self, GrammarError> {
        parse_ops(text, true).map(Self::from_ops)
    }

    /// Parse the canonical form of a composed transform, where kinds may repeat.
    pub fn parse_composed(text: &str) -> Result<Self, GrammarError> {
        parse_ops(text, false).map(Self::from_ops)
    }

    /// QR-style decomposition of `matrix(a,b,c,d,e,f)` into translate, rotate, scale and skewX.
    ///
    /// `skewY` is never produced.  Components that are the identity are omitted.
    pub fn from_matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        let mut ops = Vec::with_capacity(4);
        if e.abs() > DECOMPOSITION_EPSILON || f.abs() > DECOMPOSITION_EPSILON {
            ops.push(TransformOp::Translate(Point::new(e, f)));
        }

        let r_squared = a * a + b * b;
        if r_squared == 0.0 {
            warn!("degenerate matrix({},{},{},{},{},{}), only scale is kept", a, b, c, d, e, f);
            ops.push(TransformOp::Scale(Point::new(0.0, 0.0)));
            return Self::from_ops(ops);
        }
        let r = r_squared.sqrt();

        let rotation = b.atan2(a).to_degrees();
        if rotation.abs() > DECOMPOSITION_EPSILON {
            ops.push(TransformOp::Rotate {
                degrees: rotation,
                center: None,
            });
        }

        let scale = Point::new(r, (a * d - b * c) / r);
        if (scale.x - 1.0).abs() > DECOMPOSITION_EPSILON || (scale.y - 1.0).abs() > DECOMPOSITION_EPSILON {
            ops.push(TransformOp::Scale(scale));
        }

        let skew_x = (a * c + b * d).atan2(r_squared).to_degrees();
        if skew_x.abs() > DECOMPOSITION_EPSILON {
            ops.push(TransformOp::SkewX(skew_x));
        }

        trace!("decomposed matrix into {:?}", ops);
        Self::from_ops(ops)
    }

    pub fn to_matrix(&self) -> Matrix3<f64> {
        self.ops
            .iter()
            .fold(Matrix3::identity(), |matrix, op| matrix * op.to_matrix())
    }

    /// The `(a, b, c, d, e, f)` coefficients of the composed matrix.
    pub fn coefficients(&self) -> [f64; 6] {
        let m = self.to_matrix();
        [m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)], m[(0, 2)], m[(1, 2)]]
    }

    pub fn apply(&self, point: Point) -> Point {
        let result = self.to_matrix() * Vector3::new(point.x, point.y, 1.0);
        Point::new(result.x, result.y)
    }

    /// Sum of the translation components, the only part honoured when placing shapes.
    pub fn translation(&self) -> Point {
        self.ops
            .iter()
            .filter_map(|op| match op {
                TransformOp::Translate(offset) => Some(*offset),
                _ => None,
            })
            .sum()
    }

    pub fn scale(&self) -> Point {
        self.ops
            .iter()
            .fold(Point::new(1.0, 1.0), |scale, op| match op {
                TransformOp::Scale(factor) => scale.component_mul(factor),
                _ => scale,
            })
    }

    pub fn rotation(&self) -> f64 {
        self.ops
            .iter()
            .map(|op| match op {
                TransformOp::Rotate {
                    degrees, ..
                } => *degrees,
                _ => 0.0,
            })
            .sum()
    }

    pub fn skew_x(&self) -> f64 {
        self.ops
            .iter()
            .map(|op| match op {
                TransformOp::SkewX(degrees) => *degrees,
                _ => 0.0,
            })
            .sum()
    }

    pub fn is_translation_only(&self) -> bool {
        self.ops
            .iter()
            .all(|op| matches!(op, TransformOp::Translate(_)))
    }
}

impl FromStr for Transform {
    type Err = GrammarError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl Display for Transform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = self
            .ops
            .iter()
            .map(|op| op.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", text)
    }
}

impl Add for Transform {
    type Output = Transform;

    fn add(self, rhs: Self) -> Self::Output {
        let mut ops = self.ops;
        ops.extend(rhs.ops);
        Transform::from_ops(ops)
    }
}

impl Add for &Transform {
    type Output = Transform;

    fn add(self, rhs: Self) -> Self::Output {
        self.clone() + rhs.clone()
    }
}

fn parse_arguments(name: &str, text: &str) -> Result<Vec<f64>, GrammarError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| GrammarError::MalformedNumber {
                    token: format!("{}({})", name, token),
                    offset: 0,
                })
        })
        .collect()
}

fn build_op(name: &str, arguments: &[f64]) -> Result<Vec<TransformOp>, GrammarError> {
    let arity = || GrammarError::TransformArity {
        name: name.to_string(),
        count: arguments.len(),
    };

    let op = match (name, arguments) {
        ("translate", [x]) => TransformOp::Translate(Point::new(*x, 0.0)),
        ("translate", [x, y]) => TransformOp::Translate(Point::new(*x, *y)),
        ("scale", [s]) => TransformOp::Scale(Point::new(*s, *s)),
        ("scale", [x, y]) => TransformOp::Scale(Point::new(*x, *y)),
        ("rotate", [degrees]) => TransformOp::Rotate {
            degrees: *degrees,
            center: None,
        },
        ("rotate", [degrees, x, y]) => TransformOp::Rotate {
            degrees: *degrees,
            center: Some(Point::new(*x, *y)),
        },
        ("skewX", [degrees]) => TransformOp::SkewX(*degrees),
        ("skewY", [degrees]) => TransformOp::SkewY(*degrees),
        ("matrix", [a, b, c, d, e, f]) => {
            return Ok(Transform::from_matrix(*a, *b, *c, *d, *e, *f).ops);
        }
        ("translate" | "scale" | "rotate" | "skewX" | "skewY" | "matrix", _) => return Err(arity()),
        _ => {
            return Err(GrammarError::UnknownTransform {
                name: name.to_string(),
            })
        }
    };

    Ok(vec![op])
}

fn parse_ops(text: &str, strict: bool) -> Result<Vec<TransformOp>, GrammarError> {
    let mut ops = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    let mut rest = text.trim_start_matches(|c: char| c == ',' || c.is_whitespace());

    while !rest.is_empty() {
        let malformed = || GrammarError::MalformedTransform {
            text: rest.to_string(),
        };
        let open = rest.find('(').ok_or_else(malformed)?;
        let close = rest.find(')').ok_or_else(malformed)?;
        if close < open {
            return Err(malformed());
        }

        let name = rest[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(malformed());
        }
        let arguments = parse_arguments(name, &rest[open + 1..close])?;

        if strict {
            if seen.iter().any(|kind| kind == name) {
                return Err(GrammarError::DuplicateTransform {
                    name: name.to_string(),
                });
            }
            if (name == "matrix" && !seen.is_empty()) || seen.iter().any(|kind| kind == "matrix") {
                return Err(GrammarError::MatrixNotAlone);
            }
        }
        seen.push(name.to_string());

        ops.extend(build_op(name, &arguments)?);
        rest = rest[close + 1..].trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    }

    Ok(ops)
}
