use std::collections::BTreeMap;
use std::str::FromStr;

use gerber_types::Polarity;
use log::debug;

use crate::config::Context;
use crate::error::{ConfigurationError, Error, GrammarError, UnsupportedShapeError};
use crate::font::{Justify, TextLayout};
use crate::path::{Path, PathTransform, TransformedPath};
use crate::spacial::Point;

/// Control point distance for a quarter circle drawn as a cubic bezier.
pub const KAPPA: f64 = 0.5522847498;

/// Raw shape fields as delivered by a board description loader.
pub type Parameters = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Rect,
    Circle,
    Drill,
    Text,
    Path,
}

impl FromStr for ShapeType {
    type Err = UnsupportedShapeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rect" => Ok(ShapeType::Rect),
            "circle" => Ok(ShapeType::Circle),
            "drill" => Ok(ShapeType::Drill),
            "text" => Ok(ShapeType::Text),
            "path" => Ok(ShapeType::Path),
            _ => Err(UnsupportedShapeError {
                shape_type: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rect {
        width: f64,
        height: f64,
        /// top-left, top-right, bottom-right, bottom-left
        radii: [f64; 4],
    },
    Circle {
        diameter: f64,
    },
    Drill {
        diameter: f64,
    },
    Text {
        value: String,
        font: String,
        layout: TextLayout,
    },
    Path {
        value: String,
    },
}

impl ShapeKind {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeKind::Rect {
                ..
            } => ShapeType::Rect,
            ShapeKind::Circle {
                ..
            } => ShapeType::Circle,
            ShapeKind::Drill {
                ..
            } => ShapeType::Drill,
            ShapeKind::Text {
                ..
            } => ShapeType::Text,
            ShapeKind::Path {
                ..
            } => ShapeType::Path,
        }
    }

    pub fn from_parameters(parameters: &Parameters) -> Result<Self, Error> {
        let shape_type: ShapeType = required(parameters, "type")?.parse()?;

        let kind = match shape_type {
            ShapeType::Rect => {
                let radius = optional_number(parameters, "radius")?.unwrap_or(0.0);
                let mut radii = [radius; 4];
                for (index, field) in ["radius-top-left", "radius-top-right", "radius-bottom-right", "radius-bottom-left"]
                    .iter()
                    .enumerate()
                {
                    if let Some(value) = optional_number(parameters, field)? {
                        radii[index] = value;
                    }
                }
                ShapeKind::Rect {
                    width: number(parameters, "width")?,
                    height: number(parameters, "height")?,
                    radii,
                }
            }
            ShapeType::Circle => ShapeKind::Circle {
                diameter: number(parameters, "diameter")?,
            },
            ShapeType::Drill => ShapeKind::Drill {
                diameter: number(parameters, "diameter")?,
            },
            ShapeType::Text => {
                let defaults = TextLayout::default();
                let justify = match parameters
                    .get("justify")
                    .map(String::as_str)
                {
                    None | Some("left") => Justify::Left,
                    Some("center") => Justify::Center,
                    Some("right") => Justify::Right,
                    Some(other) => {
                        return Err(ConfigurationError::InvalidText {
                            field: "justify".to_string(),
                            value: other.to_string(),
                        }
                        .into())
                    }
                };
                ShapeKind::Text {
                    value: required(parameters, "value")?.to_string(),
                    font: required(parameters, "font")?.to_string(),
                    layout: TextLayout {
                        font_size: optional_number(parameters, "font-size")?.unwrap_or(defaults.font_size),
                        letter_spacing: optional_number(parameters, "letter-spacing")?
                            .unwrap_or(defaults.letter_spacing),
                        line_height: optional_number(parameters, "line-height")?.unwrap_or(defaults.line_height),
                        justify,
                    },
                }
            }
            ShapeType::Path => ShapeKind::Path {
                value: required(parameters, "value")?.to_string(),
            },
        };

        Ok(kind)
    }

    /// Untransformed geometry, centered on the origin for everything but raw paths and text.
    pub fn path(&self, context: &Context) -> Result<Path, Error> {
        match self {
            ShapeKind::Rect {
                width,
                height,
                radii,
            } => parse_generated(&rect_path(*width, *height, *radii)),
            ShapeKind::Circle {
                diameter,
            }
            | ShapeKind::Drill {
                diameter,
            } => parse_generated(&circle_path(*diameter)),
            ShapeKind::Text {
                value,
                font,
                layout,
            } => context.font(font)?.layout(value, layout),
            ShapeKind::Path {
                value,
            } => Path::parse(value).map_err(|source| Error::Path {
                text: value.clone(),
                source,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Style {
    Fill,
    Stroke { width: f64 },
}

impl Style {
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, Error> {
        match parameters.get("style").map(String::as_str) {
            None | Some("fill") => Ok(Style::Fill),
            Some("stroke") => Ok(Style::Stroke {
                width: number(parameters, "stroke-width")?,
            }),
            Some(other) => Err(UnsupportedShapeError {
                shape_type: format!("style {}", other),
            }
            .into()),
        }
    }

    pub fn stroke_width(&self) -> Option<f64> {
        match self {
            Style::Fill => None,
            Style::Stroke {
                width,
            } => Some(*width),
        }
    }
}

/// A shape before its geometry is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    pub id: String,
    pub kind: ShapeKind,
    pub style: Style,
    /// placement relative to the parent node, path coordinates
    pub location: Point,
    pub rotate: f64,
    /// rotation pivot relative to the shape center, board coordinates
    pub rotate_point: Point,
    pub scale: f64,
    pub mirror: bool,
    /// `None` is treated as dark
    pub polarity: Option<Polarity>,
    /// overrides the board and global pour clearance
    pub pour_buffer: Option<f64>,
}

impl ShapeSpec {
    pub fn new(id: &str, kind: ShapeKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            style: Style::Fill,
            location: Point::zeros(),
            rotate: 0.0,
            rotate_point: Point::zeros(),
            scale: 1.0,
            mirror: false,
            polarity: None,
            pour_buffer: None,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.location = Point::new(x, y);
        self
    }

    pub fn rotated(mut self, degrees: f64, pivot: Point) -> Self {
        self.rotate = degrees;
        self.rotate_point = pivot;
        self
    }

    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn mirrored(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = Some(polarity);
        self
    }

    pub fn with_pour_buffer(mut self, buffer: f64) -> Self {
        self.pour_buffer = Some(buffer);
        self
    }

    /// Read a shape from loader fields, see [`ShapeKind::from_parameters`] for the geometry fields.
    pub fn from_parameters(id: &str, parameters: &Parameters) -> Result<Self, Error> {
        let build = || -> Result<Self, Error> {
            let mut spec = Self::new(id, ShapeKind::from_parameters(parameters)?)
                .with_style(Style::from_parameters(parameters)?)
                .scaled(optional_number(parameters, "scale")?.unwrap_or(1.0))
                .mirrored(matches!(parameters.get("mirror").map(String::as_str), Some("true")));
            if let Some(location) = parameters.get("location") {
                spec.location = point(location)?;
            }
            if let Some(rotate) = optional_number(parameters, "rotate")? {
                let pivot = match parameters.get("rotate-point") {
                    Some(text) => point(text)?,
                    None => Point::zeros(),
                };
                spec = spec.rotated(rotate, pivot);
            }
            spec.polarity = match parameters.get("polarity").map(String::as_str) {
                None => None,
                Some("dark") => Some(Polarity::Dark),
                Some("clear") => Some(Polarity::Clear),
                Some(other) => {
                    return Err(ConfigurationError::InvalidText {
                        field: "polarity".to_string(),
                        value: other.to_string(),
                    }
                    .into())
                }
            };
            spec.pour_buffer = optional_number(parameters, "pour-buffer")?;
            Ok(spec)
        };
        build().map_err(|error| error.in_shape(id))
    }

    /// Build the geometry, errors carry the shape id.
    pub fn build(&self, context: &Context) -> Result<Shape, Error> {
        let path = self
            .kind
            .path(context)
            .map_err(|error| error.in_shape(&self.id))?;

        let params = PathTransform {
            scale: self.scale,
            rotate_angle: self.rotate,
            rotate_pivot: self.rotate_point,
            mirror: self.mirror,
            center: true,
        };
        let geometry = context.transform_path(&path, &params);
        debug!(
            "built shape. id: {}, type: {:?}, bbox: {:?}",
            self.id,
            self.kind.shape_type(),
            geometry.path.bounding_box()
        );

        Ok(Shape {
            spec: self.clone(),
            geometry,
        })
    }
}

/// A shape with its transformed geometry, relative to its placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub spec: ShapeSpec,
    pub geometry: TransformedPath,
}

impl Shape {
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    pub fn path(&self) -> &Path {
        &self.geometry.path
    }

    pub fn style(&self) -> Style {
        self.spec.style
    }

    pub fn polarity(&self) -> Polarity {
        self.spec.polarity.unwrap_or(Polarity::Dark)
    }

    pub fn drill_diameter(&self) -> Option<f64> {
        match self.spec.kind {
            ShapeKind::Drill {
                diameter,
            } => Some(diameter * self.spec.scale),
            _ => None,
        }
    }
}

fn parse_generated(text: &str) -> Result<Path, Error> {
    Path::parse(text).map_err(|source| Error::Path {
        text: text.to_string(),
        source,
    })
}

/// Rectangle centered on the origin, corners rounded with quarter circle cubics.
pub fn rect_path(width: f64, height: f64, radii: [f64; 4]) -> String {
    let (left, top, right, bottom) = (-width / 2.0, -height / 2.0, width / 2.0, height / 2.0);
    let limit = width.min(height) / 2.0;
    let radii = radii.map(|radius| radius.min(limit).max(0.0));
    let [top_left, top_right, bottom_right, bottom_left] = radii;

    if radii.iter().all(|radius| *radius == 0.0) {
        return format!("M {},{} H {} V {} H {} Z", left, top, right, bottom, left);
    }

    let corner = |from: Point, corner: Point, to: Point| {
        let c1 = from + (corner - from) * KAPPA;
        let c2 = to + (corner - to) * KAPPA;
        format!("C {},{} {},{} {},{}", c1.x, c1.y, c2.x, c2.y, to.x, to.y)
    };

    let mut text = format!("M {},{} H {}", left + top_left, top, right - top_right);
    if top_right > 0.0 {
        text += " ";
        text += &corner(
            Point::new(right - top_right, top),
            Point::new(right, top),
            Point::new(right, top + top_right),
        );
    }
    text += &format!(" V {}", bottom - bottom_right);
    if bottom_right > 0.0 {
        text += " ";
        text += &corner(
            Point::new(right, bottom - bottom_right),
            Point::new(right, bottom),
            Point::new(right - bottom_right, bottom),
        );
    }
    text += &format!(" H {}", left + bottom_left);
    if bottom_left > 0.0 {
        text += " ";
        text += &corner(
            Point::new(left + bottom_left, bottom),
            Point::new(left, bottom),
            Point::new(left, bottom - bottom_left),
        );
    }
    text += &format!(" V {}", top + top_left);
    if top_left > 0.0 {
        text += " ";
        text += &corner(
            Point::new(left, top + top_left),
            Point::new(left, top),
            Point::new(left + top_left, top),
        );
    }
    text += " Z";
    text
}

/// Circle centered on the origin made of four cubics.
pub fn circle_path(diameter: f64) -> String {
    let r = diameter / 2.0;
    let k = r * KAPPA;
    format!(
        "M {r},0 C {r},{k} {k},{r} 0,{r} C {nk},{r} {nr},{k} {nr},0 C {nr},{nk} {nk},{nr} 0,{nr} C {k},{nr} {r},{nk} {r},0 Z",
        r = r,
        k = k,
        nr = -r,
        nk = -k
    )
}

fn required<'a>(parameters: &'a Parameters, field: &str) -> Result<&'a str, ConfigurationError> {
    parameters
        .get(field)
        .map(String::as_str)
        .ok_or_else(|| ConfigurationError::MissingField {
            field: field.to_string(),
        })
}

fn parse_number(token: &str) -> Result<f64, GrammarError> {
    token
        .trim()
        .parse::<f64>()
        .map_err(|_| GrammarError::MalformedNumber {
            token: token.to_string(),
            offset: 0,
        })
}

fn number(parameters: &Parameters, field: &str) -> Result<f64, Error> {
    Ok(parse_number(required(parameters, field)?)?)
}

fn optional_number(parameters: &Parameters, field: &str) -> Result<Option<f64>, Error> {
    Ok(parameters
        .get(field)
        .map(|value| parse_number(value))
        .transpose()?)
}

fn point(text: &str) -> Result<Point, Error> {
    let mut parts = text.split(|c: char| c == ',' || c.is_whitespace()).filter(|part| !part.is_empty());
    match (parts.next(), parts.next(), parts.next()) {
        (Some(x), Some(y), None) => Ok(Point::new(parse_number(x)?, parse_number(y)?)),
        _ => Err(GrammarError::MalformedNumber {
            token: text.to_string(),
            offset: 0,
        }
        .into()),
    }
}
