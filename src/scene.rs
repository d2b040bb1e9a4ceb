use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use gerber_types::Polarity;
use log::{trace, warn};

use crate::config::Clearances;
use crate::error::ConfigurationError;
use crate::path::Path;
use crate::shape::{Shape, Style};
use crate::spacial::Point;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SheetKind {
    Conductor,
    Soldermask,
    Solderpaste,
    Silkscreen,
    Pours,
    Routing,
    Pads,
    Drills,
    Outline,
    Documentation,
}

impl SheetKind {
    pub const ALL: [SheetKind; 10] = [
        SheetKind::Conductor,
        SheetKind::Soldermask,
        SheetKind::Solderpaste,
        SheetKind::Silkscreen,
        SheetKind::Pours,
        SheetKind::Routing,
        SheetKind::Pads,
        SheetKind::Drills,
        SheetKind::Outline,
        SheetKind::Documentation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SheetKind::Conductor => "conductor",
            SheetKind::Soldermask => "soldermask",
            SheetKind::Solderpaste => "solderpaste",
            SheetKind::Silkscreen => "silkscreen",
            SheetKind::Pours => "pours",
            SheetKind::Routing => "routing",
            SheetKind::Pads => "pads",
            SheetKind::Drills => "drills",
            SheetKind::Outline => "outline",
            SheetKind::Documentation => "documentation",
        }
    }

    /// Sheets that belong to the board rather than to one PCB layer.
    pub fn is_board_level(&self) -> bool {
        matches!(self, SheetKind::Drills | SheetKind::Outline | SheetKind::Documentation)
    }

    /// Sheets that get a Gerber file of their own for each layer.
    ///
    /// Pours, routing and pads are part of the conductor file.
    pub fn is_layer_output(&self) -> bool {
        matches!(
            self,
            SheetKind::Conductor | SheetKind::Soldermask | SheetKind::Solderpaste | SheetKind::Silkscreen
        )
    }
}

impl Display for SheetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SheetKind {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SheetKind::ALL
            .into_iter()
            .find(|kind| kind.name() == value)
            .ok_or_else(|| ConfigurationError::SheetPlacement {
                sheet: value.to_string(),
                placement: "(unknown sheet)".to_string(),
            })
    }
}

/// Body order of shapes within a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Role {
    Component,
    Refdef,
    LayerIndex,
    #[default]
    Shape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group {
        id: String,
        transform: Transform,
        children: Vec<Node>,
    },
    Shape {
        shape: Shape,
        role: Role,
    },
}

impl Node {
    pub fn group(id: &str, transform: Transform, children: Vec<Node>) -> Self {
        Node::Group {
            id: id.to_string(),
            transform,
            children,
        }
    }

    pub fn shape(shape: Shape, role: Role) -> Self {
        Node::Shape {
            shape,
            role,
        }
    }
}

/// A path ready for a codec, in absolute path coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledPath {
    pub path: Path,
    pub style: Style,
    pub polarity: Polarity,
}

/// A shape with the absolute offset accumulated from its ancestors.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedShape<'a> {
    pub shape: &'a Shape,
    pub role: Role,
    pub offset: Point,
}

impl PlacedShape<'_> {
    pub fn styled_path(&self) -> StyledPath {
        StyledPath {
            path: self.shape.path().translated(self.offset),
            style: self.shape.style(),
            polarity: self.shape.polarity(),
        }
    }

    /// Center of the placed geometry, used for pad flashes.
    pub fn center(&self) -> Point {
        self.shape.path().bounding_box().center() + self.offset
    }
}

/// Walk the nodes depth first, summing the translation of every ancestor.
///
/// Only translations are honoured, shapes are already rotated and scaled when built.
pub fn place(nodes: &[Node]) -> Vec<PlacedShape<'_>> {
    fn walk<'a>(nodes: &'a [Node], offset: Point, placed: &mut Vec<PlacedShape<'a>>) {
        for node in nodes {
            match node {
                Node::Group {
                    id,
                    transform,
                    children,
                } => {
                    if !transform.is_translation_only() {
                        warn!(
                            "only the translation of a group transform is applied to placement. group: {}, transform: '{}'",
                            id, transform
                        );
                    }
                    walk(children, offset + transform.translation(), placed);
                }
                Node::Shape {
                    shape,
                    role,
                } => {
                    let offset = offset + shape.spec.location;
                    trace!("placed shape. id: {}, offset: {:?}", shape.id(), offset);
                    placed.push(PlacedShape {
                        shape,
                        role: *role,
                        offset,
                    });
                }
            }
        }
    }

    let mut placed = Vec::new();
    walk(nodes, Point::zeros(), &mut placed);
    placed
}

/// Like [`place`], stably ordered by role.
pub fn place_by_role(nodes: &[Node]) -> Vec<PlacedShape<'_>> {
    let mut placed = place(nodes);
    placed.sort_by_key(|placed| placed.role);
    placed
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    pub name: String,
    sheets: BTreeMap<SheetKind, Vec<Node>>,
}

impl Layer {
    pub fn sheet(&self, kind: SheetKind) -> &[Node] {
        self.sheets
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_pours(&self) -> bool {
        !place(self.sheet(SheetKind::Pours)).is_empty()
    }
}

/// Everything placed on one board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub name: String,
    /// board specific pour clearances, between shape overrides and the global defaults
    pub clearances: Option<Clearances>,
    layers: Vec<Layer>,
    board: BTreeMap<SheetKind, Vec<Node>>,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_clearances(mut self, clearances: Clearances) -> Self {
        self.clearances = Some(clearances);
        self
    }

    /// Add a node to a layer sheet, or with `layer` of `None` to a board level sheet.
    pub fn add(&mut self, layer: Option<&str>, sheet: SheetKind, node: Node) -> Result<(), ConfigurationError> {
        match (layer, sheet.is_board_level()) {
            (None, true) => {
                self.board
                    .entry(sheet)
                    .or_default()
                    .push(node);
            }
            (Some(name), false) => {
                let index = match self
                    .layers
                    .iter()
                    .position(|layer| layer.name == name)
                {
                    Some(index) => index,
                    None => {
                        self.layers.push(Layer {
                            name: name.to_string(),
                            ..Layer::default()
                        });
                        self.layers.len() - 1
                    }
                };
                self.layers[index]
                    .sheets
                    .entry(sheet)
                    .or_default()
                    .push(node);
            }
            (Some(name), true) => {
                return Err(ConfigurationError::SheetPlacement {
                    sheet: sheet.to_string(),
                    placement: format!("on layer '{}'", name),
                });
            }
            (None, false) => {
                return Err(ConfigurationError::SheetPlacement {
                    sheet: sheet.to_string(),
                    placement: "without a layer".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Layers in the order they were first added.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
    }

    pub fn board_sheet(&self, kind: SheetKind) -> &[Node] {
        self.board
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
