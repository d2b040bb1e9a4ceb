use thiserror::Error;

/// Unparseable path or transform text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrammarError {
    #[error("Empty path")]
    Empty,
    #[error("Unsupported path command '{command}' at offset {offset}")]
    UnsupportedCommand { command: char, offset: usize },
    #[error("Unknown path command '{command}' at offset {offset}")]
    UnknownCommand { command: char, offset: usize },
    #[error("Malformed number '{token}' at offset {offset}")]
    MalformedNumber { token: String, offset: usize },
    #[error("Command '{command}' takes operands in groups of {group}, got {count}")]
    UnbalancedArguments { command: char, group: usize, count: usize },
    #[error("Path must start with a move command, found '{found}'")]
    MissingInitialMove { found: String },
    #[error("Unknown transform '{name}'")]
    UnknownTransform { name: String },
    #[error("Transform '{name}' appears more than once")]
    DuplicateTransform { name: String },
    #[error("'matrix' cannot be combined with other transforms")]
    MatrixNotAlone,
    #[error("Transform '{name}' does not accept {count} arguments")]
    TransformArity { name: String, count: usize },
    #[error("Malformed transform near '{text}'")]
    MalformedTransform { text: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("No geometry builder for shape type '{shape_type}'")]
pub struct UnsupportedShapeError {
    pub shape_type: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Unknown font '{name}'")]
    UnknownFont { name: String },
    #[error("Font '{font}' has no glyph for '{glyph}'")]
    MissingGlyph { font: String, glyph: char },
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },
    #[error("Unknown definition '{name}'")]
    UnknownDefinition { name: String },
    #[error("Cyclic definition reference: {}", chain.join(" -> "))]
    CyclicDefinition { chain: Vec<String> },
    #[error("Invalid digit count for '{field}': {value}, expected 1..={max}")]
    InvalidDigits { field: String, value: u8, max: u8 },
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: f64 },
    #[error("Invalid value for '{field}': '{value}'")]
    InvalidText { field: String, value: String },
    #[error("Sheet '{sheet}' cannot be placed {placement}")]
    SheetPlacement { sheet: String, placement: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Grammar error in '{text}': {source}")]
    Path {
        text: String,
        #[source]
        source: GrammarError,
    },
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    UnsupportedShape(#[from] UnsupportedShapeError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("Shape '{id}': {source}")]
    Shape {
        id: String,
        #[source]
        source: Box<Error>,
    },
    #[error(transparent)]
    Gerber(#[from] gerber_types::GerberError),
    #[error("Gerber file '{file}' failed the cross-check: {message}")]
    CrossCheck { file: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attach the identifier of the shape being built, so the source record can be located.
    pub fn in_shape(self, id: &str) -> Self {
        Error::Shape {
            id: id.to_string(),
            source: Box::new(self),
        }
    }
}
