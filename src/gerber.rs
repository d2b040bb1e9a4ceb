mod aperture;
mod coordinate;
mod writer;

use gerber_types::{Command, DCode, ExtendedCode, FunctionCode, GerberCode, GerberError, Operation};

pub use aperture::*;
pub use coordinate::{coordinate_number, to_fixed};
pub use writer::GerberWriter;

use crate::spacial::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct GerberFile {
    pub name: String,
    pub commands: Vec<Command>,
}

pub fn commands_to_source(commands: &Vec<Command>) -> Result<String, GerberError> {
    let mut buffer: Vec<u8> = Vec::new();
    commands.serialize(&mut buffer)?;
    String::from_utf8(buffer).map_err(|error| GerberError::ConversionError(error.to_string()))
}

impl GerberFile {
    /// Read emitted text back into commands, any command the parser rejects is an error.
    #[cfg(feature = "parser")]
    pub fn parse(name: &str, text: &str) -> Result<Self, crate::Error> {
        let failure = |message: String| crate::Error::CrossCheck {
            file: name.to_string(),
            message,
        };

        let reader = std::io::BufReader::new(text.as_bytes());
        let doc = gerber_parser::parse(reader).map_err(|(_partial_doc, error)| failure(error.to_string()))?;

        if let Some(error) = doc.errors().first() {
            return Err(failure(error.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            commands: doc.into_commands(),
        })
    }

    pub fn source(&self) -> Result<String, GerberError> {
        commands_to_source(&self.commands)
    }

    /// Decimal digit count declared by the format specification.
    pub fn decimal_digits(&self) -> Option<u8> {
        self.commands
            .iter()
            .find_map(|command| match command {
                Command::ExtendedCode(ExtendedCode::CoordinateFormat(format)) => Some(format.decimal),
                _ => None,
            })
    }

    /// Flash positions in output coordinates.
    pub fn flashes(&self) -> Vec<Point> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::FunctionCode(FunctionCode::DCode(DCode::Operation(Operation::Flash(Some(coordinates))))) => {
                    Some(Point::new(f64::from(coordinates.x?), f64::from(coordinates.y?)))
                }
                _ => None,
            })
            .collect()
    }

    /// Check the emitted text with an independent Gerber parser, it must read back as the same
    /// commands in millimeters.
    #[cfg(feature = "parser")]
    pub fn cross_check(&self) -> Result<(), crate::Error> {
        use gerber_types::Unit;

        let failure = |message: String| crate::Error::CrossCheck {
            file: self.name.clone(),
            message,
        };

        let text = self.source()?;
        let reader = std::io::BufReader::new(text.as_bytes());
        let doc = gerber_parser::parse(reader).map_err(|(_partial_doc, error)| failure(error.to_string()))?;

        if doc.units != Some(Unit::Millimeters) {
            return Err(failure(format!("unexpected units: {:?}", doc.units)));
        }
        let decimal = doc
            .format_specification
            .as_ref()
            .map(|format| format.decimal);
        if decimal != self.decimal_digits() {
            return Err(failure(format!("unexpected decimal digits: {:?}", decimal)));
        }
        let errors = doc.errors().len();
        if errors > 0 {
            return Err(failure(format!("{} commands failed to parse", errors)));
        }
        if doc.into_commands() != self.commands {
            return Err(failure("commands differ after reading back".to_string()));
        }

        Ok(())
    }
}
