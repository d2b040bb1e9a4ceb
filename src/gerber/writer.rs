use gerber_types::{
    Command, CommentContent, CoordinateFormat, Coordinates, DCode, ExtendedCode, FunctionCode, GCode,
    InterpolationMode, MCode, Operation, Polarity, Unit,
};
use log::{debug, info, trace};

use super::aperture::{ApertureTable, FILL_APERTURE, FLASH_APERTURE};
use super::coordinate::coordinate_number;
use super::GerberFile;
use crate::config::Config;
use crate::error::ConfigurationError;
use crate::scene::StyledPath;
use crate::shape::Style;
use crate::spacial::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Preamble,
    Body,
    Postamble,
}

/// Builds one Gerber file.
///
/// Apertures are declared in the preamble but only known once the body is complete, so body and
/// flash commands are collected first and the preamble is assembled by [`GerberWriter::finish`].
#[derive(Debug)]
pub struct GerberWriter<'a> {
    name: String,
    config: &'a Config,
    format: CoordinateFormat,
    state: WriterState,
    apertures: ApertureTable,
    body: Vec<Command>,
    flashes: Vec<Command>,
    polarity: Polarity,
    aperture: Option<i32>,
}

impl<'a> GerberWriter<'a> {
    pub fn new(name: &str, config: &'a Config) -> Result<Self, ConfigurationError> {
        let format = config.gerber.coordinate_format()?;
        Ok(Self {
            name: name.to_string(),
            config,
            format,
            state: WriterState::Preamble,
            apertures: ApertureTable::new(
                config.gerber.fill_aperture_diameter,
                config.gerber.flash_diameter,
                config.significant_digits,
            ),
            body: Vec::new(),
            flashes: Vec::new(),
            // the preamble selects dark polarity
            polarity: Polarity::Dark,
            aperture: None,
        })
    }

    fn coordinates(&self, point: Point) -> Result<Coordinates, ConfigurationError> {
        // output y points up
        Ok(Coordinates::new(
            coordinate_number(point.x, &self.config.gerber)?,
            coordinate_number(-point.y, &self.config.gerber)?,
            self.format,
        ))
    }

    fn set_polarity(&mut self, polarity: Polarity) {
        if polarity != self.polarity {
            trace!("polarity change. {:?} -> {:?}", self.polarity, polarity);
            self.body
                .push(Command::ExtendedCode(ExtendedCode::LoadPolarity(polarity)));
            self.polarity = polarity;
        }
    }

    fn select_aperture(&mut self, code: i32) {
        if self.aperture != Some(code) {
            self.body
                .push(Command::FunctionCode(FunctionCode::DCode(DCode::SelectAperture(code))));
            self.aperture = Some(code);
        }
    }

    /// Plot a path, filled as a region or stroked with the aperture for its width.
    ///
    /// Region contours must end where they start, an open sub-path that is filled gets a final
    /// draw back to its first point.
    pub fn add(&mut self, styled: &StyledPath) -> Result<(), ConfigurationError> {
        self.state = WriterState::Body;

        let sub_paths = styled
            .path
            .sub_paths(self.config.min_segment_length, self.config.curve_sample_steps);
        if sub_paths.is_empty() {
            trace!("nothing to plot. path: '{}'", styled.path);
            return Ok(());
        }

        self.set_polarity(styled.polarity);
        let fill = styled.style == Style::Fill;
        match styled.style {
            Style::Fill => {
                self.select_aperture(FILL_APERTURE);
                self.body
                    .push(Command::FunctionCode(FunctionCode::GCode(GCode::RegionMode(true))));
            }
            Style::Stroke {
                width,
            } => {
                let code = self.apertures.code_for(width);
                self.select_aperture(code);
            }
        }

        for sub_path in sub_paths {
            let mut points = sub_path.points;
            if fill && !sub_path.closed {
                if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
                    if first != last {
                        trace!("closing open contour. path: '{}'", styled.path);
                        points.push(first);
                    }
                }
            }

            for (index, point) in points.iter().enumerate() {
                let coordinates = Some(self.coordinates(*point)?);
                let operation = match index {
                    0 => Operation::Move(coordinates),
                    _ => Operation::Interpolate(coordinates, None),
                };
                self.body
                    .push(Command::FunctionCode(FunctionCode::DCode(DCode::Operation(operation))));
            }
        }

        if fill {
            self.body
                .push(Command::FunctionCode(FunctionCode::GCode(GCode::RegionMode(false))));
        }
        Ok(())
    }

    pub fn add_all<'p>(&mut self, paths: impl IntoIterator<Item = &'p StyledPath>) -> Result<(), ConfigurationError> {
        for styled in paths {
            self.add(styled)?;
        }
        Ok(())
    }

    /// Stamp a flash at a pad center, flashes are written after all plotted paths.
    pub fn flash(&mut self, center: Point) -> Result<(), ConfigurationError> {
        let coordinates = Some(self.coordinates(center)?);
        self.flashes
            .push(Command::FunctionCode(FunctionCode::DCode(DCode::Operation(Operation::Flash(
                coordinates,
            )))));
        Ok(())
    }

    #[profiling::function]
    pub fn finish(mut self) -> GerberFile {
        let mut commands = vec![
            Command::FunctionCode(FunctionCode::GCode(GCode::Comment(CommentContent::String(self.name.clone())))),
            Command::ExtendedCode(ExtendedCode::CoordinateFormat(self.format)),
            Command::ExtendedCode(ExtendedCode::Unit(Unit::Millimeters)),
        ];
        commands.extend(self.apertures.definitions());
        commands.push(Command::FunctionCode(FunctionCode::GCode(GCode::InterpolationMode(
            InterpolationMode::Linear,
        ))));
        commands.push(Command::ExtendedCode(ExtendedCode::LoadPolarity(Polarity::Dark)));
        debug!("preamble complete. file: {}, state: {:?}", self.name, self.state);

        if !self.flashes.is_empty() {
            self.set_polarity(Polarity::Dark);
            self.select_aperture(FLASH_APERTURE);
        }
        let flashes = std::mem::take(&mut self.flashes);
        let flash_count = flashes.len();
        self.body.extend(flashes);

        self.state = WriterState::Postamble;
        let body_count = self.body.len();
        commands.extend(self.body);
        commands.push(Command::FunctionCode(FunctionCode::MCode(MCode::EndOfFile)));

        info!(
            "generated gerber. file: {}, commands: {}, flashes: {}, state: {:?}",
            self.name, body_count, flash_count, self.state
        );

        GerberFile {
            name: self.name,
            commands,
        }
    }
}
