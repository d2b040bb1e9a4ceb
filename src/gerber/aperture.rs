use gerber_types::{Aperture, ApertureDefinition, Circle, Command, ExtendedCode};
use log::debug;

use crate::spacial::round_to;

/// Circle used while plotting filled regions.
pub const FILL_APERTURE: i32 = 10;
/// Circle used for pad flashes.
pub const FLASH_APERTURE: i32 = 11;
/// Stroke apertures are numbered from here in first-seen order.
pub const FIRST_STROKE_APERTURE: i32 = 20;

/// Stroke width to aperture number mapping for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureTable {
    fill_diameter: f64,
    flash_diameter: f64,
    strokes: Vec<(f64, i32)>,
    significant_digits: u32,
}

impl ApertureTable {
    pub fn new(fill_diameter: f64, flash_diameter: f64, significant_digits: u32) -> Self {
        Self {
            fill_diameter: round_to(fill_diameter, significant_digits),
            flash_diameter: round_to(flash_diameter, significant_digits),
            strokes: Vec::new(),
            significant_digits,
        }
    }

    /// Aperture for a stroke width, allocating the next number the first time a width is seen.
    pub fn code_for(&mut self, width: f64) -> i32 {
        let diameter = round_to(width, self.significant_digits);
        if let Some((_, code)) = self
            .strokes
            .iter()
            .find(|(existing, _)| *existing == diameter)
        {
            return *code;
        }

        let code = FIRST_STROKE_APERTURE + self.strokes.len() as i32;
        debug!("assigned aperture. code: D{}, width: {}", code, diameter);
        self.strokes.push((diameter, code));
        code
    }

    pub fn definitions(&self) -> Vec<Command> {
        let fixed = [(FILL_APERTURE, self.fill_diameter), (FLASH_APERTURE, self.flash_diameter)];
        fixed
            .into_iter()
            .chain(
                self.strokes
                    .iter()
                    .map(|(diameter, code)| (*code, *diameter)),
            )
            .map(|(code, diameter)| {
                Command::ExtendedCode(ExtendedCode::ApertureDefinition(ApertureDefinition::new(
                    code,
                    Aperture::Circle(Circle::new(diameter)),
                )))
            })
            .collect()
    }
}
