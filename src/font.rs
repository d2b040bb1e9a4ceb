use std::collections::HashMap;

use log::trace;

use crate::error::{ConfigurationError, Error};
use crate::path::{Path, PathTransform};
use crate::spacial::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// outline in font units, `None` for blank glyphs such as space
    pub path: Option<Path>,
    /// horizontal advance in font units
    pub advance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Justify {
    #[default]
    Left,
    Center,
    Right,
}

/// Layout parameters for a block of text, lengths in millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub font_size: f64,
    pub letter_spacing: f64,
    /// multiple of the font size between baselines
    pub line_height: f64,
    pub justify: Justify,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            font_size: 1.0,
            letter_spacing: 0.0,
            line_height: 1.2,
            justify: Justify::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub name: String,
    pub units_per_em: f64,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    pub fn new(name: &str, units_per_em: f64) -> Self {
        Self {
            name: name.to_string(),
            units_per_em,
            glyphs: HashMap::new(),
        }
    }

    /// Add a glyph, an empty `path` text defines a blank glyph.
    pub fn with_glyph(mut self, character: char, path: &str, advance: f64) -> Result<Self, Error> {
        let path = match path.trim().is_empty() {
            true => None,
            false => Some(Path::parse(path).map_err(|source| Error::Path {
                text: path.to_string(),
                source,
            })?),
        };
        self.glyphs.insert(character, Glyph {
            path,
            advance,
        });
        Ok(self)
    }

    pub fn glyph(&self, character: char) -> Result<&Glyph, ConfigurationError> {
        self.glyphs
            .get(&character)
            .ok_or_else(|| ConfigurationError::MissingGlyph {
                font: self.name.clone(),
                glyph: character,
            })
    }

    /// Width of one line of text in millimeters.
    pub fn line_width(&self, line: &str, layout: &TextLayout) -> Result<f64, ConfigurationError> {
        let scale = layout.font_size / self.units_per_em;
        let mut width = 0.0;
        for (index, character) in line.chars().enumerate() {
            if index > 0 {
                width += layout.letter_spacing;
            }
            width += self.glyph(character)?.advance * scale;
        }
        Ok(width)
    }

    /// Lay out `text` as one path, lines are separated by `\n`.
    ///
    /// The origin is the start of the first baseline, adjusted for justification.
    pub fn layout(&self, text: &str, layout: &TextLayout) -> Result<Path, Error> {
        let scale = layout.font_size / self.units_per_em;
        let params = PathTransform {
            scale,
            center: false,
            ..PathTransform::default()
        };

        let mut paths = Vec::new();
        for (line_index, line) in text.lines().enumerate() {
            let width = self.line_width(line, layout)?;
            let mut cursor = Point::new(
                match layout.justify {
                    Justify::Left => 0.0,
                    Justify::Center => -width / 2.0,
                    Justify::Right => -width,
                },
                line_index as f64 * layout.font_size * layout.line_height,
            );

            for character in line.chars() {
                let glyph = self.glyph(character)?;
                if let Some(path) = &glyph.path {
                    paths.push(path.transform(&params).path.translated(cursor));
                }
                cursor.x += glyph.advance * scale + layout.letter_spacing;
            }
            trace!("laid out line {}. width: {}, text: '{}'", line_index, width, line);
        }

        Path::join(&paths).ok_or_else(|| {
            ConfigurationError::InvalidText {
                field: "text".to_string(),
                value: text.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn font() -> Font {
        Font::new("block", 10.0)
            .with_glyph('I', "m 2,-10 h 2 v 10 h -2 z", 6.0)
            .unwrap()
            .with_glyph('-', "m 1,-5 h 4 v 1 h -4 z", 6.0)
            .unwrap()
            .with_glyph(' ', "", 4.0)
            .unwrap()
    }

    #[rstest]
    #[case(Justify::Left, 0.2)]
    #[case(Justify::Center, -0.4)]
    #[case(Justify::Right, -1.0)]
    fn test_justification(#[case] justify: Justify, #[case] expected_left: f64) {
        // given
        let layout = TextLayout {
            justify,
            ..TextLayout::default()
        };

        // when
        let path = font().layout("I-", &layout).unwrap();

        // then
        assert!((path.top_left().x - expected_left).abs() < 1e-9, "{:?}", path.top_left());
        assert!((path.width() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_letter_spacing_and_blank_glyphs() {
        // given
        let layout = TextLayout {
            letter_spacing: 0.5,
            ..TextLayout::default()
        };

        // when
        let path = font().layout("I I", &layout).unwrap();

        // then
        // 0.6 + 0.5 + 0.4 + 0.5 gets to the second glyph, which ends 0.4 in
        assert!((path.bottom_right().x - 2.4).abs() < 1e-9, "{:?}", path.bottom_right());
    }

    #[test]
    fn test_multiple_lines() {
        // when
        let path = font().layout("I\nI", &TextLayout::default()).unwrap();

        // then
        assert!((path.height() - 2.2).abs() < 1e-9);
    }

    #[test]
    fn test_missing_glyph() {
        // when
        let result = font().layout("IX", &TextLayout::default());

        // then
        assert!(matches!(
            result,
            Err(Error::Configuration(ConfigurationError::MissingGlyph { glyph: 'X', .. }))
        ));
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn test_text_without_outlines(#[case] text: &str) {
        // when
        let result = font().layout(text, &TextLayout::default());

        // then
        assert!(matches!(
            result,
            Err(Error::Configuration(ConfigurationError::InvalidText { ref field, ref value }))
                if field == "text" && value == text
        ));
    }
}
