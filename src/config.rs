use std::collections::{BTreeMap, HashMap};

use log::debug;

use crate::cache::{CacheKey, GeometryCache};
use crate::error::ConfigurationError;
use crate::font::Font;
use crate::path::{Path, PathTransform, TransformedPath};

/// How fractional coordinate digits beyond the configured precision are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordinateRounding {
    /// Cut the decimal text, keeps output identical to previously fabricated boards.
    #[default]
    Truncate,
    Nearest,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GerberFormat {
    pub integer_digits: u8,
    pub decimal_digits: u8,
    pub rounding: CoordinateRounding,
    /// diameter of aperture 10, used while filling regions
    pub fill_aperture_diameter: f64,
    /// diameter of aperture 11, used for pad flashes
    pub flash_diameter: f64,
}

impl Default for GerberFormat {
    fn default() -> Self {
        Self {
            integer_digits: 6,
            decimal_digits: 6,
            rounding: CoordinateRounding::Truncate,
            fill_aperture_diameter: 0.001,
            flash_diameter: 0.1,
        }
    }
}

/// Pour clearance distances in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clearances {
    pub outline: f64,
    pub pad: f64,
    pub route: f64,
    pub drill: f64,
}

impl Default for Clearances {
    fn default() -> Self {
        Self {
            outline: 0.5,
            pad: 0.25,
            route: 0.25,
            drill: 0.3,
        }
    }
}

/// Output file naming for a board house, content is never affected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManufacturerProfile {
    pub name: String,
    pub extensions: BTreeMap<String, String>,
    pub default_extension: String,
}

impl ManufacturerProfile {
    pub fn extension(&self, key: &str) -> &str {
        self.extensions
            .get(key)
            .map(String::as_str)
            .unwrap_or(&self.default_extension)
    }
}

impl Default for ManufacturerProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            extensions: BTreeMap::from([("drills".to_string(), "drl".to_string())]),
            default_extension: "ger".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub gerber: GerberFormat,
    /// longest line segment used when flattening curves for output, in millimeters
    pub min_segment_length: f64,
    /// resolution of the flatten used to estimate curve lengths
    pub curve_sample_steps: usize,
    /// decimal places used when rendering path text and aperture sizes
    pub significant_digits: u32,
    pub clearances: Clearances,
    pub manufacturer: ManufacturerProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gerber: GerberFormat::default(),
            min_segment_length: 0.05,
            curve_sample_steps: 100,
            significant_digits: 8,
            clearances: Clearances::default(),
            manufacturer: ManufacturerProfile::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.gerber.coordinate_format()?;

        let positive = [
            ("min_segment_length", self.min_segment_length),
            ("curve_sample_steps", self.curve_sample_steps as f64),
            ("gerber.fill_aperture_diameter", self.gerber.fill_aperture_diameter),
            ("gerber.flash_diameter", self.gerber.flash_diameter),
        ];
        let non_negative = [
            ("clearances.outline", self.clearances.outline),
            ("clearances.pad", self.clearances.pad),
            ("clearances.route", self.clearances.route),
            ("clearances.drill", self.clearances.drill),
        ];

        let invalid = positive
            .into_iter()
            .find(|(_, value)| !(*value > 0.0))
            .or_else(|| {
                non_negative
                    .into_iter()
                    .find(|(_, value)| !(*value >= 0.0))
            });

        match invalid {
            Some((field, value)) => Err(ConfigurationError::InvalidValue {
                field: field.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }
}

/// Everything geometry and codec construction needs, passed by reference.
#[derive(Debug, Default)]
pub struct Context {
    pub config: Config,
    fonts: HashMap<String, Font>,
    cache: Option<GeometryCache>,
}

impl Context {
    pub fn new(config: Config) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config,
            fonts: HashMap::new(),
            cache: None,
        })
    }

    pub fn with_font(mut self, name: &str, font: Font) -> Self {
        self.fonts.insert(name.to_string(), font);
        self
    }

    pub fn with_cache(mut self, cache: GeometryCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&GeometryCache> {
        self.cache.as_ref()
    }

    pub fn font(&self, name: &str) -> Result<&Font, ConfigurationError> {
        self.fonts
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownFont {
                name: name.to_string(),
            })
    }

    /// Transform a path, going through the geometry cache when one is configured.
    pub fn transform_path(&self, path: &Path, params: &PathTransform) -> TransformedPath {
        match &self.cache {
            Some(cache) => {
                let key = CacheKey::new(path.original(), params);
                cache.get_or_insert_with(key, || path.transform(params))
            }
            None => {
                debug!("no geometry cache, transforming directly");
                path.transform(params)
            }
        }
    }
}
