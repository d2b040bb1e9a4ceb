use gerber_types::{CoordinateFormat, CoordinateNumber};

use crate::config::{CoordinateRounding, GerberFormat};
use crate::error::ConfigurationError;

/// Decimal places held by a [`CoordinateNumber`], also the largest count it can write.
const NUMBER_DECIMAL_DIGITS: u8 = 6;
const MAX_INTEGER_DIGITS: u8 = 6;

impl GerberFormat {
    /// The `FS` format, rejecting digit counts `gerber_types` cannot represent.
    pub fn coordinate_format(&self) -> Result<CoordinateFormat, ConfigurationError> {
        for (field, value, max) in [
            ("gerber.integer_digits", self.integer_digits, MAX_INTEGER_DIGITS),
            ("gerber.decimal_digits", self.decimal_digits, NUMBER_DECIMAL_DIGITS),
        ] {
            if !(1..=max).contains(&value) {
                return Err(ConfigurationError::InvalidDigits {
                    field: field.to_string(),
                    value,
                    max,
                });
            }
        }
        Ok(CoordinateFormat::new(self.integer_digits, self.decimal_digits))
    }
}

/// Convert a coordinate into the fixed point value written to the file.
///
/// With [`CoordinateRounding::Truncate`] the decimal text of the value is split at the point and
/// the fraction is padded or cut to the decimal digit count, so surplus digits are dropped rather
/// than rounded.
pub fn to_fixed(value: f64, format: &GerberFormat) -> Result<i64, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidValue {
        field: "coordinate".to_string(),
        value,
    };
    if !value.is_finite() {
        return Err(invalid());
    }

    let digits = format.integer_digits as u32 + format.decimal_digits as u32;
    let limit = 10i64
        .checked_pow(digits)
        .ok_or_else(|| ConfigurationError::InvalidDigits {
            field: "gerber.integer_digits".to_string(),
            value: format.integer_digits,
            max: MAX_INTEGER_DIGITS,
        })?;

    let decimal_digits = format.decimal_digits as usize;
    let fixed = match format.rounding {
        CoordinateRounding::Truncate => {
            let text = value.to_string();
            let (integer, fraction) = text
                .split_once('.')
                .unwrap_or((text.as_str(), ""));
            let fraction = format!("{:0<width$.width$}", fraction, width = decimal_digits);
            format!("{}{}", integer, fraction)
                .parse::<i64>()
                .map_err(|_| invalid())?
        }
        CoordinateRounding::Nearest => {
            let scaled = (value * 10f64.powi(decimal_digits as i32)).round();
            // range check before the cast, which would saturate
            if scaled.abs() >= limit as f64 {
                return Err(invalid());
            }
            scaled as i64
        }
    };

    if fixed.unsigned_abs() >= limit.unsigned_abs() {
        return Err(invalid());
    }

    Ok(fixed)
}

/// A coordinate as a [`CoordinateNumber`] holding exactly the fixed point value of [`to_fixed`].
///
/// `CoordinateNumber` keeps six decimals and rounds when written with fewer, the fixed value is
/// scaled up so that rounding is exact and the truncation policy survives serialization.
pub fn coordinate_number(value: f64, format: &GerberFormat) -> Result<CoordinateNumber, ConfigurationError> {
    format.coordinate_format()?;
    let fixed = to_fixed(value, format)?;
    let scale = 10i64.pow((NUMBER_DECIMAL_DIGITS - format.decimal_digits) as u32);
    Ok(CoordinateNumber::new(fixed * scale))
}
