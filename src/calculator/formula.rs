//! U.S. Navy circumference method.

use crate::calculator::band::{classify, Band};
use crate::calculator::io::{Field, InputSource};
use serde::Serialize;

/// Validation failure that blocks a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error("hip measurement required")]
    HipRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    /// `"M"` selects male; anything else, including an empty field, is female.
    pub fn from_field(value: &str) -> Self {
        if value.trim() == "M" {
            Sex::Male
        } else {
            Sex::Female
        }
    }
}

/// Raw circumference inputs, in centimetres.
///
/// Unparseable numbers are kept as NaN and flow into the result unchecked;
/// only the hip is validated, and only for women.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub sex: Sex,
    pub height: f64,
    pub neck: f64,
    pub waist: f64,
    pub hip: Option<f64>,
}

impl Measurements {
    pub fn read<I: InputSource + ?Sized>(input: &I) -> Self {
        let number = |field| parse_measurement(input.field(field).as_deref().unwrap_or(""));

        let hip = number(Field::Hip);
        Self {
            sex: Sex::from_field(input.field(Field::Sex).as_deref().unwrap_or("")),
            height: number(Field::Height),
            neck: number(Field::Neck),
            waist: number(Field::Waist),
            hip: (!hip.is_nan()).then_some(hip),
        }
    }
}

/// Lenient number parsing: leading whitespace is skipped and the longest
/// numeric prefix wins (`"85cm"` reads as 85). No digits at all gives NaN.
///
/// Only decimal notation and the exact word `Infinity` are recognised, so
/// `"inf"` or `"nan"` read as NaN.
pub fn parse_measurement(raw: &str) -> f64 {
    let raw = raw.trim_start();
    let bytes = raw.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if raw[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let skip_digits = |from: usize| {
        from + bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let int_end = skip_digits(end);
    let mut digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = skip_digits(end + 1);
        digits += frac_end - end - 1;
        end = frac_end;
    }
    if digits == 0 {
        return f64::NAN;
    }

    // An exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = skip_digits(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    raw[..end].parse().unwrap_or(f64::NAN)
}

/// Body-fat percentage, rounded to two decimals.
pub fn body_fat_percentage(m: &Measurements) -> Result<f64, CalcError> {
    let bf = match m.sex {
        Sex::Male => 86.010 * (m.waist - m.neck).log10() - 70.041 * m.height.log10() + 36.76,
        Sex::Female => {
            let hip = m.hip.ok_or(CalcError::HipRequired)?;
            163.205 * (m.waist + hip - m.neck).log10() - 97.684 * m.height.log10() - 78.387
        }
    };
    Ok(round_two_decimals(bf))
}

/// Scale, round half away from zero, unscale.
pub fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A computed percentage with its classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub sex: Sex,
    pub percentage: f64,
    pub band: Band,
    pub label: &'static str,
    pub range: &'static str,
    pub marker_position: u8,
}

impl Assessment {
    pub fn new(sex: Sex, percentage: f64) -> Self {
        let band = classify(sex, percentage);
        Self {
            sex,
            percentage,
            band,
            label: band.label(),
            range: band.range(sex),
            marker_position: band.marker_position(),
        }
    }

    /// The result line written into the page.
    pub fn summary_html(&self) -> String {
        format!(
            "<b>Your body fat percentage is:</b> {}% <br><br> <b>Classification:</b> {} ({})",
            self.percentage, self.label, self.range
        )
    }
}

pub fn assess(m: &Measurements) -> Result<Assessment, CalcError> {
    body_fat_percentage(m).map(|percentage| Assessment::new(m.sex, percentage))
}
