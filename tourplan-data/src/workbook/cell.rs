//! Conversions from spreadsheet cells to job and fleet fields.
//!
//! Each function returns a human-readable message on failure; the caller
//! attaches sheet, row and column.

use calamine::Data;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Whether a cell holds nothing worth reading.
pub(super) fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Identifier text. Integral numbers print without a fractional part.
#[expect(
    clippy::cast_possible_truncation,
    reason = "only integral floats within i64 range are converted"
)]
pub(super) fn text(cell: &Data) -> Result<String, String> {
    match cell {
        Data::String(text) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
        Data::Int(value) => Ok(value.to_string()),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 9.0e15 => {
            Ok((*value as i64).to_string())
        }
        Data::Float(value) => Ok(value.to_string()),
        Data::Bool(value) => Ok(value.to_string()),
        other => Err(format!("expected text, found {}", describe(other))),
    }
}

/// A finite number, also accepted as numeric text.
#[expect(
    clippy::cast_precision_loss,
    reason = "spreadsheet integers are far below 2^53"
)]
pub(super) fn number(cell: &Data) -> Result<f64, String> {
    let value = match cell {
        Data::Float(value) => *value,
        Data::Int(value) => *value as f64,
        Data::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("expected a number, found {text:?}"))?,
        other => return Err(format!("expected a number, found {}", describe(other))),
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("expected a finite number, found {value}"))
    }
}

/// A non-negative whole number.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "the value is checked to be integral and within u64 range"
)]
pub(super) fn whole(cell: &Data) -> Result<u64, String> {
    let value = number(cell)?;
    if value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return Err(format!("expected a non-negative whole number, found {value}"));
    }
    Ok(value as u64)
}

/// A time of day as `HH:MM:SS`.
///
/// Text is passed through trimmed for the request builder to validate.
/// Date cells keep only their time. Plain numbers must be a fraction of a
/// single day.
pub(super) fn time_of_day(cell: &Data) -> Result<String, String> {
    match cell {
        Data::String(text) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
        Data::DateTimeIso(text) => Ok(text
            .rsplit_once('T')
            .map_or(text.as_str(), |(_, time)| time)
            .to_owned()),
        Data::Float(value) if (0.0..1.0).contains(value) => Ok(fraction_to_clock(*value)),
        Data::Float(value) => Err(format!(
            "expected a time of day as a fraction of a day, found {value}"
        )),
        Data::DateTime(value) => Ok(fraction_to_clock(value.as_f64())),
        other => Err(format!("expected a time of day, found {}", describe(other))),
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "converts an Excel day fraction to whole seconds and splits it into clock fields"
)]
fn fraction_to_clock(days: f64) -> String {
    let seconds = (days.rem_euclid(1.0) * SECONDS_PER_DAY).round() as u64 % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

fn describe(cell: &Data) -> String {
    match cell {
        Data::Empty => "an empty cell".to_owned(),
        Data::Error(err) => format!("the cell error {err}"),
        Data::Bool(value) => format!("the boolean {value}"),
        Data::DateTime(value) => format!("the date {}", value.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => format!("the value {text:?}"),
        Data::String(text) => format!("the text {text:?}"),
        Data::Int(value) => format!("the number {value}"),
        Data::Float(value) => format!("the number {value}"),
    }
}
