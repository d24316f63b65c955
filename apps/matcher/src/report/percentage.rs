use serde::{Serialize, Serializer};

use super::{MetricKey, ParseError};

/// A validated percentage in `[0, 100]`.
///
/// Keeps the text the service sent (e.g. `"42.57%"`) so the report serializes
/// back unchanged, alongside the parsed value used for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Percentage {
    raw: String,
    value: f64,
}

impl Percentage {
    /// Accepts `"80"`, `"80.0"`, `"80.0%"` with surrounding whitespace.
    pub fn parse(metric: MetricKey, raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();

        let value: f64 = number
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| ParseError::InvalidPercentage {
                metric,
                value: raw.to_string(),
            })?;

        if !(0.0..=100.0).contains(&value) {
            return Err(ParseError::OutOfRange { metric, value });
        }

        Ok(Self {
            raw: raw.to_string(),
            value,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Integer part of the value, the way chart axes show it (`42.57` → `42`).
    pub fn as_integer(&self) -> u8 {
        // value is within [0, 100] by construction
        self.value.trunc() as u8
    }

    /// Display text with exactly one percent sign.
    pub fn display(&self) -> String {
        let trimmed = self.raw.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
        format!("{number}%")
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
