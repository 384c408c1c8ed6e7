//! Item sizes: a magnitude plus a unit (`50%`, `1fr`, `120px`).

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeUnit {
    /// Share of the parent's extent, out of 100.
    Percent,
    /// Weight in the share left over after percentages.
    Fractional,
    /// Absolute pixels. Only meaningful for minimum sizes.
    Pixel,
}

impl SizeUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            SizeUnit::Percent => "%",
            SizeUnit::Fractional => "fr",
            SizeUnit::Pixel => "px",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub magnitude: f64,
    pub unit: SizeUnit,
}

impl Size {
    pub const fn percent(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: SizeUnit::Percent,
        }
    }

    pub const fn fractional(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: SizeUnit::Fractional,
        }
    }

    pub const fn pixels(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: SizeUnit::Pixel,
        }
    }

    /// Parse `"<number><unit>"`. A missing unit falls back to `default_unit`.
    pub fn parse(text: &str, default_unit: SizeUnit) -> Option<Size> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| {
                Regex::new(r"^\s*(-?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*(%|fr|px)?\s*$").ok()
            })
            .as_ref()?;
        let caps = pattern.captures(text)?;
        let magnitude: f64 = caps.get(1)?.as_str().parse().ok()?;
        if !magnitude.is_finite() {
            return None;
        }
        let unit = match caps.get(2).map(|m| m.as_str()) {
            Some("%") => SizeUnit::Percent,
            Some("fr") => SizeUnit::Fractional,
            Some("px") => SizeUnit::Pixel,
            _ => default_unit,
        };
        Some(Size { magnitude, unit })
    }
}

impl Default for Size {
    fn default() -> Self {
        Size::fractional(1.0)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Size {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Size::parse(&text, SizeUnit::Percent)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid size '{text}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_units() {
        assert_eq!(Size::parse("50%", SizeUnit::Percent), Some(Size::percent(50.0)));
        assert_eq!(Size::parse("2fr", SizeUnit::Percent), Some(Size::fractional(2.0)));
        assert_eq!(Size::parse(" 120px ", SizeUnit::Percent), Some(Size::pixels(120.0)));
        assert_eq!(Size::parse(".5fr", SizeUnit::Percent), Some(Size::fractional(0.5)));
    }

    #[test]
    fn missing_unit_uses_default() {
        assert_eq!(Size::parse("30", SizeUnit::Percent), Some(Size::percent(30.0)));
        assert_eq!(Size::parse("30", SizeUnit::Pixel), Some(Size::pixels(30.0)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(Size::parse("wide", SizeUnit::Percent), None);
        assert_eq!(Size::parse("10em", SizeUnit::Percent), None);
        assert_eq!(Size::parse("", SizeUnit::Percent), None);
    }

    #[test]
    fn display_uses_shortest_round_trip_form() {
        let size = Size::percent(100.0 / 3.0);
        let text = size.to_string();
        assert_eq!(Size::parse(&text, SizeUnit::Fractional), Some(size));
        assert_eq!(Size::fractional(1.0).to_string(), "1fr");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&Size::pixels(10.0)).unwrap();
        assert_eq!(json, "\"10px\"");
        let back: Size = serde_json::from_str("\"25%\"").unwrap();
        assert_eq!(back, Size::percent(25.0));
        assert!(serde_json::from_str::<Size>("\"huge\"").is_err());
    }
}
