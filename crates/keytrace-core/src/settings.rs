use crate::error::SettingsError;
use crate::trace::{GLOW_BLUR, StrokeStyle};
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const LINE_WIDTH_RANGE: RangeInclusive<f64> = 1.0..=10.0;
pub const DOT_SIZE_RANGE: RangeInclusive<f64> = 2.0..=10.0;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum KeyboardTheme {
    #[default]
    Dark,
    Light,
    Neon,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum KeyShape {
    #[default]
    Rounded,
    Square,
    Circular,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// Dash lengths in surface units; empty means a continuous stroke.
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &[10.0, 5.0],
            Self::Dotted => &[2.0, 8.0],
        }
    }
}

/// An opaque sRGB color, written as `#rrggbb` (or `#rgb`) in settings.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr, SerializeDisplay)]
pub struct Color(Srgb<u8>);

impl Color {
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn to_srgba(self, alpha: f64) -> Srgba<f64> {
        self.0.into_format::<f64>().with_alpha(alpha)
    }
}

impl FromStr for Color {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|_| SettingsError::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardSettings {
    pub theme: KeyboardTheme,
    pub key_shape: KeyShape,
    pub three_d: bool,
    pub primary_color: Color,
    pub hover_color: Color,
    pub text_color: Color,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            theme: KeyboardTheme::default(),
            key_shape: KeyShape::default(),
            three_d: false,
            primary_color: Color::rgb(0x4a, 0x9e, 0xff),
            hover_color: Color::rgb(0x6b, 0xb6, 0xff),
            text_color: Color::rgb(0xff, 0xff, 0xff),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSettings {
    pub color: Color,
    pub width: f64,
    pub style: LineStyle,
    pub glow: bool,
    /// Marker radius; only the vector export draws markers.
    pub dot_size: f64,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x4a, 0x9e, 0xff),
            width: 3.0,
            style: LineStyle::default(),
            glow: true,
            dot_size: 4.0,
        }
    }
}

impl LineSettings {
    pub fn stroke(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            width: self.width,
            dash: self.style.dash_pattern(),
            blur: self.glow.then_some(GLOW_BLUR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keyboard: KeyboardSettings,
    pub line: LineSettings,
}

impl Settings {
    /// Pulls numeric fields back into their allowed ranges.
    pub fn clamped(mut self) -> Self {
        self.line.width = clamp_setting("line.width", self.line.width, LINE_WIDTH_RANGE);
        self.line.dot_size = clamp_setting("line.dot_size", self.line.dot_size, DOT_SIZE_RANGE);
        self
    }
}

fn clamp_setting(name: &str, value: f64, range: RangeInclusive<f64>) -> f64 {
    if range.contains(&value) {
        return value;
    }
    let clamped = if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    };
    log::warn!(
        "{} = {} is outside {}..={}, using {}",
        name,
        value,
        range.start(),
        range.end(),
        clamped
    );
    clamped
}
