//! Named theme palettes consumed by the field generator and the backdrop.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Linear RGB triple in `[0, 1]`.
pub type Rgb = [f32; 3];

const fn hex(rgb: u32) -> Rgb {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    ]
}

const LIGHT: [Rgb; 4] = [hex(0x3b82f6), hex(0x8b5cf6), hex(0x06b6d4), hex(0x10b981)];
const DARK: [Rgb; 5] = [
    hex(0x60a5fa),
    hex(0xa78bfa),
    hex(0x22d3ee),
    hex(0x34d399),
    hex(0xf472b6),
];
const NEON: [Rgb; 5] = [
    hex(0xff006e),
    hex(0x8338ec),
    hex(0x3a86ff),
    hex(0x06ffa5),
    hex(0xffbe0b),
];
const MINIMAL: [Rgb; 4] = [hex(0x6b7280), hex(0x9ca3af), hex(0xd1d5db), hex(0x4b5563)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Neon,
    Minimal,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Light, Theme::Dark, Theme::Neon, Theme::Minimal];

    /// Lenient lookup: unknown names fall back to [`Theme::Light`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Neon => "neon",
            Theme::Minimal => "minimal",
        }
    }

    /// Ordered particle palette (4-5 colours).
    pub fn palette(self) -> &'static [Rgb] {
        match self {
            Theme::Light => &LIGHT,
            Theme::Dark => &DARK,
            Theme::Neon => &NEON,
            Theme::Minimal => &MINIMAL,
        }
    }

    /// Clear colour behind the field.
    pub fn background(self) -> Rgb {
        match self {
            Theme::Light => hex(0xf8fafc),
            Theme::Dark => hex(0x0f172a),
            Theme::Neon => hex(0x0a0014),
            Theme::Minimal => hex(0xffffff),
        }
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "neon" => Ok(Theme::Neon),
            "minimal" => Ok(Theme::Minimal),
            _ => Err(ConfigError::UnknownTheme(s.to_string())),
        }
    }
}

impl From<String> for Theme {
    fn from(name: String) -> Self {
        Theme::from_name(&name)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_have_four_or_five_colours() {
        for theme in Theme::ALL {
            let n = theme.palette().len();
            assert!((4..=5).contains(&n), "{theme} has {n} colours");
        }
    }

    #[test]
    fn unknown_theme_falls_back_to_light() {
        assert_eq!(Theme::from_name("sepia"), Theme::Light);
        assert_eq!(Theme::from_name(" NEON "), Theme::Neon);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn hex_decodes_channels() {
        let [r, g, b] = hex(0xff8000);
        assert_eq!(r, 1.0);
        assert!((g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(b, 0.0);
    }
}
