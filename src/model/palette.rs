//! Theme color palette for the public profile.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AdminError;

/// Accent color of the public profile. Only palette values are representable.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    #[default]
    Orange,
    Blue,
    Green,
    Purple,
}

impl ThemeColor {
    /// Every palette entry, in display order.
    pub const ALL: [Self; 4] = [Self::Orange, Self::Blue, Self::Green, Self::Purple];

    /// Serialized name of the color.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
        }
    }

    /// Marketing label shown next to the swatch.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Orange => "Solar",
            Self::Blue => "Ocean",
            Self::Green => "Nature",
            Self::Purple => "Royal",
        }
    }

    /// Terminal color used when rendering the swatch.
    pub const fn terminal_color(self) -> console::Color {
        match self {
            Self::Orange => console::Color::Color256(208),
            Self::Blue => console::Color::Blue,
            Self::Green => console::Color::Green,
            Self::Purple => console::Color::Magenta,
        }
    }
}

impl fmt::Display for ThemeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeColor {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted || c.label().to_lowercase() == wanted)
            .ok_or_else(|| AdminError::InvalidThemeColor {
                value: s.to_string(),
            })
    }
}
