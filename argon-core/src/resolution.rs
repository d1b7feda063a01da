use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A requested output size, either a pixel height for icons or a full area
/// for wallpapers.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub enum Resolution {
    Height(u32),
    Area { width: u32, height: u32 },
}

impl Resolution {
    const ALIASES: &'static [(&'static str, u32, u32)] = &[
        ("4k", 3840, 2160),
        ("2k", 2560, 1440),
        ("1080p", 1920, 1080),
    ];

    pub fn height(&self) -> u32 {
        match self {
            Resolution::Height(height) => *height,
            Resolution::Area { height, .. } => *height,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Height(height) => write!(f, "{}", height),
            Resolution::Area { width, height } => write!(f, "{}x{}", width, height),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid resolution '{0}'")]
pub struct InvalidResolution(String);

impl FromStr for Resolution {
    type Err = InvalidResolution;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || InvalidResolution(s.to_owned());
        if let Some(&(_, width, height)) = Self::ALIASES
            .iter()
            .find(|(alias, _, _)| alias.eq_ignore_ascii_case(s))
        {
            return Ok(Resolution::Area { width, height });
        }
        match s.split_once('x') {
            Some((width, height)) => Ok(Resolution::Area {
                width: width.parse().map_err(|_| invalid())?,
                height: height.parse().map_err(|_| invalid())?,
            }),
            None => s.parse().map(Resolution::Height).map_err(|_| invalid()),
        }
    }
}

/// Generation rules for an icon class.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconType {
    /// Rendered slightly larger than the nominal size, see
    /// [`IconType::render_resolution`].
    Select,
    #[default]
    Regular,
}

impl IconType {
    const SELECT_HEIGHTS: &'static [(u32, u32)] = &[(32, 37), (48, 56), (64, 74)];

    /// Maps a requested resolution to the one the rasterizer should render.
    /// Anything without a mapping is rendered as requested.
    pub fn render_resolution(&self, requested: Resolution) -> Resolution {
        match (self, requested) {
            (IconType::Select, Resolution::Height(height)) => Self::SELECT_HEIGHTS
                .iter()
                .find(|(nominal, _)| *nominal == height)
                .map(|&(_, render)| Resolution::Height(render))
                .unwrap_or(requested),
            _ => requested,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IconType::Select => "select",
            IconType::Regular => "regular",
        }
    }
}

impl From<&str> for IconType {
    fn from(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("select") {
            IconType::Select
        } else {
            IconType::Regular
        }
    }
}

impl From<String> for IconType {
    fn from(s: String) -> Self {
        IconType::from(s.as_str())
    }
}

impl From<IconType> for String {
    fn from(t: IconType) -> Self {
        t.name().to_owned()
    }
}

impl FromStr for IconType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(IconType::from(s))
    }
}

impl fmt::Display for IconType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
