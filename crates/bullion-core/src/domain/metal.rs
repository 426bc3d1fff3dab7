use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// The four tracked precious metals, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetalKind {
    Gold,
    Silver,
    Platinum,
    Palladium,
}

impl MetalKind {
    pub const ALL: [Self; 4] = [Self::Gold, Self::Silver, Self::Platinum, Self::Palladium];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Platinum => "platinum",
            Self::Palladium => "palladium",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Platinum => "Platinum",
            Self::Palladium => "Palladium",
        }
    }

    /// Position in [`MetalKind::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Gold => 0,
            Self::Silver => 1,
            Self::Platinum => 2,
            Self::Palladium => 3,
        }
    }
}

impl Display for MetalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetalKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(Self::Gold),
            "silver" => Ok(Self::Silver),
            "platinum" => Ok(Self::Platinum),
            "palladium" => Ok(Self::Palladium),
            _ => Err(ValidationError::UnknownMetal {
                value: value.to_owned(),
            }),
        }
    }
}

impl TryFrom<&str> for MetalKind {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
