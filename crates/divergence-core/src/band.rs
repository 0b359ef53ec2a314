use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Rating bands accepted by the opening explorer.
/// Each band covers its lower bound up to the next band's lower bound.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "BandRepr", into = "String")]
pub enum RatingBand {
    Under1000,
    From1000,
    From1200,
    From1400,
    From1600,
    From1800,
    From2000,
    From2200,
    From2500,
}

impl RatingBand {
    /// Every supported band, lowest first.
    pub const ALL: [RatingBand; 9] = [
        RatingBand::Under1000,
        RatingBand::From1000,
        RatingBand::From1200,
        RatingBand::From1400,
        RatingBand::From1600,
        RatingBand::From1800,
        RatingBand::From2000,
        RatingBand::From2200,
        RatingBand::From2500,
    ];

    /// Lower rating bound of the band.
    pub fn lower_bound(&self) -> u32 {
        match self {
            RatingBand::Under1000 => 0,
            RatingBand::From1000 => 1000,
            RatingBand::From1200 => 1200,
            RatingBand::From1400 => 1400,
            RatingBand::From1600 => 1600,
            RatingBand::From1800 => 1800,
            RatingBand::From2000 => 2000,
            RatingBand::From2200 => 2200,
            RatingBand::From2500 => 2500,
        }
    }

    /// Label used on the explorer query string and in stored puzzles.
    pub fn label(&self) -> String {
        self.lower_bound().to_string()
    }
}

impl fmt::Display for RatingBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lower_bound())
    }
}

impl TryFrom<u32> for RatingBand {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        RatingBand::ALL
            .into_iter()
            .find(|band| band.lower_bound() == value)
            .ok_or_else(|| ConfigError::UnknownRatingBand(value.to_string()))
    }
}

impl FromStr for RatingBand {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: u32 = trimmed
            .parse()
            .map_err(|_| ConfigError::UnknownRatingBand(trimmed.to_string()))?;
        RatingBand::try_from(value)
    }
}

impl From<RatingBand> for String {
    fn from(band: RatingBand) -> Self {
        band.label()
    }
}

/// YAML writes bands either quoted or as bare integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum BandRepr {
    Number(u32),
    Label(String),
}

impl TryFrom<BandRepr> for RatingBand {
    type Error = ConfigError;

    fn try_from(value: BandRepr) -> Result<Self, Self::Error> {
        match value {
            BandRepr::Number(n) => RatingBand::try_from(n),
            BandRepr::Label(label) => label.parse(),
        }
    }
}
