// Four-letter MBTI types and the four dimensions they are built from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MbtiTypeParseError {
    #[error("MBTI type must have exactly 4 letters, got {0:?}")]
    WrongLength(String),

    #[error("invalid letter {letter:?} for dimension {dimension}")]
    InvalidLetter { letter: char, dimension: &'static str },
}

// ---------------------------------------------------------------------------
// Dimension
// ---------------------------------------------------------------------------

/// One of the four preference axes. The backend keys percentages by
/// [`Dimension::key`] (`"E/I"`, `"S/N"`, `"T/F"`, `"J/P"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    EnergyFocus,
    Perception,
    Judgement,
    Lifestyle,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::EnergyFocus,
        Dimension::Perception,
        Dimension::Judgement,
        Dimension::Lifestyle,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Dimension::EnergyFocus => "E/I",
            Dimension::Perception => "S/N",
            Dimension::Judgement => "T/F",
            Dimension::Lifestyle => "J/P",
        }
    }

    /// The two pole letters, first pole first.
    pub fn poles(self) -> (char, char) {
        match self {
            Dimension::EnergyFocus => ('E', 'I'),
            Dimension::Perception => ('S', 'N'),
            Dimension::Judgement => ('T', 'F'),
            Dimension::Lifestyle => ('J', 'P'),
        }
    }

    pub fn from_key(key: &str) -> Option<Dimension> {
        Dimension::ALL.into_iter().find(|d| d.key() == key)
    }
}

// ---------------------------------------------------------------------------
// MbtiType
// ---------------------------------------------------------------------------

/// A validated, upper-case four-letter type such as `ENFP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MbtiType([char; 4]);

/// The sixteen types, in the order selection widgets present them.
const ALL_TYPES: [&str; 16] = [
    "INTJ", "INTP", "ENTJ", "ENTP", "INFJ", "INFP", "ENFJ", "ENFP", "ISTJ", "ISFJ", "ESTJ",
    "ESFJ", "ISTP", "ISFP", "ESTP", "ESFP",
];

impl MbtiType {
    pub fn all() -> Vec<MbtiType> {
        ALL_TYPES
            .iter()
            .filter_map(|t| t.parse().ok())
            .collect()
    }

    /// Letter chosen on `dimension`.
    pub fn letter(self, dimension: Dimension) -> char {
        let idx = Dimension::ALL
            .iter()
            .position(|d| *d == dimension)
            .unwrap_or(0);
        self.0[idx]
    }

    /// Next type in [`MbtiType::all`] order, wrapping around.
    pub fn next(self) -> MbtiType {
        self.step(1)
    }

    /// Previous type in [`MbtiType::all`] order, wrapping around.
    pub fn prev(self) -> MbtiType {
        self.step(ALL_TYPES.len() - 1)
    }

    fn step(self, by: usize) -> MbtiType {
        let all = MbtiType::all();
        let idx = all.iter().position(|t| *t == self).unwrap_or(0);
        all[(idx + by) % all.len()]
    }
}

impl Default for MbtiType {
    fn default() -> Self {
        MbtiType(['I', 'N', 'T', 'J'])
    }
}

impl FromStr for MbtiType {
    type Err = MbtiTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: Vec<char> = s.trim().chars().map(|c| c.to_ascii_uppercase()).collect();
        if letters.len() != 4 {
            return Err(MbtiTypeParseError::WrongLength(s.to_string()));
        }
        let mut out = ['\0'; 4];
        for (i, (dimension, letter)) in Dimension::ALL.iter().zip(letters).enumerate() {
            let (a, b) = dimension.poles();
            if letter != a && letter != b {
                return Err(MbtiTypeParseError::InvalidLetter {
                    letter,
                    dimension: dimension.key(),
                });
            }
            out[i] = letter;
        }
        Ok(MbtiType(out))
    }
}

impl TryFrom<String> for MbtiType {
    type Error = MbtiTypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MbtiType> for String {
    fn from(value: MbtiType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MbtiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0 {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
