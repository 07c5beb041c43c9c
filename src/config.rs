use crate::error::{GameError, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Largest exclusive ceiling a session may use.
pub const MAX_UPPER_BOUND: u32 = 0x100;

/// Which conversion direction(s) a session drills.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
pub enum Mode {
    /// decimal shown, hexadecimal expected
    #[serde(rename = "d2x")]
    #[value(name = "d2x")]
    #[strum(serialize = "d2x")]
    DecimalToHex,
    /// hexadecimal shown, decimal expected
    #[serde(rename = "x2d")]
    #[value(name = "x2d")]
    #[strum(serialize = "x2d")]
    HexToDecimal,
    /// direction picked at random every round
    #[serde(rename = "both")]
    #[value(name = "both")]
    #[strum(serialize = "both")]
    Mixed,
}

impl FromStr for Mode {
    type Err = GameError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "d2x" => Ok(Mode::DecimalToHex),
            "x2d" => Ok(Mode::HexToDecimal),
            "both" => Ok(Mode::Mixed),
            other => Err(GameError::InvalidMode(other.to_string())),
        }
    }
}

/// Exclusive ceiling on generated numbers, always within `1..=256`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UpperBound(u32);

impl UpperBound {
    pub fn new(value: u32) -> Option<Self> {
        (1..=MAX_UPPER_BOUND).contains(&value).then_some(Self(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for UpperBound {
    fn default() -> Self {
        Self(MAX_UPPER_BOUND)
    }
}

/// How a user-supplied bound should be applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoundInput {
    /// empty or zero: fall back to the configured default
    Default,
    /// larger than the maximum: clamp and warn
    Clamped,
    Given(UpperBound),
}

impl BoundInput {
    pub fn from_value(value: u64) -> Self {
        match value {
            0 => BoundInput::Default,
            v if v > MAX_UPPER_BOUND as u64 => BoundInput::Clamped,
            // in range after the two arms above
            v => BoundInput::Given(UpperBound(v as u32)),
        }
    }

    /// Parses one line of prompt input. Negative or non-numeric text is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(BoundInput::Default);
        }
        trimmed
            .parse::<u64>()
            .map(Self::from_value)
            .map_err(|_| GameError::InvalidBound(trimmed.to_string()))
    }

    pub fn resolve(self, default: UpperBound) -> UpperBound {
        match self {
            BoundInput::Default => default,
            BoundInput::Clamped => UpperBound::default(),
            BoundInput::Given(bound) => bound,
        }
    }
}

/// Immutable settings for one session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub upper_bound: UpperBound,
    pub mode: Mode,
}

/// Values offered at the two startup prompts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Defaults {
    pub upper_bound: u32,
    pub mode: Mode,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            upper_bound: MAX_UPPER_BOUND,
            mode: Mode::HexToDecimal,
        }
    }
}

impl Defaults {
    /// The default bound, with out-of-range file values replaced by the maximum.
    pub fn bound(&self) -> UpperBound {
        UpperBound::new(self.upper_bound).unwrap_or_default()
    }
}

pub trait DefaultsStore {
    fn load(&self) -> Defaults;
}

#[derive(Debug, Clone)]
pub struct FileDefaultsStore {
    path: PathBuf,
}

impl FileDefaultsStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "hexdec") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("hexdec_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileDefaultsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultsStore for FileDefaultsStore {
    fn load(&self) -> Defaults {
        let Ok(bytes) = fs::read(&self.path) else {
            return Defaults::default();
        };
        match serde_json::from_slice::<Defaults>(&bytes) {
            Ok(defaults) => {
                if UpperBound::new(defaults.upper_bound).is_none() {
                    tracing::warn!(
                        path = %self.path.display(),
                        upper_bound = defaults.upper_bound,
                        "default bound out of range, using {}",
                        MAX_UPPER_BOUND
                    );
                }
                defaults
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable defaults file");
                Defaults::default()
            }
        }
    }
}
