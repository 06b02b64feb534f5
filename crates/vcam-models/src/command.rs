//! Discrete control commands and the snapshot mode they drive.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::filter_mode::FaceFilterMode;

/// Whether face detection runs on the live feed or a retained snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotMode {
    #[default]
    Live,
    Frozen,
}

impl SnapshotMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotMode::Live => "live",
            SnapshotMode::Frozen => "frozen",
        }
    }
}

impl fmt::Display for SnapshotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A command from the host. Commands are applied at the next tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "mode", rename_all = "snake_case")]
pub enum Command {
    /// Freeze when live, unfreeze when frozen.
    ToggleFreeze,
    /// Select the filter applied to the frozen face region.
    SelectFilter(FaceFilterMode),
}

impl FromStr for Command {
    type Err = ModelError;

    /// Parses the host key bindings: digits select a filter mode, `f`,
    /// `snap` or a single space toggle freeze.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == " " {
            return Ok(Command::ToggleFreeze);
        }
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "f" | "freeze" | "snap" | "toggle" => Ok(Command::ToggleFreeze),
            _ => {
                if let Some(mode) = key
                    .parse::<u8>()
                    .ok()
                    .and_then(FaceFilterMode::from_key)
                {
                    return Ok(Command::SelectFilter(mode));
                }
                key.strip_prefix("filter ")
                    .map(str::parse::<FaceFilterMode>)
                    .transpose()?
                    .map(Command::SelectFilter)
                    .ok_or_else(|| ModelError::UnknownCommand(s.to_string()))
            }
        }
    }
}
