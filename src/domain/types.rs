//! Shared domain enumerations aligned with persisted database enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Horizontal alignment of the storefront hero block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "layout_position", rename_all = "snake_case")]
pub enum LayoutPosition {
    Left,
    #[default]
    Center,
    Right,
}

impl LayoutPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutPosition::Left => "left",
            LayoutPosition::Center => "center",
            LayoutPosition::Right => "right",
        }
    }
}

impl fmt::Display for LayoutPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutPosition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(LayoutPosition::Left),
            "center" => Ok(LayoutPosition::Center),
            "right" => Ok(LayoutPosition::Right),
            other => Err(format!("unknown layout position `{other}`")),
        }
    }
}
