use thiserror::Error;

use crate::crops::Crop;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid crop spec for {crop:?}: {reason}")]
    InvalidCropSpec { crop: Crop, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(
        "Q-table shape mismatch: expected {expected_rows}x{expected_actions}, found {rows}x{actions}"
    )]
    TableShape {
        expected_rows: usize,
        expected_actions: usize,
        rows: usize,
        actions: usize,
    },

    #[error("Q-table entry for row {row} has {actions} values (table has {rows} rows)")]
    TableEntry {
        row: usize,
        actions: usize,
        rows: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
