//! Error types for skirt rigging
//!
//! Every failure aborts the whole batch. Nothing is handed to the scene store
//! until a plan has been computed completely, so an error never leaves a
//! partially rigged scene behind.

use crate::grid::GridKey;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RigError>;

/// Errors raised by the skirt pipelines
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RigError {
    /// The cloth mesh is not the single closed strip grid the traversal expects
    #[error("malformed mesh topology: {0}")]
    MalformedMeshTopology(String),

    /// The named bones do not cover a dense rectangle starting at (0, 0)
    #[error("missing grid cell ({column}, {row})")]
    MissingGridCell { column: usize, row: usize },

    /// Two bones claim the same grid cell
    #[error("grid cell ({column}, {row}) is claimed by both '{first}' and '{second}'")]
    DuplicateGridCell {
        column: usize,
        row: usize,
        first: String,
        second: String,
    },

    /// A width system or frame could not be solved without producing NaNs
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry {
        /// Offending cell, if the failure belongs to a single cell
        key: Option<GridKey>,
        reason: String,
    },

    /// The invocation input is empty or references objects that do not exist
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Configuration values out of range or unparsable
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl RigError {
    pub(crate) fn topology(msg: impl Into<String>) -> Self {
        Self::MalformedMeshTopology(msg.into())
    }

    pub(crate) fn degenerate(key: GridKey, reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            key: Some(key),
            reason: format!("cell {}: {}", key, reason.into()),
        }
    }

    pub(crate) fn degenerate_grid(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            key: None,
            reason: reason.into(),
        }
    }
}
