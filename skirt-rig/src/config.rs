//! skirt.toml configuration
//!
//! Shared by both pipelines. Every section is optional; missing keys fall back
//! to the values the rigging scripts have always used.

use glam::DVec3;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use crate::error::{Result, RigError};

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RigConfig {
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub skeleton: SkeletonConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
}

/// Grid extraction settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Keep every N-th top-row vertex as a column seed.
    /// Default: 3
    #[serde(default = "default_n_step_hori")]
    pub n_step_hori: usize,

    /// Keep every N-th vertex along a column.
    /// Default: 2
    #[serde(default = "default_n_step_vert")]
    pub n_step_vert: usize,

    /// World-space "up" direction used for elevation.
    /// Default: +Z
    #[serde(default = "default_up")]
    pub up: [f64; 3],
}

/// Bone / IK target naming and solver settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkeletonConfig {
    /// Name prefix: bones are `{prefix}B_{c}_{r}`, empties `{prefix}E_{c}_{r}`.
    /// Default: "S"
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Collection the IK target empties are linked into.
    /// Default: "SkirtEmpties"
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Display radius of the IK target empties.
    #[serde(default = "default_empty_radius")]
    pub empty_radius: f64,

    /// IK solver iterations per constraint.
    #[serde(default = "default_ik_iterations")]
    pub ik_iterations: u32,

    /// Bones affected by each IK constraint.
    #[serde(default = "default_ik_chain_count")]
    pub ik_chain_count: u32,

    /// World transform of the armature object receiving the bones, as a
    /// translation. Bone heads/tails are expressed relative to it.
    #[serde(default)]
    pub armature_offset: [f64; 3],
}

/// Rigid body / joint synthesis settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhysicsConfig {
    /// Regex locating (column, row) inside a bone name. The first capture
    /// group is the column, the second the row. Searched, not anchored.
    #[serde(default = "default_bone_pattern")]
    pub bone_pattern: String,

    /// Box half-extent along the cloth normal.
    #[serde(default = "default_rigid_thickness")]
    pub rigid_thickness: f64,
}

fn default_n_step_hori() -> usize {
    3
}

fn default_n_step_vert() -> usize {
    2
}

fn default_up() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

fn default_prefix() -> String {
    "S".to_string()
}

fn default_collection() -> String {
    "SkirtEmpties".to_string()
}

fn default_empty_radius() -> f64 {
    0.1
}

fn default_ik_iterations() -> u32 {
    50
}

fn default_ik_chain_count() -> u32 {
    1
}

fn default_bone_pattern() -> String {
    "SB_([0-9]+)_([0-9]+)".to_string()
}

fn default_rigid_thickness() -> f64 {
    0.2
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            n_step_hori: default_n_step_hori(),
            n_step_vert: default_n_step_vert(),
            up: default_up(),
        }
    }
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            collection: default_collection(),
            empty_radius: default_empty_radius(),
            ik_iterations: default_ik_iterations(),
            ik_chain_count: default_ik_chain_count(),
            armature_offset: [0.0; 3],
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            bone_pattern: default_bone_pattern(),
            rigid_thickness: default_rigid_thickness(),
        }
    }
}

impl RigConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RigError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| RigError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.extract.validate()?;
        self.skeleton.validate()?;
        self.physics.validate()
    }
}

impl ExtractConfig {
    /// Normalized up direction
    pub fn up_dir(&self) -> DVec3 {
        DVec3::from_array(self.up).normalize_or_zero()
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_step_hori == 0 || self.n_step_vert == 0 {
            return Err(RigError::InvalidConfig(
                "n_step_hori and n_step_vert must be at least 1".to_string(),
            ));
        }
        if self.up_dir() == DVec3::ZERO {
            return Err(RigError::InvalidConfig(
                "up direction must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl SkeletonConfig {
    pub fn armature_offset(&self) -> DVec3 {
        DVec3::from_array(self.armature_offset)
    }

    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(RigError::InvalidConfig("prefix must not be empty".to_string()));
        }
        if self.ik_iterations == 0 || self.ik_chain_count == 0 {
            return Err(RigError::InvalidConfig(
                "ik_iterations and ik_chain_count must be at least 1".to_string(),
            ));
        }
        if self.empty_radius.is_nan() || self.empty_radius <= 0.0 {
            return Err(RigError::InvalidConfig(
                "empty_radius must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl PhysicsConfig {
    /// Compile the bone name pattern, checking it has both capture groups
    pub fn compile_pattern(&self) -> Result<Regex> {
        let regex = Regex::new(&self.bone_pattern).map_err(|e| {
            RigError::InvalidConfig(format!("bad bone_pattern '{}': {}", self.bone_pattern, e))
        })?;
        // captures_len counts the implicit whole-match group
        if regex.captures_len() < 3 {
            return Err(RigError::InvalidConfig(format!(
                "bone_pattern '{}' needs two capture groups (column, row)",
                self.bone_pattern
            )));
        }
        Ok(regex)
    }

    pub fn validate(&self) -> Result<()> {
        self.compile_pattern()?;
        if self.rigid_thickness.is_nan() || self.rigid_thickness <= 0.0 {
            return Err(RigError::InvalidConfig(
                "rigid_thickness must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
