//! Armature bone records
//!
//! The physics pipeline reads bones in armature-local rest space. Records
//! written by the skeleton pipeline carry their grid key; records imported
//! from an existing scene only have a name.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::grid::GridKey;

/// A bone in rest pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmatureBone {
    pub name: String,
    pub head: DVec3,
    pub tail: DVec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<GridKey>,
}

impl ArmatureBone {
    pub fn new(name: impl Into<String>, head: DVec3, tail: DVec3) -> Self {
        Self {
            name: name.into(),
            head,
            tail,
            parent: None,
            key: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_key(mut self, key: GridKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Midpoint of head and tail
    pub fn center(&self) -> DVec3 {
        (self.head + self.tail) * 0.5
    }

    pub fn length(&self) -> f64 {
        self.head.distance(self.tail)
    }
}

/// Bone namespace of one armature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Armature {
    #[serde(default)]
    pub bones: Vec<ArmatureBone>,
}

impl Armature {
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
