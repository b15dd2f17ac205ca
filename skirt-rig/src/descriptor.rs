//! Rigid body and joint descriptors
//!
//! Names follow the MMD model convention and must stay bit-exact so that
//! existing models load and save without renaming.

use glam::DVec3;
use serde::Serialize;

use crate::grid::GridKey;

/// `Rigid_SB_{i}_{j}`
pub fn rigid_name(key: GridKey) -> String {
    format!("Rigid_SB_{}_{}", key.column, key.row)
}

/// `Joint_SB_{V|H}_{i}_{j}`
pub fn joint_name(kind: JointKind, key: GridKey) -> String {
    format!("Joint_SB_{}_{}_{}", kind.tag(), key.column, key.row)
}

/// Collision shape (skirt cells are always boxes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RigidShape {
    Box,
}

/// MMD rigid body physics mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DynamicsMode {
    /// Simulated, drives the bone
    Dynamic,
}

/// Rigid body bound to one skirt bone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RigidBodyDescriptor {
    pub key: GridKey,
    pub name: String,
    pub name_e: String,
    pub location: DVec3,
    /// Euler angles (x, y, z) in YXZ order
    pub rotation: DVec3,
    /// Box half-extents
    pub size: DVec3,
    pub shape: RigidShape,
    pub dynamics: DynamicsMode,
    pub bone: String,
}

/// Which neighbour a joint connects to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JointKind {
    /// Previous row of the same column
    Vertical,
    /// Next column of the same ring
    Horizontal,
}

impl JointKind {
    pub fn tag(self) -> &'static str {
        match self {
            JointKind::Vertical => "V",
            JointKind::Horizontal => "H",
        }
    }
}

/// 6-DOF spring joint between two rigid bodies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointDescriptor {
    pub key: GridKey,
    pub kind: JointKind,
    pub name: String,
    pub name_e: String,
    pub location: DVec3,
    pub rotation: DVec3,
    pub rigid_a: Option<String>,
    pub rigid_b: Option<String>,
    pub minimum_location: DVec3,
    pub maximum_location: DVec3,
    pub minimum_rotation: DVec3,
    pub maximum_rotation: DVec3,
    pub spring_linear: DVec3,
    pub spring_angular: DVec3,
}

impl JointDescriptor {
    /// Joint with every limit pinned to zero and no springs
    pub fn weld(
        kind: JointKind,
        key: GridKey,
        location: DVec3,
        rotation: DVec3,
        rigid_a: GridKey,
        rigid_b: GridKey,
    ) -> Self {
        let name = joint_name(kind, key);
        Self {
            key,
            kind,
            name_e: name.clone(),
            name,
            location,
            rotation,
            rigid_a: Some(rigid_name(rigid_a)),
            rigid_b: Some(rigid_name(rigid_b)),
            minimum_location: DVec3::ZERO,
            maximum_location: DVec3::ZERO,
            minimum_rotation: DVec3::ZERO,
            maximum_rotation: DVec3::ZERO,
            spring_linear: DVec3::ZERO,
            spring_angular: DVec3::ZERO,
        }
    }

    /// True when no translational or rotational freedom is left
    pub fn is_weld(&self) -> bool {
        [
            self.minimum_location,
            self.maximum_location,
            self.minimum_rotation,
            self.maximum_rotation,
            self.spring_linear,
            self.spring_angular,
        ]
        .iter()
        .all(|v| *v == DVec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_serialize_as_mmd_names() {
        assert_eq!(serde_json::to_value(RigidShape::Box).unwrap(), "BOX");
        assert_eq!(serde_json::to_value(DynamicsMode::Dynamic).unwrap(), "DYNAMIC");
    }

    #[test]
    fn test_weld_names_and_limits() {
        let joint = JointDescriptor::weld(
            JointKind::Vertical,
            GridKey::new(2, 1),
            DVec3::ONE,
            DVec3::ZERO,
            GridKey::new(2, 0),
            GridKey::new(2, 1),
        );
        assert_eq!(joint.name, "Joint_SB_V_2_1");
        assert_eq!(joint.name_e, joint.name);
        assert_eq!(joint.rigid_a.as_deref(), Some("Rigid_SB_2_0"));
        assert_eq!(joint.rigid_b.as_deref(), Some("Rigid_SB_2_1"));
        assert!(joint.is_weld());
    }
}
