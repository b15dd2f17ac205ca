//! Rigid body and joint synthesis for a skirt bone grid
//!
//! One box per bone, sized so neighbouring boxes tile the ring, welded to the
//! box above it and to the next box around the ring.

mod frame;

pub use frame::{CellFrame, TubeAxis, DETERMINANT_EPSILON, LENGTH_EPSILON};

use glam::DVec3;
use serde::Serialize;
use tracing::{debug, info};

use crate::armature::ArmatureBone;
use crate::config::PhysicsConfig;
use crate::descriptor::{
    DynamicsMode, JointDescriptor, JointKind, RigidBodyDescriptor, RigidShape, rigid_name,
};
use crate::error::{Result, RigError};
use crate::grid::{Grid, GridKey};


/// Geometry of one grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub frame: CellFrame,
    /// Half width around the ring, averaged over both neighbours
    pub width: f64,
    /// Bone length
    pub height: f64,
    /// Box orientation as YXZ Euler angles
    pub rotation: DVec3,
}

/// Everything the physics pipeline hands to the scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicsPlan {
    pub origin: DVec3,
    pub axis: DVec3,
    pub rigid_bodies: Vec<RigidBodyDescriptor>,
    pub joints: Vec<JointDescriptor>,
}

impl PhysicsPlan {
    pub fn joints_of(&self, kind: JointKind) -> impl Iterator<Item = &JointDescriptor> + '_ {
        self.joints.iter().filter(move |j| j.kind == kind)
    }
}

/// Compute the geometry of one cell against its ring neighbours
pub fn cell_geometry(bones: &Grid<ArmatureBone>, key: GridKey, tube: &TubeAxis) -> Result<CellGeometry> {
    let bone = &bones[key];
    let next = &bones[GridKey::new(bones.ring_next(key.column), key.row)];
    let prev = &bones[GridKey::new(bones.ring_prev(key.column), key.row)];

    let height = bone.length();
    if height < LENGTH_EPSILON {
        return Err(RigError::degenerate(key, format!("bone '{}' has zero length", bone.name)));
    }

    // Both sides, averaged, so uneven spacing does not skew the box
    let width_next = tube.half_width(key, bone.center(), next.center())?;
    let width_prev = tube.half_width(key, bone.center(), prev.center())?;
    let width = (width_next + width_prev) / 2.0;

    let frame = CellFrame::for_bone(key, bone, tube)?;

    Ok(CellGeometry {
        frame,
        width,
        height,
        rotation: frame.euler_yxz(),
    })
}

/// Build rigid bodies and weld joints for a dense bone grid
pub fn synthesize(bones: &Grid<ArmatureBone>, config: &PhysicsConfig) -> Result<PhysicsPlan> {
    config.validate()?;

    let tube = TubeAxis::from_bones(bones)?;
    debug!("Tube origin {:?}, axis {:?}", tube.origin, tube.axis);

    let cells = bones.try_map(|key, _| cell_geometry(bones, key, &tube))?;

    let rigid_bodies: Vec<RigidBodyDescriptor> = cells
        .iter()
        .map(|(key, cell)| {
            debug!(
                "Cell {}: width {:.4}, height {:.4}",
                key, cell.width, cell.height
            );
            let name = rigid_name(key);
            RigidBodyDescriptor {
                key,
                name_e: name.clone(),
                name,
                location: cell.frame.center,
                rotation: cell.rotation,
                size: DVec3::new(config.rigid_thickness, cell.width, cell.height / 2.0),
                shape: RigidShape::Box,
                dynamics: DynamicsMode::Dynamic,
                bone: bones[key].name.clone(),
            }
        })
        .collect();

    let mut joints = Vec::with_capacity(2 * cells.len());
    for (key, cell) in cells.iter() {
        // The waist row hangs from the bones, not from a body above it
        if key.row > 0 {
            joints.push(JointDescriptor::weld(
                JointKind::Vertical,
                key,
                bones[key].head,
                cell.rotation,
                GridKey::new(key.column, key.row - 1),
                key,
            ));
        }

        joints.push(JointDescriptor::weld(
            JointKind::Horizontal,
            key,
            cell.frame.center + cell.frame.z_axis * cell.width,
            cell.rotation,
            key,
            GridKey::new(bones.ring_next(key.column), key.row),
        ));
    }

    info!(
        "Synthesized {} rigid bodies and {} joints ({} columns x {} rows)",
        rigid_bodies.len(),
        joints.len(),
        bones.columns(),
        bones.rows()
    );

    Ok(PhysicsPlan {
        origin: tube.origin,
        axis: tube.axis,
        rigid_bodies,
        joints,
    })
}
