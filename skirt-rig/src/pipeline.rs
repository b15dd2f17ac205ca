//! Pipeline entry points
//!
//! `run_skirt_bones` plans the skeleton for a cloth mesh; `run_skirt_physics`
//! plans rigid bodies and joints for an armature. Neither touches a scene:
//! commit the returned plan with [`crate::store`].

use tracing::info;

use crate::armature::ArmatureBone;
use crate::config::RigConfig;
use crate::error::{Result, RigError};
use crate::extract::extract_columns;
use crate::locator::{BonePattern, locate_bones};
use crate::mesh::ClothMesh;
use crate::physics::{PhysicsPlan, synthesize};
use crate::skeleton::{SkeletonPlan, build_skeleton};

/// Pipeline 1: cloth mesh to bone chains with IK targets
pub fn run_skirt_bones(mesh: &ClothMesh, config: &RigConfig) -> Result<SkeletonPlan> {
    config.validate()?;
    if mesh.vertex_count() == 0 {
        return Err(RigError::InvalidSelection("mesh has no vertices".to_string()));
    }

    let columns = extract_columns(mesh, &config.extract)?;
    let plan = build_skeleton(mesh, &columns, &config.skeleton)?;
    info!(
        "Skirt bones: {} columns x {} rows from {} vertices",
        columns.columns(),
        columns.rows(),
        mesh.vertex_count()
    );
    Ok(plan)
}

/// Pipeline 2: skirt bones to rigid bodies and weld joints
pub fn run_skirt_physics(bones: &[ArmatureBone], config: &RigConfig) -> Result<PhysicsPlan> {
    config.validate()?;
    if bones.is_empty() {
        return Err(RigError::InvalidSelection("armature has no bones".to_string()));
    }

    let pattern = BonePattern::from_config(&config.physics)?;
    let grid = locate_bones(bones, &pattern)?;
    synthesize(&grid, &config.physics)
}
