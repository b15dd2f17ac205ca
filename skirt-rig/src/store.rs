//! Scene store and commit phase
//!
//! Plans are computed in full before anything touches the scene. Committing
//! checks every name and reference up front, then hands the batch to the
//! store in dependency order: empties before the bones whose constraints
//! target them, rigid bodies before the joints that link them.

use std::collections::BTreeMap;

use hashbrown::HashSet;
use serde::Serialize;
use tracing::{debug, info};

use crate::descriptor::{JointDescriptor, RigidBodyDescriptor};
use crate::error::{Result, RigError};
use crate::physics::PhysicsPlan;
use crate::skeleton::{BoneSpec, EmptySpec, IkConstraintSpec, SkeletonPlan};

/// Host scene receiving committed plans
pub trait SceneStore {
    /// An object (empty, rigid body, joint, armature) with this name exists
    fn has_object(&self, name: &str) -> bool;

    /// `armature` already owns a bone with this name
    fn has_bone(&self, armature: &str, name: &str) -> bool;

    fn create_empty(&mut self, empty: &EmptySpec) -> Result<()>;

    /// Create an edit bone, creating the armature on first use
    fn create_bone(&mut self, armature: &str, bone: &BoneSpec) -> Result<()>;

    fn create_ik_constraint(&mut self, armature: &str, constraint: &IkConstraintSpec) -> Result<()>;

    fn create_rigid_body(&mut self, body: &RigidBodyDescriptor) -> Result<()>;

    fn create_joint(&mut self, joint: &JointDescriptor) -> Result<()>;
}

fn dangling(what: &str, owner: &str, name: &str) -> RigError {
    RigError::InvalidSelection(format!("{} '{}' references missing '{}'", what, owner, name))
}

fn already_exists(name: &str) -> RigError {
    RigError::InvalidSelection(format!("'{}' already exists in the scene", name))
}

/// Commit a skeleton plan
pub fn commit_skeleton(plan: &SkeletonPlan, store: &mut impl SceneStore) -> Result<()> {
    let bones: HashSet<&str> = plan.bones.iter().map(|b| b.name.as_str()).collect();
    let empties: HashSet<&str> = plan.empties.iter().map(|e| e.name.as_str()).collect();

    for bone in &plan.bones {
        if let Some(parent) = bone.parent.as_deref().filter(|p| !bones.contains(p)) {
            return Err(dangling("bone", &bone.name, parent));
        }
        if store.has_bone(&plan.armature, &bone.name) {
            return Err(already_exists(&bone.name));
        }
    }
    for constraint in &plan.constraints {
        if !bones.contains(constraint.bone.as_str()) {
            return Err(dangling("IK constraint", &constraint.bone, &constraint.bone));
        }
        if !empties.contains(constraint.target.as_str()) {
            return Err(dangling("IK constraint", &constraint.bone, &constraint.target));
        }
    }
    if let Some(empty) = plan.empties.iter().find(|e| store.has_object(&e.name)) {
        return Err(already_exists(&empty.name));
    }

    for empty in &plan.empties {
        store.create_empty(empty)?;
    }
    for bone in &plan.bones {
        store.create_bone(&plan.armature, bone)?;
    }
    for constraint in &plan.constraints {
        store.create_ik_constraint(&plan.armature, constraint)?;
    }

    info!(
        "Committed armature '{}': {} bones, {} empties, {} IK constraints",
        plan.armature,
        plan.bones.len(),
        plan.empties.len(),
        plan.constraints.len()
    );
    Ok(())
}

/// Commit a physics plan
pub fn commit_physics(plan: &PhysicsPlan, store: &mut impl SceneStore) -> Result<()> {
    let rigids: HashSet<&str> = plan.rigid_bodies.iter().map(|r| r.name.as_str()).collect();

    for joint in &plan.joints {
        for rigid in [&joint.rigid_a, &joint.rigid_b].into_iter().flatten() {
            if !rigids.contains(rigid.as_str()) {
                return Err(dangling("joint", &joint.name, rigid));
            }
        }
    }

    let names = plan
        .rigid_bodies
        .iter()
        .map(|r| r.name.as_str())
        .chain(plan.joints.iter().map(|j| j.name.as_str()));
    for name in names {
        if store.has_object(name) {
            return Err(already_exists(name));
        }
    }

    for body in &plan.rigid_bodies {
        store.create_rigid_body(body)?;
    }
    for joint in &plan.joints {
        store.create_joint(joint)?;
    }

    info!(
        "Committed {} rigid bodies and {} joints",
        plan.rigid_bodies.len(),
        plan.joints.len()
    );
    Ok(())
}

/// Bones and constraints of one armature object
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArmatureRecord {
    pub bones: Vec<BoneSpec>,
    pub constraints: Vec<IkConstraintSpec>,
}

/// In-memory scene that records every committed object
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneRecord {
    pub armatures: BTreeMap<String, ArmatureRecord>,
    pub empties: Vec<EmptySpec>,
    pub rigid_bodies: Vec<RigidBodyDescriptor>,
    pub joints: Vec<JointDescriptor>,
    #[serde(skip)]
    objects: HashSet<String>,
}

impl SceneRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn claim(&mut self, name: &str) -> Result<()> {
        if self.objects.insert(name.to_string()) {
            Ok(())
        } else {
            Err(already_exists(name))
        }
    }
}

impl SceneStore for SceneRecord {
    fn has_object(&self, name: &str) -> bool {
        self.objects.contains(name)
    }

    fn has_bone(&self, armature: &str, name: &str) -> bool {
        self.armatures
            .get(armature)
            .is_some_and(|a| a.bones.iter().any(|b| b.name == name))
    }

    fn create_empty(&mut self, empty: &EmptySpec) -> Result<()> {
        self.claim(&empty.name)?;
        debug!("Empty '{}' at {:?}", empty.name, empty.location);
        self.empties.push(empty.clone());
        Ok(())
    }

    fn create_bone(&mut self, armature: &str, bone: &BoneSpec) -> Result<()> {
        if !self.armatures.contains_key(armature) {
            self.claim(armature)?;
        }
        if self.has_bone(armature, &bone.name) {
            return Err(already_exists(&bone.name));
        }
        self.armatures
            .entry(armature.to_string())
            .or_default()
            .bones
            .push(bone.clone());
        Ok(())
    }

    fn create_ik_constraint(&mut self, armature: &str, constraint: &IkConstraintSpec) -> Result<()> {
        if !self.has_bone(armature, &constraint.bone) {
            return Err(dangling("IK constraint", &constraint.bone, &constraint.bone));
        }
        if !self.has_object(&constraint.target) {
            return Err(dangling("IK constraint", &constraint.bone, &constraint.target));
        }
        self.armatures
            .entry(armature.to_string())
            .or_default()
            .constraints
            .push(constraint.clone());
        Ok(())
    }

    fn create_rigid_body(&mut self, body: &RigidBodyDescriptor) -> Result<()> {
        self.claim(&body.name)?;
        self.rigid_bodies.push(body.clone());
        Ok(())
    }

    fn create_joint(&mut self, joint: &JointDescriptor) -> Result<()> {
        for rigid in [&joint.rigid_a, &joint.rigid_b].into_iter().flatten() {
            if !self.has_object(rigid) {
                return Err(dangling("joint", &joint.name, rigid));
            }
        }
        self.claim(&joint.name)?;
        self.joints.push(joint.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExtractConfig, PhysicsConfig, SkeletonConfig};
    use crate::extract::extract_columns;
    use crate::locator::{BonePattern, locate_bones};
    use crate::physics::synthesize;
    use crate::skeleton::build_skeleton;
    use crate::testing::{tube_bones, tube_mesh};

    fn skeleton_plan() -> SkeletonPlan {
        let mesh = tube_mesh(4, 3);
        let extract = ExtractConfig {
            n_step_hori: 1,
            n_step_vert: 1,
            ..ExtractConfig::default()
        };
        let grid = extract_columns(&mesh, &extract).unwrap();
        build_skeleton(&mesh, &grid, &SkeletonConfig::default()).unwrap()
    }

    fn physics_plan() -> PhysicsPlan {
        let grid = locate_bones(&tube_bones(4, 3), &BonePattern::default()).unwrap();
        synthesize(&grid, &PhysicsConfig::default()).unwrap()
    }

    #[test]
    fn test_commit_skeleton_records_everything() {
        let plan = skeleton_plan();
        let mut scene = SceneRecord::new();
        commit_skeleton(&plan, &mut scene).unwrap();

        let armature = &scene.armatures["S_skelton"];
        assert_eq!(armature.bones.len(), 8);
        assert_eq!(armature.constraints.len(), 8);
        assert_eq!(scene.empties.len(), 8);
        assert!(scene.has_object("S_skelton"));
        assert!(scene.has_object("SE_3_2"));
        assert!(scene.has_bone("S_skelton", "SB_3_1"));
    }

    #[test]
    fn test_commit_physics_records_everything() {
        let plan = physics_plan();
        let mut scene = SceneRecord::new();
        commit_physics(&plan, &mut scene).unwrap();

        assert_eq!(scene.rigid_bodies.len(), 12);
        assert_eq!(scene.joints.len(), 8 + 12);
        assert!(scene.has_object("Rigid_SB_0_0"));
        assert!(scene.has_object("Joint_SB_H_3_2"));
    }

    #[test]
    fn test_rerun_is_rejected_without_changes() {
        let plan = physics_plan();
        let mut scene = SceneRecord::new();
        commit_physics(&plan, &mut scene).unwrap();

        let err = commit_physics(&plan, &mut scene).unwrap_err();
        assert!(matches!(err, RigError::InvalidSelection(_)));
        assert_eq!(scene.rigid_bodies.len(), 12);
        assert_eq!(scene.joints.len(), 20);

        let skeleton = skeleton_plan();
        commit_skeleton(&skeleton, &mut scene).unwrap();
        let err = commit_skeleton(&skeleton, &mut scene).unwrap_err();
        assert!(matches!(err, RigError::InvalidSelection(_)));
        assert_eq!(scene.empties.len(), 8);
    }

    #[test]
    fn test_dangling_joint_reference() {
        let mut plan = physics_plan();
        plan.joints[0].rigid_b = Some("Rigid_SB_9_9".to_string());

        let mut scene = SceneRecord::new();
        let err = commit_physics(&plan, &mut scene).unwrap_err();
        assert!(matches!(err, RigError::InvalidSelection(msg) if msg.contains("Rigid_SB_9_9")));
        assert!(scene.rigid_bodies.is_empty());
    }

    #[test]
    fn test_dangling_ik_target() {
        let mut plan = skeleton_plan();
        plan.constraints[0].target = "SE_7_7".to_string();

        let mut scene = SceneRecord::new();
        let err = commit_skeleton(&plan, &mut scene).unwrap_err();
        assert!(matches!(err, RigError::InvalidSelection(_)));
        assert!(scene.empties.is_empty());
        assert!(scene.armatures.is_empty());
    }

    #[test]
    fn test_direct_joint_without_rigids_fails() {
        let plan = physics_plan();
        let mut scene = SceneRecord::new();
        let err = scene.create_joint(&plan.joints[0]).unwrap_err();
        assert!(matches!(err, RigError::InvalidSelection(_)));
    }

    #[test]
    fn test_json_output() {
        let mut scene = SceneRecord::new();
        commit_skeleton(&skeleton_plan(), &mut scene).unwrap();
        commit_physics(&physics_plan(), &mut scene).unwrap();

        let json = scene.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rigid_bodies"].as_array().unwrap().len(), 12);
        assert_eq!(value["rigid_bodies"][0]["shape"], "BOX");
        assert_eq!(value["rigid_bodies"][0]["dynamics"], "DYNAMIC");
        assert_eq!(value["armatures"]["S_skelton"]["bones"][0]["name"], "SB_0_0");
        assert!(value.get("objects").is_none());
    }
}
