//! Skirt rigging for MMD models
//!
//! Two batch pipelines over a closed tube of cloth:
//! - `run_skirt_bones`: cloth mesh to bone chains, IK target empties, and
//!   IK constraints
//! - `run_skirt_physics`: skirt bones to box rigid bodies welded vertically
//!   down each column and horizontally around each ring
//!
//! # Modules
//!
//! - [`extract`] - Column/row vertex grid from mesh topology
//! - [`skeleton`] - Bone, empty, and IK constraint planning
//! - [`locator`] - Dense bone grid from bone names or keys
//! - [`physics`] - Rigid body and joint synthesis
//! - [`store`] - Scene store trait and the commit phase

pub mod armature;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod extract;
pub mod grid;
pub mod locator;
pub mod mesh;
pub mod physics;
pub mod pipeline;
pub mod skeleton;
pub mod store;

#[cfg(test)]
mod testing;

pub use armature::{Armature, ArmatureBone};
pub use config::{ExtractConfig, PhysicsConfig, RigConfig, SkeletonConfig};
pub use descriptor::{
    DynamicsMode, JointDescriptor, JointKind, RigidBodyDescriptor, RigidShape, joint_name,
    rigid_name,
};
pub use error::{Result, RigError};
pub use extract::{ColumnGrid, extract_columns};
pub use grid::{Grid, GridKey};
pub use locator::{BoneGrid, BonePattern, locate_bones};
pub use mesh::{ClothMesh, MeshTopology};
pub use physics::{CellGeometry, PhysicsPlan, synthesize};
pub use pipeline::{run_skirt_bones, run_skirt_physics};
pub use skeleton::{BoneSpec, EmptySpec, IkConstraintSpec, SkeletonPlan, build_skeleton};
pub use store::{ArmatureRecord, SceneRecord, SceneStore, commit_physics, commit_skeleton};
