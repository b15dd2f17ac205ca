//! Skirt skeleton builder
//!
//! Turns the sampled vertex grid into one bone chain per column. Every vertex
//! below the waist gets an empty parented to it, and each bone carries an IK
//! constraint reaching for the empty at its tail. The waist row is the static
//! attachment point, so it has no empty.

use glam::DVec3;
use serde::Serialize;
use tracing::info;

use crate::armature::{Armature, ArmatureBone};
use crate::config::SkeletonConfig;
use crate::error::{Result, RigError};
use crate::extract::ColumnGrid;
use crate::grid::GridKey;
use crate::mesh::ClothMesh;

/// Bone `{prefix}B_{c}_{r}` spanning rows r and r + 1
pub fn bone_name(prefix: &str, key: GridKey) -> String {
    format!("{}B_{}_{}", prefix, key.column, key.row)
}

/// IK target empty `{prefix}E_{c}_{r}` at row r
pub fn empty_name(prefix: &str, key: GridKey) -> String {
    format!("{}E_{}_{}", prefix, key.column, key.row)
}

/// Armature object receiving the bones (spelling kept for existing scenes)
pub fn armature_name(prefix: &str) -> String {
    format!("{}_skelton", prefix)
}

/// Edit bone to create, in armature space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoneSpec {
    pub key: GridKey,
    pub name: String,
    pub head: DVec3,
    pub tail: DVec3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// IK target placeholder, in world space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptySpec {
    pub key: GridKey,
    pub name: String,
    pub location: DVec3,
    pub radius: f64,
    pub collection: String,
    /// Mesh vertex the empty is vertex-parented to
    pub parent_vertex: u32,
}

/// IK constraint on a pose bone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IkConstraintSpec {
    pub key: GridKey,
    pub bone: String,
    pub target: String,
    pub chain_count: u32,
    pub iterations: u32,
}

/// Everything the skeleton pipeline hands to the scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkeletonPlan {
    pub armature: String,
    pub bones: Vec<BoneSpec>,
    pub empties: Vec<EmptySpec>,
    pub constraints: Vec<IkConstraintSpec>,
}

impl SkeletonPlan {
    /// Rest-pose bone records, keyed, as the physics pipeline reads them
    pub fn to_armature(&self) -> Armature {
        let bones = self
            .bones
            .iter()
            .map(|bone| ArmatureBone {
                name: bone.name.clone(),
                head: bone.head,
                tail: bone.tail,
                parent: bone.parent.clone(),
                key: Some(bone.key),
            })
            .collect();
        Armature { bones }
    }
}

/// Plan bones, empties, and IK constraints for a sampled column grid
pub fn build_skeleton(
    mesh: &ClothMesh,
    columns: &ColumnGrid,
    config: &SkeletonConfig,
) -> Result<SkeletonPlan> {
    config.validate()?;
    if columns.rows() < 2 {
        return Err(RigError::topology(format!(
            "columns have {} sampled row(s); at least 2 are needed for a bone",
            columns.rows()
        )));
    }

    let prefix = config.prefix.as_str();
    let offset = config.armature_offset();
    let mut bones = Vec::new();
    let mut empties = Vec::new();
    let mut constraints = Vec::new();

    for (key, &vertex) in columns.iter() {
        if key.row > 0 {
            empties.push(EmptySpec {
                key,
                name: empty_name(prefix, key),
                location: mesh.world_position(vertex),
                radius: config.empty_radius,
                collection: config.collection.clone(),
                parent_vertex: vertex,
            });
        }

        if key.row + 1 >= columns.rows() {
            continue;
        }

        let below = GridKey::new(key.column, key.row + 1);
        let parent = (key.row > 0).then(|| bone_name(prefix, GridKey::new(key.column, key.row - 1)));
        let name = bone_name(prefix, key);

        bones.push(BoneSpec {
            key,
            name: name.clone(),
            head: mesh.world_position(vertex) - offset,
            tail: mesh.world_position(columns[below]) - offset,
            parent,
        });
        constraints.push(IkConstraintSpec {
            key,
            bone: name,
            target: empty_name(prefix, below),
            chain_count: config.ik_chain_count,
            iterations: config.ik_iterations,
        });
    }

    info!(
        "Planned {} bones, {} IK targets across {} columns",
        bones.len(),
        empties.len(),
        columns.columns()
    );

    Ok(SkeletonPlan {
        armature: armature_name(prefix),
        bones,
        empties,
        constraints,
    })
}
