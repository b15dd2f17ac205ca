//! Synthetic skirt fixtures shared by unit tests

use glam::DVec3;
use std::f64::consts::TAU;

use crate::armature::ArmatureBone;
use crate::mesh::ClothMesh;

/// Ring radius grows by this much per ring, so the tube flares like a skirt
const FLARE: f64 = 0.25;
const RING_DROP: f64 = 0.5;

/// Point on a flared tube: ring 0 is the waist at z = 0
pub fn tube_point(column: usize, columns: usize, ring: usize) -> DVec3 {
    let angle = TAU * column as f64 / columns as f64;
    let radius = 1.0 + FLARE * ring as f64;
    DVec3::new(
        radius * angle.cos(),
        radius * angle.sin(),
        -RING_DROP * ring as f64,
    )
}

/// Quad-strip tube, vertex index `ring * columns + column`
///
/// Waist and hem vertices have three neighbours, all others four.
pub fn tube_mesh(columns: usize, rings: usize) -> ClothMesh {
    let mut positions = Vec::with_capacity(columns * rings);
    for ring in 0..rings {
        for column in 0..columns {
            positions.push(tube_point(column, columns, ring));
        }
    }

    let index = |column: usize, ring: usize| (ring * columns + column) as u32;
    let mut edges = Vec::new();
    for ring in 0..rings {
        for column in 0..columns {
            edges.push([index(column, ring), index((column + 1) % columns, ring)]);
            if ring + 1 < rings {
                edges.push([index(column, ring), index(column, ring + 1)]);
            }
        }
    }

    ClothMesh::new(positions, edges)
}

/// Bones `SB_{i}_{j}` spanning ring j to ring j + 1 of a flared tube
pub fn tube_bones(columns: usize, rows: usize) -> Vec<ArmatureBone> {
    let mut bones = Vec::new();
    for i in 0..columns {
        for j in 0..rows {
            let mut bone = ArmatureBone::new(
                format!("SB_{}_{}", i, j),
                tube_point(i, columns, j),
                tube_point(i, columns, j + 1),
            );
            if j > 0 {
                bone = bone.with_parent(format!("SB_{}_{}", i, j - 1));
            }
            bones.push(bone);
        }
    }
    bones
}

pub fn assert_vec_near(actual: DVec3, expected: DVec3, tolerance: f64) {
    assert!(
        actual.abs_diff_eq(expected, tolerance),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}
