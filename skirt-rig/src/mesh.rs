//! Cloth mesh input and vertex adjacency

use glam::{DAffine3, DVec3};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::{Result, RigError};

/// Cloth mesh as read from the scene
///
/// Positions are in mesh-local space; `world` is the mesh object's transform.
#[derive(Debug, Clone)]
pub struct ClothMesh {
    pub positions: Vec<DVec3>,
    pub edges: Vec<[u32; 2]>,
    pub world: DAffine3,
}

impl ClothMesh {
    pub fn new(positions: Vec<DVec3>, edges: Vec<[u32; 2]>) -> Self {
        Self {
            positions,
            edges,
            world: DAffine3::IDENTITY,
        }
    }

    pub fn with_world(mut self, world: DAffine3) -> Self {
        self.world = world;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// World-space position of a vertex
    pub fn world_position(&self, index: u32) -> DVec3 {
        self.world.transform_point3(self.positions[index as usize])
    }
}

/// Undirected adjacency plus per-vertex elevation along an up direction
#[derive(Debug, Clone)]
pub struct MeshTopology {
    neighbors: Vec<BTreeSet<u32>>,
    elevation: Vec<f64>,
}

impl MeshTopology {
    /// Build adjacency from the edge list and measure elevations in world space
    pub fn build(mesh: &ClothMesh, up: DVec3) -> Result<Self> {
        let count = mesh.vertex_count();
        let mut neighbors = vec![BTreeSet::new(); count];

        for (i, &[a, b]) in mesh.edges.iter().enumerate() {
            if a as usize >= count || b as usize >= count {
                return Err(RigError::topology(format!(
                    "edge {} ({}, {}) references a vertex out of range (vertex count {})",
                    i, a, b, count
                )));
            }
            if a == b {
                return Err(RigError::topology(format!("edge {} is a self-loop on {}", i, a)));
            }
            neighbors[a as usize].insert(b);
            neighbors[b as usize].insert(a);
        }

        let elevation = (0..count as u32)
            .map(|v| mesh.world_position(v).dot(up))
            .collect();

        Ok(Self {
            neighbors,
            elevation,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn neighbors(&self, v: u32) -> &BTreeSet<u32> {
        &self.neighbors[v as usize]
    }

    pub fn degree(&self, v: u32) -> usize {
        self.neighbors[v as usize].len()
    }

    pub fn elevation(&self, v: u32) -> f64 {
        self.elevation[v as usize]
    }

    /// Neighbours ordered highest first; equal elevations keep the lower index first
    pub fn sorted_neighbors(&self, v: u32) -> Vec<u32> {
        let mut sorted: Vec<u32> = self.neighbors(v).iter().copied().collect();
        sorted.sort_by(|&a, &b| self.cmp_higher_first(a, b));
        sorted
    }

    /// Lowest neighbour; equal elevations resolve to the lower index
    pub fn lowest_neighbor(&self, v: u32) -> Option<u32> {
        self.neighbors(v).iter().copied().min_by(|&a, &b| {
            self.elevation(a)
                .total_cmp(&self.elevation(b))
                .then(a.cmp(&b))
        })
    }

    fn cmp_higher_first(&self, a: u32, b: u32) -> Ordering {
        self.elevation(b)
            .total_cmp(&self.elevation(a))
            .then(a.cmp(&b))
    }
}
