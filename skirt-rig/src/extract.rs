//! Grid extraction from a cloth mesh
//!
//! Recovers the implicit column/row structure of a skirt strip mesh:
//!
//! 1. climb from vertex 0 to a local elevation maximum,
//! 2. walk the waist ridge to list one top vertex per full-resolution column,
//! 3. descend each sampled column to its degree-3 hem vertex.
//!
//! The traversal is greedy. A noisy waist can stop the climb on a local
//! maximum that is not on the top ring; that is accepted, not corrected.

use hashbrown::HashSet;
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::error::{Result, RigError};
use crate::grid::Grid;
use crate::mesh::{ClothMesh, MeshTopology};


/// Hem vertices of a clean strip grid have exactly this many neighbours
pub const TERMINAL_DEGREE: usize = 3;

/// Vertex indices of the sampled grid, columns ordered along the waist,
/// rows ordered from the waist down
pub type ColumnGrid = Grid<u32>;

/// Extract the sampled column grid of a cloth mesh
pub fn extract_columns(mesh: &ClothMesh, config: &ExtractConfig) -> Result<ColumnGrid> {
    config.validate()?;
    if mesh.positions.is_empty() {
        return Err(RigError::InvalidSelection(
            "cloth mesh has no vertices".to_string(),
        ));
    }

    info!("Found {} vertices.", mesh.vertex_count());
    info!("Found {} edges.", mesh.edges.len());

    let topology = MeshTopology::build(mesh, config.up_dir())?;

    let root = find_top_vertex(&topology, 0)?;
    let top_row = trace_top_row(&topology, root);
    info!("Found {} columns.", top_row.len());
    if top_row.len() < 3 {
        warn!(
            "Waist ridge from vertex {} has only {} vertices; the mesh may not be a closed strip",
            root,
            top_row.len()
        );
    }

    let mut columns = Vec::new();
    for &seed in top_row.iter().step_by(config.n_step_hori) {
        let path = descend_column(&topology, seed)?;
        let column: Vec<u32> = path.into_iter().step_by(config.n_step_vert).collect();
        debug!("Column {}: {:?}", columns.len(), column);
        columns.push(column);
    }

    let grid = Grid::from_columns(columns)?;
    info!(
        "Number of selected vertices: {} ({} columns x {} rows)",
        grid.len(),
        grid.columns(),
        grid.rows()
    );
    Ok(grid)
}

/// Greedy ascent: move to the highest neighbour until none is higher
pub fn find_top_vertex(topology: &MeshTopology, start: u32) -> Result<u32> {
    let mut current = start;
    // Strict ascent visits each vertex at most once
    for _ in 0..=topology.vertex_count() {
        let highest = topology
            .sorted_neighbors(current)
            .first()
            .copied()
            .ok_or_else(|| {
                RigError::topology(format!("vertex {} has no neighbours", current))
            })?;

        if topology.elevation(highest) > topology.elevation(current) {
            current = highest;
        } else {
            return Ok(current);
        }
    }

    Err(RigError::topology(format!(
        "ascent from vertex {} did not reach a local maximum",
        start
    )))
}

/// Walk the waist ridge starting at `root`
///
/// Only the two highest neighbours are candidates, so the walk follows the
/// ring instead of stepping down a column. It stops when both are visited.
pub fn trace_top_row(topology: &MeshTopology, root: u32) -> Vec<u32> {
    let mut row = vec![root];
    let mut visited = HashSet::new();
    visited.insert(root);

    let mut current = root;
    loop {
        let next = topology
            .sorted_neighbors(current)
            .into_iter()
            .take(2)
            .find(|candidate| !visited.contains(candidate));

        match next {
            Some(v) => {
                visited.insert(v);
                row.push(v);
                current = v;
            }
            None => break,
        }
    }

    row
}

/// Descend from a top vertex to the hem, always taking the lowest neighbour
///
/// The returned path includes `seed` and ends on the first degree-3 vertex.
pub fn descend_column(topology: &MeshTopology, seed: u32) -> Result<Vec<u32>> {
    let mut path = vec![seed];
    let mut current = seed;

    for _ in 0..topology.vertex_count() {
        let next = topology.lowest_neighbor(current).ok_or_else(|| {
            RigError::topology(format!("vertex {} has no neighbours", current))
        })?;
        path.push(next);

        if topology.degree(next) == TERMINAL_DEGREE {
            return Ok(path);
        }
        current = next;
    }

    Err(RigError::topology(format!(
        "column from vertex {} never reached a degree-{} hem vertex",
        seed, TERMINAL_DEGREE
    )))
}
