//! OBJ cloth mesh loading
//!
//! Only connectivity and positions matter for rigging: `v` lines give the
//! vertices, `f` polygons and `l` polylines give the edges. Texture and
//! normal references are ignored.

use anyhow::{Context, Result, bail};
use glam::DVec3;
use hashbrown::HashSet;
use skirt_rig::ClothMesh;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Load an OBJ file as a cloth mesh in world space
pub fn load_obj(input: &Path) -> Result<ClothMesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let mesh = parse_obj(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))?;

    tracing::info!(
        "Loaded OBJ mesh: {} vertices, {} edges",
        mesh.positions.len(),
        mesh.edges.len()
    );
    Ok(mesh)
}

/// Parse OBJ text into positions and deduplicated undirected edges
pub fn parse_obj(reader: impl BufRead) -> Result<ClothMesh> {
    let mut positions: Vec<DVec3> = Vec::new();
    let mut edges: Vec<[u32; 2]> = Vec::new();
    let mut seen: HashSet<[u32; 2]> = HashSet::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "v" if parts.len() >= 4 => {
                let mut coords = [0.0; 3];
                for (coord, part) in coords.iter_mut().zip(&parts[1..4]) {
                    *coord = part
                        .parse()
                        .with_context(|| format!("line {}: bad coordinate '{}'", line_no + 1, part))?;
                }
                positions.push(DVec3::from_array(coords));
            }
            kind @ ("f" | "l") => {
                let corners = parts[1..]
                    .iter()
                    .map(|token| parse_obj_index(token, positions.len()))
                    .collect::<Option<Vec<u32>>>()
                    .with_context(|| format!("line {}: bad vertex reference", line_no + 1))?;

                // Faces close back on their first corner, polylines do not
                let closing = (kind == "f" && corners.len() > 2).then(|| {
                    [corners[corners.len() - 1], corners[0]]
                });
                let pairs = corners
                    .windows(2)
                    .map(|w| [w[0], w[1]])
                    .chain(closing);

                for [a, b] in pairs {
                    if a == b {
                        continue;
                    }
                    let edge = [a.min(b), a.max(b)];
                    if seen.insert(edge) {
                        edges.push(edge);
                    }
                }
            }
            _ => {}
        }
    }

    if positions.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    Ok(ClothMesh::new(positions, edges))
}

/// Resolve an OBJ vertex reference ("v", "v/vt", "v/vt/vn", "v//vn")
///
/// Positive indices are 1-based, negative ones count back from the last
/// vertex defined so far.
fn parse_obj_index(token: &str, vertex_count: usize) -> Option<u32> {
    let index: i64 = token.split('/').next()?.parse().ok()?;
    let resolved = match index {
        0 => return None,
        i if i > 0 => i - 1,
        i => vertex_count as i64 + i,
    };
    if resolved < 0 || resolved >= vertex_count as i64 {
        return None;
    }
    u32::try_from(resolved).ok()
}
