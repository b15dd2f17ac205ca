//! Named-bone grid locator
//!
//! Rebuilds the skirt grid from an armature. Bones written by the skeleton
//! pipeline carry their key; bones from an existing scene are matched by
//! name against the configured pattern.

use hashbrown::HashMap;
use regex::Regex;
use tracing::{info, warn};

use crate::armature::ArmatureBone;
use crate::config::PhysicsConfig;
use crate::error::{Result, RigError};
use crate::grid::{Grid, GridKey};

/// Bones indexed by grid cell
pub type BoneGrid = Grid<ArmatureBone>;

/// Bone name pattern with (column, row) capture groups
#[derive(Debug, Clone)]
pub struct BonePattern {
    regex: Regex,
}

impl BonePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        PhysicsConfig {
            bone_pattern: pattern.to_string(),
            ..PhysicsConfig::default()
        }
        .compile_pattern()
        .map(|regex| Self { regex })
    }

    pub fn from_config(config: &PhysicsConfig) -> Result<Self> {
        Ok(Self {
            regex: config.compile_pattern()?,
        })
    }

    /// Grid key embedded in `name`, if any
    pub fn parse(&self, name: &str) -> Option<GridKey> {
        let captures = self.regex.captures(name)?;
        let column = captures.get(1)?.as_str().parse().ok()?;
        let row = captures.get(2)?.as_str().parse().ok()?;
        Some(GridKey::new(column, row))
    }
}

impl Default for BonePattern {
    fn default() -> Self {
        Self {
            regex: PhysicsConfig::default()
                .compile_pattern()
                .expect("default bone pattern compiles"),
        }
    }
}

/// Gather skirt bones into a dense grid
///
/// Bones that neither carry a key nor match the pattern are ignored. The
/// matched cells must cover `[0, columns) x [0, rows)` exactly once.
pub fn locate_bones(bones: &[ArmatureBone], pattern: &BonePattern) -> Result<BoneGrid> {
    if bones.is_empty() {
        return Err(RigError::InvalidSelection(
            "armature has no bones".to_string(),
        ));
    }

    let mut cells: HashMap<GridKey, &ArmatureBone> = HashMap::new();
    for bone in bones {
        let Some(key) = bone.key.or_else(|| pattern.parse(&bone.name)) else {
            continue;
        };
        if let Some(previous) = cells.insert(key, bone) {
            return Err(RigError::DuplicateGridCell {
                column: key.column,
                row: key.row,
                first: previous.name.clone(),
                second: bone.name.clone(),
            });
        }
    }

    if cells.is_empty() {
        return Err(RigError::MissingGridCell { column: 0, row: 0 });
    }

    // Size the grid only once the keys are known to fill it
    let columns = cells.keys().map(|k| k.column).max().and_then(|c| c.checked_add(1));
    let rows = cells.keys().map(|k| k.row).max().and_then(|r| r.checked_add(1));
    let (columns, rows) = match (columns, rows) {
        (Some(c), Some(r)) if c.checked_mul(r) == Some(cells.len()) => (c, r),
        _ => return Err(first_missing(&cells)),
    };

    let mut grid = Vec::with_capacity(columns);
    for column in 0..columns {
        let mut chain = Vec::with_capacity(rows);
        for row in 0..rows {
            let key = GridKey::new(column, row);
            let bone = cells
                .get(&key)
                .ok_or(RigError::MissingGridCell { column, row })?;

            if row > 0 {
                let above = cells[&GridKey::new(column, row - 1)].name.as_str();
                if let Some(parent) = bone.parent.as_deref().filter(|p| *p != above) {
                    warn!(
                        "Bone '{}' at {} is parented to '{}', not the bone above ('{}')",
                        bone.name, key, parent, above
                    );
                }
            }
            chain.push((*bone).clone());
        }
        grid.push(chain);
    }

    info!(
        "Located {} skirt bones ({} columns x {} rows) out of {}",
        columns * rows,
        columns,
        rows,
        bones.len()
    );
    Grid::from_columns(grid)
}

/// First absent key in column-major order
///
/// The keys are distinct and do not fill their bounding rectangle, so one of
/// the first `cells.len() + 1` keys of that rectangle is absent.
fn first_missing(cells: &HashMap<GridKey, &ArmatureBone>) -> RigError {
    let max_column = cells.keys().map(|k| k.column).max().unwrap_or(0);
    let max_row = cells.keys().map(|k| k.row).max().unwrap_or(0);
    let key = (0..=max_column)
        .flat_map(|column| (0..=max_row).map(move |row| GridKey::new(column, row)))
        .take(cells.len() + 1)
        .find(|key| !cells.contains_key(key))
        .unwrap_or(GridKey::new(0, 0));
    RigError::MissingGridCell {
        column: key.column,
        row: key.row,
    }
}
