//! Armature, config, and scene record files

use anyhow::{Context, Result};
use skirt_rig::{Armature, RigConfig, SceneRecord};
use std::path::{Path, PathBuf};

/// Extension of scene records written next to their input
pub const SCENE_EXT: &str = "scene.json";

/// `skirt.obj` -> `skirt.scene.json`
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension(SCENE_EXT)
}

/// Load a config file, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<RigConfig> {
    match path {
        Some(path) => {
            tracing::debug!("Loading config {:?}", path);
            RigConfig::load(path).with_context(|| format!("Failed to load config: {:?}", path))
        }
        None => Ok(RigConfig::default()),
    }
}

/// Load a JSON armature (`{ "bones": [...] }`)
pub fn load_armature(input: &Path) -> Result<Armature> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read armature: {:?}", input))?;
    let armature = Armature::from_json(&content)
        .with_context(|| format!("Failed to parse armature: {:?}", input))?;
    tracing::info!("Loaded armature: {} bones", armature.bones.len());
    Ok(armature)
}

pub fn write_armature(output: &Path, armature: &Armature) -> Result<()> {
    let json = serde_json::to_string_pretty(armature)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write armature: {:?}", output))
}

pub fn write_scene(output: &Path, scene: &SceneRecord) -> Result<()> {
    let json = scene.to_json_pretty()?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write scene record: {:?}", output))
}
