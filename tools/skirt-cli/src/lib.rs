//! skirt-cli library
//!
//! File loading and writing for the `skirt` binary, usable by other tools
//! that want to feed OBJ meshes or JSON armatures into the rigging pipelines.

pub mod files;
pub mod obj;

pub use files::{default_output, load_armature, load_config, write_armature, write_scene};
pub use obj::{load_obj, parse_obj};
