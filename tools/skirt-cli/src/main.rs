//! skirt - MMD skirt rigging tool
//!
//! `skirt bones` turns a cloth mesh into bone chains with IK targets,
//! `skirt physics` turns skirt bones into welded box rigid bodies.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skirt_rig::{SceneRecord, commit_physics, commit_skeleton, run_skirt_bones, run_skirt_physics};
use std::path::PathBuf;

use skirt_cli::{default_output, load_armature, load_config, load_obj, write_armature, write_scene};

#[derive(Parser)]
#[command(name = "skirt")]
#[command(about = "MMD skirt bone and rigid body rigging")]
#[command(version)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build bone chains and IK targets from a skirt mesh
    Bones {
        /// Input cloth mesh (OBJ)
        input: PathBuf,

        /// Output scene record (default: <input>.scene.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to skirt.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Armature world translation (overrides skeleton.armature_offset)
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
        armature_world: Option<Vec<f64>>,

        /// Also write the planned bones as a JSON armature
        #[arg(long)]
        armature_out: Option<PathBuf>,
    },

    /// Build rigid bodies and joints from skirt bones
    Physics {
        /// Input armature (JSON)
        input: PathBuf,

        /// Output scene record (default: <input>.scene.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to skirt.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a config file
    Check {
        /// Path to skirt.toml
        #[arg(default_value = "skirt.toml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Bones {
            input,
            output,
            config,
            armature_world,
            armature_out,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(world) = armature_world {
                config.skeleton.armature_offset = [world[0], world[1], world[2]];
            }

            let output = output.unwrap_or_else(|| default_output(&input));
            tracing::info!("Rigging bones {:?} -> {:?}", input, output);

            let mesh = load_obj(&input)?;
            let plan = run_skirt_bones(&mesh, &config)
                .with_context(|| format!("Skirt bones failed for {:?}", input))?;

            let mut scene = SceneRecord::new();
            commit_skeleton(&plan, &mut scene)?;
            write_scene(&output, &scene)?;

            if let Some(path) = armature_out {
                write_armature(&path, &plan.to_armature())?;
                tracing::info!("Wrote armature {:?}", path);
            }
            tracing::info!("Done!");
        }

        Commands::Physics {
            input,
            output,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let output = output.unwrap_or_else(|| default_output(&input));
            tracing::info!("Rigging physics {:?} -> {:?}", input, output);

            let armature = load_armature(&input)?;
            let plan = run_skirt_physics(&armature.bones, &config)
                .with_context(|| format!("Skirt physics failed for {:?}", input))?;

            let mut scene = SceneRecord::new();
            commit_physics(&plan, &mut scene)?;
            write_scene(&output, &scene)?;
            tracing::info!("Done!");
        }

        Commands::Check { config } => {
            tracing::info!("Checking config {:?}", config);
            load_config(Some(&config))?;
            tracing::info!("Config is valid!");
        }
    }

    Ok(())
}
