//! Synchro Data CLI - Export baked scenes to `.dat` files and inspect them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use synchro_data::{
    scene::{BakedScene, SceneProvider},
    schema::{ExportRequest, SceneDescription},
    synchro::{ObjectType, SynchroReader, export_to_file},
};

#[derive(Parser)]
#[command(
    name = "synchro-data",
    version,
    about = "Export camera and object animation to Synchro Data (.dat)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export a baked scene (JSON) to a .dat file
    Export {
        /// Scene description file
        scene: PathBuf,
        /// Output path (defaults to the scene path with a .dat extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Start frame (defaults to the scene's start frame)
        #[arg(long)]
        start: Option<i32>,
        /// End frame (defaults to the scene's end frame)
        #[arg(long)]
        end: Option<i32>,
        /// World scale stored in the header
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
        /// Use the scene's frame range regardless of --start/--end
        #[arg(long)]
        scene_frame_range: bool,
        /// Export every object instead of only the selected ones
        #[arg(long)]
        all_objects: bool,
    },
    /// Print header, directory and first records of a .dat file
    Inspect {
        /// File to inspect
        file: PathBuf,
    },
    /// Print an example scene description
    Example,
}

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Export {
            scene,
            output,
            start,
            end,
            scale,
            scene_frame_range,
            all_objects,
        } => {
            let output = output.unwrap_or_else(|| scene.with_extension("dat"));
            let mut baked = BakedScene::load(&scene)
                .with_context(|| format!("Failed to load scene {:?}", scene))?;

            let render = baked.render_settings();
            let request = ExportRequest {
                frame_start: start.unwrap_or(render.frame_start),
                frame_end: end.unwrap_or(render.frame_end),
                world_scale: scale,
                only_selected: !all_objects,
                use_scene_frame_range: scene_frame_range,
            };

            let started = Instant::now();
            let stats = export_to_file(&output, &mut baked, &request)
                .with_context(|| format!("Failed to export {:?}", output))?;

            println!("Wrote {:?}", output);
            println!("  {}", stats);
            println!("  Time: {:.2}s", started.elapsed().as_secs_f32());
        }
        Command::Inspect { file } => inspect(&file)?,
        Command::Example => {
            println!(
                "{}",
                serde_json::to_string_pretty(&SceneDescription::example())?
            );
        }
    }

    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let size = fs::metadata(path)
        .with_context(|| format!("Failed to stat {:?}", path))?
        .len();
    let mut reader =
        SynchroReader::open(path).with_context(|| format!("Failed to read {:?}", path))?;

    let header = reader.header().clone();
    println!("Synchro Data: {:?} ({} bytes)", path, size);
    println!("==============");
    println!(
        "Frames: {}..={} ({} per object) at {} fps",
        header.start_frame,
        header.start_frame.saturating_add(header.frame_count),
        header.records_per_object(),
        header.fps
    );
    println!(
        "Resolution: {}x{}, pixel aspect {}, scale {}",
        header.width, header.height, header.pixel_aspect, header.scale
    );
    println!();

    for i in 0..reader.object_count() {
        let entry = *reader.entry(i);
        let kind = match entry.object_type {
            ObjectType::Camera => "camera",
            ObjectType::Generic => "generic",
        };
        println!(
            "  [{}] {} ({}) name@{} data@{}",
            i,
            reader.name(i),
            kind,
            entry.name_offset,
            entry.data_offset
        );

        let first = reader.read_record(i, 0)?;
        println!("      translation: {:?}", first.translation);
        if let Some(camera) = first.camera {
            println!(
                "      fov: {}, focus: {}, shutter: {}",
                camera.fov, camera.focus, camera.motion_blur
            );
        }
    }

    Ok(())
}
