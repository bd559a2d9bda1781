//! Export driver streaming a scene into a Synchro Data file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{debug, info, warn};

use super::frame::FrameRecord;
use super::layout::FileLayout;
use crate::scene::{ExportObject, SceneProvider};
use crate::schema::{ConfigError, ExportRequest};

/// Errors aborting an export. Nothing already written is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid export request: {0}")]
    Config(#[from] ConfigError),
    #[error("Camera '{name}' has no lens data")]
    MissingCameraData { name: String },
    #[error("Object '{name}' has no world transform at frame {frame}")]
    MissingTransform { name: String, frame: i32 },
}

/// Streams header, directory, names and frame records to a writer.
///
/// Usage:
/// ```ignore
/// let mut scene = BakedScene::load("scene.json")?;
/// let exporter = SynchroExporter::create("scene.dat")?;
/// let stats = exporter.export(&mut scene, &ExportRequest::default())?;
/// println!("{}", stats);
/// ```
pub struct SynchroExporter<W: Write> {
    writer: W,
    bytes_written: u64,
}

impl SynchroExporter<BufWriter<File>> {
    /// Create the output file.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SynchroExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bytes_written: 0,
        }
    }

    /// Export the scene and flush the writer.
    ///
    /// The scene's current frame is left at the last exported frame.
    pub fn export(
        mut self,
        scene: &mut dyn SceneProvider,
        request: &ExportRequest,
    ) -> Result<ExportStats, ExportError> {
        let render = scene.render_settings();
        request.validate(&render)?;

        let (frame_start, frame_end) = request.resolve_range(&render);
        if request.use_scene_frame_range
            && (request.frame_start, request.frame_end) != (frame_start, frame_end)
        {
            warn!(
                "Requested frames {}..={} replaced by scene range {}..={}",
                request.frame_start, request.frame_end, frame_start, frame_end
            );
        }

        let objects = scene.objects(request.only_selected);
        let layout = FileLayout::new(
            &objects,
            &render,
            frame_start,
            frame_end,
            request.world_scale,
        )?;
        info!(
            "Exporting {} objects, frames {}..={}, {} bytes",
            objects.len(),
            frame_start,
            frame_end,
            layout.total_size()
        );

        layout.write_to(&mut self.writer)?;
        self.bytes_written += layout.data_start() as u64;

        for object in &objects {
            debug!("Writing block for '{}' ({:?})", object.name, object.kind);
            for frame in frame_start..=frame_end {
                scene.set_frame(frame);
                let record = encode_frame(scene, object, render.motion_blur_shutter)?;
                record.write_to(&mut self.writer)?;
                self.bytes_written += record.byte_len() as u64;
            }
        }

        self.writer.flush()?;

        Ok(ExportStats {
            object_count: objects.len(),
            cameras: objects.iter().filter(|o| o.is_camera()).count(),
            frames_per_object: layout.header.records_per_object(),
            total_bytes: self.bytes_written,
        })
    }
}

/// Encode one object at the scene's current frame.
pub fn encode_frame(
    scene: &dyn SceneProvider,
    object: &ExportObject,
    motion_blur: f32,
) -> Result<FrameRecord, ExportError> {
    let world = scene
        .world_matrix(object.id)
        .ok_or_else(|| ExportError::MissingTransform {
            name: object.name.clone(),
            frame: scene.current_frame(),
        })?;

    if !object.is_camera() {
        return Ok(FrameRecord::generic(world));
    }

    let lens = scene
        .camera_lens(object.id)
        .ok_or_else(|| ExportError::MissingCameraData {
            name: object.name.clone(),
        })?;
    Ok(FrameRecord::camera(world, &lens, motion_blur))
}

/// Export to a file path. The request is validated before the file is created.
pub fn export_to_file<P: AsRef<Path>>(
    path: P,
    scene: &mut dyn SceneProvider,
    request: &ExportRequest,
) -> Result<ExportStats, ExportError> {
    request.validate(&scene.render_settings())?;
    SynchroExporter::create(path)?.export(scene, request)
}

/// Statistics from an export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportStats {
    /// Objects written.
    pub object_count: usize,
    /// How many of them are cameras.
    pub cameras: usize,
    /// Records per object.
    pub frames_per_object: usize,
    /// Total file size in bytes.
    pub total_bytes: u64,
}

impl std::fmt::Display for ExportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} objects ({} cameras), {} frames each, {} bytes total",
            self.object_count, self.cameras, self.frames_per_object, self.total_bytes
        )
    }
}
