//! Scene access for the exporter.
//!
//! The exporter never talks to a host application directly. Everything it
//! needs - the ordered object list, world matrices, camera intrinsics, render
//! settings and the current frame - goes through [`SceneProvider`].
//! [`BakedScene`] is the in-memory implementation used by the CLI and tests.

mod baked;

pub use baked::BakedScene;

use glam::Mat4;

use crate::schema::{CameraLens, RenderSettings};

/// Stable handle of an object inside its provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// Object type as seen by the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Camera,
    Generic,
}

/// An object scheduled for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
}

impl ExportObject {
    pub fn is_camera(&self) -> bool {
        self.kind == ObjectKind::Camera
    }
}

/// Host scene seen through the exporter's eyes.
///
/// Implementations must keep the object order stable for the duration of an
/// export. Matrix and lens queries answer for the frame last passed to
/// [`SceneProvider::set_frame`].
pub trait SceneProvider {
    /// Render settings (fps, resolution, pixel aspect, shutter, frame range).
    fn render_settings(&self) -> RenderSettings;

    /// Objects in selection order. With `only_selected == false` every object
    /// of the scene is returned, in scene order.
    fn objects(&self, only_selected: bool) -> Vec<ExportObject>;

    /// Move the current frame. Evaluation of transforms follows.
    fn set_frame(&mut self, frame: i32);

    /// Current frame.
    fn current_frame(&self) -> i32;

    /// World matrix of an object at the current frame.
    fn world_matrix(&self, id: ObjectId) -> Option<Mat4>;

    /// Camera intrinsics at the current frame. `None` for non-cameras and
    /// for cameras missing lens data.
    fn camera_lens(&self, id: ObjectId) -> Option<CameraLens>;
}
