//! Scene description types: render settings, camera data and baked objects.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Identity transform in row-major order.
pub const IDENTITY_ROWS: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Render settings of the scene being exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Frames per second.
    pub fps: f32,
    /// Output width in pixels.
    pub resolution_x: i32,
    /// Output height in pixels.
    pub resolution_y: i32,
    /// Horizontal pixel aspect.
    pub pixel_aspect_x: f32,
    /// Vertical pixel aspect.
    pub pixel_aspect_y: f32,
    /// Motion blur shutter, in frames.
    pub motion_blur_shutter: f32,
    /// First frame of the scene's own range.
    pub frame_start: i32,
    /// Last frame of the scene's own range.
    pub frame_end: i32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fps: 24.0,
            resolution_x: 1920,
            resolution_y: 1080,
            pixel_aspect_x: 1.0,
            pixel_aspect_y: 1.0,
            motion_blur_shutter: 0.5,
            frame_start: 1,
            frame_end: 250,
        }
    }
}

impl RenderSettings {
    /// Pixel aspect ratio as stored in the header.
    #[inline]
    pub fn pixel_aspect(&self) -> f32 {
        self.pixel_aspect_x / self.pixel_aspect_y
    }

    /// Validate render settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pixel_aspect_y == 0.0 {
            return Err(ConfigError::InvalidPixelAspect);
        }
        if self.fps.is_nan() || self.fps <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(self.fps));
        }
        Ok(())
    }
}

/// Camera intrinsics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraLens {
    /// Focal length in millimetres.
    pub lens: f32,
    /// Full field-of-view angle in radians.
    pub angle: f32,
    /// Depth-of-field focus distance.
    pub dof_distance: f32,
}

impl Default for CameraLens {
    fn default() -> Self {
        // 50mm lens on a 36mm sensor.
        Self {
            lens: 50.0,
            angle: 0.691_150_4,
            dof_distance: 10.0,
        }
    }
}

/// Object type in a baked scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectKindDescription {
    /// Any non-camera object (mesh, empty, light...).
    #[default]
    Generic,
    /// Camera with optional lens data. A camera without lens data cannot be exported.
    Camera {
        #[serde(default)]
        lens: Option<CameraLens>,
    },
}

/// World transform of an object from `frame` onwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformKey {
    /// Frame the key becomes active.
    pub frame: i32,
    /// World matrix, row-major (`matrix[row][column]`).
    pub matrix: [[f32; 4]; 4],
}

fn default_selected() -> bool {
    true
}

/// One object of a baked scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDescription {
    /// Object name, written to the name table.
    pub name: String,
    /// Whether the object is part of the selection.
    #[serde(default = "default_selected")]
    pub selected: bool,
    /// Object type and camera data.
    #[serde(default)]
    pub kind: ObjectKindDescription,
    /// Transform keys, in any order. No keys means identity.
    #[serde(default)]
    pub keys: Vec<TransformKey>,
}

/// Complete baked scene: render settings plus objects in selection order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

impl SceneDescription {
    /// Small scene with an animated camera and a static object.
    pub fn example() -> Self {
        let mut moved = IDENTITY_ROWS;
        moved[0][3] = 4.0;
        moved[2][3] = 1.5;

        Self {
            render: RenderSettings {
                frame_start: 1,
                frame_end: 48,
                ..Default::default()
            },
            objects: vec![
                ObjectDescription {
                    name: "Camera".to_string(),
                    selected: true,
                    kind: ObjectKindDescription::Camera {
                        lens: Some(CameraLens::default()),
                    },
                    keys: vec![
                        TransformKey {
                            frame: 1,
                            matrix: IDENTITY_ROWS,
                        },
                        TransformKey {
                            frame: 24,
                            matrix: moved,
                        },
                    ],
                },
                ObjectDescription {
                    name: "Cube".to_string(),
                    selected: true,
                    kind: ObjectKindDescription::Generic,
                    keys: Vec::new(),
                },
            ],
        }
    }
}
