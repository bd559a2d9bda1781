//! Per-frame record encoding.

use std::io::{self, Write};

use glam::{Mat4, Vec4};

use super::format::{
    CAMERA_RECORD_FLOATS, CAMERA_RECORD_SIZE, GENERIC_RECORD_FLOATS, GENERIC_RECORD_SIZE,
    decode_floats, write_floats,
};
use crate::schema::CameraLens;

/// Reference sensor width (mm) the consuming renderer derives its focal value from.
pub const REFERENCE_SENSOR_WIDTH: f64 = 35.975130221963276;

/// Reserved rows of every camera record.
pub const RESERVED_ROWS: [[f32; 3]; 4] = [
    [1.0, 1.1, 1.2],
    [2.0, 2.1, 2.2],
    [3.0, 3.1, 3.2],
    [4.0, 4.1, 4.2],
];

/// Rx(180°) · Rz(180°), composed exactly.
pub const CAMERA_AXIS_CORRECTION: Mat4 = Mat4::from_cols(
    Vec4::new(-1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, -1.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 1.0),
);

/// Map a camera's world matrix onto the target's camera-forward convention.
#[inline]
pub fn correct_camera_axes(world: Mat4) -> Mat4 {
    world * CAMERA_AXIS_CORRECTION
}

/// Focal value stored for a camera with full field-of-view `angle` (radians).
///
/// The half-sensor/half-angle ratio is halved once more; the renderer expects
/// exactly this value.
pub fn derive_fov(angle: f32) -> f32 {
    let fov = (REFERENCE_SENSOR_WIDTH / 2.0) / (f64::from(angle) / 2.0).tan();
    (fov / 2.0) as f32
}

/// Camera-only part of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBlock {
    pub fov: f32,
    pub focus: f32,
    pub motion_blur: f32,
    pub reserved: [[f32; 3]; 4],
}

impl CameraBlock {
    pub fn new(lens: &CameraLens, motion_blur: f32) -> Self {
        Self {
            fov: derive_fov(lens.angle),
            focus: lens.dof_distance,
            motion_blur,
            reserved: RESERVED_ROWS,
        }
    }
}

/// One object's record for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRecord {
    /// World translation.
    pub translation: [f32; 3],
    /// Rows of the 3x3 linear part.
    pub rotation: [[f32; 3]; 3],
    /// Present for cameras only.
    pub camera: Option<CameraBlock>,
}

impl FrameRecord {
    /// Record for a generic object.
    pub fn generic(world: Mat4) -> Self {
        Self::from_matrix(world, None)
    }

    /// Record for a camera: axes are corrected before extraction.
    pub fn camera(world: Mat4, lens: &CameraLens, motion_blur: f32) -> Self {
        Self::from_matrix(
            correct_camera_axes(world),
            Some(CameraBlock::new(lens, motion_blur)),
        )
    }

    fn from_matrix(m: Mat4, camera: Option<CameraBlock>) -> Self {
        let row = |r: usize| m.row(r).truncate().to_array();
        Self {
            translation: m.w_axis.truncate().to_array(),
            rotation: [row(0), row(1), row(2)],
            camera,
        }
    }

    /// Size of this record in bytes.
    pub fn byte_len(&self) -> usize {
        match self.camera {
            Some(_) => CAMERA_RECORD_SIZE,
            None => GENERIC_RECORD_SIZE,
        }
    }

    /// Flatten into file order.
    pub fn to_floats(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(CAMERA_RECORD_FLOATS);
        out.extend_from_slice(&self.translation);
        for row in &self.rotation {
            out.extend_from_slice(row);
        }
        if let Some(cam) = &self.camera {
            out.extend_from_slice(&[cam.fov, cam.focus, cam.motion_blur]);
            for row in &cam.reserved {
                out.extend_from_slice(row);
            }
            out.extend_from_slice(&[cam.fov, cam.focus]);
        }
        out
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write_floats(w, &self.to_floats())
    }

    /// Decode a record; its length selects the camera or generic layout.
    pub fn decode(bytes: &[u8]) -> io::Result<Self> {
        let floats = bytes.len() / 4;
        if floats != GENERIC_RECORD_FLOATS && floats != CAMERA_RECORD_FLOATS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unexpected record length: {} bytes", bytes.len()),
            ));
        }
        let mut v = vec![0.0f32; floats];
        decode_floats(bytes, &mut v)?;

        let triple = |i: usize| [v[i], v[i + 1], v[i + 2]];
        let camera = (floats == CAMERA_RECORD_FLOATS).then(|| CameraBlock {
            fov: v[12],
            focus: v[13],
            motion_blur: v[14],
            reserved: [triple(15), triple(18), triple(21), triple(24)],
        });

        Ok(Self {
            translation: triple(0),
            rotation: [triple(3), triple(6), triple(9)],
            camera,
        })
    }
}
