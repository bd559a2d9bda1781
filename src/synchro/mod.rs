//! Synchro Data export and inspection.
//!
//! The exporter samples every object once per frame and streams fixed-size
//! records, so all offsets are known before writing starts.
//!
//! # File Format
//!
//! All fields are 4 bytes, little-endian.
//!
//! ```text
//! Header (36 bytes):
//!   Header size: i32 (always 36)
//!   Object count: i32
//!   Frame count: i32 (frame_end - frame_start)
//!   Start frame: i32
//!   Frame rate: f32
//!   Width: i32
//!   Height: i32
//!   Pixel aspect: f32
//!   World scale: f32
//!
//! Directory (object_count * 12 bytes):
//!   Type: i32 (1 = camera, 2 = generic)
//!   Name offset: i32
//!   Data offset: i32
//!
//! Name table (variable):
//!   UTF-8 names, each null-terminated
//!
//! Data blocks, one per object, (frame_count + 1) records each:
//!   Generic (48 bytes): translation[3], rotation rows[3][3]
//!   Camera (116 bytes): translation[3], rotation rows[3][3],
//!     fov, focus, shutter, reserved[4][3], fov, focus
//! ```

mod exporter;
mod format;
mod frame;
mod layout;
mod reader;

pub use exporter::{ExportError, ExportStats, SynchroExporter, encode_frame, export_to_file};
pub use format::{
    CAMERA_RECORD_SIZE, DIRECTORY_ENTRY_SIZE, DirectoryEntry, FileHeader, GENERIC_RECORD_SIZE,
    HEADER_SIZE, ObjectType,
};
pub use frame::{
    CAMERA_AXIS_CORRECTION, CameraBlock, FrameRecord, REFERENCE_SENSOR_WIDTH, RESERVED_ROWS,
    correct_camera_axes, derive_fov,
};
pub use layout::{FileLayout, encode_names};
pub use reader::{RecordIterator, SynchroReader};
