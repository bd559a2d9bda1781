//! Binary format definitions for Synchro Data files.

use std::io::{self, Read, Write};

use crate::scene::ObjectKind;

/// Size of the fixed header, also stored as its first field.
pub const HEADER_SIZE: usize = 36;

/// Size of one directory entry.
pub const DIRECTORY_ENTRY_SIZE: usize = 12;

/// Floats per generic-object record: translation + 3x3 rotation.
pub const GENERIC_RECORD_FLOATS: usize = 12;

/// Floats per camera record.
pub const CAMERA_RECORD_FLOATS: usize = 29;

/// Bytes per generic-object record.
pub const GENERIC_RECORD_SIZE: usize = GENERIC_RECORD_FLOATS * 4;

/// Bytes per camera record.
pub const CAMERA_RECORD_SIZE: usize = CAMERA_RECORD_FLOATS * 4;

/// Object type tag stored in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ObjectType {
    Camera = 1,
    Generic = 2,
}

impl ObjectType {
    pub fn from_i32(v: i32) -> Option<Self> {
        match v {
            1 => Some(ObjectType::Camera),
            2 => Some(ObjectType::Generic),
            _ => None,
        }
    }

    /// Size of one frame record for this type.
    pub fn record_size(self) -> usize {
        match self {
            ObjectType::Camera => CAMERA_RECORD_SIZE,
            ObjectType::Generic => GENERIC_RECORD_SIZE,
        }
    }
}

impl From<ObjectKind> for ObjectType {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Camera => ObjectType::Camera,
            ObjectKind::Generic => ObjectType::Generic,
        }
    }
}

fn read_i32<R: Read>(r: &mut R) -> io::Result<i32> {
    let mut buf4 = [0u8; 4];
    r.read_exact(&mut buf4)?;
    Ok(i32::from_le_bytes(buf4))
}

fn read_f32<R: Read>(r: &mut R) -> io::Result<f32> {
    let mut buf4 = [0u8; 4];
    r.read_exact(&mut buf4)?;
    Ok(f32::from_le_bytes(buf4))
}

/// File header of a Synchro Data file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    /// Number of exported objects.
    pub object_count: i32,
    /// `frame_end - frame_start`; each object carries one record more than this.
    pub frame_count: i32,
    /// First exported frame.
    pub start_frame: i32,
    /// Frames per second.
    pub fps: f32,
    /// Output width in pixels.
    pub width: i32,
    /// Output height in pixels.
    pub height: i32,
    /// `pixel_aspect_x / pixel_aspect_y`.
    pub pixel_aspect: f32,
    /// World scale.
    pub scale: f32,
}

impl FileHeader {
    /// Records stored per object.
    pub fn records_per_object(&self) -> usize {
        (self.frame_count as usize) + 1
    }

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&(HEADER_SIZE as i32).to_le_bytes())?;
        w.write_all(&self.object_count.to_le_bytes())?;
        w.write_all(&self.frame_count.to_le_bytes())?;
        w.write_all(&self.start_frame.to_le_bytes())?;
        w.write_all(&self.fps.to_le_bytes())?;
        w.write_all(&self.width.to_le_bytes())?;
        w.write_all(&self.height.to_le_bytes())?;
        w.write_all(&self.pixel_aspect.to_le_bytes())?;
        w.write_all(&self.scale.to_le_bytes())?;
        Ok(())
    }

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let size = read_i32(r)?;
        if size != HEADER_SIZE as i32 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid header size field: {}", size),
            ));
        }

        let object_count = read_i32(r)?;
        let frame_count = read_i32(r)?;
        if object_count < 0 || frame_count < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Negative counts in header: {} objects, {} frames",
                    object_count, frame_count
                ),
            ));
        }

        Ok(Self {
            object_count,
            frame_count,
            start_frame: read_i32(r)?,
            fps: read_f32(r)?,
            width: read_i32(r)?,
            height: read_i32(r)?,
            pixel_aspect: read_f32(r)?,
            scale: read_f32(r)?,
        })
    }
}

/// Directory entry for a single object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub object_type: ObjectType,
    /// Byte offset of the object's name in the file.
    pub name_offset: i32,
    /// Byte offset of the object's first frame record in the file.
    pub data_offset: i32,
}

impl DirectoryEntry {
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&(self.object_type as i32).to_le_bytes())?;
        w.write_all(&self.name_offset.to_le_bytes())?;
        w.write_all(&self.data_offset.to_le_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let tag = read_i32(r)?;
        let object_type = ObjectType::from_i32(tag).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unknown object type tag: {}", tag),
            )
        })?;

        Ok(Self {
            object_type,
            name_offset: read_i32(r)?,
            data_offset: read_i32(r)?,
        })
    }
}

/// Write floats as consecutive little-endian words.
pub fn write_floats<W: Write>(w: &mut W, data: &[f32]) -> io::Result<()> {
    let words: Vec<u32> = data.iter().map(|v| v.to_bits().to_le()).collect();
    w.write_all(bytemuck::cast_slice(&words))
}

/// Decode little-endian bytes into floats.
pub fn decode_floats(bytes: &[u8], output: &mut [f32]) -> io::Result<()> {
    if bytes.len() != output.len() * 4 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Record size mismatch: {} bytes vs {} floats",
                bytes.len(),
                output.len()
            ),
        ));
    }
    for (v, b) in output.iter_mut().zip(bytes.chunks_exact(4)) {
        *v = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
    }
    Ok(())
}
