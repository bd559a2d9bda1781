//! Header, directory and name table planning.
//!
//! All offsets are fixed before the first byte is written, so records can be
//! streamed straight to the output afterwards.

use std::io::{self, Write};

use super::format::{DIRECTORY_ENTRY_SIZE, DirectoryEntry, FileHeader, HEADER_SIZE, ObjectType};
use crate::scene::ExportObject;
use crate::schema::RenderSettings;

/// Concatenate names as UTF-8, each followed by a null terminator.
pub fn encode_names<'a, I>(names: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut blob = Vec::new();
    for name in names {
        blob.extend_from_slice(name.as_bytes());
        blob.push(0);
    }
    blob
}

fn to_offset(v: u64) -> io::Result<i32> {
    i32::try_from(v).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Offset {} exceeds the format's 32-bit range", v),
        )
    })
}

/// Everything written before the first frame record.
#[derive(Debug, Clone, PartialEq)]
pub struct FileLayout {
    pub header: FileHeader,
    pub entries: Vec<DirectoryEntry>,
    pub names: Vec<u8>,
}

impl FileLayout {
    /// Plan the layout for `objects` over `frame_start..=frame_end`.
    pub fn new(
        objects: &[ExportObject],
        render: &RenderSettings,
        frame_start: i32,
        frame_end: i32,
        scale: f32,
    ) -> io::Result<Self> {
        let frame_count = frame_end.checked_sub(frame_start).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Frame range {}..={} is too long", frame_start, frame_end),
            )
        })?;
        let records = u64::try_from(frame_count).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Start frame {} is after end frame {}", frame_start, frame_end),
            )
        })? + 1;

        if let Some(object) = objects.iter().find(|o| o.name.contains('\0')) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Object name {:?} contains a null byte", object.name),
            ));
        }

        let header = FileHeader {
            object_count: to_offset(objects.len() as u64)?,
            frame_count,
            start_frame: frame_start,
            fps: render.fps,
            width: render.resolution_x,
            height: render.resolution_y,
            pixel_aspect: render.pixel_aspect(),
            scale,
        };

        let names = encode_names(objects.iter().map(|o| o.name.as_str()));

        let mut name_offset = (HEADER_SIZE + DIRECTORY_ENTRY_SIZE * objects.len()) as u64;
        let mut data_offset = name_offset + names.len() as u64;
        let mut entries = Vec::with_capacity(objects.len());

        for object in objects {
            let object_type = ObjectType::from(object.kind);
            entries.push(DirectoryEntry {
                object_type,
                name_offset: to_offset(name_offset)?,
                data_offset: to_offset(data_offset)?,
            });
            name_offset += object.name.len() as u64 + 1;
            data_offset += records * object_type.record_size() as u64;
        }
        // The end of the last block must stay addressable too.
        to_offset(data_offset)?;

        Ok(Self {
            header,
            entries,
            names,
        })
    }

    /// Byte offset of the first data block.
    pub fn data_start(&self) -> usize {
        HEADER_SIZE + DIRECTORY_ENTRY_SIZE * self.entries.len() + self.names.len()
    }

    /// Bytes occupied by one object's data block.
    pub fn block_size(&self, object_type: ObjectType) -> usize {
        self.header.records_per_object() * object_type.record_size()
    }

    /// Size of the complete file.
    pub fn total_size(&self) -> usize {
        self.data_start()
            + self
                .entries
                .iter()
                .map(|e| self.block_size(e.object_type))
                .sum::<usize>()
    }

    /// Write header, directory and name table.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.header.write_to(w)?;
        for entry in &self.entries {
            entry.write_to(w)?;
        }
        w.write_all(&self.names)
    }
}
