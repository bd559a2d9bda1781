//! Reader for Synchro Data files.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use super::format::{DIRECTORY_ENTRY_SIZE, DirectoryEntry, FileHeader, HEADER_SIZE, ObjectType};
use super::frame::FrameRecord;

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Reader resolving names and records through the directory offsets.
///
/// Usage:
/// ```ignore
/// let mut reader = SynchroReader::open("scene.dat")?;
/// for i in 0..reader.object_count() {
///     println!("{} ({:?})", reader.name(i), reader.entry(i).object_type);
/// }
/// let first = reader.read_record(0, 0)?;
/// ```
pub struct SynchroReader<R: Read + Seek> {
    reader: R,
    header: FileHeader,
    entries: Vec<DirectoryEntry>,
    names: Vec<String>,
}

impl SynchroReader<BufReader<File>> {
    /// Open a file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read + Seek> SynchroReader<R> {
    /// Read header, directory and names, checking that every offset tiles the file.
    pub fn new(mut reader: R) -> io::Result<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let header = FileHeader::read_from(&mut reader)?;
        let count = header.object_count as usize;
        let names_start = (HEADER_SIZE as u64) + (DIRECTORY_ENTRY_SIZE as u64) * count as u64;
        if names_start > file_len {
            return Err(invalid(format!(
                "Directory of {} objects does not fit in {} bytes",
                count, file_len
            )));
        }

        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            entries.push(DirectoryEntry::read_from(&mut reader)?);
        }

        let data_start = entries
            .first()
            .map_or(names_start, |e| e.data_offset as u64);
        if data_start < names_start || data_start > file_len {
            return Err(invalid(format!(
                "Data offset {} outside the file ({} bytes)",
                data_start, file_len
            )));
        }

        let mut blob = vec![0u8; (data_start - names_start) as usize];
        reader.read_exact(&mut blob)?;

        let records = header.records_per_object() as u64;
        let mut name_cursor = names_start;
        let mut data_cursor = data_start;
        let mut names = Vec::with_capacity(count);

        for (i, entry) in entries.iter().enumerate() {
            if entry.name_offset as u64 != name_cursor || entry.data_offset as u64 != data_cursor {
                return Err(invalid(format!(
                    "Directory entry {} offsets ({}, {}) do not match layout ({}, {})",
                    i, entry.name_offset, entry.data_offset, name_cursor, data_cursor
                )));
            }

            let rel = (name_cursor - names_start) as usize;
            let len = blob[rel..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| invalid(format!("Name of object {} is not terminated", i)))?;
            let name = std::str::from_utf8(&blob[rel..rel + len])
                .map_err(|e| invalid(format!("Name of object {} is not UTF-8: {}", i, e)))?;
            names.push(name.to_string());

            name_cursor += len as u64 + 1;
            data_cursor += records * entry.object_type.record_size() as u64;
        }

        if name_cursor != data_start {
            return Err(invalid(format!(
                "Name table ends at {} but data starts at {}",
                name_cursor, data_start
            )));
        }
        if data_cursor != file_len {
            return Err(invalid(format!(
                "Data blocks end at {} but file is {} bytes",
                data_cursor, file_len
            )));
        }

        Ok(Self {
            reader,
            header,
            entries,
            names,
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn object_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, object: usize) -> &DirectoryEntry {
        &self.entries[object]
    }

    pub fn name(&self, object: usize) -> &str {
        &self.names[object]
    }

    /// Directory index of the object called `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Read the record at `frame_index` (0-based from the start frame).
    pub fn read_record(&mut self, object: usize, frame_index: usize) -> io::Result<FrameRecord> {
        let entry = *self.entries.get(object).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Object index {} out of range ({} objects)", object, self.entries.len()),
            )
        })?;
        let records = self.header.records_per_object();
        if frame_index >= records {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Frame index {} out of range (max {})", frame_index, records - 1),
            ));
        }

        let size = entry.object_type.record_size();
        let offset = entry.data_offset as u64 + (frame_index * size) as u64;
        self.reader.seek(SeekFrom::Start(offset))?;

        let mut buf = vec![0u8; size];
        self.reader.read_exact(&mut buf)?;
        FrameRecord::decode(&buf)
    }

    /// Read the record for an absolute scene frame number.
    pub fn read_frame(&mut self, object: usize, frame: i32) -> io::Result<FrameRecord> {
        let index = frame
            .checked_sub(self.header.start_frame)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Frame {} precedes start frame {}", frame, self.header.start_frame),
                )
            })?;
        self.read_record(object, index)
    }

    /// Iterate over all records of one object.
    pub fn records(&mut self, object: usize) -> RecordIterator<'_, R> {
        RecordIterator {
            reader: self,
            object,
            current: 0,
        }
    }

    /// Count of cameras in the directory.
    pub fn camera_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.object_type == ObjectType::Camera)
            .count()
    }
}

/// Iterator over one object's records.
pub struct RecordIterator<'a, R: Read + Seek> {
    reader: &'a mut SynchroReader<R>,
    object: usize,
    current: usize,
}

impl<R: Read + Seek> Iterator for RecordIterator<'_, R> {
    type Item = io::Result<FrameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.reader.header.records_per_object() {
            return None;
        }

        let result = self.reader.read_record(self.object, self.current);
        self.current += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.header.records_per_object() - self.current;
        (remaining, Some(remaining))
    }
}

impl<R: Read + Seek> ExactSizeIterator for RecordIterator<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::BakedScene;
    use crate::schema::{ExportRequest, SceneDescription};
    use crate::synchro::exporter::{SynchroExporter, export_to_file};
    use std::io::Cursor;
    use tempfile::tempdir;

    fn exported(request: &ExportRequest) -> Vec<u8> {
        let mut scene = BakedScene::new(SceneDescription::example());
        let mut buf = Vec::new();
        SynchroExporter::new(&mut buf).export(&mut scene, request).unwrap();
        buf
    }

    #[test]
    fn test_reader_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.dat");
        let mut scene = BakedScene::new(SceneDescription::example());
        export_to_file(&path, &mut scene, &ExportRequest::with_range(20, 30)).unwrap();

        let mut reader = SynchroReader::open(&path).unwrap();
        assert_eq!(reader.object_count(), 2);
        assert_eq!(reader.camera_count(), 1);
        assert_eq!(reader.name(0), "Camera");
        assert_eq!(reader.name(1), "Cube");
        assert_eq!(reader.find("Cube"), Some(1));
        assert_eq!(reader.header().start_frame, 20);
        assert_eq!(reader.header().frame_count, 10);

        // Camera moves at frame 24.
        let before = reader.read_frame(0, 23).unwrap();
        let after = reader.read_frame(0, 24).unwrap();
        assert_eq!(before.translation, [0.0, 0.0, 0.0]);
        assert_eq!(after.translation, [4.0, 0.0, 1.5]);
        assert!(after.camera.is_some());

        let cube: Vec<_> = reader.records(1).collect::<io::Result<_>>().unwrap();
        assert_eq!(cube.len(), 11);
        assert!(cube.iter().all(|r| r.camera.is_none()));
    }

    #[test]
    fn test_reader_out_of_range() {
        let buf = exported(&ExportRequest::with_range(1, 3));
        let mut reader = SynchroReader::new(Cursor::new(buf)).unwrap();

        assert!(reader.read_record(0, 3).is_err());
        assert!(reader.read_record(2, 0).is_err());
        assert!(reader.read_frame(0, 0).is_err());
        assert!(reader.read_frame(1, 3).is_ok());
    }

    #[test]
    fn test_reader_rejects_truncated_file() {
        let mut buf = exported(&ExportRequest::with_range(1, 3));
        buf.truncate(buf.len() - 4);
        let err = SynchroReader::new(Cursor::new(buf)).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_reader_rejects_oversized_object_count() {
        let mut buf = Vec::new();
        for v in [HEADER_SIZE as i32, i32::MAX, 0, 1] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf.extend_from_slice(&[0u8; 20]);
        assert_eq!(buf.len(), 56);

        let err = SynchroReader::new(Cursor::new(buf)).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_frame_far_before_start() {
        let buf = exported(&ExportRequest::with_range(1, 3));
        let mut reader = SynchroReader::new(Cursor::new(buf)).unwrap();

        let err = reader.read_frame(0, i32::MIN).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_reader_rejects_shifted_offset() {
        let mut buf = exported(&ExportRequest::with_range(1, 3));
        // Second entry's data offset lives at 36 + 12 + 8.
        let at = HEADER_SIZE + DIRECTORY_ENTRY_SIZE + 8;
        let shifted = i32::from_le_bytes(buf[at..at + 4].try_into().unwrap()) + 4;
        buf[at..at + 4].copy_from_slice(&shifted.to_le_bytes());

        assert!(SynchroReader::new(Cursor::new(buf)).is_err());
    }
}
