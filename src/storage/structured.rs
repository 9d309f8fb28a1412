//! Structured binary I/O for persisted concept segments.
//!
//! Values are little-endian, integers that are usually small are varint
//! encoded and strings are length prefixed. [`StructWriter::close`] appends
//! a CRC32 of every byte written, which [`StructReader::verify_checksum`]
//! checks before the segment is trusted.

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher;

use crate::error::{Result, SkosError};
use crate::storage::{StorageInput, StorageOutput};
use crate::util::varint::{decode_u64, encode_u64};

/// Size of the CRC32 trailer written by [`StructWriter::close`].
pub const CHECKSUM_SIZE: u64 = 4;

/// A structured file writer for binary data.
pub struct StructWriter<W: StorageOutput> {
    writer: W,
    hasher: Hasher,
    position: u64,
}

impl<W: StorageOutput> StructWriter<W> {
    /// Create a new structured file writer.
    pub fn new(writer: W) -> Self {
        StructWriter {
            writer,
            hasher: Hasher::new(),
            position: 0,
        }
    }

    /// Write a u8 value.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.writer.write_u8(value)?;
        self.record(&[value]);
        Ok(())
    }

    /// Write a u32 value (little-endian).
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.writer.write_u32::<LittleEndian>(value)?;
        self.record(&value.to_le_bytes());
        Ok(())
    }

    /// Write a u64 value (little-endian).
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        self.record(&value.to_le_bytes());
        Ok(())
    }

    /// Write an i64 value (little-endian).
    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.writer.write_i64::<LittleEndian>(value)?;
        self.record(&value.to_le_bytes());
        Ok(())
    }

    /// Write a variable-length integer.
    pub fn write_varint(&mut self, value: u64) -> Result<()> {
        let encoded = encode_u64(value);
        self.writer.write_all(&encoded)?;
        self.record(&encoded);
        Ok(())
    }

    /// Write a string with length prefix.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        self.write_varint(bytes.len() as u64)?;
        self.writer.write_all(bytes)?;
        self.record(bytes);
        Ok(())
    }

    /// Write a counted list of strings.
    pub fn write_string_list<S: AsRef<str>>(&mut self, values: &[S]) -> Result<()> {
        self.write_varint(values.len() as u64)?;
        for value in values {
            self.write_string(value.as_ref())?;
        }
        Ok(())
    }

    /// Write a sorted integer array using delta encoding.
    pub fn write_delta_compressed_u32s(&mut self, values: &[u32]) -> Result<()> {
        self.write_varint(values.len() as u64)?;

        let mut previous = 0u32;
        for &value in values {
            self.write_varint(value.wrapping_sub(previous) as u64)?;
            previous = value;
        }

        Ok(())
    }

    /// Get current file position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Checksum of everything written so far.
    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    fn record(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.position += data.len() as u64;
    }

    /// Append the checksum trailer, then flush and close the writer.
    pub fn close(mut self) -> Result<()> {
        let checksum = self.checksum();
        self.writer.write_u32::<LittleEndian>(checksum)?;
        self.writer.flush_and_sync()?;
        self.writer.close()?;
        Ok(())
    }
}

/// A structured file reader with random access.
pub struct StructReader<R: StorageInput> {
    reader: R,
    position: u64,
    file_size: u64,
}

impl<R: StorageInput> StructReader<R> {
    /// Create a new structured file reader.
    pub fn new(reader: R) -> Result<Self> {
        let file_size = reader.size()?;
        Ok(StructReader {
            reader,
            position: 0,
            file_size,
        })
    }

    /// Read a u8 value.
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.reader.read_u8()?;
        self.position += 1;
        Ok(value)
    }

    /// Read a u32 value (little-endian).
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = self.reader.read_u32::<LittleEndian>()?;
        self.position += 4;
        Ok(value)
    }

    /// Read a u64 value (little-endian).
    pub fn read_u64(&mut self) -> Result<u64> {
        let value = self.reader.read_u64::<LittleEndian>()?;
        self.position += 8;
        Ok(value)
    }

    /// Read an i64 value (little-endian).
    pub fn read_i64(&mut self) -> Result<i64> {
        let value = self.reader.read_i64::<LittleEndian>()?;
        self.position += 8;
        Ok(value)
    }

    /// Read a variable-length integer.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut bytes = Vec::with_capacity(4);
        loop {
            let byte = self.reader.read_u8()?;
            bytes.push(byte);
            if byte & 0x80 == 0 {
                break;
            }
        }

        let (value, _) = decode_u64(&bytes)?;
        self.position += bytes.len() as u64;
        Ok(value)
    }

    /// Read a string with length prefix.
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_varint()?;
        if length > self.remaining() {
            return Err(SkosError::storage(format!(
                "String length {length} exceeds remaining segment size"
            )));
        }

        let mut bytes = vec![0u8; length as usize];
        self.reader.read_exact(&mut bytes)?;
        self.position += length;

        String::from_utf8(bytes).map_err(|e| SkosError::storage(format!("Invalid UTF-8: {e}")))
    }

    /// Read a counted list of strings.
    pub fn read_string_list(&mut self) -> Result<Vec<String>> {
        let length = self.read_varint()?;
        let mut values = Vec::with_capacity(length.min(1024) as usize);
        for _ in 0..length {
            values.push(self.read_string()?);
        }
        Ok(values)
    }

    /// Read a delta-compressed integer array.
    pub fn read_delta_compressed_u32s(&mut self) -> Result<Vec<u32>> {
        let length = self.read_varint()?;
        let mut values = Vec::with_capacity(length.min(1024) as usize);
        let mut previous = 0u32;

        for _ in 0..length {
            let delta = self.read_varint()? as u32;
            let value = previous.wrapping_add(delta);
            values.push(value);
            previous = value;
        }

        Ok(values)
    }

    /// Move to an absolute position.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        if position > self.file_size {
            return Err(SkosError::storage(format!(
                "Seek to {position} beyond end of segment ({} bytes)",
                self.file_size
            )));
        }
        self.reader.seek(SeekFrom::Start(position))?;
        self.position = position;
        Ok(())
    }

    /// Get current file position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get file size.
    pub fn size(&self) -> u64 {
        self.file_size
    }

    fn remaining(&self) -> u64 {
        self.file_size.saturating_sub(self.position)
    }

    /// Check the trailing checksum against the file content.
    ///
    /// The reader is left positioned at the start of the file.
    pub fn verify_checksum(&mut self) -> Result<bool> {
        if self.file_size < CHECKSUM_SIZE {
            return Err(SkosError::storage("File too short for checksum"));
        }

        self.seek(0)?;
        let data_len = self.file_size - CHECKSUM_SIZE;
        let mut hasher = Hasher::new();
        let mut buffer = vec![0u8; 8192];
        let mut remaining = data_len;

        while remaining > 0 {
            let chunk = remaining.min(buffer.len() as u64) as usize;
            self.reader.read_exact(&mut buffer[..chunk])?;
            hasher.update(&buffer[..chunk]);
            remaining -= chunk as u64;
        }

        let stored_checksum = self.reader.read_u32::<LittleEndian>()?;
        self.seek(0)?;
        Ok(stored_checksum == hasher.finalize())
    }

    /// Close the reader.
    pub fn close(mut self) -> Result<()> {
        self.reader.close()
    }
}
