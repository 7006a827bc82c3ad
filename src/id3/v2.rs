// ID3v2 tag implementation

use std::io::{Cursor, Read, Seek, SeekFrom};

use crate::error::{Result, TagError};
use crate::utils::io::{read_bytes, synchsafe_u32};

const FLAG_UNSYNCHRONISATION: u8 = 0x80;
const FLAG_EXTENDED_HEADER: u8 = 0x40;

// ID3v2.4 frame format flags
const FRAME_FLAG_UNSYNCHRONISATION: u16 = 0x0002;
const FRAME_FLAG_DATA_LENGTH: u16 = 0x0001;

/// ID3v2 header structure
#[derive(Debug, Clone, Copy)]
pub struct Id3v2Header {
    pub version: (u8, u8),
    pub flags: u8,
    pub size: u32,
}

/// ID3v2 tag structure
#[derive(Debug)]
pub struct Id3v2Tag {
    pub header: Id3v2Header,
    pub frames: Vec<Id3Frame>,
}

/// ID3v2 frame structure
#[derive(Debug)]
pub struct Id3Frame {
    pub frame_id: String,
    pub flags: u16,
    pub data: Vec<u8>,
}

impl Id3v2Header {
    const HEADER_SIZE: usize = 10;
    const ID: &'static [u8; 3] = b"ID3";

    /// Read ID3v2 header from reader
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; Self::HEADER_SIZE];
        reader.read_exact(&mut buffer)?;

        if &buffer[0..3] != Self::ID {
            return Err(TagError::magic("ID3", &buffer[0..3]));
        }

        let version = (buffer[3], buffer[4]);
        if version.0 != 3 && version.0 != 4 {
            return Err(TagError::UnsupportedId3Version(version.0));
        }

        Ok(Id3v2Header {
            version,
            flags: buffer[5],
            size: synchsafe_u32([buffer[6], buffer[7], buffer[8], buffer[9]]),
        })
    }
}

impl Id3v2Tag {
    /// Read ID3v2 tag from reader
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let header = Id3v2Header::read(reader)?;

        let mut body = read_bytes(reader, header.size as usize)?;
        if header.flags & FLAG_UNSYNCHRONISATION != 0 && header.version.0 == 3 {
            body = remove_unsynchronisation(&body);
        }

        let mut cursor = Cursor::new(body);
        if header.flags & FLAG_EXTENDED_HEADER != 0 {
            skip_extended_header(&mut cursor, header.version.0)?;
        }

        let mut frames = Vec::new();
        while let Some(frame) = Id3Frame::read(&mut cursor, header.version.0)? {
            frames.push(frame);
        }

        Ok(Id3v2Tag { header, frames })
    }
}

fn skip_extended_header(cursor: &mut Cursor<Vec<u8>>, major: u8) -> Result<()> {
    let mut size = [0u8; 4];
    cursor.read_exact(&mut size)?;
    // v2.3 excludes the size field itself, v2.4 includes it
    let remaining = match major {
        3 => u32::from_be_bytes(size) as i64,
        _ => synchsafe_u32(size) as i64 - 4,
    };
    cursor.seek(SeekFrom::Current(remaining.max(0)))?;
    Ok(())
}

impl Id3Frame {
    const HEADER_SIZE: u64 = 10;

    /// Read the next frame, `None` once padding or the end of the tag is hit
    fn read(cursor: &mut Cursor<Vec<u8>>, major: u8) -> Result<Option<Self>> {
        let len = cursor.get_ref().len() as u64;
        let remaining = len - cursor.position().min(len);
        if remaining < Self::HEADER_SIZE {
            return Ok(None);
        }

        let mut buffer = [0u8; 10];
        cursor.read_exact(&mut buffer)?;

        // Check for padding (all zeros)
        if buffer[0..4].iter().all(|&b| b == 0) {
            return Ok(None);
        }

        let frame_id = String::from_utf8_lossy(&buffer[0..4]).to_string();

        // ID3v2.4 uses synchsafe sizes, ID3v2.3 plain integers
        let size_bytes = [buffer[4], buffer[5], buffer[6], buffer[7]];
        let size = if major >= 4 {
            synchsafe_u32(size_bytes)
        } else {
            u32::from_be_bytes(size_bytes)
        };
        if size as u64 > remaining - Self::HEADER_SIZE {
            return Ok(None);
        }

        let flags = ((buffer[8] as u16) << 8) | (buffer[9] as u16);

        let mut data = read_bytes(cursor, size as usize)?;
        if major >= 4 {
            if flags & FRAME_FLAG_UNSYNCHRONISATION != 0 {
                data = remove_unsynchronisation(&data);
            }
            if flags & FRAME_FLAG_DATA_LENGTH != 0 && data.len() >= 4 {
                data.drain(..4);
            }
        }

        Ok(Some(Id3Frame { frame_id, flags, data }))
    }
}

/// Undo unsynchronisation: every 0xFF 0x00 pair becomes 0xFF
fn remove_unsynchronisation(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());
    let mut previous = 0u8;
    for &byte in data {
        if !(previous == 0xFF && byte == 0x00) {
            result.push(byte);
        }
        previous = byte;
    }
    result
}
