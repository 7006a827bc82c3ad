// FLAC metadata block header

use std::io::Read;

use crate::utils::io::{get_bit, read_be_u24};

/// FLAC metadata block types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlacMetadataBlockType {
    StreamInfo,
    Padding,
    Application,
    SeekTable,
    VorbisComment,
    CueSheet,
    Picture,
    /// Reserved or invalid codes, skipped by length
    Other(u8),
}

impl FlacMetadataBlockType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => FlacMetadataBlockType::StreamInfo,
            1 => FlacMetadataBlockType::Padding,
            2 => FlacMetadataBlockType::Application,
            3 => FlacMetadataBlockType::SeekTable,
            4 => FlacMetadataBlockType::VorbisComment,
            5 => FlacMetadataBlockType::CueSheet,
            6 => FlacMetadataBlockType::Picture,
            code => FlacMetadataBlockType::Other(code),
        }
    }
}

/// FLAC metadata block header
#[derive(Debug)]
pub struct FlacMetadataBlockHeader {
    pub is_last: bool,
    pub block_type: FlacMetadataBlockType,
    pub length: u32,
}

impl FlacMetadataBlockHeader {
    /// Read FLAC metadata block header from reader
    pub fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut flags = [0u8; 1];
        reader.read_exact(&mut flags)?;

        let is_last = get_bit(flags[0], 7);
        let block_type = FlacMetadataBlockType::from_byte(flags[0] & 0x7F);

        // Length is big-endian 24-bit
        let length = read_be_u24(reader)?;

        Ok(FlacMetadataBlockHeader {
            is_last,
            block_type,
            length,
        })
    }
}

/// FLAC file signature
pub const FLAC_SIGNATURE: &[u8; 4] = b"fLaC";

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_flags() {
        let mut cursor = Cursor::new([0x84, 0x00, 0x01, 0x02]);
        let header = FlacMetadataBlockHeader::read(&mut cursor).unwrap();
        assert!(header.is_last);
        assert_eq!(header.block_type, FlacMetadataBlockType::VorbisComment);
        assert_eq!(header.length, 0x0102);

        let mut cursor = Cursor::new([0x00, 0x00, 0x00, 0x22]);
        let header = FlacMetadataBlockHeader::read(&mut cursor).unwrap();
        assert!(!header.is_last);
        assert_eq!(header.block_type, FlacMetadataBlockType::StreamInfo);
        assert_eq!(header.length, 34);
    }

    #[test]
    fn test_reserved_codes() {
        assert_eq!(FlacMetadataBlockType::from_byte(9), FlacMetadataBlockType::Other(9));
        assert_eq!(FlacMetadataBlockType::from_byte(127), FlacMetadataBlockType::Other(127));
    }

    #[test]
    fn test_short_header() {
        assert!(FlacMetadataBlockHeader::read(&mut Cursor::new([0x80, 0x00])).is_err());
    }
}
