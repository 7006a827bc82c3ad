// FLAC metadata handling module
//
// File layout:
// - "fLaC" signature (4 bytes)
// - Metadata blocks, each with a 4-byte header:
//   - bit 7: last-block flag
//   - bits 0-6: block type
//   - 24-bit big-endian body length
// - Audio frames (never read)

pub mod metadata;
pub mod picture;
pub mod vorbis;

use std::io::{Cursor, Read, Seek};

use serde_json::{Map, Value};

use crate::error::{Result, TagError};
use crate::metadata::{FileType, Format, Metadata, StreamInfo};
use crate::utils::io::{read_be_u32, read_bytes, read_magic, skip};

pub use metadata::{FlacMetadataBlockHeader, FlacMetadataBlockType, FLAC_SIGNATURE};
pub use picture::{Picture, PictureType};
pub use vorbis::{CommentTable, VorbisFields, VorbisMetadata};

/// Tags and stream properties read from a FLAC file.
///
/// The Vorbis comment, picture and stream properties live in an inner
/// [`VorbisMetadata`]; the FLAC-specific part is the audio MD5.
#[derive(Debug, Clone)]
pub struct FlacMetadata {
    vorbis: VorbisMetadata,
    md5: [u8; 16],
}

impl FlacMetadata {
    /// Read every metadata block up to the one flagged as last
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let signature = read_magic(reader)?;
        if &signature != FLAC_SIGNATURE {
            return Err(TagError::magic("fLaC", &signature));
        }

        let mut metadata = FlacMetadata {
            vorbis: VorbisMetadata::new(FileType::Flac),
            md5: [0u8; 16],
        };

        loop {
            let header = FlacMetadataBlockHeader::read(reader)?;
            metadata.read_block(reader, &header)?;
            if header.is_last {
                break;
            }
        }

        Ok(metadata)
    }

    fn read_block<R: Read + Seek>(
        &mut self,
        reader: &mut R,
        header: &FlacMetadataBlockHeader,
    ) -> Result<()> {
        match header.block_type {
            FlacMetadataBlockType::StreamInfo => {
                let body = read_bytes(reader, header.length as usize)?;
                self.read_stream_info(&mut Cursor::new(body))
            }
            FlacMetadataBlockType::VorbisComment => {
                let body = read_bytes(reader, header.length as usize)?;
                self.vorbis.read_comment(&mut Cursor::new(body))
            }
            FlacMetadataBlockType::Picture => {
                let body = read_bytes(reader, header.length as usize)?;
                self.vorbis.read_picture(&mut Cursor::new(body))
            }
            _ => Ok(skip(reader, header.length as i64)?),
        }
    }

    fn read_stream_info(&mut self, body: &mut Cursor<Vec<u8>>) -> Result<()> {
        // min/max block size (2 x 16 bits), min/max frame size (2 x 24 bits)
        skip(body, 10)?;

        let word1 = read_be_u32(body)?;
        let word2 = read_be_u32(body)?;
        self.vorbis.stream = unpack_stream_info(word1, word2);

        body.read_exact(&mut self.md5)?;
        Ok(())
    }

    pub fn stream_info(&self) -> &StreamInfo {
        self.vorbis.stream_info()
    }

    pub fn comments(&self) -> &CommentTable {
        self.vorbis.comments()
    }
}

/// Split the packed STREAMINFO words into stream properties.
///
/// `word1` holds sample rate (20 bits), channels - 1 (3 bits),
/// bits per sample - 1 (5 bits) and the top 4 bits of the 36-bit sample
/// count; `word2` holds the low 32 bits of the sample count.
pub fn unpack_stream_info(word1: u32, word2: u32) -> StreamInfo {
    StreamInfo {
        sample_rate: word1 >> 12,
        channels: ((word1 >> 9) & 0x7) + 1,
        bit_depth: ((word1 >> 4) & 0x1F) + 1,
        samples: ((word1 as u64 & 0xF) << 32) | word2 as u64,
    }
}

impl Metadata for FlacMetadata {
    fn format(&self) -> Format {
        self.vorbis.format()
    }

    fn file_type(&self) -> FileType {
        FileType::Flac
    }

    fn title(&self) -> &str {
        self.vorbis.title()
    }

    fn album(&self) -> &str {
        self.vorbis.album()
    }

    fn artist(&self) -> &str {
        self.vorbis.artist()
    }

    fn album_artist(&self) -> &str {
        self.vorbis.album_artist()
    }

    fn composer(&self) -> &str {
        self.vorbis.composer()
    }

    fn genre(&self) -> &str {
        self.vorbis.genre()
    }

    fn year(&self) -> i32 {
        self.vorbis.year()
    }

    fn track(&self) -> (u32, u32) {
        self.vorbis.track()
    }

    fn disc(&self) -> (u32, u32) {
        self.vorbis.disc()
    }

    fn picture(&self) -> Option<&Picture> {
        self.vorbis.picture()
    }

    fn lyrics(&self) -> &str {
        self.vorbis.lyrics()
    }

    fn comment(&self) -> &str {
        self.vorbis.comment()
    }

    fn sample_rate(&self) -> u32 {
        self.vorbis.sample_rate()
    }

    fn channels(&self) -> u32 {
        self.vorbis.channels()
    }

    fn bit_depth(&self) -> u32 {
        self.vorbis.bit_depth()
    }

    fn samples(&self) -> u64 {
        self.vorbis.samples()
    }

    fn md5_sum(&self) -> Option<&[u8; 16]> {
        Some(&self.md5)
    }

    fn raw(&self) -> Map<String, Value> {
        self.vorbis.raw()
    }
}
