// DSF (DSD Stream File) support
//
// DSF File Structure:
// - DSD chunk (28 bytes)
//   - "DSD " (4 bytes)
//   - Chunk size (8 bytes)
//   - Total file size (8 bytes)
//   - Pointer to the metadata chunk (8 bytes, 0 when absent)
// - fmt chunk (52 bytes)
//   - "fmt " (4 bytes)
//   - Chunk size (8 bytes)
//   - Format version, format ID, channel type, channel count,
//     sampling frequency, bits per sample (4 bytes each)
//   - Sample count (8 bytes)
//   - Block size per channel, reserved (4 bytes each)
// - data chunk
// - ID3v2 tag at the metadata pointer
//
// All integers are little-endian.

use std::io::{Read, Seek, SeekFrom};

use serde_json::{Map, Value};

use crate::error::{Result, TagError};
use crate::flac::picture::Picture;
use crate::id3::Id3v2Decoder;
use crate::metadata::{FileType, Format, Metadata, StreamInfo};
use crate::utils::io::{read_le_u32, read_le_u64, read_magic, skip};

pub const DSF_SIGNATURE: &[u8; 4] = b"DSD ";
pub const FMT_SIGNATURE: &[u8; 4] = b"fmt ";

/// The only fmt chunk layout in use
const FMT_CHUNK_SIZE: u64 = 52;
const FMT_VERSION: u32 = 1;

/// A stream that can be read and repositioned
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Decodes a tag payload starting at the stream's current position
pub trait TagDecoder {
    fn decode(&self, reader: &mut dyn ReadSeek) -> Result<Box<dyn Metadata>>;
}

impl<F> TagDecoder for F
where
    F: Fn(&mut dyn ReadSeek) -> Result<Box<dyn Metadata>>,
{
    fn decode(&self, reader: &mut dyn ReadSeek) -> Result<Box<dyn Metadata>> {
        self(reader)
    }
}

/// Stream properties from the fmt chunk plus the tags stored at the
/// metadata pointer.
///
/// Every tag accessor is answered by the wrapped delegate.
#[derive(Debug)]
pub struct DsfMetadata {
    stream: StreamInfo,
    tags: Box<dyn Metadata>,
}

impl DsfMetadata {
    /// Read a DSF file, decoding the trailing tag as ID3v2
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        Self::read_with(reader, &Id3v2Decoder)
    }

    /// Read a DSF file, decoding the trailing tag with `decoder`
    pub fn read_with<R: Read + Seek, D: TagDecoder + ?Sized>(
        reader: &mut R,
        decoder: &D,
    ) -> Result<Self> {
        let signature = read_magic(reader)?;
        if &signature != DSF_SIGNATURE {
            return Err(TagError::magic("DSD ", &signature));
        }

        // chunk size and total file size
        skip(reader, 16)?;
        let tag_offset = read_le_u64(reader)?;

        let stream = read_fmt_chunk(reader)?;

        reader.seek(SeekFrom::Start(tag_offset))?;
        let tags = decoder.decode(reader)?;

        Ok(DsfMetadata { stream, tags })
    }

    pub fn stream_info(&self) -> &StreamInfo {
        &self.stream
    }

    /// The tags the DSF file carries
    pub fn tags(&self) -> &dyn Metadata {
        self.tags.as_ref()
    }
}

fn read_fmt_chunk<R: Read + Seek>(reader: &mut R) -> Result<StreamInfo> {
    let signature = read_magic(reader)?;
    if &signature != FMT_SIGNATURE {
        return Err(TagError::magic("fmt ", &signature));
    }

    let size = read_le_u64(reader)?;
    if size != FMT_CHUNK_SIZE {
        return Err(TagError::FmtChunkSize(size));
    }

    let version = read_le_u32(reader)?;
    if version != FMT_VERSION {
        return Err(TagError::FmtVersion(version));
    }

    // format ID and channel type
    skip(reader, 8)?;

    let channels = read_le_u32(reader)?;
    let sample_rate = read_le_u32(reader)?;
    let bit_depth = read_le_u32(reader)?;

    let samples_low = read_le_u32(reader)? as u64;
    let samples_high = read_le_u32(reader)? as u64;

    Ok(StreamInfo {
        sample_rate,
        channels,
        bit_depth,
        samples: (samples_high << 32) | samples_low,
    })
}

impl Metadata for DsfMetadata {
    fn format(&self) -> Format {
        self.tags.format()
    }

    fn file_type(&self) -> FileType {
        FileType::Dsf
    }

    fn title(&self) -> &str {
        self.tags.title()
    }

    fn album(&self) -> &str {
        self.tags.album()
    }

    fn artist(&self) -> &str {
        self.tags.artist()
    }

    fn album_artist(&self) -> &str {
        self.tags.album_artist()
    }

    fn composer(&self) -> &str {
        self.tags.composer()
    }

    fn genre(&self) -> &str {
        self.tags.genre()
    }

    fn year(&self) -> i32 {
        self.tags.year()
    }

    fn track(&self) -> (u32, u32) {
        self.tags.track()
    }

    fn disc(&self) -> (u32, u32) {
        self.tags.disc()
    }

    fn picture(&self) -> Option<&Picture> {
        self.tags.picture()
    }

    fn lyrics(&self) -> &str {
        self.tags.lyrics()
    }

    fn comment(&self) -> &str {
        self.tags.comment()
    }

    fn sample_rate(&self) -> u32 {
        self.stream.sample_rate
    }

    fn channels(&self) -> u32 {
        self.stream.channels
    }

    fn bit_depth(&self) -> u32 {
        self.stream.bit_depth
    }

    fn samples(&self) -> u64 {
        self.stream.samples
    }

    fn raw(&self) -> Map<String, Value> {
        self.tags.raw()
    }
}
