// OGG Vorbis / OGG Opus metadata support
//
// OGG File Structure:
// - OGG Page Header (27 bytes)
//   - Capture Pattern: "OggS" (4 bytes)
//   - Version: 0 (1 byte)
//   - Header Type: 1=continuation, 2=bos, 4=eos (1 byte)
//   - Granule Position (8 bytes)
//   - Bitstream Serial Number (4 bytes)
//   - Page Sequence Number (4 bytes)
//   - CRC Checksum (4 bytes)
//   - Number of Page Segments (1 byte)
//   - Segment Table (variable)
//
// The first packet is the identification header, the second the comment
// header wrapping a Vorbis comment block.

pub mod page;

use std::io::{Cursor, Read, Seek};

use crate::error::{Result, TagError};
use crate::flac::vorbis::VorbisMetadata;
use crate::metadata::{FileType, StreamInfo};

// OGG signature
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

const VORBIS_IDENTIFICATION: &[u8; 7] = b"\x01vorbis";
const VORBIS_COMMENT: &[u8; 7] = b"\x03vorbis";
const OPUS_HEAD: &[u8; 8] = b"OpusHead";
const OPUS_TAGS: &[u8; 8] = b"OpusTags";

/// Opus always decodes at 48 kHz and its granule positions count in it
const OPUS_SAMPLE_RATE: u32 = 48000;

/// Read the comment header and stream properties of an OGG Vorbis or OGG
/// Opus file
pub fn read_ogg<R: Read + Seek>(reader: &mut R) -> Result<VorbisMetadata> {
    let (serial, packets) = page::read_packets(reader, 2)?;
    let (identification, comment) = (&packets[0], &packets[1]);

    let mut metadata = VorbisMetadata::new(FileType::Ogg);
    let (stream, pre_skip, comment_body) = if identification.starts_with(VORBIS_IDENTIFICATION) {
        let body = comment
            .strip_prefix(VORBIS_COMMENT.as_slice())
            .ok_or(TagError::UnknownOggStream)?;
        (vorbis_stream_info(identification)?, 0, body)
    } else if identification.starts_with(OPUS_HEAD) {
        let body = comment
            .strip_prefix(OPUS_TAGS.as_slice())
            .ok_or(TagError::UnknownOggStream)?;
        let (stream, pre_skip) = opus_stream_info(identification)?;
        (stream, pre_skip, body)
    } else {
        return Err(TagError::UnknownOggStream);
    };

    metadata.read_comment(&mut Cursor::new(comment_body))?;

    let granule = page::last_granule_position(reader, serial);
    metadata.stream = StreamInfo {
        samples: granule.saturating_sub(pre_skip),
        ..stream
    };
    Ok(metadata)
}

fn le_u32_at(packet: &[u8], offset: usize) -> Result<u32> {
    let bytes = packet.get(offset..offset + 4).ok_or(TagError::UnknownOggStream)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn vorbis_stream_info(packet: &[u8]) -> Result<StreamInfo> {
    let channels = *packet.get(11).ok_or(TagError::UnknownOggStream)?;
    Ok(StreamInfo {
        sample_rate: le_u32_at(packet, 12)?,
        channels: channels as u32,
        ..StreamInfo::default()
    })
}

fn opus_stream_info(packet: &[u8]) -> Result<(StreamInfo, u64)> {
    let channels = *packet.get(9).ok_or(TagError::UnknownOggStream)?;
    let pre_skip = packet.get(10..12).ok_or(TagError::UnknownOggStream)?;
    let pre_skip = u16::from_le_bytes([pre_skip[0], pre_skip[1]]);
    let stream = StreamInfo {
        sample_rate: OPUS_SAMPLE_RATE,
        channels: channels as u32,
        ..StreamInfo::default()
    };
    Ok((stream, pre_skip as u64))
}
