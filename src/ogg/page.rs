use std::io::{Read, Seek};

use crate::error::{Result, TagError};
use crate::ogg::OGG_SIGNATURE;
use crate::utils::io::{read_bytes, skip};

/// Lacing value that continues a packet into the next segment
const CONTINUED_SEGMENT: u8 = 255;

/// OGG Page Header
#[derive(Debug, Clone)]
pub struct OggPageHeader {
    pub header_type: u8,
    pub granule_position: u64,
    pub bitstream_serial: u32,
    pub page_sequence: u32,
    pub segment_table: Vec<u8>,
}

impl OggPageHeader {
    /// Read OGG page header from a reader
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let mut header = [0u8; 27];
        reader.read_exact(&mut header)?;

        if &header[0..4] != OGG_SIGNATURE {
            return Err(TagError::magic("OggS", &header[0..4]));
        }

        let mut field = [0u8; 8];
        field.copy_from_slice(&header[6..14]);
        let granule_position = u64::from_le_bytes(field);

        let mut field = [0u8; 4];
        field.copy_from_slice(&header[14..18]);
        let bitstream_serial = u32::from_le_bytes(field);
        field.copy_from_slice(&header[18..22]);
        let page_sequence = u32::from_le_bytes(field);

        // Read segment table
        let segment_table = read_bytes(reader, header[26] as usize)?;

        Ok(OggPageHeader {
            header_type: header[5],
            granule_position,
            bitstream_serial,
            page_sequence,
            segment_table,
        })
    }

    /// Calculate total page data size from segment table
    pub fn data_size(&self) -> usize {
        self.segment_table.iter().map(|&x| x as usize).sum()
    }
}

/// Reassemble the first `count` packets of the stream.
///
/// Packets may span segments and pages; a segment shorter than 255 bytes
/// ends the packet.
pub fn read_packets<R: Read + ?Sized>(reader: &mut R, count: usize) -> Result<(u32, Vec<Vec<u8>>)> {
    let mut packets = Vec::with_capacity(count);
    let mut partial = Vec::new();
    let mut serial = 0;

    while packets.len() < count {
        let header = OggPageHeader::read(reader)?;
        serial = header.bitstream_serial;
        let data = read_bytes(reader, header.data_size())?;

        let mut offset = 0;
        for &lacing in &header.segment_table {
            partial.extend_from_slice(&data[offset..offset + lacing as usize]);
            offset += lacing as usize;
            if lacing != CONTINUED_SEGMENT {
                packets.push(std::mem::take(&mut partial));
                if packets.len() == count {
                    break;
                }
            }
        }
    }

    Ok((serial, packets))
}

/// Granule position of the last page of stream `serial`.
///
/// Scanning stops at the first page that cannot be read, so a truncated
/// tail yields the last complete page's position.
pub fn last_granule_position<R: Read + Seek + ?Sized>(reader: &mut R, serial: u32) -> u64 {
    let mut granule = 0;
    while let Ok(header) = OggPageHeader::read(reader) {
        if header.bitstream_serial == serial && header.granule_position != u64::MAX {
            granule = header.granule_position;
        }
        if skip(reader, header.data_size() as i64).is_err() {
            break;
        }
    }
    granule
}
