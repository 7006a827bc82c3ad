// ID3v2 metadata handling module
//
// Used directly for MP3 files and as the trailing tag of DSF files.

pub mod frames;
pub mod v2;

use std::io::Read;

use serde_json::{Map, Value};

use crate::dsf::{ReadSeek, TagDecoder};
use crate::error::Result;
use crate::flac::picture::Picture;
use crate::metadata::{parse_position, FileType, Format, Metadata};

use frames::{decode_comment_frame, decode_picture_frame, decode_text_frame, frame_ids};
pub use v2::{Id3Frame, Id3v2Header, Id3v2Tag};

/// Tags decoded from an ID3v2.3 or ID3v2.4 tag
#[derive(Debug, Clone)]
pub struct Id3v2Metadata {
    format: Format,
    frames: Vec<(String, String)>,
    picture: Option<Picture>,
}

impl Id3v2Metadata {
    /// Read a tag starting at the reader's current position
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let tag = Id3v2Tag::read(reader)?;
        let format = match tag.header.version.0 {
            3 => Format::Id3v2_3,
            _ => Format::Id3v2_4,
        };

        let mut frames = Vec::new();
        let mut picture = None;
        for frame in &tag.frames {
            let text = match frame.frame_id.as_str() {
                frame_ids::PICTURE => {
                    if let Some(p) = decode_picture_frame(&frame.data) {
                        picture = Some(p);
                    }
                    continue;
                }
                frame_ids::COMMENT | frame_ids::LYRICS => decode_comment_frame(&frame.data),
                id if id.starts_with('T') => decode_text_frame(&frame.data),
                _ => continue,
            };
            frames.push((frame.frame_id.clone(), text));
        }

        Ok(Id3v2Metadata { format, frames, picture })
    }

    /// First value stored for a frame id
    pub fn get(&self, frame_id: &str) -> Option<&str> {
        self.frames
            .iter()
            .find(|(id, _)| id == frame_id)
            .map(|(_, v)| v.as_str())
    }

    fn value(&self, frame_id: &str) -> &str {
        self.get(frame_id).unwrap_or("")
    }
}

impl Metadata for Id3v2Metadata {
    fn format(&self) -> Format {
        self.format
    }

    fn file_type(&self) -> FileType {
        FileType::Mp3
    }

    fn title(&self) -> &str {
        self.value(frame_ids::TITLE)
    }

    fn album(&self) -> &str {
        self.value(frame_ids::ALBUM)
    }

    fn artist(&self) -> &str {
        self.value(frame_ids::ARTIST)
    }

    fn album_artist(&self) -> &str {
        self.value(frame_ids::ALBUM_ARTIST)
    }

    fn composer(&self) -> &str {
        self.value(frame_ids::COMPOSER)
    }

    fn genre(&self) -> &str {
        self.value(frame_ids::GENRE)
    }

    fn year(&self) -> i32 {
        let date = match self.value(frame_ids::RECORDING_TIME) {
            "" => self.value(frame_ids::YEAR),
            date => date,
        };
        date.get(..4).and_then(|y| y.parse().ok()).unwrap_or(0)
    }

    fn track(&self) -> (u32, u32) {
        parse_position(self.value(frame_ids::TRACK))
    }

    fn disc(&self) -> (u32, u32) {
        parse_position(self.value(frame_ids::DISC))
    }

    fn picture(&self) -> Option<&Picture> {
        self.picture.as_ref()
    }

    fn lyrics(&self) -> &str {
        self.value(frame_ids::LYRICS)
    }

    fn comment(&self) -> &str {
        self.value(frame_ids::COMMENT)
    }

    fn sample_rate(&self) -> u32 {
        0
    }

    fn channels(&self) -> u32 {
        0
    }

    fn bit_depth(&self) -> u32 {
        0
    }

    fn samples(&self) -> u64 {
        0
    }

    fn raw(&self) -> Map<String, Value> {
        let mut raw = Map::new();
        for (id, value) in &self.frames {
            raw.entry(id.clone()).or_insert_with(|| Value::String(value.clone()));
        }
        raw
    }
}

/// [`TagDecoder`] reading an ID3v2 tag
#[derive(Debug, Clone, Copy, Default)]
pub struct Id3v2Decoder;

impl TagDecoder for Id3v2Decoder {
    fn decode(&self, reader: &mut dyn ReadSeek) -> Result<Box<dyn Metadata>> {
        Ok(Box::new(Id3v2Metadata::read(reader)?))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    /// Serialise an ID3v2.4 tag with the given (id, body) frames
    pub(crate) fn id3v24_tag(frames: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (id, data) in frames {
            body.extend_from_slice(id.as_bytes());
            body.extend_from_slice(&synchsafe(data.len() as u32));
            body.extend_from_slice(&[0, 0]);
            body.extend_from_slice(data);
        }
        body.extend_from_slice(&[0u8; 16]);

        let mut tag = b"ID3\x04\x00\x00".to_vec();
        tag.extend_from_slice(&synchsafe(body.len() as u32));
        tag.extend_from_slice(&body);
        tag
    }

    fn synchsafe(value: u32) -> [u8; 4] {
        [
            ((value >> 21) & 0x7F) as u8,
            ((value >> 14) & 0x7F) as u8,
            ((value >> 7) & 0x7F) as u8,
            (value & 0x7F) as u8,
        ]
    }

    pub(crate) fn text(value: &str) -> Vec<u8> {
        let mut data = vec![0x03];
        data.extend_from_slice(value.as_bytes());
        data
    }

    #[test]
    fn test_read_v24_tag() {
        let mut apic = b"\x00image/png\x00\x03\x00".to_vec();
        apic.extend_from_slice(b"\x89PNG");
        let tag = id3v24_tag(&[
            ("TIT2", text("Spem in alium")),
            ("TPE1", text("Tallis Scholars")),
            ("TCOM", text("Thomas Tallis")),
            ("TDRC", text("2012-03-01")),
            ("TRCK", text("4/11")),
            ("TPOS", text("1/1")),
            ("COMM", b"\x00eng\x00great".to_vec()),
            ("APIC", apic),
            ("PRIV", b"owner\x00data".to_vec()),
        ]);

        let metadata = Id3v2Metadata::read(&mut Cursor::new(tag)).unwrap();
        assert_eq!(metadata.format(), Format::Id3v2_4);
        assert_eq!(metadata.title(), "Spem in alium");
        assert_eq!(metadata.artist(), "Tallis Scholars");
        assert_eq!(metadata.composer(), "Thomas Tallis");
        assert_eq!(metadata.year(), 2012);
        assert_eq!(metadata.track(), (4, 11));
        assert_eq!(metadata.disc(), (1, 1));
        assert_eq!(metadata.comment(), "great");
        assert_eq!(metadata.picture().unwrap().ext, "png");
        assert_eq!(metadata.duration(), 0);

        let raw = metadata.raw();
        assert_eq!(raw["TIT2"], "Spem in alium");
        assert!(!raw.contains_key("PRIV"));
    }

    #[test]
    fn test_decoder_contract() {
        let tag = id3v24_tag(&[("TALB", text("Album"))]);
        let metadata = Id3v2Decoder.decode(&mut Cursor::new(tag)).unwrap();
        assert_eq!(metadata.album(), "Album");
    }
}
