// PICTURE block decoding, shared by FLAC, Vorbis comments and ID3v2

use std::io::Read;

use crate::error::{Result, TagError};
use crate::utils::io::{read_be_prefixed_string, read_be_u32, read_bytes};

/// Picture type codes shared by FLAC PICTURE blocks and ID3v2 APIC frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureType {
    Other = 0,
    FileIcon = 1,
    OtherFileIcon = 2,
    CoverFront = 3,
    CoverBack = 4,
    LeafletPage = 5,
    Media = 6,
    LeadArtist = 7,
    Artist = 8,
    Conductor = 9,
    Band = 10,
    Composer = 11,
    Lyricist = 12,
    RecordingLocation = 13,
    DuringRecording = 14,
    DuringPerformance = 15,
    VideoScreenCapture = 16,
    BrightColouredFish = 17,
    Illustration = 18,
    BandLogo = 19,
    PublisherLogo = 20,
}

impl PictureType {
    /// Classify a picture type code; codes outside 0..=20 are not recognised
    pub fn from_code(code: u32) -> Option<Self> {
        let picture_type = match code {
            0 => PictureType::Other,
            1 => PictureType::FileIcon,
            2 => PictureType::OtherFileIcon,
            3 => PictureType::CoverFront,
            4 => PictureType::CoverBack,
            5 => PictureType::LeafletPage,
            6 => PictureType::Media,
            7 => PictureType::LeadArtist,
            8 => PictureType::Artist,
            9 => PictureType::Conductor,
            10 => PictureType::Band,
            11 => PictureType::Composer,
            12 => PictureType::Lyricist,
            13 => PictureType::RecordingLocation,
            14 => PictureType::DuringRecording,
            15 => PictureType::DuringPerformance,
            16 => PictureType::VideoScreenCapture,
            17 => PictureType::BrightColouredFish,
            18 => PictureType::Illustration,
            19 => PictureType::BandLogo,
            20 => PictureType::PublisherLogo,
            _ => return None,
        };
        Some(picture_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PictureType::Other => "Other",
            PictureType::FileIcon => "32x32 pixels 'file icon' (PNG only)",
            PictureType::OtherFileIcon => "Other file icon",
            PictureType::CoverFront => "Cover (front)",
            PictureType::CoverBack => "Cover (back)",
            PictureType::LeafletPage => "Leaflet page",
            PictureType::Media => "Media (e.g. label side of CD)",
            PictureType::LeadArtist => "Lead artist/lead performer/soloist",
            PictureType::Artist => "Artist/performer",
            PictureType::Conductor => "Conductor",
            PictureType::Band => "Band/Orchestra",
            PictureType::Composer => "Composer",
            PictureType::Lyricist => "Lyricist/text writer",
            PictureType::RecordingLocation => "Recording Location",
            PictureType::DuringRecording => "During recording",
            PictureType::DuringPerformance => "During performance",
            PictureType::VideoScreenCapture => "Movie/video screen capture",
            PictureType::BrightColouredFish => "A bright coloured fish",
            PictureType::Illustration => "Illustration",
            PictureType::BandLogo => "Band/artist logotype",
            PictureType::PublisherLogo => "Publisher/Studio logotype",
        }
    }
}

impl std::fmt::Display for PictureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Embedded cover art
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub picture_type: PictureType,
    pub mime_type: String,
    /// File extension inferred from the MIME type, empty when unknown
    pub ext: String,
    pub description: String,
    pub data: Vec<u8>,
}

impl Picture {
    pub fn new(
        picture_type: PictureType,
        mime_type: String,
        description: String,
        data: Vec<u8>,
    ) -> Self {
        let ext = extension_for_mime(&mime_type).to_string();
        Picture {
            picture_type,
            mime_type,
            ext,
            description,
            data,
        }
    }

    /// Read a PICTURE block body from `reader`
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let code = read_be_u32(reader)?;
        let picture_type = PictureType::from_code(code).ok_or(TagError::InvalidPictureType(code))?;

        let mime_type = read_be_prefixed_string(reader)?;
        let description = read_be_prefixed_string(reader)?;

        // width, height, colour depth and colours used are not modelled
        for _ in 0..4 {
            read_be_u32(reader)?;
        }

        let data_length = read_be_u32(reader)? as usize;
        let data = read_bytes(reader, data_length)?;

        Ok(Picture::new(picture_type, mime_type, description, data))
    }
}

/// Extension for the MIME types we recognise
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        _ => "",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    /// Serialise a PICTURE block body the way encoders lay it out
    pub(crate) fn picture_block(code: u32, mime: &str, description: &str, data: &[u8]) -> Vec<u8> {
        let mut block = Vec::new();
        block.extend_from_slice(&code.to_be_bytes());
        block.extend_from_slice(&(mime.len() as u32).to_be_bytes());
        block.extend_from_slice(mime.as_bytes());
        block.extend_from_slice(&(description.len() as u32).to_be_bytes());
        block.extend_from_slice(description.as_bytes());
        for value in [300u32, 300, 24, 0] {
            block.extend_from_slice(&value.to_be_bytes());
        }
        block.extend_from_slice(&(data.len() as u32).to_be_bytes());
        block.extend_from_slice(data);
        block
    }

    #[test]
    fn test_png_front_cover() {
        let payload = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let block = picture_block(3, "image/png", "front", &payload);
        let picture = Picture::read(&mut Cursor::new(block)).unwrap();

        assert_eq!(picture.picture_type, PictureType::CoverFront);
        assert_eq!(picture.mime_type, "image/png");
        assert_eq!(picture.ext, "png");
        assert_eq!(picture.description, "front");
        assert_eq!(picture.data, payload);
    }

    #[test]
    fn test_unknown_mime_has_empty_extension() {
        let block = picture_block(4, "image/webp", "", b"RIFF");
        let picture = Picture::read(&mut Cursor::new(block)).unwrap();
        assert_eq!(picture.picture_type, PictureType::CoverBack);
        assert_eq!(picture.ext, "");
    }

    #[test]
    fn test_extension_is_exact_match() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/gif"), "gif");
        assert_eq!(extension_for_mime("image/jpg"), "");
        assert_eq!(extension_for_mime("IMAGE/PNG"), "");
    }

    #[test]
    fn test_invalid_type_code() {
        let block = picture_block(21, "image/png", "", b"x");
        let err = Picture::read(&mut Cursor::new(block)).unwrap_err();
        assert!(matches!(err, TagError::InvalidPictureType(21)));
    }

    #[test]
    fn test_truncated_payload_is_io_error() {
        let mut block = picture_block(3, "image/jpeg", "", &[0xFF, 0xD8, 0xFF, 0xE0]);
        block.truncate(block.len() - 2);
        let err = Picture::read(&mut Cursor::new(block)).unwrap_err();
        assert!(matches!(err, TagError::Io(_)));
    }

    #[test]
    fn test_oversized_data_length_is_io_error() {
        let mut block = picture_block(3, "image/png", "", b"");
        let len = block.len();
        block[len - 4..].copy_from_slice(&u32::MAX.to_be_bytes());
        block.extend_from_slice(b"\x89PNG");
        let err = Picture::read(&mut Cursor::new(block)).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }

    #[test]
    fn test_every_code_in_range_classifies() {
        for code in 0..=20 {
            assert_eq!(PictureType::from_code(code).map(|t| t as u32), Some(code));
        }
        assert_eq!(PictureType::from_code(255), None);
    }
}
