//! Oxitag - read tags and stream properties from audio files
//!
//! Supported containers are FLAC, DSF (with its trailing ID3v2 tag), OGG
//! Vorbis/Opus and ID3v2-tagged MP3. Every decoder reads the metadata in one
//! forward pass and never touches the audio payload.
//!
//! ```no_run
//! use oxitag::{AudioFile, Metadata};
//!
//! let file = AudioFile::open("track.flac")?;
//! let metadata = file.read_metadata()?;
//! println!("{} - {}", metadata.artist(), metadata.title());
//! # Ok::<(), oxitag::TagError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

pub mod dsf;
pub mod error;
pub mod flac;
pub mod id3;
pub mod metadata;
pub mod ogg;
mod utils;

pub use dsf::{DsfMetadata, ReadSeek, TagDecoder, DSF_SIGNATURE};
pub use error::{ErrorKind, TagError};
pub use flac::{
    CommentTable, FlacMetadata, Picture, PictureType, VorbisMetadata, FLAC_SIGNATURE,
};
pub use id3::{Id3v2Decoder, Id3v2Metadata};
pub use metadata::{FileType, Format, Metadata, StreamInfo};
pub use ogg::OGG_SIGNATURE;

use error::Result;
use utils::io::read_up_to;

const ID3_SIGNATURE: &[u8; 3] = b"ID3";

/// Read FLAC metadata blocks
pub fn read_flac_tags<R: Read + Seek>(reader: &mut R) -> Result<FlacMetadata> {
    FlacMetadata::read(reader)
}

/// Read a DSF file and its trailing ID3v2 tag
pub fn read_dsf_tags<R: Read + Seek>(reader: &mut R) -> Result<DsfMetadata> {
    DsfMetadata::read(reader)
}

/// Read a DSF file, decoding the trailing tag with `decoder`
pub fn read_dsf_tags_with<R: Read + Seek, D: TagDecoder + ?Sized>(
    reader: &mut R,
    decoder: &D,
) -> Result<DsfMetadata> {
    DsfMetadata::read_with(reader, decoder)
}

/// Read the comment header of an OGG Vorbis or OGG Opus file
pub fn read_ogg_tags<R: Read + Seek>(reader: &mut R) -> Result<VorbisMetadata> {
    ogg::read_ogg(reader)
}

/// Read an ID3v2 tag at the start of the stream
pub fn read_id3v2_tags<R: Read + Seek>(reader: &mut R) -> Result<Id3v2Metadata> {
    Id3v2Metadata::read(reader)
}

/// Decode a bare Vorbis comment block at the current position
pub fn read_vorbis_comment<R: Read + ?Sized>(reader: &mut R) -> Result<VorbisMetadata> {
    let mut metadata = VorbisMetadata::new(FileType::Unknown);
    metadata.read_comment(reader)?;
    Ok(metadata)
}

/// Identify the container from its leading bytes, leaving the stream at 0
pub fn detect_file_type<R: Read + Seek>(reader: &mut R) -> Result<FileType> {
    reader.seek(SeekFrom::Start(0))?;
    let mut signature = [0u8; 4];
    let read = read_up_to(reader, &mut signature)?;
    reader.seek(SeekFrom::Start(0))?;

    let signature = &signature[..read];
    let file_type = if signature == FLAC_SIGNATURE {
        FileType::Flac
    } else if signature == DSF_SIGNATURE {
        FileType::Dsf
    } else if signature == OGG_SIGNATURE {
        FileType::Ogg
    } else if signature.starts_with(ID3_SIGNATURE) {
        FileType::Mp3
    } else {
        FileType::Unknown
    };
    Ok(file_type)
}

/// Read metadata from any supported container, chosen by its signature
pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Box<dyn Metadata>> {
    let file_type = detect_file_type(reader)?;
    tracing::debug!(%file_type, "detected container");

    let metadata: Box<dyn Metadata> = match file_type {
        FileType::Flac => Box::new(read_flac_tags(reader)?),
        FileType::Dsf => Box::new(read_dsf_tags(reader)?),
        FileType::Ogg => Box::new(read_ogg_tags(reader)?),
        FileType::Mp3 => Box::new(read_id3v2_tags(reader)?),
        FileType::Unknown => {
            let mut signature = [0u8; 4];
            let read = read_up_to(reader, &mut signature)?;
            return Err(TagError::MagicMismatch {
                expected: "fLaC, DSD , OggS or ID3",
                found: String::from_utf8_lossy(&signature[..read]).into_owned(),
            });
        }
    };
    Ok(metadata)
}

/// An audio file on disk
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub path: PathBuf,
    pub file_type: FileType,
}

impl AudioFile {
    /// Open `path` and detect its container
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = BufReader::new(File::open(&path)?);
        let file_type = detect_file_type(&mut reader)?;
        tracing::debug!(path = %path.display(), %file_type, "opened audio file");
        Ok(AudioFile { path, file_type })
    }

    /// Read metadata from the audio file
    pub fn read_metadata(&self) -> Result<Box<dyn Metadata>> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        let result = read_from(&mut reader);
        if let Err(e) = &result {
            tracing::debug!(path = %self.path.display(), error = %e, "failed to read tags");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsf::tests::{dsf_file, DsfLayout};
    use crate::flac::tests::{flac_file, stream_info_block};
    use crate::flac::vorbis::tests::comment_block;
    use crate::id3::tests::{id3v24_tag, text};
    use crate::ogg::tests::ogg_vorbis_file;
    use std::io::{Cursor, Write};

    #[test]
    fn test_detect_file_type() {
        let cases: [(&[u8], FileType); 6] = [
            (b"fLaC\x00", FileType::Flac),
            (b"DSD \x1c", FileType::Dsf),
            (b"OggS\x00", FileType::Ogg),
            (b"ID3\x04", FileType::Mp3),
            (b"RIFF", FileType::Unknown),
            (b"fL", FileType::Unknown),
        ];
        for (bytes, expected) in cases {
            assert_eq!(detect_file_type(&mut Cursor::new(bytes)).unwrap(), expected);
        }
    }

    /// Cursor that hands out one byte per read call
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let end = buf.len().min(1);
            self.0.read(&mut buf[..end])
        }
    }

    impl Seek for Trickle {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.0.seek(pos)
        }
    }

    #[test]
    fn test_detect_file_type_with_short_reads() {
        let mut reader = Trickle(Cursor::new(b"DSD \x1c\x00".to_vec()));
        assert_eq!(detect_file_type(&mut reader).unwrap(), FileType::Dsf);
        assert_eq!(reader.0.position(), 0);

        let flac = flac_file(&[(4, comment_block("v", &["TITLE=slow"]))]);
        let metadata = read_from(&mut Trickle(Cursor::new(flac))).unwrap();
        assert_eq!(metadata.title(), "slow");
    }

    #[test]
    fn test_read_from_dispatches_by_signature() {
        let flac = flac_file(&[
            (0, stream_info_block(96000, 2, 24, 96000 * 3)),
            (4, comment_block("v", &["TITLE=flac"])),
        ]);
        let dsf = dsf_file(&DsfLayout::default(), &id3v24_tag(&[("TIT2", text("dsf"))]));
        let ogg = ogg_vorbis_file(&["TITLE=ogg"], 0);
        let mp3 = id3v24_tag(&[("TIT2", text("mp3"))]);

        for (file, title, file_type) in [
            (flac, "flac", FileType::Flac),
            (dsf, "dsf", FileType::Dsf),
            (ogg, "ogg", FileType::Ogg),
            (mp3, "mp3", FileType::Mp3),
        ] {
            let metadata = read_from(&mut Cursor::new(file)).unwrap();
            assert_eq!(metadata.title(), title);
            assert_eq!(metadata.file_type(), file_type);
        }
    }

    #[test]
    fn test_dsf_format_comes_from_delegate() {
        let dsf = dsf_file(&DsfLayout::default(), &id3v24_tag(&[("TIT2", text("dsf"))]));
        let metadata = read_dsf_tags(&mut Cursor::new(dsf)).unwrap();
        assert_eq!(metadata.format(), Format::Id3v2_4);
        assert_eq!(metadata.raw()["TIT2"], "dsf");
    }

    #[test]
    fn test_read_from_unknown() {
        let err = read_from(&mut Cursor::new(b"RIFF\x00\x00".to_vec())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MagicMismatch);
    }

    #[test]
    fn test_audio_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&flac_file(&[(4, comment_block("v", &["ALBUM=On Disk"]))])).unwrap();

        let audio = AudioFile::open(file.path()).unwrap();
        assert_eq!(audio.file_type, FileType::Flac);
        assert_eq!(audio.read_metadata().unwrap().album(), "On Disk");
    }

    #[test]
    fn test_bare_vorbis_comment() {
        let block = comment_block("v", &["ARTIST=x"]);
        let metadata = read_vorbis_comment(&mut Cursor::new(block)).unwrap();
        assert_eq!(metadata.file_type(), FileType::Unknown);
        assert_eq!(metadata.artist(), "x");
    }
}
