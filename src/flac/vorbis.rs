// VORBIS_COMMENT decoding, shared by FLAC and OGG

use std::io::{Cursor, Read};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::error::{Result, TagError};
use crate::flac::picture::Picture;
use crate::metadata::{parse_number, parse_year, FileType, Format, Metadata, StreamInfo};
use crate::utils::io::{read_le_prefixed_string, read_le_u32};

/// Separator placed between the values of a repeated comment key
pub const MULTI_VALUE_SEPARATOR: &str = "\\\\";

/// Common Vorbis comment field names, lower-cased
pub struct VorbisFields;
impl VorbisFields {
    pub const VENDOR: &str = "vendor";
    pub const TITLE: &str = "title";
    pub const ARTIST: &str = "artist";
    pub const PERFORMER: &str = "performer";
    pub const ALBUM: &str = "album";
    pub const ALBUMARTIST: &str = "albumartist";
    pub const COMPOSER: &str = "composer";
    pub const DATE: &str = "date";
    pub const TRACKNUMBER: &str = "tracknumber";
    pub const TRACKTOTAL: &str = "tracktotal";
    pub const DISCNUMBER: &str = "discnumber";
    pub const DISCTOTAL: &str = "disctotal";
    pub const GENRE: &str = "genre";
    pub const COMMENT: &str = "comment";
    pub const DESCRIPTION: &str = "description";
    pub const LYRICS: &str = "lyrics";
    pub const PICTURE: &str = "metadata_block_picture";
}

/// Insertion-ordered comment table keyed by lower-cased field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentTable {
    entries: Vec<(String, String)>,
}

impl CommentTable {
    pub fn new() -> Self {
        CommentTable::default()
    }

    /// Add a value; a repeated key has the value appended to the existing one
    pub fn insert(&mut self, key: &str, value: &str) {
        let key = key.to_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.push_str(MULTI_VALUE_SEPARATOR);
                existing.push_str(value);
            }
            None => self.entries.push((key, value.to_string())),
        }
    }

    /// Get a comment value by field name, case-insensitively
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key`, or the empty string
    pub fn value(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tags from a Vorbis comment block, plus the stream properties of the
/// container that carried it
#[derive(Debug, Clone, Default)]
pub struct VorbisMetadata {
    pub(crate) file_type: FileType,
    pub(crate) stream: StreamInfo,
    pub(crate) comments: CommentTable,
    pub(crate) picture: Option<Picture>,
}

impl VorbisMetadata {
    pub fn new(file_type: FileType) -> Self {
        VorbisMetadata {
            file_type,
            ..VorbisMetadata::default()
        }
    }

    pub fn comments(&self) -> &CommentTable {
        &self.comments
    }

    pub fn stream_info(&self) -> &StreamInfo {
        &self.stream
    }

    /// Read a comment block and merge it into this value.
    ///
    /// The vendor string, every comment and an embedded base64 picture are
    /// decoded; any malformed entry aborts the whole block.
    pub fn read_comment<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        let vendor = read_le_prefixed_string(reader)?;
        self.comments.insert(VorbisFields::VENDOR, &vendor);

        let comment_count = read_le_u32(reader)?;
        for _ in 0..comment_count {
            let comment = read_le_prefixed_string(reader)?;
            let (key, value) = comment
                .split_once('=')
                .ok_or_else(|| TagError::MissingCommentSeparator(comment.clone()))?;
            self.comments.insert(key, value);
        }

        if let Some(encoded) = self.comments.get(VorbisFields::PICTURE) {
            // line breaks from wrapped encoders are not part of the payload
            let encoded: String = encoded.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
            let data = STANDARD.decode(encoded)?;
            self.read_picture(&mut Cursor::new(data))?;
        }

        Ok(())
    }

    /// Read a PICTURE block body, replacing any earlier picture
    pub fn read_picture<R: Read + ?Sized>(&mut self, reader: &mut R) -> Result<()> {
        self.picture = Some(Picture::read(reader)?);
        Ok(())
    }
}

impl Metadata for VorbisMetadata {
    fn format(&self) -> Format {
        Format::Vorbis
    }

    fn file_type(&self) -> FileType {
        self.file_type
    }

    fn title(&self) -> &str {
        self.comments.value(VorbisFields::TITLE)
    }

    fn album(&self) -> &str {
        self.comments.value(VorbisFields::ALBUM)
    }

    fn artist(&self) -> &str {
        // PERFORMER is the conductor/orchestra/soloists in classical tagging
        match self.comments.value(VorbisFields::PERFORMER) {
            "" => self.comments.value(VorbisFields::ARTIST),
            performer => performer,
        }
    }

    fn album_artist(&self) -> &str {
        self.comments.value(VorbisFields::ALBUMARTIST)
    }

    fn composer(&self) -> &str {
        // With a PERFORMER present, ARTIST names the composer
        match self.comments.value(VorbisFields::COMPOSER) {
            "" if self.comments.value(VorbisFields::PERFORMER).is_empty() => "",
            "" => self.comments.value(VorbisFields::ARTIST),
            composer => composer,
        }
    }

    fn genre(&self) -> &str {
        self.comments.value(VorbisFields::GENRE)
    }

    fn year(&self) -> i32 {
        parse_year(self.comments.value(VorbisFields::DATE))
    }

    fn track(&self) -> (u32, u32) {
        (
            parse_number(self.comments.value(VorbisFields::TRACKNUMBER)),
            parse_number(self.comments.value(VorbisFields::TRACKTOTAL)),
        )
    }

    fn disc(&self) -> (u32, u32) {
        (
            parse_number(self.comments.value(VorbisFields::DISCNUMBER)),
            parse_number(self.comments.value(VorbisFields::DISCTOTAL)),
        )
    }

    fn picture(&self) -> Option<&Picture> {
        self.picture.as_ref()
    }

    fn lyrics(&self) -> &str {
        self.comments.value(VorbisFields::LYRICS)
    }

    fn comment(&self) -> &str {
        match self.comments.value(VorbisFields::COMMENT) {
            "" => self.comments.value(VorbisFields::DESCRIPTION),
            comment => comment,
        }
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
        let mut raw = Map::new();
        self.stream.write_raw(&mut raw);
        for (key, value) in self.comments.iter() {
            raw.insert(key.to_string(), Value::String(value.to_string()));
        }
        raw
    }
}
