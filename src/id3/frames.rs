// ID3v2 frame content decoding

use crate::flac::picture::{Picture, PictureType};
use crate::flac::vorbis::MULTI_VALUE_SEPARATOR;
use crate::utils::encoding::{decode_text, split_terminated, TextEncoding};

/// Common ID3v2.3/2.4 frame identifiers
pub mod frame_ids {
    pub const TITLE: &str = "TIT2"; // Title/songname/content description
    pub const ARTIST: &str = "TPE1"; // Lead performer(s)/Soloist(s)
    pub const ALBUM_ARTIST: &str = "TPE2"; // Band/orchestra/accompaniment
    pub const ALBUM: &str = "TALB"; // Album/Movie/Show title
    pub const COMPOSER: &str = "TCOM"; // Composer
    pub const YEAR: &str = "TYER"; // Year (v2.3)
    pub const RECORDING_TIME: &str = "TDRC"; // Recording time (v2.4)
    pub const TRACK: &str = "TRCK"; // Track number/Position in set
    pub const DISC: &str = "TPOS"; // Part of a set
    pub const GENRE: &str = "TCON"; // Content type
    pub const COMMENT: &str = "COMM"; // Comments
    pub const LYRICS: &str = "USLT"; // Unsynchronised lyrics
    pub const PICTURE: &str = "APIC"; // Attached picture
}

/// Decode text frame data; v2.4 multi-value lists are joined with the
/// Vorbis multi-value separator
pub fn decode_text_frame(data: &[u8]) -> String {
    if data.is_empty() {
        return String::new();
    }

    let encoding = TextEncoding::from_byte(data[0]);
    decode_text(&data[1..], encoding).replace('\0', MULTI_VALUE_SEPARATOR)
}

/// Decode a COMM or USLT frame into its text, skipping language and
/// content descriptor
pub fn decode_comment_frame(data: &[u8]) -> String {
    if data.len() < 4 {
        return String::new();
    }

    let encoding = TextEncoding::from_byte(data[0]);
    let (_description, text) = split_terminated(&data[4..], encoding);
    decode_text(text, encoding)
}

/// Decode an APIC frame, `None` if it is too short to hold the fixed fields
pub fn decode_picture_frame(data: &[u8]) -> Option<Picture> {
    let (&encoding_byte, rest) = data.split_first()?;
    let encoding = TextEncoding::from_byte(encoding_byte);

    // MIME type is always ISO-8859-1
    let (mime, rest) = split_terminated(rest, TextEncoding::Iso8859_1);
    let mime_type = decode_text(mime, TextEncoding::Iso8859_1);

    let (&code, rest) = rest.split_first()?;
    let picture_type = PictureType::from_code(code as u32).unwrap_or(PictureType::Other);

    let (description, image) = split_terminated(rest, encoding);
    let description = decode_text(description, encoding);

    Some(Picture::new(picture_type, mime_type, description, image.to_vec()))
}
