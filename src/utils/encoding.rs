// Text decoding for ID3v2 frames

use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

/// Text encoding selected by the first byte of an ID3v2 text field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextEncoding {
    Iso8859_1 = 0,
    Utf16 = 1,
    Utf16BE = 2,
    Utf8 = 3,
}

impl TextEncoding {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            1 => TextEncoding::Utf16,
            2 => TextEncoding::Utf16BE,
            3 => TextEncoding::Utf8,
            _ => TextEncoding::Iso8859_1,
        }
    }

    /// Width of the string terminator in bytes
    fn terminator_width(self) -> usize {
        match self {
            TextEncoding::Utf16 | TextEncoding::Utf16BE => 2,
            TextEncoding::Iso8859_1 | TextEncoding::Utf8 => 1,
        }
    }
}

/// Decode text with specified encoding, dropping trailing terminators
pub fn decode_text(data: &[u8], encoding: TextEncoding) -> String {
    let text = match encoding {
        TextEncoding::Iso8859_1 => WINDOWS_1252.decode(data).0.into_owned(),
        TextEncoding::Utf16 => {
            if data.len() < 2 {
                String::new()
            } else if data[0..2] == [0xFF, 0xFE] {
                UTF_16LE.decode(&data[2..]).0.into_owned()
            } else if data[0..2] == [0xFE, 0xFF] {
                UTF_16BE.decode(&data[2..]).0.into_owned()
            } else {
                UTF_16LE.decode(data).0.into_owned()
            }
        }
        TextEncoding::Utf16BE => UTF_16BE.decode(data).0.into_owned(),
        TextEncoding::Utf8 => UTF_8.decode(data).0.into_owned(),
    };
    text.trim_end_matches('\0').to_string()
}

/// Split `data` at the first terminator for `encoding`.
///
/// Returns the bytes before the terminator and the bytes after it. When no
/// terminator exists the whole input is the head and the tail is empty.
pub fn split_terminated(data: &[u8], encoding: TextEncoding) -> (&[u8], &[u8]) {
    let width = encoding.terminator_width();
    let mut i = 0;
    while i + width <= data.len() {
        if data[i..i + width].iter().all(|&b| b == 0) {
            return (&data[..i], &data[i + width..]);
        }
        i += width;
    }
    (data, &[])
}
