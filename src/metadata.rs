// Uniform read-only view over every supported tag backend

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::flac::picture::Picture;

/// Tag format backing a [`Metadata`] value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Format {
    Vorbis,
    #[serde(rename = "ID3v2.3")]
    Id3v2_3,
    #[serde(rename = "ID3v2.4")]
    Id3v2_4,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Vorbis => write!(f, "Vorbis"),
            Format::Id3v2_3 => write!(f, "ID3v2.3"),
            Format::Id3v2_4 => write!(f, "ID3v2.4"),
        }
    }
}

/// Container the tags were read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FileType {
    #[serde(rename = "FLAC")]
    Flac,
    #[serde(rename = "OGG")]
    Ogg,
    #[serde(rename = "DSF")]
    Dsf,
    #[serde(rename = "MP3")]
    Mp3,
    #[default]
    Unknown,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Flac => write!(f, "FLAC"),
            FileType::Ogg => write!(f, "OGG"),
            FileType::Dsf => write!(f, "DSF"),
            FileType::Mp3 => write!(f, "MP3"),
            FileType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Audio stream properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: u32,
    pub bit_depth: u32,
    pub samples: u64,
}

impl StreamInfo {
    /// Length in whole seconds; zero when the sample rate is unknown
    pub fn duration(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.samples / self.sample_rate as u64
    }

    /// Underscore-prefixed entries for the non-zero properties
    pub(crate) fn write_raw(&self, raw: &mut Map<String, Value>) {
        if self.sample_rate > 0 {
            raw.insert("_sampleRate".to_string(), self.sample_rate.into());
        }
        if self.samples > 0 {
            raw.insert("_samples".to_string(), self.samples.into());
        }
        if self.channels > 0 {
            raw.insert("_channels".to_string(), self.channels.into());
        }
        if self.bit_depth > 0 {
            raw.insert("_bitdepth".to_string(), self.bit_depth.into());
        }
    }
}

/// Metadata read from an audio file.
///
/// Every accessor returns the field's zero value when the data is missing.
pub trait Metadata: std::fmt::Debug + Send + Sync {
    fn format(&self) -> Format;
    fn file_type(&self) -> FileType;

    fn title(&self) -> &str;
    fn album(&self) -> &str;
    fn artist(&self) -> &str;
    fn album_artist(&self) -> &str;
    fn composer(&self) -> &str;
    fn genre(&self) -> &str;
    fn year(&self) -> i32;

    /// Track number and total
    fn track(&self) -> (u32, u32);
    /// Disc number and total
    fn disc(&self) -> (u32, u32);

    fn picture(&self) -> Option<&Picture>;
    fn lyrics(&self) -> &str;
    fn comment(&self) -> &str;

    fn sample_rate(&self) -> u32;
    fn channels(&self) -> u32;
    fn bit_depth(&self) -> u32;
    fn samples(&self) -> u64;

    /// Duration in whole seconds
    fn duration(&self) -> u64 {
        StreamInfo {
            sample_rate: self.sample_rate(),
            channels: self.channels(),
            bit_depth: self.bit_depth(),
            samples: self.samples(),
        }
        .duration()
    }

    /// MD5 of the unencoded audio, only present in FLAC stream info
    fn md5_sum(&self) -> Option<&[u8; 16]> {
        None
    }

    /// Every raw key/value the backend holds
    fn raw(&self) -> Map<String, Value>;
}

/// Year from an ISO 8601 date whose length selects the pattern.
///
/// `YYYY`, `YYYY-MM` and `YYYY-MM-DD` are accepted; anything else yields 0.
pub(crate) fn parse_year(date: &str) -> i32 {
    let parsed = match date.len() {
        4 => return date.parse::<u16>().map(i32::from).unwrap_or(0),
        7 => NaiveDate::parse_from_str(&format!("{date}-01"), "%Y-%m-%d"),
        10 => NaiveDate::parse_from_str(date, "%Y-%m-%d"),
        _ => return 0,
    };
    parsed.map(|d| d.year()).unwrap_or(0)
}

/// Parse a number, treating anything unparsable as 0
pub(crate) fn parse_number(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}

/// Split an ID3-style "n/m" position into its parts
pub(crate) fn parse_position(value: &str) -> (u32, u32) {
    match value.split_once('/') {
        Some((n, total)) => (parse_number(n), parse_number(total)),
        None => (parse_number(value), 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_patterns() {
        assert_eq!(parse_year("2016"), 2016);
        assert_eq!(parse_year("2016-05"), 2016);
        assert_eq!(parse_year("2016-05-02"), 2016);
    }

    #[test]
    fn test_year_other_lengths() {
        assert_eq!(parse_year(""), 0);
        assert_eq!(parse_year("16"), 0);
        assert_eq!(parse_year("2016-5-2"), 0);
        assert_eq!(parse_year("2016-05-02T10:00"), 0);
        assert_eq!(parse_year("abcd"), 0);
        assert_eq!(parse_year("2016-13"), 0);
    }

    #[test]
    fn test_duration_floors() {
        let info = StreamInfo {
            sample_rate: 44100,
            channels: 2,
            bit_depth: 16,
            samples: 44100 * 3 + 44099,
        };
        assert_eq!(info.duration(), 3);
    }

    #[test]
    fn test_duration_zero_rate() {
        for samples in [0, 1, 44100, u64::MAX] {
            let info = StreamInfo { samples, ..StreamInfo::default() };
            assert_eq!(info.duration(), 0);
        }
    }

    #[test]
    fn test_raw_skips_zero_properties() {
        let mut raw = Map::new();
        StreamInfo { sample_rate: 48000, ..StreamInfo::default() }.write_raw(&mut raw);
        assert_eq!(raw.len(), 1);
        assert_eq!(raw["_sampleRate"], 48000);
    }

    #[test]
    fn test_position() {
        assert_eq!(parse_position("3/12"), (3, 12));
        assert_eq!(parse_position("7"), (7, 0));
        assert_eq!(parse_position("x/y"), (0, 0));
    }
}
