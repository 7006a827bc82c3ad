// CLI command implementations
use anyhow::{bail, Context, Result};
use glob::glob;
use serde_json::{json, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use oxitag::{AudioFile, Metadata, Picture};

use crate::cli::config::{Commands, Config};
use crate::cli::output::OutputFormatter;

/// Run the parsed command line
pub fn run(config: &Config) -> Result<()> {
    let formatter = OutputFormatter::new(config.format, config.quiet);
    match &config.command {
        Commands::Read { files } => command_read(files, &formatter),
        Commands::Detect { files } => command_detect(files),
        Commands::ExportCover { file, output } => command_export_cover(file, output, &formatter),
    }
}

/// Expand glob patterns; plain paths are kept even when missing so the
/// open error names them
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            files.push(PathBuf::from(pattern));
            continue;
        }

        let matches = glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
        let before = files.len();
        for entry in matches {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => tracing::warn!("error reading path: {}", e),
            }
        }
        if files.len() == before {
            tracing::warn!("no files match {}", pattern);
        }
    }
    Ok(files)
}

/// Read metadata from files
pub fn command_read(patterns: &[String], formatter: &OutputFormatter) -> Result<()> {
    let files = expand_patterns(patterns)?;
    if files.is_empty() {
        bail!("No files specified");
    }

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut failed = 0;

    for path in &files {
        match read_file(path) {
            Ok(metadata) => {
                let value = metadata_to_json(path, metadata.as_ref());
                formatter.output_metadata(&value, &mut writer)?
            }
            Err(e) => {
                failed += 1;
                formatter.print_error(&format!("{}: {:#}", path.display(), e));
            }
        }
    }
    writer.flush()?;

    if failed == files.len() {
        bail!("Could not read any of {} file(s)", files.len());
    }
    Ok(())
}

/// Detect file format
pub fn command_detect(patterns: &[String]) -> Result<()> {
    for path in expand_patterns(patterns)? {
        match AudioFile::open(&path) {
            Ok(audio) => println!("{}: {}", path.display(), audio.file_type),
            Err(e) => eprintln!("✗ {}: {}", path.display(), e),
        }
    }
    Ok(())
}

/// Export the embedded picture as cover.<ext>
pub fn command_export_cover(file: &Path, output: &Path, formatter: &OutputFormatter) -> Result<()> {
    let metadata = read_file(file)?;
    let picture = metadata
        .picture()
        .with_context(|| format!("{} has no embedded picture", file.display()))?;

    fs::create_dir_all(output).with_context(|| format!("Failed to create {}", output.display()))?;
    let target = output.join(cover_file_name(picture));
    fs::write(&target, &picture.data)
        .with_context(|| format!("Failed to write {}", target.display()))?;

    formatter.print_success(&format!("Exported cover to {}", target.display()));
    Ok(())
}

fn read_file(path: &Path) -> Result<Box<dyn Metadata>> {
    let audio =
        AudioFile::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    audio
        .read_metadata()
        .with_context(|| format!("Failed to read {} tags", audio.file_type))
}

/// File name for an exported picture
pub fn cover_file_name(picture: &Picture) -> String {
    if picture.ext.is_empty() {
        "cover.bin".to_string()
    } else {
        format!("cover.{}", picture.ext)
    }
}

/// JSON view of the facade fields plus the raw dump
pub fn metadata_to_json(path: &Path, metadata: &dyn Metadata) -> Value {
    let (track, track_total) = metadata.track();
    let (disc, disc_total) = metadata.disc();
    let picture = metadata.picture().map(|p| {
        json!({
            "type": p.picture_type.as_str(),
            "mimeType": p.mime_type,
            "ext": p.ext,
            "description": p.description,
            "size": p.data.len(),
        })
    });
    let md5 = metadata
        .md5_sum()
        .map(|sum| sum.iter().map(|b| format!("{:02x}", b)).collect::<String>());

    json!({
        "path": path.display().to_string(),
        "fileType": metadata.file_type(),
        "format": metadata.format(),
        "title": metadata.title(),
        "artist": metadata.artist(),
        "albumArtist": metadata.album_artist(),
        "album": metadata.album(),
        "composer": metadata.composer(),
        "genre": metadata.genre(),
        "year": metadata.year(),
        "track": track,
        "trackTotal": track_total,
        "disc": disc,
        "discTotal": disc_total,
        "comment": metadata.comment(),
        "lyrics": metadata.lyrics(),
        "sampleRate": metadata.sample_rate(),
        "channels": metadata.channels(),
        "bitDepth": metadata.bit_depth(),
        "samples": metadata.samples(),
        "duration": metadata.duration(),
        "md5": md5,
        "picture": picture,
        "raw": metadata.raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::output::OutputFormat;
    use oxitag::PictureType;

    /// FLAC file holding only a comment block
    fn flac_with_comments(comments: &[&str]) -> Vec<u8> {
        let mut block = Vec::new();
        block.extend_from_slice(&4u32.to_le_bytes());
        block.extend_from_slice(b"test");
        block.extend_from_slice(&(comments.len() as u32).to_le_bytes());
        for comment in comments {
            block.extend_from_slice(&(comment.len() as u32).to_le_bytes());
            block.extend_from_slice(comment.as_bytes());
        }

        let mut file = b"fLaC".to_vec();
        file.push(0x84);
        file.extend_from_slice(&(block.len() as u32).to_be_bytes()[1..]);
        file.extend(block);
        file
    }

    #[test]
    fn test_cover_file_name() {
        let cover = |mime: &str| {
            Picture::new(PictureType::CoverFront, mime.to_string(), String::new(), vec![1])
        };
        let jpeg = cover("image/jpeg");
        let tiff = cover("image/tiff");
        assert_eq!(cover_file_name(&jpeg), "cover.jpg");
        assert_eq!(cover_file_name(&tiff), "cover.bin");
    }

    #[test]
    fn test_expand_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.flac"), b"").unwrap();
        fs::write(dir.path().join("b.flac"), b"").unwrap();
        fs::write(dir.path().join("c.dsf"), b"").unwrap();

        let pattern = format!("{}/*.flac", dir.path().display());
        let files = expand_patterns(&[pattern, "missing.ogg".to_string()]).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files[0].ends_with("a.flac"));
        assert!(files[1].ends_with("b.flac"));
        assert_eq!(files[2], PathBuf::from("missing.ogg"));
    }

    #[test]
    fn test_metadata_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.flac");
        let comments = ["TITLE=Song", "TRACKNUMBER=3", "TRACKTOTAL=9"];
        fs::write(&path, flac_with_comments(&comments)).unwrap();

        let metadata = read_file(&path).unwrap();
        let value = metadata_to_json(&path, metadata.as_ref());
        assert_eq!(value["fileType"], "FLAC");
        assert_eq!(value["format"], "Vorbis");
        assert_eq!(value["title"], "Song");
        assert_eq!(value["track"], 3);
        assert_eq!(value["trackTotal"], 9);
        assert_eq!(value["raw"]["title"], "Song");
        assert!(value["picture"].is_null());
    }

    #[test]
    fn test_export_cover_without_picture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.flac");
        fs::write(&path, flac_with_comments(&["TITLE=Song"])).unwrap();

        let formatter = OutputFormatter::new(OutputFormat::Pretty, true);
        let err = command_export_cover(&path, dir.path(), &formatter).unwrap_err();
        assert!(err.to_string().contains("no embedded picture"));
    }
}
