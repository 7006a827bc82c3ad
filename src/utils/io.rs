// Byte-stream helpers shared by the container decoders

use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Read exactly `len` bytes.
///
/// Lengths come from the file, so the buffer grows with the data actually
/// read instead of being allocated up front.
pub fn read_bytes<R: Read + ?Sized>(reader: &mut R, len: usize) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    (&mut *reader).take(len as u64).read_to_end(&mut buffer)?;
    if buffer.len() < len {
        return Err(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("expected {} bytes, found {}", len, buffer.len()),
        ));
    }
    Ok(buffer)
}

/// Fill `buffer` as far as the stream allows, returning the byte count
pub fn read_up_to<R: Read + ?Sized>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read `len` bytes as text, replacing invalid UTF-8
pub fn read_string<R: Read + ?Sized>(reader: &mut R, len: usize) -> std::io::Result<String> {
    let bytes = read_bytes(reader, len)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read a fixed-size signature
pub fn read_magic<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<[u8; 4]> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// Read big-endian 24-bit integer
pub fn read_be_u24<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<u32> {
    let mut buffer = [0u8; 3];
    reader.read_exact(&mut buffer)?;
    Ok(((buffer[0] as u32) << 16) | ((buffer[1] as u32) << 8) | (buffer[2] as u32))
}

/// Read big-endian 32-bit integer
pub fn read_be_u32<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<u32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_be_bytes(buffer))
}

/// Read little-endian 32-bit integer
pub fn read_le_u32<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<u32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
}

/// Read little-endian 64-bit integer
pub fn read_le_u64<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<u64> {
    let mut buffer = [0u8; 8];
    reader.read_exact(&mut buffer)?;
    Ok(u64::from_le_bytes(buffer))
}

/// Read a big-endian 32-bit length followed by that many bytes of text
pub fn read_be_prefixed_string<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<String> {
    let len = read_be_u32(reader)? as usize;
    read_string(reader, len)
}

/// Read a little-endian 32-bit length followed by that many bytes of text
pub fn read_le_prefixed_string<R: Read + ?Sized>(reader: &mut R) -> std::io::Result<String> {
    let len = read_le_u32(reader)? as usize;
    read_string(reader, len)
}

/// Move forward `count` bytes from the current position
pub fn skip<R: Seek + ?Sized>(reader: &mut R, count: i64) -> std::io::Result<()> {
    reader.seek(SeekFrom::Current(count))?;
    Ok(())
}

/// Test bit `n` (0 = least significant) of `byte`
pub fn get_bit(byte: u8, n: u8) -> bool {
    byte & (1 << n) != 0
}

/// Decode a synchsafe 32-bit integer (7 bits per byte)
pub fn synchsafe_u32(bytes: [u8; 4]) -> u32 {
    ((bytes[0] as u32 & 0x7F) << 21)
        | ((bytes[1] as u32 & 0x7F) << 14)
        | ((bytes[2] as u32 & 0x7F) << 7)
        | (bytes[3] as u32 & 0x7F)
}
