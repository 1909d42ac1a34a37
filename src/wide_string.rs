use crate::error::{EncodingError, Error};
use crate::Result;
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{Read, Write};
use widestring::{U16Str, U16String};

pub(crate) const NUL: u16 = 0x0000;

/// Decodes a slice of UTF-16 code units into an owned string.
pub(crate) fn decode_units(units: &[u16]) -> Result<String> {
    U16Str::from_slice(units)
        .to_string()
        .map_err(|err| EncodingError::Utf16(err).into())
}

/// Encodes a string as UTF-16 code units, without a terminator.
pub(crate) fn encode_units(text: &str) -> Vec<u16> {
    U16String::from_str(text).into_vec()
}

fn read_units<R: Read>(reader: &mut R, size_bytes: u32) -> Result<Vec<u16>> {
    if size_bytes % 2 != 0 {
        return Err(EncodingError::OddLength(size_bytes).into());
    }
    let mut raw = vec![0u8; size_bytes as usize];
    reader.read_exact(&mut raw).map_err(Error::ShortRead)?;
    Ok(raw
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Reads exactly `size_bytes` bytes of NUL-terminated UTF-16LE text.
///
/// The terminator is required and stripped; a two byte field decodes to
/// the empty string.
pub(crate) fn read_string<R: Read>(reader: &mut R, size_bytes: u32) -> Result<String> {
    let units = read_units(reader, size_bytes)?;
    match units.split_last() {
        Some((&NUL, text)) => decode_units(text),
        _ => Err(EncodingError::MissingTerminator.into()),
    }
}

/// Reads exactly `size_bytes` bytes holding a block of NUL-terminated
/// UTF-16LE strings.
///
/// The block itself ends with one extra NUL code unit, which parses as a
/// trailing empty string and is discarded. A lone NUL is the empty list.
pub(crate) fn read_strings<R: Read>(reader: &mut R, size_bytes: u32) -> Result<Vec<String>> {
    let units = read_units(reader, size_bytes)?;
    let mut items = Vec::new();
    let mut start = 0;
    for (i, &unit) in units.iter().enumerate() {
        if unit == NUL {
            items.push(decode_units(&units[start..i])?);
            start = i + 1;
        }
    }
    if start != units.len() {
        // final element was never terminated
        return Err(EncodingError::MissingTerminator.into());
    }
    match items.pop() {
        Some(ref last) if last.is_empty() => Ok(items),
        _ => Err(EncodingError::MissingTerminator.into()),
    }
}

/// Writes `text` as UTF-16LE followed by a NUL terminator and returns
/// the number of bytes emitted.
pub(crate) fn write_string<W: Write>(writer: &mut W, text: &str) -> Result<usize> {
    let units = encode_units(text);
    for &unit in &units {
        writer.write_u16::<LittleEndian>(unit).map_err(Error::Write)?;
    }
    writer.write_u16::<LittleEndian>(NUL).map_err(Error::Write)?;
    Ok((units.len() + 1) * 2)
}

/// Writes a block of NUL-terminated strings followed by the block
/// terminator and returns the number of bytes emitted.
///
/// An empty list emits just the block terminator. Elements holding an
/// embedded NUL cannot be framed and are rejected.
pub(crate) fn write_strings<W: Write>(writer: &mut W, items: &[String]) -> Result<usize> {
    let mut written = 0;
    for item in items {
        if item.contains('\u{0}') {
            return Err(EncodingError::EmbeddedNul.into());
        }
        written += write_string(writer, item)?;
    }
    written += write_string(writer, "")?;
    Ok(written)
}
