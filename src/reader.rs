use crate::error::Error;
use crate::policy::{self, PolicyFile, PolicyInstruction, MAX_VALUE_NAME_LEN};
use crate::value::{RegValue, ValueType};
use crate::wide_string::{self, NUL};
use crate::{Result, LBR, RBR, SEP, SIGNATURE, VERSION};
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::{ErrorKind, Read};

pub(crate) fn read_file<R: Read>(reader: &mut R) -> Result<PolicyFile> {
    read_header(reader)?;
    let mut instructions = Vec::new();
    while let Some(first) = probe_byte(reader)? {
        let second = reader.read_u8().map_err(Error::ShortRead)?;
        let unit = u16::from_le_bytes([first, second]);
        if unit != LBR {
            return Err(Error::BadDelimiter {
                expected: '[',
                found: unit,
            });
        }
        instructions.push(read_instruction(reader)?);
    }
    Ok(PolicyFile::with_instructions(instructions))
}

fn read_header<R: Read>(reader: &mut R) -> Result<()> {
    let mut header = [0u8; 8];
    reader.read_exact(&mut header).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => Error::BadHeader,
        _ => Error::ShortRead(err),
    })?;
    if header[..4] != SIGNATURE || header[4..] != VERSION.to_le_bytes() {
        return Err(Error::BadHeader);
    }
    Ok(())
}

/// Probes for one byte so the instruction loop can tell a clean end of
/// stream from the start of another record.
fn probe_byte<R: Read>(reader: &mut R) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::ShortRead(err)),
        }
    }
}

/// Reads one instruction; the opening bracket has already been consumed.
fn read_instruction<R: Read>(reader: &mut R) -> Result<PolicyInstruction> {
    let key = read_key(reader)?;
    expect_unit(reader, SEP)?;
    let value = read_value_name(reader)?;
    expect_unit(reader, SEP)?;
    let tag = reader.read_u32::<LittleEndian>().map_err(Error::ShortRead)?;
    let value_type = ValueType::from_tag(tag)?;
    expect_unit(reader, SEP)?;
    let size = reader.read_u32::<LittleEndian>().map_err(Error::ShortRead)?;
    check_size(value_type, size)?;
    expect_unit(reader, SEP)?;
    let data = read_data(reader, value_type, size)?;
    expect_unit(reader, RBR)?;
    Ok(PolicyInstruction { key, value, data })
}

fn read_unit<R: Read>(reader: &mut R) -> Result<u16> {
    reader.read_u16::<LittleEndian>().map_err(Error::ShortRead)
}

fn expect_unit<R: Read>(reader: &mut R, expected: u16) -> Result<()> {
    let found = read_unit(reader)?;
    if found != expected {
        return Err(Error::BadDelimiter {
            expected: char::from(expected as u8),
            found,
        });
    }
    Ok(())
}

fn read_key<R: Read>(reader: &mut R) -> Result<String> {
    let mut units = Vec::new();
    loop {
        let unit = read_unit(reader)?;
        if unit == NUL {
            break;
        }
        if !policy::is_wire_char(unit) {
            return Err(Error::BadKey(format!(
                "illegal character 0x{:04x} in key path",
                unit
            )));
        }
        units.push(unit);
    }
    let key = wide_string::decode_units(&units)?;
    policy::validate_key(&key)?;
    Ok(key)
}

fn read_value_name<R: Read>(reader: &mut R) -> Result<String> {
    let mut units = Vec::new();
    loop {
        let unit = read_unit(reader)?;
        if unit == NUL {
            break;
        }
        if !policy::is_wire_char(unit) {
            return Err(Error::BadValue(format!(
                "illegal character 0x{:04x} in value name",
                unit
            )));
        }
        if units.len() == MAX_VALUE_NAME_LEN {
            return Err(Error::BadValue(format!(
                "value name longer than {} characters",
                MAX_VALUE_NAME_LEN
            )));
        }
        units.push(unit);
    }
    wide_string::decode_units(&units)
}

/// The declared size must agree with the fixed width of integer types
/// and the code unit framing of text and list types before any payload
/// bytes are consumed.
fn check_size(value_type: ValueType, size: u32) -> Result<()> {
    let ok = match value_type {
        ValueType::REG_DWORD | ValueType::REG_DWORD_BIG_ENDIAN => size == 4,
        ValueType::REG_QWORD | ValueType::REG_QWORD_BIG_ENDIAN => size == 8,
        ValueType::REG_BINARY => true,
        ValueType::REG_NONE => false,
        _ => size >= 2 && size % 2 == 0,
    };
    if ok {
        Ok(())
    } else {
        Err(Error::BadSize {
            value_type,
            size: size.into(),
        })
    }
}

fn read_data<R: Read>(reader: &mut R, value_type: ValueType, size: u32) -> Result<RegValue> {
    let data = match value_type {
        ValueType::REG_SZ => RegValue::Sz(wide_string::read_string(reader, size)?),
        ValueType::REG_EXPAND_SZ => RegValue::ExpandSz(wide_string::read_string(reader, size)?),
        ValueType::REG_LINK => RegValue::Link(wide_string::read_string(reader, size)?),
        ValueType::REG_BINARY => {
            let mut bytes = vec![0u8; size as usize];
            reader.read_exact(&mut bytes).map_err(Error::ShortRead)?;
            RegValue::Binary(bytes)
        }
        ValueType::REG_DWORD => {
            RegValue::Dword(reader.read_u32::<LittleEndian>().map_err(Error::ShortRead)?)
        }
        ValueType::REG_DWORD_BIG_ENDIAN => {
            RegValue::DwordBigEndian(reader.read_u32::<BigEndian>().map_err(Error::ShortRead)?)
        }
        ValueType::REG_QWORD => {
            RegValue::Qword(reader.read_u64::<LittleEndian>().map_err(Error::ShortRead)?)
        }
        ValueType::REG_QWORD_BIG_ENDIAN => {
            RegValue::QwordBigEndian(reader.read_u64::<BigEndian>().map_err(Error::ShortRead)?)
        }
        ValueType::REG_MULTI_SZ => RegValue::MultiSz(wide_string::read_strings(reader, size)?),
        ValueType::REG_RESOURCE_LIST => {
            RegValue::ResourceList(wide_string::read_strings(reader, size)?)
        }
        ValueType::REG_FULL_RESOURCE_DESCRIPTOR => {
            RegValue::FullResourceDescriptor(wide_string::read_strings(reader, size)?)
        }
        ValueType::REG_RESOURCE_REQUIREMENTS_LIST => {
            RegValue::ResourceRequirementsList(wide_string::read_strings(reader, size)?)
        }
        ValueType::REG_NONE => return Err(Error::BadType(ValueType::REG_NONE.tag())),
    };
    Ok(data)
}
