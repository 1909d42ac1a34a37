use crate::error::Error;
use crate::policy::{self, PolicyFile, PolicyInstruction};
use crate::value::RegValue;
use crate::wide_string;
use crate::{Result, LBR, RBR, SEP, SIGNATURE, VERSION};
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::convert::TryFrom;
use std::io::Write;

pub(crate) fn write_file<W: Write>(writer: &mut W, file: &PolicyFile) -> Result<()> {
    let body = match &file.body {
        Some(body) => body,
        None => return Ok(()),
    };
    writer.write_all(&SIGNATURE).map_err(Error::Write)?;
    writer
        .write_u32::<LittleEndian>(VERSION)
        .map_err(Error::Write)?;
    for instruction in body {
        write_instruction(writer, instruction)?;
    }
    Ok(())
}

fn write_instruction<W: Write>(writer: &mut W, instruction: &PolicyInstruction) -> Result<()> {
    policy::validate_key(&instruction.key)?;
    policy::validate_value_name(&instruction.value)?;
    // the payload is built up front to learn the declared size
    let payload = encode_data(&instruction.data)?;
    let size = u32::try_from(payload.len()).map_err(|_| Error::BadSize {
        value_type: instruction.data.value_type(),
        size: payload.len() as u64,
    })?;
    write_unit(writer, LBR)?;
    wide_string::write_string(writer, &instruction.key)?;
    write_unit(writer, SEP)?;
    wide_string::write_string(writer, &instruction.value)?;
    write_unit(writer, SEP)?;
    writer
        .write_u32::<LittleEndian>(instruction.data.value_type().tag())
        .map_err(Error::Write)?;
    write_unit(writer, SEP)?;
    writer.write_u32::<LittleEndian>(size).map_err(Error::Write)?;
    write_unit(writer, SEP)?;
    writer.write_all(&payload).map_err(Error::Write)?;
    write_unit(writer, RBR)?;
    Ok(())
}

fn write_unit<W: Write>(writer: &mut W, unit: u16) -> Result<()> {
    writer.write_u16::<LittleEndian>(unit).map_err(Error::Write)
}

fn encode_data(data: &RegValue) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    match data {
        RegValue::Sz(text) | RegValue::ExpandSz(text) | RegValue::Link(text) => {
            wide_string::write_string(&mut payload, text)?;
        }
        RegValue::Binary(bytes) => payload.extend_from_slice(bytes),
        RegValue::Dword(v) => payload
            .write_u32::<LittleEndian>(*v)
            .map_err(Error::Write)?,
        RegValue::DwordBigEndian(v) => {
            payload.write_u32::<BigEndian>(*v).map_err(Error::Write)?
        }
        RegValue::Qword(v) => payload
            .write_u64::<LittleEndian>(*v)
            .map_err(Error::Write)?,
        RegValue::QwordBigEndian(v) => {
            payload.write_u64::<BigEndian>(*v).map_err(Error::Write)?
        }
        RegValue::MultiSz(items)
        | RegValue::ResourceList(items)
        | RegValue::FullResourceDescriptor(items)
        | RegValue::ResourceRequirementsList(items) => {
            wide_string::write_strings(&mut payload, items)?;
        }
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodingError;

    fn write(file: &PolicyFile) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        write_file(&mut bytes, file)?;
        Ok(bytes)
    }

    #[test]
    fn empty_document_writes_nothing() {
        assert!(write(&PolicyFile::new()).unwrap().is_empty());
    }

    #[test]
    fn empty_body_writes_header_only() {
        let bytes = write(&PolicyFile::with_instructions(vec![])).unwrap();
        assert_eq!(bytes, [0x50, 0x52, 0x65, 0x67, 0x01, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn single_reg_sz_bytes() {
        let file = PolicyFile::with_instructions(vec![PolicyInstruction::new(
            "A",
            "B",
            RegValue::Sz("X".to_owned()),
        )]);
        assert_eq!(
            write(&file).unwrap(),
            vec![
                0x50, 0x52, 0x65, 0x67, 0x01, 0x00, 0x00, 0x00, 0x5b, 0x00, 0x41, 0x00, 0x00,
                0x00, 0x3b, 0x00, 0x42, 0x00, 0x00, 0x00, 0x3b, 0x00, 0x01, 0x00, 0x00, 0x00,
                0x3b, 0x00, 0x04, 0x00, 0x00, 0x00, 0x3b, 0x00, 0x58, 0x00, 0x00, 0x00, 0x5d,
                0x00,
            ]
        );
    }

    #[test]
    fn key_separator_on_the_wire() {
        let file = PolicyFile::with_instructions(vec![PolicyInstruction::new(
            r"A\B",
            "V",
            RegValue::Dword(1),
        )]);
        let bytes = write(&file).unwrap();
        // key "A\B": 41 00 5c 00 42 00 00 00 directly after the bracket
        assert_eq!(
            &bytes[10..18],
            [0x41, 0x00, 0x5c, 0x00, 0x42, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn multi_sz_block_framing() {
        let payload = encode_data(&RegValue::MultiSz(vec!["a".to_owned(), "b".to_owned()]))
            .unwrap();
        assert_eq!(
            payload,
            [0x61, 0x00, 0x00, 0x00, 0x62, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(encode_data(&RegValue::MultiSz(vec![])).unwrap(), [0x00, 0x00]);
    }

    #[test]
    fn integer_payload_endianness() {
        assert_eq!(
            encode_data(&RegValue::Dword(1)).unwrap(),
            [0x01, 0x00, 0x00, 0x00]
        );
        assert_eq!(
            encode_data(&RegValue::DwordBigEndian(1)).unwrap(),
            [0x00, 0x00, 0x00, 0x01]
        );
        assert_eq!(
            encode_data(&RegValue::Qword(2)).unwrap(),
            [0x02, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            encode_data(&RegValue::QwordBigEndian(2)).unwrap(),
            [0, 0, 0, 0, 0, 0, 0, 0x02]
        );
    }

    #[test]
    fn invalid_key_not_written() {
        let file = PolicyFile::with_instructions(vec![PolicyInstruction::new(
            r"A\",
            "V",
            RegValue::Dword(1),
        )]);
        assert!(matches!(write(&file), Err(Error::BadKey(_))));
    }

    #[test]
    fn oversized_value_name_not_written() {
        let file = PolicyFile::with_instructions(vec![PolicyInstruction::new(
            "K",
            "x".repeat(260),
            RegValue::Dword(1),
        )]);
        assert!(matches!(write(&file), Err(Error::BadValue(_))));
    }

    #[test]
    fn list_element_with_nul_not_written() {
        let file = PolicyFile::with_instructions(vec![PolicyInstruction::new(
            "K",
            "V",
            RegValue::MultiSz(vec!["a\u{0}b".to_owned()]),
        )]);
        assert!(matches!(
            write(&file),
            Err(Error::Encoding {
                source: EncodingError::EmbeddedNul,
            })
        ));
    }
}
