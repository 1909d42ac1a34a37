//! Reader and writer for the Windows `Registry.pol` (PReg) group policy
//! file format.
//!
//! A policy file is a flat sequence of registry instructions, each
//! carrying a key path, a value name, a type tag, and typed data. The
//! wire text is UTF-16LE; in memory everything is UTF-8. Parsing and
//! writing are exact inverses: a parsed file writes back byte for byte.

mod error;
mod policy;
mod reader;
mod value;
mod wide_string;
mod writer;

pub use crate::error::{EncodingError, Error};
pub use crate::policy::{PolicyFile, PolicyInstruction, MAX_VALUE_NAME_LEN};
pub use crate::value::{RegValue, ValueType};

use std::io::{Read, Write};

pub type Result<T> = std::result::Result<T, error::Error>;

pub(crate) const SIGNATURE: [u8; 4] = *b"PReg";
pub(crate) const VERSION: u32 = 1;

/// Wire punctuation, each a single UTF-16LE code unit.
pub(crate) const LBR: u16 = b'[' as u16;
pub(crate) const RBR: u16 = b']' as u16;
pub(crate) const SEP: u16 = b';' as u16;

/// Entry point for reading and writing policy files.
///
/// # Examples
/// ```
/// use preg::{Parser, PolicyFile, PolicyInstruction, RegValue};
///
/// let parser = Parser::new();
/// let file = PolicyFile::with_instructions(vec![PolicyInstruction::new(
///     r"Software\Policies\Example",
///     "Enabled",
///     RegValue::Dword(1),
/// )]);
///
/// let mut bytes = Vec::new();
/// parser.write(&mut bytes, &file).unwrap();
/// assert_eq!(parser.parse(bytes.as_slice()).unwrap(), file);
/// ```
#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Parser {
        Parser
    }

    /// Consumes a byte stream and returns the policy document it holds.
    pub fn parse<R: Read>(&self, mut reader: R) -> Result<PolicyFile> {
        reader::read_file(&mut reader)
    }

    /// Serializes a policy document onto a byte stream.
    pub fn write<W: Write>(&self, mut writer: W, file: &PolicyFile) -> Result<()> {
        writer::write_file(&mut writer, file)
    }
}
