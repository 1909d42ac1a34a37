use crate::error::Error;
use crate::value::{RegValue, ValueType};
use crate::Result;
use std::fmt;

/// Longest value name the format allows, in UTF-16 code units.
pub const MAX_VALUE_NAME_LEN: usize = 259;

/// A single registry policy instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyInstruction {
    /// Backslash separated registry key path.
    pub key: String,
    /// Name of the value under the key. May be empty.
    pub value: String,
    /// Typed data carried by the instruction.
    pub data: RegValue,
}

impl PolicyInstruction {
    pub fn new<K, V>(key: K, value: V, data: RegValue) -> PolicyInstruction
    where
        K: Into<String>,
        V: Into<String>,
    {
        PolicyInstruction {
            key: key.into(),
            value: value.into(),
            data,
        }
    }

    /// Returns the value type of the carried data.
    pub fn value_type(&self) -> ValueType {
        self.data.value_type()
    }
}

impl fmt::Display for PolicyInstruction {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}\\{} = {}", self.key, self.value, self.data)
    }
}

/// An in-memory policy document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyFile {
    /// `None` denotes the empty document, which serializes to zero
    /// bytes. A file holding only the header parses to `Some` with no
    /// instructions.
    pub body: Option<Vec<PolicyInstruction>>,
}

impl PolicyFile {
    /// Creates the empty document.
    pub fn new() -> PolicyFile {
        PolicyFile { body: None }
    }

    pub fn with_instructions(instructions: Vec<PolicyInstruction>) -> PolicyFile {
        PolicyFile {
            body: Some(instructions),
        }
    }

    /// Instructions in document order, empty when the body is absent.
    pub fn instructions(&self) -> &[PolicyInstruction] {
        self.body.as_deref().unwrap_or(&[])
    }
}

/// Characters legal in key paths and value names: printable ASCII.
pub(crate) fn is_wire_char(unit: u16) -> bool {
    (0x20..=0x7e).contains(&unit)
}

/// A key path is one or more non-empty segments joined by single
/// backslashes, each segment printable ASCII.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::BadKey("key path is empty".to_owned()));
    }
    for segment in key.split('\\') {
        if segment.is_empty() {
            return Err(Error::BadKey(format!(
                "empty segment in key path `{}`",
                key
            )));
        }
        for unit in segment.encode_utf16() {
            if !is_wire_char(unit) {
                return Err(Error::BadKey(format!(
                    "illegal character 0x{:04x} in key path",
                    unit
                )));
            }
        }
    }
    Ok(())
}

/// A value name is printable ASCII, at most [`MAX_VALUE_NAME_LEN`] code
/// units. The backslash is an ordinary character here.
pub(crate) fn validate_value_name(name: &str) -> Result<()> {
    let mut len = 0;
    for unit in name.encode_utf16() {
        if !is_wire_char(unit) {
            return Err(Error::BadValue(format!(
                "illegal character 0x{:04x} in value name",
                unit
            )));
        }
        len += 1;
        if len > MAX_VALUE_NAME_LEN {
            return Err(Error::BadValue(format!(
                "value name longer than {} characters",
                MAX_VALUE_NAME_LEN
            )));
        }
    }
    Ok(())
}
