use crate::value::ValueType;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("stream ended before the input was complete: {0}")]
    ShortRead(#[source] io::Error),

    #[error("could not write to output stream: {0}")]
    Write(#[source] io::Error),

    #[error("missing or invalid PReg file header")]
    BadHeader,

    #[error("expected '{expected}' delimiter, found code unit 0x{found:04x}")]
    BadDelimiter { expected: char, found: u16 },

    #[error("invalid registry key path: {0}")]
    BadKey(String),

    #[error("invalid value name: {0}")]
    BadValue(String),

    #[error("unsupported registry value type {0}")]
    BadType(u32),

    #[error("data size {size} is not valid for {value_type:?}")]
    BadSize { value_type: ValueType, size: u64 },

    #[error("could not convert value data: {source}")]
    Encoding {
        #[from]
        source: EncodingError,
    },
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("UTF-16 data length {0} is not a whole number of code units")]
    OddLength(u32),

    #[error("string data is missing its NUL terminator")]
    MissingTerminator,

    #[error("string contains an embedded NUL character")]
    EmbeddedNul,

    #[error("could not convert UTF-16 data to string: {0}")]
    Utf16(#[from] std::string::FromUtf16Error),
}
