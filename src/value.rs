use crate::error::Error;
use crate::Result;
use std::fmt;

/// Registry value types that may appear in a policy file.
///
/// The discriminants are the wire tags. `REG_NONE` is part of the
/// Windows table but never legal in a policy file, so [`from_tag`]
/// rejects it along with unknown tags.
///
/// [`from_tag`]: ValueType::from_tag
#[allow(non_camel_case_types)]
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    REG_NONE = 0,
    REG_SZ = 1,
    REG_EXPAND_SZ = 2,
    REG_BINARY = 3,
    REG_DWORD = 4,
    REG_DWORD_BIG_ENDIAN = 5,
    REG_LINK = 6,
    REG_MULTI_SZ = 7,
    REG_RESOURCE_LIST = 8,
    REG_FULL_RESOURCE_DESCRIPTOR = 9,
    REG_RESOURCE_REQUIREMENTS_LIST = 10,
    REG_QWORD = 11,
    REG_QWORD_BIG_ENDIAN = 12,
}

impl ValueType {
    /// Maps a wire tag to a value type.
    pub fn from_tag(tag: u32) -> Result<ValueType> {
        match tag {
            1 => Ok(ValueType::REG_SZ),
            2 => Ok(ValueType::REG_EXPAND_SZ),
            3 => Ok(ValueType::REG_BINARY),
            4 => Ok(ValueType::REG_DWORD),
            5 => Ok(ValueType::REG_DWORD_BIG_ENDIAN),
            6 => Ok(ValueType::REG_LINK),
            7 => Ok(ValueType::REG_MULTI_SZ),
            8 => Ok(ValueType::REG_RESOURCE_LIST),
            9 => Ok(ValueType::REG_FULL_RESOURCE_DESCRIPTOR),
            10 => Ok(ValueType::REG_RESOURCE_REQUIREMENTS_LIST),
            11 => Ok(ValueType::REG_QWORD),
            12 => Ok(ValueType::REG_QWORD_BIG_ENDIAN),
            other => Err(Error::BadType(other)),
        }
    }

    /// Returns the wire tag.
    pub fn tag(self) -> u32 {
        self as u32
    }
}

/// Data carried by a single policy instruction.
///
/// Each variant fixes both the wire type tag and the payload shape, so a
/// value can never disagree with its declared type. Byte order of the
/// DWORD and QWORD payloads is part of the variant; the stored integer
/// is always host-native.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegValue {
    /// Value that can be represented as a string
    Sz(String),
    /// String with unexpanded environment variable references
    ExpandSz(String),
    /// Binary data
    Binary(Vec<u8>),
    /// DWORD, stored little-endian on the wire
    Dword(u32),
    /// DWORD, stored big-endian on the wire
    DwordBigEndian(u32),
    /// Symbolic link target
    Link(String),
    /// List of strings
    MultiSz(Vec<String>),
    /// Resource list
    ResourceList(Vec<String>),
    /// Full resource descriptor
    FullResourceDescriptor(Vec<String>),
    /// Resource requirements list
    ResourceRequirementsList(Vec<String>),
    /// QWORD, stored little-endian on the wire
    Qword(u64),
    /// QWORD, stored big-endian on the wire
    QwordBigEndian(u64),
}

impl RegValue {
    /// Returns the value type this payload is written as.
    pub fn value_type(&self) -> ValueType {
        match self {
            RegValue::Sz(_) => ValueType::REG_SZ,
            RegValue::ExpandSz(_) => ValueType::REG_EXPAND_SZ,
            RegValue::Binary(_) => ValueType::REG_BINARY,
            RegValue::Dword(_) => ValueType::REG_DWORD,
            RegValue::DwordBigEndian(_) => ValueType::REG_DWORD_BIG_ENDIAN,
            RegValue::Link(_) => ValueType::REG_LINK,
            RegValue::MultiSz(_) => ValueType::REG_MULTI_SZ,
            RegValue::ResourceList(_) => ValueType::REG_RESOURCE_LIST,
            RegValue::FullResourceDescriptor(_) => ValueType::REG_FULL_RESOURCE_DESCRIPTOR,
            RegValue::ResourceRequirementsList(_) => ValueType::REG_RESOURCE_REQUIREMENTS_LIST,
            RegValue::Qword(_) => ValueType::REG_QWORD,
            RegValue::QwordBigEndian(_) => ValueType::REG_QWORD_BIG_ENDIAN,
        }
    }
}

impl fmt::Display for RegValue {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegValue::Sz(v) | RegValue::ExpandSz(v) | RegValue::Link(v) => write!(fmt, "{}", v),
            RegValue::Dword(v) | RegValue::DwordBigEndian(v) => write!(fmt, "{}", v),
            RegValue::Qword(v) | RegValue::QwordBigEndian(v) => write!(fmt, "{}", v),
            RegValue::Binary(v) => write!(fmt, "{:?}", v),
            RegValue::MultiSz(v)
            | RegValue::ResourceList(v)
            | RegValue::FullResourceDescriptor(v)
            | RegValue::ResourceRequirementsList(v) => write!(fmt, "{:?}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trip() {
        for tag in 1..=12 {
            assert_eq!(ValueType::from_tag(tag).unwrap().tag(), tag);
        }
    }

    #[test]
    fn reg_none_rejected() {
        match ValueType::from_tag(0) {
            Err(Error::BadType(0)) => {}
            other => panic!("expected BadType(0), got {:?}", other),
        }
    }

    #[test]
    fn unknown_tag_rejected() {
        match ValueType::from_tag(13) {
            Err(Error::BadType(13)) => {}
            other => panic!("expected BadType(13), got {:?}", other),
        }
    }

    #[test]
    fn value_type_follows_variant() {
        assert_eq!(RegValue::Sz(String::new()).value_type(), ValueType::REG_SZ);
        assert_eq!(RegValue::Binary(vec![]).value_type(), ValueType::REG_BINARY);
        assert_eq!(
            RegValue::DwordBigEndian(0).value_type(),
            ValueType::REG_DWORD_BIG_ENDIAN
        );
        assert_eq!(
            RegValue::MultiSz(vec![]).value_type(),
            ValueType::REG_MULTI_SZ
        );
        assert_eq!(
            RegValue::QwordBigEndian(0).value_type(),
            ValueType::REG_QWORD_BIG_ENDIAN
        );
    }

    #[test]
    fn display() {
        assert_eq!(RegValue::Sz("abc".into()).to_string(), "abc");
        assert_eq!(RegValue::Dword(7).to_string(), "7");
        assert_eq!(RegValue::Binary(vec![1, 2]).to_string(), "[1, 2]");
    }
}
