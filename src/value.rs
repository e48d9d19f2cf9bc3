//! Registry value type tags and payload encoding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Tags
// =============================================================================

/// System-defined tag describing how a value's bytes are interpreted.
///
/// Tags are passed through to the registry unchecked; [`ValueType::Other`]
/// carries anything without a named variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    None,
    String,
    ExpandString,
    Binary,
    Dword,
    DwordBigEndian,
    Link,
    MultiString,
    Qword,
    Other(u32),
}

impl ValueType {
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::None,
            1 => Self::String,
            2 => Self::ExpandString,
            3 => Self::Binary,
            4 => Self::Dword,
            5 => Self::DwordBigEndian,
            6 => Self::Link,
            7 => Self::MultiString,
            11 => Self::Qword,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn as_raw(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::String => 1,
            Self::ExpandString => 2,
            Self::Binary => 3,
            Self::Dword => 4,
            Self::DwordBigEndian => 5,
            Self::Link => 6,
            Self::MultiString => 7,
            Self::Qword => 11,
            Self::Other(raw) => *raw,
        }
    }

    /// Win32 constant name, if the tag has one.
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        match self {
            Self::None => Some("REG_NONE"),
            Self::String => Some("REG_SZ"),
            Self::ExpandString => Some("REG_EXPAND_SZ"),
            Self::Binary => Some("REG_BINARY"),
            Self::Dword => Some("REG_DWORD"),
            Self::DwordBigEndian => Some("REG_DWORD_BIG_ENDIAN"),
            Self::Link => Some("REG_LINK"),
            Self::MultiString => Some("REG_MULTI_SZ"),
            Self::Qword => Some("REG_QWORD"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#x}", self.as_raw()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid registry value type: {0}")]
pub struct ParseValueTypeError(String);

impl FromStr for ValueType {
    type Err = ParseValueTypeError;

    /// Accepts a Win32 constant name (`REG_SZ`, `REG_DWORD`, ...) or a tag
    /// number in decimal or `0x` hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let named = (0..=11)
            .map(Self::from_raw)
            .find(|ty| ty.name().is_some_and(|name| name.eq_ignore_ascii_case(s)));
        if let Some(ty) = named {
            return Ok(ty);
        }

        let raw = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => s.parse(),
        };
        raw.map(Self::from_raw)
            .map_err(|_| ParseValueTypeError(s.to_string()))
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Data that can be stored as the bytes of a registry value.
pub trait Payload {
    /// Bytes handed to `RegSetValueEx`.
    fn to_reg_bytes(&self) -> Vec<u8>;

    /// Tag used when the caller does not pick one.
    fn default_type(&self) -> ValueType;
}

/// UTF-16LE code units followed by a NUL terminator.
impl Payload for str {
    fn to_reg_bytes(&self) -> Vec<u8> {
        self.encode_utf16()
            .chain(Some(0))
            .flat_map(u16::to_le_bytes)
            .collect()
    }

    fn default_type(&self) -> ValueType {
        ValueType::String
    }
}

impl Payload for String {
    fn to_reg_bytes(&self) -> Vec<u8> {
        self.as_str().to_reg_bytes()
    }

    fn default_type(&self) -> ValueType {
        ValueType::String
    }
}

impl Payload for u32 {
    fn to_reg_bytes(&self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn default_type(&self) -> ValueType {
        ValueType::Dword
    }
}

// =============================================================================
// Read-back
// =============================================================================

/// A value as stored: its tag and exact bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub vtype: ValueType,
    pub bytes: Vec<u8>,
}

impl RawValue {
    /// Decode the bytes as UTF-16LE, dropping one trailing terminator.
    ///
    /// Returns `None` for an odd byte count or invalid UTF-16.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        if self.bytes.len() % 2 != 0 {
            return None;
        }
        let mut units: Vec<u16> = self
            .bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        if units.last() == Some(&0) {
            units.pop();
        }
        String::from_utf16(&units).ok()
    }

    /// Interpret exactly four bytes as a little-endian integer.
    #[must_use]
    pub fn as_dword(&self) -> Option<u32> {
        let bytes: [u8; 4] = self.bytes.as_slice().try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }
}
