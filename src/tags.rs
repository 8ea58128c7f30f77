//! Auxiliary tag block codec.
//!
//! Each alignment record ends with a variable-length block of typed
//! annotations: `[id0, id1, type, payload...]` repeated back to back. The
//! payload width is a function of the type byte alone (or, for `Z`, of the
//! position of the NUL terminator), so the block can be walked with exact
//! per-entry accounting — no trailing slack is tolerated.

use std::fmt;

use bstr::{BString, ByteSlice};

use crate::errors::{HtsViewError, Result};

/// A typed auxiliary tag value.
///
/// One variant per supported type byte: `A c C s S i I f Z`.
#[derive(Debug, Clone, PartialEq)]
pub enum AuxValue {
    /// `A`: a single printable character
    Char(u8),
    /// `c`: signed 8-bit integer
    Int8(i8),
    /// `C`: unsigned 8-bit integer
    UInt8(u8),
    /// `s`: signed 16-bit integer
    Int16(i16),
    /// `S`: unsigned 16-bit integer
    UInt16(u16),
    /// `i`: signed 32-bit integer
    Int32(i32),
    /// `I`: unsigned 32-bit integer
    UInt32(u32),
    /// `f`: IEEE 754 single-precision float
    Float(f32),
    /// `Z`: NUL-terminated text, stored without the terminator
    String(BString),
}

impl AuxValue {
    /// The type byte this value serializes under.
    #[must_use]
    pub fn type_byte(&self) -> u8 {
        match self {
            Self::Char(_) => b'A',
            Self::Int8(_) => b'c',
            Self::UInt8(_) => b'C',
            Self::Int16(_) => b's',
            Self::UInt16(_) => b'S',
            Self::Int32(_) => b'i',
            Self::UInt32(_) => b'I',
            Self::Float(_) => b'f',
            Self::String(_) => b'Z',
        }
    }

    /// Builds a value from an externally supplied type byte and raw payload.
    ///
    /// This is the checked entry point for callers holding untyped input
    /// (e.g. a type byte read from a foreign record). For `Z` the payload is
    /// the text without its terminator.
    ///
    /// # Errors
    ///
    /// [`HtsViewError::UnsupportedTagType`] for type bytes outside the
    /// supported alphabet (`B` arrays, `H` hex strings, ...);
    /// [`HtsViewError::TruncatedRecord`] when the payload is shorter than the
    /// type requires.
    pub fn from_type_and_bytes(type_byte: u8, payload: &[u8]) -> Result<Self> {
        let require = |width: usize| -> Result<()> {
            if payload.len() < width {
                return Err(HtsViewError::TruncatedRecord {
                    offset: payload.len(),
                    expected: width - payload.len(),
                });
            }
            Ok(())
        };
        match type_byte {
            b'A' => {
                require(1)?;
                Ok(Self::Char(payload[0]))
            }
            b'c' => {
                require(1)?;
                Ok(Self::Int8(payload[0] as i8))
            }
            b'C' => {
                require(1)?;
                Ok(Self::UInt8(payload[0]))
            }
            b's' => {
                require(2)?;
                Ok(Self::Int16(i16::from_le_bytes([payload[0], payload[1]])))
            }
            b'S' => {
                require(2)?;
                Ok(Self::UInt16(u16::from_le_bytes([payload[0], payload[1]])))
            }
            b'i' => {
                require(4)?;
                Ok(Self::Int32(i32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]])))
            }
            b'I' => {
                require(4)?;
                Ok(Self::UInt32(u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]])))
            }
            b'f' => {
                require(4)?;
                Ok(Self::Float(f32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]])))
            }
            b'Z' => Ok(Self::String(BString::from(payload))),
            _ => Err(HtsViewError::UnsupportedTagType { type_byte }),
        }
    }
}

impl fmt::Display for AuxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", char::from(*c)),
            Self::Int8(v) => write!(f, "{v}"),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::Int16(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

/// One entry of an auxiliary tag block.
#[derive(Debug, Clone, PartialEq)]
pub struct AuxTag {
    /// Two-character tag id, e.g. `NM`
    pub id: [u8; 2],
    /// Typed value
    pub value: AuxValue,
}

impl AuxTag {
    /// Creates a tag from an id and value.
    #[must_use]
    pub fn new(id: [u8; 2], value: AuxValue) -> Self {
        Self { id, value }
    }
}

impl fmt::Display for AuxTag {
    /// SAM text form: `TAG:T:VALUE`, with integer types collapsed to `i`
    /// as SAM requires.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_char = match self.value.type_byte() {
            b'c' | b'C' | b's' | b'S' | b'I' => b'i',
            other => other,
        };
        write!(
            f,
            "{}{}:{}:{}",
            char::from(self.id[0]),
            char::from(self.id[1]),
            char::from(type_char),
            self.value
        )
    }
}

/// Decodes an auxiliary tag block into typed entries, preserving order and
/// duplicate ids.
///
/// The cursor advances by exactly `3 + payload_width` per entry and must
/// land on the block length; a shortfall anywhere fails the whole decode
/// rather than returning a partial tag list.
///
/// # Errors
///
/// [`HtsViewError::TruncatedRecord`] when the block ends inside an entry
/// header or payload (including an unterminated `Z` value);
/// [`HtsViewError::MalformedAuxType`] for an unrecognized type byte.
pub fn decode(aux: &[u8]) -> Result<Vec<AuxTag>> {
    let mut tags = Vec::new();
    let mut i = 0;

    while i < aux.len() {
        if aux.len() - i < 3 {
            return Err(HtsViewError::TruncatedRecord { offset: i, expected: 3 - (aux.len() - i) });
        }
        let id = [aux[i], aux[i + 1]];
        let type_byte = aux[i + 2];
        let payload = &aux[i + 3..];

        // Width includes the NUL terminator for Z; the stored value excludes it.
        let width = match type_byte {
            b'A' | b'c' | b'C' => 1,
            b's' | b'S' => 2,
            b'i' | b'I' | b'f' => 4,
            b'Z' => match payload.find_byte(0) {
                Some(nul) => nul + 1,
                None => {
                    return Err(HtsViewError::TruncatedRecord { offset: aux.len(), expected: 1 });
                }
            },
            _ => return Err(HtsViewError::MalformedAuxType { type_byte, offset: i + 2 }),
        };
        if payload.len() < width {
            return Err(HtsViewError::TruncatedRecord {
                offset: i,
                expected: width - payload.len(),
            });
        }

        let value = match type_byte {
            b'Z' => AuxValue::String(BString::from(&payload[..width - 1])),
            _ => AuxValue::from_type_and_bytes(type_byte, &payload[..width])?,
        };
        tags.push(AuxTag::new(id, value));
        i += 3 + width;
    }

    // i == aux.len() here: per-entry widths are exact, so the loop cannot
    // overshoot the block.
    Ok(tags)
}

/// Encodes tags into the binary block layout [`decode`] expects.
///
/// Round-trip law: `decode(&encode(tags)).unwrap() == tags`.
#[must_use]
pub fn encode(tags: &[AuxTag]) -> Vec<u8> {
    let mut buf = Vec::new();
    for tag in tags {
        buf.extend_from_slice(&tag.id);
        buf.push(tag.value.type_byte());
        match &tag.value {
            AuxValue::Char(c) => buf.push(*c),
            AuxValue::Int8(v) => buf.push(*v as u8),
            AuxValue::UInt8(v) => buf.push(*v),
            AuxValue::Int16(v) => buf.extend_from_slice(&v.to_le_bytes()),
            AuxValue::UInt16(v) => buf.extend_from_slice(&v.to_le_bytes()),
            AuxValue::Int32(v) => buf.extend_from_slice(&v.to_le_bytes()),
            AuxValue::UInt32(v) => buf.extend_from_slice(&v.to_le_bytes()),
            AuxValue::Float(v) => buf.extend_from_slice(&v.to_le_bytes()),
            AuxValue::String(v) => {
                buf.extend_from_slice(v.as_slice());
                buf.push(0);
            }
        }
    }
    buf
}

/// Finds the first tag with the given id, scanning in block order.
#[must_use]
pub fn find<'a>(tags: &'a [AuxTag], id: [u8; 2]) -> Option<&'a AuxValue> {
    tags.iter().find(|tag| tag.id == id).map(|tag| &tag.value)
}
