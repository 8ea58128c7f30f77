//! Tab-separated feature lines (BED, GFF, VCF) with typed coordinate
//! columns.

use bstr::{BString, ByteSlice};

use crate::errors::{HtsViewError, Result};

/// One column of a parsed feature line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// An uninterpreted column
    Text(BString),
    /// A coordinate column, parsed as an integer
    Int(i64),
}

impl Field {
    /// The integer value, if this is a coordinate column.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// The raw text, if this is an uninterpreted column.
    #[must_use]
    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            Self::Text(text) => Some(text.as_slice()),
            Self::Int(_) => None,
        }
    }
}

/// Which 1-based columns of a track's lines carry the sequence name and
/// coordinates.
///
/// Coordinate conventions are the track format's own (BED starts are
/// 0-based, GFF and VCF are 1-based); the parser reads the integers as
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackColumns {
    /// Sequence name column
    pub seq_col: usize,
    /// Start coordinate column
    pub start_col: usize,
    /// End coordinate column; `None` for formats without one
    pub end_col: Option<usize>,
}

impl TrackColumns {
    /// BED: name, start, end in columns 1-3.
    pub const BED: Self = Self { seq_col: 1, start_col: 2, end_col: Some(3) };
    /// GFF: name in column 1, start and end in columns 4-5.
    pub const GFF: Self = Self { seq_col: 1, start_col: 4, end_col: Some(5) };
    /// VCF: name in column 1, position in column 2, no end column.
    pub const VCF: Self = Self { seq_col: 1, start_col: 2, end_col: None };

    /// Splits a line on tabs, typing the coordinate columns.
    ///
    /// # Errors
    ///
    /// [`HtsViewError::MalformedCoordinate`] when a coordinate column is
    /// absent or does not parse as an integer.
    pub fn parse_line(&self, line: &[u8]) -> Result<Vec<Field>> {
        let line = line.strip_suffix(b"\n").unwrap_or(line);
        let columns: Vec<&[u8]> = line.split_str("\t").collect();
        let mut fields = Vec::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            let number = index + 1;
            if number == self.start_col || self.end_col == Some(number) {
                fields.push(Field::Int(parse_coordinate(number, column)?));
            } else {
                fields.push(Field::Text(BString::from(*column)));
            }
        }
        for required in [Some(self.start_col), self.end_col].into_iter().flatten() {
            if required > columns.len() {
                return Err(HtsViewError::MalformedCoordinate {
                    column: required,
                    value: "<absent>".to_string(),
                });
            }
        }
        Ok(fields)
    }
}

fn parse_coordinate(column: usize, value: &[u8]) -> Result<i64> {
    let text = std::str::from_utf8(value).ok().filter(|t| !t.is_empty());
    text.and_then(|t| t.parse().ok()).ok_or_else(|| HtsViewError::MalformedCoordinate {
        column,
        value: String::from_utf8_lossy(value).into_owned(),
    })
}
