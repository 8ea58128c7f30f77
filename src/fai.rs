//! FASTA index (`.fai`) parsing and SAM header synthesis.

use std::fmt::Write as _;

use bstr::{BString, ByteSlice};

use crate::errors::{HtsViewError, Result};

/// One reference sequence named by a FASTA index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSequence {
    /// Sequence name
    pub name: BString,
    /// Sequence length in bases
    pub length: u64,
}

/// Parses the text of a `.fai` file into its reference sequences.
///
/// Only the name and length columns are kept; the byte offset and
/// line-layout columns are index-internal.
///
/// # Errors
///
/// [`HtsViewError::MalformedCoordinate`] when a line lacks a length column
/// or its length is not a non-negative integer.
pub fn parse_index(text: &[u8]) -> Result<Vec<ReferenceSequence>> {
    let mut sequences = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        let mut columns = line.split_str("\t");
        // a nameless line is unrepresentable; split always yields one column
        let name = columns.next().unwrap_or_default();
        let length_text = columns.next().unwrap_or_default();
        let length = std::str::from_utf8(length_text)
            .ok()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| HtsViewError::MalformedCoordinate {
                column: 2,
                value: String::from_utf8_lossy(length_text).into_owned(),
            })?;
        sequences.push(ReferenceSequence { name: BString::from(name), length });
    }
    Ok(sequences)
}

/// Renders a minimal SAM header declaring the indexed sequences.
#[must_use]
pub fn sam_header(sequences: &[ReferenceSequence]) -> String {
    let mut header = String::from("@HD\tVN:1.0\tSO:unknown\n");
    for sequence in sequences {
        let _ = writeln!(header, "@SQ\tSN:{}\tLN:{}", sequence.name.as_bstr(), sequence.length);
    }
    header
}
