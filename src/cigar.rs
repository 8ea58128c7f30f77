//! Compact CIGAR operation codec and derived length arithmetic.
//!
//! BAM packs each CIGAR operation into a 32-bit word: the low nibble indexes
//! the fixed alphabet `MIDNSHP=XB`, the upper 28 bits hold the length.

use std::fmt;

use crate::errors::{HtsViewError, Result};

/// The fixed CIGAR operation alphabet, in opcode order.
pub const CIGAR_ALPHABET: &[u8; 10] = b"MIDNSHP=XB";

/// Largest operation length representable in the 28-bit packed field.
pub const MAX_OP_LEN: u32 = (1 << 28) - 1;

/// A CIGAR operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// M: alignment match or mismatch
    Match,
    /// I: insertion to the reference
    Insertion,
    /// D: deletion from the reference
    Deletion,
    /// N: skipped reference region (intron)
    Skip,
    /// S: soft clip (bases present in the query)
    SoftClip,
    /// H: hard clip (bases absent from the query)
    HardClip,
    /// P: padding
    Pad,
    /// =: sequence match
    SequenceMatch,
    /// X: sequence mismatch
    SequenceMismatch,
    /// B: back operation
    Back,
}

impl Kind {
    /// Maps a packed opcode index to a kind. Indices outside the alphabet
    /// return `None`.
    #[must_use]
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Match),
            1 => Some(Self::Insertion),
            2 => Some(Self::Deletion),
            3 => Some(Self::Skip),
            4 => Some(Self::SoftClip),
            5 => Some(Self::HardClip),
            6 => Some(Self::Pad),
            7 => Some(Self::SequenceMatch),
            8 => Some(Self::SequenceMismatch),
            9 => Some(Self::Back),
            _ => None,
        }
    }

    /// The packed opcode index of this kind.
    #[must_use]
    pub fn index(self) -> u32 {
        match self {
            Self::Match => 0,
            Self::Insertion => 1,
            Self::Deletion => 2,
            Self::Skip => 3,
            Self::SoftClip => 4,
            Self::HardClip => 5,
            Self::Pad => 6,
            Self::SequenceMatch => 7,
            Self::SequenceMismatch => 8,
            Self::Back => 9,
        }
    }

    /// The single-character display form (`M`, `I`, `D`, ...).
    #[must_use]
    pub fn as_char(self) -> char {
        char::from(CIGAR_ALPHABET[self.index() as usize])
    }

    /// Whether this operation consumes query bases: {M, I, S, =, X}.
    #[must_use]
    pub fn consumes_query(self) -> bool {
        matches!(
            self,
            Self::Match | Self::Insertion | Self::SoftClip | Self::SequenceMatch | Self::SequenceMismatch
        )
    }

    /// Whether this operation consumes reference bases: {M, D, N, =, X}.
    #[must_use]
    pub fn consumes_reference(self) -> bool {
        matches!(
            self,
            Self::Match | Self::Deletion | Self::Skip | Self::SequenceMatch | Self::SequenceMismatch
        )
    }
}

/// A single (length, kind) CIGAR operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    kind: Kind,
    len: u32,
}

impl CigarOp {
    /// Creates an operation. Lengths above [`MAX_OP_LEN`] are accepted here
    /// and rejected by [`encode`].
    #[must_use]
    pub fn new(kind: Kind, len: u32) -> Self {
        Self { kind, len }
    }

    /// The operation kind.
    #[must_use]
    pub fn kind(self) -> Kind {
        self.kind
    }

    /// The operation length.
    #[must_use]
    pub fn len(self) -> u32 {
        self.len
    }

    /// Whether the operation has zero length.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len, self.kind.as_char())
    }
}

/// Decodes packed 32-bit CIGAR words into typed operations.
///
/// # Errors
///
/// Returns [`HtsViewError::MalformedCigar`] if any word's opcode index falls
/// outside the alphabet.
pub fn decode(packed: &[u32]) -> Result<Vec<CigarOp>> {
    let mut ops = Vec::with_capacity(packed.len());
    for (index, &word) in packed.iter().enumerate() {
        let opcode = word & 0xF;
        let kind = Kind::from_index(opcode)
            .ok_or(HtsViewError::MalformedCigar { opcode, index })?;
        ops.push(CigarOp::new(kind, word >> 4));
    }
    Ok(ops)
}

/// Encodes typed operations into packed 32-bit CIGAR words.
///
/// # Errors
///
/// Returns [`HtsViewError::LengthOverflow`] if any operation length exceeds
/// the 28-bit packed range.
pub fn encode(ops: &[CigarOp]) -> Result<Vec<u32>> {
    let mut packed = Vec::with_capacity(ops.len());
    for op in ops {
        if op.len() > MAX_OP_LEN {
            return Err(HtsViewError::LengthOverflow { length: op.len() });
        }
        packed.push((op.len() << 4) | op.kind().index());
    }
    Ok(packed)
}

/// Renders operations as text, e.g. `"5S30M1I"`. An empty sequence renders
/// as `"*"` (the unmapped convention).
#[must_use]
pub fn cigar_string(ops: &[CigarOp]) -> String {
    if ops.is_empty() {
        return "*".to_string();
    }
    let mut s = String::new();
    for op in ops {
        s.push_str(&op.len().to_string());
        s.push(op.kind().as_char());
    }
    s
}

/// Sum of lengths over query-consuming operations (the read length).
#[must_use]
pub fn query_length(ops: &[CigarOp]) -> usize {
    ops.iter().filter(|op| op.kind().consumes_query()).map(|op| op.len() as usize).sum()
}

/// Sum of lengths over reference-consuming operations (the reference span).
#[must_use]
pub fn reference_length(ops: &[CigarOp]) -> usize {
    ops.iter().filter(|op| op.kind().consumes_reference()).map(|op| op.len() as usize).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ops(parts: &[(u32, Kind)]) -> Vec<CigarOp> {
        parts.iter().map(|&(len, kind)| CigarOp::new(kind, len)).collect()
    }

    #[test]
    fn test_decode_simple() {
        // 36M
        let decoded = decode(&[36 << 4]).unwrap();
        assert_eq!(decoded, vec![CigarOp::new(Kind::Match, 36)]);
    }

    #[test]
    fn test_decode_all_kinds() {
        let packed: Vec<u32> = (0..10).map(|i| (7 << 4) | i).collect();
        let decoded = decode(&packed).unwrap();
        assert_eq!(decoded.len(), 10);
        for (i, op) in decoded.iter().enumerate() {
            assert_eq!(op.kind().index(), i as u32);
            assert_eq!(op.len(), 7);
        }
    }

    #[test]
    fn test_decode_rejects_bad_opcode() {
        // opcode 0xB is outside the alphabet
        let err = decode(&[(5 << 4) | 0xB]).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::HtsViewError::MalformedCigar { opcode: 0xB, index: 0 }
        ));
    }

    #[test]
    fn test_decode_empty_is_legal() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_encode_rejects_overlong_op() {
        let err = encode(&[CigarOp::new(Kind::Match, MAX_OP_LEN + 1)]).unwrap_err();
        assert!(matches!(err, crate::errors::HtsViewError::LengthOverflow { .. }));
    }

    #[test]
    fn test_encode_max_length_ok() {
        let packed = encode(&[CigarOp::new(Kind::Match, MAX_OP_LEN)]).unwrap();
        assert_eq!(packed, vec![(MAX_OP_LEN << 4)]);
    }

    #[rstest]
    #[case::single_match(&[(36, Kind::Match)])]
    #[case::clipped(&[(5, Kind::SoftClip), (30, Kind::Match), (1, Kind::Insertion)])]
    #[case::spliced(&[(10, Kind::Match), (200, Kind::Skip), (10, Kind::Match)])]
    #[case::exotic(&[(3, Kind::HardClip), (4, Kind::Pad), (2, Kind::Back), (8, Kind::SequenceMatch)])]
    fn test_round_trip(#[case] parts: &[(u32, Kind)]) {
        let original = ops(parts);
        let packed = encode(&original).unwrap();
        assert_eq!(decode(&packed).unwrap(), original);
    }

    #[test]
    fn test_cigar_string_empty_is_star() {
        assert_eq!(cigar_string(&[]), "*");
    }

    #[test]
    fn test_cigar_string_ordering() {
        let sequence = ops(&[(5, Kind::SoftClip), (30, Kind::Match), (1, Kind::Insertion)]);
        assert_eq!(cigar_string(&sequence), "5S30M1I");
    }

    #[test]
    fn test_lengths_single_match() {
        let sequence = ops(&[(36, Kind::Match)]);
        assert_eq!(query_length(&sequence), 36);
        assert_eq!(reference_length(&sequence), 36);
    }

    #[test]
    fn test_lengths_clipped_and_inserted() {
        let sequence = ops(&[(5, Kind::SoftClip), (30, Kind::Match), (1, Kind::Insertion)]);
        assert_eq!(query_length(&sequence), 36);
        assert_eq!(reference_length(&sequence), 30);
    }

    #[test]
    fn test_lengths_with_deletion_and_skip() {
        // 10M3D5M2N8M: reference = 10+3+5+2+8 = 28, query = 10+5+8 = 23
        let sequence = ops(&[
            (10, Kind::Match),
            (3, Kind::Deletion),
            (5, Kind::Match),
            (2, Kind::Skip),
            (8, Kind::Match),
        ]);
        assert_eq!(reference_length(&sequence), 28);
        assert_eq!(query_length(&sequence), 23);
    }

    #[test]
    fn test_eq_and_x_consume_both() {
        let sequence = ops(&[(10, Kind::SequenceMatch), (3, Kind::SequenceMismatch)]);
        assert_eq!(query_length(&sequence), 13);
        assert_eq!(reference_length(&sequence), 13);
    }

    #[test]
    fn test_hard_clip_and_pad_consume_neither() {
        let sequence = ops(&[(3, Kind::HardClip), (4, Kind::Pad), (2, Kind::Back)]);
        assert_eq!(query_length(&sequence), 0);
        assert_eq!(reference_length(&sequence), 0);
    }
}
