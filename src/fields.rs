//! Fixed-offset field access for raw BAM record buffers.
//!
//! A raw record (as yielded by an alignment region query, without the
//! `block_size` prefix) starts with a 32-byte fixed header:
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0-3     4     refID (i32)
//! 4-7     4     pos (i32, 0-based leftmost)
//! 8       1     l_read_name (u8, name length incl. NUL)
//! 9       1     mapq (u8)
//! 10-11   2     bin (u16)
//! 12-13   2     n_cigar_op (u16)
//! 14-15   2     flag (u16)
//! 16-19   4     l_seq (u32)
//! 20-23   4     next_refID (i32)
//! 24-27   4     next_pos (i32)
//! 28-31   4     tlen (i32)
//! 32+     var   name, CIGAR, packed seq, qual, aux
//! ```
//!
//! The accessors here assume `buf.len() >= MIN_RECORD_LEN`; callers validate
//! the record length once (see [`crate::record::AlignmentRecord::from_raw_bam`])
//! before using them.

/// Length of the fixed portion of a raw record.
pub const MIN_RECORD_LEN: usize = 32;

/// Reference sequence id; -1 when unmapped.
#[inline]
#[must_use]
pub fn ref_id(buf: &[u8]) -> i32 {
    i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}

/// 0-based leftmost alignment position; -1 when unmapped.
#[inline]
#[must_use]
pub fn pos(buf: &[u8]) -> i32 {
    i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]])
}

/// Read-name length including the trailing NUL.
#[inline]
#[must_use]
pub fn l_read_name(buf: &[u8]) -> u8 {
    buf[8]
}

/// Mapping quality.
#[inline]
#[must_use]
pub fn mapq(buf: &[u8]) -> u8 {
    buf[9]
}

/// Number of CIGAR operations.
#[inline]
#[must_use]
pub fn n_cigar_op(buf: &[u8]) -> u16 {
    u16::from_le_bytes([buf[12], buf[13]])
}

/// Flag bitfield.
#[inline]
#[must_use]
pub fn flag(buf: &[u8]) -> u16 {
    u16::from_le_bytes([buf[14], buf[15]])
}

/// Query sequence length.
#[inline]
#[must_use]
pub fn l_seq(buf: &[u8]) -> u32 {
    u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]])
}

/// Read name bytes without the trailing NUL.
#[inline]
#[must_use]
pub fn read_name(buf: &[u8]) -> &[u8] {
    let l = buf[8] as usize;
    if l > 1 { &buf[MIN_RECORD_LEN..MIN_RECORD_LEN + l - 1] } else { &[] }
}

/// Byte offset of the packed CIGAR words.
#[inline]
#[must_use]
pub fn cigar_offset(l_read_name: usize) -> usize {
    MIN_RECORD_LEN + l_read_name
}

/// Byte offset of the 4-bit packed sequence.
#[inline]
#[must_use]
pub fn seq_offset(l_read_name: usize, n_cigar_op: usize) -> usize {
    cigar_offset(l_read_name) + n_cigar_op * 4
}

/// Byte offset of the per-base quality array.
#[inline]
#[must_use]
pub fn qual_offset(l_read_name: usize, n_cigar_op: usize, l_seq: usize) -> usize {
    seq_offset(l_read_name, n_cigar_op) + l_seq.div_ceil(2)
}

/// Byte offset of the auxiliary tag block.
///
/// `aux_offset = 32 + l_read_name + n_cigar_op*4 + ceil(l_seq/2) + l_seq`
#[inline]
#[must_use]
pub fn aux_offset(l_read_name: usize, n_cigar_op: usize, l_seq: usize) -> usize {
    qual_offset(l_read_name, n_cigar_op, l_seq) + l_seq
}
