//! Typed view of a single alignment record.

use std::fmt::Write as _;

use bstr::{BString, ByteSlice};

use crate::cigar::{self, CigarOp};
use crate::errors::{HtsViewError, Result};
use crate::fields;
use crate::sequence;
use crate::tags::{self, AuxTag};

/// Alignment flag bits.
pub mod flags {
    /// Read is paired in sequencing.
    pub const PAIRED: u16 = 0x1;
    /// Pair mapped in proper orientation.
    pub const PROPER_PAIR: u16 = 0x2;
    /// Read is unmapped.
    pub const UNMAPPED: u16 = 0x4;
    /// Mate is unmapped.
    pub const MATE_UNMAPPED: u16 = 0x8;
    /// Read is reverse complemented.
    pub const REVERSE: u16 = 0x10;
    /// Mate is reverse complemented.
    pub const MATE_REVERSE: u16 = 0x20;
    /// First segment in template (R1).
    pub const FIRST_SEGMENT: u16 = 0x40;
    /// Last segment in template (R2).
    pub const LAST_SEGMENT: u16 = 0x80;
    /// Secondary alignment.
    pub const SECONDARY: u16 = 0x100;
    /// Not passing quality controls.
    pub const QC_FAIL: u16 = 0x200;
    /// PCR or optical duplicate.
    pub const DUPLICATE: u16 = 0x400;
    /// Supplementary alignment.
    pub const SUPPLEMENTARY: u16 = 0x800;

    const NAMES: [(u16, &str); 12] = [
        (PAIRED, "PAIRED"),
        (PROPER_PAIR, "PROPER_PAIR"),
        (UNMAPPED, "UNMAP"),
        (MATE_UNMAPPED, "MUNMAP"),
        (REVERSE, "REVERSE"),
        (MATE_REVERSE, "MREVERSE"),
        (FIRST_SEGMENT, "READ1"),
        (LAST_SEGMENT, "READ2"),
        (SECONDARY, "SECONDARY"),
        (QC_FAIL, "QCFAIL"),
        (DUPLICATE, "DUP"),
        (SUPPLEMENTARY, "SUPPLEMENTARY"),
    ];

    /// Comma-joined names of the set bits, e.g. `"PAIRED,REVERSE"`.
    #[must_use]
    pub fn describe(flag: u16) -> String {
        let mut names = Vec::new();
        for (bit, name) in NAMES {
            if flag & bit != 0 {
                names.push(name);
            }
        }
        names.join(",")
    }
}

/// Sentinel at index 0 of the raw quality array marking absent qualities.
const MISSING_QUALITY: u8 = 0xFF;

/// A fully owned alignment record.
///
/// Usually produced by [`AlignmentRecord::from_raw_bam`] over a buffer
/// yielded by a region query; a yielded view must be interpreted (or
/// duplicated) before the next advance.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    /// Query (read) name
    pub name: BString,
    /// Flag bitfield
    pub flag: u16,
    /// Reference sequence id; -1 when unmapped
    pub ref_id: i32,
    /// 0-based leftmost alignment position; -1 when unmapped
    pub pos: i32,
    /// Mapping quality
    pub mapq: u8,
    /// CIGAR operation sequence; empty when unmapped
    pub cigar: Vec<CigarOp>,
    /// Query sequence as ASCII bases
    pub sequence: BString,
    /// Per-base qualities; `None` when the record carries no qualities
    pub qualities: Option<Vec<u8>>,
    /// Mate reference sequence id; -1 when the mate is unmapped
    pub mate_ref_id: i32,
    /// Mate 0-based position; -1 when the mate is unmapped
    pub mate_pos: i32,
    /// Template (insert) length
    pub template_len: i32,
    /// Raw auxiliary tag block
    pub aux: Vec<u8>,
}

impl AlignmentRecord {
    /// Interprets a raw record buffer.
    ///
    /// # Errors
    ///
    /// [`HtsViewError::TruncatedRecord`] when the buffer is shorter than its
    /// declared layout; [`HtsViewError::MalformedCigar`] from CIGAR decoding;
    /// [`HtsViewError::CigarSequenceMismatch`] when a stored sequence does
    /// not span the CIGAR's query bases.
    pub fn from_raw_bam(buf: &[u8]) -> Result<Self> {
        if buf.len() < fields::MIN_RECORD_LEN {
            return Err(HtsViewError::TruncatedRecord {
                offset: buf.len(),
                expected: fields::MIN_RECORD_LEN - buf.len(),
            });
        }
        let l_read_name = fields::l_read_name(buf) as usize;
        let n_cigar_op = fields::n_cigar_op(buf) as usize;
        let l_seq = fields::l_seq(buf) as usize;
        let aux_offset = fields::aux_offset(l_read_name, n_cigar_op, l_seq);
        if buf.len() < aux_offset {
            return Err(HtsViewError::TruncatedRecord {
                offset: buf.len(),
                expected: aux_offset - buf.len(),
            });
        }

        // CIGAR words are read bytewise: the offset is not 4-byte aligned.
        let cigar_start = fields::cigar_offset(l_read_name);
        let packed: Vec<u32> = buf[cigar_start..cigar_start + n_cigar_op * 4]
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        let cigar = cigar::decode(&packed)?;

        // A record may omit its sequence (l_seq 0), but a stored sequence
        // must cover exactly the query bases the CIGAR consumes; otherwise
        // per-base operations over the alignment would index out of range.
        let cigar_bases = cigar::query_length(&cigar);
        if !cigar.is_empty() && l_seq != 0 && cigar_bases != l_seq {
            return Err(HtsViewError::CigarSequenceMismatch { cigar_bases, seq_bases: l_seq });
        }

        let seq_start = fields::seq_offset(l_read_name, n_cigar_op);
        let sequence = BString::from(sequence::unpack(&buf[seq_start..], l_seq));

        let qual_start = fields::qual_offset(l_read_name, n_cigar_op, l_seq);
        let qual = &buf[qual_start..qual_start + l_seq];
        let qualities = if l_seq == 0 || qual[0] == MISSING_QUALITY {
            None
        } else {
            Some(qual.to_vec())
        };

        Ok(Self {
            name: BString::from(fields::read_name(buf)),
            flag: fields::flag(buf),
            ref_id: fields::ref_id(buf),
            pos: fields::pos(buf),
            mapq: fields::mapq(buf),
            cigar,
            sequence,
            qualities,
            mate_ref_id: i32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]),
            mate_pos: i32::from_le_bytes([buf[24], buf[25], buf[26], buf[27]]),
            template_len: i32::from_le_bytes([buf[28], buf[29], buf[30], buf[31]]),
            aux: buf[aux_offset..].to_vec(),
        })
    }

    /// Length of the alignment by query bases.
    #[must_use]
    pub fn query_len(&self) -> usize {
        cigar::query_length(&self.cigar)
    }

    /// Length of the alignment on the reference.
    #[must_use]
    pub fn reference_len(&self) -> usize {
        cigar::reference_length(&self.cigar)
    }

    /// Half-open reference end: `pos + reference_len`. `None` when unmapped.
    #[must_use]
    pub fn alignment_end(&self) -> Option<i64> {
        if self.pos < 0 {
            return None;
        }
        Some(i64::from(self.pos) + self.reference_len() as i64)
    }

    /// Whether the read aligned to the reverse strand.
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.flag & flags::REVERSE != 0
    }

    /// `'-'` for reverse-strand alignments, `'+'` otherwise.
    #[must_use]
    pub fn strand(&self) -> char {
        if self.is_reverse() { '-' } else { '+' }
    }

    /// Decodes the auxiliary tag block.
    ///
    /// # Errors
    ///
    /// Propagates [`tags::decode`] failures.
    pub fn tags(&self) -> Result<Vec<AuxTag>> {
        tags::decode(&self.aux)
    }

    /// Renders the record as a SAM text line.
    ///
    /// `reference_name` and `mate_reference_name` come from the source's
    /// header (the engine's side of the boundary); they are ignored for
    /// unmapped coordinates, and an equal mate reference renders as `=`.
    ///
    /// # Errors
    ///
    /// Fails if the auxiliary block does not decode.
    pub fn to_sam(&self, reference_name: &str, mate_reference_name: &str) -> Result<String> {
        let mut line = String::new();
        if self.name.is_empty() {
            line.push('*');
        } else {
            let _ = write!(line, "{}", self.name.as_bstr());
        }
        let rname = if self.ref_id < 0 { "*" } else { reference_name };
        // 1-based display positions; unmapped (-1) renders as 0.
        let _ = write!(line, "\t{}\t{}\t{}\t{}\t{}", self.flag, rname, self.pos + 1, self.mapq, cigar::cigar_string(&self.cigar));
        let mate_rname = if self.mate_ref_id < 0 {
            "*"
        } else if self.mate_ref_id == self.ref_id {
            "="
        } else {
            mate_reference_name
        };
        let _ = write!(line, "\t{}\t{}\t{}", mate_rname, self.mate_pos + 1, self.template_len);

        if self.sequence.is_empty() {
            line.push_str("\t*");
        } else {
            let _ = write!(line, "\t{}", self.sequence.as_bstr());
        }
        match &self.qualities {
            None => line.push_str("\t*"),
            Some(quals) => {
                line.push('\t');
                for &q in quals {
                    line.push(char::from(q.saturating_add(33)));
                }
            }
        }
        for tag in self.tags()? {
            let _ = write!(line, "\t{tag}");
        }
        Ok(line)
    }
}
