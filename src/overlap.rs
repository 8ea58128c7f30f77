//! Quality reconciliation for mate reads overlapping on the reference.
//!
//! When both reads of a pair cover the same reference base, the evidence is
//! not independent. Agreeing calls concentrate their combined quality on the
//! first read and zero the second; disagreeing calls keep a dampened quality
//! on the first read and zero the second, so downstream consumers count the
//! position once.

use crate::cigar::CigarOp;
use crate::record::AlignmentRecord;

/// Counts accumulated by [`reconcile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapStats {
    /// Reference positions covered by both reads
    pub overlapping: usize,
    /// Overlapping positions where the base calls agree
    pub agreeing: usize,
    /// Overlapping positions where the base calls disagree
    pub disagreeing: usize,
}

/// (reference position, query index) pairs for every aligned base, in
/// reference order.
fn aligned_pairs(pos: i32, cigar: &[CigarOp]) -> Vec<(i64, usize)> {
    let mut pairs = Vec::new();
    let mut ref_pos = i64::from(pos);
    let mut query_idx = 0usize;
    for op in cigar {
        let len = op.len() as usize;
        let kind = op.kind();
        if kind.consumes_query() && kind.consumes_reference() {
            for k in 0..len {
                pairs.push((ref_pos + k as i64, query_idx + k));
            }
        }
        if kind.consumes_reference() {
            ref_pos += len as i64;
        }
        if kind.consumes_query() {
            query_idx += len;
        }
    }
    pairs
}

/// Reconciles base qualities over the reference overlap of two records.
///
/// At each reference position aligned in both records, an agreeing base pair
/// moves the second record's quality onto the first (wrapping u8 addition,
/// uncapped) and zeroes the second; a disagreeing pair scales the first
/// record's quality by 4/5 (integer floor) and zeroes the second.
///
/// Records lacking qualities, or with an empty reference overlap, are left
/// untouched.
pub fn reconcile(first: &mut AlignmentRecord, second: &mut AlignmentRecord) -> OverlapStats {
    let mut stats = OverlapStats::default();
    if first.qualities.is_none() || second.qualities.is_none() {
        return stats;
    }
    if first.pos < 0 || second.pos < 0 {
        return stats;
    }

    let pairs_a = aligned_pairs(first.pos, &first.cigar);
    let pairs_b = aligned_pairs(second.pos, &second.cigar);

    let quals_a = first.qualities.as_mut().unwrap();
    let quals_b = second.qualities.as_mut().unwrap();

    // Both pair lists are sorted by reference position.
    let (mut i, mut j) = (0, 0);
    while i < pairs_a.len() && j < pairs_b.len() {
        let (ref_a, qa) = pairs_a[i];
        let (ref_b, qb) = pairs_b[j];
        if ref_a < ref_b {
            i += 1;
        } else if ref_b < ref_a {
            j += 1;
        } else {
            stats.overlapping += 1;
            if first.sequence[qa].eq_ignore_ascii_case(&second.sequence[qb]) {
                stats.agreeing += 1;
                quals_a[qa] = quals_a[qa].wrapping_add(quals_b[qb]);
            } else {
                stats.disagreeing += 1;
                quals_a[qa] = (u16::from(quals_a[qa]) * 4 / 5) as u8;
            }
            quals_b[qb] = 0;
            i += 1;
            j += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cigar;
    use crate::cigar::Kind;
    use crate::testutil::make_raw_record;

    fn record(pos: i32, cigar_ops: &[CigarOp], bases: &[u8], quals: &[u8]) -> AlignmentRecord {
        let packed = cigar::encode(cigar_ops).unwrap();
        let raw = make_raw_record(0, pos, 0, b"rd", &packed, bases, Some(quals), &[]);
        AlignmentRecord::from_raw_bam(&raw).unwrap()
    }

    const SEQ: &[u8] = b"TACAAATCTTACGTAAACACTCCAAGCATGAATTCG";

    #[test]
    fn test_full_overlap_agreeing_doubles_first_and_zeroes_second() {
        let quals: Vec<u8> = b"Y`V_a_TM[\\_V`abb`^^Q]QZaaaaa_aaaaaaa".iter().map(|&c| c - 33).collect();
        let ops = [CigarOp::new(Kind::Match, 36)];
        let mut a = record(9329, &ops, SEQ, &quals);
        let mut b = a.clone();

        let stats = reconcile(&mut a, &mut b);
        assert_eq!(stats, OverlapStats { overlapping: 36, agreeing: 36, disagreeing: 0 });
        let doubled: Vec<u8> = quals.iter().map(|&q| q * 2).collect();
        assert_eq!(a.qualities.as_deref(), Some(doubled.as_slice()));
        assert_eq!(b.qualities.as_deref(), Some(vec![0u8; 36].as_slice()));
        assert_eq!(&a.qualities.as_deref().unwrap()[..3], &[112, 126, 106]);
    }

    #[test]
    fn test_disagreeing_base_dampens_first() {
        let ops = [CigarOp::new(Kind::Match, 4)];
        let mut a = record(100, &ops, b"ACGT", &[90, 40, 40, 40]);
        let mut b = record(100, &ops, b"TCGT", &[90, 40, 40, 40]);

        let stats = reconcile(&mut a, &mut b);
        assert_eq!(stats, OverlapStats { overlapping: 4, agreeing: 3, disagreeing: 1 });
        // floor(90 * 4 / 5) = 72 at the mismatch, sums elsewhere
        assert_eq!(a.qualities.as_deref(), Some([72, 80, 80, 80].as_slice()));
        assert_eq!(b.qualities.as_deref(), Some([0, 0, 0, 0].as_slice()));
    }

    #[test]
    fn test_summed_quality_wraps_without_clamping() {
        let ops = [CigarOp::new(Kind::Match, 1)];
        let mut a = record(5, &ops, b"A", &[200]);
        let mut b = record(5, &ops, b"A", &[100]);
        reconcile(&mut a, &mut b);
        assert_eq!(a.qualities.as_deref(), Some([44].as_slice()));
    }

    #[test]
    fn test_partial_overlap_touches_only_shared_positions() {
        let ops = [CigarOp::new(Kind::Match, 4)];
        let mut a = record(100, &ops, b"ACGT", &[10, 20, 30, 40]);
        let mut b = record(102, &ops, b"GTAA", &[5, 5, 5, 5]);

        let stats = reconcile(&mut a, &mut b);
        assert_eq!(stats.overlapping, 2);
        assert_eq!(a.qualities.as_deref(), Some([10, 20, 35, 45].as_slice()));
        assert_eq!(b.qualities.as_deref(), Some([0, 0, 5, 5].as_slice()));
    }

    #[test]
    fn test_soft_clips_and_deletions_shift_coordinates() {
        // a: 2S2M at 100 covers ref 100..102 with query bases 2,3
        // b: 1M1D1M at 101 covers ref 101 (query 0) and 103 (query 1)
        let mut a = record(
            100,
            &[CigarOp::new(Kind::SoftClip, 2), CigarOp::new(Kind::Match, 2)],
            b"TTAC",
            &[9, 9, 10, 20],
        );
        let mut b = record(
            101,
            &[CigarOp::new(Kind::Match, 1), CigarOp::new(Kind::Deletion, 1), CigarOp::new(Kind::Match, 1)],
            b"CG",
            &[7, 7],
        );

        let stats = reconcile(&mut a, &mut b);
        // only ref 101 is shared; a's base there is 'C' (query index 3)
        assert_eq!(stats, OverlapStats { overlapping: 1, agreeing: 1, disagreeing: 0 });
        assert_eq!(a.qualities.as_deref(), Some([9, 9, 10, 27].as_slice()));
        assert_eq!(b.qualities.as_deref(), Some([0, 7].as_slice()));
    }

    #[test]
    fn test_disjoint_records_are_untouched() {
        let ops = [CigarOp::new(Kind::Match, 4)];
        let mut a = record(100, &ops, b"ACGT", &[10; 4]);
        let mut b = record(500, &ops, b"ACGT", &[10; 4]);
        let stats = reconcile(&mut a, &mut b);
        assert_eq!(stats, OverlapStats::default());
        assert_eq!(a.qualities.as_deref(), Some([10; 4].as_slice()));
    }

    #[test]
    fn test_missing_qualities_is_a_no_op() {
        let ops = [CigarOp::new(Kind::Match, 4)];
        let mut a = record(100, &ops, b"ACGT", &[10; 4]);
        let raw = make_raw_record(0, 100, 0, b"rd", &cigar::encode(&ops).unwrap(), b"ACGT", None, &[]);
        let mut b = AlignmentRecord::from_raw_bam(&raw).unwrap();
        let stats = reconcile(&mut a, &mut b);
        assert_eq!(stats, OverlapStats::default());
        assert_eq!(a.qualities.as_deref(), Some([10; 4].as_slice()));
        assert_eq!(b.qualities, None);
    }

    #[test]
    fn test_case_insensitive_base_agreement() {
        let ops = [CigarOp::new(Kind::Match, 1)];
        let mut a = record(5, &ops, b"a", &[10]);
        let mut b = record(5, &ops, b"A", &[10]);
        let stats = reconcile(&mut a, &mut b);
        assert_eq!(stats.agreeing, 1);
        assert_eq!(a.qualities.as_deref(), Some([20].as_slice()));
    }
}
