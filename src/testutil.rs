//! Test helpers for assembling raw record buffers.

use crate::sequence;

/// Assembles a raw record buffer from typed parts. Mapping quality is fixed
/// at 3 and mate fields are left unmapped; `quals: None` writes the
/// missing-quality sentinel.
pub fn make_raw_record(
    ref_id: i32,
    pos: i32,
    flag: u16,
    name: &[u8],
    packed_cigar: &[u32],
    bases: &[u8],
    quals: Option<&[u8]>,
    aux: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&ref_id.to_le_bytes());
    buf.extend_from_slice(&pos.to_le_bytes());
    buf.push(u8::try_from(name.len() + 1).unwrap());
    buf.push(3); // mapq
    buf.extend_from_slice(&0u16.to_le_bytes()); // bin
    buf.extend_from_slice(&u16::try_from(packed_cigar.len()).unwrap().to_le_bytes());
    buf.extend_from_slice(&flag.to_le_bytes());
    buf.extend_from_slice(&u32::try_from(bases.len()).unwrap().to_le_bytes());
    buf.extend_from_slice(&(-1i32).to_le_bytes()); // mate ref
    buf.extend_from_slice(&(-1i32).to_le_bytes()); // mate pos
    buf.extend_from_slice(&0i32.to_le_bytes()); // tlen
    buf.extend_from_slice(name);
    buf.push(0);
    for &word in packed_cigar {
        buf.extend_from_slice(&word.to_le_bytes());
    }
    buf.extend_from_slice(&sequence::pack(bases));
    match quals {
        Some(q) => buf.extend_from_slice(q),
        None => {
            let mut missing = vec![0u8; bases.len()];
            if let Some(first) = missing.first_mut() {
                *first = 0xFF;
            }
            buf.extend_from_slice(&missing);
        }
    }
    buf.extend_from_slice(aux);
    buf
}
