//! 4-bit packed base codec.
//!
//! BAM stores two bases per byte, high nibble first, using the 16-symbol
//! code `=ACMGRSVTWYHKDBN`.

/// Nibble code -> ASCII base.
pub const BASE_DECODE: [u8; 16] = *b"=ACMGRSVTWYHKDBN";

/// ASCII base -> nibble code. Unknown characters encode as N (0xF).
const BASE_ENCODE: [u8; 256] = {
    let mut table = [0x0Fu8; 256];
    let mut i = 0;
    while i < 16 {
        let base = BASE_DECODE[i];
        table[base as usize] = i as u8;
        table[base.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    table
};

/// Reads the nibble code of the base at `position` from packed data.
#[inline]
#[must_use]
pub fn get_base(packed: &[u8], position: usize) -> u8 {
    let byte = packed[position / 2];
    if position % 2 == 0 { byte >> 4 } else { byte & 0xF }
}

/// Unpacks `len` bases from 4-bit packed data into ASCII.
#[must_use]
pub fn unpack(packed: &[u8], len: usize) -> Vec<u8> {
    let mut bases = Vec::with_capacity(len);
    for i in 0..len {
        bases.push(BASE_DECODE[get_base(packed, i) as usize]);
    }
    bases
}

/// Packs ASCII bases two-per-byte. When the count is odd the low nibble of
/// the final byte is zero-padded.
#[must_use]
pub fn pack(bases: &[u8]) -> Vec<u8> {
    let mut packed = Vec::with_capacity(bases.len().div_ceil(2));
    let mut pairs = bases.chunks_exact(2);
    for pair in pairs.by_ref() {
        packed.push((BASE_ENCODE[pair[0] as usize] << 4) | BASE_ENCODE[pair[1] as usize]);
    }
    if let [last] = pairs.remainder() {
        packed.push(BASE_ENCODE[*last as usize] << 4);
    }
    packed
}
