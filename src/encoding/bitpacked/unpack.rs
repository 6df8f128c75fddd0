use seq_macro::seq;

/// Reads the `index`-th `num_bits`-wide integer of `packed`, LSB-first.
/// `packed` must contain at least `ceil((index + 1) * num_bits / 8)` bytes.
#[inline(always)]
fn read_bits(packed: &[u8], num_bits: usize, index: usize) -> u64 {
    let mut bit = index * num_bits;
    let end = bit + num_bits;
    let mut value = 0u64;
    let mut shift = 0;
    while bit < end {
        let offset = bit % 8;
        let take = (8 - offset).min(end - bit);
        let bits = (packed[bit / 8] >> offset) as u64 & ((1u64 << take) - 1);
        value |= bits << shift;
        shift += take;
        bit += take;
    }
    value
}

/// Unpacks 32 values of `num_bits` bits from `packed` (at least `4 * num_bits` bytes).
pub fn unpack32(packed: &[u8], unpacked: &mut [u32; 32], num_bits: usize) {
    if num_bits == 0 {
        *unpacked = [0; 32];
        return;
    }
    seq!(I in 0..32 {
        unpacked[I] = read_bits(packed, num_bits, I) as u32;
    });
}

/// Unpacks 64 values of `num_bits` bits from `packed` (at least `8 * num_bits` bytes).
pub fn unpack64(packed: &[u8], unpacked: &mut [u64; 64], num_bits: usize) {
    if num_bits == 0 {
        *unpacked = [0; 64];
        return;
    }
    seq!(I in 0..64 {
        unpacked[I] = read_bits(packed, num_bits, I);
    });
}
