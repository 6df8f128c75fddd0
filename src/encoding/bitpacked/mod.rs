//! Bit-unpacking of integers stored LSB-first, as used by the RLE/bit-packing hybrid
//! encoding and by the miniblocks of delta-encoded pages.
mod decode;
mod unpack;

pub use decode::Decoder;

pub trait Packed: Copy + Sized + AsRef<[u8]> + AsMut<[u8]> {
    const LENGTH: usize;
    fn zero() -> Self;
}

impl Packed for [u8; 32 * 4] {
    const LENGTH: usize = 32 * 4;
    #[inline]
    fn zero() -> Self {
        [0; 32 * 4]
    }
}

impl Packed for [u8; 64 * 8] {
    const LENGTH: usize = 64 * 8;
    #[inline]
    fn zero() -> Self {
        [0; 64 * 8]
    }
}

pub trait Unpacked<T>: Copy + Sized + AsMut<[T]> + std::ops::Index<usize, Output = T> {
    const LENGTH: usize;
    fn zero() -> Self;
}

impl Unpacked<u32> for [u32; 32] {
    const LENGTH: usize = 32;
    #[inline]
    fn zero() -> Self {
        [0; 32]
    }
}

impl Unpacked<u64> for [u64; 64] {
    const LENGTH: usize = 64;
    #[inline]
    fn zero() -> Self {
        [0; 64]
    }
}

/// A type that can be bit-unpacked in packs of [`Unpacked::LENGTH`] items.
pub trait Unpackable: Copy + Sized + Default + std::fmt::Debug {
    /// The maximum bit width of this type.
    const BITS: usize;
    type Packed: Packed;
    type Unpacked: Unpacked<Self> + std::fmt::Debug;
    fn unpack(packed: &[u8], num_bits: usize, unpacked: &mut Self::Unpacked);
}

impl Unpackable for u32 {
    const BITS: usize = 32;
    type Packed = [u8; 32 * 4];
    type Unpacked = [u32; 32];

    #[inline]
    fn unpack(packed: &[u8], num_bits: usize, unpacked: &mut Self::Unpacked) {
        unpack::unpack32(packed, unpacked, num_bits)
    }
}

impl Unpackable for u64 {
    const BITS: usize = 64;
    type Packed = [u8; 64 * 8];
    type Unpacked = [u64; 64];

    #[inline]
    fn unpack(packed: &[u8], num_bits: usize, unpacked: &mut Self::Unpacked) {
        unpack::unpack64(packed, unpacked, num_bits)
    }
}
