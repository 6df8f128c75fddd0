use super::{Packed, Unpackable, Unpacked};
use crate::encoding::ceil8;
use crate::error::{Error, Result};

/// An [`Iterator`] of [`Unpackable`] unpacked from a bitpacked slice of bytes.
/// # Implementation
/// This iterator unpacks bytes in chunks and does not allocate.
#[derive(Debug, Clone)]
pub struct Decoder<'a, T: Unpackable> {
    compressed_chunks: std::slice::Chunks<'a, u8>,
    num_bits: usize,
    remaining: usize,
    current_pack_index: usize, // invariant: < T::Unpacked::LENGTH
    current_pack: T::Unpacked,
}

#[inline]
fn decode_pack<T: Unpackable>(compressed: &[u8], num_bits: usize, pack: &mut T::Unpacked) {
    let compressed_block_size = T::Unpacked::LENGTH * num_bits / 8;

    if compressed.len() < compressed_block_size {
        let mut buf = T::Packed::zero();
        buf.as_mut()[..compressed.len()].copy_from_slice(compressed);
        T::unpack(buf.as_ref(), num_bits, pack)
    } else {
        T::unpack(compressed, num_bits, pack)
    }
}

impl<'a, T: Unpackable> Decoder<'a, T> {
    /// Returns a [`Decoder`] of `length` items of `num_bits` bits each.
    /// # Errors
    /// Errors iff `num_bits` is larger than `T` or `compressed` holds fewer than `length` items.
    pub fn try_new(compressed: &'a [u8], num_bits: usize, length: usize) -> Result<Self> {
        if num_bits > T::BITS {
            return Err(Error::oos(format!(
                "A bit width of {} cannot be unpacked into {} bits",
                num_bits,
                T::BITS
            )));
        }
        let required = length.checked_mul(num_bits).map(ceil8).ok_or_else(|| {
            Error::oos(format!(
                "A bitpacked run of {} values with {} bits does not fit in memory",
                length, num_bits
            ))
        })?;
        if compressed.len() < required {
            return Err(Error::oos(format!(
                "A bitpacked run of {} values with {} bits requires {} bytes but only {} are available",
                length,
                num_bits,
                required,
                compressed.len()
            )));
        }
        let compressed: &[u8] = if num_bits == 0 { &[] } else { compressed };
        let compressed_block_size = (T::Unpacked::LENGTH * num_bits / 8).max(1);

        let mut compressed_chunks = compressed.chunks(compressed_block_size);
        let mut current_pack = T::Unpacked::zero();
        if let Some(chunk) = compressed_chunks.next() {
            decode_pack::<T>(chunk, num_bits, &mut current_pack);
        }

        Ok(Self {
            remaining: length,
            compressed_chunks,
            num_bits,
            current_pack,
            current_pack_index: 0,
        })
    }
}

impl<'a, T: Unpackable> Iterator for Decoder<'a, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.current_pack[self.current_pack_index];
        self.current_pack_index += 1;
        if self.current_pack_index == T::Unpacked::LENGTH {
            self.current_pack_index = 0;
            match self.compressed_chunks.next() {
                Some(chunk) => decode_pack::<T>(chunk, self.num_bits, &mut self.current_pack),
                // only zero-width runs end up here
                None => self.current_pack = T::Unpacked::zero(),
            }
        }
        self.remaining -= 1;
        Some(result)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: Unpackable> ExactSizeIterator for Decoder<'a, T> {}
