use super::super::{bitpacked, uleb128, zigzag_leb128};
use crate::error::{Error, Result};

/// Decoder of [DELTA_BINARY_PACKED](https://github.com/apache/parquet-format/blob/master/Encodings.md#delta-encoding-delta_binary_packed--5)
/// values. It is an [`Iterator`] of `Result<i64>`; 32-bit columns truncate the result.
/// # Implementation
/// Miniblocks are unpacked lazily; this struct does not allocate on the heap.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    // bytes not yet parsed
    values: &'a [u8],
    consumed_bytes: usize,
    num_mini_blocks: usize,
    values_per_mini_block: usize,
    // number of values not yet returned
    remaining: usize,
    // the value to be returned next (before its delta is applied)
    last_value: i64,
    first_returned: bool,
    // the state of the current block
    min_delta: i64,
    bitwidths: &'a [u8],
    miniblock: bitpacked::Decoder<'a, u64>,
}

impl<'a> Decoder<'a> {
    /// Returns a new [`Decoder`] by parsing the header of `values`.
    pub fn try_new(mut values: &'a [u8]) -> Result<Self> {
        let mut consumed_bytes = 0;

        let (block_size, consumed) = uleb128::decode(values)?;
        values = &values[consumed..];
        consumed_bytes += consumed;
        let (num_mini_blocks, consumed) = uleb128::decode(values)?;
        values = &values[consumed..];
        consumed_bytes += consumed;
        let (total_count, consumed) = uleb128::decode(values)?;
        values = &values[consumed..];
        consumed_bytes += consumed;
        let (first_value, consumed) = zigzag_leb128::decode(values)?;
        values = &values[consumed..];
        consumed_bytes += consumed;

        if block_size == 0 || block_size % 128 != 0 {
            return Err(Error::oos(format!(
                "The delta block size must be a positive multiple of 128 (got {})",
                block_size
            )));
        }
        if num_mini_blocks == 0 || block_size % num_mini_blocks != 0 {
            return Err(Error::oos(format!(
                "The delta block size {} cannot be split into {} miniblocks",
                block_size, num_mini_blocks
            )));
        }
        let values_per_mini_block = (block_size / num_mini_blocks) as usize;
        if values_per_mini_block % 32 != 0 {
            return Err(Error::oos(format!(
                "The number of values in a delta miniblock must be a multiple of 32 (got {})",
                values_per_mini_block
            )));
        }

        // every block carries at least its min delta and its bit widths
        let deltas = total_count.saturating_sub(1);
        let num_blocks = deltas / block_size + (deltas % block_size != 0) as u64;
        if num_blocks.saturating_mul(num_mini_blocks.saturating_add(1)) > values.len() as u64 {
            return Err(Error::oos(format!(
                "A delta stream of {} values cannot fit in {} bytes",
                total_count,
                values.len()
            )));
        }

        Ok(Self {
            values,
            consumed_bytes,
            num_mini_blocks: num_mini_blocks as usize,
            values_per_mini_block,
            remaining: total_count as usize,
            last_value: first_value,
            first_returned: false,
            min_delta: 0,
            bitwidths: &[],
            miniblock: bitpacked::Decoder::try_new(&[], 0, 0)?,
        })
    }

    /// Returns the number of bytes consumed so far. Once all values were read, this is
    /// the total number of bytes of the encoded values.
    pub fn consumed_bytes(&self) -> usize {
        self.consumed_bytes
    }

    fn advance(&mut self, bytes: usize) {
        self.values = &self.values[bytes..];
        self.consumed_bytes += bytes;
    }

    fn load_block(&mut self) -> Result<()> {
        let (min_delta, consumed) = zigzag_leb128::decode(self.values)?;
        self.advance(consumed);
        self.min_delta = min_delta;

        if self.values.len() < self.num_mini_blocks {
            return Err(Error::oos(
                "The delta block is truncated: its miniblock bit widths are missing",
            ));
        }
        self.bitwidths = &self.values[..self.num_mini_blocks];
        self.advance(self.num_mini_blocks);
        Ok(())
    }

    fn load_miniblock(&mut self) -> Result<()> {
        if self.bitwidths.is_empty() {
            self.load_block()?;
        }
        let num_bits = self.bitwidths[0] as usize;
        self.bitwidths = &self.bitwidths[1..];

        // every miniblock is padded, but only the values still remaining are decoded
        let miniblock_bytes = self
            .values_per_mini_block
            .checked_mul(num_bits)
            .ok_or_else(|| {
                Error::oos(format!(
                    "A delta miniblock of {} values with {} bits does not fit in memory",
                    self.values_per_mini_block, num_bits
                ))
            })?
            / 8;
        let miniblock_bytes = miniblock_bytes.min(self.values.len());
        let length = self.values_per_mini_block.min(self.remaining);
        let (miniblock, _) = self.values.split_at(miniblock_bytes);
        self.miniblock = bitpacked::Decoder::try_new(miniblock, num_bits, length)?;
        self.advance(miniblock_bytes);
        Ok(())
    }

    fn next_value(&mut self) -> Result<i64> {
        if !self.first_returned {
            self.first_returned = true;
            return Ok(self.last_value);
        }
        if self.miniblock.len() == 0 {
            self.load_miniblock()?;
        }
        let delta = self
            .miniblock
            .next()
            .ok_or_else(|| Error::oos("The delta miniblock has no values"))?;
        self.last_value = self
            .last_value
            .wrapping_add(self.min_delta)
            .wrapping_add(delta as i64);
        Ok(self.last_value)
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<i64>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.next_value();
        self.remaining = if result.is_ok() {
            self.remaining - 1
        } else {
            0
        };
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
