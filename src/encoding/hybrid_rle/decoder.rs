use super::{Decoder, HybridEncoded};
use crate::encoding::bitpacked;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum State<'a> {
    Rle { value: u32, remaining: usize },
    Bitpacked(bitpacked::Decoder<'a, u32>),
    None,
}

/// A slice of the current run of a [`HybridRleDecoder`], returned by [`HybridRleDecoder::next_run`].
#[derive(Debug)]
pub enum Run<'b, 'a> {
    /// `length` repetitions of `value`.
    Repeated { value: u32, length: usize },
    /// The next bitpacked values of the run. Items not consumed from it are lost.
    Bitpacked(std::iter::Take<&'b mut bitpacked::Decoder<'a, u32>>),
}

/// Decoder of the RLE/bit-packing hybrid encoding of `u32`s of a known bit width.
///
/// Values are decoded lazily, run by run: consumers that can handle a whole run at once
/// (e.g. a repeated definition level) use [`HybridRleDecoder::next_run`]; consumers that
/// need one value at a time use [`HybridRleDecoder::next_value`] or the [`Iterator`].
#[derive(Debug, Clone)]
pub struct HybridRleDecoder<'a> {
    runs: Decoder<'a>,
    num_bits: usize,
    state: State<'a>,
    // number of values that the stream declares and that were not yet consumed
    remaining: usize,
}

impl<'a> HybridRleDecoder<'a> {
    /// Returns a new [`HybridRleDecoder`] of `num_values` values.
    /// A bit width of zero represents `num_values` zeros and consumes no bytes.
    pub fn try_new(data: &'a [u8], num_bits: u32, num_values: usize) -> Result<Self> {
        let num_bits = num_bits as usize;
        if num_bits > 32 {
            return Err(Error::oos(format!(
                "The bit width of a RLE/bit-packed run cannot be larger than 32 (got {})",
                num_bits
            )));
        }
        let state = if num_bits == 0 {
            State::Rle {
                value: 0,
                remaining: num_values,
            }
        } else {
            State::None
        };
        Ok(Self {
            runs: Decoder::new(data, num_bits),
            num_bits,
            state,
            remaining: num_values,
        })
    }

    /// The number of values not yet consumed.
    #[inline]
    pub fn len(&self) -> usize {
        self.remaining
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    fn load_run(&mut self) -> Result<()> {
        let run = self.runs.next().transpose()?.ok_or_else(|| {
            Error::oos("The RLE/bit-packed stream ended before all its values were read")
        })?;
        self.state = match run {
            HybridEncoded::Bitpacked(packed) => {
                let length = packed.len() * 8 / self.num_bits;
                State::Bitpacked(bitpacked::Decoder::try_new(packed, self.num_bits, length)?)
            }
            HybridEncoded::Rle(pack, length) => {
                let mut bytes = [0u8; std::mem::size_of::<u32>()];
                pack.iter()
                    .zip(bytes.iter_mut())
                    .for_each(|(src, dst)| *dst = *src);
                State::Rle {
                    value: u32::from_le_bytes(bytes),
                    remaining: length,
                }
            }
        };
        Ok(())
    }

    /// Returns up to `limit` values of the current run, loading the next run when the
    /// current one is exhausted. The returned run is never empty when `limit > 0`.
    /// # Errors
    /// Errors when all declared values were already consumed or the stream is malformed.
    pub fn next_run(&mut self, limit: usize) -> Result<Run<'_, 'a>> {
        if self.remaining == 0 {
            return Err(Error::oos(
                "Requested more values than the RLE/bit-packed stream declares",
            ));
        }
        let limit = limit.min(self.remaining);
        loop {
            let has_items = match &self.state {
                State::Rle { remaining, .. } => *remaining > 0,
                State::Bitpacked(decoder) => decoder.len() > 0,
                State::None => false,
            };
            if has_items {
                break;
            }
            self.load_run()?;
        }

        match &mut self.state {
            State::Rle { value, remaining } => {
                let length = limit.min(*remaining);
                *remaining -= length;
                self.remaining -= length;
                Ok(Run::Repeated {
                    value: *value,
                    length,
                })
            }
            State::Bitpacked(decoder) => {
                let length = limit.min(decoder.len());
                self.remaining -= length;
                Ok(Run::Bitpacked(decoder.take(length)))
            }
            State::None => Err(Error::oos("The RLE/bit-packed stream has no run")),
        }
    }

    /// Returns the next value.
    #[inline]
    pub fn next_value(&mut self) -> Result<u32> {
        match self.next_run(1)? {
            Run::Repeated { value, .. } => Ok(value),
            Run::Bitpacked(mut values) => values
                .next()
                .ok_or_else(|| Error::oos("The bitpacked run has no values")),
        }
    }
}

impl<'a> Iterator for HybridRleDecoder<'a> {
    type Item = Result<u32>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.next_value();
        if result.is_err() {
            // stop at the first error
            self.remaining = 0;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
