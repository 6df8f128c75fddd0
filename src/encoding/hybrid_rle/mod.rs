// See https://github.com/apache/parquet-format/blob/master/Encodings.md#run-length-encoding--bit-packing-hybrid-rle--3
mod decoder;

pub use decoder::{HybridRleDecoder, Run};

use super::{ceil8, uleb128};
use crate::error::{Error, Result};

/// A run of the hybrid encoding.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HybridEncoded<'a> {
    /// A bitpacked slice. The consumer must know its bit-width to unpack it.
    Bitpacked(&'a [u8]),
    /// A RLE-encoded slice. The first attribute corresponds to the slice (that can be interpreted)
    /// the second attribute corresponds to the number of repetitions.
    Rle(&'a [u8], usize),
}

/// An [`Iterator`] that, given a slice of bytes, returns the [`HybridEncoded`] runs in it.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    values: &'a [u8],
    num_bits: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(values: &'a [u8], num_bits: usize) -> Self {
        Self { values, num_bits }
    }

    /// Returns the number of bits being used by this decoder.
    #[inline]
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<HybridEncoded<'a>>;

    #[inline] // -18% improvement in bench
    fn next(&mut self) -> Option<Self::Item> {
        if self.num_bits == 0 || self.values.is_empty() {
            return None;
        }
        let (indicator, consumed) = match uleb128::decode(self.values) {
            Ok(x) => x,
            Err(e) => return Some(Err(e)),
        };
        self.values = &self.values[consumed..];
        if indicator & 1 == 1 {
            // is bitpacking
            let bytes = match (indicator as usize >> 1).checked_mul(self.num_bits) {
                Some(bytes) => bytes,
                None => {
                    self.values = &[];
                    return Some(Err(Error::oos(
                        "The length of a bitpacked run does not fit in memory",
                    )));
                }
            };
            // writers are allowed to truncate the last run
            let bytes = std::cmp::min(bytes, self.values.len());
            let (result, remaining) = self.values.split_at(bytes);
            self.values = remaining;
            Some(Ok(HybridEncoded::Bitpacked(result)))
        } else {
            // is rle
            let run_length = indicator as usize >> 1;
            // repeated-value := value that is repeated, using a fixed-width of round-up-to-next-byte(bit-width)
            let rle_bytes = ceil8(self.num_bits);
            if self.values.len() < rle_bytes {
                self.values = &[];
                return Some(Err(Error::oos(
                    "The RLE run is truncated: its repeated value is missing",
                )));
            }
            let (result, remaining) = self.values.split_at(rle_bytes);
            self.values = remaining;
            Some(Ok(HybridEncoded::Rle(result, run_length)))
        }
    }
}
