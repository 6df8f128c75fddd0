use crate::encoding::hybrid_rle::{HybridRleDecoder, Run};
use crate::error::Result;

/// Reader of the dictionary ids of a dictionary-encoded data page: a one-byte bit width
/// followed by the RLE/bit-packed ids of the present slots.
#[derive(Debug, Clone)]
pub(crate) struct DictionaryIdsReader<'a> {
    decoder: HybridRleDecoder<'a>,
}

impl<'a> DictionaryIdsReader<'a> {
    /// `num_values` is an upper bound of the number of ids: nulls have no id.
    pub fn try_new(data: &'a [u8], num_values: usize) -> Result<Self> {
        let decoder = match data.split_first() {
            Some((bit_width, ids)) => {
                HybridRleDecoder::try_new(ids, *bit_width as u32, num_values)?
            }
            // a page without present slots may have no ids at all
            None => HybridRleDecoder::try_new(&[], 0, 0)?,
        };
        Ok(Self { decoder })
    }

    /// Reads the next `length` ids, calling `f` with the offset of each id in this read.
    pub fn read<F>(&mut self, length: usize, mut f: F) -> Result<()>
    where
        F: FnMut(usize, u32) -> Result<()>,
    {
        let mut done = 0;
        while done < length {
            match self.decoder.next_run(length - done)? {
                Run::Repeated { value, length: run } => {
                    for offset in done..done + run {
                        f(offset, value)?;
                    }
                    done += run;
                }
                Run::Bitpacked(values) => {
                    for value in values {
                        f(done, value)?;
                        done += 1;
                    }
                }
            }
        }
        Ok(())
    }
}
