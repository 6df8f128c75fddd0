use super::super::{delta_bitpacked, delta_length_byte_array};
use crate::error::{Error, Result};

/// Decodes according to [Delta strings](https://github.com/apache/parquet-format/blob/master/Encodings.md#delta-strings-delta_byte_array--7),
/// prefixes, lengths and values.
///
/// Each value is the prefix of the previous value followed by its suffix. The previous
/// value can be seeded with [`Decoder::with_previous`], which is required to read pages of
/// some legacy writers that carried it over page boundaries.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    prefix_lengths: delta_bitpacked::Decoder<'a>,
    suffixes: delta_length_byte_array::Decoder<'a>,
    previous: Vec<u8>,
}

impl<'a> Decoder<'a> {
    pub fn try_new(data: &'a [u8]) -> Result<Self> {
        let prefix_lengths = delta_bitpacked::Decoder::try_new(data)?;

        let mut scan = prefix_lengths.clone();
        for length in scan.by_ref() {
            length?;
        }
        let suffixes = delta_length_byte_array::Decoder::try_new(&data[scan.consumed_bytes()..])?;
        if suffixes.len() != prefix_lengths.size_hint().0 {
            return Err(Error::oos(
                "A delta byte array must have as many prefixes as suffixes",
            ));
        }

        Ok(Self {
            prefix_lengths,
            suffixes,
            previous: vec![],
        })
    }

    /// Seeds the value that the first prefix refers to.
    pub fn with_previous(mut self, previous: Vec<u8>) -> Self {
        self.set_previous(previous);
        self
    }

    /// Replaces the value that the next prefix refers to.
    pub fn set_previous(&mut self, previous: Vec<u8>) {
        self.previous = previous;
    }

    /// The last value read, or the seeded value if none was read.
    pub fn previous(&self) -> &[u8] {
        &self.previous
    }

    pub fn into_previous(self) -> Vec<u8> {
        self.previous
    }

    /// The number of values not yet read.
    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes the next value. The result is valid until the next call.
    pub fn next_value(&mut self) -> Result<&[u8]> {
        let prefix = self
            .prefix_lengths
            .next()
            .ok_or_else(|| Error::oos("No more values in the delta byte array"))??;
        let suffix = self
            .suffixes
            .next()
            .ok_or_else(|| Error::oos("No more values in the delta byte array"))??;

        if prefix < 0 || prefix as usize > self.previous.len() {
            return Err(Error::oos(format!(
                "The prefix length {} is larger than the previous value ({} bytes)",
                prefix,
                self.previous.len()
            )));
        }
        self.previous.truncate(prefix as usize);
        self.previous.extend_from_slice(suffix);
        Ok(&self.previous)
    }
}
