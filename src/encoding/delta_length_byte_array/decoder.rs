use super::super::delta_bitpacked;
use crate::error::{Error, Result};

/// Decodes [Delta-length byte array](https://github.com/apache/parquet-format/blob/master/Encodings.md#delta-length-byte-array-delta_length_byte_array--6)
/// lengths and values.
/// # Implementation
/// The lengths are scanned once on construction to locate the values; this struct
/// does not allocate on the heap.
/// # Example
/// ```
/// use parquet_vectorized::encoding::delta_length_byte_array::Decoder;
///
/// let data = &[
///     128, 1, 4, 2, 10, 0, 0, 0, 0, 0, 72, 101, 108, 108, 111, 87, 111, 114, 108, 100,
/// ];
///
/// let decoder = Decoder::try_new(data).unwrap();
/// let values = decoder.collect::<Result<Vec<_>, _>>().unwrap();
///
/// assert_eq!(values, vec![b"Hello".as_ref(), b"World".as_ref()]);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    lengths: delta_bitpacked::Decoder<'a>,
    values: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn try_new(data: &'a [u8]) -> Result<Self> {
        let lengths = delta_bitpacked::Decoder::try_new(data)?;

        let mut scan = lengths.clone();
        for length in scan.by_ref() {
            length?;
        }
        let values = &data[scan.consumed_bytes()..];

        Ok(Self { lengths, values })
    }

    /// The number of values not yet read.
    pub fn len(&self) -> usize {
        self.lengths.size_hint().0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn next_value(&mut self, length: i64) -> Result<&'a [u8]> {
        if length < 0 || length as usize > self.values.len() {
            return Err(Error::oos(format!(
                "A delta-length byte array value of length {} exceeds the {} remaining bytes",
                length,
                self.values.len()
            )));
        }
        let (value, remaining) = self.values.split_at(length as usize);
        self.values = remaining;
        Ok(value)
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lengths
            .next()
            .map(|length| length.and_then(|length| self.next_value(length)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lengths.size_hint()
    }
}
