use super::get_length;
use crate::error::{Error, Result};

/// Decodes according to [Plain strings](https://github.com/apache/parquet-format/blob/master/Encodings.md#plain-plain--0),
/// prefixes, lengths and values
/// # Implementation
/// This struct does not allocate on the heap.
#[derive(Debug, Clone)]
pub struct BinaryIter<'a> {
    values: &'a [u8],
    length: Option<usize>,
}

impl<'a> BinaryIter<'a> {
    pub fn new(values: &'a [u8], length: Option<usize>) -> Self {
        Self { values, length }
    }

    /// The bytes not yet read.
    pub fn remaining_bytes(&self) -> &'a [u8] {
        self.values
    }

    fn next_value(&mut self) -> Result<&'a [u8]> {
        let length = get_length(self.values)? as usize;
        let values = &self.values[4..];
        if values.len() < length {
            return Err(Error::oos(format!(
                "A plain byte array value declares {} bytes but only {} remain",
                length,
                values.len()
            )));
        }
        let (result, remaining) = values.split_at(length);
        self.values = remaining;
        Ok(result)
    }
}

impl<'a> Iterator for BinaryIter<'a> {
    type Item = Result<&'a [u8]>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.values.is_empty() || self.length == Some(0) {
            return None;
        }
        if let Some(x) = self.length.as_mut() {
            *x -= 1
        }
        let result = self.next_value();
        if result.is_err() {
            self.values = &[];
        }
        Some(result)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.length.unwrap_or_default(), self.length)
    }
}
