use crate::encoding::plain_byte_array::BinaryIter;
use crate::error::{Error, Result};

use super::index_out_of_range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPageDict {
    values: Vec<u8>,
    offsets: Vec<i32>,
}

impl BinaryPageDict {
    pub fn new(values: Vec<u8>, offsets: Vec<i32>) -> Self {
        Self { values, offsets }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn value(&self, index: usize) -> Result<&[u8]> {
        if index >= self.len() {
            return Err(index_out_of_range(index, self.len()));
        }
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        Ok(&self.values[start..end])
    }
}

fn read_plain(bytes: &[u8], length: usize) -> Result<(Vec<u8>, Vec<i32>)> {
    let mut values = Vec::new();
    // every value carries at least its 4-byte length
    let mut offsets = Vec::with_capacity(length.min(bytes.len() / 4) + 1);
    offsets.push(0);

    let mut iter = BinaryIter::new(bytes, Some(length));
    for _ in 0..length {
        let value = iter.next().transpose()?.ok_or_else(|| {
            Error::oos("The dictionary page has fewer values than it declares")
        })?;
        values.extend_from_slice(value);
        offsets.push(values.len() as i32);
    }

    Ok((values, offsets))
}

pub fn read(buf: &[u8], num_values: usize) -> Result<BinaryPageDict> {
    let (values, offsets) = read_plain(buf, num_values)?;
    Ok(BinaryPageDict::new(values, offsets))
}
