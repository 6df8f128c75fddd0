use crate::error::{Error, Result};

use super::index_out_of_range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLenByteArrayPageDict {
    values: Vec<u8>,
    size: usize,
}

impl FixedLenByteArrayPageDict {
    pub fn new(values: Vec<u8>, size: usize) -> Self {
        Self { values, size }
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        if self.size == 0 {
            0
        } else {
            self.values.len() / self.size
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn value(&self, index: usize) -> Result<&[u8]> {
        if index >= self.len() {
            return Err(index_out_of_range(index, self.len()));
        }
        Ok(&self.values[index * self.size..(index + 1) * self.size])
    }
}

pub fn read(buf: &[u8], size: usize, num_values: usize) -> Result<FixedLenByteArrayPageDict> {
    let values = size
        .checked_mul(num_values)
        .and_then(|length| buf.get(..length))
        .ok_or_else(|| {
            Error::oos(format!(
                "The dictionary page declares {} values of {} bytes but has only {} bytes",
                num_values,
                size,
                buf.len()
            ))
        })?;
    Ok(FixedLenByteArrayPageDict::new(values.to_vec(), size))
}
