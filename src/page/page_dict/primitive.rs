use crate::error::{Error, Result};
use crate::types::{decode, NativeType};

use super::index_out_of_range;

#[derive(Debug, Clone, PartialEq)]
pub struct PrimitivePageDict<T: NativeType> {
    values: Vec<T>,
}

impl<T: NativeType> PrimitivePageDict<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn value(&self, index: usize) -> Result<T> {
        self.values
            .get(index)
            .copied()
            .ok_or_else(|| index_out_of_range(index, self.values.len()))
    }
}

fn read_plain<T: NativeType>(values: &[u8]) -> Result<Vec<T>> {
    // read in plain
    if values.len() % std::mem::size_of::<T>() != 0 {
        return Err(Error::oos(
            "A dictionary page with primitive values must contain a multiple of their format.",
        ));
    }
    values
        .chunks_exact(std::mem::size_of::<T>())
        .map(decode::<T>)
        .collect()
}

pub fn read<T: NativeType>(buf: &[u8], num_values: usize) -> Result<PrimitivePageDict<T>> {
    let typed_size = num_values.checked_mul(std::mem::size_of::<T>());
    let buf = typed_size.and_then(|size| buf.get(..size)).ok_or_else(|| {
        Error::oos(format!(
            "The dictionary page declares {} values but has only {} bytes",
            num_values,
            buf.len()
        ))
    })?;
    let values = read_plain::<T>(buf)?;
    Ok(PrimitivePageDict::new(values))
}
