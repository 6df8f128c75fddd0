mod binary;
mod fixed_len_binary;
mod primitive;

pub use binary::BinaryPageDict;
pub use fixed_len_binary::FixedLenByteArrayPageDict;
pub use primitive::PrimitivePageDict;

use crate::error::{Error, Result};
use crate::schema::types::PhysicalType;

/// An encoded and uncompressed dictionary page. Its values are always PLAIN-encoded.
#[derive(Debug, Clone)]
pub struct DictPage {
    pub buffer: Vec<u8>,
    pub num_values: usize,
    pub is_sorted: bool,
}

impl DictPage {
    pub fn new(buffer: Vec<u8>, num_values: usize, is_sorted: bool) -> Self {
        Self {
            buffer,
            num_values,
            is_sorted,
        }
    }
}

/// The decoded values of a dictionary page, shared by all data pages of a column chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Dictionary {
    Int32(PrimitivePageDict<i32>),
    Int64(PrimitivePageDict<i64>),
    Int96(PrimitivePageDict<[u32; 3]>),
    Float(PrimitivePageDict<f32>),
    Double(PrimitivePageDict<f64>),
    ByteArray(BinaryPageDict),
    FixedLenByteArray(FixedLenByteArrayPageDict),
}

impl Dictionary {
    /// Deserializes a [`DictPage`] of a column of `physical_type`.
    /// # Errors
    /// Errors if the page is shorter than its declared number of values or if the
    /// physical type cannot be dictionary-encoded.
    pub fn try_from_page(page: &DictPage, physical_type: &PhysicalType) -> Result<Self> {
        let buf = &page.buffer;
        let num_values = page.num_values;
        Ok(match physical_type {
            PhysicalType::Boolean => {
                return Err(Error::oos(
                    "Boolean physical type cannot be dictionary-encoded",
                ))
            }
            PhysicalType::Int32 => Dictionary::Int32(primitive::read(buf, num_values)?),
            PhysicalType::Int64 => Dictionary::Int64(primitive::read(buf, num_values)?),
            PhysicalType::Int96 => Dictionary::Int96(primitive::read(buf, num_values)?),
            PhysicalType::Float => Dictionary::Float(primitive::read(buf, num_values)?),
            PhysicalType::Double => Dictionary::Double(primitive::read(buf, num_values)?),
            PhysicalType::ByteArray => Dictionary::ByteArray(binary::read(buf, num_values)?),
            PhysicalType::FixedLenByteArray(size) => {
                Dictionary::FixedLenByteArray(fixed_len_binary::read(buf, *size, num_values)?)
            }
        })
    }

    /// The number of entries of this dictionary. Valid ids are `0..len()`.
    pub fn len(&self) -> usize {
        match self {
            Dictionary::Int32(d) => d.values().len(),
            Dictionary::Int64(d) => d.values().len(),
            Dictionary::Int96(d) => d.values().len(),
            Dictionary::Float(d) => d.values().len(),
            Dictionary::Double(d) => d.values().len(),
            Dictionary::ByteArray(d) => d.len(),
            Dictionary::FixedLenByteArray(d) => d.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn physical_type(&self) -> PhysicalType {
        match self {
            Dictionary::Int32(_) => PhysicalType::Int32,
            Dictionary::Int64(_) => PhysicalType::Int64,
            Dictionary::Int96(_) => PhysicalType::Int96,
            Dictionary::Float(_) => PhysicalType::Float,
            Dictionary::Double(_) => PhysicalType::Double,
            Dictionary::ByteArray(_) => PhysicalType::ByteArray,
            Dictionary::FixedLenByteArray(d) => PhysicalType::FixedLenByteArray(d.size()),
        }
    }
}

#[inline]
pub(crate) fn index_out_of_range(index: usize, length: usize) -> Error {
    Error::oos(format!(
        "The data page has an index ({}) larger than the dictionary page values ({})",
        index, length
    ))
}
