use std::convert::TryInto;

use crate::error::{Error, Result};

pub mod bitpacked;
pub mod delta_bitpacked;
pub mod delta_byte_array;
pub mod delta_length_byte_array;
pub mod hybrid_rle;
pub mod plain_byte_array;
pub mod uleb128;
pub mod zigzag_leb128;

pub use crate::parquet_bridge::Encoding;

/// Reads the 4-byte little-endian length prefix of `values`.
pub fn get_length(values: &[u8]) -> Result<u32> {
    values
        .get(0..4)
        .ok_or_else(|| Error::oos("A length prefix requires 4 bytes"))?
        .try_into()
        .map(u32::from_le_bytes)
        .map_err(Error::from)
}

/// Returns the ceil of value/8
#[inline]
pub fn ceil8(value: usize) -> usize {
    value / 8 + ((value % 8 != 0) as usize)
}
