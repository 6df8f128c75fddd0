use crate::error::{Error, Result};

/// Decodes an unsigned LEB128 value, returning it and the number of bytes consumed.
pub fn decode(values: &[u8]) -> Result<(u64, usize)> {
    let mut result = 0;
    let mut shift = 0;

    let mut consumed = 0;
    for byte in values {
        consumed += 1;
        if shift == 63 && *byte > 1 {
            return Err(Error::oos("A ULEB128 value does not fit in 64 bits"));
        };

        result |= u64::from(byte & 0x7f) << shift;

        if byte & 0x80 == 0 {
            return Ok((result, consumed));
        }

        shift += 7;
    }
    Err(Error::oos("A ULEB128 value is truncated"))
}
