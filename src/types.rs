use std::convert::TryFrom;

use crate::error::{Error, Result};

/// A physical native representation of a Parquet fixed-sized type.
pub trait NativeType: Sized + Copy + std::fmt::Debug + Default + Send + Sync + 'static {
    type Bytes: AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! native {
    ($type:ty) => {
        impl NativeType for $type {
            type Bytes = [u8; std::mem::size_of::<Self>()];

            #[inline]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                Self::from_le_bytes(bytes)
            }
        }
    };
}

native!(i32);
native!(i64);
native!(f32);
native!(f64);

impl NativeType for [u32; 3] {
    type Bytes = [u8; std::mem::size_of::<Self>()];

    #[inline]
    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        let mut first = [0; 4];
        first.copy_from_slice(&bytes[..4]);
        let mut second = [0; 4];
        second.copy_from_slice(&bytes[4..8]);
        let mut third = [0; 4];
        third.copy_from_slice(&bytes[8..]);
        [
            u32::from_le_bytes(first),
            u32::from_le_bytes(second),
            u32::from_le_bytes(third),
        ]
    }
}

/// Decodes a single value from the first `size_of::<T>()` bytes of `chunk`.
#[inline]
pub fn decode<T: NativeType>(chunk: &[u8]) -> Result<T> {
    let size = std::mem::size_of::<T>();
    let bytes = chunk
        .get(..size)
        .ok_or_else(|| Error::oos("Not enough bytes to decode a plain value"))?;
    let bytes = <T::Bytes as TryFrom<&[u8]>>::try_from(bytes)
        .map_err(|_| Error::oos("Not enough bytes to decode a plain value"))?;
    Ok(T::from_le_bytes(bytes))
}

const JULIAN_DAY_OF_EPOCH: i64 = 2_440_588;
const MICROS_PER_DAY: i64 = 86_400_000_000;

/// Converts an Int96 (nanoseconds of the day followed by the julian day) into
/// microseconds since the unix epoch.
/// # Errors
/// Errors iff the instant is not representable as `i64` microseconds.
#[inline]
pub fn int96_to_i64_us(value: [u32; 3]) -> Result<i64> {
    let nanos = ((value[1] as i64) << 32) + value[0] as i64;
    let day = value[2] as i64;
    (day - JULIAN_DAY_OF_EPOCH)
        .checked_mul(MICROS_PER_DAY)
        .and_then(|micros| micros.checked_add(nanos / 1000))
        .ok_or_else(|| {
            Error::oos(format!(
                "The Int96 timestamp of julian day {} cannot be represented in microseconds",
                day
            ))
        })
}
