//! Output buffers that decoded values are written into.
//!
//! Vectors are allocated by the caller with a fixed number of slots and are never
//! reallocated by the decoder; every slot starts as null with a default value.
mod bitmap;
mod nullability;

pub use bitmap::MutableBitmap;
pub use nullability::NullabilityHolder;

use crate::error::{Error, Result};
use crate::types::NativeType;

/// A vector of fixed-size native values.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveVector<T: NativeType> {
    values: Vec<T>,
    validity: MutableBitmap,
}

impl<T: NativeType> PrimitiveVector<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: vec![T::default(); capacity],
            validity: MutableBitmap::from_len_zeroed(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn validity(&self) -> &MutableBitmap {
        &self.validity
    }

    /// The value at `index`, or `None` if the slot is null.
    pub fn value(&self, index: usize) -> Option<T> {
        self.validity.get(index).then(|| self.values[index])
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        self.values[index] = value;
    }

    #[inline]
    pub fn set_valid(&mut self, index: usize) {
        self.validity.set(index, true)
    }

    #[inline]
    pub fn set_null(&mut self, index: usize) {
        self.validity.set(index, false)
    }
}

pub type IntVector = PrimitiveVector<i32>;
pub type BigIntVector = PrimitiveVector<i64>;
pub type Float4Vector = PrimitiveVector<f32>;
pub type Float8Vector = PrimitiveVector<f64>;

/// A vector of booleans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVector {
    values: MutableBitmap,
    validity: MutableBitmap,
}

impl BitVector {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: MutableBitmap::from_len_zeroed(capacity),
            validity: MutableBitmap::from_len_zeroed(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    pub fn validity(&self) -> &MutableBitmap {
        &self.validity
    }

    pub fn value(&self, index: usize) -> Option<bool> {
        self.validity.get(index).then(|| self.values.get(index))
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        self.values.set(index, value)
    }
}

/// A vector of binary values of the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSizeBinaryVector {
    values: Vec<u8>,
    size: usize,
    validity: MutableBitmap,
}

impl FixedSizeBinaryVector {
    pub fn with_capacity(capacity: usize, size: usize) -> Self {
        Self {
            values: vec![0; capacity * size],
            size,
            validity: MutableBitmap::from_len_zeroed(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.validity.len()
    }

    /// The number of bytes of each value.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn validity(&self) -> &MutableBitmap {
        &self.validity
    }

    pub fn value(&self, index: usize) -> Option<&[u8]> {
        self.validity
            .get(index)
            .then(|| &self.values[index * self.size..(index + 1) * self.size])
    }

    /// # Panics
    /// Panics if `value` does not have `self.size()` bytes.
    #[inline]
    pub fn set(&mut self, index: usize, value: &[u8]) {
        self.values[index * self.size..(index + 1) * self.size].copy_from_slice(value)
    }
}

/// A vector of variable-length binary values, stored as offsets into one buffer.
///
/// Slots must be written in increasing order; slots skipped over become empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarBinaryVector {
    values: Vec<u8>,
    offsets: Vec<i32>,
    validity: MutableBitmap,
    // number of leading slots whose offsets are final
    last_set: usize,
}

impl VarBinaryVector {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: vec![],
            offsets: vec![0; capacity + 1],
            validity: MutableBitmap::from_len_zeroed(capacity),
            last_set: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.validity.len()
    }

    pub fn validity(&self) -> &MutableBitmap {
        &self.validity
    }

    pub fn values(&self) -> &[u8] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&[u8]> {
        if !self.validity.get(index) {
            return None;
        }
        if index >= self.last_set {
            return Some(&[]);
        }
        let start = self.offsets[index] as usize;
        let end = self.offsets[index + 1] as usize;
        Some(&self.values[start..end])
    }

    /// The first slot that can still be written.
    pub fn next_writable(&self) -> usize {
        self.last_set
    }

    /// Writes `value` to slot `index`.
    /// # Errors
    /// * [`Error::InvalidParameter`] if a slot after `index` was already written
    /// * [`Error::UnsupportedOperation`] if the vector would hold more than `i32::MAX` bytes
    pub fn set(&mut self, index: usize, value: &[u8]) -> Result<()> {
        if index < self.last_set {
            return Err(out_of_order(index, self.last_set));
        }
        let end = self.values.len() + value.len();
        let end = i32::try_from(end).map_err(|_| {
            Error::UnsupportedOperation(
                "A variable-width vector cannot hold more than i32::MAX bytes".to_string(),
            )
        })?;
        let start = self.offsets[self.last_set];
        for offset in &mut self.offsets[self.last_set + 1..=index] {
            *offset = start;
        }
        self.values.extend_from_slice(value);
        self.offsets[index + 1] = end;
        self.last_set = index + 1;
        Ok(())
    }
}

fn out_of_order(index: usize, last_set: usize) -> Error {
    Error::InvalidParameter(format!(
        "Slot {} of a variable-width vector is written after slot {}",
        index,
        last_set - 1
    ))
}

/// A type-erased output vector.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldVector {
    Int(IntVector),
    BigInt(BigIntVector),
    Float4(Float4Vector),
    Float8(Float8Vector),
    Bit(BitVector),
    FixedSizeBinary(FixedSizeBinaryVector),
    VarBinary(VarBinaryVector),
}

impl FieldVector {
    pub fn capacity(&self) -> usize {
        match self {
            FieldVector::Int(v) => v.capacity(),
            FieldVector::BigInt(v) => v.capacity(),
            FieldVector::Float4(v) => v.capacity(),
            FieldVector::Float8(v) => v.capacity(),
            FieldVector::Bit(v) => v.capacity(),
            FieldVector::FixedSizeBinary(v) => v.capacity(),
            FieldVector::VarBinary(v) => v.capacity(),
        }
    }

    /// Checks that slots from `start` onwards can be written.
    /// # Errors
    /// Errors iff this is a [`VarBinaryVector`] with a slot after `start` already written.
    pub fn check_start(&self, start: usize) -> Result<()> {
        match self {
            FieldVector::VarBinary(v) if start < v.last_set => {
                Err(out_of_order(start, v.last_set))
            }
            _ => Ok(()),
        }
    }

    pub fn validity(&self) -> &MutableBitmap {
        match self {
            FieldVector::Int(v) => &v.validity,
            FieldVector::BigInt(v) => &v.validity,
            FieldVector::Float4(v) => &v.validity,
            FieldVector::Float8(v) => &v.validity,
            FieldVector::Bit(v) => &v.validity,
            FieldVector::FixedSizeBinary(v) => &v.validity,
            FieldVector::VarBinary(v) => &v.validity,
        }
    }

    fn validity_mut(&mut self) -> &mut MutableBitmap {
        match self {
            FieldVector::Int(v) => &mut v.validity,
            FieldVector::BigInt(v) => &mut v.validity,
            FieldVector::Float4(v) => &mut v.validity,
            FieldVector::Float8(v) => &mut v.validity,
            FieldVector::Bit(v) => &mut v.validity,
            FieldVector::FixedSizeBinary(v) => &mut v.validity,
            FieldVector::VarBinary(v) => &mut v.validity,
        }
    }

    #[inline]
    pub fn set_valid(&mut self, index: usize) {
        self.validity_mut().set(index, true)
    }

    #[inline]
    pub fn set_null(&mut self, index: usize) {
        self.validity_mut().set(index, false)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldVector::Int(_) => "Int",
            FieldVector::BigInt(_) => "BigInt",
            FieldVector::Float4(_) => "Float4",
            FieldVector::Float8(_) => "Float8",
            FieldVector::Bit(_) => "Bit",
            FieldVector::FixedSizeBinary(_) => "FixedSizeBinary",
            FieldVector::VarBinary(_) => "VarBinary",
        }
    }
}
