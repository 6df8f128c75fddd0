use crate::error::{Error, Result};
use crate::metadata::ColumnDescriptor;
use crate::page::{Dictionary, PrimitivePageDict};
use crate::schema::types::{PhysicalType, PrimitiveConvertedType};
use crate::types::{int96_to_i64_us, NativeType};
use crate::vector::{FieldVector, PrimitiveVector};

use super::dictionary_ids::DictionaryIdsReader;
use super::values::ValuesReader;

/// How the values of a column are materialized into a [`FieldVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    /// INT32 into [`FieldVector::Int`]
    Int32,
    /// INT64 into [`FieldVector::BigInt`]
    Int64,
    /// FLOAT into [`FieldVector::Float4`]
    Float32,
    /// DOUBLE into [`FieldVector::Float8`]
    Float64,
    /// BOOLEAN into [`FieldVector::Bit`]
    Boolean,
    /// FIXED_LEN_BYTE_ARRAY of the given size into [`FieldVector::FixedSizeBinary`]
    FixedBinary(usize),
    /// BYTE_ARRAY into [`FieldVector::VarBinary`]
    VarBinary,
    /// INT64 milliseconds into [`FieldVector::BigInt`] microseconds
    TimestampMillis,
    /// INT96 into [`FieldVector::BigInt`] microseconds
    TimestampInt96,
}

impl VectorKind {
    pub fn from_descriptor(descriptor: &ColumnDescriptor) -> Self {
        match descriptor.physical_type() {
            PhysicalType::Boolean => VectorKind::Boolean,
            PhysicalType::Int32 => VectorKind::Int32,
            PhysicalType::Int64 => match descriptor.converted_type() {
                Some(PrimitiveConvertedType::TimestampMillis) => VectorKind::TimestampMillis,
                _ => VectorKind::Int64,
            },
            PhysicalType::Int96 => VectorKind::TimestampInt96,
            PhysicalType::Float => VectorKind::Float32,
            PhysicalType::Double => VectorKind::Float64,
            PhysicalType::ByteArray => VectorKind::VarBinary,
            PhysicalType::FixedLenByteArray(size) => VectorKind::FixedBinary(*size),
        }
    }

    /// The number of bytes of one value in the output vector, `None` for booleans and
    /// variable-width values.
    pub fn type_width(&self) -> Option<usize> {
        match self {
            VectorKind::Int32 | VectorKind::Float32 => Some(4),
            VectorKind::Int64
            | VectorKind::Float64
            | VectorKind::TimestampMillis
            | VectorKind::TimestampInt96 => Some(8),
            VectorKind::FixedBinary(size) => Some(*size),
            VectorKind::Boolean | VectorKind::VarBinary => None,
        }
    }

    /// Whether `vector` can receive values of this kind.
    pub fn accepts(&self, vector: &FieldVector) -> bool {
        match (self, vector) {
            (VectorKind::Int32, FieldVector::Int(_)) => true,
            (
                VectorKind::Int64 | VectorKind::TimestampMillis | VectorKind::TimestampInt96,
                FieldVector::BigInt(_),
            ) => true,
            (VectorKind::Float32, FieldVector::Float4(_)) => true,
            (VectorKind::Float64, FieldVector::Float8(_)) => true,
            (VectorKind::Boolean, FieldVector::Bit(_)) => true,
            (VectorKind::FixedBinary(size), FieldVector::FixedSizeBinary(v)) => v.size() == *size,
            (VectorKind::VarBinary, FieldVector::VarBinary(_)) => true,
            _ => false,
        }
    }

    pub(crate) fn functions(&self) -> &'static ReadFunctions {
        match self {
            VectorKind::Int32 => &INT32,
            VectorKind::Int64 => &INT64,
            VectorKind::Float32 => &FLOAT32,
            VectorKind::Float64 => &FLOAT64,
            VectorKind::Boolean => &BOOLEAN,
            VectorKind::FixedBinary(_) => &FIXED_BINARY,
            VectorKind::VarBinary => &VAR_BINARY,
            VectorKind::TimestampMillis => &TIMESTAMP_MILLIS,
            VectorKind::TimestampInt96 => &TIMESTAMP_INT96,
        }
    }
}

/// Reads `length` values into `vector` starting at slot `start`.
pub(crate) type ReadPlain = fn(&mut ValuesReader<'_>, &mut FieldVector, usize, usize) -> Result<()>;

/// Reads `length` ids and writes their dictionary values into `vector` starting at slot `start`.
pub(crate) type ReadDictionary =
    fn(&Dictionary, &mut DictionaryIdsReader<'_>, &mut FieldVector, usize, usize) -> Result<()>;

/// The readers of one [`VectorKind`].
pub(crate) struct ReadFunctions {
    pub read_plain: ReadPlain,
    /// `None` when the kind cannot be dictionary-encoded.
    pub read_dictionary: Option<ReadDictionary>,
}

static INT32: ReadFunctions = ReadFunctions {
    read_plain: plain_int32,
    read_dictionary: Some(dictionary_int32),
};
static INT64: ReadFunctions = ReadFunctions {
    read_plain: plain_int64,
    read_dictionary: Some(dictionary_int64),
};
static FLOAT32: ReadFunctions = ReadFunctions {
    read_plain: plain_float32,
    read_dictionary: Some(dictionary_float32),
};
static FLOAT64: ReadFunctions = ReadFunctions {
    read_plain: plain_float64,
    read_dictionary: Some(dictionary_float64),
};
static BOOLEAN: ReadFunctions = ReadFunctions {
    read_plain: plain_boolean,
    read_dictionary: None,
};
static FIXED_BINARY: ReadFunctions = ReadFunctions {
    read_plain: plain_fixed_binary,
    read_dictionary: Some(dictionary_fixed_binary),
};
static VAR_BINARY: ReadFunctions = ReadFunctions {
    read_plain: plain_var_binary,
    read_dictionary: Some(dictionary_var_binary),
};
static TIMESTAMP_MILLIS: ReadFunctions = ReadFunctions {
    read_plain: plain_timestamp_millis,
    read_dictionary: Some(dictionary_timestamp_millis),
};
static TIMESTAMP_INT96: ReadFunctions = ReadFunctions {
    read_plain: plain_timestamp_int96,
    read_dictionary: Some(dictionary_timestamp_int96),
};

fn wrong_vector(expected: &str, vector: &FieldVector) -> Error {
    Error::InvalidParameter(format!(
        "Expected a {} vector, got a {} vector",
        expected,
        vector.name()
    ))
}

fn wrong_dictionary(expected: PhysicalType, dictionary: &Dictionary) -> Error {
    Error::oos(format!(
        "A column of type {:?} cannot be decoded with a dictionary of {:?}",
        expected,
        dictionary.physical_type()
    ))
}

#[inline]
fn millis_to_micros(value: i64) -> Result<i64> {
    value.checked_mul(1000).ok_or_else(|| {
        Error::oos(format!(
            "The timestamp {}ms cannot be represented in microseconds",
            value
        ))
    })
}

/// A native type with its own variant of [`FieldVector`].
trait Primitive: NativeType {
    const NAME: &'static str;

    fn vector(vector: &mut FieldVector) -> Option<&mut PrimitiveVector<Self>>;
}

macro_rules! primitive {
    ($type:ty, $variant:ident) => {
        impl Primitive for $type {
            const NAME: &'static str = stringify!($variant);

            #[inline]
            fn vector(vector: &mut FieldVector) -> Option<&mut PrimitiveVector<Self>> {
                match vector {
                    FieldVector::$variant(vector) => Some(vector),
                    _ => None,
                }
            }
        }
    };
}

primitive!(i32, Int);
primitive!(i64, BigInt);
primitive!(f32, Float4);
primitive!(f64, Float8);

#[inline]
fn read_primitive<T, F>(
    vector: &mut FieldVector,
    start: usize,
    length: usize,
    mut read: F,
) -> Result<()>
where
    T: Primitive,
    F: FnMut() -> Result<T>,
{
    let name = vector.name();
    let vector = T::vector(vector).ok_or_else(|| {
        Error::InvalidParameter(format!(
            "Expected a {} vector, got a {} vector",
            T::NAME,
            name
        ))
    })?;
    for index in start..start + length {
        vector.set(index, read()?);
    }
    Ok(())
}

#[inline]
fn read_primitive_dictionary<T, D, F>(
    dictionary: &PrimitivePageDict<D>,
    ids: &mut DictionaryIdsReader<'_>,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
    map: F,
) -> Result<()>
where
    T: Primitive,
    D: NativeType,
    F: Fn(D) -> Result<T>,
{
    let name = vector.name();
    let vector = T::vector(vector).ok_or_else(|| {
        Error::InvalidParameter(format!(
            "Expected a {} vector, got a {} vector",
            T::NAME,
            name
        ))
    })?;
    ids.read(length, |offset, id| {
        let value = dictionary.value(id as usize)?;
        vector.set(start + offset, map(value)?);
        Ok(())
    })
}

fn plain_int32(
    values: &mut ValuesReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    read_primitive(vector, start, length, || values.read_i32())
}

fn plain_int64(
    values: &mut ValuesReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    read_primitive(vector, start, length, || values.read_i64())
}

fn plain_timestamp_millis(
    values: &mut ValuesReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    read_primitive(vector, start, length, || {
        values.read_i64().and_then(millis_to_micros)
    })
}

fn plain_timestamp_int96(
    values: &mut ValuesReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    read_primitive(vector, start, length, || {
        values.read_int96().and_then(int96_to_i64_us)
    })
}

fn plain_float32(
    values: &mut ValuesReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    read_primitive(vector, start, length, || values.read_f32())
}

fn plain_float64(
    values: &mut ValuesReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    read_primitive(vector, start, length, || values.read_f64())
}

fn plain_boolean(
    values: &mut ValuesReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    let vector = match vector {
        FieldVector::Bit(vector) => vector,
        other => return Err(wrong_vector("Bit", other)),
    };
    for index in start..start + length {
        vector.set(index, values.read_bool()?);
    }
    Ok(())
}

fn plain_fixed_binary(
    values: &mut ValuesReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    let vector = match vector {
        FieldVector::FixedSizeBinary(vector) => vector,
        other => return Err(wrong_vector("FixedSizeBinary", other)),
    };
    let size = vector.size();
    for index in start..start + length {
        vector.set(index, values.read_fixed(size)?);
    }
    Ok(())
}

fn plain_var_binary(
    values: &mut ValuesReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    let vector = match vector {
        FieldVector::VarBinary(vector) => vector,
        other => return Err(wrong_vector("VarBinary", other)),
    };
    for index in start..start + length {
        vector.set(index, values.read_binary()?)?;
    }
    Ok(())
}

fn dictionary_int32(
    dictionary: &Dictionary,
    ids: &mut DictionaryIdsReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    match dictionary {
        Dictionary::Int32(dict) => read_primitive_dictionary(dict, ids, vector, start, length, Ok),
        other => Err(wrong_dictionary(PhysicalType::Int32, other)),
    }
}

fn dictionary_int64(
    dictionary: &Dictionary,
    ids: &mut DictionaryIdsReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    match dictionary {
        Dictionary::Int64(dict) => read_primitive_dictionary(dict, ids, vector, start, length, Ok),
        other => Err(wrong_dictionary(PhysicalType::Int64, other)),
    }
}

fn dictionary_timestamp_millis(
    dictionary: &Dictionary,
    ids: &mut DictionaryIdsReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    match dictionary {
        Dictionary::Int64(dict) => {
            read_primitive_dictionary(dict, ids, vector, start, length, millis_to_micros)
        }
        other => Err(wrong_dictionary(PhysicalType::Int64, other)),
    }
}

fn dictionary_timestamp_int96(
    dictionary: &Dictionary,
    ids: &mut DictionaryIdsReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    match dictionary {
        Dictionary::Int96(dict) => {
            read_primitive_dictionary(dict, ids, vector, start, length, int96_to_i64_us)
        }
        other => Err(wrong_dictionary(PhysicalType::Int96, other)),
    }
}

fn dictionary_float32(
    dictionary: &Dictionary,
    ids: &mut DictionaryIdsReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    match dictionary {
        Dictionary::Float(dict) => read_primitive_dictionary(dict, ids, vector, start, length, Ok),
        other => Err(wrong_dictionary(PhysicalType::Float, other)),
    }
}

fn dictionary_float64(
    dictionary: &Dictionary,
    ids: &mut DictionaryIdsReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    match dictionary {
        Dictionary::Double(dict) => read_primitive_dictionary(dict, ids, vector, start, length, Ok),
        other => Err(wrong_dictionary(PhysicalType::Double, other)),
    }
}

fn dictionary_fixed_binary(
    dictionary: &Dictionary,
    ids: &mut DictionaryIdsReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    let vector = match vector {
        FieldVector::FixedSizeBinary(vector) => vector,
        other => return Err(wrong_vector("FixedSizeBinary", other)),
    };
    let dict = match dictionary {
        Dictionary::FixedLenByteArray(dict) if dict.size() == vector.size() => dict,
        other => {
            return Err(wrong_dictionary(
                PhysicalType::FixedLenByteArray(vector.size()),
                other,
            ))
        }
    };
    ids.read(length, |offset, id| {
        vector.set(start + offset, dict.value(id as usize)?);
        Ok(())
    })
}

fn dictionary_var_binary(
    dictionary: &Dictionary,
    ids: &mut DictionaryIdsReader,
    vector: &mut FieldVector,
    start: usize,
    length: usize,
) -> Result<()> {
    let vector = match vector {
        FieldVector::VarBinary(vector) => vector,
        other => return Err(wrong_vector("VarBinary", other)),
    };
    let dict = match dictionary {
        Dictionary::ByteArray(dict) => dict,
        other => return Err(wrong_dictionary(PhysicalType::ByteArray, other)),
    };
    ids.read(length, |offset, id| {
        vector.set(start + offset, dict.value(id as usize)?)
    })
}
