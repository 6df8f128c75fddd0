use crate::encoding::{
    delta_bitpacked, delta_byte_array, delta_length_byte_array, get_length, Encoding,
};
use crate::error::{Error, Result};
use crate::types::{decode, NativeType};

/// State of a value reader that the reader of the next page of the same column chunk
/// can continue from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecoderState {
    /// The last value decoded from a DELTA_BYTE_ARRAY page.
    DeltaByteArray { previous: Vec<u8> },
}

/// Sequential reader of PLAIN-encoded values.
#[derive(Debug, Clone)]
pub(crate) struct PlainValuesReader<'a> {
    values: &'a [u8],
    // index of the next bit, for booleans
    bit_offset: usize,
}

impl<'a> PlainValuesReader<'a> {
    pub fn new(values: &'a [u8]) -> Self {
        Self {
            values,
            bit_offset: 0,
        }
    }

    #[inline]
    pub fn read_fixed(&mut self, size: usize) -> Result<&'a [u8]> {
        if self.values.len() < size {
            return Err(Error::oos(format!(
                "A plain value requires {} bytes but the page has {} left",
                size,
                self.values.len()
            )));
        }
        let (value, remaining) = self.values.split_at(size);
        self.values = remaining;
        Ok(value)
    }

    #[inline]
    pub fn read_native<T: NativeType>(&mut self) -> Result<T> {
        decode(self.read_fixed(std::mem::size_of::<T>())?)
    }

    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        let byte = self
            .values
            .get(self.bit_offset / 8)
            .ok_or_else(|| Error::oos("The page has no more plain booleans"))?;
        let value = byte & (1 << (self.bit_offset % 8)) != 0;
        self.bit_offset += 1;
        Ok(value)
    }

    #[inline]
    pub fn read_binary(&mut self) -> Result<&'a [u8]> {
        let length = get_length(self.values)? as usize;
        self.read_fixed(4)?;
        self.read_fixed(length)
    }
}

/// A reader of the (non-dictionary) values of a page.
#[derive(Debug, Clone)]
pub(crate) enum ValuesReader<'a> {
    Plain(PlainValuesReader<'a>),
    DeltaBinaryPacked(delta_bitpacked::Decoder<'a>),
    DeltaLengthByteArray(delta_length_byte_array::Decoder<'a>),
    DeltaByteArray(delta_byte_array::Decoder<'a>),
}

fn unsupported(reader: &ValuesReader, what: &str) -> Error {
    Error::UnsupportedOperation(format!(
        "A {} values reader cannot read {}",
        reader.name(),
        what
    ))
}

fn exhausted() -> Error {
    Error::oos("The page has fewer values than its definition levels require")
}

impl<'a> ValuesReader<'a> {
    pub fn try_new(encoding: Encoding, values: &'a [u8]) -> Result<Self> {
        Ok(match encoding {
            Encoding::Plain => Self::Plain(PlainValuesReader::new(values)),
            Encoding::DeltaBinaryPacked => {
                Self::DeltaBinaryPacked(delta_bitpacked::Decoder::try_new(values)?)
            }
            Encoding::DeltaLengthByteArray => {
                Self::DeltaLengthByteArray(delta_length_byte_array::Decoder::try_new(values)?)
            }
            Encoding::DeltaByteArray => {
                Self::DeltaByteArray(delta_byte_array::Decoder::try_new(values)?)
            }
            other => {
                return Err(Error::UnsupportedEncoding(format!(
                    "Values encoded as {:?} cannot be read in batches",
                    other
                )))
            }
        })
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Plain(_) => "PLAIN",
            Self::DeltaBinaryPacked(_) => "DELTA_BINARY_PACKED",
            Self::DeltaLengthByteArray(_) => "DELTA_LENGTH_BYTE_ARRAY",
            Self::DeltaByteArray(_) => "DELTA_BYTE_ARRAY",
        }
    }

    #[inline]
    fn next_delta(&mut self) -> Result<i64> {
        match self {
            Self::DeltaBinaryPacked(decoder) => decoder.next().ok_or_else(exhausted)?,
            _ => Err(unsupported(self, "integers")),
        }
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        match self {
            Self::Plain(reader) => reader.read_native(),
            _ => self.next_delta().map(|x| x as i32),
        }
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        match self {
            Self::Plain(reader) => reader.read_native(),
            _ => self.next_delta(),
        }
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        match self {
            Self::Plain(reader) => reader.read_native(),
            _ => Err(unsupported(self, "floats")),
        }
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        match self {
            Self::Plain(reader) => reader.read_native(),
            _ => Err(unsupported(self, "doubles")),
        }
    }

    #[inline]
    pub fn read_int96(&mut self) -> Result<[u32; 3]> {
        match self {
            Self::Plain(reader) => reader.read_native(),
            _ => Err(unsupported(self, "int96")),
        }
    }

    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        match self {
            Self::Plain(reader) => reader.read_bool(),
            _ => Err(unsupported(self, "booleans")),
        }
    }

    #[inline]
    pub fn read_fixed(&mut self, size: usize) -> Result<&[u8]> {
        match self {
            Self::Plain(reader) => reader.read_fixed(size),
            _ => Err(unsupported(self, "fixed-length binaries")),
        }
    }

    /// Reads the next variable-length value. The result is valid until the next read.
    #[inline]
    pub fn read_binary(&mut self) -> Result<&[u8]> {
        match self {
            Self::Plain(reader) => reader.read_binary(),
            Self::DeltaLengthByteArray(decoder) => decoder.next().ok_or_else(exhausted)?,
            Self::DeltaByteArray(decoder) => {
                if decoder.is_empty() {
                    return Err(exhausted());
                }
                decoder.next_value()
            }
            Self::DeltaBinaryPacked(_) => Err(unsupported(self, "binaries")),
        }
    }

    /// The state that a reader of the next page can continue from, if any.
    pub fn state(&self) -> Option<DecoderState> {
        match self {
            Self::DeltaByteArray(decoder) => Some(DecoderState::DeltaByteArray {
                previous: decoder.previous().to_vec(),
            }),
            _ => None,
        }
    }

    pub fn into_state(self) -> Option<DecoderState> {
        match self {
            Self::DeltaByteArray(decoder) => Some(DecoderState::DeltaByteArray {
                previous: decoder.into_previous(),
            }),
            _ => None,
        }
    }

    /// Continues from the state of the reader of the previous page. Returns whether this
    /// reader supports continuing from `state`.
    pub fn set_state(&mut self, state: DecoderState) -> bool {
        match (self, state) {
            (Self::DeltaByteArray(decoder), DecoderState::DeltaByteArray { previous }) => {
                decoder.set_previous(previous);
                true
            }
            _ => false,
        }
    }
}
