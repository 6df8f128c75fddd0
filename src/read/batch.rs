use crate::error::{Error, Result};
use crate::page::Dictionary;
use crate::types::NativeType;
use crate::vector::{FieldVector, IntVector, NullabilityHolder, PrimitiveVector};

use super::dictionary_ids::DictionaryIdsReader;
use super::levels::SlotVisitor;
use super::typed::{ReadDictionary, ReadPlain};
use super::values::ValuesReader;

/// A vector with a validity bitmap.
trait Validity {
    fn set_valid(&mut self, index: usize);

    fn set_null(&mut self, index: usize);
}

impl Validity for FieldVector {
    #[inline]
    fn set_valid(&mut self, index: usize) {
        FieldVector::set_valid(self, index)
    }

    #[inline]
    fn set_null(&mut self, index: usize) {
        FieldVector::set_null(self, index)
    }
}

impl<T: NativeType> Validity for PrimitiveVector<T> {
    #[inline]
    fn set_valid(&mut self, index: usize) {
        PrimitiveVector::set_valid(self, index)
    }

    #[inline]
    fn set_null(&mut self, index: usize) {
        PrimitiveVector::set_null(self, index)
    }
}

/// Where a batch is written to.
pub(crate) struct Output<'r, V> {
    pub vector: &'r mut V,
    pub holder: &'r mut NullabilityHolder,
    pub start: usize,
    pub set_validity_vector: bool,
}

impl<'r, V: Validity> Output<'r, V> {
    fn mark_present(&mut self, start: usize, length: usize) {
        self.holder.set_not_nulls(start, length);
        if self.set_validity_vector {
            (start..start + length).for_each(|index| self.vector.set_valid(index));
        }
    }

    fn mark_null(&mut self, start: usize, length: usize) {
        self.holder.set_nulls(start, length);
        if self.set_validity_vector {
            (start..start + length).for_each(|index| self.vector.set_null(index));
        }
    }
}

/// Writes plain (or delta) values into the present slots.
pub(crate) struct ValuesVisitor<'r, 'a> {
    pub values: &'r mut ValuesReader<'a>,
    pub read: ReadPlain,
    pub output: Output<'r, FieldVector>,
}

impl<'r, 'a> SlotVisitor for ValuesVisitor<'r, 'a> {
    fn present(&mut self, offset: usize, length: usize) -> Result<()> {
        let start = self.output.start + offset;
        (self.read)(self.values, self.output.vector, start, length)?;
        self.output.mark_present(start, length);
        Ok(())
    }

    fn null(&mut self, offset: usize, length: usize) -> Result<()> {
        self.output.mark_null(self.output.start + offset, length);
        Ok(())
    }
}

/// Writes the dictionary values of the ids of the present slots.
pub(crate) struct DictionaryVisitor<'r, 'a> {
    pub dictionary: &'r Dictionary,
    pub ids: &'r mut DictionaryIdsReader<'a>,
    pub read: ReadDictionary,
    pub output: Output<'r, FieldVector>,
}

impl<'r, 'a> SlotVisitor for DictionaryVisitor<'r, 'a> {
    fn present(&mut self, offset: usize, length: usize) -> Result<()> {
        let start = self.output.start + offset;
        (self.read)(self.dictionary, self.ids, self.output.vector, start, length)?;
        self.output.mark_present(start, length);
        Ok(())
    }

    fn null(&mut self, offset: usize, length: usize) -> Result<()> {
        self.output.mark_null(self.output.start + offset, length);
        Ok(())
    }
}

/// Writes the ids of the present slots, unresolved.
pub(crate) struct IdsVisitor<'r, 'a> {
    pub ids: &'r mut DictionaryIdsReader<'a>,
    pub dictionary_len: usize,
    pub output: Output<'r, IntVector>,
}

impl<'r, 'a> SlotVisitor for IdsVisitor<'r, 'a> {
    fn present(&mut self, offset: usize, length: usize) -> Result<()> {
        let start = self.output.start + offset;
        let dictionary_len = self.dictionary_len;
        let vector = &mut *self.output.vector;
        self.ids.read(length, |offset, id| {
            if id as usize >= dictionary_len {
                return Err(Error::oos(format!(
                    "The data page has an index ({}) larger than the dictionary page values ({})",
                    id, dictionary_len
                )));
            }
            vector.set(start + offset, id as i32);
            Ok(())
        })?;
        self.output.mark_present(start, length);
        Ok(())
    }

    fn null(&mut self, offset: usize, length: usize) -> Result<()> {
        self.output.mark_null(self.output.start + offset, length);
        Ok(())
    }
}
