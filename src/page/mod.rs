mod page_dict;
pub use page_dict::*;

use std::convert::TryInto;

pub use parquet_format_safe::{DataPageHeader as DataPageHeaderV1, DataPageHeaderV2};

use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::metadata::ColumnDescriptor;

#[derive(Debug, Clone)]
pub enum DataPageHeader {
    V1(DataPageHeaderV1),
    V2(DataPageHeaderV2),
}

impl DataPageHeader {
    /// The number of slots (values and nulls) of the page.
    pub fn num_values(&self) -> usize {
        match self {
            DataPageHeader::V1(d) => d.num_values as usize,
            DataPageHeader::V2(d) => d.num_values as usize,
        }
    }

    /// The encoding of the values of the page.
    pub fn encoding(&self) -> Result<Encoding> {
        match self {
            DataPageHeader::V1(d) => d.encoding.try_into(),
            DataPageHeader::V2(d) => d.encoding.try_into(),
        }
    }
}

/// A [`DataPage`] is an uncompressed, encoded representation of a Parquet data page. It holds actual data
/// and thus cloning it is expensive.
#[derive(Debug, Clone)]
pub struct DataPage {
    header: DataPageHeader,
    pub(super) buffer: Vec<u8>,
    descriptor: ColumnDescriptor,
}

impl DataPage {
    /// Returns a new [`DataPage`].
    /// # Errors
    /// Errors if the header declares a negative number of values, or, for v2 pages,
    /// level lengths that do not fit in `buffer`.
    pub fn try_new(
        header: DataPageHeader,
        buffer: Vec<u8>,
        descriptor: ColumnDescriptor,
    ) -> Result<Self> {
        match &header {
            DataPageHeader::V1(d) => check_num_values(d.num_values)?,
            DataPageHeader::V2(d) => {
                check_num_values(d.num_values)?;
                let rep = level_length(d.repetition_levels_byte_length)?;
                let def = level_length(d.definition_levels_byte_length)?;
                if rep + def > buffer.len() {
                    return Err(Error::oos(format!(
                        "The levels of a v2 page declare {} bytes but the page has {}",
                        rep + def,
                        buffer.len()
                    )));
                }
            }
        };
        Ok(Self {
            header,
            buffer,
            descriptor,
        })
    }

    pub fn header(&self) -> &DataPageHeader {
        &self.header
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn num_values(&self) -> usize {
        self.header.num_values()
    }

    pub fn encoding(&self) -> Result<Encoding> {
        self.header.encoding()
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    /// Splits the buffer of a v2 page into its repetition levels, definition levels
    /// and values. Returns `None` for v1 pages, whose levels are length-prefixed.
    pub fn split_buffer_v2(&self) -> Option<(&[u8], &[u8], &[u8])> {
        match &self.header {
            DataPageHeader::V1(_) => None,
            DataPageHeader::V2(d) => {
                // validated on construction
                let rep = d.repetition_levels_byte_length as usize;
                let def = d.definition_levels_byte_length as usize;
                let (rep_levels, buffer) = self.buffer.split_at(rep);
                let (def_levels, values) = buffer.split_at(def);
                Some((rep_levels, def_levels, values))
            }
        }
    }
}

fn check_num_values(num_values: i32) -> Result<()> {
    if num_values < 0 {
        Err(Error::oos(format!(
            "A data page cannot have a negative number of values ({})",
            num_values
        )))
    } else {
        Ok(())
    }
}

fn level_length(length: i32) -> Result<usize> {
    length
        .try_into()
        .map_err(|_| Error::oos("The levels of a v2 page cannot have a negative length"))
}
