use std::sync::Arc;

use tracing::{debug, info};

use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::metadata::ColumnDescriptor;
use crate::page::{DataPage, DataPageHeader, Dictionary};
use crate::vector::{FieldVector, IntVector, NullabilityHolder};

use super::batch::{DictionaryVisitor, IdsVisitor, Output, ValuesVisitor};
use super::dictionary_ids::DictionaryIdsReader;
use super::levels::{split_levels_v1, DefinitionLevelReader};
use super::typed::VectorKind;
use super::values::{DecoderState, ValuesReader};
use super::writer_version::requires_sequential_reads;
use super::ReadOptions;

/// How the values of a dictionary-encoded page are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictionaryDecodeMode {
    /// The page is not dictionary-encoded.
    None,
    /// Ids are resolved through the dictionary into the output vector.
    Eager,
    /// Ids are returned as they are, see [`PageIterator::next_batch_dictionary_ids`].
    Lazy,
}

/// Decodes the pages of one column chunk into vectors, batch by batch.
///
/// For every page, [`PageIterator::set_page`] (or the `init_*` functions it is made of)
/// prepares the decoders, and [`PageIterator::next_batch`] (or
/// [`PageIterator::next_batch_dictionary_ids`] when
/// [`PageIterator::produces_dictionary_encoded_vector`]) is called until it returns 0.
#[derive(Debug)]
pub struct PageIterator<'a> {
    descriptor: ColumnDescriptor,
    kind: VectorKind,
    options: ReadOptions,
    dictionary: Option<Arc<Dictionary>>,

    definition_levels: Option<DefinitionLevelReader<'a>>,
    values: Option<ValuesReader<'a>>,
    dictionary_ids: Option<DictionaryIdsReader<'a>>,
    decode_mode: DictionaryDecodeMode,

    triples_count: usize,
    triples_read: usize,

    // state of the values reader of the previous page
    previous_state: Option<DecoderState>,
}

impl<'a> PageIterator<'a> {
    /// Returns a new [`PageIterator`] for a column described by `descriptor`.
    /// # Errors
    /// Errors if the descriptor has a negative maximum level.
    pub fn try_new(descriptor: ColumnDescriptor, options: ReadOptions) -> Result<Self> {
        if descriptor.max_def_level() < 0 || descriptor.max_rep_level() < 0 {
            return Err(Error::InvalidParameter(format!(
                "The maximum levels of column {:?} cannot be negative",
                descriptor.path_in_schema()
            )));
        }
        let kind = VectorKind::from_descriptor(&descriptor);
        Ok(Self {
            descriptor,
            kind,
            options,
            dictionary: None,
            definition_levels: None,
            values: None,
            dictionary_ids: None,
            decode_mode: DictionaryDecodeMode::None,
            triples_count: 0,
            triples_read: 0,
            previous_state: None,
        })
    }

    pub fn descriptor(&self) -> &ColumnDescriptor {
        &self.descriptor
    }

    pub fn vector_kind(&self) -> VectorKind {
        self.kind
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Sets the dictionary of the column chunk, used by all its dictionary-encoded pages.
    pub fn set_dictionary(&mut self, dictionary: Option<Arc<Dictionary>>) {
        self.dictionary = dictionary;
    }

    pub fn set_all_pages_dict_encoded(&mut self, all_pages_dict_encoded: bool) {
        self.options.all_pages_dict_encoded = all_pages_dict_encoded;
    }

    /// Discards the decoders of the current page. The state of its values reader is kept
    /// for the reader of the next page, unless another state was set.
    pub fn reset(&mut self) {
        // a state set with `set_decoder_state` takes precedence
        let state = self.values.take().and_then(|values| values.into_state());
        self.previous_state = self.previous_state.take().or(state);
        self.definition_levels = None;
        self.dictionary_ids = None;
        self.decode_mode = DictionaryDecodeMode::None;
        self.triples_count = 0;
        self.triples_read = 0;
    }

    /// Resets this iterator and initializes its decoders from `page`.
    /// # Errors
    /// Errors if the page is malformed, its encoding is not supported or it requires a
    /// dictionary that was not set.
    pub fn set_page(&mut self, page: &'a DataPage) -> Result<()> {
        self.reset();
        let encoding = page.encoding()?;
        let num_values = page.num_values();
        match page.header() {
            DataPageHeader::V1(_) => {
                let (_, buffer) =
                    split_levels_v1(page.buffer(), self.descriptor.max_rep_level())?;
                let values = self.init_definition_levels_v1(buffer, num_values)?;
                self.init_data_reader(encoding, values, num_values)
            }
            DataPageHeader::V2(_) => {
                let (_, def_levels, values) = page
                    .split_buffer_v2()
                    .ok_or_else(|| Error::oos("A v2 page header without v2 levels"))?;
                self.init_definition_levels_v2(def_levels, num_values)?;
                self.init_data_reader(encoding, values, num_values)
            }
        }
    }

    /// Initializes the definition levels of a v1 page from `data`, which starts with the
    /// length of the levels unless the column is required. Returns the bytes after the levels.
    pub fn init_definition_levels_v1(
        &mut self,
        data: &'a [u8],
        triples_count: usize,
    ) -> Result<&'a [u8]> {
        let max_level = self.descriptor.max_def_level();
        let (levels, values) = split_levels_v1(data, max_level)?;
        self.definition_levels = Some(DefinitionLevelReader::try_new(
            levels,
            max_level,
            triples_count,
        )?);
        self.triples_count = triples_count;
        self.triples_read = 0;
        Ok(values)
    }

    /// Initializes the definition levels of a v2 page, whose levels are already separated
    /// from the values.
    pub fn init_definition_levels_v2(
        &mut self,
        levels: &'a [u8],
        triples_count: usize,
    ) -> Result<()> {
        self.definition_levels = Some(DefinitionLevelReader::try_new(
            levels,
            self.descriptor.max_def_level(),
            triples_count,
        )?);
        self.triples_count = triples_count;
        self.triples_read = 0;
        Ok(())
    }

    /// Initializes the values or dictionary ids of the page and selects its
    /// [`DictionaryDecodeMode`].
    /// # Errors
    /// * [`Error::UnsupportedEncoding`] if `encoding` cannot be decoded for this column
    /// * [`Error::MissingDictionary`] if `encoding` uses a dictionary but none was set
    pub fn init_data_reader(
        &mut self,
        encoding: Encoding,
        data: &'a [u8],
        value_count: usize,
    ) -> Result<()> {
        let previous_state = self.previous_state.take();
        self.values = None;
        self.dictionary_ids = None;

        if encoding.uses_dictionary() {
            if self.dictionary.is_none() {
                return Err(Error::MissingDictionary(format!(
                    "Could not read page in column {:?} as the dictionary was missing for encoding {:?}",
                    self.descriptor.path_in_schema(),
                    encoding
                )));
            }
            self.dictionary_ids = Some(DictionaryIdsReader::try_new(data, value_count)?);
            self.decode_mode =
                if self.descriptor.is_int_type() || !self.options.all_pages_dict_encoded {
                    DictionaryDecodeMode::Eager
                } else {
                    DictionaryDecodeMode::Lazy
                };
        } else {
            if !self.supports(encoding) {
                return Err(Error::UnsupportedEncoding(format!(
                    "Cannot read column {:?} of kind {:?} encoded as {:?} in batches",
                    self.descriptor.path_in_schema(),
                    self.kind,
                    encoding
                )));
            }
            let mut values = ValuesReader::try_new(encoding, data)?;
            if let Some(state) = previous_state {
                if requires_sequential_reads(self.options.created_by.as_deref(), encoding)
                    && values.set_state(state)
                {
                    info!(
                        column = ?self.descriptor.path_in_schema(),
                        "Continuing the values of the previous page"
                    );
                }
            }
            self.values = Some(values);
            self.decode_mode = DictionaryDecodeMode::None;
        }

        debug!(
            column = ?self.descriptor.path_in_schema(),
            ?encoding,
            value_count,
            mode = ?self.decode_mode,
            "Initialized page"
        );
        Ok(())
    }

    fn supports(&self, encoding: Encoding) -> bool {
        match encoding {
            Encoding::Plain => true,
            Encoding::DeltaBinaryPacked => matches!(
                self.kind,
                VectorKind::Int32 | VectorKind::Int64 | VectorKind::TimestampMillis
            ),
            Encoding::DeltaLengthByteArray | Encoding::DeltaByteArray => {
                self.kind == VectorKind::VarBinary
            }
            _ => false,
        }
    }

    /// Whether the current page returns dictionary ids instead of values.
    pub fn produces_dictionary_encoded_vector(&self) -> bool {
        self.decode_mode == DictionaryDecodeMode::Lazy
    }

    pub fn dictionary_decode_mode(&self) -> DictionaryDecodeMode {
        self.decode_mode
    }

    /// Whether the current page has slots not yet read.
    pub fn has_next(&self) -> bool {
        self.triples_read < self.triples_count
    }

    /// The number of slots of the next batch: `requested` clamped to the slots not yet read.
    /// Zero means the page is exhausted.
    pub fn get_actual_batch_size(&self, requested: usize) -> usize {
        requested.min(self.triples_count.saturating_sub(self.triples_read))
    }

    /// The state of the values reader of the current page, if it has any.
    pub fn decoder_state(&self) -> Option<DecoderState> {
        self.values.as_ref().and_then(|values| values.state())
    }

    /// Sets the state that the values reader of the next page continues from, when its
    /// writer requires sequential reads.
    pub fn set_decoder_state(&mut self, state: Option<DecoderState>) {
        self.previous_state = state;
    }

    fn check_batch(
        &self,
        capacity: usize,
        holder: &NullabilityHolder,
        start: usize,
        size: usize,
    ) -> Result<()> {
        let end = start.checked_add(size).ok_or_else(|| {
            Error::InvalidParameter("The batch overflows the vector".to_string())
        })?;
        if end > capacity {
            return Err(Error::InvalidParameter(format!(
                "A batch of {} slots at {} does not fit a vector of {} slots",
                size, start, capacity
            )));
        }
        if end > holder.size() {
            return Err(Error::InvalidParameter(format!(
                "A batch of {} slots at {} does not fit a nullability holder of {} slots",
                size,
                start,
                holder.size()
            )));
        }
        Ok(())
    }

    /// Reads up to `requested` slots of the current page into `vector` and `holder`,
    /// starting at slot `start`. Returns the number of slots read, 0 once the page is exhausted.
    /// # Errors
    /// * [`Error::InvalidParameter`] if `vector` does not match the column, the batch does
    ///   not fit or a variable-width vector already has slots after `start`; nothing is
    ///   written in that case
    /// * [`Error::UnsupportedOperation`] if the page is dictionary-encoded and its ids can only
    ///   be read with [`PageIterator::next_batch_dictionary_ids`], or the column cannot be
    ///   dictionary-encoded
    /// * [`Error::OutOfSpec`] if the page is malformed; slots before the error may have
    ///   been written
    pub fn next_batch(
        &mut self,
        vector: &mut FieldVector,
        requested: usize,
        start: usize,
        type_width: usize,
        holder: &mut NullabilityHolder,
    ) -> Result<usize> {
        let size = self.get_actual_batch_size(requested);
        if size == 0 {
            return Ok(0);
        }
        if !self.kind.accepts(vector) {
            return Err(Error::InvalidParameter(format!(
                "A {} vector cannot hold values of kind {:?}",
                vector.name(),
                self.kind
            )));
        }
        if let Some(width) = self.kind.type_width() {
            if width != type_width {
                return Err(Error::InvalidParameter(format!(
                    "Values of kind {:?} are {} bytes wide, not {}",
                    self.kind, width, type_width
                )));
            }
        }
        self.check_batch(vector.capacity(), holder, start, size)?;
        vector.check_start(start)?;

        let levels = self
            .definition_levels
            .as_mut()
            .ok_or_else(|| Error::UnsupportedOperation("No page was set".to_string()))?;
        let output = Output {
            vector,
            holder,
            start,
            set_validity_vector: self.options.set_validity_vector,
        };
        match self.decode_mode {
            DictionaryDecodeMode::None => {
                let values = self.values.as_mut().ok_or_else(|| {
                    Error::UnsupportedOperation("No values reader was initialized".to_string())
                })?;
                let mut visitor = ValuesVisitor {
                    values,
                    read: self.kind.functions().read_plain,
                    output,
                };
                levels.read_batch(size, &mut visitor)?;
            }
            DictionaryDecodeMode::Eager => {
                let read = self.kind.functions().read_dictionary.ok_or_else(|| {
                    Error::UnsupportedOperation(format!(
                        "Values of kind {:?} cannot be dictionary-encoded",
                        self.kind
                    ))
                })?;
                let dictionary = self.dictionary.as_deref().ok_or_else(|| {
                    Error::MissingDictionary(format!(
                        "Column {:?} has no dictionary",
                        self.descriptor.path_in_schema()
                    ))
                })?;
                let ids = self.dictionary_ids.as_mut().ok_or_else(|| {
                    Error::UnsupportedOperation("No dictionary ids were initialized".to_string())
                })?;
                let mut visitor = DictionaryVisitor {
                    dictionary,
                    ids,
                    read,
                    output,
                };
                levels.read_batch(size, &mut visitor)?;
            }
            DictionaryDecodeMode::Lazy => {
                return Err(Error::UnsupportedOperation(format!(
                    "The page of column {:?} produces dictionary ids; read them with next_batch_dictionary_ids",
                    self.descriptor.path_in_schema()
                )))
            }
        }

        self.triples_read += size;
        Ok(size)
    }

    /// Reads up to `requested` dictionary ids of the current page into `vector` and `holder`,
    /// starting at slot `start`. Returns the number of slots read, 0 once the page is exhausted.
    /// # Errors
    /// * [`Error::UnsupportedOperation`] unless the [`DictionaryDecodeMode`] is `Lazy`
    /// * [`Error::InvalidParameter`] if the batch does not fit; nothing is written in that case
    /// * [`Error::OutOfSpec`] if the page is malformed or an id is not in the dictionary
    pub fn next_batch_dictionary_ids(
        &mut self,
        vector: &mut IntVector,
        requested: usize,
        start: usize,
        holder: &mut NullabilityHolder,
    ) -> Result<usize> {
        if self.decode_mode != DictionaryDecodeMode::Lazy {
            return Err(Error::UnsupportedOperation(format!(
                "Dictionary ids can only be read from lazily decoded pages (mode is {:?})",
                self.decode_mode
            )));
        }
        let size = self.get_actual_batch_size(requested);
        if size == 0 {
            return Ok(0);
        }
        self.check_batch(vector.capacity(), holder, start, size)?;

        let dictionary_len = self
            .dictionary
            .as_ref()
            .map(|dictionary| dictionary.len())
            .ok_or_else(|| {
                Error::MissingDictionary(format!(
                    "Column {:?} has no dictionary",
                    self.descriptor.path_in_schema()
                ))
            })?;
        let levels = self
            .definition_levels
            .as_mut()
            .ok_or_else(|| Error::UnsupportedOperation("No page was set".to_string()))?;
        let ids = self.dictionary_ids.as_mut().ok_or_else(|| {
            Error::UnsupportedOperation("No dictionary ids were initialized".to_string())
        })?;
        let mut visitor = IdsVisitor {
            ids,
            dictionary_len,
            output: Output {
                vector,
                holder,
                start,
                set_validity_vector: self.options.set_validity_vector,
            },
        };
        levels.read_batch(size, &mut visitor)?;

        self.triples_read += size;
        Ok(size)
    }
}
