//! Batched decoding of the data pages of a flat column into vectors.
mod batch;
mod dictionary_ids;
pub mod levels;
mod page_iterator;
mod typed;
mod values;
pub mod writer_version;

#[cfg(feature = "serde_types")]
use serde::{Deserialize, Serialize};

pub use levels::{get_bit_width, split_levels_v1};
pub use page_iterator::{DictionaryDecodeMode, PageIterator};
pub use typed::VectorKind;
pub use values::DecoderState;
pub use writer_version::requires_sequential_reads;

/// Options of a [`PageIterator`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde_types", derive(Deserialize, Serialize))]
pub struct ReadOptions {
    /// Whether every data page of the column chunk is dictionary-encoded. Dictionary-encoded
    /// pages of non-integer columns are then decoded lazily, into dictionary ids.
    pub all_pages_dict_encoded: bool,
    /// The `created_by` of the file, used to detect writers with known defects.
    pub created_by: Option<String>,
    /// Whether the validity bitmap of the output vector is written, in addition to the
    /// [`crate::vector::NullabilityHolder`].
    pub set_validity_vector: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            all_pages_dict_encoded: false,
            created_by: None,
            set_validity_vector: true,
        }
    }
}
