//! Vectorized decoding of Parquet data pages into columnar vectors with null tracking.
//!
//! A [`read::PageIterator`] is created per column chunk. Each [`page::DataPage`] is set on it
//! and then read in batches into a [`vector::FieldVector`] and a
//! [`vector::NullabilityHolder`].
pub mod encoding;
pub mod error;
pub mod metadata;
pub mod page;
mod parquet_bridge;
pub mod read;
pub mod schema;
pub mod types;
pub mod vector;

pub use parquet_format_safe as thrift_format;
