use std::sync::Arc;

use parquet_vectorized::encoding::Encoding;
use parquet_vectorized::error::Error;
use parquet_vectorized::metadata::ColumnDescriptor;
use parquet_vectorized::page::{DataPage, DictPage, Dictionary};
use parquet_vectorized::read::{PageIterator, ReadOptions};
use parquet_vectorized::schema::types::PhysicalType;
use parquet_vectorized::vector::{
    BigIntVector, FieldVector, IntVector, NullabilityHolder, VarBinaryVector,
};

use super::utils::*;

/// A ULEB128 varint of `u64::MAX`.
fn max_varint() -> Vec<u8> {
    let mut buffer = vec![0xff; 9];
    buffer.push(0x01);
    buffer
}

/// A delta header of `count` values with a block of 2^63 values in a single miniblock.
fn oversized_delta_block(count: u8) -> Vec<u8> {
    let mut buffer = vec![0x80; 9];
    buffer.extend([0x01, 1, count, 0]);
    // min delta, bit width and a few bytes of deltas
    buffer.extend([0, 8, 0, 0]);
    buffer
}

/// A delta header declaring 2^62 values but holding a single block.
fn oversized_delta_count() -> Vec<u8> {
    let mut buffer = vec![128, 1, 4];
    buffer.extend([0x80; 8]);
    buffer.extend([0x40, 0, 0, 0, 0, 0]);
    buffer
}

fn dictionary_ids_with(header: Vec<u8>, bit_width: u8) -> Vec<u8> {
    let mut buffer = vec![bit_width];
    buffer.extend(header);
    buffer
}

struct Case {
    name: &'static str,
    descriptor: ColumnDescriptor,
    page: DataPage,
    dictionary: Option<Dictionary>,
    vector: FieldVector,
    type_width: usize,
}

fn binary_dictionary() -> Option<Dictionary> {
    let page = DictPage::new(plain_binary(&["a", "b"]), 2, false);
    Some(Dictionary::try_from_page(&page, &PhysicalType::ByteArray).unwrap())
}

fn int32_dictionary() -> Option<Dictionary> {
    let page = DictPage::new(plain_i32(&[1, 2]), 2, false);
    Some(Dictionary::try_from_page(&page, &PhysicalType::Int32).unwrap())
}

fn cases() -> Vec<Case> {
    let int32 = descriptor(PhysicalType::Int32, None, 0);
    let int64 = descriptor(PhysicalType::Int64, None, 0);
    let binary = descriptor(PhysicalType::ByteArray, None, 0);
    let optional = descriptor(PhysicalType::Int32, None, 1);
    // max level of 255 is stored with 8 bits
    let wide_levels = descriptor(PhysicalType::Int32, None, 255);

    // a bitpacked run of u64::MAX / 2 groups of 8 ids
    let mut oversized_ids = max_varint();
    oversized_ids.push(0);

    vec![
        Case {
            name: "oversized bitpacked run of binary ids",
            page: page_v1(
                &binary,
                Encoding::RleDictionary,
                2,
                None,
                dictionary_ids_with(oversized_ids.clone(), 8),
            ),
            descriptor: binary.clone(),
            dictionary: binary_dictionary(),
            vector: FieldVector::VarBinary(VarBinaryVector::with_capacity(2)),
            type_width: 0,
        },
        Case {
            name: "oversized bitpacked run of int32 ids",
            page: page_v1(
                &int32,
                Encoding::PlainDictionary,
                2,
                None,
                dictionary_ids_with(oversized_ids, 8),
            ),
            descriptor: int32.clone(),
            dictionary: int32_dictionary(),
            vector: FieldVector::Int(IntVector::with_capacity(2)),
            type_width: 4,
        },
        Case {
            name: "ids wider than 32 bits",
            page: page_v1(
                &int32,
                Encoding::RleDictionary,
                2,
                None,
                dictionary_ids(&[0, 1], 40),
            ),
            descriptor: int32.clone(),
            dictionary: int32_dictionary(),
            vector: FieldVector::Int(IntVector::with_capacity(2)),
            type_width: 4,
        },
        Case {
            name: "oversized bitpacked run of definition levels",
            page: page_v1(
                &wide_levels,
                Encoding::Plain,
                2,
                Some(max_varint()),
                plain_i32(&[1, 2]),
            ),
            descriptor: wide_levels,
            dictionary: None,
            vector: FieldVector::Int(IntVector::with_capacity(2)),
            type_width: 4,
        },
        Case {
            name: "definition levels longer than the page",
            page: page_v1(&optional, Encoding::Plain, 2, None, {
                // a length prefix of 100 bytes of levels
                let mut values = 100u32.to_le_bytes().to_vec();
                values.extend(plain_i32(&[1, 2]));
                values
            }),
            descriptor: optional,
            dictionary: None,
            vector: FieldVector::Int(IntVector::with_capacity(2)),
            type_width: 4,
        },
        Case {
            name: "oversized delta miniblock",
            page: page_v1(
                &int64,
                Encoding::DeltaBinaryPacked,
                2,
                None,
                oversized_delta_block(2),
            ),
            descriptor: int64.clone(),
            dictionary: None,
            vector: FieldVector::BigInt(BigIntVector::with_capacity(2)),
            type_width: 8,
        },
        Case {
            name: "delta count larger than the page",
            page: page_v1(
                &int64,
                Encoding::DeltaBinaryPacked,
                2,
                None,
                oversized_delta_count(),
            ),
            descriptor: int64,
            dictionary: None,
            vector: FieldVector::BigInt(BigIntVector::with_capacity(2)),
            type_width: 8,
        },
        Case {
            name: "delta lengths larger than the page",
            page: page_v1(
                &binary,
                Encoding::DeltaLengthByteArray,
                2,
                None,
                oversized_delta_count(),
            ),
            descriptor: binary.clone(),
            dictionary: None,
            vector: FieldVector::VarBinary(VarBinaryVector::with_capacity(2)),
            type_width: 0,
        },
        Case {
            name: "oversized delta prefix miniblock",
            page: page_v1(
                &binary,
                Encoding::DeltaByteArray,
                2,
                None,
                oversized_delta_block(2),
            ),
            descriptor: binary.clone(),
            dictionary: None,
            vector: FieldVector::VarBinary(VarBinaryVector::with_capacity(2)),
            type_width: 0,
        },
        Case {
            name: "plain value longer than the page",
            page: page_v1(&binary, Encoding::Plain, 1, None, {
                let mut values = u32::MAX.to_le_bytes().to_vec();
                values.push(b'a');
                values
            }),
            descriptor: binary,
            dictionary: None,
            vector: FieldVector::VarBinary(VarBinaryVector::with_capacity(2)),
            type_width: 0,
        },
    ]
}

fn read_page(case: &mut Case) -> Result<usize, Error> {
    let mut iter = PageIterator::try_new(case.descriptor.clone(), ReadOptions::default())?;
    iter.set_dictionary(case.dictionary.take().map(Arc::new));
    iter.set_page(&case.page)?;

    let capacity = case.vector.capacity();
    let mut holder = NullabilityHolder::new(capacity);
    let mut read = 0;
    loop {
        let batch = iter.next_batch(
            &mut case.vector,
            capacity - read,
            read,
            case.type_width,
            &mut holder,
        )?;
        if batch == 0 {
            return Ok(read);
        }
        read += batch;
    }
}

#[test]
fn malformed_streams_are_out_of_spec() {
    for mut case in cases() {
        let result = read_page(&mut case);
        assert!(
            matches!(result, Err(Error::OutOfSpec(_))),
            "{}: {:?}",
            case.name,
            result
        );
    }
}
