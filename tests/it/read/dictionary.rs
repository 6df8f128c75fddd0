use std::sync::Arc;

use parquet_vectorized::encoding::Encoding;
use parquet_vectorized::error::Error;
use parquet_vectorized::page::{DictPage, Dictionary};
use parquet_vectorized::read::{DictionaryDecodeMode, PageIterator, ReadOptions};
use parquet_vectorized::schema::types::PhysicalType;
use parquet_vectorized::vector::{
    BigIntVector, BitVector, FieldVector, FixedSizeBinaryVector, IntVector, NullabilityHolder,
    VarBinaryVector,
};

use super::utils::*;

fn dictionary(physical_type: PhysicalType, buffer: Vec<u8>, num_values: usize) -> Arc<Dictionary> {
    let page = DictPage::new(buffer, num_values, false);
    Arc::new(Dictionary::try_from_page(&page, &physical_type).unwrap())
}

fn strings() -> Arc<Dictionary> {
    dictionary(
        PhysicalType::ByteArray,
        plain_binary(&["x", "y", "z"]),
        3,
    )
}

#[test]
fn eager_int32() {
    let descriptor = descriptor(PhysicalType::Int32, None, 0);
    let page = page_v1(
        &descriptor,
        Encoding::RleDictionary,
        3,
        None,
        dictionary_ids(&[2, 0, 1], 2),
    );

    let options = ReadOptions {
        all_pages_dict_encoded: true,
        ..Default::default()
    };
    let mut iter = PageIterator::try_new(descriptor, options).unwrap();
    iter.set_dictionary(Some(dictionary(
        PhysicalType::Int32,
        plain_i32(&[10, 20, 30]),
        3,
    )));
    iter.set_page(&page).unwrap();
    // integers are always resolved
    assert_eq!(iter.dictionary_decode_mode(), DictionaryDecodeMode::Eager);
    assert!(!iter.produces_dictionary_encoded_vector());

    let mut vector = FieldVector::Int(IntVector::with_capacity(3));
    let mut holder = NullabilityHolder::new(3);
    assert_eq!(iter.next_batch(&mut vector, 3, 0, 4, &mut holder), Ok(3));
    match &vector {
        FieldVector::Int(v) => assert_eq!(v.values(), &[30, 10, 20]),
        _ => unreachable!(),
    }
    assert!(!holder.has_nulls());
}

#[test]
fn eager_binary() {
    let descriptor = descriptor(PhysicalType::ByteArray, None, 1);
    let page = page_v1(
        &descriptor,
        Encoding::PlainDictionary,
        4,
        Some(def_levels(&[true, true, false, true])),
        dictionary_ids(&[2, 0, 1], 2),
    );

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_dictionary(Some(strings()));
    iter.set_page(&page).unwrap();
    assert_eq!(iter.dictionary_decode_mode(), DictionaryDecodeMode::Eager);

    let mut vector = FieldVector::VarBinary(VarBinaryVector::with_capacity(4));
    let mut holder = NullabilityHolder::new(4);
    assert_eq!(iter.next_batch(&mut vector, 4, 0, 0, &mut holder), Ok(4));
    match &vector {
        FieldVector::VarBinary(v) => {
            assert_eq!(v.value(0), Some(&b"z"[..]));
            assert_eq!(v.value(1), Some(&b"x"[..]));
            assert_eq!(v.value(2), None);
            assert_eq!(v.value(3), Some(&b"y"[..]));
        }
        _ => unreachable!(),
    }
    assert_eq!(holder.num_nulls(), 1);
}

#[test]
fn lazy_binary() {
    let descriptor = descriptor(PhysicalType::ByteArray, None, 1);
    let page = page_v1(
        &descriptor,
        Encoding::RleDictionary,
        4,
        Some(def_levels(&[true, false, true, true])),
        dictionary_ids(&[1, 1, 2], 2),
    );

    let options = ReadOptions {
        all_pages_dict_encoded: true,
        ..Default::default()
    };
    let mut iter = PageIterator::try_new(descriptor, options).unwrap();
    iter.set_dictionary(Some(strings()));
    iter.set_page(&page).unwrap();
    assert_eq!(iter.dictionary_decode_mode(), DictionaryDecodeMode::Lazy);
    assert!(iter.produces_dictionary_encoded_vector());

    let mut values = FieldVector::VarBinary(VarBinaryVector::with_capacity(4));
    let mut holder = NullabilityHolder::new(4);
    assert!(matches!(
        iter.next_batch(&mut values, 4, 0, 0, &mut holder),
        Err(Error::UnsupportedOperation(_))
    ));

    let mut ids = IntVector::with_capacity(4);
    assert_eq!(iter.next_batch_dictionary_ids(&mut ids, 2, 0, &mut holder), Ok(2));
    assert_eq!(iter.next_batch_dictionary_ids(&mut ids, 2, 2, &mut holder), Ok(2));
    assert_eq!(iter.next_batch_dictionary_ids(&mut ids, 2, 4, &mut holder), Ok(0));

    assert_eq!(
        (0..4).map(|i| ids.value(i)).collect::<Vec<_>>(),
        vec![Some(1), None, Some(1), Some(2)]
    );
    assert_eq!(holder.num_nulls(), 1);
}

#[test]
fn ids_out_of_range() {
    let descriptor = descriptor(PhysicalType::ByteArray, None, 0);
    let page = page_v1(
        &descriptor,
        Encoding::RleDictionary,
        2,
        None,
        dictionary_ids(&[0, 3], 2),
    );

    let options = ReadOptions {
        all_pages_dict_encoded: true,
        ..Default::default()
    };
    let mut iter = PageIterator::try_new(descriptor.clone(), options).unwrap();
    iter.set_dictionary(Some(strings()));
    iter.set_page(&page).unwrap();
    let mut ids = IntVector::with_capacity(2);
    let mut holder = NullabilityHolder::new(2);
    assert!(matches!(
        iter.next_batch_dictionary_ids(&mut ids, 2, 0, &mut holder),
        Err(Error::OutOfSpec(_))
    ));

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_dictionary(Some(strings()));
    iter.set_page(&page).unwrap();
    let mut vector = FieldVector::VarBinary(VarBinaryVector::with_capacity(2));
    assert!(matches!(
        iter.next_batch(&mut vector, 2, 0, 0, &mut holder),
        Err(Error::OutOfSpec(_))
    ));
}

#[test]
fn ids_of_eager_page() {
    let descriptor = descriptor(PhysicalType::ByteArray, None, 0);
    let page = page_v1(&descriptor, Encoding::Plain, 1, None, plain_binary(&["a"]));

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_page(&page).unwrap();
    let mut ids = IntVector::with_capacity(1);
    let mut holder = NullabilityHolder::new(1);
    assert!(matches!(
        iter.next_batch_dictionary_ids(&mut ids, 1, 0, &mut holder),
        Err(Error::UnsupportedOperation(_))
    ));
}

#[test]
fn fixed_binary() {
    let descriptor = descriptor(PhysicalType::FixedLenByteArray(2), None, 0);
    let page = page_v1(
        &descriptor,
        Encoding::RleDictionary,
        3,
        None,
        dictionary_ids(&[1, 1, 0], 1),
    );

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_dictionary(Some(dictionary(
        PhysicalType::FixedLenByteArray(2),
        vec![1, 2, 3, 4],
        2,
    )));
    iter.set_page(&page).unwrap();

    let mut vector = FieldVector::FixedSizeBinary(FixedSizeBinaryVector::with_capacity(3, 2));
    let mut holder = NullabilityHolder::new(3);
    assert_eq!(iter.next_batch(&mut vector, 3, 0, 2, &mut holder), Ok(3));
    match &vector {
        FieldVector::FixedSizeBinary(v) => {
            assert_eq!(v.value(0), Some(&[3u8, 4][..]));
            assert_eq!(v.value(1), Some(&[3u8, 4][..]));
            assert_eq!(v.value(2), Some(&[1u8, 2][..]));
        }
        _ => unreachable!(),
    }
}

#[test]
fn boolean_cannot_be_dictionary_encoded() {
    let descriptor = descriptor(PhysicalType::Boolean, None, 0);
    let page = page_v1(
        &descriptor,
        Encoding::RleDictionary,
        2,
        None,
        dictionary_ids(&[0, 1], 1),
    );

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_dictionary(Some(dictionary(PhysicalType::Int32, plain_i32(&[0, 1]), 2)));
    iter.set_page(&page).unwrap();

    let mut vector = FieldVector::Bit(BitVector::with_capacity(2));
    let mut holder = NullabilityHolder::new(2);
    assert!(matches!(
        iter.next_batch(&mut vector, 2, 0, 1, &mut holder),
        Err(Error::UnsupportedOperation(_))
    ));
}

#[test]
fn mismatched_dictionary() {
    let descriptor = descriptor(PhysicalType::Int64, None, 0);
    let page = page_v1(
        &descriptor,
        Encoding::RleDictionary,
        1,
        None,
        dictionary_ids(&[0], 1),
    );

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_dictionary(Some(dictionary(PhysicalType::Int32, plain_i32(&[0]), 1)));
    iter.set_page(&page).unwrap();

    let mut vector = FieldVector::BigInt(BigIntVector::with_capacity(1));
    let mut holder = NullabilityHolder::new(1);
    assert!(matches!(
        iter.next_batch(&mut vector, 1, 0, 8, &mut holder),
        Err(Error::OutOfSpec(_))
    ));
}

#[test]
fn missing_dictionary() {
    let descriptor = descriptor(PhysicalType::Int32, None, 0);
    let page = page_v1(
        &descriptor,
        Encoding::RleDictionary,
        1,
        None,
        dictionary_ids(&[0], 1),
    );

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    assert!(matches!(
        iter.set_page(&page),
        Err(Error::MissingDictionary(_))
    ));
}

#[test]
fn dictionary_then_plain() {
    let descriptor = descriptor(PhysicalType::ByteArray, None, 0);
    let dict_page = page_v1(
        &descriptor,
        Encoding::RleDictionary,
        2,
        None,
        dictionary_ids(&[2, 2], 2),
    );
    let plain_page = page_v1(&descriptor, Encoding::Plain, 1, None, plain_binary(&["w"]));

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_dictionary(Some(strings()));

    let mut vector = FieldVector::VarBinary(VarBinaryVector::with_capacity(3));
    let mut holder = NullabilityHolder::new(3);

    iter.set_page(&dict_page).unwrap();
    assert_eq!(iter.dictionary_decode_mode(), DictionaryDecodeMode::Eager);
    assert_eq!(iter.next_batch(&mut vector, 10, 0, 0, &mut holder), Ok(2));

    iter.set_page(&plain_page).unwrap();
    assert_eq!(iter.dictionary_decode_mode(), DictionaryDecodeMode::None);
    assert_eq!(iter.next_batch(&mut vector, 10, 2, 0, &mut holder), Ok(1));

    match &vector {
        FieldVector::VarBinary(v) => {
            assert_eq!(v.values(), b"zzw");
        }
        _ => unreachable!(),
    }
}

#[test]
fn eager_required_binary() {
    let descriptor = descriptor(PhysicalType::ByteArray, None, 0);
    let page = page_v2(
        &descriptor,
        Encoding::RleDictionary,
        3,
        0,
        vec![],
        dictionary_ids(&[2, 0, 1], 2),
    );

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_dictionary(Some(strings()));
    iter.set_page(&page).unwrap();
    assert_eq!(iter.dictionary_decode_mode(), DictionaryDecodeMode::Eager);

    let mut vector = FieldVector::VarBinary(VarBinaryVector::with_capacity(3));
    let mut holder = NullabilityHolder::new(3);
    assert_eq!(iter.next_batch(&mut vector, 3, 0, 0, &mut holder), Ok(3));
    match &vector {
        FieldVector::VarBinary(v) => assert_eq!(v.values(), b"zxy"),
        _ => unreachable!(),
    }
    assert_eq!(holder.num_nulls(), 0);
    assert_eq!(iter.get_actual_batch_size(10), 0);
}
