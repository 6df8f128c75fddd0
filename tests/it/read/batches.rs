use std::sync::Arc;

use rand::{rngs::StdRng, Rng, SeedableRng};

use parquet_vectorized::encoding::Encoding;
use parquet_vectorized::page::{DictPage, Dictionary};
use parquet_vectorized::read::{PageIterator, ReadOptions};
use parquet_vectorized::schema::types::PhysicalType;
use parquet_vectorized::vector::{FieldVector, IntVector, NullabilityHolder};

use super::utils::*;

#[test]
fn random_batch_sizes() {
    let mut rng = StdRng::seed_from_u64(42);
    let descriptor = descriptor(PhysicalType::Int32, None, 1);

    let validity = (0..1000).map(|_| rng.gen_bool(0.8)).collect::<Vec<_>>();
    let values = (0..validity.iter().filter(|x| **x).count())
        .map(|_| rng.gen_range(-1000..1000))
        .collect::<Vec<i32>>();

    // split the slots over pages of every kind
    let mut pages = vec![];
    let mut slot = 0;
    let mut value = 0;
    for (i, length) in [300usize, 250, 450].into_iter().enumerate() {
        let page_validity = &validity[slot..slot + length];
        let num_valid = page_validity.iter().filter(|x| **x).count();
        let page_values = &values[value..value + num_valid];
        let page = match i {
            0 => page_v1(
                &descriptor,
                Encoding::Plain,
                length,
                Some(def_levels(page_validity)),
                plain_i32(page_values),
            ),
            1 => {
                let page_values = page_values.iter().map(|x| *x as i64).collect::<Vec<_>>();
                page_v2(
                    &descriptor,
                    Encoding::DeltaBinaryPacked,
                    length,
                    length - num_valid,
                    def_levels(page_validity),
                    delta_binary_packed(&page_values),
                )
            }
            _ => {
                // ids are the values themselves shifted to be positive
                let ids = page_values
                    .iter()
                    .map(|x| (x + 1000) as u32)
                    .collect::<Vec<_>>();
                page_v1(
                    &descriptor,
                    Encoding::RleDictionary,
                    length,
                    Some(def_levels(page_validity)),
                    dictionary_ids(&ids, 11),
                )
            }
        };
        pages.push(page);
        slot += length;
        value += num_valid;
    }

    let dictionary = (-1000..1000).collect::<Vec<i32>>();
    let dictionary = DictPage::new(plain_i32(&dictionary), 2000, true);
    let dictionary = Dictionary::try_from_page(&dictionary, &PhysicalType::Int32).unwrap();

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_dictionary(Some(Arc::new(dictionary)));

    let mut vector = FieldVector::Int(IntVector::with_capacity(1000));
    let mut holder = NullabilityHolder::new(1000);
    let mut start = 0;
    for page in &pages {
        iter.set_page(page).unwrap();
        loop {
            let requested = rng.gen_range(1..=64);
            let read = iter
                .next_batch(&mut vector, requested, start, 4, &mut holder)
                .unwrap();
            if read == 0 {
                break;
            }
            assert!(read <= requested);
            start += read;
        }
    }
    assert_eq!(start, 1000);

    let vector = match &vector {
        FieldVector::Int(v) => v,
        _ => unreachable!(),
    };
    let mut expected = values.iter();
    for (i, is_valid) in validity.iter().enumerate() {
        assert_eq!(holder.is_null_at(i), !is_valid);
        let expected = is_valid.then(|| *expected.next().unwrap());
        assert_eq!(vector.value(i), expected);
    }
    assert_eq!(
        holder.num_nulls(),
        validity.iter().filter(|x| !**x).count()
    );
}

#[test]
fn rle_levels() {
    let descriptor = descriptor(PhysicalType::Int32, None, 1);
    // 6 nulls then 4 values
    let mut levels = hybrid_rle(0, 6, 1);
    levels.extend(hybrid_rle(1, 4, 1));
    let page = page_v1(
        &descriptor,
        Encoding::Plain,
        10,
        Some(levels),
        plain_i32(&[1, 2, 3, 4]),
    );

    let mut iter = PageIterator::try_new(descriptor, ReadOptions::default()).unwrap();
    iter.set_page(&page).unwrap();

    let mut vector = FieldVector::Int(IntVector::with_capacity(10));
    let mut holder = NullabilityHolder::new(10);
    assert_eq!(iter.next_batch(&mut vector, 7, 0, 4, &mut holder), Ok(7));
    assert_eq!(iter.next_batch(&mut vector, 7, 7, 4, &mut holder), Ok(3));
    assert_eq!(iter.next_batch(&mut vector, 7, 10, 4, &mut holder), Ok(0));

    assert_eq!(holder.num_nulls(), 6);
    match &vector {
        FieldVector::Int(v) => assert_eq!(&v.values()[6..], &[1, 2, 3, 4]),
        _ => unreachable!(),
    }
}
