use parquet_vectorized::encoding::Encoding;
use parquet_vectorized::metadata::ColumnDescriptor;
use parquet_vectorized::page::{DataPage, DataPageHeader, DataPageHeaderV1, DataPageHeaderV2};
use parquet_vectorized::schema::types::{PhysicalType, PrimitiveConvertedType};

pub fn descriptor(
    physical_type: PhysicalType,
    converted_type: Option<PrimitiveConvertedType>,
    max_def_level: i16,
) -> ColumnDescriptor {
    ColumnDescriptor::new(
        vec!["c".to_string()],
        physical_type,
        converted_type,
        max_def_level,
        0,
    )
}

pub fn uleb128(mut value: u64, buffer: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buffer.push(byte);
            break;
        }
        buffer.push(byte | 0x80);
    }
}

pub fn zigzag(value: i64, buffer: &mut Vec<u8>) {
    uleb128(((value << 1) ^ (value >> 63)) as u64, buffer)
}

/// Packs `values` LSB first, padded to a multiple of 8 values.
pub fn bitpack(values: &[u64], num_bits: usize) -> Vec<u8> {
    let mut packed = vec![0u8; (values.len() + 7) / 8 * num_bits];
    for (i, value) in values.iter().enumerate() {
        for bit in 0..num_bits {
            if (value >> bit) & 1 == 1 {
                let position = i * num_bits + bit;
                packed[position / 8] |= 1 << (position % 8);
            }
        }
    }
    packed
}

/// A single bitpacked run of the hybrid encoding.
pub fn hybrid_bitpacked(values: &[u32], num_bits: usize) -> Vec<u8> {
    let groups = (values.len() + 7) / 8;
    let mut buffer = vec![];
    uleb128(((groups << 1) | 1) as u64, &mut buffer);
    let values = values.iter().map(|x| *x as u64).collect::<Vec<_>>();
    buffer.extend(bitpack(&values, num_bits));
    buffer
}

/// A single rle run of the hybrid encoding.
pub fn hybrid_rle(value: u32, length: usize, num_bits: usize) -> Vec<u8> {
    let mut buffer = vec![];
    uleb128((length << 1) as u64, &mut buffer);
    buffer.extend(&value.to_le_bytes()[..(num_bits + 7) / 8]);
    buffer
}

/// Definition levels of a column whose maximum level is 1.
pub fn def_levels(validity: &[bool]) -> Vec<u8> {
    let levels = validity.iter().map(|x| *x as u32).collect::<Vec<_>>();
    hybrid_bitpacked(&levels, 1)
}

pub fn dictionary_ids(ids: &[u32], num_bits: usize) -> Vec<u8> {
    let mut buffer = vec![num_bits as u8];
    buffer.extend(hybrid_bitpacked(ids, num_bits));
    buffer
}

pub fn delta_binary_packed(values: &[i64]) -> Vec<u8> {
    let mut buffer = vec![];
    uleb128(128, &mut buffer);
    uleb128(4, &mut buffer);
    uleb128(values.len() as u64, &mut buffer);
    zigzag(values.first().copied().unwrap_or(0), &mut buffer);

    let deltas = values.windows(2).map(|x| x[1] - x[0]).collect::<Vec<_>>();
    for block in deltas.chunks(128) {
        let min_delta = *block.iter().min().unwrap();
        zigzag(min_delta, &mut buffer);
        let miniblocks = block
            .chunks(32)
            .map(|x| x.iter().map(|d| (d - min_delta) as u64).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let widths = (0..4)
            .map(|i| {
                miniblocks
                    .get(i)
                    .map(|x| 64 - x.iter().max().unwrap().leading_zeros())
                    .unwrap_or(0) as u8
            })
            .collect::<Vec<_>>();
        buffer.extend(&widths);
        for (miniblock, width) in miniblocks.iter().zip(widths.iter()) {
            let mut padded = miniblock.clone();
            padded.resize(32, 0);
            buffer.extend(bitpack(&padded, *width as usize));
        }
    }
    buffer
}

pub fn delta_length_byte_array<T: AsRef<[u8]>>(values: &[T]) -> Vec<u8> {
    let lengths = values
        .iter()
        .map(|x| x.as_ref().len() as i64)
        .collect::<Vec<_>>();
    let mut buffer = delta_binary_packed(&lengths);
    values
        .iter()
        .for_each(|x| buffer.extend_from_slice(x.as_ref()));
    buffer
}

/// Encodes `(prefix length, suffix)` pairs.
pub fn delta_byte_array(values: &[(i64, &str)]) -> Vec<u8> {
    let prefixes = values.iter().map(|x| x.0).collect::<Vec<_>>();
    let suffixes = values.iter().map(|x| x.1).collect::<Vec<_>>();
    let mut buffer = delta_binary_packed(&prefixes);
    buffer.extend(delta_length_byte_array(&suffixes));
    buffer
}

pub fn plain_i32(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|x| x.to_le_bytes()).collect()
}

pub fn plain_i64(values: &[i64]) -> Vec<u8> {
    values.iter().flat_map(|x| x.to_le_bytes()).collect()
}

pub fn plain_f64(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|x| x.to_le_bytes()).collect()
}

pub fn plain_int96(values: &[[u32; 3]]) -> Vec<u8> {
    values
        .iter()
        .flat_map(|x| x.iter().flat_map(|x| x.to_le_bytes()))
        .collect()
}

pub fn plain_binary<T: AsRef<[u8]>>(values: &[T]) -> Vec<u8> {
    let mut buffer = vec![];
    for value in values {
        let value = value.as_ref();
        buffer.extend((value.len() as u32).to_le_bytes());
        buffer.extend_from_slice(value);
    }
    buffer
}

pub fn plain_bool(values: &[bool]) -> Vec<u8> {
    let values = values.iter().map(|x| *x as u64).collect::<Vec<_>>();
    bitpack(&values, 1)
}

/// A v1 page. `levels` are length-prefixed when present.
pub fn page_v1(
    descriptor: &ColumnDescriptor,
    encoding: Encoding,
    num_values: usize,
    levels: Option<Vec<u8>>,
    values: Vec<u8>,
) -> DataPage {
    let mut buffer = vec![];
    if let Some(levels) = levels {
        buffer.extend((levels.len() as u32).to_le_bytes());
        buffer.extend(levels);
    }
    buffer.extend(values);

    let header = DataPageHeader::V1(DataPageHeaderV1 {
        num_values: num_values as i32,
        encoding: encoding.into(),
        definition_level_encoding: Encoding::Rle.into(),
        repetition_level_encoding: Encoding::Rle.into(),
        statistics: None,
    });
    DataPage::try_new(header, buffer, descriptor.clone()).unwrap()
}

pub fn page_v2(
    descriptor: &ColumnDescriptor,
    encoding: Encoding,
    num_values: usize,
    num_nulls: usize,
    levels: Vec<u8>,
    values: Vec<u8>,
) -> DataPage {
    let header = DataPageHeader::V2(DataPageHeaderV2 {
        num_values: num_values as i32,
        num_nulls: num_nulls as i32,
        num_rows: num_values as i32,
        encoding: encoding.into(),
        definition_levels_byte_length: levels.len() as i32,
        repetition_levels_byte_length: 0,
        is_compressed: Some(false),
        statistics: None,
    });
    let mut buffer = levels;
    buffer.extend(values);
    DataPage::try_new(header, buffer, descriptor.clone()).unwrap()
}
