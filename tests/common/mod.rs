//! Shared helpers for integration tests: a minimal reader for the pages
//! produced by the default encoders.

#![allow(dead_code)]

use byteorder::{ByteOrder, LittleEndian};
use nestwrite::encoding::rle::{decode_levels_v1, decode_levels_v2, RleDecoder};
use nestwrite::schema::ColumnDescriptor;
use nestwrite::writer::{ColumnChunk, EncodedPage, PageHeader};
use parquet::basic::{Encoding, Type as PhysicalType};

/// A decoded physical value
#[derive(Debug, Clone, PartialEq)]
pub enum Physical {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
}

/// Levels and non-null values of one or more pages
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Decoded {
    pub definition_levels: Vec<u16>,
    pub repetition_levels: Vec<u16>,
    pub values: Vec<Physical>,
}

impl Decoded {
    fn extend(&mut self, other: Decoded) {
        self.definition_levels.extend(other.definition_levels);
        self.repetition_levels.extend(other.repetition_levels);
        self.values.extend(other.values);
    }
}

/// Decode one data page of a leaf
pub fn decode_page(page: &EncodedPage, descriptor: &ColumnDescriptor) -> Decoded {
    let n = page.num_values();
    let max_def = descriptor.max_definition_level;
    let max_rep = descriptor.max_repetition_level;

    let (definition_levels, repetition_levels, offset) = match &page.header {
        PageHeader::V1 { .. } => {
            let (reps, rep_bytes) = decode_levels_v1(&page.data, max_rep, n).expect("repetition levels");
            let (defs, def_bytes) =
                decode_levels_v1(&page.data[rep_bytes..], max_def, n).expect("definition levels");
            (defs, reps, rep_bytes + def_bytes)
        }
        PageHeader::V2 {
            repetition_levels_byte_length,
            definition_levels_byte_length,
            ..
        } => {
            let rep_end = *repetition_levels_byte_length;
            let def_end = rep_end + *definition_levels_byte_length;
            let reps = decode_levels_v2(&page.data[..rep_end], max_rep, n).expect("repetition levels");
            let defs = decode_levels_v2(&page.data[rep_end..def_end], max_def, n).expect("definition levels");
            (defs, reps, def_end)
        }
    };

    let present = definition_levels.iter().filter(|def| **def == max_def).count();
    let values = decode_values(&page.data[offset..], page.encoding(), descriptor, present);
    Decoded {
        definition_levels,
        repetition_levels,
        values,
    }
}

/// Decode every page of a chunk, in order
pub fn decode_chunk(chunk: &ColumnChunk) -> Decoded {
    let mut decoded = Decoded::default();
    for page in &chunk.pages {
        decoded.extend(decode_page(page, &chunk.descriptor));
    }
    decoded
}

fn decode_values(data: &[u8], encoding: Encoding, descriptor: &ColumnDescriptor, count: usize) -> Vec<Physical> {
    if encoding == Encoding::RLE {
        // Booleans: 4-byte length prefix + hybrid stream of width 1
        let length = LittleEndian::read_u32(&data[..4]) as usize;
        return RleDecoder::new(1, &data[4..4 + length])
            .decode(count)
            .expect("boolean values")
            .into_iter()
            .map(|bit| Physical::Boolean(bit == 1))
            .collect();
    }
    assert_eq!(encoding, Encoding::PLAIN);

    let mut values = Vec::with_capacity(count);
    let mut offset = 0;
    for i in 0..count {
        let value = match descriptor.physical_type {
            PhysicalType::BOOLEAN => Physical::Boolean((data[i / 8] >> (i % 8)) & 1 == 1),
            PhysicalType::INT32 => {
                offset += 4;
                Physical::Int32(LittleEndian::read_i32(&data[offset - 4..offset]))
            }
            PhysicalType::INT64 => {
                offset += 8;
                Physical::Int64(LittleEndian::read_i64(&data[offset - 8..offset]))
            }
            PhysicalType::FLOAT => {
                offset += 4;
                Physical::Float(LittleEndian::read_f32(&data[offset - 4..offset]))
            }
            PhysicalType::DOUBLE => {
                offset += 8;
                Physical::Double(LittleEndian::read_f64(&data[offset - 8..offset]))
            }
            PhysicalType::BYTE_ARRAY => {
                let length = LittleEndian::read_u32(&data[offset..offset + 4]) as usize;
                offset += 4 + length;
                Physical::Bytes(data[offset - length..offset].to_vec())
            }
            PhysicalType::FIXED_LEN_BYTE_ARRAY => {
                let length = descriptor.type_length as usize;
                offset += length;
                Physical::Bytes(data[offset - length..offset].to_vec())
            }
            other => panic!("unsupported physical type {other}"),
        };
        values.push(value);
    }
    values
}

/// Rebuild the rows of an optional list of optional INT64 elements
/// (definition levels 0..=3, repetition levels 0..=1)
pub fn optional_list_rows(decoded: &Decoded) -> Vec<Option<Vec<Option<i64>>>> {
    let mut rows: Vec<Option<Vec<Option<i64>>>> = Vec::new();
    let mut values = decoded.values.iter();
    for (def, rep) in decoded.definition_levels.iter().zip(&decoded.repetition_levels) {
        if *rep == 0 {
            rows.push(match def {
                0 => None,
                _ => Some(Vec::new()),
            });
        }
        let element = match def {
            0 | 1 => continue,
            2 => None,
            _ => match values.next() {
                Some(Physical::Int64(v)) => Some(*v),
                other => panic!("unexpected value {other:?}"),
            },
        };
        if let Some(Some(items)) = rows.last_mut() {
            items.push(element);
        }
    }
    rows
}
