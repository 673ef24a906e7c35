use super::*;
use crate::encoding::rle::{decode_levels_v1, decode_levels_v2};
use crate::encoding::DefaultPageProperties;
use crate::schema::{convert_columns, EngineColumn, LogicalAnnotation, MessageSchema, SchemaNode, SchemaPath, TimeUnit};
use crate::types::{EngineType, RowField, Value};
use parquet::basic::{Compression, Encoding, Type as PhysicalType};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

fn compile(
    schema: &MessageSchema,
    types: &[(&str, EngineType)],
    version: WriterVersion,
) -> Result<Vec<ColumnWriter>> {
    let types: HashMap<SchemaPath, EngineType> = types
        .iter()
        .map(|(path, engine_type)| (SchemaPath::from_dotted(path), engine_type.clone()))
        .collect();
    let properties = Arc::new(DefaultPageProperties::new(version, DEFAULT_PAGE_SIZE_THRESHOLD));
    get_column_writers(schema, &types, properties, Compression::UNCOMPRESSED)
}

/// Decode the (definition, repetition) levels of a page
fn levels(page: &EncodedPage, max_def: u16, max_rep: u16) -> (Vec<u16>, Vec<u16>) {
    let n = page.num_values();
    match &page.header {
        PageHeader::V1 { .. } => {
            let (reps, used) = decode_levels_v1(&page.data, max_rep, n).unwrap();
            let (defs, _) = decode_levels_v1(&page.data[used..], max_def, n).unwrap();
            (defs, reps)
        }
        PageHeader::V2 {
            repetition_levels_byte_length: rep_len,
            definition_levels_byte_length: def_len,
            ..
        } => {
            let reps = decode_levels_v2(&page.data[..*rep_len], max_rep, n).unwrap();
            let defs = decode_levels_v2(&page.data[*rep_len..*rep_len + *def_len], max_def, n).unwrap();
            (defs, reps)
        }
    }
}

fn single_page(writer: &mut ColumnWriter) -> EncodedPage {
    let mut pages = writer.flush_page();
    assert_eq!(pages.len(), 1);
    pages.remove(0)
}

fn int_list_schema() -> MessageSchema {
    MessageSchema::new(
        "lists",
        vec![SchemaNode::list("tags", SchemaNode::primitive("element", PhysicalType::INT32).optional()).optional()],
    )
}

// ============================================================================
// Type mapper
// ============================================================================

#[test]
fn test_value_writer_kind() {
    assert_eq!(
        value_writer_kind(&EngineType::TinyInt).unwrap(),
        ValueWriterKind::Integer { bit_width: 8 }
    );
    assert_eq!(value_writer_kind(&EngineType::Char(3)).unwrap(), ValueWriterKind::Binary);
    assert_eq!(
        value_writer_kind(&EngineType::decimal(38, 38)).unwrap(),
        ValueWriterKind::Decimal { precision: 38, scale: 38 }
    );
    assert_eq!(ValueWriterKind::Decimal { precision: 10, scale: 2 }.to_string(), "decimal(10,2)");
}

#[test]
fn test_value_writer_kind_rejects() {
    for engine_type in [
        EngineType::decimal(39, 0),
        EngineType::decimal(0, 0),
        EngineType::decimal(5, 6),
        EngineType::Json,
        EngineType::IpAddress,
        EngineType::array(EngineType::Integer),
    ] {
        assert!(
            matches!(value_writer_kind(&engine_type), Err(WriterError::UnsupportedType { .. })),
            "{engine_type} should be unsupported"
        );
    }
}

// ============================================================================
// Compiler
// ============================================================================

#[test]
fn test_compiler_levels() {
    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::map(
            "attrs",
            SchemaNode::primitive("key", PhysicalType::BYTE_ARRAY).with_logical(LogicalAnnotation::String),
            SchemaNode::primitive("value", PhysicalType::INT64).optional(),
        )
        .optional()],
    );
    let writers = compile(
        &schema,
        &[
            ("attrs.key_value.key", EngineType::Varchar),
            ("attrs.key_value.value", EngineType::BigInt),
        ],
        WriterVersion::V1,
    )
    .unwrap();
    assert_eq!(writers.len(), 1);

    let leaves = writers[0].leaves();
    let levels: Vec<(String, u16, u16)> = leaves
        .iter()
        .map(|leaf| {
            let d = leaf.descriptor();
            (d.path.to_string(), d.max_definition_level, d.max_repetition_level)
        })
        .collect();
    assert_eq!(
        levels,
        vec![
            ("attrs.key_value.key".to_string(), 2, 1),
            ("attrs.key_value.value".to_string(), 3, 1),
        ]
    );
    assert!(!leaves[0].is_nullable());
    assert!(leaves[1].is_nullable());
}

#[test]
fn test_compiler_missing_mapping() {
    let schema = MessageSchema::new("m", vec![SchemaNode::primitive("a", PhysicalType::INT32)]);
    let err = compile(&schema, &[], WriterVersion::V1).unwrap_err();
    assert!(matches!(err, WriterError::SchemaMapping { path } if path.to_string() == "a"));
}

#[test]
fn test_compiler_incompatible_physical_type() {
    let schema = MessageSchema::new("m", vec![SchemaNode::primitive("a", PhysicalType::INT64)]);
    let err = compile(&schema, &[("a", EngineType::Integer)], WriterVersion::V1).unwrap_err();
    assert!(matches!(err, WriterError::IncompatibleSchema { .. }));

    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::primitive("d", PhysicalType::FIXED_LEN_BYTE_ARRAY).with_length(5)],
    );
    let err = compile(&schema, &[("d", EngineType::decimal(12, 2))], WriterVersion::V1).unwrap_err();
    assert!(matches!(err, WriterError::IncompatibleSchema { .. }));
}

#[test]
fn test_compiler_unsupported_type() {
    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::primitive("j", PhysicalType::BYTE_ARRAY).with_logical(LogicalAnnotation::Json)],
    );
    let err = compile(&schema, &[("j", EngineType::Json)], WriterVersion::V1).unwrap_err();
    assert!(matches!(err, WriterError::UnsupportedType { .. }));
}

#[test]
fn test_compiler_rejects_invalid_schema() {
    let schema = MessageSchema::new("m", vec![SchemaNode::structure("s", vec![])]);
    let err = compile(&schema, &[], WriterVersion::V1).unwrap_err();
    assert!(matches!(err, WriterError::InvalidSchema(_)));
}

// ============================================================================
// Nested levels
// ============================================================================

#[test]
fn test_array_levels() {
    for version in [WriterVersion::V1, WriterVersion::V2] {
        let mut writers = compile(&int_list_schema(), &[("tags.list.element", EngineType::Integer)], version).unwrap();
        let writer = &mut writers[0];
        writer
            .write(&[
                Value::Array(vec![]),
                Value::Array(vec![Value::from(1), Value::from(2), Value::from(3)]),
                Value::Null,
                Value::Array(vec![Value::Null]),
            ])
            .unwrap();
        assert_eq!(writer.buffered_rows(), 4);

        let page = single_page(writer);
        assert_eq!(page.version(), version);
        assert_eq!(page.num_values(), 6);
        let (defs, reps) = levels(&page, 3, 1);
        assert_eq!(defs, vec![1, 3, 3, 3, 0, 2]);
        assert_eq!(reps, vec![0, 0, 1, 1, 0, 0]);
        if version == WriterVersion::V2 {
            assert_eq!(page.num_nulls(), Some(3));
            assert_eq!(page.num_rows(), Some(4));
        }
    }
}

#[test]
fn test_empty_then_full_array_repetition() {
    let mut writers = compile(&int_list_schema(), &[("tags.list.element", EngineType::Integer)], WriterVersion::V2).unwrap();
    writers[0]
        .write(&[
            Value::Array(vec![]),
            Value::Array(vec![Value::from(7), Value::from(8), Value::from(9)]),
        ])
        .unwrap();
    let page = single_page(&mut writers[0]);
    let (_, reps) = levels(&page, 3, 1);
    assert_eq!(reps, vec![0, 0, 1, 1]);
}

#[test]
fn test_null_struct_levels() {
    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::structure(
            "point",
            vec![
                SchemaNode::primitive("x", PhysicalType::DOUBLE),
                SchemaNode::primitive("y", PhysicalType::DOUBLE).optional(),
            ],
        )
        .optional()],
    );
    let mut writers = compile(
        &schema,
        &[("point.x", EngineType::Double), ("point.y", EngineType::Double)],
        WriterVersion::V1,
    )
    .unwrap();
    writers[0]
        .write(&[
            Value::Null,
            Value::Row(vec![Value::from(1.0), Value::Null]),
            Value::Row(vec![Value::from(2.0), Value::from(3.0)]),
        ])
        .unwrap();

    let chunks = writers.remove(0).close();
    assert_eq!(chunks.len(), 2);
    let (x_defs, _) = levels(&chunks[0].pages[0], 1, 0);
    let (y_defs, _) = levels(&chunks[1].pages[0], 2, 0);
    assert_eq!(x_defs, vec![0, 1, 1]);
    assert_eq!(y_defs, vec![0, 1, 2]);
    assert_eq!(chunks[0].num_nulls, 1);
    assert_eq!(chunks[1].num_nulls, 2);
}

#[test]
fn test_struct_arity_mismatch_writes_nothing() {
    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::structure(
            "point",
            vec![
                SchemaNode::primitive("x", PhysicalType::DOUBLE),
                SchemaNode::primitive("y", PhysicalType::DOUBLE),
            ],
        )],
    );
    let mut writers = compile(
        &schema,
        &[("point.x", EngineType::Double), ("point.y", EngineType::Double)],
        WriterVersion::V1,
    )
    .unwrap();
    let err = writers[0].write_value(&Value::Row(vec![Value::from(1.0)]), 0).unwrap_err();
    assert!(err.is_structural());
    assert!(writers[0].leaves().iter().all(|leaf| leaf.buffered_values() == 0));

    // A required struct rejects nulls.
    let err = writers[0].write_value(&Value::Null, 0).unwrap_err();
    assert!(matches!(err, WriterError::NullInRequiredField { .. }));
}

#[test]
fn test_map_levels() {
    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::map(
            "attrs",
            SchemaNode::primitive("key", PhysicalType::BYTE_ARRAY).with_logical(LogicalAnnotation::String),
            SchemaNode::primitive("value", PhysicalType::INT64).optional(),
        )
        .optional()],
    );
    let mut writers = compile(
        &schema,
        &[
            ("attrs.key_value.key", EngineType::Varchar),
            ("attrs.key_value.value", EngineType::BigInt),
        ],
        WriterVersion::V2,
    )
    .unwrap();
    writers[0]
        .write(&[
            Value::Map(vec![
                (Value::from("a"), Value::from(10_i64)),
                (Value::from("b"), Value::Null),
            ]),
            Value::Map(vec![]),
            Value::Null,
        ])
        .unwrap();

    let chunks = writers.remove(0).close();
    let (key_defs, key_reps) = levels(&chunks[0].pages[0], 2, 1);
    let (value_defs, value_reps) = levels(&chunks[1].pages[0], 3, 1);
    assert_eq!(key_defs, vec![2, 2, 1, 0]);
    assert_eq!(key_reps, vec![0, 1, 0, 0]);
    assert_eq!(value_defs, vec![3, 2, 1, 0]);
    assert_eq!(value_reps, key_reps);
    assert_eq!(chunks[0].num_rows, 3);
    assert_eq!(chunks[1].num_rows, 3);
}

#[test]
fn test_map_null_key_rejected_before_write() {
    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::map(
            "attrs",
            SchemaNode::primitive("key", PhysicalType::INT32),
            SchemaNode::primitive("value", PhysicalType::INT32).optional(),
        )],
    );
    let mut writers = compile(
        &schema,
        &[
            ("attrs.key_value.key", EngineType::Integer),
            ("attrs.key_value.value", EngineType::Integer),
        ],
        WriterVersion::V1,
    )
    .unwrap();
    let err = writers[0]
        .write_value(
            &Value::Map(vec![(Value::from(1), Value::from(1)), (Value::Null, Value::from(2))]),
            0,
        )
        .unwrap_err();
    assert!(
        matches!(err, WriterError::NullInRequiredField { path } if path.to_string() == "attrs.key_value.key")
    );
    assert!(writers[0].leaves().iter().all(|leaf| leaf.buffered_values() == 0));
}

#[test]
fn test_structural_mismatch() {
    let mut writers = compile(&int_list_schema(), &[("tags.list.element", EngineType::Integer)], WriterVersion::V1).unwrap();
    let err = writers[0].write(&[Value::from(1)]).unwrap_err();
    assert!(matches!(err, WriterError::StructuralMismatch { .. }));
}

// ============================================================================
// Value writers
// ============================================================================

#[test]
fn test_integer_overflow() {
    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::primitive("t", PhysicalType::INT32)
            .with_logical(LogicalAnnotation::Integer { bit_width: 8, signed: true })],
    );
    let mut writers = compile(&schema, &[("t", EngineType::TinyInt)], WriterVersion::V1).unwrap();
    writers[0].write(&[Value::from(127), Value::from(-128)]).unwrap();
    let err = writers[0].write(&[Value::from(128)]).unwrap_err();
    assert!(matches!(err, WriterError::IntegerOverflow { value: 128, bit_width: 8, .. }));

    let err = writers[0].write(&[Value::from("x")]).unwrap_err();
    assert!(matches!(
        err,
        WriterError::ValueTypeMismatch { expected: "integer", found: "string", .. }
    ));
}

#[test]
fn test_required_leaf_rejects_null() {
    let schema = MessageSchema::new("m", vec![SchemaNode::primitive("a", PhysicalType::INT64)]);
    let mut writers = compile(&schema, &[("a", EngineType::BigInt)], WriterVersion::V1).unwrap();
    let err = writers[0].write(&[Value::Null]).unwrap_err();
    assert!(matches!(err, WriterError::NullInRequiredField { .. }));
}

#[test]
fn test_decimal_fixed_boundaries() {
    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::primitive("d", PhysicalType::FIXED_LEN_BYTE_ARRAY)
            .with_length(16)
            .with_logical(LogicalAnnotation::Decimal { precision: 38, scale: 0 })],
    );
    let mut writers = compile(&schema, &[("d", EngineType::decimal(38, 0))], WriterVersion::V1).unwrap();
    let max = 10i128.pow(38) - 1;
    writers[0].write(&[Value::Decimal(max), Value::Decimal(-1)]).unwrap();
    let err = writers[0].write(&[Value::Decimal(max + 1)]).unwrap_err();
    assert!(matches!(err, WriterError::DecimalOverflow { precision: 38, .. }));

    let page = single_page(&mut writers[0]);
    // Required top-level leaf: the page is just the values.
    assert_eq!(page.data.len(), 32);
    assert_eq!(&page.data[..16], &max.to_be_bytes());
    assert!(page.data[16..].iter().all(|b| *b == 0xFF));
}

#[test]
fn test_decimal_binary_boundaries() {
    let schema = MessageSchema::new("m", vec![SchemaNode::primitive("d", PhysicalType::BYTE_ARRAY)]);
    let mut writers = compile(&schema, &[("d", EngineType::decimal(5, 2))], WriterVersion::V1).unwrap();
    writers[0].write(&[Value::Decimal(99_999)]).unwrap();
    let err = writers[0].write(&[Value::Decimal(-100_000)]).unwrap_err();
    assert!(matches!(err, WriterError::DecimalOverflow { unscaled: -100_000, precision: 5, .. }));

    let page = single_page(&mut writers[0]);
    assert_eq!(&page.data[..], &[3, 0, 0, 0, 0x01, 0x86, 0x9F]);
}

#[test]
fn test_timestamp_unit_scaling() {
    let schema = MessageSchema::new(
        "m",
        vec![SchemaNode::primitive("ts", PhysicalType::INT64).with_logical(LogicalAnnotation::Timestamp {
            unit: TimeUnit::Micros,
            adjusted_to_utc: false,
        })],
    );
    let mut writers = compile(&schema, &[("ts", EngineType::Timestamp)], WriterVersion::V1).unwrap();
    writers[0].write(&[Value::Timestamp(1_500)]).unwrap();
    let err = writers[0].write(&[Value::Timestamp(i64::MAX)]).unwrap_err();
    assert!(matches!(err, WriterError::TemporalOverflow { unit: TimeUnit::Micros, .. }));

    let page = single_page(&mut writers[0]);
    assert_eq!(&page.data[..], &1_500_000i64.to_le_bytes());
}

// ============================================================================
// Page formats
// ============================================================================

#[test]
fn test_v1_and_v2_headers() {
    let schema = MessageSchema::new("m", vec![SchemaNode::primitive("x", PhysicalType::INT32).optional()]);
    let rows = [Value::from(1), Value::Null, Value::from(3)];

    let mut v1 = compile(&schema, &[("x", EngineType::Integer)], WriterVersion::V1).unwrap();
    v1[0].write(&rows).unwrap();
    let v1_page = single_page(&mut v1[0]);

    let mut v2 = compile(&schema, &[("x", EngineType::Integer)], WriterVersion::V2).unwrap();
    v2[0].write(&rows).unwrap();
    let v2_page = single_page(&mut v2[0]);

    assert_eq!(
        v1_page.header,
        PageHeader::V1 {
            num_values: 3,
            encoding: Encoding::PLAIN,
            definition_level_encoding: Encoding::RLE,
            repetition_level_encoding: Encoding::RLE,
        }
    );
    assert_eq!(
        v2_page.header,
        PageHeader::V2 {
            num_values: 3,
            num_nulls: 1,
            num_rows: 3,
            encoding: Encoding::PLAIN,
            definition_levels_byte_length: 2,
            repetition_levels_byte_length: 0,
            is_compressed: false,
        }
    );
    assert_eq!(v1_page.num_nulls(), None);
    assert_eq!(v1_page.data.len(), v2_page.data.len() + 4);
    assert_eq!(levels(&v1_page, 1, 0), levels(&v2_page, 1, 0));

    // Values follow the levels and hold only non-null entries.
    let values = &v2_page.data[2..];
    assert_eq!(values, &[1, 0, 0, 0, 3, 0, 0, 0]);
}

#[test]
fn test_v2_boolean_uses_rle() {
    let schema = MessageSchema::new("m", vec![SchemaNode::primitive("b", PhysicalType::BOOLEAN)]);
    for (version, encoding) in [(WriterVersion::V1, Encoding::PLAIN), (WriterVersion::V2, Encoding::RLE)] {
        let mut writers = compile(&schema, &[("b", EngineType::Boolean)], version).unwrap();
        writers[0].write(&[Value::from(true), Value::from(false)]).unwrap();
        let chunk = writers.remove(0).close().remove(0);
        assert_eq!(chunk.pages[0].encoding(), encoding);
        assert_eq!(chunk.encodings[0], encoding);
    }
}

#[test]
fn test_compression_recorded_on_pages() {
    let converted = convert_columns("m", &[EngineColumn::new("x", EngineType::Integer)]).unwrap();
    let config = WriterConfig {
        compression: CompressionType::Snappy,
        ..WriterConfig::v2()
    };
    let mut writer = TableWriter::try_new(&converted.schema, &converted.types, &config).unwrap();
    writer.write_row(&[Value::from(1)]).unwrap();
    let pages = writer.flush_page().unwrap();
    assert_eq!(pages[0].compression, Compression::SNAPPY);
    assert!(matches!(pages[0].header, PageHeader::V2 { is_compressed: true, .. }));
}

// ============================================================================
// Table writer
// ============================================================================

#[test]
fn test_table_writer_nullable_columns() -> Result<()> {
    let converted = convert_columns(
        "people",
        &[
            EngineColumn::new("id", EngineType::Integer),
            EngineColumn::new("name", EngineType::Varchar),
        ],
    )?;
    let mut writer = TableWriter::try_new(&converted.schema, &converted.types, &WriterConfig::default())?;
    writer.write_rows(&[
        vec![Value::from(1), Value::from("a")],
        vec![Value::Null, Value::from("b")],
    ])?;
    assert_eq!(writer.rows_written(), 2);
    assert_eq!(writer.buffered_rows(), 2);

    let (chunks, stats) = writer.close()?;
    assert_eq!(chunks.len(), 2);
    let (id_defs, _) = levels(&chunks[0].pages[0], 1, 0);
    assert_eq!(id_defs, vec![1, 0]);
    assert_eq!(chunks[0].num_nulls, 1);
    assert_eq!(chunks[0].encodings, vec![Encoding::PLAIN, Encoding::RLE]);
    assert_eq!(stats.rows_written, 2);
    assert_eq!(stats.leaf_columns, 2);
    assert_eq!(stats.nulls_written, 1);
    assert_eq!(stats.values_written, 4);
    Ok(())
}

#[test]
fn test_table_writer_write_columns() -> Result<()> {
    let converted = convert_columns(
        "t",
        &[
            EngineColumn::required("id", EngineType::BigInt),
            EngineColumn::new(
                "point",
                EngineType::row(vec![RowField::new("x", EngineType::Double)]),
            ),
        ],
    )?;
    let mut writer = TableWriter::try_new(&converted.schema, &converted.types, &WriterConfig::v2())?;
    writer.write_columns(&[
        vec![Value::from(1_i64), Value::from(2_i64)],
        vec![Value::Row(vec![Value::from(0.5)]), Value::Null],
    ])?;

    let err = writer
        .write_columns(&[vec![Value::from(3_i64)], vec![]])
        .unwrap_err();
    assert!(err.is_structural());
    assert!(!writer.is_poisoned());

    let (chunks, stats) = writer.close()?;
    assert_eq!(chunks[1].descriptor.path.to_string(), "point.x");
    assert_eq!(chunks[1].pages[0].num_nulls(), Some(1));
    assert_eq!(stats.rows_written, 2);
    Ok(())
}

#[test]
fn test_table_writer_arity_checked_up_front() {
    let converted = convert_columns(
        "t",
        &[
            EngineColumn::new("a", EngineType::Integer),
            EngineColumn::new("b", EngineType::Integer),
        ],
    )
    .unwrap();
    let mut writer = TableWriter::try_new(&converted.schema, &converted.types, &WriterConfig::default()).unwrap();
    let err = writer
        .write_rows(&[vec![Value::from(1), Value::from(2)], vec![Value::from(3)]])
        .unwrap_err();
    assert!(err.is_structural());
    assert!(!writer.is_poisoned());
    assert_eq!(writer.buffered_size(), 0);
    assert_eq!(writer.rows_written(), 0);
}

#[test]
fn test_table_writer_poisoned_after_failure() {
    let converted = convert_columns(
        "t",
        &[
            EngineColumn::new("a", EngineType::Integer),
            EngineColumn::new("b", EngineType::Varchar),
        ],
    )
    .unwrap();
    let mut writer = TableWriter::try_new(&converted.schema, &converted.types, &WriterConfig::default()).unwrap();
    let err = writer.write_row(&[Value::from(1), Value::from(2)]).unwrap_err();
    assert!(matches!(err, WriterError::ValueTypeMismatch { .. }));
    assert!(writer.is_poisoned());

    assert!(matches!(
        writer.write_row(&[Value::from(1), Value::from("x")]),
        Err(WriterError::Poisoned)
    ));
    assert!(matches!(writer.flush_page(), Err(WriterError::Poisoned)));
    assert!(matches!(writer.close(), Err(WriterError::Poisoned)));
}

#[test]
fn test_page_cut_at_threshold() -> Result<()> {
    let converted = convert_columns("t", &[EngineColumn::required("n", EngineType::BigInt)])?;
    let mut writer = TableWriter::try_new(&converted.schema, &converted.types, &WriterConfig::small_pages())?;

    for batch in 0..5_i64 {
        let rows: Vec<Vec<Value>> = (0..200).map(|i| vec![Value::from(batch * 200 + i)]).collect();
        writer.write_rows(&rows)?;
    }
    // Every batch buffers 1600 bytes and is cut right after it is written.
    assert_eq!(writer.buffered_size(), 0);
    assert_eq!(writer.buffered_rows(), 1000);

    let pages = writer.flush_page()?;
    assert_eq!(pages.len(), 5);
    assert!(pages.iter().all(|page| page.num_values() == 200 && page.data.len() == 1600));
    assert_eq!(writer.buffered_rows(), 0);

    let (chunks, stats) = writer.close()?;
    assert!(chunks[0].pages.is_empty());
    assert_eq!(chunks[0].num_values, 1000);
    assert_eq!(chunks[0].num_rows, 1000);
    assert_eq!(stats.pages_written, 5);
    assert_eq!(stats.page_bytes, 8000);
    assert_eq!(stats.rows_written, 1000);
    Ok(())
}

#[test]
fn test_v2_pages_start_on_row_boundaries() -> Result<()> {
    let converted = convert_columns("t", &[EngineColumn::new("tags", EngineType::array(EngineType::BigInt))])?;
    let config = WriterConfig {
        page_size_threshold: 64,
        ..WriterConfig::v2()
    };
    let mut writer = TableWriter::try_new(&converted.schema, &converted.types, &config)?;
    for _ in 0..4 {
        let row = vec![Value::Array((0..10_i64).map(Value::from).collect())];
        writer.write_row(&row)?;
    }
    let (chunks, _) = writer.close()?;
    let pages = &chunks[0].pages;
    assert_eq!(pages.len(), 4);
    for page in pages {
        let (_, reps) = levels(page, 3, 1);
        assert_eq!(reps[0], 0);
        assert_eq!(page.num_rows(), Some(1));
    }
    Ok(())
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_writer_version_parsing() {
    assert_eq!("PARQUET_2_0".parse::<WriterVersion>().unwrap(), WriterVersion::V2);
    assert_eq!("v1".parse::<WriterVersion>().unwrap(), WriterVersion::V1);
    assert!(matches!(
        "PARQUET_3_0".parse::<WriterVersion>(),
        Err(WriterError::UnsupportedWriterVersion(v)) if v == "PARQUET_3_0"
    ));
    assert_eq!(WriterVersion::V2.to_string(), "PARQUET_2_0");
}

#[test]
fn test_writer_config_from_toml() {
    let config = WriterConfig::from_toml_str(
        r#"
        writer_version = "PARQUET_2_0"
        page_size_threshold = 4096
        compression = "zstd:5"
        "#,
    )
    .unwrap();
    assert_eq!(config.writer_version, WriterVersion::V2);
    assert_eq!(config.page_size_threshold, 4096);
    assert_eq!(config.compression, CompressionType::Zstd(5));

    assert_eq!(WriterConfig::from_toml_str("").unwrap(), WriterConfig::default());
    assert!(WriterConfig::from_toml_str("writer_version = \"v3\"").is_err());
    assert!(WriterConfig::from_toml_str("page_size_threshold = 0").is_err());
}

#[test]
fn test_compression_parsing() {
    assert_eq!("none".parse::<CompressionType>().unwrap(), CompressionType::Uncompressed);
    assert_eq!("ZSTD".parse::<CompressionType>().unwrap(), CompressionType::balanced());
    assert!("lz5".parse::<CompressionType>().is_err());
    assert_eq!(CompressionType::Uncompressed.to_parquet(), Compression::UNCOMPRESSED);
}
