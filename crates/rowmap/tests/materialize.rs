//! End-to-end materialization tests.
//!
//! These tests drive the public API only: records declared with
//! `record!`, in-memory cursors, and mappers shared across cursors and
//! threads.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::OnceLock;

use rowmap::{
    record, DatasetConfig, DeclaredType, MapError, Mapper, MapperCache, MemoryCursor, Property,
    Record, SqlType, SqlValue,
};

#[derive(Debug, Default, PartialEq)]
struct A {
    a: i32,
}

record! { A { a: i32 => "A" } }

#[derive(Debug, Default, PartialEq)]
struct NullableA {
    a: Option<i32>,
}

record! { NullableA { a: Option<i32> => "A" } }

#[derive(Debug, Default, PartialEq)]
struct ShortA {
    a: i16,
}

record! { ShortA { a: i16 => "A" } }

#[derive(Debug, Default, PartialEq)]
struct WideA {
    a: i64,
}

record! { WideA { a: i64 => "A" } }

#[derive(Debug, Default, PartialEq)]
struct UnsignedA {
    a: u32,
}

record! { UnsignedA { a: u32 => "A" } }

#[derive(Debug, Default, PartialEq)]
struct AB {
    a: i32,
    b: i32,
}

record! { AB { a: i32 => "A", b: i32 => "B" } }

#[derive(Debug, Default, PartialEq)]
struct Nothing;

record! { Nothing {} }

#[derive(Debug, Default, PartialEq)]
struct Event {
    name: String,
    at: Option<NaiveDateTime>,
}

record! { Event { name: String => "Name", at: Option<NaiveDateTime> => "At" } }

/// Record with a computed property that no column feeds.
#[derive(Debug, Default, PartialEq)]
struct Reading {
    raw: i64,
    scaled: Option<f64>,
}

impl Record for Reading {
    fn record_name() -> &'static str {
        "Reading"
    }

    fn properties() -> &'static [Property<Self>] {
        static PROPERTIES: OnceLock<Vec<Property<Reading>>> = OnceLock::new();
        PROPERTIES.get_or_init(|| {
            vec![
                Property::new::<i64>("Raw", |r: &mut Reading, v: i64| r.raw = v),
                Property::read_only::<Option<f64>>("Scaled"),
            ]
        })
    }
}

fn required(ty: SqlType) -> DeclaredType {
    DeclaredType::required(ty)
}

fn optional(ty: SqlType) -> DeclaredType {
    DeclaredType::optional(ty)
}

fn int_cursor(declared: DeclaredType, cells: &[SqlValue]) -> MemoryCursor {
    MemoryCursor::new()
        .column("A", declared)
        .rows(cells.iter().map(|c| vec![c.clone()]))
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_int_column() {
    let cursor = int_cursor(required(SqlType::I32), &[SqlValue::I32(1)]);
    let rows: Vec<A> = Mapper::new().read_all(cursor).unwrap();
    assert_eq!(rows, vec![A { a: 1 }]);
}

#[test]
fn test_no_columns_is_schema_mismatch() {
    for n in 0..3 {
        let cursor = MemoryCursor::new().rows((0..n).map(|_| vec![]));
        let err = Mapper::new().read_all::<A, _>(cursor).unwrap_err();
        assert!(
            matches!(err, MapError::SchemaMismatch { record: "A", ref property } if property == "A")
        );
        assert!(err.is_compile_error());
        assert_eq!(err.exit_code(), 2);
    }
}

#[test]
fn test_null_into_optional_property() {
    let cursor = int_cursor(optional(SqlType::I32), &[SqlValue::Null]);
    let rows: Vec<NullableA> = Mapper::new().read_all(cursor).unwrap();
    assert_eq!(rows, vec![NullableA { a: None }]);
}

#[test]
fn test_null_into_required_property() {
    let cursor = int_cursor(optional(SqlType::I32), &[SqlValue::Null]);
    let err = Mapper::new().read_all::<A, _>(cursor).unwrap_err();
    assert!(matches!(
        err,
        MapError::NonNullableColumnWasNull { ordinal: 0, .. }
    ));
    assert!(err.is_row_error());
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_int32_into_int16() {
    let cursor = int_cursor(required(SqlType::I32), &[SqlValue::I32(i32::MAX)]);
    let err = Mapper::new().read_all::<ShortA, _>(cursor).unwrap_err();
    assert!(matches!(err, MapError::NumericOverflow { target: SqlType::I16, .. }));

    let cursor = int_cursor(required(SqlType::I32), &[SqlValue::I32(1)]);
    let rows: Vec<ShortA> = Mapper::new().read_all(cursor).unwrap();
    assert_eq!(rows, vec![ShortA { a: 1 }]);
}

#[test]
fn test_negative_int32_into_uint32() {
    let cursor = int_cursor(required(SqlType::I32), &[SqlValue::I32(-1)]);
    let err = Mapper::new().read_all::<UnsignedA, _>(cursor).unwrap_err();
    assert!(matches!(err, MapError::NumericOverflow { .. }));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_extra_columns_are_ignored() {
    let cursor = MemoryCursor::new()
        .column("Z", required(SqlType::Text))
        .column("B", required(SqlType::I32))
        .column("Unused", required(SqlType::Uuid))
        .column("A", required(SqlType::I32))
        .row(vec![
            SqlValue::Text("skip".into()),
            SqlValue::I32(2),
            SqlValue::Uuid(uuid::Uuid::nil()),
            SqlValue::I32(1),
        ]);
    let rows: Vec<AB> = Mapper::new().read_all(cursor).unwrap();
    assert_eq!(rows, vec![AB { a: 1, b: 2 }]);
}

#[test]
fn test_zero_properties_and_zero_rows() {
    let rows: Vec<Nothing> = Mapper::new().read_all(MemoryCursor::new()).unwrap();
    assert!(rows.is_empty());

    let cursor = int_cursor(required(SqlType::I32), &[]);
    let rows: Vec<A> = Mapper::new().read_all(cursor).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_widening_and_unsigned_sources() {
    let cursor = int_cursor(required(SqlType::I32), &[SqlValue::I32(i32::MIN)]);
    let rows: Vec<WideA> = Mapper::new().read_all(cursor).unwrap();
    assert_eq!(rows, vec![WideA { a: i32::MIN as i64 }]);

    let cursor = int_cursor(required(SqlType::U32), &[SqlValue::U32(7)]);
    let rows: Vec<A> = Mapper::new().read_all(cursor).unwrap();
    assert_eq!(rows, vec![A { a: 7 }]);

    let cursor = int_cursor(required(SqlType::U32), &[SqlValue::U32(u32::MAX)]);
    assert!(matches!(
        Mapper::new().read_all::<A, _>(cursor),
        Err(MapError::NumericOverflow { .. })
    ));
}

#[test]
fn test_text_into_int_fails_before_reading() {
    let cursor = int_cursor(required(SqlType::Text), &[SqlValue::Text("1".into())]);
    let err = Mapper::new()
        .materialize_default::<A, _>(cursor)
        .err()
        .unwrap();
    assert!(matches!(err, MapError::UnsupportedConversion { .. }));
}

#[test]
fn test_duplicate_bound_column_is_rejected() {
    let cursor = MemoryCursor::new()
        .column("A", required(SqlType::I32))
        .column("A", required(SqlType::I32))
        .row(vec![SqlValue::I32(1), SqlValue::I32(1)]);
    let err = Mapper::new().read_all::<A, _>(cursor).unwrap_err();
    assert!(matches!(err, MapError::AmbiguousColumn { ref ordinals, .. } if ordinals == &[0, 1]));
}

#[test]
fn test_mixed_record() {
    let at = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap();
    let cursor = MemoryCursor::new()
        .column("At", optional(SqlType::DateTime))
        .column("Name", required(SqlType::Text))
        .row(vec![SqlValue::DateTime(at), SqlValue::Text("start".into())])
        .row(vec![SqlValue::Null, SqlValue::Text("stop".into())]);

    let rows: Vec<Event> = Mapper::new().read_all(cursor).unwrap();
    assert_eq!(
        rows,
        vec![
            Event {
                name: "start".into(),
                at: Some(at)
            },
            Event {
                name: "stop".into(),
                at: None
            },
        ]
    );
}

#[test]
fn test_null_text_into_required_string() {
    let cursor = MemoryCursor::new()
        .column("Name", optional(SqlType::Text))
        .column("At", optional(SqlType::DateTime))
        .row(vec![SqlValue::Null, SqlValue::Null]);
    assert!(matches!(
        Mapper::new().read_all::<Event, _>(cursor),
        Err(MapError::NonNullableColumnWasNull { .. })
    ));
}

#[test]
fn test_read_only_property_needs_no_column() {
    let cursor = MemoryCursor::new()
        .column("Raw", required(SqlType::I64))
        .row(vec![SqlValue::I64(40)])
        .row(vec![SqlValue::I64(41)]);

    let mapper = Mapper::new();
    let probe = mapper.probe::<Reading>(&cursor).unwrap();
    assert_eq!(probe.bindings.len(), 1);
    assert_eq!(probe.bindings[0].property_name, "Raw");

    let rows: Vec<Reading> = mapper.read_all(cursor).unwrap();
    assert_eq!(
        rows,
        vec![
            Reading {
                raw: 40,
                scaled: None
            },
            Reading {
                raw: 41,
                scaled: None
            },
        ]
    );
}

#[test]
fn test_read_only_property_ignores_matching_column() {
    let cursor = MemoryCursor::new()
        .column("Scaled", required(SqlType::Text))
        .column("Raw", required(SqlType::I64))
        .row(vec![SqlValue::Text("not a number".into()), SqlValue::I64(7)]);

    let rows: Vec<Reading> = Mapper::new().read_all(cursor).unwrap();
    assert_eq!(
        rows,
        vec![Reading {
            raw: 7,
            scaled: None
        }]
    );
}

// =============================================================================
// Caching
// =============================================================================

#[test]
fn test_same_shape_reuses_materializer() {
    let mapper = Mapper::new();
    for _ in 0..3 {
        let cursor = int_cursor(required(SqlType::I32), &[SqlValue::I32(1)]);
        assert_eq!(mapper.read_all::<A, _>(cursor).unwrap().len(), 1);
    }
    let stats = mapper.cache().stats();
    assert_eq!(stats.compilations, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.entries, 1);
}

#[test]
fn test_different_shape_compiles_separately() {
    let mapper = Mapper::new();
    let first = mapper
        .resolve::<A>(&int_cursor(required(SqlType::I32), &[]))
        .unwrap();
    let second = mapper
        .resolve::<A>(&int_cursor(optional(SqlType::I32), &[]))
        .unwrap();
    let moved = mapper
        .resolve::<A>(
            &MemoryCursor::new()
                .column("X", required(SqlType::I32))
                .column("A", required(SqlType::I32)),
        )
        .unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_ne!(first.signature(), moved.signature());
    assert_eq!(mapper.cache().len(), 3);

    // Same columns for a different record is a different entry.
    mapper
        .resolve::<NullableA>(&int_cursor(required(SqlType::I32), &[]))
        .unwrap();
    assert_eq!(mapper.cache().len(), 4);
}

#[test]
fn test_failed_compilation_is_retried() {
    let mapper = Mapper::new();
    for _ in 0..2 {
        assert!(mapper.resolve::<A>(&MemoryCursor::new()).is_err());
    }
    assert!(mapper.cache().is_empty());
    assert_eq!(mapper.cache().stats().compilations, 0);
}

#[test]
fn test_shared_cache_across_mappers_and_threads() {
    let cache = Arc::new(MapperCache::new());

    std::thread::scope(|scope| {
        for t in 0..8 {
            let mapper = Mapper::with_cache(cache.clone());
            scope.spawn(move || {
                for i in 0..25 {
                    let value = t * 100 + i;
                    let cursor = int_cursor(required(SqlType::I32), &[SqlValue::I32(value)]);
                    let rows: Vec<A> = mapper.read_all(cursor).unwrap();
                    assert_eq!(rows, vec![A { a: value }]);
                }
            });
        }
    });

    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert!(stats.compilations >= 1);
    assert_eq!(stats.hits + stats.compilations, 200);
    assert_eq!(cache.getters().len(), 1);

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().hits, 0);
}

// =============================================================================
// Datasets
// =============================================================================

#[test]
fn test_dataset_file_drives_mapping() {
    let config = DatasetConfig::from_yaml(
        r#"
columns:
  - { name: B, type: int, nullable: true }
  - { name: A, type: int16 }
rows:
  - [10, 1]
  - [null, 2]
"#,
    )
    .unwrap();

    let rows: Vec<NullableA> = Mapper::new().read_all(config.to_cursor().unwrap()).unwrap();
    assert_eq!(rows, vec![NullableA { a: Some(1) }, NullableA { a: Some(2) }]);

    let err = Mapper::new()
        .read_all::<AB, _>(config.to_cursor().unwrap())
        .unwrap_err();
    assert!(matches!(err, MapError::NonNullableColumnWasNull { ordinal: 0, .. }));
}
