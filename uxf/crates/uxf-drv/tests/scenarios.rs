//! End-to-end tests over literal inputs.

use std::fs;

use uxf_drv::{
    codes, load, loads, Key, MemoryReporter, ParseOptions, QuietReporter, Value,
};

fn loads_quiet(text: &str) -> uxf_drv::Uxf {
    let mut reporter = QuietReporter;
    loads(text, "-", &ParseOptions::default(), &mut reporter).unwrap()
}

#[test]
fn header_only() {
    let uxo = loads_quiet("uxf 1.0\n[]\n");
    assert!(uxo.value().as_list().unwrap().is_empty());
    assert!(uxo.custom.is_empty());
    assert!(uxo.tclasses.is_empty());
}

#[test]
fn typed_list() {
    let uxo = loads_quiet("uxf 1.0\n[int 1 2 3]\n");
    let list = uxo.value().as_list().unwrap();
    assert_eq!(list.vtype.as_deref(), Some("int"));
    assert_eq!(
        list.values,
        vec![Value::Int(1), Value::Int(2), Value::Int(3)]
    );
}

#[test]
fn map_with_typed_keys_and_values() {
    let uxo = loads_quiet("uxf 1.0\n{str int <one> 1 <two> 2}\n");
    let map = uxo.value().as_map().unwrap();
    assert_eq!(map.ktype(), Some("str"));
    assert_eq!(map.vtype.as_deref(), Some("int"));
    assert_eq!(map.get(&Key::Str("one".to_string())), Some(&Value::Int(1)));
    assert_eq!(map.get(&Key::Str("two".to_string())), Some(&Value::Int(2)));
}

#[test]
fn table_with_tclass() {
    let uxo = loads_quiet("uxf 1.0\n=point x:int y:int\n(point 1 2 3 4)\n");
    let table = uxo.value().as_table().unwrap();
    assert_eq!(table.ttype(), Some("point"));
    assert_eq!(table.len(), 2);
    assert_eq!(table.get(0), Some(&[Value::Int(1), Value::Int(2)][..]));
    assert_eq!(table.get(1), Some(&[Value::Int(3), Value::Int(4)][..]));
}

#[test]
fn bytes_and_date() {
    let uxo = loads_quiet("uxf 1.0\n[(:DEADBEEF:) 2023-01-15]\n");
    let list = uxo.value().as_list().unwrap();
    assert_eq!(list.values[0], Value::Bytes(vec![0xde, 0xad, 0xbe, 0xef]));
    assert_eq!(
        list.values[1],
        Value::Date(chrono::NaiveDate::from_ymd_opt(2023, 1, 15).unwrap())
    );
}

#[test]
fn import_cycle_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.uxf");
    let b = dir.path().join("b.uxf");
    fs::write(&a, "uxf 1.0\n!b.uxf\n[]\n").unwrap();
    fs::write(&b, "uxf 1.0\n!a.uxf\n[]\n").unwrap();
    let mut reporter = MemoryReporter::new();
    let err = load(&a, &ParseOptions::default(), &mut reporter).unwrap_err();
    assert_eq!(err.code(), Some(codes::CIRCULAR_IMPORT));
}

#[test]
fn identifier_rules() {
    // 60 chars is fine, a 61st is dropped
    let name = "n".repeat(60);
    let uxo = loads_quiet(&format!("uxf 1.0\n={name} x\n[({name} 1)]\n"));
    assert!(uxo.tclasses.contains_key(&name));

    // a digit cannot start a name: `9bad` lexes as the number 9, which
    // derails the tclass definition entirely
    let mut reporter = MemoryReporter::new();
    let err = loads(
        "uxf 1.0\n=9bad x\n[]\n",
        "-",
        &ParseOptions::default(),
        &mut reporter,
    )
    .unwrap_err();
    assert_eq!(err.code(), Some(codes::EXPECTED_COLLECTION));
}

#[test]
fn reserved_word_cannot_name_a_tclass() {
    let mut reporter = MemoryReporter::new();
    let err = loads(
        "uxf 1.0\n=null x\n[]\n",
        "-",
        &ParseOptions::default(),
        &mut reporter,
    )
    .unwrap_err();
    // `null` lexes as an identifier but fails name validation
    assert!(matches!(
        err.code(),
        Some(codes::RESERVED_NAME) | Some(codes::TTYPE_IS_BUILTIN)
    ));
}

#[test]
fn version_too_new_is_only_a_warning() {
    let mut reporter = MemoryReporter::new();
    let uxo = loads(
        "uxf 2.0\n[1]\n",
        "-",
        &ParseOptions::default(),
        &mut reporter,
    )
    .unwrap();
    assert!(reporter.has(codes::VERSION_TOO_NEW));
    assert_eq!(uxo.value().as_list().unwrap().len(), 1);
}

#[test]
fn table_record_stream_respects_arity() {
    // 3 fields, 6 scalars: exactly 2 records
    let uxo = loads_quiet("uxf 1.0\n=rgb r g b\n(rgb 1 2 3 4 5 6)\n");
    let table = uxo.value().as_table().unwrap();
    assert_eq!(table.len(), 2);
    for record in table.records() {
        assert_eq!(record.len(), 3);
    }
}
