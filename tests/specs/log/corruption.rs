//! Corruption specs
//!
//! Verify that a damaged log never yields a partially rebuilt list.

use crate::prelude::*;

#[test]
fn truncated_second_record_fails_open() {
    let store = Store::empty();
    let second = Store::append_record(2);
    store.write(format!(
        "{}{}",
        Store::append_record(1),
        &second[..second.len() / 2]
    ));
    let before = store.contents();

    let result = store.open_with_threshold(u64::MAX);

    assert!(matches!(result, Err(LogError::Decode { line: 2, .. })));
    // Nothing was compacted away
    assert_eq!(store.contents(), before);
}

#[test]
fn garbage_line_fails_open() {
    let store = Store::empty();
    store.write(format!("{}not json at all\n", Store::append_record(1)));

    assert!(matches!(
        store.open_with_threshold(u64::MAX),
        Err(LogError::Decode { line: 2, .. })
    ));
}

#[test]
fn flipped_byte_fails_checksum() {
    let store = Store::empty();
    // Parameter bytes for 1 are [49]; 50 encodes 2 but the checksum still covers 1
    let record = Store::append_record(1).replace("[[49]]", "[[50]]");
    store.write(record);

    assert!(matches!(
        store.open_with_threshold(u64::MAX),
        Err(LogError::Decode { line: 1, .. })
    ));
}

#[test]
fn unknown_key_fails_open() {
    let store = Store::empty();
    let line = Operation::new("shuffle", Vec::<i64>::new())
        .encode(&JsonCodec::new())
        .unwrap()
        .to_line()
        .unwrap();
    store.write(line);

    assert!(matches!(
        store.open_with_threshold(u64::MAX),
        Err(LogError::UnknownKey { line: 1, .. })
    ));
}
