//! Compaction specs
//!
//! Verify when compaction runs and what it leaves on disk.

use crate::prelude::*;

#[test]
fn compacting_twice_changes_nothing() {
    let store = Store::empty();
    let mut list = store.open();
    for i in 0..5 {
        list.push(i).unwrap();
    }
    list.pop().unwrap();

    list.compact().unwrap();
    let once = store.contents();
    list.compact().unwrap();

    similar_asserts::assert_eq!(store.contents(), once);
    assert_eq!(values(&store.open()), vec![4, 3, 2, 1]);
}

#[test]
fn threshold_breach_compacts_on_add() {
    let store = Store::empty();
    let mut list = store.open_with_threshold(u64::MAX).unwrap();
    list.append(42).unwrap();
    for i in 0..20 {
        list.append(i).unwrap();
        list.pop().unwrap();
    }
    let before = store.size();

    list.set_compaction_threshold(before / 4);
    list.append(7).unwrap();

    let expected = format!("{}{}", Store::append_record(42), Store::append_record(7));
    similar_asserts::assert_eq!(store.contents(), expected);
    assert!(store.size() < before);
    assert!(store.size() <= before / 4);
}

#[test]
fn single_element_compacts_within_one_record() {
    let store = Store::empty();
    let mut list = store.open_with_threshold(u64::MAX).unwrap();
    for i in 0..30 {
        list.append(i).unwrap();
        list.pop().unwrap();
    }
    let before = store.size();

    let threshold = 1;
    list.set_compaction_threshold(threshold);
    list.append(5).unwrap();

    let record = Store::append_record(5).len() as u64;
    assert!(store.size() <= threshold.max(record));
    assert!(store.size() < before);
    // The compacted record alone exceeds the threshold, so it was doubled
    assert_eq!(list.log().compaction_threshold(), 2);
}

#[test]
fn compaction_leaves_only_the_log_file() {
    let store = Store::empty();
    let mut list = store.open_with_threshold(1).unwrap();
    for i in 0..10 {
        list.append(i).unwrap();
    }

    let dir = store.path().parent().unwrap();
    let entries: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["list.jsonl".to_string()]);
}
