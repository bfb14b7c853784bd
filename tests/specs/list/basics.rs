//! List basics specs
//!
//! Verify the list API independent of restarts.

use crate::prelude::*;

#[test]
fn append_ten_then_get_each() {
    let store = Store::empty();
    let mut list = store.open();

    for i in 0..10 {
        list.append(i).unwrap();
    }

    assert_eq!(list.len(), 10);
    assert_eq!(list.get(5), Some(&5));
    for i in 0..10 {
        assert_eq!(list.get(i as usize), Some(&i));
    }
    assert_eq!(list.len(), 10);
    assert_eq!(list.get(10), None);
}

#[test]
fn iterator_yields_all_then_terminates() {
    let store = Store::empty();
    let mut list = store.open();
    for i in 0..10 {
        list.append(i).unwrap();
    }

    let mut iter = list.iter();
    let mut seen = Vec::new();
    while let Some(v) = iter.next() {
        seen.push(*v);
    }

    assert_eq!(seen, (0..10).collect::<Vec<_>>());
    assert_eq!(iter.next(), None);
}

#[test]
fn push_then_pop_is_first_in_first_out() {
    let store = Store::empty();
    let mut list = store.open();

    list.push(1).unwrap();
    list.push(2).unwrap();
    list.push(3).unwrap();

    assert_eq!(values(&list), vec![3, 2, 1]);
    assert_eq!(list.pop().unwrap(), Some(1));
    assert_eq!(list.pop().unwrap(), Some(2));
    assert_eq!(list.pop().unwrap(), Some(3));
    assert_eq!(list.pop().unwrap(), None);
}

#[test]
fn pop_on_empty_leaves_file_untouched() {
    let store = Store::empty();
    let mut list = store.open();
    let size = store.size();

    assert_eq!(list.pop().unwrap(), None);

    assert_eq!(store.size(), size);
    assert!(list.is_empty());
}
