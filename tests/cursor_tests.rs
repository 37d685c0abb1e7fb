#![cfg(feature = "core")]

use orderx::core::{Cursor, OrderError};

#[test]
fn walks_a_group_and_stops() {
    let items = ["a", "b", "c"];
    let mut cursor = Cursor::new();
    let mut seen = Vec::new();

    let mut more = cursor.first(items.len());
    while more {
        seen.push(*cursor.get(&items, "letters").unwrap());
        more = cursor.next(items.len());
    }

    assert_eq!(seen, ["a", "b", "c"]);
    assert!(!cursor.next(items.len()));
    assert!(cursor.get(&items, "letters").is_err());
}

#[test]
fn next_on_a_fresh_cursor_starts_at_the_first_element() {
    let items = [10, 20];
    let mut cursor = Cursor::default();
    assert!(cursor.next(items.len()));
    assert_eq!(*cursor.get(&items, "numbers").unwrap(), 10);
    assert!(cursor.next(items.len()));
    assert_eq!(*cursor.get(&items, "numbers").unwrap(), 20);
}

#[test]
fn empty_group() {
    let items: [u8; 0] = [];
    let mut cursor = Cursor::new();
    assert!(!cursor.first(items.len()));
    assert!(!cursor.next(items.len()));
    assert!(matches!(
        cursor.get(&items, "empty"),
        Err(OrderError::OutOfRange { collection: "empty", len: 0, .. })
    ));
}

#[test]
fn unset_cursor_reports_no_index() {
    let cursor = Cursor::new();
    assert!(!cursor.is_set());
    match cursor.current(3, "notes") {
        Err(OrderError::OutOfRange { index, len, .. }) => {
            assert_eq!(index, None);
            assert_eq!(len, 3);
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
}

#[test]
fn out_of_range_message() {
    let items = ["only"];
    let mut cursor = Cursor::new();
    cursor.first(items.len());
    cursor.next(items.len());
    let err = cursor.get(&items, "document note").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"cursor for document note is out of range (index Some(1), 1 element(s))");
}

#[test]
fn first_rewinds_after_exhaustion() {
    let items = ["x", "y"];
    let mut cursor = Cursor::new();
    cursor.first(items.len());
    while cursor.next(items.len()) {}
    assert!(cursor.first(items.len()));
    assert_eq!(*cursor.get(&items, "letters").unwrap(), "x");
}

#[test]
fn reset_unsets() {
    let items = [1];
    let mut cursor = Cursor::new();
    cursor.first(items.len());
    assert!(cursor.is_set());
    cursor.reset();
    assert!(!cursor.is_set());
    assert!(cursor.get(&items, "numbers").is_err());
}

#[test]
fn collection_growth_is_seen_by_the_next_call() {
    let mut items = vec!["a"];
    let mut cursor = Cursor::new();
    cursor.first(items.len());
    assert!(!cursor.next(items.len()));
    items.push("b");
    // The cursor sits at index 1 now, which exists after the push.
    assert_eq!(*cursor.get(&items, "letters").unwrap(), "b");
}
