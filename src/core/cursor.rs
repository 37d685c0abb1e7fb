//! Stateful first/next/get navigation over repeating groups.
//!
//! A [`Cursor`] only stores a position; the collection it walks is passed
//! in on every call, so a reader can keep one cursor per repeating group
//! without borrowing its document.

use super::error::OrderError;

/// Position within one repeating group. Starts unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    index: Option<usize>,
}

impl Cursor {
    pub const fn new() -> Self {
        Self { index: None }
    }

    /// Move to the first element. Returns `false` for an empty group.
    pub fn first(&mut self, len: usize) -> bool {
        self.index = Some(0);
        len > 0
    }

    /// Advance by one; an unset cursor behaves like [`Cursor::first`].
    /// Returns `false` once the cursor is past the last element.
    pub fn next(&mut self, len: usize) -> bool {
        let index = match self.index {
            None => 0,
            Some(i) => i.saturating_add(1),
        };
        self.index = Some(index);
        index < len
    }

    /// Index of the current element, or `OutOfRange` when the cursor is
    /// unset or past the end of a group of `len` elements.
    pub fn current(&self, len: usize, collection: &'static str) -> Result<usize, OrderError> {
        match self.index {
            Some(i) if i < len => Ok(i),
            index => Err(OrderError::OutOfRange {
                collection,
                index,
                len,
            }),
        }
    }

    /// Current element of `items`.
    pub fn get<'a, T>(&self, items: &'a [T], collection: &'static str) -> Result<&'a T, OrderError> {
        let i = self.current(items.len(), collection)?;
        Ok(&items[i])
    }

    pub fn reset(&mut self) {
        self.index = None;
    }

    pub fn is_set(&self) -> bool {
        self.index.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_cursor_is_out_of_range() {
        let c = Cursor::new();
        assert!(matches!(
            c.current(3, "notes"),
            Err(OrderError::OutOfRange { collection: "notes", index: None, len: 3 })
        ));
    }

    #[test]
    fn walk_and_overrun() {
        let items = ["a", "b"];
        let mut c = Cursor::new();
        assert!(c.first(items.len()));
        assert_eq!(*c.get(&items, "items").unwrap(), "a");
        assert!(c.next(items.len()));
        assert_eq!(*c.get(&items, "items").unwrap(), "b");
        assert!(!c.next(items.len()));
        assert!(c.get(&items, "items").is_err());
        // stays past the end
        assert!(!c.next(items.len()));
    }

    #[test]
    fn next_on_unset_acts_as_first() {
        let mut c = Cursor::new();
        assert!(c.next(1));
        assert_eq!(c.current(1, "x").unwrap(), 0);
    }

    #[test]
    fn empty_group() {
        let mut c = Cursor::new();
        assert!(!c.first(0));
        assert!(c.current(0, "x").is_err());
        c.reset();
        assert!(!c.is_set());
    }
}
