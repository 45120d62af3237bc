use std::fmt::{Debug, Error, Formatter};
use std::iter::{DoubleEndedIterator, Enumerate, FromIterator};
use std::result::Result;
use std::slice::Iter;

/// Elements with a width (eg. when used in an `OffsetVec`)
///
/// For constants this is the number of constant pool slots taken up, for instructions it is the
/// number of bytes taken up in the code array.
pub trait Width {
    fn width(&self) -> usize;
}

/// A vector of elements of different logical "widths", where offsets into the vector are given in
/// terms of the sum of the widths of the previous elements (as opposed to the number of preceding
/// elements).
///
/// The constant pool is the motivating example: most entries take one slot, `Long` and `Double`
/// entries take two, and the indices used by instructions are slot offsets (starting at 1).
#[derive(Clone)]
pub struct OffsetVec<T: Sized> {
    /// Entries, along with their offset
    entries: Vec<(Offset, T)>,

    /// Offset of the next element to be added
    offset_len: Offset,
}

/// Offset into an `OffsetVec`
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Offset(pub usize);

impl<T: Sized + Width> OffsetVec<T> {
    /// New empty offset vector
    pub fn new() -> OffsetVec<T> {
        OffsetVec::new_starting_at(Offset(0))
    }

    /// New empty offset vector, with a custom starting offset
    pub fn new_starting_at(initial_offset: Offset) -> OffsetVec<T> {
        OffsetVec {
            entries: vec![],
            offset_len: initial_offset,
        }
    }

    /// Length of the `OffsetVec` (aka. number of entries)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current offset size of the `OffsetVec` (aka. offset of the next element
    /// to be added)
    pub fn offset_len(&self) -> Offset {
        self.offset_len
    }

    /// Add an entry to the back
    pub fn push(&mut self, slot: T) -> Offset {
        let offset = self.offset_len;
        self.offset_len.0 += slot.width();
        self.entries.push((offset, slot));

        offset
    }

    /// Get an entry (and its index) by its offset in the vector
    ///
    /// Note: this uses binary search to find the offset
    pub fn get_offset(&self, offset: Offset) -> OffsetResult<'_, T> {
        match self.entries.binary_search_by_key(&offset, |(off, _)| *off) {
            Ok(found_idx) => OffsetResult::Ok(found_idx, &self.entries[found_idx].1),
            Err(_) if offset >= self.offset_len => OffsetResult::TooLarge,
            Err(0) => OffsetResult::TooSmall,
            Err(insert_at) => OffsetResult::InvalidOffset(insert_at - 1),
        }
    }

    /// Get an entry (and its offset) by its position in the vector
    pub fn get_index(&self, index: usize) -> Option<(Offset, &T)> {
        self.entries.get(index).map(|(offset, t)| (*offset, t))
    }

    pub fn iter(&self) -> OffsetVecIter<'_, T> {
        self.into_iter()
    }
}

impl<A: PartialEq> PartialEq for OffsetVec<A> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<A: Eq> Eq for OffsetVec<A> {}

impl<A: Width> Default for OffsetVec<A> {
    fn default() -> Self {
        OffsetVec::new()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum OffsetResult<'a, T> {
    /// Element was accessed
    Ok(usize, &'a T),

    /// Offset was invalid, and falls in the middle of the element at this index
    InvalidOffset(usize),

    /// Offset is before the first element
    TooSmall,

    /// Offset is too big
    TooLarge,
}

impl<'a, T> OffsetResult<'a, T> {
    /// Convert to an `Option` and keep only the value found
    pub fn ok(&self) -> Option<&'a T> {
        match self {
            OffsetResult::Ok(_, found) => Some(found),
            OffsetResult::InvalidOffset(_) | OffsetResult::TooSmall | OffsetResult::TooLarge => {
                None
            }
        }
    }
}

/// Iterator for borrowed `OffsetVec`
pub struct OffsetVecIter<'a, T>(Enumerate<Iter<'a, (Offset, T)>>);

impl<'a, T> Iterator for OffsetVecIter<'a, T> {
    type Item = (Offset, usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(idx, (off, elem))| (*off, idx, elem))
    }
}

impl<'a, T> DoubleEndedIterator for OffsetVecIter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0
            .next_back()
            .map(|(idx, (off, elem))| (*off, idx, elem))
    }
}

impl<'a, T> IntoIterator for &'a OffsetVec<T> {
    type Item = (Offset, usize, &'a T);
    type IntoIter = OffsetVecIter<'a, T>;

    fn into_iter(self) -> OffsetVecIter<'a, T> {
        OffsetVecIter(self.entries.iter().enumerate())
    }
}

impl<T: Width> FromIterator<T> for OffsetVec<T> {
    fn from_iter<A: IntoIterator<Item = T>>(elems: A) -> Self {
        let mut offset_vec = OffsetVec::new();
        for elem in elems {
            offset_vec.push(elem);
        }
        offset_vec
    }
}

impl<T: Debug> Debug for OffsetVec<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let mut list = f.debug_list();
        for (off, elem) in &self.entries {
            list.entry(&format_args!("#{} = {:?}", off.0, elem));
        }
        list.finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    enum Slot {
        Single(u8),
        Double(u8),
    }

    impl Width for Slot {
        fn width(&self) -> usize {
            match self {
                Slot::Single(_) => 1,
                Slot::Double(_) => 2,
            }
        }
    }

    fn pool_like() -> OffsetVec<Slot> {
        let mut slots = OffsetVec::new_starting_at(Offset(1));
        slots.push(Slot::Single(1));
        slots.push(Slot::Double(2));
        slots.push(Slot::Single(3));
        slots
    }

    #[test]
    fn offsets_account_for_widths() {
        let slots = pool_like();
        assert_eq!(
            slots.iter().collect::<Vec<_>>(),
            vec![
                (Offset(1), 0, &Slot::Single(1)),
                (Offset(2), 1, &Slot::Double(2)),
                (Offset(4), 2, &Slot::Single(3)),
            ]
        );
        assert_eq!(slots.offset_len(), Offset(5));
        assert_eq!(slots.len(), 3);
    }

    #[test]
    fn lookups_by_offset() {
        let slots = pool_like();
        assert_eq!(slots.get_offset(Offset(1)), OffsetResult::Ok(0, &Slot::Single(1)));
        assert_eq!(slots.get_offset(Offset(2)), OffsetResult::Ok(1, &Slot::Double(2)));
        assert_eq!(slots.get_offset(Offset(4)), OffsetResult::Ok(2, &Slot::Single(3)));
        assert_eq!(slots.get_offset(Offset(0)), OffsetResult::TooSmall);
        assert_eq!(slots.get_offset(Offset(3)), OffsetResult::InvalidOffset(1));
        assert_eq!(slots.get_offset(Offset(5)), OffsetResult::TooLarge);
        assert_eq!(slots.get_offset(Offset(3)).ok(), None);
    }

    #[test]
    fn trailing_wide_entry_has_unusable_slot() {
        let mut slots: OffsetVec<Slot> = OffsetVec::new_starting_at(Offset(1));
        slots.push(Slot::Double(7));
        assert_eq!(slots.get_offset(Offset(2)), OffsetResult::InvalidOffset(0));
        assert_eq!(slots.get_offset(Offset(3)), OffsetResult::TooLarge);
    }

    #[test]
    fn collected_vectors_start_at_zero() {
        let slots: OffsetVec<Slot> = vec![Slot::Double(1), Slot::Single(2)]
            .into_iter()
            .collect();
        assert_eq!(slots.get_index(1), Some((Offset(2), &Slot::Single(2))));
        assert_eq!(slots.get_index(2), None);
    }
}
