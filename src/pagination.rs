//! One-record-at-a-time paging with clamping at both ends.

use serde::{Deserialize, Serialize};

/// Result of a prev/next request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Moved(usize),
    AtStart,
    AtEnd,
    Empty,
}

/// Cursor over a list of `len` records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    index: usize,
    len: usize,
}

impl Pager {
    /// Creates a pager, clamping `index` into range
    pub fn new(index: usize, len: usize) -> Self {
        Self {
            index: clamp_index(index, len),
            len,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.len == 0 || self.index + 1 >= self.len
    }

    pub fn prev(&mut self) -> PageMove {
        if self.is_empty() {
            PageMove::Empty
        } else if self.is_first() {
            PageMove::AtStart
        } else {
            self.index -= 1;
            PageMove::Moved(self.index)
        }
    }

    pub fn next(&mut self) -> PageMove {
        if self.is_empty() {
            PageMove::Empty
        } else if self.is_last() {
            PageMove::AtEnd
        } else {
            self.index += 1;
            PageMove::Moved(self.index)
        }
    }
}

/// Clamps a stored index against a list that may have shrunk since it was stored
pub fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_out_of_range_index() {
        assert_eq!(Pager::new(10, 3).index(), 2);
        assert_eq!(Pager::new(10, 0).index(), 0);
    }

    #[test]
    fn test_single_record_is_both_ends() {
        let mut pager = Pager::new(0, 1);
        assert_eq!(pager.prev(), PageMove::AtStart);
        assert_eq!(pager.next(), PageMove::AtEnd);
        assert_eq!(pager.index(), 0);
    }
}
