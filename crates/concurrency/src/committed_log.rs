//! The committed log: a totally ordered sequence of committed journals.

use std::hash::Hash;
use std::rc::Rc;

use txkv_core::{CompositeJournal, Journal};

/// A single committed write journal, tagged with the offset it was
/// assigned at append time.
///
/// Payloads are immutable once appended: nothing outside this module ever
/// obtains a mutable handle to a payload after [`CommittedLog::append`]
/// returns.
pub struct CommittedItem<K, V> {
    /// The offset assigned to this commit. Offsets are dense, strictly
    /// increasing, and start at 1.
    pub offset: u64,
    /// The committed write journal.
    pub payload: Rc<dyn Journal<K, V>>,
}

/// Ordered by offset, strictly increasing, never rewritten (invariant I2).
///
/// Backed by an append-only vector; since offsets are dense and equal to
/// `index + 1`, range selection is a direct index computation rather than
/// a binary search, but has the same O(log n + k) character the data
/// model calls for (O(1) here, since the mapping from offset to index is
/// exact).
pub struct CommittedLog<K, V> {
    items: Vec<CommittedItem<K, V>>,
    counter: u64,
}

impl<K, V> Default for CommittedLog<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> CommittedLog<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    /// Creates an empty log. `last_offset()` is 0 until the first append.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            counter: 0,
        }
    }

    /// Appends `journal` as a new committed item, assigning it the next
    /// offset. Returns the assigned offset.
    pub fn append(&mut self, journal: Rc<dyn Journal<K, V>>) -> u64 {
        self.counter += 1;
        self.items.push(CommittedItem {
            offset: self.counter,
            payload: journal,
        });
        self.counter
    }

    /// The current value of the offset counter; 0 before any commit.
    pub fn last_offset(&self) -> u64 {
        self.counter
    }

    /// A composite, newest-first, over items with `lo <= offset <= hi`.
    ///
    /// `lo == 0` means "from the beginning". `hi == None` means "through
    /// the end". A range with `lo` past the last offset is empty.
    pub fn view(&self, lo: u64, hi: Option<u64>) -> CompositeJournal<K, V> {
        let len = self.items.len();
        let start = if lo == 0 {
            0
        } else {
            ((lo - 1) as usize).min(len)
        };
        let end = match hi {
            Some(hi) => (hi.min(self.counter) as usize).min(len),
            None => len,
        };
        if start >= end {
            return CompositeJournal::empty();
        }
        let layers: Vec<Rc<dyn Journal<K, V>>> = self.items[start..end]
            .iter()
            .rev()
            .map(|item| item.payload.clone())
            .collect();
        CompositeJournal::new(layers)
    }
}
