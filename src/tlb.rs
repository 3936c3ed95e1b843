use std::collections::VecDeque;

/// A cached page -> frame mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlbEntry {
    pub page: u32,
    pub frame: u32,
}

/// Translation lookaside buffer: a bounded FIFO cache of page -> frame
/// mappings.
///
/// Entries are kept in insertion order, oldest at the front. When the buffer
/// is full, admitting a new entry evicts the entry that has been resident
/// longest. Inserting a page that is already resident replaces its entry and
/// refreshes its age, so a page occupies at most one slot.
pub struct Tlb {
    entries: VecDeque<TlbEntry>,
    capacity: usize,
}

impl Tlb {
    pub fn new(capacity: usize) -> Self {
        Tlb {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Look up the frame cached for `page`, scanning oldest to newest.
    /// No side effect on residency or order.
    pub fn lookup(&self, page: u32) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.page == page)
            .map(|entry| entry.frame)
    }

    /// Admit a mapping, evicting the oldest resident entry if at capacity.
    ///
    /// If `page` is already resident its old entry is removed first, so the
    /// new mapping lands as the newest entry without consuming a second slot.
    pub fn insert(&mut self, page: u32, frame: u32) {
        if let Some(pos) = self.entries.iter().position(|entry| entry.page == page) {
            self.entries.remove(pos);
        } else if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(TlbEntry { page, frame });
    }

    /// Drop the entry for `page` if one is resident. Used when a frame is
    /// reclaimed so the buffer never serves a stale mapping.
    pub fn purge(&mut self, page: u32) {
        if let Some(pos) = self.entries.iter().position(|entry| entry.page == page) {
            self.entries.remove(pos);
        }
    }

    /// Resident pages, oldest first.
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|entry| entry.page)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
