//! Lazy, cursor-driven iteration over a hash.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use hashproxy_core::{MATCH_ALL, SCAN_START};

use crate::error::Result;
use crate::hash::RemoteHash;
use crate::pool::ConnectionPool;

/// Iterator over `(field, value)` pairs, fetched one scan step at a time.
///
/// Single pass: it starts at cursor 0 and finishes after the step that
/// returns cursor 0. A store error is yielded once and ends the iteration.
pub struct HashEntries<'a, P: ConnectionPool> {
    hash: &'a RemoteHash<P>,
    slice_size: usize,
    cursor: u64,
    buffered: VecDeque<(String, String)>,
    exhausted: bool,
}

impl<'a, P: ConnectionPool> HashEntries<'a, P> {
    pub(crate) fn new(hash: &'a RemoteHash<P>, slice_size: usize) -> Self {
        Self {
            hash,
            slice_size: slice_size.max(1),
            cursor: SCAN_START,
            buffered: VecDeque::new(),
            exhausted: false,
        }
    }
}

impl<P: ConnectionPool> Iterator for HashEntries<'_, P> {
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.buffered.pop_front() {
                return Some(Ok(entry));
            }
            if self.exhausted {
                return None;
            }
            match self.hash.scan(self.cursor, self.slice_size, MATCH_ALL) {
                Ok(page) => {
                    self.exhausted = page.is_last();
                    self.cursor = page.cursor;
                    self.buffered.extend(page.entries);
                }
                Err(err) => {
                    self.exhausted = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<P: ConnectionPool> FusedIterator for HashEntries<'_, P> {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use hashproxy_core::{MemoryConnection, MemoryStore};

    use crate::pool::Pool;
    use crate::HashError;

    type MemoryHash = crate::RemoteHash<Pool<MemoryConnection>>;

    #[test]
    fn empty_hash_yields_nothing() {
        let hash = MemoryHash::direct("h", MemoryStore::new().connect()).unwrap();
        assert_eq!(hash.entries().count(), 0);
    }

    #[test]
    fn yields_every_entry_exactly_once_across_pages() {
        let hash = MemoryHash::direct("h", MemoryStore::new().connect()).unwrap();
        let pairs: Vec<(String, String)> =
            (0..37).map(|i| (format!("field{i}"), i.to_string())).collect();
        hash.set(pairs.clone()).unwrap();

        let seen: Vec<(String, String)> = hash.enumerator(4).map(Result::unwrap).collect();
        assert_eq!(seen.len(), 37);
        let seen: HashMap<String, String> = seen.into_iter().collect();
        assert_eq!(seen, pairs.into_iter().collect::<HashMap<_, _>>());
    }

    #[test]
    fn zero_slice_size_still_progresses() {
        let hash = MemoryHash::direct("h", MemoryStore::new().connect()).unwrap();
        hash.set([("a", "1"), ("b", "2")]).unwrap();
        assert_eq!(hash.enumerator(0).count(), 2);
    }

    #[test]
    fn error_is_yielded_once_then_fused() {
        let store = MemoryStore::new();
        store.set_string("h", "scalar");
        let hash = MemoryHash::direct("h", store.connect()).unwrap();

        let mut entries = hash.entries();
        assert!(matches!(entries.next(), Some(Err(HashError::Remote(_)))));
        assert!(entries.next().is_none());
        assert!(entries.next().is_none());
    }
}
