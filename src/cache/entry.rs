use bytes::Bytes;

use super::lru_list::LruLink;

/// Bytes the opaque flags field contributes to an entry's accounted size.
pub(crate) const FLAGS_SIZE: usize = std::mem::size_of::<u32>();

/// A resident key/value pair together with its position in the recency list.
///
/// The version is assigned once by the store when the entry is created and
/// never changes; overwriting a key produces a fresh entry with a fresh
/// version.
pub(crate) struct Entry {
    pub(crate) key: Bytes,
    pub(crate) value: Bytes,
    pub(crate) flags: u32,
    pub(crate) version: u64,
    pub(crate) link: LruLink,
}

impl Entry {
    pub(crate) fn new(key: Bytes, value: Bytes, flags: u32, version: u64) -> Entry {
        Entry {
            key,
            value,
            flags,
            version,
            link: LruLink::default(),
        }
    }

    /// Size accounted against the store budget: flags + key + value.
    pub(crate) fn size(&self) -> u64 {
        (FLAGS_SIZE + self.key.len() + self.value.len()) as u64
    }
}
