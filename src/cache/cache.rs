use bytes::Bytes;

/// Cache key type
pub type KeyType = Bytes;

/// Cache value associated with a key
pub type ValueType = Bytes;

/// Value and metadata exchanged with the store.
///
/// On `set` the `cas` field carries the caller's compare-and-swap token
/// (zero for an unconditional store); on `get` it carries the version the
/// store assigned to the resident entry.
#[derive(Clone, Debug)]
pub struct Record {
    pub value: ValueType,
    pub flags: u32,
    pub cas: u64,
}

impl Record {
    pub fn new(value: ValueType, flags: u32, cas: u64) -> Record {
        Record { value, flags, cas }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.flags == other.flags
    }
}

/// Result of a successful set operation.
/// `cas` is the version now stored under the key.
#[derive(Debug)]
pub struct SetStatus {
    pub cas: u64,
}
