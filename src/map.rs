use crate::builder::{self, MapError};
use crate::hash::{HashFunction, HashWidth};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use xxhash_rust::xxh3::Xxh3Builder;

/// One stored record.
///
/// `chain` holds the slot indices of entries that share this entry's hash but
/// carry a different key. Chains are one level deep: members never carry a
/// chain of their own.
#[derive(Clone)]
pub(crate) struct Entry<K, V, W> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: W,
    pub(crate) chain: Vec<usize>,
}

impl<K, V, W> Entry<K, V, W> {
    pub(crate) fn new(key: K, value: V, hash: W) -> Self {
        Self {
            key,
            value,
            hash,
            chain: Vec::new(),
        }
    }
}

/// Immutable lookup table over exactly `N` entries.
///
/// Layout after construction:
/// - slots `0..=pivot` (front region) hold the first entry seen for every
///   distinct hash, sorted by ascending hash;
/// - slots `pivot + 1..N` (collision region) hold the remaining entries, filled
///   from the back, reachable only through a front entry's chain.
///
/// Lookups are O(log N) probes over the front region plus a linear scan of at
/// most one chain.
#[derive(Clone)]
pub struct FixedMap<K, V, const N: usize, W = u64, S = Xxh3Builder> {
    pub(crate) entries: Box<[Entry<K, V, W>]>,
    pub(crate) front_len: usize,
    pub(crate) hash_fn: HashFunction<W, S>,
}

impl<K, V, const N: usize, W> FixedMap<K, V, N, W>
where
    K: Hash + Eq,
    W: HashWidth,
{
    /// Builds the table with the default xxh3 hash function.
    ///
    /// Fails if `entries` does not yield exactly `N` pairs or repeats a key.
    pub fn new<I>(entries: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::with_hash_function(entries, HashFunction::new())
    }
}

impl<K, V, const N: usize, W, S> FixedMap<K, V, N, W, S>
where
    K: Hash + Eq,
    W: HashWidth,
    S: BuildHasher,
{
    pub fn with_hash_function<I>(entries: I, hash_fn: HashFunction<W, S>) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        builder::place::<K, V, N, W, S, I>(entries, hash_fn)
    }

    /// Value stored under `key`, or `None` if no entry carries that key.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|idx| &self.entries[idx].value)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).map(|idx| {
            let entry = &self.entries[idx];
            (&entry.key, &entry.value)
        })
    }

    #[inline]
    pub fn exists<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Slot index holding `key`.
    fn find<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pos = self.probe(self.hash_fn.hash(key))?;
        let head = &self.entries[pos];
        if head.key.borrow() == key {
            return Some(pos);
        }
        head.chain
            .iter()
            .copied()
            .find(|&idx| self.entries[idx].key.borrow() == key)
    }

    /// Front-region slot whose hash equals `hash`.
    ///
    /// Starts at `front_len / 2` and jumps by half the current position
    /// (`pos ± pos / 2`, a single step when `pos` is 0 or 1). Every probe also
    /// narrows the inclusive window `[lo, hi]` still able to hold `hash`; a jump
    /// that lands outside it restarts from the window midpoint. The window
    /// shrinks on every probe, so the walk ends after at most `front_len` probes.
    fn probe(&self, hash: W) -> Option<usize> {
        let pivot = self.front_len.checked_sub(1)?;
        let (mut lo, mut hi) = (0, pivot);
        let mut pos = self.front_len / 2;
        loop {
            let step = (pos / 2).max(1);
            match self.entries[pos].hash.cmp(&hash) {
                Ordering::Equal => return Some(pos),
                Ordering::Greater => {
                    if pos == lo {
                        return None;
                    }
                    hi = pos - 1;
                    pos -= step;
                }
                Ordering::Less => {
                    if pos == hi {
                        return None;
                    }
                    lo = pos + 1;
                    pos += step;
                }
            }
            if pos < lo || pos > hi {
                pos = lo + (hi - lo) / 2;
            }
        }
    }
}

impl<K, V, const N: usize, W, S> FixedMap<K, V, N, W, S> {
    /// Declared capacity; always equal to [`len`](Self::len).
    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the last front-region slot. `None` only for an empty table.
    pub fn pivot(&self) -> Option<usize> {
        self.front_len.checked_sub(1)
    }

    /// Number of entries living in the collision region.
    pub fn collision_count(&self) -> usize {
        self.entries.len() - self.front_len
    }

    /// Entries in storage order: front region by ascending hash, then the
    /// collision region.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter().map(|e| (&e.key, &e.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.iter().map(|e| &e.value)
    }

    pub fn hash_function(&self) -> &HashFunction<W, S> {
        &self.hash_fn
    }
}

impl<K, V, const N: usize, W, S> fmt::Debug for FixedMap<K, V, N, W, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
