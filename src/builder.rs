use crate::hash::{DEFAULT_SALT, HashFunction, HashWidth};
use crate::map::{Entry, FixedMap};
use hashbrown::HashMap;
use hashbrown::hash_map::Entry as Slot;
use std::hash::{BuildHasher, Hash};
use thiserror::Error;
use xxhash_rust::xxh3::Xxh3Builder;

/// Build parameters.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Seed of the default xxh3 primitive. Changing it reshuffles hashes, and
    /// with narrow widths, which keys collide.
    pub salt: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { salt: DEFAULT_SALT }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("expected exactly {expected} entries, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("duplicate key detected during build")]
    DuplicateKey,
    #[error("collision chain exceeded table capacity {capacity}")]
    ChainOverflow { capacity: usize },
}

pub struct Builder<S = Xxh3Builder> {
    hasher: S,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reseeds the default xxh3 primitive from `cfg`.
    pub fn with_config(mut self, cfg: BuildConfig) -> Self {
        self.hasher = Xxh3Builder::new().with_seed(cfg.salt);
        self
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            hasher: Xxh3Builder::new().with_seed(DEFAULT_SALT),
        }
    }
}

impl<S: BuildHasher> Builder<S> {
    /// Swaps in another hash primitive.
    pub fn with_hasher<T: BuildHasher>(self, hasher: T) -> Builder<T> {
        Builder { hasher }
    }

    /// Build the table. Exactly `N` entries with **unique** keys are required.
    pub fn build<K, V, const N: usize, W, I>(self, entries: I) -> Result<FixedMap<K, V, N, W, S>, MapError>
    where
        K: Hash + Eq,
        W: HashWidth,
        I: IntoIterator<Item = (K, V)>,
    {
        place(entries, HashFunction::with_hasher(self.hasher))
    }
}

/// Single pass over `entries` in input order.
///
/// The first entry seen for a hash takes the next front slot (counting up from
/// 0); later entries with that hash take the next collision slot (counting down
/// from `N - 1`) and are appended to the first entry's chain. The front region
/// is then sorted by hash.
pub(crate) fn place<K, V, const N: usize, W, S, I>(
    entries: I,
    hash_fn: HashFunction<W, S>,
) -> Result<FixedMap<K, V, N, W, S>, MapError>
where
    K: Hash + Eq,
    W: HashWidth,
    S: BuildHasher,
    I: IntoIterator<Item = (K, V)>,
{
    // 0) Collect and check the declared size before placing anything.
    let input: Vec<(K, V)> = entries.into_iter().collect();
    if input.len() != N {
        log::warn!("fixed map build rejected: expected {} entries, got {}", N, input.len());
        return Err(MapError::SizeMismatch {
            expected: N,
            actual: input.len(),
        });
    }

    // 1) Classify. `front` grows from slot 0, `tail[j]` is slot `N - 1 - j`.
    let mut front: Vec<Entry<K, V, W>> = Vec::with_capacity(N);
    let mut tail: Vec<Entry<K, V, W>> = Vec::new();
    let mut heads = HashMap::<W, usize>::with_capacity(N);

    for (key, value) in input {
        let hash = hash_fn.hash(&key);
        match heads.entry(hash) {
            Slot::Vacant(v) => {
                v.insert(front.len());
                front.push(Entry::new(key, value, hash));
            }
            Slot::Occupied(o) => {
                let head = &mut front[*o.get()];
                let duplicate = head.key == key || head.chain.iter().any(|&idx| tail[N - 1 - idx].key == key);
                if duplicate {
                    log::warn!("fixed map build rejected: duplicate key under hash {hash:?}");
                    return Err(MapError::DuplicateKey);
                }
                if head.chain.len() >= N {
                    return Err(MapError::ChainOverflow { capacity: N });
                }
                let slot = N - 1 - tail.len();
                log::trace!("hash {hash:?} collides, chaining slot {slot}");
                head.chain.push(slot);
                tail.push(Entry::new(key, value, hash));
            }
        }
    }

    // 2) Sort the front region. Hashes there are unique, and chain links only
    //    point into the collision region, which does not move.
    front.sort_unstable_by_key(|e| e.hash);

    let front_len = front.len();
    log::debug!(
        "fixed map built: {} entries, {front_len} distinct hashes, {} collisions",
        N,
        tail.len()
    );

    front.extend(tail.into_iter().rev());
    Ok(FixedMap {
        entries: front.into_boxed_slice(),
        front_len,
        hash_fn,
    })
}
