use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use xxhash_rust::xxh3::Xxh3Builder;

/// Base salt for the default xxh3 primitive.
pub const DEFAULT_SALT: u64 = 0xC0FF_EE00_D15E_A5E;

/// Unsigned integer a key hash is narrowed to.
///
/// Narrowing is plain truncation of the 64-bit primitive output. Narrow widths
/// (`u8`, `u16`) collide often, which is how the collision chains get exercised.
pub trait HashWidth: Copy + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    const BITS: u32;

    fn truncate(full: u64) -> Self;
}

macro_rules! impl_hash_width {
    ($($t:ty),*) => {$(
        impl HashWidth for $t {
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn truncate(full: u64) -> Self {
                full as $t
            }
        }
    )*};
}

impl_hash_width!(u8, u16, u32, u64, u128, usize);

/// Maps keys to `W`-wide hashes through an injectable [`BuildHasher`].
///
/// Stateless apart from the primitive itself: equal keys always hash equally
/// for the same `HashFunction` value.
pub struct HashFunction<W, S = Xxh3Builder> {
    state: S,
    _width: PhantomData<fn() -> W>,
}

impl<W: HashWidth> HashFunction<W> {
    /// xxh3 seeded with [`DEFAULT_SALT`].
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SALT)
    }

    /// Keyed xxh3.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_hasher(Xxh3Builder::new().with_seed(seed))
    }
}

impl<W: HashWidth> Default for HashFunction<W> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "ahash")]
impl<W: HashWidth> HashFunction<W, ahash::RandomState> {
    /// aHash with fixed seeds, so the table layout is reproducible across runs.
    pub fn ahash_with_seeds(k0: u64, k1: u64, k2: u64, k3: u64) -> Self {
        Self::with_hasher(ahash::RandomState::with_seeds(k0, k1, k2, k3))
    }
}

impl<W: HashWidth, S: BuildHasher> HashFunction<W, S> {
    pub fn with_hasher(state: S) -> Self {
        Self {
            state,
            _width: PhantomData,
        }
    }

    /// Hash of `key` at width `W`.
    #[inline]
    pub fn hash<Q: Hash + ?Sized>(&self, key: &Q) -> W {
        W::truncate(self.full_hash(key))
    }

    /// Untruncated primitive output.
    #[inline]
    pub fn full_hash<Q: Hash + ?Sized>(&self, key: &Q) -> u64 {
        self.state.hash_one(key)
    }

    pub fn hasher(&self) -> &S {
        &self.state
    }
}

impl<W, S: Clone> Clone for HashFunction<W, S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            _width: PhantomData,
        }
    }
}

impl<W: HashWidth, S> fmt::Debug for HashFunction<W, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashFunction")
            .field("bits", &W::BITS)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::hash::Hasher;

    /// Hashes integers to themselves; byte input is folded little-endian.
    #[derive(Clone, Copy, Default)]
    pub(crate) struct IdentityState;

    #[derive(Default)]
    pub(crate) struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }
        fn write(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.0 = self.0.rotate_left(8) ^ b as u64;
            }
        }
        fn write_u8(&mut self, i: u8) {
            self.0 = i as u64;
        }
        fn write_u32(&mut self, i: u32) {
            self.0 = i as u64;
        }
        fn write_u64(&mut self, i: u64) {
            self.0 = i;
        }
        fn write_i32(&mut self, i: i32) {
            self.0 = i as u64;
        }
        fn write_i64(&mut self, i: i64) {
            self.0 = i as u64;
        }
    }

    impl BuildHasher for IdentityState {
        type Hasher = IdentityHasher;

        fn build_hasher(&self) -> IdentityHasher {
            IdentityHasher::default()
        }
    }

    #[test]
    fn identity_narrowed_to_u8() {
        let h = HashFunction::<u8, _>::with_hasher(IdentityState);
        assert_eq!(h.hash(&1i32), 1);
        assert_eq!(h.hash(&2i32), 2);
        assert_eq!(h.hash(&3i32), 3);
    }

    #[test]
    fn narrowing_is_truncation() {
        let wide = HashFunction::<u64>::new();
        let narrow = HashFunction::<u8>::new();
        let short = HashFunction::<u16>::new();
        for key in ["One", "Two", "Three", "krumld", "xqzrbn"] {
            let full = wide.hash(key);
            assert_eq!(narrow.hash(key), full as u8);
            assert_eq!(short.hash(key), full as u16);
            assert_eq!(wide.full_hash(key), full);
        }
    }

    #[test]
    fn deterministic_and_borrow_consistent() {
        let h = HashFunction::<u32>::new();
        let owned = String::from("Three");
        assert_eq!(h.hash(&owned), h.hash("Three"));
        assert_eq!(h.hash(&owned), h.clone().hash(&owned));
    }

    #[test]
    fn seed_changes_hash() {
        let a = HashFunction::<u64>::with_seed(1);
        let b = HashFunction::<u64>::with_seed(2);
        assert_ne!(a.hash("key"), b.hash("key"));
    }

    #[cfg(feature = "ahash")]
    #[test]
    fn ahash_with_fixed_seeds_is_reproducible() {
        let a = HashFunction::<u64, _>::ahash_with_seeds(1, 2, 3, 4);
        let b = HashFunction::<u64, _>::ahash_with_seeds(1, 2, 3, 4);
        assert_eq!(a.hash("key"), b.hash("key"));
    }
}
