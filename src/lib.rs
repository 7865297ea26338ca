//! fixed_map — immutable, fixed-capacity key/value table.
//!
//! - Build once from exactly `N` entries with **unique** keys.
//! - Entries are kept in one array: first entry per hash in front, sorted by
//!   hash; colliding entries at the tail, chained from their front entry.
//! - Lookups probe the sorted front region, then scan at most one chain.
//! - Hash width `W` is a type parameter; narrow widths (`u8`) force collisions.
//!
//! ```
//! use fixed_map::FixedMap;
//!
//! let map: FixedMap<&str, char, 3, u8> = FixedMap::new([("Two", 'b'), ("Three", 'c'), ("One", 'a')])?;
//! assert_eq!(map.get("One"), Some(&'a'));
//! assert!(!map.exists("Four"));
//! # Ok::<(), fixed_map::MapError>(())
//! ```

mod builder;
mod hash;
mod map;

pub use builder::{BuildConfig, Builder, MapError};
pub use hash::{DEFAULT_SALT, HashFunction, HashWidth};
pub use map::FixedMap;
pub use xxhash_rust::xxh3::Xxh3Builder;
