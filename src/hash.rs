use core::hash::BuildHasher;
use core::hash::Hash;

/// A hash function producing the 32-bit codes used to pick a key's home bin.
///
/// Equal keys must produce equal codes. The function is fixed when a map is
/// constructed and travels with it through clones and moves.
///
/// Any `Fn(&K) -> u32` is a `HashFn<K>`, so closures and function pointers
/// can be passed directly:
///
/// ```rust
/// use bin_map::BinMap;
///
/// let mut map = BinMap::with_hasher(|key: &String| key.len() as u32);
/// map.insert("a".to_string(), 1);
/// assert_eq!(map.get(&"a".to_string()), Some(&1));
/// ```
pub trait HashFn<K: ?Sized> {
    /// Computes the hash code for `key`.
    fn hash(&self, key: &K) -> u32;
}

impl<K, F> HashFn<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u32,
{
    #[inline(always)]
    fn hash(&self, key: &K) -> u32 {
        self(key)
    }
}

/// Adapts a [`BuildHasher`] into a [`HashFn`] for every `Hash` key type.
///
/// The 64-bit output is folded onto 32 bits so the high half still
/// contributes to bin selection.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildHashFn<S> {
    hash_builder: S,
}

impl<S> BuildHashFn<S> {
    /// Wraps the given hasher builder.
    pub const fn new(hash_builder: S) -> Self {
        Self { hash_builder }
    }

    /// Returns the wrapped hasher builder.
    pub fn hash_builder(&self) -> &S {
        &self.hash_builder
    }
}

impl<K, S> HashFn<K> for BuildHashFn<S>
where
    K: Hash + ?Sized,
    S: BuildHasher,
{
    #[inline(always)]
    fn hash(&self, key: &K) -> u32 {
        fold(self.hash_builder.hash_one(key))
    }
}

#[inline(always)]
fn fold(hash: u64) -> u32 {
    (hash ^ (hash >> 32)) as u32
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used by [`DefaultHashFn`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used by [`DefaultHashFn`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// Placeholder hasher builder when neither `foldhash` nor `std` is
        /// enabled. It cannot be constructed, so maps must be given a hash
        /// function explicitly.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}

/// The hash function maps use unless given another one.
pub type DefaultHashFn = BuildHashFn<DefaultHashBuilder>;
