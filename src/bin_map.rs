use core::alloc::Layout;
use core::fmt::Debug;
use core::iter::FusedIterator;
use core::mem;
use core::ops::Index;

use allocator_api2::vec;

use crate::allocator::Allocator;
use crate::allocator::Global;
use crate::bin_table;
use crate::bin_table::BinTable;
use crate::bin_table::Probe;
use crate::error::Fallibility;
use crate::error::TryReserveError;
use crate::hash::DefaultHashFn;
use crate::hash::HashFn;

/// An insertion-ordered hash map.
///
/// Mappings live contiguously in a dense pair store, in the order their keys
/// were first inserted. A separate power-of-two table of bins indexes the
/// store; each bin holds either a store position or an empty marker, and
/// collisions are resolved by probing forward one bin at a time, wrapping at
/// the end of the table.
///
/// The bin table starts at 32 bins. Before a new key is added, the table
/// doubles if at least 70% of its bins are in use; before a key is removed,
/// it halves if at most 30% are in use and it is larger than 32 bins.
///
/// Removing a mapping shifts every later mapping down one position in the
/// store, so removal is linear in the size of the map. Iteration is a plain
/// walk over the store and yields mappings in insertion order.
///
/// `H` turns keys into 32-bit hash codes; see [`HashFn`]. `A` supplies memory
/// for the pair store and the bin table, which each get their own allocator
/// instance.
///
/// # Examples
///
/// ```rust
/// use bin_map::BinMap;
///
/// let mut textures: BinMap<&str, u32> = BinMap::new();
/// textures.insert("albedo", 3);
/// textures.insert("normal", 7);
/// textures.insert("albedo", 4);
///
/// assert_eq!(textures[&"albedo"], 4);
/// assert_eq!(textures.keys().copied().collect::<Vec<_>>(), ["albedo", "normal"]);
/// ```
#[derive(Clone)]
pub struct BinMap<K, V, H = DefaultHashFn, A: Allocator = Global> {
    bins: BinTable<A>,
    pairs: vec::Vec<(K, V), A>,
    hash_fn: H,
}

/// Makes room in `pairs` for `additional` more mappings.
fn reserve_pairs<T, A: Allocator>(
    pairs: &mut vec::Vec<T, A>,
    additional: usize,
    fallibility: Fallibility,
) -> Result<(), TryReserveError> {
    let required = pairs
        .len()
        .checked_add(additional)
        .ok_or_else(|| fallibility.capacity_overflow())?;
    if required <= pairs.capacity() {
        return Ok(());
    }

    let layout = Layout::array::<T>(required).map_err(|_| fallibility.capacity_overflow())?;
    pairs
        .try_reserve_exact(additional)
        .map_err(|_| fallibility.alloc_err(layout))
}

impl<K, V, H, A> Debug for BinMap<K, V, H, A>
where
    K: Debug,
    V: Debug,
    A: Allocator,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H> BinMap<K, V, H, Global> {
    /// Creates an empty map that hashes keys with `hash_fn`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut map = BinMap::with_hasher(|key: &u32| key.wrapping_mul(0x9E37_79B9));
    /// map.insert(10, "ten");
    /// assert_eq!(map.get(&10), Some(&"ten"));
    /// ```
    pub fn with_hasher(hash_fn: H) -> Self {
        Self::with_capacity_hasher_and_allocators(0, hash_fn, Global, Global)
    }

    /// Creates an empty map with `capacity` bins, rounded up to a power of
    /// two and at least 32.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let map: BinMap<u32, u32, _> = BinMap::with_capacity_and_hasher(100, |key: &u32| *key);
    /// assert_eq!(map.bin_count(), 128);
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_fn: H) -> Self {
        Self::with_capacity_hasher_and_allocators(capacity, hash_fn, Global, Global)
    }
}

impl<K, V, H: Default> BinMap<K, V, H, Global> {
    /// Creates an empty map with 32 bins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let map: BinMap<u32, String> = BinMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.bin_count(), 32);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(H::default())
    }

    /// Creates an empty map with `capacity` bins, rounded up to a power of
    /// two and at least 32.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, H::default())
    }
}

impl<K, V, H: Default, A: Allocator> BinMap<K, V, H, A> {
    /// Creates an empty map drawing pair storage from `pair_alloc` and bin
    /// storage from `bin_alloc`.
    pub fn with_allocators(pair_alloc: A, bin_alloc: A) -> Self {
        Self::with_capacity_hasher_and_allocators(0, H::default(), pair_alloc, bin_alloc)
    }

    /// Like [`with_allocators`](BinMap::with_allocators), starting with
    /// `capacity` bins rounded up to a power of two.
    pub fn with_capacity_and_allocators(capacity: usize, pair_alloc: A, bin_alloc: A) -> Self {
        Self::with_capacity_hasher_and_allocators(capacity, H::default(), pair_alloc, bin_alloc)
    }
}

impl<K, V, H, A: Allocator> BinMap<K, V, H, A> {
    /// Creates an empty map with every collaborator supplied.
    ///
    /// The bin count is `capacity` rounded up to a power of two, and at least
    /// 32. The pair store reserves room for `capacity` mappings up front.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds 2^31, and aborts through
    /// [`handle_alloc_error`](alloc::alloc::handle_alloc_error) if either
    /// allocator fails.
    pub fn with_capacity_hasher_and_allocators(
        capacity: usize,
        hash_fn: H,
        pair_alloc: A,
        bin_alloc: A,
    ) -> Self {
        Self::try_with_capacity_hasher_and_allocators(
            capacity,
            hash_fn,
            pair_alloc,
            bin_alloc,
            Fallibility::Infallible,
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn try_with_capacity_hasher_and_allocators(
        capacity: usize,
        hash_fn: H,
        pair_alloc: A,
        bin_alloc: A,
        fallibility: Fallibility,
    ) -> Result<Self, TryReserveError> {
        let bin_count =
            bin_table::bins_for_capacity(capacity).ok_or_else(|| fallibility.capacity_overflow())?;
        let bins = BinTable::try_with_bins_in(bin_count, bin_alloc, fallibility)?;
        let mut pairs = vec::Vec::new_in(pair_alloc);
        reserve_pairs(&mut pairs, capacity, fallibility)?;
        Ok(Self {
            bins,
            pairs,
            hash_fn,
        })
    }

    /// Returns the number of mappings.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut map: BinMap<u8, u8> = BinMap::new();
    /// map.insert(1, 1);
    /// map.insert(1, 2);
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the map holds no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns the number of bins in the index table. Always a power of two
    /// and at least 32.
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bins.bin_count() as usize
    }

    /// Returns how many mappings the map holds before the next insertion of
    /// a new key grows the bin table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let map: BinMap<u32, u32> = BinMap::new();
    /// assert_eq!(map.capacity(), 23);
    /// ```
    #[inline]
    pub fn capacity(&self) -> usize {
        bin_table::max_load(self.bins.bin_count())
    }

    /// Returns the map's hash function.
    pub fn hasher(&self) -> &H {
        &self.hash_fn
    }

    /// Removes every mapping. The bin count is kept; nothing shrinks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut map: BinMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    /// let bins = map.bin_count();
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.bin_count(), bins);
    /// ```
    pub fn clear(&mut self) {
        self.bins.clear();
        self.pairs.clear();
    }

    /// Iterates over the mappings in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut map: BinMap<&str, i32> = BinMap::new();
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// let pairs: Vec<_> = map.iter().collect();
    /// assert_eq!(pairs, [(&"b", &2), (&"a", &1)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.pairs.as_slice().iter(),
        }
    }

    /// Iterates over the mappings in insertion order with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.pairs.as_mut_slice().iter_mut(),
        }
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Iterates over the values in insertion order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Iterates mutably over the values in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut map: BinMap<u32, u32> = (1..=3).map(|i| (i, i)).collect();
    /// for value in map.values_mut() {
    ///     *value *= 10;
    /// }
    /// assert_eq!(map.values().copied().collect::<Vec<_>>(), [10, 20, 30]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns a cursor at the first mapping, or at the end position if the
    /// map is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut map: BinMap<char, u32> = BinMap::new();
    /// map.insert('x', 1);
    /// map.insert('y', 2);
    ///
    /// let mut cursor = map.cursor_front();
    /// let end = map.cursor_end();
    /// let mut seen = Vec::new();
    /// while cursor != end {
    ///     seen.push(*cursor.key().unwrap());
    ///     cursor.move_next();
    /// }
    /// assert_eq!(seen, ['x', 'y']);
    /// ```
    pub fn cursor_front(&self) -> Cursor<'_, K, V, A> {
        Cursor {
            pairs: &self.pairs,
            index: 0,
        }
    }

    /// Returns a cursor at the end position, one past the last mapping.
    pub fn cursor_end(&self) -> Cursor<'_, K, V, A> {
        Cursor {
            pairs: &self.pairs,
            index: self.pairs.len(),
        }
    }

    /// Removes every mapping, yielding them in insertion order.
    ///
    /// The map is empty once this returns, even if the iterator is leaked.
    /// The bin count is kept.
    pub fn drain(&mut self) -> Drain<'_, K, V, A> {
        self.bins.clear();
        Drain {
            inner: self.pairs.drain(..),
        }
    }

    /// Appends a mapping at the end of the store, referenced from the vacant
    /// `bin`. Returns its store index.
    fn push_at(&mut self, bin: u32, key: K, value: V) -> usize {
        let index = self.pairs.len();
        self.pairs.push((key, value));
        self.bins.occupy(bin, index as u32);
        index
    }
}

impl<K, V, H, A> BinMap<K, V, H, A>
where
    K: Eq,
    H: HashFn<K>,
    A: Allocator + Clone,
{
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        self.hash_fn.hash(key)
    }

    #[inline]
    fn find(&self, hash: u32, key: &K) -> Probe {
        let pairs = self.pairs.as_slice();
        self.bins.find(hash, |index| pairs[index as usize].0 == *key)
    }

    /// The first empty bin on `hash`'s probe sequence.
    #[inline]
    fn vacant_bin(&self, hash: u32) -> u32 {
        match self.bins.find(hash, |_| false) {
            Probe::Vacant { bin } => bin,
            Probe::Occupied { .. } => unreachable!(),
        }
    }

    #[inline]
    fn needs_growth(&self) -> bool {
        bin_table::should_grow(self.bins.in_use(), self.bins.bin_count())
    }

    fn grow(&mut self) {
        let fallibility = Fallibility::Infallible;
        self.bins
            .bin_count()
            .checked_mul(2)
            .ok_or_else(|| fallibility.capacity_overflow())
            .and_then(|bin_count| self.rehash(bin_count, fallibility))
            .unwrap_or_else(|_| unreachable!());
    }

    /// Halves the bin table if occupancy is at or below the shrink threshold.
    /// Returns whether the bins were rebuilt.
    fn shrink_if_sparse(&mut self) -> bool {
        if !bin_table::should_shrink(self.bins.in_use(), self.bins.bin_count()) {
            return false;
        }

        let bin_count = self.bins.bin_count() / 2;
        match self.rehash(bin_count, Fallibility::Fallible) {
            Ok(()) => true,
            Err(err) => {
                log::debug!(
                    "keeping {} bins after failed shrink to {}: {}",
                    self.bins.bin_count(),
                    bin_count,
                    err
                );
                false
            }
        }
    }

    fn rehash(&mut self, bin_count: u32, fallibility: Fallibility) -> Result<(), TryReserveError> {
        let old_bin_count = self.bins.bin_count();
        let hash_fn = &self.hash_fn;
        let hashes = self.pairs.as_slice().iter().map(|(key, _)| hash_fn.hash(key));
        self.bins.rebuild(bin_count, hashes, fallibility)?;

        log::trace!(
            "rehashed {} mappings from {} to {} bins",
            self.pairs.len(),
            old_bin_count,
            bin_count
        );
        Ok(())
    }

    /// Removes the mapping at store `index`, referenced from `bin`.
    fn remove_at(&mut self, bin: u32, index: u32) -> (K, V) {
        let pair = self.pairs.remove(index as usize);
        let hash_fn = &self.hash_fn;
        let pairs = self.pairs.as_slice();
        self.bins
            .vacate(bin, index, |at| hash_fn.hash(&pairs[at as usize].0));
        pair
    }

    /// Inserts a mapping, replacing the value of an existing equal key.
    ///
    /// An existing key keeps its position in insertion order and the stored
    /// key is not replaced. A new key is appended at the end, growing the bin
    /// table first if at least 70% of the bins are in use.
    ///
    /// Returns the previous value, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut map: BinMap<String, String> = BinMap::new();
    /// assert_eq!(map.insert("a".into(), "a".into()), None);
    /// assert_eq!(map.insert("a".into(), "b".into()), Some("a".into()));
    /// assert_eq!(map[&"a".to_string()], "b");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash(&key);
        match self.find(hash, &key) {
            Probe::Occupied { index, .. } => {
                let slot = &mut self.pairs.as_mut_slice()[index as usize].1;
                Some(mem::replace(slot, value))
            }
            Probe::Vacant { mut bin } => {
                if self.needs_growth() {
                    self.grow();
                    bin = self.vacant_bin(hash);
                }
                self.push_at(bin, key, value);
                None
            }
        }
    }

    /// Returns a reference to the value mapped to `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut map: BinMap<u32, &str> = BinMap::new();
    /// map.insert(1, "one");
    /// assert_eq!(map.get(&1), Some(&"one"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        match self.find(self.hash(key), key) {
            Probe::Occupied { index, .. } => {
                let (key, value) = &self.pairs.as_slice()[index as usize];
                Some((key, value))
            }
            Probe::Vacant { .. } => None,
        }
    }

    /// Returns a mutable reference to the value mapped to `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.find(self.hash(key), key) {
            Probe::Occupied { index, .. } => Some(&mut self.pairs.as_mut_slice()[index as usize].1),
            Probe::Vacant { .. } => None,
        }
    }

    /// Returns `true` if `key` is mapped.
    pub fn contains_key(&self, key: &K) -> bool {
        matches!(self.find(self.hash(key), key), Probe::Occupied { .. })
    }

    /// Swaps `key` in for an equal stored key in place. Hands `key` back if
    /// no equal key is mapped.
    pub(crate) fn replace_key(&mut self, key: K) -> Result<K, K> {
        match self.find(self.hash(&key), &key) {
            Probe::Occupied { index, .. } => {
                let stored = &mut self.pairs.as_mut_slice()[index as usize].0;
                Ok(mem::replace(stored, key))
            }
            Probe::Vacant { .. } => Err(key),
        }
    }

    /// Removes `key`, returning its value.
    ///
    /// The shrink check runs first, against the occupancy before removal,
    /// and it runs even when `key` turns out to be absent. Later mappings
    /// keep their relative order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut map: BinMap<u32, char> = BinMap::new();
    /// map.insert(1, 'a');
    /// map.insert(2, 'b');
    /// map.insert(3, 'c');
    /// assert_eq!(map.remove(&2), Some('b'));
    /// assert_eq!(map.remove(&2), None);
    /// assert_eq!(map.values().copied().collect::<String>(), "ac");
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key`, returning the stored key and its value.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.shrink_if_sparse();
        let hash = self.hash(key);
        match self.find(hash, key) {
            Probe::Occupied { bin, index } => Some(self.remove_at(bin, index)),
            Probe::Vacant { .. } => None,
        }
    }

    /// Gets the entry for `key` for in-place access.
    ///
    /// The growth check runs first, whether or not `key` is already mapped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut words: BinMap<&str, usize> = BinMap::new();
    /// for word in "the cat saw the dog".split(' ') {
    ///     *words.entry(word).or_insert(0) += 1;
    /// }
    /// assert_eq!(words[&"the"], 2);
    /// assert_eq!(words.len(), 4);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, H, A> {
        if self.needs_growth() {
            self.grow();
        }

        let hash = self.hash(&key);
        match self.find(hash, &key) {
            Probe::Occupied { bin, index } => Entry::Occupied(OccupiedEntry {
                map: self,
                bin,
                index,
            }),
            Probe::Vacant { bin } => Entry::Vacant(VacantEntry {
                map: self,
                bin,
                key,
            }),
        }
    }

    /// Returns the value mapped to `key`, first inserting `V::default()` if
    /// the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    ///
    /// let mut listeners: BinMap<&str, Vec<u32>> = BinMap::new();
    /// listeners.get_or_insert_default("resize").push(1);
    /// listeners.get_or_insert_default("resize").push(2);
    /// assert_eq!(listeners[&"resize"], [1, 2]);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Reserves room for at least `additional` more mappings without growing.
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow and aborts if an allocator fails.
    pub fn reserve(&mut self, additional: usize) {
        self.reserve_inner(additional, Fallibility::Infallible)
            .unwrap_or_else(|_| unreachable!());
    }

    /// Reserves room for at least `additional` more mappings, returning an
    /// error instead of aborting.
    ///
    /// On failure every mapping is retained and the old bin table remains in
    /// use.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinMap;
    /// use bin_map::TryReserveError;
    ///
    /// let mut map: BinMap<u64, u64> = BinMap::new();
    /// map.try_reserve(1000).unwrap();
    /// assert!(map.capacity() >= 1000);
    /// assert_eq!(map.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.reserve_inner(additional, Fallibility::Fallible)
    }

    fn reserve_inner(
        &mut self,
        additional: usize,
        fallibility: Fallibility,
    ) -> Result<(), TryReserveError> {
        let required = self
            .len()
            .checked_add(additional)
            .ok_or_else(|| fallibility.capacity_overflow())?;
        let bin_count =
            bin_table::bins_for_load(required).ok_or_else(|| fallibility.capacity_overflow())?;

        reserve_pairs(&mut self.pairs, additional, fallibility)?;
        if bin_count > self.bins.bin_count() {
            self.rehash(bin_count, fallibility)?;
        }
        Ok(())
    }

    /// Shrinks the bin table to the smallest size that holds the current
    /// mappings, and trims spare pair storage.
    ///
    /// A failure to allocate the smaller bin table is logged and leaves the
    /// old bins in place.
    pub fn shrink_to_fit(&mut self) {
        if let Some(bin_count) = bin_table::bins_for_load(self.len())
            && bin_count < self.bins.bin_count()
            && let Err(err) = self.rehash(bin_count, Fallibility::Fallible)
        {
            log::debug!("keeping {} bins: {}", self.bins.bin_count(), err);
        }

        self.pairs.shrink_to_fit();
    }

    /// Counts occupied bins by their distance from the key's home bin.
    ///
    /// Index `d` of the result holds the number of mappings found `d` probes
    /// past their home bin.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        let pairs = self.pairs.as_slice();
        let mut histogram = alloc::vec::Vec::new();
        for (bin, &index) in self.bins.slots().iter().enumerate() {
            if index == bin_table::EMPTY {
                continue;
            }
            let hash = self.hash(&pairs[index as usize].0);
            let distance = self.bins.probe_distance(bin as u32, hash) as usize;
            if histogram.len() <= distance {
                histogram.resize(distance + 1, 0);
            }
            histogram[distance] += 1;
        }
        histogram
    }

    /// Summarizes the state of the bin table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let histogram = self.probe_histogram();
        let total: usize = histogram
            .iter()
            .enumerate()
            .map(|(distance, count)| distance * count)
            .sum();

        DebugStats {
            len: self.len(),
            bin_count: self.bin_count(),
            load_percent: bin_table::load_percent(self.bins.in_use(), self.bins.bin_count()),
            max_probe_distance: histogram.len().saturating_sub(1),
            mean_probe_distance: if self.is_empty() {
                0.0
            } else {
                total as f64 / self.len() as f64
            },
            allocated_bytes: self.bins.allocated_bytes()
                + self.pairs.capacity().saturating_mul(mem::size_of::<(K, V)>()),
        }
    }
}

/// A snapshot of bin table statistics from [`BinMap::debug_stats`].
#[cfg(any(test, feature = "stats"))]
#[derive(Clone, Debug, PartialEq)]
pub struct DebugStats {
    /// Number of mappings.
    pub len: usize,
    /// Number of bins.
    pub bin_count: usize,
    /// Occupied bins as a percentage of all bins, rounded down.
    pub load_percent: u32,
    /// Longest distance of any mapping from its home bin.
    pub max_probe_distance: usize,
    /// Average distance of a mapping from its home bin.
    pub mean_probe_distance: f64,
    /// Bytes held by the bin table and the pair store.
    pub allocated_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Prints the statistics to stdout.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("mappings:           {}", self.len);
        println!("bins:               {}", self.bin_count);
        println!("load:               {}%", self.load_percent);
        println!("max probe distance: {}", self.max_probe_distance);
        println!("mean probe distance: {:.3}", self.mean_probe_distance);
        println!("allocated bytes:    {}", self.allocated_bytes);
    }
}

impl<K, V, H, A> Default for BinMap<K, V, H, A>
where
    H: Default,
    A: Allocator + Default,
{
    fn default() -> Self {
        Self::with_capacity_hasher_and_allocators(0, H::default(), A::default(), A::default())
    }
}

impl<K, V, H, A> PartialEq for BinMap<K, V, H, A>
where
    K: Eq,
    V: PartialEq,
    H: HashFn<K>,
    A: Allocator + Clone,
{
    /// Maps are equal when they hold the same mappings, in any order.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| *value == *v))
    }
}

impl<K, V, H, A> Eq for BinMap<K, V, H, A>
where
    K: Eq,
    V: Eq,
    H: HashFn<K>,
    A: Allocator + Clone,
{
}

impl<K, V, H, A> Index<&K> for BinMap<K, V, H, A>
where
    K: Eq,
    H: HashFn<K>,
    A: Allocator + Clone,
{
    type Output = V;

    /// Returns the value mapped to `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not mapped.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key not present in map"),
        }
    }
}

impl<K, V, H, A> Extend<(K, V)> for BinMap<K, V, H, A>
where
    K: Eq,
    H: HashFn<K>,
    A: Allocator + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, H, A> FromIterator<(K, V)> for BinMap<K, V, H, A>
where
    K: Eq,
    H: HashFn<K> + Default,
    A: Allocator + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, H, A: Allocator> IntoIterator for BinMap<K, V, H, A> {
    type IntoIter = IntoIter<K, V, A>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.pairs.into_iter(),
        }
    }
}

impl<'a, K, V, H, A: Allocator> IntoIterator for &'a BinMap<K, V, H, A> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, H, A: Allocator> IntoIterator for &'a mut BinMap<K, V, H, A> {
    type IntoIter = IterMut<'a, K, V>;
    type Item = (&'a K, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// A view into a single entry of a map, from [`BinMap::entry`].
pub enum Entry<'a, K, V, H, A: Allocator = Global> {
    /// The key is mapped.
    Occupied(OccupiedEntry<'a, K, V, H, A>),
    /// The key is absent.
    Vacant(VacantEntry<'a, K, V, H, A>),
}

impl<'a, K, V, H, A: Allocator> Entry<'a, K, V, H, A> {
    /// Inserts `default` if the key is absent, then returns the value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the key is absent, then returns the
    /// value.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the key is mapped.
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V: Default, H, A: Allocator> Entry<'a, K, V, H, A> {
    /// Inserts `V::default()` if the key is absent, then returns the value.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(V::default)
    }
}

/// An entry whose key is absent. Growth has already happened, so inserting
/// never moves bins.
pub struct VacantEntry<'a, K, V, H, A: Allocator = Global> {
    map: &'a mut BinMap<K, V, H, A>,
    bin: u32,
    key: K,
}

impl<'a, K, V, H, A: Allocator> VacantEntry<'a, K, V, H, A> {
    /// Returns the key that would be inserted.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Takes back the key without inserting.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Appends the mapping and returns its value.
    pub fn insert(self, value: V) -> &'a mut V {
        let map = self.map;
        let index = map.push_at(self.bin, self.key, value);
        &mut map.pairs.as_mut_slice()[index].1
    }
}

/// An entry whose key is mapped.
pub struct OccupiedEntry<'a, K, V, H, A: Allocator = Global> {
    map: &'a mut BinMap<K, V, H, A>,
    bin: u32,
    index: u32,
}

impl<'a, K, V, H, A: Allocator> OccupiedEntry<'a, K, V, H, A> {
    /// Returns the stored key.
    pub fn key(&self) -> &K {
        &self.map.pairs.as_slice()[self.index as usize].0
    }

    /// Returns the value.
    pub fn get(&self) -> &V {
        &self.map.pairs.as_slice()[self.index as usize].1
    }

    /// Returns the value mutably.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.map.pairs.as_mut_slice()[self.index as usize].1
    }

    /// Converts the entry into a reference to the value that lives as long
    /// as the map borrow.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.map.pairs.as_mut_slice()[self.index as usize].1
    }

    /// Replaces the value, returning the old one.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }
}

impl<'a, K, V, H, A> OccupiedEntry<'a, K, V, H, A>
where
    K: Eq,
    H: HashFn<K>,
    A: Allocator + Clone,
{
    /// Removes the mapping, returning its value.
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Removes the mapping, returning the stored key and value.
    ///
    /// Like [`BinMap::remove`], the shrink check runs before removal.
    pub fn remove_entry(self) -> (K, V) {
        let map = self.map;
        let index = self.index;
        let mut bin = self.bin;
        if map.shrink_if_sparse() {
            let hash = map.hash(&map.pairs.as_slice()[index as usize].0);
            bin = match map.bins.find(hash, |at| at == index) {
                Probe::Occupied { bin, .. } => bin,
                Probe::Vacant { .. } => unreachable!(),
            };
        }
        map.remove_at(bin, index)
    }
}

/// A position within a map's insertion order, or the end position.
///
/// Two cursors are equal when they refer to the same map storage and the
/// same position.
pub struct Cursor<'a, K, V, A: Allocator = Global> {
    pairs: &'a vec::Vec<(K, V), A>,
    index: usize,
}

impl<'a, K, V, A: Allocator> Cursor<'a, K, V, A> {
    /// The position, counting from the first mapping. Equals the map's length
    /// at the end position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` at the end position.
    pub fn is_end(&self) -> bool {
        self.index == self.pairs.len()
    }

    /// The mapping at the cursor, or `None` at the end position.
    pub fn pair(&self) -> Option<(&'a K, &'a V)> {
        self.pairs.get(self.index).map(|(key, value)| (key, value))
    }

    /// The key at the cursor.
    pub fn key(&self) -> Option<&'a K> {
        self.pair().map(|(key, _)| key)
    }

    /// The value at the cursor.
    pub fn value(&self) -> Option<&'a V> {
        self.pair().map(|(_, value)| value)
    }

    /// Advances toward the end position. Returns `false` if already there.
    pub fn move_next(&mut self) -> bool {
        if self.is_end() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Steps back toward the first mapping. Returns `false` if already there.
    pub fn move_prev(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }
}

impl<K, V, A: Allocator> Clone for Cursor<'_, K, V, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, A: Allocator> Copy for Cursor<'_, K, V, A> {}

impl<K, V, A: Allocator> PartialEq for Cursor<'_, K, V, A> {
    /// Compares the identity of the stores, not their contents: cursors of
    /// two different maps are never equal, even when both maps are empty.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.pairs, other.pairs) && self.index == other.index
    }
}

impl<K, V, A: Allocator> Eq for Cursor<'_, K, V, A> {}

impl<K: Debug, V: Debug, A: Allocator> Debug for Cursor<'_, K, V, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index)
            .field("pair", &self.pair())
            .finish()
    }
}

/// Borrowing iterator over mappings in insertion order.
pub struct Iter<'a, K, V> {
    inner: core::slice::Iter<'a, (K, V)>,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over mappings in insertion order with mutable values.
pub struct IterMut<'a, K, V> {
    inner: core::slice::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (&*key, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, value)| (&*key, value))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Iterator over keys in insertion order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over values in insertion order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

/// Iterator over mutable values in insertion order.
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

/// Owning iterator over mappings in insertion order.
pub struct IntoIter<K, V, A: Allocator = Global> {
    inner: vec::IntoIter<(K, V), A>,
}

impl<K, V, A: Allocator> Iterator for IntoIter<K, V, A> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, A: Allocator> DoubleEndedIterator for IntoIter<K, V, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V, A: Allocator> ExactSizeIterator for IntoIter<K, V, A> {}
impl<K, V, A: Allocator> FusedIterator for IntoIter<K, V, A> {}

/// Draining iterator from [`BinMap::drain`]. Mappings not yielded are
/// dropped with the iterator.
pub struct Drain<'a, K, V, A: Allocator = Global> {
    inner: vec::Drain<'a, (K, V), A>,
}

impl<K, V, A: Allocator> Iterator for Drain<'_, K, V, A> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, A: Allocator> DoubleEndedIterator for Drain<'_, K, V, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V, A: Allocator> ExactSizeIterator for Drain<'_, K, V, A> {}
impl<K, V, A: Allocator> FusedIterator for Drain<'_, K, V, A> {}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use core::hash::BuildHasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::allocator::CountingAllocator;
    use crate::hash::BuildHashFn;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type SipMap<K, V> = BinMap<K, V, BuildHashFn<SipHashBuilder>>;

    fn by_len(key: &String) -> u32 {
        key.len() as u32
    }

    /// Checks that every bin references a live pair reachable from its home
    /// bin and that every pair has exactly one bin.
    fn assert_consistent<K, V, H, A>(map: &BinMap<K, V, H, A>)
    where
        K: Eq + Debug,
        H: HashFn<K>,
        A: Allocator + Clone,
    {
        let slots = map.bins.slots();
        let occupied = slots.iter().filter(|&&s| s != bin_table::EMPTY).count();
        assert_eq!(occupied, map.len());
        assert_eq!(map.bins.in_use() as usize, map.len());
        assert!(map.bin_count() >= bin_table::MIN_BINS as usize);
        assert!(map.bin_count().is_power_of_two());

        for (bin, &index) in slots.iter().enumerate() {
            if index == bin_table::EMPTY {
                continue;
            }
            assert!((index as usize) < map.len());
            let key = &map.pairs.as_slice()[index as usize].0;
            match map.find(map.hash(key), key) {
                Probe::Occupied { bin: found, index: at } => {
                    assert_eq!(found as usize, bin, "{key:?} found in the wrong bin");
                    assert_eq!(at, index);
                }
                Probe::Vacant { .. } => panic!("{key:?} unreachable from its home bin"),
            }
        }
    }

    fn a_keys(count: usize) -> impl Iterator<Item = String> {
        (1..=count).map(|n| "a".repeat(n))
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: SipMap<i32, String> = BinMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.bin_count(), 32);
        assert_eq!(map.capacity(), 23);

        let map: BinMap<String, u32, _> = BinMap::with_hasher(by_len);
        assert!(map.is_empty());
        assert_eq!(map.hasher()(&"abc".to_string()), 3);
    }

    #[test]
    fn test_with_capacity() {
        let map: SipMap<i32, i32> = BinMap::with_capacity(3000);
        assert_eq!(map.bin_count(), 4096);
        assert_eq!(map.capacity(), 2868);

        let map: SipMap<i32, i32> = BinMap::with_capacity(0);
        assert_eq!(map.bin_count(), 32);
        let map: SipMap<i32, i32> = BinMap::with_capacity(32);
        assert_eq!(map.bin_count(), 32);
        let map: SipMap<i32, i32> = BinMap::with_capacity(33);
        assert_eq!(map.bin_count(), 64);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map: SipMap<String, String> = BinMap::new();
        assert_eq!(map.insert("a".to_string(), "a".to_string()), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&"a".to_string()], "a");

        assert_eq!(
            map.insert("a".to_string(), "b".to_string()),
            Some("a".to_string())
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"a".to_string()), Some(&"b".to_string()));
        assert_eq!(map.get(&"b".to_string()), None);
        assert_consistent(&map);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        for i in 0..5 {
            map.insert(i, i);
        }
        map.insert(2, 20);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [0, 1, 20, 3, 4]);
    }

    #[test]
    fn test_get_mut() {
        let mut map: SipMap<i32, String> = BinMap::new();
        map.insert(1, "one".to_string());
        if let Some(value) = map.get_mut(&1) {
            value.push_str("_modified");
        }
        assert_eq!(map[&1], "one_modified");
        assert!(map.get_mut(&2).is_none());
    }

    #[test]
    fn test_get_key_value_returns_stored_key() {
        let mut map: BinMap<String, u32, _> = BinMap::with_hasher(by_len);
        map.insert("abc".to_string(), 1);
        let (key, value) = map.get_key_value(&"abc".to_string()).unwrap();
        assert_eq!(key, "abc");
        assert_eq!(*value, 1);
        // Same hash, different key.
        assert!(map.get_key_value(&"xyz".to_string()).is_none());
    }

    #[test]
    fn test_contains_key() {
        let mut map: SipMap<i32, &str> = BinMap::new();
        assert!(!map.contains_key(&1));
        map.insert(1, "one");
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn test_remove() {
        let mut map: SipMap<i32, &str> = BinMap::new();
        map.insert(1, "one");
        map.insert(2, "two");

        assert_eq!(map.remove(&1), Some("one"));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert_eq!(map.remove(&1), None);
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.len(), 1);
        assert_consistent(&map);
    }

    #[test]
    fn test_remove_entry() {
        let mut map: SipMap<String, i32> = BinMap::new();
        map.insert("key".to_string(), 42);
        assert_eq!(
            map.remove_entry(&"key".to_string()),
            Some(("key".to_string(), 42))
        );
        assert!(map.is_empty());
    }

    #[test]
    fn test_removal_preserves_order_of_survivors() {
        let mut map: SipMap<u32, char> = BinMap::new();
        for (i, c) in "abcdef".chars().enumerate() {
            map.insert(i as u32, c);
        }
        map.remove(&0);
        map.remove(&3);
        assert_eq!(map.values().collect::<String>(), "bcef");
        assert_eq!(map[&5], 'f');
        assert_consistent(&map);

        map.insert(0, 'a');
        assert_eq!(map.values().collect::<String>(), "bcefa");
    }

    #[test]
    fn test_clear() {
        let mut map: SipMap<i32, i32> = BinMap::new();
        for i in 0..100 {
            map.insert(i, i);
        }
        let bins = map.bin_count();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.bin_count(), bins);
        assert!(!map.contains_key(&5));
        assert_consistent(&map);

        map.insert(5, 5);
        assert_eq!(map[&5], 5);
    }

    #[test]
    #[should_panic(expected = "key not present in map")]
    fn test_index_missing_key_panics() {
        let map: SipMap<i32, i32> = BinMap::new();
        let _ = map[&1];
    }

    #[test]
    fn test_entry_api() {
        let mut map: SipMap<String, i32> = BinMap::new();

        let value = map.entry("key1".to_string()).or_insert(10);
        assert_eq!(*value, 10);
        *value += 5;
        assert_eq!(map[&"key1".to_string()], 15);

        let value = map.entry("key1".to_string()).or_insert(20);
        assert_eq!(*value, 15);

        let value = map
            .entry("key2".to_string())
            .or_insert_with(|| 30);
        assert_eq!(*value, 30);

        map.entry("key1".to_string()).and_modify(|v| *v *= 2);
        assert_eq!(map[&"key1".to_string()], 30);
        map.entry("key3".to_string()).and_modify(|v| *v *= 2);
        assert!(!map.contains_key(&"key3".to_string()));

        assert_eq!(map.entry("key2".to_string()).key(), "key2");
        assert_consistent(&map);
    }

    #[test]
    fn test_occupied_entry() {
        let mut map: SipMap<String, i32> = BinMap::new();
        map.insert("key".to_string(), 42);
        map.insert("other".to_string(), 1);

        match map.entry("key".to_string()) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), "key");
                assert_eq!(*entry.get(), 42);
                *entry.get_mut() = 100;
                assert_eq!(entry.insert(200), 100);
            }
            Entry::Vacant(_) => panic!("expected an occupied entry"),
        }
        assert_eq!(map[&"key".to_string()], 200);

        match map.entry("key".to_string()) {
            Entry::Occupied(entry) => assert_eq!(entry.remove(), 200),
            Entry::Vacant(_) => panic!("expected an occupied entry"),
        }
        assert!(!map.contains_key(&"key".to_string()));
        assert_eq!(map[&"other".to_string()], 1);
        assert_consistent(&map);
    }

    #[test]
    fn test_vacant_entry() {
        let mut map: SipMap<String, i32> = BinMap::new();
        match map.entry("key".to_string()) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), "key");
                assert_eq!(*entry.insert(42), 42);
            }
            Entry::Occupied(_) => panic!("expected a vacant entry"),
        }
        assert_eq!(map[&"key".to_string()], 42);

        match map.entry("gone".to_string()) {
            Entry::Vacant(entry) => assert_eq!(entry.into_key(), "gone"),
            Entry::Occupied(_) => panic!("expected a vacant entry"),
        }
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_get_or_insert_default() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        assert_eq!(*map.get_or_insert_default(7), 0);
        *map.get_or_insert_default(7) = 5;
        assert_eq!(*map.get_or_insert_default(7), 5);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_entry_grows_before_lookup() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        for i in 0..23 {
            map.insert(i, i);
        }
        assert_eq!(map.bin_count(), 32);

        // At 23 of 32 bins the growth check fires even for a mapped key.
        *map.get_or_insert_default(0) += 1;
        assert_eq!(map.bin_count(), 64);
        assert_eq!(map.len(), 23);
        assert_eq!(map[&0], 1);
        assert_consistent(&map);
    }

    #[test]
    fn test_insert_existing_key_does_not_grow() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        for i in 0..23 {
            map.insert(i, i);
        }
        map.insert(5, 50);
        assert_eq!(map.bin_count(), 32);

        map.insert(23, 23);
        assert_eq!(map.bin_count(), 64);
        assert_consistent(&map);
    }

    #[test]
    fn test_growth_preserves_mappings() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        for i in 0..1000 {
            map.insert(i, i * 2);
        }
        assert_eq!(map.len(), 1000);
        assert_eq!(map.bin_count(), 2048);
        for i in 0..1000 {
            assert_eq!(map[&i], i * 2);
        }
        assert!(map.keys().copied().eq(0..1000));
        assert_consistent(&map);
    }

    #[test]
    fn test_shrink_uses_pre_removal_occupancy() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        for i in 0..24 {
            map.insert(i, i);
        }
        assert_eq!(map.bin_count(), 64);

        // 24, 23, 22, 21, 20 bins in use before each removal: all above 30%.
        for i in 0..5 {
            map.remove(&i);
            assert_eq!(map.bin_count(), 64);
        }

        // 19 of 64 is 29%.
        assert_eq!(map.remove(&5), Some(5));
        assert_eq!(map.bin_count(), 32);
        assert_eq!(map.len(), 18);
        for i in 6..24 {
            assert_eq!(map[&i], i);
        }
        assert_consistent(&map);
    }

    #[test]
    fn test_remove_absent_key_can_shrink() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        for i in 0..24 {
            map.insert(i, i);
        }
        for i in 0..5 {
            map.remove(&i);
        }
        assert_eq!(map.bin_count(), 64);

        assert_eq!(map.remove(&1000), None);
        assert_eq!(map.bin_count(), 32);
        assert_eq!(map.len(), 19);
        assert_consistent(&map);
    }

    #[test]
    fn test_never_shrinks_below_minimum() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        map.insert(1, 1);
        map.remove(&1);
        map.remove(&1);
        assert_eq!(map.bin_count(), 32);
        assert!(map.is_empty());
    }

    #[test]
    fn test_occupied_entry_remove_after_shrink() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        for i in 0..24 {
            map.insert(i, i);
        }
        for i in 0..5 {
            map.remove(&i);
        }

        // The growth check in `entry` does nothing at 19 of 64; the shrink
        // check in the removal rebuilds the bins under the entry.
        match map.entry(10) {
            Entry::Occupied(entry) => assert_eq!(entry.remove_entry(), (10, 10)),
            Entry::Vacant(_) => panic!("expected an occupied entry"),
        }
        assert_eq!(map.bin_count(), 32);
        assert!(!map.contains_key(&10));
        assert_consistent(&map);
    }

    #[test]
    fn test_iterators() {
        let mut map: SipMap<i32, String> = BinMap::new();
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());
        map.insert(3, "three".to_string());

        let pairs: Vec<_> = map.iter().map(|(k, v)| (*k, v.clone())).collect();
        assert_eq!(
            pairs,
            [
                (1, "one".to_string()),
                (2, "two".to_string()),
                (3, "three".to_string())
            ]
        );
        assert_eq!(map.keys().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
        assert_eq!(map.values().len(), 3);

        let mut iter = map.iter();
        iter.next();
        let rest = iter.clone();
        assert_eq!(iter.count(), 2);
        assert_eq!(rest.count(), 2);

        for (_, value) in &mut map {
            value.push('!');
        }
        assert_eq!(map[&2], "two!");

        let collected: Vec<_> = (&map).into_iter().map(|(k, _)| *k).collect();
        assert_eq!(collected, [1, 2, 3]);
    }

    #[test]
    fn test_iteration_is_repeatable() {
        let map: SipMap<u32, u32> = (0..50).map(|i| (i * 7, i)).collect();
        let first: Vec<_> = map.iter().collect();
        let second: Vec<_> = map.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 50);
    }

    #[test]
    fn test_into_iter_and_drain() {
        let mut map: SipMap<i32, String> = BinMap::new();
        map.insert(1, "one".to_string());
        map.insert(2, "two".to_string());

        let bins = map.bin_count();
        let drained: Vec<_> = map.drain().collect();
        assert_eq!(drained, [(1, "one".to_string()), (2, "two".to_string())]);
        assert!(map.is_empty());
        assert_eq!(map.bin_count(), bins);
        assert_consistent(&map);

        map.insert(3, "three".to_string());
        map.insert(4, "four".to_string());
        let owned: Vec<_> = map.into_iter().rev().collect();
        assert_eq!(owned, [(4, "four".to_string()), (3, "three".to_string())]);
    }

    #[test]
    fn test_partial_drain_empties_map() {
        let mut map: SipMap<u32, String> = (0..10).map(|i| (i, i.to_string())).collect();
        {
            let mut drain = map.drain();
            assert_eq!(drain.next(), Some((0, "0".to_string())));
        }
        assert!(map.is_empty());
        assert!(map.get(&5).is_none());
    }

    #[test]
    fn test_cursor() {
        let mut map: SipMap<u32, char> = BinMap::new();
        map.insert(1, 'a');
        map.insert(2, 'b');

        let mut cursor = map.cursor_front();
        let end = map.cursor_end();
        assert_eq!(cursor.pair(), Some((&1, &'a')));
        assert!(cursor.move_next());
        assert_eq!(cursor.value(), Some(&'b'));
        assert!(cursor.move_next());
        assert_eq!(cursor, end);
        assert!(cursor.is_end());
        assert_eq!(cursor.key(), None);
        assert!(!cursor.move_next());

        assert!(cursor.move_prev());
        assert_eq!(cursor.key(), Some(&2));
        assert!(cursor.move_prev());
        assert!(!cursor.move_prev());
        assert_eq!(cursor, map.cursor_front());
        assert_eq!(cursor.index(), 0);

        let empty: SipMap<u32, char> = BinMap::new();
        assert_eq!(empty.cursor_front().index(), empty.cursor_end().index());
        assert!(empty.cursor_front().is_end());

        let other = map.clone();
        assert_ne!(map.cursor_front(), other.cursor_front());
    }

    #[test]
    fn test_cursors_of_distinct_empty_maps_differ() {
        let a: BinMap<u32, u32, _> = BinMap::with_hasher(|key: &u32| *key);
        let b: BinMap<u32, u32, _> = BinMap::with_hasher(|key: &u32| *key);

        assert_eq!(a.cursor_front(), a.cursor_end());
        assert_ne!(a.cursor_front(), b.cursor_front());
        assert_ne!(a.cursor_end(), b.cursor_end());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original: SipMap<String, u32> = BinMap::new();
        original.insert("a".to_string(), 1);
        original.insert("b".to_string(), 2);

        let mut copy = original.clone();
        copy.insert("c".to_string(), 3);
        copy.remove(&"a".to_string());
        *copy.get_mut(&"b".to_string()).unwrap() = 20;

        assert_eq!(original.len(), 2);
        assert_eq!(original[&"a".to_string()], 1);
        assert_eq!(original[&"b".to_string()], 2);
        assert!(!original.contains_key(&"c".to_string()));
        assert_eq!(copy.len(), 2);
        assert_eq!(copy.bin_count(), original.bin_count());
        assert_consistent(&original);
        assert_consistent(&copy);
    }

    #[test]
    fn test_clone_keeps_hash_function() {
        let mut original: BinMap<String, u32, fn(&String) -> u32> = BinMap::with_hasher(by_len);
        for key in a_keys(40) {
            let len = key.len() as u32;
            original.insert(key, len);
        }
        let copy = original.clone();
        assert_eq!(copy.bin_count(), original.bin_count());
        for key in a_keys(40) {
            assert_eq!(copy[&key], key.len() as u32);
        }
        assert_eq!(copy, original);
    }

    #[test]
    fn test_move_leaves_source_empty() {
        let mut source: SipMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
        let bins = source.bin_count();

        let target = mem::take(&mut source);
        assert_eq!(target.len(), 100);
        assert_eq!(target.bin_count(), bins);
        assert_eq!(target[&42], 42);

        assert!(source.is_empty());
        assert_eq!(source.bin_count(), 32);
        source.insert(1, 1);
        assert_eq!(source.len(), 1);
        assert_consistent(&source);
    }

    #[test]
    fn test_string_keys_hashed_by_length() {
        let mut map: BinMap<String, String, _> = BinMap::with_hasher(by_len);
        for key in a_keys(2048) {
            map.insert(key.clone(), key);
        }
        assert_eq!(map.len(), 2048);
        assert_eq!(map.bin_count(), 4096);
        for key in a_keys(2048) {
            assert_eq!(map[&key], key);
        }
        assert_consistent(&map);

        for key in a_keys(2048) {
            assert_eq!(map.remove(&key), Some(key.clone()));
            assert!(!map.contains_key(&key));
        }
        assert!(map.is_empty());
        assert_eq!(map.bin_count(), 32);
        assert_consistent(&map);
    }

    #[test]
    fn test_string_keys_default_hash() {
        let mut map: BinMap<String, String> = BinMap::new();
        for key in a_keys(2048) {
            map.insert(key.clone(), key);
        }
        assert_eq!(map.len(), 2048);
        for key in a_keys(2048) {
            assert_eq!(map.get(&key), Some(&key));
        }
        for key in a_keys(2048).step_by(2) {
            assert_eq!(map.remove(&key), Some(key.clone()));
        }
        assert_eq!(map.len(), 1024);
        for (n, key) in a_keys(2048).enumerate() {
            assert_eq!(map.contains_key(&key), n % 2 == 1);
        }
        assert_consistent(&map);
    }

    #[test]
    fn test_collision_handling() {
        // Everything shares one home bin.
        let mut map = BinMap::with_hasher(|_: &u32| 5);
        for i in 0..20u32 {
            map.insert(i, i);
        }
        for i in (0..20).step_by(3) {
            assert_eq!(map.remove(&i), Some(i));
        }
        for i in 0..20 {
            assert_eq!(map.get(&i).copied(), if i % 3 == 0 { None } else { Some(i) });
        }
        assert_consistent(&map);
    }

    #[test]
    fn test_probe_chains_wrap_around_table_end() {
        let mut map = BinMap::with_hasher(|key: &u32| *key);
        // Homes 30 and 31 spill over into bins 0 and 1.
        for key in [30, 62, 31, 63, 0] {
            map.insert(key, key);
        }
        assert_consistent(&map);
        assert_eq!(map.remove(&62), Some(62));
        assert_eq!(map.remove(&30), Some(30));
        for key in [31, 63, 0] {
            assert_eq!(map[&key], key);
        }
        assert_consistent(&map);
    }

    #[test]
    fn test_randomized_against_model() {
        let mut rng = SmallRng::seed_from_u64(0x5EED_B175);
        // A weak hash keeps probe chains long.
        let mut map = BinMap::with_hasher(|key: &u32| key % 13);
        let mut model: Vec<(u32, u32)> = Vec::new();

        for step in 0..4000u32 {
            let key = rng.random_range(0..300u32);
            match rng.random_range(0..10u32) {
                0..=5 => {
                    let previous = map.insert(key, step);
                    match model.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, value)) => {
                            assert_eq!(previous, Some(*value));
                            *value = step;
                        }
                        None => {
                            assert_eq!(previous, None);
                            model.push((key, step));
                        }
                    }
                }
                6..=8 => {
                    let removed = map.remove(&key);
                    let position = model.iter().position(|(k, _)| *k == key);
                    assert_eq!(removed, position.map(|p| model.remove(p).1));
                }
                _ => {
                    let expected = model.iter().find(|(k, _)| *k == key).map(|(_, v)| v);
                    assert_eq!(map.get(&key), expected);
                }
            }

            if step % 97 == 0 {
                assert_consistent(&map);
            }
        }

        assert_consistent(&map);
        let pairs: Vec<_> = map.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, model);
    }

    #[test]
    fn test_randomized_growth_and_shrink() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut map: SipMap<u64, u64> = BinMap::new();
        let mut model = BTreeMap::new();

        for round in 0..6 {
            for _ in 0..2000 {
                let key = rng.random::<u64>() % 5000;
                assert_eq!(map.insert(key, round), model.insert(key, round));
            }
            assert_consistent(&map);

            let keys: Vec<u64> = model.keys().copied().collect();
            for key in keys {
                if rng.random_bool(0.8) {
                    assert_eq!(map.remove(&key), model.remove(&key));
                }
            }
            assert_consistent(&map);
            assert_eq!(map.len(), model.len());
        }

        for (key, value) in &model {
            assert_eq!(map.get(key), Some(value));
        }
    }

    #[test]
    fn test_allocators_track_both_stores() {
        let pairs = CountingAllocator::new(Global);
        let bins = CountingAllocator::new(Global);
        {
            let mut map: BinMap<u32, u64, BuildHashFn<SipHashBuilder>, _> =
                BinMap::with_allocators(pairs.clone(), bins.clone());
            assert_eq!(bins.live_bytes(), 32 * 4);
            assert_eq!(pairs.live_bytes(), 0);

            for i in 0..100 {
                map.insert(i, u64::from(i));
            }
            assert_eq!(bins.live_bytes(), 256 * 4);
            assert!(pairs.live_bytes() >= 100 * mem::size_of::<(u32, u64)>());

            let copy = map.clone();
            assert_eq!(bins.live_bytes(), 2 * 256 * 4);
            drop(copy);
            assert_eq!(bins.live_bytes(), 256 * 4);

            map.clear();
            assert_eq!(bins.live_bytes(), 256 * 4);
        }
        assert_eq!(pairs.live_bytes(), 0);
        assert_eq!(bins.live_bytes(), 0);
        assert_eq!(pairs.allocations(), pairs.deallocations());
        assert_eq!(bins.allocations(), bins.deallocations());
    }

    #[test]
    fn test_try_reserve_failure_retains_state() {
        let bins = CountingAllocator::new(Global);
        let mut map: BinMap<u32, u32, BuildHashFn<SipHashBuilder>, _> =
            BinMap::with_allocators(CountingAllocator::new(Global), bins.clone());
        for i in 0..20 {
            map.insert(i, i);
        }

        bins.set_limit(Some(bins.live_bytes()));
        let err = map.try_reserve(100).unwrap_err();
        assert!(matches!(err, TryReserveError::AllocError { .. }));
        assert_eq!(map.len(), 20);
        assert_eq!(map.bin_count(), 32);
        for i in 0..20 {
            assert_eq!(map[&i], i);
        }
        assert_consistent(&map);

        bins.set_limit(None);
        map.try_reserve(100).unwrap();
        assert!(map.capacity() >= 120);
        assert_consistent(&map);
    }

    #[test]
    fn test_try_reserve_overflow() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        map.insert(1, 1);
        assert_eq!(
            map.try_reserve(usize::MAX),
            Err(TryReserveError::CapacityOverflow)
        );
        assert_eq!(
            map.try_reserve(1 << 40),
            Err(TryReserveError::CapacityOverflow)
        );
        assert_eq!(map[&1], 1);
    }

    #[test]
    fn test_failed_shrink_keeps_old_bins() {
        let bins = CountingAllocator::new(Global);
        let mut map: BinMap<u32, u32, BuildHashFn<SipHashBuilder>, _> =
            BinMap::with_allocators(CountingAllocator::new(Global), bins.clone());
        for i in 0..24 {
            map.insert(i, i);
        }
        for i in 0..5 {
            map.remove(&i);
        }

        bins.set_limit(Some(bins.live_bytes()));
        assert_eq!(map.remove(&5), Some(5));
        assert_eq!(map.bin_count(), 64);
        assert_consistent(&map);

        bins.set_limit(None);
        map.remove(&6);
        assert_eq!(map.bin_count(), 32);
        assert_consistent(&map);
    }

    #[test]
    fn test_reserve_and_shrink_to_fit() {
        let mut map: SipMap<u32, u32> = BinMap::new();
        map.reserve(500);
        assert!(map.capacity() >= 500);
        let bins = map.bin_count();
        for i in 0..500 {
            map.insert(i, i);
        }
        assert_eq!(map.bin_count(), bins);

        for i in 0..490 {
            map.remove(&i);
        }
        map.shrink_to_fit();
        assert_eq!(map.bin_count(), 32);
        assert_eq!(map.len(), 10);
        for i in 490..500 {
            assert_eq!(map[&i], i);
        }
        assert_consistent(&map);
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut a: SipMap<u32, &str> = BinMap::new();
        let mut b: SipMap<u32, &str> = BinMap::new();
        a.insert(1, "x");
        a.insert(2, "y");
        b.insert(2, "y");
        b.insert(1, "x");
        assert_eq!(a, b);

        b.insert(1, "z");
        assert_ne!(a, b);
        b.insert(1, "x");
        b.insert(3, "w");
        assert_ne!(a, b);
    }

    #[test]
    fn test_debug_format() {
        let mut map: SipMap<u32, &str> = BinMap::new();
        map.insert(2, "b");
        map.insert(1, "a");
        assert_eq!(format!("{map:?}"), r#"{2: "b", 1: "a"}"#);
    }

    #[test]
    fn test_extend_and_from_iter() {
        let mut map: SipMap<u32, u32> = vec![(1, 1), (2, 2)].into_iter().collect();
        map.extend([(2, 20), (3, 30)]);
        assert_eq!(map.len(), 3);
        assert_eq!(map[&2], 20);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_values_dropped_exactly_once() {
        struct Tracked(Rc<Cell<usize>>);

        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        let mut map: SipMap<u32, Tracked> = BinMap::new();
        for i in 0..40 {
            map.insert(i, Tracked(drops.clone()));
        }

        map.insert(0, Tracked(drops.clone()));
        assert_eq!(drops.get(), 1);
        map.remove(&1);
        assert_eq!(drops.get(), 2);

        {
            let mut drain = map.drain();
            drop(drain.next());
        }
        assert_eq!(drops.get(), 41);

        for i in 0..10 {
            map.insert(i, Tracked(drops.clone()));
        }
        let taken = map.into_iter().take(3).count();
        assert_eq!(taken, 3);
        assert_eq!(drops.get(), 51);
    }

    #[test]
    fn test_zero_sized_values() {
        let mut map: SipMap<u32, ()> = BinMap::new();
        for i in 0..100 {
            map.insert(i, ());
        }
        assert_eq!(map.len(), 100);
        assert!(map.contains_key(&99));
        map.remove(&50);
        assert_eq!(map.len(), 99);
        assert_consistent(&map);
    }

    #[test]
    fn test_enum_keys_with_custom_hash() {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        enum Stage {
            Vertex,
            Fragment,
            Compute,
        }

        let mut modules = BinMap::with_hasher(|stage: &Stage| *stage as u32);
        modules.insert(Stage::Vertex, "main_vs");
        modules.insert(Stage::Fragment, "main_fs");
        assert_eq!(modules[&Stage::Fragment], "main_fs");
        assert!(!modules.contains_key(&Stage::Compute));
        assert_consistent(&modules);
    }

    #[test]
    fn test_listener_registry() {
        let mut listeners: SipMap<String, Vec<u32>> = BinMap::new();
        for (event, id) in [("resize", 1), ("close", 2), ("resize", 3)] {
            listeners.entry(event.to_string()).or_default().push(id);
        }
        assert_eq!(listeners[&"resize".to_string()], [1, 3]);
        assert_eq!(listeners[&"close".to_string()], [2]);

        listeners.remove(&"resize".to_string());
        assert_eq!(listeners.keys().collect::<Vec<_>>(), ["close"]);
    }

    #[test]
    fn test_debug_stats() {
        let mut map = BinMap::with_hasher(|key: &u32| key % 4);
        for i in 0..8u32 {
            map.insert(i, i);
        }
        // Homes 0..4 twice over: 0 1 2 3 land home, 4 5 6 7 land 4 bins away.
        assert_eq!(map.probe_histogram(), [4, 0, 0, 0, 4]);

        let stats = map.debug_stats();
        assert_eq!(stats.len, 8);
        assert_eq!(stats.bin_count, 32);
        assert_eq!(stats.load_percent, 25);
        assert_eq!(stats.max_probe_distance, 4);
        assert_eq!(stats.mean_probe_distance, 2.0);
        assert!(stats.allocated_bytes >= 32 * 4 + 8 * mem::size_of::<(u32, u32)>());

        let empty: SipMap<u32, u32> = BinMap::new();
        assert_eq!(empty.debug_stats().mean_probe_distance, 0.0);
        assert!(empty.probe_histogram().is_empty());
    }
}
