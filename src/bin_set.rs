use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::allocator::Allocator;
use crate::allocator::Global;
use crate::bin_map;
use crate::bin_map::BinMap;
use crate::hash::DefaultHashFn;
use crate::hash::HashFn;

/// An insertion-ordered hash set, backed by a [`BinMap`] with `()` values.
///
/// Growth, shrinking, and removal cost follow the map: values sit densely in
/// insertion order, and removing one shifts every later value down.
///
/// # Examples
///
/// ```rust
/// use bin_map::BinSet;
///
/// let mut loaded: BinSet<&str> = BinSet::new();
/// assert!(loaded.insert("terrain.mesh"));
/// assert!(loaded.insert("sky.hdr"));
/// assert!(!loaded.insert("terrain.mesh"));
/// assert_eq!(loaded.iter().copied().collect::<Vec<_>>(), ["terrain.mesh", "sky.hdr"]);
/// ```
#[derive(Clone)]
pub struct BinSet<T, H = DefaultHashFn, A: Allocator = Global> {
    map: BinMap<T, (), H, A>,
}

impl<T, H, A> PartialEq for BinSet<T, H, A>
where
    T: Eq,
    H: HashFn<T>,
    A: Allocator + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T, H, A> Eq for BinSet<T, H, A>
where
    T: Eq,
    H: HashFn<T>,
    A: Allocator + Clone,
{
}

impl<T: Debug, H, A: Allocator> Debug for BinSet<T, H, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, H> BinSet<T, H, Global> {
    /// Creates an empty set that hashes values with `hash_fn`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinSet;
    ///
    /// let mut ids = BinSet::with_hasher(|id: &u64| *id as u32);
    /// ids.insert(7);
    /// assert!(ids.contains(&7));
    /// ```
    pub fn with_hasher(hash_fn: H) -> Self {
        Self {
            map: BinMap::with_hasher(hash_fn),
        }
    }

    /// Creates an empty set with `capacity` bins, rounded up to a power of
    /// two and at least 32.
    pub fn with_capacity_and_hasher(capacity: usize, hash_fn: H) -> Self {
        Self {
            map: BinMap::with_capacity_and_hasher(capacity, hash_fn),
        }
    }
}

impl<T, H: Default> BinSet<T, H, Global> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            map: BinMap::new(),
        }
    }

    /// Creates an empty set with `capacity` bins, rounded up to a power of
    /// two and at least 32.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: BinMap::with_capacity(capacity),
        }
    }
}

impl<T, H, A: Allocator> BinSet<T, H, A> {
    /// Creates an empty set with every collaborator supplied. See
    /// [`BinMap::with_capacity_hasher_and_allocators`].
    pub fn with_capacity_hasher_and_allocators(
        capacity: usize,
        hash_fn: H,
        value_alloc: A,
        bin_alloc: A,
    ) -> Self {
        Self {
            map: BinMap::with_capacity_hasher_and_allocators(
                capacity,
                hash_fn,
                value_alloc,
                bin_alloc,
            ),
        }
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set holds no values.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of bins in the index table.
    pub fn bin_count(&self) -> usize {
        self.map.bin_count()
    }

    /// Returns how many values the set holds before it next grows.
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns the set's hash function.
    pub fn hasher(&self) -> &H {
        self.map.hasher()
    }

    /// Removes every value, keeping the bin count.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates over the values in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.map.keys(),
        }
    }

    /// Removes every value, yielding them in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinSet;
    ///
    /// let mut set: BinSet<u8> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(set.drain().collect::<Vec<_>>(), [3, 1, 2]);
    /// assert!(set.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T, A> {
        Drain {
            inner: self.map.drain(),
        }
    }
}

impl<T, H, A> BinSet<T, H, A>
where
    T: Eq,
    H: HashFn<T>,
    A: Allocator + Clone,
{
    /// Adds a value. Returns `true` if it was not already present; an equal
    /// stored value is left in place.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ()).is_none()
    }

    /// Adds a value, replacing and returning an equal stored value. A
    /// replaced value keeps its position in insertion order.
    pub fn replace(&mut self, value: T) -> Option<T> {
        match self.map.replace_key(value) {
            Ok(previous) => Some(previous),
            Err(value) => {
                self.map.insert(value, ());
                None
            }
        }
    }

    /// Returns `true` if the set holds `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }

    /// Returns the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        self.map.get_key_value(value).map(|(stored, _)| stored)
    }

    /// Removes `value`. Returns `true` if it was present.
    ///
    /// As with [`BinMap::remove`], the shrink check runs first.
    pub fn remove(&mut self, value: &T) -> bool {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`.
    pub fn take(&mut self, value: &T) -> Option<T> {
        self.map.remove_entry(value).map(|(stored, _)| stored)
    }

    /// Reserves room for `additional` more values without growing.
    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional);
    }

    /// Shrinks the bins and value storage to fit the current contents.
    pub fn shrink_to_fit(&mut self) {
        self.map.shrink_to_fit();
    }

    /// Returns `true` if `self` and `other` share no values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinSet;
    ///
    /// let a: BinSet<i32> = [1, 2].into_iter().collect();
    /// let b: BinSet<i32> = [3, 4].into_iter().collect();
    /// assert!(a.is_disjoint(&b));
    /// ```
    pub fn is_disjoint(&self, other: &Self) -> bool {
        if self.len() <= other.len() {
            self.iter().all(|v| !other.contains(v))
        } else {
            other.iter().all(|v| !self.contains(v))
        }
    }

    /// Returns `true` if every value of `self` is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every value of `other` is in `self`.
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    /// Values in `self` followed by values only in `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bin_map::BinSet;
    ///
    /// let a: BinSet<i32> = [1, 2].into_iter().collect();
    /// let b: BinSet<i32> = [2, 3].into_iter().collect();
    /// assert_eq!(a.union(&b).copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// ```
    pub fn union<'a>(&'a self, other: &'a Self) -> Union<'a, T, H, A> {
        Union {
            iter: self.iter(),
            other_iter: other.iter(),
            set: self,
        }
    }

    /// Values of `self` that are also in `other`, in `self`'s order.
    pub fn intersection<'a>(&'a self, other: &'a Self) -> Intersection<'a, T, H, A> {
        Intersection {
            iter: self.iter(),
            other,
        }
    }

    /// Values of `self` that are not in `other`.
    pub fn difference<'a>(&'a self, other: &'a Self) -> Difference<'a, T, H, A> {
        Difference {
            iter: self.iter(),
            other,
        }
    }

    /// Values in exactly one of the two sets: `self`'s first, then `other`'s.
    pub fn symmetric_difference<'a>(
        &'a self,
        other: &'a Self,
    ) -> SymmetricDifference<'a, T, H, A> {
        SymmetricDifference {
            iter: self.difference(other).chain(other.difference(self)),
        }
    }
}

impl<T, H, A> Default for BinSet<T, H, A>
where
    H: Default,
    A: Allocator + Default,
{
    fn default() -> Self {
        Self {
            map: BinMap::default(),
        }
    }
}

impl<T, H, A> Extend<T> for BinSet<T, H, A>
where
    T: Eq,
    H: HashFn<T>,
    A: Allocator + Clone,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, H, A> FromIterator<T> for BinSet<T, H, A>
where
    T: Eq,
    H: HashFn<T> + Default,
    A: Allocator + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, H, A: Allocator> IntoIterator for BinSet<T, H, A> {
    type IntoIter = IntoIter<T, A>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, T, H, A: Allocator> IntoIterator for &'a BinSet<T, H, A> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowing iterator over a set in insertion order.
pub struct Iter<'a, T> {
    inner: bin_map::Keys<'a, T, ()>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator over a set in insertion order.
pub struct IntoIter<T, A: Allocator = Global> {
    inner: bin_map::IntoIter<T, (), A>,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, ())| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

/// Draining iterator from [`BinSet::drain`].
pub struct Drain<'a, T, A: Allocator = Global> {
    inner: bin_map::Drain<'a, T, (), A>,
}

impl<T, A: Allocator> Iterator for Drain<'_, T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, ())| value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, A: Allocator> ExactSizeIterator for Drain<'_, T, A> {}
impl<T, A: Allocator> FusedIterator for Drain<'_, T, A> {}

/// Iterator from [`BinSet::union`].
pub struct Union<'a, T, H, A: Allocator = Global> {
    iter: Iter<'a, T>,
    other_iter: Iter<'a, T>,
    set: &'a BinSet<T, H, A>,
}

impl<'a, T, H, A> Iterator for Union<'a, T, H, A>
where
    T: Eq,
    H: HashFn<T>,
    A: Allocator + Clone,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(v) = self.iter.next() {
            return Some(v);
        }
        loop {
            let v = self.other_iter.next()?;
            if !self.set.contains(v) {
                return Some(v);
            }
        }
    }
}

/// Iterator from [`BinSet::intersection`].
pub struct Intersection<'a, T, H, A: Allocator = Global> {
    iter: Iter<'a, T>,
    other: &'a BinSet<T, H, A>,
}

impl<'a, T, H, A> Iterator for Intersection<'a, T, H, A>
where
    T: Eq,
    H: HashFn<T>,
    A: Allocator + Clone,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let other = self.other;
        self.iter.find(|v| other.contains(v))
    }
}

/// Iterator from [`BinSet::difference`].
pub struct Difference<'a, T, H, A: Allocator = Global> {
    iter: Iter<'a, T>,
    other: &'a BinSet<T, H, A>,
}

impl<'a, T, H, A> Iterator for Difference<'a, T, H, A>
where
    T: Eq,
    H: HashFn<T>,
    A: Allocator + Clone,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let other = self.other;
        self.iter.find(|v| !other.contains(v))
    }
}

/// Iterator from [`BinSet::symmetric_difference`].
pub struct SymmetricDifference<'a, T, H, A: Allocator = Global> {
    iter: core::iter::Chain<Difference<'a, T, H, A>, Difference<'a, T, H, A>>,
}

impl<'a, T, H, A> Iterator for SymmetricDifference<'a, T, H, A>
where
    T: Eq,
    H: HashFn<T>,
    A: Allocator + Clone,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}
