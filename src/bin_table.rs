//! The bin index of a map and the policy that sizes it.
//!
//! A `BinTable` is a power-of-two array of `u32` bins. Each bin is either
//! [`EMPTY`] or the index of an entry in the map's pair store. Keys are
//! located by linear probing from their home bin, `hash & (bin_count - 1)`:
//! the k-th probe looks at `wrap(hash + k)`.
//!
//! The table never stores keys or hashes itself. Everything that needs them
//! (equality during probing, home bins during repair and rehash) is supplied
//! by the caller through closures over store indices, so the table can always
//! be rebuilt from the pair store alone.

use core::alloc::Layout;

use allocator_api2::vec::Vec;

use crate::allocator::Allocator;
use crate::error::Fallibility;
use crate::error::TryReserveError;

/// Marker for a bin that references no entry.
pub(crate) const EMPTY: u32 = u32::MAX;

/// The smallest bin count a table is ever sized to.
pub(crate) const MIN_BINS: u32 = 32;

/// The largest bin count; indices must stay below [`EMPTY`].
pub(crate) const MAX_BINS: u32 = 1 << 31;

/// Load percentage at or above which the table doubles before an insertion.
pub(crate) const GROW_THRESHOLD: u32 = 70;

/// Load percentage at or below which the table halves before a removal.
pub(crate) const SHRINK_THRESHOLD: u32 = 30;

#[inline(always)]
pub(crate) fn load_percent(in_use: u32, bin_count: u32) -> u32 {
    ((u64::from(in_use) * 100) / u64::from(bin_count)) as u32
}

#[inline(always)]
pub(crate) fn should_grow(in_use: u32, bin_count: u32) -> bool {
    load_percent(in_use, bin_count) >= GROW_THRESHOLD
}

#[inline(always)]
pub(crate) fn should_shrink(in_use: u32, bin_count: u32) -> bool {
    load_percent(in_use, bin_count) <= SHRINK_THRESHOLD && bin_count > MIN_BINS
}

/// Number of mappings a table of `bin_count` bins holds before the growth
/// check fires.
#[inline]
pub(crate) fn max_load(bin_count: u32) -> usize {
    (u64::from(bin_count) * u64::from(GROW_THRESHOLD)).div_ceil(100) as usize
}

/// Bin count for a requested initial capacity: the smallest power of two at
/// least `capacity`, and never below [`MIN_BINS`].
pub(crate) fn bins_for_capacity(capacity: usize) -> Option<u32> {
    if capacity > MAX_BINS as usize {
        return None;
    }
    Some((capacity as u32).next_power_of_two().max(MIN_BINS))
}

/// Smallest bin count that holds `len` mappings without growing.
pub(crate) fn bins_for_load(len: usize) -> Option<u32> {
    let mut bin_count = MIN_BINS;
    while max_load(bin_count) < len {
        if bin_count == MAX_BINS {
            return None;
        }
        bin_count <<= 1;
    }
    Some(bin_count)
}

/// The outcome of probing for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    /// The key lives at store `index`, referenced from `bin`.
    Occupied { bin: u32, index: u32 },
    /// The key is absent; `bin` is the empty bin it would be placed in.
    Vacant { bin: u32 },
}

/// Bins over a map's pair store.
///
/// `bins.len()` is always a power of two no smaller than [`MIN_BINS`], and
/// every bin is either [`EMPTY`] or an index below the store length.
#[derive(Clone)]
pub(crate) struct BinTable<A: Allocator> {
    bins: Vec<u32, A>,
    in_use: u32,
}

/// Allocates `bin_count` bins, all marked empty.
fn allocate_bins<A: Allocator>(
    bin_count: u32,
    alloc: A,
    fallibility: Fallibility,
) -> Result<Vec<u32, A>, TryReserveError> {
    debug_assert!(bin_count.is_power_of_two() && bin_count >= MIN_BINS);

    let layout = Layout::array::<u32>(bin_count as usize)
        .map_err(|_| fallibility.capacity_overflow())?;
    let mut bins = Vec::new_in(alloc);
    bins.try_reserve_exact(bin_count as usize)
        .map_err(|_| fallibility.alloc_err(layout))?;
    bins.resize(bin_count as usize, EMPTY);
    Ok(bins)
}

impl<A: Allocator> BinTable<A> {
    pub(crate) fn try_with_bins_in(
        bin_count: u32,
        alloc: A,
        fallibility: Fallibility,
    ) -> Result<Self, TryReserveError> {
        Ok(Self {
            bins: allocate_bins(bin_count, alloc, fallibility)?,
            in_use: 0,
        })
    }

    #[inline]
    pub(crate) fn bin_count(&self) -> u32 {
        self.bins.len() as u32
    }

    #[inline]
    pub(crate) fn in_use(&self) -> u32 {
        self.in_use
    }

    /// Bytes held by the bin array.
    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn allocated_bytes(&self) -> usize {
        self.bins.capacity() * core::mem::size_of::<u32>()
    }

    #[inline]
    pub(crate) fn slots(&self) -> &[u32] {
        &self.bins
    }

    /// Maps any value into `0..bin_count`.
    #[inline(always)]
    pub(crate) fn wrap(&self, value: u32) -> u32 {
        value & (self.bin_count() - 1)
    }

    /// The number of probes taken from `hash`'s home bin to reach `bin`.
    #[cfg(any(test, feature = "stats"))]
    #[inline]
    pub(crate) fn probe_distance(&self, bin: u32, hash: u32) -> u32 {
        self.wrap(bin.wrapping_sub(hash))
    }

    /// Walks the probe sequence of `hash` until `eq` accepts a referenced
    /// store index or an empty bin is reached.
    #[inline]
    pub(crate) fn find(&self, hash: u32, mut eq: impl FnMut(u32) -> bool) -> Probe {
        debug_assert!(self.in_use < self.bin_count(), "bin table has no empty bin");

        let mut probes = 0u32;
        loop {
            let bin = self.wrap(hash.wrapping_add(probes));
            let index = self.bins[bin as usize];
            if index == EMPTY {
                return Probe::Vacant { bin };
            }
            if eq(index) {
                return Probe::Occupied { bin, index };
            }
            probes += 1;
        }
    }

    /// Points the vacant `bin` at store `index`.
    #[inline]
    pub(crate) fn occupy(&mut self, bin: u32, index: u32) {
        debug_assert!(index != EMPTY);
        let slot = &mut self.bins[bin as usize];
        debug_assert_eq!(*slot, EMPTY, "occupying a bin that is in use");
        *slot = index;
        self.in_use += 1;
    }

    /// Vacates `bin` after the store entry it referenced was removed.
    ///
    /// Every bin referencing a later entry is decremented to follow the
    /// compacted store, then the probe chain running through `bin` is closed
    /// up so every remaining entry stays reachable from its home bin.
    /// `home_of` must return the hash of the entry now at a store index.
    pub(crate) fn vacate(&mut self, bin: u32, removed: u32, mut home_of: impl FnMut(u32) -> u32) {
        debug_assert_eq!(self.bins[bin as usize], removed);

        for slot in self.bins.iter_mut() {
            if *slot != EMPTY && *slot > removed {
                *slot -= 1;
            }
        }

        self.bins[bin as usize] = EMPTY;
        self.in_use -= 1;

        let mask = self.bin_count() - 1;
        let slots = &mut self.bins;
        let mut hole = bin;
        let mut next = bin;
        loop {
            next = (next + 1) & mask;
            let index = slots[next as usize];
            if index == EMPTY {
                break;
            }

            let home = home_of(index) & mask;
            if next.wrapping_sub(home) & mask > hole.wrapping_sub(home) & mask {
                slots[hole as usize] = index;
                slots[next as usize] = EMPTY;
                hole = next;
            }
        }
    }

    /// Marks every bin empty. The bin count is kept.
    pub(crate) fn clear(&mut self) {
        self.bins.fill(EMPTY);
        self.in_use = 0;
    }
}

impl<A: Allocator + Clone> BinTable<A> {
    /// Replaces the bins with `bin_count` fresh ones and places every entry
    /// again. `hashes` yields the hash of each store entry in store order.
    ///
    /// The new bins are allocated before the old ones are released, so if
    /// the allocation fails the table is left untouched.
    pub(crate) fn rebuild(
        &mut self,
        bin_count: u32,
        hashes: impl Iterator<Item = u32>,
        fallibility: Fallibility,
    ) -> Result<(), TryReserveError> {
        self.bins = allocate_bins(bin_count, self.bins.allocator().clone(), fallibility)?;

        let mut placed = 0u32;
        for (index, hash) in hashes.enumerate() {
            match self.find(hash, |_| false) {
                Probe::Vacant { bin } => self.bins[bin as usize] = index as u32,
                Probe::Occupied { .. } => unreachable!(),
            }
            placed += 1;
        }
        debug_assert_eq!(placed, self.in_use);

        Ok(())
    }
}
