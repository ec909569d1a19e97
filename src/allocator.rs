//! Pluggable memory providers for the two backing stores of a map.
//!
//! A [`BinMap`](crate::BinMap) holds two allocator instances: one for its
//! pair store and one for its bin table. Both default to [`Global`].
//! The [`Allocator`] trait and [`Global`] come from `allocator-api2`, so any
//! allocator written against that crate plugs in directly.
//! [`CountingAllocator`] wraps another allocator and records what passes
//! through it, which is handy when checking that a map releases everything it
//! acquires.

use alloc::rc::Rc;
use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

pub use allocator_api2::alloc::AllocError;
pub use allocator_api2::alloc::Allocator;
pub use allocator_api2::alloc::Global;

#[derive(Debug, Default)]
struct Counters {
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    live_bytes: Cell<usize>,
    peak_bytes: Cell<usize>,
    limit: Cell<Option<usize>>,
}

/// An allocator that counts the traffic passing through to an inner
/// allocator.
///
/// Clones share their counters, so a map built with a clone of a
/// `CountingAllocator` is visible through the original. Counters use
/// [`Cell`], matching the single-threaded nature of the maps.
///
/// A byte limit can be set with [`set_limit`](CountingAllocator::set_limit);
/// requests that would push the live byte count past it fail.
///
/// # Examples
///
/// ```rust
/// use bin_map::BinMap;
/// use bin_map::DefaultHashFn;
/// use bin_map::Global;
/// use bin_map::allocator::CountingAllocator;
///
/// let pairs = CountingAllocator::new(Global);
/// let bins = CountingAllocator::new(Global);
/// {
///     let mut map: BinMap<u32, u32, DefaultHashFn, _> =
///         BinMap::with_allocators(pairs.clone(), bins.clone());
///     map.insert(1, 1);
///     assert_eq!(bins.live_bytes(), 32 * 4);
///     assert!(pairs.live_bytes() > 0);
/// }
/// assert_eq!(pairs.live_bytes(), 0);
/// assert_eq!(bins.live_bytes(), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CountingAllocator<A = Global> {
    inner: A,
    counters: Rc<Counters>,
}

impl<A> CountingAllocator<A> {
    /// Creates a counting allocator wrapping `inner`.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            counters: Rc::default(),
        }
    }

    /// Number of successful allocations.
    pub fn allocations(&self) -> usize {
        self.counters.allocations.get()
    }

    /// Number of deallocations.
    pub fn deallocations(&self) -> usize {
        self.counters.deallocations.get()
    }

    /// Bytes currently allocated and not yet released.
    pub fn live_bytes(&self) -> usize {
        self.counters.live_bytes.get()
    }

    /// Highest value `live_bytes` has reached.
    pub fn peak_bytes(&self) -> usize {
        self.counters.peak_bytes.get()
    }

    /// Caps the number of live bytes. `None` removes the cap.
    pub fn set_limit(&self, limit: Option<usize>) {
        self.counters.limit.set(limit);
    }
}

// SAFETY: Blocks come from and return to `A`; only bookkeeping is added.
unsafe impl<A> Allocator for CountingAllocator<A>
where
    A: Allocator,
{
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let counters = &*self.counters;
        let live = counters
            .live_bytes
            .get()
            .checked_add(layout.size())
            .ok_or(AllocError)?;
        if counters.limit.get().is_some_and(|limit| live > limit) {
            return Err(AllocError);
        }

        let block = self.inner.allocate(layout)?;
        counters.allocations.set(counters.allocations.get() + 1);
        counters.live_bytes.set(live);
        counters.peak_bytes.set(counters.peak_bytes.get().max(live));
        Ok(block)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let counters = &*self.counters;
        counters.deallocations.set(counters.deallocations.get() + 1);
        debug_assert!(counters.live_bytes.get() >= layout.size());
        counters
            .live_bytes
            .set(counters.live_bytes.get().saturating_sub(layout.size()));
        // SAFETY: Caller guarantees `ptr` came from `allocate` with `layout`,
        // which obtained it from `inner`.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}
