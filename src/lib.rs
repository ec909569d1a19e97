#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Memory providers for a map's pair store and bin table.
pub mod allocator;

/// An insertion-ordered hash map over a power-of-two bin table.
///
/// This module provides [`BinMap`] along with its entry, cursor, and iterator
/// types.
pub mod bin_map;

/// An insertion-ordered hash set built on [`BinMap`].
pub mod bin_set;

mod bin_table;

/// Errors reported by fallible reservation.
pub mod error;

/// Hash functions that map keys to 32-bit codes.
pub mod hash;

pub use allocator::Allocator;
pub use allocator::CountingAllocator;
pub use allocator::Global;
pub use bin_map::BinMap;
pub use bin_map::Entry;
pub use bin_set::BinSet;
pub use error::TryReserveError;
pub use hash::BuildHashFn;
pub use hash::DefaultHashFn;
pub use hash::HashFn;
