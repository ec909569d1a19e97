use alloc::alloc::handle_alloc_error;
use core::alloc::Layout;

/// The error returned by fallible reservation, such as
/// [`BinMap::try_reserve`](crate::BinMap::try_reserve).
///
/// When this is returned the map is left exactly as it was: the old bin
/// table and pair store are retained.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TryReserveError {
    /// The requested size exceeds what the map can index (more than 2^31
    /// bins, or an array layout larger than `isize::MAX` bytes).
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The allocator reported a failure.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocError {
        /// The layout of the allocation request that failed.
        layout: Layout,
    },
}

/// Whether memory allocation errors should return an error or abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fallibility {
    Fallible,
    Infallible,
}

impl Fallibility {
    #[cold]
    pub(crate) fn capacity_overflow(self) -> TryReserveError {
        match self {
            Fallibility::Fallible => TryReserveError::CapacityOverflow,
            Fallibility::Infallible => panic!("capacity overflow"),
        }
    }

    #[cold]
    pub(crate) fn alloc_err(self, layout: Layout) -> TryReserveError {
        match self {
            Fallibility::Fallible => TryReserveError::AllocError { layout },
            Fallibility::Infallible => handle_alloc_error(layout),
        }
    }
}
