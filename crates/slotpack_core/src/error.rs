//! # Pool Error Types
//!
//! All errors that can occur when mutating a pool.
//!
//! A failed operation aborts without touching pool state: a construct that
//! returns an error has not consumed a slot, moved an object, or disturbed
//! the free chain.

use thiserror::Error;

/// Errors that can occur when inserting into a pool.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The pool already holds the maximum number of objects its handle
    /// encoding can address.
    #[error("pool capacity exceeded: at most {max_capacity} objects")]
    CapacityExceeded {
        /// The configured hard ceiling.
        max_capacity: usize,
    },

    /// Growing the backing storage failed after bounded retries.
    #[error("storage allocation of {requested} slots failed after {attempts} attempts")]
    AllocationFailed {
        /// Slot count requested by the first attempt.
        requested: usize,
        /// Number of attempts made, each half the size of the previous.
        attempts: usize,
    },
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
