//! # Object Pool
//!
//! A tightly packed pool handing out stable generational handles.
//!
//! Objects live contiguously in chunked storage for cache-friendly
//! iteration. A fixed slot table indirects handles to their objects'
//! current positions, so removal can fill the hole with the tail object
//! in O(1) while every other handle stays valid. Growth appends chunks
//! and never relocates existing objects.

mod iter;
mod slot;

use std::fmt;
use std::rc::Rc;

pub use iter::{Iter, IterMut};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::handle::{Handle, MAX_SLOTS};
use crate::hooks::{noop_hooks, PoolHooks};
use crate::policy::{DefaultPolicy, PoolPolicy};
use crate::storage::ChunkStorage;
use slot::SlotTable;

/// Bounded number of growth attempts; each retry halves the request.
const GROWTH_ATTEMPTS: usize = 10;

/// A pool of objects addressed by stable generational handles.
///
/// The pool owns its storage exclusively and destroys contained objects on
/// removal, `clear`, and drop. It is deliberately not cloneable; handles
/// are the only durable references and survive moves of the pool itself.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread or wrap in a mutex.
///
/// # Example
///
/// ```rust,ignore
/// struct Particle { x: f32, y: f32, life: f32 }
///
/// let mut pool: ObjectPool<Particle> = ObjectPool::new(PoolConfig::with_capacity(10_000));
///
/// let handle = pool.insert(Particle { x: 0.0, y: 0.0, life: 1.0 })?;
/// pool.get_mut(handle).unwrap().life = 0.5;
/// pool.remove(handle);
/// ```
pub struct ObjectPool<T, P: PoolPolicy<T> = DefaultPolicy> {
    /// Sparse handle indirection and free chain.
    table: SlotTable,
    /// Chunked dense storage for the objects themselves.
    storage: ChunkStorage<T>,
    /// Owning slot index for each dense position (dense-to-sparse map).
    dense_owner: Vec<u16>,
    /// Capacity at construction; also the growth increment.
    initial_capacity: usize,
    /// Hard ceiling on live objects.
    max_capacity: usize,
    /// Injected customization points.
    policy: P,
    /// Diagnostic sink shared with the storage.
    hooks: Rc<dyn PoolHooks>,
}

impl<T> ObjectPool<T> {
    /// Creates a pool with the default policy.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or the initial allocation
    /// fails; see [`with_policy_and_hooks`](Self::with_policy_and_hooks).
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self::with_policy(config, DefaultPolicy)
    }
}

impl<T, P: PoolPolicy<T>> ObjectPool<T, P> {
    /// Creates a pool with an injected policy.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or the initial allocation
    /// fails; see [`with_policy_and_hooks`](Self::with_policy_and_hooks).
    #[must_use]
    pub fn with_policy(config: PoolConfig, policy: P) -> Self {
        Self::with_policy_and_hooks(config, policy, noop_hooks())
    }

    /// Creates a pool with an injected policy and diagnostic hooks.
    ///
    /// All slot-table memory is allocated up front at `max_capacity`;
    /// object storage starts at `initial_capacity` and grows in chunks.
    ///
    /// # Panics
    ///
    /// Panics if `initial_capacity` is zero, exceeds `max_capacity`, or
    /// `max_capacity` exceeds [`MAX_SLOTS`]; also if the initial storage
    /// allocation fails.
    #[must_use]
    pub fn with_policy_and_hooks(config: PoolConfig, policy: P, hooks: Rc<dyn PoolHooks>) -> Self {
        assert!(
            config.initial_capacity > 0,
            "Capacity must be greater than zero"
        );
        assert!(
            config.initial_capacity <= config.max_capacity,
            "Initial capacity cannot exceed max capacity"
        );
        assert!(
            config.max_capacity <= MAX_SLOTS,
            "Max capacity cannot exceed the handle encoding limit"
        );

        let storage = ChunkStorage::with_capacity(config.initial_capacity, Rc::clone(&hooks));
        Self {
            table: SlotTable::new(config.max_capacity, config.initial_capacity),
            storage,
            dense_owner: Vec::with_capacity(config.initial_capacity),
            initial_capacity: config.initial_capacity,
            max_capacity: config.max_capacity,
            policy,
            hooks,
        }
    }

    /// Returns the number of live objects.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the pool holds no objects.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of slots currently backed by storage.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the hard ceiling on live objects.
    #[inline]
    #[must_use]
    pub const fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Inserts an object, returning its handle.
    ///
    /// On failure the value is dropped and the pool is untouched.
    ///
    /// # Errors
    ///
    /// [`PoolError::CapacityExceeded`] when the pool is at `max_capacity`;
    /// [`PoolError::AllocationFailed`] when growth cannot obtain memory.
    pub fn insert(&mut self, value: T) -> PoolResult<Handle> {
        self.insert_with(move |_| value)
    }

    /// Inserts a default-constructed object, returning its handle.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn insert_default(&mut self) -> PoolResult<Handle>
    where
        T: Default,
    {
        self.insert_with(|_| T::default())
    }

    /// Inserts the object built by `build`, which receives the handle the
    /// object will be addressed by.
    ///
    /// The closure runs only after a slot is secured, so a failed insert
    /// never constructs the object. The policy's `bind_handle` runs on the
    /// built object before the handle is returned.
    ///
    /// # Errors
    ///
    /// Same as [`insert`](Self::insert).
    pub fn insert_with<F>(&mut self, build: F) -> PoolResult<Handle>
    where
        F: FnOnce(Handle) -> T,
    {
        if self.len() == self.max_capacity {
            self.hooks.on_error("pool capacity exceeded");
            return Err(PoolError::CapacityExceeded {
                max_capacity: self.max_capacity,
            });
        }
        if !self.table.has_free() {
            self.grow()?;
        }

        let slot_index = self.table.pop_free();
        let handle = self.table.handle_of(slot_index);
        let mut value = build(handle);
        self.policy.bind_handle(&mut value, handle);
        let dense = self.storage.push(value);
        self.table.set_dense(slot_index, dense as u16);
        self.dense_owner.push(slot_index);
        Ok(handle)
    }

    /// Removes the object behind `handle`, returning it.
    ///
    /// The dense tail object is moved into the vacated position, so removal
    /// is O(1) regardless of pool size; iteration order is not preserved.
    /// The freed slot's generation advances, invalidating the handle.
    ///
    /// Returns `None` if the handle is stale, foreign, or null.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let dense = self.table.dense_of(handle)? as usize;
        self.table.release(handle.index());

        let removed = self.storage.swap_remove(dense);
        self.dense_owner.swap_remove(dense);
        if dense < self.dense_owner.len() {
            // The tail object now lives at `dense`; repoint its slot.
            let moved_slot = self.dense_owner[dense];
            self.table.set_dense(moved_slot, dense as u16);
        }
        Some(removed)
    }

    /// Gets the object behind `handle`.
    ///
    /// Returns `None` if the handle is stale, foreign, or null.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let dense = self.table.dense_of(handle)?;
        self.storage.get(dense as usize)
    }

    /// Gets the object behind `handle` mutably.
    ///
    /// Returns `None` if the handle is stale, foreign, or null.
    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let dense = self.table.dense_of(handle)?;
        self.storage.get_mut(dense as usize)
    }

    /// Checks whether `handle` refers to a live object.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.table.dense_of(handle).is_some()
    }

    /// Destroys every live object and rebuilds the full free chain.
    ///
    /// If the policy's `shrink_on_clear` is set, growth chunks are released
    /// back to the pool's original capacity. Slot generations reset to
    /// zero, so handles issued before `clear` may alias handles issued
    /// after it.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.dense_owner.clear();
        if self.policy.shrink_on_clear() {
            while self.capacity() > self.initial_capacity && self.storage.shrink_last() {}
        }
        self.table.reset(self.capacity());
    }

    /// Iterates over the policy-iterable objects in dense order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, P> {
        Iter::new(&self.storage, &self.policy)
    }

    /// Iterates mutably over the policy-iterable objects in dense order.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, P> {
        IterMut::new(&mut self.storage, &self.policy)
    }

    /// Walks the free chain and the dense-to-sparse map, verifying the
    /// structural invariants. Diagnostic only; not used on any hot path.
    #[must_use]
    pub fn check_consistency(&self) -> bool {
        let Some(free_len) = self.table.free_chain_len() else {
            return false;
        };
        if free_len != self.capacity() - self.len() {
            return false;
        }
        self.dense_owner
            .iter()
            .enumerate()
            .all(|(dense, &slot_index)| self.table.dense_slot(slot_index) == dense as u16)
    }

    /// Grows storage by up to the original capacity, halving the request on
    /// allocation failure up to a bounded number of attempts. On success
    /// the new slots join the free-chain tail; on failure the pool is
    /// untouched.
    fn grow(&mut self) -> PoolResult<()> {
        let old_capacity = self.capacity();
        let target = (old_capacity + self.initial_capacity).min(self.max_capacity);
        let requested = target - old_capacity;

        let mut attempt_size = requested;
        for _ in 0..GROWTH_ATTEMPTS {
            if attempt_size == 0 {
                break;
            }
            if self.storage.append(attempt_size) {
                let new_capacity = self.capacity();
                self.dense_owner.reserve_exact(new_capacity - old_capacity);
                self.table.extend_free(old_capacity, new_capacity);
                return Ok(());
            }
            attempt_size /= 2;
        }
        Err(PoolError::AllocationFailed {
            requested,
            attempts: GROWTH_ATTEMPTS,
        })
    }
}

impl<T: fmt::Display, P: PoolPolicy<T>> fmt::Display for ObjectPool<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "}}")
    }
}
