//! # Chunked Storage
//!
//! Growable backing store made of fixed-capacity, never-relocating chunks.
//!
//! Storage indices form one dense range `[0, capacity)` spread across the
//! chunks in order. The occupied prefix `[0, len)` holds the live objects;
//! everything past it is reserved but uninitialized memory that has never
//! run a constructor. Growth appends a new chunk and never moves existing
//! elements, so references into earlier chunks stay valid for as long as
//! their objects do.

use std::mem;
use std::rc::Rc;

use crate::hooks::PoolHooks;

/// One fixed-capacity allocation within a [`ChunkStorage`].
///
/// A chunk is created with its full capacity reserved up front and is never
/// resized afterwards; its vector length is exactly the number of live
/// objects it holds, so pushes stay within the original reservation and the
/// chunk's elements never relocate.
pub struct Chunk<T> {
    /// Live elements; spare capacity is uninitialized memory.
    data: Vec<T>,
    /// Storage index of this chunk's first slot.
    offset: usize,
    /// Number of slots this chunk contributes to the storage.
    capacity: usize,
}

impl<T> Chunk<T> {
    /// Returns the storage index of this chunk's first slot.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of live objects in this chunk.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this chunk holds no live objects.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of slots this chunk contributes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the live objects of this chunk as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the live objects of this chunk as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

/// Ordered list of never-relocating chunks backing a pool.
///
/// The live objects always occupy the dense prefix `[0, len)`. `push`
/// constructs at the dense tail, `swap_remove` destroys anywhere in the
/// prefix by filling the hole with the tail object. Spare capacity never
/// runs a constructor.
pub struct ChunkStorage<T> {
    /// Chunks in creation order; offsets are strictly increasing.
    chunks: Vec<Chunk<T>>,
    /// Number of live objects (the dense tail position).
    len: usize,
    /// Total slots across all chunks.
    capacity: usize,
    /// Diagnostic sink for allocation traffic and failures.
    hooks: Rc<dyn PoolHooks>,
}

impl<T> ChunkStorage<T> {
    /// Creates empty storage with no chunks.
    #[must_use]
    pub fn new(hooks: Rc<dyn PoolHooks>) -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
            capacity: 0,
            hooks,
        }
    }

    /// Creates storage backed by a single chunk of `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or the initial allocation fails.
    #[must_use]
    pub fn with_capacity(capacity: usize, hooks: Rc<dyn PoolHooks>) -> Self {
        let mut storage = Self::new(hooks);
        assert!(
            storage.append(capacity),
            "initial storage allocation failed"
        );
        storage
    }

    /// Returns the number of live objects.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no objects are live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the total number of slots across all chunks.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of chunks currently allocated.
    #[inline]
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Appends a new chunk of `count` slots.
    ///
    /// On allocation failure the storage is unchanged, the error hook fires
    /// with a description, and `false` is returned so the caller may retry
    /// with a smaller count.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    #[must_use]
    pub fn append(&mut self, count: usize) -> bool {
        assert!(count > 0, "Chunk size must be greater than zero");

        let mut data = Vec::new();
        if data.try_reserve_exact(count).is_err() {
            let bytes = count.saturating_mul(mem::size_of::<T>());
            self.hooks.on_error(&format!(
                "chunk allocation of {count} slots ({bytes} bytes) failed"
            ));
            return false;
        }

        self.hooks
            .on_allocation(count, count.saturating_mul(mem::size_of::<T>()));
        self.chunks.push(Chunk {
            data,
            offset: self.capacity,
            capacity: count,
        });
        self.capacity += count;
        true
    }

    /// Releases the most recently appended chunk.
    ///
    /// Returns `false` if there is no chunk to release.
    ///
    /// # Panics
    ///
    /// Panics if the last chunk still holds live objects. Only safe after
    /// the dense tail has retreated past the chunk, e.g. right after
    /// [`clear`](Self::clear).
    #[must_use]
    pub fn shrink_last(&mut self) -> bool {
        let Some(chunk) = self.chunks.pop() else {
            return false;
        };
        assert!(
            chunk.data.is_empty(),
            "cannot release a chunk holding live objects"
        );
        self.capacity -= chunk.capacity;
        self.hooks.on_release(
            chunk.capacity,
            chunk.capacity.saturating_mul(mem::size_of::<T>()),
        );
        true
    }

    /// Gets a live object by storage index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let (chunk_index, local) = self.locate(index);
        self.chunks[chunk_index].data.get(local)
    }

    /// Gets a live object mutably by storage index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let (chunk_index, local) = self.locate(index);
        self.chunks[chunk_index].data.get_mut(local)
    }

    /// Constructs `value` in place at the dense tail and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if every slot is occupied.
    pub fn push(&mut self, value: T) -> usize {
        assert!(self.len < self.capacity, "storage full");
        let index = self.len;
        for chunk in &mut self.chunks {
            if index < chunk.offset + chunk.capacity {
                chunk.data.push(value);
                self.len += 1;
                return index;
            }
        }
        // Chunks cover [0, capacity) and index < capacity, so the loop
        // always returns.
        panic!("storage index {index} not covered by any chunk")
    }

    /// Destroys the object at `index`, filling the hole with the dense tail
    /// object, and returns the removed value.
    ///
    /// The tail object's storage index changes to `index`; every other
    /// object stays put.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a live slot.
    pub fn swap_remove(&mut self, index: usize) -> T {
        assert!(index < self.len, "index {index} out of bounds");
        let last = self.len - 1;
        let (last_chunk, last_local) = self.locate(last);
        let tail = self.chunks[last_chunk].data.swap_remove(last_local);
        self.len = last;
        if index == last {
            return tail;
        }
        let (chunk_index, local) = self.locate(index);
        mem::replace(&mut self.chunks[chunk_index].data[local], tail)
    }

    /// Destroys every live object. Capacity is unchanged.
    pub fn clear(&mut self) {
        for chunk in &mut self.chunks {
            chunk.data.clear();
        }
        self.len = 0;
    }

    /// Returns the chunks in storage order, for diagnostics and iteration.
    #[inline]
    #[must_use]
    pub fn chunks(&self) -> &[Chunk<T>] {
        &self.chunks
    }

    /// Returns the chunks in storage order, mutably.
    #[inline]
    pub(crate) fn chunks_mut(&mut self) -> &mut [Chunk<T>] {
        &mut self.chunks
    }

    /// Resolves a storage index to `(chunk index, offset within chunk)` by
    /// scanning the chunk list in order. The chunk count stays small, so a
    /// linear scan beats anything cleverer.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside `[0, capacity)`.
    fn locate(&self, index: usize) -> (usize, usize) {
        let chunk_index = self
            .chunks
            .iter()
            .take_while(|chunk| chunk.offset + chunk.capacity <= index)
            .count();
        let chunk = &self.chunks[chunk_index];
        (chunk_index, index - chunk.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::noop_hooks;
    use std::cell::{Cell, RefCell};

    /// Hook that records every notification it receives.
    #[derive(Default)]
    struct RecordingHooks {
        allocated_slots: Cell<usize>,
        allocated_bytes: Cell<usize>,
        released_slots: Cell<usize>,
        errors: RefCell<Vec<String>>,
    }

    impl PoolHooks for RecordingHooks {
        fn on_allocation(&self, slots: usize, bytes: usize) {
            self.allocated_slots.set(self.allocated_slots.get() + slots);
            self.allocated_bytes.set(self.allocated_bytes.get() + bytes);
        }

        fn on_release(&self, slots: usize, _bytes: usize) {
            self.released_slots.set(self.released_slots.get() + slots);
        }

        fn on_error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_owned());
        }
    }

    /// Value whose drop increments a shared counter.
    struct Droppable(Rc<Cell<usize>>);

    impl Drop for Droppable {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_storage_default_construction() {
        let storage: ChunkStorage<i32> = ChunkStorage::new(noop_hooks());
        assert_eq!(storage.chunk_count(), 0);
        assert_eq!(storage.capacity(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_storage_construction() {
        let storage: ChunkStorage<i32> = ChunkStorage::with_capacity(512, noop_hooks());
        assert_eq!(storage.chunk_count(), 1);
        assert_eq!(storage.capacity(), 512);
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn test_storage_append() {
        let mut storage: ChunkStorage<i32> = ChunkStorage::with_capacity(512, noop_hooks());
        assert!(storage.append(256));
        assert_eq!(storage.chunk_count(), 2);
        assert_eq!(storage.capacity(), 512 + 256);
    }

    #[test]
    fn test_storage_shrink_is_lifo() {
        let mut storage: ChunkStorage<i32> = ChunkStorage::with_capacity(512, noop_hooks());
        assert!(storage.append(256));
        assert!(storage.append(128));
        assert_eq!(storage.chunk_count(), 3);

        assert!(storage.shrink_last());
        assert_eq!(storage.chunk_count(), 2);
        assert_eq!(storage.capacity(), 512 + 256);

        assert!(storage.shrink_last());
        assert!(storage.shrink_last());
        assert_eq!(storage.chunk_count(), 0);
        assert_eq!(storage.capacity(), 0);

        assert!(!storage.shrink_last());
    }

    #[test]
    fn test_storage_push_and_get() {
        let mut storage: ChunkStorage<i32> = ChunkStorage::with_capacity(4, noop_hooks());
        assert_eq!(storage.push(42), 0);
        assert_eq!(storage.push(43), 1);
        assert_eq!(storage.get(0), Some(&42));
        assert_eq!(storage.get(1), Some(&43));
        assert_eq!(storage.get(2), None);
    }

    #[test]
    fn test_storage_push_spans_chunks() {
        let mut storage: ChunkStorage<i32> = ChunkStorage::with_capacity(2, noop_hooks());
        assert!(storage.append(2));
        for value in 0..4 {
            storage.push(value);
        }
        assert_eq!(storage.len(), 4);
        assert_eq!(storage.get(2), Some(&2));
        assert_eq!(storage.get(3), Some(&3));
    }

    #[test]
    fn test_storage_swap_remove_middle() {
        let mut storage: ChunkStorage<i32> = ChunkStorage::with_capacity(4, noop_hooks());
        for value in [1, 2, 4, 8] {
            storage.push(value);
        }
        assert_eq!(storage.swap_remove(1), 2);
        assert_eq!(storage.len(), 3);
        // The tail object moved into the hole.
        assert_eq!(storage.get(1), Some(&8));
        assert_eq!(storage.get(0), Some(&1));
        assert_eq!(storage.get(2), Some(&4));
    }

    #[test]
    fn test_storage_swap_remove_last() {
        let mut storage: ChunkStorage<i32> = ChunkStorage::with_capacity(4, noop_hooks());
        storage.push(1);
        storage.push(2);
        assert_eq!(storage.swap_remove(1), 2);
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(0), Some(&1));
    }

    #[test]
    fn test_storage_swap_remove_across_chunks() {
        let mut storage: ChunkStorage<i32> = ChunkStorage::with_capacity(2, noop_hooks());
        assert!(storage.append(2));
        for value in [10, 20, 30, 40] {
            storage.push(value);
        }
        // Hole in chunk 0, tail in chunk 1.
        assert_eq!(storage.swap_remove(0), 10);
        assert_eq!(storage.get(0), Some(&40));
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn test_storage_clear_drops_live_objects() {
        let drops = Rc::new(Cell::new(0));
        let mut storage: ChunkStorage<Droppable> = ChunkStorage::with_capacity(4, noop_hooks());
        storage.push(Droppable(Rc::clone(&drops)));
        storage.push(Droppable(Rc::clone(&drops)));
        storage.clear();
        assert_eq!(drops.get(), 2);
        assert_eq!(storage.len(), 0);
        assert_eq!(storage.capacity(), 4);
    }

    #[test]
    fn test_storage_reports_allocations() {
        let hooks = Rc::new(RecordingHooks::default());
        let mut storage: ChunkStorage<u64> =
            ChunkStorage::with_capacity(16, Rc::clone(&hooks) as Rc<dyn PoolHooks>);
        assert!(storage.append(8));
        assert_eq!(hooks.allocated_slots.get(), 24);
        assert_eq!(hooks.allocated_bytes.get(), 24 * mem::size_of::<u64>());

        storage.clear();
        assert!(storage.shrink_last());
        assert_eq!(hooks.released_slots.get(), 8);
    }

    #[test]
    fn test_storage_reports_allocation_failure() {
        let hooks = Rc::new(RecordingHooks::default());
        let mut storage: ChunkStorage<u64> =
            ChunkStorage::new(Rc::clone(&hooks) as Rc<dyn PoolHooks>);
        // A reservation this large cannot succeed.
        assert!(!storage.append(usize::MAX / 2));
        assert_eq!(storage.chunk_count(), 0);
        assert_eq!(storage.capacity(), 0);
        assert_eq!(hooks.errors.borrow().len(), 1);
    }
}
