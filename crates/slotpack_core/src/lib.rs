//! # SLOTPACK Core
//!
//! A slot-based object pool with stable generational handles, designed for:
//! - O(1) construct, remove, and lookup
//! - Densely packed objects for cache-friendly iteration
//! - Growth that never relocates live objects or invalidates handles
//!
//! ## Architecture Rules
//!
//! 1. **Handles, not pointers** - Objects move during compaction; handles
//!    indirect through a slot table and always find them
//! 2. **Dense packing** - Live objects occupy one contiguous prefix, filled
//!    by swap-removal, so iteration touches no dead memory
//! 3. **Chunked growth** - New capacity arrives as fresh chunks; existing
//!    chunks never move or resize
//!
//! ## Example
//!
//! ```rust,ignore
//! use slotpack_core::{ObjectPool, PoolConfig};
//!
//! let mut pool: ObjectPool<Enemy> = ObjectPool::new(PoolConfig::with_capacity(4096));
//! let handle = pool.insert(Enemy::new())?;
//! // Handles stay valid across growth and unrelated removals.
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod handle;
pub mod hooks;
pub mod policy;
pub mod pool;
pub mod storage;

pub use config::{PoolConfig, DEFAULT_CAPACITY};
pub use error::{PoolError, PoolResult};
pub use handle::{Handle, MAX_SLOTS};
pub use hooks::{NoopHooks, PoolHooks, TracingHooks};
pub use policy::{DefaultPolicy, PoolPolicy};
pub use pool::{Iter, IterMut, ObjectPool};
pub use storage::{Chunk, ChunkStorage};
