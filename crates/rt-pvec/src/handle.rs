//! The public persistent-vector reference type and its read/write
//! protocols (§4.3).
//!
//! Each handle owns its current block through an `Arc`, swapped behind a
//! short-lived `RwLock` write lock on fork. That gives the same
//! safe-reclamation guarantee a hazard-pointer or epoch scheme would (a
//! block is freed only once nothing can still observe it) without the
//! raw-pointer lifetime hazards of sharing one `Atomic<Block<T>>` across
//! independently-forked handles.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rt_util::error::UserError;

use crate::block::Block;

const MIN_CAPACITY: usize = 8;

/// The mutable half of a reference: the block it currently points at, the
/// version cursor it believes is current, and the max-length watermark.
/// Shared (via `Arc`) by every `PvRef` produced from the same lineage
/// without an intervening fork.
struct HandleInner<T> {
    block: RwLock<Arc<Block<T>>>,
    version: AtomicU64,
    max_len: AtomicUsize,
}

/// A `(handle, length)` pair: the public persistent-vector reference.
/// Cheap to clone — cloning shares the handle and just copies the length.
pub struct PvRef<T> {
    handle: Arc<HandleInner<T>>,
    length: usize,
}

impl<T> Clone for PvRef<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            length: self.length,
        }
    }
}

impl<T: Clone> PvRef<T> {
    pub fn new(initial: Vec<T>) -> Self {
        let length = initial.len();
        let capacity = (length * 2).max(MIN_CAPACITY);
        let block = Arc::new(Block::new(capacity, initial));
        let handle = HandleInner {
            block: RwLock::new(block),
            version: AtomicU64::new(0),
            max_len: AtomicUsize::new(length),
        };
        Self {
            handle: Arc::new(handle),
            length,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// A zero-copy prefix: shares this reference's handle lineage with a
    /// shorter length. The backing idiom for "slice from zero" callers
    /// (§4.4's packed-list promotion rule) — no allocation, no rebuild.
    pub fn truncated(&self, new_len: usize) -> Self {
        assert!(new_len <= self.length, "truncated length must not grow the reference");
        Self {
            handle: self.handle.clone(),
            length: new_len,
        }
    }

    /// The optimistic read protocol: load the current block, rebuild (fork
    /// a fresh block reflecting this handle's believed version) if it has
    /// moved past what this handle believes is current, copy the desired
    /// elements out, then re-verify nothing changed underneath before
    /// handing them to `f`. Retries on verification failure — callers never
    /// observe a possibly-torn snapshot.
    pub fn with_read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        loop {
            let block = self.handle.block.read().clone();
            let true_version = block.true_version();
            let believed_version = self.handle.version.load(Ordering::Acquire);
            if believed_version != true_version {
                self.rebuild(&block, true_version);
                continue;
            }

            let max_len = self.handle.max_len.load(Ordering::Acquire);
            let take = self.length.min(max_len);
            let snapshot = {
                let live = block.live.read();
                live[..take.min(live.len())].to_vec()
            };

            if self.handle.version.load(Ordering::Acquire) == believed_version
                && block.true_version() == true_version
            {
                return f(&snapshot);
            }
        }
    }

    /// Forks a fresh block reflecting this handle's believed version, then
    /// swaps it into place. If another thread already forked past us the
    /// write lock simply serializes the two attempts; whichever commits
    /// last wins, and the loser's block is dropped (and, since nothing
    /// else ever observed it, reclaimed immediately).
    fn rebuild(&self, old_block: &Arc<Block<T>>, true_version: u64) {
        let max_len = self.handle.max_len.load(Ordering::Acquire);
        let believed_version = self.handle.version.load(Ordering::Acquire);
        let snapshot = old_block.snapshot_at(believed_version.min(true_version), max_len);
        let new_capacity = (max_len * 2).max(snapshot.len()).max(MIN_CAPACITY);
        let new_block = Arc::new(Block::new(new_capacity, snapshot));

        let mut slot = self.handle.block.write();
        if slot.true_version() == true_version {
            log::debug!(
                "pvec fork: capacity {} -> {}, true_version {}",
                old_block.capacity,
                new_capacity,
                true_version
            );
            *slot = new_block;
            self.handle.version.store(0, Ordering::Release);
        } else {
            log::trace!("pvec fork superseded by a concurrent rebuild, discarding");
        }
    }

    /// Appends `values`. On success the returned reference shares the same
    /// handle lineage and a longer length; on a lost CAS race or exhausted
    /// capacity it forks onto a fresh, larger block first and retries.
    pub fn append(&self, values: &[T]) -> PvRef<T> {
        if values.is_empty() {
            return self.clone();
        }
        loop {
            let block = self.handle.block.read().clone();
            let believed_epoch = block.write_epoch();
            if block.try_append(believed_epoch, values).is_some() {
                let new_len = self.length + values.len();
                self.handle.max_len.fetch_max(new_len, Ordering::AcqRel);
                return PvRef {
                    handle: self.handle.clone(),
                    length: new_len,
                };
            }
            let true_version = block.true_version();
            self.rebuild(&block, true_version);
        }
    }

    /// Overwrites `index`. Returns a new reference with its own handle
    /// lineage already synced to the new version, pointed at the same
    /// block this write landed on; the receiver's own handle is left
    /// untouched so concurrent readers through it still see the old
    /// version until they next observe a version mismatch.
    pub fn set(&self, index: usize, value: T) -> Result<PvRef<T>, UserError> {
        if index >= self.length {
            return Err(UserError::index_out_of_bounds(index, self.length));
        }
        loop {
            let block = self.handle.block.read().clone();
            let believed_epoch = block.write_epoch();
            if block.try_set(believed_epoch, index, value.clone()).is_some() {
                let new_version = block.true_version();
                let new_handle = HandleInner {
                    block: RwLock::new(block),
                    version: AtomicU64::new(new_version),
                    max_len: AtomicUsize::new(self.handle.max_len.load(Ordering::Acquire)),
                };
                return Ok(PvRef {
                    handle: Arc::new(new_handle),
                    length: self.length,
                });
            }
            let true_version = block.true_version();
            self.rebuild(&block, true_version);
        }
    }
}
