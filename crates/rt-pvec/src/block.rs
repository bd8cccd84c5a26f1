//! The fixed-capacity heap block backing a persistent vector.
//!
//! A block never grows in place — once its claimable capacity is
//! exhausted a writer allocates a fresh, larger block and forks onto it.
//! Live storage and the undead (reverse change log) both live behind
//! `parking_lot` locks; the CAS-guarded `committed_len`/`write_epoch`
//! counters decide *which* writer gets to touch them, so the lock itself is
//! never contended by more than one writer at a time in the common case.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::RwLock;

/// One entry of the reverse change log: "before this entry was written,
/// `index` held `prior`."
#[derive(Clone, Debug)]
pub(crate) struct UndeadEntry<T> {
    pub index: usize,
    pub prior: T,
}

pub(crate) struct Block<T> {
    pub capacity: usize,
    /// Writers CAS this to claim a contiguous range of new live slots
    /// before filling them.
    committed_len: AtomicUsize,
    pub live: RwLock<Vec<T>>,
    pub undead: RwLock<Vec<UndeadEntry<T>>>,
    /// Bumped on every successful write (append or set); a writer must CAS
    /// this from its believed value before mutating, so exactly one writer
    /// wins any given race and everyone else forks.
    write_epoch: AtomicU64,
}

impl<T: Clone> Block<T> {
    pub fn new(capacity: usize, initial: Vec<T>) -> Self {
        let len = initial.len();
        Self {
            capacity,
            committed_len: AtomicUsize::new(len),
            live: RwLock::new(initial),
            undead: RwLock::new(Vec::new()),
            write_epoch: AtomicU64::new(0),
        }
    }

    pub fn true_version(&self) -> u64 {
        self.undead.read().len() as u64
    }

    pub fn live_len(&self) -> usize {
        self.live.read().len()
    }

    pub fn write_epoch(&self) -> u64 {
        self.write_epoch.load(Ordering::Acquire)
    }

    /// Believed dead-segment size equals `capacity - believed-live-size -
    /// believed-undead-size`; `n` new elements fit only if that's large
    /// enough. Returns the start index on success.
    fn try_claim(&self, n: usize) -> Option<usize> {
        let mut cur = self.committed_len.load(Ordering::Acquire);
        loop {
            if cur + n > self.capacity {
                return None;
            }
            match self.committed_len.compare_exchange_weak(
                cur,
                cur + n,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(cur),
                Err(actual) => cur = actual,
            }
        }
    }

    /// Appends `values`, claiming write access by CASing `write_epoch` from
    /// `believed_epoch`. Fails (triggering a fork at the call site) if
    /// either the epoch CAS loses or there isn't room.
    pub fn try_append(&self, believed_epoch: u64, values: &[T]) -> Option<u64> {
        if self.committed_len.load(Ordering::Acquire) + values.len() > self.capacity {
            return None;
        }
        if self
            .write_epoch
            .compare_exchange(believed_epoch, believed_epoch + 1, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let start = self.try_claim(values.len())?;
        let mut live = self.live.write();
        debug_assert_eq!(live.len(), start, "claims must extend the live segment contiguously");
        live.extend_from_slice(values);
        Some(believed_epoch + 1)
    }

    /// Overwrites `index`, pushing the prior value onto the undead log
    /// first so stale readers can still reconstruct the old state.
    pub fn try_set(&self, believed_epoch: u64, index: usize, value: T) -> Option<u64> {
        if self
            .write_epoch
            .compare_exchange(believed_epoch, believed_epoch + 1, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let mut live = self.live.write();
        if index >= live.len() {
            // Roll the epoch claim back; this is a programmer error at the
            // caller, not a race, so no fork is warranted.
            self.write_epoch.fetch_sub(1, Ordering::AcqRel);
            return None;
        }
        let prior = live[index].clone();
        self.undead.write().push(UndeadEntry { index, prior });
        live[index] = value;
        Some(believed_epoch + 1)
    }

    /// Rebuilds a logical snapshot of this block as of `target_version`,
    /// truncated to `max_len`, by copying the live segment and replaying
    /// the undead log backwards from the current true version down to the
    /// target.
    pub fn snapshot_at(&self, target_version: u64, max_len: usize) -> Vec<T> {
        let mut live = self.live.read().clone();
        live.truncate(max_len.min(live.len()));
        let undead = self.undead.read();
        let true_version = undead.len() as u64;
        for entry in undead[target_version as usize..true_version as usize].iter().rev() {
            if entry.index < live.len() {
                live[entry.index] = entry.prior.clone();
            }
        }
        live
    }
}
